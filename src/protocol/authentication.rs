//! Authentication-related protocol packets.

use bitflags::bitflags;
use getset::{CopyGetters, Getters};
use num_enum::TryFromPrimitive;

use super::fields::check_length;
use super::{
    AuthenticationContext, DeserializeError, Deserialize, InvalidField, MinorVersion, PacketBody,
    PacketType, Serialize, UserInformation, WireReader,
};


/// The authentication action, as indicated upon initiation of an authentication session.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Action {
    /// Login request.
    Login = 0x01,

    /// Password change request.
    ChangePassword = 0x02,

    /// Outbound authentication request.
    ///
    /// RFC-8907 advises against this due to its security implications.
    SendAuth = 0x04,
}

impl Action {
    /// The number of bytes an `Action` occupies on the wire.
    pub const WIRE_SIZE: usize = 1;
}

/// The authentication status, as returned by a TACACS+ server.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, TryFromPrimitive)]
pub enum Status {
    /// Authentication succeeded.
    Pass = 0x01,

    /// Authentication failed.
    Fail = 0x02,

    /// Request for more domain-specific data.
    GetData = 0x03,

    /// Request for username.
    GetUser = 0x04,

    /// Request for password.
    GetPassword = 0x05,

    /// Restart session, discarding current one.
    Restart = 0x06,

    /// Server-side error while authenticating.
    Error = 0x07,

    /// Forward authentication request to an alternative daemon (deprecated by RFC-8907).
    Follow = 0x21,
}

impl Status {
    /// Whether this status asks the client to continue the session with another packet.
    pub fn is_continuation(&self) -> bool {
        !matches!(self, Status::Pass | Status::Fail | Status::Error)
    }
}

/// Flags received in an authentication reply packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ReplyFlags(u8);

bitflags! {
    impl ReplyFlags: u8 {
        /// Indicates the client shouldn't echo user input while it's being typed.
        const NO_ECHO = 0b00000001;
    }
}

/// An authentication start packet, used to initiate an authentication session.
#[derive(Clone, Debug, PartialEq, Eq, Getters, CopyGetters)]
pub struct Start {
    /// The action requested of the server.
    #[getset(get_copy = "pub")]
    action: Action,

    /// Privilege level, authentication type & service of the request.
    #[getset(get_copy = "pub")]
    authentication: AuthenticationContext,

    /// Information about the user being authenticated.
    #[getset(get = "pub")]
    user_information: UserInformation,

    data: Vec<u8>,
}

impl Start {
    /// Initializes a new start packet with the provided fields.
    ///
    /// For ASCII & PAP logins, `data` carries the user's password.
    pub fn new(
        action: Action,
        authentication: AuthenticationContext,
        user_information: UserInformation,
        data: Vec<u8>,
    ) -> Result<Self, InvalidField> {
        // ensure data length is small enough to be properly encoded without truncation
        check_length("data", &data)?;

        Ok(Self {
            action,
            authentication,
            user_information,
            data,
        })
    }

    /// Authentication-method-specific data, e.g. a password.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl PacketBody for Start {
    const TYPE: PacketType = PacketType::Authentication;

    // action, authentication context, and 4 field lengths
    const MINIMUM_LENGTH: usize = Action::WIRE_SIZE
        + AuthenticationContext::WIRE_SIZE
        + UserInformation::HEADER_INFORMATION_SIZE
        + 1;

    fn required_minor_version(&self) -> Option<MinorVersion> {
        Some(self.authentication.authentication_type.required_minor_version())
    }
}

impl Serialize for Start {
    fn wire_size(&self) -> usize {
        Action::WIRE_SIZE
            + AuthenticationContext::WIRE_SIZE
            + self.user_information.wire_size()
            + 1 // extra byte to include length of data
            + self.data.len()
    }

    fn serialize_into(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.action as u8);
        self.authentication.serialize_header_information(buffer);
        self.user_information.serialize_header_information(buffer);

        // length is verified in new()
        buffer.push(self.data.len() as u8);

        self.user_information.serialize_body_information(buffer);
        buffer.extend_from_slice(&self.data);
    }
}

impl Deserialize for Start {
    fn deserialize(buffer: &[u8]) -> Result<Self, DeserializeError> {
        if buffer.len() < Self::MINIMUM_LENGTH {
            return Err(DeserializeError::MalformedBody);
        }

        let mut reader = WireReader::new(buffer);

        let action = Action::try_from(reader.read_u8()?)?;
        let authentication = AuthenticationContext::deserialize_header_information(&mut reader)?;

        let user_length = reader.read_u8()?;
        let port_length = reader.read_u8()?;
        let remote_address_length = reader.read_u8()?;
        let data_length = reader.read_u8()?;

        let user = reader.take(user_length.into())?;
        let port = reader.take(port_length.into())?;
        let remote_address = reader.take(remote_address_length.into())?;
        let data = reader.take(data_length.into())?;
        reader.finish()?;

        let user_information = UserInformation::new(
            utf8_field(user)?,
            utf8_field(port)?,
            utf8_field(remote_address)?,
        )
        .map_err(|_| DeserializeError::InvalidWireBytes)?;

        Self::new(action, authentication, user_information, data.to_vec())
            .map_err(|_| DeserializeError::InvalidWireBytes)
    }
}

/// An authentication reply packet received from a server.
#[derive(Clone, Debug, PartialEq, Eq, CopyGetters)]
pub struct Reply {
    /// Status of the server reply.
    #[getset(get_copy = "pub")]
    status: Status,

    /// Flags set by the server.
    #[getset(get_copy = "pub")]
    flags: ReplyFlags,

    server_message: String,
    data: Vec<u8>,
}

impl Reply {
    /// Assembles a reply body, checking that both variable-length fields fit their 2-byte length prefixes.
    pub fn new(
        status: Status,
        flags: ReplyFlags,
        server_message: &str,
        data: Vec<u8>,
    ) -> Result<Self, InvalidField> {
        if u16::try_from(server_message.len()).is_err() {
            Err(InvalidField::TooLong("server message"))
        } else if !server_message.is_ascii() {
            Err(InvalidField::NotAscii("server message"))
        } else if u16::try_from(data.len()).is_err() {
            Err(InvalidField::TooLong("data"))
        } else {
            Ok(Self {
                status,
                flags,
                server_message: server_message.to_owned(),
                data,
            })
        }
    }

    /// Message received from the server, potentially to display to the user.
    pub fn server_message(&self) -> &str {
        &self.server_message
    }

    /// Domain-specific data received from the server.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Whether the no echo flag was set by the server in this reply.
    pub fn no_echo(&self) -> bool {
        self.flags.contains(ReplyFlags::NO_ECHO)
    }
}

impl PacketBody for Reply {
    const TYPE: PacketType = PacketType::Authentication;

    // status, flags, 2 two-byte field lengths
    const MINIMUM_LENGTH: usize = 6;
}

impl Serialize for Reply {
    fn wire_size(&self) -> usize {
        Self::MINIMUM_LENGTH + self.server_message.len() + self.data.len()
    }

    fn serialize_into(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.status as u8);
        buffer.push(self.flags.bits());

        // lengths are verified in new()
        buffer.extend_from_slice(&(self.server_message.len() as u16).to_be_bytes());
        buffer.extend_from_slice(&(self.data.len() as u16).to_be_bytes());

        buffer.extend_from_slice(self.server_message.as_bytes());
        buffer.extend_from_slice(&self.data);
    }
}

impl Deserialize for Reply {
    fn deserialize(buffer: &[u8]) -> Result<Self, DeserializeError> {
        if buffer.len() < Self::MINIMUM_LENGTH {
            return Err(DeserializeError::MalformedBody);
        }

        let mut reader = WireReader::new(buffer);

        let status = reader.read_u8()?;
        let flags = reader.read_u8()?;
        let server_message_length = reader.read_u16()?;
        let data_length = reader.read_u16()?;

        let server_message = reader.take(server_message_length.into())?;
        let data = reader.take(data_length.into())?;
        reader.finish()?;

        let server_message = utf8_field(server_message)?;
        if !server_message.is_ascii() {
            return Err(DeserializeError::InvalidWireBytes);
        }

        Ok(Self {
            status: Status::try_from(status)?,
            flags: ReplyFlags::from_bits(flags).ok_or(DeserializeError::InvalidWireBytes)?,
            server_message: server_message.to_owned(),
            data: data.to_vec(),
        })
    }
}

fn utf8_field(bytes: &[u8]) -> Result<&str, DeserializeError> {
    core::str::from_utf8(bytes).map_err(|_| DeserializeError::InvalidWireBytes)
}
