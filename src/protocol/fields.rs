use num_enum::TryFromPrimitive;

use super::{DeserializeError, InvalidField, MinorVersion, WireReader};


/// A privilege level for authentication. Limited to the range 0-15, inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct PrivilegeLevel(u8);

impl PrivilegeLevel {
    /// Converts an integer to a `PrivilegeLevel` if it is in the proper range (0-15).
    ///
    /// # Examples
    /// ```
    /// use tacacs_plus_auth::protocol::PrivilegeLevel;
    ///
    /// let valid_level = PrivilegeLevel::of(3);
    /// assert!(valid_level.is_some());
    ///
    /// let too_big = PrivilegeLevel::of(42);
    /// assert!(too_big.is_none());
    /// ```
    pub fn of(level: u8) -> Option<Self> {
        if level <= 15 {
            Some(Self(level))
        } else {
            None
        }
    }

    /// The numeric privilege level.
    pub fn level(&self) -> u8 {
        self.0
    }
}

/// Defaults to the user privilege level (1), as used for regular logins.
impl Default for PrivilegeLevel {
    fn default() -> Self {
        Self(1)
    }
}

/// Types of authentication supported by the TACACS+ protocol.
///
/// RFC-8907 partitions these by supported minor version: [`Ascii`](AuthenticationType::Ascii) requires [`MinorVersion::Default`], while the rest require [`MinorVersion::V1`].
///
/// *Note:* TACACS+ as a protocol does not meet modern standards of security; access to the data lines must be protected. See [RFC-8907 Section 10.1]
///
/// [RFC-8907 Section 10.1]: https://datatracker.ietf.org/doc/html/rfc8907#section-10.1
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum AuthenticationType {
    /// Plain text username & password exchange.
    Ascii = 0x01,

    /// The Password Authentication Protocol, as specified by [RFC-1334](https://www.rfc-editor.org/rfc/rfc1334.html).
    Pap = 0x02,

    /// The Challenge-Handshake Authentication Protocol, also specified in [RFC-1334](https://www.rfc-editor.org/rfc/rfc1334.html).
    Chap = 0x03,

    /// Version 1 of Microsoft's CHAP extension.
    MsChap = 0x05,

    /// Version 2 of Microsoft's CHAP extension.
    MsChapV2 = 0x06,
}

impl AuthenticationType {
    /// Returns the required minor version for this `AuthenticationType`.
    pub const fn required_minor_version(&self) -> MinorVersion {
        match self {
            AuthenticationType::Ascii => MinorVersion::Default,
            _ => MinorVersion::V1,
        }
    }
}

/// A TACACS+ authentication service. Most of these values are only kept for backwards compatibility, so that's something to keep in mind.
#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum AuthenticationService {
    /// No authentication performed.
    None = 0x00,

    /// Regular login to a client device.
    Login = 0x01,

    /// Request for a change in privileges, a la `su(1)`.
    Enable = 0x02,

    /// Point-to-Point Protocol
    Ppp = 0x03,

    // could be NAT protocol translation, plaintext, and who knows what else
    Pt = 0x05,

    /// Authentication from the r-command suite, e.g. via `rlogin(1)`.
    RCommand = 0x06,

    /// [X.25 suite](https://en.wikipedia.org/wiki/X.25), potentially its NetWare flavor.
    X25 = 0x07,

    /// NetWare Asynchronous Support Interface
    Nasi = 0x08,

    /// Firewall proxy
    FwProxy = 0x09,
}

/// Some authentication information about a request, sent or received from a server.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AuthenticationContext {
    /// The privilege level requested.
    pub privilege_level: PrivilegeLevel,

    /// The authentication method in use.
    pub authentication_type: AuthenticationType,

    /// The service requesting authentication.
    pub service: AuthenticationService,
}

impl AuthenticationContext {
    /// Size of authentication context information on the wire, in bytes.
    pub const WIRE_SIZE: usize = 3;

    /// Serializes authentication context information into a packet body "header."
    pub(super) fn serialize_header_information(&self, buffer: &mut Vec<u8>) {
        buffer.push(self.privilege_level.0);
        buffer.push(self.authentication_type as u8);
        buffer.push(self.service as u8);
    }

    pub(super) fn deserialize_header_information(
        reader: &mut WireReader<'_>,
    ) -> Result<Self, DeserializeError> {
        let privilege_level =
            PrivilegeLevel::of(reader.read_u8()?).ok_or(DeserializeError::InvalidWireBytes)?;
        let authentication_type = AuthenticationType::try_from(reader.read_u8()?)?;
        let service = AuthenticationService::try_from(reader.read_u8()?)?;

        Ok(Self {
            privilege_level,
            authentication_type,
            service,
        })
    }
}

/// Some information about the user connected to a TACACS+ client.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct UserInformation {
    user: String,
    port: String,
    remote_address: String,
}

impl UserInformation {
    // three lengths in header
    pub(super) const HEADER_INFORMATION_SIZE: usize = 3;

    /// Bundles together information about a TACACS+ client user, performing some length & ASCII checks on fields to ensure validity.
    ///
    /// `user` can be any (UTF-8) string, but `port` and `remote_address` must be valid ASCII.
    /// All three fields must also be at most 255 bytes long (i.e., `u8::MAX`).
    pub fn new(user: &str, port: &str, remote_address: &str) -> Result<Self, InvalidField> {
        check_length("user", user.as_bytes())?;
        check_length("port", port.as_bytes())?;
        check_length("remote address", remote_address.as_bytes())?;

        if !port.is_ascii() {
            Err(InvalidField::NotAscii("port"))
        } else if !remote_address.is_ascii() {
            Err(InvalidField::NotAscii("remote address"))
        } else {
            Ok(Self {
                user: user.to_owned(),
                port: port.to_owned(),
                remote_address: remote_address.to_owned(),
            })
        }
    }

    /// The user being authenticated.
    pub fn user(&self) -> &str {
        &self.user
    }

    /// The port (e.g. tty line) the user is connected through.
    pub fn port(&self) -> &str {
        &self.port
    }

    /// Where the user is connecting from.
    pub fn remote_address(&self) -> &str {
        &self.remote_address
    }

    /// Returns the number of bytes this information bundle will occupy on the wire.
    pub fn wire_size(&self) -> usize {
        Self::HEADER_INFORMATION_SIZE
            + self.user.len()
            + self.port.len()
            + self.remote_address.len()
    }

    /// Places field lengths into the "header" section of a packet body.
    pub(super) fn serialize_header_information(&self, buffer: &mut Vec<u8>) {
        // lengths are checked in new()
        buffer.push(self.user.len() as u8);
        buffer.push(self.port.len() as u8);
        buffer.push(self.remote_address.len() as u8);
    }

    /// Copies user information fields into their proper locations within a packet body.
    pub(super) fn serialize_body_information(&self, buffer: &mut Vec<u8>) {
        buffer.extend_from_slice(self.user.as_bytes());
        buffer.extend_from_slice(self.port.as_bytes());
        buffer.extend_from_slice(self.remote_address.as_bytes());
    }
}

/// Ensures a field fits behind a single-byte length prefix.
pub(super) fn check_length(name: &'static str, field: &[u8]) -> Result<(), InvalidField> {
    if field.len() <= u8::MAX as usize {
        Ok(())
    } else {
        Err(InvalidField::TooLong(name))
    }
}
