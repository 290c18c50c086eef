//! Fluent construction of outgoing packets, and the entry point for parsing incoming ones.

use thiserror::Error;

use crate::protocol::authentication::{Action, Reply, Start};
use crate::protocol::{
    AuthenticationContext, AuthenticationService, AuthenticationType, DeserializeError,
    HeaderInfo, InvalidField, MajorVersion, Packet, PacketFlags, PacketType, PrivilegeLevel,
    UserInformation, Version,
};

#[cfg(test)]
mod tests;

/// An error encountered while building a packet.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum BuildError {
    /// No session id was provided.
    #[error("no session id was provided")]
    MissingSessionId,

    /// A start packet must open a session, so its sequence number has to be 1.
    #[error("start packets must have sequence number 1, got {0}")]
    InvalidSequenceNumber(u8),

    /// A packet field couldn't be encoded.
    #[error(transparent)]
    InvalidField(#[from] InvalidField),

    /// The header's protocol version doesn't fit the body.
    #[error("protocol version doesn't match the authentication type")]
    VersionMismatch,
}

/// Something that is configured piece by piece and then turned into a packet.
pub trait PacketBuilder {
    /// What [`build()`](PacketBuilder::build) produces.
    type Output;

    /// Consumes the builder, producing its output.
    fn build(self) -> Result<Self::Output, BuildError>;
}

/// Builder for authentication [`Start`] packets.
///
/// The password is placed in the start body's data field, as done for single-packet
/// ASCII & PAP logins. Leaving out the secret (or setting an empty one) produces an
/// unobfuscated packet.
#[derive(Clone)]
pub struct StartPacketBuilder {
    secret: Option<Vec<u8>>,
    username: String,
    password: String,
    port: String,
    remote_address: String,
    session_id: Option<u32>,
    sequence_number: u8,
    action: Action,
    privilege_level: PrivilegeLevel,
    authentication_type: AuthenticationType,
    service: AuthenticationService,
}

impl Default for StartPacketBuilder {
    fn default() -> Self {
        Self {
            secret: None,
            username: String::new(),
            password: String::new(),
            port: String::new(),
            remote_address: String::new(),
            session_id: None,
            sequence_number: 1,
            action: Action::Login,
            privilege_level: PrivilegeLevel::default(),
            authentication_type: AuthenticationType::Ascii,
            service: AuthenticationService::Login,
        }
    }
}

impl StartPacketBuilder {
    /// Creates a new builder for an ASCII login with no fields filled in.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the shared secret used to obfuscate the packet body.
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = Some(secret.to_owned());
        self
    }

    /// Sets the user to authenticate.
    pub fn username(mut self, username: &str) -> Self {
        self.username = username.to_owned();
        self
    }

    /// Sets the user's password.
    pub fn password(mut self, password: &str) -> Self {
        self.password = password.to_owned();
        self
    }

    /// Sets the port the user is connected through.
    pub fn port(mut self, port: &str) -> Self {
        self.port = port.to_owned();
        self
    }

    /// Sets the address the user is connecting from.
    pub fn remote_address(mut self, remote_address: &str) -> Self {
        self.remote_address = remote_address.to_owned();
        self
    }

    /// Sets the session id of the packet.
    pub fn session_id(mut self, session_id: u32) -> Self {
        self.session_id = Some(session_id);
        self
    }

    /// Sets the sequence number of the packet.
    pub fn sequence_number(mut self, sequence_number: u8) -> Self {
        self.sequence_number = sequence_number;
        self
    }

    /// Sets the requested action (login by default).
    pub fn action(mut self, action: Action) -> Self {
        self.action = action;
        self
    }

    /// Sets the requested privilege level.
    pub fn privilege_level(mut self, privilege_level: PrivilegeLevel) -> Self {
        self.privilege_level = privilege_level;
        self
    }

    /// Sets the authentication type, which also determines the header's minor version.
    pub fn authentication_type(mut self, authentication_type: AuthenticationType) -> Self {
        self.authentication_type = authentication_type;
        self
    }

    /// Sets the service requesting authentication.
    pub fn service(mut self, service: AuthenticationService) -> Self {
        self.service = service;
        self
    }
}

impl PacketBuilder for StartPacketBuilder {
    type Output = Packet<Start>;

    fn build(self) -> Result<Packet<Start>, BuildError> {
        let session_id = self.session_id.ok_or(BuildError::MissingSessionId)?;

        if self.sequence_number != 1 {
            return Err(BuildError::InvalidSequenceNumber(self.sequence_number));
        }

        let secret = self.secret.unwrap_or_default();
        let flags = if secret.is_empty() {
            PacketFlags::UNENCRYPTED
        } else {
            PacketFlags::empty()
        };

        let header = HeaderInfo {
            version: Version::of(
                MajorVersion::RFC8907,
                self.authentication_type.required_minor_version(),
            ),
            packet_type: PacketType::Authentication,
            sequence_number: self.sequence_number,
            flags,
            session_id,
            // filled in by Packet::new()
            length: 0,
        };

        let body = Start::new(
            self.action,
            AuthenticationContext {
                privilege_level: self.privilege_level,
                authentication_type: self.authentication_type,
                service: self.service,
            },
            UserInformation::new(&self.username, &self.port, &self.remote_address)?,
            self.password.into_bytes(),
        )?;

        Packet::new(header, body, &secret)
            .ok_or(BuildError::VersionMismatch)
    }
}

/// Entry point for parsing authentication [`Reply`] packets.
///
/// The only thing the wire format can't carry is the shared secret, so that's all this
/// builder needs to know.
#[derive(Clone, Default)]
pub struct ReplyPacketBuilder {
    secret: Vec<u8>,
}

impl ReplyPacketBuilder {
    /// Creates a builder with an empty secret, which only accepts unobfuscated packets.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the shared secret used to deobfuscate reply bodies.
    pub fn secret(mut self, secret: &[u8]) -> Self {
        self.secret = secret.to_owned();
        self
    }

    /// Parses a reply packet from raw bytes received from a server.
    pub fn parse(self, buffer: &[u8]) -> Result<Packet<Reply>, DeserializeError> {
        PendingReply {
            secret: self.secret,
        }
        .parse(buffer)
    }
}

impl PacketBuilder for ReplyPacketBuilder {
    type Output = PendingReply;

    fn build(self) -> Result<PendingReply, BuildError> {
        Ok(PendingReply {
            secret: self.secret,
        })
    }
}

/// A reply packet that hasn't been received yet, configured with the secret needed to read it.
///
/// It is filled in exactly once, by [`parse()`](PendingReply::parse).
pub struct PendingReply {
    secret: Vec<u8>,
}

impl PendingReply {
    /// Parses a reply packet from raw bytes received from a server.
    pub fn parse(self, buffer: &[u8]) -> Result<Packet<Reply>, DeserializeError> {
        Packet::from_wire_bytes(buffer, &self.secret)
    }
}
