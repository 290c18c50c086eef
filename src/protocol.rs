//! TACACS+ protocol packet <-> binary format conversions.

use core::fmt;

use bitflags::bitflags;
use getset::Getters;
use num_enum::{TryFromPrimitive, TryFromPrimitiveError};
use thiserror::Error;

pub mod authentication;
pub mod obfuscation;

mod fields;
pub use fields::*;

mod header;
pub use header::HeaderInfo;

mod reader;
pub(crate) use reader::WireReader;


/// An error that occurred during deserialization of a full/partial packet.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum DeserializeError {
    /// Not enough bytes were available to decode the fixed-size packet header.
    #[error("packet header is shorter than {} bytes", HeaderInfo::SIZE)]
    MalformedHeader,

    /// Field lengths declared in a packet body don't agree with the size of the body.
    #[error("declared body field lengths are inconsistent with the body size")]
    MalformedBody,

    /// Fewer bytes were supplied than the packet header claims.
    #[error("packet is shorter than the length declared in its header")]
    TruncatedPacket,

    /// Invalid byte representation of an object.
    #[error("invalid byte representation of object")]
    InvalidWireBytes,

    /// Mismatch between the header's protocol version and the one required by the body.
    #[error("mismatch in protocol version & authentication type specified")]
    VersionMismatch,

    /// The unencrypted flag disagrees with whether a shared secret is in use.
    #[error("unencrypted flag doesn't match whether a shared secret is configured")]
    IncorrectUnencryptedFlag,
}

// TODO: limit to enums in crate via sealed trait or similar?
#[doc(hidden)]
impl<Enum: TryFromPrimitive<Primitive = u8>> From<TryFromPrimitiveError<Enum>>
    for DeserializeError
{
    fn from(_value: TryFromPrimitiveError<Enum>) -> Self {
        Self::InvalidWireBytes
    }
}

/// An error indicating a packet field can't be represented on the wire.
#[non_exhaustive]
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvalidField {
    /// The named field is longer than its length prefix can express.
    #[error("{0} field is too long to be encoded")]
    TooLong(&'static str),

    /// The named field must be ASCII, but wasn't.
    #[error("{0} field must only contain ASCII characters")]
    NotAscii(&'static str),
}

/// The major version of the TACACS+ protocol.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum MajorVersion {
    /// The only current major version specified in RFC-8907.
    RFC8907 = 0xc,
}

/// The minor version of the TACACS+ protocol in use, which specifies choices for authentication methods.
#[repr(u8)]
#[non_exhaustive]
#[derive(Clone, Copy, Debug, PartialEq, Eq, TryFromPrimitive)]
pub enum MinorVersion {
    /// Default minor version, used for ASCII authentication.
    Default = 0x0,
    /// Minor version 1, which is used for (MS)CHAP and PAP authentication.
    V1 = 0x1,
}

/// The full protocol version.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Version(MajorVersion, MinorVersion);

impl Version {
    /// Creates a full version from a major and minor version.
    pub fn of(major: MajorVersion, minor: MinorVersion) -> Self {
        Self(major, minor)
    }

    /// The major version component.
    pub fn major(&self) -> MajorVersion {
        self.0
    }

    /// The minor version component.
    pub fn minor(&self) -> MinorVersion {
        self.1
    }
}

impl Default for Version {
    fn default() -> Self {
        Self(MajorVersion::RFC8907, MinorVersion::Default)
    }
}

impl TryFrom<u8> for Version {
    type Error = DeserializeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        let major = MajorVersion::try_from(value >> 4)?;
        let minor = MinorVersion::try_from(value & 0xf)?;
        Ok(Self(major, minor))
    }
}

impl From<Version> for u8 {
    fn from(value: Version) -> Self {
        ((value.0 as u8) << 4) | (value.1 as u8 & 0xf)
    }
}

/// Flags to indicate information about packets or the client/server.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct PacketFlags(u8);

bitflags! {
    impl PacketFlags: u8 {
        /// Indicates the body of the packet is unobfuscated.
        const UNENCRYPTED       = 0b00000001;

        /// Signals to the server that the client would like to reuse a TCP connection across multiple sessions.
        const SINGLE_CONNECTION = 0b00000100;
    }
}

/// The type of a protocol packet.
#[repr(u8)]
#[derive(Debug, PartialEq, Eq, Clone, Copy, TryFromPrimitive)]
pub enum PacketType {
    /// Authentication packet.
    Authentication = 0x1,

    /// Authorization packet.
    Authorization = 0x2,

    /// Accounting packet.
    Accounting = 0x3,
}

/// A type that can be treated as a TACACS+ protocol packet body.
pub trait PacketBody {
    /// Type of the packet (one of authentication, authorization, or accounting).
    const TYPE: PacketType;

    /// Length of body just including required fields.
    const MINIMUM_LENGTH: usize;

    /// Required protocol minor version based on the contents of the packet body.
    /// This really only exists since certain authentication methods are supposed to be gated by minor version.
    fn required_minor_version(&self) -> Option<MinorVersion> {
        None
    }
}

/// Something that can be serialized into a binary format.
pub trait Serialize {
    /// Returns the current size of the object as represented on the wire.
    fn wire_size(&self) -> usize;

    /// Appends the wire representation of this object to a buffer.
    fn serialize_into(&self, buffer: &mut Vec<u8>);

    /// Serializes this object into a freshly allocated buffer.
    fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.wire_size());
        self.serialize_into(&mut buffer);
        buffer
    }
}

/// Something that can be deserialized from its binary format.
pub trait Deserialize: Sized {
    /// Attempts to decode an object, consuming the entire buffer.
    fn deserialize(buffer: &[u8]) -> Result<Self, DeserializeError>;
}

/// A full TACACS+ protocol packet.
///
/// The shared secret is carried alongside the header & body so the packet can
/// (de)obfuscate itself, but it never ends up on the wire.
#[derive(Clone, PartialEq, Eq, Getters)]
pub struct Packet<B> {
    /// Information contained in the packet header.
    #[getset(get = "pub")]
    header: HeaderInfo,

    /// The body of the packet.
    #[getset(get = "pub")]
    body: B,

    secret: Vec<u8>,
}

impl<B: PacketBody + Serialize> Packet<B> {
    /// Assembles a header and body into a packet, barring minor version incompatibility.
    ///
    /// The packet type & length in the provided header are overwritten to match the body.
    pub fn new(mut header: HeaderInfo, body: B, secret: &[u8]) -> Option<Self> {
        match body.required_minor_version() {
            Some(required_version) if header.version.minor() != required_version => None,
            _ => {
                header.packet_type = B::TYPE;
                // body fields are length-checked on construction, so this always fits
                header.length = body.wire_size() as u32;

                Some(Self {
                    header,
                    body,
                    secret: secret.to_vec(),
                })
            }
        }
    }

    /// Size of the whole packet on the wire, header included.
    pub fn wire_size(&self) -> usize {
        HeaderInfo::SIZE + self.body.wire_size()
    }

    /// Serializes this packet, obfuscating the body unless the header's unencrypted flag is set.
    pub fn to_wire_bytes(&self) -> Vec<u8> {
        let mut buffer = Vec::with_capacity(self.wire_size());
        buffer.extend_from_slice(&self.header.encode());
        self.body.serialize_into(&mut buffer);

        if !self.header.flags.contains(PacketFlags::UNENCRYPTED) {
            let body_bytes = &mut buffer[HeaderInfo::SIZE..];
            obfuscation::obfuscate_in_place(body_bytes, &self.header, &self.secret);
        }

        buffer
    }
}

impl<B: PacketBody + Serialize + Deserialize> Packet<B> {
    /// Parses a packet from its wire format, deobfuscating the body with the provided secret.
    ///
    /// A non-empty secret requires an obfuscated body and an empty one an unobfuscated body;
    /// anything else is [`DeserializeError::IncorrectUnencryptedFlag`].
    /// Any bytes past the length declared in the header are ignored.
    pub fn from_wire_bytes(buffer: &[u8], secret: &[u8]) -> Result<Self, DeserializeError> {
        let header = HeaderInfo::decode(buffer)?;

        if header.packet_type != B::TYPE {
            return Err(DeserializeError::InvalidWireBytes);
        }

        let unencrypted = header.flags.contains(PacketFlags::UNENCRYPTED);
        if unencrypted != secret.is_empty() {
            return Err(DeserializeError::IncorrectUnencryptedFlag);
        }

        let body_end = HeaderInfo::SIZE
            .checked_add(header.length as usize)
            .ok_or(DeserializeError::TruncatedPacket)?;
        let body_bytes = buffer
            .get(HeaderInfo::SIZE..body_end)
            .ok_or(DeserializeError::TruncatedPacket)?;

        let body = if unencrypted {
            B::deserialize(body_bytes)?
        } else {
            let mut plaintext = body_bytes.to_vec();
            obfuscation::obfuscate_in_place(&mut plaintext, &header, secret);
            B::deserialize(&plaintext)?
        };

        Self::new(header, body, secret).ok_or(DeserializeError::VersionMismatch)
    }
}

impl<B: fmt::Debug> fmt::Debug for Packet<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Packet")
            .field("header", &self.header)
            .field("body", &self.body)
            .field("secret", &"<redacted>")
            .finish()
    }
}
