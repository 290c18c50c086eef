use byteorder::{ByteOrder, NetworkEndian};

use super::{DeserializeError, PacketFlags, PacketType, Version};

/// Information included in a TACACS+ packet header.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub struct HeaderInfo {
    /// The packet's protocol version.
    pub version: Version,

    /// The type of the packet body.
    pub packet_type: PacketType,

    /// The sequence number of the packet. This should be odd for client packets, and even for server packets.
    pub sequence_number: u8,

    /// Session/packet flags.
    pub flags: PacketFlags,

    /// ID of the current session.
    pub session_id: u32,

    /// Length of the packet body, as sent on the wire.
    pub length: u32,
}

impl HeaderInfo {
    /// Size of a TACACS+ packet header, in bytes.
    pub const SIZE: usize = 12;

    /// Encodes this header into its fixed 12-byte wire format.
    pub fn encode(&self) -> [u8; Self::SIZE] {
        let mut buffer = [0; Self::SIZE];

        buffer[0] = self.version.into();
        buffer[1] = self.packet_type as u8;
        buffer[2] = self.sequence_number;
        buffer[3] = self.flags.bits();
        NetworkEndian::write_u32(&mut buffer[4..8], self.session_id);
        NetworkEndian::write_u32(&mut buffer[8..12], self.length);

        buffer
    }

    /// Decodes a header from the beginning of a buffer; anything past the first 12 bytes is left untouched.
    pub fn decode(buffer: &[u8]) -> Result<Self, DeserializeError> {
        let header_bytes = buffer
            .get(..Self::SIZE)
            .ok_or(DeserializeError::MalformedHeader)?;

        Ok(Self {
            version: header_bytes[0].try_into()?,
            packet_type: PacketType::try_from(header_bytes[1])?,
            sequence_number: header_bytes[2],
            flags: PacketFlags::from_bits(header_bytes[3])
                .ok_or(DeserializeError::InvalidWireBytes)?,
            session_id: NetworkEndian::read_u32(&header_bytes[4..8]),
            length: NetworkEndian::read_u32(&header_bytes[8..12]),
        })
    }
}
