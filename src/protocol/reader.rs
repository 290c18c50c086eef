//! Bounds-checked sequential reads over a packet body.

use byteorder::{ByteOrder, NetworkEndian};

use super::DeserializeError;

#[cfg(test)]
mod tests;

/// A cursor over a byte slice that tracks how much of it has been consumed.
///
/// Every read that would run past the end of the buffer fails with
/// [`DeserializeError::MalformedBody`] instead of panicking.
pub(crate) struct WireReader<'raw> {
    buffer: &'raw [u8],
    position: usize,
}

impl<'raw> WireReader<'raw> {
    pub(crate) fn new(buffer: &'raw [u8]) -> Self {
        Self {
            buffer,
            position: 0,
        }
    }

    /// Number of bytes not yet consumed.
    pub(crate) fn remaining(&self) -> usize {
        self.buffer.len() - self.position
    }

    /// Consumes the next `length` bytes.
    pub(crate) fn take(&mut self, length: usize) -> Result<&'raw [u8], DeserializeError> {
        let end = self
            .position
            .checked_add(length)
            .ok_or(DeserializeError::MalformedBody)?;
        let slice = self
            .buffer
            .get(self.position..end)
            .ok_or(DeserializeError::MalformedBody)?;

        self.position = end;
        Ok(slice)
    }

    pub(crate) fn read_u8(&mut self) -> Result<u8, DeserializeError> {
        self.take(1).map(|bytes| bytes[0])
    }

    pub(crate) fn read_u16(&mut self) -> Result<u16, DeserializeError> {
        self.take(2).map(NetworkEndian::read_u16)
    }

    /// Ensures the whole buffer was consumed.
    pub(crate) fn finish(self) -> Result<(), DeserializeError> {
        if self.remaining() == 0 {
            Ok(())
        } else {
            Err(DeserializeError::MalformedBody)
        }
    }
}
