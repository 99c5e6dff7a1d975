use crate::{error::SerdeErr, serde::ConstByteLength, serde::Serde};

/// A growable byte buffer that is appended to by a producer and then read
/// sequentially by a consumer.
///
/// Reads must mirror writes exactly: the buffer carries no type information,
/// so reading an `f32` where a `u32` was written succeeds with garbage. The
/// only protection offered is against running off the end, which surfaces as
/// [`SerdeErr::Underrun`] instead of undefined behaviour.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataBuffer {
    bytes: Vec<u8>,
    read_position: usize,
}

impl DataBuffer {
    pub fn new() -> Self {
        Self {
            bytes: Vec::new(),
            read_position: 0,
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
            read_position: 0,
        }
    }

    /// Append the canonical encoding of `value`
    pub fn add<T: Serde>(&mut self, value: &T) {
        value.ser(self);
    }

    /// Consume the next value. The caller must know which type was written
    /// at this position.
    pub fn read<T: Serde>(&mut self) -> Result<T, SerdeErr> {
        T::de(self)
    }

    /// Whether at least the encoded size of `T` remains unread
    pub fn can_read<T: ConstByteLength>(&self) -> bool {
        self.remaining() >= T::const_byte_length()
    }

    /// Look at the next byte without consuming it
    pub fn peek_u8(&self) -> Option<u8> {
        self.bytes.get(self.read_position).copied()
    }

    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Consume `length` raw bytes
    pub fn read_bytes(&mut self, length: usize) -> Result<&[u8], SerdeErr> {
        let remaining = self.remaining();
        if length > remaining {
            return Err(SerdeErr::Underrun {
                needed: length,
                remaining,
            });
        }
        let start = self.read_position;
        self.read_position += length;
        Ok(&self.bytes[start..self.read_position])
    }

    /// Append everything written into `other`, ignoring its read cursor
    pub fn append(&mut self, other: &DataBuffer) {
        self.bytes.extend_from_slice(&other.bytes);
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Number of bytes not yet read
    pub fn remaining(&self) -> usize {
        self.bytes.len() - self.read_position
    }

    pub fn read_position(&self) -> usize {
        self.read_position
    }

    /// Skip everything that has not been read yet
    pub fn skip_remaining(&mut self) -> usize {
        let skipped = self.remaining();
        self.read_position = self.bytes.len();
        skipped
    }

    /// Move the read cursor back to the first byte
    pub fn rewind(&mut self) {
        self.read_position = 0;
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
        self.read_position = 0;
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl From<Vec<u8>> for DataBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self {
            bytes,
            read_position: 0,
        }
    }
}

impl From<&[u8]> for DataBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::from(bytes.to_vec())
    }
}
