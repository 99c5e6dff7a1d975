use std::io::{Read, Write};

use super::error::FramingError;

/// Largest message accepted off a stream
pub const MAX_MESSAGE_SIZE: usize = 64 * 1024 * 1024;

/// Write `[length u32 LE][payload]`
pub fn write_message<W: Write>(stream: &mut W, payload: &[u8]) -> Result<(), FramingError> {
    let length = u32::try_from(payload.len())
        .ok()
        .filter(|length| *length as usize <= MAX_MESSAGE_SIZE)
        .ok_or(FramingError::MessageTooLarge {
            length: payload.len(),
            max: MAX_MESSAGE_SIZE,
        })?;
    stream.write_all(&length.to_le_bytes())?;
    stream.write_all(payload)?;
    stream.flush()?;
    Ok(())
}

/// Block until one whole message has been read
pub fn read_message<R: Read>(stream: &mut R) -> Result<Vec<u8>, FramingError> {
    let mut length_bytes = [0u8; 4];
    stream.read_exact(&mut length_bytes)?;
    let length = u32::from_le_bytes(length_bytes) as usize;
    if length > MAX_MESSAGE_SIZE {
        return Err(FramingError::MessageTooLarge {
            length,
            max: MAX_MESSAGE_SIZE,
        });
    }
    let mut payload = vec![0u8; length];
    stream.read_exact(&mut payload)?;
    Ok(payload)
}
