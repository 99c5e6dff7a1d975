use std::io;

use thiserror::Error;

/// Errors while reading or writing length-prefixed messages on a stream
#[derive(Debug, Error)]
pub enum FramingError {
    #[error("Stream I/O failed: {0}")]
    Io(#[from] io::Error),

    /// SECURITY: a peer announcing an absurd length is cut off instead of
    /// being allowed to make us allocate it
    #[error("Message of {length} bytes exceeds the limit of {max} bytes")]
    MessageTooLarge { length: usize, max: usize },
}
