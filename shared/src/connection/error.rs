use thiserror::Error;

/// Errors that can occur while compressing outgoing messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncoderError {
    /// Failed to create compressor with the specified configuration
    #[error("Failed to create compressor with compression level {level}")]
    CompressorCreationFailed { level: i32 },

    /// Failed to create compressor with dictionary
    #[error("Failed to create compressor with dictionary (compression level {level})")]
    CompressorWithDictionaryFailed { level: i32 },

    /// Compression operation failed
    #[error("Failed to compress payload of {payload_size} bytes")]
    CompressionFailed { payload_size: usize },
}

/// Errors that can occur while decompressing incoming messages
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecoderError {
    /// Failed to create decompressor
    #[error("Failed to create decompressor")]
    DecompressorCreationFailed,

    /// Failed to create decompressor with dictionary
    #[error("Failed to create decompressor with dictionary")]
    DecompressorWithDictionaryFailed,

    /// The frame header does not state how large the payload expands to
    #[error("Cannot determine decompressed size of payload of {payload_size} bytes")]
    UnknownContentSize { payload_size: usize },

    /// Decompression operation failed (SECURITY: potentially malicious payload)
    #[error("Failed to decompress payload of {payload_size} bytes (possible malformed or malicious data)")]
    DecompressionFailed { payload_size: usize },
}
