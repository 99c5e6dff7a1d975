use std::{io, path::PathBuf};

use thiserror::Error;

use tableau_shared::{blob::BlobError, DecoderError, EncoderError};

#[derive(Debug, Error)]
pub enum TableauClientError {
    /// Blob handlers could not be registered
    #[error("Blob registration failed: {0}")]
    Registration(#[from] BlobError),

    #[error("Failed to set up frame compression: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Failed to set up frame decompression: {0}")]
    Decoder(#[from] DecoderError),

    #[error("Tried to connect while a socket is already attached")]
    AlreadyConnected,
}

/// Why an image sprite stays empty
#[derive(Debug, Error)]
pub enum LoadImageError {
    #[error("Failed to read image {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to decode image {}: {reason}", path.display())]
    Decode { path: PathBuf, reason: String },

    /// The client was built without an image decoder
    #[error("No image decoder available for {}", path.display())]
    Unsupported { path: PathBuf },

    /// The loader thread went away before answering
    #[error("Image loader stopped")]
    LoaderStopped,
}
