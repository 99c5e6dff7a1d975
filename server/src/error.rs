use std::{io, net::SocketAddr};

use thiserror::Error;

use tableau_shared::{blob::BlobError, DecoderError, EncoderError, SpriteError};

#[derive(Debug, Error)]
pub enum TableauServerError {
    /// Blob handlers could not be registered
    #[error("Blob registration failed: {0}")]
    Registration(#[from] BlobError),

    #[error("Sprite operation failed: {0}")]
    Sprite(#[from] SpriteError),

    #[error("Failed to set up frame compression: {0}")]
    Encoder(#[from] EncoderError),

    #[error("Failed to set up frame decompression: {0}")]
    Decoder(#[from] DecoderError),

    /// The transport could not bind its listening address
    #[error("Failed to listen on {addr}: {source}")]
    Listen {
        addr: SocketAddr,
        #[source]
        source: io::Error,
    },

    #[error("Tried to listen while a socket is already attached")]
    AlreadyListening,
}
