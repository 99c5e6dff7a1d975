use thiserror::Error;

use tableau_serde::SerdeErr;

use crate::{blob::BlobKind, sprite::SpriteError};

/// Errors from registering blob handlers and dispatching incoming blobs
#[derive(Debug, Error)]
pub enum BlobError {
    /// The leading byte names no registered handler. Blobs are not length
    /// prefixed, so the rest of the message cannot be located.
    #[error("Unknown blob type {blob_type} ({registered} types registered)")]
    UnknownBlobType { blob_type: u8, registered: usize },

    /// More handlers than a one-byte tag can address
    #[error("Blob registry is full")]
    RegistryFull,

    /// Handlers can no longer be added once traffic has started
    #[error("Blob registry is locked, cannot register {kind:?}")]
    RegistryLocked { kind: BlobKind },

    /// A blob body did not end where its terminator should be
    #[error("{blob} blob expected terminator, found byte {found}")]
    MissingTerminator { blob: &'static str, found: u8 },

    /// The blob was understood but deliberately ignored in the current state
    #[error("Blob discarded: {reason}")]
    Discarded { reason: &'static str },

    #[error(transparent)]
    Decode(#[from] SerdeErr),

    #[error(transparent)]
    Sprite(#[from] SpriteError),
}
