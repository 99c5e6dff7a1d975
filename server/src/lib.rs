//! # Tableau Server
//! Owns the authoritative sprite graph, runs the application tick and
//! streams dirty sprite state to every connected client.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod transport;
pub mod shared {
    pub use tableau_shared::{
        Alignment, Color, ColorA, CompressionConfig, CompressionMode, DataBuffer, ImageSizer,
        KeyEvent, PlaybackCommand, Serde, SerdeErr, SpriteError, SpriteId, SpriteKind, SpriteMut,
        SpriteTree, TouchEvent, TouchPhase, Vec3, VideoStatus,
    };
}

mod app;
mod error;
mod events;
mod image_size;
mod io;
mod server;

pub use app::{ServerApp, UpdateParams};
pub use error::TableauServerError;
pub use events::{ServerEvent, TouchInfo};
#[cfg(feature = "image_metadata")]
pub use image_size::FileImageSizer;
pub use server::{EngineServer, ServerConfig, ServerState, ServerWorld};
