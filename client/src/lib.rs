//! # Tableau Client
//! Mirrors the sprite graph streamed by a tableau server, loads the media it
//! references and hands draw calls to a [`Renderer`]. The only state a client
//! originates is input: touches and video playback status go upstream.

#![deny(
    trivial_casts,
    trivial_numeric_casts,
    unstable_features,
    unused_import_braces
)]

#[macro_use]
extern crate cfg_if;

pub mod media;
pub mod service;
pub mod transport;
pub mod shared {
    pub use tableau_shared::{
        Alignment, Color, ColorA, CompressionConfig, CompressionMode, DataBuffer, Mat4,
        PlaybackCommand, Sprite, SpriteId, SpriteKind, SpriteTree, TouchEvent, TouchPhase, Vec3,
        VideoStatus,
    };
}

mod client;
mod error;
mod io;
mod render;

pub use client::{ClientConfig, ClientState, ClientWorld, EngineClient};
pub use error::{LoadImageError, TableauClientError};
pub use render::{DrawCommand, DrawContent, Renderer};
