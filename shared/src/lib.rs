//! # Tableau Shared
//! Sprite tree, wire format and blob plumbing shared between the
//! tableau-server and tableau-client crates.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

#[macro_use]
extern crate cfg_if;

pub use tableau_serde::{ConstByteLength, DataBuffer, Serde, SerdeErr};

mod command;
mod connection;
mod math;
mod sprite;
mod touch;
mod types;

pub mod blob;
pub mod transport;

pub use command::Command;
pub use connection::{
    compression_config::{CompressionConfig, CompressionMode},
    decoder::Decoder,
    encoder::Encoder,
    error::{DecoderError, EncoderError},
};
pub use math::{Color, ColorA, EulerRot, Mat4, Vec3, WireVec3};
pub use sprite::*;
pub use touch::{KeyEvent, TouchEvent, TouchPhase};
pub use types::{AttributeId, HostType, SpriteId, SpriteIdGenerator, TERMINATOR};
