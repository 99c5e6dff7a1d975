//! # Tableau Serde
//! The sequential byte codec shared by every tableau process. Producers and
//! consumers agree only on the order of typed writes; there are no per-field
//! tags on the wire.

#![deny(trivial_numeric_casts, unstable_features, unused_import_braces)]

mod data_buffer;
mod error;
mod serde;

pub use data_buffer::DataBuffer;
pub use error::SerdeErr;
pub use serde::{ConstByteLength, Serde};
