mod error;
pub mod frame;
mod kind;
mod registry;

pub use error::BlobError;
pub use kind::{register_all_blob_types, BlobKind, BlobType, BlobTypes, BLOB_KINDS};
pub use registry::{BlobHandler, BlobRegistry};
