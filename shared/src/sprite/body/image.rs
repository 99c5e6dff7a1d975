use tableau_serde::{DataBuffer, Serde, SerdeErr};

use crate::{
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    types::AttributeId,
};

pub(crate) const RESOURCE_DIRTY: DirtyState = DirtyState::INTERNAL_A;

pub const RESOURCE_ATT: AttributeId = 80;

/// Keep the decoded texture in the process-wide cache
pub const IMG_CACHE_F: u32 = 1 << 0;
/// Generate mipmaps when uploading
pub const IMG_ENABLE_MIPMAP_F: u32 = 1 << 1;

/// Looks up the natural pixel size of an image file without decoding it.
/// An authoritative tree uses it to size image sprites that have no size of
/// their own.
pub trait ImageSizer: Send {
    fn dimensions(&self, filename: &str) -> Option<(u32, u32)>;
}

/// A bitmap loaded from a file by the render side
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Image {
    filename: String,
    flags: u32,
}

impl Image {
    pub fn filename(&self) -> &str {
        &self.filename
    }

    pub fn flags(&self) -> u32 {
        self.flags
    }

    pub(crate) fn set_filename(&mut self, filename: &str, flags: u32) -> DirtyState {
        if self.filename == filename && self.flags == flags {
            return DirtyState::EMPTY;
        }
        self.filename = filename.to_string();
        self.flags = flags;
        RESOURCE_DIRTY
    }

    pub(crate) fn dirty_slots() -> DirtyState {
        RESOURCE_DIRTY
    }

    pub(crate) fn write_attributes(&self, writer: &mut AttributeWriter) {
        writer.write_group(RESOURCE_DIRTY, RESOURCE_ATT, |buffer| {
            buffer.add(&self.filename);
            buffer.add(&self.flags);
        });
    }

    pub(crate) fn read_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        if attribute_id != RESOURCE_ATT {
            return Ok(false);
        }
        self.filename = String::de(buffer)?;
        self.flags = u32::de(buffer)?;
        Ok(true)
    }
}
