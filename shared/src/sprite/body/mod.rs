mod image;
mod text;
mod video;
mod web;

pub use image::{Image, ImageSizer, IMG_CACHE_F, IMG_ENABLE_MIPMAP_F, RESOURCE_ATT};
pub use text::{Alignment, Text, FONTNAME_ATT, LAYOUT_ATT, TEXT_ATT};
pub use video::{PlaybackCommand, Video, VideoStatus, PLAYBACK_ATT, SOURCE_ATT, STATUS_ATT};
pub use web::{Web, KEY_EVENTS_ATT, TOUCH_EVENTS_ATT, URL_ATT};

use std::fmt;

use tableau_serde::{DataBuffer, SerdeErr};

use crate::{
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    types::AttributeId,
};

/// Which concrete sprite type a node is. Each kind owns one blob type on the
/// wire.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SpriteKind {
    Sprite,
    Text,
    Image,
    Web,
    Video,
}

impl SpriteKind {
    pub const ALL: [SpriteKind; 5] = [
        SpriteKind::Sprite,
        SpriteKind::Text,
        SpriteKind::Image,
        SpriteKind::Web,
        SpriteKind::Video,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            SpriteKind::Sprite => "Sprite",
            SpriteKind::Text => "Text",
            SpriteKind::Image => "Image",
            SpriteKind::Web => "Web",
            SpriteKind::Video => "Video",
        }
    }
}

impl fmt::Display for SpriteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Subtype-specific state carried next to the base attributes
#[derive(Clone, Debug, PartialEq)]
pub enum SpriteBody {
    Sprite,
    Text(Text),
    Image(Image),
    Web(Web),
    Video(Video),
}

impl SpriteBody {
    pub fn new(kind: SpriteKind) -> Self {
        match kind {
            SpriteKind::Sprite => SpriteBody::Sprite,
            SpriteKind::Text => SpriteBody::Text(Text::default()),
            SpriteKind::Image => SpriteBody::Image(Image::default()),
            SpriteKind::Web => SpriteBody::Web(Web::default()),
            SpriteKind::Video => SpriteBody::Video(Video::default()),
        }
    }

    pub fn kind(&self) -> SpriteKind {
        match self {
            SpriteBody::Sprite => SpriteKind::Sprite,
            SpriteBody::Text(_) => SpriteKind::Text,
            SpriteBody::Image(_) => SpriteKind::Image,
            SpriteBody::Web(_) => SpriteKind::Web,
            SpriteBody::Video(_) => SpriteKind::Video,
        }
    }

    pub fn as_text(&self) -> Option<&Text> {
        match self {
            SpriteBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn as_image(&self) -> Option<&Image> {
        match self {
            SpriteBody::Image(image) => Some(image),
            _ => None,
        }
    }

    pub fn as_web(&self) -> Option<&Web> {
        match self {
            SpriteBody::Web(web) => Some(web),
            _ => None,
        }
    }

    pub fn as_web_mut(&mut self) -> Option<&mut Web> {
        match self {
            SpriteBody::Web(web) => Some(web),
            _ => None,
        }
    }

    pub fn as_video(&self) -> Option<&Video> {
        match self {
            SpriteBody::Video(video) => Some(video),
            _ => None,
        }
    }

    pub(crate) fn as_text_mut(&mut self) -> Option<&mut Text> {
        match self {
            SpriteBody::Text(text) => Some(text),
            _ => None,
        }
    }

    pub(crate) fn as_image_mut(&mut self) -> Option<&mut Image> {
        match self {
            SpriteBody::Image(image) => Some(image),
            _ => None,
        }
    }

    pub(crate) fn as_video_mut(&mut self) -> Option<&mut Video> {
        match self {
            SpriteBody::Video(video) => Some(video),
            _ => None,
        }
    }

    /// Internal dirty bits this kind uses
    pub(crate) fn dirty_slots(&self) -> DirtyState {
        match self {
            SpriteBody::Sprite => DirtyState::EMPTY,
            SpriteBody::Text(_) => Text::dirty_slots(),
            SpriteBody::Image(_) => Image::dirty_slots(),
            SpriteBody::Web(_) => Web::dirty_slots(),
            SpriteBody::Video(_) => Video::dirty_slots(),
        }
    }

    pub(crate) fn write_attributes(&self, writer: &mut AttributeWriter) {
        match self {
            SpriteBody::Sprite => {}
            SpriteBody::Text(text) => text.write_attributes(writer),
            SpriteBody::Image(image) => image.write_attributes(writer),
            SpriteBody::Web(web) => web.write_attributes(writer),
            SpriteBody::Video(video) => video.write_attributes(writer),
        }
    }

    /// Called with the bits that actually made it into the frame. Returns
    /// bits that must stay dirty regardless.
    pub(crate) fn on_written(&mut self, written: DirtyState) -> DirtyState {
        match self {
            SpriteBody::Web(web) => {
                web.on_written(written);
                web.leftover_dirty()
            }
            _ => DirtyState::EMPTY,
        }
    }

    /// `Ok(false)` means the id is not one of this kind's attributes
    pub(crate) fn read_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match self {
            SpriteBody::Sprite => Ok(false),
            SpriteBody::Text(text) => text.read_attribute(attribute_id, buffer),
            SpriteBody::Image(image) => image.read_attribute(attribute_id, buffer),
            SpriteBody::Web(web) => web.read_attribute(attribute_id, buffer),
            SpriteBody::Video(video) => video.read_attribute(attribute_id, buffer),
        }
    }

    pub(crate) fn read_client_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match self {
            SpriteBody::Video(video) => video.read_client_attribute(attribute_id, buffer),
            _ => Ok(false),
        }
    }
}
