mod attribute;
mod body;
mod dirty;
mod error;
mod reader;
#[allow(clippy::module_inception)]
mod sprite;
mod sprite_mut;
mod tree;
mod writer;

pub use attribute::{
    SpriteAttributes, CENTER_ATT, COLOR_ATT, FLAGS_ATT, OPACITY_ATT, PARENT_ATT, POSITION_ATT,
    ROTATION_ATT, SCALE_ATT, SIZE_ATT, SORTING_ATT, SUBTYPE_ATTRIBUTE_BASE,
};
pub use body::{
    Alignment, Image, ImageSizer, PlaybackCommand, SpriteBody, SpriteKind, Text, Video,
    VideoStatus, Web, FONTNAME_ATT, IMG_CACHE_F, IMG_ENABLE_MIPMAP_F, KEY_EVENTS_ATT, LAYOUT_ATT,
    PLAYBACK_ATT, RESOURCE_ATT, SOURCE_ATT, STATUS_ATT, TEXT_ATT, TOUCH_EVENTS_ATT, URL_ATT,
};
pub use dirty::DirtyState;
pub use error::SpriteError;
pub use reader::{read_client_sprite_frame, read_sprite_frame};
pub use sprite::Sprite;
pub use sprite_mut::SpriteMut;
pub use tree::SpriteTree;
pub use writer::{
    write_all_sprites, write_detached_sprites, write_dirty_sprites, write_video_status,
    AttributeWriter,
};
