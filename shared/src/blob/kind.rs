use crate::{
    blob::{
        error::BlobError,
        registry::{BlobHandler, BlobRegistry},
    },
    sprite::SpriteKind,
};

/// One-byte tag leading every blob
pub type BlobType = u8;

/// Everything that can appear as a blob on the wire
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum BlobKind {
    Header,
    Command,
    DeleteSprites,
    Touch,
    Sprite(SpriteKind),
}

impl BlobKind {
    pub fn name(&self) -> &'static str {
        match self {
            BlobKind::Header => "Header",
            BlobKind::Command => "Command",
            BlobKind::DeleteSprites => "DeleteSprites",
            BlobKind::Touch => "Touch",
            BlobKind::Sprite(kind) => kind.name(),
        }
    }
}

/// Registration order. Server and client must agree on it byte for byte,
/// so both register through [`register_all_blob_types`].
pub const BLOB_KINDS: [BlobKind; 9] = [
    BlobKind::Header,
    BlobKind::Command,
    BlobKind::DeleteSprites,
    BlobKind::Touch,
    BlobKind::Sprite(SpriteKind::Sprite),
    BlobKind::Sprite(SpriteKind::Text),
    BlobKind::Sprite(SpriteKind::Image),
    BlobKind::Sprite(SpriteKind::Web),
    BlobKind::Sprite(SpriteKind::Video),
];

/// The blob type assigned to every kind, as returned by registration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BlobTypes {
    pub header: BlobType,
    pub command: BlobType,
    pub delete_sprites: BlobType,
    pub touch: BlobType,
    sprites: [BlobType; 5],
}

impl BlobTypes {
    pub fn sprite(&self, kind: SpriteKind) -> BlobType {
        match kind {
            SpriteKind::Sprite => self.sprites[0],
            SpriteKind::Text => self.sprites[1],
            SpriteKind::Image => self.sprites[2],
            SpriteKind::Web => self.sprites[3],
            SpriteKind::Video => self.sprites[4],
        }
    }
}

/// Register a handler for every [`BlobKind`] in the fixed order
pub fn register_all_blob_types<C>(
    registry: &mut BlobRegistry<C>,
    mut handler_for: impl FnMut(BlobKind) -> BlobHandler<C>,
) -> Result<BlobTypes, BlobError> {
    let mut types = [0; 9];
    for (slot, kind) in types.iter_mut().zip(BLOB_KINDS) {
        *slot = registry.add(kind, handler_for(kind))?;
    }
    let [header, command, delete_sprites, touch, sprite, text, image, web, video] = types;
    Ok(BlobTypes {
        header,
        command,
        delete_sprites,
        touch,
        sprites: [sprite, text, image, web, video],
    })
}
