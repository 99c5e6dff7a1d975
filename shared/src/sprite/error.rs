use thiserror::Error;

use tableau_serde::SerdeErr;

use crate::{sprite::SpriteKind, types::AttributeId, types::SpriteId};

/// Errors from sprite tree operations and sprite frame decoding
#[derive(Debug, Error)]
pub enum SpriteError {
    /// No sprite with this id lives in the tree
    #[error("Sprite {sprite_id} not found")]
    SpriteNotFound { sprite_id: SpriteId },

    /// Tried to create a sprite under an id that is already taken
    #[error("Sprite {sprite_id} already exists")]
    SpriteAlreadyExists { sprite_id: SpriteId },

    /// The root sprite cannot be destroyed, reparented or removed
    #[error("Cannot {operation} the root sprite")]
    CannotModifyRoot { operation: &'static str },

    /// Attaching would make a sprite its own ancestor
    #[error("Attaching {child} under {parent} would create a cycle")]
    WouldCreateCycle { parent: SpriteId, child: SpriteId },

    /// `remove_child` on a sprite that is not a child of the given parent
    #[error("Sprite {child} is not a child of {parent}")]
    NotAChild { parent: SpriteId, child: SpriteId },

    /// A subtype setter was used on a sprite of another kind
    #[error("Sprite {sprite_id} is a {actual}, expected a {expected}")]
    WrongKind {
        sprite_id: SpriteId,
        expected: SpriteKind,
        actual: SpriteKind,
    },

    /// Neither the subtype nor the base sprite understands the attribute.
    /// Attribute lists carry no lengths, so nothing after this point can be
    /// read.
    #[error(
        "Unknown attribute {attribute_id} on {kind} {sprite_id}, {unread_bytes} bytes left unread"
    )]
    UnknownAttribute {
        sprite_id: SpriteId,
        kind: SpriteKind,
        attribute_id: AttributeId,
        unread_bytes: usize,
    },

    #[error("Failed to decode sprite attribute: {0}")]
    Decode(#[from] SerdeErr),
}
