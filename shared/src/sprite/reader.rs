use log::warn;

use tableau_serde::{DataBuffer, Serde};

use crate::{
    sprite::{attribute::PARENT_ATT, error::SpriteError, tree::SpriteTree, SpriteKind},
    types::{AttributeId, SpriteId, TERMINATOR},
};

/// Apply one server sprite frame (blob type already consumed) to a mirror
/// tree. Unknown ids create the sprite; a kind mismatch replaces its body.
pub fn read_sprite_frame(
    tree: &mut SpriteTree,
    kind: SpriteKind,
    buffer: &mut DataBuffer,
) -> Result<SpriteId, SpriteError> {
    let id = SpriteId::de(buffer)?;
    if id == SpriteId::ROOT && kind != SpriteKind::Sprite {
        warn!("Root sprite cannot become a {kind}, keeping it plain");
    } else {
        tree.ensure_sprite(id, kind)?;
    }

    loop {
        let attribute_id = AttributeId::de(buffer)?;
        if attribute_id == TERMINATOR {
            return Ok(id);
        }
        read_attribute(tree, id, attribute_id, buffer)?;
    }
}

/// Subtype attributes are tried first, then the base sprite's
fn read_attribute(
    tree: &mut SpriteTree,
    id: SpriteId,
    attribute_id: AttributeId,
    buffer: &mut DataBuffer,
) -> Result<(), SpriteError> {
    if attribute_id == PARENT_ATT {
        let parent = u32::de(buffer)?;
        apply_parent(tree, id, parent);
        return Ok(());
    }

    let Some(sprite) = tree.get_mut(id) else {
        return Err(SpriteError::SpriteNotFound { sprite_id: id });
    };
    if sprite.body.read_attribute(attribute_id, buffer)? {
        return Ok(());
    }
    if sprite.attributes.read(attribute_id, buffer)? {
        tree.invalidate_subtree(id);
        return Ok(());
    }
    Err(SpriteError::UnknownAttribute {
        sprite_id: id,
        kind: sprite.kind(),
        attribute_id,
        unread_bytes: buffer.remaining(),
    })
}

fn apply_parent(tree: &mut SpriteTree, id: SpriteId, parent: u32) {
    if id == SpriteId::ROOT {
        return;
    }
    if parent == SpriteId::NONE {
        if let Err(error) = tree.remove_parent(id) {
            warn!("Failed to detach sprite {id}: {error}");
        }
        return;
    }
    let parent = SpriteId::new(parent);
    // a parent attribute always leaves the sprite last among its siblings,
    // as `add_child` does on the server
    if tree.sprite(id).and_then(|sprite| sprite.parent()) == Some(parent) {
        if let Err(error) = tree.remove_parent(id) {
            warn!("Failed to detach sprite {id}: {error}");
            return;
        }
    }
    if let Err(error) = tree.add_child(parent, id) {
        warn!("Failed to attach sprite {id} to {parent}: {error}");
    }
}

/// Apply a client-originated frame on the server. The sprite must already
/// exist with the stated kind, and only client attributes are accepted.
pub fn read_client_sprite_frame(
    tree: &mut SpriteTree,
    kind: SpriteKind,
    buffer: &mut DataBuffer,
) -> Result<SpriteId, SpriteError> {
    let id = SpriteId::de(buffer)?;
    let Some(sprite) = tree.get_mut(id) else {
        return Err(SpriteError::SpriteNotFound { sprite_id: id });
    };
    let actual = sprite.kind();
    if actual != kind {
        return Err(SpriteError::WrongKind {
            sprite_id: id,
            expected: kind,
            actual,
        });
    }

    loop {
        let attribute_id = AttributeId::de(buffer)?;
        if attribute_id == TERMINATOR {
            return Ok(id);
        }
        if !sprite.body.read_client_attribute(attribute_id, buffer)? {
            return Err(SpriteError::UnknownAttribute {
                sprite_id: id,
                kind,
                attribute_id,
                unread_bytes: buffer.remaining(),
            });
        }
    }
}
