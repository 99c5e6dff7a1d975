use log::warn;
use tableau_serde::DataBuffer;

use crate::{
    blob::BlobTypes,
    sprite::{
        attribute::PARENT_ATT,
        body::{VideoStatus, STATUS_ATT},
        dirty::DirtyState,
        sprite::Sprite,
        tree::SpriteTree,
        SpriteKind,
    },
    types::{AttributeId, SpriteId, TERMINATOR},
};

/// Writes the attribute groups of one sprite frame.
///
/// Only groups whose dirty bit was requested are emitted. Each group is
/// staged in a scratch buffer and appended only if the whole frame, closing
/// terminator included, stays within the byte limit. Groups that do not fit
/// are left out and their bits stay set for a later frame. A group too large
/// for any frame under the limit is written anyway, or it would never leave.
pub struct AttributeWriter<'b> {
    buffer: &'b mut DataBuffer,
    requested: DirtyState,
    written: DirtyState,
    budget: Option<FrameBudget>,
    empty_length: usize,
}

/// Byte limits for one sprite frame
#[derive(Clone, Copy, Debug)]
pub(crate) struct FrameBudget {
    /// Room left in the outgoing buffer
    pub remaining: usize,
    /// Room a frame would have in an otherwise empty buffer
    pub ceiling: usize,
}

impl<'b> AttributeWriter<'b> {
    pub(crate) fn new(
        buffer: &'b mut DataBuffer,
        requested: DirtyState,
        budget: Option<FrameBudget>,
    ) -> Self {
        let empty_length = buffer.len();
        Self {
            buffer,
            requested,
            written: DirtyState::EMPTY,
            budget,
            empty_length,
        }
    }

    pub(crate) fn write_group(
        &mut self,
        bit: DirtyState,
        attribute_id: AttributeId,
        write: impl FnOnce(&mut DataBuffer),
    ) {
        if !self.requested.has(bit) {
            return;
        }
        let mut scratch = DataBuffer::new();
        scratch.add(&attribute_id);
        write(&mut scratch);
        if let Some(budget) = self.budget {
            if self.buffer.len() + scratch.len() + 1 > budget.remaining {
                if self.empty_length + scratch.len() + 1 <= budget.ceiling {
                    return;
                }
                warn!(
                    "Attribute {attribute_id} needs {} bytes, more than a frame may hold",
                    scratch.len()
                );
            }
        }
        self.buffer.append(&scratch);
        self.written.or(bit);
    }

    pub(crate) fn written(&self) -> DirtyState {
        self.written
    }
}

/// Append `[type][id]{groups}[T]` for `requested` bits, within `limit` total
/// bytes of `buffer`. `preamble` bytes of `buffer` are there in every
/// message. Nothing is appended when no group fits.
fn write_sprite_frame(
    sprite: &Sprite,
    blob_type: u8,
    requested: DirtyState,
    buffer: &mut DataBuffer,
    limit: Option<usize>,
    preamble: usize,
) -> DirtyState {
    let mut frame = DataBuffer::new();
    frame.add(&blob_type);
    frame.add(&sprite.id());
    let header_length = frame.len();

    let budget = limit.map(|limit| FrameBudget {
        remaining: limit.saturating_sub(buffer.len()),
        ceiling: limit.saturating_sub(preamble),
    });
    let mut writer = AttributeWriter::new(&mut frame, requested, budget);
    sprite.attributes.write(sprite.parent, &mut writer);
    sprite.body.write_attributes(&mut writer);
    let written = writer.written();

    if frame.len() == header_length {
        return DirtyState::EMPTY;
    }
    frame.add(&TERMINATOR);
    buffer.append(&frame);
    written
}

/// Serialise every dirty sprite reachable from the root, parents first.
///
/// Clean subtrees are skipped without being visited. When `limit` is set the
/// buffer only grows past it for a single attribute that could never fit;
/// anything left over stays dirty. Returns the number of sprite frames
/// written.
pub fn write_dirty_sprites(
    tree: &mut SpriteTree,
    types: &BlobTypes,
    buffer: &mut DataBuffer,
    limit: Option<usize>,
) -> usize {
    let mut frames = 0;
    let preamble = buffer.len();
    write_dirty_subtree(tree, SpriteId::ROOT, types, buffer, limit, preamble, &mut frames);
    frames
}

/// Returns true if the subtree rooted at `id` is completely clean afterwards
fn write_dirty_subtree(
    tree: &mut SpriteTree,
    id: SpriteId,
    types: &BlobTypes,
    buffer: &mut DataBuffer,
    limit: Option<usize>,
    preamble: usize,
    frames: &mut usize,
) -> bool {
    let requested = tree.pending_fields(id);
    let Some(sprite) = tree.get_mut(id) else {
        return true;
    };
    if !requested.is_clear() {
        let blob_type = types.sprite(sprite.kind());
        let written = write_sprite_frame(sprite, blob_type, requested, buffer, limit, preamble);
        if !written.is_clear() {
            *frames += 1;
            sprite.dirty.remove(written);
            let leftover = sprite.body.on_written(written);
            sprite.dirty.or(leftover);
        }
    }
    if !sprite.dirty.has(DirtyState::CHILD) {
        return sprite.dirty.is_clear();
    }

    let children = sprite.children.clone();
    let mut children_clean = true;
    for child in children {
        if !write_dirty_subtree(tree, child, types, buffer, limit, preamble, frames) {
            children_clean = false;
        }
    }
    let Some(sprite) = tree.get_mut(id) else {
        return true;
    };
    if children_clean {
        sprite.dirty.remove(DirtyState::CHILD);
    }
    sprite.dirty.is_clear()
}

/// Serialise the whole tree reachable from the root, ignoring dirty bits
/// and without a size limit. Every client receiving the dump is up to date
/// afterwards, so dirty bits are cleared along the way.
pub fn write_all_sprites(tree: &mut SpriteTree, types: &BlobTypes, buffer: &mut DataBuffer) -> usize {
    let mut frames = 0;
    for id in tree.descendants(SpriteId::ROOT) {
        let Some(sprite) = tree.get_mut(id) else {
            continue;
        };
        let blob_type = types.sprite(sprite.kind());
        let fields = sprite.all_fields();
        let written = write_sprite_frame(sprite, blob_type, fields, buffer, None, 0);
        if !written.is_clear() {
            frames += 1;
        }
        let leftover = sprite.body.on_written(written);
        sprite.dirty.clear();
        sprite.dirty.or(leftover);
    }
    frames
}

/// Tell clients about sprites detached since the last frame: a frame
/// carrying only `PARENT = 0`. Sprites reattached or destroyed in the
/// meantime are skipped.
pub fn write_detached_sprites(tree: &mut SpriteTree, types: &BlobTypes, buffer: &mut DataBuffer) -> usize {
    let mut frames = 0;
    for id in tree.take_detached() {
        if id == SpriteId::ROOT {
            continue;
        }
        let Some(sprite) = tree.get_mut(id) else {
            continue;
        };
        if sprite.parent.is_some() {
            continue;
        }
        buffer.add(&types.sprite(sprite.kind()));
        buffer.add(&id);
        buffer.add(&PARENT_ATT);
        buffer.add(&SpriteId::NONE);
        buffer.add(&TERMINATOR);
        sprite.dirty.remove(DirtyState::PARENT);
        frames += 1;
    }
    frames
}

/// Client to server: report the playback status of a video sprite
pub fn write_video_status(
    buffer: &mut DataBuffer,
    types: &BlobTypes,
    id: SpriteId,
    status: VideoStatus,
) {
    buffer.add(&types.sprite(SpriteKind::Video));
    buffer.add(&id);
    buffer.add(&STATUS_ATT);
    buffer.add(&status);
    buffer.add(&TERMINATOR);
}
