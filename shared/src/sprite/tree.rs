use std::collections::{HashMap, HashSet};

use log::warn;

use crate::{
    math::{Mat4, Vec3},
    sprite::{
        attribute::SpriteAttributes,
        body::{ImageSizer, SpriteBody, SpriteKind},
        dirty::DirtyState,
        error::SpriteError,
        sprite::Sprite,
        sprite_mut::SpriteMut,
    },
    types::{HostType, SpriteId},
};

/// Arena holding every sprite of one process, keyed by id.
///
/// On the server the tree tracks what changed since the last frame: dirty
/// bits, destroyed subtree roots and detached sprites. A client tree is a
/// mirror and tracks nothing.
pub struct SpriteTree {
    host_type: HostType,
    sprites: HashMap<SpriteId, Sprite>,
    destroyed: Vec<SpriteId>,
    detached: Vec<SpriteId>,
    image_sizer: Option<Box<dyn ImageSizer>>,
}

impl SpriteTree {
    pub fn new(host_type: HostType) -> Self {
        let mut tree = Self {
            host_type,
            sprites: HashMap::new(),
            destroyed: Vec::new(),
            detached: Vec::new(),
            image_sizer: None,
        };
        tree.insert_root();
        tree
    }

    fn insert_root(&mut self) {
        let mut root = Sprite::new(SpriteId::ROOT, SpriteKind::Sprite);
        if self.host_type == HostType::Client {
            root.dirty.clear();
        }
        self.sprites.insert(SpriteId::ROOT, root);
    }

    pub fn host_type(&self) -> HostType {
        self.host_type
    }

    /// Size image sprites that have none from their file
    pub fn set_image_sizer(&mut self, sizer: Box<dyn ImageSizer>) {
        self.image_sizer = Some(sizer);
    }

    pub(crate) fn image_dimensions(&self, filename: &str) -> Option<(u32, u32)> {
        self.image_sizer.as_ref()?.dimensions(filename)
    }

    fn tracks_changes(&self) -> bool {
        self.host_type == HostType::Server
    }

    /// Number of sprites, root included
    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }

    pub fn contains(&self, id: SpriteId) -> bool {
        self.sprites.contains_key(&id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<SpriteMut<'_>> {
        if self.sprites.contains_key(&id) {
            Some(SpriteMut::new(self, id))
        } else {
            None
        }
    }

    pub fn sprite_ids(&self) -> impl Iterator<Item = &SpriteId> {
        self.sprites.keys()
    }

    pub(crate) fn get_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(&id)
    }

    /// Insert a new, detached sprite
    pub fn create(&mut self, id: SpriteId, kind: SpriteKind) -> Result<SpriteMut<'_>, SpriteError> {
        if self.sprites.contains_key(&id) {
            return Err(SpriteError::SpriteAlreadyExists { sprite_id: id });
        }
        let mut sprite = Sprite::new(id, kind);
        if !self.tracks_changes() {
            sprite.dirty.clear();
        }
        self.sprites.insert(id, sprite);
        Ok(SpriteMut::new(self, id))
    }

    /// Swap the body of an existing sprite for a default one of `kind`
    pub(crate) fn replace_body(&mut self, id: SpriteId, kind: SpriteKind) {
        if let Some(sprite) = self.sprites.get_mut(&id) {
            sprite.body = SpriteBody::new(kind);
            if self.host_type == HostType::Server {
                let slots = sprite.body.dirty_slots();
                sprite.dirty.or(slots);
            }
        }
    }

    /// True if `ancestor` is `id` or lies on its parent chain
    pub fn is_ancestor(&self, ancestor: SpriteId, id: SpriteId) -> bool {
        let mut current = Some(id);
        while let Some(current_id) = current {
            if current_id == ancestor {
                return true;
            }
            current = self.sprites.get(&current_id).and_then(|sprite| sprite.parent);
        }
        false
    }

    /// Attach `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    pub fn add_child(&mut self, parent: SpriteId, child: SpriteId) -> Result<(), SpriteError> {
        if child == SpriteId::ROOT {
            return Err(SpriteError::CannotModifyRoot {
                operation: "reparent",
            });
        }
        if !self.sprites.contains_key(&parent) {
            return Err(SpriteError::SpriteNotFound { sprite_id: parent });
        }
        let (current_parent, is_leaf) = match self.sprites.get(&child) {
            Some(sprite) => (sprite.parent, sprite.children.is_empty()),
            None => return Err(SpriteError::SpriteNotFound { sprite_id: child }),
        };
        if current_parent == Some(parent) {
            return Ok(());
        }
        // a leaf can only be its own ancestor
        let cycle = if is_leaf {
            child == parent
        } else {
            self.is_ancestor(child, parent)
        };
        if cycle {
            return Err(SpriteError::WouldCreateCycle { parent, child });
        }

        self.unlink(child);
        if let Some(parent_sprite) = self.sprites.get_mut(&parent) {
            parent_sprite.children.push(child);
        }
        if let Some(child_sprite) = self.sprites.get_mut(&child) {
            child_sprite.parent = Some(parent);
        }
        self.invalidate_subtree(child);
        self.mark_as_dirty(child, DirtyState::PARENT);
        Ok(())
    }

    /// Detach `child` from `parent` without destroying it
    pub fn remove_child(&mut self, parent: SpriteId, child: SpriteId) -> Result<(), SpriteError> {
        match self.sprites.get(&child) {
            Some(sprite) if sprite.parent == Some(parent) => {}
            Some(_) => return Err(SpriteError::NotAChild { parent, child }),
            None => return Err(SpriteError::SpriteNotFound { sprite_id: child }),
        }
        self.detach(child);
        Ok(())
    }

    /// Detach `child` from whatever parent it has. A no-op for detached
    /// sprites.
    pub fn remove_parent(&mut self, child: SpriteId) -> Result<(), SpriteError> {
        if child == SpriteId::ROOT {
            return Err(SpriteError::CannotModifyRoot {
                operation: "detach",
            });
        }
        match self.sprites.get(&child) {
            Some(sprite) if sprite.parent.is_some() => {
                self.detach(child);
                Ok(())
            }
            Some(_) => Ok(()),
            None => Err(SpriteError::SpriteNotFound { sprite_id: child }),
        }
    }

    fn detach(&mut self, child: SpriteId) {
        if self.unlink(child).is_none() {
            return;
        }
        self.invalidate_subtree(child);
        if self.tracks_changes() {
            self.detached.push(child);
        }
    }

    /// Remove `child` from its parent's child list. Returns the old parent.
    fn unlink(&mut self, child: SpriteId) -> Option<SpriteId> {
        let old_parent = self.sprites.get_mut(&child)?.parent.take()?;
        if let Some(parent_sprite) = self.sprites.get_mut(&old_parent) {
            parent_sprite.children.retain(|id| *id != child);
        }
        Some(old_parent)
    }

    /// Destroy every child subtree of `id`. Returns how many sprites were
    /// removed.
    pub fn clear_children(&mut self, id: SpriteId) -> Result<usize, SpriteError> {
        let children = match self.sprites.get(&id) {
            Some(sprite) => sprite.children.clone(),
            None => return Err(SpriteError::SpriteNotFound { sprite_id: id }),
        };
        let mut removed = 0;
        for child in children {
            removed += self.destroy(child)?;
        }
        Ok(removed)
    }

    /// Destroy `id` and its whole subtree. Returns how many sprites were
    /// removed.
    pub fn destroy(&mut self, id: SpriteId) -> Result<usize, SpriteError> {
        if id == SpriteId::ROOT {
            return Err(SpriteError::CannotModifyRoot {
                operation: "destroy",
            });
        }
        if !self.sprites.contains_key(&id) {
            return Err(SpriteError::SpriteNotFound { sprite_id: id });
        }
        self.unlink(id);
        let subtree = self.descendants(id);
        for sprite_id in &subtree {
            self.sprites.remove(sprite_id);
        }
        if self.tracks_changes() {
            self.destroyed.push(id);
        }
        Ok(subtree.len())
    }

    /// Drop every sprite and start over with a fresh root
    pub fn clear(&mut self) {
        self.sprites.clear();
        self.destroyed.clear();
        self.detached.clear();
        self.insert_root();
    }

    /// `id` followed by all of its descendants, parents before children
    pub fn descendants(&self, id: SpriteId) -> Vec<SpriteId> {
        let mut ordered = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(sprite) = self.sprites.get(&current) else {
                continue;
            };
            ordered.push(current);
            stack.extend(sprite.children.iter().rev());
        }
        ordered
    }

    /// Set `bits` on `id` and flag every ancestor as having a dirty child
    pub fn mark_as_dirty(&mut self, id: SpriteId, bits: DirtyState) {
        if !self.tracks_changes() {
            return;
        }
        let Some(sprite) = self.sprites.get_mut(&id) else {
            return;
        };
        sprite.dirty.or(bits);
        let mut parent = sprite.parent;
        while let Some(parent_id) = parent {
            let Some(parent_sprite) = self.sprites.get_mut(&parent_id) else {
                break;
            };
            parent_sprite.dirty.or(DirtyState::CHILD);
            parent = parent_sprite.parent;
        }
    }

    /// Set `bits` on every descendant of `id`, leaving the data bits of `id`
    /// itself alone.
    pub fn mark_children_as_dirty(&mut self, id: SpriteId, bits: DirtyState) {
        if !self.tracks_changes() {
            return;
        }
        let subtree = self.descendants(id);
        if subtree.len() <= 1 {
            return;
        }
        for sprite_id in &subtree[1..] {
            if let Some(sprite) = self.sprites.get_mut(sprite_id) {
                sprite.dirty.or(bits);
                if !sprite.children.is_empty() {
                    sprite.dirty.or(DirtyState::CHILD);
                }
            }
        }
        self.mark_as_dirty(id, DirtyState::CHILD);
    }

    /// Remove dirty bits that the sprite can never serialise, then return
    /// its field bits
    pub(crate) fn pending_fields(&mut self, id: SpriteId) -> DirtyState {
        let Some(sprite) = self.sprites.get_mut(&id) else {
            return DirtyState::EMPTY;
        };
        let mut valid = sprite.all_fields();
        valid.or(DirtyState::CHILD);
        sprite.dirty = sprite.dirty.intersection(valid);
        if sprite.parent.is_none() {
            sprite.dirty.remove(DirtyState::PARENT);
        }
        sprite.dirty.fields()
    }

    /// Apply `update` to the base attributes. When it reports a change the
    /// sprite is marked with `bits`.
    pub(crate) fn update_attributes(
        &mut self,
        id: SpriteId,
        bits: DirtyState,
        update: impl FnOnce(&mut SpriteAttributes) -> bool,
    ) {
        let Some(sprite) = self.sprites.get_mut(&id) else {
            return;
        };
        if !update(&mut sprite.attributes) {
            return;
        }
        let affects_transform = bits.has(
            DirtyState::POSITION | DirtyState::SCALE | DirtyState::ROTATION | DirtyState::CENTER | DirtyState::SIZE,
        );
        if affects_transform {
            self.invalidate_subtree(id);
        }
        self.mark_as_dirty(id, bits);
    }

    /// Apply `update` to the subtype body, which returns the bits it changed
    pub(crate) fn update_body(
        &mut self,
        id: SpriteId,
        expected: SpriteKind,
        update: impl FnOnce(&mut SpriteBody) -> DirtyState,
    ) -> Result<(), SpriteError> {
        let Some(sprite) = self.sprites.get_mut(&id) else {
            return Err(SpriteError::SpriteNotFound { sprite_id: id });
        };
        let actual = sprite.body.kind();
        if actual != expected {
            return Err(SpriteError::WrongKind {
                sprite_id: id,
                expected,
                actual,
            });
        }
        let bits = update(&mut sprite.body);
        if !bits.is_clear() {
            self.mark_as_dirty(id, bits);
        }
        Ok(())
    }

    /// Drop cached global transforms of `id` and everything below it
    pub(crate) fn invalidate_subtree(&mut self, id: SpriteId) {
        if let Some(sprite) = self.sprites.get(&id) {
            sprite.invalidate_transform();
        }
        for sprite_id in self.descendants(id) {
            if let Some(sprite) = self.sprites.get(&sprite_id) {
                sprite.global_transform.set(None);
            }
        }
    }

    /// Parent's global transform times the local one.
    ///
    /// Walks up to the nearest ancestor with a cached transform, then caches
    /// every transform on the way back down.
    pub fn global_transform(&self, id: SpriteId) -> Option<Mat4> {
        let mut uncached = Vec::new();
        let mut transform = Mat4::IDENTITY;
        let mut current = Some(id);
        while let Some(current_id) = current {
            let sprite = self.sprites.get(&current_id)?;
            if let Some(cached) = sprite.global_transform.get() {
                transform = cached;
                break;
            }
            uncached.push(sprite);
            current = sprite.parent;
        }
        for sprite in uncached.into_iter().rev() {
            transform = transform * sprite.transform();
            sprite.global_transform.set(Some(transform));
        }
        Some(transform)
    }

    pub fn local_to_global(&self, id: SpriteId, point: Vec3) -> Option<Vec3> {
        Some(self.global_transform(id)?.transform_point3(point))
    }

    /// `None` when the sprite is missing or its transform cannot be
    /// inverted, e.g. a zero scale
    pub fn global_to_local(&self, id: SpriteId, point: Vec3) -> Option<Vec3> {
        let transform = self.global_transform(id)?;
        if transform.determinant().abs() <= f32::EPSILON {
            return None;
        }
        Some(transform.inverse().transform_point3(point))
    }

    pub fn contains_point(&self, id: SpriteId, point: Vec3) -> bool {
        let Some(sprite) = self.sprites.get(&id) else {
            return false;
        };
        match self.global_to_local(id, point) {
            Some(local) => sprite.contains_local(local),
            None => false,
        }
    }

    /// Children of `id` back to front. A `draw_sorted` parent orders them by
    /// z level, ties keeping insertion order.
    pub fn draw_order(&self, id: SpriteId) -> Vec<SpriteId> {
        let Some(sprite) = self.sprites.get(&id) else {
            return Vec::new();
        };
        let mut children = sprite.children.clone();
        if sprite.attributes.draw_sorted {
            children.sort_by(|a, b| {
                let za = self.sprites.get(a).map_or(0.0, |s| s.attributes.z_level);
                let zb = self.sprites.get(b).map_or(0.0, |s| s.attributes.z_level);
                za.total_cmp(&zb)
            });
        }
        children
    }

    /// Front-most visible, enabled sprite under `point`
    pub fn get_hit(&self, point: Vec3) -> Option<SpriteId> {
        self.hit_below(SpriteId::ROOT, point)
    }

    fn hit_below(&self, id: SpriteId, point: Vec3) -> Option<SpriteId> {
        let sprite = self.sprites.get(&id)?;
        if !sprite.attributes.visible {
            return None;
        }
        for child in self.draw_order(id).into_iter().rev() {
            if let Some(hit) = self.hit_below(child, point) {
                return Some(hit);
            }
        }
        if id != SpriteId::ROOT && sprite.attributes.enabled && self.contains_point(id, point) {
            return Some(id);
        }
        None
    }

    /// Subtree roots destroyed since the last call
    pub fn take_destroyed(&mut self) -> Vec<SpriteId> {
        std::mem::take(&mut self.destroyed)
    }

    /// Sprites detached since the last call
    pub fn take_detached(&mut self) -> Vec<SpriteId> {
        std::mem::take(&mut self.detached)
    }

    /// Flag every sprite the root cannot reach as fully dirty, so that a
    /// client which joined while it was detached gets all of it once it is
    /// reattached. Returns how many sprites were flagged.
    pub fn mark_unreachable_dirty(&mut self) -> usize {
        if !self.tracks_changes() {
            return 0;
        }
        let reachable: HashSet<SpriteId> = self.descendants(SpriteId::ROOT).into_iter().collect();
        let mut marked = 0;
        for sprite in self.sprites.values_mut() {
            if reachable.contains(&sprite.id()) {
                continue;
            }
            let mut bits = sprite.all_fields();
            if !sprite.children.is_empty() {
                bits.or(DirtyState::CHILD);
            }
            sprite.dirty.or(bits);
            marked += 1;
        }
        marked
    }

    /// Make sure `id` exists with the given kind, creating or converting it.
    /// Used by the reading side, which learns about sprites from the wire.
    pub(crate) fn ensure_sprite(&mut self, id: SpriteId, kind: SpriteKind) -> Result<(), SpriteError> {
        match self.sprites.get(&id).map(|sprite| sprite.kind()) {
            None => {
                self.create(id, kind)?;
            }
            Some(existing) if existing != kind => {
                warn!("Sprite {id} changed type from {existing} to {kind}, replacing its body");
                self.replace_body(id, kind);
            }
            Some(_) => {}
        }
        Ok(())
    }
}
