use std::cell::Cell;

use crate::{
    math::{Color, EulerRot, Mat4, Vec3},
    sprite::{
        attribute::SpriteAttributes,
        body::{Image, SpriteBody, SpriteKind, Text, Video, Web},
        dirty::DirtyState,
    },
    types::SpriteId,
};

/// One node of a [`SpriteTree`](crate::SpriteTree).
///
/// The node owns the ids of its children; `parent` is a back-reference
/// resolved through the tree. Both transforms are cached and rebuilt lazily
/// after anything that feeds them changes.
pub struct Sprite {
    id: SpriteId,
    pub(crate) parent: Option<SpriteId>,
    pub(crate) children: Vec<SpriteId>,
    pub(crate) attributes: SpriteAttributes,
    pub(crate) body: SpriteBody,
    pub(crate) dirty: DirtyState,
    transform: Cell<Option<Mat4>>,
    pub(crate) global_transform: Cell<Option<Mat4>>,
}

impl Sprite {
    pub(crate) fn new(id: SpriteId, kind: SpriteKind) -> Self {
        let body = SpriteBody::new(kind);
        let mut dirty = DirtyState::BASE_FIELDS;
        dirty.or(body.dirty_slots());
        Self {
            id,
            parent: None,
            children: Vec::new(),
            attributes: SpriteAttributes::default(),
            body,
            dirty,
            transform: Cell::new(None),
            global_transform: Cell::new(None),
        }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    pub fn kind(&self) -> SpriteKind {
        self.body.kind()
    }

    pub fn parent(&self) -> Option<SpriteId> {
        self.parent
    }

    pub fn children(&self) -> &[SpriteId] {
        &self.children
    }

    pub fn attributes(&self) -> &SpriteAttributes {
        &self.attributes
    }

    pub fn body(&self) -> &SpriteBody {
        &self.body
    }

    pub fn position(&self) -> Vec3 {
        self.attributes.position
    }

    pub fn scale(&self) -> Vec3 {
        self.attributes.scale
    }

    pub fn rotation(&self) -> Vec3 {
        self.attributes.rotation
    }

    pub fn center(&self) -> Vec3 {
        self.attributes.center
    }

    pub fn size(&self) -> Vec3 {
        self.attributes.size
    }

    pub fn width(&self) -> f32 {
        self.attributes.size.x
    }

    pub fn height(&self) -> f32 {
        self.attributes.size.y
    }

    pub fn color(&self) -> Color {
        self.attributes.color
    }

    pub fn opacity(&self) -> f32 {
        self.attributes.opacity
    }

    pub fn visible(&self) -> bool {
        self.attributes.visible
    }

    pub fn enabled(&self) -> bool {
        self.attributes.enabled
    }

    pub fn transparent(&self) -> bool {
        self.attributes.transparent
    }

    pub fn z_level(&self) -> f32 {
        self.attributes.z_level
    }

    pub fn draw_sorted(&self) -> bool {
        self.attributes.draw_sorted
    }

    pub fn as_text(&self) -> Option<&Text> {
        self.body.as_text()
    }

    pub fn as_image(&self) -> Option<&Image> {
        self.body.as_image()
    }

    pub fn as_web(&self) -> Option<&Web> {
        self.body.as_web()
    }

    pub fn as_video(&self) -> Option<&Video> {
        self.body.as_video()
    }

    pub fn dirty(&self) -> DirtyState {
        self.dirty
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_clear()
    }

    /// Every field bit this sprite can ever serialise
    pub(crate) fn all_fields(&self) -> DirtyState {
        let mut fields = DirtyState::BASE_FIELDS;
        fields.or(self.body.dirty_slots());
        fields
    }

    /// Local transform: translate to position, rotate, scale, then shift so
    /// that `center` (a fraction of size) sits on the origin.
    pub fn transform(&self) -> Mat4 {
        if let Some(transform) = self.transform.get() {
            return transform;
        }
        let attributes = &self.attributes;
        let rotation = attributes.rotation;
        let transform = Mat4::from_translation(attributes.position)
            * Mat4::from_euler(
                EulerRot::XYZ,
                rotation.x.to_radians(),
                rotation.y.to_radians(),
                rotation.z.to_radians(),
            )
            * Mat4::from_scale(attributes.scale)
            * Mat4::from_translation(-attributes.center * attributes.size);
        self.transform.set(Some(transform));
        transform
    }

    pub(crate) fn invalidate_transform(&self) {
        self.transform.set(None);
        self.global_transform.set(None);
    }

    /// Whether a point in local coordinates falls inside the sprite's
    /// rectangle
    pub fn contains_local(&self, point: Vec3) -> bool {
        point.x >= 0.0 && point.x <= self.width() && point.y >= 0.0 && point.y <= self.height()
    }
}
