use crate::{
    math::{Color, Vec3},
    sprite::{
        body::{Alignment, PlaybackCommand, SpriteBody, SpriteKind, Text, Video, VideoStatus},
        dirty::DirtyState,
        error::SpriteError,
        tree::SpriteTree,
    },
    touch::{KeyEvent, TouchEvent},
    types::SpriteId,
};

/// Mutable handle to one sprite. Every setter that changes a value marks
/// the matching dirty bit so the change reaches clients on the next frame.
pub struct SpriteMut<'t> {
    tree: &'t mut SpriteTree,
    id: SpriteId,
}

impl<'t> SpriteMut<'t> {
    pub(crate) fn new(tree: &'t mut SpriteTree, id: SpriteId) -> Self {
        Self { tree, id }
    }

    pub fn id(&self) -> SpriteId {
        self.id
    }

    // Base attributes

    pub fn set_position(&mut self, position: Vec3) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::POSITION, |attributes| {
                replace(&mut attributes.position, position)
            });
        self
    }

    pub fn move_by(&mut self, delta: Vec3) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::POSITION, |attributes| {
                let moved = attributes.position + delta;
                replace(&mut attributes.position, moved)
            });
        self
    }

    pub fn set_scale(&mut self, scale: Vec3) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::SCALE, |attributes| {
                replace(&mut attributes.scale, scale)
            });
        self
    }

    /// Rotation in degrees around X, Y and Z
    pub fn set_rotation(&mut self, rotation: Vec3) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::ROTATION, |attributes| {
                replace(&mut attributes.rotation, rotation)
            });
        self
    }

    /// Pivot as a fraction of size, `(0.5, 0.5, 0.0)` is the middle
    pub fn set_center(&mut self, center: Vec3) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::CENTER, |attributes| {
                replace(&mut attributes.center, center)
            });
        self
    }

    pub fn set_size(&mut self, width: f32, height: f32) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::SIZE, |attributes| {
                let depth = attributes.size.z;
                replace(&mut attributes.size, Vec3::new(width, height, depth))
            });
        self
    }

    pub fn set_depth(&mut self, depth: f32) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::SIZE, |attributes| {
                let size = attributes.size;
                replace(&mut attributes.size, Vec3::new(size.x, size.y, depth))
            });
        self
    }

    /// Tints the sprite. On a Text sprite this sets the text colour instead.
    pub fn set_color(&mut self, color: Color) -> &mut Self {
        let is_text = self
            .tree
            .sprite(self.id)
            .is_some_and(|sprite| sprite.kind() == SpriteKind::Text);
        if is_text {
            let _ = self.tree.update_body(self.id, SpriteKind::Text, |body| {
                body.as_text_mut()
                    .map_or(DirtyState::EMPTY, |text| text.set_text_color(color))
            });
            return self;
        }
        self.tree
            .update_attributes(self.id, DirtyState::COLOR, |attributes| {
                replace(&mut attributes.color, color)
            });
        self
    }

    pub fn set_opacity(&mut self, opacity: f32) -> &mut Self {
        let opacity = opacity.clamp(0.0, 1.0);
        self.tree
            .update_attributes(self.id, DirtyState::OPACITY, |attributes| {
                replace(&mut attributes.opacity, opacity)
            });
        self
    }

    pub fn show(&mut self) -> &mut Self {
        self.set_visible(true)
    }

    pub fn hide(&mut self) -> &mut Self {
        self.set_visible(false)
    }

    pub fn set_visible(&mut self, visible: bool) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::FLAGS, |attributes| {
                replace(&mut attributes.visible, visible)
            });
        self
    }

    /// Enabled sprites take part in hit testing
    pub fn enable(&mut self, enabled: bool) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::FLAGS, |attributes| {
                replace(&mut attributes.enabled, enabled)
            });
        self
    }

    pub fn set_transparent(&mut self, transparent: bool) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::FLAGS, |attributes| {
                replace(&mut attributes.transparent, transparent)
            });
        self
    }

    pub fn set_z_level(&mut self, z_level: f32) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::SORTING, |attributes| {
                replace(&mut attributes.z_level, z_level)
            });
        self
    }

    /// Draw and hit-test children in z-level order instead of insertion order
    pub fn set_draw_sorted(&mut self, draw_sorted: bool) -> &mut Self {
        self.tree
            .update_attributes(self.id, DirtyState::SORTING, |attributes| {
                replace(&mut attributes.draw_sorted, draw_sorted)
            });
        self
    }

    // Hierarchy

    pub fn add_child(&mut self, child: SpriteId) -> Result<&mut Self, SpriteError> {
        self.tree.add_child(self.id, child)?;
        Ok(self)
    }

    pub fn remove_parent(&mut self) -> Result<&mut Self, SpriteError> {
        self.tree.remove_parent(self.id)?;
        Ok(self)
    }

    pub fn clear_children(&mut self) -> Result<usize, SpriteError> {
        self.tree.clear_children(self.id)
    }

    pub fn mark_as_dirty(&mut self, bits: DirtyState) -> &mut Self {
        self.tree.mark_as_dirty(self.id, bits);
        self
    }

    /// Consumes the handle; the sprite and its subtree are gone afterwards
    pub fn destroy(self) -> Result<usize, SpriteError> {
        self.tree.destroy(self.id)
    }

    // Text

    pub fn set_text(&mut self, value: &str) -> Result<&mut Self, SpriteError> {
        self.update_text(|text| text.set_text(value))
    }

    pub fn set_font(&mut self, font: &str, font_size: f32) -> Result<&mut Self, SpriteError> {
        self.update_text(|text| text.set_font(font, font_size))
    }

    pub fn set_leading(&mut self, leading: f32) -> Result<&mut Self, SpriteError> {
        self.update_text(|text| text.set_leading(leading))
    }

    pub fn set_alignment(&mut self, alignment: Alignment) -> Result<&mut Self, SpriteError> {
        self.update_text(|text| text.set_alignment(alignment))
    }

    /// Wrap width and height; values under one pixel mean unlimited
    pub fn set_resize_limit(&mut self, width: f32, height: f32) -> Result<&mut Self, SpriteError> {
        self.update_text(|text| text.set_resize_limit(width, height))
    }

    fn update_text(
        &mut self,
        update: impl FnOnce(&mut Text) -> DirtyState,
    ) -> Result<&mut Self, SpriteError> {
        self.tree.update_body(self.id, SpriteKind::Text, |body| {
            body.as_text_mut().map_or(DirtyState::EMPTY, update)
        })?;
        Ok(self)
    }

    // Image

    /// Point the image at a new file. A sprite without a size takes the
    /// file's natural size when the tree has an
    /// [`ImageSizer`](crate::ImageSizer).
    pub fn set_image_file(&mut self, filename: &str, flags: u32) -> Result<&mut Self, SpriteError> {
        let mut changed = false;
        self.tree.update_body(self.id, SpriteKind::Image, |body| {
            let bits = body
                .as_image_mut()
                .map_or(DirtyState::EMPTY, |image| image.set_filename(filename, flags));
            changed = !bits.is_clear();
            bits
        })?;
        if changed {
            self.adopt_image_size(filename);
        }
        Ok(self)
    }

    fn adopt_image_size(&mut self, filename: &str) {
        let r#unsized = self
            .tree
            .sprite(self.id)
            .is_some_and(|sprite| sprite.width() <= 0.0 && sprite.height() <= 0.0);
        if !r#unsized {
            return;
        }
        if let Some((width, height)) = self.tree.image_dimensions(filename) {
            self.set_size(width as f32, height as f32);
        }
    }

    // Web

    pub fn set_url(&mut self, url: &str) -> Result<&mut Self, SpriteError> {
        self.update_web(|body| {
            body.as_web_mut()
                .map_or(DirtyState::EMPTY, |web| web.set_url(url))
        })
    }

    /// Queue a touch for the browser. `event.point` is in sprite-local
    /// coordinates.
    pub fn send_web_touch(&mut self, event: TouchEvent) -> Result<&mut Self, SpriteError> {
        self.update_web(|body| {
            body.as_web_mut()
                .map_or(DirtyState::EMPTY, |web| web.push_touch_event(event))
        })
    }

    pub fn send_key(&mut self, event: KeyEvent) -> Result<&mut Self, SpriteError> {
        self.update_web(|body| {
            body.as_web_mut()
                .map_or(DirtyState::EMPTY, |web| web.push_key_event(event))
        })
    }

    /// Drain the events the browser has not consumed yet
    pub fn take_web_events(&mut self) -> Result<(Vec<TouchEvent>, Vec<KeyEvent>), SpriteError> {
        let mut taken = (Vec::new(), Vec::new());
        self.tree.update_body(self.id, SpriteKind::Web, |body| {
            if let Some(web) = body.as_web_mut() {
                taken = (web.take_touch_events(), web.take_key_events());
            }
            DirtyState::EMPTY
        })?;
        Ok(taken)
    }

    fn update_web(
        &mut self,
        update: impl FnOnce(&mut SpriteBody) -> DirtyState,
    ) -> Result<&mut Self, SpriteError> {
        self.tree.update_body(self.id, SpriteKind::Web, update)?;
        Ok(self)
    }

    // Video

    pub fn set_video_source(&mut self, source: &str) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_source(source))
    }

    pub fn play(&mut self) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_command(PlaybackCommand::Play))
    }

    pub fn pause(&mut self) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_command(PlaybackCommand::Pause))
    }

    pub fn stop(&mut self) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_command(PlaybackCommand::Stop))
    }

    pub fn set_looping(&mut self, looping: bool) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_looping(looping))
    }

    pub fn set_muted(&mut self, muted: bool) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_muted(muted))
    }

    pub fn set_volume(&mut self, volume: f32) -> Result<&mut Self, SpriteError> {
        self.update_video(|video| video.set_volume(volume))
    }

    /// Record the status the local decoder reports. Status only travels
    /// upstream, so this never marks the sprite dirty.
    pub fn set_video_status(&mut self, status: VideoStatus) -> Result<&mut Self, SpriteError> {
        self.tree.update_body(self.id, SpriteKind::Video, |body| {
            if let Some(video) = body.as_video_mut() {
                video.set_status(status);
            }
            DirtyState::EMPTY
        })?;
        Ok(self)
    }

    fn update_video(
        &mut self,
        update: impl FnOnce(&mut Video) -> DirtyState,
    ) -> Result<&mut Self, SpriteError> {
        self.tree.update_body(self.id, SpriteKind::Video, |body| {
            body.as_video_mut().map_or(DirtyState::EMPTY, update)
        })?;
        Ok(self)
    }
}

/// Store `value` and report whether it differed
fn replace<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
