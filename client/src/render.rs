use tableau_shared::{Color, Mat4, SpriteId, SpriteKind, SpriteTree, Text, Vec3};

use crate::{
    media::{VideoFrame, VideoService},
    service::{DecodedImage, ImageService},
};

/// What a sprite shows besides its transform and tint
#[derive(Clone, Copy, Debug)]
pub enum DrawContent<'a> {
    /// An opaque rectangle of the sprite's size
    Fill,
    Text(&'a Text),
    /// `None` while the image is loading or failed to load
    Image(Option<&'a DecodedImage>),
    Web { url: &'a str },
    /// `None` until the decoder produced a frame
    Video(Option<&'a VideoFrame>),
}

/// One sprite, ready to draw
#[derive(Clone, Copy, Debug)]
pub struct DrawCommand<'a> {
    pub sprite: SpriteId,
    pub kind: SpriteKind,
    /// Local to world, including every ancestor
    pub transform: Mat4,
    pub size: Vec3,
    pub color: Color,
    pub opacity: f32,
    pub content: DrawContent<'a>,
}

/// The windowing toolkit side of the client. Receives the visible sprites
/// back to front once per frame.
pub trait Renderer {
    fn begin_frame(&mut self) {}

    fn draw(&mut self, command: &DrawCommand<'_>);

    fn end_frame(&mut self) {}
}

pub(crate) fn draw_tree(
    tree: &SpriteTree,
    images: &ImageService,
    videos: &VideoService,
    renderer: &mut dyn Renderer,
) {
    renderer.begin_frame();
    draw_subtree(tree, SpriteId::ROOT, images, videos, renderer);
    renderer.end_frame();
}

fn draw_subtree(
    tree: &SpriteTree,
    id: SpriteId,
    images: &ImageService,
    videos: &VideoService,
    renderer: &mut dyn Renderer,
) {
    let Some(sprite) = tree.sprite(id) else {
        return;
    };
    if !sprite.visible() {
        return;
    }

    let content = match sprite.kind() {
        SpriteKind::Sprite if sprite.transparent() || id == SpriteId::ROOT => None,
        SpriteKind::Sprite => Some(DrawContent::Fill),
        SpriteKind::Text => sprite.as_text().map(DrawContent::Text),
        SpriteKind::Image => Some(DrawContent::Image(images.image(id).map(|image| image.as_ref()))),
        SpriteKind::Web => sprite.as_web().map(|web| DrawContent::Web { url: web.url() }),
        SpriteKind::Video => Some(DrawContent::Video(videos.frame(id))),
    };
    if let (Some(content), Some(transform)) = (content, tree.global_transform(id)) {
        renderer.draw(&DrawCommand {
            sprite: id,
            kind: sprite.kind(),
            transform,
            size: sprite.size(),
            color: sprite.color(),
            opacity: sprite.opacity(),
            content,
        });
    }

    for child in tree.draw_order(id) {
        draw_subtree(tree, child, images, videos, renderer);
    }
}
