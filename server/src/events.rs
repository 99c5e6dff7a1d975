use tableau_shared::{SpriteId, TouchPhase, Vec3, VideoStatus};

/// A client touch after hit testing against the authoritative graph
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TouchInfo {
    pub phase: TouchPhase,
    pub finger_id: i32,
    pub world_point: Vec3,
    /// Sprite the finger went down on; later phases stay with it
    pub sprite: Option<SpriteId>,
    /// `world_point` in the sprite's local coordinates
    pub local_point: Option<Vec3>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum ServerEvent {
    /// A client asked for the full world; it is sent on the next tick
    WorldRequested,
    Touch(TouchInfo),
    /// A client decoder reported a new playback status
    VideoStatus { sprite: SpriteId, status: VideoStatus },
}
