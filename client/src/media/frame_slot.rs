use std::sync::Arc;

use parking_lot::Mutex;

/// One decoded picture, tightly packed RGBA8
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VideoFrame {
    pub width: u32,
    pub height: u32,
    pub rgba: Vec<u8>,
}

/// Latest-frame mailbox between a decoder thread and the main tick.
///
/// The decoder overwrites whatever the tick has not picked up yet; the lock
/// only guards the swap, never a copy.
#[derive(Clone, Default)]
pub struct FrameSlot {
    latest: Arc<Mutex<Option<VideoFrame>>>,
}

impl FrameSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish a frame. Returns true if an unread frame was replaced.
    pub fn put(&self, frame: VideoFrame) -> bool {
        let replaced = self.latest.lock().replace(frame);
        replaced.is_some()
    }

    pub fn take(&self) -> Option<VideoFrame> {
        self.latest.lock().take()
    }
}
