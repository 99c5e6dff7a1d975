mod frame_slot;
mod video;

pub use frame_slot::{FrameSlot, VideoFrame};
pub use video::{NullVideoBackend, Playback, StatusReporter, VideoBackend, VideoService};
