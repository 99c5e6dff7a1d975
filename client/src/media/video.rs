use std::collections::HashMap;

use crossbeam_channel::{Receiver, Sender};
use log::{debug, warn};

use tableau_shared::{PlaybackCommand, SpriteId, SpriteTree, Video, VideoStatus};

use super::frame_slot::{FrameSlot, VideoFrame};

/// Playback settings the server asked for
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Playback {
    pub command: PlaybackCommand,
    pub looping: bool,
    pub muted: bool,
    pub volume: f32,
}

impl Playback {
    fn of(video: &Video) -> Self {
        Self {
            command: video.command(),
            looping: video.looping(),
            muted: video.muted(),
            volume: video.volume(),
        }
    }
}

/// Lets a decoder running on any thread report playback status
#[derive(Clone)]
pub struct StatusReporter {
    sprite: SpriteId,
    sender: Sender<(SpriteId, VideoStatus)>,
}

impl StatusReporter {
    pub fn report(&self, status: VideoStatus) {
        // the service is gone, nobody is listening
        let _ = self.sender.send((self.sprite, status));
    }
}

/// A video decoder. Decoded frames go into the [`FrameSlot`] handed to
/// `open`; status changes go through the [`StatusReporter`].
pub trait VideoBackend {
    fn open(&mut self, sprite: SpriteId, source: &str, frames: FrameSlot, status: StatusReporter);

    fn control(&mut self, sprite: SpriteId, playback: Playback);

    fn close(&mut self, sprite: SpriteId);
}

/// Decodes nothing. Every video sprite reports `Error`.
pub struct NullVideoBackend;

impl VideoBackend for NullVideoBackend {
    fn open(&mut self, sprite: SpriteId, source: &str, _frames: FrameSlot, status: StatusReporter) {
        warn!("No video backend to play {source} for sprite {sprite}");
        status.report(VideoStatus::Error);
    }

    fn control(&mut self, _sprite: SpriteId, _playback: Playback) {}

    fn close(&mut self, _sprite: SpriteId) {}
}

struct Player {
    source: String,
    playback: Playback,
    frames: FrameSlot,
    current: Option<VideoFrame>,
    status: VideoStatus,
}

/// Drives a [`VideoBackend`] from the video sprites of the mirror
pub struct VideoService {
    backend: Box<dyn VideoBackend>,
    players: HashMap<SpriteId, Player>,
    status_sender: Sender<(SpriteId, VideoStatus)>,
    status_receiver: Receiver<(SpriteId, VideoStatus)>,
}

impl VideoService {
    pub fn new(backend: Box<dyn VideoBackend>) -> Self {
        let (status_sender, status_receiver) = crossbeam_channel::unbounded();
        Self {
            backend,
            players: HashMap::new(),
            status_sender,
            status_receiver,
        }
    }

    /// Latest decoded frame of `id`
    pub fn frame(&self, id: SpriteId) -> Option<&VideoFrame> {
        self.players.get(&id)?.current.as_ref()
    }

    pub fn status(&self, id: SpriteId) -> Option<VideoStatus> {
        self.players.get(&id).map(|player| player.status)
    }

    /// Open, reconfigure or close players for the sprites that changed
    pub fn sync(&mut self, tree: &SpriteTree, changed: &[SpriteId]) {
        for id in changed {
            let Some(video) = tree.sprite(*id).and_then(|sprite| sprite.as_video()) else {
                self.close(*id);
                continue;
            };
            let playback = Playback::of(video);

            let reopen = self
                .players
                .get(id)
                .map_or(true, |player| player.source != video.source());
            if reopen {
                self.close(*id);
                if video.source().is_empty() {
                    continue;
                }
                let frames = FrameSlot::new();
                let reporter = StatusReporter {
                    sprite: *id,
                    sender: self.status_sender.clone(),
                };
                debug!("Opening video {} for sprite {id}", video.source());
                self.backend.open(*id, video.source(), frames.clone(), reporter);
                self.backend.control(*id, playback);
                self.players.insert(
                    *id,
                    Player {
                        source: video.source().to_string(),
                        playback,
                        frames,
                        current: None,
                        status: VideoStatus::Stopped,
                    },
                );
                continue;
            }

            if let Some(player) = self.players.get_mut(id) {
                if player.playback != playback {
                    player.playback = playback;
                    self.backend.control(*id, playback);
                }
            }
        }
    }

    /// Pick up new frames and return the status changes to report upstream
    pub fn poll(&mut self) -> Vec<(SpriteId, VideoStatus)> {
        for player in self.players.values_mut() {
            if let Some(frame) = player.frames.take() {
                player.current = Some(frame);
            }
        }

        let mut changes = Vec::new();
        for (id, status) in self.status_receiver.try_iter() {
            let Some(player) = self.players.get_mut(&id) else {
                continue;
            };
            if player.status != status {
                player.status = status;
                changes.push((id, status));
            }
        }
        changes
    }

    pub fn clear(&mut self) {
        let ids: Vec<SpriteId> = self.players.keys().copied().collect();
        for id in ids {
            self.close(id);
        }
    }

    fn close(&mut self, id: SpriteId) {
        if self.players.remove(&id).is_some() {
            self.backend.close(id);
        }
    }
}
