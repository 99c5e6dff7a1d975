use tableau_serde::{DataBuffer, Serde, SerdeErr};

use crate::{
    sprite::{dirty::DirtyState, writer::AttributeWriter},
    types::AttributeId,
};

pub(crate) const SOURCE_DIRTY: DirtyState = DirtyState::INTERNAL_A;
pub(crate) const PLAYBACK_DIRTY: DirtyState = DirtyState::INTERNAL_B;

pub const SOURCE_ATT: AttributeId = 80;
pub const PLAYBACK_ATT: AttributeId = 81;
/// Sent upstream by the client that owns the decoder
pub const STATUS_ATT: AttributeId = 90;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum PlaybackCommand {
    Play,
    Pause,
    #[default]
    Stop,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum VideoStatus {
    #[default]
    Stopped,
    Playing,
    Paused,
    Ended,
    Error,
}

impl Serde for PlaybackCommand {
    fn ser(&self, buffer: &mut DataBuffer) {
        let value: u8 = match self {
            PlaybackCommand::Play => 0,
            PlaybackCommand::Pause => 1,
            PlaybackCommand::Stop => 2,
        };
        value.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        match u8::de(buffer)? {
            0 => Ok(PlaybackCommand::Play),
            1 => Ok(PlaybackCommand::Pause),
            2 => Ok(PlaybackCommand::Stop),
            value => Err(SerdeErr::InvalidDiscriminant {
                type_name: "PlaybackCommand",
                value: u32::from(value),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

impl Serde for VideoStatus {
    fn ser(&self, buffer: &mut DataBuffer) {
        let value: u8 = match self {
            VideoStatus::Stopped => 0,
            VideoStatus::Playing => 1,
            VideoStatus::Paused => 2,
            VideoStatus::Ended => 3,
            VideoStatus::Error => 4,
        };
        value.ser(buffer);
    }

    fn de(buffer: &mut DataBuffer) -> Result<Self, SerdeErr> {
        match u8::de(buffer)? {
            0 => Ok(VideoStatus::Stopped),
            1 => Ok(VideoStatus::Playing),
            2 => Ok(VideoStatus::Paused),
            3 => Ok(VideoStatus::Ended),
            4 => Ok(VideoStatus::Error),
            value => Err(SerdeErr::InvalidDiscriminant {
                type_name: "VideoStatus",
                value: u32::from(value),
            }),
        }
    }

    fn byte_length(&self) -> usize {
        1
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Video {
    source: String,
    command: PlaybackCommand,
    looping: bool,
    muted: bool,
    volume: f32,
    status: VideoStatus,
}

impl Default for Video {
    fn default() -> Self {
        Self {
            source: String::new(),
            command: PlaybackCommand::Stop,
            looping: false,
            muted: false,
            volume: 1.0,
            status: VideoStatus::Stopped,
        }
    }
}

impl Video {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn command(&self) -> PlaybackCommand {
        self.command
    }

    pub fn looping(&self) -> bool {
        self.looping
    }

    pub fn muted(&self) -> bool {
        self.muted
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    /// Last status reported by a client decoder
    pub fn status(&self) -> VideoStatus {
        self.status
    }

    pub(crate) fn set_source(&mut self, source: &str) -> DirtyState {
        if self.source == source {
            return DirtyState::EMPTY;
        }
        self.source = source.to_string();
        SOURCE_DIRTY
    }

    pub(crate) fn set_command(&mut self, command: PlaybackCommand) -> DirtyState {
        if self.command == command {
            return DirtyState::EMPTY;
        }
        self.command = command;
        PLAYBACK_DIRTY
    }

    pub(crate) fn set_looping(&mut self, looping: bool) -> DirtyState {
        if self.looping == looping {
            return DirtyState::EMPTY;
        }
        self.looping = looping;
        PLAYBACK_DIRTY
    }

    pub(crate) fn set_muted(&mut self, muted: bool) -> DirtyState {
        if self.muted == muted {
            return DirtyState::EMPTY;
        }
        self.muted = muted;
        PLAYBACK_DIRTY
    }

    pub(crate) fn set_volume(&mut self, volume: f32) -> DirtyState {
        let volume = volume.clamp(0.0, 1.0);
        if self.volume == volume {
            return DirtyState::EMPTY;
        }
        self.volume = volume;
        PLAYBACK_DIRTY
    }

    pub(crate) fn set_status(&mut self, status: VideoStatus) {
        self.status = status;
    }

    pub(crate) fn dirty_slots() -> DirtyState {
        SOURCE_DIRTY | PLAYBACK_DIRTY
    }

    pub(crate) fn write_attributes(&self, writer: &mut AttributeWriter) {
        writer.write_group(SOURCE_DIRTY, SOURCE_ATT, |buffer| {
            buffer.add(&self.source);
        });
        writer.write_group(PLAYBACK_DIRTY, PLAYBACK_ATT, |buffer| {
            buffer.add(&self.command);
            buffer.add(&self.looping);
            buffer.add(&self.muted);
            buffer.add(&self.volume);
        });
    }

    pub(crate) fn read_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        match attribute_id {
            SOURCE_ATT => {
                self.source = String::de(buffer)?;
            }
            PLAYBACK_ATT => {
                self.command = PlaybackCommand::de(buffer)?;
                self.looping = bool::de(buffer)?;
                self.muted = bool::de(buffer)?;
                self.volume = f32::de(buffer)?;
            }
            _ => return Ok(false),
        }
        Ok(true)
    }

    pub(crate) fn read_client_attribute(
        &mut self,
        attribute_id: AttributeId,
        buffer: &mut DataBuffer,
    ) -> Result<bool, SerdeErr> {
        if attribute_id != STATUS_ATT {
            return Ok(false);
        }
        self.status = VideoStatus::de(buffer)?;
        Ok(true)
    }
}
