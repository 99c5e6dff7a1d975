use log::{debug, info, warn};

use tableau_shared::{
    blob::{
        frame::{read_commands, read_deleted_sprites, read_header, read_touches},
        BlobError, BlobHandler, BlobKind,
    },
    read_sprite_frame, Command, DataBuffer, HostType, Sprite, SpriteError, SpriteId, SpriteKind,
    SpriteMut, SpriteTree, VideoStatus,
};

use super::state::ClientState;

/// The mirrored sprite graph. Only the server changes its shape or its
/// attributes; the client reads it to draw.
pub struct ClientWorld {
    tree: SpriteTree,
    state: ClientState,
    // sprites written, created or removed since the media services last looked
    changed: Vec<SpriteId>,
}

impl Default for ClientWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientWorld {
    pub fn new() -> Self {
        Self {
            tree: SpriteTree::new(HostType::Client),
            state: ClientState::Blank,
            changed: Vec::new(),
        }
    }

    pub fn state(&self) -> ClientState {
        self.state
    }

    pub fn tree(&self) -> &SpriteTree {
        &self.tree
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.tree.sprite(id)
    }

    /// Local access for the render side, e.g. a browser draining web events
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<SpriteMut<'_>> {
        self.tree.sprite_mut(id)
    }

    /// Mirror the status the local decoder reports for a video sprite
    pub(crate) fn record_video_status(&mut self, id: SpriteId, status: VideoStatus) {
        let Some(mut sprite) = self.tree.sprite_mut(id) else {
            return;
        };
        if let Err(error) = sprite.set_video_status(status) {
            debug!("Could not record status of sprite {id}: {error}");
        }
    }

    /// Forget the mirror and wait for a new world
    pub(crate) fn reset(&mut self) {
        self.forget_all();
        self.state = ClientState::Blank;
    }

    pub(crate) fn take_changed(&mut self) -> Vec<SpriteId> {
        std::mem::take(&mut self.changed)
    }

    fn forget_all(&mut self) {
        self.changed.extend(self.tree.sprite_ids().copied());
        self.tree.clear();
    }

    fn receive_commands(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        for command in read_commands(buffer)? {
            match command {
                Command::ServerSendWorld => {
                    info!("Receiving world");
                    self.forget_all();
                    self.state = ClientState::Synced;
                }
                Command::ClientRequestWorld => {
                    warn!("Ignoring {command:?} sent by the server");
                }
            }
        }
        Ok(())
    }

    fn receive_deleted_sprites(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        if self.state == ClientState::Blank {
            return Err(BlobError::Discarded {
                reason: "waiting for world",
            });
        }
        for id in read_deleted_sprites(buffer)? {
            let subtree = self.tree.descendants(id);
            match self.tree.destroy(id) {
                Ok(_) => self.changed.extend(subtree),
                // created and destroyed between two server frames
                Err(SpriteError::SpriteNotFound { .. }) => {
                    debug!("Server deleted sprite {id} this client never saw");
                }
                Err(error) => warn!("Could not delete sprite {id}: {error}"),
            }
        }
        Ok(())
    }

    fn receive_touches(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        let touches = read_touches(buffer)?;
        warn!("Ignoring {} touches sent by the server", touches.len());
        Ok(())
    }

    fn receive_sprite(&mut self, kind: SpriteKind, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        if self.state == ClientState::Blank {
            return Err(BlobError::Discarded {
                reason: "waiting for world",
            });
        }
        let id = read_sprite_frame(&mut self.tree, kind, buffer)?;
        self.changed.push(id);
        Ok(())
    }
}

/// Handler for every inbound blob kind, passed to `register_all_blob_types`
pub(crate) fn handler_for(kind: BlobKind) -> BlobHandler<ClientWorld> {
    match kind {
        BlobKind::Header => Box::new(|_world: &mut ClientWorld, buffer: &mut DataBuffer| {
            read_header(buffer)
        }),
        BlobKind::Command => Box::new(|world: &mut ClientWorld, buffer: &mut DataBuffer| {
            world.receive_commands(buffer)
        }),
        BlobKind::DeleteSprites => Box::new(|world: &mut ClientWorld, buffer: &mut DataBuffer| {
            world.receive_deleted_sprites(buffer)
        }),
        BlobKind::Touch => Box::new(|world: &mut ClientWorld, buffer: &mut DataBuffer| {
            world.receive_touches(buffer)
        }),
        BlobKind::Sprite(sprite_kind) => {
            Box::new(move |world: &mut ClientWorld, buffer: &mut DataBuffer| {
                world.receive_sprite(sprite_kind, buffer)
            })
        }
    }
}
