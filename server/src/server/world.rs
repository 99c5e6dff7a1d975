use std::collections::HashMap;

use log::{debug, warn};

use tableau_shared::{
    blob::{
        frame::{read_commands, read_deleted_sprites, read_header, read_touches},
        BlobError, BlobHandler, BlobKind,
    },
    read_client_sprite_frame, Command, DataBuffer, HostType, Sprite, SpriteError, SpriteId,
    SpriteIdGenerator, SpriteKind, SpriteMut, SpriteTree, TouchEvent, TouchPhase,
};

use crate::{
    events::{ServerEvent, TouchInfo},
    image_size::install_default_sizer,
};

/// The authoritative sprite graph, plus everything clients sent since the
/// last tick
pub struct ServerWorld {
    tree: SpriteTree,
    id_generator: SpriteIdGenerator,
    events: Vec<ServerEvent>,
    world_requested: bool,
    // finger id -> sprite the finger went down on
    captured_fingers: HashMap<i32, SpriteId>,
}

impl Default for ServerWorld {
    fn default() -> Self {
        Self::new()
    }
}

impl ServerWorld {
    pub fn new() -> Self {
        let mut tree = SpriteTree::new(HostType::Server);
        install_default_sizer(&mut tree);
        Self {
            tree,
            id_generator: SpriteIdGenerator::new(),
            events: Vec::new(),
            world_requested: false,
            captured_fingers: HashMap::new(),
        }
    }

    pub fn root(&self) -> SpriteId {
        SpriteId::ROOT
    }

    pub fn tree(&self) -> &SpriteTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut SpriteTree {
        &mut self.tree
    }

    /// Create a sprite with a fresh id under `parent`
    pub fn create_sprite(&mut self, kind: SpriteKind, parent: SpriteId) -> Result<SpriteId, SpriteError> {
        if !self.tree.contains(parent) {
            return Err(SpriteError::SpriteNotFound { sprite_id: parent });
        }
        let id = self.id_generator.generate();
        self.tree.create(id, kind)?;
        self.tree.add_child(parent, id)?;
        Ok(id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.tree.sprite(id)
    }

    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<SpriteMut<'_>> {
        self.tree.sprite_mut(id)
    }

    /// Destroy `id` and its subtree; clients hear about it on the next tick
    pub fn destroy(&mut self, id: SpriteId) -> Result<usize, SpriteError> {
        let removed = self.tree.destroy(id)?;
        let tree = &self.tree;
        self.captured_fingers
            .retain(|_, sprite_id| tree.contains(*sprite_id));
        Ok(removed)
    }

    pub(crate) fn take_events(&mut self) -> Vec<ServerEvent> {
        std::mem::take(&mut self.events)
    }

    pub(crate) fn take_world_request(&mut self) -> bool {
        std::mem::replace(&mut self.world_requested, false)
    }

    fn receive_commands(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        for command in read_commands(buffer)? {
            match command {
                Command::ClientRequestWorld => {
                    debug!("Client requested the world");
                    self.world_requested = true;
                    self.events.push(ServerEvent::WorldRequested);
                }
                Command::ServerSendWorld => {
                    warn!("Ignoring {command:?} sent by a client");
                }
            }
        }
        Ok(())
    }

    fn receive_deleted_sprites(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        let ids = read_deleted_sprites(buffer)?;
        warn!("Ignoring deletion of {} sprites requested by a client", ids.len());
        Ok(())
    }

    fn receive_touches(&mut self, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        for touch in read_touches(buffer)? {
            self.route_touch(touch);
        }
        Ok(())
    }

    /// A finger belongs to the sprite it went down on until it lifts
    fn route_touch(&mut self, touch: TouchEvent) {
        let captured = match touch.phase {
            TouchPhase::Added => {
                let hit = self.tree.get_hit(touch.point);
                match hit {
                    Some(id) => self.captured_fingers.insert(touch.finger_id, id),
                    None => self.captured_fingers.remove(&touch.finger_id),
                };
                hit
            }
            TouchPhase::Moved => self.captured_fingers.get(&touch.finger_id).copied(),
            TouchPhase::Removed => self.captured_fingers.remove(&touch.finger_id),
        };
        let sprite = captured.filter(|id| self.tree.contains(*id));
        let local_point = sprite.and_then(|id| self.tree.global_to_local(id, touch.point));

        if let (Some(id), Some(point)) = (sprite, local_point) {
            let is_web = self
                .tree
                .sprite(id)
                .is_some_and(|target| target.kind() == SpriteKind::Web);
            if is_web {
                if let Some(mut web) = self.tree.sprite_mut(id) {
                    if let Err(error) =
                        web.send_web_touch(TouchEvent::new(touch.phase, touch.finger_id, point))
                    {
                        warn!("Could not forward touch to web sprite {id}: {error}");
                    }
                }
            }
        }

        self.events.push(ServerEvent::Touch(TouchInfo {
            phase: touch.phase,
            finger_id: touch.finger_id,
            world_point: touch.point,
            sprite,
            local_point,
        }));
    }

    fn receive_client_sprite(&mut self, kind: SpriteKind, buffer: &mut DataBuffer) -> Result<(), BlobError> {
        let id = read_client_sprite_frame(&mut self.tree, kind, buffer)?;
        if kind == SpriteKind::Video {
            if let Some(video) = self.tree.sprite(id).and_then(|sprite| sprite.as_video()) {
                self.events.push(ServerEvent::VideoStatus {
                    sprite: id,
                    status: video.status(),
                });
            }
        }
        Ok(())
    }
}

/// Handler for every inbound blob kind, passed to `register_all_blob_types`
pub(crate) fn handler_for(kind: BlobKind) -> BlobHandler<ServerWorld> {
    match kind {
        BlobKind::Header => Box::new(|_world: &mut ServerWorld, buffer: &mut DataBuffer| {
            read_header(buffer)
        }),
        BlobKind::Command => Box::new(|world: &mut ServerWorld, buffer: &mut DataBuffer| {
            world.receive_commands(buffer)
        }),
        BlobKind::DeleteSprites => Box::new(|world: &mut ServerWorld, buffer: &mut DataBuffer| {
            world.receive_deleted_sprites(buffer)
        }),
        BlobKind::Touch => Box::new(|world: &mut ServerWorld, buffer: &mut DataBuffer| {
            world.receive_touches(buffer)
        }),
        BlobKind::Sprite(sprite_kind) => {
            Box::new(move |world: &mut ServerWorld, buffer: &mut DataBuffer| {
                world.receive_client_sprite(sprite_kind, buffer)
            })
        }
    }
}
