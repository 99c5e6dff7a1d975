use std::{
    thread,
    time::{Duration, Instant},
};

use log::{debug, info};

use tableau_shared::{
    blob::{
        frame::{write_commands, write_deleted_sprites, write_header},
        register_all_blob_types, BlobRegistry, BlobTypes,
    },
    write_all_sprites, write_detached_sprites, write_dirty_sprites, Command, DataBuffer,
};

use super::{server_config::ServerConfig, state::ServerState, world, world::ServerWorld};
use crate::{
    app::{ServerApp, UpdateParams},
    io::Io,
    transport::Socket,
    TableauServerError,
};

/// Owns the authoritative world and drives the tick:
/// application update, frame build, send, then drain whatever clients sent.
pub struct EngineServer {
    config: ServerConfig,
    registry: BlobRegistry<ServerWorld>,
    types: BlobTypes,
    world: ServerWorld,
    state: ServerState,
    io: Io,
    frame: DataBuffer,
    tick: u64,
    started: Option<Instant>,
    last_tick: Option<Instant>,
}

impl EngineServer {
    pub fn new(config: ServerConfig) -> Result<Self, TableauServerError> {
        let mut registry = BlobRegistry::new();
        let types = register_all_blob_types(&mut registry, world::handler_for)?;
        registry.lock();

        let io = Io::new(&config.compression)?;

        Ok(Self {
            config,
            registry,
            types,
            world: ServerWorld::new(),
            state: ServerState::Running,
            io,
            frame: DataBuffer::new(),
            tick: 0,
            started: None,
            last_tick: None,
        })
    }

    /// Attach a transport. Until then frames are built and dropped.
    pub fn listen(&mut self, socket: impl Into<Box<dyn Socket>>) -> Result<(), TableauServerError> {
        if self.io.is_loaded() {
            return Err(TableauServerError::AlreadyListening);
        }
        let boxed_socket: Box<dyn Socket> = socket.into();
        let (packet_sender, packet_receiver) = boxed_socket.listen()?;
        self.io.load(packet_sender, packet_receiver)
    }

    pub fn is_listening(&self) -> bool {
        self.io.is_loaded()
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> ServerState {
        self.state
    }

    pub fn blob_types(&self) -> &BlobTypes {
        &self.types
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    pub fn world(&self) -> &ServerWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ServerWorld {
        &mut self.world
    }

    /// Force a full dump on the next tick, as if a client had asked
    pub fn request_world(&mut self) {
        self.state = ServerState::SendWorld;
    }

    /// Call `setup`, then tick at `tick_interval` forever
    pub fn run(&mut self, app: &mut impl ServerApp) {
        app.setup(&mut self.world);
        info!(
            "Server running, tick every {:?}",
            self.config.tick_interval
        );
        loop {
            let tick_start = Instant::now();
            self.update(app);
            if let Some(rest) = self.config.tick_interval.checked_sub(tick_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    /// One tick
    pub fn update(&mut self, app: &mut impl ServerApp) {
        let now = Instant::now();
        let started = *self.started.get_or_insert(now);
        let delta = self
            .last_tick
            .map(|last| now.duration_since(last))
            .unwrap_or(Duration::ZERO);
        self.last_tick = Some(now);

        let events = self.world.take_events();
        app.update(
            &mut self.world,
            events,
            UpdateParams {
                delta,
                elapsed: now.duration_since(started),
                tick: self.tick,
            },
        );

        self.build_frame();
        self.io.send_packet(self.frame.as_bytes());
        self.receive();

        self.tick += 1;
    }

    /// The frame built by the last tick
    pub fn last_frame(&self) -> &[u8] {
        self.frame.as_bytes()
    }

    fn build_frame(&mut self) {
        self.frame.clear();
        write_header(&mut self.frame, self.types.header);

        let tree = self.world.tree_mut();
        match self.state {
            ServerState::SendWorld => {
                write_commands(&mut self.frame, self.types.command, &[Command::ServerSendWorld]);
                // clients start from an empty mirror, so nothing needs undoing
                tree.take_destroyed();
                tree.take_detached();
                let unreachable = tree.mark_unreachable_dirty();
                if unreachable > 0 {
                    debug!("{unreachable} detached sprites wait for reattachment");
                }
                let frames = write_all_sprites(tree, &self.types, &mut self.frame);
                info!(
                    "Sent world: {frames} sprites in {} bytes",
                    self.frame.len()
                );
                self.state = ServerState::Running;
            }
            ServerState::Running => {
                let destroyed = tree.take_destroyed();
                if !destroyed.is_empty() {
                    write_deleted_sprites(&mut self.frame, self.types.delete_sprites, &destroyed);
                }
                write_detached_sprites(tree, &self.types, &mut self.frame);
                let frames = write_dirty_sprites(
                    tree,
                    &self.types,
                    &mut self.frame,
                    self.config.max_delta_bytes,
                );
                if frames > 0 {
                    debug!("Tick {}: {frames} sprite frames", self.tick);
                }
            }
        }
    }

    fn receive(&mut self) {
        while let Some(payload) = self.io.recv_packet() {
            let mut buffer = DataBuffer::from(payload);
            self.registry.dispatch_all(&mut self.world, &mut buffer);
        }
        if self.world.take_world_request() {
            self.state = ServerState::SendWorld;
        }
    }
}
