use std::{thread, time::Instant};

use log::{debug, info};

use tableau_shared::{
    blob::{
        frame::{write_commands, write_touches},
        register_all_blob_types, BlobRegistry, BlobTypes,
    },
    write_video_status, Command, DataBuffer, TouchEvent,
};

use super::{client_config::ClientConfig, state::ClientState, world, world::ClientWorld};
use crate::{
    io::Io,
    media::{NullVideoBackend, VideoBackend, VideoService},
    render::{draw_tree, Renderer},
    service::{default_decoder, ImageDecoder, ImageService},
    transport::Socket,
    TableauClientError,
};

/// Mirrors the server's sprite graph and draws it.
///
/// Each tick pulls every pending server frame into the mirror, updates the
/// media services, then sends whatever the client has to say upstream:
/// a world request while blank, touches, and video status changes.
pub struct EngineClient {
    config: ClientConfig,
    registry: BlobRegistry<ClientWorld>,
    types: BlobTypes,
    world: ClientWorld,
    io: Io,
    images: ImageService,
    videos: VideoService,
    pending_touches: Vec<TouchEvent>,
    last_world_request: Option<Instant>,
    outgoing: DataBuffer,
}

impl EngineClient {
    pub fn new(config: ClientConfig) -> Result<Self, TableauClientError> {
        Self::with_services(config, default_decoder(), Box::new(NullVideoBackend))
    }

    pub fn with_services(
        config: ClientConfig,
        image_decoder: Box<dyn ImageDecoder>,
        video_backend: Box<dyn VideoBackend>,
    ) -> Result<Self, TableauClientError> {
        let mut registry = BlobRegistry::new();
        let types = register_all_blob_types(&mut registry, world::handler_for)?;
        registry.lock();

        let io = Io::new(&config.compression)?;

        Ok(Self {
            config,
            registry,
            types,
            world: ClientWorld::new(),
            io,
            images: ImageService::new(image_decoder),
            videos: VideoService::new(video_backend),
            pending_touches: Vec::new(),
            last_world_request: None,
            outgoing: DataBuffer::new(),
        })
    }

    pub fn connect(&mut self, socket: impl Into<Box<dyn Socket>>) -> Result<(), TableauClientError> {
        if self.io.is_loaded() {
            return Err(TableauClientError::AlreadyConnected);
        }
        let boxed_socket: Box<dyn Socket> = socket.into();
        let (packet_sender, packet_receiver) = boxed_socket.connect();
        self.io.load(packet_sender, packet_receiver)
    }

    pub fn is_connected(&self) -> bool {
        self.io.is_loaded()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn state(&self) -> ClientState {
        self.world.state()
    }

    pub fn blob_types(&self) -> &BlobTypes {
        &self.types
    }

    pub fn world(&self) -> &ClientWorld {
        &self.world
    }

    pub fn world_mut(&mut self) -> &mut ClientWorld {
        &mut self.world
    }

    pub fn images(&self) -> &ImageService {
        &self.images
    }

    pub fn videos(&self) -> &VideoService {
        &self.videos
    }

    /// Queue a touch, in world coordinates, for the server
    pub fn inject_touch(&mut self, touch: TouchEvent) {
        self.pending_touches.push(touch);
    }

    /// Tick and draw at `tick_interval` forever
    pub fn run(&mut self, renderer: &mut dyn Renderer) {
        info!("Client running, tick every {:?}", self.config.tick_interval);
        loop {
            let tick_start = Instant::now();
            self.update();
            self.draw(renderer);
            if let Some(rest) = self.config.tick_interval.checked_sub(tick_start.elapsed()) {
                thread::sleep(rest);
            }
        }
    }

    /// One tick, without drawing
    pub fn update(&mut self) {
        if self.io.take_reconnected() && self.world.state() == ClientState::Synced {
            info!("Reconnected, requesting a fresh world");
            self.world.reset();
            self.last_world_request = None;
        }

        self.receive();
        self.update_media();
        self.send();
    }

    pub fn draw(&self, renderer: &mut dyn Renderer) {
        draw_tree(self.world.tree(), &self.images, &self.videos, renderer);
    }

    fn receive(&mut self) {
        while let Some(payload) = self.io.recv_packet() {
            let mut buffer = DataBuffer::from(payload);
            self.registry.dispatch_all(&mut self.world, &mut buffer);
        }
    }

    fn update_media(&mut self) {
        let changed = self.world.take_changed();
        if !changed.is_empty() {
            self.images.sync(self.world.tree(), &changed);
            self.videos.sync(self.world.tree(), &changed);
            // players kept across a rebuild do not report again
            for id in changed {
                if let Some(status) = self.videos.status(id) {
                    self.world.record_video_status(id, status);
                }
            }
        }
        self.images.poll();
    }

    fn send(&mut self) {
        self.outgoing.clear();

        if self.world.state() == ClientState::Blank && self.world_request_due() {
            debug!("Requesting world");
            write_commands(
                &mut self.outgoing,
                self.types.command,
                &[Command::ClientRequestWorld],
            );
            self.last_world_request = Some(Instant::now());
        }

        if !self.pending_touches.is_empty() {
            let touches = std::mem::take(&mut self.pending_touches);
            for chunk in touches.chunks(usize::from(u16::MAX)) {
                write_touches(&mut self.outgoing, self.types.touch, chunk);
            }
        }

        for (id, status) in self.videos.poll() {
            self.world.record_video_status(id, status);
            write_video_status(&mut self.outgoing, &self.types, id, status);
        }

        if !self.outgoing.is_empty() {
            self.io.send_packet(self.outgoing.as_bytes());
        }
    }

    fn world_request_due(&self) -> bool {
        self.last_world_request.map_or(true, |last| {
            last.elapsed() >= self.config.world_request_interval
        })
    }
}
