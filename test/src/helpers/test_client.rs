use tableau_client::{
    media::VideoBackend,
    service::ImageDecoder,
    ClientConfig, ClientState, ClientWorld, EngineClient,
};
use tableau_shared::SpriteTree;

use crate::local_socket::{LocalClientHandle, LocalHub};

/// An engine client connected through a [`LocalHub`]
pub struct TestClient {
    pub engine: EngineClient,
    pub handle: LocalClientHandle,
}

impl TestClient {
    pub fn new(hub: &LocalHub) -> Self {
        let engine = EngineClient::new(ClientConfig::default()).expect("client should build");
        Self::connect(hub, engine)
    }

    pub fn with_services(
        hub: &LocalHub,
        image_decoder: Box<dyn ImageDecoder>,
        video_backend: Box<dyn VideoBackend>,
    ) -> Self {
        let engine = EngineClient::with_services(ClientConfig::default(), image_decoder, video_backend)
            .expect("client should build");
        Self::connect(hub, engine)
    }

    fn connect(hub: &LocalHub, mut engine: EngineClient) -> Self {
        let (socket, handle) = hub.client_socket();
        engine.connect(socket).expect("local socket should connect");
        Self { engine, handle }
    }

    pub fn tick(&mut self) {
        self.engine.update();
    }

    pub fn state(&self) -> ClientState {
        self.engine.state()
    }

    pub fn world(&self) -> &ClientWorld {
        self.engine.world()
    }

    pub fn tree(&self) -> &SpriteTree {
        self.engine.world().tree()
    }
}
