use tableau_server::{
    EngineServer, ServerApp, ServerConfig, ServerEvent, ServerWorld, UpdateParams,
};

use crate::local_socket::LocalHub;

/// Keeps every event the engine hands to the application
#[derive(Default)]
pub struct RecordingApp {
    pub events: Vec<ServerEvent>,
    pub updates: u64,
}

impl ServerApp for RecordingApp {
    fn update(&mut self, _world: &mut ServerWorld, events: Vec<ServerEvent>, _params: UpdateParams) {
        self.events.extend(events);
        self.updates += 1;
    }
}

/// An engine server listening on a [`LocalHub`]
pub struct TestServer {
    pub engine: EngineServer,
    pub app: RecordingApp,
}

impl TestServer {
    pub fn new(hub: &LocalHub) -> Self {
        Self::with_config(hub, ServerConfig::default())
    }

    pub fn with_config(hub: &LocalHub, config: ServerConfig) -> Self {
        let mut engine = EngineServer::new(config).expect("server should build");
        engine
            .listen(hub.server_socket())
            .expect("local socket should listen");
        Self {
            engine,
            app: RecordingApp::default(),
        }
    }

    pub fn tick(&mut self) {
        self.engine.update(&mut self.app);
    }

    pub fn world(&self) -> &ServerWorld {
        self.engine.world()
    }

    pub fn world_mut(&mut self) -> &mut ServerWorld {
        self.engine.world_mut()
    }

    pub fn take_events(&mut self) -> Vec<ServerEvent> {
        std::mem::take(&mut self.app.events)
    }
}
