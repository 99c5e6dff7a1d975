mod engine_server;
pub use engine_server::EngineServer;

mod server_config;
pub use server_config::ServerConfig;

mod state;
pub use state::ServerState;

mod world;
pub use world::ServerWorld;
