mod client_config;
pub use client_config::ClientConfig;

mod engine_client;
pub use engine_client::EngineClient;

mod state;
pub use state::ClientState;

mod world;
pub use world::ClientWorld;
