use std::{default::Default, net::SocketAddr, time::Duration};

use tableau_shared::CompressionConfig;

/// Contains Config properties which will be used by the Client
#[derive(Clone)]
pub struct ClientConfig {
    pub server_addr: SocketAddr,
    /// Target period of one receive/draw/send tick
    pub tick_interval: Duration,
    /// How often a blank client repeats its request for the world
    pub world_request_interval: Duration,
    /// Base delay between connection attempts; a random jitter of up to half
    /// of it is added
    pub reconnect_interval: Duration,
    /// Compression applied to whole transport messages
    pub compression: CompressionConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_addr: SocketAddr::from(([127, 0, 0, 1], 7777)),
            tick_interval: Duration::from_millis(16),
            world_request_interval: Duration::from_secs(1),
            reconnect_interval: Duration::from_secs(2),
            compression: CompressionConfig::default(),
        }
    }
}
