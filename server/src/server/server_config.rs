use std::{default::Default, net::SocketAddr, time::Duration};

use tableau_shared::CompressionConfig;

/// Contains Config properties which will be used by the Server
#[derive(Clone)]
pub struct ServerConfig {
    /// Address the transport binds to
    pub listen_addr: SocketAddr,
    /// Target period of one update/send/receive tick
    pub tick_interval: Duration,
    /// Upper bound on the bytes of sprite deltas sent per tick. Groups that
    /// do not fit stay dirty for the next tick. `None` sends everything.
    /// Full world dumps ignore this.
    pub max_delta_bytes: Option<usize>,
    /// Compression applied to whole transport messages
    pub compression: CompressionConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], 7777)),
            tick_interval: Duration::from_millis(16),
            max_delta_bytes: Some(256 * 1024),
            compression: CompressionConfig::default(),
        }
    }
}
