pub mod assertions;
pub mod test_client;
pub mod test_server;

pub use assertions::{assert_mirrors, mirror_differences};
pub use packet_exchange::{sync_clients, tick_and_exchange, tick_and_exchange_n_times};
pub use test_client::TestClient;
pub use test_server::{RecordingApp, TestServer};

/// Route `log` output to the test harness
pub fn init_logger() {
    let _ = env_logger::builder().is_test(true).try_init();
}
