use std::{
    net::SocketAddr,
    thread,
    time::{Duration, Instant},
};

use tableau_client::{transport::tcp::Socket as ClientSocket, ClientConfig, ClientState, EngineClient};
use tableau_server::{transport::tcp::Socket as ServerSocket, EngineServer, ServerConfig};
use tableau_shared::{SpriteId, SpriteKind, Vec3};
use tableau_test::{assert_mirrors, init_logger, mirror_differences, RecordingApp};

const DEADLINE: Duration = Duration::from_secs(10);

fn pump_until(
    server: &mut EngineServer,
    app: &mut RecordingApp,
    client: &mut EngineClient,
    mut done: impl FnMut(&EngineServer, &EngineClient) -> bool,
) -> bool {
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        server.update(app);
        client.update();
        if done(server, client) {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    false
}

#[test]
fn client_syncs_over_loopback_tcp() {
    init_logger();
    let socket = ServerSocket::bind("127.0.0.1:0".parse::<SocketAddr>().unwrap()).unwrap();
    let address = socket.local_addr();

    let mut server = EngineServer::new(ServerConfig::default()).unwrap();
    server.listen(socket).unwrap();
    let mut app = RecordingApp::default();

    let panel = server
        .world_mut()
        .create_sprite(SpriteKind::Sprite, SpriteId::ROOT)
        .unwrap();
    let label = server.world_mut().create_sprite(SpriteKind::Text, panel).unwrap();
    server
        .world_mut()
        .sprite_mut(label)
        .unwrap()
        .set_position(Vec3::new(4.0, 8.0, 0.0))
        .set_text("over the wire")
        .unwrap();

    let config = ClientConfig {
        server_addr: address,
        world_request_interval: Duration::from_millis(100),
        ..ClientConfig::default()
    };
    let mut client = EngineClient::new(config).unwrap();
    client
        .connect(ClientSocket::new(address, Duration::from_millis(100)))
        .unwrap();

    let synced = pump_until(&mut server, &mut app, &mut client, |server, client| {
        client.state() == ClientState::Synced
            && mirror_differences(server.world().tree(), client.world().tree()).is_empty()
    });
    assert!(synced, "client never synced over tcp");
    assert_mirrors(server.world().tree(), client.world().tree());

    server
        .world_mut()
        .sprite_mut(panel)
        .unwrap()
        .set_position(Vec3::new(-20.0, 0.0, 0.0));
    let moved = pump_until(&mut server, &mut app, &mut client, |_, client| {
        client
            .world()
            .sprite(panel)
            .is_some_and(|sprite| sprite.position() == Vec3::new(-20.0, 0.0, 0.0))
    });
    assert!(moved, "delta never reached the client");
    assert_mirrors(server.world().tree(), client.world().tree());
}
