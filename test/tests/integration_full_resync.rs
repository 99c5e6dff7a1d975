/// A client that joins late, or loses its link, rebuilds the whole graph
/// from a single world dump.
use tableau_client::ClientState;
use tableau_server::ServerState;
use tableau_shared::{Alignment, Color, SpriteId, SpriteKind, Vec3, IMG_CACHE_F};
use tableau_test::{
    assert_mirrors, init_logger, sync_clients, tick_and_exchange, tick_and_exchange_n_times,
    LocalHub, TestClient, TestServer,
};

fn populate(server: &mut TestServer) {
    let world = server.world_mut();
    let panel = world.create_sprite(SpriteKind::Sprite, SpriteId::ROOT).unwrap();
    world
        .sprite_mut(panel)
        .unwrap()
        .set_position(Vec3::new(40.0, 60.0, 0.0))
        .set_size(400.0, 300.0)
        .set_color(Color::new(0.2, 0.3, 0.4))
        .set_transparent(false)
        .set_z_level(2.0);

    let title = world.create_sprite(SpriteKind::Text, panel).unwrap();
    world
        .sprite_mut(title)
        .unwrap()
        .set_text("Welcome")
        .unwrap()
        .set_font("Serif", 48.0)
        .unwrap()
        .set_alignment(Alignment::Center)
        .unwrap()
        .set_opacity(0.8);

    let photo = world.create_sprite(SpriteKind::Image, panel).unwrap();
    world
        .sprite_mut(photo)
        .unwrap()
        .set_image_file("lobby.png", IMG_CACHE_F)
        .unwrap()
        .set_rotation(Vec3::new(0.0, 0.0, 15.0))
        .set_scale(Vec3::new(0.5, 0.5, 1.0));

    let clip = world.create_sprite(SpriteKind::Video, SpriteId::ROOT).unwrap();
    world
        .sprite_mut(clip)
        .unwrap()
        .set_video_source("loop.mp4")
        .unwrap()
        .set_looping(true)
        .unwrap()
        .play()
        .unwrap()
        .hide();
}

#[test]
fn late_joiner_receives_whole_graph() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    populate(&mut server);
    // nobody is listening while the graph is sent and cleaned
    for _ in 0..3 {
        server.tick();
    }
    assert!(!server.world().tree().sprite(SpriteId::ROOT).unwrap().is_dirty());

    let mut client = TestClient::new(&hub);
    assert_eq!(client.state(), ClientState::Blank);
    sync_clients(&mut server, &mut [&mut client], 5);
    // the player opened on the synced tick reports upstream
    tick_and_exchange(&mut server, &mut [&mut client]);

    assert_eq!(client.tree().len(), server.world().tree().len());
    assert_mirrors(server.world().tree(), client.tree());
}

#[test]
fn send_world_lasts_one_tick() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    populate(&mut server);
    server.tick();

    let mut client = TestClient::new(&hub);
    client.tick();
    server.tick();
    assert_eq!(server.engine.state(), ServerState::SendWorld);

    server.tick();
    assert_eq!(server.engine.state(), ServerState::Running);
    let dump_length = server.engine.last_frame().len();

    server.tick();
    // back to deltas: nothing changed, heartbeat only
    assert_eq!(server.engine.last_frame().len(), 2);
    assert!(dump_length > 2);
}

#[test]
fn second_client_does_not_disturb_first() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut first = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut first], 5);
    populate(&mut server);
    tick_and_exchange(&mut server, &mut [&mut first]);

    let mut second = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut first, &mut second], 5);
    tick_and_exchange(&mut server, &mut [&mut first, &mut second]);

    assert_mirrors(server.world().tree(), first.tree());
    assert_mirrors(server.world().tree(), second.tree());
}

#[test]
fn reconnect_rebuilds_stale_mirror() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut client], 5);
    populate(&mut server);
    tick_and_exchange(&mut server, &mut [&mut client]);

    client.handle.disconnect();
    let extra = server
        .world_mut()
        .create_sprite(SpriteKind::Text, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(extra)
        .unwrap()
        .set_text("missed")
        .unwrap();
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 2);
    assert!(client.tree().sprite(extra).is_none());

    client.handle.reconnect();
    client.tick();
    assert_eq!(client.state(), ClientState::Blank);
    sync_clients(&mut server, &mut [&mut client], 5);
    tick_and_exchange(&mut server, &mut [&mut client]);
    assert_mirrors(server.world().tree(), client.tree());
}

#[test]
fn subtree_detached_during_dump_arrives_on_reattach() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let world = server.world_mut();
    let panel = world.create_sprite(SpriteKind::Sprite, SpriteId::ROOT).unwrap();
    world
        .sprite_mut(panel)
        .unwrap()
        .set_position(Vec3::new(40.0, 60.0, 0.0))
        .set_size(200.0, 100.0);
    let label = world.create_sprite(SpriteKind::Text, panel).unwrap();
    world
        .sprite_mut(label)
        .unwrap()
        .set_text("Hidden away")
        .unwrap();
    server.tick();
    server.world_mut().tree_mut().remove_parent(panel).unwrap();
    server.tick();

    let mut client = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut client], 5);
    assert!(client.tree().sprite(panel).is_none());

    server
        .world_mut()
        .tree_mut()
        .add_child(SpriteId::ROOT, panel)
        .unwrap();
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 3);

    assert_eq!(
        client.tree().sprite(panel).unwrap().position(),
        Vec3::new(40.0, 60.0, 0.0)
    );
    assert_eq!(
        client.tree().sprite(label).unwrap().as_text().unwrap().text(),
        "Hidden away"
    );
    assert_mirrors(server.world().tree(), client.tree());
}
