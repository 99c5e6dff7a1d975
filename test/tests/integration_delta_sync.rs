/// Incremental sync: only what changed crosses the wire, and an idle tick is
/// a bare heartbeat.
use tableau_shared::{Color, ImageSizer, SpriteId, SpriteKind, Vec3, TERMINATOR};
use tableau_test::{assert_mirrors, init_logger, sync_clients, LocalHub, TestClient, TestServer};

fn synced_pair() -> (TestServer, TestClient) {
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut client], 5);
    (server, client)
}

#[test]
fn new_text_sprite_reaches_client_once() {
    init_logger();
    let (mut server, mut client) = synced_pair();
    let types = server.engine.blob_types().clone();

    let id = server
        .world_mut()
        .create_sprite(SpriteKind::Text, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(id)
        .unwrap()
        .set_text("Hi")
        .unwrap()
        .set_color(Color::WHITE);

    server.tick();
    let frames = client.handle.peek();
    assert_eq!(frames.len(), 1);
    let frame = &frames[0];
    assert_eq!(&frame[..2], &[types.header, TERMINATOR]);
    assert_eq!(frame[2], types.sprite(SpriteKind::Text));
    assert!(frame.windows(2).any(|window| window == b"Hi"));

    client.tick();
    let mirrored = client.tree().sprite(id).unwrap();
    assert_eq!(mirrored.kind(), SpriteKind::Text);
    assert_eq!(mirrored.as_text().unwrap().text(), "Hi");
    assert_eq!(mirrored.as_text().unwrap().text_color(), Color::WHITE);
    assert_mirrors(server.world().tree(), client.tree());

    // no mutation: heartbeat only
    server.tick();
    assert_eq!(client.handle.peek(), vec![vec![types.header, TERMINATOR]]);
    client.tick();
    assert_eq!(client.tree().sprite(id).unwrap().as_text().unwrap().text(), "Hi");
}

#[test]
fn moving_a_parent_moves_children_on_client() {
    init_logger();
    let (mut server, mut client) = synced_pair();

    let world = server.world_mut();
    let parent = world.create_sprite(SpriteKind::Sprite, SpriteId::ROOT).unwrap();
    let child = world.create_sprite(SpriteKind::Sprite, parent).unwrap();
    world
        .sprite_mut(child)
        .unwrap()
        .set_position(Vec3::new(5.0, 0.0, 0.0));
    server.tick();
    client.tick();

    server
        .world_mut()
        .sprite_mut(parent)
        .unwrap()
        .set_position(Vec3::new(100.0, 50.0, 0.0));
    server.tick();
    client.tick();

    let global = client
        .tree()
        .local_to_global(child, Vec3::ZERO)
        .unwrap();
    assert!((global - Vec3::new(105.0, 50.0, 0.0)).length() < 1e-4);
    assert_mirrors(server.world().tree(), client.tree());
}

#[test]
fn detach_and_reattach_follow_on_client() {
    init_logger();
    let (mut server, mut client) = synced_pair();

    let a = server
        .world_mut()
        .create_sprite(SpriteKind::Sprite, SpriteId::ROOT)
        .unwrap();
    let b = server.world_mut().create_sprite(SpriteKind::Image, a).unwrap();
    server.tick();
    client.tick();
    assert_eq!(client.tree().sprite(b).unwrap().parent(), Some(a));

    server.world_mut().tree_mut().remove_parent(b).unwrap();
    server.tick();
    client.tick();
    assert_eq!(client.tree().sprite(b).unwrap().parent(), None);
    assert!(client.tree().sprite(a).unwrap().children().is_empty());

    server.world_mut().tree_mut().add_child(SpriteId::ROOT, b).unwrap();
    server.tick();
    client.tick();
    assert_eq!(client.tree().sprite(b).unwrap().parent(), Some(SpriteId::ROOT));
    assert_mirrors(server.world().tree(), client.tree());
}

#[test]
fn byte_budget_spreads_large_updates_over_ticks() {
    init_logger();
    let hub = LocalHub::new();
    let config = tableau_server::ServerConfig {
        max_delta_bytes: Some(512),
        ..Default::default()
    };
    let mut server = TestServer::with_config(&hub, config);
    let mut client = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut client], 5);

    for index in 0..50 {
        let id = server
            .world_mut()
            .create_sprite(SpriteKind::Text, SpriteId::ROOT)
            .unwrap();
        server
            .world_mut()
            .sprite_mut(id)
            .unwrap()
            .set_text(&format!("label number {index}"))
            .unwrap();
    }

    let mut ticks = 0;
    while server.world().tree().sprite(SpriteId::ROOT).unwrap().is_dirty() {
        server.tick();
        for frame in client.handle.peek() {
            assert!(frame.len() <= 512, "frame of {} bytes", frame.len());
        }
        client.tick();
        ticks += 1;
        assert!(ticks < 100, "deltas never drained");
    }
    assert!(ticks > 1);
    assert_mirrors(server.world().tree(), client.tree());
}

struct PosterSizer;

impl ImageSizer for PosterSizer {
    fn dimensions(&self, filename: &str) -> Option<(u32, u32)> {
        (filename == "poster.png").then_some((320, 240))
    }
}

#[test]
fn image_size_from_server_reaches_client() {
    init_logger();
    let (mut server, mut client) = synced_pair();
    server
        .world_mut()
        .tree_mut()
        .set_image_sizer(Box::new(PosterSizer));

    let poster = server
        .world_mut()
        .create_sprite(SpriteKind::Image, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(poster)
        .unwrap()
        .set_image_file("poster.png", 0)
        .unwrap();
    server.tick();
    client.tick();

    let mirrored = client.tree().sprite(poster).unwrap();
    assert_eq!(mirrored.width(), 320.0);
    assert_eq!(mirrored.height(), 240.0);
    assert_mirrors(server.world().tree(), client.tree());
}
