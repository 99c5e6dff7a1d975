/// Input travels upstream: touches are hit-tested on the server, video
/// status is reported by the client's decoder.
use std::sync::Arc;

use tableau_client::{
    media::{FrameSlot, Playback, StatusReporter, VideoBackend},
    service::default_decoder,
};
use tableau_server::{ServerEvent, TouchInfo};
use tableau_shared::{SpriteId, SpriteKind, TouchEvent, TouchPhase, Vec3, VideoStatus};
use tableau_test::{
    init_logger, sync_clients, tick_and_exchange, tick_and_exchange_n_times, LocalHub, TestClient,
    TestServer,
};

fn button(server: &mut TestServer, kind: SpriteKind) -> SpriteId {
    let id = server
        .world_mut()
        .create_sprite(kind, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(id)
        .unwrap()
        .set_position(Vec3::new(100.0, 100.0, 0.0))
        .set_size(200.0, 80.0)
        .enable(true);
    id
}

fn touch_events(events: Vec<ServerEvent>) -> Vec<TouchInfo> {
    events
        .into_iter()
        .filter_map(|event| match event {
            ServerEvent::Touch(info) => Some(info),
            _ => None,
        })
        .collect()
}

#[test]
fn client_touch_is_hit_tested_on_server() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub);
    let target = button(&mut server, SpriteKind::Sprite);
    sync_clients(&mut server, &mut [&mut client], 5);
    server.take_events();

    client
        .engine
        .inject_touch(TouchEvent::new(TouchPhase::Added, 7, Vec3::new(150.0, 120.0, 0.0)));
    client
        .engine
        .inject_touch(TouchEvent::new(TouchPhase::Removed, 7, Vec3::new(900.0, 900.0, 0.0)));
    client.tick();
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 2);

    let touches = touch_events(server.take_events());
    assert_eq!(touches.len(), 2);
    assert_eq!(touches[0].phase, TouchPhase::Added);
    assert_eq!(touches[0].finger_id, 7);
    assert_eq!(touches[0].sprite, Some(target));
    let local = touches[0].local_point.unwrap();
    assert!((local - Vec3::new(50.0, 20.0, 0.0)).length() < 1e-4);
    // captured: lifted far outside, still reported to the same sprite
    assert_eq!(touches[1].sprite, Some(target));
}

#[test]
fn touch_on_empty_space_has_no_target() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut client], 5);
    server.take_events();

    client
        .engine
        .inject_touch(TouchEvent::new(TouchPhase::Added, 1, Vec3::new(5.0, 5.0, 0.0)));
    client.tick();
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 2);

    let touches = touch_events(server.take_events());
    assert_eq!(touches.len(), 1);
    assert_eq!(touches[0].sprite, None);
    assert_eq!(touches[0].local_point, None);
}

#[test]
fn web_touch_round_trips_to_client_browser_queue() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let mut client = TestClient::new(&hub);
    let page = button(&mut server, SpriteKind::Web);
    server
        .world_mut()
        .sprite_mut(page)
        .unwrap()
        .set_url("https://example.org/")
        .unwrap();
    sync_clients(&mut server, &mut [&mut client], 5);

    client
        .engine
        .inject_touch(TouchEvent::new(TouchPhase::Added, 2, Vec3::new(110.0, 130.0, 0.0)));
    client.tick();
    // server reads the touch, queues it on the web sprite, sends it back
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 2);

    let (touches, keys) = client
        .engine
        .world_mut()
        .sprite_mut(page)
        .unwrap()
        .take_web_events()
        .unwrap();
    assert!(keys.is_empty());
    assert_eq!(touches.len(), 1);
    assert!((touches[0].point - Vec3::new(10.0, 30.0, 0.0)).length() < 1e-4);

    // drained on the server once sent
    let web = server.world().sprite(page).unwrap().as_web().unwrap();
    assert!(web.pending_touch_events().is_empty());
}

struct ReportingBackend {
    reporters: Arc<parking_lot::Mutex<Vec<StatusReporter>>>,
}

impl VideoBackend for ReportingBackend {
    fn open(&mut self, _sprite: SpriteId, _source: &str, _frames: FrameSlot, status: StatusReporter) {
        status.report(VideoStatus::Playing);
        self.reporters.lock().push(status);
    }

    fn control(&mut self, _sprite: SpriteId, _playback: Playback) {}

    fn close(&mut self, _sprite: SpriteId) {}
}

#[test]
fn video_status_reaches_server() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let reporters = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut client = TestClient::with_services(
        &hub,
        default_decoder(),
        Box::new(ReportingBackend {
            reporters: reporters.clone(),
        }),
    );
    let clip = server
        .world_mut()
        .create_sprite(SpriteKind::Video, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(clip)
        .unwrap()
        .set_video_source("clip.mp4")
        .unwrap()
        .play()
        .unwrap();
    sync_clients(&mut server, &mut [&mut client], 5);
    server.take_events();

    // the synced client opened the player during its last tick
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 2);
    assert_eq!(reporters.lock().len(), 1);

    let statuses: Vec<ServerEvent> = server
        .take_events()
        .into_iter()
        .filter(|event| matches!(event, ServerEvent::VideoStatus { .. }))
        .collect();
    assert_eq!(
        statuses,
        vec![ServerEvent::VideoStatus {
            sprite: clip,
            status: VideoStatus::Playing
        }]
    );
    let video = server.world().sprite(clip).unwrap().as_video().unwrap();
    assert_eq!(video.status(), VideoStatus::Playing);
    assert_eq!(mirrored_status(&client, clip), VideoStatus::Playing);

    reporters.lock()[0].report(VideoStatus::Ended);
    // client polls it, server drains it, app sees it
    tick_and_exchange_n_times(&mut server, &mut [&mut client], 3);
    assert!(server.take_events().contains(&ServerEvent::VideoStatus {
        sprite: clip,
        status: VideoStatus::Ended
    }));
    assert_eq!(mirrored_status(&client, clip), VideoStatus::Ended);
}

fn mirrored_status(client: &TestClient, id: SpriteId) -> VideoStatus {
    client.tree().sprite(id).unwrap().as_video().unwrap().status()
}

#[test]
fn mirrored_status_survives_world_dump() {
    init_logger();
    let hub = LocalHub::new();
    let mut server = TestServer::new(&hub);
    let reporters = Arc::new(parking_lot::Mutex::new(Vec::new()));
    let mut first = TestClient::with_services(
        &hub,
        default_decoder(),
        Box::new(ReportingBackend {
            reporters: reporters.clone(),
        }),
    );
    let clip = server
        .world_mut()
        .create_sprite(SpriteKind::Video, SpriteId::ROOT)
        .unwrap();
    server
        .world_mut()
        .sprite_mut(clip)
        .unwrap()
        .set_video_source("clip.mp4")
        .unwrap()
        .play()
        .unwrap();
    sync_clients(&mut server, &mut [&mut first], 5);
    tick_and_exchange(&mut server, &mut [&mut first]);
    assert_eq!(mirrored_status(&first, clip), VideoStatus::Playing);

    // a second client makes the server dump the world to everybody
    let mut second = TestClient::new(&hub);
    sync_clients(&mut server, &mut [&mut first, &mut second], 5);
    tick_and_exchange(&mut server, &mut [&mut first, &mut second]);

    // same source, so the first client kept its player
    assert_eq!(reporters.lock().len(), 1);
    assert_eq!(mirrored_status(&first, clip), VideoStatus::Playing);
    assert_eq!(mirrored_status(&second, clip), VideoStatus::Error);
}
