use proptest::prelude::*;
use tableau_shared::{
    blob::{register_all_blob_types, BlobError, BlobKind, BlobRegistry, BlobTypes, BLOB_KINDS},
    read_sprite_frame, write_all_sprites, write_detached_sprites, write_dirty_sprites, Color,
    DataBuffer, HostType, SpriteId, SpriteKind, SpriteTree, Vec3,
};
use tableau_test::mirror_differences;

fn registry() -> (BlobRegistry<()>, BlobTypes) {
    let mut registry = BlobRegistry::<()>::new();
    let types = register_all_blob_types(&mut registry, |_| {
        Box::new(|_: &mut (), _: &mut DataBuffer| -> Result<(), BlobError> { Ok(()) })
    })
    .unwrap();
    (registry, types)
}

/// Apply a buffer holding only sprite frames to a client mirror
fn apply(registry: &BlobRegistry<()>, mirror: &mut SpriteTree, buffer: &mut DataBuffer) {
    while buffer.remaining() > 0 {
        let blob_type = buffer.read::<u8>().unwrap();
        match registry.kind_of(blob_type) {
            Some(BlobKind::Sprite(kind)) => {
                read_sprite_frame(mirror, kind, buffer).unwrap();
            }
            other => panic!("unexpected blob {other:?} in sprite stream"),
        }
    }
}

/// Ship everything pending on `server` to `mirror`, the way one server frame would
fn flush(
    registry: &BlobRegistry<()>,
    types: &BlobTypes,
    server: &mut SpriteTree,
    mirror: &mut SpriteTree,
) {
    for id in server.take_destroyed() {
        // may already be gone with an ancestor
        let _ = mirror.destroy(id);
    }
    let mut buffer = DataBuffer::new();
    write_detached_sprites(server, types, &mut buffer);
    write_dirty_sprites(server, types, &mut buffer, None);
    apply(registry, mirror, &mut buffer);
}

#[derive(Clone, Debug)]
enum Op {
    Create { kind: SpriteKind, parent: usize },
    Move { target: usize, x: f32, y: f32 },
    Fade { target: usize, opacity: f32 },
    Tint { target: usize, red: f32 },
    Write { target: usize, text: String },
    Reparent { target: usize, parent: usize },
    Detach { target: usize },
    Destroy { target: usize },
}

fn kind_strategy() -> impl Strategy<Value = SpriteKind> {
    prop_oneof![
        Just(SpriteKind::Sprite),
        Just(SpriteKind::Text),
        Just(SpriteKind::Image),
    ]
}

fn op_strategy() -> impl Strategy<Value = Op> {
    let index = 0usize..64;
    prop_oneof![
        3 => (kind_strategy(), index.clone()).prop_map(|(kind, parent)| Op::Create { kind, parent }),
        2 => (index.clone(), -500.0f32..500.0, -500.0f32..500.0)
            .prop_map(|(target, x, y)| Op::Move { target, x, y }),
        1 => (index.clone(), 0.0f32..1.0).prop_map(|(target, opacity)| Op::Fade { target, opacity }),
        1 => (index.clone(), 0.0f32..1.0).prop_map(|(target, red)| Op::Tint { target, red }),
        1 => (index.clone(), "[a-z ]{0,12}").prop_map(|(target, text)| Op::Write { target, text }),
        1 => (index.clone(), index.clone()).prop_map(|(target, parent)| Op::Reparent { target, parent }),
        1 => index.clone().prop_map(|target| Op::Detach { target }),
        1 => index.prop_map(|target| Op::Destroy { target }),
    ]
}

/// Replays ops on a server tree. Indices wrap over the sprites alive at the time.
struct Scene {
    tree: SpriteTree,
    next_id: u32,
}

impl Scene {
    fn new() -> Self {
        Self {
            tree: SpriteTree::new(HostType::Server),
            next_id: 2,
        }
    }

    fn pick(&self, index: usize) -> SpriteId {
        let mut ids: Vec<SpriteId> = self.tree.sprite_ids().copied().collect();
        ids.sort();
        ids[index % ids.len()]
    }

    fn apply(&mut self, op: &Op) {
        match op {
            Op::Create { kind, parent } => {
                let parent = self.pick(*parent);
                let id = SpriteId::new(self.next_id);
                self.next_id += 1;
                self.tree.create(id, *kind).unwrap();
                self.tree.add_child(parent, id).unwrap();
            }
            Op::Move { target, x, y } => {
                let id = self.pick(*target);
                if let Some(mut sprite) = self.tree.sprite_mut(id) {
                    sprite.set_position(Vec3::new(*x, *y, 0.0));
                }
            }
            Op::Fade { target, opacity } => {
                let id = self.pick(*target);
                if let Some(mut sprite) = self.tree.sprite_mut(id) {
                    sprite.set_opacity(*opacity);
                }
            }
            Op::Tint { target, red } => {
                let id = self.pick(*target);
                if let Some(mut sprite) = self.tree.sprite_mut(id) {
                    sprite.set_color(Color::new(*red, 0.5, 0.25));
                }
            }
            Op::Write { target, text } => {
                let id = self.pick(*target);
                if let Some(mut sprite) = self.tree.sprite_mut(id) {
                    // only text sprites accept it
                    let _ = sprite.set_text(text);
                }
            }
            Op::Reparent { target, parent } => {
                let (child, parent) = (self.pick(*target), self.pick(*parent));
                // cycles and the root are refused
                let _ = self.tree.add_child(parent, child);
            }
            Op::Detach { target } => {
                let _ = self.tree.remove_parent(self.pick(*target));
            }
            Op::Destroy { target } => {
                let _ = self.tree.destroy(self.pick(*target));
            }
        }
    }
}

fn mirror() -> SpriteTree {
    SpriteTree::new(HostType::Client)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn deltas_keep_mirror_exact(batches in prop::collection::vec(prop::collection::vec(op_strategy(), 1..12), 1..8)) {
        let (registry, types) = registry();
        let mut scene = Scene::new();
        let mut client = mirror();
        for batch in &batches {
            for op in batch {
                scene.apply(op);
            }
            flush(&registry, &types, &mut scene.tree, &mut client);
            let differences = mirror_differences(&scene.tree, &client);
            prop_assert!(differences.is_empty(), "{:#?}", differences);
        }
    }

    #[test]
    fn full_dump_rebuilds_any_tree(ops in prop::collection::vec(op_strategy(), 0..40)) {
        let (registry, types) = registry();
        let mut scene = Scene::new();
        for op in &ops {
            scene.apply(op);
        }
        scene.tree.take_destroyed();
        scene.tree.take_detached();

        let mut client = mirror();
        let mut buffer = DataBuffer::new();
        write_all_sprites(&mut scene.tree, &types, &mut buffer);
        apply(&registry, &mut client, &mut buffer);

        let differences = mirror_differences(&scene.tree, &client);
        prop_assert!(differences.is_empty(), "{:#?}", differences);
        // dumped means clean
        let mut again = DataBuffer::new();
        prop_assert_eq!(write_dirty_sprites(&mut scene.tree, &types, &mut again, None), 0);
    }

    #[test]
    fn second_write_is_empty(ops in prop::collection::vec(op_strategy(), 1..40)) {
        let (_registry, types) = registry();
        let mut scene = Scene::new();
        for op in &ops {
            scene.apply(op);
        }

        let mut first = DataBuffer::new();
        write_dirty_sprites(&mut scene.tree, &types, &mut first, None);
        for id in scene.tree.descendants(SpriteId::ROOT) {
            prop_assert!(!scene.tree.sprite(id).unwrap().is_dirty(), "{} still dirty", id);
        }

        let mut second = DataBuffer::new();
        prop_assert_eq!(write_dirty_sprites(&mut scene.tree, &types, &mut second, None), 0);
        prop_assert!(second.is_empty());
    }

    #[test]
    fn leaf_change_marks_every_ancestor(depth in 1usize..12, x in -100.0f32..100.0) {
        let (_registry, types) = registry();
        let mut tree = SpriteTree::new(HostType::Server);
        let mut chain = vec![SpriteId::ROOT];
        for n in 0..depth {
            let id = SpriteId::new(n as u32 + 2);
            tree.create(id, SpriteKind::Sprite).unwrap();
            tree.add_child(*chain.last().unwrap(), id).unwrap();
            chain.push(id);
        }
        write_dirty_sprites(&mut tree, &types, &mut DataBuffer::new(), None);

        let leaf = *chain.last().unwrap();
        tree.sprite_mut(leaf).unwrap().set_position(Vec3::new(x + 1000.0, 0.0, 0.0));
        for id in &chain {
            prop_assert!(tree.sprite(*id).unwrap().is_dirty(), "{} not marked", id);
        }

        let mut buffer = DataBuffer::new();
        prop_assert_eq!(write_dirty_sprites(&mut tree, &types, &mut buffer, None), 1);
        for id in &chain {
            prop_assert!(!tree.sprite(*id).unwrap().is_dirty());
        }
    }

    #[test]
    fn registries_agree_on_any_registration_order(seed in any::<u64>()) {
        let mut order = BLOB_KINDS.to_vec();
        fastrand::Rng::with_seed(seed).shuffle(&mut order);

        let mut first = BlobRegistry::<()>::new();
        let mut second = BlobRegistry::<u32>::new();
        for kind in &order {
            let a = first
                .add(*kind, Box::new(|_: &mut (), _: &mut DataBuffer| -> Result<(), BlobError> { Ok(()) }))
                .unwrap();
            let b = second
                .add(*kind, Box::new(|_: &mut u32, _: &mut DataBuffer| -> Result<(), BlobError> { Ok(()) }))
                .unwrap();
            prop_assert_eq!(a, b);
            prop_assert_eq!(first.kind_of(a), Some(*kind));
            prop_assert_eq!(second.blob_type(*kind), Some(b));
        }
        prop_assert_eq!(first.kind_of(order.len() as u8), None);
    }

    #[test]
    fn budgeted_deltas_converge(count in 1usize..30, limit in 64usize..512, texts in prop::collection::vec("[a-z]{0,16}", 30)) {
        let (registry, types) = registry();
        let mut server = SpriteTree::new(HostType::Server);
        let mut client = mirror();
        for n in 0..count {
            let id = SpriteId::new(n as u32 + 2);
            server
                .create(id, SpriteKind::Text)
                .unwrap()
                .set_position(Vec3::new(n as f32, 0.0, 0.0))
                .set_text(&texts[n])
                .unwrap();
            server.add_child(SpriteId::ROOT, id).unwrap();
        }

        let mut rounds = 0;
        loop {
            let mut buffer = DataBuffer::new();
            let frames = write_dirty_sprites(&mut server, &types, &mut buffer, Some(limit));
            prop_assert!(buffer.len() <= limit);
            apply(&registry, &mut client, &mut buffer);
            if frames == 0 {
                break;
            }
            rounds += 1;
            prop_assert!(rounds < 1000, "no progress under a {} byte budget", limit);
        }

        let differences = mirror_differences(&server, &client);
        prop_assert!(differences.is_empty(), "{:#?}", differences);
    }
}
