use std::collections::BTreeSet;

use tableau_shared::{SpriteId, SpriteTree};

/// Every way `mirror` differs from `authority`, for sprites reachable from
/// the root. Empty when the mirror is exact.
pub fn mirror_differences(authority: &SpriteTree, mirror: &SpriteTree) -> Vec<String> {
    let mut differences = Vec::new();

    let reachable: BTreeSet<SpriteId> = authority.descendants(SpriteId::ROOT).into_iter().collect();
    let mirrored: BTreeSet<SpriteId> = mirror.descendants(SpriteId::ROOT).into_iter().collect();
    for id in reachable.difference(&mirrored) {
        differences.push(format!("{id} missing from mirror"));
    }
    for id in mirrored.difference(&reachable) {
        differences.push(format!("{id} only in mirror"));
    }

    for id in reachable.intersection(&mirrored) {
        let (Some(expected), Some(actual)) = (authority.sprite(*id), mirror.sprite(*id)) else {
            continue;
        };
        if expected.kind() != actual.kind() {
            differences.push(format!(
                "{id} is a {} but mirrored as {}",
                expected.kind(),
                actual.kind()
            ));
        }
        if expected.parent() != actual.parent() {
            differences.push(format!(
                "{id} parent {:?} mirrored as {:?}",
                expected.parent(),
                actual.parent()
            ));
        }
        if expected.children() != actual.children() {
            differences.push(format!(
                "{id} children {:?} mirrored as {:?}",
                expected.children(),
                actual.children()
            ));
        }
        if expected.attributes() != actual.attributes() {
            differences.push(format!(
                "{id} attributes {:?} mirrored as {:?}",
                expected.attributes(),
                actual.attributes()
            ));
        }
        if expected.body() != actual.body() {
            differences.push(format!(
                "{id} body {:?} mirrored as {:?}",
                expected.body(),
                actual.body()
            ));
        }
    }

    differences
}

pub fn assert_mirrors(authority: &SpriteTree, mirror: &SpriteTree) {
    let differences = mirror_differences(authority, mirror);
    assert!(
        differences.is_empty(),
        "mirror differs from authority:\n{}",
        differences.join("\n")
    );
}
