//! Derived counts are recomputed from store rows, never from local
//! optimistic deltas, so they stay honest under writers the cache never
//! observes.

mod common;

use std::sync::Arc;

use pawfeed::{MemoryStore, ProfileCounts, RelationshipKey, RelationshipKind};
use pretty_assertions::assert_eq;

use common::{engine_for, object, user};

#[tokio::test]
async fn refresh_reflects_all_writers_not_local_flips() {
    let acting = user();
    let store = Arc::new(MemoryStore::new());
    let engine = engine_for(acting, &store);

    let post = object();
    // Five distinct users like the post behind the acting client's back.
    for _ in 0..5 {
        store.seed(RelationshipKey::post_like(user(), post));
    }

    // The acting user flips their own flag on and off again; the net row
    // delta is zero no matter how many local flips happened.
    let key = RelationshipKey::post_like(acting, post);
    engine.toggle(key).await.unwrap();
    engine.toggle(key).await.unwrap();

    let count = engine
        .refresh_count(post, RelationshipKind::PostLike)
        .await
        .unwrap();
    assert_eq!(count, 5);

    // One more settled like from the acting user shows up exactly once.
    engine.toggle(key).await.unwrap();
    let count = engine
        .refresh_count(post, RelationshipKind::PostLike)
        .await
        .unwrap();
    assert_eq!(count, 6);
}

#[tokio::test]
async fn snapshot_is_stale_until_refreshed() {
    let acting = user();
    let store = Arc::new(MemoryStore::new());
    let engine = engine_for(acting, &store);

    let post = object();
    let count = engine
        .refresh_count(post, RelationshipKind::PostLike)
        .await
        .unwrap();
    assert_eq!(count, 0);

    // Rows written after the snapshot do not appear until the next
    // refresh.
    store.seed(RelationshipKey::post_like(user(), post));
    assert_eq!(
        engine.count(post, RelationshipKind::PostLike).unwrap().count,
        0
    );

    engine
        .refresh_count(post, RelationshipKind::PostLike)
        .await
        .unwrap();
    assert_eq!(
        engine.count(post, RelationshipKind::PostLike).unwrap().count,
        1
    );
}

#[tokio::test]
async fn successful_toggle_refreshes_the_object_count() {
    let acting = user();
    let store = Arc::new(MemoryStore::new());
    let engine = engine_for(acting, &store);

    let post = object();
    store.seed(RelationshipKey::post_like(user(), post));

    engine
        .toggle(RelationshipKey::post_like(acting, post))
        .await
        .unwrap();

    // The snapshot includes both the seeded row and the new one.
    assert_eq!(
        engine.count(post, RelationshipKind::PostLike).unwrap().count,
        2
    );
}

#[tokio::test]
async fn profile_counts_follow_both_directions() {
    let acting = user();
    let store = Arc::new(MemoryStore::new());
    let engine = engine_for(acting, &store);

    for _ in 0..3 {
        store.seed(RelationshipKey::follow(user(), acting));
    }
    engine.toggle(RelationshipKey::follow(acting, user())).await.unwrap();

    let profile = engine.refresh_profile(acting).await.unwrap();
    assert_eq!(
        profile,
        ProfileCounts {
            followers: 3,
            following: 1
        }
    );
}
