//! REST store behavior against a mock PostgREST endpoint: filter and
//! header construction, status-code classification, and count parsing.

use assert_matches::assert_matches;
use uuid::Uuid;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use pawfeed::store::{RestConfig, RestStore};
use pawfeed::{
    ObjectId, RelationshipKey, RelationshipKind, RelationshipStore, StoreError, UserId,
};

fn store_for(server: &MockServer) -> RestStore {
    RestStore::new(RestConfig {
        base_url: server.uri(),
        api_key: "anon-key".into(),
        bearer_token: Some("session-token".into()),
    })
}

fn like_key() -> RelationshipKey {
    RelationshipKey::post_like(UserId(Uuid::new_v4()), ObjectId(Uuid::new_v4()))
}

#[tokio::test]
async fn exists_sends_eq_filters_and_auth_headers() {
    let server = MockServer::start().await;
    let key = like_key();

    Mock::given(method("GET"))
        .and(path("/likes"))
        .and(query_param("user_id", format!("eq.{}", key.subject)))
        .and(query_param("post_id", format!("eq.{}", key.object)))
        .and(query_param("limit", "1"))
        .and(header("apikey", "anon-key"))
        .and(header("Authorization", "Bearer session-token"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "post_id": key.object }])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(store.exists(&key).await.unwrap());
}

#[tokio::test]
async fn exists_reads_empty_result_as_absent() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/likes"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    assert!(!store.exists(&like_key()).await.unwrap());
}

#[tokio::test]
async fn insert_conflict_maps_to_conflict_variant() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/likes"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.insert_edge(&like_key()).await.unwrap_err();
    assert_eq!(err, StoreError::Conflict);
}

#[tokio::test]
async fn row_level_security_rejection_maps_to_permission_denied() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/follows"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let follower = UserId(Uuid::new_v4());
    let key = RelationshipKey::follow(follower, UserId(Uuid::new_v4()));
    let err = store.delete_edge(&key).await.unwrap_err();
    assert_eq!(err, StoreError::PermissionDenied);
}

#[tokio::test]
async fn delete_matching_zero_rows_is_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/likes"))
        .and(header("Prefer", "return=representation"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store.delete_edge(&like_key()).await.unwrap_err();
    assert_eq!(err, StoreError::NotFound);
}

#[tokio::test]
async fn delete_of_existing_row_succeeds() {
    let server = MockServer::start().await;
    let key = like_key();

    Mock::given(method("DELETE"))
        .and(path("/likes"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!([{ "post_id": key.object }])),
        )
        .mount(&server)
        .await;

    let store = store_for(&server);
    store.delete_edge(&key).await.unwrap();
}

#[tokio::test]
async fn count_is_read_from_content_range() {
    let server = MockServer::start().await;
    let post = ObjectId(Uuid::new_v4());

    Mock::given(method("HEAD"))
        .and(path("/likes"))
        .and(query_param("post_id", format!("eq.{post}")))
        .and(header("Prefer", "count=exact"))
        .respond_with(ResponseTemplate::new(200).insert_header("Content-Range", "0-6/7"))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let count = store
        .count_by_object(post, RelationshipKind::PostLike)
        .await
        .unwrap();
    assert_eq!(count, 7);
}

#[tokio::test]
async fn missing_content_range_is_malformed() {
    let server = MockServer::start().await;

    Mock::given(method("HEAD"))
        .and(path("/likes"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let err = store
        .count_by_object(ObjectId(Uuid::new_v4()), RelationshipKind::PostLike)
        .await
        .unwrap_err();
    assert_matches!(err, StoreError::Malformed { .. });
}

#[tokio::test]
async fn list_subject_edges_parses_object_column() {
    let server = MockServer::start().await;
    let subject = UserId(Uuid::new_v4());
    let first = Uuid::new_v4();
    let second = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/comment_likes"))
        .and(query_param("user_id", format!("eq.{subject}")))
        .and(query_param("select", "comment_id"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            { "comment_id": first },
            { "comment_id": second },
        ])))
        .mount(&server)
        .await;

    let store = store_for(&server);
    let edges = store
        .list_subject_edges(subject, RelationshipKind::CommentLike)
        .await
        .unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.contains(&ObjectId(first)));
    assert!(edges.contains(&ObjectId(second)));
}

#[tokio::test]
async fn unreachable_endpoint_is_unavailable() {
    // A server that is immediately dropped leaves a refused port behind.
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let store = RestStore::new(RestConfig {
        base_url: uri,
        api_key: "anon-key".into(),
        bearer_token: None,
    });
    let err = store.exists(&like_key()).await.unwrap_err();
    assert_matches!(err, StoreError::Unavailable { .. });
}
