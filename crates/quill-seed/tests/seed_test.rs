use std::sync::Arc;

use quill_db::Database;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn placeholder_api() -> MockServer {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/posts"))
        .and(query_param("userId", "7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "userId": 7, "title": "first", "body": "first body"},
            {"id": 2, "userId": 7, "title": "second", "body": "second body"},
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("postId", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 1, "postId": 1, "name": "a", "email": "a@example.com", "body": "one"},
            {"id": 2, "postId": 1, "name": "b", "email": "b@example.com", "body": "two"},
        ])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/comments"))
        .and(query_param("postId", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
            {"id": 3, "postId": 2, "name": "c", "email": "c@example.com", "body": "three"},
        ])))
        .mount(&server)
        .await;

    server
}

#[tokio::test]
async fn seeds_all_posts_and_comments_before_returning() {
    let server = placeholder_api().await;
    let db = Arc::new(Database::open_in_memory().unwrap());

    quill_seed::run(db.clone(), reqwest::Client::new(), server.uri(), 7)
        .await
        .unwrap();

    // run() holds the join barriers, so everything is visible once it returns.
    let posts = db.list_posts().unwrap();
    assert_eq!(posts.len(), 2);
    assert_eq!(posts[0].id, 1);
    assert_eq!(posts[0].user_id, 7);
    assert_eq!(posts[0].title, "first");

    let comments = db.list_comments().unwrap();
    assert_eq!(comments.len(), 3);
    // The placeholder API sends no userId on comments; seeded rows default to 0.
    assert!(comments.iter().all(|c| c.user_id == 0));
    assert_eq!(comments.iter().filter(|c| c.post_id == 1).count(), 2);
    assert_eq!(comments.iter().filter(|c| c.post_id == 2).count(), 1);
}

#[tokio::test]
async fn reseeding_is_idempotent() {
    let server = placeholder_api().await;
    let db = Arc::new(Database::open_in_memory().unwrap());
    let client = reqwest::Client::new();

    quill_seed::run(db.clone(), client.clone(), server.uri(), 7)
        .await
        .unwrap();
    quill_seed::run(db.clone(), client, server.uri(), 7)
        .await
        .unwrap();

    assert_eq!(db.list_posts().unwrap().len(), 2);
    assert_eq!(db.list_comments().unwrap().len(), 3);
}

#[tokio::test]
async fn fetch_failure_is_reported() {
    let server = MockServer::start().await;
    // No /posts mock mounted: wiremock answers 404.
    let db = Arc::new(Database::open_in_memory().unwrap());

    let result = quill_seed::run(db.clone(), reqwest::Client::new(), server.uri(), 7).await;
    assert!(result.is_err());
    assert!(db.list_posts().unwrap().is_empty());
}
