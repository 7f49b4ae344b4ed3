use std::sync::Arc;

use axum::http::{header, HeaderValue, StatusCode};
use axum_test::TestServer;
use serde_json::{json, Value};

use super::comments::{CommentAdded, CommentList};
use super::likes::{LikeRegistered, LikeStatus};
use super::videos::{SingleVideo, VideoList};
use super::*;
use crate::auth::{SessionConfig, SESSION_COOKIE};
use crate::model::User;

struct Harness {
    server: TestServer,
    authenticator: Arc<Authenticator>,
}

impl Harness {
    async fn new() -> Self {
        let database = Database::memory().await.unwrap();
        let authenticator = Arc::new(Authenticator::from_config(&SessionConfig {
            session_secret: "test secret".into(),
        }));

        let app = App::new(database, authenticator.clone());
        let server = TestServer::new(router(app)).unwrap();

        Self {
            server,
            authenticator,
        }
    }

    fn bearer(&self, name: &str) -> HeaderValue {
        let user = User::new(Record::new(name.to_string()), format!("{name}@example.com"));
        let token = self.authenticator.issue(&user).unwrap();

        HeaderValue::from_str(&format!("Bearer {token}")).unwrap()
    }

    async fn publish(&self, owner: &str) -> String {
        let response = self
            .server
            .post("/video")
            .add_header(header::AUTHORIZATION, self.bearer(owner))
            .json(&json!({
                "title": "Sunset",
                "description": "golden hour",
                "videoUrl": "https://cdn.example/sunset.mp4",
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        response.json::<SingleVideo>().video.id
    }

    async fn likes_count(&self, video: &str) -> u64 {
        let response = self.server.get(&format!("/videos/{video}")).await;
        response.json::<SingleVideo>().video.likes_count
    }
}

#[tokio::test]
async fn unauthenticated_like_status_is_unauthorized() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .get("/like")
        .add_query_param("videoId", "anything")
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
    response.assert_json(&json!({ "error": "Unauthorized" }));
}

#[tokio::test]
async fn forged_tokens_are_unauthorized() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .get("/like")
        .add_query_param("videoId", "anything")
        .add_header(
            header::AUTHORIZATION,
            HeaderValue::from_static("Bearer not-a-token"),
        )
        .await;

    response.assert_status(StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn missing_video_id_is_a_bad_request() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .get("/like")
        .add_header(header::AUTHORIZATION, harness.bearer("alice"))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "Missing videoId" }));
}

#[tokio::test]
async fn like_flow() {
    let harness = Harness::new().await;
    let video = harness.publish("alice").await;

    let response = harness
        .server
        .post("/like")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .json(&json!({ "videoId": video }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let registered = response.json::<LikeRegistered>();
    assert_eq!(registered.message, "Like registered successfully");
    assert_eq!(registered.likes_count, 1);

    let response = harness
        .server
        .get("/like")
        .add_query_param("videoId", &video)
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .await;
    assert!(response.json::<LikeStatus>().liked);

    let response = harness
        .server
        .delete("/like")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .json(&json!({ "videoId": video }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({ "message": "Like removed successfully" }));

    assert_eq!(harness.likes_count(&video).await, 0);
}

#[tokio::test]
async fn session_cookie_is_accepted() {
    let harness = Harness::new().await;
    let video = harness.publish("alice").await;

    let bearer = harness.bearer("carol");
    let token = bearer
        .to_str()
        .unwrap()
        .trim_start_matches("Bearer ")
        .to_string();
    let cookie = HeaderValue::from_str(&format!("{SESSION_COOKIE}={token}")).unwrap();

    let response = harness
        .server
        .get("/like")
        .add_query_param("videoId", &video)
        .add_header(header::COOKIE, cookie)
        .await;

    response.assert_status_ok();
    assert!(!response.json::<LikeStatus>().liked);
}

#[tokio::test]
async fn double_like_is_rejected_and_counted_once() {
    let harness = Harness::new().await;
    let video = harness.publish("alice").await;

    for expected in [StatusCode::CREATED, StatusCode::BAD_REQUEST] {
        let response = harness
            .server
            .post("/like")
            .add_header(header::AUTHORIZATION, harness.bearer("bob"))
            .json(&json!({ "videoId": video }))
            .await;
        response.assert_status(expected);
    }

    assert_eq!(harness.likes_count(&video).await, 1);
}

#[tokio::test]
async fn liking_a_missing_video_is_not_found() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/like")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .json(&json!({ "videoId": "ghost" }))
        .await;

    response.assert_status(StatusCode::NOT_FOUND);
    response.assert_json(&json!({ "error": "Video not found" }));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/like")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .add_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        )
        .text("{ not json")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    assert!(response.json::<Value>()["error"].is_string());
}

#[tokio::test]
async fn empty_comment_is_a_bad_request() {
    let harness = Harness::new().await;
    let video = harness.publish("alice").await;

    let response = harness
        .server
        .post("/comment")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .json(&json!({ "videoId": video, "content": "   " }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn comments_are_listed_and_only_the_author_can_delete() {
    let harness = Harness::new().await;
    let video = harness.publish("alice").await;

    let response = harness
        .server
        .post("/comment")
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .json(&json!({ "videoId": video, "content": " love it " }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body = response.json::<Value>();
    assert_eq!(body["message"]["content"], "love it");
    assert_eq!(body["message"]["user"]["_id"], "bob");
    assert_eq!(body["message"]["user"]["email"], "bob@example.com");
    assert_eq!(body["commentsCount"], 1);
    assert!(body["message"]["_id"].is_string());

    let added = response.json::<CommentAdded>();
    let comment = added.message.id;

    let response = harness
        .server
        .delete("/comment")
        .add_query_param("commentId", &comment)
        .add_query_param("videoId", &video)
        .add_header(header::AUTHORIZATION, harness.bearer("mallory"))
        .await;
    response.assert_status_ok();

    let listed = harness
        .server
        .get("/comment")
        .add_query_param("videoId", &video)
        .await
        .json::<CommentList>();
    assert_eq!(listed.comments.len(), 1, "mallory's delete must be a no-op");
    assert_eq!(listed.comments[0].id, comment);

    harness
        .server
        .delete("/comment")
        .add_query_param("commentId", &comment)
        .add_query_param("videoId", &video)
        .add_header(header::AUTHORIZATION, harness.bearer("bob"))
        .await
        .assert_status_ok();

    let response = harness.server.get(&format!("/videos/{video}")).await;
    assert_eq!(response.json::<SingleVideo>().video.comments_count, 0);
}

#[tokio::test]
async fn feed_and_recount() {
    let harness = Harness::new().await;
    let first = harness.publish("alice").await;
    let second = harness.publish("alice").await;

    let feed = harness.server.get("/videos").await.json::<VideoList>();
    let ids: Vec<_> = feed.videos.into_iter().map(|video| video.id).collect();
    assert_eq!(ids, vec![second.clone(), first]);

    harness
        .server
        .post(&format!("/videos/{second}/recount"))
        .add_header(header::AUTHORIZATION, harness.bearer("mallory"))
        .await
        .assert_status(StatusCode::NOT_FOUND);

    let response = harness
        .server
        .post(&format!("/videos/{second}/recount"))
        .add_header(header::AUTHORIZATION, harness.bearer("alice"))
        .await;
    response.assert_status_ok();
    assert_eq!(response.json::<SingleVideo>().video.likes_count, 0);
}

#[tokio::test]
async fn publishing_requires_a_title() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/videos")
        .add_header(header::AUTHORIZATION, harness.bearer("alice"))
        .json(&json!({
            "description": "no title",
            "videoUrl": "https://cdn.example/clip.mp4",
        }))
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    response.assert_json(&json!({ "error": "title must not be empty" }));
}

#[tokio::test]
async fn videos_can_be_published_on_either_path() {
    let harness = Harness::new().await;

    let response = harness
        .server
        .post("/videos")
        .add_header(header::AUTHORIZATION, harness.bearer("alice"))
        .json(&json!({
            "title": "Dawn",
            "description": "first light",
            "videoUrl": "https://cdn.example/dawn.mp4",
        }))
        .await;
    response.assert_status(StatusCode::CREATED);

    let on_singular = harness.publish("alice").await;

    let feed = harness.server.get("/videos").await.json::<VideoList>();
    assert_eq!(feed.videos.len(), 2);
    assert_eq!(feed.videos[0].id, on_singular);
}
