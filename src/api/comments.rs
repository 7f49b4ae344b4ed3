use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::FailureExt as _;
use super::{require_video, ApiError, App};
use crate::auth::CurrentUser;
use crate::database::Record;
use crate::model::{Comment, Timestamp, User};
use crate::service::comments;

/// A comment as clients see it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentView {
    #[serde(rename = "_id")]
    pub id: String,
    pub video_id: String,
    pub user: Author,
    pub content: String,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Author {
    #[serde(rename = "_id")]
    pub id: String,
    pub email: String,
}

impl From<Comment> for CommentView {
    fn from(comment: Comment) -> Self {
        Self {
            id: comment.id.key(),
            video_id: comment.video.key(),
            user: comment.user.into(),
            content: comment.content,
            created_at: comment.created_at,
        }
    }
}

impl From<User> for Author {
    fn from(user: User) -> Self {
        Self {
            id: user.id.key(),
            email: user.email,
        }
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentQuery {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub comment_id: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentRequest {
    #[serde(default)]
    pub video_id: Option<String>,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentList {
    pub comments: Vec<CommentView>,
}

/// The web client prepends `message` to its list, so it carries the stored comment.
#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommentAdded {
    pub message: CommentView,
    pub comments_count: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct CommentDeleted {
    pub message: String,
}

/// `GET /comment?videoId=<id>`
#[instrument(skip(app))]
pub async fn list(
    State(app): State<App>,
    WithRejection(Query(query), _): WithRejection<Query<CommentQuery>, ApiError>,
) -> Result<Json<CommentList>, ApiError> {
    let video = require_video(query.video_id.as_deref())?;
    let comments = comments::list(&video, &app.database)
        .await
        .failure("Failed to fetch comments")?;

    Ok(Json(CommentList {
        comments: comments.into_iter().map(CommentView::from).collect(),
    }))
}

/// `POST /comment` with `{videoId, content}`
#[instrument(skip_all, fields(user = %user.id))]
pub async fn create(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Json(request), _): WithRejection<Json<CommentRequest>, ApiError>,
) -> Result<(StatusCode, Json<CommentAdded>), ApiError> {
    let video = require_video(request.video_id.as_deref())?;
    let (comment, comments_count) =
        comments::create(&user, &video, &request.content, &app.database)
            .await
            .failure("Failed to add comment")?;

    let response = CommentAdded {
        message: comment.into(),
        comments_count,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `DELETE /comment?commentId=<id>&videoId=<id>`. Only the author's own comments are removed; anything else is a no-op.
#[instrument(skip_all, fields(user = %user.id))]
pub async fn delete(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Query(query), _): WithRejection<Query<CommentQuery>, ApiError>,
) -> Result<Json<CommentDeleted>, ApiError> {
    let video = require_video(query.video_id.as_deref())?;
    let comment: Record<Comment> = query
        .comment_id
        .as_deref()
        .and_then(Record::parse)
        .ok_or_else(|| ApiError::bad_request("Missing commentId"))?;

    comments::delete(&user, &video, &comment, &app.database)
        .await
        .failure("Failed to delete comment")?;

    Ok(Json(CommentDeleted {
        message: "Comment deleted successfully".into(),
    }))
}
