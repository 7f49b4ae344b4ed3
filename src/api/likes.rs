use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::FailureExt as _;
use super::{require_video, ApiError, App};
use crate::auth::CurrentUser;
use crate::service::likes;

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRequest {
    #[serde(default)]
    pub video_id: Option<String>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LikeStatus {
    pub liked: bool,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LikeRegistered {
    pub message: String,
    pub likes_count: u64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct LikeRemoved {
    pub message: String,
}

/// `GET /like?videoId=<id>`
#[instrument(skip_all, fields(user = %user.id))]
pub async fn status(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Query(request), _): WithRejection<Query<LikeRequest>, ApiError>,
) -> Result<Json<LikeStatus>, ApiError> {
    let video = require_video(request.video_id.as_deref())?;
    let liked = likes::is_liked(&user, &video, &app.database)
        .await
        .failure("Failed to fetch like status")?;

    Ok(Json(LikeStatus { liked }))
}

/// `POST /like` with `{videoId}`
#[instrument(skip_all, fields(user = %user.id))]
pub async fn like(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Json(request), _): WithRejection<Json<LikeRequest>, ApiError>,
) -> Result<(StatusCode, Json<LikeRegistered>), ApiError> {
    let video = require_video(request.video_id.as_deref())?;
    let likes_count = likes::like(&user, &video, &app.database)
        .await
        .failure("Failed to register like")?;

    let response = LikeRegistered {
        message: "Like registered successfully".into(),
        likes_count,
    };

    Ok((StatusCode::CREATED, Json(response)))
}

/// `DELETE /like` with `{videoId}`. Succeeds whether or not there was a like to remove.
#[instrument(skip_all, fields(user = %user.id))]
pub async fn unlike(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Json(request), _): WithRejection<Json<LikeRequest>, ApiError>,
) -> Result<Json<LikeRemoved>, ApiError> {
    let video = require_video(request.video_id.as_deref())?;
    likes::unlike(&user, &video, &app.database)
        .await
        .failure("Failed to remove like")?;

    Ok(Json(LikeRemoved {
        message: "Like removed successfully".into(),
    }))
}
