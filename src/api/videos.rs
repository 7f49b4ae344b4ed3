use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use axum_extra::extract::WithRejection;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use super::error::FailureExt as _;
use super::{require_video, ApiError, App};
use crate::auth::CurrentUser;
use crate::model::{Timestamp, Transformation, Video, VideoDraft};
use crate::service::videos;

/// A video as clients see it.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoView {
    pub id: String,
    pub owner: String,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    pub controls: bool,
    pub transformation: Transformation,
    pub likes_count: u64,
    pub comments_count: u64,
    pub created_at: Timestamp,
}

impl From<Video> for VideoView {
    fn from(video: Video) -> Self {
        Self {
            id: video.id.key(),
            owner: video.owner.key(),
            title: video.title,
            description: video.description,
            video_url: video.video_url,
            thumbnail_url: video.thumbnail_url,
            controls: video.controls,
            transformation: video.transformation,
            likes_count: video.likes_count,
            comments_count: video.comments_count,
            created_at: video.created_at,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub struct VideoList {
    pub videos: Vec<VideoView>,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct SingleVideo {
    pub video: VideoView,
}

/// `GET /videos`
#[instrument(skip_all)]
pub async fn feed(State(app): State<App>) -> Result<Json<VideoList>, ApiError> {
    let videos = videos::feed(&app.database)
        .await
        .failure("Failed to fetch videos")?;

    Ok(Json(VideoList {
        videos: videos.into_iter().map(VideoView::from).collect(),
    }))
}

/// `POST /video`, also routed at `POST /videos`
#[instrument(skip_all, fields(user = %user.id))]
pub async fn publish(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    WithRejection(Json(draft), _): WithRejection<Json<VideoDraft>, ApiError>,
) -> Result<(StatusCode, Json<SingleVideo>), ApiError> {
    let video = videos::publish(&user, draft, &app.database)
        .await
        .failure("Failed to publish video")?;

    Ok((
        StatusCode::CREATED,
        Json(SingleVideo {
            video: video.into(),
        }),
    ))
}

/// `GET /videos/{id}`
#[instrument(skip(app))]
pub async fn get(
    State(app): State<App>,
    Path(id): Path<String>,
) -> Result<Json<SingleVideo>, ApiError> {
    let video = require_video(Some(id.as_str()))?;
    let video = videos::get(&video, &app.database)
        .await
        .failure("Failed to fetch video")?;

    Ok(Json(SingleVideo {
        video: video.into(),
    }))
}

/// `POST /videos/{id}/recount`
#[instrument(skip_all, fields(user = %user.id, video = %id))]
pub async fn recount(
    CurrentUser(user): CurrentUser,
    State(app): State<App>,
    Path(id): Path<String>,
) -> Result<Json<SingleVideo>, ApiError> {
    let video = require_video(Some(id.as_str()))?;
    let video = videos::recount(&user, &video, &app.database)
        .await
        .failure("Failed to recount video")?;

    Ok(Json(SingleVideo {
        video: video.into(),
    }))
}
