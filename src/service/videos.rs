use snafu::{ensure, OptionExt as _};
use tracing::instrument;

use super::{EmptyFieldSnafu, InvalidQualitySnafu, Result, VideoNotFoundSnafu};
use crate::database::{Database, Record};
use crate::model::{User, Video, VideoDraft};

/// Publishes a video owned by `user`. Counters start at zero no matter what the draft says.
#[instrument(skip(db, user, draft), fields(user = %user.id, title = %draft.title))]
pub async fn publish(user: &User, draft: VideoDraft, db: &Database) -> Result<Video> {
    ensure!(!draft.title.trim().is_empty(), EmptyFieldSnafu { field: "title" });
    ensure!(
        !draft.description.trim().is_empty(),
        EmptyFieldSnafu {
            field: "description"
        }
    );
    ensure!(
        !draft.video_url.trim().is_empty(),
        EmptyFieldSnafu { field: "videoUrl" }
    );
    if let Some(quality) = draft.transformation.and_then(|t| t.quality) {
        ensure!((1..=100).contains(&quality), InvalidQualitySnafu { quality });
    }

    let video = Video::new(
        user.id.clone(),
        draft.title.trim().to_string(),
        draft.description.trim().to_string(),
        draft.video_url.trim().to_string(),
        draft.thumbnail_or_default(),
        draft.controls.unwrap_or(true),
        draft.transformation.unwrap_or_default(),
    );

    let created: Option<Video> = db
        .sql("CREATE $id CONTENT $video")
        .bind(("id", &video.id))
        .bind(("video", &video))
        .fetch_first()
        .await?;

    let created = created.context(VideoNotFoundSnafu { video: video.id.key() })?;
    tracing::info!(video = %created.id, "published video");

    Ok(created)
}

/// Every video, newest first.
#[instrument(skip(db))]
pub async fn feed(db: &Database) -> Result<Vec<Video>> {
    let videos = Video::feed(db).await?;
    tracing::debug!(count = videos.len(), "loaded feed");

    Ok(videos)
}

#[instrument(skip(db))]
pub async fn get(video: &Record<Video>, db: &Database) -> Result<Video> {
    Video::get(video, db)
        .await?
        .context(VideoNotFoundSnafu { video: video.key() })
}

/// Recomputes both counters from the ledgers.
///
/// Only the owner may do this; anyone else gets the same answer as for a missing video.
#[instrument(skip(db, user), fields(user = %user.id))]
pub async fn recount(user: &User, video: &Record<Video>, db: &Database) -> Result<Video> {
    let recounted: Option<Video> = db
        .sql(
            "UPDATE $video SET
                likes_count = array::len((SELECT id FROM likes WHERE video = $video)),
                comments_count = array::len((SELECT id FROM comments WHERE video = $video))
            WHERE owner = $owner
            RETURN AFTER",
        )
        .bind(("video", video))
        .bind(("owner", &user.id))
        .fetch_first()
        .await?;

    let recounted = recounted.context(VideoNotFoundSnafu { video: video.key() })?;
    tracing::info!(
        likes = recounted.likes_count,
        comments = recounted.comments_count,
        "recounted video"
    );

    Ok(recounted)
}
