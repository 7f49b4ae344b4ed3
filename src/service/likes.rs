use snafu::OptionExt as _;
use tracing::instrument;

use super::{Counter, Result, ServiceError, VideoNotFoundSnafu, ALREADY_LIKED, VIDEO_NOT_FOUND};
use crate::database::{Database, Record};
use crate::model::{Like, User, Video};

/// Whether `user` currently likes `video`.
#[instrument(skip(db, user), fields(user = %user.id))]
pub async fn is_liked(user: &User, video: &Record<Video>, db: &Database) -> Result<bool> {
    let like = Like::find(&user.id, video, db).await?;
    Ok(like.is_some())
}

/// Records a like and bumps the counter in one transaction, returning the new like count.
///
/// A duplicate is caught by the pre-check, or by the unique index when two requests race past it.
#[instrument(skip(db, user), fields(user = %user.id))]
pub async fn like(user: &User, video: &Record<Video>, db: &Database) -> Result<u64> {
    let like = Like::new(user.id.clone(), video.clone());

    let query = format!(
        "BEGIN TRANSACTION;
        LET $found = (SELECT id FROM $video);
        IF array::len($found) = 0 {{ THROW '{VIDEO_NOT_FOUND}' }};
        LET $existing = (SELECT id FROM likes WHERE user = $user AND video = $video);
        IF array::len($existing) > 0 {{ THROW '{ALREADY_LIKED}' }};
        CREATE $like CONTENT $content;
        {increment};
        COMMIT TRANSACTION;",
        increment = Counter::Likes.increment(),
    );

    let updated: Option<Video> = db
        .sql(query)
        .bind(("video", video))
        .bind(("user", &user.id))
        .bind(("like", &like.id))
        .bind(("content", &like))
        .fetch_last()
        .await
        .map_err(|error| ServiceError::from_transaction(error, video))?;

    let updated = updated.context(VideoNotFoundSnafu { video: video.key() })?;
    tracing::info!(like = %like.id, likes = updated.likes_count, "registered like");

    Ok(updated.likes_count)
}

/// Removes the like if there is one. The counter only moves when a like was actually removed.
///
/// Returns whether a like was removed.
#[instrument(skip(db, user), fields(user = %user.id))]
pub async fn unlike(user: &User, video: &Record<Video>, db: &Database) -> Result<bool> {
    let query = format!(
        "BEGIN TRANSACTION;
        LET $removed = (DELETE likes WHERE user = $user AND video = $video RETURN BEFORE);
        IF array::len($removed) > 0 {{ {decrement} }};
        RETURN array::len($removed) > 0;
        COMMIT TRANSACTION;",
        decrement = Counter::Likes.decrement(),
    );

    let removed: Option<bool> = db
        .sql(query)
        .bind(("video", video))
        .bind(("user", &user.id))
        .fetch_last()
        .await
        .map_err(|error| ServiceError::from_transaction(error, video))?;

    let removed = removed.unwrap_or(false);
    tracing::info!(removed, "removed like");

    Ok(removed)
}
