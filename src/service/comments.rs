use snafu::{ensure, OptionExt as _};
use tracing::instrument;

use super::{Counter, EmptyFieldSnafu, Result, ServiceError, VideoNotFoundSnafu, VIDEO_NOT_FOUND};
use crate::database::{Database, Record};
use crate::model::{Comment, User, Video};

/// Comments on `video`, newest first.
#[instrument(skip(db))]
pub async fn list(video: &Record<Video>, db: &Database) -> Result<Vec<Comment>> {
    let comments = Comment::for_video(video, db).await?;
    Ok(comments)
}

/// Stores a comment and bumps the counter in one transaction.
///
/// Returns the stored comment together with the new comment count.
#[instrument(skip(db, user, text), fields(user = %user.id))]
pub async fn create(
    user: &User,
    video: &Record<Video>,
    text: &str,
    db: &Database,
) -> Result<(Comment, u64)> {
    let content = text.trim();
    ensure!(!content.is_empty(), EmptyFieldSnafu { field: "content" });

    let comment = Comment::new(video.clone(), user.clone(), content.to_string());

    let query = format!(
        "BEGIN TRANSACTION;
        LET $found = (SELECT id FROM $video);
        IF array::len($found) = 0 {{ THROW '{VIDEO_NOT_FOUND}' }};
        CREATE $comment CONTENT $content;
        {increment};
        COMMIT TRANSACTION;",
        increment = Counter::Comments.increment(),
    );

    let updated: Option<Video> = db
        .sql(query)
        .bind(("video", video))
        .bind(("comment", &comment.id))
        .bind(("content", &comment))
        .fetch_last()
        .await
        .map_err(|error| ServiceError::from_transaction(error, video))?;

    let updated = updated.context(VideoNotFoundSnafu { video: video.key() })?;
    tracing::info!(comment = %comment.id, comments = updated.comments_count, "added comment");

    Ok((comment, updated.comments_count))
}

/// Deletes a comment written by `user` on `video`.
///
/// Returns whether anything was deleted. Someone else's comment, or one on another video, is left alone and the
/// counter does not move.
#[instrument(skip(db, user), fields(user = %user.id))]
pub async fn delete(
    user: &User,
    video: &Record<Video>,
    comment: &Record<Comment>,
    db: &Database,
) -> Result<bool> {
    let query = format!(
        "BEGIN TRANSACTION;
        LET $removed = (DELETE $comment WHERE user.id = $user AND video = $video RETURN BEFORE);
        IF array::len($removed) > 0 {{ {decrement} }};
        RETURN array::len($removed) > 0;
        COMMIT TRANSACTION;",
        decrement = Counter::Comments.decrement(),
    );

    let removed: Option<bool> = db
        .sql(query)
        .bind(("video", video))
        .bind(("comment", comment))
        .bind(("user", &user.id))
        .fetch_last()
        .await
        .map_err(|error| ServiceError::from_transaction(error, video))?;

    let removed = removed.unwrap_or(false);
    tracing::info!(removed, "deleted comment");

    Ok(removed)
}
