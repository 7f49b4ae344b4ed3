//! The like and comment ledgers, and the video catalog whose counters they maintain.
//!
//! Identity is resolved before reaching this layer; every operation receives the acting [User](crate::model::User)
//! explicitly.

use snafu::Snafu;

use crate::database::{DatabaseQueryError, Record, Violation};
use crate::model::Video;

pub mod comments;
pub mod counter;
pub mod likes;
pub mod videos;

pub use counter::Counter;

/// Raised by a transaction when the video it refers to does not exist.
const VIDEO_NOT_FOUND: &str = "video_not_found";

/// Raised by the like transaction when the pre-check finds an existing like.
const ALREADY_LIKED: &str = "already_liked";

pub type Result<T, E = ServiceError> = std::result::Result<T, E>;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ServiceError {
    #[snafu(display("video `{video}` does not exist"))]
    VideoNotFound { video: String },

    #[snafu(display("video `{video}` has already been liked by this user"))]
    AlreadyLiked { video: String },

    #[snafu(display("{field} must not be empty"))]
    EmptyField { field: &'static str },

    #[snafu(display("quality must be between 1 and 100, got {quality}"))]
    InvalidQuality { quality: u8 },

    #[snafu(transparent)]
    Database { source: DatabaseQueryError },
}

impl ServiceError {
    /// Turns the failures a ledger transaction raises on purpose back into their domain errors.
    fn from_transaction(error: DatabaseQueryError, video: &Record<Video>) -> Self {
        match error.violation() {
            Some(violation) if violation.is_thrown(VIDEO_NOT_FOUND) => Self::VideoNotFound {
                video: video.key(),
            },
            Some(Violation::UniqueIndex) => Self::AlreadyLiked { video: video.key() },
            Some(violation) if violation.is_thrown(ALREADY_LIKED) => {
                Self::AlreadyLiked { video: video.key() }
            }
            _ => Self::Database { source: error },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::Database;
    use crate::model::Like;
    use crate::service::videos::tests::{member, publish_sample};

    #[tokio::test]
    async fn second_like_row_trips_the_unique_index() {
        let db = Database::memory().await.unwrap();
        let alice = member("alice");
        let video = publish_sample(&alice, &db).await;

        let insert = |like: Like| {
            let db = &db;
            async move {
                db.sql("CREATE $id CONTENT $like")
                    .bind(("id", &like.id))
                    .bind(("like", &like))
                    .execute()
                    .await
            }
        };

        insert(Like::new(alice.id.clone(), video.id.clone()))
            .await
            .unwrap();

        let Err(error) = insert(Like::new(alice.id.clone(), video.id.clone())).await else {
            panic!("a second like row for the same user and video should be rejected");
        };

        assert_eq!(error.violation(), Some(Violation::UniqueIndex));
        assert!(matches!(
            ServiceError::from_transaction(error, &video.id),
            ServiceError::AlreadyLiked { .. }
        ));
    }

    #[tokio::test]
    async fn unclassified_failures_stay_database_errors() {
        let db = Database::memory().await.unwrap();
        let video = Record::<Video>::new("ghost".to_string());

        let Err(error) = db.sql("THROW 'something_else'").execute().await else {
            panic!("a THROW statement should fail the query");
        };

        assert!(matches!(
            ServiceError::from_transaction(error, &video),
            ServiceError::Database { .. }
        ));
    }
}
