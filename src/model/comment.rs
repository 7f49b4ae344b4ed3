use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User, Video};
use crate::database::Record;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Comment {
    #[new(default)]
    pub id: Record<Comment>,
    #[new(value = "now()")]
    pub created_at: Timestamp,

    pub video: Record<Video>,
    /// Snapshot of the author taken when the comment was written.
    pub user: User,
    pub content: String,
}

crate::define_table!("comments" : Comment);

crate::define_relation! {
    Comment > for_video(video: &Record<Video>) > Vec<Comment>
        where "SELECT * FROM comments WHERE video = $video ORDER BY created_at DESC"
}

crate::define_relation! {
    Comment > get(id: &Record<Comment>) > Option<Comment>
        where "SELECT * FROM $id"
}
