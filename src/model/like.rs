use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User, Video};
use crate::database::Record;

/// Membership of a user in the like ledger of a video. The storage layer keeps at most one per (user, video).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, new)]
pub struct Like {
    #[new(default)]
    pub id: Record<Like>,
    #[new(value = "now()")]
    pub created_at: Timestamp,

    pub user: Record<User>,
    pub video: Record<Video>,
}

crate::define_table!("likes" : Like);

crate::define_relation! {
    Like > find(user: &Record<User>, video: &Record<Video>) > Option<Like>
        where "SELECT * FROM likes WHERE user = $user AND video = $video LIMIT 1"
}

crate::define_relation! {
    Like > for_video(video: &Record<Video>) > Vec<Like>
        where "SELECT * FROM likes WHERE video = $video ORDER BY created_at DESC"
}
