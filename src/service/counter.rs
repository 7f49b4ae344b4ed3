//! Maintenance of the ledger counters cached on a video.
//!
//! Every change is a single `UPDATE` statement so the database applies it atomically. The decrement is conditional
//! (`WHERE field > 0`), which makes it `max(old - 1, 0)` without reading the value first. Neither statement touches a
//! video that does not exist. The statements expect the video id in `$video` and are meant to be embedded in the
//! transactions of the like and comment services.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Counter {
    Likes,
    Comments,
}

impl Counter {
    pub const fn increment(self) -> &'static str {
        match self {
            Self::Likes => "UPDATE $video SET likes_count += 1 WHERE likes_count != NONE RETURN AFTER",
            Self::Comments => {
                "UPDATE $video SET comments_count += 1 WHERE comments_count != NONE RETURN AFTER"
            }
        }
    }

    pub const fn decrement(self) -> &'static str {
        match self {
            Self::Likes => "UPDATE $video SET likes_count -= 1 WHERE likes_count > 0 RETURN AFTER",
            Self::Comments => {
                "UPDATE $video SET comments_count -= 1 WHERE comments_count > 0 RETURN AFTER"
            }
        }
    }
}
