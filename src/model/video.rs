use derive_new::new;
use serde::{Deserialize, Serialize};

use super::{now, Timestamp, User};
use crate::database::Record;

pub const VIDEO_HEIGHT: u32 = 1920;
pub const VIDEO_WIDTH: u32 = 1080;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize, new)]
pub struct Video {
    #[new(default)]
    pub id: Record<Video>,
    #[new(value = "now()")]
    pub created_at: Timestamp,

    pub owner: Record<User>,
    pub title: String,
    pub description: String,
    pub video_url: String,
    pub thumbnail_url: String,
    #[serde(default = "default_controls")]
    pub controls: bool,
    #[serde(default)]
    pub transformation: Transformation,

    #[new(default)]
    #[serde(default)]
    pub likes_count: u64,
    #[new(default)]
    #[serde(default)]
    pub comments_count: u64,
}

crate::define_table!("videos" : Video);

crate::define_relation! {
    Video > feed() > Vec<Video>
        where "SELECT * FROM videos ORDER BY created_at DESC"
}

crate::define_relation! {
    Video > get(id: &Record<Video>) > Option<Video>
        where "SELECT * FROM $id"
}

fn default_controls() -> bool {
    true
}

/// How the CDN should render the video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Transformation {
    pub height: u32,
    pub width: u32,
    #[serde(default)]
    pub quality: Option<u8>,
}

impl Default for Transformation {
    fn default() -> Self {
        Self {
            height: VIDEO_HEIGHT,
            width: VIDEO_WIDTH,
            quality: None,
        }
    }
}

/// What an uploader submits once the media is on the CDN.
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoDraft {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub video_url: String,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub controls: Option<bool>,
    #[serde(default)]
    pub transformation: Option<Transformation>,
}

impl VideoDraft {
    /// The CDN can derive a poster frame from the video itself.
    pub fn thumbnail_or_default(&self) -> String {
        match &self.thumbnail_url {
            Some(url) if !url.trim().is_empty() => url.trim().to_string(),
            _ => format!("{}?tr=f-image", self.video_url.trim()),
        }
    }
}
