//! Video metadata catalog — the mock backend.
//!
//! The real product would query an API for this; here the catalog is static
//! data (optionally loaded from a JSON file) mirroring what that API returns.
//! A catalog lookup never advances playback state: loading/failure is a
//! display concern for the UI layer.

use crate::error::{AdMomentError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A scheduled ad slot on a video's timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdSpot {
    /// Media URI of the ad clip.
    pub uri: String,
    /// Main-video position (milliseconds) at which the ad cuts in.
    #[serde(rename = "insertAt")]
    pub insert_at: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoMeta {
    pub id: String,
    pub title: String,
    pub uri: String,
    #[serde(default)]
    pub ads: Vec<AdSpot>,
    pub thumbnail: String,
    #[serde(rename = "channelName")]
    pub channel_name: String,
}

pub struct Catalog {
    videos: Vec<VideoMeta>,
}

impl Catalog {
    pub fn new(videos: Vec<VideoMeta>) -> Self {
        Catalog { videos }
    }

    /// The built-in demo catalog served by the mock API.
    pub fn builtin() -> Self {
        let base = "http://140.113.123.22:8080/video";
        let videos = vec![
            VideoMeta {
                id: "0001".to_string(),
                title: "蠟筆小新-第九季-037享受洗澡的樂趣喔".to_string(),
                uri: format!("{}/0001.mp4", base),
                ads: vec![AdSpot {
                    uri: format!("{}/ad_0001.mp4", base),
                    insert_at: 5000,
                }],
                thumbnail: format!("{}/0001.jpg", base),
                channel_name: "Shane Cheung".to_string(),
            },
            VideoMeta {
                id: "0002".to_string(),
                title: "Morning news digest".to_string(),
                uri: format!("{}/0002.mp4", base),
                ads: vec![
                    AdSpot {
                        uri: format!("{}/ad_0001.mp4", base),
                        insert_at: 10_000,
                    },
                    AdSpot {
                        uri: format!("{}/ad_0002.mp4", base),
                        insert_at: 45_000,
                    },
                ],
                thumbnail: format!("{}/0002.jpg", base),
                channel_name: "Daily Desk".to_string(),
            },
            VideoMeta {
                id: "0003".to_string(),
                title: "Ad-free shorts compilation".to_string(),
                uri: format!("{}/0003.mp4", base),
                ads: Vec::new(),
                thumbnail: format!("{}/0003.jpg", base),
                channel_name: "Shane Cheung".to_string(),
            },
        ];
        Catalog::new(videos)
    }

    /// Load a catalog from a JSON array of video metadata.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)?;
        let videos: Vec<VideoMeta> = serde_json::from_str(&data)?;
        Ok(Catalog::new(videos))
    }

    pub fn all(&self) -> &[VideoMeta] {
        &self.videos
    }

    pub fn by_id(&self, id: &str) -> Result<&VideoMeta> {
        self.videos
            .iter()
            .find(|v| v.id == id)
            .ok_or_else(|| AdMomentError::MetadataNotFound(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_catalog_has_videos() {
        let catalog = Catalog::builtin();
        assert!(!catalog.all().is_empty());
    }

    #[test]
    fn by_id_finds_known_video() {
        let catalog = Catalog::builtin();
        let video = catalog.by_id("0001").unwrap();
        assert_eq!(video.ads.len(), 1);
        assert_eq!(video.ads[0].insert_at, 5000);
    }

    #[test]
    fn by_id_reports_unknown_video() {
        let catalog = Catalog::builtin();
        let err = catalog.by_id("9999").unwrap_err();
        assert!(matches!(err, AdMomentError::MetadataNotFound(ref id) if id == "9999"));
    }

    #[test]
    fn video_meta_json_uses_camel_case_fields() {
        let video = Catalog::builtin().by_id("0001").unwrap().clone();
        let json = serde_json::to_string(&video).unwrap();
        assert!(json.contains("\"insertAt\":5000"));
        assert!(json.contains("\"channelName\""));
    }

    #[test]
    fn from_json_file_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        let json = serde_json::to_string(Catalog::builtin().all()).unwrap();
        fs::write(&path, json).unwrap();

        let loaded = Catalog::from_json_file(&path).unwrap();
        assert_eq!(loaded.all().len(), Catalog::builtin().all().len());
        assert_eq!(loaded.by_id("0002").unwrap().ads.len(), 2);
    }
}
