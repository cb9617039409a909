use std::fmt;

use serde::{Deserialize, Serialize};

/// Where the backend is with a chapter's video.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    #[default]
    None,
    Uploading,
    Ready,
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetStatus::None => write!(f, "none"),
            AssetStatus::Uploading => write!(f, "uploading"),
            AssetStatus::Ready => write!(f, "ready"),
        }
    }
}

/// The parts of a chapter this client reads.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    #[serde(rename = "_id")]
    pub id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub chapter_number: Option<u32>,
    #[serde(default)]
    pub video_url: Option<String>,
    #[serde(default)]
    pub video_duration: Option<u64>,
    #[serde(default)]
    pub video_status: AssetStatus,
}

/// Body of the finalize `PATCH`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterVideoUpdate {
    /// The remote asset id.
    pub video_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub video_duration: Option<u64>,
}

/// `GET /admin/chapters/{id}` answers with the chapter or with `{ chapter }`.
#[derive(Deserialize)]
#[serde(untagged)]
pub(crate) enum ChapterData {
    Wrapped { chapter: Chapter },
    Bare(Chapter),
}

impl From<ChapterData> for Chapter {
    fn from(data: ChapterData) -> Self {
        match data {
            ChapterData::Wrapped { chapter } | ChapterData::Bare(chapter) => chapter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_defaults_to_none() {
        let chapter: Chapter = serde_json::from_str(r#"{"_id":"c1","title":"Intro"}"#).unwrap();
        assert_eq!(chapter.video_status, AssetStatus::None);
        assert_eq!(chapter.video_url, None);
    }

    #[test]
    fn reads_both_shapes() {
        let bare: ChapterData =
            serde_json::from_str(r#"{"_id":"c1","videoStatus":"ready","videoUrl":"uid"}"#).unwrap();
        let wrapped: ChapterData =
            serde_json::from_str(r#"{"chapter":{"_id":"c1","videoStatus":"ready","videoUrl":"uid"}}"#)
                .unwrap();
        assert_eq!(Chapter::from(bare), Chapter::from(wrapped));
    }

    #[test]
    fn update_omits_unknown_duration() {
        let update = ChapterVideoUpdate {
            video_url: "uid".to_string(),
            video_duration: None,
        };
        assert_eq!(serde_json::to_string(&update).unwrap(), r#"{"videoUrl":"uid"}"#);
    }
}
