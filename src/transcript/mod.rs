pub mod youtube;

pub use youtube::{extract_video_id, YoutubeTranscriptSource};

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// One time-coded caption line, ordered ascending by start time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranscriptSegment {
    pub start_secs: f64,
    pub duration_secs: f64,
    pub text: String,
}

/// A video's caption track. `available` is false when no captions exist;
/// callers must treat that as a normal degraded state, not an error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Transcript {
    pub segments: Vec<TranscriptSegment>,
    pub full_text: String,
    pub available: bool,
    pub error: Option<String>,
}

impl Transcript {
    /// Build an available transcript, cleaning each segment's text and
    /// joining them into `full_text`. Segments that are pure non-speech
    /// annotations ("[Music]", "[Applause]") are dropped.
    pub fn from_segments(segments: Vec<TranscriptSegment>) -> Self {
        let annotation_re = Regex::new(r"\[[^\]]*\]").expect("Invalid regex");

        let cleaned: Vec<TranscriptSegment> = segments
            .into_iter()
            .filter_map(|mut seg| {
                let stripped = annotation_re.replace_all(&seg.text, " ");
                let text = collapse_whitespace(&stripped);
                if text.is_empty() {
                    None
                } else {
                    seg.text = text;
                    Some(seg)
                }
            })
            .collect();

        let full_text = cleaned
            .iter()
            .map(|s| s.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        Self {
            segments: cleaned,
            full_text,
            available: true,
            error: None,
        }
    }

    /// A degraded transcript carrying the failure reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self {
            segments: Vec::new(),
            full_text: String::new(),
            available: false,
            error: Some(reason.into()),
        }
    }
}

/// Collapse runs of whitespace (including newlines) to single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Fetches captions for a video. Implementations never fail: any error is
/// folded into `Transcript::unavailable`.
#[async_trait]
pub trait TranscriptFetcher: Send + Sync {
    async fn fetch(&self, video_id: &str) -> Transcript;
}
