//! Caption fetch via YouTube's timedtext endpoint.

use crate::transcript::{Transcript, TranscriptFetcher, TranscriptSegment};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

const TIMEDTEXT_URL: &str = "https://www.youtube.com/api/timedtext";

/// Request timeout for caption fetches.
const FETCH_TIMEOUT: Duration = Duration::from_secs(30);

/// Fetches caption tracks over HTTP. Tries each configured language in
/// order and degrades to an unavailable transcript when none yields text.
pub struct YoutubeTranscriptSource {
    client: reqwest::Client,
    base_url: String,
    languages: Vec<String>,
}

impl YoutubeTranscriptSource {
    pub fn new(languages: Vec<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .unwrap_or_default();

        Self {
            client,
            base_url: TIMEDTEXT_URL.to_string(),
            languages,
        }
    }

    /// Override the endpoint, for tests against a local mock server.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    async fn fetch_language(
        &self,
        video_id: &str,
        lang: &str,
    ) -> Result<Vec<TranscriptSegment>, String> {
        let url = format!("{}?v={}&lang={}&fmt=json3", self.base_url, video_id, lang);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| format!("caption request failed: {}", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(format!("caption endpoint returned {}", status));
        }

        let body: TimedTextResponse = response
            .json()
            .await
            .map_err(|e| format!("caption decode failed: {}", e))?;

        let segments = body
            .events
            .into_iter()
            .filter_map(|event| {
                let text = event
                    .segs?
                    .into_iter()
                    .filter_map(|seg| seg.utf8)
                    .collect::<Vec<_>>()
                    .join("");
                if text.trim().is_empty() {
                    return None;
                }
                Some(TranscriptSegment {
                    // Offsets arrive in milliseconds
                    start_secs: event.start_ms as f64 / 1000.0,
                    duration_secs: event.duration_ms as f64 / 1000.0,
                    text,
                })
            })
            .collect();

        Ok(segments)
    }
}

#[async_trait]
impl TranscriptFetcher for YoutubeTranscriptSource {
    async fn fetch(&self, video_id: &str) -> Transcript {
        let mut last_error = "no caption track found".to_string();

        for lang in &self.languages {
            debug!("Fetching captions for {} lang={}", video_id, lang);
            match self.fetch_language(video_id, lang).await {
                Ok(segments) if !segments.is_empty() => {
                    debug!(
                        "Got {} caption segments for {} ({})",
                        segments.len(),
                        video_id,
                        lang
                    );
                    return Transcript::from_segments(segments);
                }
                Ok(_) => {
                    debug!("Empty caption track for {} lang={}", video_id, lang);
                }
                Err(e) => {
                    warn!("Caption fetch failed for {} lang={}: {}", video_id, lang, e);
                    last_error = e;
                }
            }
        }

        Transcript::unavailable(last_error)
    }
}

// timedtext json3 payload

#[derive(Deserialize)]
struct TimedTextResponse {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Deserialize)]
struct TimedTextEvent {
    #[serde(rename = "tStartMs", default)]
    start_ms: u64,
    #[serde(rename = "dDurationMs", default)]
    duration_ms: u64,
    segs: Option<Vec<TimedTextSeg>>,
}

#[derive(Deserialize)]
struct TimedTextSeg {
    utf8: Option<String>,
}

/// Extract an 11-character video id from a watch URL, a short URL, or a
/// bare id.
pub fn extract_video_id(input: &str) -> Option<String> {
    if let Some(v_param) = input.split("v=").nth(1) {
        return Some(v_param.split('&').next().unwrap_or(v_param).to_string());
    }
    if let Some(short) = input.split("youtu.be/").nth(1) {
        return Some(short.split('?').next().unwrap_or(short).to_string());
    }
    if input.len() == 11
        && input
            .chars()
            .all(|c| c.is_alphanumeric() || c == '_' || c == '-')
    {
        return Some(input.to_string());
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_video_id_variants() {
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=10s").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("https://youtu.be/dQw4w9WgXcQ?si=abc").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(
            extract_video_id("dQw4w9WgXcQ").as_deref(),
            Some("dQw4w9WgXcQ")
        );
        assert_eq!(extract_video_id("not a video"), None);
    }

    #[test]
    fn test_timedtext_decode() {
        let body = r#"{
            "events": [
                {"tStartMs": 0, "dDurationMs": 3000, "segs": [{"utf8": "Welcome "}, {"utf8": "back"}]},
                {"tStartMs": 3000, "dDurationMs": 2000},
                {"tStartMs": 5000, "dDurationMs": 1500, "segs": [{"utf8": "\n"}]}
            ]
        }"#;

        let parsed: TimedTextResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.events.len(), 3);
        assert_eq!(parsed.events[0].start_ms, 0);
        assert_eq!(parsed.events[0].duration_ms, 3000);
    }

    #[tokio::test]
    async fn test_fetch_degrades_on_unreachable_endpoint() {
        // Port 9 is discard; the request fails fast and the source must
        // degrade rather than error.
        let source = YoutubeTranscriptSource::new(vec!["en".to_string()])
            .with_base_url("http://127.0.0.1:9/api/timedtext");

        let transcript = source.fetch("dQw4w9WgXcQ").await;
        assert!(!transcript.available);
        assert!(transcript.error.is_some());
        assert!(transcript.segments.is_empty());
    }
}
