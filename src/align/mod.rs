//! Maps key topics from generated summary text onto transcript segments to
//! produce a small set of navigable timestamps.
//!
//! The matching is intentionally approximate: it is a navigation aid, not a
//! content index. The guarantees are monotonically non-decreasing times
//! within the video's duration, nothing more.

use crate::transcript::Transcript;
use serde::{Deserialize, Serialize};

/// Controlled vocabulary used to correlate summary text with segments.
/// Swappable via [`TimestampAligner::with_vocabulary`] so tests can use a
/// minimal deterministic list.
pub const DEFAULT_KEY_TOPICS: &[&str] = &[
    "introduction",
    "overview",
    "getting started",
    "basics",
    "fundamentals",
    "concept",
    "definition",
    "example",
    "demonstration",
    "practice",
    "exercise",
    "advanced",
    "tip",
    "best practice",
    "common mistake",
    "pitfall",
    "summary",
    "conclusion",
    "recap",
    "review",
];

/// Assumed video length when no duration is known.
const FALLBACK_DURATION_SECS: u32 = 18 * 60;

/// Canonical structure used when no transcript exists: percentage of total
/// duration and a static caption per point.
const STRUCTURE_POINTS: &[(f64, &str)] = &[
    (0.05, "Introduction"),
    (0.15, "Overview"),
    (0.30, "Main Concepts"),
    (0.50, "Examples"),
    (0.70, "Advanced Topics"),
    (0.85, "Best Practices"),
    (0.95, "Summary"),
];

const MIN_TIMESTAMPS: usize = 5;
const MAX_TIMESTAMPS: usize = 8;
const MAX_CAPTION_CHARS: usize = 50;

/// A navigable (time, caption) pair. `time` and `seconds` round-trip
/// through [`format_timestamp`] / [`parse_timestamp`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimestampEntry {
    pub time: String,
    pub seconds: u32,
    pub caption: String,
}

impl TimestampEntry {
    fn new(seconds: u32, caption: impl Into<String>) -> Self {
        Self {
            time: format_timestamp(seconds),
            seconds,
            caption: caption.into(),
        }
    }
}

pub struct TimestampAligner {
    vocabulary: Vec<String>,
}

impl Default for TimestampAligner {
    fn default() -> Self {
        Self::new()
    }
}

impl TimestampAligner {
    pub fn new() -> Self {
        Self {
            vocabulary: DEFAULT_KEY_TOPICS.iter().map(|s| s.to_string()).collect(),
        }
    }

    /// Replace the key-topic vocabulary.
    pub fn with_vocabulary(vocabulary: Vec<String>) -> Self {
        Self { vocabulary }
    }

    /// Produce timestamps for a summary. Uses segment matching when a
    /// transcript exists, estimated structural points otherwise.
    pub fn align(
        &self,
        summary: &str,
        transcript: &Transcript,
        video_duration_secs: u32,
    ) -> Vec<TimestampEntry> {
        if transcript.available && !transcript.segments.is_empty() {
            self.align_with_transcript(summary, transcript)
        } else {
            self.estimated_timestamps(summary, video_duration_secs)
        }
    }

    fn align_with_transcript(&self, summary: &str, transcript: &Transcript) -> Vec<TimestampEntry> {
        let topics = self.extract_key_topics(summary);
        let segments = &transcript.segments;

        let target = (segments.len() / 10).clamp(MIN_TIMESTAMPS, MAX_TIMESTAMPS);

        // Keyword-matched candidates first
        let mut picked: Vec<usize> = Vec::new();
        for (i, segment) in segments.iter().enumerate() {
            if picked.len() >= target {
                break;
            }
            let text = segment.text.to_lowercase();
            if topics.iter().any(|t| text.contains(t.as_str())) {
                picked.push(i);
            }
        }

        // Top up with evenly spaced segments across the transcript
        if picked.len() < target {
            let needed = target - picked.len();
            for k in 0..needed {
                let idx = segments.len() * (k + 1) / (needed + 1);
                let idx = idx.min(segments.len() - 1);
                if !picked.contains(&idx) {
                    picked.push(idx);
                }
            }
        }

        let mut entries: Vec<TimestampEntry> = picked
            .into_iter()
            .map(|i| {
                let segment = &segments[i];
                TimestampEntry::new(
                    segment.start_secs as u32,
                    truncate_caption(&segment.text),
                )
            })
            .collect();

        // Dedupe by start time, then order ascending
        entries.sort_by_key(|e| e.seconds);
        entries.dedup_by_key(|e| e.seconds);
        entries
    }

    fn estimated_timestamps(&self, summary: &str, video_duration_secs: u32) -> Vec<TimestampEntry> {
        let duration = if video_duration_secs == 0 {
            FALLBACK_DURATION_SECS
        } else {
            video_duration_secs
        };

        let topics = self.extract_key_topics(summary);

        STRUCTURE_POINTS
            .iter()
            .map(|&(fraction, label)| {
                let seconds = (duration as f64 * fraction) as u32;
                let label_lower = label.to_lowercase();
                let caption = topics
                    .iter()
                    .find(|t| label_lower.contains(t.as_str()) || t.contains(&label_lower))
                    .map(|t| capitalize(t))
                    .unwrap_or_else(|| label.to_string());
                TimestampEntry::new(seconds, caption)
            })
            .collect()
    }

    /// Vocabulary entries that occur in the summary, lowercased.
    fn extract_key_topics(&self, summary: &str) -> Vec<String> {
        let summary_lower = summary.to_lowercase();
        self.vocabulary
            .iter()
            .map(|t| t.to_lowercase())
            .filter(|t| summary_lower.contains(t.as_str()))
            .collect()
    }
}

fn truncate_caption(text: &str) -> String {
    let text = text.trim();
    if text.chars().count() <= MAX_CAPTION_CHARS {
        return text.to_string();
    }
    let cut: String = text.chars().take(MAX_CAPTION_CHARS - 3).collect();
    format!("{}...", cut.trim_end())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Format seconds as `MM:SS`, or `HH:MM:SS` from one hour up.
pub fn format_timestamp(total_secs: u32) -> String {
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    if hours > 0 {
        format!("{:02}:{:02}:{:02}", hours, minutes, seconds)
    } else {
        format!("{:02}:{:02}", minutes, seconds)
    }
}

/// Inverse of [`format_timestamp`]. None for anything else.
pub fn parse_timestamp(time: &str) -> Option<u32> {
    let parts: Vec<&str> = time.split(':').collect();
    match parts.as_slice() {
        [m, s] => {
            let minutes: u32 = m.parse().ok()?;
            let seconds: u32 = s.parse().ok()?;
            (seconds < 60).then_some(minutes * 60 + seconds)
        }
        [h, m, s] => {
            let hours: u32 = h.parse().ok()?;
            let minutes: u32 = m.parse().ok()?;
            let seconds: u32 = s.parse().ok()?;
            (minutes < 60 && seconds < 60).then_some(hours * 3600 + minutes * 60 + seconds)
        }
        _ => None,
    }
}
