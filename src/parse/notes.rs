//! Notes section parser.
//!
//! Splits model output into titled sections on markdown `##` headers,
//! roman-numeral markers (`II.`) or capital-letter markers (`B.`). Content
//! with no headers at all becomes one section titled "Notes". Oversized
//! sections are repartitioned into ordered parts, never truncated.

use crate::config::NotesFormat;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// Hard cap on one section's content.
pub const MAX_SECTION_CHARS: usize = 10_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NoteSection {
    pub title: String,
    pub content: String,
    pub timestamp_secs: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotesResult {
    /// Full markdown as the model produced it (trimmed).
    pub content: String,
    pub format: NotesFormat,
    pub sections: Vec<NoteSection>,
}

/// Parse raw model text into sectioned notes. Never fails.
pub fn parse_notes_response(raw: &str, format: NotesFormat) -> NotesResult {
    let content = raw.trim().to_string();

    let header_re =
        Regex::new(r"^(?:#{2,}\s+(.+)|([IVXLC]+)\.\s+(.+)|([A-Z])\.\s+(.+))$").expect("Invalid regex");

    let mut sections: Vec<(String, String)> = Vec::new();
    let mut current: Option<(String, String)> = None;

    for line in content.lines() {
        let header = header_re.captures(line.trim()).map(|cap| {
            cap.get(1)
                .or(cap.get(3))
                .or(cap.get(5))
                .map(|m| m.as_str().trim().to_string())
                .unwrap_or_default()
        });

        match header {
            Some(title) => {
                if let Some(section) = current.take() {
                    sections.push(section);
                }
                current = Some((title, String::new()));
            }
            None => {
                if let Some((_, body)) = current.as_mut() {
                    body.push_str(line);
                    body.push('\n');
                } else if !line.trim().is_empty() {
                    // Text before the first header opens an untitled section
                    current = Some(("Notes".to_string(), format!("{}\n", line)));
                }
            }
        }
    }
    if let Some(section) = current.take() {
        sections.push(section);
    }

    if sections.is_empty() {
        sections.push(("Notes".to_string(), content.clone()));
    }

    let sections = sections
        .into_iter()
        .flat_map(|(title, body)| split_oversized(title, body.trim_end().to_string()))
        .map(|(title, content)| NoteSection {
            title,
            content,
            timestamp_secs: 0,
        })
        .collect();

    NotesResult {
        content,
        format,
        sections,
    }
}

/// Assign an estimated timestamp to each section, spread evenly across the
/// video. A navigation aid only.
pub fn assign_section_timestamps(sections: &mut [NoteSection], video_duration_secs: u32) {
    let count = sections.len() as u32;
    if count == 0 {
        return;
    }
    for (i, section) in sections.iter_mut().enumerate() {
        section.timestamp_secs = video_duration_secs * i as u32 / count;
    }
}

/// Split content over the cap into ordered parts with zero character loss:
/// concatenating the parts reproduces the input exactly.
fn split_oversized(title: String, content: String) -> Vec<(String, String)> {
    if content.len() <= MAX_SECTION_CHARS {
        return vec![(title, content)];
    }

    let mut parts: Vec<String> = Vec::new();
    let mut rest = content.as_str();

    while rest.len() > MAX_SECTION_CHARS {
        let window_end = floor_char_boundary(rest, MAX_SECTION_CHARS);
        // Prefer cutting after the last newline in the window so parts stay
        // readable; the separator stays with the left part.
        let cut = rest[..window_end]
            .rfind('\n')
            .map(|i| i + 1)
            .filter(|&i| i > 0)
            .unwrap_or(window_end);
        parts.push(rest[..cut].to_string());
        rest = &rest[cut..];
    }
    if !rest.is_empty() {
        parts.push(rest.to_string());
    }

    parts
        .into_iter()
        .enumerate()
        .map(|(i, part)| {
            let part_title = if i == 0 {
                title.clone()
            } else {
                format!("{} (Part {})", title, i + 1)
            };
            (part_title, part)
        })
        .collect()
}

fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    let mut i = index;
    while !s.is_char_boundary(i) {
        i -= 1;
    }
    i
}
