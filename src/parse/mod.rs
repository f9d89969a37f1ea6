//! Parsers turning raw model text into structured results.
//!
//! Each parser is defensive around model output variance. Summary, notes and
//! tutor parsing never hard-fail (worst case they pass the raw text
//! through); the quiz parser fails only when zero valid questions survive.

pub mod notes;
pub mod quiz;

pub use notes::{
    assign_section_timestamps, parse_notes_response, NoteSection, NotesResult, MAX_SECTION_CHARS,
};
pub use quiz::{parse_quiz_response, QuizQuestion};

/// Strip a leading `SUMMARY:` label, if the model echoed one, and trim.
pub fn parse_summary_response(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some(prefix) = trimmed.get(.."summary:".len()) {
        if prefix.eq_ignore_ascii_case("summary:") {
            return trimmed[prefix.len()..].trim().to_string();
        }
    }
    trimmed.to_string()
}

/// Tutor answers carry no structure to extract.
pub fn parse_tutor_response(raw: &str) -> String {
    raw.trim().to_string()
}
