//! Quiz grammar parser.
//!
//! The prompt demands a rigid `QUESTION N:` / `A)`-`D)` / `CORRECT:` /
//! `EXPLANATION:` grammar so this parser can use line-oriented regex
//! matching. Blocks that do not validate are dropped silently; fewer
//! questions than requested is tolerated and never retried.

use crate::error::{Result, StudyError};
use crate::provider::ContentType;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizQuestion {
    pub question: String,
    /// Always exactly 4 entries.
    pub options: Vec<String>,
    /// Zero-based index into `options`.
    pub correct_answer: usize,
    pub explanation: String,
}

/// Parse raw model text into validated quiz questions.
///
/// Returns `StudyError::Parse` only when zero questions survive validation;
/// an empty quiz is not a useful result.
pub fn parse_quiz_response(raw: &str) -> Result<Vec<QuizQuestion>> {
    let block_re = Regex::new(r"(?mi)^\s*QUESTION\s+\d+\s*:").expect("Invalid regex");

    let mut questions = Vec::new();
    let mut dropped = 0usize;

    for block in block_re.split(raw).skip(1) {
        match parse_block(block) {
            Some(q) => questions.push(q),
            None => dropped += 1,
        }
    }

    if dropped > 0 {
        debug!("Dropped {} malformed quiz blocks", dropped);
    }

    if questions.is_empty() {
        return Err(StudyError::Parse {
            kind: ContentType::Quiz,
            reason: "no valid questions found in model output".to_string(),
        });
    }

    Ok(questions)
}

/// Parse one question block; None when any required piece is missing.
fn parse_block(block: &str) -> Option<QuizQuestion> {
    // Letter then ')' or '.' or bare whitespace; a plain word like "About"
    // must not match.
    let option_re = Regex::new(r"^([A-D])(?:[\)\.]|\s)\s*(.+)$").expect("Invalid regex");
    let correct_re =
        Regex::new(r"(?i)^(?:CORRECT|ANSWER)\s*:?\s*([A-D])\b").expect("Invalid regex");
    let explanation_re = Regex::new(r"(?i)^EXPLANATION\s*:?\s*(.*)$").expect("Invalid regex");

    let mut question = String::new();
    let mut options: Vec<String> = Vec::new();
    let mut correct: Option<usize> = None;
    let mut explanation = String::new();

    for line in block.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        // The first non-empty line is the question text, unconditionally;
        // otherwise a question starting with a bare "A " would be taken for
        // an option.
        if question.is_empty() {
            question = line.to_string();
            continue;
        }

        if let Some(cap) = option_re.captures(line) {
            if options.len() < 4 {
                options.push(cap[2].trim().to_string());
            }
            continue;
        }

        if let Some(cap) = correct_re.captures(line) {
            let letter = cap[1].to_uppercase().chars().next()?;
            correct = Some((letter as u8 - b'A') as usize);
            continue;
        }

        if let Some(cap) = explanation_re.captures(line) {
            explanation = cap[1].trim().to_string();
        }
    }

    let correct = correct?;

    // Invariant: exactly 4 options and a correct index inside them
    if question.is_empty() || options.len() != 4 || correct >= options.len() {
        return None;
    }

    Some(QuizQuestion {
        question,
        options,
        correct_answer: correct,
        explanation,
    })
}
