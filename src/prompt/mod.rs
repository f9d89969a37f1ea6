//! Prompt construction per content type.
//!
//! All builders are pure functions. Output-format instructions are rigid on
//! purpose: the response parsers rely on positional and regex matching, not
//! a general-purpose parser.

use crate::config::NotesFormat;
use crate::transcript::Transcript;

/// Transcripts longer than this are condensed before prompt embedding.
pub const MAX_TRANSCRIPT_CHARS: usize = 50_000;

/// Target size of one sentence-boundary chunk when condensing.
const CHUNK_TARGET_CHARS: usize = 10_000;

/// Transcripts shorter than this carry too little signal to summarize from.
const MIN_TRANSCRIPT_CHARS: usize = 50;

const TRUNCATION_NOTE: &str = "\n\n[Note: the transcript above is truncated. \
Still cover the full video scope, inferring later topics from the title and description.]";

/// A transcript usable as prompt material, or None when absent/too short.
fn usable_transcript(transcript: &Transcript) -> Option<&str> {
    if transcript.available && transcript.full_text.len() >= MIN_TRANSCRIPT_CHARS {
        Some(&transcript.full_text)
    } else {
        None
    }
}

pub fn summary_prompt(title: &str, description: &str, transcript: &Transcript) -> String {
    match usable_transcript(transcript) {
        Some(text) => format!(
            r#"You are an expert educator. Write a structured summary of this video for a student.

VIDEO TITLE: {title}
VIDEO DESCRIPTION: {description}

TRANSCRIPT:
{transcript}

Write a 200-400 word summary in markdown. Cover the main ideas in the order the video presents them, name the key topics explicitly, and end with the takeaway a student should remember. Output ONLY the summary text."#,
            transcript = condense_transcript(text),
        ),
        None => format!(
            r#"You are an expert educator. No transcript is available for this video, so infer its content from the title and description alone. Do not mention the missing transcript or refuse.

VIDEO TITLE: {title}
VIDEO DESCRIPTION: {description}

Write a 200-400 word summary in markdown of what this video most plausibly covers, naming the key topics explicitly. Output ONLY the summary text."#,
        ),
    }
}

pub fn quiz_prompt(source_text: &str, question_count: usize) -> String {
    format!(
        r#"Create {question_count} multiple-choice questions testing understanding of this material:

{source_text}

Format EVERY question EXACTLY like this, with no extra text before, between, or after:

QUESTION 1:
<the question>
A) <option>
B) <option>
C) <option>
D) <option>
CORRECT: <letter A-D>
EXPLANATION: <one sentence explaining the correct answer>

Number questions sequentially. Each question must have exactly 4 options and exactly one correct answer."#,
    )
}

pub fn notes_prompt(
    title: &str,
    description: &str,
    transcript: &Transcript,
    format: NotesFormat,
) -> String {
    let structure = match format {
        NotesFormat::Bullet => {
            "Write flat bullet-point notes: one '- ' bullet per fact or idea, no headers, no nesting."
        }
        NotesFormat::Outline => {
            "Write outline notes in markdown: a '## ' header for each major section, \
followed by numbered points (1., 2., ...) under it."
        }
        NotesFormat::Detailed => {
            "Write detailed study notes in markdown: a '## ' header for each major section, \
followed by short explanatory prose paragraphs under it."
        }
    };

    let source = match usable_transcript(transcript) {
        Some(text) => format!("TRANSCRIPT:\n{}", condense_transcript(text)),
        None => "No transcript is available; infer the content from the title and description."
            .to_string(),
    };

    format!(
        r#"You are an expert note-taker. Produce study notes for this video.

VIDEO TITLE: {title}
VIDEO DESCRIPTION: {description}

{source}

{structure}

Output ONLY the notes."#,
    )
}

pub fn tutor_prompt(
    title: &str,
    description: &str,
    transcript: &Transcript,
    summary: Option<&str>,
    question: &str,
) -> String {
    let mut context = format!("VIDEO TITLE: {title}\nVIDEO DESCRIPTION: {description}\n");

    if let Some(summary) = summary {
        context.push_str(&format!("\nVIDEO SUMMARY:\n{summary}\n"));
    }

    if let Some(text) = usable_transcript(transcript) {
        context.push_str(&format!("\nTRANSCRIPT:\n{}\n", condense_transcript(text)));
    }

    format!(
        r#"You are a patient tutor helping a student who is studying the video below.

{context}
STUDENT QUESTION: {question}

Answer the question directly and concretely, grounding your answer in the video content above where possible. If the video does not cover the question, say so and answer from general knowledge."#,
    )
}

/// Tutor prompt with no video context at all.
pub fn general_tutor_prompt(question: &str) -> String {
    format!(
        r#"You are a patient tutor. Answer the student's question directly and concretely, with a short example where it helps.

STUDENT QUESTION: {question}"#,
    )
}

/// Reduce an oversized transcript below [`MAX_TRANSCRIPT_CHARS`]: split on
/// sentence boundaries into chunks, keep the whole text when it fits, else
/// keep a prefix of chunks plus an explicit truncation note.
pub fn condense_transcript(text: &str) -> String {
    if text.len() <= MAX_TRANSCRIPT_CHARS {
        return text.to_string();
    }

    let budget = MAX_TRANSCRIPT_CHARS - TRUNCATION_NOTE.len();
    let mut kept = String::with_capacity(budget);

    for chunk in sentence_chunks(text, CHUNK_TARGET_CHARS) {
        if kept.len() + chunk.len() > budget {
            break;
        }
        kept.push_str(chunk);
    }

    // A pathological single run with no sentence boundary inside the budget:
    // fall back to a char-boundary cut.
    if kept.is_empty() {
        let cut = text
            .char_indices()
            .map(|(i, _)| i)
            .take_while(|&i| i <= budget)
            .last()
            .unwrap_or(0);
        kept.push_str(&text[..cut]);
    }

    kept.push_str(TRUNCATION_NOTE);
    kept
}

/// Split text into chunks of roughly `target` bytes, cutting only after
/// sentence-ending punctuation.
fn sentence_chunks(text: &str, target: usize) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut chunk_start = 0;
    let mut last_cut = None;

    for (i, c) in text.char_indices() {
        if matches!(c, '.' | '!' | '?') {
            last_cut = Some(i + c.len_utf8());
        }
        if i - chunk_start >= target {
            if let Some(cut) = last_cut.filter(|&cut| cut > chunk_start) {
                chunks.push(&text[chunk_start..cut]);
                chunk_start = cut;
                last_cut = None;
            }
        }
    }

    if chunk_start < text.len() {
        chunks.push(&text[chunk_start..]);
    }

    chunks
}
