//! End-to-end orchestrator tests with a scripted provider and a static
//! transcript fetcher; no network involved.

use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vidstudy::cache::MemoryCache;
use vidstudy::config::{Config, NotesFormat, Provider};
use vidstudy::error::{Result, StudyError};
use vidstudy::orchestrator::{ContentOrchestrator, GenerationRequest};
use vidstudy::provider::{ContentType, ProviderClient};
use vidstudy::transcript::{Transcript, TranscriptFetcher, TranscriptSegment};

const QUIZ_TEXT: &str = "\
QUESTION 1:
What topic does the course open with?
A) Ownership
B) Macros
C) Unsafe code
D) Build scripts
CORRECT: A
EXPLANATION: The course opens with ownership.

QUESTION 2:
What follows the examples?
A) Nothing
B) A summary
C) A quiz
D) Credits
CORRECT: B
EXPLANATION: A summary wraps up the video.

QUESTION 3:
How many options does each question have?
A) Two
B) Three
C) Four
D) Five
CORRECT: C
EXPLANATION: Each question carries four options.
";

const NOTES_TEXT: &str = "\
## Ownership
Every value has one owner.

## Borrowing
References do not own.
";

/// Fetcher returning a fixed transcript.
struct StaticFetcher {
    transcript: Transcript,
}

#[async_trait]
impl TranscriptFetcher for StaticFetcher {
    async fn fetch(&self, _video_id: &str) -> Transcript {
        self.transcript.clone()
    }
}

/// Provider returning canned text per content type, recording every prompt.
struct ScriptedProvider {
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
    quiz_text: String,
}

#[async_trait]
impl ProviderClient for ScriptedProvider {
    async fn generate(&self, prompt: &str, content_type: ContentType) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.prompts
            .lock()
            .unwrap()
            .push(prompt.to_string());

        Ok(match content_type {
            ContentType::Summary => {
                "SUMMARY: The course walks through examples and ends with a summary.".to_string()
            }
            ContentType::Quiz => self.quiz_text.clone(),
            ContentType::Notes => NOTES_TEXT.to_string(),
            ContentType::Tutor => "  A direct answer.  ".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "Scripted"
    }
}

/// Provider failing every call with a 500.
struct FailingProvider;

#[async_trait]
impl ProviderClient for FailingProvider {
    async fn generate(&self, _prompt: &str, _content_type: ContentType) -> Result<String> {
        Err(StudyError::Provider {
            provider: Provider::Gemini,
            status: Some(500),
            message: "server exploded".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "Failing"
    }
}

struct Harness {
    orchestrator: ContentOrchestrator,
    calls: Arc<AtomicUsize>,
    prompts: Arc<Mutex<Vec<String>>>,
}

fn harness(transcript: Transcript) -> Harness {
    harness_with_quiz(transcript, QUIZ_TEXT)
}

fn harness_with_quiz(transcript: Transcript, quiz_text: &str) -> Harness {
    let calls = Arc::new(AtomicUsize::new(0));
    let prompts = Arc::new(Mutex::new(Vec::new()));

    let factory_calls = calls.clone();
    let factory_prompts = prompts.clone();
    let quiz_text = quiz_text.to_string();

    let orchestrator = ContentOrchestrator::new(Config::default())
        .with_fetcher(Box::new(StaticFetcher { transcript }))
        .with_cache(Box::new(MemoryCache::new()))
        .with_provider_factory(move |_, _| {
            Ok(Box::new(ScriptedProvider {
                calls: factory_calls.clone(),
                prompts: factory_prompts.clone(),
                quiz_text: quiz_text.clone(),
            }))
        });

    Harness {
        orchestrator,
        calls,
        prompts,
    }
}

fn seg(start: f64, text: &str) -> TranscriptSegment {
    TranscriptSegment {
        start_secs: start,
        duration_secs: 5.0,
        text: text.to_string(),
    }
}

fn sample_transcript() -> Transcript {
    Transcript::from_segments(vec![
        seg(0.0, "Welcome to the course and its many interesting parts"),
        seg(30.0, "Let's look at examples"),
        seg(600.0, "In summary, remember the key points"),
    ])
}

fn request() -> GenerationRequest {
    let mut request = GenerationRequest::new("dQw4w9WgXcQ", Provider::Gemini);
    request.title = "Rust Ownership".to_string();
    request.description = "A tour of the borrow checker".to_string();
    request.video_duration_secs = 660;
    request
}

#[tokio::test]
async fn summary_with_transcript_aligns_matching_segments() {
    let h = harness(sample_transcript());

    let result = h.orchestrator.generate_summary(&request()).await.unwrap();

    // Label stripped by the parser
    assert!(result.content.starts_with("The course walks"));

    // Segments mentioning "examples" and "summary" must appear, ascending
    assert!(result.timestamps.iter().any(|t| t.seconds == 30));
    assert!(result.timestamps.iter().any(|t| t.seconds == 600));
    for window in result.timestamps.windows(2) {
        assert!(window[0].seconds <= window[1].seconds);
    }
}

#[tokio::test]
async fn summary_without_transcript_still_succeeds() {
    let h = harness(Transcript::unavailable("captions disabled"));

    let result = h.orchestrator.generate_summary(&request()).await.unwrap();

    assert!(!result.content.is_empty());
    // Estimated 7-point structure within the video duration
    assert_eq!(result.timestamps.len(), 7);
    for t in &result.timestamps {
        assert!(t.seconds <= 660);
    }

    // The prompt fell back to title/description-only
    let prompts = h.prompts.lock().unwrap();
    assert!(prompts[0].contains("title and description alone"));
}

#[tokio::test]
async fn summary_is_cached_per_video() {
    let h = harness(sample_transcript());

    let first = h.orchestrator.generate_summary(&request()).await.unwrap();
    let second = h.orchestrator.generate_summary(&request()).await.unwrap();

    assert_eq!(first.content, second.content);
    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn force_regenerate_bypasses_cache() {
    let h = harness(sample_transcript());

    h.orchestrator.generate_summary(&request()).await.unwrap();

    let mut forced = request();
    forced.options.force_regenerate = true;
    h.orchestrator.generate_summary(&forced).await.unwrap();

    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn quiz_generates_summary_first_when_missing() {
    let h = harness(sample_transcript());

    let questions = h.orchestrator.generate_quiz(&request()).await.unwrap();

    // One summary call plus one quiz call
    assert_eq!(h.calls.load(Ordering::SeqCst), 2);
    assert_eq!(questions.len(), 3);

    let prompts = h.prompts.lock().unwrap();
    assert!(prompts[0].contains("summary"));
    assert!(prompts[1].contains("QUESTION 1:"));
    // Quiz source is the generated summary, not the transcript
    assert!(prompts[1].contains("The course walks"));
}

#[tokio::test]
async fn quiz_uses_supplied_summary() {
    let h = harness(sample_transcript());

    let mut req = request();
    req.options.summary = Some("A provided summary about ownership.".to_string());
    let questions = h.orchestrator.generate_quiz(&req).await.unwrap();

    assert_eq!(h.calls.load(Ordering::SeqCst), 1);
    assert_eq!(questions.len(), 3);

    let prompts = h.prompts.lock().unwrap();
    assert!(prompts[0].contains("A provided summary about ownership."));
}

#[tokio::test]
async fn quiz_under_delivery_returns_what_survived() {
    let h = harness(sample_transcript());

    let mut req = request();
    req.options.summary = Some("source".to_string());
    req.options.question_count = Some(5);

    // Canned response only carries 3 well-formed questions
    let questions = h.orchestrator.generate_quiz(&req).await.unwrap();
    assert_eq!(questions.len(), 3);
    for q in &questions {
        assert_eq!(q.options.len(), 4);
        assert!(q.correct_answer < 4);
    }
}

#[tokio::test]
async fn quiz_with_unparseable_output_is_parse_failure() {
    let h = harness_with_quiz(sample_transcript(), "I cannot do that.");

    let mut req = request();
    req.options.summary = Some("source".to_string());

    let result = h.orchestrator.generate_quiz(&req).await;
    assert!(matches!(
        result,
        Err(StudyError::Parse {
            kind: ContentType::Quiz,
            ..
        })
    ));
}

#[tokio::test]
async fn notes_sections_carry_timestamps_within_duration() {
    let h = harness(sample_transcript());

    let mut req = request();
    req.options.notes_format = Some(NotesFormat::Detailed);

    let notes = h.orchestrator.generate_notes(&req).await.unwrap();

    assert_eq!(notes.format, NotesFormat::Detailed);
    assert_eq!(notes.sections.len(), 2);
    assert_eq!(notes.sections[0].title, "Ownership");
    for section in &notes.sections {
        assert!(section.timestamp_secs <= 660);
    }
}

#[tokio::test]
async fn long_transcript_is_condensed_before_prompting() {
    let sentence = "This transcript sentence repeats to simulate a very long video. ";
    let long_text = sentence.repeat(3200); // ~200k chars
    let transcript = Transcript::from_segments(vec![seg(0.0, &long_text)]);

    let h = harness(transcript);
    h.orchestrator.generate_summary(&request()).await.unwrap();

    let prompts = h.prompts.lock().unwrap();
    assert!(prompts[0].len() < 60_000);
    assert!(prompts[0].contains("truncated"));
}

#[tokio::test]
async fn provider_failure_propagates_typed() {
    let orchestrator = ContentOrchestrator::new(Config::default())
        .with_fetcher(Box::new(StaticFetcher {
            transcript: sample_transcript(),
        }))
        .with_provider_factory(|_, _| Ok(Box::new(FailingProvider)));

    let result = orchestrator.generate_summary(&request()).await;
    match result {
        Err(StudyError::Provider {
            status, message, ..
        }) => {
            assert_eq!(status, Some(500));
            assert!(message.contains("server exploded"));
        }
        other => panic!("expected provider error, got {:?}", other.is_ok()),
    }
}

#[tokio::test]
async fn missing_credential_is_config_error() {
    // Default factory + empty config: fails before any network call. The
    // request carries its transcript so no fetch happens either.
    let orchestrator = ContentOrchestrator::new(Config::default());

    let mut req = request();
    req.transcript = Some(sample_transcript());

    let result = orchestrator.generate_summary(&req).await;
    assert!(matches!(result, Err(StudyError::Config(_))));
}

#[tokio::test]
async fn tutor_requires_a_question() {
    let h = harness(sample_transcript());

    let result = h.orchestrator.ask_tutor(&request()).await;
    assert!(matches!(result, Err(StudyError::Config(_))));
}

#[tokio::test]
async fn tutor_answers_with_video_context() {
    let h = harness(sample_transcript());

    let mut req = request();
    req.options.question = Some("What is borrowing?".to_string());
    req.options.summary = Some("Covers ownership and borrowing.".to_string());

    let answer = h.orchestrator.ask_tutor(&req).await.unwrap();
    assert_eq!(answer, "A direct answer.");

    let prompts = h.prompts.lock().unwrap();
    assert!(prompts[0].contains("What is borrowing?"));
    assert!(prompts[0].contains("VIDEO SUMMARY:"));
}

#[tokio::test]
async fn tutor_without_video_uses_general_prompt() {
    let h = harness(Transcript::unavailable("none"));

    let mut req = GenerationRequest::new("", Provider::Gemini);
    req.options.question = Some("What is a closure?".to_string());

    let answer = h.orchestrator.ask_tutor(&req).await.unwrap();
    assert_eq!(answer, "A direct answer.");

    let prompts = h.prompts.lock().unwrap();
    assert!(!prompts[0].contains("VIDEO TITLE"));
}
