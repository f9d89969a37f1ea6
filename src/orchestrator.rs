//! Top-level entry points for study-aid generation.
//!
//! Each call runs the same staged pipeline: cache check, transcript fetch
//! (when the request carries none), prompt build, provider invocation,
//! parse, and for summaries timestamp alignment. Calls are independent and
//! stateless; no retries happen here. A transcript fetch failure degrades
//! to title/description-only prompting, while provider and parse failures
//! are fatal for the call and propagate typed.

use crate::align::{TimestampAligner, TimestampEntry};
use crate::cache::{CacheKey, CachedContent, ContentCache, NoopCache};
use crate::config::{Config, NotesFormat, Provider};
use crate::error::{Result, StudyError};
use crate::parse;
use crate::parse::{NotesResult, QuizQuestion};
use crate::prompt;
use crate::provider::{create_provider, ContentType, ProviderClient};
use crate::transcript::{Transcript, TranscriptFetcher, YoutubeTranscriptSource};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

pub const DEFAULT_QUESTION_COUNT: usize = 5;

/// One generation call's inputs. Transient; never persisted.
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    pub video_id: String,
    pub title: String,
    pub description: String,
    /// A transcript the caller already holds; fetched when None.
    pub transcript: Option<Transcript>,
    pub video_duration_secs: u32,
    pub provider: Provider,
    pub options: GenerationOptions,
}

impl GenerationRequest {
    pub fn new(video_id: impl Into<String>, provider: Provider) -> Self {
        Self {
            video_id: video_id.into(),
            title: String::new(),
            description: String::new(),
            transcript: None,
            video_duration_secs: 0,
            provider,
            options: GenerationOptions::default(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub question_count: Option<usize>,
    pub notes_format: Option<NotesFormat>,
    /// Pre-existing summary text used as quiz source or tutor context.
    pub summary: Option<String>,
    pub question: Option<String>,
    /// Bypass the cache read; the fresh result still overwrites the entry.
    pub force_regenerate: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryResult {
    /// Markdown summary text.
    pub content: String,
    pub timestamps: Vec<TimestampEntry>,
}

type ProviderFactory =
    Box<dyn Fn(Provider, &Config) -> Result<Box<dyn ProviderClient>> + Send + Sync>;

pub struct ContentOrchestrator {
    config: Config,
    fetcher: Box<dyn TranscriptFetcher>,
    cache: Box<dyn ContentCache>,
    aligner: TimestampAligner,
    provider_factory: ProviderFactory,
}

impl ContentOrchestrator {
    pub fn new(config: Config) -> Self {
        let fetcher = YoutubeTranscriptSource::new(config.transcript_languages.clone());
        Self {
            config,
            fetcher: Box::new(fetcher),
            cache: Box::new(NoopCache),
            aligner: TimestampAligner::new(),
            provider_factory: Box::new(create_provider),
        }
    }

    /// Substitute the transcript source (tests, other platforms).
    pub fn with_fetcher(mut self, fetcher: Box<dyn TranscriptFetcher>) -> Self {
        self.fetcher = fetcher;
        self
    }

    pub fn with_cache(mut self, cache: Box<dyn ContentCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_aligner(mut self, aligner: TimestampAligner) -> Self {
        self.aligner = aligner;
        self
    }

    /// Substitute the provider factory (tests).
    pub fn with_provider_factory(
        mut self,
        factory: impl Fn(Provider, &Config) -> Result<Box<dyn ProviderClient>> + Send + Sync + 'static,
    ) -> Self {
        self.provider_factory = Box::new(factory);
        self
    }

    pub async fn generate_summary(&self, request: &GenerationRequest) -> Result<SummaryResult> {
        let key = CacheKey::new(&request.video_id, ContentType::Summary, "default");
        if !request.options.force_regenerate {
            if let Some(CachedContent::Summary(cached)) = self.cache.get(&key) {
                debug!("Summary cache hit for {}", request.video_id);
                return Ok(cached);
            }
        }

        let transcript = self.resolve_transcript(request).await;
        let provider = (self.provider_factory)(request.provider, &self.config)?;

        let prompt = prompt::summary_prompt(&request.title, &request.description, &transcript);
        info!(
            "Generating summary for {} with {}",
            request.video_id,
            provider.name()
        );
        let raw = provider.generate(&prompt, ContentType::Summary).await?;

        let content = parse::parse_summary_response(&raw);
        let timestamps = self
            .aligner
            .align(&content, &transcript, request.video_duration_secs);

        let result = SummaryResult {
            content,
            timestamps,
        };
        self.cache
            .put(key, CachedContent::Summary(result.clone()));
        Ok(result)
    }

    /// Quiz prompts are built from a summary rather than the raw
    /// transcript, keeping them short; when the caller supplies none, a
    /// summary is generated (and cached) first.
    pub async fn generate_quiz(&self, request: &GenerationRequest) -> Result<Vec<QuizQuestion>> {
        let count = request
            .options
            .question_count
            .unwrap_or(DEFAULT_QUESTION_COUNT);

        let key = CacheKey::new(&request.video_id, ContentType::Quiz, count.to_string());
        if !request.options.force_regenerate {
            if let Some(CachedContent::Quiz(cached)) = self.cache.get(&key) {
                debug!("Quiz cache hit for {}", request.video_id);
                return Ok(cached);
            }
        }

        let source = match &request.options.summary {
            Some(summary) => summary.clone(),
            None => self.generate_summary(request).await?.content,
        };

        let provider = (self.provider_factory)(request.provider, &self.config)?;
        let prompt = prompt::quiz_prompt(&source, count);
        info!(
            "Generating {}-question quiz for {} with {}",
            count,
            request.video_id,
            provider.name()
        );
        let raw = provider.generate(&prompt, ContentType::Quiz).await?;

        let questions = parse::parse_quiz_response(&raw)?;
        if questions.len() < count {
            // Under-delivery is tolerated, not retried
            warn!(
                "Quiz for {} returned {} of {} requested questions",
                request.video_id,
                questions.len(),
                count
            );
        }

        self.cache
            .put(key, CachedContent::Quiz(questions.clone()));
        Ok(questions)
    }

    pub async fn generate_notes(&self, request: &GenerationRequest) -> Result<NotesResult> {
        let format = request.options.notes_format.unwrap_or_default();

        let key = CacheKey::new(&request.video_id, ContentType::Notes, format.to_string());
        if !request.options.force_regenerate {
            if let Some(CachedContent::Notes(cached)) = self.cache.get(&key) {
                debug!("Notes cache hit for {}", request.video_id);
                return Ok(cached);
            }
        }

        let transcript = self.resolve_transcript(request).await;
        let provider = (self.provider_factory)(request.provider, &self.config)?;

        let prompt =
            prompt::notes_prompt(&request.title, &request.description, &transcript, format);
        info!(
            "Generating {} notes for {} with {}",
            format,
            request.video_id,
            provider.name()
        );
        let raw = provider.generate(&prompt, ContentType::Notes).await?;

        let mut result = parse::parse_notes_response(&raw, format);
        parse::assign_section_timestamps(&mut result.sections, request.video_duration_secs);

        self.cache.put(key, CachedContent::Notes(result.clone()));
        Ok(result)
    }

    /// Tutor answers are question-specific and never cached.
    pub async fn ask_tutor(&self, request: &GenerationRequest) -> Result<String> {
        let question = request
            .options
            .question
            .as_deref()
            .filter(|q| !q.trim().is_empty())
            .ok_or_else(|| StudyError::Config("No tutor question provided".to_string()))?;

        let provider = (self.provider_factory)(request.provider, &self.config)?;

        let prompt = if request.video_id.is_empty() {
            prompt::general_tutor_prompt(question)
        } else {
            let transcript = self.resolve_transcript(request).await;
            prompt::tutor_prompt(
                &request.title,
                &request.description,
                &transcript,
                request.options.summary.as_deref(),
                question,
            )
        };

        info!("Answering tutor question with {}", provider.name());
        let raw = provider.generate(&prompt, ContentType::Tutor).await?;
        Ok(parse::parse_tutor_response(&raw))
    }

    /// The request's transcript, or a fresh fetch. Fetch failures surface
    /// as an unavailable transcript, never as an error.
    async fn resolve_transcript(&self, request: &GenerationRequest) -> Transcript {
        if let Some(transcript) = &request.transcript {
            return transcript.clone();
        }
        let transcript = self.fetcher.fetch(&request.video_id).await;
        if !transcript.available {
            debug!(
                "No transcript for {}: {}",
                request.video_id,
                transcript.error.as_deref().unwrap_or("unknown")
            );
        }
        transcript
    }
}
