use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vidstudy::cache::MemoryCache;
use vidstudy::config::{Config, NotesFormat, Provider};
use vidstudy::orchestrator::{ContentOrchestrator, GenerationOptions, GenerationRequest};
use vidstudy::transcript::extract_video_id;

#[derive(Parser)]
#[command(name = "vidstudy")]
#[command(version, about = "AI study aids for YouTube videos")]
#[command(
    long_about = "Generate summaries, quizzes, notes and tutor answers for YouTube videos using Gemini or OpenAI APIs."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// LLM provider: gemini, openai
    #[arg(short, long, global = true)]
    provider: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Args)]
struct VideoArgs {
    /// Video URL or 11-character video id
    video: String,

    /// Video title, used to steer generation
    #[arg(long, default_value = "")]
    title: String,

    /// Video description
    #[arg(long, default_value = "")]
    description: String,

    /// Video duration in seconds
    #[arg(long, default_value_t = 0)]
    duration: u32,

    /// Regenerate even when a cached result exists
    #[arg(long)]
    force: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Generate a summary with navigable timestamps
    Summary {
        #[command(flatten)]
        video: VideoArgs,
    },
    /// Generate a multiple-choice quiz
    Quiz {
        #[command(flatten)]
        video: VideoArgs,

        /// Number of questions to request
        #[arg(short = 'n', long, default_value_t = 5)]
        questions: usize,
    },
    /// Generate structured study notes
    Notes {
        #[command(flatten)]
        video: VideoArgs,

        /// Notes format: bullet, outline, detailed
        #[arg(short, long, default_value = "outline")]
        format: String,
    },
    /// Ask the tutor a question about a video
    Tutor {
        #[command(flatten)]
        video: VideoArgs,

        /// The question to ask
        question: String,
    },
}

fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };

    FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .init();
}

fn spinner(message: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner()),
    );
    pb.set_message(message.to_string());
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

fn build_request(video: &VideoArgs, provider: Provider) -> Result<GenerationRequest> {
    let video_id = extract_video_id(&video.video)
        .ok_or_else(|| anyhow::anyhow!("Could not extract a video id from: {}", video.video))?;

    Ok(GenerationRequest {
        video_id,
        title: video.title.clone(),
        description: video.description.clone(),
        transcript: None,
        video_duration_secs: video.duration,
        provider,
        options: GenerationOptions {
            force_regenerate: video.force,
            ..Default::default()
        },
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let config = Config::load().context("Failed to load configuration")?;

    let provider: Provider = match &cli.provider {
        Some(p) => p.parse().map_err(|e: String| anyhow::anyhow!(e))?,
        None => config.default_provider,
    };
    config
        .validate(provider)
        .context("Configuration validation failed")?;

    let orchestrator = ContentOrchestrator::new(config).with_cache(Box::new(MemoryCache::new()));

    match cli.command {
        Command::Summary { video } => {
            let request = build_request(&video, provider)?;
            let pb = spinner("Generating summary...");
            let result = orchestrator.generate_summary(&request).await?;
            pb.finish_and_clear();

            println!("{}", style("Summary").bold().underlined());
            println!();
            println!("{}", result.content);
            if !result.timestamps.is_empty() {
                println!();
                println!("{}", style("Key moments").bold());
                for entry in &result.timestamps {
                    println!("  {}  {}", style(&entry.time).cyan(), entry.caption);
                }
            }
        }
        Command::Quiz { video, questions } => {
            let mut request = build_request(&video, provider)?;
            request.options.question_count = Some(questions);

            let pb = spinner("Generating quiz...");
            let quiz = orchestrator.generate_quiz(&request).await?;
            pb.finish_and_clear();

            println!("{}", style("Quiz").bold().underlined());
            for (i, q) in quiz.iter().enumerate() {
                println!();
                println!("{} {}", style(format!("{}.", i + 1)).bold(), q.question);
                for (j, option) in q.options.iter().enumerate() {
                    let letter = (b'A' + j as u8) as char;
                    println!("   {}) {}", letter, option);
                }
                let answer = (b'A' + q.correct_answer as u8) as char;
                println!(
                    "   {} {} — {}",
                    style("Answer:").green(),
                    answer,
                    q.explanation
                );
            }
        }
        Command::Notes { video, format } => {
            let notes_format: NotesFormat =
                format.parse().map_err(|e: String| anyhow::anyhow!(e))?;
            let mut request = build_request(&video, provider)?;
            request.options.notes_format = Some(notes_format);

            let pb = spinner("Generating notes...");
            let notes = orchestrator.generate_notes(&request).await?;
            pb.finish_and_clear();

            println!(
                "{}",
                style(format!("Notes ({})", notes.format)).bold().underlined()
            );
            for section in &notes.sections {
                println!();
                println!("{}", style(&section.title).bold());
                println!("{}", section.content);
            }
        }
        Command::Tutor { video, question } => {
            let mut request = build_request(&video, provider)?;
            request.options.question = Some(question);

            let pb = spinner("Thinking...");
            let answer = orchestrator.ask_tutor(&request).await?;
            pb.finish_and_clear();

            println!("{}", answer);
        }
    }

    Ok(())
}
