//! CLI binary for resume-screener.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `ScreeningConfig`, runs one action, and prints its result.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use resume_screener::{
    ask, extract_profile, load_document, profile_and_screen, screen, Document, Outcome,
    ScreenError, ScreeningConfig, ScreeningOutcome,
};
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers (no extra deps) ──────────────────────────────────────

fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
fn yellow(s: &str) -> String {
    format!("\x1b[33m{s}\x1b[0m")
}
fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

// ── Spinner ──────────────────────────────────────────────────────────────────

/// Spinner shown on stderr while a blocking call (parse, model, webhook) runs.
struct Spinner(Option<ProgressBar>);

impl Spinner {
    fn start(enabled: bool, message: &str) -> Self {
        if !enabled {
            return Self(None);
        }
        let bar = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}  {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"]);
        bar.set_style(style);
        bar.set_message(message.to_string());
        bar.enable_steady_tick(Duration::from_millis(80));
        Self(Some(bar))
    }

    fn finish(self) {
        if let Some(bar) = self.0 {
            bar.finish_and_clear();
        }
    }
}

const AFTER_HELP: &str = r#"EXAMPLES:
  # Show the text extracted from a resume
  resume-screen extract resume.pdf

  # Ask a question about the resume
  resume-screen ask resume.pdf "How many years of Rust experience?"

  # Extract structured fields as JSON
  resume-screen profile resume.pdf

  # Screen against a job description (the webhook sends the email)
  resume-screen screen resume.pdf --jd-file senior-engineer.txt --email hr@example.com

  # Extract fields first; a malformed extraction stops before the webhook
  resume-screen screen resume.pdf --job-description "Senior Engineer" \
      --email hr@example.com --with-profile

ENVIRONMENT VARIABLES:
  N8N_WEBHOOK_URL         Screening webhook endpoint
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  GEMINI_API_KEY          Google Gemini API key
  EDGEQUAKE_LLM_PROVIDER  Override provider (openai, anthropic, gemini, ollama)
  EDGEQUAKE_MODEL         Override model ID

  Variables may also be placed in a .env file in the working directory.
"#;

/// Screen PDF resumes with an LLM and a workflow-automation webhook.
#[derive(Parser, Debug)]
#[command(
    name = "resume-screen",
    version,
    about = "Screen PDF resumes with an LLM and a workflow-automation webhook",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Screening webhook URL.
    #[arg(long, env = "N8N_WEBHOOK_URL", global = true)]
    webhook_url: Option<String>,

    /// Webhook timeout in seconds.
    #[arg(long, env = "RESUME_SCREEN_WEBHOOK_TIMEOUT", default_value_t = 60, global = true)]
    webhook_timeout: u64,

    /// LLM provider: openai, anthropic, gemini, ollama, azure.
    #[arg(long, env = "EDGEQUAKE_PROVIDER", global = true)]
    provider: Option<String>,

    /// LLM model ID (e.g. gpt-4.1-nano, gemini-2.0-flash).
    #[arg(long, env = "EDGEQUAKE_MODEL", global = true)]
    model: Option<String>,

    /// LLM temperature (0.0–2.0).
    #[arg(long, env = "RESUME_SCREEN_TEMPERATURE", default_value_t = 0.0, global = true)]
    temperature: f32,

    /// Max LLM output tokens per call.
    #[arg(long, env = "RESUME_SCREEN_MAX_TOKENS", default_value_t = 2048, global = true)]
    max_tokens: usize,

    /// LLM call timeout in seconds.
    #[arg(long, env = "RESUME_SCREEN_API_TIMEOUT", default_value_t = 60, global = true)]
    api_timeout: u64,

    /// Disable the spinner.
    #[arg(long, env = "RESUME_SCREEN_NO_PROGRESS", global = true)]
    no_progress: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "RESUME_SCREEN_VERBOSE", global = true)]
    verbose: bool,

    /// Suppress all output except results and errors.
    #[arg(short, long, env = "RESUME_SCREEN_QUIET", global = true)]
    quiet: bool,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the text extracted from a PDF resume.
    Extract {
        /// Path to the PDF resume.
        pdf: PathBuf,
        /// Print the document as JSON (text, page count, text pages).
        #[arg(long)]
        json: bool,
    },
    /// Ask a free-form question answered only from the resume.
    Ask {
        /// Path to the PDF resume.
        pdf: PathBuf,
        /// The question.
        question: String,
        /// Print the question/answer exchange as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Extract structured fields (name, skills, education, …) as JSON.
    Profile {
        /// Path to the PDF resume.
        pdf: PathBuf,
    },
    /// Send the resume to the screening webhook and report its decision.
    Screen {
        /// Path to the PDF resume.
        pdf: PathBuf,
        /// Job description text.
        #[arg(long, conflicts_with = "jd_file")]
        job_description: Option<String>,
        /// Read the job description from a file.
        #[arg(long)]
        jd_file: Option<PathBuf>,
        /// Candidate or recruiter email the workflow will write to.
        #[arg(long)]
        email: Option<String>,
        /// Run structured extraction first and print it; stop if it fails.
        #[arg(long)]
        with_profile: bool,
        /// Print the full outcome as JSON.
        #[arg(long)]
        json: bool,
    },
}

impl Command {
    fn wants_json(&self) -> bool {
        match self {
            Command::Extract { json, .. }
            | Command::Ask { json, .. }
            | Command::Screen { json, .. } => *json,
            Command::Profile { .. } => true,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load .env before parsing so env-backed flags see it.
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    // The spinner provides the feedback that matters; keep INFO logs out of
    // its way unless the user asked for verbose output.
    let show_progress = !cli.quiet && !cli.no_progress && !cli.command.wants_json();
    let filter = if cli.verbose {
        "debug"
    } else if cli.quiet || show_progress {
        "error"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    match run(&cli, show_progress).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli, show_progress: bool) -> Result<()> {
    let config = build_config(cli)?;

    match &cli.command {
        Command::Extract { pdf, json } => {
            let document = load(pdf, show_progress).await?;
            if *json {
                print_json(&document)?;
            } else {
                if document.text.is_empty() && !cli.quiet {
                    eprintln!(
                        "{} No extractable text found in {} page(s)",
                        yellow("⚠"),
                        document.page_count
                    );
                }
                print_text(&document.text)?;
                if !cli.quiet {
                    eprintln!(
                        "{}",
                        dim(&format!(
                            "{} words from {}/{} pages",
                            document.word_count(),
                            document.text_pages.len(),
                            document.page_count
                        ))
                    );
                }
            }
        }

        Command::Ask {
            pdf,
            question,
            json,
        } => {
            let document = load(pdf, show_progress).await?;
            let spinner = Spinner::start(show_progress, "Asking the model…");
            let exchange = ask(&document, question, &config).await;
            spinner.finish();
            let exchange = exchange.context("Question failed")?;
            if *json {
                print_json(&exchange)?;
            } else {
                print_text(&exchange.answer)?;
            }
        }

        Command::Profile { pdf } => {
            let document = load(pdf, show_progress).await?;
            let spinner = Spinner::start(show_progress, "Extracting structured fields…");
            let profile = extract_profile(&document, &config).await;
            spinner.finish();
            print_json(&profile.context("Structured extraction failed")?)?;
        }

        Command::Screen {
            pdf,
            job_description,
            jd_file,
            email,
            with_profile,
            json,
        } => {
            let job_description = match (job_description, jd_file) {
                (Some(text), _) => text.clone(),
                (None, Some(path)) => tokio::fs::read_to_string(path)
                    .await
                    .with_context(|| format!("Failed to read job description from {path:?}"))?,
                (None, None) => String::new(),
            };
            let email = email.clone().unwrap_or_default();

            let document = load(pdf, show_progress).await?;
            let spinner = Spinner::start(show_progress, "Screening resume using AI…");
            let result = if *with_profile {
                profile_and_screen(&document, &job_description, &email, &config)
                    .await
                    .map(|r| (Some(r.profile), r.outcome))
            } else {
                screen(&document, &job_description, &email, &config)
                    .await
                    .map(|o| (None, o))
            };
            spinner.finish();
            let (profile, outcome) = result.context("Screening failed")?;

            if *json {
                print_json(&serde_json::json!({ "profile": profile, "outcome": outcome }))?;
            } else {
                if let Some(profile) = profile {
                    print_json(&profile)?;
                }
                print_outcome(&outcome)?;
            }
        }
    }

    Ok(())
}

/// Map CLI args to `ScreeningConfig`.
fn build_config(cli: &Cli) -> Result<ScreeningConfig> {
    let mut builder = ScreeningConfig::builder()
        .webhook_timeout_secs(cli.webhook_timeout)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout);

    if let Some(ref url) = cli.webhook_url {
        builder = builder.webhook_url(url.clone());
    }
    if let Some(ref provider) = cli.provider {
        builder = builder.provider_name(provider.clone());
    }
    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }

    builder.build().context("Invalid configuration")
}

async fn load(pdf: &PathBuf, show_progress: bool) -> Result<Document> {
    let spinner = Spinner::start(show_progress, "Reading resume…");
    let document = load_document(pdf).await;
    spinner.finish();
    document.with_context(|| format!("Failed to read resume {}", pdf.display()))
}

fn print_outcome(outcome: &ScreeningOutcome) -> Result<()> {
    let line = match outcome.outcome {
        Outcome::Positive => format!("{} {}", green("✔"), bold(outcome.message)),
        Outcome::Negative => format!("{} {}", yellow("✉"), outcome.message),
        Outcome::Neutral => format!("{} {}", cyan("ℹ"), outcome.message),
    };
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    writeln!(handle, "{line}").context("Failed to write to stdout")?;
    Ok(())
}

fn print_text(text: &str) -> Result<()> {
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    handle
        .write_all(text.as_bytes())
        .context("Failed to write to stdout")?;
    if !text.ends_with('\n') {
        handle.write_all(b"\n").ok();
    }
    Ok(())
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialise output")?;
    println!("{json}");
    Ok(())
}

/// Print the error chain once, plus any raw payload the user needs to see.
fn report_error(err: &anyhow::Error) {
    eprintln!("{} {}", red("✘"), bold(&err.to_string()));
    for cause in err.chain().skip(1) {
        eprintln!("  {}", cause);
    }

    if let Some(screen_err) = err.downcast_ref::<ScreenError>() {
        // Workflow bodies are already part of the Display message.
        if let ScreenError::ExtractionParse { raw, .. } = screen_err {
            eprintln!("\n{}", dim("Raw model output:"));
            eprintln!("{raw}");
        }
        eprintln!("{}", dim(&format!("[{}]", screen_err.category())));
    }
}
