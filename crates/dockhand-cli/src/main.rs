//! Dockhand - pages artifact pulling, bucket checks, and voice notes
//!
//! The `dockhand` command bundles three small site-maintenance chores:
//!
//! ## Commands
//!
//! - `pages pull`: rebuild and download the rendered pages artifact for
//!   every repository in a manifest
//! - `bucket ensure`: check that an S3 bucket exists, creating it if not
//! - `notes record`: speak a prompt per contact and store the spoken
//!   answer as a note
//! - `doctor`: check the external tools the other commands drive

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::Level;

use dockhand_core::{ensure_bucket, BucketStatus};
use dockhand_notes::{
    run_session, AudioConfig, MicrophoneTranscriber, SpeechConfig, VoicePrompt,
};
use dockhand_pages::{run_batch, PagesConfig};

#[derive(Parser)]
#[command(name = "dockhand")]
#[command(author = "Dockhand Contributors")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Pages artifacts, bucket checks, and voice contact notes", long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit JSON-formatted log lines
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// GitHub Pages artifact operations
    Pages {
        #[command(subcommand)]
        action: PagesAction,
    },

    /// S3 bucket operations
    Bucket {
        #[command(subcommand)]
        action: BucketAction,
    },

    /// Voice-prompted contact notes
    Notes {
        #[command(subcommand)]
        action: NotesAction,
    },

    /// Check that the external tools dockhand drives are available
    Doctor,
}

#[derive(Subcommand)]
enum PagesAction {
    /// Pull the rendered pages artifact for every repository in the manifest
    Pull {
        /// Manifest of repositories to process (CSV: url,label)
        #[arg(short, long, default_value = "repos.csv")]
        input: PathBuf,

        /// Directory the repositories are cloned under
        #[arg(short, long, default_value = "repos")]
        base_dir: PathBuf,

        /// Workflow whose runs are triggered and watched
        #[arg(short, long, default_value = "pages-build-deployment")]
        workflow: String,

        /// How long to wait for a triggered run to appear, in seconds
        #[arg(long, default_value = "180")]
        registration_timeout: u64,

        /// How long a watched run may take to finish, in seconds
        #[arg(long, default_value = "1800")]
        watch_timeout: u64,
    },
}

#[derive(Subcommand)]
enum BucketAction {
    /// Check that a bucket exists, creating it when it does not
    Ensure {
        /// Bucket name
        name: String,

        /// Region a missing bucket is created in
        #[arg(short, long, default_value = "eu-north-1")]
        region: String,
    },
}

#[derive(Subcommand)]
enum NotesAction {
    /// Prompt for and record a spoken note about every contact
    Record {
        /// Contacts export (people-API JSON)
        #[arg(short, long, default_value = "contacts_data.json")]
        contacts: PathBuf,

        /// Directory the notes are written into
        #[arg(short, long, default_value = "contact_notes")]
        output_dir: PathBuf,

        /// Language tag for prompts and recognition (overrides DOCKHAND_STT_LANG)
        #[arg(short, long)]
        lang: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    dockhand_core::init_tracing(cli.json, level);

    match cli.command {
        Commands::Pages { action } => match action {
            PagesAction::Pull {
                input,
                base_dir,
                workflow,
                registration_timeout,
                watch_timeout,
            } => {
                cmd_pages_pull(
                    &input,
                    &base_dir,
                    &workflow,
                    registration_timeout,
                    watch_timeout,
                )
                .await
            }
        },
        Commands::Bucket { action } => match action {
            BucketAction::Ensure { name, region } => cmd_bucket_ensure(&name, &region).await,
        },
        Commands::Notes { action } => match action {
            NotesAction::Record {
                contacts,
                output_dir,
                lang,
            } => cmd_notes_record(&contacts, &output_dir, lang.as_deref()).await,
        },
        Commands::Doctor => cmd_doctor(),
    }
}

/// Pull the pages artifact for every repository in the manifest
async fn cmd_pages_pull(
    input: &Path,
    base_dir: &Path,
    workflow: &str,
    registration_timeout: u64,
    watch_timeout: u64,
) -> Result<()> {
    let mut config = PagesConfig::for_workflow(workflow);
    config.registration_timeout = Duration::from_secs(registration_timeout);
    config.watch_timeout = Duration::from_secs(watch_timeout);

    let summary = run_batch(input, base_dir, &config)
        .await
        .context("pages batch could not start")?;

    println!(
        "Processed {} repositories: {} pulled, {} failed",
        summary.processed,
        summary.succeeded(),
        summary.failures.len()
    );

    for report in &summary.reports {
        println!(
            "  ok     {} (run {}, {} entries, {}ms)",
            report.label, report.run_id, report.extracted_entries, report.duration_ms
        );
    }

    for failure in &summary.failures {
        println!("  failed {} ({}): {}", failure.label, failure.url, failure.error);
    }

    if !summary.all_succeeded() {
        anyhow::bail!(
            "{} of {} repositories failed",
            summary.failures.len(),
            summary.processed
        );
    }

    Ok(())
}

/// Check that a bucket exists, creating it when it does not
async fn cmd_bucket_ensure(name: &str, region: &str) -> Result<()> {
    match ensure_bucket(name, region).await {
        Ok(BucketStatus::AlreadyExists) => {
            println!("Bucket {} already exists", name);
            Ok(())
        }
        Ok(BucketStatus::Created) => {
            println!("Created bucket {} in {}", name, region);
            Ok(())
        }
        Err(err) => {
            // Scripts branch on the exact exit code; forward it.
            eprintln!("Error: {}", err);
            std::process::exit(err.exit_code());
        }
    }
}

/// Walk the contacts export, speaking one prompt per contact and storing
/// each answer as a note
async fn cmd_notes_record(contacts: &Path, output_dir: &Path, lang: Option<&str>) -> Result<()> {
    let mut speech = SpeechConfig::from_env();
    if let Some(lang) = lang {
        speech = speech.with_language(lang);
    }
    let audio = AudioConfig::default();

    let speaker = VoicePrompt::new(speech.clone(), audio.clone());
    let transcriber = MicrophoneTranscriber::new(speech, audio);

    let summary = run_session(contacts, output_dir, &speaker, &transcriber)
        .await
        .context("annotation session failed")?;

    println!(
        "Prompted {} contacts: {} notes written, {} skipped",
        summary.prompted, summary.written, summary.skipped
    );

    Ok(())
}

/// Check the external tools the other commands drive
fn cmd_doctor() -> Result<()> {
    println!("Dockhand Doctor");
    println!("===============");
    println!();

    report_tool("git", &["--version"]);
    report_tool("gh", &["--version"]);
    report_tool("aws", &["--version"]);
    report_tool("mpg123", &["--version"]);
    report_tool("arecord", &["--version"]);

    println!();

    // Listing runs and downloading artifacts needs a logged-in gh.
    match std::process::Command::new("gh").args(["auth", "status"]).output() {
        Ok(output) if output.status.success() => println!("gh auth: ok"),
        Ok(_) => println!("gh auth: not logged in"),
        Err(_) => println!("gh auth: gh not installed"),
    }

    println!();
    println!("Environment Variables:");
    if let Ok(lang) = std::env::var("DOCKHAND_STT_LANG") {
        println!("  DOCKHAND_STT_LANG: {}", lang);
    } else {
        println!("  DOCKHAND_STT_LANG: (not set)");
    }
    if std::env::var("DOCKHAND_STT_KEY").is_ok() {
        println!("  DOCKHAND_STT_KEY: (set)");
    } else {
        println!("  DOCKHAND_STT_KEY: (not set)");
    }

    Ok(())
}

/// Print one `<tool> installed: yes/no` line, with the version banner
/// when the tool answers.
fn report_tool(program: &str, args: &[&str]) {
    match std::process::Command::new(program).args(args).output() {
        Ok(output) if output.status.success() => {
            // aws v1 prints its banner to stderr.
            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            let banner = stdout
                .lines()
                .chain(stderr.lines())
                .map(str::trim)
                .find(|line| !line.is_empty())
                .unwrap_or("");
            println!("{} installed: yes ({})", program, banner);
        }
        _ => println!("{} installed: no", program),
    }
}
