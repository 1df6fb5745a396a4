//! SalaryBoard - salary survey dashboard for the terminal
//!
//! Loads salary survey records from a CSV file or URL, rolls them up by
//! year, drills into job titles for a selected year and forwards
//! questions to a chat endpoint.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (bad config, unreachable source, write failure, etc.)

mod analysis;
mod chat;
mod cli;
mod config;
mod dashboard;
mod models;
mod progress;
mod report;
mod session;
mod source;

use anyhow::{Context, Result};
use chat::{ChatClient, ChatConfig};
use cli::{Args, OutputFormat};
use config::{Config, CONFIG_FILE_NAME};
use dashboard::Dashboard;
use source::RecordSource;
use std::path::Path;
use std::time::Duration;
use tokio::io::BufReader;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("SalaryBoard v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    if let Err(e) = run(args).await {
        error!("Run failed: {}", e);
        eprintln!("\n❌ Error: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

/// Handle --init-config: generate a default .salaryboard.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the source, chat endpoint and report layout.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so reports written to stdout stay clean.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

async fn run(args: Args) -> Result<()> {
    let config = load_config(&args)?;
    let show_progress = !args.quiet;

    let source = RecordSource::new(
        &config.source.location,
        Duration::from_secs(config.source.timeout_seconds),
    )
    .context("Failed to set up the record source")?;

    let mut dashboard = Dashboard::new(source, config.source.refetch_on_select);
    dashboard.set_summary_sort(config.report.sort, config.report.descending);
    dashboard.set_title_sort(config.report.title_sort);

    let pb = progress::spinner(
        &format!("Loading {}...", dashboard.source().location()),
        show_progress,
    );
    let loaded = dashboard.load().await;
    pb.finish_and_clear();
    let years = loaded
        .with_context(|| format!("Failed to load {}", config.source.location))?
        .len();
    info!("Loaded {} years of salary data", years);

    if let Some(year) = args.year {
        let titles = dashboard
            .select(year)
            .await
            .with_context(|| format!("Failed to load job titles for {}", year))?;
        if titles.is_empty() {
            warn!("No valid records for {}", year);
        }
    }

    let chat = ChatClient::new(ChatConfig {
        endpoint: config.chat.endpoint.clone(),
        timeout_seconds: config.chat.timeout_seconds,
    })
    .context("Failed to set up the chat client")?;

    if let Some(ref message) = args.chat {
        let pb = progress::spinner("Bot is typing...", show_progress);
        let reply = chat.reply_or_fallback(message).await;
        pb.finish_and_clear();
        println!("🤖 {}", reply);
    }

    if args.interactive {
        println!("💬 Chat endpoint: {}", chat.endpoint());
        let mut session =
            session::Session::new(dashboard, chat, config.report.chart_width, show_progress);
        return session.run(BufReader::new(tokio::io::stdin())).await;
    }

    // A one-shot chat question prints only the reply.
    if args.chat.is_some() && args.year.is_none() && args.output.is_none() {
        return Ok(());
    }

    let report = dashboard.report();
    let output = match config.report.format {
        OutputFormat::Json => report::generate_json_report(&report)?,
        OutputFormat::Markdown => {
            report::generate_markdown_report(&report, config.report.chart_width)
        }
    };

    match args.output {
        Some(ref path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            println!("✅ Report saved to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}

/// Load configuration from file or use defaults, then apply CLI overrides.
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match args.config {
        Some(ref config_path) => {
            info!("Loading config from: {}", config_path.display());
            Config::load(config_path)?
        }
        None => match Config::load_from_dir(Path::new(".")) {
            Ok(Some(config)) => {
                info!("Loaded config from {}", CONFIG_FILE_NAME);
                config
            }
            Ok(None) => {
                debug!("No config file found, using defaults");
                Config::default()
            }
            Err(e) => {
                warn!("Failed to load config: {}", e);
                Config::default()
            }
        },
    };

    config.merge_with_args(args);
    config.validate()?;
    Ok(config)
}
