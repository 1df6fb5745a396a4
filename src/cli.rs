//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{SummarySort, TitleSort};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// SalaryBoard - salary survey dashboard for the terminal
///
/// Rolls salary survey records up by year (job count and average salary),
/// drills down into job titles for a selected year, and forwards questions
/// to a chat endpoint.
///
/// Examples:
///   salaryboard --source salaries.csv
///   salaryboard --source https://example.com/salaries.csv --year 2023
///   salaryboard --sort salary --descending --format json -o report.json
///   salaryboard --chat "Which title pays best?"
///   salaryboard --interactive
///   salaryboard --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// CSV source: an http(s) URL or a file path
    ///
    /// Must have a header row with work_year, job_title and salary_in_usd.
    /// Defaults to the config file value, then "salaries.csv".
    #[arg(short, long, value_name = "URL|PATH", env = "SALARYBOARD_SOURCE")]
    pub source: Option<String>,

    /// Select a year and include its job title breakdown
    #[arg(short, long, value_name = "YEAR")]
    pub year: Option<u32>,

    /// Column to sort the year table by
    #[arg(long, value_name = "COLUMN")]
    pub sort: Option<SummarySort>,

    /// Sort the year table in descending order
    #[arg(long)]
    pub descending: bool,

    /// Column to sort the job title table by
    #[arg(long, value_name = "COLUMN")]
    pub title_sort: Option<TitleSort>,

    /// Output format (markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Send one message to the chat endpoint and print the reply
    #[arg(long, value_name = "MESSAGE")]
    pub chat: Option<String>,

    /// Chat endpoint URL
    #[arg(long, value_name = "URL", env = "SALARYBOARD_CHAT_URL")]
    pub chat_url: Option<String>,

    /// Start an interactive session after loading
    #[arg(short, long)]
    pub interactive: bool,

    /// Re-read the source on every year selection
    #[arg(long)]
    pub refetch_on_select: bool,

    /// Request timeout in seconds for the source and the chat endpoint
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .salaryboard.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Generate a default .salaryboard.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Markdown format (default)
    #[default]
    Markdown,
    /// JSON format
    Json,
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref source) = self.source {
            if source.trim().is_empty() {
                return Err("Source must not be empty".to_string());
            }
        }

        if let Some(ref url) = self.chat_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Chat URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(ref message) = self.chat {
            if message.trim().is_empty() {
                return Err("Chat message must not be empty".to_string());
            }
        }

        if self.year == Some(0) {
            return Err("Year must be greater than 0".to_string());
        }

        // Check for conflicting options
        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn make_args() -> Args {
        Args {
            source: Some("salaries.csv".to_string()),
            year: None,
            sort: None,
            descending: false,
            title_sort: None,
            format: None,
            output: None,
            chat: None,
            chat_url: None,
            interactive: false,
            refetch_on_select: false,
            timeout: None,
            config: None,
            verbose: false,
            quiet: false,
            init_config: false,
        }
    }

    #[test]
    fn test_parse_flags() {
        let args = Args::try_parse_from([
            "salaryboard",
            "--source",
            "data.csv",
            "--year",
            "2023",
            "--sort",
            "salary",
            "--title-sort",
            "count",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(args.source.as_deref(), Some("data.csv"));
        assert_eq!(args.year, Some(2023));
        assert_eq!(args.sort, Some(SummarySort::Salary));
        assert_eq!(args.title_sort, Some(TitleSort::Count));
        assert_eq!(args.format, Some(OutputFormat::Json));
    }

    #[test]
    fn test_validation_ok() {
        assert!(make_args().validate().is_ok());
    }

    #[test]
    fn test_validation_invalid_chat_url() {
        let mut args = make_args();
        args.chat_url = Some("localhost:5000".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_blank_chat_message() {
        let mut args = make_args();
        args.chat = Some("   ".to_string());
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_zero_year() {
        let mut args = make_args();
        args.year = Some(0);
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_validation_conflicting_options() {
        let mut args = make_args();
        args.verbose = true;
        args.quiet = true;
        assert!(args.validate().is_err());
    }

    #[test]
    fn test_log_level() {
        let mut args = make_args();
        assert_eq!(args.log_level(), tracing::Level::INFO);

        args.verbose = true;
        assert_eq!(args.log_level(), tracing::Level::DEBUG);

        args.verbose = false;
        args.quiet = true;
        assert_eq!(args.log_level(), tracing::Level::ERROR);
    }
}
