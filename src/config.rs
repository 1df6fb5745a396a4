//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.salaryboard.toml` files.

use crate::cli::{Args, OutputFormat};
use crate::models::{SummarySort, TitleSort};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Name of the configuration file looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".salaryboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Record source settings.
    #[serde(default)]
    pub source: SourceConfig,

    /// Chat endpoint settings.
    #[serde(default)]
    pub chat: ChatSettings,

    /// Report settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Where salary records come from.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    /// URL or path of the CSV file.
    #[serde(default = "default_location")]
    pub location: String,

    /// Re-read the source on every year selection instead of reusing
    /// the rows from the initial load.
    #[serde(default)]
    pub refetch_on_select: bool,

    /// HTTP timeout for URL sources, in seconds.
    #[serde(default = "default_source_timeout")]
    pub timeout_seconds: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            location: default_location(),
            refetch_on_select: false,
            timeout_seconds: default_source_timeout(),
        }
    }
}

fn default_location() -> String {
    "salaries.csv".to_string()
}

fn default_source_timeout() -> u64 {
    30
}

/// Chat endpoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatSettings {
    /// Endpoint accepting `{"message": ...}` and answering `{"reply": ...}`.
    #[serde(default = "default_chat_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds.
    #[serde(default = "default_chat_timeout")]
    pub timeout_seconds: u64,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            endpoint: default_chat_endpoint(),
            timeout_seconds: default_chat_timeout(),
        }
    }
}

fn default_chat_endpoint() -> String {
    "http://localhost:5000/api/chat".to_string()
}

fn default_chat_timeout() -> u64 {
    60
}

/// Report rendering settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format.
    #[serde(default)]
    pub format: OutputFormat,

    /// Column the year table is sorted by.
    #[serde(default)]
    pub sort: SummarySort,

    /// Sort the year table in descending order.
    #[serde(default)]
    pub descending: bool,

    /// Column the job title table is sorted by (unsorted when absent).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title_sort: Option<TitleSort>,

    /// Width of the longest chart bar, in characters.
    #[serde(default = "default_chart_width")]
    pub chart_width: usize,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            sort: SummarySort::default(),
            descending: false,
            title_sort: None,
            chart_width: default_chart_width(),
        }
    }
}

fn default_chart_width() -> usize {
    40
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        Ok(config)
    }

    /// Try to load configuration from `dir`.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_from_dir(dir: &Path) -> Result<Option<Self>> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        if config_path.exists() {
            Ok(Some(Self::load(&config_path)?))
        } else {
            Ok(None)
        }
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings.
    /// This method only overrides config when CLI provides explicit values.
    pub fn merge_with_args(&mut self, args: &Args) {
        if let Some(ref source) = args.source {
            self.source.location = source.clone();
        }
        if args.refetch_on_select {
            self.source.refetch_on_select = true;
        }
        if let Some(timeout) = args.timeout {
            self.source.timeout_seconds = timeout;
            self.chat.timeout_seconds = timeout;
        }

        if let Some(ref endpoint) = args.chat_url {
            self.chat.endpoint = endpoint.clone();
        }

        if let Some(format) = args.format {
            self.report.format = format;
        }
        if let Some(sort) = args.sort {
            self.report.sort = sort;
        }
        if args.descending {
            self.report.descending = true;
        }
        if args.title_sort.is_some() {
            self.report.title_sort = args.title_sort;
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<()> {
        if self.source.location.trim().is_empty() {
            anyhow::bail!("Source location must not be empty");
        }
        if self.source.timeout_seconds == 0 || self.chat.timeout_seconds == 0 {
            anyhow::bail!("Timeouts must be at least 1 second");
        }
        if !self.chat.endpoint.starts_with("http://") && !self.chat.endpoint.starts_with("https://")
        {
            anyhow::bail!("Chat endpoint must start with 'http://' or 'https://'");
        }
        if self.report.chart_width == 0 {
            anyhow::bail!("Chart width must be at least 1");
        }
        Ok(())
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::tests::make_args;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.source.location, "salaries.csv");
        assert!(!config.source.refetch_on_select);
        assert_eq!(config.chat.endpoint, "http://localhost:5000/api/chat");
        assert_eq!(config.report.chart_width, 40);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[source]
location = "https://example.com/salaries.csv"
refetch_on_select = true

[chat]
timeout_seconds = 10

[report]
format = "json"
sort = "salary"
descending = true
title_sort = "count"
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.source.location, "https://example.com/salaries.csv");
        assert!(config.source.refetch_on_select);
        assert_eq!(config.source.timeout_seconds, 30);
        assert_eq!(config.chat.timeout_seconds, 10);
        assert_eq!(config.chat.endpoint, "http://localhost:5000/api/chat");
        assert_eq!(config.report.format, OutputFormat::Json);
        assert_eq!(config.report.sort, SummarySort::Salary);
        assert!(config.report.descending);
        assert_eq!(config.report.title_sort, Some(TitleSort::Count));
    }

    #[test]
    fn test_load_from_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Config::load_from_dir(dir.path()).unwrap().is_none());

        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            "[source]\nlocation = \"data.csv\"\n",
        )
        .unwrap();
        let config = Config::load_from_dir(dir.path()).unwrap().unwrap();
        assert_eq!(config.source.location, "data.csv");

        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "[source\n").unwrap();
        assert!(Config::load_from_dir(dir.path()).is_err());
    }

    #[test]
    fn test_merge_with_args() {
        let mut config = Config::default();
        let mut args = make_args();
        args.source = Some("other.csv".to_string());
        args.timeout = Some(5);
        args.sort = Some(SummarySort::Jobs);

        config.merge_with_args(&args);

        assert_eq!(config.source.location, "other.csv");
        assert_eq!(config.source.timeout_seconds, 5);
        assert_eq!(config.chat.timeout_seconds, 5);
        assert_eq!(config.report.sort, SummarySort::Jobs);
        assert_eq!(config.report.format, OutputFormat::Markdown);
    }

    #[test]
    fn test_validate_rejects_bad_endpoint() {
        let mut config = Config::default();
        config.chat.endpoint = "localhost:5000".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[source]"));
        assert!(toml_str.contains("[chat]"));
        assert!(toml_str.contains("[report]"));

        let round: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(round.report.chart_width, 40);
    }
}
