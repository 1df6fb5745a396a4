//! Data models for the salary dashboard.
//!
//! This module contains the record types flowing through the aggregation
//! engine, the aggregates it produces, and the report envelope built
//! from them.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A decoded survey record, fields kept as text exactly as they appeared.
///
/// A field is `None` when the line was shorter than the header row.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    pub work_year: Option<String>,
    pub job_title: Option<String>,
    pub salary_in_usd: Option<String>,
}

impl RawRow {
    /// Convenience constructor used by the decoder and by tests.
    pub fn new(work_year: &str, job_title: &str, salary_in_usd: &str) -> Self {
        Self {
            work_year: Some(work_year.to_string()),
            job_title: Some(job_title.to_string()),
            salary_in_usd: Some(salary_in_usd.to_string()),
        }
    }
}

/// A record that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidRow {
    /// Survey year, always > 0.
    pub year: u32,
    /// Job title, verbatim.
    pub job_title: String,
    /// Salary in USD at full precision, always > 0.
    pub salary_usd: Decimal,
}

/// Per-year rollup of job count and average salary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct YearSummary {
    pub year: u32,
    /// Number of valid rows for the year (never 0).
    pub total_jobs: usize,
    /// Average salary rounded half-up to whole dollars.
    #[serde(with = "rust_decimal::serde::float")]
    pub average_salary: Decimal,
}

/// Frequency of one job title within a selected year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TitleBreakdown {
    pub job_title: String,
    #[serde(rename = "job_count")]
    pub count: usize,
}

/// One point of the jobs-per-year chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartPoint {
    pub year: u32,
    pub total_jobs: usize,
}

impl From<&YearSummary> for ChartPoint {
    fn from(summary: &YearSummary) -> Self {
        Self {
            year: summary.year,
            total_jobs: summary.total_jobs,
        }
    }
}

/// Column used to order the year summary table.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum SummarySort {
    /// Survey year (default)
    #[default]
    Year,
    /// Total jobs
    Jobs,
    /// Average salary
    Salary,
}

impl fmt::Display for SummarySort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SummarySort::Year => write!(f, "year"),
            SummarySort::Jobs => write!(f, "jobs"),
            SummarySort::Salary => write!(f, "salary"),
        }
    }
}

/// Column used to order the job title table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum TitleSort {
    /// Job title, alphabetical
    Title,
    /// Job count, most frequent first
    Count,
}

impl fmt::Display for TitleSort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TitleSort::Title => write!(f, "title"),
            TitleSort::Count => write!(f, "count"),
        }
    }
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// Where the records came from (URL or path).
    pub source: String,
    /// When the report was generated.
    pub generated_at: DateTime<Utc>,
    /// Rows decoded from the source.
    pub rows_decoded: usize,
    /// Rows that passed validation.
    pub rows_valid: usize,
}

impl ReportMetadata {
    /// Rows dropped by validation.
    pub fn rows_dropped(&self) -> usize {
        self.rows_decoded.saturating_sub(self.rows_valid)
    }
}

/// The job title drill-down for the selected year.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SelectionReport {
    pub year: u32,
    pub titles: Vec<TitleBreakdown>,
}

/// Everything a rendered report contains.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub summaries: Vec<YearSummary>,
    pub chart: Vec<ChartPoint>,
    pub selection: Option<SelectionReport>,
}
