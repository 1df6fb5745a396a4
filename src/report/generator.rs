//! Markdown and JSON report generation.
//!
//! The same section builders back the one-shot report and the views of
//! the interactive session.

use crate::models::{ChartPoint, Report, ReportMetadata, SelectionReport, YearSummary};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &Report, chart_width: usize) -> String {
    let mut output = String::new();

    output.push_str("# Salary Survey Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));
    output.push_str(&generate_summary_section(&report.summaries));
    output.push_str(&generate_chart_section(&report.chart, chart_width));

    if let Some(ref selection) = report.selection {
        output.push_str(&generate_titles_section(selection));
    }

    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Source:** {}\n", metadata.source));
    section.push_str(&format!(
        "- **Generated:** {}\n",
        metadata.generated_at.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **Rows Decoded:** {}\n", metadata.rows_decoded));
    section.push_str(&format!("- **Rows Valid:** {}\n", metadata.rows_valid));
    if metadata.rows_dropped() > 0 {
        section.push_str(&format!("- **Rows Dropped:** {}\n", metadata.rows_dropped()));
    }
    section.push('\n');

    section
}

/// Generate the per-year summary table.
pub fn generate_summary_section(summaries: &[YearSummary]) -> String {
    let mut section = String::new();

    section.push_str("## Jobs by Year\n\n");

    if summaries.is_empty() {
        section.push_str("No valid salary records.\n\n");
        return section;
    }

    section.push_str("| Year | Total Jobs | Average Salary (USD) |\n");
    section.push_str("|:---|:---:|---:|\n");
    for summary in summaries {
        section.push_str(&format!(
            "| {} | {} | {} |\n",
            summary.year, summary.total_jobs, summary.average_salary
        ));
    }
    section.push('\n');

    section
}

/// Generate a text bar chart of total jobs per year.
pub fn generate_chart_section(chart: &[ChartPoint], width: usize) -> String {
    let mut section = String::new();

    section.push_str("## Total Jobs per Year\n\n");

    let max = chart.iter().map(|p| p.total_jobs).max().unwrap_or(0);
    if max == 0 {
        section.push_str("Nothing to chart.\n\n");
        return section;
    }

    let width = width.max(1);
    section.push_str("```\n");
    for point in chart {
        // Round up so every year with jobs gets at least one mark.
        let bar_len = (point.total_jobs * width).div_ceil(max);
        section.push_str(&format!(
            "{} | {} {}\n",
            point.year,
            "#".repeat(bar_len),
            point.total_jobs
        ));
    }
    section.push_str("```\n\n");

    section
}

/// Generate the job title table for the selected year.
pub fn generate_titles_section(selection: &SelectionReport) -> String {
    let mut section = String::new();

    section.push_str(&format!("## Job Titles ({})\n\n", selection.year));

    if selection.titles.is_empty() {
        section.push_str("No valid records for this year.\n\n");
        return section;
    }

    section.push_str("| Job Titles | Job Count |\n");
    section.push_str("|:---|:---:|\n");
    for entry in &selection.titles {
        section.push_str(&format!("| {} | {} |\n", entry.job_title, entry.count));
    }
    section.push('\n');

    section
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str(&format!(
        "*Report generated by salaryboard v{}*\n",
        env!("CARGO_PKG_VERSION")
    ));

    footer
}

/// Generate a JSON report.
pub fn generate_json_report(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::TitleBreakdown;
    use chrono::Utc;
    use rust_decimal::Decimal;

    fn create_test_report() -> Report {
        Report {
            metadata: ReportMetadata {
                source: "salaries.csv".to_string(),
                generated_at: Utc::now(),
                rows_decoded: 5,
                rows_valid: 4,
            },
            summaries: vec![
                YearSummary {
                    year: 2022,
                    total_jobs: 1,
                    average_salary: Decimal::from(50000),
                },
                YearSummary {
                    year: 2023,
                    total_jobs: 3,
                    average_salary: Decimal::from(100001),
                },
            ],
            chart: vec![
                ChartPoint {
                    year: 2022,
                    total_jobs: 1,
                },
                ChartPoint {
                    year: 2023,
                    total_jobs: 3,
                },
            ],
            selection: Some(SelectionReport {
                year: 2023,
                titles: vec![
                    TitleBreakdown {
                        job_title: "Data Scientist".to_string(),
                        count: 2,
                    },
                    TitleBreakdown {
                        job_title: "ML Engineer".to_string(),
                        count: 1,
                    },
                ],
            }),
        }
    }

    #[test]
    fn test_generate_markdown_report() {
        let report = create_test_report();
        let markdown = generate_markdown_report(&report, 30);

        assert!(markdown.contains("# Salary Survey Report"));
        assert!(markdown.contains("## Metadata"));
        assert!(markdown.contains("- **Rows Dropped:** 1"));
        assert!(markdown.contains("| 2023 | 3 | 100001 |"));
        assert!(markdown.contains("## Job Titles (2023)"));
        assert!(markdown.contains("| Data Scientist | 2 |"));
    }

    #[test]
    fn test_markdown_without_selection() {
        let mut report = create_test_report();
        report.selection = None;

        let markdown = generate_markdown_report(&report, 30);

        assert!(!markdown.contains("## Job Titles"));
    }

    #[test]
    fn test_generate_chart_section_scales_bars() {
        let report = create_test_report();
        let chart = generate_chart_section(&report.chart, 30);

        assert!(chart.contains(&format!("2023 | {} 3", "#".repeat(30))));
        assert!(chart.contains(&format!("2022 | {} 1", "#".repeat(10))));
    }

    #[test]
    fn test_empty_sections() {
        assert!(generate_summary_section(&[]).contains("No valid salary records."));
        assert!(generate_chart_section(&[], 40).contains("Nothing to chart."));
        let empty = SelectionReport {
            year: 1999,
            titles: vec![],
        };
        assert!(generate_titles_section(&empty).contains("No valid records for this year."));
    }

    #[test]
    fn test_generate_json_report() {
        let report = create_test_report();
        let json = generate_json_report(&report).unwrap();

        assert!(json.contains("\"totalJobs\""));
        assert!(json.contains("\"averageSalary\""));
        assert!(json.contains("\"job_count\""));
        assert!(json.contains("\"selection\""));
    }
}
