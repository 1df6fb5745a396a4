//! Record validation and aggregation.
//!
//! This module turns decoded survey rows into the per-year rollup and the
//! per-title breakdown. Salaries are summed with `Decimal` so averages over
//! thousands of six-figure values do not drift.

use crate::models::{
    ChartPoint, RawRow, SummarySort, TitleBreakdown, TitleSort, ValidRow, YearSummary,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::{BTreeMap, HashMap};
use std::str::FromStr;
use tracing::{debug, warn};

/// Parse a text field as a finite number.
///
/// Accepts plain decimals and scientific notation with optional surrounding
/// whitespace. Empty text, `NaN`, `Infinity` and anything non-numeric yield
/// `None`.
pub fn parse_numeric(text: &str) -> Option<Decimal> {
    let trimmed = text.trim();
    if trimmed.is_empty() || trimmed.contains('_') {
        return None;
    }

    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Truncate a parsed year toward zero; `None` unless the result is >= 1.
fn normalize_year(value: Decimal) -> Option<u32> {
    if value <= Decimal::ZERO {
        return None;
    }
    value.trunc().to_u32().filter(|year| *year > 0)
}

fn validate_row(row: &RawRow) -> Option<ValidRow> {
    let salary_usd = parse_numeric(row.salary_in_usd.as_deref()?)?;
    if salary_usd <= Decimal::ZERO {
        return None;
    }

    let year = normalize_year(parse_numeric(row.work_year.as_deref()?)?)?;

    Some(ValidRow {
        year,
        job_title: row.job_title.clone().unwrap_or_default(),
        salary_usd,
    })
}

/// Keep rows with a positive numeric salary and a positive numeric year.
///
/// Malformed rows are expected noise in survey data and are dropped without
/// error. Input order is preserved.
pub fn validate(rows: &[RawRow]) -> Vec<ValidRow> {
    let valid: Vec<ValidRow> = rows.iter().filter_map(validate_row).collect();

    let dropped = rows.len() - valid.len();
    if dropped > 0 {
        debug!("Dropped {} of {} rows during validation", dropped, rows.len());
    }

    valid
}

/// Roll rows up into one summary per distinct year, ascending by year.
///
/// Averages are rounded half-up (away from zero) to whole dollars.
pub fn aggregate_by_year(rows: &[ValidRow]) -> Vec<YearSummary> {
    let mut totals: BTreeMap<u32, (usize, Decimal)> = BTreeMap::new();

    for row in rows {
        let (count, sum) = totals.entry(row.year).or_insert((0, Decimal::ZERO));
        match sum.checked_add(row.salary_usd) {
            Some(next) => {
                *sum = next;
                *count += 1;
            }
            None => warn!(
                "Salary sum for {} overflowed, skipping row ({})",
                row.year, row.job_title
            ),
        }
    }

    totals
        .into_iter()
        .filter(|(_, (count, _))| *count > 0)
        .map(|(year, (count, sum))| YearSummary {
            year,
            total_jobs: count,
            average_salary: (sum / Decimal::from(count))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero),
        })
        .collect()
}

/// Count job titles among the rows of a single year.
///
/// Titles are compared exactly; entries appear in first-seen order.
pub fn aggregate_titles_for_year(rows: &[ValidRow], year: u32) -> Vec<TitleBreakdown> {
    let mut breakdown: Vec<TitleBreakdown> = Vec::new();
    let mut positions: HashMap<&str, usize> = HashMap::new();

    for row in rows.iter().filter(|r| r.year == year) {
        match positions.get(row.job_title.as_str()) {
            Some(&idx) => breakdown[idx].count += 1,
            None => {
                positions.insert(row.job_title.as_str(), breakdown.len());
                breakdown.push(TitleBreakdown {
                    job_title: row.job_title.clone(),
                    count: 1,
                });
            }
        }
    }

    breakdown
}

/// Sort year summaries for display.
pub fn sort_summaries(summaries: &mut [YearSummary], key: SummarySort, descending: bool) {
    summaries.sort_by(|a, b| {
        let ordering = match key {
            SummarySort::Year => a.year.cmp(&b.year),
            SummarySort::Jobs => a.total_jobs.cmp(&b.total_jobs).then(a.year.cmp(&b.year)),
            SummarySort::Salary => a
                .average_salary
                .cmp(&b.average_salary)
                .then(a.year.cmp(&b.year)),
        };
        if descending {
            ordering.reverse()
        } else {
            ordering
        }
    });
}

/// Sort a title breakdown for display.
pub fn sort_breakdown(breakdown: &mut [TitleBreakdown], key: TitleSort) {
    match key {
        TitleSort::Title => breakdown.sort_by(|a, b| {
            a.job_title
                .to_lowercase()
                .cmp(&b.job_title.to_lowercase())
                .then_with(|| a.job_title.cmp(&b.job_title))
        }),
        TitleSort::Count => breakdown.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| a.job_title.cmp(&b.job_title))
        }),
    }
}

/// Jobs-per-year series for the chart, ascending by year.
pub fn chart_series(summaries: &[YearSummary]) -> Vec<ChartPoint> {
    let mut points: Vec<ChartPoint> = summaries.iter().map(ChartPoint::from).collect();
    points.sort_by_key(|p| p.year);
    points
}
