//! CSV decoding into raw survey rows.

use super::error::SourceError;
use crate::models::RawRow;
use csv::{ReaderBuilder, StringRecord};

/// Columns every record source must provide.
pub const REQUIRED_COLUMNS: [&str; 3] = ["work_year", "job_title", "salary_in_usd"];

fn column_index(headers: &StringRecord, name: &'static str) -> Result<usize, SourceError> {
    headers
        .iter()
        .position(|header| header == name)
        .ok_or(SourceError::MissingColumn(name))
}

/// Decode delimited text with a header row.
///
/// Extra columns are ignored and short lines are tolerated (missing fields
/// become `None`). A missing header column or a CSV syntax error fails the
/// whole decode.
pub fn decode_records(text: &str) -> Result<Vec<RawRow>, SourceError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(text.as_bytes());

    let headers = reader.headers()?.clone();
    let [year_col, title_col, salary_col] = REQUIRED_COLUMNS;
    let year_idx = column_index(&headers, year_col)?;
    let title_idx = column_index(&headers, title_col)?;
    let salary_idx = column_index(&headers, salary_col)?;

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        rows.push(RawRow {
            work_year: record.get(year_idx).map(str::to_string),
            job_title: record.get(title_idx).map(str::to_string),
            salary_in_usd: record.get(salary_idx).map(str::to_string),
        });
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_fixture() {
        let rows = decode_records(include_str!("../../fixtures/salaries.csv")).unwrap();

        assert_eq!(rows.len(), 12);
        assert_eq!(rows[0], RawRow::new("2023", "Data Scientist", "175000"));
    }

    #[test]
    fn test_decode_ignores_extra_columns_and_order() {
        let text = "salary_in_usd,experience_level,job_title,work_year\n85000,SE,Analyst,2021\n";

        let rows = decode_records(text).unwrap();

        assert_eq!(rows, vec![RawRow::new("2021", "Analyst", "85000")]);
    }

    #[test]
    fn test_decode_short_line_has_missing_fields() {
        let text = "work_year,job_title,salary_in_usd\n2022,Analyst\n";

        let rows = decode_records(text).unwrap();

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].job_title.as_deref(), Some("Analyst"));
        assert_eq!(rows[0].salary_in_usd, None);
    }

    #[test]
    fn test_decode_quoted_titles() {
        let text = "work_year,job_title,salary_in_usd\n2022,\"Head of Data, EMEA\",210000\n";

        let rows = decode_records(text).unwrap();

        assert_eq!(rows[0].job_title.as_deref(), Some("Head of Data, EMEA"));
    }

    #[test]
    fn test_decode_missing_column() {
        let text = "work_year,title,salary_in_usd\n2022,Analyst,1\n";

        let err = decode_records(text).unwrap_err();

        assert!(matches!(err, SourceError::MissingColumn("job_title")));
    }

    #[test]
    fn test_decode_empty_text() {
        assert!(matches!(
            decode_records(""),
            Err(SourceError::MissingColumn(_))
        ));
    }
}
