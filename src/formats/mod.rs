pub mod delimited;
pub mod spreadsheet;

use crate::model::VoteTally;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Spreadsheet error in {path}: {message}")]
    Spreadsheet { path: PathBuf, message: String },
    #[error("No sheet with data in {0}")]
    EmptySheet(PathBuf),
    #[error("Unsupported vote file format: {0}")]
    UnsupportedFormat(PathBuf),
    #[error("Invalid vote count {value:?} at row {row}, column {column}")]
    InvalidCell {
        row: usize,
        column: String,
        value: String,
    },
    #[error("Column {0} appears more than once")]
    DuplicateColumn(String),
    #[error("Vote count for {column} does not fit in a 64-bit count")]
    CountOverflow { column: String },
}

pub type Result<T> = std::result::Result<T, FormatError>;

lazy_static! {
    static ref UNNAMED_COLUMN_RX: Regex = Regex::new(r"^Unnamed").unwrap();
}

/// Read a per-polling-station results file and sum it into one tally.
pub fn read_vote_tally(path: &Path, dropped_columns: &[String]) -> Result<VoteTally> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("csv") | Some("tsv") | Some("txt") => delimited::read_tally(path, dropped_columns),
        Some("xlsx") | Some("xlsm") | Some("xls") | Some("ods") => {
            spreadsheet::read_tally(path, dropped_columns)
        }
        _ => Err(FormatError::UnsupportedFormat(path.to_path_buf())),
    }
}

/// Whether a header names a party. Metadata columns in `dropped_columns`
/// and blank or `Unnamed...` columns are skipped; everything else counts.
pub fn is_party_column(header: &str, dropped_columns: &[String]) -> bool {
    !(header.is_empty()
        || UNNAMED_COLUMN_RX.is_match(header)
        || dropped_columns.iter().any(|dropped| dropped == header))
}

/// Parse a vote count cell. Blank cells are zero; whole floats such as
/// `12.0` are accepted since spreadsheet exports often write them.
pub fn parse_count(raw: &str) -> Option<u64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    if let Ok(count) = trimmed.parse::<u64>() {
        return Some(count);
    }
    whole_count(trimmed.parse::<f64>().ok()?)
}

pub(crate) fn whole_count(value: f64) -> Option<u64> {
    if value.is_finite() && value >= 0.0 && value.fract() == 0.0 && value <= u64::MAX as f64 {
        Some(value as u64)
    } else {
        None
    }
}

/// Sums cells into per-party totals, column by column.
pub(crate) struct TallyBuilder {
    columns: Vec<Option<String>>,
    tally: VoteTally,
}

impl TallyBuilder {
    pub fn from_headers<I, S>(headers: I, dropped_columns: &[String]) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut columns = Vec::new();
        let mut tally = VoteTally::new();

        for header in headers {
            let header = header.as_ref().trim_start_matches('\u{feff}').trim();
            if is_party_column(header, dropped_columns) {
                if tally.contains(header) {
                    return Err(FormatError::DuplicateColumn(header.to_string()));
                }
                tally.insert(header, 0);
                columns.push(Some(header.to_string()));
            } else {
                columns.push(None);
            }
        }

        Ok(Self { columns, tally })
    }

    pub fn party_at(&self, column: usize) -> Option<&str> {
        self.columns.get(column).and_then(|c| c.as_deref())
    }

    pub fn add(&mut self, column: usize, votes: u64) -> Result<()> {
        if let Some(Some(party)) = self.columns.get(column) {
            self.tally
                .add(party, votes)
                .ok_or_else(|| FormatError::CountOverflow {
                    column: party.clone(),
                })?;
        }
        Ok(())
    }

    pub fn finish(self) -> VoteTally {
        self.tally
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dropped() -> Vec<String> {
        vec!["סמל ועדה".to_string(), "כשרים".to_string()]
    }

    #[test]
    fn column_rule() {
        assert!(is_party_column("מחל", &dropped()));
        assert!(!is_party_column("כשרים", &dropped()));
        assert!(!is_party_column("Unnamed: 12", &dropped()));
        assert!(!is_party_column("", &dropped()));
        assert!(is_party_column("Not Unnamed", &dropped()));
    }

    #[test]
    fn parses_counts() {
        assert_eq!(parse_count("42"), Some(42));
        assert_eq!(parse_count(" 7 "), Some(7));
        assert_eq!(parse_count(""), Some(0));
        assert_eq!(parse_count("12.0"), Some(12));
        assert_eq!(parse_count("12.5"), None);
        assert_eq!(parse_count("-3"), None);
        assert_eq!(parse_count("abc"), None);
    }

    #[test]
    fn builder_skips_metadata_columns() {
        let mut builder =
            TallyBuilder::from_headers(vec!["\u{feff}סמל ועדה", "A", "Unnamed: 2", "B"], &dropped())
                .unwrap();
        assert_eq!(builder.party_at(0), None);
        assert_eq!(builder.party_at(1), Some("A"));
        builder.add(0, 99).unwrap();
        builder.add(1, 10).unwrap();
        builder.add(2, 99).unwrap();
        builder.add(3, 5).unwrap();
        builder.add(1, 3).unwrap();
        let tally = builder.finish();
        assert_eq!(tally.len(), 2);
        assert_eq!(tally.get("A"), Some(13));
        assert_eq!(tally.get("B"), Some(5));
    }

    #[test]
    fn builder_refuses_overflowing_column() {
        let mut builder = TallyBuilder::from_headers(vec!["A", "B"], &dropped()).unwrap();
        builder.add(0, u64::MAX).unwrap();
        builder.add(1, 1).unwrap();
        let result = builder.add(0, 1);
        assert!(matches!(result, Err(FormatError::CountOverflow { column }) if column == "A"));
    }

    #[test]
    fn builder_rejects_duplicate_party_columns() {
        let result = TallyBuilder::from_headers(vec!["A", "B", "A"], &dropped());
        assert!(matches!(result, Err(FormatError::DuplicateColumn(c)) if c == "A"));
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let result = read_vote_tally(Path::new("votes.parquet"), &dropped());
        assert!(matches!(result, Err(FormatError::UnsupportedFormat(_))));
    }
}
