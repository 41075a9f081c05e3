use crate::allocation::pipeline::DEFAULT_SEATS;
use crate::allocation::threshold::DEFAULT_THRESHOLD_PERCENT;
use crate::allocation::AllocationParams;
use crate::model::agreement::AgreementError;
use crate::model::{AgreementRegistry, SurplusAgreement};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Could not read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Invalid election file {path}: {source}")]
    Json {
        path: PathBuf,
        source: serde_json::Error,
    },
    #[error("Invalid surplus agreement: {0}")]
    InvalidAgreement(#[from] AgreementError),
    #[error("Seat count must be greater than zero")]
    InvalidSeats,
    #[error("Threshold must be between 0 and 100 percent, got {0}")]
    InvalidThreshold(f64),
}

pub type Result<T> = std::result::Result<T, ConfigError>;

/// Columns of the central elections committee file that are not party votes.
pub const DEFAULT_DROPPED_COLUMNS: [&str; 7] = [
    "סמל ועדה",
    "שם ישוב",
    "סמל ישוב",
    "בזב",
    "מצביעים",
    "פסולים",
    "כשרים",
];

fn default_seats() -> u32 {
    DEFAULT_SEATS
}

fn default_threshold_percent() -> f64 {
    DEFAULT_THRESHOLD_PERCENT
}

fn default_dropped_columns() -> Vec<String> {
    DEFAULT_DROPPED_COLUMNS.iter().map(|c| c.to_string()).collect()
}

/// Election file as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElectionMetadata {
    pub name: String,
    pub votes_file: String,
    #[serde(default = "default_seats")]
    pub seats: u32,
    #[serde(default = "default_threshold_percent")]
    pub threshold_percent: f64,
    #[serde(default = "default_dropped_columns")]
    pub dropped_columns: Vec<String>,
    #[serde(default)]
    pub surplus_agreements: Vec<(String, String)>,
}

/// Everything one run needs, resolved and validated.
#[derive(Debug, Clone)]
pub struct ElectionConfig {
    pub name: String,
    pub votes_path: PathBuf,
    pub params: AllocationParams,
    pub dropped_columns: Vec<String>,
    pub agreements: AgreementRegistry,
}

impl ElectionConfig {
    /// Validate metadata; `base_dir` anchors a relative votes file.
    pub fn from_metadata(metadata: ElectionMetadata, base_dir: &Path) -> Result<Self> {
        if metadata.seats == 0 {
            return Err(ConfigError::InvalidSeats);
        }
        if !(0.0..=100.0).contains(&metadata.threshold_percent) {
            return Err(ConfigError::InvalidThreshold(metadata.threshold_percent));
        }

        let agreements = AgreementRegistry::new(
            metadata
                .surplus_agreements
                .into_iter()
                .map(|(first, second)| SurplusAgreement::new(first, second))
                .collect(),
        )?;

        Ok(ElectionConfig {
            name: metadata.name,
            votes_path: base_dir.join(metadata.votes_file),
            params: AllocationParams {
                seats: metadata.seats,
                threshold_percent: metadata.threshold_percent,
            },
            dropped_columns: metadata.dropped_columns,
            agreements,
        })
    }
}

pub fn read_election(path: &Path) -> Result<ElectionConfig> {
    let file = File::open(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let metadata: ElectionMetadata =
        serde_json::from_reader(BufReader::new(file)).map_err(|source| ConfigError::Json {
            path: path.to_path_buf(),
            source,
        })?;

    let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
    ElectionConfig::from_metadata(metadata, base_dir)
}
