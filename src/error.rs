//! Error types shared by every stage of an inference run.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum HeredityError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A record could not be turned into an `Observation`
    #[error("Parse error at line {line}: {message}")]
    Parse { line: u64, message: String },

    /// Model parameters are unreadable or not valid probabilities
    #[error("Invalid model parameters: {message}")]
    Params { message: String },

    /// Broken pedigree: unknown or lone parent, or a parent cycle
    #[error("Malformed input: {message}")]
    MalformedInput { message: String },

    #[error("Conflicting records for {person}")]
    ConflictingRecords { person: String },

    /// No trait assignment agrees with the observed traits
    #[error("Contradictory evidence: no hypothesis is consistent with the observations")]
    ContradictoryEvidence,

    #[error("Degenerate {distribution} distribution for {person}: accumulated mass is zero")]
    Degenerate {
        person: String,
        distribution: &'static str,
    },

    #[error("Population of {size} exceeds the enumeration limit of {limit}")]
    PopulationTooLarge { size: usize, limit: usize },
}

pub type Result<T, E = HeredityError> = std::result::Result<T, E>;

impl HeredityError {
    pub fn parse(line: u64, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }

    pub fn params(message: impl Into<String>) -> Self {
        Self::Params {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedInput {
            message: message.into(),
        }
    }
}

impl From<serde_json::Error> for HeredityError {
    fn from(err: serde_json::Error) -> Self {
        Self::Params {
            message: err.to_string(),
        }
    }
}
