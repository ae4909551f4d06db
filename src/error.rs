use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MotifError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("Alphabet must contain at least one symbol")]
    EmptyAlphabet,

    #[error("Invalid alphabet symbol: {0:?}")]
    InvalidSymbol(String),

    #[error("Duplicate alphabet symbol: {0}")]
    DuplicateSymbol(String),

    #[error("Alphabet has {symbols} symbols but {probabilities} probabilities")]
    ProbabilityMismatch { symbols: usize, probabilities: usize },

    #[error("Invalid probability distribution: {0}")]
    InvalidDistribution(String),

    #[error("Symbol {0:?} is not in the alphabet")]
    UnknownSymbol(String),

    #[error("Symbol index {index} out of range for alphabet of size {size}")]
    SymbolIndexOutOfRange { index: usize, size: usize },

    #[error("Alphabet mismatch: {0}")]
    AlphabetMismatch(String),

    #[error("Length mismatch: expected {expected}, found {actual}")]
    LengthMismatch { expected: usize, actual: usize },

    #[error("Alignment start {start} out of range for sequence {sequence} (max {max})")]
    AlignmentOutOfRange {
        sequence: usize,
        start: usize,
        max: usize,
    },

    #[error("Sequence {0} is not part of the profile")]
    SequenceNotInProfile(usize),

    #[error("Sequence of length {length} is shorter than motif length {motif_length}")]
    SequenceTooShort { length: usize, motif_length: usize },

    #[error("Range {start}..{end} out of bounds for sequence of length {length}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        length: usize,
    },

    #[error("Empty input: {0}")]
    EmptyInput(String),

    #[error("{scorer} scoring does not support {operation} scores")]
    UnsupportedScore {
        scorer: &'static str,
        operation: &'static str,
    },

    #[error("Invalid file format: {0}")]
    InvalidFileFormat(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Data error: {0}")]
    DataError(String),

    #[error("Invalid parameter: {name} = {value}, {message}")]
    InvalidParameter {
        name: String,
        value: String,
        message: String,
    },
}

/// Type alias for Result with MotifError
pub type Result<T> = std::result::Result<T, MotifError>;

impl MotifError {
    /// Create a new InvalidParameter error
    pub fn invalid_parameter(
        name: impl Into<String>,
        value: impl ToString,
        message: impl Into<String>,
    ) -> Self {
        MotifError::InvalidParameter {
            name: name.into(),
            value: value.to_string(),
            message: message.into(),
        }
    }

    /// Create a new InvalidFileFormat error
    pub fn invalid_format(message: impl Into<String>) -> Self {
        MotifError::InvalidFileFormat(message.into())
    }

    pub(crate) fn unsupported(scorer: &'static str, operation: &'static str) -> Self {
        MotifError::UnsupportedScore { scorer, operation }
    }
}

impl From<polars::prelude::PolarsError> for MotifError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        MotifError::DataError(err.to_string())
    }
}
