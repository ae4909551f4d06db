use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Tabular view of a profile matrix.
/// Stored as a DataFrame with one column per alphabet symbol and one row per motif position
pub type ProfileFrame = DataFrame;

/// Alignment start of every sequence, in profile order
pub type Alignment = Vec<usize>;

/// Which of the three profile matrices to read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatrixKind {
    /// Position-frequency matrix (raw counts)
    Frequency,
    /// Position-probability matrix (counts / sequence count)
    Probability,
    /// Position-weight matrix (log2 odds against the background model)
    Weight,
}

impl fmt::Display for MatrixKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MatrixKind::Frequency => "PFM",
            MatrixKind::Probability => "PPM",
            MatrixKind::Weight => "PWM",
        };
        f.write_str(name)
    }
}
