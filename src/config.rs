//! Search settings that can be kept in a JSON file.
//!
//! Every field has a default, so a file only needs the values it changes:
//!
//! ```json
//! {
//!   "scoring": "expected-information",
//!   "trials": 20,
//!   "gibbs": { "optimization_threshold": 1e-4 },
//!   "matrices": ["probability", "weight"]
//! }
//! ```

use crate::error::{MotifError, Result};
use crate::gibbs::GibbsConfig;
use crate::greedy::GreedyConfig;
use crate::projection::ProjectionConfig;
use crate::scoring::{Score, ScoringKind};
use crate::types::MatrixKind;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SearchConfig {
    pub scoring: ScoringKind,
    /// Floor for zero probabilities; the scoring kind's default when absent
    pub pseudo_zero: Option<f64>,
    /// Independent runs per search
    pub trials: usize,
    /// Profile matrices to report for the best run
    pub matrices: Vec<MatrixKind>,
    pub greedy: GreedyConfig,
    pub gibbs: GibbsConfig,
    pub projection: ProjectionConfig,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            scoring: ScoringKind::RelativeInformation,
            pseudo_zero: None,
            trials: 1,
            matrices: vec![MatrixKind::Probability],
            greedy: GreedyConfig::default(),
            gibbs: GibbsConfig::default(),
            projection: ProjectionConfig::default(),
        }
    }
}

impl SearchConfig {
    /// Reads and validates a JSON settings file
    ///
    /// # Errors
    /// * `MotifError::Io` - If the file cannot be opened
    /// * `MotifError::Json` - If the file is not valid JSON or has unknown fields
    /// * Any error from [`SearchConfig::validate`]
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        let config: Self = serde_json::from_reader(BufReader::new(file))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Checks every setting that does not depend on the problem.
    ///
    /// Projection settings are checked against the motif length and alphabet
    /// when the finder is built.
    pub fn validate(&self) -> Result<()> {
        if self.trials == 0 {
            return Err(MotifError::invalid_parameter(
                "trials",
                self.trials,
                "must be at least 1",
            ));
        }
        self.scorer()?;
        self.greedy.validate()?;
        self.gibbs.validate()
    }

    /// Builds the configured scoring strategy
    pub fn scorer(&self) -> Result<Box<dyn Score>> {
        self.scoring.build(self.pseudo_zero)
    }
}
