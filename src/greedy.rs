use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::finder::{arg_max, Finder};
use crate::profile::Profile;
use crate::scoring::{check_scorer, Capabilities, Score};
use crate::sequence::Sequence;
use log::{debug, info};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_MAX_ITERATIONS: usize = 50_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GreedyConfig {
    /// Move each sequence to its best l-mer as soon as it is found, instead
    /// of applying all moves together at the end of the iteration
    pub update_each_step: bool,
    /// Hard cap on hill-climbing iterations per run
    pub max_iterations: usize,
}

impl Default for GreedyConfig {
    fn default() -> Self {
        Self {
            update_each_step: true,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl GreedyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max_iterations == 0 {
            return Err(MotifError::invalid_parameter(
                "max_iterations",
                self.max_iterations,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Randomized greedy hill climbing.
///
/// Starts from a random alignment, then repeatedly moves every sequence to
/// its highest scoring l-mer under the current profile until the profile
/// score stops improving. Each run is a local search; use
/// [`Finder::run_multiple`] to restart from several random seeds.
#[derive(Debug)]
pub struct RandomizedGreedyFinder<'a, S> {
    profile: Profile<'a>,
    scorer: S,
    config: GreedyConfig,
    score_trace: Vec<f64>,
}

impl<'a, S: Score> RandomizedGreedyFinder<'a, S> {
    /// # Errors
    /// * `MotifError::UnsupportedScore` - If `scorer` cannot score both profiles and l-mers
    /// * `MotifError::InvalidParameter` - If the scorer's pseudo-zero is negative or not finite
    /// * Any error from [`Profile::new`] or [`GreedyConfig::validate`]
    pub fn new(
        alphabet: Arc<Alphabet>,
        sequences: &'a [Sequence],
        motif_length: usize,
        config: GreedyConfig,
        scorer: S,
    ) -> Result<Self> {
        config.validate()?;
        check_scorer(&scorer, Capabilities::ALL)?;
        let profile = Profile::new(alphabet, sequences, motif_length)?;
        Ok(Self {
            profile,
            scorer,
            config,
            score_trace: Vec::new(),
        })
    }

    pub fn config(&self) -> &GreedyConfig {
        &self.config
    }

    /// Profile score after seeding and after every iteration of the last run
    pub fn score_trace(&self) -> &[f64] {
        &self.score_trace
    }
}

impl<'a, S: Score> Finder<'a> for RandomizedGreedyFinder<'a, S> {
    fn name(&self) -> &'static str {
        "Randomized Greedy Finder"
    }

    fn profile(&self) -> &Profile<'a> {
        &self.profile
    }

    fn scorer(&self) -> &dyn Score {
        &self.scorer
    }

    fn find_motifs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Sequence> {
        info!("*** Running {} ***", self.name());
        self.profile.generate_random_alignment(rng);

        let mut best_score = f64::NEG_INFINITY;
        let mut current_score = self.scorer.score_profile(&self.profile)?;
        self.score_trace.clear();
        self.score_trace.push(current_score);

        let mut iterations = 0;
        while current_score > best_score && iterations < self.config.max_iterations {
            debug!(
                "Iteration : {} - Score : {:.5} - Alignments : {}",
                iterations,
                current_score,
                self.profile.format_alignments()
            );
            best_score = current_score;
            let snapshot = self.profile.alignment_starts().to_vec();
            let mut staged = snapshot.clone();

            for index in 0..self.profile.sequence_count() {
                let sequence = self.profile.sequences()[index];
                let scores = self.profile.score_all_lmers(sequence, &self.scorer)?;
                let best_start = arg_max(&scores)?;
                if self.config.update_each_step {
                    self.profile.update_alignment_start(index, best_start)?;
                } else {
                    staged[index] = best_start;
                }
            }
            if !self.config.update_each_step {
                for (index, &start) in staged.iter().enumerate() {
                    self.profile.update_alignment_start(index, start)?;
                }
            }

            current_score = self.scorer.score_profile(&self.profile)?;
            if current_score < best_score {
                // score never decreases across iterations
                self.profile.set_alignment(&snapshot)?;
                current_score = best_score;
            }
            self.score_trace.push(current_score);
            iterations += 1;
        }

        let consensus = self.profile.consensus();
        info!(
            "*** Result : Final Score {:.5} - Predicted Motif : {} ***",
            current_score, consensus
        );
        Ok(consensus)
    }
}
