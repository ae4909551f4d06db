use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::finder::{arg_min, Finder};
use crate::profile::Profile;
use crate::scoring::{check_scorer, Capabilities, Score};
use crate::sequence::Sequence;
use log::{debug, info, warn};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

pub const DEFAULT_OPTIMIZATION_THRESHOLD: f64 = 1e-7;
pub const DEFAULT_MAX_SWEEPS: usize = 50_000;
const PROGRESS_INTERVAL: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GibbsConfig {
    /// Minimum profile score gain for a resampled alignment to be kept
    pub optimization_threshold: f64,
    /// Hard cap on sweeps per run
    pub max_sweeps: usize,
}

impl Default for GibbsConfig {
    fn default() -> Self {
        Self {
            optimization_threshold: DEFAULT_OPTIMIZATION_THRESHOLD,
            max_sweeps: DEFAULT_MAX_SWEEPS,
        }
    }
}

impl GibbsConfig {
    pub fn validate(&self) -> Result<()> {
        if !self.optimization_threshold.is_finite() || self.optimization_threshold < 0.0 {
            return Err(MotifError::invalid_parameter(
                "optimization_threshold",
                self.optimization_threshold,
                "must be a finite, non-negative number",
            ));
        }
        if self.max_sweeps == 0 {
            return Err(MotifError::invalid_parameter(
                "max_sweeps",
                self.max_sweeps,
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Gibbs sampling over alignment starts.
///
/// Each step picks an unsettled sequence at random, scores all of its l-mers
/// against a profile built from the other sequences, and samples a new start
/// in proportion to those scores. The move is kept only if it raises the full
/// profile score by more than the optimization threshold; a kept move
/// unsettles every sequence again, a rejected one settles the chosen
/// sequence. A run ends after a sweep in which every sequence settles.
#[derive(Debug)]
pub struct GibbsSamplingFinder<'a, S> {
    profile: Profile<'a>,
    scorer: S,
    config: GibbsConfig,
    accepted_scores: Vec<f64>,
}

impl<'a, S: Score> GibbsSamplingFinder<'a, S> {
    /// # Errors
    /// * `MotifError::UnsupportedScore` - If `scorer` cannot score both profiles and l-mers
    /// * `MotifError::InvalidParameter` - If the scorer's pseudo-zero is negative or not finite
    /// * `MotifError::InvalidParameter` - If fewer than two sequences are given
    /// * Any error from [`Profile::new`] or [`GibbsConfig::validate`]
    pub fn new(
        alphabet: Arc<Alphabet>,
        sequences: &'a [Sequence],
        motif_length: usize,
        config: GibbsConfig,
        scorer: S,
    ) -> Result<Self> {
        config.validate()?;
        check_scorer(&scorer, Capabilities::ALL)?;
        if sequences.len() < 2 {
            return Err(MotifError::invalid_parameter(
                "sequences",
                sequences.len(),
                "Gibbs sampling leaves one sequence out and needs at least 2",
            ));
        }
        let profile = Profile::new(alphabet, sequences, motif_length)?;
        Ok(Self {
            profile,
            scorer,
            config,
            accepted_scores: Vec::new(),
        })
    }

    pub fn config(&self) -> &GibbsConfig {
        &self.config
    }

    /// Profile score after seeding and after every accepted move of the last run
    pub fn accepted_scores(&self) -> &[f64] {
        &self.accepted_scores
    }
}

impl<'a, S: Score> Finder<'a> for GibbsSamplingFinder<'a, S> {
    fn name(&self) -> &'static str {
        "Gibbs Sampling Finder"
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

        let mut current_score = self.scorer.score_profile(&self.profile)?;
        self.accepted_scores.clear();
        self.accepted_scores.push(current_score);

        let mut steps = 0;
        let mut sweeps = 0;
        let mut changed = true;
        while changed && sweeps < self.config.max_sweeps {
            changed = false;
            let mut unsettled: Vec<usize> = (0..self.profile.sequence_count()).collect();

            while !unsettled.is_empty() {
                if steps % PROGRESS_INTERVAL == 0 {
                    debug!(
                        "Iteration : {} - Score : {:.5} - Alignments : {}",
                        steps,
                        current_score,
                        self.profile.format_alignments()
                    );
                }
                steps += 1;

                let selection = rng.random_range(0..unsettled.len());
                let chosen = unsettled[selection];
                let sequence = self.profile.sequences()[chosen];

                let culled = self.profile.leave_one_out(chosen)?;
                let mut weights = culled.score_all_lmers(sequence, &self.scorer)?;
                let new_start = roulette_select(&mut weights, rng)?;

                let old_score = self.scorer.score_profile(&self.profile)?;
                let old_start = self.profile.alignment_start(chosen)?;
                self.profile.update_alignment_start(chosen, new_start)?;
                let new_score = self.scorer.score_profile(&self.profile)?;

                if new_score - old_score > self.config.optimization_threshold {
                    changed = true;
                    current_score = new_score;
                    self.accepted_scores.push(new_score);
                    break;
                }
                self.profile.update_alignment_start(chosen, old_start)?;
                unsettled.remove(selection);
            }
            sweeps += 1;
        }

        let consensus = self.profile.consensus();
        info!(
            "*** Result : Final Score {:.5} - Predicted Motif : {} ***",
            current_score, consensus
        );
        Ok(consensus)
    }
}

/// Picks an index with probability proportional to its weight.
///
/// Weights are first shifted up by the magnitude of the smallest one so none
/// are negative. Falls back to index 0 when every shifted weight is zero.
fn roulette_select<R: Rng + ?Sized>(weights: &mut [f64], rng: &mut R) -> Result<usize> {
    let shift = weights[arg_min(weights)?].abs();
    let mut total = 0.0;
    for weight in weights.iter_mut() {
        *weight += shift;
        total += *weight;
    }
    if total <= 0.0 {
        warn!("All sampling weights are zero, keeping the first l-mer");
    }

    let mut threshold = rng.random::<f64>() * total;
    for (index, &weight) in weights.iter().enumerate() {
        if threshold < weight {
            return Ok(index);
        }
        threshold -= weight;
    }
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roulette_shifts_negative_weights() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut weights = vec![-3.0, -1.0, -2.0];
        roulette_select(&mut weights, &mut rng).unwrap();
        assert_eq!(weights, vec![0.0, 2.0, 1.0]);
    }

    #[test]
    fn test_roulette_never_picks_zero_weight() {
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..200 {
            let mut weights = vec![-5.0, 1.0, 1.0];
            let picked = roulette_select(&mut weights, &mut rng).unwrap();
            assert_ne!(picked, 0);
        }
    }

    #[test]
    fn test_roulette_all_zero_falls_back_to_first() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut weights = vec![0.0, 0.0, 0.0];
        assert_eq!(roulette_select(&mut weights, &mut rng).unwrap(), 0);
    }

    #[test]
    fn test_roulette_empty_is_error() {
        let mut rng = StdRng::seed_from_u64(3);
        assert!(roulette_select(&mut [], &mut rng).is_err());
    }
}
