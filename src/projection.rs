use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::finder::{arg_max, Finder};
use crate::profile::Profile;
use crate::scoring::{check_scorer, Capabilities, Score};
use crate::sequence::Sequence;
use log::{debug, info};
use rand::seq::index::sample;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

/// Largest projection table the finder will enumerate up front
pub const MAX_PROJECTION_BINS: usize = 1 << 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ProjectionConfig {
    /// Number of motif columns in each template (k)
    pub projection_size: usize,
    /// A bin votes for its l-mers only when its tally exceeds this
    pub bin_threshold: u32,
    /// Number of random templates to hash with
    pub iterations: usize,
}

impl Default for ProjectionConfig {
    fn default() -> Self {
        Self {
            projection_size: 4,
            bin_threshold: 3,
            iterations: 100,
        }
    }
}

impl ProjectionConfig {
    /// Checks the parameters against the motif length and alphabet size
    pub fn validate(&self, motif_length: usize, alphabet_size: usize) -> Result<()> {
        if self.projection_size == 0 || self.projection_size >= motif_length {
            return Err(MotifError::invalid_parameter(
                "projection_size",
                self.projection_size,
                format!("must be between 1 and {}", motif_length.saturating_sub(1)),
            ));
        }
        if self.iterations == 0 {
            return Err(MotifError::invalid_parameter(
                "iterations",
                self.iterations,
                "must be at least 1",
            ));
        }
        let bins = u32::try_from(self.projection_size)
            .ok()
            .and_then(|k| alphabet_size.checked_pow(k));
        match bins {
            Some(bins) if bins <= MAX_PROJECTION_BINS => Ok(()),
            _ => Err(MotifError::invalid_parameter(
                "projection_size",
                self.projection_size,
                format!(
                    "{}^{} projections exceed the {} bin limit",
                    alphabet_size, self.projection_size, MAX_PROJECTION_BINS
                ),
            )),
        }
    }
}

/// Random projection search.
///
/// Every iteration picks k of the L motif columns at random and hashes each
/// l-mer of each sequence by the symbols in those columns. Real motif
/// occurrences resemble each other, so they pile into the same bins more
/// often than background l-mers do. L-mers landing in crowded bins collect a
/// vote, and each sequence is finally aligned at its most voted start.
#[derive(Debug)]
pub struct RandomProjectionFinder<'a, S> {
    profile: Profile<'a>,
    scorer: S,
    config: ProjectionConfig,
    bins: HashMap<String, u32>,
    votes: Vec<Vec<u32>>,
}

impl<'a, S: Score> RandomProjectionFinder<'a, S> {
    /// # Errors
    /// * `MotifError::UnsupportedScore` - If `scorer` cannot score a whole profile
    /// * `MotifError::InvalidParameter` - If the scorer's pseudo-zero is negative or not finite
    /// * Any error from [`Profile::new`] or [`ProjectionConfig::validate`]
    pub fn new(
        alphabet: Arc<Alphabet>,
        sequences: &'a [Sequence],
        motif_length: usize,
        config: ProjectionConfig,
        scorer: S,
    ) -> Result<Self> {
        config.validate(motif_length, alphabet.len())?;
        check_scorer(&scorer, Capabilities::PROFILE)?;
        let bins = alphabet
            .all_sequences_of_length(config.projection_size)
            .into_iter()
            .map(|projection| (projection, 0))
            .collect();
        let profile = Profile::new(alphabet, sequences, motif_length)?;
        Ok(Self {
            profile,
            scorer,
            config,
            bins,
            votes: Vec::new(),
        })
    }

    pub fn config(&self) -> &ProjectionConfig {
        &self.config
    }

    /// Votes per l-mer start of every sequence from the last run
    pub fn votes(&self) -> &[Vec<u32>] {
        &self.votes
    }
}

impl<'a, S: Score> Finder<'a> for RandomProjectionFinder<'a, S> {
    fn name(&self) -> &'static str {
        "Random Projection Finder"
    }

    fn profile(&self) -> &Profile<'a> {
        &self.profile
    }

    fn scorer(&self) -> &dyn Score {
        &self.scorer
    }

    fn find_motifs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Sequence> {
        info!("*** Running {} ***", self.name());
        let length = self.profile.length();
        let sequences = self.profile.sequences().to_vec();
        let mut votes: Vec<Vec<u32>> = sequences
            .iter()
            .map(|sequence| vec![0; sequence.len() - length + 1])
            .collect();

        for iteration in 0..self.config.iterations {
            self.bins.values_mut().for_each(|tally| *tally = 0);
            let template = random_template(self.config.projection_size, length, rng);
            debug!("Iteration : {} - Template : {:?}", iteration, template);

            let projections = sequences
                .iter()
                .map(|sequence| {
                    (0..=sequence.len() - length)
                        .map(|start| sequence.projection_sorted(start, &template))
                        .collect::<Result<Vec<_>>>()
                })
                .collect::<Result<Vec<_>>>()?;

            for projection in projections.iter().flatten() {
                *self.bins.entry(projection.clone()).or_insert(0) += 1;
            }

            for (counts, keys) in votes.iter_mut().zip(&projections) {
                for (count, key) in counts.iter_mut().zip(keys) {
                    if self.bins.get(key).copied().unwrap_or(0) > self.config.bin_threshold {
                        *count += 1;
                    }
                }
            }
        }

        let starts = votes
            .iter()
            .map(|counts| arg_max(counts))
            .collect::<Result<Vec<_>>>()?;
        self.profile.set_alignment(&starts)?;
        self.votes = votes;

        let score = self.scorer.score_profile(&self.profile)?;
        let consensus = self.profile.consensus();
        info!(
            "*** Result : Final Score {:.5} - Predicted Motif : {} ***",
            score, consensus
        );
        Ok(consensus)
    }
}

/// `k` distinct motif columns drawn uniformly from `[0, length)`, ascending
fn random_template<R: Rng + ?Sized>(k: usize, length: usize, rng: &mut R) -> Vec<usize> {
    let mut template = sample(rng, length, k).into_vec();
    template.sort_unstable();
    template
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_template_is_sorted_and_distinct() {
        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let template = random_template(4, 7, &mut rng);
            assert_eq!(template.len(), 4);
            assert!(template.windows(2).all(|w| w[0] < w[1]));
            assert!(template.iter().all(|&p| p < 7));
        }
    }

    #[test]
    fn test_config_rejects_projection_as_long_as_motif() {
        let config = ProjectionConfig {
            projection_size: 7,
            ..Default::default()
        };
        assert!(config.validate(7, 4).is_err());
        assert!(ProjectionConfig::default().validate(7, 4).is_ok());
    }

    #[test]
    fn test_config_rejects_huge_tables() {
        let config = ProjectionConfig {
            projection_size: 12,
            ..Default::default()
        };
        assert!(config.validate(20, 20).is_err());
    }
}
