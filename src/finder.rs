use crate::error::{MotifError, Result};
use crate::profile::Profile;
use crate::scoring::Score;
use crate::sequence::Sequence;
use log::info;
use polars::prelude::*;
use rand::Rng;
use statrs::statistics::Statistics;

/// Index of the first largest value
///
/// # Errors
/// * `MotifError::EmptyInput` - If `values` is empty
pub fn arg_max<T: PartialOrd + Copy>(values: &[T]) -> Result<usize> {
    let (first, rest) = values
        .split_first()
        .ok_or_else(|| MotifError::EmptyInput("arg_max of an empty slice".into()))?;
    let mut best = (0, *first);
    for (i, &value) in rest.iter().enumerate() {
        if value > best.1 {
            best = (i + 1, value);
        }
    }
    Ok(best.0)
}

/// Index of the first smallest value
///
/// # Errors
/// * `MotifError::EmptyInput` - If `values` is empty
pub fn arg_min<T: PartialOrd + Copy>(values: &[T]) -> Result<usize> {
    let (first, rest) = values
        .split_first()
        .ok_or_else(|| MotifError::EmptyInput("arg_min of an empty slice".into()))?;
    let mut best = (0, *first);
    for (i, &value) in rest.iter().enumerate() {
        if value < best.1 {
            best = (i + 1, value);
        }
    }
    Ok(best.0)
}

/// Best result of several independent finder runs
#[derive(Debug, Clone)]
pub struct MotifRun<'a> {
    /// Consensus of the best-scoring trial
    pub consensus: Sequence,
    /// Profile score of the best trial
    pub score: f64,
    /// Snapshot of the profile at the end of the best trial
    pub profile: Profile<'a>,
    /// Score of every trial, in the order they ran
    pub trial_scores: Vec<f64>,
    /// Consensus of every trial, in the order they ran
    pub trial_motifs: Vec<Sequence>,
}

impl MotifRun<'_> {
    pub fn mean_score(&self) -> f64 {
        self.trial_scores.iter().mean()
    }

    /// Sample standard deviation of the trial scores; NaN for a single trial
    pub fn score_std_dev(&self) -> f64 {
        self.trial_scores.iter().std_dev()
    }

    /// One row per trial with its score and consensus motif
    pub fn trials_frame(&self) -> Result<DataFrame> {
        let trials: Vec<u32> = (0..self.trial_scores.len() as u32).collect();
        let motifs: Vec<String> = self.trial_motifs.iter().map(|m| m.to_string()).collect();
        DataFrame::new(vec![
            Column::new("trial".into(), trials),
            Column::new("score".into(), self.trial_scores.clone()),
            Column::new("motif".into(), motifs),
        ])
        .map_err(|e| MotifError::DataError(e.to_string()))
    }
}

/// A search strategy over the alignment space of a profile.
///
/// A finder owns the profile it optimises. Each call to
/// [`Finder::find_motifs`] starts a fresh search and leaves the profile in the
/// state it ended in.
pub trait Finder<'a> {
    fn name(&self) -> &'static str;

    fn profile(&self) -> &Profile<'a>;

    fn scorer(&self) -> &dyn Score;

    /// Runs one search and returns the consensus of the final profile
    fn find_motifs<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<Sequence>;

    /// Score of the profile as it currently stands
    fn current_score(&self) -> Result<f64> {
        self.scorer().score_profile(self.profile())
    }

    /// Runs `trials` independent searches and keeps the best one.
    ///
    /// Trials run one after another. A later trial replaces the best only
    /// with a strictly higher score.
    ///
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `trials` is zero
    fn run_multiple<R: Rng + ?Sized>(&mut self, trials: usize, rng: &mut R) -> Result<MotifRun<'a>>
    where
        Self: Sized,
    {
        if trials == 0 {
            return Err(MotifError::invalid_parameter(
                "trials",
                trials,
                "must be at least 1",
            ));
        }

        info!("+++ Starting {} trials of {} +++", trials, self.name());
        let mut best: Option<(Sequence, f64, Profile<'a>)> = None;
        let mut trial_scores = Vec::with_capacity(trials);
        let mut trial_motifs = Vec::with_capacity(trials);

        for trial in 0..trials {
            let motif = self.find_motifs(rng)?;
            let score = self.current_score()?;
            info!(
                "Trial : {} - Score : {:.5} - Motif : {}",
                trial, score, motif
            );

            let improved = best.as_ref().is_none_or(|(_, top, _)| score > *top);
            if improved {
                best = Some((motif.clone(), score, self.profile().clone()));
            }
            trial_scores.push(score);
            trial_motifs.push(motif);
        }

        let (consensus, score, profile) = best
            .ok_or_else(|| MotifError::EmptyInput("no trial produced a result".into()))?;
        info!(
            "+++ Multiple trials finished - Max Score : {:.5} - Best Motif : {} +++",
            score, consensus
        );

        Ok(MotifRun {
            consensus,
            score,
            profile,
            trial_scores,
            trial_motifs,
        })
    }
}
