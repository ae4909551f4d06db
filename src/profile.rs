use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::scoring::Score;
use crate::sequence::Sequence;
use crate::types::{Alignment, MatrixKind, ProfileFrame};
use ndarray::{Array2, ArrayView2};
use polars::prelude::*;
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// Position frequency, probability and weight matrices of a set of aligned
/// l-mers, one per sequence.
///
/// Alignments are keyed by the sequence's position in the profile, so two
/// sequences with identical content are still tracked separately. All three
/// matrices are indexed `[[symbol, position]]` and are kept consistent with
/// the alignment vector by every method that changes it.
#[derive(Debug, Clone)]
pub struct Profile<'a> {
    alphabet: Arc<Alphabet>,
    sequences: Vec<&'a Sequence>,
    length: usize,
    alignments: Alignment,
    pfm: Array2<u32>,
    ppm: Array2<f64>,
    pwm: Array2<f64>,
    background: Vec<f64>,
    // pseudo-zero floor for the weight ratio, 1 / (10 N)
    delta: f64,
}

impl<'a> Profile<'a> {
    /// Builds a profile with every l-mer starting at offset 0.
    ///
    /// The background model is the empirical symbol frequency over every
    /// position of every sequence and is fixed for the life of the profile.
    ///
    /// # Arguments
    /// * `alphabet` - Alphabet shared by all sequences
    /// * `sequences` - The sequences to align
    /// * `length` - Motif length L
    ///
    /// # Errors
    /// * `MotifError::EmptyInput` - If no sequences are given
    /// * `MotifError::InvalidParameter` - If `length` is zero
    /// * `MotifError::AlphabetMismatch` - If a sequence uses another alphabet
    /// * `MotifError::SequenceTooShort` - If a sequence is shorter than `length`
    pub fn new<I>(alphabet: Arc<Alphabet>, sequences: I, length: usize) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Sequence>,
    {
        let sequences: Vec<&'a Sequence> = sequences.into_iter().collect();
        if sequences.is_empty() {
            return Err(MotifError::EmptyInput(
                "a profile needs at least one sequence".into(),
            ));
        }
        if length == 0 {
            return Err(MotifError::invalid_parameter(
                "motif_length",
                length,
                "must be at least 1",
            ));
        }
        for (i, sequence) in sequences.iter().enumerate() {
            if **sequence.alphabet() != *alphabet {
                return Err(MotifError::AlphabetMismatch(format!(
                    "sequence {} does not use the profile alphabet",
                    i
                )));
            }
            if sequence.len() < length {
                return Err(MotifError::SequenceTooShort {
                    length: sequence.len(),
                    motif_length: length,
                });
            }
        }

        let height = alphabet.len();
        let background = empirical_background(height, &sequences);
        let delta = 1.0 / (10.0 * sequences.len() as f64);
        let mut profile = Self {
            alignments: vec![0; sequences.len()],
            pfm: Array2::zeros((height, length)),
            ppm: Array2::zeros((height, length)),
            pwm: Array2::zeros((height, length)),
            alphabet,
            sequences,
            length,
            background,
            delta,
        };
        profile.update();
        Ok(profile)
    }

    /// Builds a profile with the given alignment starts, one per sequence
    pub fn with_alignment<I>(
        alphabet: Arc<Alphabet>,
        sequences: I,
        length: usize,
        starts: &[usize],
    ) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Sequence>,
    {
        let mut profile = Self::new(alphabet, sequences, length)?;
        profile.set_alignment(starts)?;
        Ok(profile)
    }

    /// Recomputes all three matrices from the current alignment
    pub fn update(&mut self) {
        self.pfm.fill(0);
        for (sequence, &start) in self.sequences.iter().zip(&self.alignments) {
            let window = &sequence.indices()[start..start + self.length];
            for (position, &symbol) in window.iter().enumerate() {
                self.pfm[[symbol, position]] += 1;
            }
        }
        for symbol in 0..self.height() {
            for position in 0..self.length {
                self.refresh_cell(symbol, position);
            }
        }
    }

    /// Moves one sequence's l-mer to `start`, touching only the cells that the
    /// old and new windows cover.
    ///
    /// The result is identical, cell for cell, to calling [`Profile::update`]
    /// after changing the alignment.
    ///
    /// # Errors
    /// * `MotifError::SequenceNotInProfile` - If `sequence` is not a profile index
    /// * `MotifError::AlignmentOutOfRange` - If `start` is past the last legal l-mer
    pub fn update_alignment_start(&mut self, sequence: usize, start: usize) -> Result<()> {
        self.check_start(sequence, start)?;
        let seq = self.sequences[sequence];
        let old_start = self.alignments[sequence];
        if old_start == start {
            return Ok(());
        }
        self.alignments[sequence] = start;

        for position in 0..self.length {
            let old_symbol = seq.index_at(old_start + position);
            self.pfm[[old_symbol, position]] -= 1;
            self.refresh_cell(old_symbol, position);

            let new_symbol = seq.index_at(start + position);
            self.pfm[[new_symbol, position]] += 1;
            self.refresh_cell(new_symbol, position);
        }
        Ok(())
    }

    /// Replaces the whole alignment vector and recomputes the matrices
    pub fn set_alignment(&mut self, starts: &[usize]) -> Result<()> {
        if starts.len() != self.sequences.len() {
            return Err(MotifError::LengthMismatch {
                expected: self.sequences.len(),
                actual: starts.len(),
            });
        }
        for (sequence, &start) in starts.iter().enumerate() {
            self.check_start(sequence, start)?;
        }
        self.alignments.copy_from_slice(starts);
        self.update();
        Ok(())
    }

    /// Gives every sequence a uniformly random legal start
    pub fn generate_random_alignment<R: Rng + ?Sized>(&mut self, rng: &mut R) {
        for (slot, sequence) in self.alignments.iter_mut().zip(&self.sequences) {
            *slot = rng.random_range(0..=sequence.len() - self.length);
        }
        self.update();
    }

    /// Scores every l-mer of `sequence` against this profile.
    ///
    /// Element `i` is the score of the l-mer starting at offset `i`.
    pub fn score_all_lmers<S>(&self, sequence: &Sequence, scorer: &S) -> Result<Vec<f64>>
    where
        S: Score + ?Sized,
    {
        if **sequence.alphabet() != *self.alphabet {
            return Err(MotifError::AlphabetMismatch(
                "scored sequence does not use the profile alphabet".into(),
            ));
        }
        if sequence.len() < self.length {
            return Err(MotifError::SequenceTooShort {
                length: sequence.len(),
                motif_length: self.length,
            });
        }
        sequence
            .indices()
            .windows(self.length)
            .map(|lmer| scorer.score_lmer(self, lmer))
            .collect()
    }

    /// The most probable symbol of every column; ties go to the lowest symbol index
    pub fn consensus(&self) -> Sequence {
        let indices = self
            .ppm
            .columns()
            .into_iter()
            .map(|column| {
                let mut best = 0;
                for (symbol, &probability) in column.iter().enumerate() {
                    if probability > column[best] {
                        best = symbol;
                    }
                }
                best
            })
            .collect();
        Sequence::from_indices_unchecked(Arc::clone(&self.alphabet), indices)
    }

    /// A profile over every sequence except `excluded`, keeping the other
    /// alignments. It gets its own background model and pseudo-zero.
    pub fn leave_one_out(&self, excluded: usize) -> Result<Profile<'a>> {
        if excluded >= self.sequences.len() {
            return Err(MotifError::SequenceNotInProfile(excluded));
        }
        let (sequences, starts): (Vec<&'a Sequence>, Vec<usize>) = self
            .sequences
            .iter()
            .zip(&self.alignments)
            .enumerate()
            .filter(|(i, _)| *i != excluded)
            .map(|(_, (&sequence, &start))| (sequence, start))
            .unzip();
        Profile::with_alignment(Arc::clone(&self.alphabet), sequences, self.length, &starts)
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn sequences(&self) -> &[&'a Sequence] {
        &self.sequences
    }

    /// Motif length L
    #[inline]
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of matrix rows, one per alphabet symbol
    #[inline]
    pub fn height(&self) -> usize {
        self.alphabet.len()
    }

    #[inline]
    pub fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    pub fn total_symbol_count(&self) -> usize {
        self.sequences.iter().map(|s| s.len()).sum()
    }

    pub fn alignment_starts(&self) -> &[usize] {
        &self.alignments
    }

    pub fn alignment_start(&self, sequence: usize) -> Result<usize> {
        self.alignments
            .get(sequence)
            .copied()
            .ok_or(MotifError::SequenceNotInProfile(sequence))
    }

    pub fn pfm(&self) -> ArrayView2<'_, u32> {
        self.pfm.view()
    }

    pub fn ppm(&self) -> ArrayView2<'_, f64> {
        self.ppm.view()
    }

    pub fn pwm(&self) -> ArrayView2<'_, f64> {
        self.pwm.view()
    }

    /// PFM cell. Panics on an out-of-range symbol or position.
    #[inline]
    pub fn count(&self, symbol: usize, position: usize) -> u32 {
        self.pfm[[symbol, position]]
    }

    /// PPM cell. Panics on an out-of-range symbol or position.
    #[inline]
    pub fn probability(&self, symbol: usize, position: usize) -> f64 {
        self.ppm[[symbol, position]]
    }

    /// PWM cell. Panics on an out-of-range symbol or position.
    #[inline]
    pub fn weight(&self, symbol: usize, position: usize) -> f64 {
        self.pwm[[symbol, position]]
    }

    /// Empirical background probability of each symbol, by symbol index
    pub fn background(&self) -> &[f64] {
        &self.background
    }

    pub fn delta(&self) -> f64 {
        self.delta
    }

    /// Alignment vector as `[a, b, c]`
    pub fn format_alignments(&self) -> String {
        let starts: Vec<String> = self.alignments.iter().map(|s| s.to_string()).collect();
        format!("[{}]", starts.join(", "))
    }

    /// Exports one matrix as a DataFrame with one column per symbol and one
    /// row per motif position
    pub fn to_frame(&self, kind: MatrixKind) -> Result<ProfileFrame> {
        let columns = self
            .alphabet
            .symbols()
            .iter()
            .enumerate()
            .map(|(symbol, name)| match kind {
                MatrixKind::Frequency => {
                    Column::new(name.as_str().into(), self.pfm.row(symbol).to_vec())
                }
                MatrixKind::Probability => {
                    Column::new(name.as_str().into(), self.ppm.row(symbol).to_vec())
                }
                MatrixKind::Weight => {
                    Column::new(name.as_str().into(), self.pwm.row(symbol).to_vec())
                }
            })
            .collect::<Vec<_>>();

        DataFrame::new(columns).map_err(|e| MotifError::DataError(e.to_string()))
    }

    fn check_start(&self, sequence: usize, start: usize) -> Result<()> {
        let seq = self
            .sequences
            .get(sequence)
            .ok_or(MotifError::SequenceNotInProfile(sequence))?;
        let max = seq.len() - self.length;
        if start > max {
            return Err(MotifError::AlignmentOutOfRange {
                sequence,
                start,
                max,
            });
        }
        Ok(())
    }

    /// Derives the PPM and PWM cells from the current count
    fn refresh_cell(&mut self, symbol: usize, position: usize) {
        let count = self.pfm[[symbol, position]];
        let probability = f64::from(count) / self.sequences.len() as f64;
        self.ppm[[symbol, position]] = probability;
        self.pwm[[symbol, position]] =
            log_odds(probability, self.background[symbol], self.delta);
    }
}

/// Base 2 log of probability over background, floored at `delta`
fn log_odds(probability: f64, background: f64, delta: f64) -> f64 {
    let ratio = if background > 0.0 {
        probability / background
    } else {
        0.0
    };
    ratio.max(delta).log2()
}

fn empirical_background(height: usize, sequences: &[&Sequence]) -> Vec<f64> {
    let mut counts = vec![0usize; height];
    for sequence in sequences {
        for &symbol in sequence.indices() {
            counts[symbol] += 1;
        }
    }
    let total: usize = counts.iter().sum();
    counts
        .into_iter()
        .map(|count| count as f64 / total as f64)
        .collect()
}

/// Prints the position probability matrix, one symbol per row
impl fmt::Display for Profile<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (symbol, name) in self.alphabet.symbols().iter().enumerate() {
            write!(f, "{} |", name)?;
            for probability in self.ppm.row(symbol) {
                write!(f, " {:.4}", probability)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
