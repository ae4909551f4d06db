//! Planted-motif test data.

use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::profile::Profile;
use crate::sequence::Sequence;
use rand::Rng;
use std::sync::Arc;

/// `count` random sequences of `length` symbols drawn from the background
pub fn generate_sequences<R: Rng + ?Sized>(
    alphabet: &Arc<Alphabet>,
    length: usize,
    count: usize,
    rng: &mut R,
) -> Vec<Sequence> {
    (0..count)
        .map(|_| Sequence::random(Arc::clone(alphabet), length, rng))
        .collect()
}

/// A motif inserted into a set of sequences, and where each copy landed
#[derive(Debug, Clone, PartialEq)]
pub struct PlantedMotif {
    /// The motif before mutation
    pub motif: Sequence,
    /// Start of the planted copy in each sequence
    pub starts: Vec<usize>,
}

impl PlantedMotif {
    /// Profile aligned on the planted copies
    pub fn profile<'a>(&self, sequences: &'a [Sequence]) -> Result<Profile<'a>> {
        Profile::with_alignment(
            Arc::clone(self.motif.alphabet()),
            sequences,
            self.motif.len(),
            &self.starts,
        )
    }
}

/// Draws a random motif and splices an independently mutated copy of it into
/// every sequence at a random position.
///
/// # Errors
/// * `MotifError::EmptyInput` - If `sequences` is empty
/// * `MotifError::InvalidParameter` - If `mutation_rate` is outside `[0, 1]`
/// * `MotifError::AlphabetMismatch` - If the sequences do not share one alphabet
pub fn plant_motif<R: Rng + ?Sized>(
    sequences: &mut [Sequence],
    motif_length: usize,
    mutation_rate: f64,
    rng: &mut R,
) -> Result<PlantedMotif> {
    let alphabet = sequences
        .first()
        .map(|s| Arc::clone(s.alphabet()))
        .ok_or_else(|| MotifError::EmptyInput("no sequences to plant a motif in".into()))?;

    let motif = Sequence::random(alphabet, motif_length, rng);
    let starts = sequences
        .iter_mut()
        .map(|sequence| {
            let mut copy = motif.clone();
            copy.mutate(mutation_rate, rng)?;
            sequence.insert_motif(&copy, rng)
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(PlantedMotif { motif, starts })
}
