use crate::alphabet::{split_symbols, Alphabet};
use crate::error::{MotifError, Result};
use rand::Rng;
use std::fmt;
use std::sync::Arc;

/// An ordered run of alphabet symbols, stored as symbol indices.
///
/// Every sequence shares its alphabet through an `Arc`, so cloning a sequence
/// never copies the alphabet itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    alphabet: Arc<Alphabet>,
    indices: Vec<usize>,
}

impl Sequence {
    /// Parses a sequence from text where symbols are separated by `delimiter`.
    ///
    /// An empty delimiter treats every character as one symbol. Empty text
    /// gives an empty sequence.
    ///
    /// # Errors
    /// * `MotifError::UnknownSymbol` - If a symbol is not part of the alphabet
    pub fn from_delimited(alphabet: Arc<Alphabet>, text: &str, delimiter: &str) -> Result<Self> {
        let indices = if text.is_empty() {
            Vec::new()
        } else {
            split_symbols(text, delimiter)
                .into_iter()
                .map(|symbol| alphabet.index(symbol))
                .collect::<Result<Vec<_>>>()?
        };
        Ok(Self { alphabet, indices })
    }

    /// Parses a sequence of single-character symbols, e.g. `"GAATTCG"`
    pub fn parse(alphabet: Arc<Alphabet>, text: &str) -> Result<Self> {
        Self::from_delimited(alphabet, text, "")
    }

    /// Builds a sequence from raw symbol indices
    ///
    /// # Errors
    /// * `MotifError::SymbolIndexOutOfRange` - If an index is not valid for the alphabet
    pub fn from_indices(alphabet: Arc<Alphabet>, indices: Vec<usize>) -> Result<Self> {
        if let Some(&index) = indices.iter().find(|&&i| i >= alphabet.len()) {
            return Err(MotifError::SymbolIndexOutOfRange {
                index,
                size: alphabet.len(),
            });
        }
        Ok(Self { alphabet, indices })
    }

    pub(crate) fn from_indices_unchecked(alphabet: Arc<Alphabet>, indices: Vec<usize>) -> Self {
        Self { alphabet, indices }
    }

    /// An empty sequence over `alphabet`
    pub fn empty(alphabet: Arc<Alphabet>) -> Self {
        Self {
            alphabet,
            indices: Vec::new(),
        }
    }

    /// Draws `length` symbols from the alphabet's background distribution
    pub fn random<R: Rng + ?Sized>(alphabet: Arc<Alphabet>, length: usize, rng: &mut R) -> Self {
        let indices = (0..length).map(|_| alphabet.random_index(rng)).collect();
        Self { alphabet, indices }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    /// Symbol indices of the whole sequence
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    /// Symbol index at `position`
    ///
    /// # Panics
    /// Panics if `position >= len()`.
    #[inline]
    pub fn index_at(&self, position: usize) -> usize {
        self.indices[position]
    }

    /// Symbol at `position`
    ///
    /// # Panics
    /// Panics if `position >= len()`.
    pub fn symbol_at(&self, position: usize) -> &str {
        self.alphabet.symbol_unchecked(self.indices[position])
    }

    /// Borrowed indices of the `length` symbols starting at `start`
    pub fn lmer(&self, start: usize, length: usize) -> Result<&[usize]> {
        let end = start + length;
        self.check_range(start, end)?;
        Ok(&self.indices[start..end])
    }

    /// Copy of the half-open range `[start, end)`
    pub fn subsequence(&self, start: usize, end: usize) -> Result<Sequence> {
        self.check_range(start, end)?;
        Ok(Self {
            alphabet: Arc::clone(&self.alphabet),
            indices: self.indices[start..end].to_vec(),
        })
    }

    /// Appends one symbol
    pub fn append(&mut self, symbol: &str) -> Result<()> {
        let index = self.alphabet.index(symbol)?;
        self.indices.push(index);
        Ok(())
    }

    /// Resamples every position independently with probability `rate`.
    ///
    /// A resampled position draws from the background distribution and may
    /// land on the symbol it already had. Returns how many positions were
    /// resampled.
    ///
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `rate` is outside `[0, 1]`
    pub fn mutate<R: Rng + ?Sized>(&mut self, rate: f64, rng: &mut R) -> Result<usize> {
        if !(0.0..=1.0).contains(&rate) {
            return Err(MotifError::invalid_parameter(
                "mutation_rate",
                rate,
                "must be between 0 and 1",
            ));
        }

        let mut resampled = 0;
        for slot in self.indices.iter_mut() {
            if rng.random::<f64>() < rate {
                *slot = self.alphabet.random_index(rng);
                resampled += 1;
            }
        }
        Ok(resampled)
    }

    /// Splices `motif` in at a uniformly random index in `[0, len]`.
    ///
    /// Returns the index the motif now starts at.
    ///
    /// # Errors
    /// * `MotifError::AlphabetMismatch` - If the motif uses a different alphabet
    pub fn insert_motif<R: Rng + ?Sized>(
        &mut self,
        motif: &Sequence,
        rng: &mut R,
    ) -> Result<usize> {
        if self.alphabet != motif.alphabet {
            return Err(MotifError::AlphabetMismatch(
                "inserted motif uses a different alphabet".into(),
            ));
        }
        let at = rng.random_range(0..=self.len());
        self.indices.splice(at..at, motif.indices.iter().copied());
        Ok(at)
    }

    /// Concatenated symbols at `start + offset` for each template offset,
    /// taken in ascending offset order.
    ///
    /// # Errors
    /// * `MotifError::RangeOutOfBounds` - If an offset runs past the end of the sequence
    pub fn projection(&self, start: usize, template: &[usize]) -> Result<String> {
        let mut offsets = template.to_vec();
        offsets.sort_unstable();
        self.projection_sorted(start, &offsets)
    }

    /// `projection` for a template already in ascending order
    pub(crate) fn projection_sorted(&self, start: usize, offsets: &[usize]) -> Result<String> {
        let mut projected = String::with_capacity(offsets.len());
        for &offset in offsets {
            let position = start + offset;
            if position >= self.len() {
                return Err(MotifError::RangeOutOfBounds {
                    start: position,
                    end: position + 1,
                    length: self.len(),
                });
            }
            projected.push_str(self.symbol_at(position));
        }
        Ok(projected)
    }

    fn check_range(&self, start: usize, end: usize) -> Result<()> {
        if start > end || end > self.len() {
            return Err(MotifError::RangeOutOfBounds {
                start,
                end,
                length: self.len(),
            });
        }
        Ok(())
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for &index in &self.indices {
            f.write_str(self.alphabet.symbol_unchecked(index))?;
        }
        Ok(())
    }
}
