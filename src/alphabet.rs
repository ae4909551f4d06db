use crate::error::{MotifError, Result};
use rand::Rng;
use std::collections::HashMap;
use std::fmt;

/// Tolerance used when checking that a background distribution sums to one
const DISTRIBUTION_TOLERANCE: f64 = 1e-6;

/// A finite set of symbols with a background probability for each one.
///
/// Symbols may be longer than one character. They are indexed in sorted order,
/// so two alphabets built from the same symbol set always agree on every
/// index no matter the order the symbols were supplied in. Sampling, k-mer
/// enumeration and consensus tie-breaks all walk the symbols in that order.
#[derive(Debug, Clone)]
pub struct Alphabet {
    symbols: Vec<String>,
    symbol_to_index: HashMap<String, usize>,
    probabilities: Vec<f64>,
}

impl Alphabet {
    /// Creates an alphabet from symbols and their background probabilities.
    ///
    /// # Arguments
    /// * `symbols` - The distinct, non-empty symbols of the alphabet
    /// * `probabilities` - Background probability of each symbol, in the same order
    ///
    /// # Errors
    /// * `MotifError::EmptyAlphabet` - If no symbols are given
    /// * `MotifError::InvalidSymbol` - If a symbol is the empty string
    /// * `MotifError::DuplicateSymbol` - If a symbol appears twice
    /// * `MotifError::ProbabilityMismatch` - If the vectors differ in length
    /// * `MotifError::InvalidDistribution` - If a probability is negative or the total is not 1
    pub fn new<I, S>(symbols: I, probabilities: Vec<f64>) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        if symbols.is_empty() || (symbols.len() == 1 && symbols[0].is_empty()) {
            return Err(MotifError::EmptyAlphabet);
        }
        if symbols.len() != probabilities.len() {
            return Err(MotifError::ProbabilityMismatch {
                symbols: symbols.len(),
                probabilities: probabilities.len(),
            });
        }

        let mut pairs: Vec<(String, f64)> = symbols.into_iter().zip(probabilities).collect();
        pairs.sort_by(|a, b| a.0.cmp(&b.0));

        let mut symbols = Vec::with_capacity(pairs.len());
        let mut probabilities = Vec::with_capacity(pairs.len());
        let mut symbol_to_index = HashMap::with_capacity(pairs.len());
        for (index, (symbol, probability)) in pairs.into_iter().enumerate() {
            if symbol.is_empty() {
                return Err(MotifError::InvalidSymbol(symbol));
            }
            if !probability.is_finite() || probability < 0.0 {
                return Err(MotifError::InvalidDistribution(format!(
                    "probability of {} is {}",
                    symbol, probability
                )));
            }
            if symbol_to_index.insert(symbol.clone(), index).is_some() {
                return Err(MotifError::DuplicateSymbol(symbol));
            }
            symbols.push(symbol);
            probabilities.push(probability);
        }

        let total: f64 = probabilities.iter().sum();
        if (total - 1.0).abs() > DISTRIBUTION_TOLERANCE {
            return Err(MotifError::InvalidDistribution(format!(
                "probabilities sum to {}",
                total
            )));
        }

        Ok(Self {
            symbols,
            symbol_to_index,
            probabilities,
        })
    }

    /// Creates an alphabet where every symbol is equally likely
    pub fn uniform<I, S>(symbols: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let symbols: Vec<String> = symbols.into_iter().map(Into::into).collect();
        let size = symbols.len();
        let probabilities = vec![1.0 / size as f64; size];
        Self::new(symbols, probabilities)
    }

    /// Creates an alphabet from a delimited string such as `"A,C,G,T"`.
    ///
    /// An empty delimiter splits the text into single characters. Without
    /// explicit probabilities the background distribution is uniform.
    pub fn from_delimited(
        text: &str,
        delimiter: &str,
        probabilities: Option<Vec<f64>>,
    ) -> Result<Self> {
        let symbols = split_symbols(text, delimiter);
        match probabilities {
            Some(probabilities) => Self::new(symbols, probabilities),
            None => Self::uniform(symbols),
        }
    }

    /// The DNA alphabet `ACGT` with a uniform background
    pub fn dna() -> Self {
        let symbols = ["A", "C", "G", "T"];
        let symbol_to_index = symbols
            .iter()
            .enumerate()
            .map(|(i, s)| (s.to_string(), i))
            .collect();
        Self {
            symbols: symbols.iter().map(|s| s.to_string()).collect(),
            symbol_to_index,
            probabilities: vec![0.25; 4],
        }
    }

    /// Index of a symbol
    pub fn index(&self, symbol: &str) -> Result<usize> {
        self.symbol_to_index
            .get(symbol)
            .copied()
            .ok_or_else(|| MotifError::UnknownSymbol(symbol.to_string()))
    }

    /// Symbol stored at an index
    pub fn symbol(&self, index: usize) -> Result<&str> {
        self.symbols
            .get(index)
            .map(String::as_str)
            .ok_or(MotifError::SymbolIndexOutOfRange {
                index,
                size: self.len(),
            })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Always false for a constructed alphabet
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    #[inline]
    pub fn contains(&self, symbol: &str) -> bool {
        self.symbol_to_index.contains_key(symbol)
    }

    /// Symbols in index (sorted) order
    pub fn symbols(&self) -> &[String] {
        &self.symbols
    }

    /// Background probability of the symbol at `index`
    ///
    /// # Panics
    /// Panics if `index` is not a valid symbol index.
    #[inline]
    pub fn probability(&self, index: usize) -> f64 {
        self.probabilities[index]
    }

    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub(crate) fn symbol_unchecked(&self, index: usize) -> &str {
        &self.symbols[index]
    }

    /// Draws a symbol index from the background distribution.
    ///
    /// Walks the cumulative distribution in symbol order and returns the first
    /// index whose cumulative probability exceeds a uniform draw in `[0, 1)`.
    /// Rounding can leave the total just under the draw, in which case the
    /// last symbol is returned.
    pub fn random_index<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        let draw: f64 = rng.random();
        let mut cumulative = 0.0;
        for (index, probability) in self.probabilities.iter().enumerate() {
            cumulative += probability;
            if draw < cumulative {
                return index;
            }
        }
        self.len() - 1
    }

    /// Draws a symbol from the background distribution
    pub fn random_symbol<R: Rng + ?Sized>(&self, rng: &mut R) -> &str {
        self.symbol_unchecked(self.random_index(rng))
    }

    /// Every word of `length` symbols over this alphabet, in lexicographic
    /// symbol order.
    ///
    /// The result holds `len()^length` strings, so keep `length` small.
    pub fn all_sequences_of_length(&self, length: usize) -> Vec<String> {
        let mut output = Vec::with_capacity(self.len().saturating_pow(length as u32));
        let mut builder: Vec<&str> = Vec::with_capacity(length);
        self.expand_words(&mut output, &mut builder, length);
        output
    }

    fn expand_words<'s>(
        &'s self,
        output: &mut Vec<String>,
        builder: &mut Vec<&'s str>,
        length: usize,
    ) {
        if builder.len() == length {
            output.push(builder.concat());
            return;
        }
        for symbol in &self.symbols {
            builder.push(symbol);
            self.expand_words(output, builder, length);
            builder.pop();
        }
    }
}

/// Two alphabets are equal when they hold the same symbols
impl PartialEq for Alphabet {
    fn eq(&self, other: &Self) -> bool {
        // symbols are kept sorted, so equal sets compare equal element-wise
        self.symbols == other.symbols
    }
}

impl Eq for Alphabet {}

impl Default for Alphabet {
    fn default() -> Self {
        Self::dna()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbols.concat())
    }
}

/// Splits text into symbols; an empty delimiter yields one symbol per character
pub(crate) fn split_symbols<'t>(text: &'t str, delimiter: &str) -> Vec<&'t str> {
    if delimiter.is_empty() {
        text.char_indices()
            .map(|(i, c)| &text[i..i + c.len_utf8()])
            .collect()
    } else {
        text.split(delimiter).collect()
    }
}
