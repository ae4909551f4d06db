use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::sequence::Sequence;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

/// Everything a finder needs: alphabet, motif length and sequences.
///
/// # Format
/// ```text
/// ACGT                    alphabet, one character per symbol
/// 0.25 0.25 0.25 0.25     background probability of each symbol
/// 7                       motif length
/// TATCGGAGTGGCCTGC...     one sequence per line
/// ```
/// Blank lines between sequences are skipped.
#[derive(Debug, Clone)]
pub struct MotifProblem {
    pub alphabet: Arc<Alphabet>,
    pub motif_length: usize,
    pub sequences: Vec<Sequence>,
}

impl MotifProblem {
    /// Reads a problem file
    ///
    /// # Errors
    /// * `MotifError::Io` - If the file cannot be opened or read
    /// * `MotifError::InvalidFileFormat` - If a header line is missing or malformed,
    ///   or no sequences follow
    /// * Alphabet and sequence construction errors for invalid content
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader<R: BufRead>(reader: R) -> Result<Self> {
        let mut lines = reader.lines();

        let symbols = required_line(&mut lines, "alphabet")?;
        let probabilities = required_line(&mut lines, "probability")?
            .split_whitespace()
            .map(|value| {
                value.parse::<f64>().map_err(|e| {
                    MotifError::invalid_format(format!("Invalid probability {}: {}", value, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let alphabet = Arc::new(Alphabet::from_delimited(&symbols, "", Some(probabilities))?);

        let length_line = required_line(&mut lines, "motif length")?;
        let motif_length = length_line.parse::<usize>().map_err(|e| {
            MotifError::invalid_format(format!("Invalid motif length {}: {}", length_line, e))
        })?;

        let mut sequences = Vec::new();
        for line in lines {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            sequences.push(Sequence::parse(Arc::clone(&alphabet), line)?);
        }

        if sequences.is_empty() {
            return Err(MotifError::invalid_format("No sequences found"));
        }

        Ok(Self {
            alphabet,
            motif_length,
            sequences,
        })
    }

    /// Writes the problem back out in the format `from_reader` accepts.
    ///
    /// # Errors
    /// * `MotifError::InvalidFileFormat` - If a symbol is longer than one character
    pub fn write_to<W: Write>(&self, mut writer: W) -> Result<()> {
        if let Some(symbol) = self
            .alphabet
            .symbols()
            .iter()
            .find(|s| s.chars().count() != 1)
        {
            return Err(MotifError::invalid_format(format!(
                "Symbol {:?} cannot be written to a problem file",
                symbol
            )));
        }

        let probabilities: Vec<String> = self
            .alphabet
            .probabilities()
            .iter()
            .map(|p| p.to_string())
            .collect();
        writeln!(writer, "{}", self.alphabet)?;
        writeln!(writer, "{}", probabilities.join(" "))?;
        writeln!(writer, "{}", self.motif_length)?;
        for sequence in &self.sequences {
            writeln!(writer, "{}", sequence)?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))
    }
}

fn required_line<I>(lines: &mut I, what: &str) -> Result<String>
where
    I: Iterator<Item = std::io::Result<String>>,
{
    match lines.next() {
        Some(line) => Ok(line?.trim().to_string()),
        None => Err(MotifError::invalid_format(format!("Missing {} line", what))),
    }
}
