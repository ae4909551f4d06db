use crate::alphabet::Alphabet;
use crate::error::{MotifError, Result};
use crate::sequence::Sequence;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;
use std::sync::Arc;

/// One FASTA entry
#[derive(Debug, Clone, PartialEq)]
pub struct FastaRecord {
    /// Header text without the leading '>'
    pub label: String,
    pub sequence: Sequence,
}

/// Reads sequences from a FASTA file into `alphabet`.
///
/// Sequence lines are upper-cased unless the alphabet has lower-case symbols
/// of its own.
///
/// # Errors
/// * `MotifError::Io` - For file reading issues
/// * `MotifError::InvalidFileFormat` - If no records are found, sequence data
///   appears before the first header, or a record has a symbol outside the alphabet
pub fn read_fasta<P: AsRef<Path>>(path: P, alphabet: &Arc<Alphabet>) -> Result<Vec<FastaRecord>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let fold_case = !alphabet
        .symbols()
        .iter()
        .any(|s| s.chars().any(char::is_lowercase));

    let mut raw: Vec<(String, String)> = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim();

        if let Some(header) = line.strip_prefix('>') {
            raw.push((header.to_string(), String::new()));
        } else if !line.is_empty() {
            let (_, residues) = raw.last_mut().ok_or_else(|| {
                MotifError::invalid_format("Sequence data before the first header")
            })?;
            if fold_case {
                residues.push_str(&line.to_uppercase());
            } else {
                residues.push_str(line);
            }
        }
    }

    if raw.is_empty() {
        return Err(MotifError::invalid_format("No sequences found"));
    }

    raw.into_iter()
        .map(|(label, residues)| {
            let sequence = Sequence::parse(Arc::clone(alphabet), &residues).map_err(|e| {
                MotifError::invalid_format(format!("Record {}: {}", label, e))
            })?;
            Ok(FastaRecord { label, sequence })
        })
        .collect()
}

/// Writes records to a FASTA file, one sequence line per record
pub fn write_fasta<P: AsRef<Path>>(records: &[FastaRecord], path: P) -> Result<()> {
    let mut file = File::create(path)?;
    for record in records {
        writeln!(file, ">{}", record.label)?;
        writeln!(file, "{}", record.sequence)?;
    }
    Ok(())
}
