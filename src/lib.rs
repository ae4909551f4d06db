//! Motif discovery in biological sequences.
//!
//! A [`Profile`](profile::Profile) tracks where a candidate motif starts in every
//! sequence and keeps the position frequency, probability and weight matrices in
//! step with that alignment. The finders in [`greedy`], [`gibbs`] and
//! [`projection`] search the space of alignments for the one that maximises a
//! [`Score`](scoring::Score).

pub mod alphabet;
pub mod config;
pub mod error;
pub mod fasta;
pub mod finder;
pub mod gibbs;
pub mod greedy;
pub mod problem;
pub mod profile;
pub mod projection;
pub mod scoring;
pub mod sequence;
pub mod synthetic;
pub mod types;

pub use alphabet::Alphabet;
pub use config::SearchConfig;
pub use error::{MotifError, Result};
pub use finder::{Finder, MotifRun};
pub use gibbs::{GibbsConfig, GibbsSamplingFinder};
pub use greedy::{GreedyConfig, RandomizedGreedyFinder};
pub use profile::Profile;
pub use projection::{ProjectionConfig, RandomProjectionFinder};
pub use scoring::{
    Capabilities, ExpectationScore, ExpectedInformationScore, FrequencyScore,
    RelativeInformationScore, Score, ScoringKind,
};
pub use sequence::Sequence;
