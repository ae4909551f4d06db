#![allow(dead_code)]

use motif_search::{Alphabet, Sequence};
use std::sync::Arc;

/// Five sequences with a planted GAATTCG at [80, 43, 34, 87, 0]
pub const PLANTED: [&str; 5] = [
    "TATCGGAGTGGCCTGCTCACTTTTTGCCGACAGCAAAAGTATCGTTCTCATTACTGGGCCTATATACCACTTCACTACGAGAATTCGCAGTGAAGCCGGGTACACCA",
    "TAGACCTTGCTCACTGACATCGCGGGACCATTGCTCAGAGACTGAATTCGAGGAGTCGTCATTGAGGTGAAACCGTTGTTACAGAGTGTAAGTATGTCCGAAAACAG",
    "AAATACCGAAGACTACAACAATCGAGAAGGGCTAGAATTCGCGCGTTATTCAACGTCCTCGGGTAACGAAGTGAGCCCTCCGCCATGTCGACCTGAGCTTAGGCCGC",
    "ACTTATCTATTGTGAAGTAGGGACCAAACTCAACATGACCAGTGCGCCCTCTCCACCGGATGAGGAAGGGGCTATCCGAATTAGCAAGAATTCGATATACAAGTATG",
    "GAATTCGATCCTTTTTGTGAGTAATCCGATTGTTCCTCCCTCTGCGCAATTTAGGTACTCTCACAGAGTTCGTTTGGCTTATTATAGGTTTGCGTCGAAGATCATTT",
];

pub const PLANTED_MOTIF: &str = "GAATTCG";

pub const PLANTED_STARTS: [usize; 5] = [80, 43, 34, 87, 0];

/// Five unrelated 57-symbol sequences
pub const SCORING: [&str; 5] = [
    "CAGGACACTTTCTAAACTGCCTAACTAAGATGCGTGCCCTTCGATTTTCAGGCTGTT",
    "GGAGGATACTATCAGTATTATACACCAGCGCTTCTTTCGGATTTTTAGAGCCCTGTG",
    "TAAGTAGCGTGGTCAACAACGTTGGCTAACAGGAAGGGCCAAAATTATTAGTGGAAG",
    "GAGAAACGGACATGGTGTACATTGGTCGGCTGTGGAATTGTATGCTCAGGTCTGGCT",
    "GTGAAATTCAACTCAGGTATGATTGACGTCCGGCCTGTGGCGGAGCGGCTCAGGGCA",
];

pub fn dna() -> Arc<Alphabet> {
    Arc::new(Alphabet::dna())
}

pub fn parse_all(alphabet: &Arc<Alphabet>, texts: &[&str]) -> Vec<Sequence> {
    texts
        .iter()
        .map(|text| Sequence::parse(Arc::clone(alphabet), text).unwrap())
        .collect()
}

pub fn planted_sequences(alphabet: &Arc<Alphabet>) -> Vec<Sequence> {
    parse_all(alphabet, &PLANTED)
}

pub fn scoring_sequences(alphabet: &Arc<Alphabet>) -> Vec<Sequence> {
    parse_all(alphabet, &SCORING)
}
