mod common;

use motif_search::synthetic::{generate_sequences, plant_motif};
use motif_search::{MotifError, Sequence};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_generate_sequences() {
    let alphabet = common::dna();
    let mut rng = StdRng::seed_from_u64(12);
    let sequences = generate_sequences(&alphabet, 40, 6, &mut rng);
    assert_eq!(sequences.len(), 6);
    assert!(sequences.iter().all(|s| s.len() == 40));
    assert!(sequences.iter().all(|s| **s.alphabet() == *alphabet));
}

#[test]
fn test_planted_copies_are_exact_without_mutation() {
    let alphabet = common::dna();
    let mut rng = StdRng::seed_from_u64(8);
    let mut sequences = generate_sequences(&alphabet, 50, 5, &mut rng);
    let planted = plant_motif(&mut sequences, 8, 0.0, &mut rng).unwrap();

    assert_eq!(planted.motif.len(), 8);
    assert_eq!(planted.starts.len(), 5);
    for (sequence, &start) in sequences.iter().zip(&planted.starts) {
        assert_eq!(sequence.len(), 58);
        assert_eq!(sequence.subsequence(start, start + 8).unwrap(), planted.motif);
    }

    let profile = planted.profile(&sequences).unwrap();
    assert_eq!(profile.consensus(), planted.motif);
    assert_eq!(profile.alignment_starts(), planted.starts.as_slice());
}

#[test]
fn test_plant_motif_errors() {
    let mut rng = StdRng::seed_from_u64(8);
    let mut none: Vec<Sequence> = Vec::new();
    assert!(matches!(
        plant_motif(&mut none, 8, 0.1, &mut rng),
        Err(MotifError::EmptyInput(_))
    ));

    let alphabet = common::dna();
    let mut sequences = generate_sequences(&alphabet, 20, 3, &mut rng);
    assert!(matches!(
        plant_motif(&mut sequences, 8, 1.5, &mut rng),
        Err(MotifError::InvalidParameter { .. })
    ));
}
