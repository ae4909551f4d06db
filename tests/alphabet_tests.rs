use motif_search::{Alphabet, MotifError};
use rand::rngs::StdRng;
use rand::SeedableRng;

#[test]
fn test_from_delimited_round_trip() {
    let alphabet = Alphabet::from_delimited("ACGT", "", None).unwrap();
    assert_eq!(alphabet.len(), 4);
    for (i, symbol) in ["A", "C", "G", "T"].iter().enumerate() {
        assert_eq!(alphabet.index(symbol).unwrap(), i);
        assert_eq!(alphabet.symbol(i).unwrap(), *symbol);
    }
    assert_eq!(alphabet.to_string(), "ACGT");
    assert_eq!(alphabet, Alphabet::dna());
}

#[test]
fn test_multi_character_symbols() {
    let alphabet = Alphabet::from_delimited("Leu,Ala,Gly", ",", None).unwrap();
    assert_eq!(alphabet.symbols(), &["Ala", "Gly", "Leu"]);
    assert_eq!(alphabet.index("Leu").unwrap(), 2);
    assert!(alphabet.contains("Gly"));
    assert!(!alphabet.contains("G"));
}

#[test]
fn test_indices_follow_sorted_order() {
    let shuffled = Alphabet::new(["T", "G", "C", "A"], vec![0.1, 0.2, 0.3, 0.4]).unwrap();
    assert_eq!(shuffled, Alphabet::dna());
    assert_eq!(shuffled.index("A").unwrap(), 0);
    // probabilities travel with their symbols
    assert_eq!(shuffled.probabilities(), &[0.4, 0.3, 0.2, 0.1]);
}

#[test]
fn test_empty_alphabet_is_rejected() {
    let result = Alphabet::from_delimited("", "", None);
    assert!(matches!(result, Err(MotifError::EmptyAlphabet)));

    let result = Alphabet::from_delimited("", ",", None);
    assert!(matches!(result, Err(MotifError::EmptyAlphabet)));
}

#[test]
fn test_bad_symbols_are_rejected() {
    let result = Alphabet::from_delimited("A,,C", ",", None);
    assert!(matches!(result, Err(MotifError::InvalidSymbol(_))));

    let result = Alphabet::from_delimited("ACA", "", None);
    assert!(matches!(result, Err(MotifError::DuplicateSymbol(s)) if s == "A"));
}

#[test]
fn test_distribution_validation() {
    let result = Alphabet::new(["A", "C"], vec![0.5]);
    assert!(matches!(
        result,
        Err(MotifError::ProbabilityMismatch {
            symbols: 2,
            probabilities: 1
        })
    ));

    let result = Alphabet::new(["A", "C"], vec![0.5, 0.6]);
    assert!(matches!(result, Err(MotifError::InvalidDistribution(_))));

    let result = Alphabet::new(["A", "C"], vec![1.5, -0.5]);
    assert!(matches!(result, Err(MotifError::InvalidDistribution(_))));

    assert!(Alphabet::new(["A", "C"], vec![0.3, 0.7]).is_ok());
}

#[test]
fn test_unknown_lookups() {
    let alphabet = Alphabet::dna();
    assert!(matches!(
        alphabet.index("N"),
        Err(MotifError::UnknownSymbol(s)) if s == "N"
    ));
    assert!(matches!(
        alphabet.symbol(4),
        Err(MotifError::SymbolIndexOutOfRange { index: 4, size: 4 })
    ));
}

#[test]
fn test_all_sequences_of_length() {
    let alphabet = Alphabet::from_delimited("AB", "", None).unwrap();
    assert_eq!(
        alphabet.all_sequences_of_length(2),
        vec!["AA", "AB", "BA", "BB"]
    );
    assert_eq!(Alphabet::dna().all_sequences_of_length(4).len(), 256);
    assert_eq!(Alphabet::dna().all_sequences_of_length(0), vec![""]);
}

#[test]
fn test_random_index_respects_distribution() {
    let alphabet = Alphabet::new(["A", "C", "G", "T"], vec![0.0, 1.0, 0.0, 0.0]).unwrap();
    let mut rng = StdRng::seed_from_u64(1);
    for _ in 0..100 {
        assert_eq!(alphabet.random_symbol(&mut rng), "C");
    }

    let alphabet = Alphabet::new(["A", "C"], vec![0.9, 0.1]).unwrap();
    let draws = 10_000;
    let a_count = (0..draws)
        .filter(|_| alphabet.random_index(&mut rng) == 0)
        .count();
    let frequency = a_count as f64 / draws as f64;
    assert!((frequency - 0.9).abs() < 0.03, "frequency was {}", frequency);
}
