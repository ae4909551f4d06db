mod common;

use motif_search::finder::{arg_max, arg_min};
use motif_search::{
    Capabilities, ExpectationScore, Finder, FrequencyScore, GibbsConfig, GibbsSamplingFinder,
    GreedyConfig, MotifError, Profile, ProjectionConfig, RandomProjectionFinder,
    RandomizedGreedyFinder, RelativeInformationScore, Score, ScoringKind,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;

#[test]
fn test_arg_max_and_min_pick_first_extreme() {
    assert_eq!(arg_max(&[1.0, 3.0, 2.0, 3.0]).unwrap(), 1);
    assert_eq!(arg_min(&[4, 1, 1, 7]).unwrap(), 1);
    assert!(matches!(
        arg_max::<f64>(&[]),
        Err(MotifError::EmptyInput(_))
    ));
}

#[test]
fn test_greedy_scores_never_decrease() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let mut rng = StdRng::seed_from_u64(2024);

    for update_each_step in [true, false] {
        let config = GreedyConfig {
            update_each_step,
            ..Default::default()
        };
        let mut finder = RandomizedGreedyFinder::new(
            Arc::clone(&alphabet),
            &sequences,
            7,
            config,
            RelativeInformationScore::default(),
        )
        .unwrap();

        for _ in 0..5 {
            let motif = finder.find_motifs(&mut rng).unwrap();
            let trace = finder.score_trace();
            assert!(trace.len() >= 2);
            assert!(trace.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(motif, finder.profile().consensus());
            assert_eq!(
                finder.current_score().unwrap(),
                *trace.last().unwrap()
            );
        }
    }
}

#[test]
fn test_greedy_is_reproducible_with_a_seed() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let run = |seed: u64| {
        let mut finder = RandomizedGreedyFinder::new(
            Arc::clone(&alphabet),
            &sequences,
            7,
            GreedyConfig::default(),
            RelativeInformationScore::default(),
        )
        .unwrap();
        let motif = finder.find_motifs(&mut StdRng::seed_from_u64(seed)).unwrap();
        (motif, finder.profile().alignment_starts().to_vec())
    };
    assert_eq!(run(7), run(7));
}

#[test]
fn test_greedy_needs_both_score_shapes() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let result = RandomizedGreedyFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        GreedyConfig::default(),
        ExpectationScore::default(),
    );
    assert!(matches!(
        result,
        Err(MotifError::UnsupportedScore {
            operation: "profile",
            ..
        })
    ));

    let config = GreedyConfig {
        max_iterations: 0,
        ..Default::default()
    };
    let result = RandomizedGreedyFinder::new(
        alphabet,
        &sequences,
        7,
        config,
        FrequencyScore::default(),
    );
    assert!(matches!(result, Err(MotifError::InvalidParameter { .. })));
}

#[test]
fn test_gibbs_accepts_only_improvements() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let mut rng = StdRng::seed_from_u64(99);
    let config = GibbsConfig {
        optimization_threshold: 1e-3,
        ..Default::default()
    };
    let mut finder = GibbsSamplingFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        config,
        RelativeInformationScore::default(),
    )
    .unwrap();

    for _ in 0..3 {
        finder.find_motifs(&mut rng).unwrap();
        let accepted = finder.accepted_scores();
        assert!(!accepted.is_empty());
        assert!(accepted.windows(2).all(|w| w[1] - w[0] > 1e-3));
        let final_score = finder.current_score().unwrap();
        assert!((final_score - accepted[accepted.len() - 1]).abs() < 1e-9);
    }
}

#[test]
fn test_gibbs_rejects_bad_input() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);

    let result = GibbsSamplingFinder::new(
        Arc::clone(&alphabet),
        &sequences[..1],
        7,
        GibbsConfig::default(),
        RelativeInformationScore::default(),
    );
    assert!(matches!(result, Err(MotifError::InvalidParameter { .. })));

    let config = GibbsConfig {
        optimization_threshold: -1.0,
        ..Default::default()
    };
    let result = GibbsSamplingFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        config,
        RelativeInformationScore::default(),
    );
    assert!(matches!(result, Err(MotifError::InvalidParameter { .. })));

    let result = GibbsSamplingFinder::new(
        alphabet,
        &sequences,
        7,
        GibbsConfig::default(),
        ExpectationScore::default(),
    );
    assert!(matches!(result, Err(MotifError::UnsupportedScore { .. })));
}

#[test]
fn test_projection_votes_and_aligns() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let config = ProjectionConfig::default();
    let mut finder = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        config,
        RelativeInformationScore::default(),
    )
    .unwrap();

    let motif = finder.find_motifs(&mut StdRng::seed_from_u64(31)).unwrap();
    assert_eq!(motif.len(), 7);
    assert_eq!(motif, finder.profile().consensus());

    let votes = finder.votes();
    assert_eq!(votes.len(), 5);
    for (counts, &start) in votes.iter().zip(finder.profile().alignment_starts()) {
        assert_eq!(counts.len(), 101);
        assert!(counts.iter().all(|&c| c as usize <= config.iterations));
        assert_eq!(start, arg_max(counts).unwrap());
    }
}

#[test]
fn test_projection_bin_at_threshold_casts_no_vote() {
    let alphabet = common::dna();
    let sequences = common::parse_all(&alphabet, &["AC", "AC", "AC"]);

    // every template puts all three l-mers in one bin with a tally of 3
    let at_threshold = ProjectionConfig {
        projection_size: 1,
        bin_threshold: 3,
        iterations: 10,
    };
    let mut finder = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        2,
        at_threshold,
        RelativeInformationScore::default(),
    )
    .unwrap();
    finder.find_motifs(&mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(finder.votes(), vec![vec![0u32]; 3].as_slice());

    let below_threshold = ProjectionConfig {
        bin_threshold: 2,
        ..at_threshold
    };
    let mut finder = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        2,
        below_threshold,
        RelativeInformationScore::default(),
    )
    .unwrap();
    let motif = finder.find_motifs(&mut StdRng::seed_from_u64(5)).unwrap();
    assert_eq!(finder.votes(), vec![vec![10u32]; 3].as_slice());
    assert_eq!(motif.to_string(), "AC");
}

#[test]
fn test_projection_recovers_planted_motif() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let mut finder = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        ProjectionConfig::default(),
        RelativeInformationScore::default(),
    )
    .unwrap();

    let motif = finder.find_motifs(&mut StdRng::seed_from_u64(0)).unwrap();
    assert_eq!(motif.to_string(), common::PLANTED_MOTIF);
    assert_eq!(
        finder.profile().alignment_starts(),
        &common::PLANTED_STARTS[..]
    );
}

#[test]
fn test_projection_accepts_profile_only_scores() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let frequency = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        ProjectionConfig::default(),
        FrequencyScore::default(),
    );
    assert!(frequency.is_ok());

    let expectation = RandomProjectionFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        ProjectionConfig::default(),
        ExpectationScore::default(),
    );
    assert!(matches!(
        expectation,
        Err(MotifError::UnsupportedScore { .. })
    ));

    let config = ProjectionConfig {
        projection_size: 0,
        ..Default::default()
    };
    let result = RandomProjectionFinder::new(
        alphabet,
        &sequences,
        7,
        config,
        FrequencyScore::default(),
    );
    assert!(matches!(result, Err(MotifError::InvalidParameter { .. })));
}

#[test]
fn test_run_multiple_keeps_the_best_trial() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let scorer = ScoringKind::RelativeInformation.build(None).unwrap();
    let mut finder = RandomizedGreedyFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        GreedyConfig::default(),
        scorer,
    )
    .unwrap();

    let result = finder
        .run_multiple(8, &mut StdRng::seed_from_u64(5))
        .unwrap();
    assert_eq!(result.trial_scores.len(), 8);
    assert_eq!(result.trial_motifs.len(), 8);

    let best = arg_max(&result.trial_scores).unwrap();
    assert_eq!(result.score, result.trial_scores[best]);
    assert_eq!(result.consensus, result.trial_motifs[best]);
    assert_eq!(result.consensus, result.profile.consensus());

    let rescored = RelativeInformationScore::default()
        .score_profile(&result.profile)
        .unwrap();
    assert!((rescored - result.score).abs() < 1e-9);

    let frame = result.trials_frame().unwrap();
    assert_eq!(frame.height(), 8);
    assert_eq!(frame.width(), 3);
    assert!(result.mean_score() <= result.score);
    assert!(result.score_std_dev() >= 0.0);
}

#[test]
fn test_run_multiple_rejects_zero_trials() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);
    let mut finder = GibbsSamplingFinder::new(
        Arc::clone(&alphabet),
        &sequences,
        7,
        GibbsConfig::default(),
        RelativeInformationScore::default(),
    )
    .unwrap();
    assert!(matches!(
        finder.run_multiple(0, &mut StdRng::seed_from_u64(1)),
        Err(MotifError::InvalidParameter { .. })
    ));
}

/// Relative information with an arbitrary, unchecked floor
struct FlooredScore(f64);

impl Score for FlooredScore {
    fn name(&self) -> &'static str {
        "floored"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn pseudo_zero(&self) -> f64 {
        self.0
    }

    fn score_profile(&self, profile: &Profile<'_>) -> motif_search::Result<f64> {
        RelativeInformationScore::default().score_profile(profile)
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> motif_search::Result<f64> {
        RelativeInformationScore::default().score_lmer(profile, lmer)
    }
}

#[test]
fn test_finders_reject_unusable_scorer_floor() {
    let alphabet = common::dna();
    let sequences = common::planted_sequences(&alphabet);

    for floor in [f64::NAN, -1e-3, f64::NEG_INFINITY] {
        let greedy = RandomizedGreedyFinder::new(
            Arc::clone(&alphabet),
            &sequences,
            7,
            GreedyConfig::default(),
            FlooredScore(floor),
        );
        assert!(matches!(greedy, Err(MotifError::InvalidParameter { .. })));

        let gibbs = GibbsSamplingFinder::new(
            Arc::clone(&alphabet),
            &sequences,
            7,
            GibbsConfig::default(),
            FlooredScore(floor),
        );
        assert!(matches!(gibbs, Err(MotifError::InvalidParameter { .. })));

        let projection = RandomProjectionFinder::new(
            Arc::clone(&alphabet),
            &sequences,
            7,
            ProjectionConfig::default(),
            FlooredScore(floor),
        );
        assert!(matches!(
            projection,
            Err(MotifError::InvalidParameter { .. })
        ));
    }

    let accepted = RandomizedGreedyFinder::new(
        alphabet,
        &sequences,
        7,
        GreedyConfig::default(),
        FlooredScore(0.0),
    );
    assert!(accepted.is_ok());
}
