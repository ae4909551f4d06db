use clap::{Args, Parser, Subcommand};
use log::LevelFilter;
use motif_search::fasta::read_fasta;
use motif_search::problem::MotifProblem;
use motif_search::synthetic::{generate_sequences, plant_motif};
use motif_search::types::MatrixKind;
use motif_search::{
    Alphabet, Finder, GibbsSamplingFinder, MotifError, MotifRun, RandomProjectionFinder,
    RandomizedGreedyFinder, ScoringKind, SearchConfig,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(thiserror::Error, Debug)]
pub enum FinderError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Motif(#[from] MotifError),

    #[error("--motif-length is required when reading FASTA input")]
    MissingMotifLength,
}

#[derive(Parser)]
#[command(
    name = "motif-finder",
    about = "Finds a conserved motif shared by a set of sequences",
    long_about = "Searches the alignment space of a set of sequences for the motif that maximises \
                  an information score, using randomized greedy search, Gibbs sampling or random \
                  projection. Prints the consensus motif, the alignment of each sequence and the \
                  resulting profile.",
    version,
    after_help = "Example usage:\n    \
                  motif-finder generate problem.txt --count 5 --length 100 --motif-length 7\n    \
                  motif-finder run problem.txt --trials 10 gibbs --threshold 1e-7\n    \
                  motif-finder run reads.fasta --fasta --motif-length 8 greedy\n    \
                  motif-finder config > search.json\n    \
                  motif-finder run problem.txt --config search.json projection",
    color = clap::ColorChoice::Auto
)]
struct Cli {
    /// Log progress (-v for trials, -vv for every iteration)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Search a problem file or FASTA file for a motif
    Run(RunArgs),
    /// Write a random problem file with a planted, mutated motif
    Generate(GenerateArgs),
    /// Print the default search settings as JSON, ready to edit for --config
    Config,
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Problem file: alphabet line, probability line, motif length line,
    /// then one sequence per line
    #[arg(value_name = "INPUT_FILE")]
    input: PathBuf,

    /// Read INPUT_FILE as FASTA
    #[arg(long)]
    fasta: bool,

    /// Alphabet for FASTA input, one character per symbol, uniform background
    #[arg(long, default_value = "ACGT")]
    alphabet: String,

    /// Motif length; required for FASTA input, overrides a problem file's value
    #[arg(long)]
    motif_length: Option<usize>,

    /// JSON search settings; options given on the command line take precedence
    #[arg(long, value_name = "CONFIG_FILE")]
    config: Option<PathBuf>,

    /// frequency, expectation, expected-information or relative-information
    /// [default: relative-information]
    #[arg(long)]
    scoring: Option<ScoringKind>,

    /// Floor substituted for zero probabilities by the scoring function
    #[arg(long)]
    pseudo_zero: Option<f64>,

    /// Number of independent runs; the best scoring one is reported [default: 1]
    #[arg(long)]
    trials: Option<usize>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Also print the position weight matrix
    #[arg(long)]
    show_weights: bool,

    #[command(subcommand)]
    algorithm: Algorithm,
}

#[derive(Subcommand, Debug)]
enum Algorithm {
    /// Randomized greedy hill climbing
    Greedy {
        /// Apply every sequence's move at the end of the iteration instead of immediately
        #[arg(long)]
        batch: bool,

        /// [default: 50000]
        #[arg(long)]
        max_iterations: Option<usize>,
    },
    /// Gibbs sampling with a leave-one-out profile
    Gibbs {
        /// Minimum score gain for a move to be accepted [default: 1e-7]
        #[arg(long)]
        threshold: Option<f64>,

        /// [default: 50000]
        #[arg(long)]
        max_sweeps: Option<usize>,
    },
    /// Random projection hashing
    Projection {
        /// Number of motif columns per template (k) [default: 4]
        #[arg(long)]
        size: Option<usize>,

        /// Bins with more hits than this vote for their l-mers [default: 3]
        #[arg(long)]
        bin_threshold: Option<u32>,

        /// Number of random templates [default: 100]
        #[arg(long)]
        iterations: Option<usize>,
    },
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Where to write the problem file
    #[arg(value_name = "OUTPUT_FILE")]
    output: PathBuf,

    /// Length of each random sequence before the motif is inserted
    #[arg(long, default_value = "100")]
    length: usize,

    /// Number of sequences
    #[arg(long, default_value = "5")]
    count: usize,

    #[arg(long, default_value = "7")]
    motif_length: usize,

    /// Per-position probability of resampling each planted copy
    #[arg(long, default_value = "0.1")]
    mutation_rate: f64,

    /// Seed for reproducible output
    #[arg(long)]
    seed: Option<u64>,
}

fn make_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    }
}

fn load_problem(args: &RunArgs) -> Result<MotifProblem, FinderError> {
    if args.fasta {
        let motif_length = args.motif_length.ok_or(FinderError::MissingMotifLength)?;
        let alphabet = Arc::new(Alphabet::from_delimited(&args.alphabet, "", None)?);
        let sequences = read_fasta(&args.input, &alphabet)?
            .into_iter()
            .map(|record| record.sequence)
            .collect();
        return Ok(MotifProblem {
            alphabet,
            motif_length,
            sequences,
        });
    }

    let mut problem = MotifProblem::from_path(&args.input)?;
    if let Some(motif_length) = args.motif_length {
        problem.motif_length = motif_length;
    }
    Ok(problem)
}

/// Settings file first, then command line overrides
fn search_config(args: &RunArgs) -> Result<SearchConfig, FinderError> {
    let mut config = match &args.config {
        Some(path) => SearchConfig::from_path(path)?,
        None => SearchConfig::default(),
    };
    if let Some(scoring) = args.scoring {
        config.scoring = scoring;
    }
    if args.pseudo_zero.is_some() {
        config.pseudo_zero = args.pseudo_zero;
    }
    if let Some(trials) = args.trials {
        config.trials = trials;
    }
    if args.show_weights && !config.matrices.contains(&MatrixKind::Weight) {
        config.matrices.push(MatrixKind::Weight);
    }

    match args.algorithm {
        Algorithm::Greedy {
            batch,
            max_iterations,
        } => {
            if batch {
                config.greedy.update_each_step = false;
            }
            if let Some(max_iterations) = max_iterations {
                config.greedy.max_iterations = max_iterations;
            }
        }
        Algorithm::Gibbs {
            threshold,
            max_sweeps,
        } => {
            if let Some(threshold) = threshold {
                config.gibbs.optimization_threshold = threshold;
            }
            if let Some(max_sweeps) = max_sweeps {
                config.gibbs.max_sweeps = max_sweeps;
            }
        }
        Algorithm::Projection {
            size,
            bin_threshold,
            iterations,
        } => {
            if let Some(size) = size {
                config.projection.projection_size = size;
            }
            if let Some(bin_threshold) = bin_threshold {
                config.projection.bin_threshold = bin_threshold;
            }
            if let Some(iterations) = iterations {
                config.projection.iterations = iterations;
            }
        }
    }

    config.validate()?;
    Ok(config)
}

fn run(args: RunArgs) -> Result<(), FinderError> {
    let config = search_config(&args)?;
    let problem = load_problem(&args)?;
    println!(
        "{} sequences to search for a motif of length {}",
        problem.sequences.len(),
        problem.motif_length
    );

    let scorer = config.scorer()?;
    let mut rng = make_rng(args.seed);
    let alphabet = Arc::clone(&problem.alphabet);
    let sequences = &problem.sequences;
    let motif_length = problem.motif_length;

    let result = match args.algorithm {
        Algorithm::Greedy { .. } => {
            RandomizedGreedyFinder::new(alphabet, sequences, motif_length, config.greedy, scorer)?
                .run_multiple(config.trials, &mut rng)?
        }
        Algorithm::Gibbs { .. } => {
            GibbsSamplingFinder::new(alphabet, sequences, motif_length, config.gibbs, scorer)?
                .run_multiple(config.trials, &mut rng)?
        }
        Algorithm::Projection { .. } => RandomProjectionFinder::new(
            alphabet,
            sequences,
            motif_length,
            config.projection,
            scorer,
        )?
        .run_multiple(config.trials, &mut rng)?,
    };

    report(&result, &config.matrices)
}

fn report(result: &MotifRun<'_>, matrices: &[MatrixKind]) -> Result<(), FinderError> {
    println!("Motif: {}", result.consensus);
    println!("Score: {:.5}", result.score);
    println!("Alignments: {}", result.profile.format_alignments());

    if result.trial_scores.len() > 1 {
        println!(
            "Trial scores: mean {:.5}, std dev {:.5}",
            result.mean_score(),
            result.score_std_dev()
        );
        println!("{}", result.trials_frame()?);
    }

    for &kind in matrices {
        println!("{}:", kind);
        println!("{}", result.profile.to_frame(kind)?);
    }
    Ok(())
}

fn generate(args: GenerateArgs) -> Result<(), FinderError> {
    let mut rng = make_rng(args.seed);
    let alphabet = Arc::new(Alphabet::dna());
    let mut sequences = generate_sequences(&alphabet, args.length, args.count, &mut rng);
    let planted = plant_motif(
        &mut sequences,
        args.motif_length,
        args.mutation_rate,
        &mut rng,
    )?;

    let problem = MotifProblem {
        alphabet,
        motif_length: args.motif_length,
        sequences,
    };
    problem.write_to_path(&args.output)?;

    let planted_profile = planted.profile(&problem.sequences)?;
    println!("Planted motif: {}", planted.motif);
    println!("Consensus of planted copies: {}", planted_profile.consensus());
    println!("Inserted motif positions: {:?}", planted.starts);
    Ok(())
}

fn main() -> Result<(), FinderError> {
    let start_time = std::time::Instant::now();
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Command::Run(args) => run(args)?,
        Command::Generate(args) => generate(args)?,
        Command::Config => println!("{}", SearchConfig::default().to_json()?),
    }

    let elapsed = start_time.elapsed();
    println!("Total execution time: {:.4} seconds", elapsed.as_secs_f64());
    Ok(())
}
