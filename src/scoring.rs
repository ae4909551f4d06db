//! Fitness functions for profiles and candidate l-mers.
//!
//! Every strategy is maximised by the finders, whatever its sign. Not every
//! strategy can score a whole profile, so each one publishes its
//! [`Capabilities`] and callers check them up front instead of receiving a
//! meaningless default.

use crate::error::{MotifError, Result};
use crate::profile::Profile;
use crate::sequence::Sequence;
use phf::phf_map;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Default floor substituted for zero probabilities before taking logs
pub const DEFAULT_PSEUDO_ZERO: f64 = 1e-5;

/// Which score shapes a strategy implements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Capabilities {
    /// Can score an entire profile
    pub profile: bool,
    /// Can score one candidate l-mer against a profile
    pub lmer: bool,
}

impl Capabilities {
    pub const ALL: Capabilities = Capabilities {
        profile: true,
        lmer: true,
    };
    pub const PROFILE: Capabilities = Capabilities {
        profile: true,
        lmer: false,
    };
    pub const LMER: Capabilities = Capabilities {
        profile: false,
        lmer: true,
    };

    /// True when every capability in `required` is present
    pub fn covers(&self, required: Capabilities) -> bool {
        (self.profile || !required.profile) && (self.lmer || !required.lmer)
    }
}

pub trait Score {
    fn name(&self) -> &'static str;

    fn capabilities(&self) -> Capabilities;

    fn pseudo_zero(&self) -> f64;

    /// Score of the whole profile
    fn score_profile(&self, _profile: &Profile<'_>) -> Result<f64> {
        Err(MotifError::unsupported(self.name(), "profile"))
    }

    /// Score of one l-mer, given as symbol indices, against `profile`.
    /// The l-mer must be exactly as long as the profile.
    fn score_lmer(&self, _profile: &Profile<'_>, _lmer: &[usize]) -> Result<f64> {
        Err(MotifError::unsupported(self.name(), "l-mer"))
    }

    /// [`Score::score_lmer`] for a sequence holding one l-mer
    fn score_sequence(&self, profile: &Profile<'_>, lmer: &Sequence) -> Result<f64> {
        if **lmer.alphabet() != **profile.alphabet() {
            return Err(MotifError::AlphabetMismatch(
                "scored l-mer does not use the profile alphabet".into(),
            ));
        }
        self.score_lmer(profile, lmer.indices())
    }
}

impl<S: Score + ?Sized> Score for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }

    fn pseudo_zero(&self) -> f64 {
        (**self).pseudo_zero()
    }

    fn score_profile(&self, profile: &Profile<'_>) -> Result<f64> {
        (**self).score_profile(profile)
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> Result<f64> {
        (**self).score_lmer(profile, lmer)
    }
}

/// Fails unless `scorer` offers everything in `required` and has a usable
/// pseudo-zero floor
///
/// # Errors
/// * `MotifError::UnsupportedScore` - If a required score shape is missing
/// * `MotifError::InvalidParameter` - If the pseudo-zero is negative or not finite
pub fn check_scorer<S: Score + ?Sized>(scorer: &S, required: Capabilities) -> Result<()> {
    let offered = scorer.capabilities();
    if required.profile && !offered.profile {
        return Err(MotifError::unsupported(scorer.name(), "profile"));
    }
    if required.lmer && !offered.lmer {
        return Err(MotifError::unsupported(scorer.name(), "l-mer"));
    }
    check_pseudo_zero(scorer.name(), scorer.pseudo_zero(), false)?;
    Ok(())
}

/// Rejects a floor that would turn log scores into NaN or infinity.
/// `positive` scorers take logs of floored values, so zero is refused too.
fn check_pseudo_zero(scorer: &str, pseudo_zero: f64, positive: bool) -> Result<f64> {
    if !pseudo_zero.is_finite() || pseudo_zero < 0.0 {
        return Err(MotifError::invalid_parameter(
            "pseudo_zero",
            pseudo_zero,
            "must be a finite, non-negative number",
        ));
    }
    if positive && pseudo_zero == 0.0 {
        return Err(MotifError::invalid_parameter(
            "pseudo_zero",
            pseudo_zero,
            format!("{} scoring takes logs and needs a positive floor", scorer),
        ));
    }
    Ok(pseudo_zero)
}

fn check_lmer(profile: &Profile<'_>, lmer: &[usize]) -> Result<()> {
    if lmer.len() != profile.length() {
        return Err(MotifError::LengthMismatch {
            expected: profile.length(),
            actual: lmer.len(),
        });
    }
    if let Some(&index) = lmer.iter().find(|&&s| s >= profile.height()) {
        return Err(MotifError::SymbolIndexOutOfRange {
            index,
            size: profile.height(),
        });
    }
    Ok(())
}

#[inline]
fn floored(probability: f64, pseudo_zero: f64) -> f64 {
    if probability < pseudo_zero {
        pseudo_zero
    } else {
        probability
    }
}

/// Agreement with the consensus.
///
/// The profile score sums the count of the consensus symbol in every column;
/// the l-mer score counts positions that equal the consensus. Ignores the
/// background entirely, so it is a weak discriminator for short motifs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrequencyScore {
    pseudo_zero: f64,
}

impl FrequencyScore {
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `pseudo_zero` is negative or not finite
    pub fn new(pseudo_zero: f64) -> Result<Self> {
        let pseudo_zero = check_pseudo_zero("frequency", pseudo_zero, false)?;
        Ok(Self { pseudo_zero })
    }
}

impl Default for FrequencyScore {
    fn default() -> Self {
        Self {
            pseudo_zero: 0.0,
        }
    }
}

impl Score for FrequencyScore {
    fn name(&self) -> &'static str {
        "frequency"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn pseudo_zero(&self) -> f64 {
        self.pseudo_zero
    }

    fn score_profile(&self, profile: &Profile<'_>) -> Result<f64> {
        let consensus = profile.consensus();
        let total: u32 = consensus
            .indices()
            .iter()
            .enumerate()
            .map(|(position, &symbol)| profile.count(symbol, position))
            .sum();
        Ok(f64::from(total))
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> Result<f64> {
        check_lmer(profile, lmer)?;
        let consensus = profile.consensus();
        let matches = lmer
            .iter()
            .zip(consensus.indices())
            .filter(|(a, b)| a == b)
            .count();
        Ok(matches as f64)
    }
}

/// Log2 likelihood of an l-mer under the profile, `sum(log2(p))`.
///
/// Always at most zero. Only the l-mer form exists.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectationScore {
    pseudo_zero: f64,
}

impl ExpectationScore {
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `pseudo_zero` is negative or not finite, or zero
    pub fn new(pseudo_zero: f64) -> Result<Self> {
        let pseudo_zero = check_pseudo_zero("expectation", pseudo_zero, true)?;
        Ok(Self { pseudo_zero })
    }
}

impl Default for ExpectationScore {
    fn default() -> Self {
        Self {
            pseudo_zero: DEFAULT_PSEUDO_ZERO,
        }
    }
}

impl Score for ExpectationScore {
    fn name(&self) -> &'static str {
        "expectation"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::LMER
    }

    fn pseudo_zero(&self) -> f64 {
        self.pseudo_zero
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> Result<f64> {
        check_lmer(profile, lmer)?;
        Ok(lmer
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                floored(profile.probability(symbol, position), self.pseudo_zero).log2()
            })
            .sum())
    }
}

/// Shannon information `sum(p * log2(p))` over the probability matrix.
///
/// At most zero; closer to zero means a more conserved profile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExpectedInformationScore {
    pseudo_zero: f64,
}

impl ExpectedInformationScore {
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `pseudo_zero` is negative or not finite, or zero
    pub fn new(pseudo_zero: f64) -> Result<Self> {
        let pseudo_zero = check_pseudo_zero("expected-information", pseudo_zero, true)?;
        Ok(Self { pseudo_zero })
    }

    #[inline]
    fn term(&self, probability: f64) -> f64 {
        let p = floored(probability, self.pseudo_zero);
        p * p.log2()
    }
}

impl Default for ExpectedInformationScore {
    fn default() -> Self {
        Self {
            pseudo_zero: DEFAULT_PSEUDO_ZERO,
        }
    }
}

impl Score for ExpectedInformationScore {
    fn name(&self) -> &'static str {
        "expected-information"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn pseudo_zero(&self) -> f64 {
        self.pseudo_zero
    }

    fn score_profile(&self, profile: &Profile<'_>) -> Result<f64> {
        Ok(profile.ppm().iter().map(|&p| self.term(p)).sum())
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> Result<f64> {
        check_lmer(profile, lmer)?;
        Ok(lmer
            .iter()
            .enumerate()
            .map(|(position, &symbol)| self.term(profile.probability(symbol, position)))
            .sum())
    }
}

/// Kullback-Leibler divergence from the background, `sum(p * log2(p / b))`.
///
/// The whole-profile score is never negative. The l-mer form only sums the
/// cells the l-mer touches and can be negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RelativeInformationScore {
    pseudo_zero: f64,
}

impl RelativeInformationScore {
    /// # Errors
    /// * `MotifError::InvalidParameter` - If `pseudo_zero` is negative or not finite
    pub fn new(pseudo_zero: f64) -> Result<Self> {
        let pseudo_zero = check_pseudo_zero("relative-information", pseudo_zero, false)?;
        Ok(Self { pseudo_zero })
    }
}

impl Default for RelativeInformationScore {
    fn default() -> Self {
        Self {
            pseudo_zero: DEFAULT_PSEUDO_ZERO,
        }
    }
}

impl Score for RelativeInformationScore {
    fn name(&self) -> &'static str {
        "relative-information"
    }

    fn capabilities(&self) -> Capabilities {
        Capabilities::ALL
    }

    fn pseudo_zero(&self) -> f64 {
        self.pseudo_zero
    }

    fn score_profile(&self, profile: &Profile<'_>) -> Result<f64> {
        Ok(profile
            .ppm()
            .iter()
            .zip(profile.pwm().iter())
            .map(|(p, w)| p * w)
            .sum())
    }

    fn score_lmer(&self, profile: &Profile<'_>, lmer: &[usize]) -> Result<f64> {
        check_lmer(profile, lmer)?;
        Ok(lmer
            .iter()
            .enumerate()
            .map(|(position, &symbol)| {
                profile.probability(symbol, position) * profile.weight(symbol, position)
            })
            .sum())
    }
}

/// The scoring strategies selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ScoringKind {
    Frequency,
    Expectation,
    ExpectedInformation,
    RelativeInformation,
}

static SCORING_KINDS: phf::Map<&'static str, ScoringKind> = phf_map! {
    "frequency" => ScoringKind::Frequency,
    "expectation" => ScoringKind::Expectation,
    "expected-information" => ScoringKind::ExpectedInformation,
    "relative-information" => ScoringKind::RelativeInformation,
};

impl ScoringKind {
    pub fn name(&self) -> &'static str {
        match self {
            ScoringKind::Frequency => "frequency",
            ScoringKind::Expectation => "expectation",
            ScoringKind::ExpectedInformation => "expected-information",
            ScoringKind::RelativeInformation => "relative-information",
        }
    }

    pub fn default_pseudo_zero(&self) -> f64 {
        match self {
            ScoringKind::Frequency => 0.0,
            _ => DEFAULT_PSEUDO_ZERO,
        }
    }

    /// Builds the strategy, with the kind's default pseudo-zero when none is given
    ///
    /// # Errors
    /// * `MotifError::InvalidParameter` - If the pseudo-zero is negative or not
    ///   finite, or is zero for a strategy that takes logs of floored probabilities
    pub fn build(&self, pseudo_zero: Option<f64>) -> Result<Box<dyn Score>> {
        let pseudo_zero = pseudo_zero.unwrap_or_else(|| self.default_pseudo_zero());
        let scorer: Box<dyn Score> = match self {
            ScoringKind::Frequency => Box::new(FrequencyScore::new(pseudo_zero)?),
            ScoringKind::Expectation => Box::new(ExpectationScore::new(pseudo_zero)?),
            ScoringKind::ExpectedInformation => {
                Box::new(ExpectedInformationScore::new(pseudo_zero)?)
            }
            ScoringKind::RelativeInformation => {
                Box::new(RelativeInformationScore::new(pseudo_zero)?)
            }
        };
        Ok(scorer)
    }
}

impl FromStr for ScoringKind {
    type Err = MotifError;

    fn from_str(s: &str) -> Result<Self> {
        SCORING_KINDS.get(s).copied().ok_or_else(|| {
            MotifError::invalid_parameter(
                "scoring",
                s,
                "expected frequency, expectation, expected-information or relative-information",
            )
        })
    }
}

impl fmt::Display for ScoringKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
