use std::fmt;
use std::str::FromStr;

use serde::Serialize;

use crate::error::Error;

/// Input and output rates for a model, in currency units per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rate {
    pub input: f64,
    pub output: f64,
}

impl Rate {
    pub fn new(input: f64, output: f64) -> Self {
        Self { input, output }
    }

    /// Input rate per 1,000 tokens.
    pub fn input_per_thousand(&self) -> f64 {
        self.input * 0.001
    }

    /// Output rate per 1,000 tokens.
    pub fn output_per_thousand(&self) -> f64 {
        self.output * 0.001
    }
}

/// One (provider, model) pair. The two identifiers are always kept apart,
/// never joined into a label that has to be split again.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Selection {
    pub provider: String,
    pub model: String,
}

impl Selection {
    pub fn new(provider: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            model: model.into(),
        }
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.provider, self.model)
    }
}

/// Requested number of generated tokens. Always a non-negative integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct OutputTokens(u64);

impl OutputTokens {
    pub const fn new(n: u64) -> Self {
        Self(n)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for OutputTokens {
    fn from(n: u64) -> Self {
        Self(n)
    }
}

impl TryFrom<i64> for OutputTokens {
    type Error = Error;

    fn try_from(n: i64) -> Result<Self, Self::Error> {
        u64::try_from(n)
            .map(Self)
            .map_err(|_| Error::invalid(format!("output tokens must not be negative, got {n}")))
    }
}

impl TryFrom<f64> for OutputTokens {
    type Error = Error;

    fn try_from(n: f64) -> Result<Self, Self::Error> {
        if !n.is_finite() {
            return Err(Error::invalid(format!("output tokens must be finite, got {n}")));
        }
        if n < 0.0 {
            return Err(Error::invalid(format!(
                "output tokens must not be negative, got {n}"
            )));
        }
        if n.fract() != 0.0 {
            return Err(Error::invalid(format!(
                "output tokens must be an integer, got {n}"
            )));
        }
        // 2^64; anything at or above it does not fit
        if n >= 18_446_744_073_709_551_616.0 {
            return Err(Error::invalid(format!("output tokens out of range: {n}")));
        }
        Ok(Self(n as u64))
    }
}

impl FromStr for OutputTokens {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Ok(n) = s.parse::<u64>() {
            return Ok(Self(n));
        }
        if let Ok(n) = s.parse::<i64>() {
            return Self::try_from(n);
        }
        // whole floats such as "1.0" or "1e3" are accepted
        match s.parse::<f64>() {
            Ok(n) if n.is_finite() => Self::try_from(n),
            _ => Err(Error::invalid(format!(
                "output tokens must be a non-negative integer, got `{s}`"
            ))),
        }
    }
}

impl fmt::Display for OutputTokens {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cost breakdown for one (provider, model, input, output) combination.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub provider: String,
    pub model: String,
    pub rate: Rate,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// Unrounded.
    pub input_cost: f64,
    /// Unrounded.
    pub output_cost: f64,
    /// Rounded to [`crate::cost::COST_DECIMALS`] places.
    pub total_cost: f64,
}

impl Quote {
    pub fn total_tokens(&self) -> u64 {
        self.input_tokens.saturating_add(self.output_tokens)
    }

    pub fn selection(&self) -> Selection {
        Selection::new(&self.provider, &self.model)
    }
}

/// Quotes for every selected pair, in selection order, plus the winner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    quotes: Vec<Quote>,
    cheapest: usize,
}

impl Comparison {
    /// Picks the first quote with the lowest total. `None` for no quotes.
    pub fn new(quotes: Vec<Quote>) -> Option<Self> {
        let first = quotes.first()?;
        let mut cheapest = 0;
        let mut best = first.total_cost;
        for (i, q) in quotes.iter().enumerate().skip(1) {
            if q.total_cost < best {
                cheapest = i;
                best = q.total_cost;
            }
        }
        Some(Self { quotes, cheapest })
    }

    pub fn quotes(&self) -> &[Quote] {
        &self.quotes
    }

    pub fn cheapest_index(&self) -> usize {
        self.cheapest
    }

    pub fn cheapest(&self) -> &Quote {
        &self.quotes[self.cheapest]
    }
}
