use serde::Serialize;
use thiserror::Error;

use crate::models::enums::{MatchTier, RangeSource};
use crate::models::Metric;
use crate::provider::ProviderError;

// ---------------------------------------------------------------------------
// MetricMatch
// ---------------------------------------------------------------------------

/// A metric selected for an observation, with the tier that selected it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricMatch<'a> {
    pub metric: &'a Metric,
    pub tier: MatchTier,
}

// ---------------------------------------------------------------------------
// Band & Verdict
// ---------------------------------------------------------------------------

/// The (lower, upper) pair a value is scored against.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub lower: f64,
    pub upper: f64,
}

impl Band {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self { lower, upper }
    }

    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }
}

/// Outcome of range evaluation for one eligible observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verdict {
    pub is_abnormal: bool,
    /// Band used for risk scoring. `None` when the inline text had a shape
    /// that yields no usable band.
    pub band: Option<Band>,
    pub source: RangeSource,
}

// ---------------------------------------------------------------------------
// StoreError
// ---------------------------------------------------------------------------

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Metric provider failed: {0}")]
    Provider(#[from] ProviderError),

    #[error("Metric table lock poisoned")]
    LockPoisoned,
}
