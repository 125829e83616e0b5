//! Ranking weights.

use serde::{Deserialize, Serialize};

/// User-configurable weights for the ranking score.
///
/// Values are not validated; negative weights are the caller's business.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RankingWeights {
    /// Score contributed by each clipboard copy.
    pub copy_weight: f64,
    /// Score contributed by each matched search.
    pub search_weight: f64,
    /// Lift granted right after activity, decaying linearly to zero.
    pub recency_boost: f64,
    /// Length of the decay window in hours. Zero or less disables the lift.
    pub recency_window_hours: f64,
}

impl RankingWeights {
    pub const DEFAULT_COPY_WEIGHT: f64 = 0.7;
    pub const DEFAULT_SEARCH_WEIGHT: f64 = 0.3;
    pub const DEFAULT_RECENCY_BOOST: f64 = 2.0;
    pub const DEFAULT_RECENCY_WINDOW_HOURS: f64 = 72.0;

    pub fn new(
        copy_weight: f64,
        search_weight: f64,
        recency_boost: f64,
        recency_window_hours: f64,
    ) -> Self {
        Self {
            copy_weight,
            search_weight,
            recency_boost,
            recency_window_hours,
        }
    }
}

impl Default for RankingWeights {
    fn default() -> Self {
        Self {
            copy_weight: Self::DEFAULT_COPY_WEIGHT,
            search_weight: Self::DEFAULT_SEARCH_WEIGHT,
            recency_boost: Self::DEFAULT_RECENCY_BOOST,
            recency_window_hours: Self::DEFAULT_RECENCY_WINDOW_HOURS,
        }
    }
}
