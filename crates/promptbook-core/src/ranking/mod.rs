//! Ranking of prompts for the quick-access list.

mod service;
mod weights;

pub use service::{RankingService, score, top_ranked};
pub use weights::RankingWeights;
