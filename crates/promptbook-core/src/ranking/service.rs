//! Recency-weighted popularity scoring.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use super::weights::RankingWeights;
use crate::prompt::Prompt;

const SECONDS_PER_HOUR: f64 = 3600.0;

/// Stateless scorer bound to a set of weights.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RankingService {
    weights: RankingWeights,
}

impl RankingService {
    pub fn new(weights: RankingWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &RankingWeights {
        &self.weights
    }

    /// Score used purely for ordering. It has no absolute meaning.
    pub fn score(&self, prompt: &Prompt, now: DateTime<Utc>) -> f64 {
        let weighted = f64::from(prompt.copy_count) * self.weights.copy_weight
            + f64::from(prompt.search_count) * self.weights.search_weight;
        weighted + self.recency_lift(prompt, now)
    }

    /// Time-decayed bonus for recent copy or search activity.
    pub fn recency_lift(&self, prompt: &Prompt, now: DateTime<Utc>) -> f64 {
        let window = self.weights.recency_window_hours;
        if window <= 0.0 {
            return 0.0;
        }
        let Some(last_active) = prompt.last_active_at() else {
            return 0.0;
        };

        // Clamped at zero so clock skew never yields a lift above the boost.
        let elapsed_ms = (now - last_active).num_milliseconds() as f64;
        let elapsed_hours = (elapsed_ms / 1000.0 / SECONDS_PER_HOUR).max(0.0);
        if elapsed_hours >= window {
            return 0.0;
        }

        let ratio = 1.0 - elapsed_hours / window;
        self.weights.recency_boost * ratio
    }

    /// Sorts prompts by descending score, ties broken by newest `updated_at`
    /// and then by id.
    pub fn rank<'a>(&self, prompts: &'a [Prompt], now: DateTime<Utc>) -> Vec<&'a Prompt> {
        let mut scored: Vec<(f64, &Prompt)> = prompts
            .iter()
            .map(|prompt| (self.score(prompt, now), prompt))
            .collect();

        scored.sort_by(|(left_score, left), (right_score, right)| {
            right_score
                .partial_cmp(left_score)
                .unwrap_or(Ordering::Equal)
                .then_with(|| right.updated_at.cmp(&left.updated_at))
                .then_with(|| left.id.cmp(&right.id))
        });

        scored.into_iter().map(|(_, prompt)| prompt).collect()
    }

    /// The first `limit` prompts of [`RankingService::rank`].
    pub fn top_ranked<'a>(
        &self,
        prompts: &'a [Prompt],
        now: DateTime<Utc>,
        limit: usize,
    ) -> Vec<&'a Prompt> {
        let mut ranked = self.rank(prompts, now);
        ranked.truncate(limit);
        ranked
    }
}

/// Convenience wrapper around [`RankingService::score`].
pub fn score(prompt: &Prompt, weights: &RankingWeights, now: DateTime<Utc>) -> f64 {
    RankingService::new(*weights).score(prompt, now)
}

/// Convenience wrapper around [`RankingService::top_ranked`].
pub fn top_ranked<'a>(
    prompts: &'a [Prompt],
    weights: &RankingWeights,
    now: DateTime<Utc>,
    limit: usize,
) -> Vec<&'a Prompt> {
    RankingService::new(*weights).top_ranked(prompts, now, limit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn base_date() -> DateTime<Utc> {
        DateTime::from_timestamp(1_000_000, 0).unwrap()
    }

    fn prompt_with(copy_count: u32, search_count: u32) -> Prompt {
        Prompt::new("A", "B", base_date()).with_counts(copy_count, search_count)
    }

    fn copied_at(at: DateTime<Utc>) -> Prompt {
        let mut prompt = prompt_with(0, 0);
        prompt.last_copied_at = Some(at);
        prompt
    }

    #[test]
    fn test_ranking_uses_copy_and_search_weights() {
        let prompt = prompt_with(10, 10);
        let weights = RankingWeights::new(0.8, 0.2, 0.0, 24.0);
        let value = score(&prompt, &weights, base_date());
        assert!((value - 10.0).abs() < 0.001, "score was {}", value);
    }

    #[test]
    fn test_ranking_recency_boost_decays_over_time() {
        let prompt = copied_at(base_date());
        let weights = RankingWeights::new(0.0, 0.0, 4.0, 4.0);

        let near = score(&prompt, &weights, base_date() + Duration::hours(1));
        let late = score(&prompt, &weights, base_date() + Duration::hours(3));

        assert!(near > late);
        assert!(late > 0.0);
    }

    #[test]
    fn test_score_is_monotonic_in_counters() {
        let weights = RankingWeights::default();
        let now = base_date();
        let mut previous = f64::MIN;
        for copies in 0..5 {
            for searches in 0..5 {
                let value = score(&prompt_with(copies, searches), &weights, now);
                assert!(value >= score(&prompt_with(copies, 0), &weights, now));
                assert!(value >= score(&prompt_with(0, searches), &weights, now));
                if searches == 0 {
                    assert!(value >= previous);
                    previous = value;
                }
            }
        }
    }

    #[test]
    fn test_lift_boundaries() {
        let weights = RankingWeights::new(0.0, 0.0, 2.0, 72.0);
        let service = RankingService::new(weights);
        let prompt = copied_at(base_date());

        let at_zero = service.recency_lift(&prompt, base_date());
        assert!((at_zero - 2.0).abs() < 1e-9);

        let at_window = service.recency_lift(&prompt, base_date() + Duration::hours(72));
        assert_eq!(at_window, 0.0);

        let past_window = service.recency_lift(&prompt, base_date() + Duration::hours(100));
        assert_eq!(past_window, 0.0);
    }

    #[test]
    fn test_lift_strictly_decreases_inside_window() {
        let service = RankingService::new(RankingWeights::new(0.0, 0.0, 3.0, 10.0));
        let prompt = copied_at(base_date());
        let lifts: Vec<f64> = (0..10)
            .map(|h| service.recency_lift(&prompt, base_date() + Duration::hours(h)))
            .collect();
        assert!(lifts.windows(2).all(|pair| pair[0] > pair[1]));
    }

    #[test]
    fn test_zero_window_disables_lift() {
        let service = RankingService::new(RankingWeights::new(0.0, 0.0, 5.0, 0.0));
        let prompt = copied_at(base_date());
        assert_eq!(service.recency_lift(&prompt, base_date()), 0.0);
        assert_eq!(
            service.recency_lift(&prompt, base_date() + Duration::minutes(1)),
            0.0
        );
    }

    #[test]
    fn test_future_activity_is_clamped() {
        let service = RankingService::new(RankingWeights::new(0.0, 0.0, 2.0, 24.0));
        let prompt = copied_at(base_date() + Duration::hours(5));
        let lift = service.recency_lift(&prompt, base_date());
        assert!((lift - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_uses_latest_of_copy_and_search() {
        let service = RankingService::new(RankingWeights::new(0.0, 0.0, 4.0, 4.0));
        let mut prompt = copied_at(base_date());
        prompt.last_matched_search_at = Some(base_date() + Duration::hours(2));
        let lift = service.recency_lift(&prompt, base_date() + Duration::hours(3));
        assert!((lift - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_top_ranked_orders_and_truncates() {
        let now = base_date();
        let low = prompt_with(1, 0);
        let high = prompt_with(10, 0);
        let mut tied_newer = prompt_with(1, 0);
        tied_newer.touch(now + Duration::minutes(1));
        let prompts = vec![low.clone(), high.clone(), tied_newer.clone()];

        let weights = RankingWeights::new(1.0, 0.0, 0.0, 0.0);
        let ranked = top_ranked(&prompts, &weights, now, 8);
        assert_eq!(ranked.len(), 3);
        assert_eq!(ranked[0].id, high.id);
        assert_eq!(ranked[1].id, tied_newer.id);
        assert_eq!(ranked[2].id, low.id);

        let top_two = top_ranked(&prompts, &weights, now, 2);
        assert_eq!(top_two.len(), 2);
    }
}
