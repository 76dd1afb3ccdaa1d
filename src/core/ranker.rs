use crate::core::{distance::distance_between, scoring::calculate_compatibility};
use crate::models::{ScoredCandidate, ScoringWeights, UserProfile};
use std::cmp::Ordering;

/// Compatibility ranker
///
/// Scores every candidate against the requester and orders them best-first.
/// Pure and stateless: safe to share across workers without locking.
#[derive(Debug, Clone, Default)]
pub struct Ranker {
    weights: ScoringWeights,
}

impl Ranker {
    pub fn new(weights: ScoringWeights) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &ScoringWeights {
        &self.weights
    }

    /// Rank candidates for a requester
    ///
    /// The caller must already have removed the requester from `candidates`.
    ///
    /// # Ordering
    /// 1. Score, descending
    /// 2. Distance, ascending; candidates without a distance go last
    /// 3. Input order
    pub fn rank<'a>(
        &self,
        requester: &UserProfile,
        candidates: &'a [UserProfile],
    ) -> Vec<ScoredCandidate<'a>> {
        let origin = requester.coordinates();

        let mut scored: Vec<ScoredCandidate<'a>> = candidates
            .iter()
            .map(|candidate| {
                let breakdown = calculate_compatibility(requester, candidate, &self.weights);

                ScoredCandidate {
                    candidate,
                    score: breakdown.total(),
                    distance_km: distance_between(origin, candidate.coordinates()),
                    breakdown,
                }
            })
            .collect();

        // sort_by is stable, which keeps input order for full ties
        scored.sort_by(|a, b| {
            b.score
                .cmp(&a.score)
                .then_with(|| compare_distance(a.distance_km, b.distance_km))
        });

        scored
    }
}

/// Rank with the default weights
pub fn rank<'a>(requester: &UserProfile, candidates: &'a [UserProfile]) -> Vec<ScoredCandidate<'a>> {
    Ranker::default().rank(requester, candidates)
}

/// Closer first; an absent distance counts as farther than any present one
#[inline]
fn compare_distance(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
