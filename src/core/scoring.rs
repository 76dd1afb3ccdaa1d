use crate::models::{ScoreBreakdown, ScoringWeights, UserProfile};

/// Calculate the compatibility score between a requester and a candidate
///
/// Scoring formula (default weights):
/// score = (
///     2 if group sizes match +     # both present, exact token match
///     2 if comfort levels match +  # both present, exact token match
///     1 per shared space pref      # set intersection cardinality
/// )
///
/// Each signal is evaluated on its own; a missing field only zeroes its
/// own term.
pub fn calculate_compatibility(
    requester: &UserProfile,
    candidate: &UserProfile,
    weights: &ScoringWeights,
) -> ScoreBreakdown {
    let group_size = token_match_score(
        requester.group_size.as_deref(),
        candidate.group_size.as_deref(),
        weights.group_size,
    );

    let comfort_level = token_match_score(
        requester.comfort_level.as_deref(),
        candidate.comfort_level.as_deref(),
        weights.comfort_level,
    );

    let shared_space_prefs: Vec<String> = requester
        .space_prefs
        .intersection(&candidate.space_prefs)
        .cloned()
        .collect();

    // Saturates so oversized configured weights cannot wrap the score
    let space_prefs = u32::try_from(shared_space_prefs.len())
        .unwrap_or(u32::MAX)
        .saturating_mul(weights.space_pref);

    ScoreBreakdown {
        group_size,
        comfort_level,
        space_prefs,
        shared_space_prefs,
    }
}

/// Award `weight` when both tokens are present and identical
#[inline]
fn token_match_score(a: Option<&str>, b: Option<&str>, weight: u32) -> u32 {
    match (a, b) {
        (Some(a), Some(b)) if a == b => weight,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_profile(group: Option<&str>, comfort: Option<&str>, prefs: &[&str]) -> UserProfile {
        let mut profile = UserProfile::new("someone@purdue.edu");
        profile.group_size = group.map(str::to_string);
        profile.comfort_level = comfort.map(str::to_string);
        profile.space_prefs = prefs.iter().map(|p| p.to_string()).collect();
        profile
    }

    #[test]
    fn test_full_match() {
        let requester = create_profile(Some("2-3"), Some("quiet"), &["quiet", "outlets"]);
        let candidate = create_profile(Some("2-3"), Some("quiet"), &["quiet"]);

        let breakdown = calculate_compatibility(&requester, &candidate, &ScoringWeights::default());

        assert_eq!(breakdown.group_size, 2);
        assert_eq!(breakdown.comfort_level, 2);
        assert_eq!(breakdown.space_prefs, 1);
        assert_eq!(breakdown.shared_space_prefs, vec!["quiet"]);
        assert_eq!(breakdown.total(), 5);
    }

    #[test]
    fn test_token_match_is_case_sensitive() {
        assert_eq!(token_match_score(Some("Quiet"), Some("quiet"), 2), 0);
        assert_eq!(token_match_score(Some("quiet"), Some("quiet"), 2), 2);
    }

    #[test]
    fn test_missing_fields_score_zero_independently() {
        let requester = create_profile(None, Some("quiet"), &["outlets"]);
        let candidate = create_profile(Some("4+"), Some("quiet"), &["outlets", "loud"]);

        let breakdown = calculate_compatibility(&requester, &candidate, &ScoringWeights::default());

        assert_eq!(breakdown.group_size, 0);
        assert_eq!(breakdown.comfort_level, 2);
        assert_eq!(breakdown.space_prefs, 1);
    }

    #[test]
    fn test_empty_prefs_contribute_nothing() {
        let requester = create_profile(None, None, &[]);
        let candidate = create_profile(None, None, &["quiet"]);

        let breakdown = calculate_compatibility(&requester, &candidate, &ScoringWeights::default());

        assert_eq!(breakdown.total(), 0);
        assert!(breakdown.shared_space_prefs.is_empty());
    }

    #[test]
    fn test_custom_weights() {
        let weights = ScoringWeights {
            group_size: 5,
            comfort_level: 1,
            space_pref: 3,
        };
        let requester = create_profile(Some("2"), Some("mixed"), &["library", "cafe"]);
        let candidate = create_profile(Some("2"), Some("mixed"), &["library", "cafe"]);

        let breakdown = calculate_compatibility(&requester, &candidate, &weights);

        assert_eq!(breakdown.total(), 5 + 1 + 6);
    }

    #[test]
    fn test_oversized_weights_saturate() {
        let weights = ScoringWeights {
            group_size: u32::MAX,
            comfort_level: u32::MAX,
            space_pref: u32::MAX,
        };
        let profile = create_profile(Some("2"), Some("mixed"), &["library", "cafe"]);

        let breakdown = calculate_compatibility(&profile, &profile, &weights);

        assert_eq!(breakdown.space_prefs, u32::MAX);
        assert_eq!(breakdown.total(), u32::MAX);
    }

    #[test]
    fn test_trailing_whitespace_is_a_different_token() {
        let requester = create_profile(Some("2-3"), None, &[]);
        let candidate = create_profile(Some("2-3 "), None, &[]);

        let breakdown = calculate_compatibility(&requester, &candidate, &ScoringWeights::default());
        assert_eq!(breakdown.group_size, 0);
    }
}
