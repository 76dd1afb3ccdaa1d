use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::{FindMatchesQuery, FindMatchesResponse, UserProfile};
use crate::routes::{ApiError, AppState, Requester};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/matches", web::get().to(find_matches));
}

/// Find study buddies for the requester
///
/// GET /api/v1/matches?limit=20
///
/// Ranks every other stored profile against the requester's profile and
/// returns the best `limit` of them.
async fn find_matches(
    state: web::Data<AppState>,
    requester: Requester,
    query: web::Query<FindMatchesQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate().map_err(ApiError::validation)?;

    let me = state
        .users
        .get(requester.email())
        .await
        .ok_or_else(|| ApiError::profile_not_found(requester.email()))?;

    let limit = state.matching.effective_limit(query.limit);

    // The ranker does not filter by identity
    let candidates: Vec<UserProfile> = state
        .users
        .list()
        .await
        .into_iter()
        .filter(|profile| !profile.is_same_user(&me.email))
        .collect();

    tracing::debug!("Ranking {} candidates for {}", candidates.len(), me.email);

    let mut matches = state.ranker.rank(&me, &candidates);
    matches.truncate(limit);

    tracing::info!(
        "Returning {} matches for {} (from {} candidates)",
        matches.len(),
        me.email,
        candidates.len()
    );

    Ok(HttpResponse::Ok().json(FindMatchesResponse {
        matches,
        total_candidates: candidates.len(),
    }))
}
