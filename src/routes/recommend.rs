use actix_web::{web, HttpResponse};

use crate::core::distance_between;
use crate::models::RecommendResponse;
use crate::routes::{ApiError, AppState, Requester};
use crate::services::{directions_url, CacheKey};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/recommend", web::post().to(recommend));
}

/// Recommend a study spot for the requester
///
/// POST /api/v1/recommend
///
/// Answers come from the LLM and are cached per profile version. When the
/// suggested spot is in the catalog the response carries its location, the
/// distance from the requester and a directions link.
async fn recommend(
    state: web::Data<AppState>,
    requester: Requester,
) -> Result<HttpResponse, ApiError> {
    let me = state
        .users
        .get(requester.email())
        .await
        .ok_or_else(|| ApiError::profile_not_found(requester.email()))?;

    let cache_key = CacheKey::recommendation(&me);

    let (recommendation, cached) = match state.cache.get(&cache_key).await {
        Some(hit) => (hit, true),
        None => {
            let fresh = state.llm.recommend(&me, &state.spots).await?;
            state.cache.insert(cache_key, fresh.clone()).await;
            (fresh, false)
        }
    };

    let spot = state.spots.find(&recommendation.spot);
    if spot.is_none() {
        tracing::warn!(
            "Recommended spot {:?} for {} is not in the catalog",
            recommendation.spot,
            me.email
        );
    }

    let spot_coordinates = spot.and_then(|s| s.coordinates());
    let origin = me.coordinates();

    let response = RecommendResponse {
        spot: spot
            .map(|s| s.name.clone())
            .unwrap_or_else(|| recommendation.spot.clone()),
        reason: recommendation.reason,
        latitude: spot_coordinates.map(|c| c.latitude),
        longitude: spot_coordinates.map(|c| c.longitude),
        distance_km: distance_between(origin, spot_coordinates),
        directions_url: origin
            .zip(spot_coordinates)
            .map(|(from, to)| directions_url(from, to)),
        cached,
    };

    Ok(HttpResponse::Ok().json(response))
}
