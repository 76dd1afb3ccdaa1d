use actix_web::{web, HttpResponse};
use validator::Validate;

use crate::models::UserProfile;
use crate::routes::{ApiError, AppState};
use crate::services::UpsertOutcome;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/profiles", web::post().to(upsert_profile))
        .route("/profiles/{email}", web::get().to(get_profile));
}

/// Create or replace a profile
///
/// POST /api/v1/profiles
///
/// Request body:
/// ```json
/// {
///   "email": "alice@purdue.edu",
///   "groupSize": "2-3",
///   "comfortLevel": "quiet",
///   "spacePrefs": ["quiet", "outlets"],
///   "latitude": 40.4237,
///   "longitude": -86.9212
/// }
/// ```
/// Any other keys are stored as-is.
async fn upsert_profile(
    state: web::Data<AppState>,
    profile: web::Json<UserProfile>,
) -> Result<HttpResponse, ApiError> {
    let profile = profile.into_inner();
    profile.validate().map_err(ApiError::validation)?;

    let (saved, outcome) = state.users.upsert(profile).await?;

    tracing::info!("Saved profile {} ({:?})", saved.email, outcome);

    Ok(match outcome {
        UpsertOutcome::Created => HttpResponse::Created().json(saved),
        UpsertOutcome::Updated => HttpResponse::Ok().json(saved),
    })
}

/// GET /api/v1/profiles/{email}
async fn get_profile(
    state: web::Data<AppState>,
    email: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let profile = state
        .users
        .get(&email)
        .await
        .ok_or_else(|| ApiError::profile_not_found(&email))?;

    Ok(HttpResponse::Ok().json(profile))
}
