// Route exports
pub mod error;
pub mod health;
pub mod matches;
pub mod profiles;
pub mod recommend;
pub mod requester;
pub mod requests;

use actix_web::web;
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::Ranker;
use crate::services::{LlmClient, RecommendationCache, RequestStore, SpotCatalog, UserStore};

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};
pub use requester::{Requester, REQUESTER_HEADER};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<UserStore>,
    pub requests: Arc<RequestStore>,
    pub spots: Arc<SpotCatalog>,
    pub llm: Arc<LlmClient>,
    pub cache: Arc<RecommendationCache>,
    pub ranker: Ranker,
    pub matching: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(profiles::configure)
            .configure(matches::configure)
            .configure(requests::configure)
            .configure(recommend::configure),
    );
}
