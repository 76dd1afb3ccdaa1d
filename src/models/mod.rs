// Model exports
pub(crate) mod de;
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{
    normalize_email, MatchRequest, MatchRequestStatus, Recommendation, ScoreBreakdown,
    ScoredCandidate, ScoringWeights, StudySpot, UserProfile,
};
pub use requests::{FindMatchesQuery, SendRequestBody};
pub use responses::{ErrorResponse, FindMatchesResponse, HealthResponse, IncomingRequest, RecommendResponse};
