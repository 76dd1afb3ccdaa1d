use serde::{Deserialize, Serialize};
use validator::Validate;

/// Query for the matches endpoint
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct FindMatchesQuery {
    #[validate(range(min = 1))]
    pub limit: Option<usize>,
}

/// Request to send a study-match request
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendRequestBody {
    #[validate(email)]
    pub to: String,
}
