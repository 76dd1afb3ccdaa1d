// Service exports
pub mod cache;
pub mod documents;
pub mod llm;
pub mod requests;
pub mod spots;
pub mod users;

pub use cache::{CacheKey, RecommendationCache};
pub use documents::{DocumentDir, StoreError};
pub use llm::{LlmClient, LlmError};
pub use requests::{RequestError, RequestStore};
pub use spots::{directions_url, SpotCatalog, SpotError};
pub use users::{UpsertOutcome, UserStore};
