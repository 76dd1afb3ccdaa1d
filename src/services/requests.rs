use crate::models::{normalize_email, MatchRequest, MatchRequestStatus};
use crate::services::documents::{DocumentDir, StoreError};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::RwLock;
use uuid::Uuid;

/// Errors that can occur when handling match requests
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("Cannot send a match request to yourself")]
    SelfRequest,

    #[error("A match request from {from} to {to} already exists")]
    Duplicate { from: String, to: String },

    #[error("Match request not found: {0}")]
    NotFound(Uuid),

    #[error("Only the recipient can respond to match request {0}")]
    NotRecipient(Uuid),

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Store for study-match requests between students
pub struct RequestStore {
    documents: DocumentDir,
    requests: RwLock<HashMap<Uuid, MatchRequest>>,
}

impl RequestStore {
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let documents = DocumentDir::open(dir).await?;

        let requests: HashMap<Uuid, MatchRequest> = documents
            .load_all::<MatchRequest>()
            .await?
            .into_iter()
            .map(|request| (request.id, request))
            .collect();

        tracing::info!(
            "Loaded {} match requests from {}",
            requests.len(),
            documents.root().display()
        );

        Ok(Self {
            documents,
            requests: RwLock::new(requests),
        })
    }

    /// Send a request from one student to another
    ///
    /// A second request for the same direction is rejected whatever the
    /// status of the first one.
    pub async fn send(&self, from: &str, to: &str) -> Result<MatchRequest, RequestError> {
        let from = normalize_email(from);
        let to = normalize_email(to);
        if from == to {
            return Err(RequestError::SelfRequest);
        }

        let mut requests = self.requests.write().await;
        if requests.values().any(|r| r.from == from && r.to == to) {
            return Err(RequestError::Duplicate { from, to });
        }

        let now = chrono::Utc::now();
        let request = MatchRequest {
            id: Uuid::new_v4(),
            from,
            to,
            status: MatchRequestStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        self.documents.write(&request.id.to_string(), &request).await?;
        requests.insert(request.id, request.clone());

        tracing::debug!("Match request {} sent: {} -> {}", request.id, request.from, request.to);
        Ok(request)
    }

    pub async fn get(&self, id: Uuid) -> Option<MatchRequest> {
        self.requests.read().await.get(&id).cloned()
    }

    /// Requests addressed to `email`, oldest first
    pub async fn incoming(&self, email: &str) -> Vec<MatchRequest> {
        let email = normalize_email(email);
        let mut incoming: Vec<MatchRequest> = self
            .requests
            .read()
            .await
            .values()
            .filter(|r| r.to == email)
            .cloned()
            .collect();

        incoming.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        incoming
    }

    /// Accept a request; only its recipient may do so
    pub async fn accept(&self, id: Uuid, by: &str) -> Result<MatchRequest, RequestError> {
        let by = normalize_email(by);
        let mut requests = self.requests.write().await;

        let request = requests.get(&id).ok_or(RequestError::NotFound(id))?;
        if request.to != by {
            return Err(RequestError::NotRecipient(id));
        }

        let mut accepted = request.clone();
        accepted.status = MatchRequestStatus::Accepted;
        accepted.updated_at = chrono::Utc::now();

        self.documents.write(&id.to_string(), &accepted).await?;
        requests.insert(id, accepted.clone());

        tracing::debug!("Match request {} accepted by {}", id, by);
        Ok(accepted)
    }

    /// Decline a request, removing it; only its recipient may do so
    pub async fn decline(&self, id: Uuid, by: &str) -> Result<MatchRequest, RequestError> {
        let by = normalize_email(by);
        let mut requests = self.requests.write().await;

        let request = requests.get(&id).ok_or(RequestError::NotFound(id))?;
        if request.to != by {
            return Err(RequestError::NotRecipient(id));
        }

        self.documents.remove(&id.to_string()).await?;
        let declined = requests.remove(&id).ok_or(RequestError::NotFound(id))?;

        tracing::debug!("Match request {} declined by {}", id, by);
        Ok(declined)
    }
}
