use crate::models::{normalize_email, UserProfile};
use crate::services::documents::{DocumentDir, StoreError};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

/// Whether an upsert created a new profile or replaced one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created,
    Updated,
}

/// Email-keyed profile store
///
/// Every profile lives in its own document; the full set is mirrored in
/// memory so `list` never touches the disk. Writers hold the write lock
/// across the document write, which serializes updates.
pub struct UserStore {
    documents: DocumentDir,
    users: RwLock<BTreeMap<String, UserProfile>>,
}

impl UserStore {
    /// Open the store and load existing profiles
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let documents = DocumentDir::open(dir).await?;

        let mut users = BTreeMap::new();
        for profile in documents.load_all::<UserProfile>().await? {
            let key = profile.email_key();
            if key.is_empty() {
                tracing::warn!("Skipping stored profile without an email");
                continue;
            }
            users.insert(key, profile);
        }

        tracing::info!(
            "Loaded {} user profiles from {}",
            users.len(),
            documents.root().display()
        );

        Ok(Self {
            documents,
            users: RwLock::new(users),
        })
    }

    /// Fetch a profile by email (case-insensitive)
    pub async fn get(&self, email: &str) -> Option<UserProfile> {
        self.users.read().await.get(&normalize_email(email)).cloned()
    }

    /// Insert or replace a profile
    ///
    /// The stored email is normalized. On update the original `created_at`
    /// is kept; `updated_at` is always refreshed.
    pub async fn upsert(
        &self,
        mut profile: UserProfile,
    ) -> Result<(UserProfile, UpsertOutcome), StoreError> {
        let key = profile.email_key();
        if key.is_empty() {
            return Err(StoreError::InvalidKey(profile.email));
        }

        let now = chrono::Utc::now();
        let mut users = self.users.write().await;

        let outcome = match users.get(&key) {
            Some(existing) => {
                profile.created_at = existing.created_at.or(Some(now));
                UpsertOutcome::Updated
            }
            None => {
                profile.created_at = Some(now);
                UpsertOutcome::Created
            }
        };
        profile.email = key.clone();
        profile.updated_at = Some(now);

        self.documents.write(&key, &profile).await?;
        users.insert(key, profile.clone());

        tracing::debug!("Upserted profile {} ({:?})", profile.email, outcome);
        Ok((profile, outcome))
    }

    /// All profiles, ordered by email
    pub async fn list(&self) -> Vec<UserProfile> {
        self.users.read().await.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.users.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.users.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::documents::scratch_dir;

    #[tokio::test]
    async fn test_upsert_is_case_insensitive() {
        let dir = scratch_dir("users");
        let store = UserStore::open(&dir).await.unwrap();

        let mut first = UserProfile::new("Alice@Purdue.edu");
        first.group_size = Some("2".to_string());
        let (saved, outcome) = store.upsert(first).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Created);
        assert_eq!(saved.email, "alice@purdue.edu");
        let created_at = saved.created_at;

        let mut second = UserProfile::new("  alice@purdue.EDU ");
        second.group_size = Some("3".to_string());
        let (saved, outcome) = store.upsert(second).await.unwrap();
        assert_eq!(outcome, UpsertOutcome::Updated);
        assert_eq!(saved.created_at, created_at);

        assert_eq!(store.len().await, 1);
        let fetched = store.get("ALICE@purdue.edu").await.unwrap();
        assert_eq!(fetched.group_size.as_deref(), Some("3"));

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_reopen_reloads_profiles() {
        let dir = scratch_dir("users");
        {
            let store = UserStore::open(&dir).await.unwrap();
            store.upsert(UserProfile::new("bob@purdue.edu")).await.unwrap();
            store.upsert(UserProfile::new("alice@purdue.edu")).await.unwrap();
        }

        let store = UserStore::open(&dir).await.unwrap();
        let emails: Vec<String> = store.list().await.into_iter().map(|p| p.email).collect();
        assert_eq!(emails, vec!["alice@purdue.edu", "bob@purdue.edu"]);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_loads_hand_edited_documents() {
        let dir = scratch_dir("users");
        tokio::fs::create_dir_all(&dir).await.unwrap();
        tokio::fs::write(
            dir.join("legacy.json"),
            r#"{"email": "carol@purdue.edu", "name": 123, "lat": 40.4237, "latitude": "x", "lng": -86.9212}"#,
        )
        .await
        .unwrap();

        let store = UserStore::open(&dir).await.unwrap();
        let carol = store.get("carol@purdue.edu").await.unwrap();

        assert_eq!(carol.name.as_deref(), Some("123"));
        assert!(carol.coordinates().is_some());

        tokio::fs::remove_dir_all(&dir).await.ok();
    }

    #[tokio::test]
    async fn test_empty_email_rejected() {
        let dir = scratch_dir("users");
        let store = UserStore::open(&dir).await.unwrap();

        let result = store.upsert(UserProfile::new("   ")).await;
        assert!(matches!(result, Err(StoreError::InvalidKey(_))));
        assert!(store.is_empty().await);

        tokio::fs::remove_dir_all(&dir).await.ok();
    }
}
