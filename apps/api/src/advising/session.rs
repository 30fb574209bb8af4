//! In-memory advising sessions.
//!
//! A session lives until it is cleared or, once the store is full, until it
//! is the oldest one when a new session arrives. Each one owns its retrieval
//! index, so concurrent sessions never share mutable state.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::advising::document::DocumentMetadata;
use crate::advising::retrieval::{format_context, ContextIndex};
use crate::recommendation::profile::StudentProfile;
use crate::recommendation::Recommendation;

pub const DEFAULT_MAX_SESSIONS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatRole {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(ChatRole::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(ChatRole::Assistant, content)
    }

    fn new(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Session {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub profile: StudentProfile,
    pub summary: String,
    pub recommendation: Recommendation,
    pub ignored_interests: Vec<String>,
    pub document: Option<DocumentMetadata>,
    pub messages: Vec<ChatMessage>,
    #[serde(skip)]
    pub index: ContextIndex,
}

impl Session {
    pub fn new(
        profile: StudentProfile,
        recommendation: Recommendation,
        ignored_interests: Vec<String>,
        document: Option<DocumentMetadata>,
        index: ContextIndex,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            summary: profile.summary(),
            profile,
            recommendation,
            ignored_interests,
            document,
            messages: Vec::new(),
            index,
        }
    }
}

/// Cloneable handle over the process-wide session map.
#[derive(Clone)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<Uuid, Session>>>,
    capacity: usize,
}

impl SessionStore {
    /// A capacity of 0 is treated as 1.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Stores the session, evicting the oldest ones by `created_at` while the
    /// store is full.
    pub async fn insert(&self, session: Session) -> Uuid {
        let id = session.id;
        let mut sessions = self.inner.write().await;

        while sessions.len() >= self.capacity && !sessions.contains_key(&id) {
            let Some(oldest) = sessions
                .values()
                .min_by_key(|s| s.created_at)
                .map(|s| s.id)
            else {
                break;
            };
            sessions.remove(&oldest);
            tracing::info!(session_id = %oldest, capacity = self.capacity, "Session store full; evicted oldest session");
        }

        sessions.insert(id, session);
        id
    }

    pub async fn get(&self, id: Uuid) -> Option<Session> {
        self.inner.read().await.get(&id).cloned()
    }

    /// Returns `true` if a session was removed.
    pub async fn remove(&self, id: Uuid) -> bool {
        self.inner.write().await.remove(&id).is_some()
    }

    /// Retrieves and formats the `k` best context chunks for `question`.
    pub async fn context_for(&self, id: Uuid, question: &str, k: usize) -> Option<String> {
        let sessions = self.inner.read().await;
        let session = sessions.get(&id)?;
        let chunks = session.index.retrieve(question, k);
        tracing::debug!(
            session_id = %id,
            sources = ?chunks.iter().map(|c| c.source.as_str()).collect::<Vec<_>>(),
            "Retrieved context chunks"
        );
        Some(format_context(&chunks))
    }

    /// Appends messages in order. Returns `false` if the session is gone.
    pub async fn append_messages(
        &self,
        id: Uuid,
        messages: impl IntoIterator<Item = ChatMessage>,
    ) -> bool {
        match self.inner.write().await.get_mut(&id) {
            Some(session) => {
                session.messages.extend(messages);
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advising::retrieval::{Chunker, DEFAULT_TOP_K, PROFILE_SOURCE};
    use crate::recommendation::catalog::FieldCatalog;
    use crate::recommendation::recommend;

    fn session() -> Session {
        let profile = StudentProfile::builder().name("Ayu").build().unwrap();
        let recommendation = recommend(&FieldCatalog::builtin().unwrap(), &profile, 5).unwrap();
        let mut index = ContextIndex::new();
        index.add_document(PROFILE_SOURCE, &profile.summary(), &Chunker::default());
        Session::new(profile, recommendation, vec![], None, index)
    }

    #[tokio::test]
    async fn test_insert_get_remove() {
        let store = SessionStore::with_capacity(DEFAULT_MAX_SESSIONS);
        let s = session();
        let id = store.insert(s.clone()).await;

        let fetched = store.get(id).await.unwrap();
        assert_eq!(fetched.summary, s.summary);
        assert!(fetched.summary.starts_with("Nama: Ayu"));
        assert_eq!(store.len().await, 1);

        assert!(store.remove(id).await);
        assert!(!store.remove(id).await);
        assert!(store.get(id).await.is_none());
    }

    #[tokio::test]
    async fn test_context_for_uses_session_index() {
        let store = SessionStore::with_capacity(DEFAULT_MAX_SESSIONS);
        let id = store.insert(session()).await;

        let ctx = store.context_for(id, "nama saya", DEFAULT_TOP_K).await.unwrap();
        assert!(ctx.starts_with("--- Konteks 1 ---\nNama: Ayu"));
        assert!(store.context_for(Uuid::new_v4(), "x", 1).await.is_none());
    }

    #[tokio::test]
    async fn test_append_messages_keeps_order() {
        let store = SessionStore::with_capacity(DEFAULT_MAX_SESSIONS);
        let id = store.insert(session()).await;

        assert!(
            store
                .append_messages(id, [ChatMessage::user("Halo"), ChatMessage::assistant("Hai!")])
                .await
        );
        let messages = store.get(id).await.unwrap().messages;
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, ChatRole::User);
        assert_eq!(messages[1].content, "Hai!");

        assert!(!store.append_messages(Uuid::new_v4(), [ChatMessage::user("x")]).await);
    }

    #[tokio::test]
    async fn test_sessions_are_isolated() {
        let store = SessionStore::with_capacity(DEFAULT_MAX_SESSIONS);
        let a = store.insert(session()).await;
        let b = store.insert(session()).await;
        assert_ne!(a, b);

        store.append_messages(a, [ChatMessage::user("hanya A")]).await;
        assert_eq!(store.get(a).await.unwrap().messages.len(), 1);
        assert!(store.get(b).await.unwrap().messages.is_empty());
    }

    #[tokio::test]
    async fn test_full_store_evicts_oldest_session() {
        let store = SessionStore::with_capacity(2);
        let now = Utc::now();

        let mut aged = Vec::new();
        for minutes_ago in [30, 10, 20] {
            let mut s = session();
            s.created_at = now - chrono::Duration::minutes(minutes_ago);
            aged.push(s);
        }
        let oldest = store.insert(aged[0].clone()).await;
        let newest = store.insert(aged[1].clone()).await;
        let middle = store.insert(aged[2].clone()).await;

        assert_eq!(store.len().await, 2);
        assert!(store.get(oldest).await.is_none());
        assert!(store.get(newest).await.is_some());
        assert!(store.get(middle).await.is_some());

        // The inserted session is never its own eviction victim.
        let stale = {
            let mut s = session();
            s.created_at = now - chrono::Duration::hours(1);
            s
        };
        let stale_id = store.insert(stale).await;
        assert!(store.get(stale_id).await.is_some());
        assert!(store.get(middle).await.is_none());
        assert_eq!(store.len().await, 2);
    }

    #[tokio::test]
    async fn test_reinserting_existing_session_does_not_evict() {
        let store = SessionStore::with_capacity(1);
        let s = session();
        let id = store.insert(s.clone()).await;
        store.insert(s).await;
        assert_eq!(store.len().await, 1);
        assert!(store.get(id).await.is_some());
    }
}
