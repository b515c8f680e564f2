// src/services/session_manager.rs
use std::{
    collections::HashMap,
    fmt::{self, Debug},
    sync::Arc,
    time::{Duration, Instant},
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};
use uuid::Uuid;

use crate::error::AppError;

pub const GREETING: &str = "Hello! I'm Mind Mitra, your AI companion for mental wellness. This is a safe and confidential space for you to share what's on your mind. How are you feeling today?";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    User,
    Assistant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Happy,
    Neutral,
    Sad,
    Anxious,
    Grateful,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "happy",
            Mood::Neutral => "neutral",
            Mood::Sad => "sad",
            Mood::Anxious => "anxious",
            Mood::Grateful => "grateful",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub text: String,
    pub sender: Sender,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood: Option<Mood>,
}

impl ChatMessage {
    pub fn new(sender: Sender, text: impl Into<String>, mood: Option<Mood>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            text: text.into(),
            sender,
            timestamp: Utc::now(),
            mood,
        }
    }
}

/// Held while a relay call is outstanding for a session. Dropping it frees the slot.
#[derive(Debug)]
pub struct RelayPermit {
    _guard: OwnedMutexGuard<()>,
}

#[derive(Clone, Debug)]
pub struct Session {
    pub id: String,
    pub messages: Vec<ChatMessage>,
    pub last_active: Instant,
    relay_slot: Arc<Mutex<()>>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            messages: vec![ChatMessage::new(Sender::Assistant, GREETING, None)],
            last_active: Instant::now(),
            relay_slot: Arc::new(Mutex::new(())),
        }
    }
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<RwLock<HashMap<String, Session>>>,
    ttl: Duration,
}

impl Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("ttl", &self.ttl)
            .finish()
    }
}

impl SessionManager {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    // Create a fresh session seeded with the greeting and return its id.
    pub async fn create_session(&self) -> String {
        let id = Uuid::new_v4().to_string();
        let session = Session::new(id.clone());

        let mut guard = self.inner.write().await;
        guard.insert(id.clone(), session);
        id
    }

    // Ensure there's a session with this id and touch `last_active`.
    pub async fn ensure_session(&self, id: &str) -> String {
        let mut guard = self.inner.write().await;
        guard
            .entry(id.to_string())
            .and_modify(|s| s.last_active = Instant::now())
            .or_insert_with(|| Session::new(id.to_string()));
        id.to_string()
    }

    /// Append to the session log and touch `last_active`. Returns the new log length.
    pub async fn append_message(&self, session_id: &str, message: ChatMessage) -> usize {
        let mut guard = self.inner.write().await;
        let entry = guard
            .entry(session_id.to_string())
            .or_insert_with(|| Session::new(session_id.to_string()));
        entry.messages.push(message);
        entry.last_active = Instant::now();
        entry.messages.len()
    }

    /// Claim the single relay slot of a session.
    pub async fn try_acquire_relay(&self, session_id: &str) -> Result<RelayPermit, AppError> {
        let slot = {
            let guard = self.inner.read().await;
            guard
                .get(session_id)
                .map(|s| Arc::clone(&s.relay_slot))
                .ok_or_else(|| AppError::SessionNotFound(session_id.to_string()))?
        };
        slot.try_lock_owned()
            .map(|guard| RelayPermit { _guard: guard })
            .map_err(|_| AppError::Busy {
                session_id: session_id.to_string(),
            })
    }

    /// Get a copy of the session history
    pub async fn get_history(&self, session_id: &str) -> Option<Vec<ChatMessage>> {
        let guard = self.inner.read().await;
        guard.get(session_id).map(|s| s.messages.clone())
    }

    /// Remove a session by id
    pub async fn remove_session(&self, session_id: &str) -> bool {
        let mut guard = self.inner.write().await;
        guard.remove(session_id).is_some()
    }

    /// Remove sessions idle longer than ttl. Returns number removed.
    pub async fn purge_expired(&self) -> usize {
        let mut guard = self.inner.write().await;
        let now = Instant::now();
        let before = guard.len();
        guard.retain(|_, s| now.duration_since(s.last_active) < self.ttl);
        before - guard.len()
    }

    /// Number of sessions
    pub async fn len(&self) -> usize {
        let guard = self.inner.read().await;
        guard.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn basic_session_flow() {
        let mgr = SessionManager::new(Duration::from_secs(60));
        let sid = mgr.create_session().await;
        assert!(!sid.is_empty());
        let len = mgr
            .append_message(&sid, ChatMessage::new(Sender::User, "hello", None))
            .await;
        assert_eq!(len, 2);
        let history = mgr.get_history(&sid).await.unwrap();
        assert_eq!(history[0].sender, Sender::Assistant);
        assert_eq!(history[1].text, "hello");
        assert!(mgr.remove_session(&sid).await);
    }

    #[test]
    fn mood_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Mood::Anxious).unwrap(), r#""anxious""#);
        let parsed: Mood = serde_json::from_str(r#""grateful""#).unwrap();
        assert_eq!(parsed, Mood::Grateful);
    }
}
