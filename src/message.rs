// src/message.rs
use serde::{Deserialize, Serialize};

use crate::services::session_manager::Mood;

#[derive(Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub message: String,
    #[serde(default)]
    pub mood: Option<Mood>,
}

#[derive(Deserialize)]
pub struct MoodRequest {
    #[serde(default)]
    pub session_id: Option<String>,
    pub mood: Mood,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ChatResponse {
    pub session_id: String,
    pub response: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
}
