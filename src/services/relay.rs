// src/services/relay.rs
//! Single-hop relay to the upstream chat service.
//!
//! One form-encoded POST per user message, no retry. Any failure is folded
//! into [`RelayResult::Err`] carrying [`UPSTREAM_APOLOGY`]; the cause is only logged.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error, warn};

use crate::error::AppError;

pub const CHAT_PATH: &str = "/chat_text";

pub const FALLBACK_REPLY: &str = "I'm here to listen and support you. Could you tell me more about what's on your mind?";

pub const UPSTREAM_APOLOGY: &str = "I'm sorry, I'm having trouble connecting right now. Please try again.";

/// Fields tried in order when pulling the reply out of the upstream body.
pub const REPLY_RULES: &[ReplyRule] = &[ReplyRule::Field("response"), ReplyRule::Field("answer")];

#[derive(Debug, Clone)]
pub struct RelayRequest {
    pub text: String,
}

impl RelayRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelayResult {
    Ok { reply: String },
    Err { message: String },
}

impl RelayResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, RelayResult::Ok { .. })
    }

    pub fn into_result(self) -> Result<String, AppError> {
        match self {
            RelayResult::Ok { reply } => Ok(reply),
            RelayResult::Err { message } => Err(AppError::UpstreamUnavailable {
                message,
                session_id: None,
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplyRule {
    Field(&'static str),
}

impl ReplyRule {
    fn apply<'a>(&self, body: &'a Value) -> Option<&'a str> {
        match self {
            ReplyRule::Field(name) => body
                .get(name)
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty()),
        }
    }
}

/// First matching rule wins. `None` means the fallback sentence applies.
pub fn extract_reply<'a>(body: &'a Value, rules: &[ReplyRule]) -> Option<&'a str> {
    rules.iter().find_map(|rule| rule.apply(body))
}

#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("upstream returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("upstream body is not valid JSON: {source}; raw body: {body}")]
    MalformedBody {
        #[source]
        source: serde_json::Error,
        body: String,
    },
}

#[derive(Debug, Clone)]
pub struct RelayClient {
    client: Client,
    endpoint: String,
    user_lang: String,
}

impl RelayClient {
    pub fn new(base_url: &str, user_lang: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: format!("{}{}", base_url.trim_end_matches('/'), CHAT_PATH),
            user_lang: user_lang.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Forward one message. Always returns exactly one terminal result.
    pub async fn relay(&self, request: &RelayRequest) -> RelayResult {
        match self.forward(&request.text).await {
            Ok(body) => {
                let reply = match extract_reply(&body, REPLY_RULES) {
                    Some(reply) => reply.to_string(),
                    None => {
                        warn!(endpoint = %self.endpoint, "upstream reply had no usable field, using fallback");
                        FALLBACK_REPLY.to_string()
                    }
                };
                RelayResult::Ok { reply }
            }
            Err(err) => {
                error!(endpoint = %self.endpoint, error = %err, "relay failed");
                RelayResult::Err {
                    message: UPSTREAM_APOLOGY.to_string(),
                }
            }
        }
    }

    async fn forward(&self, text: &str) -> Result<Value, UpstreamError> {
        debug!(endpoint = %self.endpoint, chars = text.chars().count(), "relaying message");

        let response = self
            .client
            .post(&self.endpoint)
            .form(&[("query", text), ("user_lang", self.user_lang.as_str())])
            .send()
            .await?;

        let status = response.status();
        debug!(%status, "upstream responded");

        let body = response.text().await?;

        if !status.is_success() {
            return Err(UpstreamError::Status { status, body });
        }

        serde_json::from_str(&body).map_err(|source| UpstreamError::MalformedBody { source, body })
    }
}
