use axum::{
    Json,
    extract::{Path, State},
};
use tracing::{debug, info};

use crate::{
    error::AppError,
    message::{ChatRequest, ChatResponse, MoodRequest},
    services::{
        metrics_manager::{MetricsData, RelayOutcome},
        mood::mood_exchange,
        relay::{FALLBACK_REPLY, RelayRequest, RelayResult},
        session_manager::{ChatMessage, Sender},
    },
    state::SharedState,
};

async fn resolve_session(state: &SharedState, requested: Option<&str>) -> String {
    match requested {
        Some(s) if !s.trim().is_empty() => state.sessions.ensure_session(s.trim()).await,
        _ => state.sessions.create_session().await,
    }
}

pub async fn chat_handler(
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let trimmed = payload.message.trim();

    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }

    let session_id = resolve_session(&state, payload.session_id.as_deref()).await;

    // Held until the handler returns, so a second submission for this session is refused.
    let _permit = match state.sessions.try_acquire_relay(&session_id).await {
        Ok(permit) => permit,
        Err(err) => {
            if let AppError::Busy { .. } = err {
                debug!(%session_id, "relay already in flight");
                state.metrics.record_outcome(RelayOutcome::Busy).await;
            }
            return Err(err);
        }
    };

    if let Some(mood) = payload.mood {
        state.metrics.increment_mood(mood).await;
    }
    state
        .sessions
        .append_message(&session_id, ChatMessage::new(Sender::User, trimmed, payload.mood))
        .await;

    let result = state.relay.relay(&RelayRequest::new(trimmed)).await;

    let outcome = match &result {
        RelayResult::Ok { reply } if reply == FALLBACK_REPLY => RelayOutcome::Fallback,
        RelayResult::Ok { .. } => RelayOutcome::Reply,
        RelayResult::Err { .. } => RelayOutcome::Failure,
    };
    state.metrics.record_outcome(outcome).await;

    // The failed turn stays in the log, so the client is told which session holds it.
    let reply = result
        .into_result()
        .map_err(|err| err.in_session(&session_id))?;

    state
        .sessions
        .append_message(&session_id, ChatMessage::new(Sender::Assistant, reply.as_str(), None))
        .await;

    Ok(Json(ChatResponse {
        session_id,
        response: reply,
    }))
}

pub async fn mood_handler(
    State(state): State<SharedState>,
    Json(payload): Json<MoodRequest>,
) -> Json<ChatResponse> {
    let session_id = resolve_session(&state, payload.session_id.as_deref()).await;
    let (statement, acknowledgement) = mood_exchange(payload.mood);
    let response = acknowledgement.text.clone();

    state.sessions.append_message(&session_id, statement).await;
    state.sessions.append_message(&session_id, acknowledgement).await;
    state.metrics.increment_mood(payload.mood).await;

    info!(%session_id, mood = %payload.mood, "mood recorded");

    Json(ChatResponse {
        session_id,
        response,
    })
}

pub async fn history_handler(
    State(state): State<SharedState>,
    Path(session_id): Path<String>,
) -> Result<Json<Vec<ChatMessage>>, AppError> {
    state
        .sessions
        .get_history(&session_id)
        .await
        .map(Json)
        .ok_or(AppError::SessionNotFound(session_id))
}

pub async fn get_metrics_handler(State(state): State<SharedState>) -> Json<MetricsData> {
    Json(state.metrics.get_metrics().await)
}
