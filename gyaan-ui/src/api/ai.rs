//! AI boundary endpoints: transcription, diagnosis, chat
//!
//! Thin adapters over the injected AI service; the Fallback wrapper
//! underneath guarantees these never fail on transport errors.

use axum::body::Bytes;
use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use super::ApiError;
use crate::ai::{ChatMessage, ChatReply, Diagnosis, Transcription};
use crate::AppState;

/// POST /api/audio/transcribe
///
/// Raw audio bytes in, transcript out.
pub async fn transcribe(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<Transcription>, ApiError> {
    if body.is_empty() {
        return Err(ApiError::bad_request("No audio data received"));
    }
    Ok(Json(state.ai.transcribe(&body).await?))
}

#[derive(Debug, Deserialize)]
pub struct ReadingDiagnosisRequest {
    pub transcript: String,
    pub expected_text: String,
}

/// POST /api/diagnose/reading
pub async fn diagnose_reading(
    State(state): State<AppState>,
    Json(req): Json<ReadingDiagnosisRequest>,
) -> Result<Json<Diagnosis>, ApiError> {
    let diagnosis = state
        .ai
        .diagnose_reading(&req.transcript, &req.expected_text)
        .await?;
    Ok(Json(diagnosis))
}

#[derive(Debug, Deserialize)]
pub struct MathDiagnosisRequest {
    pub transcript: String,
    pub problem: String,
    pub expected_answer: String,
}

/// POST /api/diagnose/math
pub async fn diagnose_math(
    State(state): State<AppState>,
    Json(req): Json<MathDiagnosisRequest>,
) -> Result<Json<Diagnosis>, ApiError> {
    let diagnosis = state
        .ai
        .diagnose_math(&req.transcript, &req.problem, &req.expected_answer)
        .await?;
    Ok(Json(diagnosis))
}

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub history: Vec<ChatMessage>,
}

/// POST /api/chat/ask
pub async fn chat_ask(
    State(state): State<AppState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatReply>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::bad_request("Message cannot be empty"));
    }
    let reply = state
        .ai
        .ask(&req.message, &req.context, &req.history)
        .await?;
    Ok(Json(reply))
}
