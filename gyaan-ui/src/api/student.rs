//! Student-facing endpoints: progression, assessment, challenges,
//! evaluations

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use gyaan_common::concepts::Concept;
use gyaan_common::db::evaluations;
use gyaan_common::db::models::{Evaluation, SkillScore};
use gyaan_common::identity::Role;
use gyaan_common::progression::{
    reading_baseline_secs, time_bonus, MATH_BASELINE_SECS,
};
use serde::{Deserialize, Serialize};

use super::{require_role, ApiError};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct ProgressResponse {
    pub xp: i64,
    pub level: i64,
    pub rage_progress: i64,
    pub rage_threshold: i64,
    pub reward_ready: bool,
    pub reward_description: String,
    pub has_completed_assessment: bool,
    pub concepts: Vec<Concept>,
}

/// GET /api/student/progress
pub async fn get_progress(
    State(state): State<AppState>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Student)?;

    let Some(student) = session.student else {
        return Err(ApiError::unauthorized("Not logged in"));
    };

    Ok(Json(ProgressResponse {
        xp: student.xp,
        level: student.level,
        rage_progress: student.rage.progress,
        rage_threshold: student.rage.threshold,
        reward_ready: session.reward_ready,
        reward_description: session.reward_config.reward_description,
        has_completed_assessment: student.has_completed_assessment,
        concepts: session.concepts,
    }))
}

#[derive(Debug, Deserialize)]
pub struct XpRequest {
    pub amount: i64,
}

/// POST /api/student/xp
pub async fn grant_xp(
    State(state): State<AppState>,
    Json(req): Json<XpRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Student)?;

    if req.amount < 0 {
        return Err(ApiError::bad_request("XP amount cannot be negative"));
    }

    state.session.add_xp(req.amount).await?;
    Ok(Json(serde_json::json!({ "message": "XP granted" })))
}

#[derive(Debug, Deserialize)]
pub struct AssessmentRequest {
    pub xp_earned: i64,
}

/// POST /api/student/assessment
///
/// Marks the one-time initial assessment complete and unlocks the entry
/// concepts of both tracks.
pub async fn complete_assessment(
    State(state): State<AppState>,
    Json(req): Json<AssessmentRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Student)?;

    if req.xp_earned < 0 {
        return Err(ApiError::bad_request("XP amount cannot be negative"));
    }

    state.session.complete_assessment(req.xp_earned).await?;
    Ok(Json(serde_json::json!({ "message": "Assessment complete" })))
}

/// Which kind of timed challenge was scored
#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    Math,
    Reading,
}

#[derive(Debug, Deserialize)]
pub struct ChallengeScoreRequest {
    pub kind: ChallengeKind,
    pub base_xp: i64,
    pub elapsed_secs: f64,
    /// Only meaningful for reading challenges
    #[serde(default)]
    pub word_count: usize,
}

#[derive(Debug, Serialize)]
pub struct ChallengeScoreResponse {
    pub base_xp: i64,
    pub time_bonus: i64,
    pub total_xp: i64,
}

/// POST /api/student/challenge/score
///
/// Finishing under the baseline earns a bonus of twice the seconds
/// saved; finishing over it earns nothing extra.
pub async fn score_challenge(
    State(state): State<AppState>,
    Json(req): Json<ChallengeScoreRequest>,
) -> Result<Json<ChallengeScoreResponse>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Student)?;

    if req.base_xp < 0 {
        return Err(ApiError::bad_request("XP amount cannot be negative"));
    }
    if req.elapsed_secs < 0.0 {
        return Err(ApiError::bad_request("Elapsed time cannot be negative"));
    }

    let baseline = match req.kind {
        ChallengeKind::Math => MATH_BASELINE_SECS,
        ChallengeKind::Reading => reading_baseline_secs(req.word_count),
    };
    let bonus = time_bonus(req.elapsed_secs, baseline);
    let total = req.base_xp + bonus;

    state.session.add_xp(total).await?;

    Ok(Json(ChallengeScoreResponse {
        base_xp: req.base_xp,
        time_bonus: bonus,
        total_xp: total,
    }))
}

/// POST /api/student/reward/dismiss
///
/// One-shot per fill cycle; dismissing twice is harmless.
pub async fn dismiss_reward(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.session.dismiss_reward().await;
    Json(serde_json::json!({ "message": "Reward dismissed" }))
}

/// GET /api/student/evaluation
pub async fn get_evaluation(
    State(state): State<AppState>,
) -> Result<Json<Evaluation>, ApiError> {
    let session = state.session.snapshot().await;
    let user = require_role(&session, Role::Student)?;

    match evaluations::fetch_evaluation(&state.db, &user.id).await? {
        Some(eval) => Ok(Json(eval)),
        None => Err(ApiError::not_found("No evaluation recorded yet")),
    }
}

#[derive(Debug, Deserialize)]
pub struct EvaluationRequest {
    pub overall: i64,
    pub scores: Vec<SkillScore>,
    pub weaknesses: Vec<String>,
    pub recommended_tasks: Vec<String>,
    pub language: String,
}

/// PUT /api/student/evaluation
///
/// A retake overwrites the stored evaluation; exactly one current
/// evaluation per account.
pub async fn put_evaluation(
    State(state): State<AppState>,
    Json(req): Json<EvaluationRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    let user = require_role(&session, Role::Student)?;

    let eval = Evaluation {
        account_id: user.id,
        overall: req.overall,
        scores: req.scores,
        weaknesses: req.weaknesses,
        recommended_tasks: req.recommended_tasks,
        language: req.language,
        recorded_at: Utc::now(),
    };
    evaluations::upsert_evaluation(&state.db, &eval).await?;

    Ok(Json(serde_json::json!({ "message": "Evaluation saved" })))
}
