//! Teacher-facing endpoints: roster, approval, class and test
//! assignment, manual tasks, reward configuration

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use gyaan_common::auth::password_digest;
use gyaan_common::db::models::{Account, RewardConfig, TestSubject};
use gyaan_common::db::{accounts, settings};
use gyaan_common::identity::{normalize_id, role_of, section_of, Role, MIN_ID_LENGTH};
use serde::Deserialize;
use tracing::info;

use super::auth::MANUAL_ADD_PASSWORD;
use super::{require_role, ApiError};
use crate::roster::Roster;
use crate::AppState;

/// GET /api/teacher/roster
pub async fn get_roster(State(state): State<AppState>) -> Result<Json<Roster>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;
    Ok(Json(session.roster))
}

/// POST /api/teacher/roster/refresh
///
/// Re-derives pending/active from the persisted account set; the only
/// way a teacher picks up out-of-band changes.
pub async fn refresh_roster(State(state): State<AppState>) -> Result<Json<Roster>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    state.session.refresh_students().await?;
    let session = state.session.snapshot().await;
    Ok(Json(session.roster))
}

/// POST /api/teacher/students/:id/approve
pub async fn approve_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if !accounts::account_exists(&state.db, &student_id).await? {
        return Err(ApiError::not_found("No such student"));
    }

    state.session.approve_student(&student_id).await?;
    Ok(Json(serde_json::json!({ "message": "Student approved" })))
}

/// DELETE /api/teacher/students/:id
///
/// Removes the student from the active roster by un-approving them; the
/// account row survives and the student reappears as pending on the
/// next refresh. Hard deletion lives on the management endpoint.
pub async fn remove_student(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    state.session.remove_student(&student_id).await?;
    Ok(Json(serde_json::json!({ "message": "Student removed from roster" })))
}

#[derive(Debug, Deserialize)]
pub struct AssignClassRequest {
    pub class_name: String,
}

/// POST /api/teacher/students/:id/class
pub async fn assign_class(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(req): Json<AssignClassRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.class_name.trim().is_empty() {
        return Err(ApiError::bad_request("Class name cannot be empty"));
    }

    accounts::assign_class(&state.db, &student_id, req.class_name.trim()).await?;
    state.session.refresh_students().await?;
    Ok(Json(serde_json::json!({ "message": "Class assigned" })))
}

/// DELETE /api/teacher/students/:id/class
///
/// Also clears any assigned test; a test only makes sense inside a
/// class.
pub async fn clear_class(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    accounts::clear_class(&state.db, &student_id).await?;
    state.session.refresh_students().await?;
    Ok(Json(serde_json::json!({ "message": "Class cleared" })))
}

#[derive(Debug, Deserialize)]
pub struct AssignTestRequest {
    pub subject: String,
}

/// POST /api/teacher/students/:id/test
pub async fn assign_test(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(req): Json<AssignTestRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    let Some(subject) = TestSubject::parse(&req.subject) else {
        return Err(ApiError::bad_request(
            "Subject must be one of: english, hindi, malayalam, math",
        ));
    };

    accounts::assign_test(&state.db, &student_id, subject).await?;
    state.session.refresh_students().await?;
    Ok(Json(serde_json::json!({ "message": "Test assigned" })))
}

#[derive(Debug, Deserialize)]
pub struct ManualTaskRequest {
    pub task: String,
}

/// POST /api/teacher/students/:id/tasks
pub async fn add_manual_task(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
    Json(req): Json<ManualTaskRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.task.trim().is_empty() {
        return Err(ApiError::bad_request("Task cannot be empty"));
    }

    accounts::add_manual_task(&state.db, &student_id, req.task.trim()).await?;
    state.session.refresh_students().await?;
    Ok(Json(serde_json::json!({ "message": "Task added" })))
}

/// POST /api/teacher/students/:id/late
pub async fn toggle_late(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    let is_late = accounts::toggle_late(&state.db, &student_id).await?;
    state.session.refresh_students().await?;
    Ok(Json(serde_json::json!({ "is_late": is_late })))
}

#[derive(Debug, Deserialize)]
pub struct ManualAddRequest {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
}

/// POST /api/teacher/students
///
/// Manual roster add: the account is created pre-approved with a
/// default password the teacher hands to the student.
pub async fn add_student(
    State(state): State<AppState>,
    Json(req): Json<ManualAddRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    let id = normalize_id(&req.id);
    if role_of(&id) != Some(Role::Student) {
        return Err(ApiError::bad_request("Student IDs must start with PRC"));
    }
    if id.chars().count() < MIN_ID_LENGTH {
        return Err(ApiError::bad_request(format!(
            "ID must be at least {} characters",
            MIN_ID_LENGTH
        )));
    }
    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter the student's name"));
    }
    if accounts::account_exists(&state.db, &id).await? {
        return Err(ApiError::bad_request("An account with this ID already exists"));
    }

    let account = Account {
        id: id.clone(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        role: Role::Student,
        section: section_of(&id),
        password_digest: password_digest(&id, MANUAL_ADD_PASSWORD),
        is_approved: true,
        class_name: None,
        test_assigned: None,
        manual_tasks: vec![],
        is_late: false,
        xp: 0,
        level: 0,
        has_completed_assessment: false,
        registered_at: Utc::now(),
    };
    accounts::insert_account(&state.db, &account).await?;
    state.session.refresh_students().await?;

    info!(%id, "Student added manually");
    Ok(Json(serde_json::json!({
        "id": id,
        "message": "Student added with the default password"
    })))
}

/// DELETE /api/teacher/students/:id/account
///
/// Hard delete; the account row and its evaluation are gone for good.
pub async fn delete_student_account(
    State(state): State<AppState>,
    Path(student_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if !accounts::account_exists(&state.db, &student_id).await? {
        return Err(ApiError::not_found("No such student"));
    }

    accounts::delete_account(&state.db, &student_id).await?;
    state.session.refresh_students().await?;

    info!(id = %student_id, "Account deleted");
    Ok(Json(serde_json::json!({ "message": "Account deleted" })))
}

/// GET /api/teacher/reward-config
pub async fn get_reward_config(
    State(state): State<AppState>,
) -> Result<Json<RewardConfig>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    let config = settings::load_reward_config(&state.db).await?;
    Ok(Json(config))
}

/// PUT /api/teacher/reward-config
pub async fn put_reward_config(
    State(state): State<AppState>,
    Json(config): Json<RewardConfig>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if config.rage_threshold <= 0 {
        return Err(ApiError::bad_request("Reward threshold must be positive"));
    }

    state.session.set_reward_config(config).await?;
    Ok(Json(serde_json::json!({ "message": "Reward configuration saved" })))
}
