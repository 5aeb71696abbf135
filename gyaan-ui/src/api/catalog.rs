//! Catalog endpoints: classes, content, assignments, rewards
//!
//! Flat teacher-owned lists with create/list/delete only; no update,
//! no referential checks against student assignments.

use axum::extract::{Path, State};
use axum::Json;
use chrono::Utc;
use gyaan_common::db::catalog;
use gyaan_common::db::models::{Assignment, ClassRecord, ContentItem, RewardEntry};
use gyaan_common::identity::Role;
use serde::Deserialize;
use uuid::Uuid;

use super::{require_role, ApiError};
use crate::AppState;

/// GET /api/catalog/classes
pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClassRecord>>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;
    Ok(Json(catalog::list_classes(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateClassRequest {
    pub name: String,
    pub subject: String,
}

/// POST /api/catalog/classes
pub async fn create_class(
    State(state): State<AppState>,
    Json(req): Json<CreateClassRequest>,
) -> Result<Json<ClassRecord>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Class name cannot be empty"));
    }

    let class = ClassRecord {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        subject: req.subject.trim().to_string(),
        created_at: Utc::now(),
    };
    catalog::insert_class(&state.db, &class).await?;
    Ok(Json(class))
}

/// DELETE /api/catalog/classes/:id
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    catalog::delete_class(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": "Class deleted" })))
}

/// GET /api/catalog/content
pub async fn list_content(
    State(state): State<AppState>,
) -> Result<Json<Vec<ContentItem>>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;
    Ok(Json(catalog::list_content(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateContentRequest {
    pub title: String,
    pub kind: String,
    pub subject: String,
}

/// POST /api/catalog/content
pub async fn create_content(
    State(state): State<AppState>,
    Json(req): Json<CreateContentRequest>,
) -> Result<Json<ContentItem>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title cannot be empty"));
    }

    let item = ContentItem {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        kind: req.kind.trim().to_string(),
        subject: req.subject.trim().to_string(),
        status: "published".to_string(),
        created_at: Utc::now(),
    };
    catalog::insert_content(&state.db, &item).await?;
    Ok(Json(item))
}

/// DELETE /api/catalog/content/:id
pub async fn delete_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    catalog::delete_content(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": "Content deleted" })))
}

/// GET /api/catalog/assignments
pub async fn list_assignments(
    State(state): State<AppState>,
) -> Result<Json<Vec<Assignment>>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;
    Ok(Json(catalog::list_assignments(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateAssignmentRequest {
    pub title: String,
    pub subject: String,
    pub due_date: Option<String>,
}

/// POST /api/catalog/assignments
pub async fn create_assignment(
    State(state): State<AppState>,
    Json(req): Json<CreateAssignmentRequest>,
) -> Result<Json<Assignment>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.title.trim().is_empty() {
        return Err(ApiError::bad_request("Title cannot be empty"));
    }

    let assignment = Assignment {
        id: Uuid::new_v4().to_string(),
        title: req.title.trim().to_string(),
        subject: req.subject.trim().to_string(),
        due_date: req.due_date,
        created_at: Utc::now(),
    };
    catalog::insert_assignment(&state.db, &assignment).await?;
    Ok(Json(assignment))
}

/// DELETE /api/catalog/assignments/:id
pub async fn delete_assignment(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    catalog::delete_assignment(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": "Assignment deleted" })))
}

/// GET /api/catalog/rewards
pub async fn list_rewards(
    State(state): State<AppState>,
) -> Result<Json<Vec<RewardEntry>>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;
    Ok(Json(catalog::list_rewards(&state.db).await?))
}

#[derive(Debug, Deserialize)]
pub struct CreateRewardRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// POST /api/catalog/rewards
pub async fn create_reward(
    State(state): State<AppState>,
    Json(req): Json<CreateRewardRequest>,
) -> Result<Json<RewardEntry>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Reward name cannot be empty"));
    }

    let reward = RewardEntry {
        id: Uuid::new_v4().to_string(),
        name: req.name.trim().to_string(),
        description: req.description.trim().to_string(),
        created_at: Utc::now(),
    };
    catalog::insert_reward(&state.db, &reward).await?;
    Ok(Json(reward))
}

/// DELETE /api/catalog/rewards/:id
pub async fn delete_reward(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let session = state.session.snapshot().await;
    require_role(&session, Role::Teacher)?;

    catalog::delete_reward(&state.db, &id).await?;
    Ok(Json(serde_json::json!({ "message": "Reward deleted" })))
}
