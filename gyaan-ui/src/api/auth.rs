//! Authentication endpoints: OTP, signup, login, logout
//!
//! Identity is carried entirely by the structured ID the user types:
//! the first three characters decide the role, characters six and seven
//! the section. Signup performs multi-field validation and returns
//! inline messages; login refuses unapproved students until a teacher
//! approves them.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use gyaan_common::auth::{generate_otp, password_digest, verify_password, MIN_PASSWORD_LENGTH};
use gyaan_common::db::accounts;
use gyaan_common::db::models::Account;
use gyaan_common::identity::{normalize_id, role_of, section_of, Role, MIN_ID_LENGTH};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::info;

use super::ApiError;
use crate::session::ActiveUser;
use crate::AppState;

/// Simulated send delay for the OTP email, no cancellation once started
const OTP_SEND_DELAY_MS: u64 = 1000;

/// Simulated network delay for the login round trip
const LOGIN_DELAY_MS: u64 = 800;

/// Default password for students a teacher adds by hand
pub const MANUAL_ADD_PASSWORD: &str = "student123";

#[derive(Debug, Deserialize)]
pub struct OtpRequest {
    pub email: String,
}

#[derive(Debug, Serialize)]
pub struct OtpResponse {
    /// The code is returned in the response body; there is no real
    /// email delivery in this deployment
    pub otp: String,
    pub message: String,
}

/// POST /api/auth/otp
pub async fn send_otp(Json(req): Json<OtpRequest>) -> Result<Json<OtpResponse>, ApiError> {
    if !req.email.contains('@') {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }

    tokio::time::sleep(Duration::from_millis(OTP_SEND_DELAY_MS)).await;

    let otp = generate_otp();
    info!(email = %req.email, "OTP generated");

    Ok(Json(OtpResponse {
        otp,
        message: format!("OTP sent to {}", req.email),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub id: String,
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    /// The code the user typed
    pub otp: String,
    /// The code issued by /api/auth/otp; the form carries it back
    pub issued_otp: String,
}

#[derive(Debug, Serialize)]
pub struct SignupResponse {
    pub id: String,
    pub role: Role,
    pub is_approved: bool,
    pub message: String,
}

/// POST /api/auth/signup
///
/// Teachers are active immediately; students land in their section
/// teacher's pending list until approved.
pub async fn signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<Json<SignupResponse>, ApiError> {
    let id = normalize_id(&req.id);

    let Some(role) = role_of(&id) else {
        return Err(ApiError::bad_request(
            "ID must start with PRC (student) or PCE (teacher)",
        ));
    };

    if id.chars().count() < MIN_ID_LENGTH {
        return Err(ApiError::bad_request(format!(
            "ID must be at least {} characters",
            MIN_ID_LENGTH
        )));
    }

    if accounts::account_exists(&state.db, &id).await? {
        return Err(ApiError::bad_request("An account with this ID already exists"));
    }

    if req.name.trim().is_empty() {
        return Err(ApiError::bad_request("Please enter your name"));
    }

    if !req.email.contains('@') {
        return Err(ApiError::bad_request("Please enter a valid email address"));
    }

    if req.password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::bad_request(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    if req.password != req.confirm_password {
        return Err(ApiError::bad_request("Passwords do not match"));
    }

    if req.otp.trim() != req.issued_otp {
        return Err(ApiError::bad_request("Incorrect OTP"));
    }

    let is_approved = role == Role::Teacher;
    let account = Account {
        id: id.clone(),
        name: req.name.trim().to_string(),
        email: req.email.trim().to_string(),
        role,
        section: section_of(&id),
        password_digest: password_digest(&id, &req.password),
        is_approved,
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

    info!(%id, role = %role, "Account created");

    let message = if is_approved {
        "Account created. You can log in now.".to_string()
    } else {
        "Account created. Your teacher needs to approve it before you can log in.".to_string()
    };

    Ok(Json(SignupResponse {
        id,
        role,
        is_approved,
        message,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub id: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub user: ActiveUser,
    pub message: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    tokio::time::sleep(Duration::from_millis(LOGIN_DELAY_MS)).await;

    let id = normalize_id(&req.id);
    let Some(role) = role_of(&id) else {
        return Err(ApiError::bad_request(
            "ID must start with PRC (student) or PCE (teacher)",
        ));
    };

    let Some(account) = accounts::fetch_account(&state.db, &id).await? else {
        return Err(ApiError::bad_request("No account found with this ID"));
    };

    if !verify_password(&id, &req.password, &account.password_digest) {
        return Err(ApiError::bad_request("Incorrect password"));
    }

    if role == Role::Student && !account.is_approved {
        return Err(ApiError::forbidden(
            "Your account is waiting for teacher approval",
        ));
    }

    state.session.login(&account.name, role, &id).await?;
    info!(%id, role = %role, "Login succeeded");

    Ok(Json(LoginResponse {
        user: ActiveUser {
            id,
            name: account.name,
            role,
            section: account.section,
        },
        message: "Logged in".to_string(),
    }))
}

/// POST /api/auth/logout
///
/// Idempotent; logging out twice is harmless.
pub async fn logout(State(state): State<AppState>) -> Json<serde_json::Value> {
    state.session.logout().await;
    Json(serde_json::json!({ "message": "Logged out" }))
}
