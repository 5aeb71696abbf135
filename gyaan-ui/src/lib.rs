//! gyaan-ui library - learning platform service
//!
//! HTTP service behind the GYAAN learning platform: role-aware
//! authentication, student progression and rewards, teacher roster
//! management, catalogs, and the AI analysis boundary.

use axum::Router;
use gyaan_common::events::EventBus;
use sqlx::SqlitePool;
use std::sync::Arc;

pub mod ai;
pub mod api;
pub mod recording;
pub mod roster;
pub mod session;

use ai::SharedAiService;
use session::SessionStore;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Process-wide session store
    pub session: Arc<SessionStore>,
    /// Event bus backing the SSE stream
    pub events: EventBus,
    /// AI boundary (transcription, diagnosis, chat)
    pub ai: SharedAiService,
}

impl AppState {
    /// Create new application state
    pub fn new(
        db: SqlitePool,
        session: Arc<SessionStore>,
        events: EventBus,
        ai: SharedAiService,
    ) -> Self {
        Self {
            db,
            session,
            events,
            ai,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{delete, get, post};

    let auth = Router::new()
        .route("/api/auth/otp", post(api::auth::send_otp))
        .route("/api/auth/signup", post(api::auth::signup))
        .route("/api/auth/login", post(api::auth::login))
        .route("/api/auth/logout", post(api::auth::logout));

    let student = Router::new()
        .route("/api/student/progress", get(api::student::get_progress))
        .route("/api/student/xp", post(api::student::grant_xp))
        .route("/api/student/assessment", post(api::student::complete_assessment))
        .route("/api/student/challenge/score", post(api::student::score_challenge))
        .route("/api/student/reward/dismiss", post(api::student::dismiss_reward))
        .route(
            "/api/student/evaluation",
            get(api::student::get_evaluation).put(api::student::put_evaluation),
        );

    let teacher = Router::new()
        .route("/api/teacher/roster", get(api::teacher::get_roster))
        .route("/api/teacher/roster/refresh", post(api::teacher::refresh_roster))
        .route("/api/teacher/students", post(api::teacher::add_student))
        .route(
            "/api/teacher/students/:id",
            delete(api::teacher::remove_student),
        )
        .route(
            "/api/teacher/students/:id/approve",
            post(api::teacher::approve_student),
        )
        .route(
            "/api/teacher/students/:id/class",
            post(api::teacher::assign_class).delete(api::teacher::clear_class),
        )
        .route(
            "/api/teacher/students/:id/test",
            post(api::teacher::assign_test),
        )
        .route(
            "/api/teacher/students/:id/tasks",
            post(api::teacher::add_manual_task),
        )
        .route(
            "/api/teacher/students/:id/late",
            post(api::teacher::toggle_late),
        )
        .route(
            "/api/teacher/students/:id/account",
            delete(api::teacher::delete_student_account),
        )
        .route(
            "/api/teacher/reward-config",
            get(api::teacher::get_reward_config).put(api::teacher::put_reward_config),
        );

    let catalog = Router::new()
        .route(
            "/api/catalog/classes",
            get(api::catalog::list_classes).post(api::catalog::create_class),
        )
        .route("/api/catalog/classes/:id", delete(api::catalog::delete_class))
        .route(
            "/api/catalog/content",
            get(api::catalog::list_content).post(api::catalog::create_content),
        )
        .route("/api/catalog/content/:id", delete(api::catalog::delete_content))
        .route(
            "/api/catalog/assignments",
            get(api::catalog::list_assignments).post(api::catalog::create_assignment),
        )
        .route(
            "/api/catalog/assignments/:id",
            delete(api::catalog::delete_assignment),
        )
        .route(
            "/api/catalog/rewards",
            get(api::catalog::list_rewards).post(api::catalog::create_reward),
        )
        .route("/api/catalog/rewards/:id", delete(api::catalog::delete_reward));

    let ai_routes = Router::new()
        .route("/api/audio/transcribe", post(api::ai::transcribe))
        .route("/api/diagnose/reading", post(api::ai::diagnose_reading))
        .route("/api/diagnose/math", post(api::ai::diagnose_math))
        .route("/api/chat/ask", post(api::ai::chat_ask));

    Router::new()
        .merge(auth)
        .merge(student)
        .merge(teacher)
        .merge(catalog)
        .merge(ai_routes)
        .route("/api/events", get(api::sse::event_stream))
        .merge(api::health::health_routes())
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}
