//! gyaan-ui - GYAAN learning platform service
//!
//! Serves the platform HTTP API: authentication, student progression,
//! teacher roster management, catalogs, AI analysis boundary, and the
//! SSE event stream.

use anyhow::Result;
use clap::Parser;
use gyaan_common::config::{prepare_root_folder, resolve_root_folder};
use gyaan_common::db::{init_database, settings};
use gyaan_common::events::EventBus;
use gyaan_ui::ai::{CannedAiClient, Fallback, HttpAiClient, SharedAiService};
use gyaan_ui::session::SessionStore;
use gyaan_ui::{build_router, AppState};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "gyaan-ui", about = "GYAAN learning platform service")]
struct Args {
    /// Root folder holding the database and configuration
    #[arg(long)]
    root_folder: Option<String>,

    /// Port to listen on
    #[arg(long, default_value_t = 5720)]
    port: u16,

    /// Base URL of the AI analysis backend; canned demo responses are
    /// used when absent
    #[arg(long, env = "GYAAN_AI_URL")]
    ai_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting GYAAN UI (gyaan-ui) v{}", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let root_folder = resolve_root_folder(args.root_folder.as_deref(), "GYAAN_ROOT_FOLDER")?;
    let db_path = prepare_root_folder(&root_folder)?;
    info!("Database path: {}", db_path.display());

    let pool = init_database(&db_path).await?;
    info!("✓ Database initialized");

    let reward_config = settings::load_reward_config(&pool).await?;
    info!(
        threshold = reward_config.rage_threshold,
        "✓ Loaded reward configuration"
    );

    let events = EventBus::default();
    let session = Arc::new(SessionStore::new(
        pool.clone(),
        events.clone(),
        reward_config,
    ));

    let ai: SharedAiService = match args.ai_url {
        Some(url) => {
            info!("AI backend: {}", url);
            Arc::new(Fallback::new(HttpAiClient::new(url)?))
        }
        None => {
            info!("AI backend not configured; using canned demo responses");
            Arc::new(CannedAiClient::new())
        }
    };

    let state = AppState::new(pool, session, events, ai);
    let app = build_router(state);

    let addr = format!("127.0.0.1:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("gyaan-ui listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
