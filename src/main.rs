use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use questventure::{
    admin::{Workspace, WorkspaceConfig},
    auth, broadcast,
    quiz::{QuestionCatalog, QuizConfig},
    server::{self, ServerConfig},
    state::{today, AppState},
    translate::TranslationConfig,
};

#[tokio::main]
async fn main() {
    // Load .env file if present (before any env var reads)
    if let Err(e) = dotenvy::dotenv() {
        // Not an error if .env doesn't exist, only log if it's a different issue
        if !matches!(e, dotenvy::Error::Io(_)) {
            eprintln!("Warning: Failed to load .env file: {}", e);
        }
    }

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "questventure=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Quest Venture...");

    let server_config = ServerConfig::from_env();
    let auth_config = Arc::new(auth::AuthConfig::from_env());

    let quiz_config = QuizConfig::from_env();
    let catalog = match quiz_config.load_catalog() {
        Ok(catalog) => catalog,
        Err(e) => {
            tracing::warn!("Failed to load question catalog: {}. Using built-in questions.", e);
            QuestionCatalog::seed()
        }
    };
    tracing::info!("Question catalog has {} questions", catalog.len());

    let workspace_config = WorkspaceConfig::from_env();
    let sweep_period = workspace_config.overdue_sweep;
    let workspace = Workspace::seeded(workspace_config, today());

    let translation = TranslationConfig::from_env().build_service();

    let state = Arc::new(AppState::with_parts(
        quiz_config,
        catalog,
        workspace,
        translation,
    ));

    // Spawn background task that flips past-due invoices to overdue
    broadcast::spawn_overdue_sweeper(state.clone(), sweep_period);

    let app = server::build_router(state, auth_config, &server_config);

    let addr = server_config.bind_addr;
    tracing::info!("Listening on http://{}", addr);

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };
    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
