mod admin;
mod countdown;
mod quiz;

pub use countdown::CountdownHandle;

use crate::admin::{Workspace, WorkspaceConfig};
use crate::protocol::ServerMessage;
use crate::quiz::{QuestionCatalog, QuizConfig, QuizSession};
use crate::translate::TranslationService;
use crate::types::*;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{broadcast, Mutex, RwLock};

/// Current calendar date for invoice defaults and the overdue sweep
pub fn today() -> chrono::NaiveDate {
    chrono::Local::now().date_naive()
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub quiz_config: QuizConfig,
    pub catalog: Arc<RwLock<QuestionCatalog>>,
    pub sessions: Arc<RwLock<HashMap<SessionId, QuizSession>>>,
    /// Completed runs that outlived their session (ended or restarted)
    finished: Arc<RwLock<Vec<QuizSession>>>,
    /// One running countdown per session on the quiz screen
    countdowns: Arc<Mutex<HashMap<SessionId, CountdownHandle>>>,
    pub workspace: Arc<RwLock<Workspace>>,
    pub translation: Arc<TranslationService>,
    /// Timer ticks and leaderboard updates for participant sockets
    pub participant_broadcast: broadcast::Sender<ServerMessage>,
    /// Workspace changes for admin sockets
    pub admin_broadcast: broadcast::Sender<ServerMessage>,
}

impl AppState {
    /// State with the built-in catalog, an empty workspace and no translator
    pub fn new() -> Self {
        Self::with_parts(
            QuizConfig::default(),
            QuestionCatalog::seed(),
            Workspace::new(WorkspaceConfig::default(), today()),
            TranslationService::unavailable(),
        )
    }

    pub fn with_parts(
        quiz_config: QuizConfig,
        catalog: QuestionCatalog,
        workspace: Workspace,
        translation: TranslationService,
    ) -> Self {
        let (participant_tx, _) = broadcast::channel(256);
        let (admin_tx, _) = broadcast::channel(100);
        Self {
            quiz_config,
            catalog: Arc::new(RwLock::new(catalog)),
            sessions: Arc::new(RwLock::new(HashMap::new())),
            finished: Arc::new(RwLock::new(Vec::new())),
            countdowns: Arc::new(Mutex::new(HashMap::new())),
            workspace: Arc::new(RwLock::new(workspace)),
            translation: Arc::new(translation),
            participant_broadcast: participant_tx,
            admin_broadcast: admin_tx,
        }
    }

    /// Send to participant sockets (no receivers is fine)
    pub fn broadcast_to_participants(&self, msg: ServerMessage) {
        let _ = self.participant_broadcast.send(msg);
    }

    /// Send to admin sockets (no receivers is fine)
    pub fn broadcast_to_admin(&self, msg: ServerMessage) {
        let _ = self.admin_broadcast.send(msg);
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new()
    }
}
