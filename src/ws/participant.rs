//! Participant quiz-flow handlers
//!
//! Every handler answers with the session's fresh view, or an error.

use crate::protocol::ServerMessage;
use crate::quiz::{QuizError, SessionView};
use crate::state::AppState;
use crate::types::Language;
use std::sync::Arc;

fn reply(result: Result<SessionView, QuizError>) -> Option<ServerMessage> {
    match result {
        Ok(view) => Some(ServerMessage::Session { view }),
        Err(e) => {
            tracing::debug!("Quiz operation rejected: {}", e);
            Some(e.into())
        }
    }
}

pub async fn handle_start_session(state: &Arc<AppState>) -> Option<ServerMessage> {
    let view = state.start_session().await;
    Some(ServerMessage::Session { view })
}

pub async fn handle_get_session(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    reply(state.session_view(&session_id).await)
}

pub async fn handle_set_email(
    state: &Arc<AppState>,
    session_id: String,
    email: String,
) -> Option<ServerMessage> {
    reply(state.set_email(&session_id, email).await)
}

pub async fn handle_set_country(
    state: &Arc<AppState>,
    session_id: String,
    country: Option<String>,
) -> Option<ServerMessage> {
    reply(state.set_country(&session_id, country).await)
}

pub async fn handle_set_code_digit(
    state: &Arc<AppState>,
    session_id: String,
    index: usize,
    value: String,
) -> Option<ServerMessage> {
    reply(state.set_code_digit(&session_id, index, &value).await)
}

pub async fn handle_set_language(
    state: &Arc<AppState>,
    session_id: String,
    language: Language,
) -> Option<ServerMessage> {
    reply(state.set_language(&session_id, language).await)
}

pub async fn handle_continue_sign_in(
    state: &Arc<AppState>,
    session_id: String,
) -> Option<ServerMessage> {
    reply(state.continue_sign_in(&session_id).await)
}

pub async fn handle_continue_location(
    state: &Arc<AppState>,
    session_id: String,
) -> Option<ServerMessage> {
    reply(state.continue_location(&session_id).await)
}

pub async fn handle_select_option(
    state: &Arc<AppState>,
    session_id: String,
    option: String,
) -> Option<ServerMessage> {
    reply(state.select_option(&session_id, option).await)
}

pub async fn handle_type_answer(
    state: &Arc<AppState>,
    session_id: String,
    text: String,
) -> Option<ServerMessage> {
    reply(state.type_answer(&session_id, text).await)
}

pub async fn handle_submit_drawing(
    state: &Arc<AppState>,
    session_id: String,
    data_uri: String,
) -> Option<ServerMessage> {
    reply(state.submit_drawing(&session_id, data_uri).await)
}

pub async fn handle_clear_drawing(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    reply(state.clear_drawing(&session_id).await)
}

pub async fn handle_next(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    reply(state.next_question(&session_id).await)
}

pub async fn handle_back(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    reply(state.back(&session_id).await)
}

pub async fn handle_restart(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    reply(state.restart(&session_id).await)
}

pub async fn handle_end_session(state: &Arc<AppState>, session_id: String) -> Option<ServerMessage> {
    match state.end_session(&session_id).await {
        Ok(()) => Some(ServerMessage::SessionEnded { session_id }),
        Err(e) => Some(e.into()),
    }
}

pub async fn handle_get_leaderboard(state: &Arc<AppState>) -> Option<ServerMessage> {
    let entries = state.leaderboard().await;
    Some(ServerMessage::Leaderboard { entries })
}
