//! WebSocket message dispatch
//!
//! Authorization is checked here, then dispatched to role-specific handler modules.

use crate::protocol::{ClientMessage, ServerMessage};
use crate::state::AppState;
use crate::types::{Role, SessionId};
use std::collections::HashSet;
use std::sync::Arc;

use super::{admin, participant};

/// Macro to check admin authorization and return early if unauthorized
macro_rules! check_admin {
    ($role:expr, $action:expr) => {
        if *$role != Role::Admin {
            return Some(ServerMessage::Error {
                code: "UNAUTHORIZED".to_string(),
                msg: format!("Only admin can {}", $action),
            });
        }
    };
}

/// Reject a participant message aimed at a session this socket did not start.
/// Unknown ids fall through so the handler reports them as not found.
pub async fn check_session_owner(
    msg: &ClientMessage,
    owned: &HashSet<SessionId>,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    let session_id = msg.session_id()?;
    if owned.contains(session_id) || !state.has_session(session_id).await {
        return None;
    }
    tracing::warn!("Socket tried to use session {} it does not own", session_id);
    Some(ServerMessage::Error {
        code: "SESSION_NOT_OWNED".to_string(),
        msg: "This session belongs to another connection".to_string(),
    })
}

/// Handle client messages and return optional response
pub async fn handle_message(
    msg: ClientMessage,
    role: &Role,
    state: &Arc<AppState>,
) -> Option<ServerMessage> {
    match msg {
        // Participant quiz flow
        ClientMessage::StartSession => participant::handle_start_session(state).await,
        ClientMessage::GetSession { session_id } => {
            participant::handle_get_session(state, session_id).await
        }
        ClientMessage::SetEmail { session_id, email } => {
            participant::handle_set_email(state, session_id, email).await
        }
        ClientMessage::SetCountry {
            session_id,
            country,
        } => participant::handle_set_country(state, session_id, country).await,
        ClientMessage::SetCodeDigit {
            session_id,
            index,
            value,
        } => participant::handle_set_code_digit(state, session_id, index, value).await,
        ClientMessage::SetLanguage {
            session_id,
            language,
        } => participant::handle_set_language(state, session_id, language).await,
        ClientMessage::ContinueSignIn { session_id } => {
            participant::handle_continue_sign_in(state, session_id).await
        }
        ClientMessage::ContinueLocation { session_id } => {
            participant::handle_continue_location(state, session_id).await
        }
        ClientMessage::SelectOption { session_id, option } => {
            participant::handle_select_option(state, session_id, option).await
        }
        ClientMessage::TypeAnswer { session_id, text } => {
            participant::handle_type_answer(state, session_id, text).await
        }
        ClientMessage::SubmitDrawing {
            session_id,
            data_uri,
        } => participant::handle_submit_drawing(state, session_id, data_uri).await,
        ClientMessage::ClearDrawing { session_id } => {
            participant::handle_clear_drawing(state, session_id).await
        }
        ClientMessage::Next { session_id } => participant::handle_next(state, session_id).await,
        ClientMessage::Back { session_id } => participant::handle_back(state, session_id).await,
        ClientMessage::Restart { session_id } => {
            participant::handle_restart(state, session_id).await
        }
        ClientMessage::EndSession { session_id } => {
            participant::handle_end_session(state, session_id).await
        }
        ClientMessage::GetLeaderboard => participant::handle_get_leaderboard(state).await,

        // Admin-only commands (authorization checked before dispatch)
        ClientMessage::AdminGetWorkspace => {
            check_admin!(role, "view the workspace");
            admin::handle_get_workspace(state).await
        }
        ClientMessage::AdminGetDashboard => {
            check_admin!(role, "view the dashboard");
            admin::handle_get_dashboard(state).await
        }
        ClientMessage::AdminCreateHunt { title, group_names } => {
            check_admin!(role, "create hunts");
            admin::handle_create_hunt(state, title, group_names).await
        }
        ClientMessage::AdminDeleteHunt { hunt_id } => {
            check_admin!(role, "delete hunts");
            admin::handle_delete_hunt(state, hunt_id).await
        }
        ClientMessage::AdminListHunts { search } => {
            check_admin!(role, "list hunts");
            admin::handle_list_hunts(state, search).await
        }
        ClientMessage::AdminShareLink { hunt_id } => {
            check_admin!(role, "share hunt links");
            admin::handle_share_link(state, hunt_id).await
        }
        ClientMessage::AdminAddParticipant { participant } => {
            check_admin!(role, "add participants");
            admin::handle_add_participant(state, participant).await
        }
        ClientMessage::AdminDeleteParticipant { participant_id } => {
            check_admin!(role, "delete participants");
            admin::handle_delete_participant(state, participant_id).await
        }
        ClientMessage::AdminResetPoints { hunt_id } => {
            check_admin!(role, "reset points");
            admin::handle_reset_points(state, hunt_id).await
        }
        ClientMessage::AdminTranslate { text } => {
            check_admin!(role, "translate questions");
            admin::handle_translate(state, text).await
        }
        ClientMessage::AdminAddQuestion { question } => {
            check_admin!(role, "add questions");
            admin::handle_add_question(state, question).await
        }
        ClientMessage::AdminDeleteQuestion { question_id } => {
            check_admin!(role, "delete questions");
            admin::handle_delete_question(state, question_id).await
        }
        ClientMessage::AdminAddAdvertisement { advertisement } => {
            check_admin!(role, "add advertisements");
            admin::handle_add_advertisement(state, advertisement).await
        }
        ClientMessage::AdminDeleteAdvertisement { advertisement_id } => {
            check_admin!(role, "delete advertisements");
            admin::handle_delete_advertisement(state, advertisement_id).await
        }
        ClientMessage::AdminSelectInvoiceClient { client_id } => {
            check_admin!(role, "edit invoices");
            admin::handle_select_invoice_client(state, client_id).await
        }
        ClientMessage::AdminSelectInvoiceHunt {
            hunt_id,
            contact_name,
            contact_email,
        } => {
            check_admin!(role, "edit invoices");
            admin::handle_select_invoice_hunt(state, hunt_id, contact_name, contact_email).await
        }
        ClientMessage::AdminUpdateInvoiceDraft { update } => {
            check_admin!(role, "edit invoices");
            admin::handle_update_invoice_draft(state, update).await
        }
        ClientMessage::AdminAddLineItem {
            service_product,
            description,
            amount,
        } => {
            check_admin!(role, "edit invoices");
            admin::handle_add_line_item(state, service_product, description, amount).await
        }
        ClientMessage::AdminRemoveLineItem { item_id } => {
            check_admin!(role, "edit invoices");
            admin::handle_remove_line_item(state, item_id).await
        }
        ClientMessage::AdminResetInvoiceDraft => {
            check_admin!(role, "edit invoices");
            admin::handle_reset_invoice_draft(state).await
        }
        ClientMessage::AdminCreateInvoice => {
            check_admin!(role, "create invoices");
            admin::handle_create_invoice(state).await
        }
        ClientMessage::AdminMarkReceived { invoice_id } => {
            check_admin!(role, "mark invoices received");
            admin::handle_mark_received(state, invoice_id).await
        }
        ClientMessage::AdminApproveInvoice { invoice_id } => {
            check_admin!(role, "approve invoices");
            admin::handle_approve_invoice(state, invoice_id).await
        }
        ClientMessage::AdminRejectInvoice { invoice_id } => {
            check_admin!(role, "reject invoices");
            admin::handle_reject_invoice(state, invoice_id).await
        }
        ClientMessage::AdminVoidInvoice { invoice_id } => {
            check_admin!(role, "void invoices");
            admin::handle_void_invoice(state, invoice_id).await
        }
        ClientMessage::AdminDeleteInvoice { invoice_id } => {
            check_admin!(role, "delete invoices");
            admin::handle_delete_invoice(state, invoice_id).await
        }
    }
}
