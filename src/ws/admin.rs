//! Admin-only command handlers
//!
//! All handlers in this module require the Admin role.
//! Authorization is checked in the main dispatch layer before calling these.

use crate::admin::{
    AdvertisementDraft, InvoiceDraftUpdate, NewParticipant, QuestionDraft, WorkspaceError,
};
use crate::protocol::ServerMessage;
use crate::state::AppState;
use std::sync::Arc;

fn respond<T>(
    result: Result<T, WorkspaceError>,
    to_message: impl FnOnce(T) -> ServerMessage,
) -> Option<ServerMessage> {
    match result {
        Ok(value) => Some(to_message(value)),
        Err(e) => {
            tracing::warn!("Admin command failed: {}", e);
            Some(e.into())
        }
    }
}

pub async fn handle_get_workspace(state: &Arc<AppState>) -> Option<ServerMessage> {
    let snapshot = state.workspace_snapshot().await;
    Some(ServerMessage::Workspace { snapshot })
}

pub async fn handle_get_dashboard(state: &Arc<AppState>) -> Option<ServerMessage> {
    let stats = state.dashboard().await;
    Some(ServerMessage::Dashboard { stats })
}

pub async fn handle_create_hunt(
    state: &Arc<AppState>,
    title: String,
    group_names: Vec<String>,
) -> Option<ServerMessage> {
    tracing::info!("Admin creating hunt {:?}", title);
    respond(state.create_hunt(&title, group_names).await, |hunt| {
        ServerMessage::HuntCreated { hunt }
    })
}

pub async fn handle_delete_hunt(state: &Arc<AppState>, hunt_id: String) -> Option<ServerMessage> {
    tracing::info!("Admin deleting hunt {}", hunt_id);
    respond(state.delete_hunt(&hunt_id).await, |deletion| {
        ServerMessage::HuntDeleted { deletion }
    })
}

pub async fn handle_list_hunts(state: &Arc<AppState>, search: String) -> Option<ServerMessage> {
    let hunts = state.list_hunts(&search).await;
    Some(ServerMessage::Hunts { hunts })
}

pub async fn handle_share_link(state: &Arc<AppState>, hunt_id: String) -> Option<ServerMessage> {
    respond(state.share_link(&hunt_id).await, |web_link| {
        ServerMessage::ShareLink { hunt_id, web_link }
    })
}

pub async fn handle_add_participant(
    state: &Arc<AppState>,
    participant: NewParticipant,
) -> Option<ServerMessage> {
    respond(state.add_participant(participant).await, |participant| {
        ServerMessage::ParticipantAdded { participant }
    })
}

pub async fn handle_delete_participant(
    state: &Arc<AppState>,
    participant_id: String,
) -> Option<ServerMessage> {
    respond(state.delete_participant(&participant_id).await, |p| {
        ServerMessage::ParticipantDeleted {
            participant_id: p.id,
        }
    })
}

pub async fn handle_reset_points(state: &Arc<AppState>, hunt_id: String) -> Option<ServerMessage> {
    respond(state.reset_points(&hunt_id).await, |count| {
        ServerMessage::PointsReset { hunt_id, count }
    })
}

pub async fn handle_translate(state: &Arc<AppState>, text: String) -> Option<ServerMessage> {
    let outcome = state.translate_for_admin(&text).await;
    if let Some(reason) = &outcome.fallback_reason {
        tracing::warn!("Translation fell back to source text: {}", reason);
    }
    Some(ServerMessage::Translation { outcome })
}

pub async fn handle_add_question(
    state: &Arc<AppState>,
    question: QuestionDraft,
) -> Option<ServerMessage> {
    respond(state.add_question(question).await, |question| {
        ServerMessage::QuestionAdded { question }
    })
}

pub async fn handle_delete_question(
    state: &Arc<AppState>,
    question_id: String,
) -> Option<ServerMessage> {
    respond(state.delete_question(&question_id).await, |q| {
        ServerMessage::QuestionDeleted {
            question_id: q.question.id,
        }
    })
}

pub async fn handle_add_advertisement(
    state: &Arc<AppState>,
    advertisement: AdvertisementDraft,
) -> Option<ServerMessage> {
    respond(state.add_advertisement(advertisement).await, |advertisement| {
        ServerMessage::AdvertisementAdded { advertisement }
    })
}

pub async fn handle_delete_advertisement(
    state: &Arc<AppState>,
    advertisement_id: String,
) -> Option<ServerMessage> {
    respond(state.delete_advertisement(&advertisement_id).await, |ad| {
        ServerMessage::AdvertisementDeleted {
            advertisement_id: ad.id,
        }
    })
}

// Invoices

pub async fn handle_select_invoice_client(
    state: &Arc<AppState>,
    client_id: String,
) -> Option<ServerMessage> {
    respond(state.select_invoice_client(&client_id).await, |draft| {
        ServerMessage::InvoiceDraft { draft }
    })
}

pub async fn handle_select_invoice_hunt(
    state: &Arc<AppState>,
    hunt_id: String,
    contact_name: String,
    contact_email: String,
) -> Option<ServerMessage> {
    respond(
        state
            .select_invoice_hunt(&hunt_id, &contact_name, &contact_email)
            .await,
        |draft| ServerMessage::InvoiceDraft { draft },
    )
}

pub async fn handle_update_invoice_draft(
    state: &Arc<AppState>,
    update: InvoiceDraftUpdate,
) -> Option<ServerMessage> {
    respond(state.update_invoice_draft(update).await, |draft| {
        ServerMessage::InvoiceDraft { draft }
    })
}

pub async fn handle_add_line_item(
    state: &Arc<AppState>,
    service_product: String,
    description: String,
    amount: f64,
) -> Option<ServerMessage> {
    respond(
        state
            .add_line_item(&service_product, &description, amount)
            .await,
        |draft| ServerMessage::InvoiceDraft { draft },
    )
}

pub async fn handle_remove_line_item(state: &Arc<AppState>, item_id: String) -> Option<ServerMessage> {
    respond(state.remove_line_item(&item_id).await, |draft| {
        ServerMessage::InvoiceDraft { draft }
    })
}

pub async fn handle_reset_invoice_draft(state: &Arc<AppState>) -> Option<ServerMessage> {
    let draft = state.reset_invoice_draft().await;
    Some(ServerMessage::InvoiceDraft { draft })
}

pub async fn handle_create_invoice(state: &Arc<AppState>) -> Option<ServerMessage> {
    respond(state.create_invoice().await, |invoice| {
        tracing::info!(
            "Invoice {} created for {}",
            invoice.invoice_number,
            invoice.subject.display_name()
        );
        ServerMessage::InvoiceCreated { invoice }
    })
}

pub async fn handle_mark_received(state: &Arc<AppState>, invoice_id: String) -> Option<ServerMessage> {
    respond(state.mark_invoice_received(&invoice_id).await, |invoice| {
        ServerMessage::InvoiceUpdated { invoice }
    })
}

pub async fn handle_approve_invoice(
    state: &Arc<AppState>,
    invoice_id: String,
) -> Option<ServerMessage> {
    respond(state.approve_invoice(&invoice_id).await, |approval| {
        tracing::info!("Invoice {} approved", approval.invoice().invoice_number);
        ServerMessage::InvoiceApproved { approval }
    })
}

pub async fn handle_reject_invoice(state: &Arc<AppState>, invoice_id: String) -> Option<ServerMessage> {
    respond(state.reject_invoice(&invoice_id).await, |invoice| {
        ServerMessage::InvoiceUpdated { invoice }
    })
}

pub async fn handle_void_invoice(state: &Arc<AppState>, invoice_id: String) -> Option<ServerMessage> {
    respond(state.void_invoice(&invoice_id).await, |invoice| {
        ServerMessage::InvoiceUpdated { invoice }
    })
}

pub async fn handle_delete_invoice(state: &Arc<AppState>, invoice_id: String) -> Option<ServerMessage> {
    respond(state.delete_invoice(&invoice_id).await, |invoice| {
        ServerMessage::InvoiceDeleted {
            invoice_id: invoice.id,
        }
    })
}
