use super::{today, AppState};
use crate::admin::*;
use crate::protocol::ServerMessage;
use crate::translate::TranslationOutcome;
use crate::types::*;

impl AppState {
    /// Run a workspace mutation; on success every admin socket gets a fresh snapshot
    async fn update_workspace<T>(
        &self,
        op: impl FnOnce(&mut Workspace) -> Result<T, WorkspaceError>,
    ) -> Result<T, WorkspaceError> {
        let mut workspace = self.workspace.write().await;
        let result = op(&mut workspace)?;
        self.broadcast_to_admin(ServerMessage::Workspace {
            snapshot: workspace.snapshot(),
        });
        Ok(result)
    }

    pub async fn workspace_snapshot(&self) -> WorkspaceSnapshot {
        self.workspace.read().await.snapshot()
    }

    pub async fn dashboard(&self) -> DashboardStats {
        DashboardStats::compute(&*self.workspace.read().await)
    }

    pub async fn list_hunts(&self, search: &str) -> Vec<ScavengerHunt> {
        self.workspace.read().await.list_hunts(search)
    }

    pub async fn share_link(&self, hunt_id: &str) -> Result<String, WorkspaceError> {
        self.workspace.read().await.share_link(hunt_id)
    }

    // Hunts and their content

    pub async fn create_hunt(&self, title: &str, group_names: Vec<String>) -> Result<ScavengerHunt, WorkspaceError> {
        self.update_workspace(|ws| ws.create_hunt(title, group_names))
            .await
    }

    pub async fn delete_hunt(&self, hunt_id: &str) -> Result<HuntDeletion, WorkspaceError> {
        self.update_workspace(|ws| ws.delete_hunt(hunt_id)).await
    }

    pub async fn add_participant(&self, new: NewParticipant) -> Result<Participant, WorkspaceError> {
        self.update_workspace(|ws| ws.add_participant(new)).await
    }

    pub async fn delete_participant(&self, participant_id: &str) -> Result<Participant, WorkspaceError> {
        self.update_workspace(|ws| ws.delete_participant(participant_id))
            .await
    }

    pub async fn reset_points(&self, hunt_id: &str) -> Result<usize, WorkspaceError> {
        self.update_workspace(|ws| ws.reset_points(hunt_id)).await
    }

    pub async fn add_question(&self, draft: QuestionDraft) -> Result<AdminQuestion, WorkspaceError> {
        self.update_workspace(|ws| ws.add_question(draft)).await
    }

    pub async fn delete_question(&self, question_id: &str) -> Result<AdminQuestion, WorkspaceError> {
        self.update_workspace(|ws| ws.delete_question(question_id))
            .await
    }

    pub async fn add_advertisement(&self, draft: AdvertisementDraft) -> Result<Advertisement, WorkspaceError> {
        self.update_workspace(|ws| ws.add_advertisement(draft)).await
    }

    pub async fn delete_advertisement(&self, ad_id: &str) -> Result<Advertisement, WorkspaceError> {
        self.update_workspace(|ws| ws.delete_advertisement(ad_id))
            .await
    }

    /// Translate question text for the admin form. The translation runs
    /// without holding any state lock.
    pub async fn translate_for_admin(&self, text: &str) -> TranslationOutcome {
        self.translation.translate_for_admin(text).await
    }

    // Invoices

    pub async fn select_invoice_client(&self, client_id: &str) -> Result<InvoiceDraft, WorkspaceError> {
        self.update_workspace(|ws| ws.set_invoice_subject_client(client_id))
            .await
    }

    pub async fn select_invoice_hunt(
        &self,
        hunt_id: &str,
        contact_name: &str,
        contact_email: &str,
    ) -> Result<InvoiceDraft, WorkspaceError> {
        self.update_workspace(|ws| ws.set_invoice_subject_hunt(hunt_id, contact_name, contact_email))
            .await
    }

    pub async fn update_invoice_draft(&self, update: InvoiceDraftUpdate) -> Result<InvoiceDraft, WorkspaceError> {
        self.update_workspace(|ws| ws.update_invoice_draft(update))
            .await
    }

    pub async fn add_line_item(
        &self,
        service_product: &str,
        description: &str,
        amount: f64,
    ) -> Result<InvoiceDraft, WorkspaceError> {
        self.update_workspace(|ws| {
            ws.add_line_item(service_product, description, amount)?;
            Ok(ws.draft().clone())
        })
        .await
    }

    pub async fn remove_line_item(&self, item_id: &str) -> Result<InvoiceDraft, WorkspaceError> {
        self.update_workspace(|ws| {
            ws.remove_line_item(item_id)?;
            Ok(ws.draft().clone())
        })
        .await
    }

    pub async fn reset_invoice_draft(&self) -> InvoiceDraft {
        let mut workspace = self.workspace.write().await;
        let draft = workspace.reset_invoice_draft(today());
        self.broadcast_to_admin(ServerMessage::Workspace {
            snapshot: workspace.snapshot(),
        });
        draft
    }

    pub async fn create_invoice(&self) -> Result<Invoice, WorkspaceError> {
        self.update_workspace(|ws| ws.create_invoice(today())).await
    }

    pub async fn mark_invoice_received(&self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.update_workspace(|ws| ws.mark_received(invoice_id)).await
    }

    pub async fn approve_invoice(&self, invoice_id: &str) -> Result<Approval, WorkspaceError> {
        self.update_workspace(|ws| ws.approve(invoice_id)).await
    }

    pub async fn reject_invoice(&self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.update_workspace(|ws| ws.reject(invoice_id)).await
    }

    pub async fn void_invoice(&self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.update_workspace(|ws| ws.void(invoice_id)).await
    }

    pub async fn delete_invoice(&self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.update_workspace(|ws| ws.delete_invoice(invoice_id))
            .await
    }

    /// Mark past-due unpaid invoices as overdue, notifying admins of each change
    pub async fn sweep_overdue(&self, today: chrono::NaiveDate) -> Vec<Invoice> {
        let mut workspace = self.workspace.write().await;
        let changed = workspace.sweep_overdue(today);
        if !changed.is_empty() {
            for invoice in &changed {
                self.broadcast_to_admin(ServerMessage::InvoiceUpdated {
                    invoice: invoice.clone(),
                });
            }
            self.broadcast_to_admin(ServerMessage::Workspace {
                snapshot: workspace.snapshot(),
            });
        }
        changed
    }
}
