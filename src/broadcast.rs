use crate::state::{today, AppState};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Spawn a background task that periodically marks past-due unpaid invoices as overdue
pub fn spawn_overdue_sweeper(state: Arc<AppState>, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            let changed = state.sweep_overdue(today()).await;
            for invoice in &changed {
                tracing::info!(
                    "Invoice {} is overdue (due {})",
                    invoice.invoice_number,
                    invoice.due_date
                );
            }

            tokio::time::sleep(period).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::{Workspace, WorkspaceConfig};
    use crate::quiz::{QuestionCatalog, QuizConfig};
    use crate::translate::TranslationService;
    use crate::types::InvoiceStatus;

    #[tokio::test(start_paused = true)]
    async fn test_sweeper_marks_historical_invoices() {
        // Seeded invoices were due in 2025
        let workspace = Workspace::seeded(WorkspaceConfig::default(), today());
        let state = Arc::new(AppState::with_parts(
            QuizConfig::default(),
            QuestionCatalog::seed(),
            workspace,
            TranslationService::unavailable(),
        ));

        let handle = spawn_overdue_sweeper(state.clone(), Duration::from_secs(60));
        tokio::time::sleep(Duration::from_secs(1)).await;

        let snapshot = state.workspace_snapshot().await;
        assert!(snapshot
            .invoices
            .iter()
            .all(|i| i.status == InvoiceStatus::Overdue));

        handle.abort();
    }
}
