//! Admin workspace: hunts, participants, questions, ads and the invoice lifecycle
//!
//! [`Workspace`] is a plain synchronous container; [`crate::state`] holds it
//! behind a lock and broadcasts changes to admin sockets.

mod invoice;
mod stats;
mod workspace;

use crate::types::InvoiceStatus;
use std::time::Duration;

pub use invoice::{Approval, InvoiceDraftUpdate, ACCESS_CODE_LENGTH};
pub use stats::{CurrencyTotal, DashboardStats, TopClient};
pub use workspace::{
    slugify, AdvertisementDraft, HuntDeletion, NewParticipant, QuestionDraft, Workspace,
    WorkspaceSnapshot,
};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum WorkspaceError {
    #[error("{kind} {id} not found")]
    NotFound { kind: &'static str, id: String },

    #[error("{0} is required")]
    MissingField(&'static str),

    #[error("Select a client or hunt for the invoice")]
    NoSubject,

    #[error("Add at least one line item")]
    NoLineItems,

    #[error("Amount must be a positive number")]
    InvalidAmount,

    #[error("Multiple-choice questions need at least two options")]
    TooFewOptions,

    #[error("Due date cannot be before the invoice date")]
    InvalidDates,

    #[error("No invoice numbers left for this year")]
    InvoiceNumbersExhausted,

    #[error("Cannot {action} an invoice that is {from:?}")]
    InvalidTransition {
        from: InvoiceStatus,
        action: &'static str,
    },
}

impl WorkspaceError {
    pub(crate) fn not_found(kind: &'static str, id: &str) -> Self {
        WorkspaceError::NotFound {
            kind,
            id: id.to_string(),
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            WorkspaceError::NotFound { .. } => "NOT_FOUND",
            WorkspaceError::MissingField(_) => "MISSING_FIELD",
            WorkspaceError::NoSubject => "NO_SUBJECT",
            WorkspaceError::NoLineItems => "NO_LINE_ITEMS",
            WorkspaceError::InvalidAmount => "INVALID_AMOUNT",
            WorkspaceError::TooFewOptions => "TOO_FEW_OPTIONS",
            WorkspaceError::InvalidDates => "INVALID_DATES",
            WorkspaceError::InvoiceNumbersExhausted => "INVOICE_NUMBERS_EXHAUSTED",
            WorkspaceError::InvalidTransition { .. } => "INVALID_TRANSITION",
        }
    }
}

/// Workspace configuration
#[derive(Debug, Clone)]
pub struct WorkspaceConfig {
    /// Base URL for hunt share links
    pub event_link_base: String,
    /// Prefix for generated invoice numbers
    pub invoice_prefix: String,
    /// How often the overdue sweep runs
    pub overdue_sweep: Duration,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            event_link_base: "https://velitt.digital/event".to_string(),
            invoice_prefix: "VELITT".to_string(),
            overdue_sweep: Duration::from_secs(60),
        }
    }
}

impl WorkspaceConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();

        let event_link_base = non_blank_env("EVENT_LINK_BASE")
            .map(|s| s.trim_end_matches('/').to_string())
            .unwrap_or(defaults.event_link_base);
        let invoice_prefix = non_blank_env("INVOICE_PREFIX").unwrap_or(defaults.invoice_prefix);
        let overdue_sweep = non_blank_env("OVERDUE_SWEEP_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.overdue_sweep);

        Self {
            event_link_base,
            invoice_prefix,
            overdue_sweep,
        }
    }
}

fn non_blank_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Trimmed value of a required text field
pub(crate) fn required(value: &str, field: &'static str) -> Result<String, WorkspaceError> {
    let value = value.trim();
    if value.is_empty() {
        Err(WorkspaceError::MissingField(field))
    } else {
        Ok(value.to_string())
    }
}
