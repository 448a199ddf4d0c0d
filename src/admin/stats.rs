use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::Workspace;
use crate::types::{ClientType, InvoiceStatus};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrencyTotal {
    pub currency: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TopClient {
    pub name: String,
    pub invoices: usize,
    pub collected: f64,
}

/// Dashboard figures, always computed from the current collections
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DashboardStats {
    pub total_clients: usize,
    pub members: usize,
    pub customers: usize,
    pub total_hunts: usize,
    pub participants: usize,
    pub questions: usize,
    pub active_ads: usize,
    pub invoices_by_status: BTreeMap<String, usize>,
    /// Unpaid, pending and overdue balances
    pub outstanding: Vec<CurrencyTotal>,
    pub collected: Vec<CurrencyTotal>,
    pub top_clients: Vec<TopClient>,
}

fn status_key(status: InvoiceStatus) -> &'static str {
    match status {
        InvoiceStatus::Unpaid => "unpaid",
        InvoiceStatus::PendingApproval => "pending_approval",
        InvoiceStatus::Paid => "paid",
        InvoiceStatus::Overdue => "overdue",
    }
}

fn totals(amounts: BTreeMap<&str, f64>) -> Vec<CurrencyTotal> {
    amounts
        .into_iter()
        .map(|(currency, amount)| CurrencyTotal {
            currency: currency.to_string(),
            amount,
        })
        .collect()
}

impl DashboardStats {
    pub fn compute(workspace: &Workspace) -> Self {
        let members = workspace
            .clients
            .iter()
            .filter(|c| c.client_type == ClientType::Member)
            .count();

        let mut invoices_by_status: BTreeMap<String, usize> = [
            InvoiceStatus::Unpaid,
            InvoiceStatus::PendingApproval,
            InvoiceStatus::Paid,
            InvoiceStatus::Overdue,
        ]
        .into_iter()
        .map(|s| (status_key(s).to_string(), 0))
        .collect();

        let mut outstanding: BTreeMap<&str, f64> = BTreeMap::new();
        let mut collected: BTreeMap<&str, f64> = BTreeMap::new();
        let mut by_client: BTreeMap<&str, TopClient> = BTreeMap::new();

        for invoice in &workspace.invoices {
            *invoices_by_status
                .entry(status_key(invoice.status).to_string())
                .or_default() += 1;

            let name = invoice.subject.display_name();
            let entry = by_client.entry(name).or_insert_with(|| TopClient {
                name: name.to_string(),
                invoices: 0,
                collected: 0.0,
            });
            entry.invoices += 1;

            if invoice.status == InvoiceStatus::Paid {
                *collected.entry(invoice.currency.as_str()).or_default() += invoice.balance_due;
                entry.collected += invoice.balance_due;
            } else {
                *outstanding.entry(invoice.currency.as_str()).or_default() += invoice.remaining_balance;
            }
        }

        let mut top_clients: Vec<TopClient> = by_client.into_values().collect();
        top_clients.sort_by(|a, b| {
            b.collected
                .total_cmp(&a.collected)
                .then_with(|| b.invoices.cmp(&a.invoices))
                .then_with(|| a.name.cmp(&b.name))
        });
        top_clients.truncate(5);

        Self {
            total_clients: workspace.clients.len(),
            members,
            customers: workspace.clients.len() - members,
            total_hunts: workspace.hunts.len(),
            participants: workspace.participants.len(),
            questions: workspace.questions.len(),
            active_ads: workspace
                .advertisements
                .iter()
                .filter(|a| a.is_active)
                .count(),
            invoices_by_status,
            outstanding: totals(outstanding),
            collected: totals(collected),
            top_clients,
        }
    }
}
