use chrono::{Datelike, NaiveDate};
use std::collections::HashSet;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::{required, Workspace, WorkspaceError};
use crate::types::*;

/// Safe character set for access codes (excludes 0/O, 1/I/L to avoid confusion)
const CODE_CHARS: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
pub const ACCESS_CODE_LENGTH: usize = 6;
const INVOICE_NUMBERS_PER_YEAR: u32 = 1000;

fn generate_access_code() -> String {
    let mut rng = rand::rng();
    (0..ACCESS_CODE_LENGTH)
        .map(|_| CODE_CHARS[rng.random_range(0..CODE_CHARS.len())] as char)
        .collect()
}

/// Result of approving an invoice
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Approval {
    /// First approval: a customer and access credential were issued
    Issued {
        invoice: Invoice,
        customer: Customer,
        credential: AccessCredential,
    },
    /// Approved again after a void; the earlier customer stands
    Reinstated { invoice: Invoice },
    /// Already paid, nothing changed
    AlreadyPaid { invoice: Invoice },
}

impl Approval {
    pub fn invoice(&self) -> &Invoice {
        match self {
            Approval::Issued { invoice, .. }
            | Approval::Reinstated { invoice }
            | Approval::AlreadyPaid { invoice } => invoice,
        }
    }
}

/// Editable invoice form fields; `None` leaves a field unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InvoiceDraftUpdate {
    #[serde(default)]
    pub billing_address: Option<String>,
    #[serde(default)]
    pub term: Option<String>,
    #[serde(default)]
    pub invoice_date: Option<NaiveDate>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub currency: Option<String>,
}

impl Workspace {
    // =========================================================================
    // Draft
    // =========================================================================

    pub fn set_invoice_subject_client(&mut self, client_id: &str) -> Result<InvoiceDraft, WorkspaceError> {
        let client = self
            .clients
            .iter()
            .find(|c| c.id == client_id)
            .ok_or_else(|| WorkspaceError::not_found("Client", client_id))?;

        self.draft.subject = Some(InvoiceSubject::Client {
            client_id: client.id.clone(),
            name: client.name.clone(),
            email: client.email.clone(),
            client_type: client.client_type,
        });
        Ok(self.draft.clone())
    }

    pub fn set_invoice_subject_hunt(
        &mut self,
        hunt_id: &str,
        contact_name: &str,
        contact_email: &str,
    ) -> Result<InvoiceDraft, WorkspaceError> {
        let hunt = self
            .hunt(hunt_id)
            .ok_or_else(|| WorkspaceError::not_found("Hunt", hunt_id))?;

        let subject = InvoiceSubject::Hunt {
            hunt_id: hunt.id.clone(),
            title: hunt.title.clone(),
            contact_name: required(contact_name, "Contact name")?,
            contact_email: required(contact_email, "Contact email")?,
        };
        self.draft.subject = Some(subject);
        Ok(self.draft.clone())
    }

    pub fn update_invoice_draft(&mut self, update: InvoiceDraftUpdate) -> Result<InvoiceDraft, WorkspaceError> {
        let invoice_date = update.invoice_date.unwrap_or(self.draft.invoice_date);
        let due_date = update.due_date.unwrap_or(self.draft.due_date);
        if due_date < invoice_date {
            return Err(WorkspaceError::InvalidDates);
        }
        let currency = match update.currency {
            Some(currency) => Some(required(&currency, "Currency")?.to_uppercase()),
            None => None,
        };

        self.draft.invoice_date = invoice_date;
        self.draft.due_date = due_date;
        if let Some(currency) = currency {
            self.draft.currency = currency;
        }
        if let Some(address) = update.billing_address {
            self.draft.billing_address = address;
        }
        if let Some(term) = update.term {
            self.draft.term = term;
        }
        Ok(self.draft.clone())
    }

    pub fn add_line_item(
        &mut self,
        service_product: &str,
        description: &str,
        amount: f64,
    ) -> Result<LineItem, WorkspaceError> {
        let service_product = required(service_product, "Service")?;
        let description = required(description, "Description")?;
        if !amount.is_finite() || amount <= 0.0 {
            return Err(WorkspaceError::InvalidAmount);
        }

        let item = LineItem {
            id: new_id(),
            service_product,
            description,
            amount,
        };
        self.draft.items.push(item.clone());
        Ok(item)
    }

    pub fn remove_line_item(&mut self, item_id: &str) -> Result<LineItem, WorkspaceError> {
        let index = self
            .draft
            .items
            .iter()
            .position(|i| i.id == item_id)
            .ok_or_else(|| WorkspaceError::not_found("Line item", item_id))?;
        Ok(self.draft.items.remove(index))
    }

    pub fn reset_invoice_draft(&mut self, today: NaiveDate) -> InvoiceDraft {
        self.draft = InvoiceDraft::new(today);
        self.draft.clone()
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Random unused `{prefix}-{yy}-{n}`; fails once every `n` for the year is taken
    fn generate_invoice_number(&self, invoice_date: NaiveDate) -> Result<String, WorkspaceError> {
        let year_prefix = format!(
            "{}-{:02}-",
            self.config.invoice_prefix,
            invoice_date.year().rem_euclid(100)
        );
        let taken: HashSet<&str> = self
            .invoices
            .iter()
            .filter_map(|i| i.invoice_number.strip_prefix(year_prefix.as_str()))
            .collect();
        let free: Vec<u32> = (0..INVOICE_NUMBERS_PER_YEAR)
            .filter(|n| !taken.contains(n.to_string().as_str()))
            .collect();
        if free.is_empty() {
            tracing::warn!("No invoice numbers left for {}", year_prefix);
            return Err(WorkspaceError::InvoiceNumbersExhausted);
        }
        let n = free[rand::rng().random_range(0..free.len())];
        Ok(format!("{}{}", year_prefix, n))
    }

    /// Turn the draft into an invoice. The draft is reset on success and left
    /// untouched on failure.
    pub fn create_invoice(&mut self, today: NaiveDate) -> Result<Invoice, WorkspaceError> {
        let subject = self.draft.subject.clone().ok_or(WorkspaceError::NoSubject)?;
        if self.draft.items.is_empty() {
            return Err(WorkspaceError::NoLineItems);
        }

        let invoice_number = self.generate_invoice_number(self.draft.invoice_date)?;
        let total = self.draft.total();
        let invoice = Invoice {
            id: new_id(),
            invoice_number,
            subject,
            status: InvoiceStatus::Unpaid,
            invoice_date: self.draft.invoice_date,
            due_date: self.draft.due_date,
            term: self.draft.term.clone(),
            billing_address: self.draft.billing_address.clone(),
            currency: self.draft.currency.clone(),
            items: self.draft.items.clone(),
            balance_due: total,
            remaining_balance: total,
            customer_id: None,
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        tracing::info!(
            "Invoice {} created for {}: {} {}",
            invoice.invoice_number,
            invoice.subject.display_name(),
            invoice.balance_due,
            invoice.currency
        );
        self.invoices.push(invoice.clone());
        self.draft = InvoiceDraft::new(today);
        Ok(invoice)
    }

    fn invoice_mut(&mut self, invoice_id: &str) -> Result<&mut Invoice, WorkspaceError> {
        self.invoices
            .iter_mut()
            .find(|i| i.id == invoice_id)
            .ok_or_else(|| WorkspaceError::not_found("Invoice", invoice_id))
    }

    fn transition(
        &mut self,
        invoice_id: &str,
        action: &'static str,
        allowed: &[InvoiceStatus],
        to: InvoiceStatus,
    ) -> Result<Invoice, WorkspaceError> {
        let invoice = self.invoice_mut(invoice_id)?;
        if !allowed.contains(&invoice.status) {
            return Err(WorkspaceError::InvalidTransition {
                from: invoice.status,
                action,
            });
        }
        tracing::info!(
            "Invoice {}: {:?} -> {:?}",
            invoice.invoice_number,
            invoice.status,
            to
        );
        invoice.status = to;
        Ok(invoice.clone())
    }

    /// Payment received, awaiting approval
    pub fn mark_received(&mut self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.transition(
            invoice_id,
            "mark received",
            &[InvoiceStatus::Unpaid, InvoiceStatus::Overdue],
            InvoiceStatus::PendingApproval,
        )
    }

    pub fn reject(&mut self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.transition(
            invoice_id,
            "reject",
            &[InvoiceStatus::PendingApproval],
            InvoiceStatus::Unpaid,
        )
    }

    /// Void maps back onto unpaid from any state
    pub fn void(&mut self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        self.transition(
            invoice_id,
            "void",
            &[
                InvoiceStatus::Unpaid,
                InvoiceStatus::PendingApproval,
                InvoiceStatus::Paid,
                InvoiceStatus::Overdue,
            ],
            InvoiceStatus::Unpaid,
        )
    }

    /// Approve a pending invoice. The first approval of an invoice issues a
    /// customer and access credential; later approvals never issue another.
    pub fn approve(&mut self, invoice_id: &str) -> Result<Approval, WorkspaceError> {
        let current = self.invoice_mut(invoice_id)?;
        if current.status == InvoiceStatus::Paid {
            return Ok(Approval::AlreadyPaid {
                invoice: current.clone(),
            });
        }
        if current.items.is_empty() {
            return Err(WorkspaceError::NoLineItems);
        }

        let invoice = self.transition(
            invoice_id,
            "approve",
            &[InvoiceStatus::PendingApproval],
            InvoiceStatus::Paid,
        )?;
        if invoice.customer_id.is_some() {
            return Ok(Approval::Reinstated { invoice });
        }

        let customer = Customer {
            id: new_id(),
            name: invoice.subject.display_name().to_string(),
            email: invoice.subject.email().to_string(),
            invoice_id: invoice.id.clone(),
            hunt_id: invoice.subject.hunt_id().cloned(),
            created_at: chrono::Utc::now().to_rfc3339(),
        };

        let access_code = loop {
            let code = generate_access_code();
            if !self.credentials.iter().any(|c| c.access_code == code) {
                break code;
            }
        };
        let share_link = invoice
            .subject
            .hunt_id()
            .and_then(|hunt_id| self.hunt(hunt_id))
            .map(|hunt| hunt.web_link.clone());
        let credential = AccessCredential {
            customer_id: customer.id.clone(),
            invoice_id: invoice.id.clone(),
            access_code,
            share_link,
        };

        let invoice = {
            let stored = self.invoice_mut(invoice_id)?;
            stored.customer_id = Some(customer.id.clone());
            stored.clone()
        };
        self.customers.push(customer.clone());
        self.credentials.push(credential.clone());

        tracing::info!(
            "Customer {} issued for invoice {}",
            customer.name,
            invoice.invoice_number
        );
        Ok(Approval::Issued {
            invoice,
            customer,
            credential,
        })
    }

    pub fn delete_invoice(&mut self, invoice_id: &str) -> Result<Invoice, WorkspaceError> {
        let index = self
            .invoices
            .iter()
            .position(|i| i.id == invoice_id)
            .ok_or_else(|| WorkspaceError::not_found("Invoice", invoice_id))?;
        let invoice = self.invoices.remove(index);
        tracing::info!("Invoice {} deleted", invoice.invoice_number);
        Ok(invoice)
    }

    /// Mark unpaid invoices due before `today` as overdue; returns the changed invoices
    pub fn sweep_overdue(&mut self, today: NaiveDate) -> Vec<Invoice> {
        let mut changed = Vec::new();
        for invoice in self
            .invoices
            .iter_mut()
            .filter(|i| i.status == InvoiceStatus::Unpaid && i.due_date < today)
        {
            invoice.status = InvoiceStatus::Overdue;
            changed.push(invoice.clone());
        }
        if !changed.is_empty() {
            tracing::info!("{} invoices marked overdue", changed.len());
        }
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::admin::WorkspaceConfig;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn today() -> NaiveDate {
        date(2025, 6, 1)
    }

    fn workspace() -> Workspace {
        Workspace::new(WorkspaceConfig::default(), today())
    }

    /// Workspace with one unpaid invoice for the first client
    fn with_invoice() -> (Workspace, Invoice) {
        let mut ws = workspace();
        let client_id = ws.clients()[0].id.clone();
        ws.set_invoice_subject_client(&client_id).unwrap();
        ws.add_line_item("Scavenger hunt", "Team event", 591.95).unwrap();
        let invoice = ws.create_invoice(today()).unwrap();
        (ws, invoice)
    }

    #[test]
    fn test_access_code_shape() {
        let code = generate_access_code();
        assert_eq!(code.len(), ACCESS_CODE_LENGTH);
        assert!(code.bytes().all(|b| CODE_CHARS.contains(&b)));
    }

    #[test]
    fn test_create_requires_items_and_subject() {
        let mut ws = workspace();
        assert_eq!(ws.create_invoice(today()).unwrap_err(), WorkspaceError::NoSubject);

        let client_id = ws.clients()[1].id.clone();
        ws.set_invoice_subject_client(&client_id).unwrap();
        assert_eq!(ws.create_invoice(today()).unwrap_err(), WorkspaceError::NoLineItems);
        assert!(ws.invoices().is_empty());
        // Failed creation keeps the draft
        assert!(ws.draft().subject.is_some());
    }

    #[test]
    fn test_create_sums_items_and_resets_draft() {
        let mut ws = workspace();
        let client_id = ws.clients()[0].id.clone();
        ws.set_invoice_subject_client(&client_id).unwrap();
        ws.update_invoice_draft(InvoiceDraftUpdate {
            currency: Some(" xcg ".to_string()),
            ..Default::default()
        })
        .unwrap();
        ws.add_line_item("Hunt", "Entry", 500.0).unwrap();
        ws.add_line_item("Extras", "Snacks", 91.95).unwrap();

        let invoice = ws.create_invoice(today()).unwrap();
        assert!((invoice.balance_due - 591.95).abs() < 1e-9);
        assert_eq!(invoice.balance_due, invoice.remaining_balance);
        assert_eq!(invoice.currency, "XCG");
        assert_eq!(invoice.status, InvoiceStatus::Unpaid);
        assert!(invoice.invoice_number.starts_with("VELITT-25-"));
        assert_eq!(invoice.subject.display_name(), "TeamBuilding BV");

        assert!(ws.draft().subject.is_none());
        assert!(ws.draft().items.is_empty());
        assert_eq!(ws.draft().currency, "USD");
    }

    #[test]
    fn test_line_item_validation() {
        let mut ws = workspace();
        assert_eq!(
            ws.add_line_item("Hunt", "Entry", 0.0).unwrap_err(),
            WorkspaceError::InvalidAmount
        );
        assert_eq!(
            ws.add_line_item("Hunt", "Entry", f64::NAN).unwrap_err(),
            WorkspaceError::InvalidAmount
        );
        assert_eq!(
            ws.add_line_item(" ", "Entry", 1.0).unwrap_err(),
            WorkspaceError::MissingField("Service")
        );

        let item = ws.add_line_item("Hunt", "Entry", 1.0).unwrap();
        ws.remove_line_item(&item.id).unwrap();
        assert!(ws.draft().items.is_empty());
        assert!(ws.remove_line_item(&item.id).is_err());
    }

    #[test]
    fn test_draft_dates_must_be_ordered() {
        let mut ws = workspace();
        let result = ws.update_invoice_draft(InvoiceDraftUpdate {
            due_date: Some(date(2025, 5, 1)),
            ..Default::default()
        });
        assert_eq!(result.unwrap_err(), WorkspaceError::InvalidDates);
        assert_eq!(ws.draft().due_date, date(2025, 7, 1));
    }

    #[test]
    fn test_hunt_subject_requires_contact() {
        let mut ws = workspace();
        let hunt = ws.create_hunt("Hunt", vec!["A".to_string()]).unwrap();
        assert_eq!(
            ws.set_invoice_subject_hunt(&hunt.id, "", "a@b.com").unwrap_err(),
            WorkspaceError::MissingField("Contact name")
        );
        let draft = ws
            .set_invoice_subject_hunt(&hunt.id, "Anna", "anna@b.com")
            .unwrap();
        assert_eq!(draft.subject.unwrap().hunt_id(), Some(&hunt.id));
    }

    #[test]
    fn test_full_lifecycle_issues_one_customer() {
        let (mut ws, invoice) = with_invoice();

        let received = ws.mark_received(&invoice.id).unwrap();
        assert_eq!(received.status, InvoiceStatus::PendingApproval);

        let Approval::Issued {
            invoice: paid,
            customer,
            credential,
        } = ws.approve(&invoice.id).unwrap()
        else {
            panic!("first approval should issue a customer");
        };
        assert_eq!(paid.status, InvoiceStatus::Paid);
        assert_eq!(paid.customer_id.as_deref(), Some(customer.id.as_str()));
        assert_eq!(customer.name, "TeamBuilding BV");
        assert_eq!(customer.invoice_id, invoice.id);
        assert_eq!(credential.access_code.len(), ACCESS_CODE_LENGTH);
        assert_eq!(credential.share_link, None);

        // Approving again changes nothing
        assert!(matches!(
            ws.approve(&invoice.id).unwrap(),
            Approval::AlreadyPaid { .. }
        ));
        assert_eq!(ws.customers().len(), 1);
        assert_eq!(ws.credentials().len(), 1);
    }

    #[test]
    fn test_reapproval_after_void_does_not_duplicate_customer() {
        let (mut ws, invoice) = with_invoice();
        ws.mark_received(&invoice.id).unwrap();
        ws.approve(&invoice.id).unwrap();

        let voided = ws.void(&invoice.id).unwrap();
        assert_eq!(voided.status, InvoiceStatus::Unpaid);
        ws.mark_received(&invoice.id).unwrap();
        assert!(matches!(
            ws.approve(&invoice.id).unwrap(),
            Approval::Reinstated { .. }
        ));
        assert_eq!(ws.customers().len(), 1);
    }

    #[test]
    fn test_hunt_invoice_credential_carries_share_link() {
        let mut ws = workspace();
        let hunt = ws.create_hunt("Punda Walk", vec!["A".to_string()]).unwrap();
        ws.set_invoice_subject_hunt(&hunt.id, "Anna", "anna@b.com")
            .unwrap();
        ws.add_line_item("Hunt", "Entry", 50.0).unwrap();
        let invoice = ws.create_invoice(today()).unwrap();
        ws.mark_received(&invoice.id).unwrap();

        let Approval::Issued {
            customer,
            credential,
            ..
        } = ws.approve(&invoice.id).unwrap()
        else {
            panic!("expected issued");
        };
        assert_eq!(customer.hunt_id.as_ref(), Some(&hunt.id));
        assert_eq!(credential.share_link, Some(hunt.web_link));
    }

    #[test]
    fn test_invalid_transitions() {
        let (mut ws, invoice) = with_invoice();

        assert_eq!(
            ws.approve(&invoice.id).unwrap_err(),
            WorkspaceError::InvalidTransition {
                from: InvoiceStatus::Unpaid,
                action: "approve"
            }
        );
        assert!(ws.reject(&invoice.id).is_err());

        ws.mark_received(&invoice.id).unwrap();
        let rejected = ws.reject(&invoice.id).unwrap();
        assert_eq!(rejected.status, InvoiceStatus::Unpaid);

        ws.mark_received(&invoice.id).unwrap();
        ws.approve(&invoice.id).unwrap();
        assert_eq!(
            ws.mark_received(&invoice.id).unwrap_err(),
            WorkspaceError::InvalidTransition {
                from: InvoiceStatus::Paid,
                action: "mark received"
            }
        );
    }

    #[test]
    fn test_delete_from_any_state() {
        let (mut ws, invoice) = with_invoice();
        ws.mark_received(&invoice.id).unwrap();
        ws.approve(&invoice.id).unwrap();
        ws.delete_invoice(&invoice.id).unwrap();
        assert!(ws.invoice(&invoice.id).is_none());
        assert!(matches!(
            ws.delete_invoice(&invoice.id),
            Err(WorkspaceError::NotFound { .. })
        ));
    }

    #[test]
    fn test_invoice_numbers_run_out_per_year() {
        let mut ws = workspace();
        let client_id = ws.clients()[0].id.clone();
        for _ in 0..1000 {
            ws.set_invoice_subject_client(&client_id).unwrap();
            ws.add_line_item("Hunt", "Entry", 1.0).unwrap();
            ws.create_invoice(today()).unwrap();
        }
        let numbers: HashSet<&str> = ws
            .invoices()
            .iter()
            .map(|i| i.invoice_number.as_str())
            .collect();
        assert_eq!(numbers.len(), 1000);

        ws.set_invoice_subject_client(&client_id).unwrap();
        ws.add_line_item("Hunt", "Entry", 1.0).unwrap();
        assert_eq!(
            ws.create_invoice(today()).unwrap_err(),
            WorkspaceError::InvoiceNumbersExhausted
        );
        assert_eq!(ws.draft().items.len(), 1);

        // Next year has its own range
        ws.update_invoice_draft(InvoiceDraftUpdate {
            invoice_date: Some(date(2026, 1, 2)),
            due_date: Some(date(2026, 2, 2)),
            ..Default::default()
        })
        .unwrap();
        let invoice = ws.create_invoice(today()).unwrap();
        assert!(invoice.invoice_number.starts_with("VELITT-26-"));
    }

    #[test]
    fn test_approve_requires_line_items() {
        let (mut ws, invoice) = with_invoice();
        ws.mark_received(&invoice.id).unwrap();
        ws.invoices[0].items.clear();

        assert_eq!(
            ws.approve(&invoice.id).unwrap_err(),
            WorkspaceError::NoLineItems
        );
        assert_eq!(
            ws.invoice(&invoice.id).unwrap().status,
            InvoiceStatus::PendingApproval
        );
        assert!(ws.customers().is_empty());
    }

    #[test]
    fn test_sweep_marks_only_past_due_unpaid() {
        let (mut ws, due_later) = with_invoice();
        let client_id = ws.clients()[2].id.clone();
        ws.set_invoice_subject_client(&client_id).unwrap();
        ws.add_line_item("Hunt", "Entry", 10.0).unwrap();
        let pending = ws.create_invoice(today()).unwrap();
        ws.mark_received(&pending.id).unwrap();

        // Both due 2025-07-01; sweep on the due date changes nothing
        assert!(ws.sweep_overdue(date(2025, 7, 1)).is_empty());

        let changed = ws.sweep_overdue(date(2025, 7, 2));
        assert_eq!(changed.len(), 1);
        assert_eq!(changed[0].id, due_later.id);
        assert_eq!(
            ws.invoice(&pending.id).unwrap().status,
            InvoiceStatus::PendingApproval
        );

        // Overdue invoices can still be paid
        let received = ws.mark_received(&due_later.id).unwrap();
        assert_eq!(received.status, InvoiceStatus::PendingApproval);
    }
}
