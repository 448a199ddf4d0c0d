use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{required, WorkspaceConfig, WorkspaceError};
use crate::types::*;

fn now() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// URL-safe slug of a hunt title
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for c in title.trim().chars() {
        if c.is_alphanumeric() {
            slug.extend(c.to_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('-') {
            slug.push('-');
        }
    }
    while slug.ends_with('-') {
        slug.pop();
    }
    slug
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewParticipant {
    pub hunt_id: HuntId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub hunt_id: HuntId,
    #[serde(default)]
    pub title: String,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub prompt: TranslationBundle,
    pub correct_answer: TranslationBundle,
    #[serde(default)]
    pub media: Option<Media>,
    #[serde(default)]
    pub location: Option<GeoLink>,
    #[serde(default)]
    pub points: Option<u32>,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdvertisementDraft {
    pub hunt_id: HuntId,
    pub statement: String,
    pub ad_type: AdType,
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    pub placement: AdPlacement,
    #[serde(default)]
    pub question_number: u32,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

/// What a hunt deletion removed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HuntDeletion {
    pub hunt: ScavengerHunt,
    pub participants_removed: usize,
    pub questions_removed: usize,
    pub advertisements_removed: usize,
    /// Invoices billing this hunt, kept as financial records
    pub invoices_retained: usize,
}

/// Full copy of the workspace for admin clients
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    pub hunts: Vec<ScavengerHunt>,
    pub participants: Vec<Participant>,
    pub questions: Vec<AdminQuestion>,
    pub advertisements: Vec<Advertisement>,
    pub clients: Vec<Client>,
    pub customers: Vec<Customer>,
    pub credentials: Vec<AccessCredential>,
    pub invoices: Vec<Invoice>,
    pub draft: InvoiceDraft,
}

#[derive(Debug, Clone)]
pub struct Workspace {
    pub(super) config: WorkspaceConfig,
    pub(super) hunts: Vec<ScavengerHunt>,
    pub(super) participants: Vec<Participant>,
    pub(super) questions: Vec<AdminQuestion>,
    pub(super) advertisements: Vec<Advertisement>,
    pub(super) clients: Vec<Client>,
    pub(super) customers: Vec<Customer>,
    pub(super) credentials: Vec<AccessCredential>,
    pub(super) invoices: Vec<Invoice>,
    pub(super) draft: InvoiceDraft,
}

impl Workspace {
    /// Empty workspace with the standing client list
    pub fn new(config: WorkspaceConfig, today: NaiveDate) -> Self {
        let clients = [
            ("TeamBuilding BV", "contact@teambuilding.com", ClientType::Member, "2024-01-15"),
            ("FunYou Events", "info@funyou.com", ClientType::Customer, "2024-02-20"),
            ("CityScape NL", "hello@cityscape.nl", ClientType::Customer, "2024-03-10"),
        ]
        .into_iter()
        .map(|(name, email, client_type, created_at)| Client {
            id: new_id(),
            name: name.to_string(),
            email: email.to_string(),
            client_type,
            created_at: created_at.to_string(),
        })
        .collect();

        Self {
            config,
            hunts: Vec::new(),
            participants: Vec::new(),
            questions: Vec::new(),
            advertisements: Vec::new(),
            clients,
            customers: Vec::new(),
            credentials: Vec::new(),
            invoices: Vec::new(),
            draft: InvoiceDraft::new(today),
        }
    }

    /// Workspace with a demo hunt and the two historical invoices
    pub fn seeded(config: WorkspaceConfig, today: NaiveDate) -> Self {
        let mut workspace = Self::new(config, today);

        if let Ok(hunt) = workspace.create_hunt(
            "Willemstad Heritage Hunt",
            vec!["Red Team".to_string(), "Blue Team".to_string()],
        ) {
            for (first, last, email) in [
                ("Maria", "Martina", "maria@example.com"),
                ("Joost", "de Vries", "joost@example.com"),
            ] {
                let _ = workspace.add_participant(NewParticipant {
                    hunt_id: hunt.id.clone(),
                    first_name: first.to_string(),
                    last_name: last.to_string(),
                    email: email.to_string(),
                    phone_number: None,
                });
            }
        }

        let historical = [
            ("BOTC-25-591", 0, "RCN", (2025, 4, 27), (2025, 5, 27), 33600.0, "USD", "Corporate hunt"),
            ("BOTC-25-590", 1, "CWM", (2025, 3, 12), (2025, 4, 12), 591.95, "XCG", "Team outing"),
        ];
        for (number, client_index, name, issued, due, amount, currency, service) in historical {
            let client = &workspace.clients[client_index];
            let (Some(invoice_date), Some(due_date)) = (
                NaiveDate::from_ymd_opt(issued.0, issued.1, issued.2),
                NaiveDate::from_ymd_opt(due.0, due.1, due.2),
            ) else {
                continue;
            };
            let invoice = Invoice {
                id: new_id(),
                invoice_number: number.to_string(),
                subject: InvoiceSubject::Client {
                    client_id: client.id.clone(),
                    name: name.to_string(),
                    email: client.email.clone(),
                    client_type: ClientType::Customer,
                },
                status: InvoiceStatus::Unpaid,
                invoice_date,
                due_date,
                term: "30 days".to_string(),
                billing_address: String::new(),
                currency: currency.to_string(),
                items: vec![LineItem {
                    id: new_id(),
                    service_product: service.to_string(),
                    description: format!("{} for {}", service, name),
                    amount,
                }],
                balance_due: amount,
                remaining_balance: amount,
                customer_id: None,
                created_at: now(),
            };
            workspace.invoices.push(invoice);
        }

        workspace
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn snapshot(&self) -> WorkspaceSnapshot {
        WorkspaceSnapshot {
            hunts: self.hunts.clone(),
            participants: self.participants.clone(),
            questions: self.questions.clone(),
            advertisements: self.advertisements.clone(),
            clients: self.clients.clone(),
            customers: self.customers.clone(),
            credentials: self.credentials.clone(),
            invoices: self.invoices.clone(),
            draft: self.draft.clone(),
        }
    }

    // =========================================================================
    // Hunts
    // =========================================================================

    pub fn create_hunt(
        &mut self,
        title: &str,
        group_names: Vec<String>,
    ) -> Result<ScavengerHunt, WorkspaceError> {
        let title = required(title, "Title")?;
        let group_names: Vec<String> = group_names
            .iter()
            .map(|g| g.trim().to_string())
            .filter(|g| !g.is_empty())
            .collect();
        if group_names.is_empty() {
            return Err(WorkspaceError::MissingField("Group name"));
        }

        let base = format!("{}/{}", self.config.event_link_base, slugify(&title));
        let mut web_link = base.clone();
        let mut n = 2;
        while self.hunts.iter().any(|h| h.web_link == web_link) {
            web_link = format!("{}-{}", base, n);
            n += 1;
        }

        let hunt = ScavengerHunt {
            id: new_id(),
            title,
            web_link,
            group_names,
            created_at: now(),
        };
        tracing::info!("Hunt created: {} ({})", hunt.title, hunt.id);
        self.hunts.push(hunt.clone());
        Ok(hunt)
    }

    pub fn hunt(&self, hunt_id: &str) -> Option<&ScavengerHunt> {
        self.hunts.iter().find(|h| h.id == hunt_id)
    }

    fn require_hunt(&self, hunt_id: &str) -> Result<&ScavengerHunt, WorkspaceError> {
        self.hunt(hunt_id)
            .ok_or_else(|| WorkspaceError::not_found("Hunt", hunt_id))
    }

    /// Hunts whose title contains `search` (case-insensitive)
    pub fn list_hunts(&self, search: &str) -> Vec<ScavengerHunt> {
        let needle = search.trim().to_lowercase();
        self.hunts
            .iter()
            .filter(|h| needle.is_empty() || h.title.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    pub fn share_link(&self, hunt_id: &str) -> Result<String, WorkspaceError> {
        Ok(self.require_hunt(hunt_id)?.web_link.clone())
    }

    /// Delete a hunt together with its participants, questions and ads.
    /// Invoices are left in place.
    pub fn delete_hunt(&mut self, hunt_id: &str) -> Result<HuntDeletion, WorkspaceError> {
        let index = self
            .hunts
            .iter()
            .position(|h| h.id == hunt_id)
            .ok_or_else(|| WorkspaceError::not_found("Hunt", hunt_id))?;
        let hunt = self.hunts.remove(index);

        let before = self.participants.len();
        self.participants.retain(|p| p.hunt_id != hunt.id);
        let participants_removed = before - self.participants.len();

        let before = self.questions.len();
        self.questions.retain(|q| q.hunt_id != hunt.id);
        let questions_removed = before - self.questions.len();

        let before = self.advertisements.len();
        self.advertisements.retain(|a| a.hunt_id != hunt.id);
        let advertisements_removed = before - self.advertisements.len();

        let invoices_retained = self
            .invoices
            .iter()
            .filter(|i| i.subject.hunt_id() == Some(&hunt.id))
            .count();

        // A draft cannot point at a hunt that no longer exists
        if self
            .draft
            .subject
            .as_ref()
            .is_some_and(|s| s.hunt_id() == Some(&hunt.id))
        {
            self.draft.subject = None;
        }

        tracing::info!(
            "Hunt deleted: {} (participants: {}, questions: {}, ads: {}, invoices kept: {})",
            hunt.id,
            participants_removed,
            questions_removed,
            advertisements_removed,
            invoices_retained
        );

        Ok(HuntDeletion {
            hunt,
            participants_removed,
            questions_removed,
            advertisements_removed,
            invoices_retained,
        })
    }

    // =========================================================================
    // Participants
    // =========================================================================

    pub fn add_participant(&mut self, new: NewParticipant) -> Result<Participant, WorkspaceError> {
        self.require_hunt(&new.hunt_id)?;
        let participant = Participant {
            id: new_id(),
            hunt_id: new.hunt_id,
            first_name: required(&new.first_name, "First name")?,
            last_name: required(&new.last_name, "Last name")?,
            email: required(&new.email, "Email")?,
            phone_number: new
                .phone_number
                .map(|p| p.trim().to_string())
                .filter(|p| !p.is_empty()),
            points_earned: 0,
        };
        tracing::info!(
            "Participant added: {} to hunt {}",
            participant.full_name(),
            participant.hunt_id
        );
        self.participants.push(participant.clone());
        Ok(participant)
    }

    pub fn delete_participant(&mut self, participant_id: &str) -> Result<Participant, WorkspaceError> {
        let index = self
            .participants
            .iter()
            .position(|p| p.id == participant_id)
            .ok_or_else(|| WorkspaceError::not_found("Participant", participant_id))?;
        Ok(self.participants.remove(index))
    }

    /// Participants, optionally of one hunt, whose full name contains `search`
    pub fn list_participants(&self, hunt_id: Option<&str>, search: &str) -> Vec<Participant> {
        let needle = search.trim().to_lowercase();
        self.participants
            .iter()
            .filter(|p| hunt_id.map_or(true, |h| p.hunt_id == h))
            .filter(|p| needle.is_empty() || p.full_name().to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }

    /// Zero the points of every participant in a hunt; returns how many were reset
    pub fn reset_points(&mut self, hunt_id: &str) -> Result<usize, WorkspaceError> {
        self.require_hunt(hunt_id)?;
        let mut count = 0;
        for participant in self.participants.iter_mut().filter(|p| p.hunt_id == hunt_id) {
            participant.points_earned = 0;
            count += 1;
        }
        tracing::info!("Points reset for {} participants in hunt {}", count, hunt_id);
        Ok(count)
    }

    // =========================================================================
    // Questions
    // =========================================================================

    pub fn add_question(&mut self, draft: QuestionDraft) -> Result<AdminQuestion, WorkspaceError> {
        self.require_hunt(&draft.hunt_id)?;
        required(&draft.prompt.english, "Question text")?;

        let kind = match draft.kind {
            QuestionKind::MultipleChoice { options } => {
                let options: Vec<TranslationBundle> = options
                    .into_iter()
                    .filter(|o| !o.english.trim().is_empty())
                    .collect();
                if options.len() < 2 {
                    return Err(WorkspaceError::TooFewOptions);
                }
                QuestionKind::MultipleChoice { options }
            }
            other => other,
        };
        if kind != QuestionKind::Canvas {
            required(&draft.correct_answer.english, "Correct answer")?;
        }

        let sequence = self
            .questions
            .iter()
            .filter(|q| q.hunt_id == draft.hunt_id)
            .map(|q| q.question.sequence)
            .max()
            .unwrap_or(0)
            + 1;
        let title = match draft.title.trim() {
            "" => draft.prompt.english.trim().to_string(),
            title => title.to_string(),
        };

        let question = AdminQuestion {
            hunt_id: draft.hunt_id,
            title,
            question: Question {
                id: new_id(),
                sequence,
                kind,
                prompt: draft.prompt,
                correct_answer: draft.correct_answer,
                media: draft.media,
                location: draft.location,
                points: draft.points.unwrap_or(10),
            },
        };
        tracing::info!(
            "Question {} added to hunt {}",
            question.question.sequence,
            question.hunt_id
        );
        self.questions.push(question.clone());
        Ok(question)
    }

    pub fn delete_question(&mut self, question_id: &str) -> Result<AdminQuestion, WorkspaceError> {
        let index = self
            .questions
            .iter()
            .position(|q| q.question.id == question_id)
            .ok_or_else(|| WorkspaceError::not_found("Question", question_id))?;
        Ok(self.questions.remove(index))
    }

    pub fn questions_for_hunt(&self, hunt_id: &str) -> Vec<AdminQuestion> {
        self.questions
            .iter()
            .filter(|q| q.hunt_id == hunt_id)
            .cloned()
            .collect()
    }

    // =========================================================================
    // Advertisements
    // =========================================================================

    pub fn add_advertisement(
        &mut self,
        draft: AdvertisementDraft,
    ) -> Result<Advertisement, WorkspaceError> {
        self.require_hunt(&draft.hunt_id)?;
        let ad = Advertisement {
            id: new_id(),
            hunt_id: draft.hunt_id,
            statement: required(&draft.statement, "Statement")?,
            ad_type: draft.ad_type,
            content: required(&draft.content, "Content")?,
            media_url: draft
                .media_url
                .map(|u| u.trim().to_string())
                .filter(|u| !u.is_empty()),
            placement: draft.placement,
            question_number: draft.question_number,
            is_active: draft.is_active,
        };
        tracing::info!("Advertisement added to hunt {}", ad.hunt_id);
        self.advertisements.push(ad.clone());
        Ok(ad)
    }

    pub fn delete_advertisement(&mut self, ad_id: &str) -> Result<Advertisement, WorkspaceError> {
        let index = self
            .advertisements
            .iter()
            .position(|a| a.id == ad_id)
            .ok_or_else(|| WorkspaceError::not_found("Advertisement", ad_id))?;
        Ok(self.advertisements.remove(index))
    }

    // =========================================================================
    // Read access
    // =========================================================================

    pub fn clients(&self) -> &[Client] {
        &self.clients
    }

    pub fn customers(&self) -> &[Customer] {
        &self.customers
    }

    pub fn credentials(&self) -> &[AccessCredential] {
        &self.credentials
    }

    pub fn invoices(&self) -> &[Invoice] {
        &self.invoices
    }

    pub fn invoice(&self, invoice_id: &str) -> Option<&Invoice> {
        self.invoices.iter().find(|i| i.id == invoice_id)
    }

    pub fn advertisements(&self) -> &[Advertisement] {
        &self.advertisements
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }
}
