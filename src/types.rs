use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque ID types for type safety
pub type SessionId = String;
pub type QuestionId = String;
pub type HuntId = String;
pub type ParticipantId = String;
pub type AdvertisementId = String;
pub type ClientId = String;
pub type CustomerId = String;
pub type InvoiceId = String;
pub type LineItemId = String;

pub fn new_id() -> String {
    ulid::Ulid::new().to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Participant,
    Admin,
}

// ========== Languages ==========

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    English,
    Spanish,
    Papiamentu,
    Dutch,
}

impl Language {
    pub const ALL: [Language; 4] = [
        Language::English,
        Language::Spanish,
        Language::Papiamentu,
        Language::Dutch,
    ];

    /// Name of the language in that language, for the picker
    pub fn native_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Spanish => "Español",
            Language::Papiamentu => "Papiamentu",
            Language::Dutch => "Nederlands",
        }
    }
}

/// One string in every supported language. English is mandatory and is the
/// fallback for any missing or blank entry.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct TranslationBundle {
    pub english: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spanish: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub papiamentu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dutch: Option<String>,
}

impl TranslationBundle {
    /// Bundle with only the English entry
    pub fn english(text: impl Into<String>) -> Self {
        Self {
            english: text.into(),
            ..Default::default()
        }
    }

    /// Same text in every language (translation fallback)
    pub fn echo(text: &str) -> Self {
        Self {
            english: text.to_string(),
            spanish: Some(text.to_string()),
            papiamentu: Some(text.to_string()),
            dutch: Some(text.to_string()),
        }
    }

    pub fn with(mut self, language: Language, text: impl Into<String>) -> Self {
        let text = text.into();
        match language {
            Language::English => self.english = text,
            Language::Spanish => self.spanish = Some(text),
            Language::Papiamentu => self.papiamentu = Some(text),
            Language::Dutch => self.dutch = Some(text),
        }
        self
    }

    /// Text for `language`, falling back to English
    pub fn text(&self, language: Language) -> &str {
        let entry = match language {
            Language::English => None,
            Language::Spanish => self.spanish.as_deref(),
            Language::Papiamentu => self.papiamentu.as_deref(),
            Language::Dutch => self.dutch.as_deref(),
        };
        match entry {
            Some(text) if !text.trim().is_empty() => text,
            _ => &self.english,
        }
    }

    /// Every language's text, English first
    pub fn all_texts(&self) -> impl Iterator<Item = &str> {
        Language::ALL.into_iter().map(move |lang| self.text(lang))
    }
}

// ========== Quiz ==========

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum QuestionKind {
    MultipleChoice { options: Vec<TranslationBundle> },
    TextInput,
    Canvas,
}

impl QuestionKind {
    pub fn tag(&self) -> &'static str {
        match self {
            QuestionKind::MultipleChoice { .. } => "multiple-choice",
            QuestionKind::TextInput => "text-input",
            QuestionKind::Canvas => "canvas",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Media {
    Image { url: String },
    Video { url: String },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GeoLink {
    pub label: String,
    pub maps_url: String,
}

fn default_points() -> u32 {
    10
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Question {
    pub id: QuestionId,
    pub sequence: u32,
    #[serde(flatten)]
    pub kind: QuestionKind,
    pub prompt: TranslationBundle,
    pub correct_answer: TranslationBundle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLink>,
    #[serde(default = "default_points")]
    pub points: u32,
}

/// A question as the participant sees it, in one language
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RenderedQuestion {
    pub id: QuestionId,
    pub sequence: u32,
    pub kind: String,
    pub prompt: String,
    pub options: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<Media>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<GeoLink>,
}

impl Question {
    pub fn render(&self, language: Language) -> RenderedQuestion {
        let options = match &self.kind {
            QuestionKind::MultipleChoice { options } => options
                .iter()
                .map(|o| o.text(language).to_string())
                .collect(),
            _ => Vec::new(),
        };

        RenderedQuestion {
            id: self.id.clone(),
            sequence: self.sequence,
            kind: self.kind.tag().to_string(),
            prompt: self.prompt.text(language).to_string(),
            options,
            media: self.media.clone(),
            location: self.location.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Screen {
    SignIn,
    Location,
    Quiz,
    Results,
    /// Shown when there is no question to present; only Back is offered
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LeaderboardEntry {
    pub rank: u32,
    pub player: String,
    pub location: String,
    pub points: u32,
    pub avatar: String,
}

// ========== Admin workspace ==========

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScavengerHunt {
    pub id: HuntId,
    pub title: String,
    pub web_link: String,
    pub group_names: Vec<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Participant {
    pub id: ParticipantId,
    pub hunt_id: HuntId,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    #[serde(default)]
    pub phone_number: Option<String>,
    pub points_earned: u32,
}

impl Participant {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A quiz question managed from the admin panel, owned by one hunt
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdminQuestion {
    pub hunt_id: HuntId,
    pub title: String,
    #[serde(flatten)]
    pub question: Question,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Banner,
    Image,
    Video,
    Text,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "kebab-case")]
pub enum AdPlacement {
    BeforeQuestion,
    AfterQuestion,
    BetweenQuestions,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advertisement {
    pub id: AdvertisementId,
    pub hunt_id: HuntId,
    pub statement: String,
    pub ad_type: AdType,
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    pub placement: AdPlacement,
    pub question_number: u32,
    pub is_active: bool,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClientType {
    Member,
    Customer,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub client_type: ClientType,
    pub created_at: String,
}

/// Created once per invoice when it is approved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub id: CustomerId,
    pub name: String,
    pub email: String,
    pub invoice_id: InvoiceId,
    #[serde(default)]
    pub hunt_id: Option<HuntId>,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AccessCredential {
    pub customer_id: CustomerId,
    pub invoice_id: InvoiceId,
    pub access_code: String,
    #[serde(default)]
    pub share_link: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    Unpaid,
    PendingApproval,
    Paid,
    Overdue,
}

/// Who an invoice bills
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum InvoiceSubject {
    Client {
        client_id: ClientId,
        name: String,
        email: String,
        client_type: ClientType,
    },
    Hunt {
        hunt_id: HuntId,
        title: String,
        contact_name: String,
        contact_email: String,
    },
}

impl InvoiceSubject {
    pub fn display_name(&self) -> &str {
        match self {
            InvoiceSubject::Client { name, .. } => name,
            InvoiceSubject::Hunt { contact_name, .. } => contact_name,
        }
    }

    pub fn email(&self) -> &str {
        match self {
            InvoiceSubject::Client { email, .. } => email,
            InvoiceSubject::Hunt { contact_email, .. } => contact_email,
        }
    }

    pub fn hunt_id(&self) -> Option<&HuntId> {
        match self {
            InvoiceSubject::Hunt { hunt_id, .. } => Some(hunt_id),
            InvoiceSubject::Client { .. } => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItem {
    pub id: LineItemId,
    pub service_product: String,
    pub description: String,
    pub amount: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub invoice_number: String,
    pub subject: InvoiceSubject,
    pub status: InvoiceStatus,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub term: String,
    pub billing_address: String,
    pub currency: String,
    pub items: Vec<LineItem>,
    /// Fixed at creation from the line items
    pub balance_due: f64,
    pub remaining_balance: f64,
    /// Set the first time the invoice is approved
    #[serde(default)]
    pub customer_id: Option<CustomerId>,
    pub created_at: String,
}

/// Invoice form in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvoiceDraft {
    pub subject: Option<InvoiceSubject>,
    pub billing_address: String,
    pub term: String,
    pub invoice_date: NaiveDate,
    pub due_date: NaiveDate,
    pub currency: String,
    pub items: Vec<LineItem>,
}

impl InvoiceDraft {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            subject: None,
            billing_address: String::new(),
            term: "2 weeks".to_string(),
            invoice_date: today,
            due_date: today + chrono::Duration::days(30),
            currency: "USD".to_string(),
            items: Vec::new(),
        }
    }

    pub fn total(&self) -> f64 {
        self.items.iter().map(|i| i.amount).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundle_falls_back_to_english() {
        let bundle = TranslationBundle::english("Hello")
            .with(Language::Dutch, "Hallo")
            .with(Language::Spanish, "   ");

        assert_eq!(bundle.text(Language::English), "Hello");
        assert_eq!(bundle.text(Language::Dutch), "Hallo");
        // Blank counts as missing
        assert_eq!(bundle.text(Language::Spanish), "Hello");
        assert_eq!(bundle.text(Language::Papiamentu), "Hello");
    }

    #[test]
    fn test_bundle_deserializes_without_optional_languages() {
        let bundle: TranslationBundle =
            serde_json::from_str(r#"{"english":"Mars","papiamentu":"Mars"}"#).unwrap();
        assert_eq!(bundle.spanish, None);
        assert_eq!(bundle.text(Language::Papiamentu), "Mars");
    }

    #[test]
    fn test_render_multiple_choice_in_language() {
        let question = Question {
            id: "q1".to_string(),
            sequence: 1,
            kind: QuestionKind::MultipleChoice {
                options: vec![
                    TranslationBundle::english("Red").with(Language::Spanish, "Rojo"),
                    TranslationBundle::english("Blue"),
                ],
            },
            prompt: TranslationBundle::english("Pick a color")
                .with(Language::Spanish, "Elige un color"),
            correct_answer: TranslationBundle::english("Red"),
            media: None,
            location: None,
            points: 10,
        };

        let rendered = question.render(Language::Spanish);
        assert_eq!(rendered.kind, "multiple-choice");
        assert_eq!(rendered.prompt, "Elige un color");
        assert_eq!(rendered.options, vec!["Rojo", "Blue"]);
    }

    #[test]
    fn test_question_kind_wire_format() {
        let json = serde_json::to_value(QuestionKind::TextInput).unwrap();
        assert_eq!(json["type"], "text-input");
    }

    #[test]
    fn test_invoice_draft_defaults() {
        let today = NaiveDate::from_ymd_opt(2025, 4, 1).unwrap();
        let draft = InvoiceDraft::new(today);
        assert_eq!(draft.term, "2 weeks");
        assert_eq!(draft.currency, "USD");
        assert_eq!(draft.due_date, NaiveDate::from_ymd_opt(2025, 5, 1).unwrap());
        assert_eq!(draft.total(), 0.0);
    }
}
