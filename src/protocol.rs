use crate::admin::{
    AdvertisementDraft, Approval, DashboardStats, HuntDeletion, InvoiceDraftUpdate,
    NewParticipant, QuestionDraft, WorkspaceError, WorkspaceSnapshot,
};
use crate::quiz::{QuizError, SessionView};
use crate::translate::TranslationOutcome;
use crate::types::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ClientMessage {
    // Participant quiz flow
    StartSession,
    GetSession {
        session_id: SessionId,
    },
    SetEmail {
        session_id: SessionId,
        email: String,
    },
    SetCountry {
        session_id: SessionId,
        #[serde(default)]
        country: Option<String>,
    },
    SetCodeDigit {
        session_id: SessionId,
        index: usize,
        value: String,
    },
    SetLanguage {
        session_id: SessionId,
        language: Language,
    },
    ContinueSignIn {
        session_id: SessionId,
    },
    ContinueLocation {
        session_id: SessionId,
    },
    SelectOption {
        session_id: SessionId,
        option: String,
    },
    TypeAnswer {
        session_id: SessionId,
        text: String,
    },
    SubmitDrawing {
        session_id: SessionId,
        data_uri: String,
    },
    ClearDrawing {
        session_id: SessionId,
    },
    Next {
        session_id: SessionId,
    },
    Back {
        session_id: SessionId,
    },
    Restart {
        session_id: SessionId,
    },
    EndSession {
        session_id: SessionId,
    },
    GetLeaderboard,

    // Admin-only messages
    AdminGetWorkspace,
    AdminGetDashboard,
    AdminCreateHunt {
        title: String,
        group_names: Vec<String>,
    },
    AdminDeleteHunt {
        hunt_id: HuntId,
    },
    AdminListHunts {
        #[serde(default)]
        search: String,
    },
    AdminShareLink {
        hunt_id: HuntId,
    },
    AdminAddParticipant {
        participant: NewParticipant,
    },
    AdminDeleteParticipant {
        participant_id: ParticipantId,
    },
    AdminResetPoints {
        hunt_id: HuntId,
    },
    AdminTranslate {
        text: String,
    },
    AdminAddQuestion {
        question: QuestionDraft,
    },
    AdminDeleteQuestion {
        question_id: QuestionId,
    },
    AdminAddAdvertisement {
        advertisement: AdvertisementDraft,
    },
    AdminDeleteAdvertisement {
        advertisement_id: AdvertisementId,
    },
    AdminSelectInvoiceClient {
        client_id: ClientId,
    },
    AdminSelectInvoiceHunt {
        hunt_id: HuntId,
        contact_name: String,
        contact_email: String,
    },
    AdminUpdateInvoiceDraft {
        update: InvoiceDraftUpdate,
    },
    AdminAddLineItem {
        service_product: String,
        description: String,
        amount: f64,
    },
    AdminRemoveLineItem {
        item_id: LineItemId,
    },
    AdminResetInvoiceDraft,
    AdminCreateInvoice,
    AdminMarkReceived {
        invoice_id: InvoiceId,
    },
    AdminApproveInvoice {
        invoice_id: InvoiceId,
    },
    AdminRejectInvoice {
        invoice_id: InvoiceId,
    },
    AdminVoidInvoice {
        invoice_id: InvoiceId,
    },
    AdminDeleteInvoice {
        invoice_id: InvoiceId,
    },
}

impl ClientMessage {
    /// The quiz session a participant message targets
    pub fn session_id(&self) -> Option<&SessionId> {
        match self {
            ClientMessage::GetSession { session_id }
            | ClientMessage::SetEmail { session_id, .. }
            | ClientMessage::SetCountry { session_id, .. }
            | ClientMessage::SetCodeDigit { session_id, .. }
            | ClientMessage::SetLanguage { session_id, .. }
            | ClientMessage::ContinueSignIn { session_id }
            | ClientMessage::ContinueLocation { session_id }
            | ClientMessage::SelectOption { session_id, .. }
            | ClientMessage::TypeAnswer { session_id, .. }
            | ClientMessage::SubmitDrawing { session_id, .. }
            | ClientMessage::ClearDrawing { session_id }
            | ClientMessage::Next { session_id }
            | ClientMessage::Back { session_id }
            | ClientMessage::Restart { session_id }
            | ClientMessage::EndSession { session_id } => Some(session_id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "t", rename_all = "snake_case")]
pub enum ServerMessage {
    Welcome {
        protocol: String,
        role: Role,
        server_now: String,
        translation_available: bool,
    },

    // Participant
    Session {
        view: SessionView,
    },
    SessionEnded {
        session_id: SessionId,
    },
    Timer {
        session_id: SessionId,
        remaining: u32,
    },
    Leaderboard {
        entries: Vec<LeaderboardEntry>,
    },

    // Admin
    Workspace {
        snapshot: WorkspaceSnapshot,
    },
    Dashboard {
        stats: DashboardStats,
    },
    Hunts {
        hunts: Vec<ScavengerHunt>,
    },
    HuntCreated {
        hunt: ScavengerHunt,
    },
    HuntDeleted {
        deletion: HuntDeletion,
    },
    ShareLink {
        hunt_id: HuntId,
        web_link: String,
    },
    ParticipantAdded {
        participant: Participant,
    },
    ParticipantDeleted {
        participant_id: ParticipantId,
    },
    PointsReset {
        hunt_id: HuntId,
        count: usize,
    },
    Translation {
        outcome: TranslationOutcome,
    },
    QuestionAdded {
        question: AdminQuestion,
    },
    QuestionDeleted {
        question_id: QuestionId,
    },
    AdvertisementAdded {
        advertisement: Advertisement,
    },
    AdvertisementDeleted {
        advertisement_id: AdvertisementId,
    },
    InvoiceDraft {
        draft: InvoiceDraft,
    },
    InvoiceCreated {
        invoice: Invoice,
    },
    InvoiceUpdated {
        invoice: Invoice,
    },
    InvoiceApproved {
        approval: Approval,
    },
    InvoiceDeleted {
        invoice_id: InvoiceId,
    },

    Error {
        code: String,
        msg: String,
    },
}

impl From<QuizError> for ServerMessage {
    fn from(e: QuizError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}

impl From<WorkspaceError> for ServerMessage {
    fn from(e: WorkspaceError) -> Self {
        ServerMessage::Error {
            code: e.code().to_string(),
            msg: e.to_string(),
        }
    }
}
