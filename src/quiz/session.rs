use serde::{Deserialize, Serialize};

use super::catalog::QuestionCatalog;
use super::{drawing, score, QuizError};
use crate::types::{Language, QuestionKind, RenderedQuestion, Screen, SessionId};

/// Number of digits in the sign-in verification code
pub const CODE_LENGTH: usize = 5;

/// Check the email shape required to unlock the code input
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.find('.') {
        Some(_) => !domain.starts_with('.') && !domain.ends_with('.'),
        None => false,
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Identity {
    pub email: String,
    pub country: Option<String>,
    /// One entry per digit; empty string means not filled in yet
    pub code: [String; CODE_LENGTH],
    pub show_code_input: bool,
}

impl Identity {
    fn code_complete(&self) -> bool {
        self.code.iter().all(|d| !d.is_empty())
    }
}

/// Per-question input that has not been committed yet
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AnswerDraft {
    pub selected_option: Option<String>,
    pub text: String,
    pub drawing: Option<String>,
}

impl AnswerDraft {
    /// The answer this draft would commit for a question of `kind`, if valid
    fn answer_for(&self, kind: &QuestionKind) -> Option<String> {
        match kind {
            QuestionKind::MultipleChoice { .. } => self
                .selected_option
                .clone()
                .filter(|option| !option.is_empty()),
            QuestionKind::TextInput => {
                (!self.text.trim().is_empty()).then(|| self.text.clone())
            }
            QuestionKind::Canvas => self.drawing.clone().filter(|d| !d.is_empty()),
        }
    }

    /// Draft that re-selects a previously recorded answer
    fn prefilled(kind: &QuestionKind, answer: &str) -> Self {
        match kind {
            QuestionKind::MultipleChoice { .. } => Self {
                selected_option: Some(answer.to_string()),
                ..Default::default()
            },
            QuestionKind::TextInput => Self {
                text: answer.to_string(),
                ..Default::default()
            },
            QuestionKind::Canvas => Self {
                drawing: Some(answer.to_string()),
                ..Default::default()
            },
        }
    }
}

/// Outcome of a successful "Next"
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the question at this index
    Question(usize),
    /// Last question answered; the session is on the results screen
    Completed { score: u32 },
}

/// Everything a client needs to render the session
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionView {
    pub session_id: SessionId,
    pub screen: Screen,
    pub identity: Identity,
    pub language: Language,
    pub can_continue: bool,
    pub cursor: usize,
    pub question_count: usize,
    pub question: Option<RenderedQuestion>,
    pub draft: AnswerDraft,
    pub can_advance: bool,
    pub is_last_question: bool,
    pub timer: u32,
    pub answers: Vec<Option<String>>,
    pub score: Option<u32>,
}

/// One participant's pass through the quiz
#[derive(Debug, Clone)]
pub struct QuizSession {
    pub id: SessionId,
    screen: Screen,
    identity: Identity,
    language: Language,
    cursor: usize,
    answers: Vec<Option<String>>,
    timer: u32,
    countdown_start: u32,
    draft: AnswerDraft,
    score: Option<u32>,
    completed_at: Option<String>,
}

impl QuizSession {
    pub fn new(id: SessionId, countdown_seconds: u32) -> Self {
        Self {
            id,
            screen: Screen::SignIn,
            identity: Identity::default(),
            language: Language::default(),
            cursor: 0,
            answers: Vec::new(),
            timer: countdown_seconds,
            countdown_start: countdown_seconds,
            draft: AnswerDraft::default(),
            score: None,
            completed_at: None,
        }
    }

    pub fn screen(&self) -> Screen {
        self.screen
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn answers(&self) -> &[Option<String>] {
        &self.answers
    }

    pub fn timer(&self) -> u32 {
        self.timer
    }

    pub fn draft(&self) -> &AnswerDraft {
        &self.draft
    }

    pub fn score(&self) -> Option<u32> {
        self.score
    }

    pub fn completed_at(&self) -> Option<&str> {
        self.completed_at.as_deref()
    }

    /// Cursor clamped to the catalog; `None` when there are no questions
    pub fn current_index(&self, catalog: &QuestionCatalog) -> Option<usize> {
        if catalog.is_empty() {
            None
        } else {
            Some(self.cursor.min(catalog.len() - 1))
        }
    }

    fn require_screen(&self, screen: Screen) -> Result<(), QuizError> {
        if self.screen == screen {
            Ok(())
        } else {
            Err(QuizError::WrongScreen(self.screen))
        }
    }

    // =========================================================================
    // Sign-in
    // =========================================================================

    pub fn set_email(&mut self, email: String) -> Result<(), QuizError> {
        self.require_screen(Screen::SignIn)?;
        self.identity.show_code_input = is_valid_email(email.trim());
        self.identity.email = email;
        Ok(())
    }

    pub fn set_country(&mut self, country: Option<String>) -> Result<(), QuizError> {
        self.require_screen(Screen::SignIn)?;
        self.identity.country = country
            .map(|c| c.trim().to_string())
            .filter(|c| !c.is_empty());
        Ok(())
    }

    /// Set one code position to "" (clear) or a single ASCII digit
    pub fn set_code_digit(&mut self, index: usize, value: &str) -> Result<(), QuizError> {
        self.require_screen(Screen::SignIn)?;
        if index >= CODE_LENGTH {
            return Err(QuizError::CodeIndexOutOfRange(index));
        }
        let valid = value.is_empty() || (value.len() == 1 && value.chars().all(|c| c.is_ascii_digit()));
        if !valid {
            return Err(QuizError::InvalidCodeDigit);
        }
        self.identity.code[index] = value.to_string();
        Ok(())
    }

    /// Language only changes how text is rendered, so it is allowed on any screen
    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn can_continue_sign_in(&self) -> bool {
        is_valid_email(self.identity.email.trim()) && self.identity.code_complete()
    }

    pub fn continue_from_sign_in(&mut self) -> Result<Screen, QuizError> {
        self.require_screen(Screen::SignIn)?;
        if !self.can_continue_sign_in() {
            return Err(QuizError::SignInIncomplete);
        }
        self.screen = Screen::Location;
        Ok(self.screen)
    }

    pub fn continue_from_location(&mut self, catalog: &QuestionCatalog) -> Result<Screen, QuizError> {
        self.require_screen(Screen::Location)?;
        self.screen = match self.current_index(catalog) {
            Some(index) => {
                self.cursor = index;
                Screen::Quiz
            }
            None => Screen::Error,
        };
        Ok(self.screen)
    }

    // =========================================================================
    // Answer capture
    // =========================================================================

    fn current_kind<'c>(&self, catalog: &'c QuestionCatalog) -> Result<&'c QuestionKind, QuizError> {
        self.require_screen(Screen::Quiz)?;
        let index = self
            .current_index(catalog)
            .ok_or(QuizError::NoCurrentQuestion)?;
        catalog
            .get(index)
            .map(|q| &q.kind)
            .ok_or(QuizError::NoCurrentQuestion)
    }

    pub fn select_option(&mut self, catalog: &QuestionCatalog, option: String) -> Result<(), QuizError> {
        let kind = self.current_kind(catalog)?;
        let QuestionKind::MultipleChoice { options } = kind else {
            return Err(QuizError::WrongQuestionKind {
                expected: "multiple-choice",
                actual: kind.tag(),
            });
        };

        // Accept the option as rendered in any language
        let known = options
            .iter()
            .any(|bundle| bundle.all_texts().any(|text| text == option));
        if !known {
            return Err(QuizError::UnknownOption(option));
        }

        self.draft.selected_option = Some(option);
        Ok(())
    }

    pub fn type_answer(&mut self, catalog: &QuestionCatalog, text: String) -> Result<(), QuizError> {
        let kind = self.current_kind(catalog)?;
        if *kind != QuestionKind::TextInput {
            return Err(QuizError::WrongQuestionKind {
                expected: "text-input",
                actual: kind.tag(),
            });
        }
        self.draft.text = text;
        Ok(())
    }

    pub fn submit_drawing(&mut self, catalog: &QuestionCatalog, data_uri: String) -> Result<(), QuizError> {
        let kind = self.current_kind(catalog)?;
        if *kind != QuestionKind::Canvas {
            return Err(QuizError::WrongQuestionKind {
                expected: "canvas",
                actual: kind.tag(),
            });
        }
        drawing::validate_data_uri(&data_uri)?;
        self.draft.drawing = Some(data_uri);
        Ok(())
    }

    pub fn clear_drawing(&mut self, catalog: &QuestionCatalog) -> Result<(), QuizError> {
        self.current_kind(catalog)?;
        self.draft.drawing = None;
        Ok(())
    }

    /// Whether "Next" is enabled for the current question
    pub fn can_advance(&self, catalog: &QuestionCatalog) -> bool {
        match self.current_kind(catalog) {
            Ok(kind) => self.draft.answer_for(kind).is_some(),
            Err(_) => false,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Record the draft answer and move to the next question or the results
    pub fn next(&mut self, catalog: &QuestionCatalog) -> Result<Advance, QuizError> {
        let kind = self.current_kind(catalog)?;
        let answer = self
            .draft
            .answer_for(kind)
            .ok_or(QuizError::AnswerMissing)?;
        let index = self
            .current_index(catalog)
            .ok_or(QuizError::NoCurrentQuestion)?;

        if self.answers.len() <= index {
            self.answers.resize(index + 1, None);
        }
        self.answers[index] = Some(answer);
        self.draft = AnswerDraft::default();

        if index + 1 >= catalog.len() {
            let total = score::score_answers(catalog, &self.answers);
            self.cursor = index;
            self.score = Some(total);
            self.completed_at = Some(chrono::Utc::now().to_rfc3339());
            self.screen = Screen::Results;
            Ok(Advance::Completed { score: total })
        } else {
            self.cursor = index + 1;
            Ok(Advance::Question(self.cursor))
        }
    }

    /// Step back one question, or to the location screen from the first one.
    /// The answer recorded for the question being left is kept.
    pub fn back(&mut self, catalog: &QuestionCatalog) -> Result<Screen, QuizError> {
        match self.screen {
            Screen::Quiz => {}
            Screen::Error => {
                self.screen = Screen::Location;
                return Ok(self.screen);
            }
            other => return Err(QuizError::WrongScreen(other)),
        }

        let index = self.current_index(catalog).unwrap_or(0);
        self.draft = AnswerDraft::default();
        if index == 0 {
            self.cursor = 0;
            self.screen = Screen::Location;
            return Ok(self.screen);
        }

        self.cursor = index - 1;
        if let (Some(question), Some(Some(answer))) =
            (catalog.get(self.cursor), self.answers.get(self.cursor))
        {
            self.draft = AnswerDraft::prefilled(&question.kind, answer);
        }
        Ok(self.screen)
    }

    /// Start over from sign-in after viewing the results
    pub fn restart(&mut self) -> Result<Screen, QuizError> {
        self.require_screen(Screen::Results)?;
        self.cursor = 0;
        self.answers.clear();
        self.timer = self.countdown_start;
        self.draft = AnswerDraft::default();
        self.score = None;
        self.completed_at = None;
        self.screen = Screen::SignIn;
        Ok(self.screen)
    }

    /// One countdown step. Returns the remaining seconds, or `None` when the
    /// session is not on the quiz screen.
    pub fn tick(&mut self) -> Option<u32> {
        if self.screen != Screen::Quiz {
            return None;
        }
        self.timer = self.timer.saturating_sub(1);
        Some(self.timer)
    }

    pub fn view(&self, catalog: &QuestionCatalog) -> SessionView {
        let index = self.current_index(catalog);
        let question = match (self.screen, index) {
            (Screen::Quiz, Some(i)) => catalog.get(i).map(|q| q.render(self.language)),
            _ => None,
        };
        let is_last_question = index.is_some_and(|i| i + 1 == catalog.len());

        SessionView {
            session_id: self.id.clone(),
            screen: self.screen,
            identity: self.identity.clone(),
            language: self.language,
            can_continue: match self.screen {
                Screen::SignIn => self.can_continue_sign_in(),
                Screen::Location => true,
                _ => false,
            },
            cursor: index.unwrap_or(0),
            question_count: catalog.len(),
            question,
            draft: self.draft.clone(),
            can_advance: self.can_advance(catalog),
            is_last_question,
            timer: self.timer,
            answers: self.answers.clone(),
            score: self.score,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::quiz::drawing::TINY_PNG;
    use crate::types::{Question, TranslationBundle};

    fn question(id: &str, sequence: u32, kind: QuestionKind, correct: &str) -> Question {
        Question {
            id: id.to_string(),
            sequence,
            kind,
            prompt: TranslationBundle::english(format!("Prompt {}", id))
                .with(Language::Dutch, format!("Vraag {}", id)),
            correct_answer: TranslationBundle::english(correct),
            media: None,
            location: None,
            points: 10,
        }
    }

    fn catalog() -> QuestionCatalog {
        QuestionCatalog::new(vec![
            question(
                "mc",
                1,
                QuestionKind::MultipleChoice {
                    options: vec![
                        TranslationBundle::english("Paris").with(Language::Dutch, "Parijs"),
                        TranslationBundle::english("London"),
                    ],
                },
                "Paris",
            ),
            question("text", 2, QuestionKind::TextInput, "New Amsterdam"),
            question("draw", 3, QuestionKind::Canvas, "Bridge"),
        ])
        .unwrap()
    }

    fn signed_in(catalog: &QuestionCatalog) -> QuizSession {
        let mut session = QuizSession::new("s1".to_string(), 600);
        session.set_email("a@b.com".to_string()).unwrap();
        for i in 0..CODE_LENGTH {
            session.set_code_digit(i, "7").unwrap();
        }
        session.continue_from_sign_in().unwrap();
        session.continue_from_location(catalog).unwrap();
        session
    }

    #[test]
    fn test_email_validation() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("@b.com"));
        assert!(!is_valid_email("a@.com"));
        assert!(!is_valid_email("a@b.com."));
        assert!(!is_valid_email("a@@b.com"));
        assert!(!is_valid_email("a b@c.com"));
    }

    #[test]
    fn test_email_toggles_code_input() {
        let mut session = QuizSession::new("s".to_string(), 600);
        session.set_email("a@b".to_string()).unwrap();
        assert!(!session.identity().show_code_input);
        session.set_email("a@b.com".to_string()).unwrap();
        assert!(session.identity().show_code_input);
        session.set_email("nope".to_string()).unwrap();
        assert!(!session.identity().show_code_input);
    }

    #[test]
    fn test_sign_in_requires_email_and_full_code() {
        let mut session = QuizSession::new("s".to_string(), 600);
        session.set_email("a@b.com".to_string()).unwrap();
        for i in 0..CODE_LENGTH - 1 {
            session.set_code_digit(i, "1").unwrap();
        }
        assert!(!session.can_continue_sign_in());
        assert_eq!(
            session.continue_from_sign_in(),
            Err(QuizError::SignInIncomplete)
        );
        assert_eq!(session.screen(), Screen::SignIn);

        session.set_code_digit(CODE_LENGTH - 1, "9").unwrap();
        assert!(session.can_continue_sign_in());
        assert_eq!(session.continue_from_sign_in(), Ok(Screen::Location));
    }

    #[test]
    fn test_code_digit_rejects_non_digits() {
        let mut session = QuizSession::new("s".to_string(), 600);
        session.set_code_digit(0, "4").unwrap();

        assert_eq!(session.set_code_digit(0, "x"), Err(QuizError::InvalidCodeDigit));
        assert_eq!(session.set_code_digit(0, "12"), Err(QuizError::InvalidCodeDigit));
        assert_eq!(
            session.set_code_digit(CODE_LENGTH, "1"),
            Err(QuizError::CodeIndexOutOfRange(CODE_LENGTH))
        );
        // Rejected edits leave the code untouched
        assert_eq!(session.identity().code[0], "4");

        session.set_code_digit(0, "").unwrap();
        assert_eq!(session.identity().code[0], "");
    }

    #[test]
    fn test_next_disabled_until_answer_present() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);

        assert!(!session.can_advance(&catalog));
        assert_eq!(session.next(&catalog), Err(QuizError::AnswerMissing));

        session.select_option(&catalog, "Paris".to_string()).unwrap();
        assert!(session.can_advance(&catalog));
        assert_eq!(session.next(&catalog), Ok(Advance::Question(1)));

        // Whitespace-only text does not count
        session.type_answer(&catalog, "   ".to_string()).unwrap();
        assert!(!session.can_advance(&catalog));
        session.type_answer(&catalog, "New Amsterdam".to_string()).unwrap();
        assert!(session.can_advance(&catalog));
        session.type_answer(&catalog, String::new()).unwrap();
        assert!(!session.can_advance(&catalog));
    }

    #[test]
    fn test_select_option_accepts_translated_text_only_from_options() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.set_language(Language::Dutch);

        session.select_option(&catalog, "Parijs".to_string()).unwrap();
        assert_eq!(
            session.select_option(&catalog, "Rome".to_string()),
            Err(QuizError::UnknownOption("Rome".to_string()))
        );
        assert_eq!(session.draft().selected_option.as_deref(), Some("Parijs"));
    }

    #[test]
    fn test_answer_kind_must_match_question() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        let result = session.type_answer(&catalog, "Paris".to_string());
        assert_eq!(
            result,
            Err(QuizError::WrongQuestionKind {
                expected: "text-input",
                actual: "multiple-choice"
            })
        );
    }

    #[test]
    fn test_canvas_requires_drawing() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.select_option(&catalog, "Paris".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.type_answer(&catalog, "New Amsterdam".to_string()).unwrap();
        session.next(&catalog).unwrap();

        assert!(!session.can_advance(&catalog));
        assert_eq!(
            session.submit_drawing(&catalog, "not an image".to_string()),
            Err(QuizError::InvalidDrawing)
        );
        session.submit_drawing(&catalog, TINY_PNG.to_string()).unwrap();
        assert!(session.can_advance(&catalog));
        session.clear_drawing(&catalog).unwrap();
        assert!(!session.can_advance(&catalog));
    }

    #[test]
    fn test_full_pass_records_every_answer_and_scores() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);

        session.select_option(&catalog, "Paris".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.type_answer(&catalog, " new amsterdam ".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.submit_drawing(&catalog, TINY_PNG.to_string()).unwrap();

        let result = session.next(&catalog).unwrap();
        assert_eq!(result, Advance::Completed { score: 20 });
        assert_eq!(session.screen(), Screen::Results);
        assert_eq!(session.answers().len(), catalog.len());
        assert_eq!(session.answers()[0].as_deref(), Some("Paris"));
        assert_eq!(session.answers()[1].as_deref(), Some(" new amsterdam "));
        assert!(session.completed_at().is_some());
    }

    #[test]
    fn test_draft_cleared_on_advance() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.select_option(&catalog, "London".to_string()).unwrap();
        session.next(&catalog).unwrap();
        assert_eq!(session.draft(), &AnswerDraft::default());
    }

    #[test]
    fn test_back_keeps_recorded_answer_and_prefills() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.select_option(&catalog, "London".to_string()).unwrap();
        session.next(&catalog).unwrap();

        assert_eq!(session.back(&catalog), Ok(Screen::Quiz));
        assert_eq!(session.current_index(&catalog), Some(0));
        assert_eq!(session.answers()[0].as_deref(), Some("London"));
        assert_eq!(session.draft().selected_option.as_deref(), Some("London"));
        assert!(session.can_advance(&catalog));

        // Back from the first question leaves the quiz screen
        assert_eq!(session.back(&catalog), Ok(Screen::Location));
        assert_eq!(session.answers()[0].as_deref(), Some("London"));
    }

    #[test]
    fn test_cursor_clamped_when_catalog_shrinks() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.select_option(&catalog, "Paris".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.type_answer(&catalog, "x".to_string()).unwrap();
        session.next(&catalog).unwrap();
        assert_eq!(session.current_index(&catalog), Some(2));

        // A smaller catalog (e.g. after a reload) never yields an out-of-range index
        let smaller = QuestionCatalog::new(catalog.questions()[..1].to_vec()).unwrap();
        assert_eq!(session.current_index(&smaller), Some(0));
        let view = session.view(&smaller);
        assert_eq!(view.cursor, 0);
        assert_eq!(view.question.unwrap().id, "mc");
    }

    #[test]
    fn test_empty_catalog_goes_to_error_screen() {
        let empty = QuestionCatalog::default();
        let mut session = QuizSession::new("s".to_string(), 600);
        session.set_email("a@b.com".to_string()).unwrap();
        for i in 0..CODE_LENGTH {
            session.set_code_digit(i, "0").unwrap();
        }
        session.continue_from_sign_in().unwrap();

        assert_eq!(session.continue_from_location(&empty), Ok(Screen::Error));
        assert!(session.view(&empty).question.is_none());
        assert_eq!(session.back(&empty), Ok(Screen::Location));
    }

    #[test]
    fn test_restart_resets_progress() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.tick();
        session.tick();
        session.select_option(&catalog, "Paris".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.type_answer(&catalog, "x".to_string()).unwrap();
        session.next(&catalog).unwrap();
        session.submit_drawing(&catalog, TINY_PNG.to_string()).unwrap();
        session.next(&catalog).unwrap();

        assert_eq!(session.restart(), Ok(Screen::SignIn));
        assert_eq!(session.current_index(&catalog), Some(0));
        assert!(session.answers().is_empty());
        assert_eq!(session.timer(), 600);
        assert_eq!(session.score(), None);
        // Identity survives a restart
        assert_eq!(session.identity().email, "a@b.com");
    }

    #[test]
    fn test_restart_only_from_results() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        assert_eq!(session.restart(), Err(QuizError::WrongScreen(Screen::Quiz)));
    }

    #[test]
    fn test_tick_floors_at_zero_and_only_on_quiz_screen() {
        let catalog = catalog();
        let mut session = QuizSession::new("s".to_string(), 2);
        assert_eq!(session.tick(), None);
        assert_eq!(session.timer(), 2);

        session.set_email("a@b.com".to_string()).unwrap();
        for i in 0..CODE_LENGTH {
            session.set_code_digit(i, "3").unwrap();
        }
        session.continue_from_sign_in().unwrap();
        session.continue_from_location(&catalog).unwrap();

        assert_eq!(session.tick(), Some(1));
        assert_eq!(session.tick(), Some(0));
        assert_eq!(session.tick(), Some(0));
    }

    #[test]
    fn test_view_renders_in_session_language() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        session.set_language(Language::Dutch);

        let view = session.view(&catalog);
        assert_eq!(view.screen, Screen::Quiz);
        let question = view.question.unwrap();
        assert_eq!(question.prompt, "Vraag mc");
        assert_eq!(question.options, vec!["Parijs", "London"]);
        assert!(!view.is_last_question);
        assert_eq!(view.question_count, 3);
    }

    #[test]
    fn test_identity_edits_only_on_sign_in() {
        let catalog = catalog();
        let mut session = signed_in(&catalog);
        assert_eq!(
            session.set_email("x@y.com".to_string()),
            Err(QuizError::WrongScreen(Screen::Quiz))
        );
    }
}
