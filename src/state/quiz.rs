use super::{AppState, CountdownHandle};
use crate::protocol::ServerMessage;
use crate::quiz::{score, Advance, QuestionCatalog, QuizError, QuizSession, SessionView};
use crate::types::*;

impl AppState {
    /// Create a participant session on the sign-in screen
    pub async fn start_session(&self) -> SessionView {
        let session = QuizSession::new(new_id(), self.quiz_config.countdown_seconds);
        let catalog = self.catalog.read().await;
        let view = session.view(&catalog);

        tracing::info!("Quiz session started: {}", session.id);
        self.sessions
            .write()
            .await
            .insert(session.id.clone(), session);
        view
    }

    pub async fn session_view(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let catalog = self.catalog.read().await;
        let sessions = self.sessions.read().await;
        sessions
            .get(session_id)
            .map(|s| s.view(&catalog))
            .ok_or(QuizError::SessionNotFound)
    }

    /// Apply one operation to a session, then start or release its countdown
    /// to match the screen it ended up on
    async fn with_session<T>(
        &self,
        session_id: &str,
        op: impl FnOnce(&mut QuizSession, &QuestionCatalog) -> Result<T, QuizError>,
    ) -> Result<(T, SessionView), QuizError> {
        let (result, view) = {
            let catalog = self.catalog.read().await;
            let mut sessions = self.sessions.write().await;
            let session = sessions
                .get_mut(session_id)
                .ok_or(QuizError::SessionNotFound)?;
            let result = op(session, &catalog)?;
            (result, session.view(&catalog))
        };

        self.sync_countdown(session_id, view.screen).await;
        Ok((result, view))
    }

    async fn sync_countdown(&self, session_id: &str, screen: Screen) {
        let mut countdowns = self.countdowns.lock().await;
        if screen == Screen::Quiz {
            if !countdowns.contains_key(session_id) {
                tracing::debug!("Countdown acquired for session {}", session_id);
                let handle = CountdownHandle::start(
                    session_id.to_string(),
                    self.sessions.clone(),
                    self.participant_broadcast.clone(),
                    self.quiz_config.tick,
                );
                countdowns.insert(session_id.to_string(), handle);
            }
        } else if countdowns.remove(session_id).is_some() {
            tracing::debug!("Countdown released for session {}", session_id);
        }
    }

    /// Whether a countdown handle is held for the session
    pub async fn has_countdown(&self, session_id: &str) -> bool {
        self.countdowns.lock().await.contains_key(session_id)
    }

    pub async fn set_email(&self, session_id: &str, email: String) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, _| s.set_email(email))
            .await?
            .1)
    }

    pub async fn set_country(
        &self,
        session_id: &str,
        country: Option<String>,
    ) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, _| s.set_country(country))
            .await?
            .1)
    }

    pub async fn set_code_digit(
        &self,
        session_id: &str,
        index: usize,
        value: &str,
    ) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, _| s.set_code_digit(index, value))
            .await?
            .1)
    }

    pub async fn set_language(&self, session_id: &str, language: Language) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, _| {
                s.set_language(language);
                Ok(())
            })
            .await?
            .1)
    }

    pub async fn continue_sign_in(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let (screen, view) = self
            .with_session(session_id, |s, _| s.continue_from_sign_in())
            .await?;
        tracing::info!("Session {} -> {:?}", session_id, screen);
        Ok(view)
    }

    pub async fn continue_location(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let (screen, view) = self
            .with_session(session_id, |s, catalog| s.continue_from_location(catalog))
            .await?;
        if screen == Screen::Error {
            tracing::warn!("Session {} has no question to show", session_id);
        } else {
            tracing::info!("Session {} -> {:?}", session_id, screen);
        }
        Ok(view)
    }

    pub async fn select_option(&self, session_id: &str, option: String) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, catalog| s.select_option(catalog, option))
            .await?
            .1)
    }

    pub async fn type_answer(&self, session_id: &str, text: String) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, catalog| s.type_answer(catalog, text))
            .await?
            .1)
    }

    pub async fn submit_drawing(&self, session_id: &str, data_uri: String) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, catalog| s.submit_drawing(catalog, data_uri))
            .await?
            .1)
    }

    pub async fn clear_drawing(&self, session_id: &str) -> Result<SessionView, QuizError> {
        Ok(self
            .with_session(session_id, |s, catalog| s.clear_drawing(catalog))
            .await?
            .1)
    }

    /// Record the current answer and advance; completion refreshes the leaderboard
    pub async fn next_question(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let (advance, view) = self
            .with_session(session_id, |s, catalog| s.next(catalog))
            .await?;

        match advance {
            Advance::Question(index) => {
                tracing::info!("Session {} -> question {}", session_id, index);
            }
            Advance::Completed { score } => {
                tracing::info!("Session {} completed with {} points", session_id, score);
                let entries = self.leaderboard().await;
                self.broadcast_to_participants(ServerMessage::Leaderboard { entries });
            }
        }
        Ok(view)
    }

    pub async fn back(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let (screen, view) = self
            .with_session(session_id, |s, catalog| s.back(catalog))
            .await?;
        tracing::info!("Session {} back -> {:?} {}", session_id, screen, view.cursor);
        Ok(view)
    }

    /// Back to sign-in; the completed run stays on the leaderboard
    pub async fn restart(&self, session_id: &str) -> Result<SessionView, QuizError> {
        let (completed, view) = self
            .with_session(session_id, |s, _| {
                let completed = s.clone();
                s.restart().map(|_| completed)
            })
            .await?;
        self.finished.write().await.push(completed);
        tracing::info!("Session {} restarted", session_id);
        Ok(view)
    }

    /// Remove a session and release its countdown. A completed session keeps
    /// its leaderboard entry.
    pub async fn end_session(&self, session_id: &str) -> Result<(), QuizError> {
        self.countdowns.lock().await.remove(session_id);
        let session = self
            .sessions
            .write()
            .await
            .remove(session_id)
            .ok_or(QuizError::SessionNotFound)?;
        if session.score().is_some() {
            self.finished.write().await.push(session);
        }
        tracing::info!("Quiz session ended: {}", session_id);
        Ok(())
    }

    pub async fn has_session(&self, session_id: &str) -> bool {
        self.sessions.read().await.contains_key(session_id)
    }

    pub async fn leaderboard(&self) -> Vec<LeaderboardEntry> {
        let sessions = self.sessions.read().await;
        let finished = self.finished.read().await;
        score::leaderboard(sessions.values().chain(finished.iter()))
    }
}
