use crate::protocol::ServerMessage;
use crate::quiz::QuizSession;
use crate::types::SessionId;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

/// A running per-session countdown. Dropping the handle stops it.
#[derive(Debug)]
pub struct CountdownHandle {
    task: JoinHandle<()>,
}

impl CountdownHandle {
    /// Tick the session's timer once per `tick` while it is on the quiz screen,
    /// pushing each new value as a `Timer` message. Stops on its own at zero or
    /// when the session leaves the quiz screen or disappears.
    pub fn start(
        session_id: SessionId,
        sessions: Arc<RwLock<HashMap<SessionId, QuizSession>>>,
        tx: broadcast::Sender<ServerMessage>,
        tick: Duration,
    ) -> Self {
        let task = tokio::spawn(async move {
            let mut interval = interval_at(Instant::now() + tick, tick);
            loop {
                interval.tick().await;

                let remaining = {
                    let mut sessions = sessions.write().await;
                    match sessions.get_mut(&session_id).and_then(|s| s.tick()) {
                        Some(remaining) => remaining,
                        None => break,
                    }
                };

                let _ = tx.send(ServerMessage::Timer {
                    session_id: session_id.clone(),
                    remaining,
                });

                if remaining == 0 {
                    tracing::info!("Countdown for session {} reached zero", session_id);
                    break;
                }
            }
        });

        Self { task }
    }

    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for CountdownHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
