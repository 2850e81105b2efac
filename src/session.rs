//! A logged-in player and their personal best.

use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::account::{Email, ScoreStore};

/// Identity handed to the game after login, plus the best score known for it.
///
/// The local max score is authoritative for the running process; writes to
/// the store are best effort.
pub struct PlayerSession {
    email: Email,
    max_score: u32,
    store: Arc<dyn ScoreStore>,
}

/// What [`PlayerSession::finish_game`] did with a final score
pub struct GameOverReport {
    pub final_score: u32,
    pub new_best: bool,
    /// Pending store write, present only for a new best
    pub write: Option<JoinHandle<()>>,
}

impl PlayerSession {
    /// Read the stored max score for `email`; an absent record or a failed
    /// read both start from zero.
    pub async fn start(store: Arc<dyn ScoreStore>, email: Email) -> Self {
        let max_score = match store.find_user(&email).await {
            Ok(Some(record)) => record.max_score,
            Ok(None) => 0,
            Err(err) => {
                warn!(email = %email, error = %err, "could not read max score, starting from 0");
                0
            }
        };
        info!(email = %email, max_score, "session started");

        Self {
            email,
            max_score,
            store,
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn max_score(&self) -> u32 {
        self.max_score
    }

    /// Record the score of a game that just ended.
    ///
    /// A score above the current best raises it locally and spawns a
    /// detached write to the store. Must be called inside a tokio runtime.
    pub fn finish_game(&mut self, final_score: u32) -> GameOverReport {
        info!(email = %self.email, final_score, max_score = self.max_score, "game over");

        if final_score <= self.max_score {
            return GameOverReport {
                final_score,
                new_best: false,
                write: None,
            };
        }

        self.max_score = final_score;
        let store = Arc::clone(&self.store);
        let email = self.email.clone();
        let write = tokio::spawn(async move {
            match store.update_max_score(&email, final_score).await {
                Ok(()) => info!(email = %email, max_score = final_score, "new max score saved"),
                Err(err) => warn!(email = %email, error = %err, "failed to save max score"),
            }
        });

        GameOverReport {
            final_score,
            new_best: true,
            write: Some(write),
        }
    }
}
