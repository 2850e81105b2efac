use anyhow::{Context, Result, bail};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::warn;

use crate::account::{LoginError, ScoreStore, UserRecord, login};

/// Resolves the player before the game starts, either from a preset email
/// or by prompting until a login succeeds.
pub struct LoginMode {
    store: Arc<dyn ScoreStore>,
}

impl LoginMode {
    pub fn new(store: Arc<dyn ScoreStore>) -> Self {
        Self { store }
    }

    /// Log in with `preset` if given, else prompt on `input`.
    ///
    /// A failed connectivity check is reported but does not stop the prompt;
    /// the lookup itself will fail with a clearer error if the store is down.
    pub async fn run<R, W>(
        &self,
        preset: Option<&str>,
        input: R,
        mut output: W,
    ) -> Result<UserRecord>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        if let Err(err) = self.store.ping().await {
            warn!(error = %err, "score table connectivity check failed");
            write_line(&mut output, &format!("Could not reach the score table: {err}")).await?;
        }

        if let Some(raw) = preset {
            return login(self.store.as_ref(), raw)
                .await
                .with_context(|| format!("Login failed for '{}'", raw.trim()));
        }

        let mut lines = input.lines();
        loop {
            output
                .write_all(b"Email: ")
                .await
                .context("Failed to write prompt")?;
            output.flush().await.context("Failed to flush prompt")?;

            let Some(line) = lines.next_line().await.context("Failed to read email")? else {
                bail!("No email entered");
            };

            match login(self.store.as_ref(), &line).await {
                Ok(user) => return Ok(user),
                Err(err) => {
                    let message = match &err {
                        LoginError::InvalidEmail(_) => {
                            "Please enter a valid email address".to_string()
                        }
                        other => other.to_string(),
                    };
                    write_line(&mut output, &message).await?;
                }
            }
        }
    }
}

async fn write_line<W: AsyncWrite + Unpin>(output: &mut W, message: &str) -> Result<()> {
    output
        .write_all(format!("{message}\n").as_bytes())
        .await
        .context("Failed to write message")?;
    output.flush().await.context("Failed to flush message")
}
