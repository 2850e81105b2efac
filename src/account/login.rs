use thiserror::Error;
use tracing::info;

use super::email::{Email, InvalidEmail};
use super::store::{ScoreStore, StoreError, UserRecord};

/// Why a login attempt was refused
#[derive(Error, Debug)]
pub enum LoginError {
    #[error(transparent)]
    InvalidEmail(#[from] InvalidEmail),

    /// The insert lost a race against another registration of the same email
    #[error("email {0} is already registered")]
    AlreadyRegistered(Email),

    #[error("could not check the email: {0}")]
    Lookup(#[source] StoreError),

    #[error("could not create the user: {0}")]
    Create(#[source] StoreError),
}

/// Resolve `raw` to a user record, registering it with a zero max score
/// when it is not known yet.
pub async fn login(store: &dyn ScoreStore, raw: &str) -> Result<UserRecord, LoginError> {
    let email = Email::parse(raw)?;

    if let Some(existing) = store.find_user(&email).await.map_err(LoginError::Lookup)? {
        info!(email = %existing.email, max_score = existing.max_score, "returning player");
        return Ok(existing);
    }

    let record = UserRecord::new(email);
    match store.insert_user(record.clone()).await {
        Ok(()) => {
            info!(email = %record.email, "registered new player");
            Ok(record)
        }
        Err(StoreError::Duplicate(email)) => Err(LoginError::AlreadyRegistered(email)),
        Err(err) => Err(LoginError::Create(err)),
    }
}
