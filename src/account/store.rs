//! Storage for user records and their personal best.
//!
//! The game only ever needs three queries against the table: look a user
//! up by email, insert a fresh user, and raise a stored max score. Both
//! backends here keep one record per email and reject a second insert.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;

use super::email::Email;

/// One row of the user table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub email: Email,
    pub max_score: u32,
}

impl UserRecord {
    /// A freshly registered user starts with a zero max score
    pub fn new(email: Email) -> Self {
        Self {
            email,
            max_score: 0,
        }
    }
}

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("a user with email {0} already exists")]
    Duplicate(Email),

    #[error("no user with email {0}")]
    NotFound(Email),

    #[error("score table I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("score table is corrupt: {0}")]
    Corrupt(#[from] serde_json::Error),

    #[error("score table unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait ScoreStore: Send + Sync {
    /// Cheap connectivity check, run once before the login prompt
    async fn ping(&self) -> Result<(), StoreError>;

    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StoreError>;

    /// Fails with [`StoreError::Duplicate`] if the email is already present
    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError>;

    /// Overwrite the stored max score of an existing user
    async fn update_max_score(&self, email: &Email, max_score: u32) -> Result<(), StoreError>;
}

/// Process-local table, nothing survives a restart
#[derive(Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<Email, u32>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScoreStore for MemoryStore {
    async fn ping(&self) -> Result<(), StoreError> {
        Ok(())
    }

    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let users = self.users.read().await;
        Ok(users.get(email).map(|&max_score| UserRecord {
            email: email.clone(),
            max_score,
        }))
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        if users.contains_key(&record.email) {
            return Err(StoreError::Duplicate(record.email));
        }
        users.insert(record.email, record.max_score);
        Ok(())
    }

    async fn update_max_score(&self, email: &Email, max_score: u32) -> Result<(), StoreError> {
        let mut users = self.users.write().await;
        match users.get_mut(email) {
            Some(stored) => {
                *stored = max_score;
                Ok(())
            }
            None => Err(StoreError::NotFound(email.clone())),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Table {
    users: Vec<UserRecord>,
}

/// Whole table kept as one JSON document.
///
/// Every mutation rewrites the file through a temporary sibling and a
/// rename, so a crash leaves either the old or the new table on disk.
pub struct JsonFileStore {
    path: PathBuf,
    // Serializes read-modify-write cycles within this process
    write_lock: Mutex<()>,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Table, StoreError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) if raw.trim().is_empty() => Ok(Table::default()),
            Ok(raw) => Ok(serde_json::from_str(&raw)?),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Table::default()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, table: &Table) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let json = serde_json::to_string_pretty(table)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), users = table.users.len(), "score table saved");
        Ok(())
    }
}

#[async_trait]
impl ScoreStore for JsonFileStore {
    async fn ping(&self) -> Result<(), StoreError> {
        if tokio::fs::metadata(&self.path).await.is_ok_and(|meta| meta.is_dir()) {
            return Err(StoreError::Unavailable(format!(
                "{} is a directory",
                self.path.display()
            )));
        }
        self.load().await.map(|_| ())
    }

    async fn find_user(&self, email: &Email) -> Result<Option<UserRecord>, StoreError> {
        let table = self.load().await?;
        Ok(table.users.into_iter().find(|user| &user.email == email))
    }

    async fn insert_user(&self, record: UserRecord) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        if table.users.iter().any(|user| user.email == record.email) {
            return Err(StoreError::Duplicate(record.email));
        }
        table.users.push(record);
        self.save(&table).await
    }

    async fn update_max_score(&self, email: &Email, max_score: u32) -> Result<(), StoreError> {
        let _guard = self.write_lock.lock().await;
        let mut table = self.load().await?;
        let user = table
            .users
            .iter_mut()
            .find(|user| &user.email == email)
            .ok_or_else(|| StoreError::NotFound(email.clone()))?;
        user.max_score = max_score;
        self.save(&table).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn email(raw: &str) -> Email {
        Email::parse(raw).unwrap()
    }

    async fn exercise(store: &dyn ScoreStore) {
        let ana = email("ana@example.com");

        store.ping().await.unwrap();
        assert_eq!(store.find_user(&ana).await.unwrap(), None);

        store.insert_user(UserRecord::new(ana.clone())).await.unwrap();
        assert_eq!(
            store.find_user(&ana).await.unwrap(),
            Some(UserRecord {
                email: ana.clone(),
                max_score: 0
            })
        );

        let dup = store.insert_user(UserRecord::new(ana.clone())).await;
        assert!(matches!(dup, Err(StoreError::Duplicate(ref e)) if e == &ana));

        store.update_max_score(&ana, 120).await.unwrap();
        assert_eq!(store.find_user(&ana).await.unwrap().unwrap().max_score, 120);

        let missing = store.update_max_score(&email("bo@example.com"), 10).await;
        assert!(matches!(missing, Err(StoreError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_memory_store() {
        exercise(&MemoryStore::new()).await;
    }

    #[tokio::test]
    async fn test_json_file_store() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path().join("nested").join("scores.json"));
        exercise(&store).await;
    }

    #[tokio::test]
    async fn test_json_file_store_survives_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.json");
        let ana = email("ana@example.com");

        {
            let store = JsonFileStore::new(&path);
            store.insert_user(UserRecord::new(ana.clone())).await.unwrap();
            store.update_max_score(&ana, 40).await.unwrap();
        }

        let reopened = JsonFileStore::new(&path);
        assert_eq!(reopened.find_user(&ana).await.unwrap().unwrap().max_score, 40);
    }

    #[tokio::test]
    async fn test_json_file_store_rejects_directory_path() {
        let temp_dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(temp_dir.path());

        assert!(matches!(store.ping().await, Err(StoreError::Unavailable(_))));
    }

    #[tokio::test]
    async fn test_json_file_store_reports_corruption() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("scores.json");
        std::fs::write(&path, "{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.ping().await, Err(StoreError::Corrupt(_))));
    }
}
