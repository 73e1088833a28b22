use super::models::{Session, User};
use super::repository::{SessionRepository, UserRepository};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use shared::{Error, Result};
use sled::transaction::{ConflictableTransactionError, TransactionError};
use sled::{Db, Transactional, Tree};
use std::path::Path;

const USERS_TREE: &str = "users";
const USERS_BY_EMAIL_TREE: &str = "users_by_email";
const SESSIONS_TREE: &str = "sessions";
const SESSIONS_BY_TOKEN_TREE: &str = "sessions_by_token";

fn storage_error(context: &str, err: impl std::fmt::Display) -> Error {
    Error::Internal(format!("{}: {}", context, err))
}

/// Open (creating if needed) a sled database, creating its parent directory first
fn open_db(path: &Path) -> Result<Db> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| storage_error("Failed to create directory", e))?;
    }

    sled::open(path).map_err(|e| storage_error("Failed to open Sled database", e))
}

fn open_tree(db: &Db, name: &str) -> Result<Tree> {
    db.open_tree(name)
        .map_err(|e| storage_error("Failed to open tree", e))
}

fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    serde_json::from_slice(bytes).map_err(|e| storage_error("Failed to deserialize record", e))
}

fn finish_transaction<T>(result: std::result::Result<T, TransactionError<Error>>) -> Result<T> {
    result.map_err(|e| match e {
        TransactionError::Abort(err) => err,
        TransactionError::Storage(err) => storage_error("Transaction failed", err),
    })
}

/// Look up a record through a secondary index (unique key -> id -> record)
fn get_indexed<T: DeserializeOwned>(index: &Tree, records: &Tree, key: &str) -> Result<T> {
    let id = index
        .get(key.as_bytes())
        .map_err(|e| storage_error("Failed to read index", e))?
        .ok_or(Error::NotFound)?;

    let data = records
        .get(&id)
        .map_err(|e| storage_error("Failed to read record", e))?
        .ok_or(Error::NotFound)?;

    decode(&data)
}

#[derive(Clone)]
pub struct SledUserRepository {
    db: Db,
    users: Tree,
    users_by_email: Tree,
}

impl SledUserRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = open_db(path.as_ref())?;
        let users = open_tree(&db, USERS_TREE)?;
        let users_by_email = open_tree(&db, USERS_BY_EMAIL_TREE)?;

        Ok(Self {
            db,
            users,
            users_by_email,
        })
    }

    #[cfg(test)]
    pub(crate) fn user_count(&self) -> usize {
        self.users.len()
    }
}

#[async_trait]
impl UserRepository for SledUserRepository {
    async fn create(&self, user: User) -> Result<User> {
        let user_json = serde_json::to_vec(&user)
            .map_err(|e| storage_error("Failed to serialize user", e))?;

        // Index check and both inserts commit together or not at all
        let result = (&self.users, &self.users_by_email).transaction(|(users, by_email)| {
            if by_email.get(user.email.as_bytes())?.is_some() {
                return Err(ConflictableTransactionError::Abort(Error::AlreadyExists(
                    format!("user with email {}", user.email),
                )));
            }

            users.insert(user.id.as_bytes(), user_json.as_slice())?;
            by_email.insert(user.email.as_bytes(), user.id.as_bytes())?;
            Ok(())
        });
        finish_transaction(result)?;

        self.db
            .flush_async()
            .await
            .map_err(|e| storage_error("Failed to flush database", e))?;

        Ok(user)
    }

    async fn find_by_email(&self, email: &str) -> Result<User> {
        get_indexed(&self.users_by_email, &self.users, email)
    }

    async fn find_by_id(&self, id: &str) -> Result<User> {
        let data = self
            .users
            .get(id.as_bytes())
            .map_err(|e| storage_error("Failed to read user", e))?
            .ok_or(Error::NotFound)?;

        decode(&data)
    }
}

#[derive(Clone)]
pub struct SledSessionRepository {
    db: Db,
    sessions: Tree,
    sessions_by_token: Tree,
}

impl SledSessionRepository {
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = open_db(path.as_ref())?;
        let sessions = open_tree(&db, SESSIONS_TREE)?;
        let sessions_by_token = open_tree(&db, SESSIONS_BY_TOKEN_TREE)?;

        Ok(Self {
            db,
            sessions,
            sessions_by_token,
        })
    }
}

#[async_trait]
impl SessionRepository for SledSessionRepository {
    async fn create(&self, session: Session) -> Result<Session> {
        let session_json = serde_json::to_vec(&session)
            .map_err(|e| storage_error("Failed to serialize session", e))?;

        let result =
            (&self.sessions, &self.sessions_by_token).transaction(|(sessions, by_token)| {
                if by_token.get(session.refresh_token.as_bytes())?.is_some() {
                    return Err(ConflictableTransactionError::Abort(Error::AlreadyExists(
                        "session for refresh token".to_string(),
                    )));
                }

                sessions.insert(session.id.as_bytes(), session_json.as_slice())?;
                by_token.insert(session.refresh_token.as_bytes(), session.id.as_bytes())?;
                Ok(())
            });
        finish_transaction(result)?;

        // A session must be durable before its token is handed out
        self.db
            .flush_async()
            .await
            .map_err(|e| storage_error("Failed to flush database", e))?;

        Ok(session)
    }

    async fn find_by_token(&self, refresh_token: &str) -> Result<Session> {
        get_indexed(&self.sessions_by_token, &self.sessions, refresh_token)
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = (&self.sessions, &self.sessions_by_token).transaction(|(sessions, by_token)| {
            let Some(data) = sessions.get(id.as_bytes())? else {
                return Ok(false);
            };

            let session: Session = serde_json::from_slice(&data).map_err(|e| {
                ConflictableTransactionError::Abort(storage_error(
                    "Failed to deserialize session",
                    e,
                ))
            })?;

            sessions.remove(id.as_bytes())?;
            by_token.remove(session.refresh_token.as_bytes())?;
            Ok(true)
        });
        let removed = finish_transaction(result)?;

        if removed {
            self.db
                .flush_async()
                .await
                .map_err(|e| storage_error("Failed to flush database", e))?;
        }

        Ok(removed)
    }
}
