//! Durable client storage: a small WAL-mode SQLite key/value file.
//!
//! Only two keys are ever written, always together: the bearer token and the
//! JSON-encoded [`User`]. A file holding just one of them is treated as empty.

use std::path::Path;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use rusqlite::OptionalExtension;
use tokio_rusqlite::Connection;

use crate::error::StorageError;
use crate::types::{Session, User};

/// Storage key for the bearer token.
pub const TOKEN_KEY: &str = "cr_token";
/// Storage key for the serialized user record.
pub const USER_KEY: &str = "cr_user";

/// Handle to the storage file. Cheap to clone; all clones share one
/// background connection thread.
#[derive(Clone)]
pub struct Storage {
    conn: Connection,
}

impl Storage {
    /// Opens (or creates) the storage file at `path`, configures WAL mode,
    /// and applies schema migrations.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the parent directory cannot be created, the
    /// file cannot be opened, or schema DDL fails.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)
            .await
            .map_err(tokio_rusqlite::Error::from)?;

        conn.call(|db| {
            db.execute_batch(
                "PRAGMA journal_mode=WAL;
                 PRAGMA synchronous=NORMAL;",
            )?;
            db.busy_timeout(Duration::from_secs(5))?;
            crate::schema::migrate(db)?;
            Ok::<_, rusqlite::Error>(())
        })
        .await?;

        tracing::debug!(path = %path.display(), "client storage opened");
        Ok(Self { conn })
    }

    /// Reads the persisted session.
    ///
    /// Returns `None` when either key is missing or the user record does not
    /// decode; in that case any leftover key is removed so the pair stays
    /// consistent.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query or the cleanup of a half-written
    /// pair fails.
    pub async fn load_session(&self) -> Result<Option<Session>, StorageError> {
        let (token, user_json) = self
            .conn
            .call(|db| {
                let get = |key: &str| -> rusqlite::Result<Option<String>> {
                    db.query_row(
                        "SELECT value FROM client_storage WHERE key = ?1",
                        rusqlite::params![key],
                        |r| r.get(0),
                    )
                    .optional()
                };
                let token = get(TOKEN_KEY)?;
                let user = get(USER_KEY)?;
                Ok::<_, rusqlite::Error>((token, user))
            })
            .await?;

        let session = match (token, user_json) {
            (Some(token), Some(user_json)) if !token.is_empty() => {
                match serde_json::from_str::<User>(&user_json) {
                    Ok(user) => Some(Session { token, user }),
                    Err(e) => {
                        tracing::warn!("discarding unreadable stored user record: {e}");
                        None
                    }
                }
            }
            (None, None) => return Ok(None),
            _ => None,
        };

        if session.is_none() {
            self.clear_session().await?;
        }
        Ok(session)
    }

    /// Writes both keys inside one `BEGIN IMMEDIATE` transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the user record cannot be encoded or the
    /// transaction fails. Neither key is written in that case.
    pub async fn save_session(&self, session: &Session) -> Result<(), StorageError> {
        let token = session.token.clone();
        let user_json = serde_json::to_string(&session.user)?;

        self.conn
            .call(move |db| {
                let now = now_secs();
                let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
                for (key, value) in [(TOKEN_KEY, &token), (USER_KEY, &user_json)] {
                    tx.execute(
                        "INSERT INTO client_storage (key, value, updated_at)
                         VALUES (?1, ?2, ?3)
                         ON CONFLICT(key)
                         DO UPDATE SET value = excluded.value,
                                       updated_at = excluded.updated_at",
                        rusqlite::params![key, value, now],
                    )?;
                }
                tx.commit()?;
                Ok::<_, rusqlite::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Deletes both keys inside one transaction.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the transaction fails.
    pub async fn clear_session(&self) -> Result<(), StorageError> {
        self.conn
            .call(|db| {
                let tx = db.transaction_with_behavior(rusqlite::TransactionBehavior::Immediate)?;
                tx.execute(
                    "DELETE FROM client_storage WHERE key IN (?1, ?2)",
                    rusqlite::params![TOKEN_KEY, USER_KEY],
                )?;
                tx.commit()?;
                Ok::<_, rusqlite::Error>(())
            })
            .await?;
        Ok(())
    }

    /// Number of rows currently stored. Exposed for integration tests.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError`] if the query fails.
    pub async fn key_count(&self) -> Result<i64, StorageError> {
        let count = self
            .conn
            .call(|db| {
                db.query_row("SELECT COUNT(*) FROM client_storage", [], |r| r.get(0))
            })
            .await?;
        Ok(count)
    }
}

/// Returns the current Unix timestamp in seconds.
fn now_secs() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
