//! MySQL implementation of the TokenRepository trait.
//!
//! One row per subject in `session_tokens`. Rotation reads the row with
//! `SELECT ... FOR UPDATE` inside an InnoDB transaction, so concurrent
//! redemptions of the same subject are serialized by the row lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::MySqlRow;
use sqlx::{MySql, MySqlPool, Row, Transaction};

use sa_core::domain::entities::token::SessionTokenRecord;
use sa_core::errors::DomainError;
use sa_core::repositories::{TokenRepository, TokenTransaction};

const SELECT_RECORD: &str = r#"
    SELECT subject, contact, origin, secret_hash, issued_at
    FROM session_tokens
    WHERE subject = ?
"#;

const SELECT_RECORD_FOR_UPDATE: &str = r#"
    SELECT subject, contact, origin, secret_hash, issued_at
    FROM session_tokens
    WHERE subject = ?
    FOR UPDATE
"#;

const UPSERT_RECORD: &str = r#"
    INSERT INTO session_tokens (subject, contact, origin, secret_hash, issued_at)
    VALUES (?, ?, ?, ?, ?)
    ON DUPLICATE KEY UPDATE
        contact = VALUES(contact),
        origin = VALUES(origin),
        secret_hash = VALUES(secret_hash),
        issued_at = VALUES(issued_at)
"#;

const UPDATE_RECORD: &str = r#"
    UPDATE session_tokens
    SET contact = ?, origin = ?, secret_hash = ?, issued_at = ?
    WHERE subject = ?
"#;

const DELETE_RECORD: &str = "DELETE FROM session_tokens WHERE subject = ?";

/// MySQL implementation of TokenRepository
pub struct MySqlTokenRepository {
    /// Database connection pool
    pool: MySqlPool,
}

impl MySqlTokenRepository {
    /// Create a new MySQL token repository
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Convert database row to SessionTokenRecord entity
    fn row_to_record(row: &MySqlRow) -> Result<SessionTokenRecord, DomainError> {
        Ok(SessionTokenRecord {
            subject: row
                .try_get("subject")
                .map_err(|e| store_error("get subject", e))?,
            contact: row
                .try_get("contact")
                .map_err(|e| store_error("get contact", e))?,
            origin: row
                .try_get("origin")
                .map_err(|e| store_error("get origin", e))?,
            secret_hash: row
                .try_get("secret_hash")
                .map_err(|e| store_error("get secret_hash", e))?,
            issued_at: row
                .try_get::<DateTime<Utc>, _>("issued_at")
                .map_err(|e| store_error("get issued_at", e))?,
        })
    }
}

fn store_error(action: &str, err: sqlx::Error) -> DomainError {
    DomainError::Store {
        message: format!("Failed to {}: {}", action, err),
    }
}

fn missing_record(subject: &str) -> DomainError {
    DomainError::Store {
        message: format!("No session record to replace for subject {}", subject),
    }
}

#[async_trait]
impl TokenRepository for MySqlTokenRepository {
    async fn save(&self, record: SessionTokenRecord) -> Result<(), DomainError> {
        sqlx::query(UPSERT_RECORD)
            .bind(&record.subject)
            .bind(&record.contact)
            .bind(&record.origin)
            .bind(&record.secret_hash)
            .bind(record.issued_at)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("save session record", e))?;

        tracing::debug!(subject = %record.subject, "Saved session record");
        Ok(())
    }

    async fn find(&self, subject: &str) -> Result<Option<SessionTokenRecord>, DomainError> {
        let row = sqlx::query(SELECT_RECORD)
            .bind(subject)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| store_error("find session record", e))?;

        row.as_ref().map(Self::row_to_record).transpose()
    }

    async fn delete(&self, subject: &str) -> Result<bool, DomainError> {
        let result = sqlx::query(DELETE_RECORD)
            .bind(subject)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("delete session record", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace(&self, record: SessionTokenRecord) -> Result<(), DomainError> {
        let result = sqlx::query(UPDATE_RECORD)
            .bind(&record.contact)
            .bind(&record.origin)
            .bind(&record.secret_hash)
            .bind(record.issued_at)
            .bind(&record.subject)
            .execute(&self.pool)
            .await
            .map_err(|e| store_error("replace session record", e))?;

        if result.rows_affected() == 0 {
            return Err(missing_record(&record.subject));
        }
        Ok(())
    }

    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| store_error("begin transaction", e))?;

        Ok(Box::new(MySqlTokenTransaction { tx: Some(tx) }))
    }
}

/// InnoDB transaction over `session_tokens`
///
/// Dropping it before `commit` lets SQLx roll the transaction back.
pub struct MySqlTokenTransaction {
    tx: Option<Transaction<'static, MySql>>,
}

impl MySqlTokenTransaction {
    fn active(&mut self) -> Result<&mut Transaction<'static, MySql>, DomainError> {
        self.tx.as_mut().ok_or_else(|| DomainError::Store {
            message: "transaction already finished".to_string(),
        })
    }
}

#[async_trait]
impl TokenTransaction for MySqlTokenTransaction {
    async fn find_for_update(
        &mut self,
        subject: &str,
    ) -> Result<Option<SessionTokenRecord>, DomainError> {
        let tx = self.active()?;
        let row = sqlx::query(SELECT_RECORD_FOR_UPDATE)
            .bind(subject)
            .fetch_optional(&mut **tx)
            .await
            .map_err(|e| store_error("lock session record", e))?;

        row.as_ref()
            .map(MySqlTokenRepository::row_to_record)
            .transpose()
    }

    async fn delete(&mut self, subject: &str) -> Result<bool, DomainError> {
        let tx = self.active()?;
        let result = sqlx::query(DELETE_RECORD)
            .bind(subject)
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("delete session record", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn replace(&mut self, record: SessionTokenRecord) -> Result<(), DomainError> {
        let tx = self.active()?;
        let result = sqlx::query(UPDATE_RECORD)
            .bind(&record.contact)
            .bind(&record.origin)
            .bind(&record.secret_hash)
            .bind(record.issued_at)
            .bind(&record.subject)
            .execute(&mut **tx)
            .await
            .map_err(|e| store_error("replace session record", e))?;

        if result.rows_affected() == 0 {
            return Err(missing_record(&record.subject));
        }
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        match self.tx.take() {
            Some(tx) => tx
                .commit()
                .await
                .map_err(|e| store_error("commit transaction", e)),
            None => Err(DomainError::Store {
                message: "transaction already finished".to_string(),
            }),
        }
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        match self.tx.take() {
            Some(tx) => tx
                .rollback()
                .await
                .map_err(|e| store_error("roll back transaction", e)),
            None => Ok(()),
        }
    }
}
