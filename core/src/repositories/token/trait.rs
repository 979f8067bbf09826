//! Token repository traits defining the interface for session record persistence.

use async_trait::async_trait;

use crate::domain::entities::token::SessionTokenRecord;
use crate::errors::DomainError;

/// Repository trait for session token records, keyed by subject
///
/// Every operation must be atomic with respect to concurrent calls on the
/// same subject.
///
/// # Security Considerations
/// - Only secret hashes are stored, never raw refresh secrets
/// - At most one record exists per subject
#[async_trait]
pub trait TokenRepository: Send + Sync {
    /// Upsert a record; an existing record for the subject is overwritten
    ///
    /// # Example
    /// ```no_run
    /// # use sa_core::repositories::TokenRepository;
    /// # use sa_core::domain::entities::token::SessionTokenRecord;
    /// # async fn example(repo: &impl TokenRepository) -> Result<(), Box<dyn std::error::Error>> {
    /// let record = SessionTokenRecord::new("u1", "a@x.com", "10.0.0.1", "$2b$10$...");
    /// repo.save(record).await?;
    /// # Ok(())
    /// # }
    /// ```
    async fn save(&self, record: SessionTokenRecord) -> Result<(), DomainError>;

    /// Find the record for a subject
    ///
    /// # Returns
    /// * `Ok(Some(record))` - Record found
    /// * `Ok(None)` - No record for this subject
    /// * `Err(DomainError)` - Store failure
    async fn find(&self, subject: &str) -> Result<Option<SessionTokenRecord>, DomainError>;

    /// Delete the record for a subject
    ///
    /// # Returns
    /// * `Ok(true)` - Record deleted
    /// * `Ok(false)` - There was nothing to delete
    async fn delete(&self, subject: &str) -> Result<bool, DomainError>;

    /// Overwrite the existing record for `record.subject`
    ///
    /// All-or-nothing. Replacing a subject without a record is an error.
    async fn replace(&self, record: SessionTokenRecord) -> Result<(), DomainError>;

    /// Start a unit of work that can lock a subject's record
    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError>;
}

/// A unit of work against the store
///
/// Records read through [`find_for_update`](TokenTransaction::find_for_update)
/// stay exclusively locked until `commit` or `rollback`. Dropping the
/// transaction without committing discards its writes.
#[async_trait]
pub trait TokenTransaction: Send {
    /// Read and lock the record for `subject`
    async fn find_for_update(
        &mut self,
        subject: &str,
    ) -> Result<Option<SessionTokenRecord>, DomainError>;

    /// Delete the record for `subject` when the transaction commits
    async fn delete(&mut self, subject: &str) -> Result<bool, DomainError>;

    /// Replace the record for `record.subject` when the transaction commits
    async fn replace(&mut self, record: SessionTokenRecord) -> Result<(), DomainError>;

    /// Make all writes visible and release locks
    async fn commit(&mut self) -> Result<(), DomainError>;

    /// Discard all writes and release locks
    async fn rollback(&mut self) -> Result<(), DomainError>;
}
