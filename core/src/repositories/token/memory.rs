//! In-process implementation of TokenRepository
//!
//! Used for development, tests, and single-instance deployments. Writers are
//! serialized per subject with an async mutex, which plays the role of a
//! row lock. A subject's mutex only lives while someone holds or awaits it.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use crate::domain::entities::token::SessionTokenRecord;
use crate::errors::DomainError;

use super::r#trait::{TokenRepository, TokenTransaction};

type SubjectLocks = Arc<StdMutex<HashMap<String, Arc<Mutex<()>>>>>;

/// In-memory token repository
#[derive(Clone, Default)]
pub struct InMemoryTokenRepository {
    records: Arc<RwLock<HashMap<String, SessionTokenRecord>>>,
    locks: SubjectLocks,
}

impl InMemoryTokenRepository {
    /// Create an empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    /// Number of subjects with a live lock entry
    #[cfg(test)]
    pub(crate) fn locked_subjects(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    async fn lock_subject(&self, subject: &str) -> SubjectGuard {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(subject.to_string()).or_default())
        };
        // Built before waiting so a cancelled wait still cleans up the entry
        let mut held = SubjectGuard {
            subject: subject.to_string(),
            lock,
            guard: None,
            locks: Arc::clone(&self.locks),
        };
        held.guard = Some(Arc::clone(&held.lock).lock_owned().await);
        held
    }
}

/// Exclusive hold on one subject
///
/// Dropping it releases the mutex and removes the map entry once no other
/// task holds or waits for it.
struct SubjectGuard {
    subject: String,
    lock: Arc<Mutex<()>>,
    guard: Option<OwnedMutexGuard<()>>,
    locks: SubjectLocks,
}

impl Drop for SubjectGuard {
    fn drop(&mut self) {
        self.guard.take();
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        // One reference in the map and one here: nobody else is waiting
        if Arc::strong_count(&self.lock) == 2 {
            locks.remove(&self.subject);
        }
    }
}

#[async_trait]
impl TokenRepository for InMemoryTokenRepository {
    async fn save(&self, record: SessionTokenRecord) -> Result<(), DomainError> {
        let _guard = self.lock_subject(&record.subject).await;
        self.records
            .write()
            .await
            .insert(record.subject.clone(), record);
        Ok(())
    }

    async fn find(&self, subject: &str) -> Result<Option<SessionTokenRecord>, DomainError> {
        Ok(self.records.read().await.get(subject).cloned())
    }

    async fn delete(&self, subject: &str) -> Result<bool, DomainError> {
        let _guard = self.lock_subject(subject).await;
        Ok(self.records.write().await.remove(subject).is_some())
    }

    async fn replace(&self, record: SessionTokenRecord) -> Result<(), DomainError> {
        let _guard = self.lock_subject(&record.subject).await;
        let mut records = self.records.write().await;
        match records.get_mut(&record.subject) {
            Some(existing) => {
                *existing = record;
                Ok(())
            }
            None => Err(DomainError::store(format!(
                "no session record to replace for subject {}",
                record.subject
            ))),
        }
    }

    async fn begin(&self) -> Result<Box<dyn TokenTransaction>, DomainError> {
        Ok(Box::new(InMemoryTransaction {
            repo: self.clone(),
            guards: HashMap::new(),
            pending: Vec::new(),
        }))
    }
}

enum PendingWrite {
    Replace(SessionTokenRecord),
    Delete(String),
}

/// Transaction over [`InMemoryTokenRepository`]
///
/// Writes are buffered and applied on commit while the subject locks are
/// still held.
pub struct InMemoryTransaction {
    repo: InMemoryTokenRepository,
    guards: HashMap<String, SubjectGuard>,
    pending: Vec<PendingWrite>,
}

impl InMemoryTransaction {
    async fn ensure_locked(&mut self, subject: &str) {
        if !self.guards.contains_key(subject) {
            let guard = self.repo.lock_subject(subject).await;
            self.guards.insert(subject.to_string(), guard);
        }
    }

    /// Current view of `subject`, including this transaction's own writes
    async fn current(&self, subject: &str) -> Option<SessionTokenRecord> {
        for write in self.pending.iter().rev() {
            match write {
                PendingWrite::Replace(record) if record.subject == subject => {
                    return Some(record.clone())
                }
                PendingWrite::Delete(deleted) if deleted == subject => return None,
                _ => {}
            }
        }
        self.repo.records.read().await.get(subject).cloned()
    }

    fn release(&mut self) {
        self.pending.clear();
        self.guards.clear();
    }
}

#[async_trait]
impl TokenTransaction for InMemoryTransaction {
    async fn find_for_update(
        &mut self,
        subject: &str,
    ) -> Result<Option<SessionTokenRecord>, DomainError> {
        self.ensure_locked(subject).await;
        Ok(self.current(subject).await)
    }

    async fn delete(&mut self, subject: &str) -> Result<bool, DomainError> {
        self.ensure_locked(subject).await;
        let existed = self.current(subject).await.is_some();
        if existed {
            self.pending.push(PendingWrite::Delete(subject.to_string()));
        }
        Ok(existed)
    }

    async fn replace(&mut self, record: SessionTokenRecord) -> Result<(), DomainError> {
        self.ensure_locked(&record.subject).await;
        if self.current(&record.subject).await.is_none() {
            return Err(DomainError::store(format!(
                "no session record to replace for subject {}",
                record.subject
            )));
        }
        self.pending.push(PendingWrite::Replace(record));
        Ok(())
    }

    async fn commit(&mut self) -> Result<(), DomainError> {
        {
            let mut records = self.repo.records.write().await;
            for write in self.pending.drain(..) {
                match write {
                    PendingWrite::Replace(record) => {
                        records.insert(record.subject.clone(), record);
                    }
                    PendingWrite::Delete(subject) => {
                        records.remove(&subject);
                    }
                }
            }
        }
        self.release();
        Ok(())
    }

    async fn rollback(&mut self) -> Result<(), DomainError> {
        self.release();
        Ok(())
    }
}
