//! Origin change observed while redeeming a refresh secret.

use serde::{Deserialize, Serialize};

use crate::domain::entities::SessionTokenRecord;

/// A refresh attempt arrived from a different network origin than the one
/// on record. Advisory only; it never decides whether rotation succeeds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OriginDrift {
    pub subject: String,
    pub contact: String,
    pub old_origin: String,
    pub new_origin: String,
}

impl OriginDrift {
    /// Compare `record` against the redeeming origin
    pub fn detect(record: &SessionTokenRecord, origin: &str) -> Option<Self> {
        record.origin_differs(origin).then(|| Self {
            subject: record.subject.clone(),
            contact: record.contact.clone(),
            old_origin: record.origin.clone(),
            new_origin: origin.to_string(),
        })
    }
}
