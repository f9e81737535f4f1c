//! Persisted EMI record model.

use crate::amount::Money;

/// Store-assigned record identifier.
pub type RecordId = i64;

/// One computed and persisted installment.
///
/// # Invariants
///
/// - `id` is assigned by the store and never reused
/// - `emi` is the rounded formula result at creation time; records are
///   append-only and never recomputed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmiRecord {
    /// Unique identifier assigned on insert.
    pub id: RecordId,

    /// Monthly installment, rounded to cents.
    pub emi: Money,

    /// Requester email, if one was given.
    pub email: Option<String>,

    /// Free-text option label, if one was given.
    pub option: Option<String>,
}

/// A record that has been computed but not yet stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEmiRecord {
    pub emi: Money,
    pub email: Option<String>,
    pub option: Option<String>,
}

impl NewEmiRecord {
    /// Creates a record with no metadata.
    pub fn new(emi: Money) -> Self {
        NewEmiRecord {
            emi,
            email: None,
            option: None,
        }
    }

    /// Attaches the store-assigned id.
    pub fn with_id(self, id: RecordId) -> EmiRecord {
        EmiRecord {
            id,
            emi: self.emi,
            email: self.email,
            option: self.option,
        }
    }
}
