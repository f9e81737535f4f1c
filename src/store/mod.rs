//! Append-only persistence for EMI records.
//!
//! The store owns id generation. It reports absence as `None` or an empty
//! list; deciding that absence is an error is left to the service.

pub mod memory;
pub mod sqlite;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

use crate::error::StoreError;
use crate::record::{EmiRecord, NewEmiRecord, RecordId};

/// Result type alias for store operations
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Durable storage for EMI records.
///
/// Implementations must be safe to share across request handlers and must
/// never hand out the same id twice, including under concurrent inserts.
/// There is no update or delete.
pub trait EmiRecordStore: Send + Sync {
    /// Stores a record and returns it with its assigned id.
    fn insert(&self, record: NewEmiRecord) -> StoreResult<EmiRecord>;

    /// Looks up a record by id.
    fn get_by_id(&self, id: RecordId) -> StoreResult<Option<EmiRecord>>;

    /// Returns every record whose email equals `email` exactly
    /// (case-sensitive), in ascending id order.
    fn get_by_email(&self, email: &str) -> StoreResult<Vec<EmiRecord>>;
}
