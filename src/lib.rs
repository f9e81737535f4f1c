//! # EMI Calculator
//!
//! Computes the equated monthly installment (EMI) of a fixed-rate loan,
//! stores each result, and serves both over HTTP/JSON.
//!
//! ## Design Principles
//!
//! - **Fixed-point results**: installments are rounded to cents via `rust_decimal`
//! - **No undefined arithmetic**: zero-rate loans repay linearly, zero-term
//!   loans are rejected; NaN is never stored
//! - **Append-only storage**: the store assigns ids and never updates a record
//! - **Validation before work**: every violated field is reported at once
//!
//! ## Example
//!
//! ```
//! use emi_calculator::{EmiCalculationInput, EmiService, MemoryStore};
//!
//! let service = EmiService::new(MemoryStore::new());
//! let input = EmiCalculationInput::new(100_000.0, 5.0, 20).with_email("x@y.com");
//! assert!(input.validate().is_empty());
//!
//! let record = service.calculate_and_save(&input).unwrap();
//! assert_eq!(record.emi.to_string(), "659.96");
//! assert_eq!(service.find_by_email("x@y.com").unwrap().len(), 1);
//! ```

pub mod amount;
pub mod api;
pub mod calculator;
pub mod config;
pub mod error;
pub mod record;
pub mod request;
pub mod service;
pub mod store;

pub use amount::Money;
pub use api::{create_router, AppState};
pub use config::{Config, StoreBackend};
pub use error::{CalculationError, EmiError, NotFoundKey, Result, StoreError};
pub use record::{EmiRecord, NewEmiRecord, RecordId};
pub use request::{EmiCalculationInput, FieldViolation};
pub use service::EmiService;
pub use store::{EmiRecordStore, MemoryStore, SqliteStore};
