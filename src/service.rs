//! EMI service: computes installments and owns the lookup policy.
//!
//! The store reports absence as `None` or an empty list. This layer turns
//! absence into [`EmiError::NotFound`].

use crate::calculator::monthly_installment;
use crate::error::{EmiError, NotFoundKey, Result};
use crate::record::{EmiRecord, NewEmiRecord, RecordId};
use crate::request::EmiCalculationInput;
use crate::store::EmiRecordStore;
use log::debug;

/// Orchestrates the calculator and a record store.
///
/// Input is expected to have passed [`EmiCalculationInput::validate`]. The
/// calculator still rejects inputs with no defined installment, so an
/// unvalidated request can fail but can never store NaN.
pub struct EmiService {
    store: Box<dyn EmiRecordStore>,
}

impl EmiService {
    /// Creates a service over the given store.
    pub fn new<S: EmiRecordStore + 'static>(store: S) -> Self {
        EmiService {
            store: Box::new(store),
        }
    }

    /// Computes the installment for `input`, stores it and returns the
    /// stored record with its assigned id.
    ///
    /// The email is kept only when non-empty. The option label is kept as
    /// given.
    pub fn calculate_and_save(&self, input: &EmiCalculationInput) -> Result<EmiRecord> {
        let emi = monthly_installment(
            input.loan_value,
            input.yearly_interest_rate,
            input.yearly_loan_term,
        )?;

        let mut record = NewEmiRecord::new(emi);
        record.option = input.option.clone();
        if let Some(email) = input.email.as_deref().filter(|e| !e.is_empty()) {
            record.email = Some(email.to_string());
        }

        let stored = self.store.insert(record)?;
        debug!(
            "Calculated EMI {} for loan {} at {}% over {} years (record {})",
            stored.emi,
            input.loan_value,
            input.yearly_interest_rate,
            input.yearly_loan_term,
            stored.id
        );
        Ok(stored)
    }

    /// Returns the record with the given id.
    pub fn find_by_id(&self, id: RecordId) -> Result<EmiRecord> {
        match self.store.get_by_id(id)? {
            Some(record) => Ok(record),
            None => {
                debug!("No EMI record with id {}", id);
                Err(EmiError::NotFound(NotFoundKey::Id(id)))
            }
        }
    }

    /// Returns every record stored under `email`, oldest first.
    ///
    /// An empty result is an error.
    pub fn find_by_email(&self, email: &str) -> Result<Vec<EmiRecord>> {
        let records = self.store.get_by_email(email)?;
        if records.is_empty() {
            debug!("No EMI records for email {}", email);
            return Err(EmiError::NotFound(NotFoundKey::Email(email.to_string())));
        }
        Ok(records)
    }
}
