//! Calculation request model and its field validation.

use serde::Deserialize;
use std::fmt;

/// Largest accepted yearly interest rate, in percent.
pub const MAX_INTEREST_RATE: f64 = 100.0;

/// Longest accepted loan term, in years.
pub const MAX_LOAN_TERM_YEARS: i32 = 30;

/// A calculation request as received on the wire.
///
/// Numeric fields default to zero when absent, so a missing `loanValue`
/// is reported by [`validate`](Self::validate) rather than by the decoder.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiCalculationInput {
    /// Principal; must be > 0
    #[serde(default)]
    pub loan_value: f64,

    /// Annual interest rate in percent; must be in [0, 100]
    #[serde(default)]
    pub yearly_interest_rate: f64,

    /// Term in years; must be in [0, 30]
    #[serde(default, alias = "yearlyLoanTermYears")]
    pub yearly_loan_term: i32,

    /// Requester, used as the lookup key for `find_by_email`
    #[serde(default)]
    pub email: Option<String>,

    /// Free-text label such as the loan category
    #[serde(default, rename = "emiOption", alias = "option")]
    pub option: Option<String>,
}

impl EmiCalculationInput {
    /// Creates a request without metadata.
    pub fn new(loan_value: f64, yearly_interest_rate: f64, yearly_loan_term: i32) -> Self {
        EmiCalculationInput {
            loan_value,
            yearly_interest_rate,
            yearly_loan_term,
            email: None,
            option: None,
        }
    }

    /// Attaches the requester's email.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }

    /// Attaches a free-text option label.
    pub fn with_option(mut self, option: impl Into<String>) -> Self {
        self.option = Some(option.into());
        self
    }

    /// Checks every field constraint and returns one violation per bad field,
    /// in declaration order. An empty vector means the request is valid.
    pub fn validate(&self) -> Vec<FieldViolation> {
        let mut violations = Vec::new();

        if !self.loan_value.is_finite() || self.loan_value <= 0.0 {
            violations.push(FieldViolation::new(
                "loanValue",
                "Loan value must be a positive number.",
            ));
        }

        if !(0.0..=MAX_INTEREST_RATE).contains(&self.yearly_interest_rate) {
            violations.push(FieldViolation::new(
                "yearlyInterestRate",
                "Interest rate should be between 0 and 100.",
            ));
        }

        if !(0..=MAX_LOAN_TERM_YEARS).contains(&self.yearly_loan_term) {
            violations.push(FieldViolation::new(
                "yearlyLoanTerm",
                "Loan term should be between 0 and 30 years.",
            ));
        }

        violations
    }
}

/// A single failed field constraint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Wire name of the offending field
    pub field: &'static str,

    /// Human-readable constraint
    pub message: &'static str,
}

impl FieldViolation {
    pub fn new(field: &'static str, message: &'static str) -> Self {
        FieldViolation { field, message }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_request_has_no_violations() {
        assert!(EmiCalculationInput::new(100_000.0, 5.0, 20)
            .validate()
            .is_empty());
        assert!(EmiCalculationInput::new(0.01, 0.0, 0).validate().is_empty());
        assert!(EmiCalculationInput::new(1.0, 100.0, 30).validate().is_empty());
    }

    #[test]
    fn test_negative_loan_value() {
        let violations = EmiCalculationInput::new(-5.0, 5.0, 20).validate();
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].to_string(),
            "loanValue: Loan value must be a positive number."
        );
    }

    #[test]
    fn test_zero_loan_value() {
        let violations = EmiCalculationInput::new(0.0, 5.0, 20).validate();
        assert_eq!(violations[0].field, "loanValue");
    }

    #[test]
    fn test_nan_loan_value() {
        let violations = EmiCalculationInput::new(f64::NAN, 5.0, 20).validate();
        assert_eq!(violations[0].field, "loanValue");
    }

    #[test]
    fn test_every_field_reported_in_order() {
        let violations = EmiCalculationInput::new(-1.0, 100.5, 31).validate();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, ["loanValue", "yearlyInterestRate", "yearlyLoanTerm"]);
    }

    #[test]
    fn test_negative_rate_and_term() {
        let violations = EmiCalculationInput::new(1_000.0, -0.1, -1).validate();
        let fields: Vec<_> = violations.iter().map(|v| v.field).collect();
        assert_eq!(fields, ["yearlyInterestRate", "yearlyLoanTerm"]);
    }

    #[test]
    fn test_deserialize_wire_names() {
        let json = r#"{
            "loanValue": 100000,
            "yearlyInterestRate": 5,
            "yearlyLoanTerm": 20,
            "email": "x@y.com",
            "emiOption": "car"
        }"#;
        let input: EmiCalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.loan_value, 100_000.0);
        assert_eq!(input.yearly_interest_rate, 5.0);
        assert_eq!(input.yearly_loan_term, 20);
        assert_eq!(input.email.as_deref(), Some("x@y.com"));
        assert_eq!(input.option.as_deref(), Some("car"));
    }

    #[test]
    fn test_deserialize_aliases() {
        let json = r#"{"loanValue": 1, "yearlyInterestRate": 1,
                       "yearlyLoanTermYears": 3, "option": "home"}"#;
        let input: EmiCalculationInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.yearly_loan_term, 3);
        assert_eq!(input.option.as_deref(), Some("home"));
        assert!(input.email.is_none());
    }

    #[test]
    fn test_missing_fields_default_to_zero() {
        let input: EmiCalculationInput = serde_json::from_str("{}").unwrap();
        assert_eq!(input.loan_value, 0.0);
        let fields: Vec<_> = input.validate().iter().map(|v| v.field).collect();
        assert_eq!(fields, ["loanValue"]);
    }
}
