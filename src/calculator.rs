//! Closed-form amortization formula.

use crate::amount::Money;
use crate::error::CalculationError;

/// Months per year; the rate and term are both converted to monthly periods.
const MONTHS_PER_YEAR: i32 = 12;

/// Computes the equated monthly installment for a fixed-rate loan.
///
/// With `r` the monthly rate and `n` the number of monthly periods:
///
/// ```text
/// emi = P * r * (1 + r)^n / ((1 + r)^n - 1)
/// ```
///
/// A zero interest rate, or one too small for `(1 + r)^n - 1` to be a
/// normal float, falls back to straight-line repayment `P / n`.
/// A term of zero years has no installment and is rejected, as are
/// non-positive principals and negative rates. The result is rounded to
/// cents and is never NaN or infinite.
///
/// # Examples
///
/// ```
/// use emi_calculator::calculator::monthly_installment;
///
/// let emi = monthly_installment(100_000.0, 5.0, 20).unwrap();
/// assert_eq!(emi.to_string(), "659.96");
/// ```
pub fn monthly_installment(
    principal: f64,
    annual_rate_percent: f64,
    term_years: i32,
) -> Result<Money, CalculationError> {
    if !principal.is_finite() || principal <= 0.0 {
        return Err(CalculationError::NonPositivePrincipal);
    }
    if !annual_rate_percent.is_finite() || annual_rate_percent < 0.0 {
        return Err(CalculationError::NegativeRate);
    }
    if term_years <= 0 {
        return Err(CalculationError::NonPositiveTerm);
    }

    let periods = term_years
        .checked_mul(MONTHS_PER_YEAR)
        .ok_or(CalculationError::NonFinite)?;
    let monthly_rate = annual_rate_percent / 100.0 / f64::from(MONTHS_PER_YEAR);

    // (1 + r)^n - 1, computed without cancellation for tiny r.
    let growth_m1 = (f64::from(periods) * monthly_rate.ln_1p()).exp_m1();

    let emi = if growth_m1.is_normal() {
        principal * monthly_rate * (growth_m1 + 1.0) / growth_m1
    } else {
        principal / f64::from(periods)
    };

    let amount = Money::from_f64(emi).ok_or(CalculationError::NonFinite)?;
    if amount.is_negative() {
        return Err(CalculationError::NonFinite);
    }
    Ok(amount)
}
