//! Loan installment estimation for the financing programs.
//!
//! Uses the standard annuity formula with a monthly rate derived from the
//! program's annual rate:
//!
//! | Symbol | Meaning |
//! |--------|---------|
//! | `P`    | Principal (plafon) |
//! | `r`    | Monthly rate: `annual_rate_percent / 100 / 12` |
//! | `n`    | Term in months (tenor) |
//! | `A`    | Installment: `P × r / (1 − (1 + r)^−n)` |
//!
//! The same function serves every program; KUR and UMi differ only in the
//! rate passed in.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use umkm_core::calculations::monthly_installment;
//! use umkm_core::LoanQuoteInput;
//!
//! let quote = monthly_installment(&LoanQuoteInput {
//!     principal: dec!(150000000),
//!     annual_rate_percent: dec!(6),
//!     term_months: 36,
//! })
//! .unwrap();
//!
//! assert_eq!(quote.rounded_installment(), dec!(4563291));
//! ```

use rust_decimal::{Decimal, MathematicalOps};
use thiserror::Error;
use tracing::warn;

use crate::models::{LoanProduct, LoanQuote, LoanQuoteInput};

/// Placeholder shown instead of an installment when input is insufficient.
pub const INSUFFICIENT_INPUT_MESSAGE: &str = "Lengkapi plafon dan tenor";

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);
const PERCENT: Decimal = Decimal::ONE_HUNDRED;

/// Input that cannot produce a meaningful installment.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DegenerateInputError {
    /// The principal is zero, negative, or missing.
    #[error("principal must be positive, got {0}")]
    NonPositivePrincipal(Decimal),

    /// The term is zero or negative.
    #[error("term must be at least one month, got {0}")]
    NonPositiveTerm(i64),

    /// The annual rate is negative.
    #[error("annual rate must not be negative, got {0}")]
    NegativeRate(Decimal),

    /// The compounding factor does not fit in a decimal.
    #[error("rate and term are too large to evaluate")]
    OutOfRange,
}

impl DegenerateInputError {
    /// The message shown to the user in place of a figure.
    pub fn placeholder(&self) -> &'static str {
        INSUFFICIENT_INPUT_MESSAGE
    }
}

/// Computes the fixed monthly installment for a loan.
///
/// The returned [`LoanQuote`] keeps full precision; call
/// [`LoanQuote::rounded_installment`] for the displayed figure.
///
/// A zero rate yields a straight-line installment of `principal / term`.
///
/// # Errors
///
/// Returns [`DegenerateInputError`] when the principal or term is not
/// positive, the rate is negative, or the computation would overflow.
pub fn monthly_installment(input: &LoanQuoteInput) -> Result<LoanQuote, DegenerateInputError> {
    if input.principal <= Decimal::ZERO {
        warn!(principal = %input.principal, "installment requested without a principal");
        return Err(DegenerateInputError::NonPositivePrincipal(input.principal));
    }
    if input.term_months <= 0 {
        warn!(term_months = input.term_months, "installment requested without a term");
        return Err(DegenerateInputError::NonPositiveTerm(input.term_months));
    }
    if input.annual_rate_percent < Decimal::ZERO {
        return Err(DegenerateInputError::NegativeRate(input.annual_rate_percent));
    }

    let term = Decimal::from(input.term_months);
    let monthly_rate = monthly_rate(input.annual_rate_percent);

    let installment = if monthly_rate.is_zero() {
        input.principal / term
    } else {
        let factor = compound_factor(monthly_rate, input.term_months)?;
        let denominator = factor - Decimal::ONE;
        input
            .principal
            .checked_mul(monthly_rate)
            .and_then(|v| v.checked_mul(factor))
            .and_then(|v| v.checked_div(denominator))
            .ok_or(DegenerateInputError::OutOfRange)?
    };

    let total_repayment = installment
        .checked_mul(term)
        .ok_or(DegenerateInputError::OutOfRange)?;

    Ok(LoanQuote {
        monthly_installment: installment,
        total_repayment,
        total_interest: total_repayment - input.principal,
    })
}

/// Converts an annual percentage into a monthly fraction.
fn monthly_rate(annual_rate_percent: Decimal) -> Decimal {
    annual_rate_percent / PERCENT / MONTHS_PER_YEAR
}

/// `(1 + r)^n`, by squaring, so long terms cost a handful of multiplications.
fn compound_factor(
    monthly_rate: Decimal,
    term_months: i64,
) -> Result<Decimal, DegenerateInputError> {
    (Decimal::ONE + monthly_rate)
        .checked_powi(term_months)
        .ok_or(DegenerateInputError::OutOfRange)
}

/// Checks a requested plafon and tenor against a program's presets.
///
/// Returns every problem found; an empty list means the request fits.
pub fn check_against_product(
    product: &LoanProduct,
    principal: Decimal,
    term_months: i64,
) -> Vec<String> {
    let mut problems = Vec::new();

    if let Some(max) = product.max_principal {
        if principal > max {
            problems.push(format!(
                "Plafon {} melebihi batas maksimal {}.",
                super::common::format_rupiah(principal),
                super::common::format_rupiah(max)
            ));
        }
    }

    let tenor_allowed = product.tenor_options.is_empty()
        || product
            .tenor_options
            .iter()
            .any(|&option| i64::from(option) == term_months);
    if !tenor_allowed {
        let options = product
            .tenor_options
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        problems.push(format!(
            "Tenor {term_months} bulan tidak tersedia untuk {}. Pilihan: {options}.",
            product.name
        ));
    }

    problems
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn quote(
        principal: Decimal,
        rate: Decimal,
        term: i64,
    ) -> Result<LoanQuote, DegenerateInputError> {
        monthly_installment(&LoanQuoteInput {
            principal,
            annual_rate_percent: rate,
            term_months: term,
        })
    }

    fn umi() -> LoanProduct {
        LoanProduct {
            code: "umi".into(),
            name: "Pembiayaan Ultra Mikro (UMi)".into(),
            annual_rate_percent: Some(dec!(3)),
            tenor_options: vec![6, 9, 12, 18],
            max_principal: Some(dec!(20000000)),
            eligibility: Vec::new(),
        }
    }

    // =========================================================================
    // monthly_installment tests
    // =========================================================================

    #[test]
    fn kur_subsidised_rate_example() {
        let result = quote(dec!(150000000), dec!(6), 36).unwrap();

        assert_eq!(result.rounded_installment(), dec!(4563291));
    }

    #[test]
    fn umi_lower_rate_example() {
        let result = quote(dec!(8000000), dec!(3), 12).unwrap();

        assert_eq!(result.rounded_installment(), dec!(677550));
    }

    #[test]
    fn installment_keeps_unrounded_precision() {
        let result = quote(dec!(150000000), dec!(6), 36).unwrap();

        assert!(result.monthly_installment > dec!(4563290.6));
        assert!(result.monthly_installment < dec!(4563290.7));
    }

    #[test]
    fn totals_follow_from_installment() {
        let result = quote(dec!(150000000), dec!(6), 36).unwrap();

        assert_eq!(result.total_repayment, result.monthly_installment * dec!(36));
        assert_eq!(
            result.total_interest,
            result.total_repayment - dec!(150000000)
        );
        assert!(result.total_interest > Decimal::ZERO);
    }

    #[test]
    fn zero_principal_is_degenerate() {
        let result = quote(dec!(0), dec!(6), 36);

        assert_eq!(
            result,
            Err(DegenerateInputError::NonPositivePrincipal(dec!(0)))
        );
    }

    #[test]
    fn zero_term_is_degenerate() {
        let result = quote(dec!(150000000), dec!(6), 0);

        assert_eq!(result, Err(DegenerateInputError::NonPositiveTerm(0)));
    }

    #[test]
    fn degenerate_input_renders_placeholder() {
        let err = quote(dec!(0), dec!(0), 0).unwrap_err();

        assert_eq!(err.placeholder(), "Lengkapi plafon dan tenor");
    }

    #[test]
    fn negative_rate_is_rejected() {
        let result = quote(dec!(1000000), dec!(-1), 12);

        assert_eq!(result, Err(DegenerateInputError::NegativeRate(dec!(-1))));
    }

    #[test]
    fn zero_rate_is_straight_line() {
        let result = quote(dec!(1200000), dec!(0), 12).unwrap();

        assert_eq!(result.monthly_installment, dec!(100000));
        assert_eq!(result.total_interest, dec!(0));
    }

    #[test]
    fn absurd_rate_overflows_cleanly() {
        let result = quote(dec!(1000000), dec!(100000), 600);

        assert_eq!(result, Err(DegenerateInputError::OutOfRange));
    }

    #[test]
    fn huge_term_resolves_without_iterating_every_month() {
        let started = std::time::Instant::now();

        let tiny_rate = quote(dec!(1000000), dec!(0.0001), 200_000_000);
        let endless = quote(dec!(1000000), dec!(6), i64::MAX);

        assert!(started.elapsed() < std::time::Duration::from_secs(1));
        assert!(matches!(
            tiny_rate,
            Ok(_) | Err(DegenerateInputError::OutOfRange)
        ));
        assert_eq!(endless, Err(DegenerateInputError::OutOfRange));
    }

    // =========================================================================
    // check_against_product tests
    // =========================================================================

    #[test]
    fn request_within_presets_passes() {
        assert!(check_against_product(&umi(), dec!(8000000), 12).is_empty());
    }

    #[test]
    fn request_over_ceiling_and_off_tenor_reports_both() {
        let problems = check_against_product(&umi(), dec!(25000000), 24);

        assert_eq!(
            problems,
            vec![
                "Plafon Rp 25.000.000 melebihi batas maksimal Rp 20.000.000.".to_string(),
                "Tenor 24 bulan tidak tersedia untuk Pembiayaan Ultra Mikro (UMi). Pilihan: 6, 9, 12, 18."
                    .to_string(),
            ]
        );
    }
}
