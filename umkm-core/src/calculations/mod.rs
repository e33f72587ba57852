//! Financial calculations for the financing programs.
//!
//! This module provides the installment estimator shared by every loan
//! program, the yes/no eligibility questionnaire, and common rounding and
//! formatting helpers.

pub mod amortization;
pub mod common;
pub mod eligibility;

pub use amortization::{
    DegenerateInputError, INSUFFICIENT_INPUT_MESSAGE, check_against_product, monthly_installment,
};
pub use eligibility::{Answer, EligibilityOutcome, EligibilityVerdict, assess};
