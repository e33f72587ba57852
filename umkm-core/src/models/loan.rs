use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::round_whole;

/// Inputs to the installment calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuoteInput {
    pub principal: Decimal,
    /// Annual interest rate in percent (`6` means 6% per year).
    pub annual_rate_percent: Decimal,
    pub term_months: i64,
}

/// A computed installment plan. Values are unrounded; round only for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanQuote {
    pub monthly_installment: Decimal,
    pub total_repayment: Decimal,
    pub total_interest: Decimal,
}

impl LoanQuote {
    /// The installment rounded to the nearest whole rupiah.
    pub fn rounded_installment(&self) -> Decimal {
        round_whole(self.monthly_installment)
    }
}
