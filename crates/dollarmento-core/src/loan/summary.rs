//! Year-level roll-up of a monthly amortization schedule, used for charts.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::amortization::AmortizationEntry;
use crate::types::Money;

/// Totals for one loan year (months 1-12, 13-24, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub extra_paid: Money,
    pub ending_balance: Money,
}

/// Aggregate entries into loan years. The last year may be partial.
pub fn yearly_summary(entries: &[AmortizationEntry]) -> Vec<AmortizationYear> {
    entries
        .chunks(12)
        .enumerate()
        .map(|(i, months)| AmortizationYear {
            year: i as u32 + 1,
            interest_paid: months.iter().map(|e| e.interest_portion).sum(),
            principal_paid: months.iter().map(|e| e.principal_portion).sum(),
            extra_paid: months.iter().map(|e| e.extra_payment).sum(),
            ending_balance: months.last().map(|e| e.balance).unwrap_or(Decimal::ZERO),
        })
        .collect()
}
