//! Fixed-rate loan amortization with borrower prepayments.
//!
//! Simulates the loan month by month under a [`PrepaymentPolicy`] and
//! compares the outcome with the contractual schedule. All math in
//! `rust_decimal::Decimal`.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::error::DollarMentoError;
use crate::time_value::{add_months, annuity_payment, checked_product, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Rate, Years};
use crate::DollarMentoResult;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Balance at or below which the loan is considered fully paid.
pub const BALANCE_EPSILON: Decimal = dec!(0.01);

/// The simulation never runs past this multiple of the contractual term.
const SAFETY_CAP_MULTIPLE: u32 = 2;

// ---------------------------------------------------------------------------
// Input types
// ---------------------------------------------------------------------------

/// Loan terms as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed.
    pub principal: Money,
    /// Annual interest rate as a percentage (6.5 = 6.5%).
    pub annual_rate_percent: Decimal,
    /// Contractual term in years.
    pub term_years: u32,
    /// Loan origination date. The first payment falls one month later.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

impl LoanParameters {
    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate_percent)
    }

    pub fn total_payments(&self) -> u32 {
        self.term_years.saturating_mul(12)
    }
}

/// When a prepayment is made.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PrepaymentKind {
    /// Every month from `start_month` onward.
    Monthly,
    /// Every twelfth month (12, 24, ...) at or after `start_month`.
    Yearly,
    /// Once, in `start_month` only.
    #[serde(alias = "lumpSum")]
    LumpSum,
}

/// Extra principal the borrower pays on top of the scheduled payment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PrepaymentPolicy {
    pub kind: PrepaymentKind,
    pub amount: Money,
    /// 1-indexed month of the first possible prepayment.
    pub start_month: u32,
}

impl PrepaymentPolicy {
    /// A policy that never pays anything extra.
    pub fn none() -> Self {
        PrepaymentPolicy {
            kind: PrepaymentKind::Monthly,
            amount: Decimal::ZERO,
            start_month: 1,
        }
    }

    /// Whether the policy fires in the given 1-indexed month.
    pub fn applies_in(&self, month: u32) -> bool {
        match self.kind {
            PrepaymentKind::Monthly => month >= self.start_month,
            PrepaymentKind::Yearly => month % 12 == 0 && month >= self.start_month,
            PrepaymentKind::LumpSum => month == self.start_month,
        }
    }
}

/// Loan plus prepayment plan, as read from a JSON/YAML request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    pub loan: LoanParameters,
    #[serde(default = "PrepaymentPolicy::none")]
    pub prepayment: PrepaymentPolicy,
}

// ---------------------------------------------------------------------------
// Output types
// ---------------------------------------------------------------------------

/// One simulated month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub month: u32,
    /// Remaining principal after this month's payment.
    pub balance: Money,
    /// Scheduled payment plus any extra payment.
    pub total_payment: Money,
    pub interest_portion: Money,
    /// Scheduled principal plus extra, never more than the opening balance.
    pub principal_portion: Money,
    pub extra_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date: Option<NaiveDate>,
}

/// Outcome of a prepayment simulation, with the contractual baseline for comparison.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationResult {
    pub entries: Vec<AmortizationEntry>,
    /// Contractual monthly payment (principal + interest).
    pub standard_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    /// Sum of all extra payments actually applied.
    pub extra_paid: Money,
    pub months_to_payoff: u32,
    /// Contractual payments avoided by prepaying.
    pub months_saved: u32,
    /// `months_saved` expressed in years.
    pub time_saved_years: Years,
    /// Interest over the contractual schedule with no prepayment.
    pub original_total_interest: Money,
    pub interest_saved: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payoff_date: Option<NaiveDate>,
    /// True when the simulation stopped at twice the contractual term.
    pub hit_safety_cap: bool,
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate_loan(params: &LoanParameters) -> DollarMentoResult<()> {
    if params.principal <= Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "principal".into(),
            reason: "principal must be > 0".into(),
        });
    }
    if params.term_years == 0 {
        return Err(DollarMentoError::InvalidInput {
            field: "term_years".into(),
            reason: "term_years must be > 0".into(),
        });
    }
    if params.annual_rate_percent < Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "annual_rate_percent".into(),
            reason: "annual_rate_percent must be >= 0".into(),
        });
    }
    Ok(())
}

fn validate_policy(policy: &PrepaymentPolicy) -> DollarMentoResult<()> {
    if policy.amount < Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "amount".into(),
            reason: "prepayment amount must be >= 0".into(),
        });
    }
    if policy.start_month == 0 {
        return Err(DollarMentoError::InvalidInput {
            field: "start_month".into(),
            reason: "start_month is 1-indexed and must be >= 1".into(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Contractual monthly payment from the annuity formula.
///
/// A 0% loan is repaid linearly: `principal / total_payments`.
pub fn compute_standard_payment(params: &LoanParameters) -> DollarMentoResult<Money> {
    validate_loan(params)?;
    annuity_payment(
        params.monthly_rate(),
        params.total_payments(),
        params.principal,
    )
}

/// Run the loan month by month under `policy` until it is paid off.
pub fn simulate(
    params: &LoanParameters,
    policy: &PrepaymentPolicy,
) -> DollarMentoResult<AmortizationResult> {
    let payment = compute_standard_payment(params)?;
    validate_policy(policy)?;

    let rate = params.monthly_rate();
    let total_payments = params.total_payments();
    let max_month = total_payments.saturating_mul(SAFETY_CAP_MULTIPLE);

    let mut entries: Vec<AmortizationEntry> = Vec::with_capacity(total_payments as usize);
    let mut balance = params.principal;
    let mut total_paid = Decimal::ZERO;
    let mut total_interest = Decimal::ZERO;
    let mut extra_paid = Decimal::ZERO;
    let mut month: u32 = 1;

    while balance > BALANCE_EPSILON && month <= max_month {
        let interest = checked_product(balance, rate, "monthly interest")?;
        let scheduled_principal = (payment - interest).min(balance);

        let extra = if policy.applies_in(month) {
            policy
                .amount
                .min(balance - scheduled_principal)
                .max(Decimal::ZERO)
        } else {
            Decimal::ZERO
        };

        let principal_portion = scheduled_principal + extra;
        balance = (balance - principal_portion).max(Decimal::ZERO);

        total_paid += payment + extra;
        total_interest += interest;
        extra_paid += extra;

        entries.push(AmortizationEntry {
            month,
            balance,
            total_payment: payment + extra,
            interest_portion: interest,
            principal_portion,
            extra_payment: extra,
            payment_date: params.start_date.map(|d| add_months(d, month)),
        });

        month += 1;
    }

    let months_to_payoff = month - 1;
    let contractual_total =
        checked_product(payment, Decimal::from(total_payments), "contractual payments")?;
    let original_total_interest = contractual_total - params.principal;

    Ok(AmortizationResult {
        payoff_date: entries.last().and_then(|e| e.payment_date),
        standard_payment: payment,
        total_paid,
        total_interest,
        extra_paid,
        months_to_payoff,
        months_saved: total_payments.saturating_sub(months_to_payoff),
        time_saved_years: (Decimal::from(total_payments) - Decimal::from(months_to_payoff))
            / dec!(12),
        original_total_interest,
        interest_saved: original_total_interest - total_interest,
        hit_safety_cap: balance > BALANCE_EPSILON,
        entries,
    })
}

/// The contractual schedule with no prepayment.
pub fn standard_schedule(params: &LoanParameters) -> DollarMentoResult<AmortizationResult> {
    simulate(params, &PrepaymentPolicy::none())
}

/// Simulate a prepayment plan and wrap it in the standard output envelope.
pub fn compute_amortization(
    params: &LoanParameters,
    policy: &PrepaymentPolicy,
) -> DollarMentoResult<ComputationOutput<AmortizationResult>> {
    let start = Instant::now();
    let result = simulate(params, policy)?;
    let warnings = prepayment_warnings(policy, &result);

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Fixed-rate amortization with prepayment (monthly simulation)",
        &serde_json::json!({
            "principal": params.principal.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "term_years": params.term_years,
            "prepayment_kind": policy.kind,
            "prepayment_amount": policy.amount.to_string(),
            "prepayment_start_month": policy.start_month,
            "payoff_threshold": BALANCE_EPSILON.to_string(),
        }),
        warnings,
        elapsed,
        result,
    ))
}

fn prepayment_warnings(policy: &PrepaymentPolicy, result: &AmortizationResult) -> Vec<String> {
    let mut warnings = Vec::new();

    if policy.amount > Decimal::ZERO && result.extra_paid.is_zero() {
        warnings.push(format!(
            "Prepayment starting in month {} was never applied: the loan is paid off in month {}",
            policy.start_month, result.months_to_payoff
        ));
    }

    if result.hit_safety_cap {
        warnings.push(format!(
            "Simulation stopped after {} months with {} still outstanding",
            result.months_to_payoff,
            result.entries.last().map(|e| e.balance).unwrap_or_default()
        ));
    }

    warnings
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn mortgage() -> LoanParameters {
        LoanParameters {
            principal: dec!(250_000),
            annual_rate_percent: dec!(6.5),
            term_years: 30,
            start_date: None,
        }
    }

    fn policy(kind: PrepaymentKind, amount: Decimal, start_month: u32) -> PrepaymentPolicy {
        PrepaymentPolicy {
            kind,
            amount,
            start_month,
        }
    }

    #[test]
    fn test_standard_payment_30y_mortgage() {
        // 250k at 6.5% over 30 years: ~$1,580.17
        let pmt = compute_standard_payment(&mortgage()).unwrap();
        assert!((pmt - dec!(1580.17)).abs() < dec!(0.01), "pmt = {pmt}");
    }

    #[test]
    fn test_validation_rejects_bad_loans() {
        let mut p = mortgage();
        p.principal = Decimal::ZERO;
        assert!(compute_standard_payment(&p).is_err());

        let mut p = mortgage();
        p.term_years = 0;
        assert!(compute_standard_payment(&p).is_err());

        let mut p = mortgage();
        p.annual_rate_percent = dec!(-1);
        let err = compute_standard_payment(&p).unwrap_err();
        match err {
            DollarMentoError::InvalidInput { field, .. } => {
                assert_eq!(field, "annual_rate_percent")
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_validation_rejects_bad_policy() {
        let bad_start = policy(PrepaymentKind::Monthly, dec!(100), 0);
        assert!(simulate(&mortgage(), &bad_start).is_err());

        let negative = policy(PrepaymentKind::Monthly, dec!(-5), 1);
        assert!(simulate(&mortgage(), &negative).is_err());
    }

    #[test]
    fn test_policy_firing_rules() {
        let monthly = policy(PrepaymentKind::Monthly, dec!(1), 3);
        assert!(!monthly.applies_in(2));
        assert!(monthly.applies_in(3));
        assert!(monthly.applies_in(40));

        let yearly = policy(PrepaymentKind::Yearly, dec!(1), 13);
        assert!(!yearly.applies_in(12));
        assert!(!yearly.applies_in(13));
        assert!(yearly.applies_in(24));

        let lump = policy(PrepaymentKind::LumpSum, dec!(1), 6);
        assert!(lump.applies_in(6));
        assert!(!lump.applies_in(7));
    }

    #[test]
    fn test_first_month_interest() {
        let result = simulate(&mortgage(), &PrepaymentPolicy::none()).unwrap();
        let first = &result.entries[0];
        assert!((first.interest_portion - dec!(1354.17)).abs() < dec!(0.01));
        assert_eq!(first.extra_payment, Decimal::ZERO);
    }

    #[test]
    fn test_final_payment_clipped_to_balance() {
        let p = LoanParameters {
            principal: dec!(1_000),
            annual_rate_percent: dec!(5),
            term_years: 1,
            start_date: None,
        };
        let result = simulate(&p, &policy(PrepaymentKind::LumpSum, dec!(5_000), 2)).unwrap();
        // Month 2 lump sum clears everything that remains.
        assert_eq!(result.months_to_payoff, 2);
        let last = result.entries.last().unwrap();
        assert!(last.balance < dec!(0.000001), "balance = {}", last.balance);
        assert!(last.extra_payment < dec!(1_000));
        assert_eq!(result.extra_paid, last.extra_payment);
    }

    #[test]
    fn test_payment_dates_follow_start_date() {
        let mut p = mortgage();
        p.start_date = NaiveDate::from_ymd_opt(2024, 1, 15);
        let result = standard_schedule(&p).unwrap();
        assert_eq!(
            result.entries[0].payment_date,
            NaiveDate::from_ymd_opt(2024, 2, 15)
        );
        assert_eq!(result.payoff_date, NaiveDate::from_ymd_opt(2054, 1, 15));
    }

    #[test]
    fn test_unused_lump_sum_warns() {
        let p = LoanParameters {
            principal: dec!(10_000),
            annual_rate_percent: dec!(4),
            term_years: 1,
            start_date: None,
        };
        let late_lump = policy(PrepaymentKind::LumpSum, dec!(500), 20);
        let out = compute_amortization(&p, &late_lump).unwrap();
        assert_eq!(out.result.extra_paid, Decimal::ZERO);
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].contains("never applied"));
    }

    #[test]
    fn test_payment_overflow_is_an_error() {
        // 1200% a year is 100% a month; 2^12 times the principal exceeds Decimal.
        let p = LoanParameters {
            principal: dec!(50_000_000_000_000_000_000_000_000),
            annual_rate_percent: dec!(1200),
            term_years: 1,
            start_date: None,
        };
        let err = simulate(&p, &PrepaymentPolicy::none()).unwrap_err();
        assert!(matches!(err, DollarMentoError::NumericOverflow { .. }));
    }

    #[test]
    fn test_envelope_metadata() {
        let out = compute_amortization(&mortgage(), &PrepaymentPolicy::none()).unwrap();
        assert!(out.warnings.is_empty());
        assert_eq!(out.metadata.precision, "rust_decimal_128bit");
        assert_eq!(out.assumptions["term_years"], 30);
    }
}
