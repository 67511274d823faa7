use chrono::{Months, NaiveDate};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::error::DollarMentoError;
use crate::types::{Money, Rate};
use crate::DollarMentoResult;

/// Convert an annual percentage (6.5 = 6.5%) into a monthly decimal rate.
pub fn monthly_rate(annual_rate_percent: Decimal) -> Rate {
    annual_rate_percent / dec!(100) / dec!(12)
}

/// Compute (1 + r)^n via iterative multiplication (avoids Decimal::powd drift).
pub fn compound(rate: Rate, n: u32) -> DollarMentoResult<Decimal> {
    let factor = Decimal::ONE + rate;
    let mut result = Decimal::ONE;
    for _ in 0..n {
        result = result
            .checked_mul(factor)
            .ok_or_else(|| DollarMentoError::NumericOverflow {
                context: format!("compounding {rate} over {n} periods"),
            })?;
    }
    Ok(result)
}

/// `a * b`, with overflow reported as [`DollarMentoError::NumericOverflow`].
pub fn checked_product(a: Decimal, b: Decimal, context: &str) -> DollarMentoResult<Decimal> {
    a.checked_mul(b)
        .ok_or_else(|| DollarMentoError::NumericOverflow {
            context: context.to_string(),
        })
}

/// Future-value annuity factor `((1 + r)^n - 1) / r`.
///
/// At a zero rate the factor degenerates to `n` (one unit per period, no growth).
pub fn annuity_factor(rate: Rate, n: u32) -> DollarMentoResult<Decimal> {
    if rate.is_zero() {
        return Ok(Decimal::from(n));
    }
    Ok((compound(rate, n)? - Decimal::ONE) / rate)
}

/// Level payment that retires `principal` over `nper` periods at `rate`.
///
/// Returned as a positive amount paid by the borrower.
pub fn annuity_payment(rate: Rate, nper: u32, principal: Money) -> DollarMentoResult<Money> {
    if nper == 0 {
        return Err(DollarMentoError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let factor = compound(rate, nper)?;
    let denominator = factor - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DollarMentoError::DivisionByZero {
            context: "annuity payment denominator".into(),
        });
    }

    let interest = checked_product(principal, rate, "annuity payment")?;
    let scaled = checked_product(interest, factor, "annuity payment")?;
    Ok(scaled / denominator)
}

/// Future value of `present_value` plus `payment` deposited at the end of
/// each of `nper` periods.
pub fn future_value(
    rate: Rate,
    nper: u32,
    payment: Money,
    present_value: Money,
) -> DollarMentoResult<Money> {
    let growth = checked_product(present_value, compound(rate, nper)?, "present value growth")?;
    let contributions = checked_product(payment, annuity_factor(rate, nper)?, "contributions")?;
    growth
        .checked_add(contributions)
        .ok_or_else(|| DollarMentoError::NumericOverflow {
            context: "future value".into(),
        })
}

/// Add a number of months to a date, clamping the day to the month's max.
pub fn add_months(date: NaiveDate, months: u32) -> NaiveDate {
    date.checked_add_months(Months::new(months)).unwrap_or(date)
}
