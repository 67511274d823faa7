//! Inverse savings problems: time to a goal and contribution for a goal.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, MathematicalOps};
use serde::{Deserialize, Serialize};

use super::projection::{validate_amounts, SavingsParameters};
use crate::error::DollarMentoError;
use crate::time_value::{checked_product, compound};
use crate::types::Money;
use crate::DollarMentoResult;

/// Answer to "how long until I reach my goal?".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "months", rename_all = "snake_case")]
pub enum GoalTimeline {
    /// The initial amount already covers the goal.
    AlreadyMet,
    /// Fractional months of contributions needed.
    Months(Decimal),
    /// No finite solution under the given contribution.
    Unreachable,
}

impl GoalTimeline {
    pub fn months(&self) -> Option<Decimal> {
        match self {
            GoalTimeline::AlreadyMet => Some(Decimal::ZERO),
            GoalTimeline::Months(m) => Some(*m),
            GoalTimeline::Unreachable => None,
        }
    }

    /// Whole contribution months, rounded up.
    pub fn whole_months(&self) -> Option<u32> {
        self.months().and_then(|m| m.ceil().to_u32())
    }
}

/// Savings plan plus a target, as read from a JSON/YAML request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalInput {
    pub plan: SavingsParameters,
    pub goal: Money,
    /// Horizon for the required-contribution solve; defaults to `plan.years`.
    #[serde(default)]
    pub years: Option<u32>,
}

fn validate_goal(goal: Money) -> DollarMentoResult<()> {
    if goal < Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "goal_amount".into(),
            reason: "goal_amount must be >= 0".into(),
        });
    }
    Ok(())
}

/// Months of contributions until the balance reaches `goal`.
///
/// Solves `n = ln(1 + (goal - initial) * m / contribution) / ln(1 + m)`.
/// The initial deposit counts toward the goal but its own growth is not
/// credited. At a zero rate the answer is linear.
pub fn months_to_reach_goal(
    params: &SavingsParameters,
    goal: Money,
) -> DollarMentoResult<GoalTimeline> {
    validate_amounts(params)?;
    validate_goal(goal)?;

    if goal <= params.initial_amount {
        return Ok(GoalTimeline::AlreadyMet);
    }
    if params.monthly_contribution <= Decimal::ZERO {
        return Ok(GoalTimeline::Unreachable);
    }

    let shortfall = goal - params.initial_amount;
    let rate = params.monthly_rate();
    if rate.is_zero() {
        return Ok(GoalTimeline::Months(shortfall / params.monthly_contribution));
    }

    let argument = Decimal::ONE + shortfall * rate / params.monthly_contribution;
    let (Some(numerator), Some(denominator)) =
        (argument.checked_ln(), (Decimal::ONE + rate).checked_ln())
    else {
        return Ok(GoalTimeline::Unreachable);
    };
    if denominator <= Decimal::ZERO {
        return Ok(GoalTimeline::Months(shortfall / params.monthly_contribution));
    }

    Ok(GoalTimeline::Months(numerator / denominator))
}

/// Monthly contribution that grows the plan to exactly `goal` after `years`.
///
/// Zero when the initial amount's growth alone reaches the goal.
pub fn required_monthly_contribution(
    params: &SavingsParameters,
    goal: Money,
    years: u32,
) -> DollarMentoResult<Money> {
    validate_amounts(params)?;
    validate_goal(goal)?;
    if years == 0 {
        return Err(DollarMentoError::InvalidInput {
            field: "years".into(),
            reason: "years must be > 0".into(),
        });
    }

    let months = years.saturating_mul(12);
    let rate = params.monthly_rate();
    let growth = compound(rate, months)?;
    let fv_principal = checked_product(params.initial_amount, growth, "initial amount growth")?;

    if goal <= fv_principal {
        return Ok(Decimal::ZERO);
    }

    let remaining = goal - fv_principal;
    if rate.is_zero() {
        return Ok(remaining / Decimal::from(months));
    }

    let denominator = growth - Decimal::ONE;
    if denominator.is_zero() {
        return Err(DollarMentoError::DivisionByZero {
            context: "required contribution annuity factor".into(),
        });
    }
    Ok(remaining * rate / denominator)
}
