//! Savings growth under monthly compounding with end-of-month contributions.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::goals::{months_to_reach_goal, required_monthly_contribution, GoalTimeline};
use crate::error::DollarMentoError;
use crate::time_value::{checked_product, compound, future_value, monthly_rate};
use crate::types::{with_metadata, ComputationOutput, Money, Rate};
use crate::DollarMentoResult;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How often interest is credited. Only the reported rates depend on it;
/// the projection itself always compounds monthly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompoundingFrequency {
    Daily,
    #[default]
    Monthly,
    Quarterly,
    Annually,
}

impl CompoundingFrequency {
    pub fn periods_per_year(self) -> u32 {
        match self {
            CompoundingFrequency::Daily => 365,
            CompoundingFrequency::Monthly => 12,
            CompoundingFrequency::Quarterly => 4,
            CompoundingFrequency::Annually => 1,
        }
    }
}

/// Savings plan as entered by the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsParameters {
    pub initial_amount: Money,
    pub monthly_contribution: Money,
    /// Annual interest rate as a percentage (2.5 = 2.5%).
    pub annual_rate_percent: Decimal,
    pub years: u32,
    #[serde(default)]
    pub compounding_frequency: CompoundingFrequency,
    #[serde(default)]
    pub goal_amount: Option<Money>,
}

impl SavingsParameters {
    pub fn monthly_rate(&self) -> Rate {
        monthly_rate(self.annual_rate_percent)
    }

    pub fn total_months(&self) -> u32 {
        self.years.saturating_mul(12)
    }
}

/// Balance snapshot at the end of a plan year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsYear {
    pub year: u32,
    pub total_value: Money,
    pub total_contributed: Money,
    pub interest_earned: Money,
}

/// Full projection of a savings plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavingsProjection {
    pub total_future_value: Money,
    pub total_contributions: Money,
    pub total_interest_earned: Money,
    /// Present only when a goal amount is set.
    pub months_to_goal: Option<GoalTimeline>,
    pub required_monthly_contribution_for_goal: Option<Money>,
    /// Year 0 through `years`, inclusive.
    pub series: Vec<SavingsYear>,
    /// Annual rate divided by the selected compounding periods.
    pub periodic_rate: Rate,
    /// Annual yield implied by the selected compounding frequency.
    pub effective_annual_rate: Rate,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub(crate) fn validate_amounts(params: &SavingsParameters) -> DollarMentoResult<()> {
    if params.initial_amount < Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "initial_amount".into(),
            reason: "initial_amount must be >= 0".into(),
        });
    }
    if params.monthly_contribution < Decimal::ZERO {
        return Err(DollarMentoError::InvalidInput {
            field: "monthly_contribution".into(),
            reason: "monthly_contribution must be >= 0".into(),
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

fn validate(params: &SavingsParameters) -> DollarMentoResult<()> {
    validate_amounts(params)?;
    if params.years == 0 {
        return Err(DollarMentoError::InvalidInput {
            field: "years".into(),
            reason: "years must be > 0".into(),
        });
    }
    if params.goal_amount.is_some_and(|g| g < Decimal::ZERO) {
        return Err(DollarMentoError::InvalidInput {
            field: "goal_amount".into(),
            reason: "goal_amount must be >= 0".into(),
        });
    }
    Ok(())
}

/// Value and cumulative contributions after `months` months.
fn snapshot(params: &SavingsParameters, months: u32) -> DollarMentoResult<(Money, Money)> {
    let value = future_value(
        params.monthly_rate(),
        months,
        params.monthly_contribution,
        params.initial_amount,
    )?;
    let deposits = checked_product(
        params.monthly_contribution,
        Decimal::from(months),
        "cumulative contributions",
    )?;
    Ok((value, params.initial_amount + deposits))
}

// ---------------------------------------------------------------------------
// Core functions
// ---------------------------------------------------------------------------

/// Project the plan to its horizon, with a yearly series and goal analysis.
pub fn project_future_value(params: &SavingsParameters) -> DollarMentoResult<SavingsProjection> {
    validate(params)?;

    let (total_future_value, total_contributions) = snapshot(params, params.total_months())?;

    let mut series = Vec::with_capacity(params.years as usize + 1);
    for year in 0..=params.years {
        let (total_value, total_contributed) = snapshot(params, year * 12)?;
        series.push(SavingsYear {
            year,
            total_value,
            total_contributed,
            interest_earned: total_value - total_contributed,
        });
    }

    let (months_to_goal, required_contribution) = match params.goal_amount {
        Some(goal) => (
            Some(months_to_reach_goal(params, goal)?),
            Some(required_monthly_contribution(params, goal, params.years)?),
        ),
        None => (None, None),
    };

    let periods = params.compounding_frequency.periods_per_year();
    let periodic_rate = params.annual_rate_percent / dec!(100) / Decimal::from(periods);
    let effective_annual_rate = compound(periodic_rate, periods)? - Decimal::ONE;

    Ok(SavingsProjection {
        total_future_value,
        total_contributions,
        total_interest_earned: total_future_value - total_contributions,
        months_to_goal,
        required_monthly_contribution_for_goal: required_contribution,
        series,
        periodic_rate,
        effective_annual_rate,
    })
}

/// Project a savings plan and wrap it in the standard output envelope.
pub fn compute_savings_projection(
    params: &SavingsParameters,
) -> DollarMentoResult<ComputationOutput<SavingsProjection>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let projection = project_future_value(params)?;

    if params.compounding_frequency != CompoundingFrequency::Monthly {
        warnings.push(format!(
            "{:?} compounding affects the reported rates only; growth is compounded monthly",
            params.compounding_frequency
        ));
    }
    if projection.months_to_goal == Some(GoalTimeline::Unreachable) {
        warnings.push("Goal cannot be reached without a positive monthly contribution".into());
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Compound growth (monthly compounding, end-of-month contributions)",
        &serde_json::json!({
            "initial_amount": params.initial_amount.to_string(),
            "monthly_contribution": params.monthly_contribution.to_string(),
            "annual_rate_percent": params.annual_rate_percent.to_string(),
            "years": params.years,
            "compounding_frequency": params.compounding_frequency,
            "goal_amount": params.goal_amount.map(|g| g.to_string()),
        }),
        warnings,
        elapsed,
        projection,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn plan() -> SavingsParameters {
        SavingsParameters {
            initial_amount: dec!(1_000),
            monthly_contribution: dec!(200),
            annual_rate_percent: dec!(2.5),
            years: 5,
            compounding_frequency: CompoundingFrequency::Monthly,
            goal_amount: None,
        }
    }

    #[test]
    fn test_series_starts_at_initial_amount() {
        let p = project_future_value(&plan()).unwrap();
        assert_eq!(p.series.len(), 6);
        assert_eq!(p.series[0].year, 0);
        assert_eq!(p.series[0].total_value, dec!(1_000));
        assert_eq!(p.series[0].interest_earned, Decimal::ZERO);
    }

    #[test]
    fn test_last_series_point_matches_totals() {
        let p = project_future_value(&plan()).unwrap();
        let last = p.series.last().unwrap();
        assert_eq!(last.total_value, p.total_future_value);
        assert_eq!(last.total_contributed, p.total_contributions);
    }

    #[test]
    fn test_zero_rate_is_linear() {
        let mut params = plan();
        params.annual_rate_percent = Decimal::ZERO;
        let p = project_future_value(&params).unwrap();
        assert_eq!(p.total_future_value, dec!(13_000));
        assert_eq!(p.total_interest_earned, Decimal::ZERO);
    }

    #[test]
    fn test_reported_rates_by_frequency() {
        let mut params = plan();
        params.annual_rate_percent = dec!(12);

        params.compounding_frequency = CompoundingFrequency::Annually;
        let annual = project_future_value(&params).unwrap();
        assert_eq!(annual.periodic_rate, dec!(0.12));
        assert_eq!(annual.effective_annual_rate, dec!(0.12));

        params.compounding_frequency = CompoundingFrequency::Quarterly;
        let quarterly = project_future_value(&params).unwrap();
        assert_eq!(quarterly.periodic_rate, dec!(0.03));
        assert!(quarterly.effective_annual_rate > annual.effective_annual_rate);

        // Growth itself does not depend on the selected frequency.
        assert_eq!(quarterly.total_future_value, annual.total_future_value);
    }

    #[test]
    fn test_validation() {
        let mut params = plan();
        params.years = 0;
        assert!(project_future_value(&params).is_err());

        let mut params = plan();
        params.monthly_contribution = dec!(-1);
        assert!(project_future_value(&params).is_err());

        let mut params = plan();
        params.goal_amount = Some(dec!(-10));
        assert!(project_future_value(&params).is_err());
    }

    #[test]
    fn test_frequency_warning() {
        let mut params = plan();
        params.compounding_frequency = CompoundingFrequency::Daily;
        let out = compute_savings_projection(&params).unwrap();
        assert_eq!(out.warnings.len(), 1);
        assert!(out.warnings[0].starts_with("Daily"));
    }

    #[test]
    fn test_goal_fields_only_with_goal() {
        let p = project_future_value(&plan()).unwrap();
        assert!(p.months_to_goal.is_none());
        assert!(p.required_monthly_contribution_for_goal.is_none());

        let mut params = plan();
        params.goal_amount = Some(dec!(20_000));
        let p = project_future_value(&params).unwrap();
        assert!(matches!(p.months_to_goal, Some(GoalTimeline::Months(_))));
        assert!(p.required_monthly_contribution_for_goal.unwrap() > dec!(200));
    }

    #[test]
    fn test_oversized_horizon_is_an_overflow_error() {
        let params = SavingsParameters {
            initial_amount: dec!(10_000),
            monthly_contribution: Decimal::ZERO,
            annual_rate_percent: dec!(30),
            years: 200,
            compounding_frequency: CompoundingFrequency::Monthly,
            goal_amount: None,
        };
        let err = project_future_value(&params).unwrap_err();
        assert!(matches!(err, DollarMentoError::NumericOverflow { .. }));
    }
}
