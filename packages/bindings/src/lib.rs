use napi::Result as NapiResult;
use napi_derive::napi;

use dollarmento_core::loan::amortization::{self, AmortizationInput, LoanParameters};
use dollarmento_core::savings::goals::{self, GoalInput};
use dollarmento_core::savings::projection::{self, SavingsParameters};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Loan
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_amortization(input_json: String) -> NapiResult<String> {
    let input: AmortizationInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::compute_amortization(&input.loan, &input.prepayment)
        .map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn standard_schedule(input_json: String) -> NapiResult<String> {
    let input: LoanParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = amortization::standard_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Savings
// ---------------------------------------------------------------------------

#[napi]
pub fn compute_savings_projection(input_json: String) -> NapiResult<String> {
    let input: SavingsParameters = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = projection::compute_savings_projection(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

#[napi]
pub fn months_to_reach_goal(input_json: String) -> NapiResult<String> {
    let input: GoalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let timeline = goals::months_to_reach_goal(&input.plan, input.goal).map_err(to_napi_error)?;
    serde_json::to_string(&timeline).map_err(to_napi_error)
}

#[napi]
pub fn required_monthly_contribution(input_json: String) -> NapiResult<String> {
    let input: GoalInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let years = input.years.unwrap_or(input.plan.years);
    let contribution = goals::required_monthly_contribution(&input.plan, input.goal, years)
        .map_err(to_napi_error)?;
    serde_json::to_string(&contribution).map_err(to_napi_error)
}
