use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use dollarmento_core::savings::goals::{self, GoalInput};
use dollarmento_core::savings::projection::{self, CompoundingFrequency, SavingsParameters};

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompoundingArg {
    Daily,
    Monthly,
    Quarterly,
    Annually,
}

impl From<CompoundingArg> for CompoundingFrequency {
    fn from(freq: CompoundingArg) -> Self {
        match freq {
            CompoundingArg::Daily => CompoundingFrequency::Daily,
            CompoundingArg::Monthly => CompoundingFrequency::Monthly,
            CompoundingArg::Quarterly => CompoundingFrequency::Quarterly,
            CompoundingArg::Annually => CompoundingFrequency::Annually,
        }
    }
}

/// Savings plan flags shared by the savings and goal commands
#[derive(Args)]
pub struct PlanArgs {
    /// Starting balance
    #[arg(long, default_value = "0")]
    pub initial: Decimal,

    /// Contribution at the end of each month
    #[arg(long, default_value = "0")]
    pub monthly: Decimal,

    /// Annual interest rate in percent (e.g. 2.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Plan horizon in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Compounding frequency (reported rates only)
    #[arg(long, value_enum, default_value = "monthly")]
    pub compounding: CompoundingArg,
}

impl PlanArgs {
    fn to_params(&self, goal: Option<Decimal>) -> Option<SavingsParameters> {
        Some(SavingsParameters {
            initial_amount: self.initial,
            monthly_contribution: self.monthly,
            annual_rate_percent: self.rate?,
            years: self.years?,
            compounding_frequency: self.compounding.into(),
            goal_amount: goal,
        })
    }
}

/// Arguments for a savings projection
#[derive(Args)]
pub struct SavingsArgs {
    /// Path to JSON/YAML savings plan
    #[arg(long, conflicts_with_all = ["rate", "years", "goal"])]
    pub input: Option<String>,

    #[command(flatten)]
    pub plan: PlanArgs,

    /// Optional savings target
    #[arg(long)]
    pub goal: Option<Decimal>,
}

/// Arguments for the goal solvers
#[derive(Args)]
pub struct GoalArgs {
    /// Path to JSON/YAML request ({"plan": {...}, "goal": ..., "years": ...})
    #[arg(long, conflicts_with_all = ["rate", "years", "goal"])]
    pub input: Option<String>,

    #[command(flatten)]
    pub plan: PlanArgs,

    /// Savings target
    #[arg(long)]
    pub goal: Option<Decimal>,
}

fn goal_request(args: &GoalArgs) -> Result<GoalInput, Box<dyn std::error::Error>> {
    if let (Some(plan), Some(goal)) = (args.plan.to_params(None), args.goal) {
        return Ok(GoalInput {
            years: Some(plan.years),
            plan,
            goal,
        });
    }
    Ok(input::load_request(args.input.as_deref())?
        .ok_or("--goal, --rate and --years, or --input <file> / stdin, required")?)
}

pub fn run_savings(args: SavingsArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let params = match args.plan.to_params(args.goal) {
        Some(p) => p,
        None => input::load_request(args.input.as_deref())?
            .ok_or("--rate and --years, or --input <file> / stdin, required for savings")?,
    };
    log::debug!("savings request: {:?}", params);

    let output = projection::compute_savings_projection(&params)?;
    Ok(serde_json::to_value(output)?)
}

pub fn run_goal_months(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = goal_request(&args)?;
    log::debug!("goal-months request: {:?}", request);

    let timeline = goals::months_to_reach_goal(&request.plan, request.goal)?;
    Ok(serde_json::json!({
        "result": {
            "goal": request.goal,
            "timeline": timeline,
            "whole_months": timeline.whole_months(),
        }
    }))
}

pub fn run_goal_contribution(args: GoalArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = goal_request(&args)?;
    log::debug!("goal-contribution request: {:?}", request);

    let years = request.years.unwrap_or(request.plan.years);
    let contribution = goals::required_monthly_contribution(&request.plan, request.goal, years)?;
    Ok(serde_json::json!({
        "result": {
            "goal": request.goal,
            "years": years,
            "required_monthly_contribution": contribution.round_dp(2),
        }
    }))
}
