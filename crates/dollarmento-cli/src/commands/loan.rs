use chrono::NaiveDate;
use clap::{Args, ValueEnum};
use rust_decimal::Decimal;
use serde_json::Value;

use dollarmento_core::loan::amortization::{
    self, AmortizationInput, LoanParameters, PrepaymentKind, PrepaymentPolicy,
};
use dollarmento_core::loan::summary::yearly_summary;

use crate::input;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum PrepaymentKindArg {
    Monthly,
    Yearly,
    LumpSum,
}

impl From<PrepaymentKindArg> for PrepaymentKind {
    fn from(kind: PrepaymentKindArg) -> Self {
        match kind {
            PrepaymentKindArg::Monthly => PrepaymentKind::Monthly,
            PrepaymentKindArg::Yearly => PrepaymentKind::Yearly,
            PrepaymentKindArg::LumpSum => PrepaymentKind::LumpSum,
        }
    }
}

/// Arguments for a loan amortization with prepayment
#[derive(Args)]
pub struct AmortizeArgs {
    /// Path to JSON/YAML request ({"loan": {...}, "prepayment": {...}})
    #[arg(long, conflicts_with_all = ["principal", "rate", "term_years"])]
    pub input: Option<String>,

    /// Amount borrowed
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 6.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan term in years
    #[arg(long)]
    pub term_years: Option<u32>,

    /// When extra payments are made
    #[arg(long, value_enum, default_value = "monthly")]
    pub prepayment_kind: PrepaymentKindArg,

    /// Extra payment amount
    #[arg(long, default_value = "0")]
    pub prepayment_amount: Decimal,

    /// First month (1-indexed) in which the extra payment may apply
    #[arg(long, default_value = "1")]
    pub start_month: u32,

    /// Loan start date (YYYY-MM-DD) for dated schedules
    #[arg(long)]
    pub start_date: Option<NaiveDate>,

    /// Replace the monthly schedule with yearly totals
    #[arg(long)]
    pub yearly: bool,
}

fn request_from_flags(args: &AmortizeArgs) -> Option<AmortizationInput> {
    Some(AmortizationInput {
        loan: LoanParameters {
            principal: args.principal?,
            annual_rate_percent: args.rate?,
            term_years: args.term_years?,
            start_date: args.start_date,
        },
        prepayment: PrepaymentPolicy {
            kind: args.prepayment_kind.into(),
            amount: args.prepayment_amount,
            start_month: args.start_month,
        },
    })
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let request = match request_from_flags(&args) {
        Some(r) => r,
        None => input::load_request(args.input.as_deref())?.ok_or(
            "--principal, --rate and --term-years, or --input <file> / stdin, required for amortize",
        )?,
    };
    log::debug!("amortize request: {:?}", request);

    let output = amortization::compute_amortization(&request.loan, &request.prepayment)?;
    log::debug!(
        "simulated {} months in {}us",
        output.result.months_to_payoff,
        output.metadata.computation_time_us
    );

    let years = args.yearly.then(|| yearly_summary(&output.result.entries));
    let mut value = serde_json::to_value(output)?;
    if let (Some(years), Some(result)) = (years, value["result"].as_object_mut()) {
        result.remove("entries");
        result.insert("yearly_summary".into(), serde_json::to_value(years)?);
    }
    Ok(value)
}
