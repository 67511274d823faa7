mod commands;
mod input;
mod output;

use clap::{Parser, Subcommand, ValueEnum};
use colored::Colorize;
use std::process;

use commands::loan::AmortizeArgs;
use commands::savings::{GoalArgs, SavingsArgs};

/// DollarMento loan and savings calculators
#[derive(Parser)]
#[command(
    name = "dmento",
    version,
    about = "DollarMento loan and savings calculators",
    long_about = "Loan prepayment and compound savings calculators with decimal precision. \
                  Supports amortization under monthly, yearly and lump-sum prepayments, \
                  savings projections, and time-to-goal / contribution-for-goal solves."
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Output format
    #[arg(long, default_value = "json", global = true)]
    output: OutputFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Simulate a fixed-rate loan with optional prepayments
    Amortize(AmortizeArgs),
    /// Project savings growth with monthly contributions
    Savings(SavingsArgs),
    /// Months of contributions needed to reach a goal
    GoalMonths(GoalArgs),
    /// Monthly contribution needed to reach a goal in a given horizon
    GoalContribution(GoalArgs),
    /// Print version information
    Version,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Csv,
    Minimal,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result: Result<serde_json::Value, Box<dyn std::error::Error>> = match cli.command {
        Commands::Amortize(args) => commands::loan::run_amortize(args),
        Commands::Savings(args) => commands::savings::run_savings(args),
        Commands::GoalMonths(args) => commands::savings::run_goal_months(args),
        Commands::GoalContribution(args) => commands::savings::run_goal_contribution(args),
        Commands::Version => {
            println!("dmento {}", env!("CARGO_PKG_VERSION"));
            return;
        }
    };

    match result {
        Ok(value) => {
            output::format_output(&cli.output, &value);
            process::exit(0);
        }
        Err(e) => {
            log::debug!("command failed: {:?}", e);
            eprintln!("{}: {}", "error".red().bold(), e);
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;

    #[test]
    fn test_amortize_flags_parse() {
        let cli = Cli::try_parse_from([
            "dmento", "amortize", "--principal", "250000", "--rate", "6.5", "--term-years", "30",
        ])
        .unwrap();
        assert!(matches!(cli.command, Commands::Amortize(_)));
    }

    #[test]
    fn test_input_file_conflicts_with_loan_flags() {
        let err = Cli::try_parse_from([
            "dmento", "amortize", "--input", "loan.json", "--principal", "250000",
        ])
        .err()
        .unwrap();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn test_input_file_conflicts_with_plan_flags() {
        for command in ["savings", "goal-months", "goal-contribution"] {
            let args = ["dmento", command, "--input", "plan.yaml", "--rate", "3"];
            let err = Cli::try_parse_from(args).err().unwrap();
            assert_eq!(err.kind(), ErrorKind::ArgumentConflict, "{command}");
        }
    }

    #[test]
    fn test_input_file_alone_parses() {
        let cli = Cli::try_parse_from(["dmento", "savings", "--input", "plan.yaml"]).unwrap();
        match cli.command {
            Commands::Savings(args) => assert_eq!(args.input.as_deref(), Some("plan.yaml")),
            _ => panic!("expected savings command"),
        }
    }
}
