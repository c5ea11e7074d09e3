use chrono::NaiveDate;
use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_pricing_core::schedule::{generate_schedule, ScheduleInput};
use loan_pricing_core::RISK_FREE_RATE;

use super::{CliResult, FrequencyArg, RepaymentArg};
use crate::input;

/// Arguments for repayment schedule generation
///
/// Custom schedules carry dated entries and are only accepted through `--input`.
#[derive(Args)]
pub struct ScheduleArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual contractual rate
    #[arg(long, alias = "rate")]
    pub annual_rate: Option<Decimal>,

    /// Duration in years
    #[arg(long, alias = "years")]
    pub duration_years: Option<Decimal>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Repayment structure
    #[arg(long, value_enum, default_value = "fixed-amortizing")]
    pub repayment: RepaymentArg,

    /// Spread over the reference rate (variable structures)
    #[arg(long, default_value = "0")]
    pub variable_spread: Decimal,

    /// Reference rate for variable structures
    #[arg(long)]
    pub reference_rate: Option<Decimal>,

    /// First due dates are offset from this date (defaults to today)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,
}

pub fn run_schedule(args: ScheduleArgs) -> CliResult<Value> {
    let reference_date = args.reference_date.unwrap_or_else(input::today);
    let sched_input: ScheduleInput = match input::read_request(args.input.as_deref())? {
        Some(data) => serde_json::from_value(input::with_reference_date(data, reference_date))?,
        None => ScheduleInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate: args
                .annual_rate
                .ok_or("--annual-rate is required (or provide --input)")?,
            duration_years: args
                .duration_years
                .ok_or("--duration-years is required (or provide --input)")?,
            frequency: args.frequency.into(),
            repayment_type: args.repayment.into(),
            variable_spread: args.variable_spread,
            reference_rate: args.reference_rate.unwrap_or(RISK_FREE_RATE),
            custom_entries: Vec::new(),
            starting_balance: None,
            reference_date,
        },
    };

    log::info!(
        "schedule: {:?} {:?} from {}",
        sched_input.repayment_type, sched_input.frequency, sched_input.reference_date
    );
    let result = generate_schedule(&sched_input)?;
    Ok(serde_json::to_value(result)?)
}
