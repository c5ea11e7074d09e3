use chrono::{NaiveDate, Utc};
use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_pricing_core::analysis::{analyze_loan, LoanPricingInput, LoanPricingRecord};
use loan_pricing_core::pricing::{RatingClass, RiskProfile};
use loan_pricing_core::LoanTerms;

use super::pricing::{operational_costs, FundingArgs};
use super::{CliResult, FrequencyArg, RepaymentArg};
use crate::input;

/// Arguments for the full loan pricing analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Emit a flat record for storage instead of the full analysis
    #[arg(long)]
    pub record: bool,

    /// Project label carried into the record
    #[arg(long, default_value = "")]
    pub project_name: String,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Duration in years
    #[arg(long, alias = "years")]
    pub duration_years: Option<Decimal>,

    /// Payment frequency
    #[arg(long, value_enum, default_value = "monthly")]
    pub frequency: FrequencyArg,

    /// Repayment structure
    #[arg(long, value_enum, default_value = "fixed-amortizing")]
    pub repayment: RepaymentArg,

    /// One-year probability of default
    #[arg(long)]
    pub pd: Option<Decimal>,

    /// Rating class used when no PD is given
    #[arg(long)]
    pub rating: Option<RatingClass>,

    /// Loss given default
    #[arg(long)]
    pub lgd: Option<Decimal>,

    /// Operational costs as a fraction of principal
    #[arg(long, conflicts_with_all = ["initial_costs", "annual_costs"])]
    pub operational_rate: Option<Decimal>,

    /// Upfront operational costs
    #[arg(long)]
    pub initial_costs: Option<Decimal>,

    /// Recurring annual operational costs
    #[arg(long)]
    pub annual_costs: Option<Decimal>,

    /// Rate offered to the borrower (defaults to break-even)
    #[arg(long)]
    pub contractual_rate: Option<Decimal>,

    /// Upfront fees and commissions
    #[arg(long, default_value = "0")]
    pub total_fees: Decimal,

    #[command(flatten)]
    pub funding: FundingArgs,

    /// First due dates are offset from this date (defaults to today)
    #[arg(long)]
    pub reference_date: Option<NaiveDate>,
}

pub fn run_analyze(args: AnalyzeArgs) -> CliResult<Value> {
    let reference_date = args.reference_date.unwrap_or_else(input::today);
    let loan_input: LoanPricingInput = match input::read_request(args.input.as_deref())? {
        Some(data) => serde_json::from_value(input::with_reference_date(data, reference_date))?,
        None => {
            if args.pd.is_none() && args.rating.is_none() {
                return Err("--pd or --rating is required (or provide --input)".into());
            }
            LoanPricingInput {
                project_name: args.project_name.clone(),
                terms: LoanTerms {
                    principal: args
                        .principal
                        .ok_or("--principal is required (or provide --input)")?,
                    duration_years: args
                        .duration_years
                        .ok_or("--duration-years is required (or provide --input)")?,
                    repayment_type: args.repayment.into(),
                    payment_frequency: args.frequency.into(),
                },
                risk: RiskProfile {
                    probability_of_default_1y: args.pd,
                    loss_given_default: args.lgd.ok_or("--lgd is required (or provide --input)")?,
                    rating_class: args.rating,
                },
                operational_costs: operational_costs(
                    args.operational_rate,
                    args.initial_costs,
                    args.annual_costs,
                ),
                funding: args.funding.resolve(),
                contractual_rate: args.contractual_rate,
                total_fees: args.total_fees,
                custom_entries: Vec::new(),
                starting_balance: None,
                reference_date,
            }
        }
    };

    log::info!("analyzing loan '{}'", loan_input.project_name);
    let output = analyze_loan(&loan_input)?;
    if args.record {
        let record = LoanPricingRecord::from_analysis(&loan_input, &output.result, Utc::now());
        return Ok(json!({
            "result": record,
            "warnings": output.warnings,
            "methodology": output.methodology,
        }));
    }
    Ok(serde_json::to_value(output)?)
}
