use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use loan_pricing_core::pricing::{compute_break_even, BreakEvenInput, OperationalCosts, RatingClass};
use loan_pricing_core::FundingAssumptions;

use super::CliResult;
use crate::input;

/// Arguments for the break-even rate calculation
#[derive(Args)]
pub struct BreakEvenArgs {
    /// Path to JSON input file (overrides individual flags)
    #[arg(long)]
    pub input: Option<String>,

    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Duration in years (fractions allowed)
    #[arg(long, alias = "years")]
    pub duration_years: Option<Decimal>,

    /// One-year probability of default, as a fraction
    #[arg(long)]
    pub pd: Option<Decimal>,

    /// Rating class used when no PD is given
    #[arg(long)]
    pub rating: Option<RatingClass>,

    /// Loss given default, as a fraction
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

    #[command(flatten)]
    pub funding: FundingArgs,
}

/// Funding overrides; unset flags keep the bank defaults
#[derive(Args)]
pub struct FundingArgs {
    /// Risk-free rate
    #[arg(long)]
    pub risk_free_rate: Option<Decimal>,

    /// Bank funding spread over the risk-free rate
    #[arg(long)]
    pub funding_spread: Option<Decimal>,

    /// Cost of equity
    #[arg(long)]
    pub equity_cost: Option<Decimal>,

    /// Capital held against the loan, as a fraction of principal
    #[arg(long)]
    pub capital_ratio: Option<Decimal>,

    /// Spread over the reference rate for variable structures
    #[arg(long)]
    pub variable_rate_spread: Option<Decimal>,
}

impl FundingArgs {
    pub fn resolve(&self) -> FundingAssumptions {
        let defaults = FundingAssumptions::default();
        FundingAssumptions {
            risk_free_rate: self.risk_free_rate.unwrap_or(defaults.risk_free_rate),
            funding_spread: self.funding_spread.unwrap_or(defaults.funding_spread),
            equity_cost: self.equity_cost.unwrap_or(defaults.equity_cost),
            capital_ratio: self.capital_ratio.unwrap_or(defaults.capital_ratio),
            variable_rate_spread: self
                .variable_rate_spread
                .unwrap_or(defaults.variable_rate_spread),
        }
    }
}

pub fn operational_costs(
    rate: Option<Decimal>,
    initial_costs: Option<Decimal>,
    annual_costs: Option<Decimal>,
) -> OperationalCosts {
    match rate {
        Some(rate) => OperationalCosts::Rate { rate },
        None if initial_costs.is_some() || annual_costs.is_some() => OperationalCosts::Amounts {
            initial_costs: initial_costs.unwrap_or(Decimal::ZERO),
            annual_costs: annual_costs.unwrap_or(Decimal::ZERO),
        },
        None => OperationalCosts::default(),
    }
}

pub fn run_break_even(args: BreakEvenArgs) -> CliResult<Value> {
    let be_input: BreakEvenInput = match input::read_request(args.input.as_deref())? {
        Some(data) => serde_json::from_value(data)?,
        None => {
            if args.pd.is_none() && args.rating.is_none() {
                return Err("--pd or --rating is required (or provide --input)".into());
            }
            BreakEvenInput {
                principal: args
                    .principal
                    .ok_or("--principal is required (or provide --input)")?,
                duration_years: args
                    .duration_years
                    .ok_or("--duration-years is required (or provide --input)")?,
                pd_1y: args.pd,
                rating_class: args.rating,
                lgd: args.lgd.ok_or("--lgd is required (or provide --input)")?,
                operational_costs: operational_costs(
                    args.operational_rate,
                    args.initial_costs,
                    args.annual_costs,
                ),
                funding: args.funding.resolve(),
            }
        }
    };

    log::info!(
        "break-even: principal {} over {}y",
        be_input.principal, be_input.duration_years
    );
    let result = compute_break_even(&be_input)?;
    Ok(serde_json::to_value(result)?)
}
