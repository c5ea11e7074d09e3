//! Loan pricing analysis.
//!
//! Runs the full pricing flow for one loan: the break-even rate, the
//! schedule at the contractual rate, the schedule at the break-even rate,
//! and the commercial spread and margin derived from the two schedules.

pub mod record;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::pricing::{
    compute_break_even, BreakEvenInput, OperationalCosts, PricingBreakdown, RiskProfile,
};
use crate::schedule::{
    generate_schedule, AmortizationSchedule, CustomCashflowEntry, ScheduleInput,
};
use crate::types::*;
use crate::{LoanPricingError, LoanPricingResult};

pub use record::LoanPricingRecord;

// ---------------------------------------------------------------------------
// Input / Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoanPricingInput {
    #[serde(default)]
    pub project_name: String,
    pub terms: LoanTerms,
    pub risk: RiskProfile,
    #[serde(default)]
    pub operational_costs: OperationalCosts,
    #[serde(default)]
    pub funding: FundingAssumptions,
    /// Rate offered to the borrower. Defaults to the break-even rate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contractual_rate: Option<Rate>,
    /// Upfront fees and commissions collected on the loan.
    #[serde(default)]
    pub total_fees: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_entries: Vec<CustomCashflowEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_balance: Option<Money>,
    pub reference_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPricingAnalysis {
    pub pricing: PricingBreakdown,
    pub contractual_rate: Rate,
    /// Contractual rate less break-even rate.
    pub commercial_spread: Rate,
    pub total_interest: Money,
    pub break_even_interest: Money,
    pub total_fees: Money,
    pub commercial_margin: Money,
    pub contractual_schedule: AmortizationSchedule,
    pub break_even_schedule: AmortizationSchedule,
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Price a loan end to end and derive its commercial margin.
pub fn analyze_loan(
    input: &LoanPricingInput,
) -> LoanPricingResult<ComputationOutput<LoanPricingAnalysis>> {
    let start = Instant::now();

    if input.total_fees < Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "total_fees".into(),
            reason: "Fees cannot be negative.".into(),
        });
    }

    let pricing_out = compute_break_even(&break_even_input(input))?;
    let mut warnings = pricing_out.warnings;
    let pricing = pricing_out.result;

    let contractual_rate = input.contractual_rate.unwrap_or(pricing.break_even_rate);
    if contractual_rate < pricing.break_even_rate {
        warnings.push(format!(
            "Contractual rate {contractual_rate} is below the break-even rate {}.",
            pricing.break_even_rate
        ));
    }
    if input.terms.repayment_type.is_variable() {
        warnings.push(
            "Variable structures accrue at reference rate + spread; contractual and break-even \
             schedules carry the same interest."
                .into(),
        );
    }

    let contractual_out = generate_schedule(&schedule_input(input, contractual_rate))?;
    warnings.extend(contractual_out.warnings);
    let contractual_schedule = contractual_out.result;

    let break_even_schedule =
        generate_schedule(&schedule_input(input, pricing.break_even_rate))?.result;

    let margin = commercial_margin(&contractual_schedule, &break_even_schedule, input.total_fees);

    let output = LoanPricingAnalysis {
        commercial_spread: contractual_rate - pricing.break_even_rate,
        contractual_rate,
        total_interest: contractual_schedule.total_interest,
        break_even_interest: break_even_schedule.total_interest,
        total_fees: input.total_fees,
        commercial_margin: margin,
        pricing,
        contractual_schedule,
        break_even_schedule,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Loan pricing: break-even rate, contractual vs break-even schedules, commercial margin",
        &serde_json::json!({
            "project_name": input.project_name,
            "principal": input.terms.principal.to_string(),
            "duration_years": input.terms.duration_years.to_string(),
            "repayment_type": input.terms.repayment_type,
            "payment_frequency": input.terms.payment_frequency,
            "contractual_rate_defaulted": input.contractual_rate.is_none(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Interest earned above the break-even requirement, plus fees.
pub fn commercial_margin(
    contractual: &AmortizationSchedule,
    break_even: &AmortizationSchedule,
    total_fees: Money,
) -> Money {
    contractual.total_interest - break_even.total_interest + total_fees
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn break_even_input(input: &LoanPricingInput) -> BreakEvenInput {
    BreakEvenInput {
        principal: input.terms.principal,
        duration_years: input.terms.duration_years,
        pd_1y: input.risk.probability_of_default_1y,
        rating_class: input.risk.rating_class,
        lgd: input.risk.loss_given_default,
        operational_costs: input.operational_costs.clone(),
        funding: input.funding.clone(),
    }
}

fn schedule_input(input: &LoanPricingInput, annual_rate: Rate) -> ScheduleInput {
    ScheduleInput {
        principal: input.terms.principal,
        annual_rate,
        duration_years: input.terms.duration_years,
        frequency: input.terms.payment_frequency,
        repayment_type: input.terms.repayment_type,
        variable_spread: input.funding.variable_rate_spread,
        reference_rate: input.funding.risk_free_rate,
        custom_entries: input.custom_entries.clone(),
        starting_balance: input.starting_balance,
        reference_date: input.reference_date,
    }
}
