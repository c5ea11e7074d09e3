//! Flat projection of a priced loan for external storage.
//!
//! Every input needed to re-run the analysis is kept alongside the headline
//! results, so a stored record can be turned back into a [`LoanPricingInput`].
//! Rates are decimal fractions, never percentages.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::{LoanPricingAnalysis, LoanPricingInput};
use crate::pricing::{OperationalCosts, RatingClass, RiskProfile};
use crate::schedule::CustomCashflowEntry;
use crate::types::*;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanPricingRecord {
    pub project_name: String,
    pub created_at: DateTime<Utc>,
    // Loan terms
    pub principal: Money,
    pub duration_years: Years,
    pub repayment_type: RepaymentType,
    pub payment_frequency: PaymentFrequency,
    // Risk
    pub rating_class: RatingClass,
    pub pd_1y: Rate,
    pub lgd: Rate,
    // Costs and fees
    pub operational_costs: OperationalCosts,
    pub total_fees: Money,
    // Funding
    pub risk_free_rate: Rate,
    pub funding_spread: Rate,
    pub equity_cost: Rate,
    pub capital_ratio: Rate,
    pub variable_rate_spread: Rate,
    // Results
    pub contractual_rate: Rate,
    pub break_even_rate: Rate,
    pub commercial_spread: Rate,
    pub expected_loss: Money,
    pub total_interest: Money,
    pub break_even_interest: Money,
    pub commercial_margin: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_entries: Vec<CustomCashflowEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_balance: Option<Money>,
}

impl LoanPricingRecord {
    pub fn from_analysis(
        input: &LoanPricingInput,
        analysis: &LoanPricingAnalysis,
        created_at: DateTime<Utc>,
    ) -> Self {
        let pricing = &analysis.pricing;
        LoanPricingRecord {
            project_name: input.project_name.clone(),
            created_at,
            principal: input.terms.principal,
            duration_years: input.terms.duration_years,
            repayment_type: input.terms.repayment_type,
            payment_frequency: input.terms.payment_frequency,
            rating_class: pricing.rating_class,
            pd_1y: pricing.pd_1y,
            lgd: input.risk.loss_given_default,
            operational_costs: input.operational_costs.clone(),
            total_fees: analysis.total_fees,
            risk_free_rate: input.funding.risk_free_rate,
            funding_spread: input.funding.funding_spread,
            equity_cost: input.funding.equity_cost,
            capital_ratio: input.funding.capital_ratio,
            variable_rate_spread: input.funding.variable_rate_spread,
            contractual_rate: analysis.contractual_rate,
            break_even_rate: pricing.break_even_rate,
            commercial_spread: analysis.commercial_spread,
            expected_loss: pricing.expected_loss,
            total_interest: analysis.total_interest,
            break_even_interest: analysis.break_even_interest,
            commercial_margin: analysis.commercial_margin,
            custom_entries: input.custom_entries.clone(),
            starting_balance: input.starting_balance,
        }
    }

    /// Rebuild the analysis input, anchoring due dates at `reference_date`.
    pub fn to_input(&self, reference_date: NaiveDate) -> LoanPricingInput {
        LoanPricingInput {
            project_name: self.project_name.clone(),
            terms: LoanTerms {
                principal: self.principal,
                duration_years: self.duration_years,
                repayment_type: self.repayment_type,
                payment_frequency: self.payment_frequency,
            },
            risk: RiskProfile {
                probability_of_default_1y: Some(self.pd_1y),
                loss_given_default: self.lgd,
                rating_class: Some(self.rating_class),
            },
            operational_costs: self.operational_costs.clone(),
            funding: FundingAssumptions {
                risk_free_rate: self.risk_free_rate,
                funding_spread: self.funding_spread,
                equity_cost: self.equity_cost,
                capital_ratio: self.capital_ratio,
                variable_rate_spread: self.variable_rate_spread,
            },
            contractual_rate: Some(self.contractual_rate),
            total_fees: self.total_fees,
            custom_entries: self.custom_entries.clone(),
            starting_balance: self.starting_balance,
            reference_date,
        }
    }
}
