use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use super::rating::{rating_from_pd, RatingClass};
use crate::{types::*, LoanPricingError, LoanPricingResult};

/// Term premium added to the risk-free rate per year of duration.
const TERM_PREMIUM_PER_YEAR: Rate = dec!(0.001);

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// Operating costs of servicing the loan, in either accepted form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum OperationalCosts {
    /// Already expressed as a fraction of principal
    Rate { rate: Rate },
    /// Currency amounts accumulated over the life of the loan
    Amounts {
        initial_costs: Money,
        annual_costs: Money,
    },
}

impl Default for OperationalCosts {
    fn default() -> Self {
        OperationalCosts::Rate {
            rate: Decimal::ZERO,
        }
    }
}

impl OperationalCosts {
    /// Total lifetime cost in currency units.
    pub fn total(&self, principal: Money, duration_years: Years) -> Money {
        match self {
            OperationalCosts::Rate { rate } => principal * rate,
            OperationalCosts::Amounts {
                initial_costs,
                annual_costs,
            } => initial_costs + annual_costs * duration_years,
        }
    }

    /// Cost as a fraction of principal.
    pub fn spread(&self, principal: Money, duration_years: Years) -> Rate {
        match self {
            OperationalCosts::Rate { rate } => *rate,
            OperationalCosts::Amounts { .. } => self.total(principal, duration_years) / principal,
        }
    }
}

/// Borrower credit risk. PD may be given directly or through a rating class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskProfile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub probability_of_default_1y: Option<Rate>,
    pub loss_given_default: Rate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_class: Option<RatingClass>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BreakEvenInput {
    pub principal: Money,
    pub duration_years: Years,
    /// 1-year PD. When absent the rating class supplies a representative PD.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pd_1y: Option<Rate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating_class: Option<RatingClass>,
    pub lgd: Rate,
    #[serde(default)]
    pub operational_costs: OperationalCosts,
    #[serde(default)]
    pub funding: FundingAssumptions,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingBreakdown {
    pub market_rate: Rate,
    pub financial_spread: Rate,
    pub operational_spread: Rate,
    pub credit_spread: Rate,
    pub break_even_rate: Rate,
    pub expected_loss: Money,
    pub cumulative_default_probability: Rate,
    pub pd_1y: Rate,
    pub rating_class: RatingClass,
    pub total_operational_costs: Money,
}

/// One labelled slice of the break-even rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpreadComponent {
    pub label: String,
    pub value: Rate,
}

impl PricingBreakdown {
    /// The four additive components in display order.
    pub fn components(&self) -> Vec<SpreadComponent> {
        [
            ("Market rate", self.market_rate),
            ("Financial spread", self.financial_spread),
            ("Operational spread", self.operational_spread),
            ("Credit spread", self.credit_spread),
        ]
        .into_iter()
        .map(|(label, value)| SpreadComponent {
            label: label.into(),
            value,
        })
        .collect()
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Derive the risk-adjusted break-even rate and its components.
pub fn compute_break_even(
    input: &BreakEvenInput,
) -> LoanPricingResult<ComputationOutput<PricingBreakdown>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    let pd_1y = resolve_pd(input)?;
    validate_input(input, pd_1y)?;

    if let (Some(pd), Some(class)) = (input.pd_1y, input.rating_class) {
        if rating_from_pd(pd) != class {
            warnings.push(format!(
                "pd_1y {pd} falls in the {} bucket, not the supplied rating {class}; pd_1y takes precedence.",
                rating_from_pd(pd)
            ));
        }
    }

    let principal = input.principal;
    let duration = input.duration_years;
    let funding = &input.funding;

    let (expected_loss, cumulative_pd) =
        expected_loss(principal, pd_1y, input.lgd, duration)?;

    let financial_spread = funding.capital_ratio * funding.equity_cost
        + (Decimal::ONE - funding.capital_ratio) * funding.funding_spread;

    let total_operational_costs = input.operational_costs.total(principal, duration);
    let operational_spread = input.operational_costs.spread(principal, duration);

    let credit_spread = expected_loss / principal;

    let market_rate = funding.risk_free_rate + duration * TERM_PREMIUM_PER_YEAR;

    let break_even_rate = market_rate + financial_spread + operational_spread + credit_spread;

    if cumulative_pd > dec!(0.5) {
        warnings.push(format!(
            "Cumulative default probability of {cumulative_pd:.4} exceeds 50% over the loan life."
        ));
    }

    let output = PricingBreakdown {
        market_rate,
        financial_spread,
        operational_spread,
        credit_spread,
        break_even_rate,
        expected_loss,
        cumulative_default_probability: cumulative_pd,
        pd_1y,
        rating_class: rating_from_pd(pd_1y),
        total_operational_costs,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Break-even rate: market rate + financial, operational and credit spreads",
        &serde_json::json!({
            "principal": principal.to_string(),
            "duration_years": duration.to_string(),
            "pd_1y": pd_1y.to_string(),
            "lgd": input.lgd.to_string(),
            "risk_free_rate": funding.risk_free_rate.to_string(),
            "term_premium_per_year": TERM_PREMIUM_PER_YEAR.to_string(),
            "pd_model": "constant hazard: 1 - (1 - pd)^years",
        }),
        warnings,
        elapsed,
        output,
    ))
}

/// Expected loss over the life of the loan and the cumulative PD behind it.
pub fn expected_loss(
    principal: Money,
    pd_1y: Rate,
    lgd: Rate,
    duration_years: Years,
) -> LoanPricingResult<(Money, Rate)> {
    validate_default_horizon(pd_1y, duration_years)?;

    let survival = (Decimal::ONE - pd_1y).powd(duration_years);
    let cumulative_pd = Decimal::ONE - survival;
    Ok((principal * cumulative_pd * lgd, cumulative_pd))
}

// ---------------------------------------------------------------------------
// Internal helpers
// ---------------------------------------------------------------------------

fn resolve_pd(input: &BreakEvenInput) -> LoanPricingResult<Rate> {
    match (input.pd_1y, input.rating_class) {
        (Some(pd), _) => Ok(pd),
        (None, Some(class)) => Ok(class.representative_pd()),
        (None, None) => Err(LoanPricingError::InvalidInput {
            field: "pd_1y".into(),
            reason: "Either pd_1y or rating_class is required.".into(),
        }),
    }
}

/// PD and duration checks shared by [`expected_loss`] and the calculator.
fn validate_default_horizon(pd_1y: Rate, duration_years: Years) -> LoanPricingResult<()> {
    if duration_years <= Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "duration_years".into(),
            reason: "Duration must be positive.".into(),
        });
    }
    if pd_1y <= Decimal::ZERO || pd_1y >= Decimal::ONE {
        return Err(LoanPricingError::InvalidInput {
            field: "pd_1y".into(),
            reason: "1-year PD must be strictly between 0 and 1.".into(),
        });
    }
    Ok(())
}

fn validate_input(input: &BreakEvenInput, pd_1y: Rate) -> LoanPricingResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "principal".into(),
            reason: "Principal must be positive.".into(),
        });
    }
    validate_default_horizon(pd_1y, input.duration_years)?;
    if input.lgd < Decimal::ZERO || input.lgd > Decimal::ONE {
        return Err(LoanPricingError::InvalidInput {
            field: "lgd".into(),
            reason: "Loss given default must be within [0, 1].".into(),
        });
    }

    let funding = &input.funding;
    if funding.capital_ratio < Decimal::ZERO || funding.capital_ratio > Decimal::ONE {
        return Err(LoanPricingError::InvalidInput {
            field: "capital_ratio".into(),
            reason: "Capital ratio must be within [0, 1].".into(),
        });
    }
    if funding.equity_cost < Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "equity_cost".into(),
            reason: "Cost of equity cannot be negative.".into(),
        });
    }
    if funding.funding_spread < Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "funding_spread".into(),
            reason: "Funding spread cannot be negative.".into(),
        });
    }

    match &input.operational_costs {
        OperationalCosts::Rate { rate } if *rate < Decimal::ZERO => {
            Err(LoanPricingError::InvalidInput {
                field: "operational_cost_rate".into(),
                reason: "Operational cost rate cannot be negative.".into(),
            })
        }
        OperationalCosts::Amounts {
            initial_costs,
            annual_costs,
        } if *initial_costs < Decimal::ZERO || *annual_costs < Decimal::ZERO => {
            Err(LoanPricingError::InvalidInput {
                field: "operational_costs".into(),
                reason: "Initial and annual costs cannot be negative.".into(),
            })
        }
        _ => Ok(()),
    }
}
