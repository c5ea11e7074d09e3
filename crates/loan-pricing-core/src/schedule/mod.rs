//! Amortization schedule generation.
//!
//! Produces a period-by-period cash-flow schedule for the five repayment
//! structures:
//! 1. **Fixed amortizing** -- level annuity at the contractual rate.
//! 2. **Variable amortizing** -- annuity recast every period at the variable
//!    reference rate plus spread.
//! 3. **Fixed / variable bullet** -- interest-only, principal at maturity.
//! 4. **Custom** -- caller-dated principal repayments with actual/365 accrual.
//!
//! Due dates are stamped from an explicit reference date so a schedule is a
//! pure function of its input.

mod rules;

use chrono::NaiveDate;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::types::*;
use crate::{LoanPricingError, LoanPricingResult};
use rules::{run_rule, Bullet, CustomRepayments, LevelAnnuity, PeriodCalendar, RecastAnnuity};

/// Upper bound on generated periods (1000 years of monthly instalments).
pub const MAX_PERIODS: u32 = 12_000;

fn default_reference_rate() -> Rate {
    RISK_FREE_RATE
}

// ---------------------------------------------------------------------------
// Input / Output types
// ---------------------------------------------------------------------------

/// A caller-supplied principal repayment for the custom structure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomCashflowEntry {
    pub due_date: NaiveDate,
    pub principal_repayment_amount: Money,
    #[serde(default)]
    pub note: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScheduleInput {
    pub principal: Money,
    /// Contractual annual rate. Used by fixed and custom structures.
    pub annual_rate: Rate,
    pub duration_years: Years,
    #[serde(default)]
    pub frequency: PaymentFrequency,
    #[serde(default)]
    pub repayment_type: RepaymentType,
    /// Spread over the reference rate for variable structures.
    #[serde(default)]
    pub variable_spread: Rate,
    /// Variable reference rate, held constant over the life of the loan.
    #[serde(default = "default_reference_rate")]
    pub reference_rate: Rate,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_entries: Vec<CustomCashflowEntry>,
    /// Opening balance of a custom schedule. Defaults to the sum of entries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub starting_balance: Option<Money>,
    /// Date due dates are counted from.
    pub reference_date: NaiveDate,
}

/// One row of a schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentPeriod {
    pub period_index: u32,
    pub due_date: NaiveDate,
    pub payment_amount: Money,
    pub principal_component: Money,
    pub interest_component: Money,
    pub remaining_balance: Money,
}

/// Custom principal total differs from the nominal loan principal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleImbalanceWarning {
    pub nominal_principal: Money,
    pub scheduled_principal: Money,
    pub difference: Money,
}

impl std::fmt::Display for ScheduleImbalanceWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Custom repayments total {} against a nominal principal of {} (difference {})",
            self.scheduled_principal, self.nominal_principal, self.difference
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub repayment_type: RepaymentType,
    /// Per-period rate; absent for custom schedules, which accrue by day count.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub periodic_rate: Option<Rate>,
    pub periods: Vec<PaymentPeriod>,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_payments: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub imbalance: Option<ScheduleImbalanceWarning>,
}

impl AmortizationSchedule {
    /// `(period_index, remaining_balance)` pairs for a balance-decay curve.
    pub fn balance_curve(&self) -> Vec<(u32, Money)> {
        self.periods
            .iter()
            .map(|p| (p.period_index, p.remaining_balance))
            .collect()
    }

    pub fn final_balance(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Sum of interest components.
pub fn total_interest(periods: &[PaymentPeriod]) -> Money {
    periods.iter().map(|p| p.interest_component).sum()
}

// ---------------------------------------------------------------------------
// Core function
// ---------------------------------------------------------------------------

/// Generate the amortization schedule for one loan.
pub fn generate_schedule(
    input: &ScheduleInput,
) -> LoanPricingResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    validate_input(input)?;

    let (periods, periodic_rate, imbalance) = match input.repayment_type {
        RepaymentType::FixedAmortizing => {
            let (calendar, n, rate) = regular_terms(input)?;
            let rule = LevelAnnuity::new(calendar, rate, n, input.principal)?;
            (run_rule(&rule, input.principal)?, Some(rate), None)
        }
        RepaymentType::VariableAmortizing => {
            let (calendar, n, rate) = regular_terms(input)?;
            let rule = RecastAnnuity {
                calendar,
                periodic_rate: rate,
                periods: n,
            };
            (run_rule(&rule, input.principal)?, Some(rate), None)
        }
        RepaymentType::FixedBullet | RepaymentType::VariableBullet => {
            let (calendar, n, rate) = regular_terms(input)?;
            let rule = Bullet {
                calendar,
                periodic_rate: rate,
                periods: n,
            };
            (run_rule(&rule, input.principal)?, Some(rate), None)
        }
        RepaymentType::Custom => {
            let (periods, imbalance) = build_custom(input, &mut warnings)?;
            (periods, None, imbalance)
        }
    };

    let total_interest =
        checked_sum(periods.iter().map(|p| p.interest_component), "total interest")?;
    let total_principal =
        checked_sum(periods.iter().map(|p| p.principal_component), "total principal")?;
    let total_payments = total_interest
        .checked_add(total_principal)
        .ok_or_else(|| LoanPricingError::Overflow {
            context: "total payments".into(),
        })?;

    let output = AmortizationSchedule {
        repayment_type: input.repayment_type,
        periodic_rate,
        total_interest,
        total_principal,
        total_payments,
        periods,
        imbalance,
    };

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        methodology(input.repayment_type),
        &serde_json::json!({
            "principal": input.principal.to_string(),
            "annual_rate": input.annual_rate.to_string(),
            "duration_years": input.duration_years.to_string(),
            "frequency": input.frequency,
            "repayment_type": input.repayment_type,
            "reference_date": input.reference_date.to_string(),
        }),
        warnings,
        elapsed,
        output,
    ))
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn validate_input(input: &ScheduleInput) -> LoanPricingResult<()> {
    if input.principal <= Decimal::ZERO {
        return Err(LoanPricingError::InvalidSchedule {
            cause: "principal must be positive".into(),
        });
    }
    if !input.repayment_type.is_variable() && input.annual_rate < Decimal::ZERO {
        return Err(LoanPricingError::InvalidSchedule {
            cause: "annual_rate cannot be negative".into(),
        });
    }
    if input.repayment_type.is_variable()
        && input.reference_rate + input.variable_spread < Decimal::ZERO
    {
        return Err(LoanPricingError::InvalidSchedule {
            cause: "variable rate (reference_rate + variable_spread) cannot be negative".into(),
        });
    }
    Ok(())
}

/// `round(duration * periods_per_year)`, between one and [`MAX_PERIODS`].
fn total_periods(duration_years: Years, frequency: PaymentFrequency) -> LoanPricingResult<u32> {
    let too_many = || LoanPricingError::InvalidSchedule {
        cause: format!(
            "duration of {duration_years} years gives too many {frequency:?} periods \
             (at most {MAX_PERIODS})"
        ),
    };
    let n = duration_years
        .checked_mul(Decimal::from(frequency.periods_per_year()))
        .ok_or_else(too_many)?
        .round();
    if n < Decimal::ONE {
        return Err(LoanPricingError::InvalidSchedule {
            cause: format!(
                "duration of {duration_years} years gives no {frequency:?} periods"
            ),
        });
    }
    match n.to_u32() {
        Some(n) if n <= MAX_PERIODS => Ok(n),
        _ => Err(too_many()),
    }
}

fn checked_sum(mut values: impl Iterator<Item = Money>, context: &str) -> LoanPricingResult<Money> {
    values
        .try_fold(Decimal::ZERO, |acc, v| acc.checked_add(v))
        .ok_or_else(|| LoanPricingError::Overflow {
            context: context.into(),
        })
}

/// Calendar, period count and per-period rate of the evenly spaced structures.
fn regular_terms(input: &ScheduleInput) -> LoanPricingResult<(PeriodCalendar, u32, Rate)> {
    let n = total_periods(input.duration_years, input.frequency)?;
    let annual = if input.repayment_type.is_variable() {
        input.reference_rate + input.variable_spread
    } else {
        input.annual_rate
    };
    let calendar = PeriodCalendar {
        reference_date: input.reference_date,
        days_between: input.frequency.days_between_periods(),
    };
    Ok((
        calendar,
        n,
        annual / Decimal::from(input.frequency.periods_per_year()),
    ))
}

fn build_custom(
    input: &ScheduleInput,
    warnings: &mut Vec<String>,
) -> LoanPricingResult<(Vec<PaymentPeriod>, Option<ScheduleImbalanceWarning>)> {
    if input.custom_entries.is_empty() {
        return Err(LoanPricingError::InvalidSchedule {
            cause: "custom schedule has no entries".into(),
        });
    }
    if let Some(entry) = input
        .custom_entries
        .iter()
        .find(|e| e.principal_repayment_amount < Decimal::ZERO)
    {
        return Err(LoanPricingError::InvalidSchedule {
            cause: format!("custom entry due {} has a negative repayment", entry.due_date),
        });
    }

    let mut entries = input.custom_entries.clone();
    if entries.windows(2).any(|w| w[1].due_date < w[0].due_date) {
        warnings.push("Custom entries were not in date order; sorted by due date.".into());
    }
    entries.sort_by_key(|e| e.due_date);

    if let Some(first) = entries.first() {
        if first.due_date < input.reference_date {
            return Err(LoanPricingError::InvalidSchedule {
                cause: format!(
                    "custom entry due {} precedes the reference date {}",
                    first.due_date, input.reference_date
                ),
            });
        }
    }

    let scheduled = checked_sum(
        entries.iter().map(|e| e.principal_repayment_amount),
        "custom entry total",
    )?;
    let opening = match input.starting_balance {
        Some(balance) if balance < Decimal::ZERO => {
            return Err(LoanPricingError::InvalidSchedule {
                cause: "starting_balance cannot be negative".into(),
            });
        }
        Some(balance) => balance,
        None => scheduled,
    };

    let imbalance = if scheduled != input.principal {
        let warning = ScheduleImbalanceWarning {
            nominal_principal: input.principal,
            scheduled_principal: scheduled,
            difference: scheduled.checked_sub(input.principal).ok_or_else(|| {
                LoanPricingError::Overflow {
                    context: "custom imbalance".into(),
                }
            })?,
        };
        warnings.push(warning.to_string());
        Some(warning)
    } else {
        None
    };

    let rule = CustomRepayments {
        reference_date: input.reference_date,
        annual_rate: input.annual_rate,
        entries: &entries,
    };
    let periods = run_rule(&rule, opening)?;

    for (period, entry) in periods.iter().zip(entries.iter()) {
        if period.principal_component < entry.principal_repayment_amount {
            warnings.push(format!(
                "Period {}: repayment of {} capped at the outstanding balance of {}.",
                period.period_index, entry.principal_repayment_amount, period.principal_component
            ));
        }
    }

    Ok((periods, imbalance))
}

fn methodology(structure: RepaymentType) -> &'static str {
    match structure {
        RepaymentType::FixedAmortizing => "Fixed amortizing: level annuity on original principal",
        RepaymentType::VariableAmortizing => {
            "Variable amortizing: annuity recast each period at reference rate + spread"
        }
        RepaymentType::FixedBullet => "Fixed bullet: interest-only, principal at maturity",
        RepaymentType::VariableBullet => {
            "Variable bullet: interest-only at reference rate + spread, principal at maturity"
        }
        RepaymentType::Custom => "Custom: dated repayments, simple actual/365 accrual",
    }
}
