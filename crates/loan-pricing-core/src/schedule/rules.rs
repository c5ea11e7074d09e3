//! Per-structure repayment rules.
//!
//! Each repayment type maps onto one [`RepaymentRule`]. A rule only decides
//! the flows of a single period given the opening balance; [`run_rule`]
//! threads the balance through the periods and emits the rows.

use chrono::{Duration, NaiveDate};
use rust_decimal::Decimal;

use super::{CustomCashflowEntry, PaymentPeriod};
use crate::time_value::{annuity_payment, periodic_interest, pro_rata_interest};
use crate::types::{Money, Rate};
use crate::{LoanPricingError, LoanPricingResult};

/// Cash flows of one period before the balance is rolled forward.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct PeriodFlow {
    pub due_date: NaiveDate,
    pub principal: Money,
    pub interest: Money,
}

pub(crate) trait RepaymentRule {
    fn total_periods(&self) -> u32;

    /// Flows for 1-based `period` given the balance outstanding before it.
    fn step(&self, period: u32, opening_balance: Money) -> LoanPricingResult<PeriodFlow>;
}

/// Evenly spaced due dates counted from the reference date.
#[derive(Debug, Clone, Copy)]
pub(crate) struct PeriodCalendar {
    pub reference_date: NaiveDate,
    pub days_between: i64,
}

impl PeriodCalendar {
    fn due_date(&self, period: u32) -> LoanPricingResult<NaiveDate> {
        self.reference_date
            .checked_add_signed(Duration::days(self.days_between * i64::from(period)))
            .ok_or_else(|| LoanPricingError::InvalidSchedule {
                cause: format!("due date of period {period} is out of range"),
            })
    }
}

// ---------------------------------------------------------------------------
// Level annuity (fixed amortizing)
// ---------------------------------------------------------------------------

pub(crate) struct LevelAnnuity {
    pub calendar: PeriodCalendar,
    pub periodic_rate: Rate,
    pub periods: u32,
    pub payment: Money,
}

impl LevelAnnuity {
    pub fn new(
        calendar: PeriodCalendar,
        periodic_rate: Rate,
        periods: u32,
        principal: Money,
    ) -> LoanPricingResult<Self> {
        let payment = annuity_payment(periodic_rate, periods, principal)?;
        Ok(LevelAnnuity {
            calendar,
            periodic_rate,
            periods,
            payment,
        })
    }
}

impl RepaymentRule for LevelAnnuity {
    fn total_periods(&self) -> u32 {
        self.periods
    }

    fn step(&self, period: u32, opening_balance: Money) -> LoanPricingResult<PeriodFlow> {
        let interest = periodic_interest(opening_balance, self.periodic_rate)?;
        // The last instalment absorbs the rounding residue of the annuity.
        let principal = if period == self.periods {
            opening_balance
        } else {
            (self.payment - interest).min(opening_balance)
        };
        Ok(PeriodFlow {
            due_date: self.calendar.due_date(period)?,
            principal,
            interest,
        })
    }
}

// ---------------------------------------------------------------------------
// Recast annuity (variable amortizing)
// ---------------------------------------------------------------------------

pub(crate) struct RecastAnnuity {
    pub calendar: PeriodCalendar,
    pub periodic_rate: Rate,
    pub periods: u32,
}

impl RepaymentRule for RecastAnnuity {
    fn total_periods(&self) -> u32 {
        self.periods
    }

    fn step(&self, period: u32, opening_balance: Money) -> LoanPricingResult<PeriodFlow> {
        let remaining = self.periods - period + 1;
        let payment = annuity_payment(self.periodic_rate, remaining, opening_balance)?;
        let interest = periodic_interest(opening_balance, self.periodic_rate)?;
        let principal = if period == self.periods {
            opening_balance
        } else {
            (payment - interest).min(opening_balance)
        };
        Ok(PeriodFlow {
            due_date: self.calendar.due_date(period)?,
            principal,
            interest,
        })
    }
}

// ---------------------------------------------------------------------------
// Bullet (fixed and variable)
// ---------------------------------------------------------------------------

pub(crate) struct Bullet {
    pub calendar: PeriodCalendar,
    pub periodic_rate: Rate,
    pub periods: u32,
}

impl RepaymentRule for Bullet {
    fn total_periods(&self) -> u32 {
        self.periods
    }

    fn step(&self, period: u32, opening_balance: Money) -> LoanPricingResult<PeriodFlow> {
        let principal = if period == self.periods {
            opening_balance
        } else {
            Decimal::ZERO
        };
        Ok(PeriodFlow {
            due_date: self.calendar.due_date(period)?,
            principal,
            interest: periodic_interest(opening_balance, self.periodic_rate)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Custom dated repayments
// ---------------------------------------------------------------------------

/// Entries must already be sorted by due date and none may precede the
/// reference date.
pub(crate) struct CustomRepayments<'a> {
    pub reference_date: NaiveDate,
    pub annual_rate: Rate,
    pub entries: &'a [CustomCashflowEntry],
}

impl RepaymentRule for CustomRepayments<'_> {
    fn total_periods(&self) -> u32 {
        self.entries.len() as u32
    }

    fn step(&self, period: u32, opening_balance: Money) -> LoanPricingResult<PeriodFlow> {
        let idx = (period - 1) as usize;
        let entry = self.entries.get(idx).ok_or_else(|| LoanPricingError::InvalidSchedule {
            cause: format!("no custom entry for period {period}"),
        })?;
        let accrual_start = match idx {
            0 => self.reference_date,
            _ => self.entries[idx - 1].due_date,
        };
        let days = (entry.due_date - accrual_start).num_days();

        Ok(PeriodFlow {
            due_date: entry.due_date,
            principal: entry.principal_repayment_amount.min(opening_balance),
            interest: pro_rata_interest(opening_balance, self.annual_rate, days)?,
        })
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

/// Fold the rule over its periods, carrying the outstanding balance.
pub(crate) fn run_rule(
    rule: &dyn RepaymentRule,
    opening_balance: Money,
) -> LoanPricingResult<Vec<PaymentPeriod>> {
    let n = rule.total_periods();
    let (_, periods) = (1..=n).try_fold(
        (opening_balance, Vec::with_capacity(n as usize)),
        |(balance, mut periods), k| {
            let flow = rule.step(k, balance)?;
            let closing = (balance - flow.principal).max(Decimal::ZERO);
            let payment_amount = flow.principal.checked_add(flow.interest).ok_or_else(|| {
                LoanPricingError::Overflow {
                    context: format!("payment of period {k}"),
                }
            })?;
            periods.push(PaymentPeriod {
                period_index: k,
                due_date: flow.due_date,
                payment_amount,
                principal_component: flow.principal,
                interest_component: flow.interest,
                remaining_balance: closing,
            });
            Ok::<_, LoanPricingError>((closing, periods))
        },
    )?;
    Ok(periods)
}
