use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;

use crate::error::LoanPricingError;
use crate::types::{Money, Rate};
use crate::LoanPricingResult;

/// Day basis for pro-rata interest accrual.
pub const DAYS_PER_YEAR: Decimal = dec!(365);

fn overflow(context: &str) -> LoanPricingError {
    LoanPricingError::Overflow {
        context: context.into(),
    }
}

/// Level instalment that retires `principal` over `nper` periods at `rate`
/// per period. Returned as a positive amount.
///
/// Uses the discount form `P * r / (1 - (1 + r)^-n)`: for large `r * n` the
/// discount factor underflows towards zero and the instalment tends to
/// `P * r` instead of overflowing.
pub fn annuity_payment(rate: Rate, nper: u32, principal: Money) -> LoanPricingResult<Money> {
    if nper == 0 {
        return Err(LoanPricingError::InvalidInput {
            field: "nper".into(),
            reason: "Number of periods must be > 0".into(),
        });
    }

    if rate.is_zero() {
        return Ok(principal / Decimal::from(nper));
    }

    let growth = Decimal::ONE + rate;
    if growth <= Decimal::ZERO {
        return Err(LoanPricingError::InvalidInput {
            field: "rate".into(),
            reason: "Periodic rate must be greater than -1".into(),
        });
    }

    let discount = Decimal::ONE / growth;
    let discount_n = discount
        .checked_powu(u64::from(nper))
        .ok_or_else(|| overflow("annuity discount factor"))?;
    let denominator = Decimal::ONE - discount_n;

    if denominator.is_zero() {
        return Err(LoanPricingError::DivisionByZero {
            context: "annuity factor".into(),
        });
    }

    principal
        .checked_mul(rate)
        .and_then(|interest| interest.checked_div(denominator))
        .ok_or_else(|| overflow("annuity payment"))
}

/// Interest on `balance` for one period at `periodic_rate`.
pub fn periodic_interest(balance: Money, periodic_rate: Rate) -> LoanPricingResult<Money> {
    balance
        .checked_mul(periodic_rate)
        .ok_or_else(|| overflow("periodic interest"))
}

/// Simple (non-compounding) interest accrued over `days` on an actual/365 basis.
pub fn pro_rata_interest(balance: Money, annual_rate: Rate, days: i64) -> LoanPricingResult<Money> {
    balance
        .checked_mul(annual_rate)
        .and_then(|annual| annual.checked_mul(Decimal::from(days)))
        .map(|accrued| accrued / DAYS_PER_YEAR)
        .ok_or_else(|| overflow("pro-rata interest"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_annuity_payment_basic() {
        // 100k over 12 months at 0.5%/month ≈ 8606.64
        let pmt = annuity_payment(dec!(0.005), 12, dec!(100_000)).unwrap();
        assert!((pmt - dec!(8606.64)).abs() < dec!(0.01));
    }

    #[test]
    fn test_annuity_payment_zero_rate() {
        let pmt = annuity_payment(Decimal::ZERO, 4, dec!(1000)).unwrap();
        assert_eq!(pmt, dec!(250));
    }

    #[test]
    fn test_annuity_payment_zero_periods() {
        assert!(annuity_payment(dec!(0.01), 0, dec!(1000)).is_err());
    }

    #[test]
    fn test_annuity_payment_high_rate_long_term() {
        // ~3500% a year paid monthly over 30 years: the compounding factor
        // is far beyond the Decimal range, the payment is ~interest only.
        let rate = dec!(35.0) / dec!(12);
        let pmt = annuity_payment(rate, 360, dec!(10_000)).unwrap();
        let interest_only = dec!(10_000) * rate;
        assert!(pmt >= interest_only);
        assert!((pmt - interest_only).abs() < dec!(0.01));
    }

    #[test]
    fn test_annuity_payment_rate_at_minus_one_rejected() {
        assert!(annuity_payment(dec!(-1), 12, dec!(1000)).is_err());
    }

    #[test]
    fn test_pro_rata_interest() {
        let interest = pro_rata_interest(dec!(100_000), dec!(0.04), 365).unwrap();
        assert_eq!(interest, dec!(4000));
        let half = pro_rata_interest(dec!(100_000), dec!(0.04), 180).unwrap();
        assert!((half - dec!(1972.60)).abs() < dec!(0.01));
    }

    #[test]
    fn test_interest_overflow_is_an_error() {
        assert!(matches!(
            periodic_interest(Decimal::MAX, dec!(2)),
            Err(LoanPricingError::Overflow { .. })
        ));
        assert!(pro_rata_interest(Decimal::MAX, dec!(1), 365).is_err());
    }
}
