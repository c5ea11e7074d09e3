//! Rating buckets for 1-year probabilities of default.
//!
//! The bucket table is advisory: it labels a PD for display and supplies a
//! representative PD when a caller prices from a rating class. It never
//! fails, out-of-range PDs are clamped into the outermost buckets.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::types::Rate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RatingClass {
    AAA,
    AA,
    A,
    BBB,
    BB,
    B,
    CCC,
}

/// `(label, pd_lower_inclusive, pd_upper_exclusive)`, ordered best to worst.
const RATING_BUCKETS: [(RatingClass, Rate, Rate); 7] = [
    (RatingClass::AAA, dec!(0), dec!(0.0015)),
    (RatingClass::AA, dec!(0.0015), dec!(0.0035)),
    (RatingClass::A, dec!(0.0035), dec!(0.0075)),
    (RatingClass::BBB, dec!(0.0075), dec!(0.0175)),
    (RatingClass::BB, dec!(0.0175), dec!(0.0375)),
    (RatingClass::B, dec!(0.0375), dec!(0.075)),
    (RatingClass::CCC, dec!(0.075), dec!(1)),
];

impl RatingClass {
    pub const ALL: [RatingClass; 7] = [
        RatingClass::AAA,
        RatingClass::AA,
        RatingClass::A,
        RatingClass::BBB,
        RatingClass::BB,
        RatingClass::B,
        RatingClass::CCC,
    ];

    /// Representative 1-year PD used when a loan is priced from its rating.
    pub fn representative_pd(&self) -> Rate {
        match self {
            RatingClass::AAA => dec!(0.0010),
            RatingClass::AA => dec!(0.0025),
            RatingClass::A => dec!(0.0050),
            RatingClass::BBB => dec!(0.0100),
            RatingClass::BB => dec!(0.0250),
            RatingClass::B => dec!(0.0500),
            RatingClass::CCC => dec!(0.1000),
        }
    }

    /// Lower and upper PD bound of this bucket.
    pub fn pd_range(&self) -> (Rate, Rate) {
        RATING_BUCKETS
            .iter()
            .find(|(class, _, _)| class == self)
            .map(|(_, lo, hi)| (*lo, *hi))
            .unwrap_or((Decimal::ZERO, Decimal::ONE))
    }
}

impl std::fmt::Display for RatingClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::AAA => "AAA",
            Self::AA => "AA",
            Self::A => "A",
            Self::BBB => "BBB",
            Self::BB => "BB",
            Self::B => "B",
            Self::CCC => "CCC",
        };
        write!(f, "{}", s)
    }
}

impl std::str::FromStr for RatingClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RatingClass::ALL
            .iter()
            .find(|class| class.to_string().eq_ignore_ascii_case(s.trim()))
            .copied()
            .ok_or_else(|| format!("Unknown rating class '{s}' (expected AAA..CCC)"))
    }
}

/// Map a 1-year PD onto its rating bucket.
///
/// Negative PDs land in AAA; anything at or above the CCC floor (including
/// PDs of 1 or more) is CCC.
pub fn rating_from_pd(pd: Rate) -> RatingClass {
    if pd < Decimal::ZERO {
        return RatingClass::AAA;
    }
    RATING_BUCKETS
        .iter()
        .find(|(_, lo, hi)| pd >= *lo && pd < *hi)
        .map(|(class, _, _)| *class)
        .unwrap_or(RatingClass::CCC)
}
