use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// All monetary values. Wraps Decimal to prevent accidental f64 usage.
pub type Money = Decimal;

/// Rates expressed as decimals (0.05 = 5%). Never as percentages.
pub type Rate = Decimal;

/// Year fractions or counts
pub type Years = Decimal;

/// Base risk-free rate used for the market rate and as the variable reference rate.
pub const RISK_FREE_RATE: Rate = dec!(0.03);

/// Repayment structure of a loan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepaymentType {
    /// Level instalments at a fixed contractual rate
    #[default]
    FixedAmortizing,
    /// Instalment recast every period at the variable reference rate
    VariableAmortizing,
    /// Interest-only at a fixed rate, principal at maturity
    FixedBullet,
    /// Interest-only at the variable reference rate, principal at maturity
    VariableBullet,
    /// Caller-supplied dated principal repayments
    Custom,
}

impl RepaymentType {
    pub fn is_variable(&self) -> bool {
        matches!(
            self,
            RepaymentType::VariableAmortizing | RepaymentType::VariableBullet
        )
    }
}

/// Instalment frequency. Ignored by the custom structure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentFrequency {
    #[default]
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl PaymentFrequency {
    pub fn periods_per_year(&self) -> u32 {
        match self {
            PaymentFrequency::Monthly => 12,
            PaymentFrequency::Quarterly => 4,
            PaymentFrequency::SemiAnnual => 2,
            PaymentFrequency::Annual => 1,
        }
    }

    /// Approximate spacing used to stamp due dates.
    pub fn days_between_periods(&self) -> i64 {
        match self {
            PaymentFrequency::Monthly => 30,
            PaymentFrequency::Quarterly => 90,
            PaymentFrequency::SemiAnnual => 180,
            PaymentFrequency::Annual => 365,
        }
    }
}

/// Contractual shape of a loan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    pub duration_years: Years,
    #[serde(default)]
    pub repayment_type: RepaymentType,
    #[serde(default)]
    pub payment_frequency: PaymentFrequency,
}

/// Bank funding assumptions. Defaults follow the standard pricing desk setup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FundingAssumptions {
    pub risk_free_rate: Rate,
    pub funding_spread: Rate,
    pub equity_cost: Rate,
    pub capital_ratio: Rate,
    pub variable_rate_spread: Rate,
}

impl Default for FundingAssumptions {
    fn default() -> Self {
        FundingAssumptions {
            risk_free_rate: RISK_FREE_RATE,
            funding_spread: dec!(0.015),
            equity_cost: dec!(0.12),
            capital_ratio: dec!(0.12),
            variable_rate_spread: Decimal::ZERO,
        }
    }
}

/// Standard computation output envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationOutput<T: Serialize> {
    pub result: T,
    pub methodology: String,
    pub assumptions: serde_json::Value,
    pub warnings: Vec<String>,
    pub metadata: ComputationMetadata,
}

/// Metadata for every computation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComputationMetadata {
    pub version: String,
    pub computation_time_us: u64,
    pub precision: String,
}

/// Helper to wrap computation results with metadata
pub fn with_metadata<T: Serialize>(
    methodology: &str,
    assumptions: &impl Serialize,
    warnings: Vec<String>,
    elapsed_us: u64,
    result: T,
) -> ComputationOutput<T> {
    ComputationOutput {
        result,
        methodology: methodology.to_string(),
        assumptions: serde_json::to_value(assumptions).unwrap_or_default(),
        warnings,
        metadata: ComputationMetadata {
            version: env!("CARGO_PKG_VERSION").to_string(),
            computation_time_us: elapsed_us,
            precision: "rust_decimal_128bit".to_string(),
        },
    }
}
