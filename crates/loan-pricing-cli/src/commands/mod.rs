pub mod analysis;
pub mod pricing;
pub mod rating;
pub mod schedule;

use clap::ValueEnum;
use loan_pricing_core::{PaymentFrequency, RepaymentType};

pub type CliResult<T> = Result<T, Box<dyn std::error::Error>>;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum FrequencyArg {
    Monthly,
    Quarterly,
    SemiAnnual,
    Annual,
}

impl From<FrequencyArg> for PaymentFrequency {
    fn from(arg: FrequencyArg) -> Self {
        match arg {
            FrequencyArg::Monthly => PaymentFrequency::Monthly,
            FrequencyArg::Quarterly => PaymentFrequency::Quarterly,
            FrequencyArg::SemiAnnual => PaymentFrequency::SemiAnnual,
            FrequencyArg::Annual => PaymentFrequency::Annual,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum RepaymentArg {
    FixedAmortizing,
    VariableAmortizing,
    FixedBullet,
    VariableBullet,
}

impl From<RepaymentArg> for RepaymentType {
    fn from(arg: RepaymentArg) -> Self {
        match arg {
            RepaymentArg::FixedAmortizing => RepaymentType::FixedAmortizing,
            RepaymentArg::VariableAmortizing => RepaymentType::VariableAmortizing,
            RepaymentArg::FixedBullet => RepaymentType::FixedBullet,
            RepaymentArg::VariableBullet => RepaymentType::VariableBullet,
        }
    }
}
