use napi::Result as NapiResult;
use napi_derive::napi;
use rust_decimal::Decimal;
use std::str::FromStr;

use loan_pricing_core::analysis::{analyze_loan as run_analysis, LoanPricingInput};
use loan_pricing_core::pricing::{compute_break_even, rating_from_pd as classify, BreakEvenInput};
use loan_pricing_core::schedule::{generate_schedule, ScheduleInput};

/// Convert any Display error into a napi::Error.
fn to_napi_error(e: impl std::fmt::Display) -> napi::Error {
    napi::Error::from_reason(e.to_string())
}

// ---------------------------------------------------------------------------
// Pricing
// ---------------------------------------------------------------------------

#[napi]
pub fn break_even(input_json: String) -> NapiResult<String> {
    let input: BreakEvenInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = compute_break_even(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

/// Rating class for a 1-year PD given as a decimal string, e.g. "0.01".
#[napi]
pub fn rating_from_pd(pd: String) -> NapiResult<String> {
    let pd = Decimal::from_str(pd.trim()).map_err(to_napi_error)?;
    Ok(classify(pd).to_string())
}

// ---------------------------------------------------------------------------
// Schedules
// ---------------------------------------------------------------------------

#[napi]
pub fn amortization_schedule(input_json: String) -> NapiResult<String> {
    let input: ScheduleInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = generate_schedule(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

#[napi]
pub fn analyze_loan(input_json: String) -> NapiResult<String> {
    let input: LoanPricingInput = serde_json::from_str(&input_json).map_err(to_napi_error)?;
    let output = run_analysis(&input).map_err(to_napi_error)?;
    serde_json::to_string(&output).map_err(to_napi_error)
}
