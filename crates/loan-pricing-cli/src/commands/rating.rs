use clap::Args;
use rust_decimal::Decimal;
use serde_json::{json, Value};

use loan_pricing_core::pricing::{rating_from_pd, RatingClass};

use super::CliResult;

/// Arguments for rating lookup
#[derive(Args)]
pub struct RatingArgs {
    /// One-year probability of default to classify
    #[arg(long, conflicts_with = "class")]
    pub pd: Option<Decimal>,

    /// Rating class to describe
    #[arg(long)]
    pub class: Option<RatingClass>,
}

fn describe(class: RatingClass) -> Value {
    let (lower, upper) = class.pd_range();
    json!({
        "rating_class": class,
        "representative_pd": class.representative_pd(),
        "pd_lower_bound": lower,
        "pd_upper_bound": upper,
    })
}

/// Classify a PD, describe one class, or list the whole scale.
pub fn run_rating(args: RatingArgs) -> CliResult<Value> {
    let result = match (args.pd, args.class) {
        (Some(pd), _) => {
            let mut v = describe(rating_from_pd(pd));
            v["pd_1y"] = json!(pd);
            v
        }
        (None, Some(class)) => describe(class),
        (None, None) => Value::Array(RatingClass::ALL.iter().copied().map(describe).collect()),
    };
    Ok(json!({ "result": result }))
}
