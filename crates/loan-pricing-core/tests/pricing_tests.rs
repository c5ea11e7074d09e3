use loan_pricing_core::pricing::{
    compute_break_even, rating_from_pd, BreakEvenInput, OperationalCosts, RatingClass,
};
use loan_pricing_core::{FundingAssumptions, LoanPricingError};
use pretty_assertions::assert_eq;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn bbb_loan() -> BreakEvenInput {
    // 500k over 10 years, BBB borrower, 45% LGD
    BreakEvenInput {
        principal: dec!(500_000),
        duration_years: dec!(10),
        pd_1y: Some(dec!(0.01)),
        rating_class: None,
        lgd: dec!(0.45),
        operational_costs: OperationalCosts::Amounts {
            initial_costs: dec!(2000),
            annual_costs: dec!(500),
        },
        funding: FundingAssumptions {
            risk_free_rate: dec!(0.03),
            funding_spread: dec!(0.015),
            equity_cost: dec!(0.12),
            capital_ratio: dec!(0.12),
            variable_rate_spread: Decimal::ZERO,
        },
    }
}

// ===========================================================================
// Break-even rate
// ===========================================================================

#[test]
fn test_bbb_scenario_break_even() {
    let b = compute_break_even(&bbb_loan()).unwrap().result;

    // market 4% + financial 2.76% + operational 1.4% + credit ~4.30% ≈ 12.46%
    assert_eq!(b.market_rate, dec!(0.04));
    assert_eq!(b.financial_spread, dec!(0.0276));
    assert_eq!(b.operational_spread, dec!(0.014));
    assert!(
        (b.break_even_rate - dec!(0.1246)).abs() < dec!(0.0001),
        "Expected break-even ~12.46%, got {}",
        b.break_even_rate
    );
    // EL = 500k * 0.0956 * 0.45 ≈ 21,514
    assert!((b.expected_loss - dec!(21514.03)).abs() < dec!(0.01));
}

#[test]
fn test_break_even_identity_exact() {
    for pd in [dec!(0.001), dec!(0.0123), dec!(0.2), dec!(0.85)] {
        for years in [dec!(0.5), dec!(1), dec!(7.25), dec!(30)] {
            let mut input = bbb_loan();
            input.pd_1y = Some(pd);
            input.duration_years = years;
            let b = compute_break_even(&input).unwrap().result;
            assert_eq!(
                b.break_even_rate,
                b.market_rate + b.financial_spread + b.operational_spread + b.credit_spread
            );
        }
    }
}

#[test]
fn test_idempotent() {
    let first = compute_break_even(&bbb_loan()).unwrap().result;
    let second = compute_break_even(&bbb_loan()).unwrap().result;
    assert_eq!(first, second);
}

#[test]
fn test_monotonic_in_pd() {
    let mut previous = Decimal::MIN;
    let mut pd = dec!(0.0005);
    while pd < dec!(0.5) {
        let mut input = bbb_loan();
        input.pd_1y = Some(pd);
        let rate = compute_break_even(&input).unwrap().result.break_even_rate;
        assert!(rate >= previous, "break-even fell at pd {pd}");
        previous = rate;
        pd += dec!(0.0125);
    }
}

#[test]
fn test_fractional_duration() {
    let mut input = bbb_loan();
    input.duration_years = dec!(2.5);
    let b = compute_break_even(&input).unwrap().result;
    // 1 - 0.99^2.5 ≈ 0.024814
    assert!((b.cumulative_default_probability - dec!(0.024814)).abs() < dec!(0.00001));
    assert_eq!(b.market_rate, dec!(0.0325));
}

#[test]
fn test_zero_lgd_means_no_credit_spread() {
    let mut input = bbb_loan();
    input.lgd = Decimal::ZERO;
    let b = compute_break_even(&input).unwrap().result;
    assert_eq!(b.credit_spread, Decimal::ZERO);
    assert_eq!(b.expected_loss, Decimal::ZERO);
}

#[test]
fn test_invalid_pd_names_field() {
    let mut input = bbb_loan();
    input.pd_1y = Some(Decimal::ZERO);
    match compute_break_even(&input) {
        Err(LoanPricingError::InvalidInput { field, .. }) => assert_eq!(field, "pd_1y"),
        other => panic!("Expected InvalidInput, got {:?}", other),
    }
}

#[test]
fn test_negative_operational_amounts_rejected() {
    let mut input = bbb_loan();
    input.operational_costs = OperationalCosts::Amounts {
        initial_costs: dec!(-1),
        annual_costs: dec!(500),
    };
    assert!(compute_break_even(&input).is_err());
}

#[test]
fn test_input_from_json() {
    let json = r#"{
        "principal": "500000",
        "duration_years": "10",
        "rating_class": "BBB",
        "lgd": "0.45",
        "operational_costs": { "kind": "amounts", "initial_costs": "2000", "annual_costs": "500" }
    }"#;
    let input: BreakEvenInput = serde_json::from_str(json).unwrap();
    let b = compute_break_even(&input).unwrap().result;
    assert_eq!(b.pd_1y, dec!(0.01));
    assert_eq!(b.financial_spread, dec!(0.0276));
}

// ===========================================================================
// Rating buckets
// ===========================================================================

#[test]
fn test_rating_ladder() {
    let cases = [
        (dec!(0.001), RatingClass::AAA),
        (dec!(0.0025), RatingClass::AA),
        (dec!(0.005), RatingClass::A),
        (dec!(0.01), RatingClass::BBB),
        (dec!(0.025), RatingClass::BB),
        (dec!(0.05), RatingClass::B),
        (dec!(0.10), RatingClass::CCC),
        (dec!(1.5), RatingClass::CCC),
    ];
    for (pd, expected) in cases {
        assert_eq!(rating_from_pd(pd), expected, "pd {pd}");
    }
}
