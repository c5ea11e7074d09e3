use chrono::{Duration, NaiveDate};
use loan_pricing_core::schedule::{
    generate_schedule, total_interest, AmortizationSchedule, CustomCashflowEntry, ScheduleInput,
};
use loan_pricing_core::{LoanPricingError, PaymentFrequency, RepaymentType, RISK_FREE_RATE};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 1, 15).unwrap()
}

fn input(repayment_type: RepaymentType, frequency: PaymentFrequency) -> ScheduleInput {
    ScheduleInput {
        principal: dec!(100_000),
        annual_rate: dec!(0.05),
        duration_years: dec!(1),
        frequency,
        repayment_type,
        variable_spread: Decimal::ZERO,
        reference_rate: RISK_FREE_RATE,
        custom_entries: Vec::new(),
        starting_balance: None,
        reference_date: today(),
    }
}

fn assert_well_formed(sched: &AmortizationSchedule) {
    for (i, p) in sched.periods.iter().enumerate() {
        assert_eq!(p.period_index, (i + 1) as u32, "gap in period indices");
        assert!(p.remaining_balance >= Decimal::ZERO);
        assert_eq!(p.payment_amount, p.principal_component + p.interest_component);
    }
}

// ===========================================================================
// Bullet
// ===========================================================================

#[test]
fn test_fixed_bullet_monthly_scenario() {
    let sched = generate_schedule(&input(RepaymentType::FixedBullet, PaymentFrequency::Monthly))
        .unwrap()
        .result;
    assert_eq!(sched.periods.len(), 12);
    assert_well_formed(&sched);

    let monthly_interest = dec!(100_000) * (dec!(0.05) / dec!(12));
    for p in &sched.periods[..11] {
        assert_eq!(p.principal_component, Decimal::ZERO);
        assert_eq!(p.interest_component, monthly_interest);
        assert_eq!(p.remaining_balance, dec!(100_000));
    }
    let last = &sched.periods[11];
    assert_eq!(last.principal_component, dec!(100_000));
    assert!((last.interest_component - dec!(416.67)).abs() < dec!(0.01));
    assert_eq!(last.remaining_balance, Decimal::ZERO);
}

#[test]
fn test_variable_bullet_ignores_contractual_rate() {
    let mut i = input(RepaymentType::VariableBullet, PaymentFrequency::Quarterly);
    i.annual_rate = dec!(0.50);
    i.variable_spread = dec!(0.01);
    let sched = generate_schedule(&i).unwrap().result;
    // (0.03 + 0.01) / 4 = 1% per quarter
    assert_eq!(sched.periods.len(), 4);
    assert_eq!(sched.periods[0].interest_component, dec!(1000));
    assert_eq!(sched.final_balance(), Decimal::ZERO);
}

// ===========================================================================
// Amortizing
// ===========================================================================

#[test]
fn test_fixed_amortizing_principal_sums_to_loan() {
    for frequency in [
        PaymentFrequency::Monthly,
        PaymentFrequency::Quarterly,
        PaymentFrequency::SemiAnnual,
        PaymentFrequency::Annual,
    ] {
        let mut i = input(RepaymentType::FixedAmortizing, frequency);
        i.principal = dec!(500_000);
        i.duration_years = dec!(10);
        i.annual_rate = dec!(0.1246);
        let sched = generate_schedule(&i).unwrap().result;
        assert_well_formed(&sched);

        let principal_sum: Decimal = sched.periods.iter().map(|p| p.principal_component).sum();
        let rel = ((principal_sum - dec!(500_000)) / dec!(500_000)).abs();
        assert!(rel < dec!(0.000001), "{frequency:?}: principal sum {principal_sum}");
        assert_eq!(sched.final_balance(), Decimal::ZERO);
    }
}

#[test]
fn test_fixed_amortizing_level_payment() {
    let sched = generate_schedule(&input(
        RepaymentType::FixedAmortizing,
        PaymentFrequency::Monthly,
    ))
    .unwrap()
    .result;
    let first = sched.periods[0].payment_amount;
    for p in &sched.periods[..11] {
        assert!((p.payment_amount - first).abs() < dec!(0.0000001));
    }
    // Balance decays monotonically
    for pair in sched.periods.windows(2) {
        assert!(pair[1].remaining_balance < pair[0].remaining_balance);
    }
}

#[test]
fn test_variable_amortizing_recasts_each_period() {
    let mut i = input(RepaymentType::VariableAmortizing, PaymentFrequency::Monthly);
    i.duration_years = dec!(2);
    i.variable_spread = dec!(0.02);
    let sched = generate_schedule(&i).unwrap().result;
    assert_eq!(sched.periods.len(), 24);
    assert_well_formed(&sched);
    assert_eq!(sched.periodic_rate, Some(dec!(0.05) / dec!(12)));
    assert_eq!(sched.final_balance(), Decimal::ZERO);
}

#[test]
fn test_fractional_duration_rounds_periods() {
    let mut i = input(RepaymentType::FixedAmortizing, PaymentFrequency::Monthly);
    i.duration_years = dec!(2.75);
    let sched = generate_schedule(&i).unwrap().result;
    assert_eq!(sched.periods.len(), 33);
}

#[test]
fn test_due_dates_anchor_on_reference_date() {
    let sched = generate_schedule(&input(RepaymentType::FixedBullet, PaymentFrequency::Quarterly))
        .unwrap()
        .result;
    for p in &sched.periods {
        assert_eq!(p.due_date, today() + Duration::days(90 * i64::from(p.period_index)));
    }
}

#[test]
fn test_extreme_rates_over_thirty_years() {
    for annual in [dec!(3), dec!(35), dec!(500)] {
        for repayment_type in [RepaymentType::FixedAmortizing, RepaymentType::VariableAmortizing] {
            let mut i = input(repayment_type, PaymentFrequency::Monthly);
            i.principal = dec!(500_000);
            i.duration_years = dec!(30);
            i.annual_rate = annual;
            i.variable_spread = annual - RISK_FREE_RATE;
            let sched = generate_schedule(&i)
                .unwrap_or_else(|e| panic!("{repayment_type:?} at {annual}: {e}"))
                .result;
            assert_eq!(sched.periods.len(), 360);
            assert_well_formed(&sched);
            assert_eq!(sched.final_balance(), Decimal::ZERO);
            assert!((sched.total_principal - dec!(500_000)).abs() < dec!(0.000001));
            // Interest-only in practice: the first instalment barely amortizes
            let first = &sched.periods[0];
            assert!(first.principal_component < dec!(0.01));
        }
    }
}

#[test]
fn test_long_horizon_at_ordinary_rate() {
    let mut i = input(RepaymentType::FixedAmortizing, PaymentFrequency::Monthly);
    i.duration_years = dec!(100);
    let sched = generate_schedule(&i).unwrap().result;
    assert_eq!(sched.periods.len(), 1200);
    assert_eq!(sched.final_balance(), Decimal::ZERO);
}

#[test]
fn test_absurd_duration_is_an_error() {
    let mut i = input(RepaymentType::FixedAmortizing, PaymentFrequency::Monthly);
    i.duration_years = Decimal::MAX;
    match generate_schedule(&i) {
        Err(LoanPricingError::InvalidSchedule { cause }) => assert!(cause.contains("too many")),
        other => panic!("Expected InvalidSchedule, got {:?}", other),
    }
}

// ===========================================================================
// Custom
// ===========================================================================

fn two_tranche_entries() -> Vec<CustomCashflowEntry> {
    vec![
        CustomCashflowEntry {
            due_date: today() + Duration::days(180),
            principal_repayment_amount: dec!(60_000),
            note: "first tranche".into(),
        },
        CustomCashflowEntry {
            due_date: today() + Duration::days(365),
            principal_repayment_amount: dec!(40_000),
            note: "final tranche".into(),
        },
    ]
}

#[test]
fn test_custom_two_entries_scenario() {
    let mut i = input(RepaymentType::Custom, PaymentFrequency::Monthly);
    i.annual_rate = dec!(0.04);
    i.custom_entries = two_tranche_entries();
    let out = generate_schedule(&i).unwrap();
    let sched = &out.result;

    assert!(sched.imbalance.is_none());
    assert!(out.warnings.is_empty());
    assert_eq!(sched.periods.len(), 2);
    assert_well_formed(sched);

    let first = &sched.periods[0];
    assert!((first.interest_component - dec!(1972.60)).abs() < dec!(0.01));
    assert_eq!(first.remaining_balance, dec!(40_000));

    // 40k * 4% * 185/365
    let second = &sched.periods[1];
    assert!((second.interest_component - dec!(810.96)).abs() < dec!(0.01));
    assert_eq!(second.remaining_balance, Decimal::ZERO);
    assert_eq!(sched.total_interest, total_interest(&sched.periods));
}

#[test]
fn test_custom_imbalance_is_a_warning() {
    let mut i = input(RepaymentType::Custom, PaymentFrequency::Monthly);
    i.principal = dec!(120_000);
    i.custom_entries = two_tranche_entries();
    let out = generate_schedule(&i).unwrap();

    let imbalance = out.result.imbalance.clone().expect("imbalance reported");
    assert_eq!(imbalance.scheduled_principal, dec!(100_000));
    assert_eq!(imbalance.difference, dec!(-20_000));
    assert_eq!(out.warnings.len(), 1);
    // Opening balance defaults to the sum of entries, so it still closes at zero
    assert_eq!(out.result.final_balance(), Decimal::ZERO);
}

#[test]
fn test_custom_explicit_starting_balance_leaves_residual() {
    let mut i = input(RepaymentType::Custom, PaymentFrequency::Monthly);
    i.principal = dec!(120_000);
    i.starting_balance = Some(dec!(120_000));
    i.custom_entries = two_tranche_entries();
    let sched = generate_schedule(&i).unwrap().result;
    assert_eq!(sched.final_balance(), dec!(20_000));
    // 120k * 5% * 180/365
    assert!((sched.periods[0].interest_component - dec!(2958.90)).abs() < dec!(0.01));
}

// ===========================================================================
// Errors
// ===========================================================================

#[test]
fn test_zero_principal_rejected() {
    let mut i = input(RepaymentType::FixedAmortizing, PaymentFrequency::Monthly);
    i.principal = Decimal::ZERO;
    assert!(matches!(
        generate_schedule(&i),
        Err(LoanPricingError::InvalidSchedule { .. })
    ));
}

#[test]
fn test_no_periods_rejected() {
    let mut i = input(RepaymentType::FixedBullet, PaymentFrequency::Annual);
    i.duration_years = dec!(0.3);
    match generate_schedule(&i) {
        Err(LoanPricingError::InvalidSchedule { cause }) => assert!(cause.contains("periods")),
        other => panic!("Expected InvalidSchedule, got {:?}", other),
    }
}

#[test]
fn test_empty_custom_rejected() {
    let i = input(RepaymentType::Custom, PaymentFrequency::Monthly);
    match generate_schedule(&i) {
        Err(LoanPricingError::InvalidSchedule { cause }) => assert!(cause.contains("no entries")),
        other => panic!("Expected InvalidSchedule, got {:?}", other),
    }
}
