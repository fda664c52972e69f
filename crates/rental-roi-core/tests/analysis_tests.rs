use rental_roi_core::analysis::{analyze_property, AnalysisRequest};
use rental_roi_core::benchmarks::default_candidates;
use rental_roi_core::mortgage;
use rental_roi_core::projection::{project, Financing, InvestmentParameters};
use rental_roi_core::recommendation::{recommend, DecisionMetrics, RuleId, RuleSet};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn cash_purchase() -> InvestmentParameters {
    InvestmentParameters {
        purchase_price: dec!(500000),
        monthly_rent: dec!(2996),
        monthly_expenses: dec!(800),
        one_time_costs: dec!(25000),
        annual_appreciation: dec!(3),
        annual_rent_increase: dec!(2),
        vacancy_rate: dec!(5),
        financing: Financing::default(),
    }
}

// ===========================================================================
// Known-answer scenarios
// ===========================================================================

#[test]
fn test_cash_purchase_headline_metrics() {
    let result = project(&cash_purchase());

    assert_eq!(result.net_operating_income, dec!(24554.4));
    assert_eq!(result.monthly_cash_flow, dec!(2046.2));
    assert_eq!(result.total_investment, dec!(525000));
    assert!(
        (result.net_rental_yield - dec!(4.91)).abs() < dec!(0.005),
        "Expected yield ~4.91%, got {}",
        result.net_rental_yield
    );
    let break_even = result.break_even_years.unwrap();
    assert!(
        (break_even - dec!(21.38)).abs() < dec!(0.005),
        "Expected break-even ~21.38y, got {}",
        break_even
    );
}

#[test]
fn test_mortgage_against_amortization_table() {
    // 400k, 4.5%, 30 years: 2,026.74 per month in standard tables
    let payment = mortgage::monthly_payment(dec!(400000), dec!(4.5), dec!(30));
    assert!(
        payment > dec!(2026) && payment < dec!(2030),
        "Expected ~2026.74, got {}",
        payment
    );
    assert!((payment - dec!(2026.74)).abs() < dec!(2));
}

#[test]
fn test_zero_monthly_rate_is_exact_straight_line() {
    // 1e-28 % / 100 / 12 is below Decimal resolution: principal / months
    let payment = mortgage::monthly_payment(
        dec!(360000),
        dec!(0.0000000000000000000000000001),
        dec!(30),
    );
    assert_eq!(payment, dec!(360000) / dec!(360));
}

#[test]
fn test_near_zero_rate_approaches_straight_line() {
    // principal / months as the rate goes to zero
    let tiny = mortgage::monthly_payment(dec!(360000), dec!(0.0000001), dec!(30));
    assert!((tiny - dec!(1000)).abs() < dec!(0.01), "got {tiny}");
}

#[test]
fn test_high_yield_with_negative_cash_flow_is_rejected_for_cash_flow() {
    let m = DecisionMetrics {
        roi: dec!(8.2),
        monthly_cash_flow: dec!(-35),
        break_even_years: Some(dec!(12)),
    };
    let rules = RuleSet::standard();
    let rule = rules.evaluate(&m).unwrap();
    assert_eq!(rule.id, RuleId::NonPositiveCashFlow);
}

#[test]
fn test_heavily_leveraged_purchase_goes_cash_flow_negative() {
    let params = InvestmentParameters {
        purchase_price: dec!(200000),
        monthly_rent: dec!(1600),
        monthly_expenses: dec!(150),
        one_time_costs: dec!(5000),
        vacancy_rate: Decimal::ZERO,
        financing: Financing {
            use_financing: true,
            down_payment: dec!(10000),
            interest_rate: dec!(7.5),
            loan_term_years: dec!(15),
        },
        ..Default::default()
    };
    let result = project(&params);
    // NOI 17400 on 200k: 8.7% yield, but ~1761/month debt service
    assert_eq!(result.net_rental_yield, dec!(8.7));
    assert!(result.monthly_cash_flow < Decimal::ZERO);

    let rec = recommend(&result, &params, &default_candidates());
    assert_eq!(rec.rule, RuleId::NonPositiveCashFlow);
    assert!(!rec.decision);
    assert!(!rec.should_buy);
    // Cash-flow tips come first, then general advice
    assert_eq!(rec.tips.len(), 4);
    assert!(rec.tips[0].contains("expenses"));
}

// ===========================================================================
// Structural invariants
// ===========================================================================

#[test]
fn test_projection_shape_and_pull_through() {
    let mut params = cash_purchase();
    params.financing = Financing {
        use_financing: true,
        down_payment: dec!(125000),
        interest_rate: dec!(5.25),
        loan_term_years: dec!(25),
    };
    let result = project(&params);

    assert_eq!(result.projections.len(), 15);
    for (i, row) in result.projections.iter().enumerate() {
        assert_eq!(row.year as usize, i + 1);
    }
    assert_eq!(result.roi_5_year, result.projections[4].roi);
    assert_eq!(result.roi_10_year, result.projections[9].roi);
    assert_eq!(result.roi_15_year, result.projections[14].roi);
    assert_eq!(result.total_investment, dec!(150000));
}

#[test]
fn test_property_values_compound_from_purchase_price() {
    let result = project(&cash_purchase());
    let mut previous = dec!(500000);
    for row in &result.projections {
        assert!(row.property_value > previous);
        previous = row.property_value;
    }
    // 500000 * 1.03^15 ≈ 778,984
    let last = result.projections[14].property_value;
    assert!((last - dec!(778984)).abs() < dec!(1), "got {last}");
}

#[test]
fn test_full_analysis_envelope_serializes() {
    let out = analyze_property(&AnalysisRequest::from(cash_purchase()));
    let json = serde_json::to_value(&out).unwrap();

    assert!(json["result"]["analysis"]["projections"].is_array());
    assert_eq!(
        json["result"]["recommendation"]["rule"],
        serde_json::json!("YieldBelowMinimum")
    );
    assert_eq!(
        json["result"]["benchmark_comparison"][0]["name"],
        serde_json::json!("Rental Property")
    );
    assert!(json["metadata"]["version"].is_string());
}

#[test]
fn test_never_breaking_even_serializes_as_null() {
    let mut params = cash_purchase();
    params.monthly_rent = Decimal::ZERO;
    let result = project(&params);
    let json = serde_json::to_value(&result).unwrap();
    assert!(json["break_even_years"].is_null());
}
