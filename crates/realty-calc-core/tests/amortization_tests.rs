use pretty_assertions::assert_eq;
use realty_calc_core::amortization::{
    build_amortization, compute_schedule, views, AmortizationInput, ExtraPaymentMap, LoanParameters,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

fn loan(principal: Decimal, annual_rate: Decimal, ppy: u32, total: u32) -> LoanParameters {
    LoanParameters {
        principal,
        annual_rate,
        payments_per_year: ppy,
        total_payments: total,
        scheduled_payment: Decimal::ZERO,
        purchase_price: Decimal::ZERO,
    }
}

fn standard_loan() -> LoanParameters {
    loan(dec!(200000), dec!(0.06), 12, 360)
}

fn extras(entries: &[(u32, Decimal)]) -> ExtraPaymentMap {
    entries.iter().copied().collect()
}

// ===========================================================================
// Conservation and counting
// ===========================================================================

#[test]
fn test_principal_conserved_across_loans() {
    let cases = [
        loan(dec!(200000), dec!(0.06), 12, 360),
        loan(dec!(85000), dec!(0.0425), 12, 180),
        loan(dec!(1000), dec!(0.18), 12, 12),
        loan(dec!(500000), dec!(0.075), 4, 80),
        loan(dec!(12345.67), dec!(0.03), 26, 130),
        loan(dec!(60000), Decimal::ZERO, 12, 60),
    ];
    for params in &cases {
        let s = compute_schedule(params, &ExtraPaymentMap::new());
        let principal_sum: Decimal = s.periods.iter().map(|p| p.principal_applied).sum();
        assert!(
            (principal_sum - params.principal).abs() <= dec!(0.01),
            "principal {} repaid {}",
            params.principal,
            principal_sum
        );
        assert_eq!(s.final_balance(), Decimal::ZERO);
        assert_eq!(s.periods.len() - 1, s.actual_payment_count as usize);
        assert!(s.actual_payment_count <= params.total_payments);
    }
}

#[test]
fn test_count_bounded_by_total_payments_with_supplied_payment() {
    // A payment too small to amortize in time stops at total_payments
    let mut params = standard_loan();
    params.scheduled_payment = dec!(1100);
    let s = compute_schedule(&params, &ExtraPaymentMap::new());
    assert_eq!(s.actual_payment_count, 360);
    assert_eq!(s.periods.len(), 361);
    assert!(s.final_balance() > Decimal::ZERO);
}

#[test]
fn test_standard_scenario() {
    let s = compute_schedule(&standard_loan(), &ExtraPaymentMap::new());
    assert!((s.scheduled_payment - dec!(1199.10)).abs() < dec!(0.01));
    assert_eq!(s.actual_payment_count, 360);
    assert_eq!(s.final_balance(), Decimal::ZERO);
    assert_eq!(s.annual.len(), 30);
    assert_eq!(s.annual.last().map(|a| a.ending_balance), Some(Decimal::ZERO));
}

#[test]
fn test_cumulative_principal_plus_balance_is_principal_every_row() {
    let cases = [
        (loan(dec!(200000), dec!(0.06), 12, 360), extras(&[])),
        (loan(dec!(200000), dec!(0.06), 12, 360), extras(&[(1, dec!(500)), (5, dec!(250)), (120, dec!(20000))])),
        (loan(dec!(85000), dec!(0.0425), 12, 180), extras(&[(3, dec!(1000))])),
        (loan(dec!(500000), dec!(0.075), 4, 80), extras(&[])),
        (loan(dec!(12345.67), dec!(0.03), 26, 130), extras(&[(2, dec!(99.99)), (130, dec!(5))])),
        (loan(dec!(60000), Decimal::ZERO, 12, 60), extras(&[(60, dec!(100000))])),
    ];
    for (params, extra) in &cases {
        let s = compute_schedule(params, extra);
        assert!(!s.is_empty());
        for row in &s.periods {
            let drift = (row.cumulative_principal + row.remaining_balance - params.principal).abs();
            assert!(
                drift <= dec!(0.0000000001),
                "payment {} of {}: cumulative {} + balance {}",
                row.payment_number,
                params.principal,
                row.cumulative_principal,
                row.remaining_balance
            );
            assert_eq!(row.total_payment, row.scheduled_payment + row.extra_payment);
        }
    }
}

#[test]
fn test_annual_summary_counts_extra_payments() {
    let s = compute_schedule(&standard_loan(), &extras(&[(1, dec!(500)), (5, dec!(250))]));
    let year1 = &s.annual[0];
    assert_eq!(year1.year, 1);
    assert_eq!(year1.extra_paid, dec!(750));

    let rows_paid: Decimal = views::periods_for_loan_year(&s, 12, 1)
        .iter()
        .map(|p| p.total_payment)
        .sum();
    assert!((year1.total_paid - rows_paid).abs() <= dec!(0.0000000001));
    assert!((year1.total_paid - year1.extra_paid - dec!(12) * s.scheduled_payment).abs() <= dec!(0.0000000001));
    assert!((year1.total_paid - dec!(15139.21)).abs() < dec!(0.01));

    assert_eq!(s.annual[1].extra_paid, Decimal::ZERO);
    assert_eq!(s.total_extra, dec!(750));
}

// ===========================================================================
// Extra payments
// ===========================================================================

#[test]
fn test_single_extra_payment_shortens_loan() {
    let s = compute_schedule(&standard_loan(), &extras(&[(1, dec!(500))]));
    assert!(s.actual_payment_count < 360);
    assert_eq!(s.periods[1].extra_payment, dec!(500));
    assert_eq!(s.total_extra, dec!(500));
}

#[test]
fn test_extra_payment_monotonicity() {
    let base = compute_schedule(&standard_loan(), &ExtraPaymentMap::new()).actual_payment_count;
    for k in [1u32, 12, 120, 300, 359, 360] {
        let with_extra = compute_schedule(&standard_loan(), &extras(&[(k, dec!(1000))]));
        assert!(
            with_extra.actual_payment_count <= base,
            "extra at {k} lengthened schedule"
        );
    }
    // Beyond payoff: no effect at all
    let past = compute_schedule(&standard_loan(), &extras(&[(400, dec!(1000))]));
    assert_eq!(past.actual_payment_count, base);
    assert_eq!(past.total_extra, Decimal::ZERO);
}

#[test]
fn test_extra_capped_at_remaining_balance() {
    let s = compute_schedule(&loan(dec!(10000), dec!(0.05), 12, 24), &extras(&[(2, dec!(50000))]));
    assert_eq!(s.actual_payment_count, 2);
    assert_eq!(s.final_balance(), Decimal::ZERO);
    let last = &s.periods[2];
    assert_eq!(last.total_payment, last.principal_applied + last.interest);
    assert!(last.extra_payment < dec!(50000));
}

#[test]
fn test_idempotent() {
    let map = extras(&[(3, dec!(250)), (48, dec!(10000))]);
    let first = compute_schedule(&standard_loan(), &map);
    let second = compute_schedule(&standard_loan(), &map);
    assert_eq!(first, second);
}

// ===========================================================================
// Invalid terms
// ===========================================================================

#[test]
fn test_invalid_terms_give_empty_schedule() {
    let bad = [
        loan(Decimal::ZERO, dec!(0.06), 12, 360),
        loan(dec!(-5), dec!(0.06), 12, 360),
        loan(dec!(200000), dec!(-0.01), 12, 360),
        loan(dec!(200000), dec!(0.06), 0, 360),
        loan(dec!(200000), dec!(0.06), 12, 0),
    ];
    for params in &bad {
        let s = compute_schedule(params, &ExtraPaymentMap::new());
        assert!(s.is_empty());
        assert_eq!(s.actual_payment_count, 0);
    }
}

#[test]
fn test_wrapper_reports_reason() {
    let out = build_amortization(&AmortizationInput {
        loan: loan(Decimal::ZERO, dec!(0.06), 12, 360),
        extra_payments: ExtraPaymentMap::new(),
    })
    .unwrap();
    assert!(out.result.is_empty());
    assert!(out.warnings[0].starts_with("No schedule"));
}

#[test]
fn test_json_input_with_extra_map() {
    let json = r#"{
        "principal": "200000",
        "annual_rate": "0.06",
        "payments_per_year": 12,
        "total_payments": 360,
        "purchase_price": "250000",
        "extra_payments": { "1": "500", "2": "0", "0": "99" }
    }"#;
    let input: AmortizationInput = serde_json::from_str(json).unwrap();
    assert_eq!(input.extra_payments.len(), 1);
    let out = build_amortization(&input).unwrap();
    assert_eq!(out.result.periods[0].loan_to_value, Some(dec!(0.8)));
    assert!(out.result.actual_payment_count < 360);
}

// ===========================================================================
// Views
// ===========================================================================

#[test]
fn test_year_filter_matches_annual_summary() {
    let s = compute_schedule(&standard_loan(), &ExtraPaymentMap::new());
    let year3 = views::periods_for_loan_year(&s, 12, 3);
    assert_eq!(year3.len(), 12);
    assert_eq!(year3[0].payment_number, 25);
    let interest: Decimal = year3.iter().map(|p| p.interest).sum();
    assert_eq!(interest, s.annual[2].interest_paid);
    assert_eq!(views::loan_years(&s), 30);
}
