use chrono::{Local, NaiveDate};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::{compute_schedule, AmortizationSchedule, ExtraPaymentMap};
use crate::projection::{
    clamp_adjustment, project_adjusted, summarize_years, MonthlyCumulativeRecord, YearlyProjection,
};
use crate::summary::{compute_summary, PropertyInput, PropertySummary};
use crate::types::*;
use crate::RealtyCalcResult;

/// A property plus the what-if state layered on top of it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub property: PropertyInput,
    #[serde(default)]
    pub extra_payments: ExtraPaymentMap,
    /// What-if percentage in [-10, 10]
    #[serde(default)]
    pub adjustment_pct: Decimal,
}

/// Everything the calculator shows for one property.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertyAnalysis {
    pub summary: PropertySummary,
    pub schedule: AmortizationSchedule,
    pub projection_start: NaiveDate,
    pub adjustment_pct: Decimal,
    pub projection: Vec<MonthlyCumulativeRecord>,
    pub yearly_projection: Vec<YearlyProjection>,
}

/// Projection horizon: the loan term in calendar months.
pub fn horizon_months(loan_term_years: Decimal) -> i32 {
    loan_term_years
        .checked_mul(dec!(12))
        .and_then(|months| months.round().to_i32())
        .unwrap_or(0)
}

/// Closing date, or today when none was entered.
pub fn projection_anchor(input: &PropertyInput, warnings: &mut Vec<String>) -> NaiveDate {
    match input.closing_date {
        Some(date) => date,
        None => {
            let today = Local::now().date_naive();
            warnings.push(format!("No closing date; projecting from {today}"));
            today
        }
    }
}

/// Run the whole pipeline from already-validated parts.
pub fn compute_analysis(
    property: &PropertyInput,
    extra_payments: &ExtraPaymentMap,
    adjustment_pct: Decimal,
    start_date: NaiveDate,
    warnings: &mut Vec<String>,
) -> PropertyAnalysis {
    let summary = compute_summary(property, warnings);

    let params = summary.loan.loan_parameters(
        property.annual_interest_rate,
        property.payments_per_year,
        property.purchase_price,
    );
    let schedule = compute_schedule(&params, extra_payments);

    let pct = clamp_adjustment(adjustment_pct);
    let projection = project_adjusted(
        &summary.operating.cash_flow_base(),
        pct,
        horizon_months(property.loan_term_years),
        start_date,
    );
    let yearly_projection = summarize_years(&projection);

    PropertyAnalysis {
        summary,
        schedule,
        projection_start: start_date,
        adjustment_pct: pct,
        projection,
        yearly_projection,
    }
}

/// Summary, amortization schedule and cumulative projection in one pass.
pub fn analyze_property(
    request: &AnalysisRequest,
) -> RealtyCalcResult<ComputationOutput<PropertyAnalysis>> {
    let start = Instant::now();
    request.property.validate()?;

    let mut warnings: Vec<String> = Vec::new();
    let anchor = projection_anchor(&request.property, &mut warnings);

    let clamped = clamp_adjustment(request.adjustment_pct);
    if clamped != request.adjustment_pct {
        warnings.push(format!(
            "Adjustment {}% clamped to {}%",
            request.adjustment_pct, clamped
        ));
    }

    let analysis = compute_analysis(
        &request.property,
        &request.extra_payments,
        clamped,
        anchor,
        &mut warnings,
    );

    if analysis.schedule.is_empty() && !request.extra_payments.is_empty() {
        warnings.push("Extra payments ignored: there is no loan to amortize".into());
    }
    if analysis.projection.is_empty() {
        warnings.push("Projection is empty (zero horizon or no revenue and expenses)".into());
    }

    tracing::debug!(
        payments = analysis.schedule.actual_payment_count,
        months = analysis.projection.len(),
        "property analysis computed"
    );

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Property summary, amortization with extra payments, cumulative cash-flow projection",
        &serde_json::json!({
            "projection_start": anchor.to_string(),
            "horizon_months": horizon_months(request.property.loan_term_years),
            "adjustment_pct": clamped.to_string(),
            "extra_payment_entries": request.extra_payments.len(),
        }),
        warnings,
        elapsed,
        analysis,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::{ClosingItems, DownPayment, LineItem, VacancyRates};

    fn property() -> PropertyInput {
        PropertyInput {
            address: Some("7 Harbour Rd".into()),
            purchase_price: dec!(250000),
            down_payment: DownPayment::Rate(dec!(0.2)),
            annual_interest_rate: dec!(0.06),
            loan_term_years: dec!(30),
            payments_per_year: 12,
            closing_cost_rate: dec!(0.03),
            closing_items: ClosingItems::default(),
            annual_property_tax: dec!(3600),
            closing_date: NaiveDate::from_ymd_opt(2025, 3, 14),
            revenue: vec![LineItem::new("Rent", dec!(2200), dec!(2400))],
            expenses: vec![LineItem::new("Insurance", dec!(-150), dec!(-150))],
            vacancy_rate: VacancyRates::default(),
        }
    }

    #[test]
    fn test_pipeline_lengths() {
        let out = analyze_property(&AnalysisRequest {
            property: property(),
            extra_payments: ExtraPaymentMap::new(),
            adjustment_pct: Decimal::ZERO,
        })
        .unwrap();
        let a = &out.result;
        assert_eq!(a.schedule.actual_payment_count, 360);
        assert_eq!(a.projection.len(), 360);
        assert_eq!(a.projection[0].label, "Apr-2025");
        assert_eq!(a.schedule.scheduled_payment, a.summary.loan.payment_per_period);
        assert!(out.warnings.is_empty(), "{:?}", out.warnings);
    }

    #[test]
    fn test_extra_payments_shorten_schedule() {
        let mut extras = ExtraPaymentMap::new();
        extras.set(1, dec!(20000)).unwrap();
        let out = analyze_property(&AnalysisRequest {
            property: property(),
            extra_payments: extras,
            adjustment_pct: Decimal::ZERO,
        })
        .unwrap();
        assert!(out.result.schedule.actual_payment_count < 360);
    }

    #[test]
    fn test_missing_closing_date_warns() {
        let mut p = property();
        p.closing_date = None;
        let out = analyze_property(&AnalysisRequest {
            property: p,
            extra_payments: ExtraPaymentMap::new(),
            adjustment_pct: dec!(30),
        })
        .unwrap();
        assert_eq!(out.result.adjustment_pct, dec!(10));
        assert!(out.warnings.iter().any(|w| w.contains("No closing date")));
        assert!(out.warnings.iter().any(|w| w.contains("clamped")));
    }

    #[test]
    fn test_horizon_months() {
        assert_eq!(horizon_months(dec!(30)), 360);
        assert_eq!(horizon_months(dec!(15.5)), 186);
        assert_eq!(horizon_months(Decimal::ZERO), 0);
        assert_eq!(horizon_months(Decimal::MAX), 0);
    }
}
