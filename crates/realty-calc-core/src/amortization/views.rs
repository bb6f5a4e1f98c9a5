use crate::amortization::schedule::{AmortizationSchedule, PeriodRecord};

const MONTH_ABBREVIATIONS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Number of loan years the schedule spans (at least 1 for a non-empty schedule).
pub fn loan_years(schedule: &AmortizationSchedule) -> u32 {
    schedule.annual.last().map(|a| a.year).unwrap_or(0)
}

/// Payment rows belonging to a 1-based loan year. Row 0 is never included.
pub fn periods_for_loan_year(
    schedule: &AmortizationSchedule,
    payments_per_year: u32,
    year: u32,
) -> &[PeriodRecord] {
    if year == 0 || payments_per_year == 0 || schedule.periods.len() <= 1 {
        return &[];
    }
    let payments = &schedule.periods[1..];
    let Some(start) = (year - 1).checked_mul(payments_per_year) else {
        return &[];
    };
    let start = start as usize;
    if start >= payments.len() {
        return &[];
    }
    let end = year
        .checked_mul(payments_per_year)
        .map_or(payments.len(), |end| (end as usize).min(payments.len()));
    &payments[start..end]
}

/// Display label for a payment row, e.g. `Mar 2027`.
///
/// Rows are placed by their index within the loan year, so this is only
/// meaningful for monthly schedules; other frequencies get `#n YYYY`.
pub fn calendar_label(payment_number: u32, payments_per_year: u32, start_calendar_year: i32) -> String {
    if payment_number == 0 || payments_per_year == 0 {
        return format!("Start {start_calendar_year}");
    }
    let index_in_year = (payment_number - 1) % payments_per_year;
    let loan_year = (payment_number - 1) / payments_per_year;
    let calendar_year = start_calendar_year.saturating_add(i32::try_from(loan_year).unwrap_or(i32::MAX));
    if payments_per_year == 12 {
        format!("{} {}", MONTH_ABBREVIATIONS[index_in_year as usize], calendar_year)
    } else {
        format!("#{} {}", index_in_year + 1, calendar_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amortization::extra_payments::ExtraPaymentMap;
    use crate::amortization::schedule::{compute_schedule, LoanParameters};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn schedule() -> AmortizationSchedule {
        compute_schedule(
            &LoanParameters {
                principal: dec!(10000),
                annual_rate: dec!(0.05),
                payments_per_year: 12,
                total_payments: 30,
                scheduled_payment: Decimal::ZERO,
                purchase_price: Decimal::ZERO,
            },
            &ExtraPaymentMap::new(),
        )
    }

    #[test]
    fn test_loan_years_counts_partial_year() {
        assert_eq!(loan_years(&schedule()), 3);
    }

    #[test]
    fn test_year_beyond_u32_range_is_empty() {
        let sched = schedule();
        assert!(periods_for_loan_year(&sched, 12, u32::MAX).is_empty());
        assert!(periods_for_loan_year(&sched, u32::MAX, 2).is_empty());
        assert_eq!(periods_for_loan_year(&sched, u32::MAX, 1).len(), 30);
    }

    #[test]
    fn test_periods_for_year() {
        let sched = schedule();
        let y1 = periods_for_loan_year(&sched, 12, 1);
        assert_eq!(y1.len(), 12);
        assert_eq!(y1[0].payment_number, 1);
        let y3 = periods_for_loan_year(&sched, 12, 3);
        assert_eq!(y3.len(), 6);
        assert_eq!(y3[0].payment_number, 25);
        assert!(periods_for_loan_year(&sched, 12, 4).is_empty());
        assert!(periods_for_loan_year(&sched, 12, 0).is_empty());
    }

    #[test]
    fn test_calendar_labels() {
        assert_eq!(calendar_label(1, 12, 2025), "Jan 2025");
        assert_eq!(calendar_label(14, 12, 2025), "Feb 2026");
        assert_eq!(calendar_label(3, 4, 2025), "#3 2025");
    }
}
