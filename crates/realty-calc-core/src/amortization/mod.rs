pub mod extra_payments;
pub mod schedule;
pub mod views;

pub use extra_payments::{ExtraPaymentMap, TotalPaymentEdit};
pub use schedule::{
    build_amortization, compute_schedule, AmortizationInput, AmortizationSchedule, AnnualSummary,
    LoanParameters, PeriodRecord,
};
