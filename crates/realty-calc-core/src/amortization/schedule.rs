use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::time::Instant;

use crate::amortization::extra_payments::ExtraPaymentMap;
use crate::time_value;
use crate::types::*;
use crate::RealtyCalcResult;

/// Balances at or below this are treated as paid off.
pub const PAYOFF_TOLERANCE: Decimal = dec!(0.005);

/// Terms of a level-payment loan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanParameters {
    /// Amount borrowed
    pub principal: Money,
    /// Nominal annual interest rate (0.065 = 6.5%)
    pub annual_rate: Rate,
    /// Payments per year (12 = monthly)
    pub payments_per_year: u32,
    /// Upper bound on the schedule length
    pub total_payments: u32,
    /// Regular payment; zero or negative means derive it with PMT
    #[serde(default)]
    pub scheduled_payment: Money,
    /// Purchase price used for loan-to-value; zero leaves LTV undefined
    #[serde(default)]
    pub purchase_price: Money,
}

/// One row of the schedule. Row 0 is the state before the first payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodRecord {
    pub payment_number: u32,
    pub scheduled_payment: Money,
    pub extra_payment: Money,
    pub total_payment: Money,
    pub principal_applied: Money,
    pub interest: Money,
    pub cumulative_principal: Money,
    pub cumulative_interest: Money,
    pub remaining_balance: Money,
    pub loan_to_value: Option<Rate>,
}

/// Per loan-year roll-up of the schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnualSummary {
    /// Loan year, 1-based
    pub year: u32,
    pub interest_paid: Money,
    /// Principal repaid, including extra payments
    pub principal_paid: Money,
    pub extra_paid: Money,
    pub total_paid: Money,
    pub ending_balance: Money,
    pub loan_to_value: Option<Rate>,
}

/// Full amortization result.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    /// Row 0 (initial state) followed by one row per payment made
    pub periods: Vec<PeriodRecord>,
    pub annual: Vec<AnnualSummary>,
    /// Payments actually needed, always `periods.len() - 1` (or 0 when empty)
    pub actual_payment_count: u32,
    /// Regular payment used for the run (derived or supplied)
    pub scheduled_payment: Money,
    pub total_interest: Money,
    pub total_principal: Money,
    pub total_extra: Money,
}

impl AmortizationSchedule {
    pub fn is_empty(&self) -> bool {
        self.periods.is_empty()
    }

    pub fn final_balance(&self) -> Money {
        self.periods
            .last()
            .map(|p| p.remaining_balance)
            .unwrap_or(Decimal::ZERO)
    }
}

/// Input for the schedule wrapper (loan terms plus extra payments).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AmortizationInput {
    #[serde(flatten)]
    pub loan: LoanParameters,
    #[serde(default)]
    pub extra_payments: ExtraPaymentMap,
}

fn loan_to_value(balance: Money, purchase_price: Money) -> Option<Rate> {
    if purchase_price > Decimal::ZERO {
        balance.checked_div(purchase_price)
    } else {
        None
    }
}

/// Why a schedule could not be produced, if it could not.
pub fn rejection_reason(params: &LoanParameters) -> Option<String> {
    if params.principal <= Decimal::ZERO {
        return Some("Loan principal must be positive".into());
    }
    if params.annual_rate < Decimal::ZERO {
        return Some("Annual rate cannot be negative".into());
    }
    if params.payments_per_year == 0 {
        return Some("Payments per year must be at least 1".into());
    }
    if params.total_payments == 0 {
        return Some("Total payments must be at least 1".into());
    }
    if resolve_payment(params).is_none() {
        return Some("Could not determine a valid payment amount".into());
    }
    None
}

/// The regular payment for a run: the supplied one if positive, otherwise the
/// level annuity payment. `None` when neither yields a positive amount.
pub fn resolve_payment(params: &LoanParameters) -> Option<Money> {
    if params.scheduled_payment > Decimal::ZERO {
        return Some(params.scheduled_payment);
    }
    if params.payments_per_year == 0 || params.total_payments == 0 {
        return None;
    }

    let periodic_rate = params.annual_rate / Decimal::from(params.payments_per_year);
    let derived = if periodic_rate.is_zero() {
        Some(params.principal / Decimal::from(params.total_payments))
    } else {
        time_value::pmt(
            periodic_rate,
            params.total_payments,
            -params.principal,
            Decimal::ZERO,
        )
        .ok()
    };

    derived.filter(|p| *p > Decimal::ZERO)
}

/// Rows reserved up front; longer schedules grow on demand.
const RESERVED_PERIODS: u32 = 1200;

/// Money movements of one payment period.
struct PeriodStep {
    scheduled: Money,
    extra: Money,
    total_payment: Money,
    principal_applied: Money,
    interest: Money,
    remaining_balance: Money,
}

/// Apply one period's interest and payment to `balance`. `None` when any
/// amount leaves the representable range.
fn advance(balance: Money, periodic_rate: Rate, payment: Money, extra: Money) -> Option<PeriodStep> {
    let interest = balance.checked_mul(periodic_rate)?;
    let owed = balance.checked_add(interest)?;

    let mut scheduled = payment;
    let mut scheduled_principal = scheduled.checked_sub(interest)?;

    // Final regular payment shrinks to exactly retire the loan
    if scheduled_principal > balance {
        scheduled_principal = balance;
        scheduled = owed;
    }

    let mut extra = extra;
    let mut total_payment = scheduled.checked_add(extra)?;
    let mut principal_applied = scheduled_principal.checked_add(extra)?;

    if total_payment > owed {
        principal_applied = balance;
        total_payment = owed;
        extra = total_payment.checked_sub(scheduled)?.max(Decimal::ZERO);
    }

    let mut remaining_balance = balance.checked_sub(principal_applied)?;
    if remaining_balance < Decimal::ZERO {
        principal_applied = balance;
        remaining_balance = Decimal::ZERO;
    } else if remaining_balance <= PAYOFF_TOLERANCE {
        // Sub-cent dust left by rounding the payment is swept into this period
        principal_applied = principal_applied.checked_add(remaining_balance)?;
        scheduled = scheduled.checked_add(remaining_balance)?;
        total_payment = total_payment.checked_add(remaining_balance)?;
        remaining_balance = Decimal::ZERO;
    }

    Some(PeriodStep {
        scheduled,
        extra,
        total_payment,
        principal_applied,
        interest,
        remaining_balance,
    })
}

/// Generate the period-by-period schedule and annual roll-up.
///
/// Invalid terms (non-positive principal or frequency, negative rate, no
/// resolvable payment) produce an empty schedule instead of an error, as
/// does a balance that grows past the range of `Decimal`.
pub fn compute_schedule(params: &LoanParameters, extra_payments: &ExtraPaymentMap) -> AmortizationSchedule {
    if params.principal <= Decimal::ZERO
        || params.annual_rate < Decimal::ZERO
        || params.payments_per_year == 0
        || params.total_payments == 0
    {
        tracing::debug!(principal = %params.principal, "loan terms invalid; empty schedule");
        return AmortizationSchedule::default();
    }

    let Some(payment) = resolve_payment(params) else {
        tracing::debug!("no valid payment amount; empty schedule");
        return AmortizationSchedule::default();
    };

    match run_schedule(params, payment, extra_payments) {
        Some(schedule) => {
            tracing::debug!(
                %payment,
                actual_payment_count = schedule.actual_payment_count,
                total_payments = params.total_payments,
                extra_entries = extra_payments.len(),
                "amortization schedule computed"
            );
            schedule
        }
        None => {
            tracing::warn!(%payment, "loan balance overflowed; empty schedule");
            AmortizationSchedule::default()
        }
    }
}

fn run_schedule(
    params: &LoanParameters,
    payment: Money,
    extra_payments: &ExtraPaymentMap,
) -> Option<AmortizationSchedule> {
    let periodic_rate = params.annual_rate / Decimal::from(params.payments_per_year);
    let ppy = params.payments_per_year;

    let reserved = params.total_payments.min(RESERVED_PERIODS);
    let mut periods = Vec::with_capacity(reserved as usize + 1);
    let mut annual = Vec::with_capacity((reserved / ppy) as usize + 1);

    let mut balance = params.principal;
    let mut cumulative_principal = Decimal::ZERO;
    let mut cumulative_interest = Decimal::ZERO;
    let mut total_extra = Decimal::ZERO;

    periods.push(PeriodRecord {
        payment_number: 0,
        scheduled_payment: Decimal::ZERO,
        extra_payment: Decimal::ZERO,
        total_payment: Decimal::ZERO,
        principal_applied: Decimal::ZERO,
        interest: Decimal::ZERO,
        cumulative_principal: Decimal::ZERO,
        cumulative_interest: Decimal::ZERO,
        remaining_balance: balance,
        loan_to_value: loan_to_value(balance, params.purchase_price),
    });

    let mut year = 1u32;
    let mut year_interest = Decimal::ZERO;
    let mut year_principal = Decimal::ZERO;
    let mut year_extra = Decimal::ZERO;

    for i in 1..=params.total_payments {
        if balance <= PAYOFF_TOLERANCE {
            break;
        }

        let step = advance(balance, periodic_rate, payment, extra_payments.get(i))?;
        balance = step.remaining_balance;

        cumulative_principal = cumulative_principal.checked_add(step.principal_applied)?;
        cumulative_interest = cumulative_interest.checked_add(step.interest)?;
        total_extra = total_extra.checked_add(step.extra)?;
        year_interest = year_interest.checked_add(step.interest)?;
        year_principal = year_principal.checked_add(step.principal_applied)?;
        year_extra = year_extra.checked_add(step.extra)?;

        let ltv = loan_to_value(balance, params.purchase_price);
        periods.push(PeriodRecord {
            payment_number: i,
            scheduled_payment: step.scheduled,
            extra_payment: step.extra,
            total_payment: step.total_payment,
            principal_applied: step.principal_applied,
            interest: step.interest,
            cumulative_principal,
            cumulative_interest,
            remaining_balance: balance,
            loan_to_value: ltv,
        });

        if i % ppy == 0 || balance <= PAYOFF_TOLERANCE || i == params.total_payments {
            annual.push(AnnualSummary {
                year,
                interest_paid: year_interest,
                principal_paid: year_principal,
                extra_paid: year_extra,
                total_paid: year_interest.checked_add(year_principal)?,
                ending_balance: balance,
                loan_to_value: ltv,
            });
            year += 1;
            year_interest = Decimal::ZERO;
            year_principal = Decimal::ZERO;
            year_extra = Decimal::ZERO;
        }
    }

    let actual_payment_count = (periods.len() - 1) as u32;
    Some(AmortizationSchedule {
        periods,
        annual,
        actual_payment_count,
        scheduled_payment: payment,
        total_interest: cumulative_interest,
        total_principal: cumulative_principal,
        total_extra,
    })
}

/// Build a schedule wrapped in the standard output envelope.
///
/// Invalid terms still succeed with an empty schedule; the reason is reported
/// as a warning.
pub fn build_amortization(
    input: &AmortizationInput,
) -> RealtyCalcResult<ComputationOutput<AmortizationSchedule>> {
    let start = Instant::now();
    let mut warnings: Vec<String> = Vec::new();

    if let Some(reason) = rejection_reason(&input.loan) {
        warnings.push(format!("No schedule: {reason}"));
    }

    let schedule = compute_schedule(&input.loan, &input.extra_payments);
    if schedule.is_empty() && warnings.is_empty() {
        warnings.push(
            "No schedule: the balance grows beyond the representable range because the payment does not cover interest"
                .into(),
        );
    }

    if let Some(first) = schedule.periods.get(1) {
        if first.principal_applied < Decimal::ZERO {
            warnings.push(format!(
                "Scheduled payment {} does not cover first-period interest {}; balance grows",
                first.scheduled_payment.round_dp(2),
                first.interest.round_dp(2)
            ));
        }
    }
    if !schedule.is_empty() && schedule.final_balance() > Decimal::ZERO {
        warnings.push(format!(
            "Balance of {} remains after {} payments",
            schedule.final_balance().round_dp(2),
            input.loan.total_payments
        ));
    }
    let beyond_payoff: Vec<u32> = input
        .extra_payments
        .iter()
        .map(|(n, _)| n)
        .filter(|n| *n > schedule.actual_payment_count)
        .collect();
    if !schedule.is_empty() && !beyond_payoff.is_empty() {
        warnings.push(format!(
            "{} extra payment(s) fall after payoff and were ignored",
            beyond_payoff.len()
        ));
    }

    let elapsed = start.elapsed().as_micros() as u64;
    Ok(with_metadata(
        "Level-payment amortization with extra principal",
        &serde_json::json!({
            "principal": input.loan.principal.to_string(),
            "annual_rate": input.loan.annual_rate.to_string(),
            "payments_per_year": input.loan.payments_per_year,
            "total_payments": input.loan.total_payments,
            "payment_derived": input.loan.scheduled_payment <= Decimal::ZERO,
            "extra_payments": input.extra_payments.len(),
        }),
        warnings,
        elapsed,
        schedule,
    ))
}
