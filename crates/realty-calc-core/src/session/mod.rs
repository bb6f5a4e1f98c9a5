pub mod debounce;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use std::time::{Duration, Instant};

use crate::amortization::schedule::rejection_reason;
use crate::amortization::{ExtraPaymentMap, TotalPaymentEdit};
use crate::analysis::{compute_analysis, projection_anchor, PropertyAnalysis};
use crate::error::RealtyCalcError;
use crate::projection::{clamp_adjustment, parse_adjustment, CashFlowBase};
use crate::summary::PropertyInput;
use crate::RealtyCalcResult;

pub use debounce::{RecomputeDebouncer, EXTRA_PAYMENT_DEBOUNCE_MS, FORM_INPUT_DEBOUNCE_MS};

/// What prompted a recompute; selects the debounce window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecomputeTrigger {
    FormInput,
    ExtraPayment,
    Adjustment,
}

impl RecomputeTrigger {
    pub fn window(self) -> Duration {
        match self {
            RecomputeTrigger::ExtraPayment => Duration::from_millis(EXTRA_PAYMENT_DEBOUNCE_MS),
            RecomputeTrigger::FormInput | RecomputeTrigger::Adjustment => {
                Duration::from_millis(FORM_INPUT_DEBOUNCE_MS)
            }
        }
    }
}

/// Interactive state of one calculator: the input snapshot, the extra
/// payments entered against the schedule and the what-if adjustment.
///
/// Mutators only change state and mark the analysis stale. Call
/// [`recompute`](Self::recompute) directly, or go through
/// [`request_recompute`](Self::request_recompute) and
/// [`poll`](Self::poll) to coalesce bursts of edits.
#[derive(Debug)]
pub struct ProjectionSession {
    input: PropertyInput,
    start_date: NaiveDate,
    extra_payments: ExtraPaymentMap,
    adjustment_pct: Decimal,
    analysis: PropertyAnalysis,
    warnings: Vec<String>,
    stale: bool,
    debouncer: RecomputeDebouncer<RecomputeTrigger>,
}

impl ProjectionSession {
    pub fn new(input: PropertyInput) -> RealtyCalcResult<Self> {
        input.validate()?;
        let mut warnings = Vec::new();
        let start_date = projection_anchor(&input, &mut warnings);
        let extra_payments = ExtraPaymentMap::new();
        let analysis = compute_analysis(&input, &extra_payments, Decimal::ZERO, start_date, &mut warnings);

        Ok(Self {
            input,
            start_date,
            extra_payments,
            adjustment_pct: Decimal::ZERO,
            analysis,
            warnings,
            stale: false,
            debouncer: RecomputeDebouncer::new(),
        })
    }

    /// Swap in a new input snapshot. Extra payments are dropped when the
    /// new loan terms cannot produce a schedule.
    pub fn replace_input(&mut self, input: PropertyInput) -> RealtyCalcResult<()> {
        input.validate()?;
        let mut scratch = Vec::new();
        let loan = crate::summary::compute_loan_profile(&input, &mut scratch);
        let params = loan.loan_parameters(input.annual_interest_rate, input.payments_per_year, input.purchase_price);
        if let Some(reason) = rejection_reason(&params) {
            if !self.extra_payments.is_empty() {
                tracing::debug!(%reason, "loan invalid; clearing extra payments");
            }
            self.extra_payments.clear();
        }

        self.start_date = projection_anchor(&input, &mut Vec::new());
        self.input = input;
        self.stale = true;
        Ok(())
    }

    /// Set the what-if percentage; returns the clamped value actually used.
    pub fn set_adjustment(&mut self, pct: Decimal) -> Decimal {
        let clamped = clamp_adjustment(pct);
        if clamped != self.adjustment_pct {
            self.adjustment_pct = clamped;
            self.stale = true;
        }
        clamped
    }

    /// Set the adjustment from user text; anything non-numeric means 0.
    pub fn adjustment_from_text(&mut self, text: &str) -> Decimal {
        self.set_adjustment(parse_adjustment(text))
    }

    /// Edit the total payment shown on a schedule row.
    pub fn edit_total_payment(&mut self, payment_number: u32, new_total: Decimal) -> RealtyCalcResult<TotalPaymentEdit> {
        let schedule = &self.analysis.schedule;
        if payment_number == 0 || payment_number > schedule.actual_payment_count {
            return Err(RealtyCalcError::InvalidInput {
                field: "payment_number".into(),
                reason: format!(
                    "Payment {payment_number} is not in the schedule (1..={})",
                    schedule.actual_payment_count
                ),
            });
        }
        let scheduled = schedule
            .periods
            .get(payment_number as usize)
            .map(|p| p.scheduled_payment)
            .unwrap_or(schedule.scheduled_payment);

        let edit = self.extra_payments.apply_total_edit(payment_number, scheduled, new_total)?;
        self.stale = true;
        Ok(edit)
    }

    pub fn clear_extra_payments(&mut self) {
        if !self.extra_payments.is_empty() {
            self.extra_payments.clear();
            self.stale = true;
        }
    }

    /// Rebuild the analysis from the snapshot and current what-if state.
    pub fn recompute(&mut self) -> &PropertyAnalysis {
        self.debouncer.cancel();
        let mut warnings = Vec::new();
        if self.input.closing_date.is_none() {
            warnings.push(format!("No closing date; projecting from {}", self.start_date));
        }
        self.analysis = compute_analysis(
            &self.input,
            &self.extra_payments,
            self.adjustment_pct,
            self.start_date,
            &mut warnings,
        );
        self.warnings = warnings;
        self.stale = false;
        &self.analysis
    }

    /// Queue a debounced recompute.
    pub fn request_recompute(&mut self, trigger: RecomputeTrigger, now: Instant) {
        self.debouncer.submit(trigger, now, trigger.window());
    }

    /// Run the queued recompute once its window has elapsed.
    pub fn poll(&mut self, now: Instant) -> Option<&PropertyAnalysis> {
        let trigger = self.debouncer.poll(now)?;
        tracing::debug!(?trigger, "debounced recompute");
        Some(self.recompute())
    }

    pub fn input(&self) -> &PropertyInput {
        &self.input
    }

    pub fn extra_payments(&self) -> &ExtraPaymentMap {
        &self.extra_payments
    }

    pub fn adjustment(&self) -> Decimal {
        self.adjustment_pct
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    /// Unadjusted monthly base the projection scales from.
    pub fn base(&self) -> CashFlowBase {
        self.analysis.summary.operating.cash_flow_base()
    }

    /// Last computed analysis; may lag behind edits until recomputed.
    pub fn analysis(&self) -> &PropertyAnalysis {
        &self.analysis
    }

    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.debouncer.deadline()
    }
}
