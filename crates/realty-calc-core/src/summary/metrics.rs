use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::summary::loan_profile::LoanProfile;
use crate::summary::operating::OperatingStatement;
use crate::types::{MinMaxAvg, Money, Rate};

/// Investment ratios per scenario column. `None` where the denominator is zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InvestmentMetrics {
    /// Annual gross revenue / purchase price
    pub gross_rent_ratio: MinMaxAvg<Option<Rate>>,
    /// Annual NOI / purchase price
    pub cap_rate: MinMaxAvg<Option<Rate>>,
    /// Annual cash flow / cash invested at closing
    pub cash_on_cash: MinMaxAvg<Option<Rate>>,
    /// Annual NOI / annual debt service
    pub debt_service_coverage: MinMaxAvg<Option<Rate>>,
}

fn ratio(numerators: MinMaxAvg, denominator: Money) -> MinMaxAvg<Option<Rate>> {
    numerators.map(|n| {
        if denominator.is_zero() {
            None
        } else {
            n.checked_div(denominator)
        }
    })
}

pub fn compute_metrics(
    purchase_price: Money,
    loan: &LoanProfile,
    operating: &OperatingStatement,
) -> InvestmentMetrics {
    let annual_debt_service = (loan.monthly_debt_service * dec!(12)).abs();
    let cash_invested = loan.cash_to_close.abs();

    InvestmentMetrics {
        gross_rent_ratio: ratio(operating.annual_revenue, purchase_price),
        cap_rate: ratio(operating.annual_net_operating_income, purchase_price),
        cash_on_cash: ratio(operating.annual_cash_flow, cash_invested),
        debt_service_coverage: ratio(operating.annual_net_operating_income, annual_debt_service),
    }
}

/// True when the ratio is known and at least `threshold`.
pub fn meets(value: Option<Rate>, threshold: Decimal) -> bool {
    value.is_some_and(|v| v >= threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loan(debt_service: Money, cash_to_close: Money) -> LoanProfile {
        LoanProfile {
            down_payment_rate: Decimal::ZERO,
            down_payment_amount: Decimal::ZERO,
            loan_amount: Decimal::ZERO,
            total_payments: 0,
            periodic_rate: Decimal::ZERO,
            payment_per_period: debt_service,
            total_loan_cost: Decimal::ZERO,
            interest_cost: Decimal::ZERO,
            closing_costs: Decimal::ZERO,
            cash_to_close,
            monthly_property_tax: Decimal::ZERO,
            monthly_debt_service: debt_service,
        }
    }

    fn operating(noi: Money, debt_service: Money) -> OperatingStatement {
        let revenue = MinMaxAvg::splat(dec!(2000));
        let noi = MinMaxAvg::splat(noi);
        let cash_flow = noi.map(|v| v - debt_service);
        OperatingStatement {
            monthly_revenue: revenue,
            vacancy_rate: MinMaxAvg::default(),
            monthly_vacancy_loss: MinMaxAvg::default(),
            monthly_expense: noi.zip_with(revenue, |n, r| n - r),
            monthly_net_operating_income: noi,
            monthly_debt_service: debt_service,
            monthly_cash_flow: cash_flow,
            annual_revenue: revenue.map(|v| v * dec!(12)),
            annual_expense: MinMaxAvg::default(),
            annual_net_operating_income: noi.map(|v| v * dec!(12)),
            annual_cash_flow: cash_flow.map(|v| v * dec!(12)),
        }
    }

    #[test]
    fn test_ratios() {
        let m = compute_metrics(dec!(240000), &loan(dec!(1000), dec!(60000)), &operating(dec!(1500), dec!(1000)));
        assert_eq!(m.gross_rent_ratio.avg, Some(dec!(0.1)));
        assert_eq!(m.cap_rate.avg, Some(dec!(0.075)));
        assert_eq!(m.cash_on_cash.avg, Some(dec!(0.1)));
        assert_eq!(m.debt_service_coverage.avg, Some(dec!(1.5)));
        assert!(meets(m.debt_service_coverage.min, dec!(1.25)));
    }

    #[test]
    fn test_zero_denominators_are_none() {
        let m = compute_metrics(Decimal::ZERO, &loan(Decimal::ZERO, Decimal::ZERO), &operating(dec!(1500), Decimal::ZERO));
        assert_eq!(m.cap_rate, MinMaxAvg::new(None, None, None));
        assert_eq!(m.cash_on_cash.max, None);
        assert_eq!(m.debt_service_coverage.min, None);
        assert!(!meets(m.debt_service_coverage.min, dec!(1)));
    }
}
