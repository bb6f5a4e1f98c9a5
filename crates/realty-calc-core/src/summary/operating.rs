use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::projection::CashFlowBase;
use crate::summary::input::{LineItem, PropertyInput};
use crate::summary::loan_profile::LoanProfile;
use crate::types::{MinMaxAvg, Money, Rate};

const MONTHS_PER_YEAR: Decimal = dec!(12);

/// Operating statement in the three scenario columns. Expenses are negative.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperatingStatement {
    pub monthly_revenue: MinMaxAvg,
    pub vacancy_rate: MinMaxAvg<Rate>,
    /// Vacancy and collection loss (negative)
    pub monthly_vacancy_loss: MinMaxAvg,
    /// Line-item expenses plus property tax plus vacancy loss
    pub monthly_expense: MinMaxAvg,
    pub monthly_net_operating_income: MinMaxAvg,
    pub monthly_debt_service: Money,
    pub monthly_cash_flow: MinMaxAvg,
    pub annual_revenue: MinMaxAvg,
    pub annual_expense: MinMaxAvg,
    pub annual_net_operating_income: MinMaxAvg,
    pub annual_cash_flow: MinMaxAvg,
}

impl OperatingStatement {
    /// Monthly base for the cumulative projection.
    pub fn cash_flow_base(&self) -> CashFlowBase {
        CashFlowBase::new(self.monthly_expense, self.monthly_revenue)
    }
}

fn sum_lines(lines: &[LineItem], f: impl Fn(Money) -> Money) -> MinMaxAvg {
    lines.iter().fold(MinMaxAvg::default(), |acc, line| {
        acc + MinMaxAvg::from_range(f(line.min), f(line.max))
    })
}

fn annualise(monthly: MinMaxAvg) -> MinMaxAvg {
    monthly.map(|v| v * MONTHS_PER_YEAR)
}

pub fn compute_operating(input: &PropertyInput, loan: &LoanProfile) -> OperatingStatement {
    let monthly_revenue = sum_lines(&input.revenue, |v| v);
    let line_expense = sum_lines(&input.expenses, |v| -v.abs());

    let vacancy_rate = MinMaxAvg::new(
        input.vacancy_rate.min,
        input.vacancy_rate.max,
        (input.vacancy_rate.min + input.vacancy_rate.max) / dec!(2),
    );
    let monthly_vacancy_loss = monthly_revenue.zip_with(vacancy_rate, |rev, rate| -(rev * rate));

    let monthly_expense =
        line_expense + MinMaxAvg::splat(loan.monthly_property_tax) + monthly_vacancy_loss;

    let monthly_net_operating_income = monthly_revenue + monthly_expense;
    let monthly_cash_flow = monthly_net_operating_income.map(|v| v - loan.monthly_debt_service);

    OperatingStatement {
        monthly_revenue,
        vacancy_rate,
        monthly_vacancy_loss,
        monthly_expense,
        monthly_net_operating_income,
        monthly_debt_service: loan.monthly_debt_service,
        monthly_cash_flow,
        annual_revenue: annualise(monthly_revenue),
        annual_expense: annualise(monthly_expense),
        annual_net_operating_income: annualise(monthly_net_operating_income),
        annual_cash_flow: annualise(monthly_cash_flow),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summary::input::{ClosingItems, DownPayment, VacancyRates};
    use crate::summary::loan_profile::compute_loan_profile;

    fn input() -> PropertyInput {
        PropertyInput {
            address: Some("12 Elm St".into()),
            purchase_price: dec!(200000),
            down_payment: DownPayment::Rate(Decimal::ONE),
            annual_interest_rate: dec!(0.05),
            loan_term_years: dec!(30),
            payments_per_year: 12,
            closing_cost_rate: Decimal::ZERO,
            closing_items: ClosingItems::default(),
            annual_property_tax: dec!(2400),
            closing_date: None,
            revenue: vec![
                LineItem::new("Unit A", dec!(1000), dec!(1200)),
                LineItem::new("Unit B", dec!(900), dec!(900)),
            ],
            expenses: vec![
                LineItem::new("Insurance", dec!(-100), dec!(-100)),
                LineItem::new("Repairs", dec!(200), dec!(50)),
            ],
            vacancy_rate: VacancyRates {
                min: dec!(0.10),
                max: dec!(0.0),
            },
        }
    }

    fn statement() -> OperatingStatement {
        let input = input();
        let mut warnings = Vec::new();
        let loan = compute_loan_profile(&input, &mut warnings);
        compute_operating(&input, &loan)
    }

    #[test]
    fn test_revenue_columns() {
        let s = statement();
        assert_eq!(s.monthly_revenue, MinMaxAvg::new(dec!(1900), dec!(2100), dec!(2000)));
        assert_eq!(s.annual_revenue.avg, dec!(24000));
    }

    #[test]
    fn test_expenses_are_outflows() {
        let s = statement();
        // lines: -300 / -150 / -225, tax -200, vacancy -190 / 0 / -100
        assert_eq!(s.monthly_vacancy_loss, MinMaxAvg::new(dec!(-190), dec!(0), dec!(-100)));
        assert_eq!(s.monthly_expense, MinMaxAvg::new(dec!(-690), dec!(-350), dec!(-525)));
    }

    #[test]
    fn test_noi_and_cash_flow_without_loan() {
        let s = statement();
        assert_eq!(s.monthly_net_operating_income.avg, dec!(1475));
        assert_eq!(s.monthly_cash_flow, s.monthly_net_operating_income);
        assert_eq!(s.annual_cash_flow.min, dec!(14520));
    }

    #[test]
    fn test_cash_flow_base_matches_statement() {
        let s = statement();
        let base = s.cash_flow_base();
        assert_eq!(base.cash_flow(), s.monthly_net_operating_income);
    }
}
