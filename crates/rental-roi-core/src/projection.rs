use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_bool, lenient_decimal};
use crate::mortgage;
use crate::types::{as_percent, compound_factor, percent_of, ratio_or_zero, Money, Percent, Years};

/// Number of years covered by every projection.
pub const PROJECTION_YEARS: u32 = 15;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Mortgage terms. Ignored entirely unless `use_financing` is set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Financing {
    #[serde(default, deserialize_with = "lenient_bool")]
    pub use_financing: bool,
    /// Cash paid up front; the loan covers the rest of the purchase price
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub down_payment: Money,
    /// Annual interest rate, whole-number percent
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub interest_rate: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub loan_term_years: Years,
}

/// Immutable snapshot of everything the user typed in.
///
/// Numeric fields accept numbers or numeric strings; anything else reads
/// as zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InvestmentParameters {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub purchase_price: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_rent: Money,
    /// Property tax, insurance, HOA, maintenance
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub monthly_expenses: Money,
    /// Closing costs, agent fees, renovations
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub one_time_costs: Money,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub annual_appreciation: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub annual_rent_increase: Percent,
    /// Share of the year the unit sits empty
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub vacancy_rate: Percent,
    #[serde(default)]
    pub financing: Financing,
}

/// One row of the multi-year projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct YearProjection {
    pub year: u32,
    /// Cumulative return on cash invested, percent (may be negative)
    pub roi: Percent,
    pub property_value: Money,
    /// Cumulative cash flow since purchase
    pub cash_flow: Money,
}

/// Leverage metrics, present only when a loan is actually being serviced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinancingMetrics {
    pub loan_amount: Money,
    pub monthly_payment: Money,
    pub annual_debt_service: Money,
    /// Loan / purchase price, percent
    pub loan_to_value: Percent,
    /// NOI / annual debt service
    pub debt_service_coverage: Decimal,
    /// Year-1 after-debt cash flow / cash invested, percent
    pub cash_on_cash_return: Percent,
}

/// Summary metrics plus the 15-year projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub monthly_cash_flow: Money,
    /// NOI / purchase price, percent
    pub net_rental_yield: Percent,
    /// Years of NOI needed to repay the cash invested; `None` when NOI never
    /// turns positive.
    pub break_even_years: Option<Years>,
    pub total_investment: Money,
    pub roi_5_year: Percent,
    pub roi_10_year: Percent,
    pub roi_15_year: Percent,
    pub projections: Vec<YearProjection>,
    pub effective_gross_income: Money,
    pub net_operating_income: Money,
    pub monthly_mortgage_payment: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub financing: Option<FinancingMetrics>,
}

impl AnalysisResult {
    /// Break-even time rendered for display: one decimal or "N/A".
    pub fn break_even_label(&self) -> String {
        match self.break_even_years {
            Some(years) => format!("{:.1} years", years.round_dp(1)),
            None => "N/A".to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Net operating income for one year of rent under the vacancy model.
///
/// Returns `(effective_gross_income, noi)`.
pub fn operating_income(
    annual_rent: Money,
    vacancy_rate: Percent,
    annual_expenses: Money,
) -> (Money, Money) {
    let vacancy_loss = percent_of(annual_rent, vacancy_rate);
    let effective_gross_income = annual_rent.saturating_sub(vacancy_loss);
    (
        effective_gross_income,
        effective_gross_income.saturating_sub(annual_expenses),
    )
}

/// Cash actually put into the deal.
pub fn total_investment(params: &InvestmentParameters) -> Money {
    if params.financing.use_financing {
        params.financing.down_payment.saturating_add(params.one_time_costs)
    } else {
        params.purchase_price.saturating_add(params.one_time_costs)
    }
}

/// Run the full projection for one parameter snapshot.
///
/// Pure: identical input always produces identical output.
pub fn project(params: &InvestmentParameters) -> AnalysisResult {
    let annual_rent = params.monthly_rent.saturating_mul(dec!(12));
    let annual_expenses = params.monthly_expenses.saturating_mul(dec!(12));
    let (effective_gross_income, noi) =
        operating_income(annual_rent, params.vacancy_rate, annual_expenses);

    let financing = &params.financing;
    let loan_amount = params.purchase_price.saturating_sub(financing.down_payment);
    let monthly_mortgage_payment = if financing.use_financing {
        mortgage::monthly_payment(
            loan_amount,
            financing.interest_rate,
            financing.loan_term_years,
        )
    } else {
        Decimal::ZERO
    };
    let annual_mortgage_payment = monthly_mortgage_payment.saturating_mul(dec!(12));

    let monthly_cash_flow = (noi / dec!(12)).saturating_sub(monthly_mortgage_payment);
    let total_investment = total_investment(params);
    let net_rental_yield = as_percent(ratio_or_zero(noi, params.purchase_price));
    let break_even_years = if noi > Decimal::ZERO {
        Some(ratio_or_zero(total_investment, noi))
    } else {
        None
    };

    let projections = project_years(
        params,
        annual_expenses,
        annual_mortgage_payment,
        total_investment,
    );
    let roi_at = |index: usize| projections.get(index).map_or(Decimal::ZERO, |p| p.roi);

    let financing_metrics = if financing.use_financing && !monthly_mortgage_payment.is_zero() {
        Some(FinancingMetrics {
            loan_amount,
            monthly_payment: monthly_mortgage_payment,
            annual_debt_service: annual_mortgage_payment,
            loan_to_value: as_percent(ratio_or_zero(loan_amount, params.purchase_price)),
            debt_service_coverage: ratio_or_zero(noi, annual_mortgage_payment),
            cash_on_cash_return: as_percent(ratio_or_zero(
                noi.saturating_sub(annual_mortgage_payment),
                total_investment,
            )),
        })
    } else {
        None
    };

    debug!(
        "projected {} years: noi={noi} yield={net_rental_yield}% monthly_cf={monthly_cash_flow}",
        projections.len()
    );

    AnalysisResult {
        monthly_cash_flow,
        net_rental_yield,
        break_even_years,
        total_investment,
        roi_5_year: roi_at(4),
        roi_10_year: roi_at(9),
        roi_15_year: roi_at(14),
        projections,
        effective_gross_income,
        net_operating_income: noi,
        monthly_mortgage_payment,
        financing: financing_metrics,
    }
}

// ---------------------------------------------------------------------------
// Projection loop
// ---------------------------------------------------------------------------

/// Rent compounds yearly; expenses and debt service stay at their year-1
/// level for the whole horizon.
fn project_years(
    params: &InvestmentParameters,
    annual_expenses: Money,
    annual_mortgage_payment: Money,
    total_investment: Money,
) -> Vec<YearProjection> {
    let mut projections = Vec::with_capacity(PROJECTION_YEARS as usize);
    let mut cumulative_cash_flow = Decimal::ZERO;

    for i in 0..PROJECTION_YEARS {
        let year = i + 1;
        let year_rent = params
            .monthly_rent
            .saturating_mul(dec!(12))
            .saturating_mul(compound_factor(params.annual_rent_increase, i));
        let (_, year_noi) = operating_income(year_rent, params.vacancy_rate, annual_expenses);
        cumulative_cash_flow =
            cumulative_cash_flow.saturating_add(year_noi.saturating_sub(annual_mortgage_payment));

        let property_value = params
            .purchase_price
            .saturating_mul(compound_factor(params.annual_appreciation, year));
        let equity_appreciation = property_value.saturating_sub(params.purchase_price);
        let total_return = cumulative_cash_flow.saturating_add(equity_appreciation);
        let roi = if total_investment > Decimal::ZERO {
            as_percent(ratio_or_zero(total_return, total_investment))
        } else {
            Decimal::ZERO
        };

        projections.push(YearProjection {
            year,
            roi,
            property_value,
            cash_flow: cumulative_cash_flow,
        });
    }

    projections
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    /// Cash purchase: 500k flat renting at 2,996/month
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

    fn financed_purchase() -> InvestmentParameters {
        InvestmentParameters {
            financing: Financing {
                use_financing: true,
                down_payment: dec!(100000),
                interest_rate: dec!(4.5),
                loan_term_years: dec!(30),
            },
            ..cash_purchase()
        }
    }

    #[test]
    fn test_noi_and_year_one_metrics() {
        let result = project(&cash_purchase());

        // 35952 rent - 1797.6 vacancy - 9600 expenses
        assert_eq!(result.effective_gross_income, dec!(34154.4));
        assert_eq!(result.net_operating_income, dec!(24554.4));
        assert_eq!(result.monthly_cash_flow, dec!(2046.2));
        assert_eq!(result.total_investment, dec!(525000));
        assert!((result.net_rental_yield - dec!(4.91)).abs() < dec!(0.01));

        let break_even = result.break_even_years.unwrap();
        assert!((break_even - dec!(21.38)).abs() < dec!(0.01));
        assert_eq!(result.break_even_label(), "21.4 years");
    }

    #[test]
    fn test_projection_has_fifteen_ordered_years() {
        let result = project(&cash_purchase());
        assert_eq!(result.projections.len(), 15);
        let years: Vec<u32> = result.projections.iter().map(|p| p.year).collect();
        assert_eq!(years, (1..=15).collect::<Vec<u32>>());
    }

    #[test]
    fn test_headline_roi_pulls_from_projection() {
        let result = project(&financed_purchase());
        assert_eq!(result.roi_5_year, result.projections[4].roi);
        assert_eq!(result.roi_10_year, result.projections[9].roi);
        assert_eq!(result.roi_15_year, result.projections[14].roi);
    }

    #[test]
    fn test_first_year_row() {
        let result = project(&cash_purchase());
        let first = &result.projections[0];

        // Year 1 rent is not yet grown; value appreciates one year
        assert_eq!(first.cash_flow, dec!(24554.4));
        assert_eq!(first.property_value, dec!(515000));
        // (24554.4 + 15000) / 525000 * 100
        let expected_roi = dec!(39554.4) / dec!(525000) * dec!(100);
        assert_eq!(first.roi, expected_roi);
    }

    #[test]
    fn test_rent_grows_but_expenses_do_not() {
        let mut params = cash_purchase();
        params.vacancy_rate = Decimal::ZERO;
        params.annual_rent_increase = dec!(10);
        let result = project(&params);

        // Year 2 cash flow = 35952 * 1.1 - 9600
        let year_two = result.projections[1].cash_flow - result.projections[0].cash_flow;
        assert_eq!(year_two, dec!(35952) * dec!(1.1) - dec!(9600));
    }

    #[test]
    fn test_financing_changes_investment_and_cash_flow() {
        let result = project(&financed_purchase());
        assert_eq!(result.total_investment, dec!(125000));

        let payment = result.monthly_mortgage_payment;
        assert!((payment - dec!(2026.74)).abs() < dec!(2));
        assert_eq!(result.monthly_cash_flow, dec!(24554.4) / dec!(12) - payment);

        let metrics = result.financing.as_ref().unwrap();
        assert_eq!(metrics.loan_amount, dec!(400000));
        assert_eq!(metrics.loan_to_value, dec!(80));
        assert_eq!(metrics.annual_debt_service, payment * dec!(12));
        assert!(metrics.debt_service_coverage > Decimal::ONE);
    }

    #[test]
    fn test_financing_flag_off_ignores_loan_terms() {
        let mut params = financed_purchase();
        params.financing.use_financing = false;
        let result = project(&params);
        assert_eq!(result.monthly_mortgage_payment, Decimal::ZERO);
        assert_eq!(result.total_investment, dec!(525000));
        assert!(result.financing.is_none());
    }

    #[test]
    fn test_negative_noi_never_breaks_even() {
        let mut params = cash_purchase();
        params.monthly_expenses = dec!(4000);
        let result = project(&params);
        assert!(result.net_operating_income < Decimal::ZERO);
        assert!(result.break_even_years.is_none());
        assert_eq!(result.break_even_label(), "N/A");
    }

    #[test]
    fn test_zero_noi_never_breaks_even() {
        let params = InvestmentParameters {
            purchase_price: dec!(100000),
            monthly_rent: dec!(1000),
            monthly_expenses: dec!(1000),
            ..Default::default()
        };
        assert!(project(&params).break_even_years.is_none());
    }

    #[test]
    fn test_all_zero_input_is_safe() {
        let result = project(&InvestmentParameters::default());
        assert_eq!(result.net_rental_yield, Decimal::ZERO);
        assert_eq!(result.total_investment, Decimal::ZERO);
        assert!(result.break_even_years.is_none());
        assert!(result.projections.iter().all(|p| p.roi.is_zero()));
    }

    #[test]
    fn test_repeated_calls_are_identical() {
        let params = financed_purchase();
        assert_eq!(project(&params), project(&params));
    }

    #[test]
    fn test_deserializes_form_style_input() {
        let json = r#"{
            "purchase_price": "250000",
            "monthly_rent": 1800,
            "monthly_expenses": "",
            "vacancy_rate": "abc",
            "financing": { "use_financing": "true", "down_payment": 50000 }
        }"#;
        let params: InvestmentParameters = serde_json::from_str(json).unwrap();
        assert_eq!(params.purchase_price, dec!(250000));
        assert_eq!(params.monthly_expenses, Decimal::ZERO);
        assert_eq!(params.vacancy_rate, Decimal::ZERO);
        assert!(params.financing.use_financing);
        assert_eq!(params.financing.loan_term_years, Decimal::ZERO);
    }

    #[test]
    fn test_runaway_interest_rate_does_not_panic() {
        let mut params = financed_purchase();
        params.financing.interest_rate = dec!(450);
        let result = project(&params);

        // 400k loan at 37.5% a month, interest only
        assert_eq!(result.monthly_mortgage_payment, dec!(150000));
        assert!(result.monthly_cash_flow < Decimal::ZERO);
        assert_eq!(result.projections.len(), 15);
    }

    #[test]
    fn test_extreme_inputs_saturate() {
        let params = InvestmentParameters {
            purchase_price: Decimal::MAX,
            monthly_rent: Decimal::MAX,
            monthly_expenses: Decimal::ZERO,
            one_time_costs: Decimal::MAX,
            annual_appreciation: dec!(100000),
            annual_rent_increase: dec!(100000),
            vacancy_rate: dec!(-500),
            financing: Financing::default(),
        };
        let result = project(&params);
        assert_eq!(result.net_operating_income, Decimal::MAX);
        assert_eq!(result.total_investment, Decimal::MAX);
        assert_eq!(result.projections[14].property_value, Decimal::MAX);

        let tiny_price = InvestmentParameters {
            purchase_price: dec!(0.0000000000000000000000000001),
            monthly_rent: dec!(1000000),
            ..Default::default()
        };
        assert_eq!(project(&tiny_price).net_rental_yield, Decimal::MAX);
    }
}
