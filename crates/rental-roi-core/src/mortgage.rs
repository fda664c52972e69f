use log::trace;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use rust_decimal::MathematicalOps;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::coerce::{lenient_bool, lenient_decimal};
use crate::types::{ratio_or_zero, Money, Percent, Years};

/// Loan terms as entered on the financing panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoanTerms {
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub principal: Money,
    /// Annual rate, whole-number percent
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub interest_rate: Percent,
    #[serde(default, deserialize_with = "lenient_decimal")]
    pub term_years: Years,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub include_schedule: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoanSummary {
    pub monthly_payment: Money,
    pub total_paid: Money,
    pub total_interest: Money,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub schedule: Vec<AmortizationYear>,
}

/// One year of an amortization schedule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AmortizationYear {
    pub year: u32,
    pub interest_paid: Money,
    pub principal_paid: Money,
    pub ending_balance: Money,
}

/// Longest schedule `amortization_schedule` will produce.
pub const MAX_SCHEDULE_YEARS: u32 = 100;

/// Standard fixed-rate mortgage payment: P * r(1+r)^n / ((1+r)^n - 1)
///
/// `annual_rate_pct` is a whole-number percentage (4.5 = 4.5%). A
/// non-positive principal, rate or term makes financing inert and the
/// payment is zero. When `(1+r)^n` is too large to represent the payment
/// takes its limit, interest only: `P * r`.
pub fn monthly_payment(principal: Money, annual_rate_pct: Percent, term_years: Years) -> Money {
    if principal <= Decimal::ZERO || annual_rate_pct <= Decimal::ZERO || term_years <= Decimal::ZERO
    {
        return Decimal::ZERO;
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let num_payments = term_years.saturating_mul(dec!(12));

    if monthly_rate.is_zero() {
        // Interest-free: straight-line amortisation
        return ratio_or_zero(principal, num_payments);
    }

    let interest_only = principal.saturating_mul(monthly_rate);
    let payment = match growth_power(Decimal::ONE + monthly_rate, num_payments) {
        Some(compound) if compound > Decimal::ONE => {
            // compound / (compound - 1) >= 1 keeps the product in range
            interest_only.saturating_mul(ratio_or_zero(compound, compound - Decimal::ONE))
        }
        Some(_) => ratio_or_zero(principal, num_payments),
        None => interest_only,
    };
    trace!("monthly payment {payment} for principal {principal} at {annual_rate_pct}% over {term_years}y");
    payment
}

/// Outstanding balance after `months_paid` scheduled payments: the present
/// value of the payments still due.
pub fn remaining_balance(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: Years,
    months_paid: u32,
) -> Money {
    let payment = monthly_payment(principal, annual_rate_pct, term_years);
    if payment.is_zero() || months_paid == 0 {
        return principal.max(Decimal::ZERO);
    }
    let num_payments = term_years.saturating_mul(dec!(12));
    let paid = Decimal::from(months_paid);
    if paid >= num_payments {
        return Decimal::ZERO;
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let balance = if monthly_rate.is_zero() {
        principal.saturating_sub(payment.saturating_mul(paid))
    } else {
        // payment * (1 - (1+r)^-(n-k)) / r
        let discount = growth_power(Decimal::ONE + monthly_rate, num_payments - paid)
            .map_or(Decimal::ZERO, |growth| ratio_or_zero(Decimal::ONE, growth));
        ratio_or_zero(payment, monthly_rate).saturating_mul(Decimal::ONE - discount)
    };
    balance.clamp(Decimal::ZERO, principal)
}

/// Year-by-year amortization schedule, at most `MAX_SCHEDULE_YEARS` rows.
/// Empty when the loan is inert.
pub fn amortization_schedule(
    principal: Money,
    annual_rate_pct: Percent,
    term_years: Years,
) -> Vec<AmortizationYear> {
    let payment = monthly_payment(principal, annual_rate_pct, term_years);
    if payment.is_zero() {
        return Vec::new();
    }

    let monthly_rate = monthly_rate(annual_rate_pct);
    let total_months = term_years
        .saturating_mul(dec!(12))
        .ceil()
        .to_u32()
        .unwrap_or(u32::MAX);
    let listed_months = total_months.min(MAX_SCHEDULE_YEARS * 12);

    let mut schedule = Vec::with_capacity((listed_months as usize).div_ceil(12));
    let mut balance = principal;
    let mut interest_ytd = Decimal::ZERO;
    let mut principal_ytd = Decimal::ZERO;

    for month in 1..=listed_months {
        let interest = balance.saturating_mul(monthly_rate);
        let mut principal_part = payment.saturating_sub(interest).max(Decimal::ZERO);
        // The final payment absorbs rounding residue.
        if month == total_months || principal_part > balance {
            principal_part = balance;
        }
        balance -= principal_part;
        interest_ytd = interest_ytd.saturating_add(interest);
        principal_ytd += principal_part;

        if month % 12 == 0 || month == listed_months {
            schedule.push(AmortizationYear {
                year: month.div_ceil(12),
                interest_paid: interest_ytd,
                principal_paid: principal_ytd,
                ending_balance: balance,
            });
            interest_ytd = Decimal::ZERO;
            principal_ytd = Decimal::ZERO;
        }
    }

    schedule
}

/// Payment, lifetime cost and (optionally) the yearly schedule for a loan.
pub fn summarize(terms: &LoanTerms) -> LoanSummary {
    let payment = monthly_payment(terms.principal, terms.interest_rate, terms.term_years);
    let total_paid = if payment.is_zero() {
        Decimal::ZERO
    } else {
        payment.saturating_mul(terms.term_years.saturating_mul(dec!(12)))
    };
    let total_interest = if payment.is_zero() {
        Decimal::ZERO
    } else {
        total_paid.saturating_sub(terms.principal)
    };
    let schedule = if terms.include_schedule {
        amortization_schedule(terms.principal, terms.interest_rate, terms.term_years)
    } else {
        Vec::new()
    };
    LoanSummary {
        monthly_payment: payment,
        total_paid,
        total_interest,
        schedule,
    }
}

fn monthly_rate(annual_rate_pct: Percent) -> Decimal {
    annual_rate_pct / Decimal::ONE_HUNDRED / dec!(12)
}

/// `base^exponent` for a base above one, exact for whole-number exponents.
/// `None` when the result does not fit in a `Decimal`.
fn growth_power(base: Decimal, exponent: Decimal) -> Option<Decimal> {
    if exponent.fract().is_zero() {
        return exponent.to_u64().and_then(|n| base.checked_powu(n));
    }
    base.checked_powd(exponent)
}
