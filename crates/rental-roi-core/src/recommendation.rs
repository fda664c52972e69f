use log::debug;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::benchmarks::AlternativeProperty;
use crate::projection::{AnalysisResult, InvestmentParameters};
use crate::types::{Money, Percent, Years};

/// Yield at or above which the property passes the buy gate.
const BUY_MIN_YIELD: Decimal = dec!(7);
/// Break-even must come in under this many years to pass the buy gate.
const BUY_MAX_BREAK_EVEN: Decimal = dec!(15);
/// Alternatives may cost up to this multiple of the analysed price.
const ALTERNATIVE_PRICE_CAP: Decimal = dec!(1.2);
const MAX_ALTERNATIVES: usize = 2;
const MAX_TIPS: usize = 4;
const MAX_HIGHLIGHTS: usize = 2;

const YIELD_TIPS: [&str; 2] = [
    "Look for properties in areas with strong rental demand to lift the yield.",
    "Consider properties that need minor renovation to raise the achievable rent.",
];

const CASH_FLOW_TIPS: [&str; 2] = [
    "Review the monthly expenses: maintenance costs may be overestimated.",
    "Consider raising the rent if it is below the market rate.",
];

const GENERAL_TIPS: [&str; 3] = [
    "Always verify rental demand in the area before buying.",
    "Weigh the location: proximity to public transport, schools and services.",
    "Diversify with properties in different areas and of different types.",
];

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The three figures every rule looks at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionMetrics {
    /// Net rental yield, percent
    pub roi: Percent,
    pub monthly_cash_flow: Money,
    /// `None` means the investment never breaks even
    pub break_even_years: Option<Years>,
}

impl DecisionMetrics {
    pub fn from_result(result: &AnalysisResult) -> Self {
        Self {
            roi: result.net_rental_yield,
            monthly_cash_flow: result.monthly_cash_flow,
            break_even_years: result.break_even_years,
        }
    }

    /// Never breaking even counts as exceeding any bound.
    pub fn break_even_exceeds(&self, years: Years) -> bool {
        self.break_even_years.is_none_or(|y| y > years)
    }

    pub fn break_even_within(&self, years: Years) -> bool {
        self.break_even_years.is_some_and(|y| y < years)
    }
}

/// Identifies which rule produced a recommendation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuleId {
    ExcellentYield,
    GoodYield,
    YieldBelowMinimum,
    NonPositiveCashFlow,
    SlowRecovery,
    ModerateRisk,
}

/// One `(predicate, outcome)` entry of the reason chain.
#[derive(Clone, Copy)]
pub struct Rule {
    pub id: RuleId,
    pub decision: bool,
    pub reason: &'static str,
    pub applies: fn(&DecisionMetrics) -> bool,
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("decision", &self.decision)
            .field("reason", &self.reason)
            .finish_non_exhaustive()
    }
}

pub const EXCELLENT_YIELD: Rule = Rule {
    id: RuleId::ExcellentYield,
    decision: true,
    reason: "Excellent yield and positive cash flow. This property meets every investment criterion.",
    applies: |m| m.roi >= dec!(8) && m.monthly_cash_flow > dec!(200),
};

pub const GOOD_YIELD: Rule = Rule {
    id: RuleId::GoodYield,
    decision: true,
    reason: "Good yield with positive cash flow. A solid investment with growth potential.",
    applies: |m| m.roi >= dec!(7) && m.monthly_cash_flow > Decimal::ZERO,
};

pub const YIELD_BELOW_MINIMUM: Rule = Rule {
    id: RuleId::YieldBelowMinimum,
    decision: false,
    reason: "The yield is below the recommended minimum (5-7%). Consider looking for better opportunities.",
    applies: |m| m.roi < dec!(5),
};

pub const NON_POSITIVE_CASH_FLOW: Rule = Rule {
    id: RuleId::NonPositiveCashFlow,
    decision: false,
    reason: "Cash flow is negative or neutral. Holding the property will cost extra every month.",
    applies: |m| m.monthly_cash_flow <= Decimal::ZERO,
};

pub const SLOW_RECOVERY: Rule = Rule {
    id: RuleId::SlowRecovery,
    decision: false,
    reason: "The recovery time is too long. Consider properties with stronger initial cash flow.",
    applies: |m| m.break_even_exceeds(dec!(20)),
};

pub const MODERATE_RISK: Rule = Rule {
    id: RuleId::ModerateRisk,
    decision: false,
    reason: "The investment carries moderate risk. Evaluate alternatives with a better risk-return profile.",
    applies: |_| true,
};

/// Ordered reason chain; the first rule whose predicate holds wins.
#[derive(Debug, Clone)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl Default for RuleSet {
    fn default() -> Self {
        Self::standard()
    }
}

impl RuleSet {
    pub fn standard() -> Self {
        Self::new(vec![
            EXCELLENT_YIELD,
            GOOD_YIELD,
            YIELD_BELOW_MINIMUM,
            NON_POSITIVE_CASH_FLOW,
            SLOW_RECOVERY,
            MODERATE_RISK,
        ])
    }

    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Insert a rule ahead of the existing chain position `index`.
    pub fn insert(&mut self, index: usize, rule: Rule) {
        let index = index.min(self.rules.len());
        self.rules.insert(index, rule);
    }

    pub fn evaluate(&self, metrics: &DecisionMetrics) -> Option<&Rule> {
        self.rules.iter().find(|rule| (rule.applies)(metrics))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum YieldRating {
    Excellent,
    Good,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CashFlowRating {
    Positive,
    Tight,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PaybackRating {
    Fast,
    Moderate,
    Slow,
}

/// Qualitative label for each headline metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricAssessment {
    pub yield_rating: YieldRating,
    pub cash_flow_rating: CashFlowRating,
    pub payback_rating: PaybackRating,
}

/// A better-yielding listing in a similar price band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlternativeSuggestion {
    pub id: String,
    pub title: String,
    pub location: String,
    pub price: Money,
    pub monthly_rent: Money,
    pub roi: Percent,
    /// Candidate yield minus the analysed yield, percentage points
    pub yield_advantage: Percent,
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult {
    /// Outcome of the matched rule
    pub decision: bool,
    /// Headline buy gate: yield ≥ 7%, positive cash flow, break-even < 15y
    pub should_buy: bool,
    pub rule: RuleId,
    pub reason: String,
    pub tips: Vec<String>,
    pub assessment: MetricAssessment,
    pub alternatives: Vec<AlternativeSuggestion>,
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Buy/no-buy advice using the standard rule chain.
pub fn recommend(
    result: &AnalysisResult,
    params: &InvestmentParameters,
    candidates: &[AlternativeProperty],
) -> RecommendationResult {
    recommend_with(&RuleSet::standard(), result, params, candidates)
}

/// Buy/no-buy advice using a caller-supplied rule chain. Falls back to the
/// moderate-risk outcome when no rule matches.
pub fn recommend_with(
    rules: &RuleSet,
    result: &AnalysisResult,
    params: &InvestmentParameters,
    candidates: &[AlternativeProperty],
) -> RecommendationResult {
    let metrics = DecisionMetrics::from_result(result);
    let rule = rules.evaluate(&metrics).unwrap_or(&MODERATE_RISK);
    let should_buy = should_buy(&metrics);

    debug!(
        "recommendation: rule={:?} decision={} should_buy={should_buy}",
        rule.id, rule.decision
    );

    RecommendationResult {
        decision: rule.decision,
        should_buy,
        rule: rule.id,
        reason: rule.reason.to_string(),
        tips: expert_tips(&metrics),
        assessment: assess(&metrics),
        alternatives: find_alternatives(metrics.roi, params.purchase_price, candidates),
    }
}

pub fn should_buy(metrics: &DecisionMetrics) -> bool {
    metrics.roi >= BUY_MIN_YIELD
        && metrics.monthly_cash_flow > Decimal::ZERO
        && metrics.break_even_within(BUY_MAX_BREAK_EVEN)
}

/// Up to four tips: targeted ones first, then the general advice.
pub fn expert_tips(metrics: &DecisionMetrics) -> Vec<String> {
    let mut tips: Vec<&str> = Vec::new();
    if metrics.roi < dec!(6) {
        tips.extend(YIELD_TIPS);
    }
    if metrics.monthly_cash_flow <= Decimal::ZERO {
        tips.extend(CASH_FLOW_TIPS);
    }
    tips.extend(GENERAL_TIPS);
    tips.into_iter().take(MAX_TIPS).map(String::from).collect()
}

pub fn assess(metrics: &DecisionMetrics) -> MetricAssessment {
    let yield_rating = if metrics.roi >= dec!(8) {
        YieldRating::Excellent
    } else if metrics.roi >= dec!(6) {
        YieldRating::Good
    } else {
        YieldRating::Low
    };

    let cash_flow_rating = if metrics.monthly_cash_flow > dec!(200) {
        CashFlowRating::Positive
    } else if metrics.monthly_cash_flow > Decimal::ZERO {
        CashFlowRating::Tight
    } else {
        CashFlowRating::Negative
    };

    let payback_rating = if metrics.break_even_within(dec!(10)) {
        PaybackRating::Fast
    } else if metrics.break_even_within(dec!(15)) {
        PaybackRating::Moderate
    } else {
        PaybackRating::Slow
    };

    MetricAssessment {
        yield_rating,
        cash_flow_rating,
        payback_rating,
    }
}

/// Better-yielding candidates priced within 120% of the analysed property,
/// in catalog order, at most two.
pub fn find_alternatives(
    current_roi: Percent,
    purchase_price: Money,
    candidates: &[AlternativeProperty],
) -> Vec<AlternativeSuggestion> {
    let price_cap = purchase_price.saturating_mul(ALTERNATIVE_PRICE_CAP);
    candidates
        .iter()
        .filter(|c| c.effective_roi() > current_roi && c.price <= price_cap)
        .take(MAX_ALTERNATIVES)
        .map(|c| {
            let roi = c.effective_roi();
            AlternativeSuggestion {
                id: c.id.clone(),
                title: c.title.clone(),
                location: c.location.clone(),
                price: c.price,
                monthly_rent: c.monthly_rent,
                roi,
                yield_advantage: roi.saturating_sub(current_roi),
                highlights: c.highlights.iter().take(MAX_HIGHLIGHTS).cloned().collect(),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::benchmarks::default_candidates;
    use crate::projection::{project, Financing};
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    fn metrics(roi: Decimal, cash_flow: Decimal, break_even: Option<Decimal>) -> DecisionMetrics {
        DecisionMetrics {
            roi,
            monthly_cash_flow: cash_flow,
            break_even_years: break_even,
        }
    }

    fn rule_for(m: DecisionMetrics) -> RuleId {
        RuleSet::standard().evaluate(&m).unwrap().id
    }

    #[test]
    fn test_rule_chain_table() {
        let cases = [
            (metrics(dec!(9), dec!(500), Some(dec!(8))), RuleId::ExcellentYield),
            (metrics(dec!(8), dec!(200.01), None), RuleId::ExcellentYield),
            (metrics(dec!(8), dec!(200), Some(dec!(12))), RuleId::GoodYield),
            (metrics(dec!(7), dec!(0.01), Some(dec!(30))), RuleId::GoodYield),
            (metrics(dec!(4.99), dec!(900), Some(dec!(5))), RuleId::YieldBelowMinimum),
            (metrics(dec!(3), dec!(-100), None), RuleId::YieldBelowMinimum),
            (metrics(dec!(6), Decimal::ZERO, Some(dec!(10))), RuleId::NonPositiveCashFlow),
            (metrics(dec!(6), dec!(50), Some(dec!(21))), RuleId::SlowRecovery),
            (metrics(dec!(6), dec!(50), None), RuleId::SlowRecovery),
            (metrics(dec!(6), dec!(50), Some(dec!(20))), RuleId::ModerateRisk),
            (metrics(dec!(5), dec!(50), Some(dec!(14))), RuleId::ModerateRisk),
        ];
        for (m, expected) in cases {
            assert_eq!(rule_for(m), expected, "metrics {m:?}");
        }
    }

    #[test]
    fn test_high_yield_negative_cash_flow_hits_cash_flow_rule() {
        // Yield alone would qualify as excellent; cash flow decides.
        let m = metrics(dec!(8.5), dec!(-150), Some(dec!(12)));
        let rules = RuleSet::standard();
        let rule = rules.evaluate(&m).unwrap();
        assert_eq!(rule.id, RuleId::NonPositiveCashFlow);
        assert!(!rule.decision);
    }

    #[test]
    fn test_first_match_wins_over_later_rules() {
        // Matches both GoodYield and SlowRecovery
        let m = metrics(dec!(7.5), dec!(100), None);
        assert_eq!(rule_for(m), RuleId::GoodYield);

        // Reordering the chain changes the outcome
        let mut rules = RuleSet::standard();
        rules.insert(0, SLOW_RECOVERY);
        assert_eq!(rules.evaluate(&m).unwrap().id, RuleId::SlowRecovery);
    }

    #[test]
    fn test_empty_rule_set_falls_back_to_moderate_risk() {
        let params = InvestmentParameters {
            purchase_price: dec!(200000),
            monthly_rent: dec!(1500),
            ..Default::default()
        };
        let result = project(&params);
        let rec = recommend_with(&RuleSet::new(Vec::new()), &result, &params, &[]);
        assert_eq!(rec.rule, RuleId::ModerateRisk);
        assert!(!rec.decision);
    }

    #[test]
    fn test_buy_gate() {
        assert!(should_buy(&metrics(dec!(7), dec!(1), Some(dec!(14.9)))));
        assert!(!should_buy(&metrics(dec!(6.99), dec!(500), Some(dec!(5)))));
        assert!(!should_buy(&metrics(dec!(9), Decimal::ZERO, Some(dec!(5)))));
        assert!(!should_buy(&metrics(dec!(9), dec!(500), Some(dec!(15)))));
        assert!(!should_buy(&metrics(dec!(9), dec!(500), None)));
    }

    #[test]
    fn test_tips_low_yield_and_negative_cash_flow() {
        let tips = expert_tips(&metrics(dec!(4), dec!(-10), None));
        assert_eq!(
            tips,
            vec![
                YIELD_TIPS[0].to_string(),
                YIELD_TIPS[1].to_string(),
                CASH_FLOW_TIPS[0].to_string(),
                CASH_FLOW_TIPS[1].to_string(),
            ]
        );
    }

    #[test]
    fn test_tips_only_cash_flow() {
        let tips = expert_tips(&metrics(dec!(7), Decimal::ZERO, None));
        assert_eq!(tips.len(), 4);
        assert_eq!(tips[0], CASH_FLOW_TIPS[0]);
        assert_eq!(tips[2], GENERAL_TIPS[0]);
        assert_eq!(tips[3], GENERAL_TIPS[1]);
    }

    #[test]
    fn test_tips_healthy_investment_gets_general_advice() {
        let tips = expert_tips(&metrics(dec!(9), dec!(400), Some(dec!(9))));
        let expected: Vec<String> = GENERAL_TIPS.iter().map(|t| t.to_string()).collect();
        assert_eq!(tips, expected);
    }

    #[test]
    fn test_assessment_labels() {
        let a = assess(&metrics(dec!(8), dec!(201), Some(dec!(9.9))));
        assert_eq!(a.yield_rating, YieldRating::Excellent);
        assert_eq!(a.cash_flow_rating, CashFlowRating::Positive);
        assert_eq!(a.payback_rating, PaybackRating::Fast);

        let b = assess(&metrics(dec!(6), dec!(200), Some(dec!(10))));
        assert_eq!(b.yield_rating, YieldRating::Good);
        assert_eq!(b.cash_flow_rating, CashFlowRating::Tight);
        assert_eq!(b.payback_rating, PaybackRating::Moderate);

        let c = assess(&metrics(dec!(5.9), Decimal::ZERO, None));
        assert_eq!(c.yield_rating, YieldRating::Low);
        assert_eq!(c.cash_flow_rating, CashFlowRating::Negative);
        assert_eq!(c.payback_rating, PaybackRating::Slow);
    }

    #[test]
    fn test_alternatives_filter_by_yield_and_price() {
        // 8.6% yield at 180k: only 9.2% (85k) and 9.1% (165k) qualify;
        // 8.5% and 8.2% do not beat it.
        let alts = find_alternatives(dec!(8.6), dec!(180000), &default_candidates());
        let ids: Vec<&str> = alts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["rec3", "rec4"]);
        assert_eq!(alts[0].yield_advantage, dec!(0.6));
        assert_eq!(alts[0].highlights.len(), 2);
    }

    #[test]
    fn test_alternatives_capped_at_two_in_catalog_order() {
        let alts = find_alternatives(dec!(1), dec!(1000000), &default_candidates());
        let ids: Vec<&str> = alts.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["rec1", "rec2"]);
    }

    #[test]
    fn test_alternatives_respect_price_cap() {
        // 1.2 * 70k = 84k: the 85k studio is just out of reach
        let alts = find_alternatives(dec!(1), dec!(70000), &default_candidates());
        assert!(alts.is_empty());
        let alts = find_alternatives(dec!(1), dec!(70834), &default_candidates());
        assert_eq!(alts.len(), 1);
        assert_eq!(alts[0].id, "rec3");
    }

    #[test]
    fn test_recommend_cash_purchase_low_yield() {
        let params = InvestmentParameters {
            purchase_price: dec!(500000),
            monthly_rent: dec!(2996),
            monthly_expenses: dec!(800),
            one_time_costs: dec!(25000),
            vacancy_rate: dec!(5),
            financing: Financing::default(),
            ..Default::default()
        };
        let result = project(&params);
        let rec = recommend(&result, &params, &default_candidates());

        assert_eq!(rec.rule, RuleId::YieldBelowMinimum);
        assert!(!rec.decision);
        assert!(!rec.should_buy);
        assert_eq!(rec.tips.len(), 4);
        assert_eq!(rec.tips[0], YIELD_TIPS[0]);
        assert_eq!(rec.alternatives.len(), 2);
    }

    #[test]
    fn test_recommend_is_deterministic() {
        let params = InvestmentParameters {
            purchase_price: dec!(150000),
            monthly_rent: dec!(1400),
            monthly_expenses: dec!(200),
            annual_appreciation: dec!(2),
            ..Default::default()
        };
        let result = project(&params);
        let a = recommend(&result, &params, &default_candidates());
        let b = recommend(&result, &params, &default_candidates());
        assert_eq!(a, b);
        assert_eq!(a.rule, RuleId::ExcellentYield);
        assert!(a.should_buy);
    }
}
