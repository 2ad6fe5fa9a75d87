use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::profile::FormulaProfile;

/// A derived output computed by the metrics calculator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Profit,
    CurrentBalance,
    NetBalance,
    Turnover,
    LiquidityTarget,
    AdBudget,
    PossibleFutureValue,
    TargetFutureValue,
    RequiredSales,
    MaxExpensesAllowed,
    MaxSalaryBudget,
    ProfitMarginNeeded,
    ExpenseReductionNeeded,
    ExpenseIncrease,
    RevenueBoost,
    AdjustedProfit,
}

impl Metric {
    pub const ALL: [Metric; 16] = [
        Metric::Profit,
        Metric::CurrentBalance,
        Metric::NetBalance,
        Metric::Turnover,
        Metric::LiquidityTarget,
        Metric::AdBudget,
        Metric::PossibleFutureValue,
        Metric::TargetFutureValue,
        Metric::RequiredSales,
        Metric::MaxExpensesAllowed,
        Metric::MaxSalaryBudget,
        Metric::ProfitMarginNeeded,
        Metric::ExpenseReductionNeeded,
        Metric::ExpenseIncrease,
        Metric::RevenueBoost,
        Metric::AdjustedProfit,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Profit => "profit",
            Self::CurrentBalance => "current_balance",
            Self::NetBalance => "net_balance",
            Self::Turnover => "turnover",
            Self::LiquidityTarget => "liquidity_target",
            Self::AdBudget => "ad_budget",
            Self::PossibleFutureValue => "possible_future_value",
            Self::TargetFutureValue => "target_future_value",
            Self::RequiredSales => "required_sales",
            Self::MaxExpensesAllowed => "max_expenses_allowed",
            Self::MaxSalaryBudget => "max_salary_budget",
            Self::ProfitMarginNeeded => "profit_margin_needed",
            Self::ExpenseReductionNeeded => "expense_reduction_needed",
            Self::ExpenseIncrease => "expense_increase",
            Self::RevenueBoost => "revenue_boost",
            Self::AdjustedProfit => "adjusted_profit",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Profit => "Profit",
            Self::CurrentBalance => "Current Balance",
            Self::NetBalance => "Net Balance",
            Self::Turnover => "Turnover",
            Self::LiquidityTarget => "Target Liquidity",
            Self::AdBudget => "Ad Budget",
            Self::PossibleFutureValue => "Possible Future Value",
            Self::TargetFutureValue => "Target Future Value",
            Self::RequiredSales => "Required Sales",
            Self::MaxExpensesAllowed => "Max Expenses Allowed",
            Self::MaxSalaryBudget => "Max Salary Budget",
            Self::ProfitMarginNeeded => "Profit Margin Needed",
            Self::ExpenseReductionNeeded => "Expense Reduction Needed",
            Self::ExpenseIncrease => "Expected Expense Increase",
            Self::RevenueBoost => "Revenue Boost",
            Self::AdjustedProfit => "Adjusted Profit",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|metric| metric.key() == key)
    }
}

impl fmt::Display for Metric {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The derived values for one entry, in the producing profile's schema order.
///
/// Values keep full precision; rounding is a display concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DerivedMetrics {
    profile: FormulaProfile,
    values: Vec<(Metric, Decimal)>,
}

impl DerivedMetrics {
    pub(crate) fn new(profile: FormulaProfile) -> Self {
        Self {
            profile,
            values: Vec::with_capacity(profile.formulas().len()),
        }
    }

    pub(crate) fn push(
        &mut self,
        metric: Metric,
        value: Decimal,
    ) {
        self.values.push((metric, value));
    }

    /// Rebuilds metrics from previously exported values.
    ///
    /// `values` must already be in the profile's output order; CSV re-import
    /// uses this after reading columns by name.
    pub fn from_values(
        profile: FormulaProfile,
        values: Vec<(Metric, Decimal)>,
    ) -> Self {
        Self { profile, values }
    }

    /// The profile whose formulas produced these values.
    pub fn profile(&self) -> FormulaProfile {
        self.profile
    }

    pub fn get(
        &self,
        metric: Metric,
    ) -> Option<Decimal> {
        self.values
            .iter()
            .find(|(m, _)| *m == metric)
            .map(|(_, value)| *value)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Metric, Decimal)> + '_ {
        self.values.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn parse_round_trips_every_key() {
        for metric in Metric::ALL {
            assert_eq!(Metric::parse(metric.key()), Some(metric));
        }
    }

    #[test]
    fn get_returns_none_for_metric_outside_profile() {
        let metrics = DerivedMetrics::from_values(
            FormulaProfile::HireImpact,
            vec![(Metric::Profit, dec!(2500))],
        );

        assert_eq!(metrics.get(Metric::Profit), Some(dec!(2500)));
        assert_eq!(metrics.get(Metric::Turnover), None);
    }

    #[test]
    fn iter_preserves_insertion_order() {
        let mut metrics = DerivedMetrics::new(FormulaProfile::HireImpact);
        metrics.push(Metric::Profit, dec!(1));
        metrics.push(Metric::ExpenseIncrease, dec!(2));
        metrics.push(Metric::RevenueBoost, dec!(3));

        let keys: Vec<_> = metrics.iter().map(|(m, _)| m.key()).collect();

        assert_eq!(keys, vec!["profit", "expense_increase", "revenue_boost"]);
    }
}
