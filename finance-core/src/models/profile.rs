//! Formula profiles: the named variants of the derived-metrics formulas.
//!
//! Each [`FormulaProfile`] is a static table of `(Metric, Formula)` pairs plus
//! the list of [`EntryField`]s its entry form collects. The calculator walks
//! the table in order; exporters use the same order for their columns.
//!
//! | Profile | Outputs |
//! |---------|---------|
//! | `liquidity-planner` | profit, current balance (less returns), turnover, liquidity target, ad budget 20 %, possible/target future value, required sales = target revenue |
//! | `ad-spend-planner` | profit after ad spend, net balance, turnover, liquidity target, ad budget 20 %, possible/target future value |
//! | `sales-target` | profit, required sales = target revenue, max expenses 25 %, max salary 20 %, profit margin needed |
//! | `liquidity-required-sales` | profit, turnover, required sales = bank / target %, max expenses 35 %, max salary 20 %, expense reduction needed |
//! | `hire-impact` | profit after ad spend, 4000 cost and 10000 revenue per hire, adjusted profit |
//! | `hire-impact-lean` | profit after ad spend, 3000 cost and 5000 revenue per hire, adjusted profit |

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::entry::EntryField;
use super::metric::Metric;

/// Whether profit deducts advertising spend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProfitRule {
    /// sales − purchase − expenses − salary
    Operating,
    /// sales − purchase − expenses − salary − ad_spend
    AfterAdSpend,
}

/// How "required sales" is derived.
///
/// Two profiles use the same output name with different meanings; they are
/// kept apart rather than reconciled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RequiredSalesRule {
    /// required_sales = target_revenue
    TargetRevenue,
    /// required_sales = bank_balance / (target_percent / 100)
    FromLiquidityTarget,
}

/// The shape of one derived-metric formula.
///
/// Rates are whole percentages and per-hire amounts are whole currency units,
/// so profile tables can be plain `static` data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Formula {
    Profit(ProfitRule),
    /// bank_balance + profit, optionally less sell_return.
    Balance {
        profit: ProfitRule,
        less_sell_return: bool,
    },
    /// sales + sell_return
    Turnover,
    /// turnover × target_percent / 100
    LiquidityTarget,
    /// turnover × percent / 100
    AdBudget { percent: u32 },
    /// balance + closing_stock
    PossibleFutureValue {
        profit: ProfitRule,
        less_sell_return: bool,
    },
    /// liquidity target + ad budget
    TargetFutureValue { ad_percent: u32 },
    RequiredSales(RequiredSalesRule),
    /// sales × percent / 100
    ShareOfSales { percent: u32 },
    /// target_revenue − bank_balance
    ProfitMarginNeeded,
    /// max(0, sales + closing_stock − required_sales)
    ExpenseReductionNeeded(RequiredSalesRule),
    /// new_hires × per_hire
    ExpenseIncrease { per_hire: u32 },
    /// new_hires × per_hire
    RevenueBoost { per_hire: u32 },
    /// profit + revenue boost − expense increase
    AdjustedProfit {
        profit: ProfitRule,
        cost_per_hire: u32,
        revenue_per_hire: u32,
    },
}

impl Formula {
    /// Whether evaluating the formula divides by `target_percent`.
    pub fn divides_by_target_percent(&self) -> bool {
        matches!(
            self,
            Self::RequiredSales(RequiredSalesRule::FromLiquidityTarget)
                | Self::ExpenseReductionNeeded(RequiredSalesRule::FromLiquidityTarget)
        )
    }
}

fn profit_expr(rule: ProfitRule) -> &'static str {
    match rule {
        ProfitRule::Operating => "sales - purchase - expenses - salary",
        ProfitRule::AfterAdSpend => "sales - purchase - expenses - salary - ad_spend",
    }
}

fn required_sales_expr(rule: RequiredSalesRule) -> &'static str {
    match rule {
        RequiredSalesRule::TargetRevenue => "target_revenue",
        RequiredSalesRule::FromLiquidityTarget => "bank_balance / (target_percent / 100)",
    }
}

fn balance_expr(
    profit: ProfitRule,
    less_sell_return: bool,
) -> String {
    let returns = if less_sell_return { " - sell_return" } else { "" };
    format!("bank_balance + ({}){returns}", profit_expr(profit))
}

impl fmt::Display for Formula {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match *self {
            Self::Profit(rule) => f.write_str(profit_expr(rule)),
            Self::Balance {
                profit,
                less_sell_return,
            } => f.write_str(&balance_expr(profit, less_sell_return)),
            Self::Turnover => f.write_str("sales + sell_return"),
            Self::LiquidityTarget => f.write_str("turnover * target_percent / 100"),
            Self::AdBudget { percent } => write!(f, "turnover * {percent} / 100"),
            Self::PossibleFutureValue {
                profit,
                less_sell_return,
            } => write!(
                f,
                "{} + closing_stock",
                balance_expr(profit, less_sell_return)
            ),
            Self::TargetFutureValue { ad_percent } => write!(
                f,
                "turnover * target_percent / 100 + turnover * {ad_percent} / 100"
            ),
            Self::RequiredSales(rule) => f.write_str(required_sales_expr(rule)),
            Self::ShareOfSales { percent } => write!(f, "sales * {percent} / 100"),
            Self::ProfitMarginNeeded => f.write_str("target_revenue - bank_balance"),
            Self::ExpenseReductionNeeded(rule) => write!(
                f,
                "max(0, sales + closing_stock - {})",
                required_sales_expr(rule)
            ),
            Self::ExpenseIncrease { per_hire } => write!(f, "new_hires * {per_hire}"),
            Self::RevenueBoost { per_hire } => write!(f, "new_hires * {per_hire}"),
            Self::AdjustedProfit {
                profit,
                cost_per_hire,
                revenue_per_hire,
            } => write!(
                f,
                "({}) + new_hires * {revenue_per_hire} - new_hires * {cost_per_hire}",
                profit_expr(profit)
            ),
        }
    }
}

/// One column of a profile's export schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    Field(EntryField),
    Metric(Metric),
}

impl Column {
    pub fn key(&self) -> &'static str {
        match self {
            Self::Field(field) => field.key(),
            Self::Metric(metric) => metric.key(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Field(field) => field.label(),
            Self::Metric(metric) => metric.label(),
        }
    }
}

/// Error returned when a profile key is not recognised.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown formula profile '{0}'; expected one of: {known}", known = FormulaProfile::known_keys())]
pub struct UnknownProfileError(pub String);

/// The named formula variants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FormulaProfile {
    #[default]
    LiquidityPlanner,
    AdSpendPlanner,
    SalesTarget,
    LiquidityRequiredSales,
    HireImpact,
    HireImpactLean,
}

const LIQUIDITY_PLANNER: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::Operating)),
    (
        Metric::CurrentBalance,
        Formula::Balance {
            profit: ProfitRule::Operating,
            less_sell_return: true,
        },
    ),
    (Metric::Turnover, Formula::Turnover),
    (Metric::LiquidityTarget, Formula::LiquidityTarget),
    (Metric::AdBudget, Formula::AdBudget { percent: 20 }),
    (
        Metric::PossibleFutureValue,
        Formula::PossibleFutureValue {
            profit: ProfitRule::Operating,
            less_sell_return: true,
        },
    ),
    (
        Metric::TargetFutureValue,
        Formula::TargetFutureValue { ad_percent: 20 },
    ),
    (
        Metric::RequiredSales,
        Formula::RequiredSales(RequiredSalesRule::TargetRevenue),
    ),
];

const AD_SPEND_PLANNER: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::AfterAdSpend)),
    (
        Metric::NetBalance,
        Formula::Balance {
            profit: ProfitRule::AfterAdSpend,
            less_sell_return: false,
        },
    ),
    (Metric::Turnover, Formula::Turnover),
    (Metric::LiquidityTarget, Formula::LiquidityTarget),
    (Metric::AdBudget, Formula::AdBudget { percent: 20 }),
    (
        Metric::PossibleFutureValue,
        Formula::PossibleFutureValue {
            profit: ProfitRule::AfterAdSpend,
            less_sell_return: false,
        },
    ),
    (
        Metric::TargetFutureValue,
        Formula::TargetFutureValue { ad_percent: 20 },
    ),
];

const SALES_TARGET: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::Operating)),
    (
        Metric::RequiredSales,
        Formula::RequiredSales(RequiredSalesRule::TargetRevenue),
    ),
    (
        Metric::MaxExpensesAllowed,
        Formula::ShareOfSales { percent: 25 },
    ),
    (Metric::MaxSalaryBudget, Formula::ShareOfSales { percent: 20 }),
    (Metric::ProfitMarginNeeded, Formula::ProfitMarginNeeded),
];

const LIQUIDITY_REQUIRED_SALES: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::Operating)),
    (Metric::Turnover, Formula::Turnover),
    (
        Metric::RequiredSales,
        Formula::RequiredSales(RequiredSalesRule::FromLiquidityTarget),
    ),
    (
        Metric::MaxExpensesAllowed,
        Formula::ShareOfSales { percent: 35 },
    ),
    (Metric::MaxSalaryBudget, Formula::ShareOfSales { percent: 20 }),
    (
        Metric::ExpenseReductionNeeded,
        Formula::ExpenseReductionNeeded(RequiredSalesRule::FromLiquidityTarget),
    ),
];

const HIRE_IMPACT: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::AfterAdSpend)),
    (
        Metric::ExpenseIncrease,
        Formula::ExpenseIncrease { per_hire: 4000 },
    ),
    (Metric::RevenueBoost, Formula::RevenueBoost { per_hire: 10000 }),
    (
        Metric::AdjustedProfit,
        Formula::AdjustedProfit {
            profit: ProfitRule::AfterAdSpend,
            cost_per_hire: 4000,
            revenue_per_hire: 10000,
        },
    ),
];

const HIRE_IMPACT_LEAN: &[(Metric, Formula)] = &[
    (Metric::Profit, Formula::Profit(ProfitRule::AfterAdSpend)),
    (
        Metric::ExpenseIncrease,
        Formula::ExpenseIncrease { per_hire: 3000 },
    ),
    (Metric::RevenueBoost, Formula::RevenueBoost { per_hire: 5000 }),
    (
        Metric::AdjustedProfit,
        Formula::AdjustedProfit {
            profit: ProfitRule::AfterAdSpend,
            cost_per_hire: 3000,
            revenue_per_hire: 5000,
        },
    ),
];

const LIQUIDITY_PLANNER_INPUTS: &[EntryField] = &[
    EntryField::Date,
    EntryField::BankBalance,
    EntryField::Purchase,
    EntryField::Sales,
    EntryField::SellReturn,
    EntryField::Expenses,
    EntryField::Salary,
    EntryField::ClosingStock,
    EntryField::TargetPercent,
    EntryField::TargetRevenue,
];

const AD_SPEND_PLANNER_INPUTS: &[EntryField] = &[
    EntryField::Date,
    EntryField::RegisteredBy,
    EntryField::BankBalance,
    EntryField::Purchase,
    EntryField::Sales,
    EntryField::SellReturn,
    EntryField::Expenses,
    EntryField::Salary,
    EntryField::AdSpend,
    EntryField::ClosingStock,
    EntryField::TargetPercent,
];

const SALES_TARGET_INPUTS: &[EntryField] = &[
    EntryField::Date,
    EntryField::RegisteredBy,
    EntryField::BankBalance,
    EntryField::Sales,
    EntryField::Purchase,
    EntryField::Expenses,
    EntryField::Salary,
    EntryField::TargetRevenue,
    EntryField::TargetNetProfit,
];

const LIQUIDITY_REQUIRED_SALES_INPUTS: &[EntryField] = &[
    EntryField::Date,
    EntryField::RegisteredBy,
    EntryField::BankBalance,
    EntryField::Sales,
    EntryField::Purchase,
    EntryField::SellReturn,
    EntryField::Expenses,
    EntryField::Salary,
    EntryField::ClosingStock,
    EntryField::TargetPercent,
];

const HIRE_IMPACT_INPUTS: &[EntryField] = &[
    EntryField::Date,
    EntryField::RegisteredBy,
    EntryField::Sales,
    EntryField::Purchase,
    EntryField::Expenses,
    EntryField::Salary,
    EntryField::AdSpend,
    EntryField::NewHires,
];

impl FormulaProfile {
    pub const ALL: [FormulaProfile; 6] = [
        FormulaProfile::LiquidityPlanner,
        FormulaProfile::AdSpendPlanner,
        FormulaProfile::SalesTarget,
        FormulaProfile::LiquidityRequiredSales,
        FormulaProfile::HireImpact,
        FormulaProfile::HireImpactLean,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::LiquidityPlanner => "liquidity-planner",
            Self::AdSpendPlanner => "ad-spend-planner",
            Self::SalesTarget => "sales-target",
            Self::LiquidityRequiredSales => "liquidity-required-sales",
            Self::HireImpact => "hire-impact",
            Self::HireImpactLean => "hire-impact-lean",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::LiquidityPlanner => "Liquidity Planner",
            Self::AdSpendPlanner => "Ad Spend Planner",
            Self::SalesTarget => "Sales Target",
            Self::LiquidityRequiredSales => "Liquidity Required Sales",
            Self::HireImpact => "Hire Impact",
            Self::HireImpactLean => "Hire Impact (lean)",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|profile| profile.key() == key)
    }

    fn known_keys() -> String {
        Self::ALL
            .iter()
            .map(|profile| profile.key())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// The ordered formula table for this profile.
    pub fn formulas(&self) -> &'static [(Metric, Formula)] {
        match self {
            Self::LiquidityPlanner => LIQUIDITY_PLANNER,
            Self::AdSpendPlanner => AD_SPEND_PLANNER,
            Self::SalesTarget => SALES_TARGET,
            Self::LiquidityRequiredSales => LIQUIDITY_REQUIRED_SALES,
            Self::HireImpact => HIRE_IMPACT,
            Self::HireImpactLean => HIRE_IMPACT_LEAN,
        }
    }

    /// The entry fields this profile's form collects. `date` is always first.
    pub fn inputs(&self) -> &'static [EntryField] {
        match self {
            Self::LiquidityPlanner => LIQUIDITY_PLANNER_INPUTS,
            Self::AdSpendPlanner => AD_SPEND_PLANNER_INPUTS,
            Self::SalesTarget => SALES_TARGET_INPUTS,
            Self::LiquidityRequiredSales => LIQUIDITY_REQUIRED_SALES_INPUTS,
            Self::HireImpact | Self::HireImpactLean => HIRE_IMPACT_INPUTS,
        }
    }

    pub fn outputs(&self) -> impl Iterator<Item = Metric> {
        self.formulas().iter().map(|(metric, _)| *metric)
    }

    pub fn collects(
        &self,
        field: EntryField,
    ) -> bool {
        self.inputs().contains(&field)
    }

    /// Whether any formula in the table divides by `target_percent`.
    pub fn requires_target_percent(&self) -> bool {
        self.formulas()
            .iter()
            .any(|(_, formula)| formula.divides_by_target_percent())
    }

    /// The export schema: inputs followed by outputs.
    pub fn columns(&self) -> Vec<Column> {
        self.inputs()
            .iter()
            .copied()
            .map(Column::Field)
            .chain(self.outputs().map(Column::Metric))
            .collect()
    }
}

impl fmt::Display for FormulaProfile {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FormulaProfile {
    type Err = UnknownProfileError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s.trim()).ok_or_else(|| UnknownProfileError(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn every_profile_starts_inputs_with_date() {
        for profile in FormulaProfile::ALL {
            assert_eq!(profile.inputs().first(), Some(&EntryField::Date), "{profile}");
        }
    }

    #[test]
    fn every_profile_has_unique_column_keys() {
        for profile in FormulaProfile::ALL {
            let columns = profile.columns();
            let keys: HashSet<_> = columns.iter().map(Column::key).collect();

            assert_eq!(keys.len(), columns.len(), "{profile}");
        }
    }

    #[test]
    fn no_two_profiles_share_a_formula_table() {
        for (i, a) in FormulaProfile::ALL.iter().enumerate() {
            for b in &FormulaProfile::ALL[i + 1..] {
                assert_ne!(a.formulas(), b.formulas(), "{a} and {b}");
            }
        }
    }

    #[test]
    fn only_liquidity_required_sales_divides_by_target_percent() {
        let dividing: Vec<_> = FormulaProfile::ALL
            .into_iter()
            .filter(FormulaProfile::requires_target_percent)
            .collect();

        assert_eq!(dividing, vec![FormulaProfile::LiquidityRequiredSales]);
    }

    #[test]
    fn every_formula_reads_only_collected_fields() {
        for profile in FormulaProfile::ALL {
            for (metric, formula) in profile.formulas() {
                let text = formula.to_string();
                for field in EntryField::ALL {
                    if text.contains(field.key()) {
                        assert!(
                            profile.collects(field),
                            "{profile}: {metric} reads {} which the form does not collect",
                            field.key()
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn from_str_accepts_known_keys() {
        assert_eq!(
            "hire-impact-lean".parse::<FormulaProfile>(),
            Ok(FormulaProfile::HireImpactLean)
        );
        assert_eq!(
            " sales-target ".parse::<FormulaProfile>(),
            Ok(FormulaProfile::SalesTarget)
        );
    }

    #[test]
    fn from_str_lists_known_keys_on_error() {
        let err = "orno".parse::<FormulaProfile>().unwrap_err();

        assert!(err.to_string().contains("liquidity-required-sales"));
    }

    #[test]
    fn formula_display_documents_the_expression() {
        let formula = Formula::ExpenseReductionNeeded(RequiredSalesRule::FromLiquidityTarget);

        assert_eq!(
            formula.to_string(),
            "max(0, sales + closing_stock - bank_balance / (target_percent / 100))"
        );
    }

    #[test]
    fn columns_list_inputs_then_outputs() {
        let keys: Vec<_> = FormulaProfile::HireImpact
            .columns()
            .iter()
            .map(Column::key)
            .collect();

        assert_eq!(
            keys,
            vec![
                "date",
                "registered_by",
                "sales",
                "purchase",
                "expenses",
                "salary",
                "ad_spend",
                "new_hires",
                "profit",
                "expense_increase",
                "revenue_boost",
                "adjusted_profit",
            ]
        );
    }
}
