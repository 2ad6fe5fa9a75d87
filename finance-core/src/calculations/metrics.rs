//! Derived-metrics calculator.
//!
//! [`MetricsCalculator`] evaluates the formula table of one
//! [`FormulaProfile`] against a [`RawEntry`]. Every formula is a pure function
//! of the entry: no rounding, no hidden state, no I/O.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use rust_decimal_macros::dec;
//! use finance_core::calculations::MetricsCalculator;
//! use finance_core::{FormulaProfile, Metric, RawEntry};
//!
//! let entry = RawEntry {
//!     bank_balance: dec!(500),
//!     sales: dec!(1000),
//!     purchase: dec!(300),
//!     expenses: dec!(100),
//!     salary: dec!(200),
//!     closing_stock: dec!(50),
//!     target_percent: 70,
//!     ..RawEntry::new(NaiveDate::from_ymd_opt(2025, 1, 31).unwrap())
//! };
//!
//! let calculator = MetricsCalculator::new(FormulaProfile::LiquidityPlanner);
//! let metrics = calculator.calculate(&entry).unwrap();
//!
//! assert_eq!(metrics.get(Metric::Profit), Some(dec!(400)));
//! assert_eq!(metrics.get(Metric::CurrentBalance), Some(dec!(900)));
//! assert_eq!(metrics.get(Metric::TargetFutureValue), Some(dec!(900)));
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{
    DerivedMetrics, Formula, FormulaProfile, Metric, ProfitRule, RawEntry, RequiredSalesRule,
};

/// Errors that can occur while deriving metrics.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MetricsError {
    /// A formula divides by the target percentage and the entry's target
    /// percentage is zero.
    #[error("{metric} divides by the target percentage, which is 0; choose a non-zero target percentage")]
    DivisionByZero { metric: Metric },

    /// An intermediate or final value does not fit in a decimal.
    #[error("{metric} is too large to calculate; check the entered amounts")]
    Overflow { metric: Metric },
}

/// Calculator for one formula profile.
///
/// The calculator is a thin, copyable handle: the profile's formula table is
/// static data, so constructing one is free.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MetricsCalculator {
    profile: FormulaProfile,
}

impl MetricsCalculator {
    pub fn new(profile: FormulaProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> FormulaProfile {
        self.profile
    }

    /// Evaluates every formula of the active profile, in table order.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::DivisionByZero`] when the profile derives
    /// required sales from the liquidity target and `target_percent` is 0,
    /// and [`MetricsError::Overflow`] when an amount is too large for a
    /// formula. No partial result is returned.
    pub fn calculate(
        &self,
        entry: &RawEntry,
    ) -> Result<DerivedMetrics, MetricsError> {
        let mut metrics = DerivedMetrics::new(self.profile);

        for (metric, formula) in self.profile.formulas() {
            let value = self.evaluate(*metric, formula, entry)?;
            metrics.push(*metric, value);
        }

        debug!(
            profile = %self.profile,
            date = %entry.date,
            outputs = metrics.len(),
            "derived metrics calculated"
        );

        Ok(metrics)
    }

    fn evaluate(
        &self,
        metric: Metric,
        formula: &Formula,
        entry: &RawEntry,
    ) -> Result<Decimal, MetricsError> {
        let value = match *formula {
            Formula::Profit(rule) => self.profit(entry, rule),
            Formula::Balance {
                profit,
                less_sell_return,
            } => self.balance(entry, profit, less_sell_return),
            Formula::Turnover => self.turnover(entry),
            Formula::LiquidityTarget => self.liquidity_target(entry),
            Formula::AdBudget { percent } => self.ad_budget(entry, percent),
            Formula::PossibleFutureValue {
                profit,
                less_sell_return,
            } => self.possible_future_value(entry, profit, less_sell_return),
            Formula::TargetFutureValue { ad_percent } => {
                self.target_future_value(entry, ad_percent)
            }
            Formula::RequiredSales(rule) => return self.required_sales(metric, entry, rule),
            Formula::ShareOfSales { percent } => percent_of(entry.sales, percent),
            Formula::ProfitMarginNeeded => self.profit_margin_needed(entry),
            Formula::ExpenseReductionNeeded(rule) => {
                return self.expense_reduction_needed(metric, entry, rule);
            }
            Formula::ExpenseIncrease { per_hire } => self.per_hire(entry, per_hire),
            Formula::RevenueBoost { per_hire } => self.per_hire(entry, per_hire),
            Formula::AdjustedProfit {
                profit,
                cost_per_hire,
                revenue_per_hire,
            } => self.adjusted_profit(entry, profit, cost_per_hire, revenue_per_hire),
        };
        self.in_range(metric, entry, value)
    }

    /// Turns an overflowed formula into [`MetricsError::Overflow`].
    fn in_range(
        &self,
        metric: Metric,
        entry: &RawEntry,
        value: Option<Decimal>,
    ) -> Result<Decimal, MetricsError> {
        value.ok_or_else(|| {
            warn!(
                profile = %self.profile,
                metric = metric.key(),
                date = %entry.date,
                "formula result exceeds the decimal range"
            );
            MetricsError::Overflow { metric }
        })
    }

    /// sales − purchase − expenses − salary, less ad spend when the rule says so.
    fn profit(
        &self,
        entry: &RawEntry,
        rule: ProfitRule,
    ) -> Option<Decimal> {
        let operating = entry
            .sales
            .checked_sub(entry.purchase)?
            .checked_sub(entry.expenses)?
            .checked_sub(entry.salary)?;
        match rule {
            ProfitRule::Operating => Some(operating),
            ProfitRule::AfterAdSpend => operating.checked_sub(entry.ad_spend),
        }
    }

    /// bank_balance + profit, less sell returns when the rule says so.
    fn balance(
        &self,
        entry: &RawEntry,
        profit: ProfitRule,
        less_sell_return: bool,
    ) -> Option<Decimal> {
        let balance = entry.bank_balance.checked_add(self.profit(entry, profit)?)?;
        if less_sell_return {
            balance.checked_sub(entry.sell_return)
        } else {
            Some(balance)
        }
    }

    fn turnover(
        &self,
        entry: &RawEntry,
    ) -> Option<Decimal> {
        entry.sales.checked_add(entry.sell_return)
    }

    fn liquidity_target(
        &self,
        entry: &RawEntry,
    ) -> Option<Decimal> {
        percent_of(self.turnover(entry)?, u32::from(entry.target_percent))
    }

    fn ad_budget(
        &self,
        entry: &RawEntry,
        percent: u32,
    ) -> Option<Decimal> {
        percent_of(self.turnover(entry)?, percent)
    }

    /// Projected balance once unsold inventory is counted.
    fn possible_future_value(
        &self,
        entry: &RawEntry,
        profit: ProfitRule,
        less_sell_return: bool,
    ) -> Option<Decimal> {
        self.balance(entry, profit, less_sell_return)?
            .checked_add(entry.closing_stock)
    }

    fn target_future_value(
        &self,
        entry: &RawEntry,
        ad_percent: u32,
    ) -> Option<Decimal> {
        self.liquidity_target(entry)?
            .checked_add(self.ad_budget(entry, ad_percent)?)
    }

    fn required_sales(
        &self,
        metric: Metric,
        entry: &RawEntry,
        rule: RequiredSalesRule,
    ) -> Result<Decimal, MetricsError> {
        match rule {
            RequiredSalesRule::TargetRevenue => Ok(entry.target_revenue),
            RequiredSalesRule::FromLiquidityTarget => {
                if entry.target_percent == 0 {
                    warn!(
                        profile = %self.profile,
                        metric = metric.key(),
                        bank_balance = %entry.bank_balance,
                        "target percentage is zero; required sales is undefined"
                    );
                    return Err(MetricsError::DivisionByZero { metric });
                }
                // bank_balance / (pct / 100), without materialising the fraction
                let required = entry
                    .bank_balance
                    .checked_mul(Decimal::ONE_HUNDRED)
                    .and_then(|scaled| scaled.checked_div(Decimal::from(entry.target_percent)));
                self.in_range(metric, entry, required)
            }
        }
    }

    fn profit_margin_needed(
        &self,
        entry: &RawEntry,
    ) -> Option<Decimal> {
        entry.target_revenue.checked_sub(entry.bank_balance)
    }

    /// Amount by which sales plus stock overshoot required sales, floored at 0.
    fn expense_reduction_needed(
        &self,
        metric: Metric,
        entry: &RawEntry,
        rule: RequiredSalesRule,
    ) -> Result<Decimal, MetricsError> {
        let required = self.required_sales(metric, entry, rule)?;
        let gap = entry
            .sales
            .checked_add(entry.closing_stock)
            .and_then(|stocked| stocked.checked_sub(required));
        let gap = self.in_range(metric, entry, gap)?;
        if gap < Decimal::ZERO {
            debug!(
                gap = %gap,
                "sales and stock fall short of required sales; no reduction needed"
            );
        }
        Ok(gap.max(Decimal::ZERO))
    }

    fn per_hire(
        &self,
        entry: &RawEntry,
        amount: u32,
    ) -> Option<Decimal> {
        Decimal::from(entry.new_hires).checked_mul(Decimal::from(amount))
    }

    fn adjusted_profit(
        &self,
        entry: &RawEntry,
        profit: ProfitRule,
        cost_per_hire: u32,
        revenue_per_hire: u32,
    ) -> Option<Decimal> {
        self.profit(entry, profit)?
            .checked_add(self.per_hire(entry, revenue_per_hire)?)?
            .checked_sub(self.per_hire(entry, cost_per_hire)?)
    }
}

/// `value × percent / 100`, kept exact.
fn percent_of(
    value: Decimal,
    percent: u32,
) -> Option<Decimal> {
    value
        .checked_mul(Decimal::from(percent))?
        .checked_div(Decimal::ONE_HUNDRED)
}
