//! Raw finance entries as captured by the entry form.
//!
//! A [`RawEntry`] is one submission: the business figures for a single date.
//! Every monetary field defaults to zero, so a form that does not collect a
//! given field (for example `ad_spend`) still produces a complete entry.

use std::fmt;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest accepted value for [`RawEntry::registered_by`], in characters.
pub const MAX_REGISTERED_BY_LEN: usize = 64;

/// Names every field of a [`RawEntry`].
///
/// The snake_case [`key`](EntryField::key) is used for CSV headers and
/// configuration; the [`label`](EntryField::label) is used for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntryField {
    Date,
    RegisteredBy,
    BankBalance,
    Sales,
    Purchase,
    SellReturn,
    Expenses,
    Salary,
    AdSpend,
    ClosingStock,
    TargetRevenue,
    TargetNetProfit,
    TargetPercent,
    NewHires,
}

impl EntryField {
    /// Every field, in canonical order.
    pub const ALL: [EntryField; 14] = [
        EntryField::Date,
        EntryField::RegisteredBy,
        EntryField::BankBalance,
        EntryField::Sales,
        EntryField::Purchase,
        EntryField::SellReturn,
        EntryField::Expenses,
        EntryField::Salary,
        EntryField::AdSpend,
        EntryField::ClosingStock,
        EntryField::TargetRevenue,
        EntryField::TargetNetProfit,
        EntryField::TargetPercent,
        EntryField::NewHires,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::RegisteredBy => "registered_by",
            Self::BankBalance => "bank_balance",
            Self::Sales => "sales",
            Self::Purchase => "purchase",
            Self::SellReturn => "sell_return",
            Self::Expenses => "expenses",
            Self::Salary => "salary",
            Self::AdSpend => "ad_spend",
            Self::ClosingStock => "closing_stock",
            Self::TargetRevenue => "target_revenue",
            Self::TargetNetProfit => "target_net_profit",
            Self::TargetPercent => "target_percent",
            Self::NewHires => "new_hires",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Date => "Date",
            Self::RegisteredBy => "Registered By",
            Self::BankBalance => "Current Bank Balance",
            Self::Sales => "Sales",
            Self::Purchase => "Purchase",
            Self::SellReturn => "Sell Return",
            Self::Expenses => "Expenses",
            Self::Salary => "Salary",
            Self::AdSpend => "Ad Spend",
            Self::ClosingStock => "Closing Stock",
            Self::TargetRevenue => "Target Revenue",
            Self::TargetNetProfit => "Target Net Profit",
            Self::TargetPercent => "Target %",
            Self::NewHires => "New Hires",
        }
    }

    pub fn parse(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|field| field.key() == key)
    }

    /// Whether the field holds a currency amount.
    pub fn is_monetary(&self) -> bool {
        !matches!(
            self,
            Self::Date | Self::RegisteredBy | Self::TargetPercent | Self::NewHires
        )
    }
}

impl fmt::Display for EntryField {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Range and type violations detected at the form boundary.
///
/// These never reach the metrics calculator: an entry that fails validation
/// is rejected before any derived value is computed.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// A required field was left empty.
    #[error("{field} is required")]
    Missing { field: EntryField },

    /// The text entered for a numeric field could not be parsed.
    #[error("{field} must be a number, got '{input}'")]
    NotNumeric { field: EntryField, input: String },

    /// The text entered for the date could not be parsed as `YYYY-MM-DD`.
    #[error("{field} must be a date in YYYY-MM-DD format, got '{input}'")]
    InvalidDate { field: EntryField, input: String },

    /// An amount that must be zero or more was negative.
    #[error("{field} must not be negative, got {value}")]
    Negative { field: EntryField, value: Decimal },

    /// A percentage outside 0–100.
    #[error("{field} must be between 0 and 100, got {value}")]
    PercentOutOfRange { field: EntryField, value: i64 },

    /// A count that must be a non-negative whole number.
    #[error("{field} must be a whole number of 0 or more, got '{input}'")]
    InvalidCount { field: EntryField, input: String },

    /// A text field was present but blank.
    #[error("{field} must not be blank")]
    Blank { field: EntryField },

    /// A text field exceeded its maximum length.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: EntryField, max: usize },
}

impl ValidationError {
    /// The field the error refers to.
    pub fn field(&self) -> EntryField {
        match self {
            Self::Missing { field }
            | Self::NotNumeric { field, .. }
            | Self::InvalidDate { field, .. }
            | Self::Negative { field, .. }
            | Self::PercentOutOfRange { field, .. }
            | Self::InvalidCount { field, .. }
            | Self::Blank { field }
            | Self::TooLong { field, .. } => *field,
        }
    }
}

/// One user submission.
///
/// Monetary fields default to zero via [`RawEntry::new`]; build a populated
/// entry with struct update syntax:
///
/// ```
/// use chrono::NaiveDate;
/// use rust_decimal_macros::dec;
/// use finance_core::RawEntry;
///
/// let date = NaiveDate::from_ymd_opt(2025, 3, 1).unwrap();
/// let entry = RawEntry {
///     sales: dec!(1000),
///     purchase: dec!(300),
///     ..RawEntry::new(date)
/// };
///
/// assert_eq!(entry.expenses, dec!(0));
/// assert_eq!(entry.target_percent, 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEntry {
    pub date: NaiveDate,
    /// Who recorded the entry.
    pub registered_by: Option<String>,

    /// Bank balance before this period's activity. May be negative (overdraft).
    pub bank_balance: Decimal,
    pub sales: Decimal,
    pub purchase: Decimal,
    pub sell_return: Decimal,
    pub expenses: Decimal,
    pub salary: Decimal,
    pub ad_spend: Decimal,
    /// Value of unsold inventory at the end of the period.
    pub closing_stock: Decimal,
    pub target_revenue: Decimal,
    pub target_net_profit: Decimal,

    /// Liquidity (or turnover) target as a whole percentage, 0–100.
    pub target_percent: u8,
    pub new_hires: u32,
}

impl RawEntry {
    /// Creates an entry for `date` with every other field zero or empty.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            registered_by: None,
            bank_balance: Decimal::ZERO,
            sales: Decimal::ZERO,
            purchase: Decimal::ZERO,
            sell_return: Decimal::ZERO,
            expenses: Decimal::ZERO,
            salary: Decimal::ZERO,
            ad_spend: Decimal::ZERO,
            closing_stock: Decimal::ZERO,
            target_revenue: Decimal::ZERO,
            target_net_profit: Decimal::ZERO,
            target_percent: 0,
            new_hires: 0,
        }
    }

    /// Returns the numeric value of `field`, or `None` for the date and the
    /// free-text fields.
    ///
    /// `target_percent` and `new_hires` are returned as whole decimals.
    pub fn amount(
        &self,
        field: EntryField,
    ) -> Option<Decimal> {
        let value = match field {
            EntryField::Date | EntryField::RegisteredBy => return None,
            EntryField::BankBalance => self.bank_balance,
            EntryField::Sales => self.sales,
            EntryField::Purchase => self.purchase,
            EntryField::SellReturn => self.sell_return,
            EntryField::Expenses => self.expenses,
            EntryField::Salary => self.salary,
            EntryField::AdSpend => self.ad_spend,
            EntryField::ClosingStock => self.closing_stock,
            EntryField::TargetRevenue => self.target_revenue,
            EntryField::TargetNetProfit => self.target_net_profit,
            EntryField::TargetPercent => Decimal::from(self.target_percent),
            EntryField::NewHires => Decimal::from(self.new_hires),
        };
        Some(value)
    }

    /// A copy that keeps only `fields`. Everything else is reset to zero or
    /// empty, as if the form had never collected it. The date is always kept.
    pub fn restricted_to(
        &self,
        fields: &[EntryField],
    ) -> RawEntry {
        let mut entry = RawEntry::new(self.date);
        for field in fields {
            match field {
                EntryField::Date => {}
                EntryField::RegisteredBy => entry.registered_by = self.registered_by.clone(),
                EntryField::BankBalance => entry.bank_balance = self.bank_balance,
                EntryField::Sales => entry.sales = self.sales,
                EntryField::Purchase => entry.purchase = self.purchase,
                EntryField::SellReturn => entry.sell_return = self.sell_return,
                EntryField::Expenses => entry.expenses = self.expenses,
                EntryField::Salary => entry.salary = self.salary,
                EntryField::AdSpend => entry.ad_spend = self.ad_spend,
                EntryField::ClosingStock => entry.closing_stock = self.closing_stock,
                EntryField::TargetRevenue => entry.target_revenue = self.target_revenue,
                EntryField::TargetNetProfit => entry.target_net_profit = self.target_net_profit,
                EntryField::TargetPercent => entry.target_percent = self.target_percent,
                EntryField::NewHires => entry.new_hires = self.new_hires,
            }
        }
        entry
    }

    /// Applies the range checks owned by the form boundary.
    ///
    /// `bank_balance` is signed and never rejected. Every other amount must
    /// be zero or more, `target_percent` must be at most 100, and
    /// `registered_by` (when present) must be non-blank and at most
    /// [`MAX_REGISTERED_BY_LEN`] characters.
    ///
    /// # Errors
    ///
    /// Returns the first [`ValidationError`] found, checking fields in
    /// [`EntryField::ALL`] order.
    pub fn validate(&self) -> Result<(), ValidationError> {
        match self.validation_errors().into_iter().next() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    /// Every range violation of the entry, in [`EntryField::ALL`] order.
    pub fn validation_errors(&self) -> Vec<ValidationError> {
        let mut errors = Vec::new();

        if let Some(name) = &self.registered_by {
            if name.trim().is_empty() {
                errors.push(ValidationError::Blank {
                    field: EntryField::RegisteredBy,
                });
            } else if name.chars().count() > MAX_REGISTERED_BY_LEN {
                errors.push(ValidationError::TooLong {
                    field: EntryField::RegisteredBy,
                    max: MAX_REGISTERED_BY_LEN,
                });
            }
        }

        for field in EntryField::ALL {
            if !field.is_monetary() || field == EntryField::BankBalance {
                continue;
            }
            if let Some(value) = self.amount(field) {
                if value < Decimal::ZERO {
                    errors.push(ValidationError::Negative { field, value });
                }
            }
        }

        if self.target_percent > 100 {
            errors.push(ValidationError::PercentOutOfRange {
                field: EntryField::TargetPercent,
                value: i64::from(self.target_percent),
            });
        }

        errors
    }
}
