//! Text form for one finance entry.
//!
//! Every field is held as the text the user typed. [`EntryForm::to_entry`]
//! parses the fields the active profile collects, applies the range checks
//! and reports every problem at once.

use chrono::{Local, NaiveDate};
use finance_core::{EntryField, FormulaProfile, RawEntry, ValidationError};
use rust_decimal::Decimal;

use crate::utils::parse_decimal;

/// Form state for one entry. Fields the active profile does not collect are
/// ignored and end up as zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntryForm {
    pub date: String,
    pub registered_by: String,
    pub bank_balance: String,
    pub sales: String,
    pub purchase: String,
    pub sell_return: String,
    pub expenses: String,
    pub salary: String,
    pub ad_spend: String,
    pub closing_stock: String,
    pub target_revenue: String,
    pub target_net_profit: String,
    pub target_percent: String,
    pub new_hires: String,
}

impl EntryForm {
    /// Empty form dated today.
    pub fn new() -> Self {
        Self {
            date: Local::now().date_naive().format("%Y-%m-%d").to_string(),
            ..Default::default()
        }
    }

    pub fn text(
        &self,
        field: EntryField,
    ) -> &str {
        match field {
            EntryField::Date => &self.date,
            EntryField::RegisteredBy => &self.registered_by,
            EntryField::BankBalance => &self.bank_balance,
            EntryField::Sales => &self.sales,
            EntryField::Purchase => &self.purchase,
            EntryField::SellReturn => &self.sell_return,
            EntryField::Expenses => &self.expenses,
            EntryField::Salary => &self.salary,
            EntryField::AdSpend => &self.ad_spend,
            EntryField::ClosingStock => &self.closing_stock,
            EntryField::TargetRevenue => &self.target_revenue,
            EntryField::TargetNetProfit => &self.target_net_profit,
            EntryField::TargetPercent => &self.target_percent,
            EntryField::NewHires => &self.new_hires,
        }
    }

    /// Parses the form into an entry for `profile`.
    ///
    /// Empty numeric fields are 0 and `,` is accepted as a thousands
    /// separator. A blank `registered_by` means "not given".
    ///
    /// # Errors
    ///
    /// Every parse failure and range violation, in form order.
    pub fn to_entry(
        &self,
        profile: FormulaProfile,
    ) -> Result<RawEntry, Vec<ValidationError>> {
        let mut errors = Vec::new();

        let date = match parse_date(&self.date) {
            Ok(date) => date,
            Err(error) => {
                errors.push(error);
                NaiveDate::default()
            }
        };
        let mut entry = RawEntry::new(date);

        for field in profile.inputs().iter().copied() {
            let text = self.text(field);
            let parsed = match field {
                EntryField::Date => Ok(()),
                EntryField::RegisteredBy => {
                    let name = text.trim();
                    entry.registered_by = (!name.is_empty()).then(|| name.to_string());
                    Ok(())
                }
                EntryField::TargetPercent => {
                    parse_percent(text).map(|value| entry.target_percent = value)
                }
                EntryField::NewHires => {
                    parse_count(field, text).map(|value| entry.new_hires = value)
                }
                amount => {
                    parse_amount(amount, text).map(|value| set_amount(&mut entry, amount, value))
                }
            };
            if let Err(error) = parsed {
                errors.push(error);
            }
        }

        if errors.is_empty() {
            errors = entry.validation_errors();
        }
        if errors.is_empty() {
            Ok(entry)
        } else {
            Err(errors)
        }
    }
}

fn parse_date(text: &str) -> Result<NaiveDate, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Missing {
            field: EntryField::Date,
        });
    }
    NaiveDate::parse_from_str(trimmed, "%Y-%m-%d").map_err(|_| ValidationError::InvalidDate {
        field: EntryField::Date,
        input: text.to_string(),
    })
}

fn parse_amount(
    field: EntryField,
    text: &str,
) -> Result<Decimal, ValidationError> {
    parse_decimal(text).map_err(|_| ValidationError::NotNumeric {
        field,
        input: text.to_string(),
    })
}

fn parse_percent(text: &str) -> Result<u8, ValidationError> {
    let field = EntryField::TargetPercent;
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    let value: i64 = trimmed.parse().map_err(|_| ValidationError::NotNumeric {
        field,
        input: text.to_string(),
    })?;
    u8::try_from(value)
        .ok()
        .filter(|percent| *percent <= 100)
        .ok_or(ValidationError::PercentOutOfRange { field, value })
}

fn parse_count(
    field: EntryField,
    text: &str,
) -> Result<u32, ValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(0);
    }
    trimmed.parse().map_err(|_| ValidationError::InvalidCount {
        field,
        input: text.to_string(),
    })
}

fn set_amount(
    entry: &mut RawEntry,
    field: EntryField,
    value: Decimal,
) {
    let slot = match field {
        EntryField::BankBalance => &mut entry.bank_balance,
        EntryField::Sales => &mut entry.sales,
        EntryField::Purchase => &mut entry.purchase,
        EntryField::SellReturn => &mut entry.sell_return,
        EntryField::Expenses => &mut entry.expenses,
        EntryField::Salary => &mut entry.salary,
        EntryField::AdSpend => &mut entry.ad_spend,
        EntryField::ClosingStock => &mut entry.closing_stock,
        EntryField::TargetRevenue => &mut entry.target_revenue,
        EntryField::TargetNetProfit => &mut entry.target_net_profit,
        EntryField::Date
        | EntryField::RegisteredBy
        | EntryField::TargetPercent
        | EntryField::NewHires => return,
    };
    *slot = value;
}
