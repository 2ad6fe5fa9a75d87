mod entry;
mod metric;
mod profile;
mod record;

pub use entry::{EntryField, MAX_REGISTERED_BY_LEN, RawEntry, ValidationError};
pub use metric::{DerivedMetrics, Metric};
pub use profile::{
    Column, Formula, FormulaProfile, ProfitRule, RequiredSalesRule, UnknownProfileError,
};
pub use record::LedgerRecord;
