//! kasboek-core: canonical transaction records, column mapping, normalizers and
//! income/expense aggregation shared by every bank adapter.

pub mod aggregate;
pub mod error;
pub mod mapper;
pub mod normalize;
pub mod number;
pub mod profile;
pub mod record;

pub use aggregate::{
    AggregateEntry, AggregateRow, GroupTotal, IncomeExpenses, ZeroSumPolicy, aggregate,
};
pub use error::{Error, Result};
pub use mapper::map_columns;
pub use normalize::{normalize_amount_sign, normalize_iban, normalize_names};
pub use number::parse_number;
pub use profile::{AmountSign, BankProfile, NameBackfill, Quirks, SourceFormat};
pub use record::{
    Cell, ColumnPositions, RawRow, TransactionRecord, UNKNOWN_IBAN, UNKNOWN_NAME,
};
