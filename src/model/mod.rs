//! Types that represent the core data model, such as `Transaction` and `Amount`.
mod amount;
mod mapping;
mod transaction;

pub use amount::{Amount, AmountError};
pub use mapping::{Header, Mapping, MappingError};
pub use transaction::{Record, Transaction, TransactionColumn, Transactions};
pub use transaction::{AMOUNT_STR, CARD_NUMBER_STR, CATEGORY_STR, DESCRIPTION_STR};
