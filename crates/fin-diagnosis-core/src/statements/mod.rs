//! Simplified two-period financial statements.
//!
//! A user enters raw P/L and B/S line items for the current and prior
//! period; every subtotal is derived deterministically from them.

pub mod balance;
pub mod pair;
pub mod record;

pub use balance::BalanceCheck;
pub use pair::StatementPair;
pub use record::{FinancialStatement, RawLineItems};
