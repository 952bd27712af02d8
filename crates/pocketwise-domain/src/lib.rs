//! pocketwise-domain
//!
//! Pure domain models (Ledger, Transaction, commands).
//! No I/O, no CLI, no storage. Only data types and core enums.

pub mod common;
pub mod ledger;
pub mod transaction;

pub use common::*;
pub use ledger::*;
pub use transaction::*;
