//! pocketwise-core
//!
//! Ledger store, aggregates and the finance report generator.
//! Depends on pocketwise-domain. No CLI, no terminal I/O; persistence goes
//! through the [`storage::LedgerStorage`] trait.

pub mod budget_service;
pub mod error;
pub mod format;
pub mod ledger_store;
pub mod report;
pub mod storage;
pub mod summary_service;
pub mod time;
pub mod transaction_service;


pub use budget_service::*;
pub use error::CoreError;
pub use ledger_store::*;
pub use summary_service::*;
pub use transaction_service::*;
