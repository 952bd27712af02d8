#![doc(test(attr(deny(warnings))))]

//! PocketWise: a personal finance ledger with budget tracking and report
//! export, driven from a terminal shell.
//!
//! The data model lives in `pocketwise-domain`, the ledger store and report
//! generator in `pocketwise-core`, file persistence in
//! `pocketwise-storage-json` and preferences in `pocketwise-config`.

pub mod cli;
pub mod utils;

pub use pocketwise_config as config;
pub use pocketwise_core as ledger;
pub use pocketwise_domain as domain;
pub use pocketwise_storage_json as storage;

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("PocketWise tracing initialized.");
    });
}
