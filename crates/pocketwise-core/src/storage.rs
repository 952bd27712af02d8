use std::{collections::HashSet, sync::Mutex};

use pocketwise_domain::Ledger;

use crate::CoreError;

/// Well-known key the snapshot is stored under.
pub const SNAPSHOT_KEY: &str = "expenseData";

/// Abstraction over persistence backends holding a single ledger snapshot.
pub trait LedgerStorage: Send + Sync {
    /// Returns `Ok(None)` when no snapshot has been written yet.
    fn load_ledger(&self) -> Result<Option<Ledger>, CoreError>;
    /// Replaces the stored snapshot. Either the whole snapshot is written or
    /// the previous one remains.
    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError>;
    /// Removes the stored snapshot. Removing an absent snapshot succeeds.
    fn clear_ledger(&self) -> Result<(), CoreError>;
}

/// In-process storage holding the serialized snapshot text, mirroring a
/// browser-style key/value slot.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    slot: Mutex<Option<String>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the slot with raw text, which need not be valid JSON.
    pub fn with_raw(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Option<String>>, CoreError> {
        self.slot
            .lock()
            .map_err(|_| CoreError::Storage("memory storage lock poisoned".into()))
    }
}

impl LedgerStorage for MemoryStorage {
    fn load_ledger(&self) -> Result<Option<Ledger>, CoreError> {
        let slot = self.lock()?;
        match slot.as_deref() {
            Some(raw) => Ok(Some(serde_json::from_str(raw)?)),
            None => Ok(None),
        }
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let json = serde_json::to_string(ledger)?;
        *self.lock()? = Some(json);
        Ok(())
    }

    fn clear_ledger(&self) -> Result<(), CoreError> {
        *self.lock()? = None;
        Ok(())
    }
}

/// Drops entries that break ledger invariants and describes each repair.
///
/// Removed: non-positive or non-finite amounts, blank category or
/// description, repeated identifiers (first occurrence wins). A negative or
/// non-finite budget is reset to zero.
pub fn repair_snapshot(ledger: Ledger) -> (Ledger, Vec<String>) {
    let Ledger {
        transactions,
        monthly_budget,
    } = ledger;
    let mut warnings = Vec::new();
    let mut seen = HashSet::new();
    let mut kept = Vec::with_capacity(transactions.len());

    for txn in transactions {
        if !(txn.amount.is_finite() && txn.amount > 0.0) {
            warnings.push(format!(
                "transaction {} dropped: amount {} is not positive",
                txn.id, txn.amount
            ));
            continue;
        }
        if txn.category.trim().is_empty() {
            warnings.push(format!("transaction {} dropped: empty category", txn.id));
            continue;
        }
        if txn.description.trim().is_empty() {
            warnings.push(format!("transaction {} dropped: empty description", txn.id));
            continue;
        }
        if !seen.insert(txn.id.clone()) {
            warnings.push(format!("transaction {} dropped: duplicate id", txn.id));
            continue;
        }
        kept.push(txn);
    }

    let monthly_budget = if monthly_budget.is_finite() && monthly_budget >= 0.0 {
        monthly_budget
    } else {
        warnings.push(format!(
            "monthly budget {} is invalid; reset to 0",
            monthly_budget
        ));
        0.0
    };

    (
        Ledger {
            transactions: kept,
            monthly_budget,
        },
        warnings,
    )
}
