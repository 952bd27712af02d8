//! File-backed persistence for the PocketWise ledger snapshot plus the
//! JSON and PDF export writers.

use std::{
    fs::{self, File},
    io::Write,
    path::{Path, PathBuf},
};

use pocketwise_core::{
    storage::{LedgerStorage, SNAPSHOT_KEY},
    CoreError,
};
use pocketwise_domain::Ledger;

pub mod export;

pub use export::{export_json, export_pdf, json_export_file_name, PDF_REPORT_FILE};

const SNAPSHOT_EXTENSION: &str = "json";
const TMP_SUFFIX: &str = "tmp";

/// Keeps the snapshot in `<data_dir>/expenseData.json`.
#[derive(Debug, Clone)]
pub struct JsonLedgerStorage {
    data_dir: PathBuf,
}

impl JsonLedgerStorage {
    pub fn new(data_dir: impl Into<PathBuf>) -> Result<Self, CoreError> {
        let data_dir = data_dir.into();
        fs::create_dir_all(&data_dir)?;
        Ok(Self { data_dir })
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.data_dir
            .join(format!("{SNAPSHOT_KEY}.{SNAPSHOT_EXTENSION}"))
    }
}

impl LedgerStorage for JsonLedgerStorage {
    fn load_ledger(&self) -> Result<Option<Ledger>, CoreError> {
        let path = self.snapshot_path();
        if !path.exists() {
            return Ok(None);
        }
        let data = fs::read_to_string(&path)?;
        let ledger = serde_json::from_str(&data)?;
        tracing::debug!(path = %path.display(), "snapshot read");
        Ok(Some(ledger))
    }

    fn save_ledger(&self, ledger: &Ledger) -> Result<(), CoreError> {
        let data = serde_json::to_string(ledger)?;
        replace_file(&self.snapshot_path(), data.as_bytes())
    }

    fn clear_ledger(&self) -> Result<(), CoreError> {
        let path = self.snapshot_path();
        if path.exists() {
            fs::remove_file(&path)?;
            tracing::debug!(path = %path.display(), "snapshot removed");
        }
        Ok(())
    }
}

/// Writes `data` next to `path` and renames it into place, so readers see
/// either the previous file or the complete new one.
pub(crate) fn replace_file(path: &Path, data: &[u8]) -> Result<(), CoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    let tmp = tmp_path(path);
    let written = write_file(&tmp, data).and_then(|()| fs::rename(&tmp, path));
    if let Err(err) = written {
        let _ = fs::remove_file(&tmp);
        return Err(err.into());
    }
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    let mut tmp = path.to_path_buf();
    let ext = match path.extension().and_then(|ext| ext.to_str()) {
        Some(existing) => format!("{existing}.{TMP_SUFFIX}"),
        None => TMP_SUFFIX.to_string(),
    };
    tmp.set_extension(ext);
    tmp
}

fn write_file(path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut file = File::create(path)?;
    file.write_all(data)?;
    file.sync_all()
}
