use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;
use tracing::{debug, trace};

use crate::application::{LedgerError, Result};
use crate::domain::Ledger;

use super::StoreLock;

/// JSON file holding the whole ledger as one array of expenses.
///
/// The file is always read and written in full. Writes go to a temporary file in the
/// same directory which is then renamed over the target, so readers see either the old
/// or the new content and never a partial write.
#[derive(Debug, Clone)]
pub struct Store {
    path: PathBuf,
    locking: bool,
}

impl Store {
    /// Create a store backed by the file at `path`. Nothing is touched on disk until
    /// the first `load` or `save`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            locking: true,
        }
    }

    /// Disable the advisory lock file taken by `lock`.
    pub fn without_locking(mut self) -> Self {
        self.locking = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Path of the advisory lock file, `<store>.lock`.
    pub fn lock_path(&self) -> PathBuf {
        let mut name = self.path.as_os_str().to_owned();
        name.push(".lock");
        PathBuf::from(name)
    }

    /// Load the whole ledger.
    /// A missing file is initialized to an empty ledger.
    pub fn load(&self) -> Result<Ledger> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No expense store at {}, creating it", self.path.display());
                let ledger = Ledger::new();
                self.save(&ledger)?;
                return Ok(ledger);
            }
            Err(source) => {
                return Err(LedgerError::StoreRead {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let ledger: Ledger =
            serde_json::from_str(&content).map_err(|e| self.corrupt(e.to_string()))?;
        ledger
            .check_integrity()
            .map_err(|e| self.corrupt(e.to_string()))?;

        debug!(
            "Loaded {} expense(s) from {}",
            ledger.len(),
            self.path.display()
        );
        Ok(ledger)
    }

    /// Replace the stored ledger with `ledger`.
    pub fn save(&self, ledger: &Ledger) -> Result<()> {
        let dir = self.parent_dir();
        fs::create_dir_all(dir).map_err(|e| self.write_error(e))?;

        let mut data = serde_json::to_vec_pretty(ledger).map_err(|e| self.write_error(e.into()))?;
        data.push(b'\n');

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        trace!("Writing expense store via {}", temp.path().display());
        temp.write_all(&data).map_err(|e| self.write_error(e))?;
        temp.as_file()
            .sync_all()
            .map_err(|e| self.write_error(e))?;
        temp.persist(&self.path)
            .map_err(|e| self.write_error(e.error))?;

        debug!(
            "Saved {} expense(s) to {}",
            ledger.len(),
            self.path.display()
        );
        Ok(())
    }

    /// Take the advisory lock guarding a load-modify-save sequence.
    /// Returns `None` when locking is disabled.
    pub fn lock(&self) -> Result<Option<StoreLock>> {
        if !self.locking {
            return Ok(None);
        }
        fs::create_dir_all(self.parent_dir()).map_err(|e| self.write_error(e))?;
        StoreLock::acquire(self.lock_path()).map(Some)
    }

    fn parent_dir(&self) -> &Path {
        match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        }
    }

    fn corrupt(&self, reason: String) -> LedgerError {
        LedgerError::CorruptStore {
            path: self.path.clone(),
            reason,
        }
    }

    fn write_error(&self, source: std::io::Error) -> LedgerError {
        LedgerError::StoreWrite {
            path: self.path.clone(),
            source,
        }
    }
}
