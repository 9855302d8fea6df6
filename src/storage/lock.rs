use std::fs::{self, OpenOptions};
use std::io::{ErrorKind, Write};
use std::path::PathBuf;

use tracing::{debug, trace};

use crate::application::{LedgerError, Result};

/// Advisory lock held for the duration of a load-modify-save sequence.
///
/// The lock is a file created with `create_new`, so only one process can hold it.
/// It is removed when the guard is dropped. A process that dies while holding the
/// lock leaves the file behind; it has to be removed by hand.
#[derive(Debug)]
pub struct StoreLock {
    path: PathBuf,
}

impl StoreLock {
    pub(crate) fn acquire(path: PathBuf) -> Result<Self> {
        let mut file = match OpenOptions::new().write(true).create_new(true).open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(LedgerError::StoreLocked { path });
            }
            Err(source) => return Err(LedgerError::StoreWrite { path, source }),
        };

        // The pid is informational only, for whoever finds a stale lock.
        if let Err(e) = writeln!(file, "{}", std::process::id()) {
            trace!("Could not write pid to {}: {}", path.display(), e);
        }
        trace!("Acquired store lock {}", path.display());
        Ok(Self { path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => trace!("Released store lock {}", self.path.display()),
            Err(e) => debug!("Unable to remove lock {}: {}", self.path.display(), e),
        }
    }
}
