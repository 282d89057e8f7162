//! session::file
//!
//! Best-effort persistence of the session store across CLI invocations.
//!
//! # Storage
//!
//! - `<data_dir>/veridoc/session.json` - the serialized session store
//! - `<data_dir>/veridoc/session.lock` - OS-level exclusive lock held while
//!   rewriting, so concurrent `vd` processes do not interleave writes
//!
//! # Design
//!
//! Loading never fails: a missing, unreadable, or corrupt file yields an
//! empty (logged-out) session. Saving is also best-effort; persistence
//! failures must not block the workflow that triggered them. Removal, by
//! contrast, is the teeth of the 401 rule and reports its errors.

use std::fs::{self, File, OpenOptions};
use std::path::PathBuf;
use std::time::{Duration, Instant};

use fs2::FileExt;
use thiserror::Error;

use super::store::SessionStore;

/// Maximum time to wait for the session file lock.
const LOCK_TIMEOUT: Duration = Duration::from_secs(5);

/// Polling interval when waiting for the lock.
const LOCK_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Errors from session persistence.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("could not determine a user data directory")]
    NoDataDir,

    #[error("timed out waiting for the session file lock")]
    LockTimeout,

    #[error("session file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Handle to the on-disk session file.
#[derive(Debug, Clone)]
pub struct SessionFile {
    path: PathBuf,
    lock_path: PathBuf,
}

impl SessionFile {
    /// The session file in the default per-user data directory.
    pub fn default_location() -> Result<Self, SessionError> {
        let dir = dirs::data_dir()
            .ok_or(SessionError::NoDataDir)?
            .join("veridoc");
        Ok(Self::at(dir))
    }

    /// A session file rooted at an explicit directory (used by tests).
    pub fn at(dir: PathBuf) -> Self {
        Self {
            path: dir.join("session.json"),
            lock_path: dir.join("session.lock"),
        }
    }

    /// Path of the serialized store.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Load the session store.
    ///
    /// Returns an empty store on any error. This is intentional: a broken
    /// session file means "logged out", never a hard failure.
    pub fn load(&self) -> SessionStore {
        fs::read_to_string(&self.path)
            .ok()
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save the session store under the exclusive lock.
    ///
    /// Errors are returned but callers treat them as best-effort; a failed
    /// save leaves the previous file in place.
    pub fn save(&self, store: &SessionStore) -> Result<(), SessionError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let _guard = self.acquire_lock()?;
        let content =
            serde_json::to_string_pretty(store).map_err(|e| SessionError::Io(e.into()))?;
        fs::write(&self.path, content)?;
        Ok(())
    }

    /// Remove the session file (logout or authentication failure).
    ///
    /// A missing file is not an error; the end state is the same.
    pub fn remove(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Acquire the exclusive lock with blocking and timeout.
    fn acquire_lock(&self) -> Result<LockGuard, SessionError> {
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&self.lock_path)?;

        let deadline = Instant::now() + LOCK_TIMEOUT;
        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(LockGuard { file }),
                Err(_) if Instant::now() < deadline => {
                    std::thread::sleep(LOCK_POLL_INTERVAL);
                }
                Err(_) => return Err(SessionError::LockTimeout),
            }
        }
    }
}

/// RAII guard; the OS lock is released on drop.
struct LockGuard {
    file: File,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        let _ = fs2::FileExt::unlock(&self.file);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn load_missing_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::at(dir.path().to_path_buf());
        let store = file.load();
        assert!(!store.is_logged_in());
    }

    #[test]
    fn load_corrupt_file_is_empty_session() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::at(dir.path().to_path_buf());
        fs::create_dir_all(dir.path()).unwrap();
        fs::write(file.path(), "{ not json").unwrap();
        assert!(!file.load().is_logged_in());
    }

    #[test]
    fn save_and_load_roundtrip() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::at(dir.path().to_path_buf());

        let mut store = SessionStore::new();
        store.begin(Some("tok".into()), true);
        file.save(&store).unwrap();

        let loaded = file.load();
        assert_eq!(loaded.token(), Some("tok"));
        assert!(loaded.is_admin());
    }

    #[test]
    fn remove_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let file = SessionFile::at(dir.path().to_path_buf());

        // Nothing saved yet
        file.remove().unwrap();

        file.save(&SessionStore::new()).unwrap();
        file.remove().unwrap();
        file.remove().unwrap();
        assert!(!file.path().exists());
    }
}
