//! Durable session storage. The file layout keeps the three keys the web front ends
//! kept in local storage so a session file can be inspected by hand.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ClientResult;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoredSession {
    #[serde(rename = "auth_token", default)]
    pub token: Option<String>,
    #[serde(rename = "logged_username", default)]
    pub username: Option<String>,
    #[serde(rename = "logged_roles", default)]
    pub roles: Vec<String>,
}

impl StoredSession {
    pub fn is_empty(&self) -> bool { self.token.is_none() }
}

pub trait SessionStore: Send + Sync {
    fn load(&self) -> ClientResult<StoredSession>;
    fn save(&self, session: &StoredSession) -> ClientResult<()>;
    fn clear(&self) -> ClientResult<()>;
}

/// JSON file on disk, replaced atomically on every save.
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self { Self { path: path.into() } }

    pub fn path(&self) -> &Path { &self.path }

    fn tmp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<StoredSession> {
        if !self.path.exists() {
            return Ok(StoredSession::default());
        }
        let text = std::fs::read_to_string(&self.path)?;
        if text.trim().is_empty() {
            return Ok(StoredSession::default());
        }
        Ok(serde_json::from_str(&text)?)
    }

    fn save(&self, session: &StoredSession) -> ClientResult<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                std::fs::create_dir_all(dir)?;
            }
        }
        let tmp = self.tmp_path();
        let bytes = serde_json::to_vec_pretty(session)?;
        // a leftover tmp keeps its old mode on open
        let _ = std::fs::remove_file(&tmp);
        let mut file = owner_only().open(&tmp)?;
        file.write_all(&bytes)?;
        file.sync_all()?;
        drop(file);
        std::fs::rename(&tmp, &self.path)?;
        debug!(target: "carro_admin::session", path = %self.path.display(), "session file written");
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

/// The file holds a bearer token: readable by its owner only.
fn owner_only() -> OpenOptions {
    let mut opts = OpenOptions::new();
    opts.write(true).create(true).truncate(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(0o600);
    }
    opts
}

/// Process-local store for tests and embedding.
#[derive(Default)]
pub struct MemorySessionStore {
    inner: Mutex<StoredSession>,
}

impl MemorySessionStore {
    pub fn new() -> Self { Self::default() }

    pub fn with(session: StoredSession) -> Self { Self { inner: Mutex::new(session) } }

    pub fn snapshot(&self) -> StoredSession { self.inner.lock().clone() }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<StoredSession> { Ok(self.inner.lock().clone()) }

    fn save(&self, session: &StoredSession) -> ClientResult<()> {
        *self.inner.lock() = session.clone();
        Ok(())
    }

    fn clear(&self) -> ClientResult<()> {
        *self.inner.lock() = StoredSession::default();
        Ok(())
    }
}
