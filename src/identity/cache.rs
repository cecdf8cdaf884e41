use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::user::UserRecord;
use crate::error::{AuthError, AuthResult};

/// Fixed slot name under the cache root.
const SLOT_FILE: &str = "auth_user.json";

#[derive(Debug, Serialize, Deserialize)]
struct CachedSession {
    user: UserRecord,
    cached_at: DateTime<Utc>,
}

/// Single persisted slot holding the last authenticated user record. Not
/// authoritative: it is read once at boot to pre-populate the session and may
/// be stale relative to the provider (a role changed server-side after the
/// last login still reads back with the old role).
#[derive(Debug, Clone)]
pub struct SessionCache {
    root: PathBuf,
}

impl SessionCache {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    fn slot_path(&self) -> PathBuf {
        self.root.join(SLOT_FILE)
    }

    /// Read the slot. Absence means unauthenticated; an unreadable or corrupt
    /// slot is treated the same and removed so the next boot starts clean.
    pub fn load(&self) -> Option<UserRecord> {
        let path = self.slot_path();
        let bytes = match fs::read(&path) {
            Ok(b) => b,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
            Err(e) => {
                warn!(target: "anteroom::cache", error = %e, "slot unreadable, ignoring");
                return None;
            }
        };
        match serde_json::from_slice::<CachedSession>(&bytes) {
            Ok(cached) => {
                debug!(target: "anteroom::cache", uid = %cached.user.id, "slot loaded");
                Some(cached.user)
            }
            Err(e) => {
                warn!(target: "anteroom::cache", error = %e, "slot corrupt, clearing");
                let _ = fs::remove_file(&path);
                None
            }
        }
    }

    pub fn store(&self, user: &UserRecord) -> AuthResult<()> {
        fs::create_dir_all(&self.root)
            .map_err(|e| AuthError::unknown(format!("session cache mkdir failed: {e}")))?;
        let cached = CachedSession {
            user: user.clone(),
            cached_at: Utc::now(),
        };
        let bytes = serde_json::to_vec_pretty(&cached)
            .map_err(|e| AuthError::unknown(format!("session cache encode failed: {e}")))?;
        fs::write(self.slot_path(), bytes)
            .map_err(|e| AuthError::unknown(format!("session cache write failed: {e}")))?;
        debug!(target: "anteroom::cache", uid = %user.id, "slot written");
        Ok(())
    }

    /// Remove the slot. Clearing an already-empty slot is not an error.
    pub fn clear(&self) -> AuthResult<()> {
        match fs::remove_file(self.slot_path()) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(AuthError::unknown(format!(
                "session cache clear failed: {e}"
            ))),
        }
    }
}
