use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use super::role::Role;
use crate::error::AuthResult;

/// Backing profile provisioned for every registered account, keyed by the
/// provider uid. Owned by an external collaborator store; the session core
/// writes it once on register and consults it to resolve roles on login.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileRecord {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub plan_id: Option<String>,
}

#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, uid: &str, profile: ProfileRecord) -> AuthResult<()>;

    /// Privileged role/profile lookup. `None` when no profile was ever
    /// provisioned for the uid (the role then defaults to `user`).
    async fn fetch_profile(&self, uid: &str) -> AuthResult<Option<ProfileRecord>>;
}

/// In-memory collaborator used by tests and offline shells.
#[derive(Debug, Default)]
pub struct MemoryProfileStore {
    profiles: RwLock<HashMap<String, ProfileRecord>>,
}

impl MemoryProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, uid: &str) -> Option<ProfileRecord> {
        self.profiles.read().get(uid).cloned()
    }

    pub fn insert(&self, uid: &str, profile: ProfileRecord) {
        self.profiles.write().insert(uid.to_string(), profile);
    }
}

#[async_trait]
impl ProfileStore for MemoryProfileStore {
    async fn create_profile(&self, uid: &str, profile: ProfileRecord) -> AuthResult<()> {
        self.profiles.write().insert(uid.to_string(), profile);
        Ok(())
    }

    async fn fetch_profile(&self, uid: &str) -> AuthResult<Option<ProfileRecord>> {
        Ok(self.profiles.read().get(uid).cloned())
    }
}
