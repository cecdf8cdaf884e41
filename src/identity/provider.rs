use std::collections::HashMap;

use argon2::{Argon2, PasswordHasher, PasswordVerifier};
use async_trait::async_trait;
use parking_lot::RwLock;
use password_hash::{PasswordHash, SaltString};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AuthError, AuthResult};

/// What the identity provider knows about an account. Display name and email
/// are optional on the wire; the session store applies fallbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderIdentity {
    pub uid: String,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

/// Adapter contract for the external identity provider. Asynchronous and
/// network-bound in real deployments; the authoritative source of truth for
/// whether credentials are valid.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<ProviderIdentity>;

    async fn create_account(&self, email: &str, password: &str) -> AuthResult<ProviderIdentity>;

    async fn update_display_name(&self, uid: &str, name: &str) -> AuthResult<()>;

    async fn send_password_reset(&self, email: &str) -> AuthResult<()>;

    async fn sign_out(&self) -> AuthResult<()>;
}

#[derive(Debug, Clone)]
struct DirectoryAccount {
    uid: String,
    email: String,
    display_name: Option<String>,
    password_hash: String,
}

/// In-process provider backed by an argon2-hashed account map, keyed by
/// lowercased email. Usable both as an offline provider and as the test
/// double for the network-bound adapters.
#[derive(Default)]
pub struct DirectoryProvider {
    accounts: RwLock<HashMap<String, DirectoryAccount>>,
}

fn hash_password(password: &str) -> AuthResult<String> {
    let mut salt_bytes = [0u8; 16];
    getrandom::getrandom(&mut salt_bytes).map_err(|e| AuthError::unknown(e.to_string()))?;
    let salt =
        SaltString::encode_b64(&salt_bytes).map_err(|e| AuthError::unknown(e.to_string()))?;
    let argon2 = Argon2::default();
    let phc = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AuthError::unknown(e.to_string()))?
        .to_string();
    Ok(phc)
}

fn verify_password(hash: &str, password: &str) -> bool {
    if let Ok(parsed) = PasswordHash::new(hash) {
        Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok()
    } else {
        false
    }
}

impl DirectoryProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert an account directly, bypassing the async contract. Returns the
    /// identity so callers can seed collaborator stores keyed by uid.
    pub fn seed_account(
        &self,
        email: &str,
        password: &str,
        display_name: Option<&str>,
    ) -> AuthResult<ProviderIdentity> {
        let key = email.to_ascii_lowercase();
        let mut accounts = self.accounts.write();
        if accounts.contains_key(&key) {
            return Err(AuthError::account_exists(email));
        }
        let account = DirectoryAccount {
            uid: Uuid::new_v4().to_string(),
            email: email.to_string(),
            display_name: display_name.map(str::to_string),
            password_hash: hash_password(password)?,
        };
        let identity = ProviderIdentity {
            uid: account.uid.clone(),
            display_name: account.display_name.clone(),
            email: Some(account.email.clone()),
        };
        accounts.insert(key, account);
        Ok(identity)
    }

    /// Builder-style seeding for test and demo setups.
    pub fn with_account(self, email: &str, password: &str, display_name: &str) -> Self {
        // Seeding a duplicate email in setup code is a programming error.
        self.seed_account(email, password, Some(display_name))
            .unwrap_or_else(|e| panic!("seed_account({email}): {e}"));
        self
    }
}

#[async_trait]
impl IdentityProvider for DirectoryProvider {
    async fn sign_in(&self, email: &str, password: &str) -> AuthResult<ProviderIdentity> {
        let key = email.to_ascii_lowercase();
        let accounts = self.accounts.read();
        let Some(account) = accounts.get(&key) else {
            return Err(AuthError::InvalidCredentials);
        };
        if !verify_password(&account.password_hash, password) {
            return Err(AuthError::InvalidCredentials);
        }
        debug!(target: "anteroom::provider", uid = %account.uid, "sign_in ok");
        Ok(ProviderIdentity {
            uid: account.uid.clone(),
            display_name: account.display_name.clone(),
            email: Some(account.email.clone()),
        })
    }

    async fn create_account(&self, email: &str, password: &str) -> AuthResult<ProviderIdentity> {
        let identity = self.seed_account(email, password, None)?;
        debug!(target: "anteroom::provider", uid = %identity.uid, "account created");
        Ok(identity)
    }

    async fn update_display_name(&self, uid: &str, name: &str) -> AuthResult<()> {
        let mut accounts = self.accounts.write();
        let Some(account) = accounts.values_mut().find(|a| a.uid == uid) else {
            return Err(AuthError::unknown(format!("no account for uid {uid}")));
        };
        account.display_name = Some(name.to_string());
        Ok(())
    }

    async fn send_password_reset(&self, email: &str) -> AuthResult<()> {
        let key = email.to_ascii_lowercase();
        if !self.accounts.read().contains_key(&key) {
            return Err(AuthError::InvalidCredentials);
        }
        // A real adapter dispatches mail here; the directory only validates the
        // address so callers exercise both outcome paths.
        debug!(target: "anteroom::provider", %email, "password reset dispatched");
        Ok(())
    }

    async fn sign_out(&self) -> AuthResult<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sign_in_verifies_password_and_is_case_insensitive_on_email() {
        let dir = DirectoryProvider::new().with_account("admin@example.com", "password", "Admin User");
        let id = dir.sign_in("Admin@Example.COM", "password").await.unwrap();
        assert_eq!(id.display_name.as_deref(), Some("Admin User"));
        assert_eq!(id.email.as_deref(), Some("admin@example.com"));

        let err = dir.sign_in("admin@example.com", "wrong").await.unwrap_err();
        assert!(err.is_invalid_credentials());
        // Unknown account is indistinguishable from a wrong password.
        let err = dir.sign_in("nobody@example.com", "password").await.unwrap_err();
        assert!(err.is_invalid_credentials());
    }

    #[tokio::test]
    async fn create_account_rejects_duplicate_email() {
        let dir = DirectoryProvider::new();
        let id = dir.create_account("user@example.com", "pw").await.unwrap();
        assert!(id.display_name.is_none());

        let err = dir.create_account("USER@example.com", "pw2").await.unwrap_err();
        assert_eq!(err, AuthError::account_exists("USER@example.com"));
    }

    #[tokio::test]
    async fn display_name_update_lands_on_next_sign_in() {
        let dir = DirectoryProvider::new();
        let id = dir.create_account("p@example.com", "pw").await.unwrap();
        dir.update_display_name(&id.uid, "Partner User").await.unwrap();
        let back = dir.sign_in("p@example.com", "pw").await.unwrap();
        assert_eq!(back.display_name.as_deref(), Some("Partner User"));
    }

    #[tokio::test]
    async fn password_reset_requires_known_email() {
        let dir = DirectoryProvider::new().with_account("u@example.com", "pw", "Regular User");
        dir.send_password_reset("u@example.com").await.unwrap();
        assert!(dir.send_password_reset("ghost@example.com").await.is_err());
    }
}
