use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use tracing::{info, warn};

use super::cache::SessionCache;
use super::notice::{Notice, NoticeSink};
use super::profile::{ProfileRecord, ProfileStore};
use super::provider::IdentityProvider;
use super::role::Role;
use super::user::UserRecord;
use crate::error::{AuthError, AuthResult};

/// Who, if anyone, the process is authenticated as. Exactly one value exists
/// per store and only the store writes it; everything else reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// Cache not yet consulted. Transient: lasts from construction until
    /// [`SessionStore::bootstrap`] runs.
    Uninitialized,
    Unauthenticated,
    Authenticated(UserRecord),
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Session::Authenticated(_))
    }

    pub fn user(&self) -> Option<&UserRecord> {
        match self {
            Session::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Process-wide session state: synchronizes with the identity provider and the
/// persisted cache slot, and is the single source of truth consumed by the
/// route guard and the view layer. Constructed explicitly and passed by
/// handle, never ambient.
pub struct SessionStore {
    provider: Arc<dyn IdentityProvider>,
    cache: SessionCache,
    profiles: Arc<dyn ProfileStore>,
    notices: Arc<dyn NoticeSink>,
    session: RwLock<Session>,
    in_flight: AtomicBool,
}

/// Clears the in-flight token when the owning operation returns.
struct OpGuard<'a>(&'a AtomicBool);

impl Drop for OpGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl SessionStore {
    pub fn new(
        provider: Arc<dyn IdentityProvider>,
        cache: SessionCache,
        profiles: Arc<dyn ProfileStore>,
        notices: Arc<dyn NoticeSink>,
    ) -> Self {
        Self {
            provider,
            cache,
            profiles,
            notices,
            session: RwLock::new(Session::Uninitialized),
            in_flight: AtomicBool::new(false),
        }
    }

    /// Consult the cache slot once, synchronously, to resolve the initial
    /// session. A stored record is trusted without provider re-validation;
    /// the cached role may lag a server-side change until the next login.
    /// Idempotent: later calls are no-ops.
    pub fn bootstrap(&self) {
        let mut session = self.session.write();
        if !matches!(*session, Session::Uninitialized) {
            return;
        }
        *session = match self.cache.load() {
            Some(user) => {
                info!(target: "anteroom::auth", uid = %user.id, role = %user.role, "session restored from cache");
                Session::Authenticated(user)
            }
            None => Session::Unauthenticated,
        };
    }

    pub fn session(&self) -> Session {
        self.session.read().clone()
    }

    pub fn current_user(&self) -> Option<UserRecord> {
        self.session.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.read().is_authenticated()
    }

    /// True while a login/register/reset is outstanding. Callers use this to
    /// suppress duplicate submissions.
    pub fn is_loading(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Single-flight token: at most one authentication operation per store at
    /// a time. A losing caller fails fast instead of racing the winner.
    fn begin_op(&self) -> AuthResult<OpGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .map_err(|_| AuthError::OperationInFlight)?;
        Ok(OpGuard(&self.in_flight))
    }

    /// The cache write is best-effort: a failing disk must not undo an
    /// authentication the provider already accepted. The slot simply will not
    /// survive the next boot.
    fn persist(&self, user: &UserRecord) {
        if let Err(e) = self.cache.store(user) {
            warn!(target: "anteroom::auth", error = %e, "session cache write failed");
        }
    }

    /// Verify credentials with the provider and establish a session. The role
    /// comes from the account's backing profile when one exists, otherwise it
    /// defaults to `user`. On failure the session is left unchanged.
    pub async fn login(&self, email: &str, password: &str) -> AuthResult<UserRecord> {
        let _op = self.begin_op()?;
        match self.provider.sign_in(email, password).await {
            Ok(identity) => {
                let role = match self.profiles.fetch_profile(&identity.uid).await {
                    Ok(Some(profile)) => profile.role,
                    Ok(None) => Role::User,
                    Err(e) => {
                        warn!(target: "anteroom::auth", error = %e, "profile lookup failed, defaulting role");
                        Role::User
                    }
                };
                let user = UserRecord {
                    id: identity.uid,
                    name: identity.display_name.unwrap_or_else(|| "User".to_string()),
                    email: identity.email.unwrap_or_default(),
                    role,
                    avatar: None,
                };
                *self.session.write() = Session::Authenticated(user.clone());
                self.persist(&user);
                info!(target: "anteroom::auth", uid = %user.id, role = %user.role, "login ok");
                self.notices.notify(Notice::info(
                    "Login successful",
                    format!("Welcome back, {}!", user.name),
                ));
                Ok(user)
            }
            Err(e) => {
                warn!(target: "anteroom::auth", kind = e.kind_str(), "login failed");
                self.notices.notify(Notice::error("Login failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// Create a provider account, set its display name, establish the session
    /// and provision the backing profile with the supplied role. A provider
    /// failure leaves the session unchanged.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> AuthResult<UserRecord> {
        let _op = self.begin_op()?;
        let result: AuthResult<UserRecord> = async {
            let identity = self.provider.create_account(email, password).await?;
            self.provider.update_display_name(&identity.uid, name).await?;
            let user = UserRecord {
                id: identity.uid,
                name: name.to_string(),
                email: email.to_string(),
                role,
                avatar: None,
            };
            *self.session.write() = Session::Authenticated(user.clone());
            self.persist(&user);
            self.profiles
                .create_profile(
                    &user.id,
                    ProfileRecord {
                        name: name.to_string(),
                        email: email.to_string(),
                        role,
                        plan_id: None,
                    },
                )
                .await?;
            Ok(user)
        }
        .await;

        match result {
            Ok(user) => {
                info!(target: "anteroom::auth", uid = %user.id, role = %user.role, "registration ok");
                self.notices.notify(Notice::info(
                    "Registration successful",
                    "Your account has been created.",
                ));
                Ok(user)
            }
            Err(e) => {
                warn!(target: "anteroom::auth", kind = e.kind_str(), "registration failed");
                self.notices
                    .notify(Notice::error("Registration failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// Ask the provider to dispatch a reset message. Never changes session
    /// state, whatever the outcome.
    pub async fn reset_password(&self, email: &str) -> AuthResult<()> {
        let _op = self.begin_op()?;
        match self.provider.send_password_reset(email).await {
            Ok(()) => {
                info!(target: "anteroom::auth", "password reset dispatched");
                self.notices.notify(Notice::info(
                    "Password reset email sent",
                    "Check your inbox for instructions to reset your password.",
                ));
                Ok(())
            }
            Err(e) => {
                warn!(target: "anteroom::auth", kind = e.kind_str(), "password reset failed");
                self.notices
                    .notify(Notice::error("Password reset failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// End the remote session, then clear local state unconditionally: once a
    /// user has asked to leave, a provider failure must not keep them looking
    /// authenticated. The error is still reported. Idempotent when already
    /// unauthenticated.
    pub async fn logout(&self) -> AuthResult<()> {
        let remote = self.provider.sign_out().await;
        *self.session.write() = Session::Unauthenticated;
        if let Err(e) = self.cache.clear() {
            warn!(target: "anteroom::auth", error = %e, "session cache clear failed");
        }
        match remote {
            Ok(()) => {
                info!(target: "anteroom::auth", "logout ok");
                self.notices.notify(Notice::info(
                    "Logged out",
                    "You have been successfully logged out.",
                ));
                Ok(())
            }
            Err(e) => {
                warn!(target: "anteroom::auth", kind = e.kind_str(), "remote sign-out failed, local session cleared");
                self.notices.notify(Notice::error("Logout failed", e.to_string()));
                Err(e)
            }
        }
    }

    /// Collaborator hook for server-side account deletion or forced
    /// invalidation: drop local state without a provider round-trip.
    pub fn invalidate(&self) {
        *self.session.write() = Session::Unauthenticated;
        if let Err(e) = self.cache.clear() {
            warn!(target: "anteroom::auth", error = %e, "session cache clear failed");
        }
    }

    /// Collaborator hook for refreshed role/profile fields. Applies only when
    /// the update targets the currently authenticated account; the session tag
    /// never changes here.
    pub fn refresh_profile(&self, user: UserRecord) {
        let mut session = self.session.write();
        let same_account =
            matches!(&*session, Session::Authenticated(current) if current.id == user.id);
        if same_account {
            *session = Session::Authenticated(user.clone());
            drop(session);
            self.persist(&user);
        }
    }
}
