//! Unified error model for the authentication core.
//! Callers branch on the kind, never on provider-specific codes; every failure
//! here is recoverable by user retry.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Credentials were rejected by the identity provider. Unknown account and
    /// wrong password are deliberately indistinguishable.
    #[error("invalid credentials")]
    InvalidCredentials,

    /// Account creation hit an existing account for the same email.
    #[error("an account already exists for {email}")]
    AccountAlreadyExists { email: String },

    /// The identity provider could not be reached or answered out of band.
    #[error("identity provider unavailable: {reason}")]
    Unavailable { reason: String },

    /// Another login/register/reset is still outstanding on this store.
    #[error("another authentication operation is in flight")]
    OperationInFlight,

    #[error("{message}")]
    Unknown { message: String },
}

impl AuthError {
    pub fn account_exists<S: Into<String>>(email: S) -> Self {
        AuthError::AccountAlreadyExists { email: email.into() }
    }

    pub fn unavailable<S: Into<String>>(reason: S) -> Self {
        AuthError::Unavailable { reason: reason.into() }
    }

    pub fn unknown<S: Into<String>>(message: S) -> Self {
        AuthError::Unknown { message: message.into() }
    }

    /// Stable label for logs and notices.
    pub fn kind_str(&self) -> &'static str {
        match self {
            AuthError::InvalidCredentials => "invalid_credentials",
            AuthError::AccountAlreadyExists { .. } => "account_exists",
            AuthError::Unavailable { .. } => "unavailable",
            AuthError::OperationInFlight => "in_flight",
            AuthError::Unknown { .. } => "unknown",
        }
    }

    pub fn is_invalid_credentials(&self) -> bool {
        matches!(self, AuthError::InvalidCredentials)
    }

    /// Transient failures worth retrying as-is, without the user changing input.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AuthError::Unavailable { .. } | AuthError::OperationInFlight
        )
    }
}

pub type AuthResult<T> = Result<T, AuthError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_labels() {
        assert_eq!(AuthError::InvalidCredentials.kind_str(), "invalid_credentials");
        assert_eq!(AuthError::account_exists("a@b.c").kind_str(), "account_exists");
        assert_eq!(AuthError::unavailable("timeout").kind_str(), "unavailable");
        assert_eq!(AuthError::OperationInFlight.kind_str(), "in_flight");
        assert_eq!(AuthError::unknown("x").kind_str(), "unknown");
    }

    #[test]
    fn transient_classification() {
        assert!(AuthError::unavailable("dns").is_transient());
        assert!(AuthError::OperationInFlight.is_transient());
        assert!(!AuthError::InvalidCredentials.is_transient());
        assert!(!AuthError::account_exists("a@b.c").is_transient());
    }

    #[test]
    fn display_carries_detail() {
        let e = AuthError::account_exists("admin@example.com");
        assert_eq!(e.to_string(), "an account already exists for admin@example.com");
        assert_eq!(AuthError::unavailable("connection refused").to_string(),
            "identity provider unavailable: connection refused");
    }
}
