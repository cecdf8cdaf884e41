use std::collections::HashSet;
use std::sync::Arc;

use tracing::debug;

use super::role::Role;
use super::routes::{RouteRule, RouteTable};
use super::session::{Session, SessionStore};

/// Per-navigation access decision. The router collaborator performs the
/// actual redirect or render; this type only decides.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allow,
    /// Boot has not resolved yet: block rendering instead of flashing a
    /// redirect that the cache read may immediately contradict.
    ShowLoading,
    /// Carries the requested path so navigation can resume there after login.
    RedirectToLogin { return_path: String },
    RedirectToUnauthorized,
}

/// Pure decision function over the live session, a route's permitted roles and
/// the requested path. `None` and an empty set both mean "any authenticated
/// role suffices". Role membership is the only discriminator; there is no
/// hierarchy between roles.
pub fn evaluate(session: &Session, allowed_roles: Option<&HashSet<Role>>, path: &str) -> Access {
    match session {
        Session::Uninitialized => Access::ShowLoading,
        Session::Unauthenticated => Access::RedirectToLogin {
            return_path: path.to_string(),
        },
        Session::Authenticated(user) => match allowed_roles {
            Some(roles) if !roles.is_empty() && !roles.contains(&user.role) => {
                Access::RedirectToUnauthorized
            }
            _ => Access::Allow,
        },
    }
}

/// Guard handle bound to a session store and a route table, invoked by the
/// router on every navigation attempt.
pub struct RouteGuard {
    store: Arc<SessionStore>,
    table: RouteTable,
}

impl RouteGuard {
    pub fn new(store: Arc<SessionStore>) -> Self {
        Self::with_table(store, RouteTable::app_shell())
    }

    pub fn with_table(store: Arc<SessionStore>, table: RouteTable) -> Self {
        Self { store, table }
    }

    /// Decide access for a path using the route table's declared roles.
    /// Public routes render for anyone, session state notwithstanding.
    pub fn check(&self, path: &str) -> Access {
        let decision = match self.table.lookup(path) {
            RouteRule::Public => Access::Allow,
            RouteRule::Protected { allowed_roles } => {
                evaluate(&self.store.session(), Some(&allowed_roles), path)
            }
        };
        debug!(target: "anteroom::guard", %path, ?decision, "navigation checked");
        decision
    }

    /// Decide access for a path with an explicit role requirement, bypassing
    /// the table. `None` means any authenticated role.
    pub fn check_with_roles(&self, path: &str, allowed_roles: Option<&HashSet<Role>>) -> Access {
        evaluate(&self.store.session(), allowed_roles, path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identity::UserRecord;

    fn authed(role: Role) -> Session {
        Session::Authenticated(UserRecord {
            id: "u-1".into(),
            name: "Test".into(),
            email: "t@example.com".into(),
            role,
            avatar: None,
        })
    }

    fn roles(list: &[Role]) -> HashSet<Role> {
        list.iter().copied().collect()
    }

    #[test]
    fn uninitialized_always_shows_loading() {
        for allowed in [None, Some(roles(&[Role::Admin])), Some(roles(&[]))] {
            assert_eq!(
                evaluate(&Session::Uninitialized, allowed.as_ref(), "/admin/dashboard"),
                Access::ShowLoading
            );
        }
    }

    #[test]
    fn unauthenticated_redirects_to_login_with_return_path() {
        let decision = evaluate(&Session::Unauthenticated, None, "/plans");
        assert_eq!(
            decision,
            Access::RedirectToLogin {
                return_path: "/plans".into()
            }
        );
    }

    #[test]
    fn role_outside_allowed_set_is_unauthorized() {
        let allowed = roles(&[Role::Admin]);
        for role in [Role::User, Role::Partner] {
            assert_eq!(
                evaluate(&authed(role), Some(&allowed), "/admin/manage-users"),
                Access::RedirectToUnauthorized
            );
        }
        assert_eq!(
            evaluate(&authed(Role::Admin), Some(&allowed), "/admin/manage-users"),
            Access::Allow
        );
    }

    #[test]
    fn no_required_roles_means_any_authenticated_role() {
        for role in Role::ALL {
            assert_eq!(evaluate(&authed(role), None, "/"), Access::Allow);
            assert_eq!(evaluate(&authed(role), Some(&roles(&[])), "/"), Access::Allow);
        }
    }

    #[test]
    fn roles_do_not_imply_each_other() {
        // A partner-only route keeps admin out unless admin is listed too.
        let partner_only = roles(&[Role::Partner]);
        assert_eq!(
            evaluate(&authed(Role::Admin), Some(&partner_only), "/partner"),
            Access::RedirectToUnauthorized
        );
        let both = roles(&[Role::Admin, Role::Partner]);
        assert_eq!(
            evaluate(&authed(Role::Admin), Some(&both), "/admin/reports"),
            Access::Allow
        );
        assert_eq!(
            evaluate(&authed(Role::Partner), Some(&both), "/admin/reports"),
            Access::Allow
        );
    }
}
