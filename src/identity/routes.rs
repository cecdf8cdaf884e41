use std::collections::{HashMap, HashSet};

use super::role::Role;

/// Access requirement a route declares for itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteRule {
    /// Renders without a session (login, register, unauthorized, ...).
    Public,
    /// Requires an authenticated session; an empty role set admits any role.
    Protected { allowed_roles: HashSet<Role> },
}

impl RouteRule {
    fn any_role() -> Self {
        RouteRule::Protected {
            allowed_roles: HashSet::new(),
        }
    }
}

/// Path → rule registry the shell's router consults on navigation. Exact-path
/// matching; a path nobody declared falls back to "protected, any role" so a
/// forgotten declaration can never accidentally publish a view.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    rules: HashMap<String, RouteRule>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn public(mut self, path: &str) -> Self {
        self.rules.insert(path.to_string(), RouteRule::Public);
        self
    }

    /// Protected route open to any authenticated role.
    pub fn protected(mut self, path: &str) -> Self {
        self.rules.insert(path.to_string(), RouteRule::any_role());
        self
    }

    /// Protected route restricted to the listed roles.
    pub fn restricted<I: IntoIterator<Item = Role>>(mut self, path: &str, roles: I) -> Self {
        self.rules.insert(
            path.to_string(),
            RouteRule::Protected {
                allowed_roles: roles.into_iter().collect(),
            },
        );
        self
    }

    pub fn lookup(&self, path: &str) -> RouteRule {
        self.rules.get(path).cloned().unwrap_or_else(RouteRule::any_role)
    }

    /// The application shell's route map: auth pages are public, member pages
    /// take any authenticated role, admin pages take admin, and reports admit
    /// partners as well.
    pub fn app_shell() -> Self {
        Self::new()
            .public("/login")
            .public("/register")
            .public("/forgot-password")
            .public("/unauthorized")
            .protected("/")
            .protected("/plans")
            .protected("/profile")
            .protected("/notifications")
            .protected("/settings")
            .protected("/terms-privacy")
            .protected("/contact-support")
            .protected("/mobile-menu")
            .restricted("/admin/dashboard", [Role::Admin])
            .restricted("/admin/manage-users", [Role::Admin])
            .restricted("/admin/manage-plans", [Role::Admin])
            .restricted("/admin/manage-highlights", [Role::Admin])
            .restricted("/admin/manage-notifications", [Role::Admin])
            .restricted("/admin/activity-logs", [Role::Admin])
            .restricted("/admin/reports", [Role::Admin, Role::Partner])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn app_shell_declarations() {
        let table = RouteTable::app_shell();
        assert_eq!(table.lookup("/login"), RouteRule::Public);
        assert_eq!(table.lookup("/unauthorized"), RouteRule::Public);
        assert_eq!(table.lookup("/plans"), RouteRule::any_role());

        match table.lookup("/admin/dashboard") {
            RouteRule::Protected { allowed_roles } => {
                assert_eq!(allowed_roles, HashSet::from([Role::Admin]));
            }
            rule => panic!("unexpected rule: {rule:?}"),
        }
        match table.lookup("/admin/reports") {
            RouteRule::Protected { allowed_roles } => {
                assert_eq!(allowed_roles, HashSet::from([Role::Admin, Role::Partner]));
            }
            rule => panic!("unexpected rule: {rule:?}"),
        }
    }

    #[test]
    fn undeclared_paths_stay_protected() {
        let table = RouteTable::app_shell();
        assert_eq!(table.lookup("/not-declared"), RouteRule::any_role());
        assert_eq!(RouteTable::new().lookup("/anything"), RouteRule::any_role());
    }
}
