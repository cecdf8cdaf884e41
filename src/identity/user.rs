use serde::{Deserialize, Serialize};

use super::role::Role;

/// Fully-populated account record carried by an authenticated session. Never
/// partially constructed: either every field is resolved or there is no record
/// and the session is unauthenticated. This exact JSON shape is also the
/// persisted cache slot layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserRecord {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}
