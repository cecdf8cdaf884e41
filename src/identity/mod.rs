//! Central identity and session management for the application shell.
//! Keep the public surface thin and split implementation across sub-modules.

mod cache;
mod guard;
mod notice;
mod profile;
mod provider;
mod role;
mod routes;
mod session;
mod user;

pub use cache::SessionCache;
pub use guard::{evaluate, Access, RouteGuard};
pub use notice::{MemoryNotices, Notice, NoticeSeverity, NoticeSink, TracingNotices};
pub use profile::{MemoryProfileStore, ProfileRecord, ProfileStore};
pub use provider::{DirectoryProvider, IdentityProvider, ProviderIdentity};
pub use role::Role;
pub use routes::{RouteRule, RouteTable};
pub use session::{Session, SessionStore};
pub use user::UserRecord;
