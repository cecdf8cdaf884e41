//! Session and route-authorization core for an application shell.
//!
//! The crate owns exactly two concerns: a process-wide [`identity::SessionStore`]
//! that tracks who is logged in (synchronized with an identity provider and a
//! persisted cache slot), and a route guard that maps (session, required roles,
//! path) to an access decision on every navigation. Pages, layout chrome and
//! data-entry forms are external collaborators that call into this surface.

pub mod error;
pub mod identity;

pub use error::{AuthError, AuthResult};
