//! `ordermill-auth` — roles, permissions, principals.
//!
//! Authentication (credential storage, token issuance) is an external
//! collaborator; this crate models the *authenticated* actor and the
//! authorization checks applied at service boundaries.

pub mod authorize;
pub mod principal;
pub mod profile;
pub mod role;

pub use authorize::authorize;
pub use principal::Principal;
pub use profile::Profile;
pub use role::{Permission, Role};
