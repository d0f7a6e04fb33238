//! `ordermill-tenancy` — tenant records and per-unit-of-work context.
//!
//! The tenant is the root of data partitioning. Everything a request or
//! background job touches is reached through a [`TenantContext`] resolved at
//! the start of the unit of work.

pub mod context;
pub mod resolve;
pub mod tenant;

pub use context::TenantContext;
pub use resolve::{TenantDirectory, resolve, subdomain_of};
pub use tenant::Tenant;
