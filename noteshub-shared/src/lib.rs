//! # NotesHub Shared Library
//!
//! This crate contains shared types, utilities, and business logic used by
//! the NotesHub API server and its seed utility.
//!
//! ## Module Organization
//!
//! - `models`: Database models and data structures
//! - `auth`: Password hashing and JWT utilities
//! - `policy`: Tenant-scoped authorization and plan-quota decisions
//! - `tenancy`: Email-domain to tenant resolution
//! - `db`: Connection pool management

pub mod auth;
pub mod db;
pub mod models;
pub mod policy;
pub mod tenancy;

/// Current version of the NotesHub shared library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
