/// API route handlers
///
/// # Modules
///
/// - [`auth`]: registration, login, logout, current-user endpoints
/// - [`notes`]: tenant-scoped note CRUD
/// - [`tenants`]: tenant info and plan upgrade
/// - [`health`]: health check

pub mod auth;
pub mod health;
pub mod notes;
pub mod tenants;
