/// HTTP middleware for the API server
///
/// - [`auth`]: bearer-token authentication that resolves the caller into a
///   [`noteshub_shared::policy::Principal`]
/// - [`security`]: OWASP-recommended response headers

pub mod auth;
pub mod security;
