/// Authentication utilities
///
/// This module provides the authentication primitives the API treats as
/// black boxes:
///
/// - [`password`]: Argon2id password hashing and verification
/// - [`jwt`]: JWT bearer token generation and validation
///
/// # Security Features
///
/// - **Password Hashing**: Argon2id with 64 MB memory, 3 iterations
/// - **JWT Tokens**: HS256 signing, 7-day expiry, no refresh or revocation
/// - **Constant-time Comparison**: Verification uses constant-time operations
///
/// # Example
///
/// ```no_run
/// use noteshub_shared::auth::password::{hash_password, verify_password};
/// use noteshub_shared::auth::jwt::{create_token, validate_token, Claims};
/// use uuid::Uuid;
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hash = hash_password("user_password")?;
/// assert!(verify_password("user_password", &hash)?);
///
/// let claims = Claims::new(Uuid::new_v4());
/// let token = create_token(&claims, "secret-key-at-least-32-bytes-long!!")?;
/// # Ok(())
/// # }
/// ```

pub mod jwt;
pub mod password;
