//! Authentication utilities library
//!
//! Provides reusable credential infrastructure for services:
//! - Password hashing (Argon2id, configurable cost)
//! - Access/refresh token pair issuance and validation (HS256 JWT)
//! - Authentication coordination
//!
//! Services define their own identity model and map it into [`IdentityClaims`].
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! let is_valid = hasher.verify("my_password", &hash).unwrap();
//! assert!(is_valid);
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, IdentityClaims, PasswordHasher, TokenIssuer};
//! use chrono::Duration;
//!
//! let issuer = TokenIssuer::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     Duration::minutes(15),
//!     Duration::days(7),
//! );
//! let auth = Authenticator::new(PasswordHasher::new(), issuer);
//!
//! // Signup: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and issue a token pair
//! let identity = IdentityClaims {
//!     user_id: "user123".to_string(),
//!     email: "alice@example.com".to_string(),
//!     first_name: "Alice".to_string(),
//!     last_name: "Liddell".to_string(),
//!     user_type: "USER".to_string(),
//! };
//! let pair = auth.authenticate("password123", &hash, &identity).unwrap();
//!
//! // Validate tokens
//! let access = auth.validate_access_token(&pair.access_token).unwrap();
//! assert_eq!(access.email, "alice@example.com");
//! let refresh = auth.validate_refresh_token(&pair.refresh_token).unwrap();
//! assert_eq!(refresh.sub, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;
pub mod tokens;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::PasswordCheck;
pub use authenticator::INVALID_CREDENTIALS_MESSAGE;
pub use jwt::AccessClaims;
pub use jwt::IdentityClaims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::RefreshClaims;
pub use jwt::TokenKind;
pub use password::HashingCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use tokens::TokenIssuer;
pub use tokens::TokenPair;
