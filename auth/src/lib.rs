//! Authentication primitives
//!
//! Reusable building blocks with no storage knowledge:
//! - Password strength policy (`level1` .. `level3`)
//! - Password hashing (Argon2id, configurable cost)
//! - JWT encoding/decoding (HS256)
//! - Token issuance and verification with issuer/expiry checks
//!
//! # Examples
//!
//! ## Password Policy and Hashing
//! ```
//! use auth::{HashCost, PasswordHasher, PasswordPolicy};
//!
//! PasswordPolicy::Level2.validate("password123").unwrap();
//!
//! let hasher = PasswordHasher::with_cost(HashCost::Min);
//! let hash = hasher.hash("password123").unwrap();
//! assert!(hasher.verify("password123", &hash).unwrap());
//! ```
//!
//! ## Tokens
//! ```
//! use auth::{TokenService, TokenSubject};
//! use chrono::Duration;
//!
//! let tokens = TokenService::new(b"secret_key_at_least_32_bytes_long!", "my-service", Duration::hours(1));
//! let subject = TokenSubject {
//!     id: "u1".to_string(),
//!     username: "alice".to_string(),
//!     role_id: "default".to_string(),
//! };
//! let token = tokens.issue(&subject, Default::default()).unwrap();
//! let (verified, _payload) = tokens.verify(&format!("Bearer {}", token)).unwrap();
//! assert_eq!(verified.id, "u1");
//! ```

pub mod jwt;
pub mod password;
pub mod token_service;

// Re-export commonly used items
pub use jwt::Claims;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenEnvelope;
pub use password::validate_password;
pub use password::HashCost;
pub use password::PasswordError;
pub use password::PasswordHasher;
pub use password::PasswordPolicy;
pub use token_service::strip_bearer;
pub use token_service::TokenService;
pub use token_service::TokenSubject;
