use std::str::FromStr;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::errors::PasswordError;

/// Cost hint selecting an Argon2 parameter set.
///
/// Unrecognised hints parse to `Default`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HashCost {
    Min,
    #[default]
    Default,
    Max,
}

impl HashCost {
    fn params(&self) -> Result<Params, PasswordError> {
        let (m_cost, t_cost, p_cost) = match self {
            HashCost::Min => (Params::MIN_M_COST, Params::MIN_T_COST, Params::MIN_P_COST),
            HashCost::Default => (
                Params::DEFAULT_M_COST,
                Params::DEFAULT_T_COST,
                Params::DEFAULT_P_COST,
            ),
            // m=64MiB, t=3, p=4
            HashCost::Max => (64 * 1024, 3, 4),
        };

        Params::new(m_cost, t_cost, p_cost, None)
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }
}

impl FromStr for HashCost {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "min" => HashCost::Min,
            "max" => HashCost::Max,
            _ => HashCost::Default,
        })
    }
}

/// Password hashing implementation.
///
/// Provides cryptographic password hashing (internally uses Argon2id). The
/// digest is a PHC string embedding salt and parameters, so verification does
/// not need to know the cost the digest was produced with.
#[derive(Debug, Clone, Copy, Default)]
pub struct PasswordHasher {
    cost: HashCost,
}

impl PasswordHasher {
    /// Create a hasher producing digests at the default cost.
    pub fn new() -> Self {
        Self::with_cost(HashCost::Default)
    }

    /// Create a hasher producing digests at the given cost.
    pub fn with_cost(cost: HashCost) -> Self {
        Self { cost }
    }

    /// Hash a plaintext password securely.
    ///
    /// Uses Argon2id with random salt generation.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to hash
    ///
    /// # Returns
    /// PHC string format hash (includes algorithm, parameters, salt, and hash)
    ///
    /// # Errors
    /// * `HashingFailed` - Password hashing operation failed
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, self.cost.params()?);

        argon2
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a password against a stored hash.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `hash` - Stored password hash in PHC string format
    ///
    /// # Returns
    /// True if password matches, false otherwise
    ///
    /// # Errors
    /// * `VerificationFailed` - Hash format is invalid or uses an unsupported algorithm
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerificationFailed(e.to_string())),
        }
    }
}
