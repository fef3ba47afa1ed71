use std::fmt;
use std::str::FromStr;

use super::errors::PasswordError;

const MIN_LENGTH: usize = 8;
const SPECIAL_CHARACTERS: &str = "!@#$%^&*()_+-=[]{};':\"\\|,.<>/?";

/// Named password strength level.
///
/// Levels are strictly nested: a password accepted at `Level3` is accepted at
/// `Level2` and `Level1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PasswordPolicy {
    /// At least 8 characters.
    #[default]
    Level1,
    /// `Level1` plus at least one digit.
    Level2,
    /// `Level2` plus at least one uppercase letter and one special character.
    Level3,
}

impl PasswordPolicy {
    pub fn as_str(&self) -> &'static str {
        match self {
            PasswordPolicy::Level1 => "level1",
            PasswordPolicy::Level2 => "level2",
            PasswordPolicy::Level3 => "level3",
        }
    }

    /// Check a password against this level.
    ///
    /// # Errors
    /// * `PolicyViolation` - Password does not meet the level's requirements
    pub fn validate(&self, password: &str) -> Result<(), PasswordError> {
        let long_enough = password.chars().count() >= MIN_LENGTH;
        let has_digit = || password.chars().any(|c| c.is_ascii_digit());
        let has_uppercase = || password.chars().any(|c| c.is_ascii_uppercase());
        let has_special = || password.chars().any(|c| SPECIAL_CHARACTERS.contains(c));

        let satisfied = match self {
            PasswordPolicy::Level1 => long_enough,
            PasswordPolicy::Level2 => long_enough && has_digit(),
            PasswordPolicy::Level3 => long_enough && has_digit() && has_uppercase() && has_special(),
        };

        if satisfied {
            Ok(())
        } else {
            Err(PasswordError::PolicyViolation(self.as_str().to_string()))
        }
    }
}

impl FromStr for PasswordPolicy {
    type Err = PasswordError;

    /// An empty level selects the default (`level1`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "level1" => Ok(PasswordPolicy::Level1),
            "level2" => Ok(PasswordPolicy::Level2),
            "level3" => Ok(PasswordPolicy::Level3),
            other => Err(PasswordError::UnknownPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for PasswordPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Validate a password against a policy level given by name.
///
/// # Errors
/// * `UnknownPolicy` - Level name is not recognised
/// * `PolicyViolation` - Password does not meet the level's requirements
pub fn validate_password(password: &str, level: &str) -> Result<(), PasswordError> {
    level.parse::<PasswordPolicy>()?.validate(password)
}
