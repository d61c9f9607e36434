use serde::{Deserialize, Serialize};

use projovo_core::{DomainError, DomainResult, ValueObject};

/// Shortest minimum length the provider accepts.
pub const MIN_PASSWORD_LENGTH: u8 = 6;
/// Longest minimum length the provider accepts.
pub const MAX_PASSWORD_LENGTH: u8 = 99;

/// Password rules enforced by the directory on sign-up and reset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PasswordPolicy {
    pub min_length: u8,
    pub require_lowercase: bool,
    pub require_uppercase: bool,
    pub require_digits: bool,
    pub require_symbols: bool,
}

impl ValueObject for PasswordPolicy {}

impl Default for PasswordPolicy {
    fn default() -> Self {
        Self {
            min_length: 8,
            require_lowercase: true,
            require_uppercase: false,
            require_digits: true,
            require_symbols: true,
        }
    }
}

impl PasswordPolicy {
    pub fn validate(&self) -> DomainResult<()> {
        if !(MIN_PASSWORD_LENGTH..=MAX_PASSWORD_LENGTH).contains(&self.min_length) {
            return Err(DomainError::validation(format!(
                "password min_length must be within {MIN_PASSWORD_LENGTH}..={MAX_PASSWORD_LENGTH} (got {})",
                self.min_length
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy_is_valid() {
        let policy = PasswordPolicy::default();
        assert!(policy.validate().is_ok());
        assert_eq!(policy.min_length, 8);
        assert!(!policy.require_uppercase);
    }

    #[test]
    fn out_of_range_min_length_is_rejected() {
        for min_length in [0, 5, 100] {
            let policy = PasswordPolicy {
                min_length,
                ..PasswordPolicy::default()
            };
            assert!(matches!(policy.validate(), Err(DomainError::Validation(_))));
        }
    }
}
