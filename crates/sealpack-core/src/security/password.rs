//! Password strength heuristic.
//!
//! Advisory only: archives are created with any non-empty password, weak
//! ones just produce a warning in the creation metadata.

use std::fmt;

/// Passwords shorter than this are flagged.
pub const MIN_LENGTH: usize = 8;

/// Number of character classes a password should mix.
pub const MIN_CLASSES: usize = 3;

/// Coarse rating of a password.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PasswordStrength {
    /// Shorter than `MIN_LENGTH` characters.
    TooShort,
    /// Long enough but uses fewer than `MIN_CLASSES` character classes.
    LowVariety,
    /// Passes both checks.
    Acceptable,
}

impl PasswordStrength {
    /// Returns a warning message for weak passwords.
    #[must_use]
    pub fn warning(self) -> Option<String> {
        match self {
            Self::TooShort => Some(format!(
                "password is shorter than {MIN_LENGTH} characters"
            )),
            Self::LowVariety => Some(format!(
                "password uses fewer than {MIN_CLASSES} character classes (lowercase, uppercase, digits, symbols)"
            )),
            Self::Acceptable => None,
        }
    }
}

impl fmt::Display for PasswordStrength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::TooShort => "too short",
            Self::LowVariety => "low variety",
            Self::Acceptable => "acceptable",
        };
        f.write_str(label)
    }
}

/// Rates a password by length and character-class mix.
///
/// # Examples
///
/// ```
/// use sealpack_core::security::PasswordStrength;
/// use sealpack_core::security::assess;
///
/// assert_eq!(assess("p@ss"), PasswordStrength::TooShort);
/// assert_eq!(assess("abcdefghij"), PasswordStrength::LowVariety);
/// assert_eq!(assess("Tr0ub4dor&3"), PasswordStrength::Acceptable);
/// ```
#[must_use]
pub fn assess(password: &str) -> PasswordStrength {
    if password.chars().count() < MIN_LENGTH {
        return PasswordStrength::TooShort;
    }

    let classes = [
        password.chars().any(char::is_lowercase),
        password.chars().any(char::is_uppercase),
        password.chars().any(|c| c.is_ascii_digit()),
        password.chars().any(|c| !c.is_alphanumeric()),
    ];

    if classes.iter().filter(|present| **present).count() < MIN_CLASSES {
        PasswordStrength::LowVariety
    } else {
        PasswordStrength::Acceptable
    }
}
