//! Password rules applied at sign-up.
//!
//! Plain-text passwords only live inside [`Zeroizing`] buffers and are wiped
//! when dropped.

use zeroize::Zeroizing;

/// Minimum password length in characters.
pub const PASSWORD_MIN_LEN: usize = 8;

/// Reasons a proposed password is refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordPolicyError {
    /// Confirmation differs from the first entry.
    #[error("The two password fields didn’t match.")]
    Mismatch,
    /// Shorter than [`PASSWORD_MIN_LEN`].
    #[error("This password is too short. It must contain at least {min} characters.")]
    TooShort {
        /// Minimum length.
        min: usize,
    },
    /// Only digits.
    #[error("This password is entirely numeric.")]
    EntirelyNumeric,
}

/// A password that passed the sign-up policy.
///
/// # Examples
/// ```
/// use ya_backend::domain::NewPassword;
///
/// assert!(NewPassword::confirm("correct horse", "correct horse").is_ok());
/// assert!(NewPassword::confirm("12345678", "12345678").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPassword(Zeroizing<String>);

impl NewPassword {
    /// Check a password and its confirmation, reporting every violation.
    pub fn confirm(password: &str, confirmation: &str) -> Result<Self, Vec<PasswordPolicyError>> {
        if password != confirmation {
            return Err(vec![PasswordPolicyError::Mismatch]);
        }
        let mut violations = Vec::new();
        if password.chars().count() < PASSWORD_MIN_LEN {
            violations.push(PasswordPolicyError::TooShort {
                min: PASSWORD_MIN_LEN,
            });
        }
        if password.chars().all(|ch| ch.is_ascii_digit()) {
            violations.push(PasswordPolicyError::EntirelyNumeric);
        }
        if violations.is_empty() {
            Ok(Self(Zeroizing::new(password.to_owned())))
        } else {
            Err(violations)
        }
    }

    /// The accepted plain-text password.
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }
}
