//! Credential input types and the form-level checks applied before any
//! store lookup.

use serde::Deserialize;

use crate::error::CoreError;

/// Minimum length of a new password (characters).
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Minimum length of a PS number accepted at login (characters).
pub const MIN_PS_NUMBER_LENGTH: usize = 3;

/// Candidate admin credential pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminCredentials {
    pub username: String,
    pub password: String,
}

/// Change-password form, shared by the admin and employee paths.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeForm {
    #[serde(default)]
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

impl PasswordChangeForm {
    /// New and confirm must match exactly, and the new password must be at
    /// least [`MIN_PASSWORD_LENGTH`] characters.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.new_password != self.confirm_password {
            return Err(CoreError::Validation("New passwords do not match".into()));
        }
        if self.new_password.chars().count() < MIN_PASSWORD_LENGTH {
            return Err(CoreError::Validation(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
        }
        Ok(())
    }
}

/// Check a PS number entered at the employee login prompt.
pub fn validate_ps_number(ps_number: &str) -> Result<(), CoreError> {
    let trimmed = ps_number.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation("Please enter your PS Number".into()));
    }
    if trimmed.chars().count() < MIN_PS_NUMBER_LENGTH {
        return Err(CoreError::Validation(format!(
            "PS Number must be at least {MIN_PS_NUMBER_LENGTH} characters"
        )));
    }
    Ok(())
}
