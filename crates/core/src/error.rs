/// Credential failures surfaced to the initiating user. Never fatal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    /// An employee record exists but the supplied password does not match it.
    #[error("Invalid password")]
    InvalidPassword,

    /// No employee record exists and the bootstrap policy did not apply.
    #[error("User not found")]
    UserNotFound,

    /// The presented current password does not match the stored one.
    #[error("Wrong password")]
    WrongPassword,

    /// Admin username/password pair rejected.
    #[error("Invalid credentials")]
    InvalidCredentials,
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error(transparent)]
    Auth(#[from] AuthError),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),
}

impl From<validator::ValidationErrors> for CoreError {
    /// Collapse field-level errors into one message naming every offending
    /// field, in sorted order.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<String> = errors
            .field_errors()
            .keys()
            .map(|k| k.to_string())
            .collect();
        fields.sort_unstable();
        CoreError::Validation(format!("Missing or invalid field(s): {}", fields.join(", ")))
    }
}
