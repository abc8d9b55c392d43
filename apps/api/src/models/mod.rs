pub mod resume;
pub mod user;

use thiserror::Error;

/// Input rejected before any state is touched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Please fill in at least name and email")]
    MissingResumeIdentity,

    #[error("Please fill in all fields")]
    MissingFields,

    #[error("Password must be at least {min} characters")]
    PasswordTooShort { min: usize },
}
