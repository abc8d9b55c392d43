use serde::{Deserialize, Serialize};

use crate::auth::Credential;

/// A local account, keyed in the `users` map by lowercased email.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserAccount {
    pub name: String,
    pub email: String,
    pub credential: Credential,
}

impl UserAccount {
    /// Display name for greetings, falling back to the email's local part.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            local_part(&self.email)
        } else {
            &self.name
        }
    }
}

pub fn local_part(email: &str) -> &str {
    email.split('@').next().unwrap_or(email)
}

/// Normalizes an email for use as an account key.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
