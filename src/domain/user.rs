//! User accounts
//!
//! Application users (`Utilisateur`). Passwords are stored as hex SHA-256
//! digests only.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::role::Role;

/// Application user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    pub username: String,
    pub display_name: String,
    pub role: Role,
    /// Student record linked to this account (student role only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<u64>,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(
        id: u64,
        username: impl Into<String>,
        display_name: impl Into<String>,
        role: Role,
        password: &str,
    ) -> Self {
        Self {
            id,
            username: username.into(),
            display_name: display_name.into(),
            role,
            student_id: None,
            password_hash: hash_secret(password),
        }
    }

    pub fn with_student(mut self, student_id: u64) -> Self {
        self.student_id = Some(student_id);
        self
    }

    pub fn verify_password(&self, password: &str) -> bool {
        self.password_hash == hash_secret(password)
    }
}

/// Hex-encoded SHA-256 of a secret (passwords, session tokens)
pub fn hash_secret(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}
