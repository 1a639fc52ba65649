use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Registration {
    Created,
    /// The username is already taken.
    Conflict,
}

/// Username/password store with a uniqueness constraint on usernames.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    async fn register(&self, username: &str, password: &str) -> Result<Registration>;
    async fn verify(&self, username: &str, password: &str) -> Result<bool>;
}
