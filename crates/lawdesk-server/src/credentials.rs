use std::path::Path;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use tracing::{debug, info};

use lawdesk_core::credentials::{CredentialStore, Registration};
use lawdesk_core::error::{LawDeskError, Result};

const USERS_TREE: &str = "users";

/// Credential store backed by a sled tree of `username -> argon2 PHC hash`.
/// Uniqueness is enforced with a compare-and-swap on the username key, so two
/// concurrent registrations for the same name cannot both succeed.
pub struct SledCredentialStore {
    users: sled::Tree,
}

impl SledCredentialStore {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let db = sled::open(path).map_err(storage_error)?;
        Self::from_db(&db)
    }

    /// Store that lives only as long as the process. Used by tests.
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new()
            .temporary(true)
            .open()
            .map_err(storage_error)?;
        Self::from_db(&db)
    }

    fn from_db(db: &sled::Db) -> Result<Self> {
        let users = db.open_tree(USERS_TREE).map_err(storage_error)?;
        Ok(Self { users })
    }
}

fn storage_error(e: sled::Error) -> LawDeskError {
    LawDeskError::Storage(e.to_string())
}

fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| LawDeskError::Internal(format!("password hashing failed: {e}")))
}

fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| LawDeskError::Storage(format!("stored password hash is corrupt: {e}")))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// Runs argon2 work on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T> + Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| LawDeskError::Internal(format!("password task failed: {e}")))?
}

#[async_trait]
impl CredentialStore for SledCredentialStore {
    async fn register(&self, username: &str, password: &str) -> Result<Registration> {
        if self.users.contains_key(username).map_err(storage_error)? {
            debug!(username, "registration rejected, username taken");
            return Ok(Registration::Conflict);
        }

        let password = password.to_string();
        let hash = blocking(move || hash_password(&password)).await?;

        let swapped = self
            .users
            .compare_and_swap(username, None as Option<&[u8]>, Some(hash.as_bytes()))
            .map_err(storage_error)?;

        match swapped {
            Ok(()) => {
                self.users.flush_async().await.map_err(storage_error)?;
                info!(username, "user registered");
                Ok(Registration::Created)
            }
            Err(_) => {
                debug!(username, "registration lost a race for the username");
                Ok(Registration::Conflict)
            }
        }
    }

    async fn verify(&self, username: &str, password: &str) -> Result<bool> {
        let stored = match self.users.get(username).map_err(storage_error)? {
            Some(value) => String::from_utf8(value.to_vec())
                .map_err(|e| LawDeskError::Storage(format!("stored hash is not UTF-8: {e}")))?,
            None => return Ok(false),
        };

        let password = password.to_string();
        blocking(move || verify_password(&password, &stored)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn register_then_verify() {
        let store = SledCredentialStore::temporary().unwrap();
        assert_eq!(store.register("meera", "s3cret").await.unwrap(), Registration::Created);
        assert!(store.verify("meera", "s3cret").await.unwrap());
        assert!(!store.verify("meera", "wrong").await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let store = SledCredentialStore::temporary().unwrap();
        store.register("meera", "one").await.unwrap();
        assert_eq!(store.register("meera", "two").await.unwrap(), Registration::Conflict);
        assert!(store.verify("meera", "one").await.unwrap());
    }

    #[tokio::test]
    async fn unknown_user_does_not_verify() {
        let store = SledCredentialStore::temporary().unwrap();
        assert!(!store.verify("nobody", "pw").await.unwrap());
    }

    #[test]
    fn passwords_are_not_stored_in_clear() {
        let hash = hash_password("plain").unwrap();
        assert!(hash.starts_with("$argon2"));
        assert!(!hash.contains("plain"));
    }
}
