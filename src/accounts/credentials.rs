//! Password hashing with Argon2id
//!
//! Hashes are stored as PHC strings, which carry their own salt and
//! parameters. Records written by older deployments hold bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`); those still verify and are flagged for rehash.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;

use crate::error::AccountError;

const BCRYPT_PREFIX: &str = "$2";

fn is_bcrypt(stored_hash: &str) -> bool {
    stored_hash.starts_with(BCRYPT_PREFIX)
}

/// Whether a verified hash should be replaced with a fresh Argon2id one.
pub fn needs_rehash(stored_hash: &str) -> bool {
    is_bcrypt(stored_hash)
}

pub fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

/// Returns `Ok(false)` on a wrong password and `Err` only when the stored
/// hash itself cannot be used.
pub fn verify_password(password: &str, stored_hash: &str) -> Result<bool, AccountError> {
    if is_bcrypt(stored_hash) {
        return bcrypt::verify(password, stored_hash)
            .map_err(|e| AccountError::Hashing(e.to_string()));
    }

    let parsed = PasswordHash::new(stored_hash).map_err(|e| AccountError::Hashing(e.to_string()))?;

    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(AccountError::Hashing(e.to_string())),
    }
}
