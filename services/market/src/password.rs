use anyhow::anyhow;
use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Hash a plaintext password with Argon2id and return the PHC string
/// that gets stored.
pub fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut argon2::password_hash::rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("hash password: {e}"))?;
    Ok(hash.to_string())
}

/// Verify a plaintext password against a stored PHC hash.
///
/// A mismatch is `Ok(false)`; only a malformed stored hash is an error.
pub fn verify_password(password: &str, password_hash: &str) -> anyhow::Result<bool> {
    let parsed =
        PasswordHash::new(password_hash).map_err(|e| anyhow!("parse password hash: {e}"))?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(anyhow!("verify password: {e}")),
    }
}
