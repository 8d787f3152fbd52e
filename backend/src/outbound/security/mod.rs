//! Password hashing adapter backed by Argon2id.

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHasher as _, SaltString};

use crate::domain::ports::{PasswordHashError, PasswordHasher};
use crate::domain::{PasswordHash, PlainPassword};

/// Argon2id hasher using the crate's default parameters and a random salt
/// per password.
///
/// # Examples
/// ```
/// use room_booker::domain::PlainPassword;
/// use room_booker::domain::ports::PasswordHasher;
/// use room_booker::outbound::security::Argon2PasswordHasher;
///
/// let password = PlainPassword::new("correct horse").expect("valid password");
/// let hash = Argon2PasswordHasher.hash(&password).expect("hash");
/// assert!(hash.as_ref().starts_with("$argon2id$"));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl PasswordHasher for Argon2PasswordHasher {
    fn hash(&self, password: &PlainPassword) -> Result<PasswordHash, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        let phc = Argon2::default()
            .hash_password(password.expose().as_bytes(), &salt)
            .map_err(|err| PasswordHashError::hashing(err.to_string()))?;
        PasswordHash::new(phc.to_string())
            .map_err(|err| PasswordHashError::hashing(err.to_string()))
    }
}
