//! Password hashing and credential checks

use std::sync::OnceLock;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use regex::Regex;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{NewUser, User};

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

/// Loose shape check: something@domain.tld with no whitespace
pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email)
}

/// Hash a password into an argon2id PHC string with a random salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string
///
/// Malformed hashes count as a mismatch.
pub fn verify_password(password: &str, stored_hash: &str) -> bool {
    match PasswordHash::new(stored_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(_) => false,
    }
}

/// Validate a registration, hash its password, and store the user
pub fn register_user(db: &Database, new_user: NewUser) -> Result<User> {
    let new_user = new_user.validated()?;
    let password_hash = hash_password(&new_user.password)?;
    db.create_user(&new_user.name, &new_user.email, &password_hash)
}

/// Look up a user by email and check the password
///
/// Unknown emails and wrong passwords produce the same error.
pub fn authenticate(db: &Database, email: &str, password: &str) -> Result<User> {
    let email = email.trim().to_lowercase();
    match db.get_user_credentials(&email)? {
        Some((user, hash)) if verify_password(password, &hash) => Ok(user),
        _ => Err(Error::Unauthorized("Invalid email or password".into())),
    }
}
