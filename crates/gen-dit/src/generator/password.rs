//! Salted password hashes in the `{SSHA256}` userPassword scheme.
//!
//! The stored value is `{SSHA256}` followed by the base64 encoding of
//! `SHA-256(passphrase || salt) || salt`, which directory servers accept on
//! import and verify on bind.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rand::Rng;
use sha2::{Digest, Sha256};

/// Scheme tag prefixed to every hash.
pub const SCHEME: &str = "{SSHA256}";

const SALT_LEN: usize = 8;
const DIGEST_LEN: usize = 32;

/// Hashes one fixed passphrase with a fresh salt on every call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHasher {
    passphrase: String,
}

impl PasswordHasher {
    /// Hashes `passphrase` for every generated entry.
    pub fn new(passphrase: impl Into<String>) -> Self {
        Self {
            passphrase: passphrase.into(),
        }
    }

    /// Hashes the passphrase with a salt drawn from `rng`.
    pub fn generate<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        let mut salt = [0_u8; SALT_LEN];
        rng.fill(&mut salt);
        hash_with_salt(&self.passphrase, &salt)
    }
}

/// Hashes `passphrase` with an explicit salt.
///
/// # Example
///
/// ```
/// use gen_dit::{hash_with_salt, verify_password};
///
/// let stored = hash_with_salt("redhat", b"saltsalt");
/// assert!(stored.starts_with("{SSHA256}"));
/// assert!(verify_password("redhat", &stored));
/// assert!(!verify_password("fedora", &stored));
/// ```
#[must_use]
pub fn hash_with_salt(passphrase: &str, salt: &[u8]) -> String {
    let mut payload = salted_digest(passphrase, salt);
    payload.extend_from_slice(salt);
    format!("{SCHEME}{}", STANDARD.encode(payload))
}

/// Checks `passphrase` against a stored `{SSHA256}` value.
#[must_use]
pub fn verify_password(passphrase: &str, stored: &str) -> bool {
    let Some(encoded) = stored.strip_prefix(SCHEME) else {
        return false;
    };
    let Ok(payload) = STANDARD.decode(encoded) else {
        return false;
    };
    if payload.len() <= DIGEST_LEN {
        return false;
    }
    let (digest, salt) = payload.split_at(DIGEST_LEN);
    salted_digest(passphrase, salt) == digest
}

fn salted_digest(passphrase: &str, salt: &[u8]) -> Vec<u8> {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    hasher.update(salt);
    hasher.finalize().to_vec()
}
