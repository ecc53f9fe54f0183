//! Salted password hashing.
//!
//! Hashes are PBKDF2-HMAC-SHA256 with a random 16 byte salt, stored as
//! `pbkdf2-sha256$<iterations>$<salt hex>$<digest hex>`. The iteration count
//! travels with the hash, so raising [`DEFAULT_ITERATIONS`] does not
//! invalidate existing accounts.

use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SCHEME: &str = "pbkdf2-sha256";
const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;

pub const DEFAULT_ITERATIONS: u32 = 100_000;

#[derive(Debug, thiserror::Error)]
pub enum PasswordHashError {
    #[error("Malformed password hash")]
    Malformed,
    #[error("Unsupported hash scheme: {0}")]
    UnsupportedScheme(String),
}

#[derive(Debug, Clone)]
pub struct PasswordHasher {
    iterations: u32,
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(DEFAULT_ITERATIONS)
    }
}

impl PasswordHasher {
    pub fn new(iterations: u32) -> Self {
        Self {
            iterations: iterations.max(1),
        }
    }

    pub fn hash(&self, password: &str) -> String {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);

        let digest = derive(password.as_bytes(), &salt, self.iterations);
        format!(
            "{}${}${}${}",
            SCHEME,
            self.iterations,
            hex::encode(salt),
            hex::encode(digest)
        )
    }

    /// Check `password` against a stored hash. Digests are compared in
    /// constant time.
    pub fn verify(&self, password: &str, stored: &str) -> Result<bool, PasswordHashError> {
        let mut parts = stored.split('$');
        let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
            parts.next(),
        ) else {
            return Err(PasswordHashError::Malformed);
        };

        if scheme != SCHEME {
            return Err(PasswordHashError::UnsupportedScheme(scheme.to_string()));
        }

        let iterations: u32 = iterations
            .parse()
            .map_err(|_| PasswordHashError::Malformed)?;
        if iterations == 0 {
            return Err(PasswordHashError::Malformed);
        }
        let salt = hex::decode(salt).map_err(|_| PasswordHashError::Malformed)?;
        let expected = hex::decode(expected).map_err(|_| PasswordHashError::Malformed)?;
        if expected.len() != DIGEST_LEN {
            return Err(PasswordHashError::Malformed);
        }

        let digest = derive(password.as_bytes(), &salt, iterations);
        Ok(digest[..].ct_eq(&expected[..]).into())
    }
}

fn derive(password: &[u8], salt: &[u8], iterations: u32) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password, salt, iterations, &mut digest);
    digest
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_hasher() -> PasswordHasher {
        PasswordHasher::new(1_000)
    }

    #[test]
    fn test_hash_and_verify() {
        let hasher = test_hasher();
        let stored = hasher.hash("tajne");

        assert!(stored.starts_with("pbkdf2-sha256$1000$"));
        assert!(!stored.contains("tajne"));
        assert!(hasher.verify("tajne", &stored).unwrap());
        assert!(!hasher.verify("Tajne", &stored).unwrap());
        assert!(!hasher.verify("", &stored).unwrap());
    }

    #[test]
    fn test_same_password_different_salt() {
        let hasher = test_hasher();
        let first = hasher.hash("haslo");
        let second = hasher.hash("haslo");

        assert_ne!(first, second);
        assert!(hasher.verify("haslo", &first).unwrap());
        assert!(hasher.verify("haslo", &second).unwrap());
    }

    #[test]
    fn test_verify_uses_stored_iterations() {
        let stored = PasswordHasher::new(10).hash("haslo");
        assert!(PasswordHasher::new(5_000).verify("haslo", &stored).unwrap());
    }

    #[test]
    fn test_known_vector() {
        // PBKDF2-HMAC-SHA256, P="password", S="salt", c=2
        let digest = derive(b"password", b"salt", 2);
        assert_eq!(
            hex::encode(digest),
            "ae4d0c95af6b46d32d0adff928f06dd02a303f8ef3c251dfd6e2d85a95474c43"
        );
    }

    #[test]
    fn test_malformed_hashes() {
        let hasher = test_hasher();

        assert!(matches!(
            hasher.verify("x", "plaintext"),
            Err(PasswordHashError::Malformed)
        ));
        assert!(matches!(
            hasher.verify("x", "pbkdf2-sha256$abc$00$00"),
            Err(PasswordHashError::Malformed)
        ));
        assert!(matches!(
            hasher.verify("x", "pbkdf2-sha256$10$zz$00"),
            Err(PasswordHashError::Malformed)
        ));
        assert!(matches!(
            hasher.verify("x", "pbkdf2-sha256$10$00$0011"),
            Err(PasswordHashError::Malformed)
        ));
        assert!(matches!(
            hasher.verify("x", "bcrypt$10$00$00"),
            Err(PasswordHashError::UnsupportedScheme(_))
        ));
    }
}
