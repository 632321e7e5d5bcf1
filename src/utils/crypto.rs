//! Salted password hashing.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Hashes a password with HMAC-SHA256 keyed by the server salt.
///
/// Returns a 64-character lowercase hex-encoded MAC.
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Checks a password against a stored hash in constant time.
pub fn verify_password(password: &str, salt: &str, stored_hash: &str) -> bool {
    let Ok(expected) = hex::decode(stored_hash) else {
        return false;
    };

    let mut mac = HmacSha256::new_from_slice(salt.as_bytes()).expect("HMAC accepts any key length");
    mac.update(password.as_bytes());
    mac.verify_slice(&expected).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_consistency() {
        let a = hash_password("secret1", "salt");
        let b = hash_password("secret1", "salt");

        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn test_salt_matters() {
        assert_ne!(hash_password("secret1", "salt-a"), hash_password("secret1", "salt-b"));
    }

    #[test]
    fn test_verify() {
        let hash = hash_password("secret1", "salt");

        assert!(verify_password("secret1", "salt", &hash));
        assert!(!verify_password("secret2", "salt", &hash));
        assert!(!verify_password("secret1", "other", &hash));
        assert!(!verify_password("secret1", "salt", "not-hex"));
    }
}
