//! Credential helpers: password digests and OTP codes
//!
//! Pure functions only. No HTTP framework dependencies - those live in the
//! service crates.

use rand::Rng;
use sha2::{Digest, Sha256};

/// Minimum password length accepted at signup
pub const MIN_PASSWORD_LENGTH: usize = 4;

/// Digest a password for storage, salted with the account identifier.
///
/// The identifier is already normalized to uppercase when accounts are
/// stored, so the same (id, password) pair always digests identically.
pub fn password_digest(account_id: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(account_id.as_bytes());
    hasher.update(b":");
    hasher.update(password.as_bytes());
    hex_encode(&hasher.finalize())
}

/// Verify a candidate password against a stored digest
pub fn verify_password(account_id: &str, candidate: &str, stored_digest: &str) -> bool {
    password_digest(account_id, candidate) == stored_digest
}

/// Generate a random 4-digit OTP code (1000-9999)
pub fn generate_otp() -> String {
    rand::thread_rng().gen_range(1000..10000).to_string()
}

fn hex_encode(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn digest_is_deterministic() {
        let a = password_digest("PRC23CA001", "pass1");
        let b = password_digest("PRC23CA001", "pass1");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn digest_is_salted_by_account_id() {
        let a = password_digest("PRC23CA001", "pass1");
        let b = password_digest("PRC23CA002", "pass1");
        assert_ne!(a, b);
    }

    #[test]
    fn verify_accepts_matching_password() {
        let digest = password_digest("PRC23CA001", "pass1");
        assert!(verify_password("PRC23CA001", "pass1", &digest));
        assert!(!verify_password("PRC23CA001", "pass2", &digest));
    }

    #[test]
    fn otp_is_four_digits() {
        for _ in 0..100 {
            let otp = generate_otp();
            assert_eq!(otp.len(), 4);
            assert!(otp.parse::<u32>().unwrap() >= 1000);
        }
    }
}
