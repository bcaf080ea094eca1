//! Authentication utilities

use anyhow::{Context, Result};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::Sha256;
use std::time::{SystemTime, UNIX_EPOCH};
use subtle::ConstantTimeEq;

#[cfg(not(test))]
const PBKDF2_ITERATIONS: u32 = 100_000;
// keeps debug-build tests fast
#[cfg(test)]
const PBKDF2_ITERATIONS: u32 = 1_000;
const HASH_LENGTH: usize = 32;
const SALT_LENGTH: usize = 16;
const HASH_SCHEME: &str = "pbkdf2_sha256";

/// session token claims, sub is the username
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub exp: usize,
}

/// hash a password using pbkdf2-sha256 with a fresh random salt
///
/// format: `pbkdf2_sha256$<iterations>$<salt hex>$<hash hex>`
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    hash_with_salt(password, &salt, PBKDF2_ITERATIONS)
}

fn hash_with_salt(password: &str, salt: &[u8], iterations: u32) -> String {
    let mut hash = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut hash);

    format!(
        "{}${}${}${}",
        HASH_SCHEME,
        iterations,
        hex::encode(salt),
        hex::encode(hash)
    )
}

/// verify a password against a stored hash using constant-time comparison
///
/// a malformed stored hash never verifies
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(expected), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return false;
    };

    if scheme != HASH_SCHEME {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    let (Ok(salt), Ok(expected)) = (hex::decode(salt), hex::decode(expected)) else {
        return false;
    };
    if iterations == 0 || expected.len() != HASH_LENGTH {
        return false;
    }

    let mut computed = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), &salt, iterations, &mut computed);

    computed[..].ct_eq(&expected[..]).into()
}

/// generate a random string of the given length
pub fn generate_random_string(length: usize) -> String {
    use rand::Rng;
    const CHARSET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let idx = rng.gen_range(0..CHARSET.len());
            CHARSET[idx] as char
        })
        .collect()
}

/// create a signed session token for a username, valid for ttl seconds
pub fn create_session_token(username: &str, secret: &str, expires_in: u64) -> Result<String> {
    let expiration = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs() + expires_in;

    let claims = SessionClaims {
        sub: username.to_string(),
        exp: expiration as usize,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .context("Failed to sign session token")
}

/// verify a session token's signature and expiry
pub fn verify_session_token(token: &str, secret: &str) -> Result<SessionClaims> {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.validate_exp = true;
    validation.leeway = 0;

    let token_data = decode::<SessionClaims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )?;

    Ok(token_data.claims)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_then_verify() {
        let cases = [("alice", "pw1"), ("bob", ""), ("carol", "ünïcødé pässwörd")];
        for (_, password) in cases {
            let stored = hash_password(password);
            assert!(verify_password(password, &stored));
            assert!(!verify_password("wrong", &stored));
            assert!(!verify_password(&format!("{} ", password), &stored));
        }
    }

    #[test]
    fn test_fresh_salt_per_hash() {
        let a = hash_password("same");
        let b = hash_password("same");
        assert_ne!(a, b);
        assert!(verify_password("same", &a));
        assert!(verify_password("same", &b));
    }

    #[test]
    fn test_hash_does_not_contain_plaintext() {
        let stored = hash_password("hunter2hunter2");
        assert!(!stored.contains("hunter2"));
        assert!(stored.starts_with(&format!("pbkdf2_sha256${}$", PBKDF2_ITERATIONS)));
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "plaintext"));
        assert!(!verify_password("pw", "pbkdf2_sha256$abc$00$00"));
        assert!(!verify_password("pw", "md5$1000$00$00"));
    }

    #[test]
    fn test_known_vector() {
        let stored = hash_with_salt("pw1", b"fixedsalt", 1000);
        assert!(verify_password("pw1", &stored));
        assert_eq!(stored, hash_with_salt("pw1", b"fixedsalt", 1000));
    }

    #[test]
    fn test_random_string() {
        let s1 = generate_random_string(32);
        let s2 = generate_random_string(32);

        assert_eq!(s1.len(), 32);
        assert_eq!(s2.len(), 32);
        assert_ne!(s1, s2); // Should be different (with very high probability)
    }

    #[test]
    fn test_session_token_roundtrip() {
        let token = create_session_token("alice", "secret", 60).unwrap();
        let claims = verify_session_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "alice");
    }

    #[test]
    fn test_session_token_wrong_secret() {
        let token = create_session_token("alice", "secret", 60).unwrap();
        assert!(verify_session_token(&token, "other").is_err());
    }

    #[test]
    fn test_session_token_expired() {
        let claims = SessionClaims {
            sub: "alice".to_string(),
            exp: 1,
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();
        assert!(verify_session_token(&token, "secret").is_err());
    }

    #[test]
    fn test_session_token_garbage() {
        assert!(verify_session_token("not-a-token", "secret").is_err());
    }
}
