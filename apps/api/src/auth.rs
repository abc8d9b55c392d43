use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// Stored form of a password. The password itself is never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Credential {
    pub salt: String,
    pub hash: String,
}

/// Hashing capability used by the account store.
pub trait CredentialHasher: Send + Sync {
    fn hash(&self, password: &str) -> Credential;
    fn verify(&self, password: &str, credential: &Credential) -> bool;
}

/// Salted SHA-256 with a random 16-byte salt per account.
#[derive(Debug, Default, Clone, Copy)]
pub struct Sha256Hasher;

impl Sha256Hasher {
    fn digest(salt: &str, password: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(salt.as_bytes());
        hasher.update(password.as_bytes());
        hex::encode(hasher.finalize())
    }
}

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, password: &str) -> Credential {
        let salt = hex::encode(Uuid::new_v4().as_bytes());
        let hash = Self::digest(&salt, password);
        Credential { salt, hash }
    }

    fn verify(&self, password: &str, credential: &Credential) -> bool {
        let candidate = Self::digest(&credential.salt, password);
        candidate.as_bytes().ct_eq(credential.hash.as_bytes()).into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_accepts_same_password() {
        let c = Sha256Hasher.hash("secret1");
        assert!(Sha256Hasher.verify("secret1", &c));
        assert!(!Sha256Hasher.verify("secret2", &c));
    }

    #[test]
    fn test_hash_does_not_contain_password() {
        let c = Sha256Hasher.hash("secret1");
        assert!(!c.hash.contains("secret1"));
        assert_eq!(c.hash.len(), 64);
    }

    #[test]
    fn test_salts_differ_per_call() {
        let a = Sha256Hasher.hash("secret1");
        let b = Sha256Hasher.hash("secret1");
        assert_ne!(a.salt, b.salt);
        assert_ne!(a.hash, b.hash);
    }
}
