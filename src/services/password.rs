/// Pluggable password hashing. Registration hashes, login verifies.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError>;

    /// Returns false for any mismatch, including a malformed stored hash.
    fn verify(&self, password: &str, hash: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
#[error("password hashing failed: {0}")]
pub struct PasswordHashError(String);

pub struct BcryptHasher {
    cost: u32,
}

impl BcryptHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }
}

impl Default for BcryptHasher {
    fn default() -> Self {
        Self::new(bcrypt::DEFAULT_COST)
    }
}

impl PasswordHasher for BcryptHasher {
    fn hash(&self, password: &str) -> Result<String, PasswordHashError> {
        bcrypt::hash(password, self.cost).map_err(|e| PasswordHashError(e.to_string()))
    }

    fn verify(&self, password: &str, hash: &str) -> bool {
        bcrypt::verify(password, hash).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_salted_and_verifiable() {
        let hasher = BcryptHasher::new(4);
        let first = hasher.hash("secret123").unwrap();
        let second = hasher.hash("secret123").unwrap();

        assert_ne!(first, "secret123");
        assert_ne!(first, second);
        assert!(hasher.verify("secret123", &first));
        assert!(!hasher.verify("wrong", &first));
    }

    #[test]
    fn test_garbage_hash_never_verifies() {
        let hasher = BcryptHasher::new(4);
        assert!(!hasher.verify("secret123", "not-a-bcrypt-hash"));
    }
}
