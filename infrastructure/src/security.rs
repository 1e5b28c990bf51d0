//! Credential checks for the HTTP Basic protected API.

use bcrypt::BcryptError;
use subtle::ConstantTimeEq;
use uuid::Uuid;

/// The single principal allowed to call the API.
///
/// Only the bcrypt hash of the password is kept in memory.
#[derive(Clone)]
pub struct CredentialVerifier {
    username: String,
    password_hash: String,
}

impl CredentialVerifier {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }

    /// Hashes `password` with the given bcrypt cost.
    pub fn from_password(
        username: impl Into<String>,
        password: &str,
        cost: u32,
    ) -> Result<Self, BcryptError> {
        let password_hash = bcrypt::hash(password, cost)?;
        Ok(Self::new(username, password_hash))
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn verify(&self, username: &str, password: &str) -> bool {
        let username_matches: bool = username.as_bytes().ct_eq(self.username.as_bytes()).into();
        let password_matches = bcrypt::verify(password, &self.password_hash).unwrap_or(false);
        username_matches && password_matches
    }

    /// A random password for deployments that configure none.
    pub fn generate_password() -> String {
        Uuid::new_v4().to_string()
    }
}

impl std::fmt::Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verifies_username_and_password() {
        let verifier = CredentialVerifier::from_password("vet", "s3cret", 4).unwrap();
        assert!(verifier.verify("vet", "s3cret"));
        assert!(!verifier.verify("vet", "wrong"));
        assert!(!verifier.verify("admin", "s3cret"));
    }

    #[test]
    fn accepts_precomputed_hash() {
        let hash = bcrypt::hash("clinic", 4).unwrap();
        let verifier = CredentialVerifier::new("admin", hash);
        assert!(verifier.verify("admin", "clinic"));
    }

    #[test]
    fn invalid_hash_never_verifies() {
        let verifier = CredentialVerifier::new("admin", "not-a-bcrypt-hash");
        assert!(!verifier.verify("admin", "anything"));
    }

    #[test]
    fn debug_hides_hash() {
        let verifier = CredentialVerifier::new("admin", "$2b$04$secret");
        assert!(!format!("{verifier:?}").contains("secret"));
    }

    #[test]
    fn generated_passwords_differ() {
        assert_ne!(
            CredentialVerifier::generate_password(),
            CredentialVerifier::generate_password()
        );
    }

    #[test]
    fn username_must_match_exactly() {
        let verifier = CredentialVerifier::from_password("vet", "s3cret", 4).unwrap();
        assert!(!verifier.verify("ve", "s3cret"));
        assert!(!verifier.verify("vets", "s3cret"));
        assert!(!verifier.verify("VET", "s3cret"));
        assert!(!verifier.verify("", "s3cret"));
    }
}
