//! Credential store: the static set of registered identities.
//!
//! The registry is built once at process start and never mutated. Request
//! handling reads it without locks. Password credentials are stored as
//! bcrypt hashes only.

use thiserror::Error;
use uuid::Uuid;

/// bcrypt cost for demo identity hashes.
const DEMO_BCRYPT_COST: u32 = 10;

/// Shared demo password for the seeded identities.
pub const DEMO_PASSWORD: &str = "Test123@#12";

/// A registered identity.
///
/// Created at process start from a fixed registry; immutable thereafter.
#[derive(Debug, Clone)]
pub struct Identity {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub password_hash: String,
    pub roles: Vec<String>,
    pub department: String,
}

impl Identity {
    /// Build an identity with a fresh id from its registry fields.
    pub fn new(
        email: &str,
        name: &str,
        password_hash: String,
        roles: &[&str],
        department: &str,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            password_hash,
            roles: roles.iter().map(|r| (*r).to_string()).collect(),
            department: department.to_string(),
        }
    }
}

/// Errors from credential store construction.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Duplicate email in identity registry: {0}")]
    DuplicateEmail(String),

    #[error("Password hashing failed: {0}")]
    Hash(#[from] bcrypt::BcryptError),
}

/// Read-only identity registry.
///
/// Email uniqueness is enforced at construction; lookups never require
/// locking because the table is immutable after startup.
#[derive(Debug)]
pub struct CredentialStore {
    identities: Vec<Identity>,
}

impl CredentialStore {
    /// Build a store from a list of identities, rejecting duplicate emails.
    pub fn new(identities: Vec<Identity>) -> Result<Self, StoreError> {
        for (i, identity) in identities.iter().enumerate() {
            if identities
                .iter()
                .skip(i + 1)
                .any(|other| other.email == identity.email)
            {
                return Err(StoreError::DuplicateEmail(identity.email.clone()));
            }
        }

        Ok(Self { identities })
    }

    /// Build the default demo registry.
    ///
    /// All demo identities share [`DEMO_PASSWORD`]; the hash is computed
    /// here so plaintext never lives beyond startup.
    pub fn demo() -> Result<Self, StoreError> {
        let hash = bcrypt::hash(DEMO_PASSWORD, DEMO_BCRYPT_COST)?;

        Self::new(vec![
            Identity::new(
                "demo@example.test",
                "John Doe",
                hash.clone(),
                &["user", "api-access"],
                "Engineering",
            ),
            Identity::new(
                "demo2@example.test",
                "Jane Smith",
                hash.clone(),
                &["user", "api-access", "admin"],
                "IT",
            ),
            Identity::new(
                "demo3@example.test",
                "Demo User",
                hash,
                &["user", "api-access"],
                "Demo",
            ),
        ])
    }

    /// Look up an identity by email.
    pub fn find_by_email(&self, email: &str) -> Option<&Identity> {
        self.identities.iter().find(|i| i.email == email)
    }

    /// All registered identities, in registry order.
    pub fn identities(&self) -> &[Identity] {
        &self.identities
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    fn test_identity(email: &str) -> Identity {
        Identity::new(
            email,
            "Test User",
            "$2b$04$not-a-real-hash".to_string(),
            &["user"],
            "Testing",
        )
    }

    #[test]
    fn test_new_rejects_duplicate_email() {
        let result = CredentialStore::new(vec![
            test_identity("dup@example.test"),
            test_identity("other@example.test"),
            test_identity("dup@example.test"),
        ]);

        assert!(
            matches!(result, Err(StoreError::DuplicateEmail(email)) if email == "dup@example.test")
        );
    }

    #[test]
    fn test_new_accepts_unique_emails() {
        let store = CredentialStore::new(vec![
            test_identity("a@example.test"),
            test_identity("b@example.test"),
        ])
        .expect("Store should build");

        assert_eq!(store.identities().len(), 2);
    }

    #[test]
    fn test_find_by_email() {
        let store = CredentialStore::new(vec![test_identity("a@example.test")]).unwrap();

        assert!(store.find_by_email("a@example.test").is_some());
        assert!(store.find_by_email("missing@example.test").is_none());
        // Lookup is exact, not case-folded
        assert!(store.find_by_email("A@example.test").is_none());
    }

    #[test]
    fn test_demo_registry() {
        let store = CredentialStore::demo().expect("Demo store should build");

        assert_eq!(store.identities().len(), 3);

        let demo = store.find_by_email("demo@example.test").unwrap();
        assert_eq!(demo.name, "John Doe");
        assert_eq!(demo.department, "Engineering");
        assert!(demo.roles.contains(&"user".to_string()));

        let admin = store.find_by_email("demo2@example.test").unwrap();
        assert!(admin.roles.contains(&"admin".to_string()));
    }

    #[test]
    fn test_demo_password_verifies() {
        let store = CredentialStore::demo().unwrap();
        let demo = store.find_by_email("demo@example.test").unwrap();

        assert!(bcrypt::verify(DEMO_PASSWORD, &demo.password_hash).unwrap());
        assert!(!bcrypt::verify("wrong-password", &demo.password_hash).unwrap());
    }

    #[test]
    fn test_identity_ids_are_unique() {
        let store = CredentialStore::demo().unwrap();
        let ids: std::collections::HashSet<_> =
            store.identities().iter().map(|i| i.id).collect();

        assert_eq!(ids.len(), store.identities().len());
    }
}
