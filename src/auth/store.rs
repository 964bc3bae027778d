use std::sync::Arc;

use anyhow::Context;
use tracing::debug;
use uuid::Uuid;

use crate::auth::{
    password::PasswordHasher,
    repo::{StoreError, UserRepo},
    repo_types::{NewUser, Role, User},
};

/// User persistence plus password hashing. Callers never see plaintext
/// leave this type, only the stored hash.
#[derive(Clone)]
pub struct CredentialStore {
    repo: Arc<dyn UserRepo>,
    hasher: PasswordHasher,
    // hash of a random secret, checked when an email is unknown
    decoy_hash: Arc<str>,
}

impl CredentialStore {
    pub fn new(repo: Arc<dyn UserRepo>, hasher: PasswordHasher) -> anyhow::Result<Self> {
        let decoy_hash = hasher
            .hash(&Uuid::new_v4().to_string())
            .context("hash decoy password")?;
        Ok(Self {
            repo,
            hasher,
            decoy_hash: decoy_hash.into(),
        })
    }

    pub async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        self.repo.find_by_email(email).await
    }

    pub async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        self.repo.find_by_id(id).await
    }

    pub async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        self.repo.list_all().await
    }

    pub async fn create(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: Role,
    ) -> Result<User, StoreError> {
        let hasher = self.hasher.clone();
        let plain = password.to_owned();
        let password_hash = tokio::task::spawn_blocking(move || hasher.hash(&plain))
            .await
            .context("hash task")??;

        let user = self
            .repo
            .insert(NewUser {
                name: name.to_owned(),
                email: email.to_owned(),
                password_hash,
                role,
            })
            .await?;
        debug!(user_id = %user.id, role = %user.role, "user stored");
        Ok(user)
    }

    pub async fn verify_password(&self, user: &User, password: &str) -> anyhow::Result<bool> {
        self.verify_hash(password, &user.password_hash).await
    }

    /// Same Argon2 work as [`Self::verify_password`], against the decoy hash.
    /// Always `false`.
    pub async fn verify_decoy(&self, password: &str) -> anyhow::Result<bool> {
        self.verify_hash(password, &self.decoy_hash).await?;
        Ok(false)
    }

    async fn verify_hash(&self, password: &str, hash: &str) -> anyhow::Result<bool> {
        let hasher = self.hasher.clone();
        let plain = password.to_owned();
        let hash = hash.to_owned();
        tokio::task::spawn_blocking(move || hasher.verify(&plain, &hash))
            .await
            .context("verify task")?
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::{auth::memory::MemoryUserRepo, config::PasswordConfig};

    pub(crate) fn memory_store() -> CredentialStore {
        let hasher = PasswordHasher::new(&PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        })
        .unwrap();
        CredentialStore::new(Arc::new(MemoryUserRepo::new()), hasher).unwrap()
    }

    /// Store whose decoy hash cannot be parsed, so any decoy check errors.
    pub(crate) fn with_unparsable_decoy(mut store: CredentialStore) -> CredentialStore {
        store.decoy_hash = "not-a-phc-string".into();
        store
    }

    #[tokio::test]
    async fn create_hashes_password() {
        let store = memory_store();
        let user = store
            .create("Alice Smith", "alice@x.com", "secret1", Role::User)
            .await
            .unwrap();
        assert_ne!(user.password_hash, "secret1");
        assert!(user.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn verify_password_matches_only_registered() {
        let store = memory_store();
        let user = store
            .create("Alice Smith", "alice@x.com", "secret1", Role::User)
            .await
            .unwrap();
        assert!(store.verify_password(&user, "secret1").await.unwrap());
        assert!(!store.verify_password(&user, "secret2").await.unwrap());
        assert!(!store.verify_password(&user, "Secret1").await.unwrap());
    }

    #[tokio::test]
    async fn decoy_uses_configured_params_and_never_matches() {
        let store = memory_store();
        assert!(store.decoy_hash.starts_with("$argon2id$v=19$m=1024,t=1,p=1$"));
        assert!(!store.verify_decoy("secret1").await.unwrap());
        assert!(!store.verify_decoy("").await.unwrap());
    }

    #[tokio::test]
    async fn create_rejects_duplicate_email() {
        let store = memory_store();
        store
            .create("Alice Smith", "alice@x.com", "secret1", Role::User)
            .await
            .unwrap();
        let err = store
            .create("Alice Again", "alice@x.com", "other12", Role::Admin)
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
    }
}
