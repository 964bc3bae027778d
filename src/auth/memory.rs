use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::auth::{
    repo::{StoreError, UserRepo},
    repo_types::{NewUser, User},
};

/// In-process user repo. Used by tests and for running without Postgres.
#[derive(Default)]
pub struct MemoryUserRepo {
    users: RwLock<HashMap<Uuid, User>>,
}

impl MemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for MemoryUserRepo {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<User>> {
        Ok(self.users.read().await.get(&id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        let mut all: Vec<User> = self.users.read().await.values().cloned().collect();
        all.sort_by_key(|u| u.created_at);
        Ok(all)
    }

    async fn insert(&self, user: NewUser) -> Result<User, StoreError> {
        // check and insert under one write guard
        let mut users = self.users.write().await;
        if users.values().any(|u| u.email == user.email) {
            return Err(StoreError::DuplicateEmail);
        }
        let created = User {
            id: Uuid::new_v4(),
            name: user.name,
            email: user.email,
            password_hash: user.password_hash,
            role: user.role,
            created_at: OffsetDateTime::now_utc(),
        };
        users.insert(created.id, created.clone());
        Ok(created)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::auth::repo_types::Role;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Alice Smith".into(),
            email: email.into(),
            password_hash: "hash".into(),
            role: Role::User,
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = MemoryUserRepo::new();
        let user = repo.insert(new_user("alice@x.com")).await.unwrap();

        let by_email = repo.find_by_email("alice@x.com").await.unwrap().unwrap();
        assert_eq!(by_email.id, user.id);
        let by_id = repo.find_by_id(user.id).await.unwrap().unwrap();
        assert_eq!(by_id.email, "alice@x.com");
        assert!(repo.find_by_email("bob@x.com").await.unwrap().is_none());
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn email_lookup_is_case_sensitive() {
        let repo = MemoryUserRepo::new();
        repo.insert(new_user("alice@x.com")).await.unwrap();
        assert!(repo.find_by_email("Alice@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let repo = MemoryUserRepo::new();
        repo.insert(new_user("alice@x.com")).await.unwrap();
        let err = repo.insert(new_user("alice@x.com")).await.unwrap_err();
        assert!(matches!(err, StoreError::DuplicateEmail));
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_inserts_of_same_email_keep_one() {
        let repo = Arc::new(MemoryUserRepo::new());
        let tasks: Vec<_> = (0..16)
            .map(|_| {
                let repo = repo.clone();
                tokio::spawn(async move { repo.insert(new_user("race@x.com")).await })
            })
            .collect();

        let mut ok = 0;
        for t in tasks {
            match t.await.unwrap() {
                Ok(_) => ok += 1,
                Err(StoreError::DuplicateEmail) => {}
                Err(e) => panic!("unexpected error: {e}"),
            }
        }
        assert_eq!(ok, 1);
        assert_eq!(repo.list_all().await.unwrap().len(), 1);
    }
}
