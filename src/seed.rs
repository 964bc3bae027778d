use tracing::info;

use crate::auth::{
    repo::StoreError,
    repo_types::{Role, User},
    store::CredentialStore,
};

pub const ADMIN_NAME: &str = "Admin User";
pub const ADMIN_EMAIL: &str = "admin@example.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "password123";

#[derive(Debug)]
pub enum SeedOutcome {
    Created(User),
    AlreadyExists,
}

/// Inserts the default admin unless an account with [`ADMIN_EMAIL`] exists.
pub async fn seed_admin(users: &CredentialStore, password: &str) -> anyhow::Result<SeedOutcome> {
    if users.find_by_email(ADMIN_EMAIL).await?.is_some() {
        info!(email = ADMIN_EMAIL, "admin user already exists");
        return Ok(SeedOutcome::AlreadyExists);
    }

    match users.create(ADMIN_NAME, ADMIN_EMAIL, password, Role::Admin).await {
        Ok(user) => {
            info!(user_id = %user.id, email = ADMIN_EMAIL, "admin user created");
            Ok(SeedOutcome::Created(user))
        }
        // lost a race with another seeder
        Err(StoreError::DuplicateEmail) => Ok(SeedOutcome::AlreadyExists),
        Err(StoreError::Other(e)) => Err(e),
    }
}
