use std::sync::Arc;

use axum::extract::FromRef;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, FieldError, LoginRequest, RegisterRequest, UserSummary},
        jwt::JwtKeys,
        repo_types::User,
        store::CredentialStore,
    },
    error::AppError,
    state::AppState,
};

/// Registration and login on top of the credential store and token issuer.
#[derive(Clone)]
pub struct AuthService {
    users: CredentialStore,
    keys: Arc<JwtKeys>,
}

impl FromRef<AppState> for AuthService {
    fn from_ref(state: &AppState) -> Self {
        Self::new(state.users.clone(), state.keys.clone())
    }
}

impl AuthService {
    pub fn new(users: CredentialStore, keys: Arc<JwtKeys>) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<AuthResponse, AppError> {
        let reg = req.validate().map_err(first_violation)?;

        if self.users.find_by_email(&reg.email).await?.is_some() {
            warn!(email = %reg.email, "email already registered");
            return Err(AppError::DuplicateEmail);
        }

        // The repo enforces uniqueness again, closing the race with the check above.
        let user = self
            .users
            .create(&reg.name, &reg.email, &reg.password, reg.role)
            .await?;

        info!(user_id = %user.id, role = %user.role, "user registered");
        self.respond(&user)
    }

    pub async fn login(&self, req: LoginRequest) -> Result<AuthResponse, AppError> {
        let login = req.validate().map_err(first_violation)?;

        let Some(user) = self.users.find_by_email(&login.email).await? else {
            self.users.verify_decoy(&login.password).await?;
            warn!(email = %login.email, "login unknown email");
            return Err(AppError::InvalidCredentials);
        };

        if !self.users.verify_password(&user, &login.password).await? {
            warn!(user_id = %user.id, "login invalid password");
            return Err(AppError::InvalidCredentials);
        }

        info!(user_id = %user.id, "user logged in");
        self.respond(&user)
    }

    fn respond(&self, user: &User) -> Result<AuthResponse, AppError> {
        let token = self.keys.sign(user.id)?;
        Ok(AuthResponse {
            user: UserSummary::from(user),
            token,
        })
    }
}

fn first_violation(errors: Vec<FieldError>) -> AppError {
    let message = errors
        .into_iter()
        .next()
        .map(|e| e.message)
        .unwrap_or_else(|| "Invalid input".into());
    AppError::InvalidInput(message)
}
