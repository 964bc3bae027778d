use gatekeeper::{
    config::AppConfig,
    seed::{seed_admin, SeedOutcome, DEFAULT_ADMIN_PASSWORD},
    state::AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    gatekeeper::init_tracing();

    let config = AppConfig::from_env()?;
    let state = AppState::init(&config).await?;
    let password =
        std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| DEFAULT_ADMIN_PASSWORD.to_string());

    match seed_admin(&state.users, &password).await {
        Ok(SeedOutcome::Created(user)) => {
            tracing::info!(user_id = %user.id, "admin user created successfully");
            if password == DEFAULT_ADMIN_PASSWORD {
                tracing::warn!("admin uses the default password; set ADMIN_PASSWORD");
            }
        }
        Ok(SeedOutcome::AlreadyExists) => tracing::info!("admin user already exists"),
        Err(e) => {
            tracing::error!(error = ?e, "error seeding admin user");
            return Err(e);
        }
    }
    Ok(())
}
