use gatekeeper::{app, config::AppConfig, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    gatekeeper::init_tracing();

    let config = AppConfig::from_env()?;
    let state = AppState::init(&config).await?;

    app::serve(app::build_app(state), &config.host, config.port).await
}
