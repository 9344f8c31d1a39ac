use quickfilings::{api, core::config::QuickFilingsConfig, init};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::init();

    let config = QuickFilingsConfig::from_env()?;
    let state = init::initialize_app_state(&config)?;
    let app = api::router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_address()).await?;
    log::info!(
        "Starting server on host {} and port {}",
        config.host,
        config.port
    );
    axum::serve(listener, app).await?;

    Ok(())
}
