use shelf_api::config::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    shelf_observability::init();

    let config = AppConfig::from_env();
    tracing::info!(
        data_path = %config.data_path.display(),
        secondary_configured = config.secondary_redis_url.is_some(),
        "starting item catalog api"
    );

    let bind_addr = config.bind_addr.clone();
    let app = shelf_api::app::build_app(config);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
