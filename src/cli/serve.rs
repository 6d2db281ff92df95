use crate::api;
use crate::cli::commands::ServeArgs;
use crate::config::CtemConfig;
use crate::errors::CtemError;
use tracing::info;

pub async fn handle_serve(args: ServeArgs, mut config: CtemConfig) -> Result<(), CtemError> {
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    info!(host = %config.server.host, port = config.server.port, "Starting API server");

    let state = api::create_app_state(&config)?;
    let app = api::build_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| CtemError::Internal(format!("Server error: {}", e)))?;

    Ok(())
}
