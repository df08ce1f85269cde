//! marknote summarize server.
//!
//! Default: http://127.0.0.1:3000/api/summarize

use log::{error, info};
use marknote_server::{
    router, ApiKeySource, AppState, ChatCompletionClient, EnvApiKey, ServerConfig,
};
use std::process::ExitCode;
use std::sync::Arc;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("marknote-server: {err}");
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = marknote_core::init_stderr_logging(&config.log_level) {
        eprintln!("marknote-server: {err}");
        return ExitCode::FAILURE;
    }

    let api_key = EnvApiKey::default();
    if api_key.api_key().is_none() {
        // Not fatal: requests answer with a configuration error until it is set.
        error!("event=server_start module=server status=degraded reason=api_key_missing");
    }

    let state = Arc::new(AppState::new(
        ChatCompletionClient::new(config.provider.clone()),
        api_key,
    ));
    let app = router(state);

    let listener = match tokio::net::TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(err) => {
            error!(
                "event=server_start module=server status=error addr={} error={err}",
                config.bind_addr
            );
            return ExitCode::FAILURE;
        }
    };
    info!(
        "event=server_start module=server status=ok addr={} model={}",
        config.bind_addr, config.provider.model
    );

    if let Err(err) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("event=server_stop module=server status=error error={err}");
        return ExitCode::FAILURE;
    }
    info!("event=server_stop module=server status=ok");
    ExitCode::SUCCESS
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=server_signal module=server status=error error={err}");
        std::future::pending::<()>().await;
    }
}
