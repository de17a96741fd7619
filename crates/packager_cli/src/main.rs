//! Server entry point.
//!
//! # Responsibility
//! - Parse configuration and start file logging.
//! - Open the database and serve the router until ctrl-c.

mod config;

use clap::Parser;
use config::Config;
use log::{error, info};
use packager_core::{init_logging, open_db, LogConfig};
use packager_web::{router, Store};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let config = Config::parse();
    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            error!("event=app_exit module=cli status=error");
            eprintln!("packager: {message}");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: Config) -> Result<(), String> {
    let log_dir = config
        .log_dir()
        .map_err(|err| format!("cannot resolve log directory: {err}"))?;
    init_logging(&LogConfig {
        level: config.log_level(),
        log_dir,
        echo_to_stderr: true,
    })?;

    let conn = open_db(&config.database)
        .map_err(|err| format!("cannot open `{}`: {err}", config.database.display()))?;
    let app = router(Store::new(conn));

    let addr = config.listen_addr();
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|err| format!("cannot listen on {addr}: {err}"))?;
    info!("event=server_start module=cli status=ok addr={addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| format!("server failed: {err}"))?;

    info!("event=server_stop module=cli status=ok");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        error!("event=signal_listen module=cli status=error error={err}");
    }
}
