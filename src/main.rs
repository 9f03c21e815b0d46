use std::process::ExitCode;

use skycoin_explorer::config::load_config;
use skycoin_explorer::lifecycle::signals::shutdown_on_signal;
use skycoin_explorer::net::Listener;
use skycoin_explorer::observability::init_logging;
use skycoin_explorer::{Cli, HttpServer, RouteTable, Shutdown};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::from_env();
    init_logging(cli.log_format);

    tracing::info!("skycoin-explorer v{} starting", env!("CARGO_PKG_VERSION"));

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return ExitCode::FAILURE;
        }
    };

    tracing::info!(
        bind_address = %config.listener.bind_address,
        node = %config.upstream.node,
        api_only = config.site.api_only,
        "Configuration loaded"
    );

    let server = match HttpServer::new(config, RouteTable::default()) {
        Ok(server) => server,
        Err(e) => {
            tracing::error!(error = %e, "Failed to initialize server");
            return ExitCode::FAILURE;
        }
    };

    let listener = match Listener::bind(&server.config().listener).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!(error = %e, "Fatal");
            return ExitCode::FAILURE;
        }
    };

    let shutdown = Shutdown::new();
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(shutdown_on_signal(shutdown));

    if let Err(e) = server.run(listener, server_shutdown).await {
        tracing::error!(error = %e, "Fatal");
        return ExitCode::FAILURE;
    }

    tracing::info!("Shutdown complete");
    ExitCode::SUCCESS
}
