//! Robot protocol server binary.

use std::process::ExitCode;

use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use robot_server::{DEFAULT_PORT, Server, ServerConfig};

/// Robot protocol server.
///
/// Listens for robot connections, handles the login handshake and stores
/// transferred photos in the working directory.
#[derive(Debug, Parser)]
#[command(name = "robot-server", version, about)]
struct Cli {
    /// TCP port to listen on.
    #[arg(default_value_t = DEFAULT_PORT)]
    port: u16,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let config = ServerConfig { port: cli.port, ..ServerConfig::default() };

    let server = match Server::bind(config).await {
        Ok(server) => server,
        Err(error) => {
            error!(%error, port = cli.port, "could not listen on port");
            return ExitCode::FAILURE;
        },
    };

    if let Err(error) = server.run().await {
        error!(%error, "server stopped");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
