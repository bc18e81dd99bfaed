use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use netanya_incident_service::clients::create_submission_client;
use netanya_incident_service::config::AppConfig;
use netanya_incident_service::logging::init_logging;
use netanya_incident_service::mock_server::{mock_router, MockState};
use netanya_incident_service::server::{app_router, AppState};
use netanya_incident_service::service::IncidentService;

#[derive(Parser)]
#[command(name = "netanya-incident-service")]
#[command(about = "Municipal incident-reporting backend for the Netanya SharePoint API")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the incident submission API server
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Run the mock SharePoint service for local testing
    MockSharepoint {
        /// Port to listen on
        #[arg(long, default_value_t = 8080)]
        port: u16,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    // Fail fast on configuration errors
    let config = AppConfig::load()?;

    init_logging(&config.log_level);

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.port);
            let client = create_submission_client(&config)?;
            let service = Arc::new(IncidentService::new(client));
            let state = AppState {
                config: Arc::new(config),
                service,
            };

            let app = app_router(state);
            let bind_addr = format!("0.0.0.0:{}", port);
            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            info!("Incident service listening on {}", bind_addr);
            println!("🏙️  Incident service listening on {bind_addr}");
            axum::serve(listener, app).await?;
        }
        Commands::MockSharepoint { port } => {
            let app = mock_router(MockState::new());
            let bind_addr = format!("0.0.0.0:{}", port);
            let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
            info!("Mock SharePoint service listening on {}", bind_addr);
            println!("🧪 Mock SharePoint service listening on {bind_addr}");
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
