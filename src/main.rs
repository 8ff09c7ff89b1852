use clap::{Parser, Subcommand};
use std::sync::Arc;
use tracing::info;

use funko_api::config::Config;
use funko_api::db::SqliteFunkoRepository;
use funko_api::logging;
use funko_api::metrics;
use funko_api::repository::{seed_sample_data, FunkoRepository, InMemoryFunkoRepository};
use funko_api::server::{start_server, AppState};
use funko_api::service::FunkoService;

#[derive(Parser)]
#[command(name = "funko_api")]
#[command(about = "REST API for a Funko collectibles catalog")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port to bind (overrides config)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Apply database migrations and exit
    Migrate,
    /// Insert the sample catalog and exit
    Seed,
}

fn open_repository(config: &Config) -> anyhow::Result<Arc<dyn FunkoRepository>> {
    let repository: Arc<dyn FunkoRepository> = match config.storage.backend.as_str() {
        "memory" => Arc::new(InMemoryFunkoRepository::new()),
        _ => Arc::new(SqliteFunkoRepository::open(&config.storage.sqlite_path)?),
    };
    Ok(repository)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load()?;

    match cli.command.unwrap_or(Commands::Serve { port: None }) {
        Commands::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            let repository = open_repository(&config)?;
            if config.storage.seed_sample_data {
                let inserted = seed_sample_data(repository.as_ref()).await?;
                if inserted > 0 {
                    info!("seeded {} sample funkos", inserted);
                }
            }
            let state = AppState {
                service: Arc::new(FunkoService::new(repository)),
                metrics: metrics::install_prometheus()?,
            };
            start_server(state, &config).await?;
        }
        Commands::Migrate => {
            // open() applies migrations
            SqliteFunkoRepository::open(&config.storage.sqlite_path)?;
            println!("✅ migrations applied to {}", config.storage.sqlite_path);
        }
        Commands::Seed => {
            let repository = open_repository(&config)?;
            let inserted = seed_sample_data(repository.as_ref()).await?;
            println!("🌱 inserted {} sample funkos", inserted);
        }
    }

    Ok(())
}
