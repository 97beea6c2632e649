use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tms_core::{
    config::{Config, TelemetryConfig},
    jwt::JwtManager,
    migration,
    repository::{session::SessionRepositoryImpl, user::UserRepositoryImpl},
    server,
    service::AuthService,
    telemetry,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "tms-core")]
#[command(about = "Translation Management Service", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API (default)
    Serve,
    /// Apply database migrations and exit
    Migrate,
    /// Create a login account
    CreateUser {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init(&TelemetryConfig::from_env());

    let cli = Cli::parse();
    let config = Config::from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => {
            info!("Starting TMS Core Service");
            server::run(config).await
        }
        Command::Migrate => migration::run_migrations(&config).await,
        Command::CreateUser {
            name,
            email,
            password,
        } => {
            let pool = server::connect_pool(&config).await?;
            let auth_service = AuthService::new(
                Arc::new(UserRepositoryImpl::new(pool.clone())),
                Arc::new(SessionRepositoryImpl::new(pool.clone())),
                JwtManager::new(config.jwt.clone()),
            );
            let user = auth_service
                .create_user(&name, &email, &password)
                .await
                .context("Failed to create user")?;
            println!("Created user {} <{}>", user.id, user.email);
            pool.close().await;
            Ok(())
        }
    }
}
