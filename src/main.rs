mod domain;
mod clients;

mod app_system;
mod auth;
mod http;
mod payment;

#[cfg(test)]
mod mock_framework;

mod actor_framework;
mod user_actor;
mod product_actor;
mod order_actor;

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::app_system::{setup_tracing, AppConfig, SeedData, StoreSystem, SystemError};
use crate::auth::JwtAuth;
use crate::payment::{LogMailer, Mailer, PaymentProcessor, SmtpMailer, StripeProcessor};

#[derive(Parser, Debug)]
#[command(name = "storefront")]
#[command(version, about = "Order checkout and payment API", long_about = None)]
struct Cli {
    /// Path to the TOML configuration file. A missing file means defaults.
    #[arg(short, long, env = "STOREFRONT_CONFIG", default_value = "storefront.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run the HTTP server (default)
    Serve,
    /// Print a signed token for a seeded user
    Token {
        #[arg(long)]
        user: Uuid,
        /// Overrides `auth.token_ttl_hours`
        #[arg(long)]
        ttl_hours: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<(), SystemError> {
    let cli = Cli::parse();
    let config = AppConfig::load(&cli.config)?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);

    let seed = match &config.seed_file {
        Some(path) => SeedData::load(path)?,
        None => SeedData::default(),
    };

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(config, seed).await,
        Command::Token { user, ttl_hours } => mint_token(&config, &seed, user, ttl_hours),
    }
}

async fn serve(config: AppConfig, seed: SeedData) -> Result<(), SystemError> {
    info!(
        users = seed.users.len(),
        products = seed.products.len(),
        "Starting storefront"
    );

    if config.payment.secret_key.is_empty() {
        warn!("No payment secret configured; every charge will be refused by the processor");
    }
    let processor: Arc<dyn PaymentProcessor> = Arc::new(StripeProcessor::new(&config.payment)?);

    let mailer: Arc<dyn Mailer> = match &config.mail.smtp_url {
        Some(url) => Arc::new(SmtpMailer::from_url(url, &config.mail.from)?),
        None => {
            info!("No SMTP relay configured, receipts will only be logged");
            Arc::new(LogMailer)
        }
    };

    let system = StoreSystem::start(&config, seed, processor, mailer);
    let app = http::router(system.state());

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    info!(addr = %listener.local_addr()?, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Shutdown system gracefully
    system.shutdown().await?;
    info!("Storefront stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown requested"),
        Err(e) => error!(error = %e, "Could not listen for ctrl-c, shutting down"),
    }
}

fn mint_token(config: &AppConfig, seed: &SeedData, user_id: Uuid, ttl_hours: Option<i64>) -> Result<(), SystemError> {
    let user = seed.user(user_id).ok_or(SystemError::UnknownUser(user_id))?;
    let ttl = chrono::Duration::hours(ttl_hours.unwrap_or(config.auth.token_ttl_hours));
    let token = JwtAuth::new(config.auth.jwt_secret.as_bytes()).issue(user, ttl)?;
    println!("{token}");
    Ok(())
}
