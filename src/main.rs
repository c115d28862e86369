// src/main.rs

use clap::Parser;
use dotenvy::dotenv;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// Deklaracje modułów
mod api_client; // dla src/api_client.rs
mod category; // dla src/category.rs
mod cli; // dla src/cli.rs
mod draft; // dla src/draft.rs
mod errors; // dla src/errors.rs
mod form_controller; // dla src/form_controller.rs
mod list_controller; // dla src/list_controller.rs
mod models; // dla src/models.rs
mod payload; // dla src/payload.rs
mod ports; // dla src/ports.rs
mod state; // dla src/state.rs

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    dotenv().ok();

    // Inicjalizacja systemu logowania (tracing)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_admin=debug".into()), // np. RUST_LOG=info
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = cli.run().await {
        tracing::error!("Operacja nie powiodła się: {}", e);
        std::process::exit(if e.is_validation() { 2 } else { 1 });
    }
}
