use std::io;

use anyhow::Result;
use dotenvy::dotenv;
use tracing::info;

use parking_ledger::cli::Menu;
use parking_ledger::config::{DatabaseConfig, EnvironmentConfig};
use parking_ledger::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Cargar variables de entorno
    dotenv().ok();

    let config = EnvironmentConfig::from_env()?;

    // Configurar logging (stderr, para no mezclarse con el menú)
    init_tracing(&config.log_level);

    info!("🅿️ Sistema de Parqueo - puerta {}", config.gate);
    info!("   Tarifa por hora: {}", config.rate_per_hour);

    let database = DatabaseConfig::from_env()?;
    let state = AppState::connect(&config, &database).await?;

    let stdin = io::stdin();
    let stdout = io::stdout();
    Menu::new(&state.parking_service, stdin.lock(), stdout.lock())
        .run()
        .await?;

    info!("👋 Sistema de parqueo terminado");
    Ok(())
}

fn init_tracing(level: &str) {
    let level = level
        .parse::<tracing::Level>()
        .unwrap_or(tracing::Level::WARN);

    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();
}
