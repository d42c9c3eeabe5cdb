pub mod cli;
pub mod core;
pub mod providers;
pub mod server;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{
    ConversionHistory, ConversionRecord, Converter, RateCache, RateResolver, RateSnapshot,
};
use anyhow::{Context, Result};
use std::sync::Arc;
use std::time::Duration;
use store::JsonFileStore;
use tracing::{debug, info, warn};

pub enum AppCommand {
    Serve { port: Option<u16> },
    Convert { amount: String, from: String, to: String },
    History,
    ClearHistory,
    Currencies,
}

/// Reads `.env`, the config file and environment overrides, in that order.
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    if let Ok(path) = dotenvy::dotenv() {
        debug!("Loaded environment from {}", path.display());
    }

    let mut config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    config.apply_env();
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

/// Wires the provider, file-backed stores and history into a converter.
pub fn build_converter(config: &AppConfig) -> Result<Converter> {
    if config.provider.api_key.is_none() {
        warn!(
            "{} is not set; rate requests are sent without credentials",
            crate::core::config::API_KEY_ENV
        );
    }

    let provider = providers::ExchangeRateApiProvider::new(
        &config.provider.base_url,
        config.provider.api_key.clone(),
        Duration::from_secs(config.provider.timeout_secs),
    )
    .context("Failed to create exchange rate client")?;

    let cache_path = config.cache_path()?;
    let history_path = config.history_path()?;
    debug!(
        "Rate cache at {}, history at {}",
        cache_path.display(),
        history_path.display()
    );

    let cache = RateCache::new(Arc::new(JsonFileStore::<RateSnapshot>::new(cache_path)));
    let history = ConversionHistory::new(
        Arc::new(JsonFileStore::<Vec<ConversionRecord>>::new(history_path)),
        config.history_limit,
    );
    let resolver = RateResolver::new(Arc::new(provider), cache.clone());

    Ok(Converter::new(resolver, cache, history))
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    let mut config = load_config(config_path)?;
    if let AppCommand::Serve { port: Some(port) } = &command {
        config.server.port = *port;
    }
    let converter = build_converter(&config)?;

    match command {
        AppCommand::Serve { .. } => {
            let addr = format!("{}:{}", config.server.host, config.server.port);
            let listener = tokio::net::TcpListener::bind(&addr)
                .await
                .with_context(|| format!("Failed to bind {addr}"))?;
            info!("Currency converter starting");
            server::serve(listener, converter).await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(&converter, &amount, &from, &to).await
        }
        AppCommand::History => {
            let records = converter.history().load().await;
            println!("{}", cli::history::display_history_table(&records));
            Ok(())
        }
        AppCommand::ClearHistory => {
            converter
                .history()
                .clear()
                .await
                .context("Failed to clear history")?;
            println!("History cleared");
            Ok(())
        }
        AppCommand::Currencies => {
            println!("{}", cli::currencies::display_currency_table());
            Ok(())
        }
    }
}
