pub mod cli;
pub mod core;
pub mod providers;
pub mod store;

use crate::core::config::AppConfig;
use crate::core::{Fetcher, ListSource};
use crate::providers::FrankfurterClient;
use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

pub enum AppCommand {
    Rates {
        filter: Option<String>,
        pages: usize,
    },
    Currencies {
        filter: Option<String>,
        pages: usize,
    },
    Convert {
        amount: String,
        from: String,
        to: String,
    },
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("xrates starting...");

    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");

    let client = FrankfurterClient::with_timeout(&config.api.base_url, config.timeout())?;
    let fetcher = Fetcher::new(Arc::new(client));

    match command {
        AppCommand::Rates { filter, pages } => {
            cli::list::run(
                &fetcher,
                ListSource::Rates,
                config.page_size,
                filter.as_deref(),
                pages,
            )
            .await
        }
        AppCommand::Currencies { filter, pages } => {
            cli::list::run(
                &fetcher,
                ListSource::Currencies,
                config.page_size,
                filter.as_deref(),
                pages,
            )
            .await
        }
        AppCommand::Convert { amount, from, to } => {
            cli::convert::run(
                &fetcher,
                config.ordering,
                config.page_size,
                &amount,
                &from,
                &to,
            )
            .await
        }
    }
}
