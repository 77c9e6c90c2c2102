use anyhow::{Context as _, Result};
use bilete_api::{ApiClient, FileSource, TicketSource};
use bilete_config::AppConfig;
use bilete_core::Ticket;
use serde::Serialize;
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;
use tracing::debug;

pub mod auth;
pub mod completions;
pub mod phone;
pub mod tickets;
pub mod verify;

pub const CURRENCY: &str = "RON";

pub struct Context<'a> {
    pub json: bool,
    pub config: &'a AppConfig,
}

impl Context<'_> {
    pub fn api(&self) -> Result<ApiClient> {
        let api = &self.config.api;
        ApiClient::new(
            &api.base_url,
            api.token.clone(),
            Duration::from_secs(api.timeout_secs),
        )
        .with_context(|| format!("configure api client for {}", api.base_url))
    }

    /// Loads the full collection from an exported file when one is given,
    /// otherwise from the API.
    pub fn load_tickets(&self, file: Option<&Path>) -> Result<Vec<Ticket>> {
        let source: Box<dyn TicketSource> = match file {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(self.api()?),
        };
        let tickets = source
            .fetch_tickets()
            .with_context(|| format!("load tickets from {}", source.source_name()))?;
        debug!(source = source.source_name(), count = tickets.len(), "tickets loaded");
        Ok(tickets)
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let mut stdout = io::stdout().lock();
    serde_json::to_writer_pretty(&mut stdout, value)?;
    writeln!(stdout)?;
    Ok(())
}
