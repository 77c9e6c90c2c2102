use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, Result};
use bilete_api::{ApiClient, FileSource, TicketSource, VerificationOutcome};
use bilete_config::AppConfig;
use bilete_core::TicketId;
use chrono::Utc;

use crate::app::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Reload,
    ToggleSent(TicketId),
    Verify(TicketId),
}

/// Where tickets come from and, when online, where changes go.
pub struct Backend {
    source: Box<dyn TicketSource>,
    api: Option<ApiClient>,
}

impl Backend {
    pub fn from_config(config: &AppConfig, file: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = file {
            return Ok(Self::offline(path));
        }
        let api = ApiClient::new(
            &config.api.base_url,
            config.api.token.clone(),
            Duration::from_secs(config.api.timeout_secs),
        )?;
        Ok(Self {
            source: Box::new(api.clone()),
            api: Some(api),
        })
    }

    /// Browses an exported file; edits are refused.
    pub fn offline(path: PathBuf) -> Self {
        Self {
            source: Box::new(FileSource::new(path)),
            api: None,
        }
    }

    fn api(&self) -> Result<&ApiClient> {
        self.api
            .as_ref()
            .ok_or_else(|| anyhow!("read-only: tickets were loaded from a file"))
    }
}

pub fn execute_action(app: &mut App, backend: &Backend, action: Action) -> Result<()> {
    match action {
        Action::Reload => {
            let tickets = backend.source.fetch_tickets()?;
            let count = tickets.len();
            app.view.replace_tickets(tickets);
            app.clamp_selection();
            app.clear_error();
            app.set_status(format!(
                "loaded {count} tickets from {}",
                backend.source.source_name()
            ));
        }
        Action::ToggleSent(id) => {
            let api = backend.api()?;
            let sent = app
                .view
                .find(&id)
                .map(|ticket| !ticket.sent)
                .ok_or_else(|| anyhow!("ticket {id} is no longer listed"))?;
            api.set_sent(&id, sent)?;
            app.view.mark_sent(&id, sent, Utc::now());
            app.clamp_selection();
            app.clear_error();
            app.set_status(if sent {
                format!("{id} marked sent")
            } else {
                format!("{id} marked not sent")
            });
        }
        Action::Verify(id) => {
            let api = backend.api()?;
            match api.verify_id(&id)? {
                VerificationOutcome::Verified(verification) => {
                    app.view.record_verification(
                        &id,
                        true,
                        verification.verification_count,
                        verification.flagged,
                    );
                    app.clamp_selection();
                    if verification.flagged {
                        app.set_error(verification.warning.unwrap_or_else(|| {
                            format!(
                                "{id} already verified ({} check-ins)",
                                verification.verification_count
                            )
                        }));
                    } else {
                        app.clear_error();
                        app.set_status(format!("{id} verified"));
                    }
                }
                VerificationOutcome::Multiple { tickets } => {
                    app.set_status(format!("{} tickets match; verify by id", tickets.len()));
                }
            }
        }
    }
    Ok(())
}
