use anyhow::Result;
use bilete_core::{Ticket, TicketId, TicketType};
use chrono::{DateTime, Local, Utc};

use crate::error::invalid_input;

pub fn parse_ticket_id(raw: &str) -> Result<TicketId> {
    TicketId::new(raw).map_err(|_| invalid_input("ticket id cannot be empty"))
}

/// Only the types the box office sells can be assigned to a ticket.
pub fn parse_known_type(raw: &str) -> Result<TicketType> {
    let ticket_type = TicketType::from_label(raw.trim());
    if ticket_type.is_known() {
        return Ok(ticket_type);
    }
    let known = TicketType::KNOWN
        .iter()
        .map(|known| format!("\"{known}\""))
        .collect::<Vec<_>>()
        .join(", ");
    Err(invalid_input(format!(
        "unknown ticket type {:?}: expected one of {known}",
        raw.trim()
    )))
}

pub fn format_datetime(ts: Option<DateTime<Utc>>) -> String {
    ts.map(|dt| dt.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| "-".to_string())
}

pub fn status_label(ticket: &Ticket) -> String {
    match (ticket.verified, ticket.verification_count) {
        (false, _) => "pending".to_string(),
        (true, count) if count > 1 => format!("verified x{count}"),
        (true, _) => "verified".to_string(),
    }
}

pub fn sent_label(sent: bool) -> &'static str {
    if sent {
        "sent"
    } else {
        "not sent"
    }
}
