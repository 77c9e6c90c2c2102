use url::Url;

use crate::domain::{PhoneNumber, Ticket, TicketId};
use crate::error::CoreError;

const WHATSAPP_BASE: &str = "https://wa.me/";

/// Public page where a ticket holder can view and download the ticket.
pub fn ticket_public_link(public_base_url: &str, id: &TicketId) -> String {
    format!(
        "{}/tickets/{}/custom-public",
        public_base_url.trim_end_matches('/'),
        id
    )
}

pub fn ticket_message(ticket: &Ticket, public_base_url: &str) -> String {
    let link = ticket_public_link(public_base_url, &ticket.id);
    format!(
        "*Bilet {tip}*\n\n*Nume:* {nume}\n*Telefon:* {telefon}\n*Tip bilet:* {tip}\n\n*Vezi și descarcă biletul:* {link}",
        tip = ticket.tip_bilet,
        nume = ticket.nume,
        telefon = ticket.telefon,
    )
}

/// `wa.me` link opening a chat with `phone` prefilled with `message`.
///
/// Only numbers that normalize to canonical `+40` form get a link.
pub fn whatsapp_link(phone: &str, message: &str) -> Result<String, CoreError> {
    let phone = PhoneNumber::parse(phone)?;
    let mut url = Url::parse(WHATSAPP_BASE)
        .and_then(|base| base.join(phone.whatsapp_digits()))
        .map_err(|err| CoreError::InvalidShareLink(err.to_string()))?;
    url.query_pairs_mut().append_pair("text", message);
    Ok(url.into())
}

pub fn ticket_whatsapp_link(ticket: &Ticket, public_base_url: &str) -> Result<String, CoreError> {
    whatsapp_link(&ticket.telefon, &ticket_message(ticket, public_base_url))
}
