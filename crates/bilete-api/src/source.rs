use bilete_core::Ticket;

use crate::Result;

/// Anything that can hand over the full ticket collection in one go.
pub trait TicketSource {
    fn source_name(&self) -> &'static str;
    fn fetch_tickets(&self) -> Result<Vec<Ticket>>;
}
