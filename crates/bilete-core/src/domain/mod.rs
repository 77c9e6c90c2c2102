pub mod ids;
pub mod phone;
pub mod ticket;
pub mod ticket_type;

pub use ids::TicketId;
pub use phone::{is_valid_phone, normalize_phone, PhoneNumber};
pub use ticket::Ticket;
pub use ticket_type::TicketType;
