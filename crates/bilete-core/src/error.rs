use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid phone number: {0}")]
    InvalidPhone(String),
    #[error("invalid items per page: {0}")]
    InvalidItemsPerPage(usize),
    #[error("ticket id is required")]
    MissingTicketId,
    #[error("invalid share link: {0}")]
    InvalidShareLink(String),
}
