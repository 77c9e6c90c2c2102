pub mod client;
pub mod endpoints;
pub mod error;
pub mod file;
pub mod source;
pub mod types;

pub use client::ApiClient;
pub use endpoints::Endpoints;
pub use error::{ApiError, Result};
pub use file::FileSource;
pub use source::TicketSource;
pub use types::{
    LoginResponse, TicketLog, TicketLogs, TicketQr, Verification, VerificationOutcome,
};
