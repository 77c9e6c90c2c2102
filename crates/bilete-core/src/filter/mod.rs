mod criteria;
mod parser;

use thiserror::Error;

pub use criteria::{apply_filters, FilterCriteria, SentFilter, StatusFilter, TypeFilter};
pub use parser::parse_filter;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FilterParseError {
    #[error("invalid status selector: {0}")]
    InvalidStatusSelector(String),
    #[error("invalid sent selector: {0}")]
    InvalidSentSelector(String),
    #[error("empty type selector")]
    EmptyType,
    #[error("unterminated quote in filter")]
    UnterminatedQuote,
}
