pub mod domain;
pub mod dto;
pub mod error;
pub mod filter;
pub mod pricing;
pub mod scan;
pub mod share;
pub mod view;

pub use domain::*;
pub use dto::*;
pub use error::CoreError;
pub use filter::{apply_filters, parse_filter, FilterCriteria, FilterParseError};
pub use pricing::{summarize, PriceTable, TicketSummary};
pub use view::{paginate, Page, TicketListView, ViewSnapshot};
