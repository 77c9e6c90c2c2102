use std::fs;
use std::path::{Path, PathBuf};

use bilete_core::Ticket;
use serde::Deserialize;

use crate::source::TicketSource;
use crate::{ApiError, Result};

/// Tickets exported to disk, either as a bare array or as the API's
/// `{"tickets": [...]}` envelope.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TicketSource for FileSource {
    fn source_name(&self) -> &'static str {
        "file"
    }

    fn fetch_tickets(&self) -> Result<Vec<Ticket>> {
        let raw = fs::read_to_string(&self.path)?;
        parse_tickets(&raw)
            .map_err(|err| ApiError::Parse(format!("{}: {err}", self.path.display())))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TicketDocument {
    Bare(Vec<Ticket>),
    Envelope { tickets: Vec<Ticket> },
}

pub fn parse_tickets(raw: &str) -> std::result::Result<Vec<Ticket>, serde_json::Error> {
    let document: TicketDocument = serde_json::from_str(raw)?;
    Ok(match document {
        TicketDocument::Bare(tickets) => tickets,
        TicketDocument::Envelope { tickets } => tickets,
    })
}

#[cfg(test)]
mod tests {
    use super::{parse_tickets, FileSource};
    use crate::{ApiError, TicketSource};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn reads_bare_array() {
        let tickets = parse_tickets(r#"[{"id":"1","nume":"Ana"},{"_id":"2"}]"#).unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].nume, "Ana");
    }

    #[test]
    fn reads_envelope() {
        let tickets = parse_tickets(r#"{"tickets":[{"_id":"x","tip_bilet":"BAL"}]}"#).unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].tip_bilet.label(), "BAL");
    }

    #[test]
    fn missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let source = FileSource::new(dir.path().join("absent.json"));
        assert!(matches!(source.fetch_tickets(), Err(ApiError::Io(_))));
    }

    #[test]
    fn malformed_file_names_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{{\"tickets\": 3}}").unwrap();
        let source = FileSource::new(file.path());
        let err = source.fetch_tickets().unwrap_err();
        assert!(err.to_string().contains(&file.path().display().to_string()));
    }
}
