use bilete_core::TicketId;
use url::Url;

use crate::{ApiError, Result};

/// URL layout of the ticket API, rooted at its `/api` base.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    base: Url,
}

impl Endpoints {
    pub fn new(base_url: &str) -> Result<Self> {
        let base = Url::parse(base_url.trim().trim_end_matches('/'))?;
        if !matches!(base.scheme(), "http" | "https") {
            return Err(ApiError::Parse(format!(
                "api base url must use http or https: {base_url}"
            )));
        }
        if base.cannot_be_a_base() {
            return Err(ApiError::Parse(format!("invalid api base url: {base_url}")));
        }
        Ok(Self { base })
    }

    pub fn base(&self) -> &Url {
        &self.base
    }

    /// The health check lives next to the API root, not under it.
    pub fn health(&self) -> Url {
        let mut url = self.base.clone();
        let mut keep: Vec<String> = self
            .base
            .path_segments()
            .map(|segments| {
                segments
                    .filter(|segment| !segment.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        if keep.last().map(String::as_str) == Some("api") {
            keep.pop();
        }
        url.set_path("");
        self.push(&mut url, keep.iter().map(String::as_str).chain(["health"]));
        url
    }

    pub fn login(&self) -> Url {
        self.join(["login"])
    }

    pub fn register(&self) -> Url {
        self.join(["register"])
    }

    pub fn tickets(&self) -> Url {
        self.join(["tickets"])
    }

    pub fn ticket(&self, id: &TicketId) -> Url {
        self.join(["tickets", id.as_str()])
    }

    pub fn ticket_sent(&self, id: &TicketId) -> Url {
        self.join(["tickets", id.as_str(), "sent"])
    }

    pub fn ticket_type(&self, id: &TicketId) -> Url {
        self.join(["tickets", id.as_str(), "type"])
    }

    pub fn ticket_qr(&self, id: &TicketId) -> Url {
        self.join(["tickets", id.as_str(), "qr"])
    }

    /// Rendered ticket image; served without authentication.
    pub fn ticket_public(&self, id: &TicketId) -> Url {
        self.join(["tickets", id.as_str(), "custom-public"])
    }

    pub fn ticket_logs(&self, group: &str) -> Url {
        self.join(["admin", "tickets-logs", group])
    }

    pub fn verify_qr(&self) -> Url {
        self.join(["verify-ticket"])
    }

    pub fn verify_phone(&self) -> Url {
        self.join(["verify-ticket-by-phone"])
    }

    pub fn verify_id(&self, id: &TicketId) -> Url {
        self.join(["verify-ticket-by-id", id.as_str()])
    }

    fn join<'a, I>(&self, segments: I) -> Url
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut url = self.base.clone();
        self.push(&mut url, segments);
        url
    }

    fn push<'a, I>(&self, url: &mut Url, segments: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Endpoints;
    use bilete_core::TicketId;

    fn endpoints() -> Endpoints {
        Endpoints::new("http://localhost:3001/api/").unwrap()
    }

    #[test]
    fn builds_ticket_paths() {
        let id = TicketId::new("65f1").unwrap();
        let endpoints = endpoints();
        assert_eq!(endpoints.tickets().as_str(), "http://localhost:3001/api/tickets");
        assert_eq!(
            endpoints.ticket_sent(&id).as_str(),
            "http://localhost:3001/api/tickets/65f1/sent"
        );
        assert_eq!(
            endpoints.verify_id(&id).as_str(),
            "http://localhost:3001/api/verify-ticket-by-id/65f1"
        );
    }

    #[test]
    fn builds_qr_register_and_log_paths() {
        let id = TicketId::new("65f1").unwrap();
        let endpoints = endpoints();
        assert_eq!(endpoints.register().as_str(), "http://localhost:3001/api/register");
        assert_eq!(
            endpoints.ticket_qr(&id).as_str(),
            "http://localhost:3001/api/tickets/65f1/qr"
        );
        assert_eq!(
            endpoints.ticket_public(&id).as_str(),
            "http://localhost:3001/api/tickets/65f1/custom-public"
        );
        assert_eq!(
            endpoints.ticket_logs("Liceul 2").as_str(),
            "http://localhost:3001/api/admin/tickets-logs/Liceul%202"
        );
    }

    #[test]
    fn ids_are_percent_encoded() {
        let id = TicketId::new("a/b c").unwrap();
        assert_eq!(
            endpoints().ticket(&id).as_str(),
            "http://localhost:3001/api/tickets/a%2Fb%20c"
        );
    }

    #[test]
    fn health_sits_beside_api_root() {
        assert_eq!(endpoints().health().as_str(), "http://localhost:3001/health");
        let nested = Endpoints::new("https://example.test/v2/api").unwrap();
        assert_eq!(nested.health().as_str(), "https://example.test/v2/health");
        let bare = Endpoints::new("https://example.test").unwrap();
        assert_eq!(bare.health().as_str(), "https://example.test/health");
    }

    #[test]
    fn rejects_other_schemes() {
        assert!(Endpoints::new("ftp://example.test/api").is_err());
        assert!(Endpoints::new("not a url").is_err());
    }
}
