use crate::source::TicketSource;
use crate::{ApiError, Result};

#[cfg(feature = "http")]
mod imp {
    use super::{ApiError, Result, TicketSource};
    use crate::endpoints::Endpoints;
    use crate::types::{
        decode_registration, decode_response, decode_ticket_list, decode_ticket_logs,
        decode_verification, ensure_success, CreateTicketRequest, CreatedTicket, LoginRequest,
        LoginResponse, RegisterRequest, SentUpdate, TicketLogs, TicketQr, TypeUpdate,
        VerificationOutcome, VerifyPhoneRequest, VerifyQrRequest,
    };
    use bilete_core::{PhoneNumber, Ticket, TicketId, TicketType};
    use reqwest::blocking::{Client, RequestBuilder};
    use serde::Deserialize;
    use std::time::Duration;
    use tracing::{debug, warn};

    #[derive(Debug, Clone)]
    pub struct ApiClient {
        endpoints: Endpoints,
        token: Option<String>,
        http: Client,
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum SingleTicket {
        Wrapped { ticket: Ticket },
        Bare(Ticket),
    }

    impl ApiClient {
        pub fn new(base_url: &str, token: Option<String>, timeout: Duration) -> Result<Self> {
            let endpoints = Endpoints::new(base_url)?;
            let http = Client::builder()
                .user_agent(concat!("bilete/", env!("CARGO_PKG_VERSION")))
                .timeout(timeout)
                .connect_timeout(Duration::from_secs(10))
                .build()?;
            Ok(Self {
                endpoints,
                token,
                http,
            })
        }

        pub fn endpoints(&self) -> &Endpoints {
            &self.endpoints
        }

        fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
            match &self.token {
                Some(token) => request.bearer_auth(token),
                None => request,
            }
        }

        fn send(&self, request: RequestBuilder) -> Result<(u16, String)> {
            let response = self.authorized(request).send()?;
            let status = response.status().as_u16();
            let body = response.text()?;
            debug!(status, bytes = body.len(), "api response");
            Ok((status, body))
        }

        fn send_bytes(&self, request: RequestBuilder) -> Result<Vec<u8>> {
            let response = self.authorized(request).send()?;
            let status = response.status().as_u16();
            let body = response.bytes()?;
            debug!(status, bytes = body.len(), "api response");
            ensure_success(status, &String::from_utf8_lossy(&body))?;
            Ok(body.to_vec())
        }

        pub fn health(&self) -> Result<()> {
            let url = self.endpoints.health();
            debug!(%url, "health check");
            let (status, body) = self.send(self.http.get(url))?;
            ensure_success(status, &body)
        }

        pub fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
            let url = self.endpoints.login();
            debug!(%url, username, "login");
            let request = self
                .http
                .post(url)
                .json(&LoginRequest { username, password });
            let (status, body) = self.send(request)?;
            decode_response(status, &body)
        }

        pub fn register(
            &self,
            username: &str,
            password: &str,
            referral_code: &str,
        ) -> Result<LoginResponse> {
            let username = username.trim();
            let referral_code = referral_code.trim();
            if username.is_empty() || referral_code.is_empty() {
                return Err(ApiError::Parse(
                    "username and referral code are required".to_string(),
                ));
            }
            let url = self.endpoints.register();
            debug!(%url, username, "register");
            let request = self.http.post(url).json(&RegisterRequest {
                username,
                password,
                referral_code,
            });
            let (status, body) = self.send(request)?;
            decode_registration(status, &body)
        }

        pub fn list_tickets(&self) -> Result<Vec<Ticket>> {
            let url = self.endpoints.tickets();
            debug!(%url, "list tickets");
            let (status, body) = self.send(self.http.get(url))?;
            let tickets = decode_ticket_list(status, &body)?;
            debug!(count = tickets.len(), "tickets loaded");
            Ok(tickets)
        }

        pub fn get_ticket(&self, id: &TicketId) -> Result<Ticket> {
            let (status, body) = self.send(self.http.get(self.endpoints.ticket(id)))?;
            Ok(match decode_response::<SingleTicket>(status, &body)? {
                SingleTicket::Wrapped { ticket } => ticket,
                SingleTicket::Bare(ticket) => ticket,
            })
        }

        pub fn ticket_qr(&self, id: &TicketId) -> Result<TicketQr> {
            let (status, body) = self.send(self.http.get(self.endpoints.ticket_qr(id)))?;
            decode_response(status, &body)
        }

        /// Downloads the rendered ticket image.
        pub fn download_ticket(&self, id: &TicketId) -> Result<Vec<u8>> {
            let url = self.endpoints.ticket_public(id);
            debug!(%url, "download ticket");
            self.send_bytes(self.http.get(url))
        }

        pub fn ticket_logs(&self, group: &str) -> Result<TicketLogs> {
            let group = group.trim();
            if group.is_empty() {
                return Err(ApiError::Parse("group is required".to_string()));
            }
            let url = self.endpoints.ticket_logs(group);
            debug!(%url, "ticket logs");
            let (status, body) = self.send(self.http.get(url))?;
            decode_ticket_logs(group, status, &body)
        }

        pub fn create_ticket(
            &self,
            nume: &str,
            telefon: &str,
            tip_bilet: &TicketType,
        ) -> Result<Ticket> {
            let nume = nume.trim();
            if nume.is_empty() {
                return Err(ApiError::Parse("ticket name is required".to_string()));
            }
            let phone = PhoneNumber::parse(telefon)?;
            let request = self.http.post(self.endpoints.tickets()).json(&CreateTicketRequest {
                nume,
                telefon: phone.as_str(),
                tip_bilet: tip_bilet.label(),
            });
            let (status, body) = self.send(request)?;
            let created: CreatedTicket = decode_response(status, &body)?;
            debug!(id = %created.ticket.id, "ticket created");
            Ok(created.ticket)
        }

        pub fn set_sent(&self, id: &TicketId, sent: bool) -> Result<()> {
            let request = self
                .http
                .put(self.endpoints.ticket_sent(id))
                .json(&SentUpdate { sent });
            let (status, body) = self.send(request)?;
            ensure_success(status, &body)
        }

        pub fn set_ticket_type(&self, id: &TicketId, tip_bilet: &TicketType) -> Result<()> {
            let request = self
                .http
                .put(self.endpoints.ticket_type(id))
                .json(&TypeUpdate {
                    tip_bilet: tip_bilet.label(),
                });
            let (status, body) = self.send(request)?;
            ensure_success(status, &body)
        }

        pub fn delete_ticket(&self, id: &TicketId) -> Result<()> {
            let (status, body) = self.send(self.http.delete(self.endpoints.ticket(id)))?;
            ensure_success(status, &body)
        }

        pub fn verify_qr(&self, qr_data: &str) -> Result<VerificationOutcome> {
            let request = self
                .http
                .post(self.endpoints.verify_qr())
                .json(&VerifyQrRequest { qr_data });
            let (status, body) = self.send(request)?;
            report(decode_verification(status, &body)?)
        }

        pub fn verify_phone(&self, raw: &str) -> Result<VerificationOutcome> {
            let phone = PhoneNumber::parse(raw)?;
            let request = self
                .http
                .post(self.endpoints.verify_phone())
                .json(&VerifyPhoneRequest {
                    phone_number: phone.as_str(),
                });
            let (status, body) = self.send(request)?;
            report(decode_verification(status, &body)?)
        }

        pub fn verify_id(&self, id: &TicketId) -> Result<VerificationOutcome> {
            let (status, body) = self.send(self.http.post(self.endpoints.verify_id(id)))?;
            report(decode_verification(status, &body)?)
        }
    }

    fn report(outcome: VerificationOutcome) -> Result<VerificationOutcome> {
        if let VerificationOutcome::Verified(verification) = &outcome {
            if verification.flagged {
                warn!(
                    id = %verification.ticket.id,
                    count = verification.verification_count,
                    "ticket flagged on verification"
                );
            }
        }
        Ok(outcome)
    }

    impl TicketSource for ApiClient {
        fn source_name(&self) -> &'static str {
            "api"
        }

        fn fetch_tickets(&self) -> Result<Vec<Ticket>> {
            self.list_tickets()
        }
    }
}

#[cfg(not(feature = "http"))]
mod imp {
    use super::{ApiError, Result, TicketSource};
    use crate::endpoints::Endpoints;
    use crate::types::{LoginResponse, TicketLogs, TicketQr, VerificationOutcome};
    use bilete_core::{Ticket, TicketId, TicketType};
    use std::time::Duration;

    #[derive(Debug, Clone)]
    pub struct ApiClient {
        endpoints: Endpoints,
        token: Option<String>,
    }

    fn unavailable<T>() -> Result<T> {
        Err(ApiError::Unavailable(
            "the ticket API client requires the http feature".to_string(),
        ))
    }

    impl ApiClient {
        pub fn new(base_url: &str, token: Option<String>, _timeout: Duration) -> Result<Self> {
            Ok(Self {
                endpoints: Endpoints::new(base_url)?,
                token,
            })
        }

        pub fn endpoints(&self) -> &Endpoints {
            &self.endpoints
        }

        pub fn health(&self) -> Result<()> {
            let _ = &self.token;
            unavailable()
        }

        pub fn login(&self, _username: &str, _password: &str) -> Result<LoginResponse> {
            unavailable()
        }

        pub fn register(
            &self,
            _username: &str,
            _password: &str,
            _referral_code: &str,
        ) -> Result<LoginResponse> {
            unavailable()
        }

        pub fn list_tickets(&self) -> Result<Vec<Ticket>> {
            unavailable()
        }

        pub fn ticket_qr(&self, _id: &TicketId) -> Result<TicketQr> {
            unavailable()
        }

        pub fn download_ticket(&self, _id: &TicketId) -> Result<Vec<u8>> {
            unavailable()
        }

        pub fn ticket_logs(&self, _group: &str) -> Result<TicketLogs> {
            unavailable()
        }

        pub fn get_ticket(&self, _id: &TicketId) -> Result<Ticket> {
            unavailable()
        }

        pub fn create_ticket(
            &self,
            _nume: &str,
            _telefon: &str,
            _tip_bilet: &TicketType,
        ) -> Result<Ticket> {
            unavailable()
        }

        pub fn set_sent(&self, _id: &TicketId, _sent: bool) -> Result<()> {
            unavailable()
        }

        pub fn set_ticket_type(&self, _id: &TicketId, _tip_bilet: &TicketType) -> Result<()> {
            unavailable()
        }

        pub fn delete_ticket(&self, _id: &TicketId) -> Result<()> {
            unavailable()
        }

        pub fn verify_qr(&self, _qr_data: &str) -> Result<VerificationOutcome> {
            unavailable()
        }

        pub fn verify_phone(&self, _raw: &str) -> Result<VerificationOutcome> {
            unavailable()
        }

        pub fn verify_id(&self, _id: &TicketId) -> Result<VerificationOutcome> {
            unavailable()
        }
    }

    impl TicketSource for ApiClient {
        fn source_name(&self) -> &'static str {
            "api"
        }

        fn fetch_tickets(&self) -> Result<Vec<Ticket>> {
            self.list_tickets()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::ApiClient;
        use crate::ApiError;
        use std::time::Duration;

        #[test]
        fn calls_report_unavailable() {
            let client =
                ApiClient::new("http://localhost:3001/api", None, Duration::from_secs(1)).unwrap();
            assert!(matches!(client.list_tickets(), Err(ApiError::Unavailable(_))));
            assert!(matches!(
                client.register("ana", "secret", "LIC2"),
                Err(ApiError::Unavailable(_))
            ));
            assert!(matches!(client.ticket_logs("g"), Err(ApiError::Unavailable(_))));
        }
    }
}

pub use imp::ApiClient;
