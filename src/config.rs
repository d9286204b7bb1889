use crate::error::{MeetingError, Result};
use crate::infrastructure::http_booking::{BookingOptions, DEFAULT_REQUEST_TIMEOUT};
use reqwest::Url;
use std::env;
use std::net::SocketAddr;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_SCHEDULER_BASE_URL: &str = "https://schedule.nylas.com";
pub const DEFAULT_CONFIRMATION_SERVICE_URL: &str = "http://localhost:3000/accept";
pub const DEFAULT_BOOKING_API_BASE_URL: &str = "https://api.nylas.com";
pub const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_LISTEN_ADDR: &str = "0.0.0.0:8000";

/// Application configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub public_base_url: Url,
    pub scheduler_base_url: String,
    pub confirmation_service_url: String,
    pub booking_api_base_url: String,
    pub access_token: String,
    pub request_timeout: Duration,
}

impl Config {
    /// Load configuration from the environment, after applying `env_file`
    /// (or `.env` in the working directory if present).
    pub fn load(env_file: Option<&Path>) -> Result<Self> {
        match env_file {
            Some(path) => {
                dotenvy::from_path(path).map_err(|e| {
                    MeetingError::Config(format!("failed to load {}: {e}", path.display()))
                })?;
            }
            None => match dotenvy::dotenv() {
                Ok(_) => {}
                Err(e) if e.not_found() => {}
                Err(e) => return Err(MeetingError::Config(format!("failed to load .env: {e}"))),
            },
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let or_default = |key: &str, default: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let access_token = lookup("NYLAS_ACCESS_TOKEN")
            .filter(|v| !v.is_empty())
            .ok_or_else(|| MeetingError::Config("NYLAS_ACCESS_TOKEN must be set".to_string()))?;

        let listen_addr = or_default("LISTEN_ADDR", DEFAULT_LISTEN_ADDR)
            .parse()
            .map_err(|e| MeetingError::Config(format!("LISTEN_ADDR must be host:port: {e}")))?;

        let request_timeout = match lookup("REQUEST_TIMEOUT_SECS").filter(|v| !v.is_empty()) {
            Some(raw) => raw.parse::<u64>().map(Duration::from_secs).map_err(|e| {
                MeetingError::Config(format!("REQUEST_TIMEOUT_SECS must be a number: {e}"))
            })?,
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        let public_base_url = parse_base_url(
            "PUBLIC_BASE_URL",
            &or_default("PUBLIC_BASE_URL", DEFAULT_PUBLIC_BASE_URL),
        )?;

        Ok(Self {
            listen_addr,
            public_base_url,
            scheduler_base_url: or_default("SCHEDULER_BASE_URL", DEFAULT_SCHEDULER_BASE_URL),
            confirmation_service_url: or_default(
                "CONFIRMATION_SERVICE_URL",
                DEFAULT_CONFIRMATION_SERVICE_URL,
            ),
            booking_api_base_url: or_default("BOOKING_API_BASE_URL", DEFAULT_BOOKING_API_BASE_URL),
            access_token,
            request_timeout,
        })
    }

    pub fn booking_options(&self) -> BookingOptions {
        BookingOptions {
            scheduler_base_url: self.scheduler_base_url.clone(),
            confirmation_service_url: self.confirmation_service_url.clone(),
            booking_api_base_url: self.booking_api_base_url.clone(),
            access_token: self.access_token.clone(),
            request_timeout: self.request_timeout,
        }
    }

    /// Where the payment provider sends the buyer after a successful checkout.
    pub fn success_url(&self, event_id: &str) -> String {
        self.payment_redirect("success", event_id)
    }

    /// Where the payment provider sends the buyer after abandoning checkout.
    pub fn cancel_url(&self, event_id: &str) -> String {
        self.payment_redirect("cancel", event_id)
    }

    fn payment_redirect(&self, outcome: &str, event_id: &str) -> String {
        let mut url = self.public_base_url.clone();
        // Base URLs are checked by `parse_base_url`, so segments are always available
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().extend(["payments", outcome]);
        }
        url.query_pairs_mut().append_pair("eventId", event_id);
        url.into()
    }
}

/// Parses an absolute URL that paths can be appended to.
pub(crate) fn parse_base_url(name: &str, raw: &str) -> Result<Url> {
    let url = Url::parse(raw)
        .map_err(|e| MeetingError::Config(format!("{name} must be an absolute URL: {e}")))?;
    if url.cannot_be_a_base() {
        return Err(MeetingError::Config(format!(
            "{name} must be a hierarchical URL such as https://host/path"
        )));
    }
    Ok(url)
}
