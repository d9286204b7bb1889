//! HTTP adapter for the two booking side effects: confirming a paid booking
//! through the local confirmation service and cancelling an unpaid one with
//! the booking provider.

use crate::config::parse_base_url;
use crate::domain::meeting::PendingMeeting;
use crate::domain::ports::BookingClient;
use crate::error::{MeetingError, Result};
use async_trait::async_trait;
use reqwest::{Client, Response, Url, header};
use serde::Serialize;
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

#[derive(Debug, Clone)]
pub struct BookingOptions {
    /// Base of the public scheduler pages, used to build confirmation URLs.
    pub scheduler_base_url: String,
    /// Endpoint of the confirmation service that accepts `{"url": ...}`.
    pub confirmation_service_url: String,
    /// Base of the booking provider's REST API.
    pub booking_api_base_url: String,
    pub access_token: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Serialize)]
struct ConfirmRequest<'a> {
    url: &'a str,
}

/// Blocking-per-call client; no retries, no backoff.
#[derive(Debug, Clone)]
pub struct HttpBookingClient {
    options: BookingOptions,
    booking_api_base: Url,
    client: Client,
}

impl HttpBookingClient {
    pub fn new(options: BookingOptions) -> Result<Self> {
        let booking_api_base =
            parse_base_url("BOOKING_API_BASE_URL", &options.booking_api_base_url)?;
        let client = Client::builder()
            .timeout(options.request_timeout)
            .build()
            .map_err(|e| MeetingError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            options,
            booking_api_base,
            client,
        })
    }

    /// `<api base>/events/<event_id>`, with the id encoded as one path segment.
    fn cancel_url(&self, event_id: &str) -> Result<Url> {
        let mut url = self.booking_api_base.clone();
        url.path_segments_mut()
            .map_err(|()| {
                MeetingError::Config("booking API base URL cannot take a path".to_string())
            })?
            .pop_if_empty()
            .extend(["events", event_id]);
        Ok(url)
    }

    fn check_status(response: Response) -> Result<()> {
        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(MeetingError::Upstream {
                status: status.as_u16(),
            })
        }
    }
}

#[async_trait]
impl BookingClient for HttpBookingClient {
    async fn confirm(&self, meeting: &PendingMeeting) -> Result<()> {
        let url = meeting.confirmation_url(&self.options.scheduler_base_url);
        debug!(event_id = %meeting.event_id, %url, "requesting booking confirmation");

        let response = self
            .client
            .post(&self.options.confirmation_service_url)
            .json(&ConfirmRequest { url: &url })
            .send()
            .await
            .map_err(|e| MeetingError::Transport(format!("confirmation request failed: {e}")))?;

        Self::check_status(response)
    }

    async fn cancel(&self, meeting: &PendingMeeting) -> Result<()> {
        let url = self.cancel_url(&meeting.event_id)?;
        debug!(event_id = %meeting.event_id, %url, "requesting booking cancellation");

        let response = self
            .client
            .get(url)
            .header(header::ACCEPT, "application/json")
            .bearer_auth(&self.options.access_token)
            .send()
            .await
            .map_err(|e| MeetingError::Transport(format!("cancellation request failed: {e}")))?;

        Self::check_status(response)
    }
}
