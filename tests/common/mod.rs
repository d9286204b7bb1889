#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use paid_meetings::domain::meeting::PendingMeeting;
use paid_meetings::domain::ports::BookingClient;
use paid_meetings::error::{MeetingError, Result};
use paid_meetings::infrastructure::http_booking::{BookingOptions, HttpBookingClient};
use serde::Deserialize;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Booking client that records every call and optionally fails.
#[derive(Clone, Default)]
pub struct RecordingBooking {
    pub confirm_status: Option<u16>,
    pub cancel_status: Option<u16>,
    pub delay: Duration,
    pub calls: Arc<Mutex<Vec<String>>>,
}

impl RecordingBooking {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn outcome(status: Option<u16>) -> Result<()> {
        match status {
            Some(status) => Err(MeetingError::Upstream { status }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl BookingClient for RecordingBooking {
    async fn confirm(&self, meeting: &PendingMeeting) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.calls
            .lock()
            .unwrap()
            .push(format!("confirm:{}", meeting.event_id));
        Self::outcome(self.confirm_status)
    }

    async fn cancel(&self, meeting: &PendingMeeting) -> Result<()> {
        tokio::time::sleep(self.delay).await;
        self.calls
            .lock()
            .unwrap()
            .push(format!("cancel:{}", meeting.event_id));
        Self::outcome(self.cancel_status)
    }
}

#[derive(Debug, Deserialize)]
struct ConfirmBody {
    url: String,
}

/// What the mock booking endpoints received.
#[derive(Clone, Default)]
pub struct Received {
    pub confirm_urls: Arc<Mutex<Vec<String>>>,
    pub cancelled: Arc<Mutex<Vec<String>>>,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    received: Received,
}

/// Serves `/accept` and `/events/:event_id` on an ephemeral port, answering
/// every request with `status`.
pub async fn spawn_booking_server(status: StatusCode) -> (String, Received) {
    let received = Received::default();
    let app = Router::new()
        .route(
            "/accept",
            post(
                |State(state): State<MockState>, Json(body): Json<ConfirmBody>| async move {
                    state.received.confirm_urls.lock().unwrap().push(body.url);
                    state.status
                },
            ),
        )
        .route(
            "/events/:event_id",
            get(
                |State(state): State<MockState>, Path(event_id): Path<String>| async move {
                    state.received.cancelled.lock().unwrap().push(event_id);
                    state.status
                },
            ),
        )
        .with_state(MockState {
            status,
            received: received.clone(),
        });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), received)
}

pub fn http_client(base_url: &str) -> HttpBookingClient {
    HttpBookingClient::new(BookingOptions {
        scheduler_base_url: "https://schedule.nylas.com".to_string(),
        confirmation_service_url: format!("{base_url}/accept"),
        booking_api_base_url: base_url.to_string(),
        access_token: "test-token".to_string(),
        request_timeout: Duration::from_secs(5),
    })
    .expect("build client")
}
