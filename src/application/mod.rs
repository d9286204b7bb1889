//! Application layer containing the settlement logic for pending meetings.
//!
//! This module defines the `MeetingCoordinator`, the single entry point the
//! HTTP callbacks use to record a booking and to settle it once the payment
//! outcome is known.

pub mod coordinator;
