//! Test double for the SNS gateway
//!
//! [`FakeSns`] stands in for the external notification service behind the
//! `SnsApi` seam: an in-memory topic/subscription store that records every
//! request record it receives and can be scripted to fail.

pub mod fake;

pub use fake::{ApiCall, FakeSns};
