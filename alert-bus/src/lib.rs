//! Best-effort broadcast channel for critical-code alerts.
//!
//! One named Redis pub/sub topic carries compact
//! `{patient: {firstName, lastName}, location}` payloads. Delivery is
//! fire-and-forget: the publisher tracks no consumers and queues nothing.
//! A missed alert is accepted data loss, logged by the caller, and must
//! never block report persistence.

pub mod alert;
pub mod broker;
pub mod error;

pub use alert::*;
pub use broker::*;
pub use error::*;
