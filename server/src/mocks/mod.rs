//! Test doubles for the delivery transport.

pub mod transport;

pub use transport::{FailingTransport, RecordingTransport, SentMessage};
