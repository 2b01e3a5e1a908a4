pub mod event;
pub mod registration;

pub use event::{DashboardStats, Event, EventInput};
pub use registration::{AttendanceSummary, AttendeeDetails, Registration};
