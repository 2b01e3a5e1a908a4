//! Attendee export as CSV.

use crate::models::Registration;

pub const EXPORT_HEADERS: [&str; 6] = [
    "Name",
    "Email",
    "Phone",
    "Company",
    "Registration Date",
    "Checked In",
];

/// Sortable and independent of locale.
pub const EXPORT_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One header row, then one row per registration in the given order.
pub fn to_table(registrations: &[Registration]) -> String {
    let mut lines = Vec::with_capacity(registrations.len() + 1);
    lines.push(join_row(EXPORT_HEADERS.iter().copied()));

    for registration in registrations {
        let registered_at = registration
            .registered_at
            .format(EXPORT_TIMESTAMP_FORMAT)
            .to_string();
        lines.push(join_row([
            registration.full_name.as_str(),
            registration.email.as_str(),
            registration.phone.as_deref().unwrap_or(""),
            registration.company.as_deref().unwrap_or(""),
            registered_at.as_str(),
            if registration.checked_in { "Yes" } else { "No" },
        ]));
    }

    lines.join("\n")
}

/// `"Rust  Meetup 2025"` becomes `"Rust-Meetup-2025-attendees.csv"`.
pub fn export_file_name(event_title: &str) -> String {
    let stem = event_title.split_whitespace().collect::<Vec<_>>().join("-");
    if stem.is_empty() {
        "attendees.csv".to_string()
    } else {
        format!("{stem}-attendees.csv")
    }
}

fn join_row<'a>(fields: impl IntoIterator<Item = &'a str>) -> String {
    fields
        .into_iter()
        .map(escape_field)
        .collect::<Vec<_>>()
        .join(",")
}

// RFC 4180 quoting
fn escape_field(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}
