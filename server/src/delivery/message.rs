use chrono::{DateTime, Utc};

use crate::delivery::DeliveryJob;

const DATE_FORMAT: &str = "%A, %B %-d, %Y";
const TIME_FORMAT: &str = "%-I:%M %p UTC";

/// A ready-to-send registration confirmation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmationMessage {
    pub subject: String,
    pub html: String,
}

impl ConfirmationMessage {
    /// `qr_data_url` is the rendered ticket, see
    /// [`TicketRenderer::render_data_url`](crate::delivery::TicketRenderer::render_data_url).
    pub fn compose(job: &DeliveryJob, qr_data_url: &str) -> Self {
        let name = escape_html(&job.attendee_name);
        let title = escape_html(&job.event_title);
        let location = escape_html(&job.event_location);
        let token = escape_html(&job.ticket_token);
        let date = format_event_date(job.event_start);
        let time = format_event_time(job.event_start);

        let html = format!(
            r#"<!DOCTYPE html>
<html>
<head>
    <meta charset="utf-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>Event Registration Confirmation</title>
</head>
<body style="margin: 0; padding: 0; font-family: Arial, sans-serif; background-color: #f3f4f6;">
    <div style="max-width: 600px; margin: 0 auto; padding: 20px; background-color: #ffffff;">
        <h1 style="color: #2563eb; font-size: 28px;">Registration Confirmed!</h1>
        <p>Hi {name},</p>
        <p>Thank you for registering for <strong>{title}</strong>. We're excited to see you there!</p>
        <div style="background-color: #f9fafb; border-left: 4px solid #2563eb; padding: 20px; margin: 30px 0;">
            <h2 style="font-size: 18px; margin: 0 0 15px 0;">Event Details</h2>
            <p><strong>Date:</strong> {date}</p>
            <p><strong>Time:</strong> {time}</p>
            <p><strong>Location:</strong> {location}</p>
        </div>
        <div style="text-align: center; margin: 30px 0;">
            <h3 style="font-size: 18px;">Your Event Ticket</h3>
            <p style="color: #6b7280; font-size: 14px;">Present this QR code at the event for check-in</p>
            <img src="{qr_data_url}" alt="QR Code Ticket" style="max-width: 300px; height: auto;" />
            <p style="color: #6b7280; font-size: 12px;">Ticket: {token}</p>
        </div>
        <p style="color: #92400e; font-size: 14px;">Save this email or take a screenshot of your QR code for quick access at the event.</p>
        <p>See you soon!</p>
    </div>
</body>
</html>
"#
        );

        Self {
            subject: format!("Registration Confirmed: {}", job.event_title),
            html,
        }
    }
}

pub fn format_event_date(start: DateTime<Utc>) -> String {
    start.format(DATE_FORMAT).to_string()
}

pub fn format_event_time(start: DateTime<Utc>) -> String {
    start.format(TIME_FORMAT).to_string()
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use uuid::Uuid;

    fn job() -> DeliveryJob {
        DeliveryJob {
            registration_id: Uuid::new_v4(),
            event_id: Uuid::new_v4(),
            recipient_email: "ada@example.com".to_string(),
            attendee_name: "Ada <Lovelace>".to_string(),
            event_title: "Engines & Analysis".to_string(),
            event_start: Utc.with_ymd_and_hms(2025, 3, 1, 19, 30, 0).unwrap(),
            event_location: "Room 101".to_string(),
            ticket_token: "evt:1740857400000000:ada@example.com".to_string(),
        }
    }

    #[test]
    fn test_date_and_time_formatting() {
        let start = Utc.with_ymd_and_hms(2025, 3, 1, 19, 30, 0).unwrap();
        assert_eq!(format_event_date(start), "Saturday, March 1, 2025");
        assert_eq!(format_event_time(start), "7:30 PM UTC");

        let morning = Utc.with_ymd_and_hms(2025, 12, 24, 9, 5, 0).unwrap();
        assert_eq!(format_event_time(morning), "9:05 AM UTC");
    }

    #[test]
    fn test_compose_embeds_details_and_code() {
        let message = ConfirmationMessage::compose(&job(), "data:image/png;base64,AAAA");

        assert_eq!(message.subject, "Registration Confirmed: Engines & Analysis");
        assert!(message.html.contains("Hi Ada &lt;Lovelace&gt;,"));
        assert!(message.html.contains("<strong>Engines &amp; Analysis</strong>"));
        assert!(message.html.contains("Saturday, March 1, 2025"));
        assert!(message.html.contains("7:30 PM UTC"));
        assert!(message.html.contains("Room 101"));
        assert!(message.html.contains(r#"src="data:image/png;base64,AAAA""#));
        assert!(message.html.contains("evt:1740857400000000:ada@example.com"));
    }
}
