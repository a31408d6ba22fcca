// --- File: crates/mentora_notify/src/email.rs ---
//! Pure builder for the booking confirmation email.

use chrono_tz::Tz;
use mentora_store::{Reservation, Service, Slot};

/// A rendered confirmation email, ready to hand to the notifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfirmationEmail {
    pub subject: String,
    pub html_body: String,
}

/// Render the confirmation email for a paid reservation.
///
/// The slot start is shown in the display timezone, not UTC; the meeting
/// link paragraph is only present once fulfillment has stored a link.
pub fn confirmation_email(
    reservation: &Reservation,
    service: &Service,
    slot: &Slot,
    time_zone: Tz,
) -> ConfirmationEmail {
    let local_start = slot.start_time.with_timezone(&time_zone);
    let when = local_start.format("%A, %-d %B %Y at %H:%M %Z").to_string();

    let subject = format!("Booking confirmed: {}", service.title);

    let mut body = String::new();
    body.push_str(&format!("<p>Hi {},</p>", reservation.customer_name));
    body.push_str(&format!(
        "<p>Your booking for <strong>{}</strong> is confirmed.</p>",
        service.title
    ));
    body.push_str(&format!(
        "<p>When: {} ({} minutes)</p>",
        when, service.duration_minutes
    ));
    if let Some(link) = &reservation.meeting_link {
        body.push_str(&format!(
            "<p>Join your session here: <a href=\"{link}\">{link}</a></p>"
        ));
    }
    body.push_str(&format!(
        "<p>Questions before the session? Reach your mentor at {}.</p>",
        service.mentor_email
    ));
    body.push_str("<p>See you soon!</p>");

    ConfirmationEmail {
        subject,
        html_body: body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use mentora_store::{ReservationStatus, SlotStatus};

    fn fixture() -> (Reservation, Service, Slot) {
        let service = Service {
            id: Some("svc-1".to_string()),
            title: "Career mentoring".to_string(),
            description: "1:1 session".to_string(),
            duration_minutes: 60,
            price: 9000,
            mentor_email: "mentor@example.com".to_string(),
        };
        let slot = Slot {
            id: Some("slot-1".to_string()),
            service_id: Some("svc-1".to_string()),
            start_time: Utc.with_ymd_and_hms(2024, 1, 15, 13, 0, 0).unwrap(),
            end_time: None,
            status: SlotStatus::Booked,
        };
        let reservation = Reservation {
            id: Some("res-1".to_string()),
            service_id: "svc-1".to_string(),
            slot_id: "slot-1".to_string(),
            customer_name: "Ada Lovelace".to_string(),
            customer_email: "ada@example.com".to_string(),
            customer_phone: None,
            note: None,
            status: ReservationStatus::Paid,
            meeting_link: Some("https://meet.google.com/abc-defg-hij".to_string()),
            checkout_session_id: Some("cs_123".to_string()),
            created_at: Utc.with_ymd_and_hms(2024, 1, 10, 9, 0, 0).unwrap(),
        };
        (reservation, service, slot)
    }

    #[test]
    fn renders_start_in_display_timezone() {
        let (reservation, service, slot) = fixture();
        // 13:00 UTC is 14:00 in Zurich in January
        let email = confirmation_email(&reservation, &service, &slot, chrono_tz::Europe::Zurich);
        assert!(email.subject.contains("Career mentoring"));
        assert!(
            email.html_body.contains("14:00"),
            "start must be rendered in the configured zone, got: {}",
            email.html_body
        );
        assert!(email.html_body.contains("60 minutes"));
    }

    #[test]
    fn meeting_link_paragraph_only_when_present() {
        let (mut reservation, service, slot) = fixture();
        let email = confirmation_email(&reservation, &service, &slot, chrono_tz::UTC);
        assert!(email
            .html_body
            .contains("https://meet.google.com/abc-defg-hij"));

        reservation.meeting_link = None;
        let email = confirmation_email(&reservation, &service, &slot, chrono_tz::UTC);
        assert!(!email.html_body.contains("Join your session"));
        assert!(email.html_body.contains("mentor@example.com"));
    }
}
