#[cfg(test)]
mod tests {
    use crate::service::build_payload;
    use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
    use bookify_common::services::InviteAttachment;

    #[test]
    fn payload_carries_sender_recipient_and_html_body() {
        let payload = build_payload(
            "appointments@bookify.local",
            Some("Bookify"),
            "a@b.com",
            "Appointment Confirmation",
            "<p>booked</p>",
            None,
        );

        assert_eq!(payload["from"]["email"], "appointments@bookify.local");
        assert_eq!(payload["from"]["name"], "Bookify");
        assert_eq!(
            payload["personalizations"][0]["to"][0]["email"],
            "a@b.com"
        );
        assert_eq!(payload["subject"], "Appointment Confirmation");
        assert_eq!(payload["content"][0]["type"], "text/html");
        assert!(payload.get("attachments").is_none());
    }

    #[test]
    fn invite_attachment_is_base64_text_calendar() {
        let invite = InviteAttachment {
            filename: "appointment.ics".to_string(),
            content: "BEGIN:VCALENDAR\r\nEND:VCALENDAR\r\n".to_string(),
        };
        let payload = build_payload(
            "appointments@bookify.local",
            None,
            "a@b.com",
            "Appointment Confirmation",
            "<p>booked</p>",
            Some(&invite),
        );

        let attachment = &payload["attachments"][0];
        assert_eq!(attachment["filename"], "appointment.ics");
        assert_eq!(attachment["type"], "text/calendar");
        assert_eq!(attachment["disposition"], "attachment");

        let decoded = BASE64
            .decode(attachment["content"].as_str().unwrap())
            .expect("valid base64");
        assert_eq!(decoded, invite.content.as_bytes());
    }

    #[test]
    fn anonymous_sender_omits_name_field() {
        let payload = build_payload(
            "appointments@bookify.local",
            None,
            "a@b.com",
            "s",
            "b",
            None,
        );
        assert!(payload["from"].get("name").is_none());
    }
}
