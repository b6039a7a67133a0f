// --- File: crates/bookify_assistant/src/invite_test.rs ---
#[cfg(test)]
mod tests {
    use crate::invite::{compose_invite, InviteMethod};
    use bookify_common::models::{Appointment, AppointmentStatus};
    use chrono::TimeZone;
    use chrono::Utc;

    fn appointment() -> Appointment {
        Appointment {
            event_id: "ev-1".to_string(),
            attendee_email: "a@b.com".to_string(),
            attendee_name: Some("Asha".to_string()),
            subject: "Dental checkup".to_string(),
            start: Utc.with_ymd_and_hms(2024, 3, 11, 8, 30, 0).unwrap(),
            end: Utc.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap(),
            status: AppointmentStatus::Scheduled,
            sequence: 0,
        }
    }

    #[test]
    fn request_invite_carries_uid_method_and_sequence() {
        let invite = compose_invite(
            InviteMethod::Request,
            &appointment(),
            0,
            "clinic@example.com",
        );
        assert_eq!(invite.filename, "appointment.ics");
        assert!(invite.content.contains("METHOD:REQUEST"));
        assert!(invite.content.contains("UID:ev-1@bookify.local"));
        assert!(invite.content.contains("SEQUENCE:0"));
        assert!(invite.content.contains("SUMMARY:Dental checkup"));
        assert!(invite.content.contains("STATUS:CONFIRMED"));
        assert!(invite.content.contains("ORGANIZER:mailto:clinic@example.com"));
        assert!(invite.content.contains("mailto:a@b.com"));
    }

    #[test]
    fn invite_times_are_utc_instants() {
        let invite = compose_invite(
            InviteMethod::Request,
            &appointment(),
            0,
            "clinic@example.com",
        );
        assert!(invite.content.contains("20240311T083000Z"));
        assert!(invite.content.contains("20240311T090000Z"));
    }

    #[test]
    fn attendee_name_becomes_a_cn_parameter() {
        let invite = compose_invite(
            InviteMethod::Request,
            &appointment(),
            0,
            "clinic@example.com",
        );
        assert!(invite.content.contains("CN=Asha"));

        let mut anonymous = appointment();
        anonymous.attendee_name = None;
        let invite = compose_invite(InviteMethod::Request, &anonymous, 0, "clinic@example.com");
        assert!(!invite.content.contains("CN="));
    }

    #[test]
    fn cancel_invite_keeps_the_uid_and_bumps_nothing_itself() {
        // The sequence passed in is used verbatim; incrementing is the
        // caller's job, keyed off the stored prior value.
        let mut cancelled = appointment();
        cancelled.status = AppointmentStatus::Cancelled;
        cancelled.sequence = 2;
        let invite = compose_invite(InviteMethod::Cancel, &cancelled, 2, "clinic@example.com");
        assert_eq!(invite.filename, "appointment_cancellation.ics");
        assert!(invite.content.contains("METHOD:CANCEL"));
        assert!(invite.content.contains("UID:ev-1@bookify.local"));
        assert!(invite.content.contains("SEQUENCE:2"));
        assert!(invite.content.contains("STATUS:CANCELLED"));
    }
}
