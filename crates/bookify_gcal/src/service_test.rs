#[cfg(test)]
mod tests {
    use crate::service::{appointment_from_event, attendee_from_description, encode_description};
    use bookify_common::models::{AppointmentDraft, AppointmentStatus};
    use chrono::{Duration, TimeZone, Utc};
    use google_calendar3::api::{Event, EventDateTime};

    fn sample_draft() -> AppointmentDraft {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 8, 30, 0).unwrap();
        AppointmentDraft {
            attendee_email: "a@b.com".to_string(),
            attendee_name: Some("Asha Rao".to_string()),
            subject: "Dental checkup".to_string(),
            start,
            end: start + Duration::minutes(30),
        }
    }

    #[test]
    fn description_round_trips_attendee_identity() {
        let description = encode_description(&sample_draft());
        let (name, email) = attendee_from_description(&description);
        assert_eq!(name.as_deref(), Some("Asha Rao"));
        assert_eq!(email.as_deref(), Some("a@b.com"));
    }

    #[test]
    fn description_without_markers_yields_none() {
        let (name, email) = attendee_from_description("a hand-written event");
        assert!(name.is_none());
        assert!(email.is_none());
    }

    #[test]
    fn anonymous_draft_encodes_placeholder_name() {
        let mut draft = sample_draft();
        draft.attendee_name = None;
        let description = encode_description(&draft);
        let (name, email) = attendee_from_description(&description);
        assert_eq!(name.as_deref(), Some("Unknown"));
        assert_eq!(email.as_deref(), Some("a@b.com"));
    }

    fn timed_event(id: &str, sequence: Option<i32>, status: Option<&str>) -> Event {
        let start = Utc.with_ymd_and_hms(2024, 3, 11, 8, 30, 0).unwrap();
        Event {
            id: Some(id.to_string()),
            summary: Some("Dental checkup".to_string()),
            description: Some(encode_description(&sample_draft())),
            sequence,
            status: status.map(|s| s.to_string()),
            start: Some(EventDateTime {
                date_time: Some(start),
                ..Default::default()
            }),
            end: Some(EventDateTime {
                date_time: Some(start + Duration::minutes(30)),
                ..Default::default()
            }),
            ..Default::default()
        }
    }

    #[test]
    fn event_maps_to_appointment_with_status_from_sequence() {
        let appt = appointment_from_event(timed_event("ev1", None, Some("confirmed")))
            .expect("timed event maps");
        assert_eq!(appt.event_id, "ev1");
        assert_eq!(appt.attendee_email, "a@b.com");
        assert_eq!(appt.sequence, 0);
        assert_eq!(appt.status, AppointmentStatus::Scheduled);

        let moved = appointment_from_event(timed_event("ev1", Some(2), Some("confirmed"))).unwrap();
        assert_eq!(moved.sequence, 2);
        assert_eq!(moved.status, AppointmentStatus::Rescheduled);

        let gone = appointment_from_event(timed_event("ev1", Some(3), Some("cancelled"))).unwrap();
        assert_eq!(gone.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn all_day_event_is_not_an_appointment() {
        let mut event = timed_event("ev2", None, None);
        event.start = Some(EventDateTime {
            date: Some(chrono::NaiveDate::from_ymd_opt(2024, 3, 11).unwrap()),
            ..Default::default()
        });
        assert!(appointment_from_event(event).is_none());
    }
}
