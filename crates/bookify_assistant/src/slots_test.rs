// --- File: crates/bookify_assistant/src/slots_test.rs ---
#[cfg(test)]
mod tests {
    use crate::slots::{
        check_slot, describe_conflicts, free_slots, overlaps, SlotCheck, SLOTS_PER_DAY,
    };
    use bookify_common::models::{Appointment, AppointmentStatus};
    use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
    use chrono_tz::Asia::Kolkata;

    fn at(h: u32, min: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 11, h, min, 0).unwrap()
    }

    fn appt(event_id: &str, start: DateTime<Utc>, end: DateTime<Utc>) -> Appointment {
        Appointment {
            event_id: event_id.to_string(),
            attendee_email: "a@b.com".to_string(),
            attendee_name: None,
            subject: "Checkup".to_string(),
            start,
            end,
            status: AppointmentStatus::Scheduled,
            sequence: 0,
        }
    }

    #[test]
    fn overlapping_intervals_conflict() {
        assert!(overlaps(at(10, 0), at(11, 0), at(10, 30), at(11, 30)));
        // containment is also a conflict
        assert!(overlaps(at(10, 0), at(12, 0), at(10, 30), at(11, 0)));
    }

    #[test]
    fn touching_intervals_do_not_conflict() {
        // Back-to-back appointments are allowed
        assert!(!overlaps(at(10, 0), at(10, 30), at(10, 30), at(11, 0)));
        assert!(!overlaps(at(10, 30), at(11, 0), at(10, 0), at(10, 30)));
    }

    #[test]
    fn check_reports_every_collision() {
        let existing = vec![
            appt("ev-1", at(10, 0), at(10, 30)),
            appt("ev-2", at(10, 15), at(10, 45)),
            appt("ev-3", at(12, 0), at(12, 30)),
        ];
        match check_slot(at(10, 0), at(11, 0), None, &existing) {
            SlotCheck::Conflict(conflicts) => {
                let ids: Vec<&str> = conflicts.iter().map(|a| a.event_id.as_str()).collect();
                assert_eq!(ids, vec!["ev-1", "ev-2"]);
            }
            SlotCheck::Free => panic!("expected a conflict"),
        }
    }

    #[test]
    fn excluded_event_does_not_collide_with_itself() {
        let existing = vec![appt("ev-1", at(10, 0), at(10, 30))];
        let check = check_slot(at(10, 0), at(10, 30), Some("ev-1"), &existing);
        assert_eq!(check, SlotCheck::Free);
    }

    #[test]
    fn cancelled_appointments_never_conflict() {
        let mut cancelled = appt("ev-1", at(10, 0), at(10, 30));
        cancelled.status = AppointmentStatus::Cancelled;
        let check = check_slot(at(10, 0), at(10, 30), None, &[cancelled]);
        assert_eq!(check, SlotCheck::Free);
    }

    #[test]
    fn an_empty_day_offers_every_business_hour_slot() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let free = free_slots(day, Kolkata, &[]);
        assert_eq!(free.len(), SLOTS_PER_DAY);
        assert_eq!(free[0], Kolkata.with_ymd_and_hms(2024, 3, 11, 9, 0, 0).unwrap());
        assert_eq!(
            *free.last().unwrap(),
            Kolkata.with_ymd_and_hms(2024, 3, 11, 16, 30, 0).unwrap()
        );
    }

    #[test]
    fn booked_half_hours_are_dropped_from_the_offer() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        // 10:00-11:00 local is 04:30-05:30 UTC
        let existing = vec![appt(
            "ev-1",
            Utc.with_ymd_and_hms(2024, 3, 11, 4, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, 5, 30, 0).unwrap(),
        )];
        let free = free_slots(day, Kolkata, &existing);
        assert_eq!(free.len(), SLOTS_PER_DAY - 2);
        let hhmm: Vec<String> = free.iter().map(|s| s.format("%H:%M").to_string()).collect();
        assert!(!hhmm.contains(&"10:00".to_string()));
        assert!(!hhmm.contains(&"10:30".to_string()));
        // The slot touching the booking's end is still offered
        assert!(hhmm.contains(&"11:00".to_string()));
    }

    #[test]
    fn cancelled_appointments_do_not_block_a_slot() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        let mut cancelled = appt(
            "ev-1",
            Utc.with_ymd_and_hms(2024, 3, 11, 4, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, 5, 0, 0).unwrap(),
        );
        cancelled.status = AppointmentStatus::Cancelled;
        let free = free_slots(day, Kolkata, &[cancelled]);
        assert_eq!(free.len(), SLOTS_PER_DAY);
    }

    #[test]
    fn conflict_description_names_the_local_interval() {
        // 04:30 UTC is 10:00 in Kolkata
        let conflicts = vec![appt(
            "ev-1",
            Utc.with_ymd_and_hms(2024, 3, 11, 4, 30, 0).unwrap(),
            Utc.with_ymd_and_hms(2024, 3, 11, 5, 0, 0).unwrap(),
        )];
        let text = describe_conflicts(&conflicts, Kolkata);
        assert_eq!(text, "2024-03-11 10:00-10:30 (Checkup)");
    }
}
