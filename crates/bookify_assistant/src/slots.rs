// --- File: crates/bookify_assistant/src/slots.rs ---
//! Conflict checking for proposed appointment slots.

use bookify_common::models::{Appointment, AppointmentStatus};
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use chrono_tz::Tz;

/// Business hours offered by the availability check: half-hour slots from
/// 09:00 to 17:00 local time.
pub const BUSINESS_OPEN_HOUR: u32 = 9;
pub const SLOT_MINUTES: i64 = 30;
pub const SLOTS_PER_DAY: usize = 16;

/// Outcome of a conflict check against the existing appointments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlotCheck {
    Free,
    Conflict(Vec<Appointment>),
}

/// Two intervals conflict iff each starts before the other ends. Touching
/// endpoints are not a conflict, so back-to-back appointments are allowed.
pub fn overlaps(
    a_start: DateTime<Utc>,
    a_end: DateTime<Utc>,
    b_start: DateTime<Utc>,
    b_end: DateTime<Utc>,
) -> bool {
    a_start < b_end && b_start < a_end
}

/// Check a proposed slot against `existing`. Pass `exclude_event_id` when
/// rescheduling so the appointment being moved does not collide with itself.
pub fn check_slot(
    start: DateTime<Utc>,
    end: DateTime<Utc>,
    exclude_event_id: Option<&str>,
    existing: &[Appointment],
) -> SlotCheck {
    let conflicts: Vec<Appointment> = existing
        .iter()
        .filter(|appt| appt.status != AppointmentStatus::Cancelled)
        .filter(|appt| exclude_event_id != Some(appt.event_id.as_str()))
        .filter(|appt| overlaps(start, end, appt.start, appt.end))
        .cloned()
        .collect();
    if conflicts.is_empty() {
        SlotCheck::Free
    } else {
        SlotCheck::Conflict(conflicts)
    }
}

/// The business-hour slot starts on `day` that do not overlap any active
/// appointment in `existing`. An empty result means the day is fully booked
/// (or the opening time does not exist locally, which cannot happen in a
/// fixed-offset zone).
pub fn free_slots(day: NaiveDate, tz: Tz, existing: &[Appointment]) -> Vec<DateTime<Tz>> {
    let open_local = match day.and_hms_opt(BUSINESS_OPEN_HOUR, 0, 0) {
        Some(t) => t,
        None => return Vec::new(),
    };
    let open = match tz.from_local_datetime(&open_local).earliest() {
        Some(t) => t,
        None => return Vec::new(),
    };
    (0..SLOTS_PER_DAY)
        .filter_map(|i| {
            let start = open + Duration::minutes(SLOT_MINUTES * i as i64);
            let end = start + Duration::minutes(SLOT_MINUTES);
            match check_slot(start.to_utc(), end.to_utc(), None, existing) {
                SlotCheck::Free => Some(start),
                SlotCheck::Conflict(_) => None,
            }
        })
        .collect()
}

/// A user-facing description of the colliding slots, in the local time zone.
pub fn describe_conflicts(conflicts: &[Appointment], tz: Tz) -> String {
    conflicts
        .iter()
        .map(|appt| {
            let start = appt.start.with_timezone(&tz);
            let end = appt.end.with_timezone(&tz);
            format!(
                "{} {}-{} ({})",
                start.format("%Y-%m-%d"),
                start.format("%H:%M"),
                end.format("%H:%M"),
                appt.subject
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}
