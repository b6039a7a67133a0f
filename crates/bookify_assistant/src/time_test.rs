// --- File: crates/bookify_assistant/src/time_test.rs ---
#[cfg(test)]
mod tests {
    use crate::time::{resolve, resolve_day, same_date_and_hour, TimeParseError};
    use chrono::{Datelike, Duration, NaiveDate, TimeZone, Weekday};
    use chrono_tz::Asia::Kolkata;
    use chrono_tz::Tz;

    fn local(y: i32, m: u32, d: u32, h: u32, min: u32) -> chrono::DateTime<Tz> {
        Kolkata.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
    }

    const HALF_HOUR: i64 = 30;

    #[test]
    fn twelve_hour_marker_resolves_exactly() {
        // Sunday morning, booking for the next afternoon
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("tomorrow at 2 PM", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 3, 11, 14, 0));
        assert_eq!(slot.end, local(2024, 3, 11, 14, 30));
        assert!(!slot.ambiguous);
    }

    #[test]
    fn twelve_pm_is_noon_and_twelve_am_is_midnight() {
        let now = local(2024, 3, 10, 9, 0);
        let noon = resolve("today at 12 pm", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(noon.start, local(2024, 3, 10, 12, 0));
        let midnight = resolve("tomorrow at 12 am", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(midnight.start, local(2024, 3, 11, 0, 0));
    }

    #[test]
    fn twenty_four_hour_time_ignores_reference_clock() {
        // The time-of-day of `now` must not leak into an explicit 24-hour
        // phrase; only day-rollover words may shift the date.
        let phrase = "tomorrow at 14:00";
        let morning = resolve(phrase, local(2024, 3, 10, 6, 15), Duration::minutes(HALF_HOUR));
        let evening = resolve(phrase, local(2024, 3, 10, 22, 45), Duration::minutes(HALF_HOUR));
        assert_eq!(morning.unwrap(), evening.unwrap());
    }

    #[test]
    fn next_weekday_is_strictly_future_from_every_reference_day() {
        for day in 4..=10 {
            // 2024-03-04 is a Monday, so this sweeps one of each weekday
            let now = local(2024, 3, day, 12, 0);
            let slot = resolve("next monday at 10:00", now, Duration::minutes(HALF_HOUR)).unwrap();
            assert_eq!(slot.start.weekday(), Weekday::Mon);
            assert!(slot.start.date_naive() > now.date_naive());
        }
    }

    #[test]
    fn same_weekday_means_a_week_out() {
        // Spoken on a Monday, "next monday" is seven days away, never today
        let now = local(2024, 3, 4, 8, 0);
        let slot = resolve("next monday at 9 am", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start.date_naive(), local(2024, 3, 11, 9, 0).date_naive());
    }

    #[test]
    fn bare_hour_picks_nearer_reading_and_flags_it() {
        // At 09:00, 5 o'clock is nearer to 05:00 (4h) than 17:00 (8h)
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("today at 5", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 3, 10, 5, 0));
        assert!(slot.ambiguous);
    }

    #[test]
    fn bare_hour_above_twelve_is_unambiguous() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("tomorrow at 15", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 3, 11, 15, 0));
        assert!(!slot.ambiguous);
    }

    #[test]
    fn day_after_tomorrow_rolls_two_days() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("day after tomorrow at 10:00", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 3, 12, 10, 0));
    }

    #[test]
    fn iso_date_with_clock_time() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("2024-12-25 at 10:30", now, Duration::minutes(60)).unwrap();
        assert_eq!(slot.start, local(2024, 12, 25, 10, 30));
        assert_eq!(slot.end, local(2024, 12, 25, 11, 30));
    }

    #[test]
    fn month_name_date_resolves() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("December 25 at 9 am", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 12, 25, 9, 0));
    }

    #[test]
    fn past_calendar_date_rolls_to_next_year() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("march 1 at 10:00", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2025, 3, 1, 10, 0));
    }

    #[test]
    fn time_without_any_date_means_today() {
        let now = local(2024, 3, 10, 9, 0);
        let slot = resolve("at 4 pm", now, Duration::minutes(HALF_HOUR)).unwrap();
        assert_eq!(slot.start, local(2024, 3, 10, 16, 0));
    }

    #[test]
    fn phrase_without_time_is_a_parse_error() {
        let now = local(2024, 3, 10, 9, 0);
        let err = resolve("hello there", now, Duration::minutes(HALF_HOUR)).unwrap_err();
        assert!(matches!(err, TimeParseError::NoTime(_)));
        // A day word alone has no clock time either
        let err = resolve("tomorrow", now, Duration::minutes(HALF_HOUR)).unwrap_err();
        assert!(matches!(err, TimeParseError::NoTime(_)));
    }

    #[test]
    fn date_only_phrases_resolve_to_a_day() {
        let now = local(2024, 3, 10, 9, 0);
        let tomorrow = NaiveDate::from_ymd_opt(2024, 3, 11).unwrap();
        assert_eq!(resolve_day("tomorrow", now).unwrap(), tomorrow);
        assert_eq!(resolve_day("monday", now).unwrap(), tomorrow);
        assert_eq!(
            resolve_day("March 14", now).unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 14).unwrap()
        );
        let err = resolve_day("sometime", now).unwrap_err();
        assert!(matches!(err, TimeParseError::BadDate(_)));
    }

    #[test]
    fn nonsense_date_is_rejected() {
        let now = local(2024, 3, 10, 9, 0);
        let err = resolve("2024-13-45 at 10:00", now, Duration::minutes(HALF_HOUR)).unwrap_err();
        assert!(matches!(err, TimeParseError::BadDate(_)));
    }

    #[test]
    fn date_and_hour_matching_ignores_minutes() {
        let a = local(2024, 3, 11, 14, 0);
        let b = local(2024, 3, 11, 14, 45);
        let c = local(2024, 3, 11, 15, 0);
        assert!(same_date_and_hour(a, b));
        assert!(!same_date_and_hour(a, c));
    }
}
