// --- File: crates/bookify_assistant/src/extractor_test.rs ---
#[cfg(test)]
mod tests {
    use crate::extractor::action_from_tool_call;
    use bookify_common::models::StructuredAction;

    #[test]
    fn schedule_tool_call_maps_to_create() {
        let action = action_from_tool_call(
            "schedule_appointment",
            r#"{"email":"a@b.com","name":"Asha","purpose":"Dental checkup","when":"tomorrow at 2 PM","duration_minutes":45}"#,
        );
        assert_eq!(
            action,
            StructuredAction::Create {
                attendee_email: "a@b.com".to_string(),
                attendee_name: Some("Asha".to_string()),
                subject: Some("Dental checkup".to_string()),
                when_phrase: "tomorrow at 2 PM".to_string(),
                duration_minutes: Some(45),
            }
        );
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let action = action_from_tool_call(
            "schedule_appointment",
            r#"{"email":"a@b.com","when":"next monday at 10:00"}"#,
        );
        assert_eq!(
            action,
            StructuredAction::Create {
                attendee_email: "a@b.com".to_string(),
                attendee_name: None,
                subject: None,
                when_phrase: "next monday at 10:00".to_string(),
                duration_minutes: None,
            }
        );
    }

    #[test]
    fn reschedule_and_cancel_map_their_phrases() {
        let action = action_from_tool_call(
            "reschedule_appointment",
            r#"{"email":"a@b.com","old_when":"tomorrow at 2 PM","new_when":"next friday at 4 PM"}"#,
        );
        assert_eq!(
            action,
            StructuredAction::Reschedule {
                attendee_email: "a@b.com".to_string(),
                old_phrase: "tomorrow at 2 PM".to_string(),
                new_phrase: "next friday at 4 PM".to_string(),
            }
        );

        let action = action_from_tool_call(
            "cancel_appointment",
            r#"{"email":"a@b.com","when":"next friday at 4 PM"}"#,
        );
        assert_eq!(
            action,
            StructuredAction::Cancel {
                attendee_email: "a@b.com".to_string(),
                when_phrase: "next friday at 4 PM".to_string(),
            }
        );
    }

    #[test]
    fn listing_without_filter_is_allowed() {
        let action = action_from_tool_call("get_user_appointments", "{}");
        assert_eq!(action, StructuredAction::List { attendee_email: None });
    }

    #[test]
    fn availability_tool_call_maps_to_check_availability() {
        let action = action_from_tool_call("check_availability", r#"{"date":"tomorrow"}"#);
        assert_eq!(
            action,
            StructuredAction::CheckAvailability {
                when_phrase: "tomorrow".to_string(),
            }
        );
    }

    #[test]
    fn missing_required_field_degrades_to_unknown() {
        // No email: ask the user instead of failing the request
        let action =
            action_from_tool_call("schedule_appointment", r#"{"when":"tomorrow at 2 PM"}"#);
        assert!(matches!(action, StructuredAction::Unknown { .. }));
    }

    #[test]
    fn unrecognised_tool_degrades_to_unknown() {
        let action = action_from_tool_call("order_pizza", "{}");
        assert!(matches!(action, StructuredAction::Unknown { .. }));
    }
}
