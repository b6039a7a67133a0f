// --- File: crates/bookify_assistant/src/logic.rs ---
//! The appointment orchestrator.
//!
//! Each chat request runs a linear pipeline: extract intent, validate,
//! execute against the calendar gateway, compose and dispatch the invite
//! email, respond. Any stage's failure short-circuits into a user-visible
//! outcome; nothing is silently swallowed. The orchestrator holds no state
//! between requests, the remote calendar is the single source of truth and
//! is re-read on every request.
//!
//! Known limitation: the conflict check and the subsequent create/update are
//! two separate gateway calls, not one atomic operation. Two concurrent
//! requests for the same slot can both pass the check and double-book. The
//! gateway offers no locking primitive, so this window is accepted rather
//! than papered over.

use std::sync::Arc;

use bookify_common::models::{
    Appointment, AppointmentDraft, AppointmentStatus, StructuredAction,
};
use bookify_common::services::{
    CalendarService, IntentExtractor, InviteAttachment, NotificationService,
};
use bookify_config::AppConfig;
use chrono::{DateTime, Duration, NaiveTime, TimeZone, Utc};
use chrono_tz::Tz;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::AssistantError;
use crate::invite::{compose_invite, InviteMethod};
use crate::slots::{check_slot, describe_conflicts, free_slots, SlotCheck};
use crate::time::{self, ResolvedSlot, TimeParseError};

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap());

/// Longest appointment the assistant will book. The duration comes from a
/// model-extracted field, so it is range-checked before it ever reaches
/// `Duration::minutes` (which panics outside `TimeDelta` bounds).
const MAX_DURATION_MINUTES: i64 = 24 * 60;

/// What a chat request ended up doing.
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionTaken {
    Created,
    Rescheduled,
    Cancelled,
    Listed,
    Availability,
    Clarification,
}

/// The user-visible outcome of a successfully handled request.
#[derive(Debug, Clone)]
pub struct ChatOutcome {
    pub reply: String,
    pub action: ActionTaken,
    pub appointment: Option<Appointment>,
    /// True when the calendar mutation succeeded but the confirmation email
    /// did not. The mutation is never rolled back for a mail failure.
    pub notification_failed: bool,
}

/// Drives one chat request from utterance to outcome.
///
/// All collaborators are injected; the orchestrator never reaches for
/// ambient singletons, so tests substitute in-memory services.
pub struct AppointmentOrchestrator {
    calendar: Arc<dyn CalendarService>,
    notifier: Arc<dyn NotificationService>,
    extractor: Arc<dyn IntentExtractor>,
    calendar_id: String,
    organizer_email: String,
    time_zone: Tz,
    default_duration: Duration,
    default_subject: String,
    lookahead: Duration,
}

impl AppointmentOrchestrator {
    pub fn new(
        config: &AppConfig,
        calendar: Arc<dyn CalendarService>,
        notifier: Arc<dyn NotificationService>,
        extractor: Arc<dyn IntentExtractor>,
    ) -> Result<Self, AssistantError> {
        let time_zone: Tz = config.assistant.time_zone.parse().map_err(|_| {
            AssistantError::Validation(format!(
                "unknown time zone: {}",
                config.assistant.time_zone
            ))
        })?;
        let calendar_id = config
            .gcal
            .as_ref()
            .and_then(|gcal| gcal.calendar_id.clone())
            .unwrap_or_else(|| "primary".to_string());
        let organizer_email = config
            .sendgrid
            .as_ref()
            .map(|sendgrid| sendgrid.from_email.clone())
            .unwrap_or_else(|| "appointments@bookify.local".to_string());
        Ok(Self {
            calendar,
            notifier,
            extractor,
            calendar_id,
            organizer_email,
            time_zone,
            default_duration: Duration::minutes(config.assistant.default_duration_minutes),
            default_subject: config.assistant.default_subject.clone(),
            lookahead: Duration::days(config.assistant.lookahead_days),
        })
    }

    /// Handle one utterance against the given reference instant.
    pub async fn handle(
        &self,
        utterance: &str,
        reference_now: DateTime<Utc>,
    ) -> Result<ChatOutcome, AssistantError> {
        let current = self
            .calendar
            .list_appointments(&self.calendar_id, reference_now, reference_now + self.lookahead)
            .await?;

        let action = self
            .extractor
            .extract(utterance, reference_now, &current)
            .await?;
        debug!(kind = action.kind(), "intent resolved");

        match action {
            StructuredAction::Create {
                attendee_email,
                attendee_name,
                subject,
                when_phrase,
                duration_minutes,
            } => {
                self.create(
                    &attendee_email,
                    attendee_name,
                    subject,
                    &when_phrase,
                    duration_minutes,
                    reference_now,
                )
                .await
            }
            StructuredAction::Reschedule {
                attendee_email,
                old_phrase,
                new_phrase,
            } => {
                self.reschedule(&attendee_email, &old_phrase, &new_phrase, reference_now, &current)
                    .await
            }
            StructuredAction::Cancel {
                attendee_email,
                when_phrase,
            } => {
                self.cancel(&attendee_email, &when_phrase, reference_now, &current)
                    .await
            }
            StructuredAction::List { attendee_email } => {
                Ok(self.list(attendee_email.as_deref(), &current))
            }
            StructuredAction::CheckAvailability { when_phrase } => {
                self.availability(&when_phrase, reference_now).await
            }
            StructuredAction::Unknown { hint } => Ok(ChatOutcome {
                reply: hint.filter(|h| !h.is_empty()).unwrap_or_else(|| {
                    "I can book, reschedule, cancel or list appointments, or check \
                     which slots are free on a date. What would you like to do?"
                        .to_string()
                }),
                action: ActionTaken::Clarification,
                appointment: None,
                notification_failed: false,
            }),
        }
    }

    /// Upcoming appointments within `days` of `now`, optionally filtered to
    /// one attendee. Used by the read-only listing endpoint.
    pub async fn upcoming(
        &self,
        now: DateTime<Utc>,
        days: Option<i64>,
        attendee_email: Option<&str>,
    ) -> Result<Vec<Appointment>, AssistantError> {
        let window = days.map(Duration::days).unwrap_or(self.lookahead);
        let mut appointments = self
            .calendar
            .list_appointments(&self.calendar_id, now, now + window)
            .await?;
        if let Some(email) = attendee_email {
            appointments.retain(|a| a.attendee_email.eq_ignore_ascii_case(email));
        }
        Ok(appointments)
    }

    async fn create(
        &self,
        attendee_email: &str,
        attendee_name: Option<String>,
        subject: Option<String>,
        when_phrase: &str,
        duration_minutes: Option<i64>,
        reference_now: DateTime<Utc>,
    ) -> Result<ChatOutcome, AssistantError> {
        self.require_valid_email(attendee_email)?;
        let duration = match duration_minutes {
            Some(minutes) if !(1..=MAX_DURATION_MINUTES).contains(&minutes) => {
                return Err(AssistantError::Validation(format!(
                    "an appointment cannot last {minutes} minutes"
                )))
            }
            Some(minutes) => Duration::minutes(minutes),
            None => self.default_duration,
        };
        let slot = time::resolve(
            when_phrase,
            reference_now.with_timezone(&self.time_zone),
            duration,
        )?;
        let (start, end) = (slot.start.to_utc(), slot.end.to_utc());

        self.require_free(start, end, None).await?;

        let subject = subject.unwrap_or_else(|| self.default_subject.clone());
        let draft = AppointmentDraft {
            attendee_email: attendee_email.to_string(),
            attendee_name: attendee_name.clone(),
            subject: subject.clone(),
            start,
            end,
        };
        let created = self
            .calendar
            .create_appointment(&self.calendar_id, draft)
            .await?;
        info!(event_id = %created.event_id, "appointment created");

        let appointment = Appointment {
            event_id: created.event_id,
            attendee_email: attendee_email.to_string(),
            attendee_name,
            subject: subject.clone(),
            start,
            end,
            status: AppointmentStatus::Scheduled,
            sequence: created.sequence,
        };
        let invite = compose_invite(
            InviteMethod::Request,
            &appointment,
            appointment.sequence,
            &self.organizer_email,
        );
        let notification_failed = self
            .notify(
                attendee_email,
                &format!("Appointment Confirmation - {}", self.fmt_slot(&appointment)),
                &self.confirmation_body(&appointment, "booked"),
                invite,
            )
            .await;

        let mut reply = format!(
            "Booked \"{}\" for {}.",
            subject,
            self.fmt_slot(&appointment)
        );
        self.append_ambiguity_note(&mut reply, &slot, when_phrase);
        Ok(self.outcome(reply, ActionTaken::Created, appointment, notification_failed))
    }

    async fn reschedule(
        &self,
        attendee_email: &str,
        old_phrase: &str,
        new_phrase: &str,
        reference_now: DateTime<Utc>,
        current: &[Appointment],
    ) -> Result<ChatOutcome, AssistantError> {
        self.require_valid_email(attendee_email)?;
        let now_local = reference_now.with_timezone(&self.time_zone);
        let old_slot = time::resolve(old_phrase, now_local, self.default_duration)?;
        let target = self.match_target(current, attendee_email, &old_slot, old_phrase)?;

        // Keep the appointment's existing length unless told otherwise.
        let duration = target.end - target.start;
        let new_slot = time::resolve(new_phrase, now_local, duration)?;
        let (start, end) = (new_slot.start.to_utc(), new_slot.end.to_utc());

        self.require_free(start, end, Some(&target.event_id)).await?;

        let sequence = self
            .calendar
            .reschedule_appointment(&self.calendar_id, &target.event_id, start, end)
            .await?;
        info!(event_id = %target.event_id, sequence, "appointment rescheduled");

        let appointment = Appointment {
            start,
            end,
            status: AppointmentStatus::Rescheduled,
            sequence,
            ..target.clone()
        };
        let invite = compose_invite(
            InviteMethod::Request,
            &appointment,
            sequence,
            &self.organizer_email,
        );
        let notification_failed = self
            .notify(
                attendee_email,
                &format!("Appointment Rescheduled - {}", self.fmt_slot(&appointment)),
                &self.confirmation_body(&appointment, "rescheduled"),
                invite,
            )
            .await;

        let mut reply = format!(
            "Moved \"{}\" to {}.",
            appointment.subject,
            self.fmt_slot(&appointment)
        );
        self.append_ambiguity_note(&mut reply, &new_slot, new_phrase);
        Ok(self.outcome(reply, ActionTaken::Rescheduled, appointment, notification_failed))
    }

    async fn cancel(
        &self,
        attendee_email: &str,
        when_phrase: &str,
        reference_now: DateTime<Utc>,
        current: &[Appointment],
    ) -> Result<ChatOutcome, AssistantError> {
        self.require_valid_email(attendee_email)?;
        let now_local = reference_now.with_timezone(&self.time_zone);
        let slot = time::resolve(when_phrase, now_local, self.default_duration)?;
        let target = self
            .match_target(current, attendee_email, &slot, when_phrase)?
            .clone();

        let prior_sequence = self
            .calendar
            .delete_appointment(&self.calendar_id, &target.event_id)
            .await?;
        info!(event_id = %target.event_id, "appointment cancelled");

        let appointment = Appointment {
            status: AppointmentStatus::Cancelled,
            sequence: prior_sequence + 1,
            ..target
        };
        let invite = compose_invite(
            InviteMethod::Cancel,
            &appointment,
            appointment.sequence,
            &self.organizer_email,
        );
        let notification_failed = self
            .notify(
                attendee_email,
                &format!("Appointment Cancelled - {}", self.fmt_slot(&appointment)),
                &self.confirmation_body(&appointment, "cancelled"),
                invite,
            )
            .await;

        let reply = format!(
            "Cancelled \"{}\" on {}.",
            appointment.subject,
            self.fmt_slot(&appointment)
        );
        Ok(self.outcome(reply, ActionTaken::Cancelled, appointment, notification_failed))
    }

    fn list(&self, attendee_email: Option<&str>, current: &[Appointment]) -> ChatOutcome {
        let matching: Vec<&Appointment> = current
            .iter()
            .filter(|a| {
                attendee_email
                    .map(|email| a.attendee_email.eq_ignore_ascii_case(email))
                    .unwrap_or(true)
            })
            .collect();
        let reply = if matching.is_empty() {
            "There are no upcoming appointments.".to_string()
        } else {
            let mut lines = vec!["Upcoming appointments:".to_string()];
            for (i, appt) in matching.iter().enumerate() {
                lines.push(format!(
                    "{}. {} - {} ({})",
                    i + 1,
                    self.fmt_slot(appt),
                    appt.subject,
                    appt.attendee_email
                ));
            }
            lines.join("\n")
        };
        ChatOutcome {
            reply,
            action: ActionTaken::Listed,
            appointment: None,
            notification_failed: false,
        }
    }

    /// Free business-hour slots on the spoken date, read fresh from the
    /// calendar. No mutation, no notification.
    async fn availability(
        &self,
        when_phrase: &str,
        reference_now: DateTime<Utc>,
    ) -> Result<ChatOutcome, AssistantError> {
        let local_now = reference_now.with_timezone(&self.time_zone);
        let day = time::resolve_day(when_phrase, local_now)?;
        let day_start = self
            .time_zone
            .from_local_datetime(&day.and_time(NaiveTime::MIN))
            .earliest()
            .ok_or_else(|| {
                AssistantError::Parse(TimeParseError::NonexistentLocal(when_phrase.into()))
            })?;
        let existing = self
            .calendar
            .list_appointments(
                &self.calendar_id,
                day_start.to_utc(),
                (day_start + Duration::days(1)).to_utc(),
            )
            .await?;
        let free = free_slots(day, self.time_zone, &existing);
        info!(%day, free = free.len(), "availability checked");
        let reply = if free.is_empty() {
            format!(
                "{} is fully booked between 09:00 and 17:00.",
                day.format("%A %Y-%m-%d")
            )
        } else {
            format!(
                "Free slots on {}: {}.",
                day.format("%A %Y-%m-%d"),
                free.iter()
                    .map(|slot| slot.format("%H:%M").to_string())
                    .collect::<Vec<_>>()
                    .join(", ")
            )
        };
        Ok(ChatOutcome {
            reply,
            action: ActionTaken::Availability,
            appointment: None,
            notification_failed: false,
        })
    }

    /// Find the appointment a phrase like "my 2 PM tomorrow" refers to.
    /// The match is by attendee email plus local date and hour, so minute
    /// precision is not required of the user.
    fn match_target<'a>(
        &self,
        current: &'a [Appointment],
        attendee_email: &str,
        slot: &ResolvedSlot,
        phrase: &str,
    ) -> Result<&'a Appointment, AssistantError> {
        let matches: Vec<&Appointment> = current
            .iter()
            .filter(|a| a.attendee_email.eq_ignore_ascii_case(attendee_email))
            .filter(|a| {
                time::same_date_and_hour(a.start.with_timezone(&self.time_zone), slot.start)
            })
            .collect();
        match matches.len() {
            0 => Err(AssistantError::Validation(format!(
                "no appointment for {attendee_email} found around \"{phrase}\""
            ))),
            1 => Ok(matches[0]),
            _ => Err(AssistantError::Validation(format!(
                "more than one appointment matches \"{phrase}\", please give the exact time"
            ))),
        }
    }

    /// Query the gateway for the proposed interval and fail on any overlap.
    ///
    /// This check and the mutation that follows are separate calls; see the
    /// module docs for the accepted double-booking window.
    async fn require_free(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
        exclude_event_id: Option<&str>,
    ) -> Result<(), AssistantError> {
        let neighbours = self
            .calendar
            .list_appointments(&self.calendar_id, start, end)
            .await?;
        match check_slot(start, end, exclude_event_id, &neighbours) {
            SlotCheck::Free => Ok(()),
            SlotCheck::Conflict(conflicts) => Err(AssistantError::Conflict(
                describe_conflicts(&conflicts, self.time_zone),
            )),
        }
    }

    fn require_valid_email(&self, email: &str) -> Result<(), AssistantError> {
        if EMAIL_RE.is_match(email) {
            Ok(())
        } else {
            Err(AssistantError::Validation(format!(
                "\"{email}\" does not look like an email address"
            )))
        }
    }

    async fn notify(
        &self,
        to: &str,
        subject: &str,
        html_body: &str,
        invite: InviteAttachment,
    ) -> bool {
        match self
            .notifier
            .send_email(to, subject, html_body, Some(invite))
            .await
        {
            Ok(result) => {
                debug!(status = %result.status, "confirmation email dispatched");
                false
            }
            Err(err) => {
                warn!(error = %err, "confirmation email failed after calendar change");
                true
            }
        }
    }

    fn outcome(
        &self,
        mut reply: String,
        action: ActionTaken,
        appointment: Appointment,
        notification_failed: bool,
    ) -> ChatOutcome {
        if notification_failed {
            reply.push_str(
                " The calendar change went through, but the confirmation email could not be sent.",
            );
        }
        ChatOutcome {
            reply,
            action,
            appointment: Some(appointment),
            notification_failed,
        }
    }

    fn append_ambiguity_note(&self, reply: &mut String, slot: &ResolvedSlot, phrase: &str) {
        if slot.ambiguous {
            reply.push_str(&format!(
                " I read \"{}\" as {}, say AM or PM if you meant the other.",
                phrase,
                slot.start.format("%H:%M")
            ));
        }
    }

    /// "2024-03-11 at 14:00", in the configured time zone.
    fn fmt_slot(&self, appointment: &Appointment) -> String {
        let start = appointment.start.with_timezone(&self.time_zone);
        format!("{} at {}", start.format("%Y-%m-%d"), start.format("%H:%M"))
    }

    fn confirmation_body(&self, appointment: &Appointment, verb: &str) -> String {
        let start = appointment.start.with_timezone(&self.time_zone);
        let end = appointment.end.with_timezone(&self.time_zone);
        let name = appointment
            .attendee_name
            .as_deref()
            .unwrap_or("there");
        format!(
            "<html><body>\
             <h2>Appointment {verb}</h2>\
             <p>Dear {name},</p>\
             <p>Your appointment \"{subject}\" has been {verb}.</p>\
             <ul>\
             <li>Date: {date}</li>\
             <li>Time: {start_time} to {end_time} ({tz})</li>\
             </ul>\
             <p>The attached calendar file will update your calendar automatically.</p>\
             </body></html>",
            verb = verb,
            name = name,
            subject = appointment.subject,
            date = start.format("%A, %B %e, %Y"),
            start_time = start.format("%H:%M"),
            end_time = end.format("%H:%M"),
            tz = self.time_zone,
        )
    }
}
