// --- File: crates/mentora_gcal/src/logic.rs ---
use crate::auth::HubType;
use crate::error::GcalError;
use google_calendar3::api::{
    ConferenceData, ConferenceSolutionKey, CreateConferenceRequest, Event, EventAttendee,
    EventDateTime,
};
use mentora_common::services::{MeetingRequest, MeetingResult};
use tracing::info;
use uuid::Uuid;

/// Builds the calendar event for a confirmed booking.
///
/// The conference create-request makes Google attach a Meet room to the
/// event; the uuid request id keeps retried inserts from minting a second
/// room for the same call.
pub fn build_meeting_event(request: &MeetingRequest) -> Result<Event, GcalError> {
    if request.end_time <= request.start_time {
        return Err(GcalError::InvalidTimeWindow(
            "End time must be after start time".to_string(),
        ));
    }

    let attendees: Vec<EventAttendee> = request
        .attendees
        .iter()
        .map(|email| EventAttendee {
            email: Some(email.clone()),
            ..Default::default()
        })
        .collect();

    Ok(Event {
        summary: Some(request.summary.clone()),
        description: request.description.clone(),
        start: Some(EventDateTime {
            date_time: Some(request.start_time),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        end: Some(EventDateTime {
            date_time: Some(request.end_time),
            time_zone: Some("UTC".to_string()),
            ..Default::default()
        }),
        attendees: if attendees.is_empty() {
            None
        } else {
            Some(attendees)
        },
        conference_data: Some(ConferenceData {
            create_request: Some(CreateConferenceRequest {
                request_id: Some(Uuid::new_v4().to_string()),
                conference_solution_key: Some(ConferenceSolutionKey {
                    type_: Some("hangoutsMeet".to_string()),
                }),
                ..Default::default()
            }),
            ..Default::default()
        }),
        ..Default::default()
    })
}

/// Join link of a created event: `hangout_link` when Google sets it,
/// otherwise the video entry point of the attached conference.
pub fn extract_meeting_link(event: &Event) -> Option<String> {
    if let Some(link) = &event.hangout_link {
        return Some(link.clone());
    }
    event
        .conference_data
        .as_ref()
        .and_then(|data| data.entry_points.as_ref())
        .and_then(|points| {
            points
                .iter()
                .find(|p| p.entry_point_type.as_deref() == Some("video"))
        })
        .and_then(|point| point.uri.clone())
}

/// Inserts the meeting event and returns the Meet link.
///
/// `conference_data_version(1)` is required for the API to act on the
/// conference create-request; `send_updates("all")` mails the calendar
/// invite to every attendee.
pub async fn create_meeting(
    hub: &HubType,
    calendar_id: &str,
    request: MeetingRequest,
) -> Result<MeetingResult, GcalError> {
    let event = build_meeting_event(&request)?;

    info!(
        "Inserting calendar event '{}' ({} attendees) with Meet conference",
        request.summary,
        request.attendees.len()
    );

    let (_response, created) = hub
        .events()
        .insert(event, calendar_id)
        .conference_data_version(1)
        .send_updates("all")
        .doit()
        .await?;

    let meeting_link = extract_meeting_link(&created).ok_or(GcalError::NoMeetingLink)?;

    Ok(MeetingResult {
        event_id: created.id,
        meeting_link: Some(meeting_link),
        status: created.status.unwrap_or_else(|| "confirmed".to_string()),
    })
}
