// --- File: crates/mentora_gcal/src/service.rs ---
//! Google Meet scheduler implementation.
//!
//! This module provides an implementation of the SchedulerService trait
//! backed by Google Calendar with Meet conferencing.

use mentora_common::services::{BoxFuture, MeetingRequest, MeetingResult, SchedulerService};
use std::sync::Arc;

use crate::auth::HubType;
use crate::error::GcalError;
use crate::logic::create_meeting;

/// Google Meet scheduler.
pub struct GoogleMeetScheduler {
    calendar_hub: Arc<HubType>,
    calendar_id: String,
}

impl GoogleMeetScheduler {
    /// Create a new scheduler writing into the given calendar.
    pub fn new(calendar_hub: Arc<HubType>, calendar_id: String) -> Self {
        Self {
            calendar_hub,
            calendar_id,
        }
    }
}

impl SchedulerService for GoogleMeetScheduler {
    type Error = GcalError;

    fn create_meeting(
        &self,
        request: MeetingRequest,
    ) -> BoxFuture<'_, MeetingResult, Self::Error> {
        Box::pin(async move { create_meeting(&self.calendar_hub, &self.calendar_id, request).await })
    }
}

/// Mock implementation of SchedulerService for testing.
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Mutex;

    /// Records every request and hands out a fixed Meet link.
    pub struct MockScheduler {
        pub meetings: Mutex<Vec<MeetingRequest>>,
        pub link: String,
    }

    impl MockScheduler {
        pub fn new(link: &str) -> Self {
            Self {
                meetings: Mutex::new(Vec::new()),
                link: link.to_string(),
            }
        }
    }

    impl SchedulerService for MockScheduler {
        type Error = GcalError;

        fn create_meeting(
            &self,
            request: MeetingRequest,
        ) -> BoxFuture<'_, MeetingResult, Self::Error> {
            Box::pin(async move {
                if request.end_time <= request.start_time {
                    return Err(GcalError::InvalidTimeWindow(
                        "End time must be after start time".to_string(),
                    ));
                }
                let event_id = format!("mock-event-{}", self.meetings.lock().unwrap().len() + 1);
                self.meetings.lock().unwrap().push(request);
                Ok(MeetingResult {
                    event_id: Some(event_id),
                    meeting_link: Some(self.link.clone()),
                    status: "confirmed".to_string(),
                })
            })
        }
    }
}
