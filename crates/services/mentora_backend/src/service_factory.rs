// --- File: crates/services/mentora_backend/src/service_factory.rs ---
//! Service factory implementation.
//!
//! Builds the concrete external-service adapters from the runtime config
//! and exposes them behind the common trait seams. `None` means the
//! integration is switched off for this deployment; the domain degrades
//! accordingly (no meetings, no emails, no checkout).

use mentora_common::is_feature_enabled;
use mentora_common::services::{
    BoxFuture, BoxedError, CheckoutRequest, CheckoutService, CheckoutSessionInfo, CheckoutStatus,
    MeetingRequest, MeetingResult, NotificationResult, NotificationService, SchedulerService,
    ServiceFactory,
};
use mentora_config::AppConfig;
use mentora_gcal::{create_calendar_hub, GoogleMeetScheduler};
use mentora_notify::SmtpNotifier;
use mentora_stripe::StripeCheckoutService;
use std::sync::Arc;
use tracing::{error, info};

// Adapters below erase the concrete error types into BoxedError so the
// domain can hold the services as plain trait objects.

struct BoxedScheduler {
    inner: GoogleMeetScheduler,
}

impl SchedulerService for BoxedScheduler {
    type Error = BoxedError;

    fn create_meeting(&self, request: MeetingRequest) -> BoxFuture<'_, MeetingResult, Self::Error> {
        Box::pin(async move {
            self.inner
                .create_meeting(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

struct BoxedCheckout {
    inner: StripeCheckoutService,
}

impl CheckoutService for BoxedCheckout {
    type Error = BoxedError;

    fn create_checkout(
        &self,
        request: CheckoutRequest,
    ) -> BoxFuture<'_, CheckoutSessionInfo, Self::Error> {
        Box::pin(async move {
            self.inner
                .create_checkout(request)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }

    fn get_checkout(&self, session_id: &str) -> BoxFuture<'_, CheckoutStatus, Self::Error> {
        let session_id = session_id.to_string();
        Box::pin(async move {
            self.inner
                .get_checkout(&session_id)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

struct BoxedNotifier {
    inner: SmtpNotifier,
}

impl NotificationService for BoxedNotifier {
    type Error = BoxedError;

    fn send_email(
        &self,
        to: &str,
        subject: &str,
        body: &str,
        is_html: bool,
    ) -> BoxFuture<'_, NotificationResult, Self::Error> {
        let to = to.to_string();
        let subject = subject.to_string();
        let body = body.to_string();
        Box::pin(async move {
            self.inner
                .send_email(&to, &subject, &body, is_html)
                .await
                .map_err(|e| BoxedError(Box::new(e)))
        })
    }
}

/// Service factory for the Mentora backend.
pub struct MentoraServiceFactory {
    scheduler_service: Option<Arc<dyn SchedulerService<Error = BoxedError>>>,
    checkout_service: Option<Arc<dyn CheckoutService<Error = BoxedError>>>,
    notification_service: Option<Arc<dyn NotificationService<Error = BoxedError>>>,
}

impl MentoraServiceFactory {
    /// Create a new service factory from the loaded configuration.
    ///
    /// A misconfigured integration is logged and left off; startup never
    /// fails because of an optional adapter.
    pub async fn new(config: Arc<AppConfig>) -> Self {
        let mut factory = Self {
            scheduler_service: None,
            checkout_service: None,
            notification_service: None,
        };

        if is_feature_enabled(&config, config.use_gcal, config.gcal.as_ref()) {
            info!("Initializing Google Calendar scheduler...");
            let gcal_config = config.gcal.as_ref().unwrap();
            match (
                create_calendar_hub(gcal_config).await,
                gcal_config.calendar_id.clone(),
            ) {
                (Ok(hub), Some(calendar_id)) => {
                    let service = GoogleMeetScheduler::new(Arc::new(hub), calendar_id);
                    factory.scheduler_service = Some(Arc::new(BoxedScheduler { inner: service }));
                    info!("Google Calendar scheduler initialized.");
                }
                (Ok(_), None) => {
                    error!("gcal.calendar_id is not set; meetings disabled.");
                }
                (Err(e), _) => {
                    error!("Failed to initialize Google Calendar scheduler: {}. Meetings disabled.", e);
                }
            }
        } else {
            info!("GCal integration disabled via runtime config or missing gcal section.");
        }

        if is_feature_enabled(&config, config.use_stripe, config.stripe.as_ref()) {
            info!("Initializing Stripe checkout service...");
            let service = StripeCheckoutService::new(config.clone());
            factory.checkout_service = Some(Arc::new(BoxedCheckout { inner: service }));
            info!("Stripe checkout service initialized.");
        } else {
            info!("Stripe integration disabled via runtime config or missing stripe section.");
        }

        if is_feature_enabled(&config, config.use_notify, config.smtp.as_ref()) {
            info!("Initializing SMTP notifier...");
            match SmtpNotifier::from_config(config.smtp.as_ref().unwrap()) {
                Ok(notifier) => {
                    factory.notification_service = Some(Arc::new(BoxedNotifier { inner: notifier }));
                    info!("SMTP notifier initialized.");
                }
                Err(e) => {
                    error!("Failed to initialize SMTP notifier: {}. Emails disabled.", e);
                }
            }
        } else {
            info!("Email notifications disabled via runtime config or missing smtp section.");
        }

        factory
    }
}

impl ServiceFactory for MentoraServiceFactory {
    fn scheduler_service(&self) -> Option<Arc<dyn SchedulerService<Error = BoxedError>>> {
        self.scheduler_service.clone()
    }

    fn checkout_service(&self) -> Option<Arc<dyn CheckoutService<Error = BoxedError>>> {
        self.checkout_service.clone()
    }

    fn notification_service(&self) -> Option<Arc<dyn NotificationService<Error = BoxedError>>> {
        self.notification_service.clone()
    }
}
