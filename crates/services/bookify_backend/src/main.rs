// File: services/bookify_backend/src/main.rs
use axum::{routing::get, Router};
use bookify_assistant::extractor::OpenAiIntentExtractor;
use bookify_assistant::handlers::AssistantState;
use bookify_assistant::logic::AppointmentOrchestrator;
use bookify_assistant::routes as assistant_routes;
use bookify_common::services::{
    CalendarService, IntentExtractor, NotificationService, NullNotifier,
};
use bookify_config::load_config;
use bookify_gcal::{create_calendar_hub, GoogleCalendarGateway};
use bookify_sendgrid::SendGridMailer;
use chrono_tz::Tz;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

#[tokio::main]
async fn main() {
    bookify_common::logging::init();
    let config = Arc::new(load_config().expect("Failed to load config"));

    // The calendar store and the intent extractor are mandatory; without
    // either, no chat request can be served.
    if !config.use_gcal {
        panic!("use_gcal must be enabled: the assistant has no calendar store without it");
    }
    if !config.use_openai {
        panic!("use_openai must be enabled: the assistant cannot interpret messages without it");
    }

    let gcal_config = config.gcal.as_ref().expect("GCal config missing");
    let calendar_hub = create_calendar_hub(gcal_config)
        .await
        .expect("Failed to create Google Calendar client");
    let calendar: Arc<dyn CalendarService> =
        Arc::new(GoogleCalendarGateway::new(Arc::new(calendar_hub)));

    let notifier: Arc<dyn NotificationService> = if config.use_sendgrid {
        let sendgrid_config = config.sendgrid.as_ref().expect("SendGrid config missing");
        Arc::new(
            SendGridMailer::from_config(sendgrid_config)
                .expect("SENDGRID_API_KEY not set while use_sendgrid is enabled"),
        )
    } else {
        warn!("mail disabled: bookings will report the email as failed");
        Arc::new(NullNotifier)
    };

    let openai_config = config.openai.as_ref().expect("OpenAI config missing");
    let time_zone: Tz = config
        .assistant
        .time_zone
        .parse()
        .expect("Invalid assistant.time_zone");
    let extractor: Arc<dyn IntentExtractor> = Arc::new(
        OpenAiIntentExtractor::from_config(openai_config, time_zone)
            .expect("OPENAI_API_KEY not set while use_openai is enabled"),
    );

    let orchestrator = Arc::new(
        AppointmentOrchestrator::new(&config, calendar, notifier, extractor)
            .expect("Failed to construct orchestrator"),
    );
    let assistant_state = Arc::new(AssistantState {
        config: config.clone(),
        orchestrator,
    });

    let api_router = Router::new()
        .route("/", get(|| async { "Welcome to the Bookify API!" }))
        .merge(assistant_routes(assistant_state));

    #[allow(unused_mut)]
    let mut app = Router::new()
        .nest("/api", api_router)
        .layer(TraceLayer::new_for_http());

    // Conditionally add Swagger UI and JSON endpoint if openapi feature enabled
    #[cfg(feature = "openapi")]
    {
        use bookify_assistant::doc::AssistantApiDoc;
        use utoipa::OpenApi;
        use utoipa_swagger_ui::SwaggerUi;

        #[derive(OpenApi)]
        #[openapi(
            info(
                title = "Bookify API",
                version = "0.1.0",
                description = "Natural-language appointment booking API",
                license(name = "MIT", url = "https://opensource.org/licenses/MIT")
            ),
            components(),
            tags( (name = "Bookify", description = "Core service endpoints")),
            servers( (url = "/api", description = "Main API Prefix")),
        )]
        struct ApiDoc;

        let mut openapi_doc = ApiDoc::openapi();
        openapi_doc.merge(AssistantApiDoc::openapi());
        info!("adding Swagger UI at /api/docs");

        let swagger_ui =
            SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", openapi_doc.clone());
        app = app.merge(swagger_ui);
    }

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await.expect("Failed to bind");
    info!("starting server at http://{}", addr);
    info!("API endpoints available at http://{}/api", addr);

    axum::serve(listener, app.into_make_service())
        .await
        .expect("Server error");
}
