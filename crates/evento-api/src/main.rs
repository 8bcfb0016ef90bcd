// Evento API server
// Decision: identity carried in request bodies (student_id / requested_by /
// approved_by); token auth is a deployment concern layered in front

mod attendance;
mod broadcast;
mod config;
mod coordinators;
mod error;
mod events;
mod live;
mod notifications;
mod registrations;
mod reminders;
mod services;
mod stats;
mod students;

use anyhow::{Context, Result};
use axum::http::{header, Method};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use evento_contracts::*;
use evento_core::{Notifier, Outbox, RegistrationEngine, SystemClock};
use evento_mailer::{spawn_dispatcher, MockTransport, RetryPolicy, SmtpTransport};
use evento_storage::{Database, DbAttendanceStore, DbEventStore, DbStudentStore};

use crate::broadcast::BroadcastHub;
use crate::config::Config;
use crate::services::{
    AttendanceService, CoordinatorService, EventService, NotificationService, RegistrationService,
    StatsService, StudentService,
};

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
    email_mode: String,
}

/// State for the health endpoint
#[derive(Clone)]
struct HealthState {
    email_mode: String,
}

async fn health(State(state): State<HealthState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        email_mode: state.email_mode.clone(),
    })
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        events::create_event,
        events::list_events,
        events::get_event,
        events::update_event,
        events::admin_update_event,
        events::delete_event,
        events::approve_event,
        events::reject_event,
        events::notify_participants,
        events::request_feedback,
        events::list_feedback,
        registrations::register,
        registrations::unregister,
        registrations::submit_feedback,
        attendance::mark_attendance,
        attendance::get_roster,
        students::create_student,
        students::list_students,
        students::get_student,
        students::student_events,
        coordinators::create_coordinator,
        coordinators::list_coordinators,
        coordinators::get_coordinator,
        coordinators::coordinator_events,
        notifications::list_notifications,
        notifications::mark_notification_read,
        stats::admin_stats,
        stats::analytics,
        live::global_live,
        live::event_live,
    ),
    components(
        schemas(
            Event, EventStatus,
            CreateEventRequest, UpdateEventRequest,
            ApproveEventRequest, RejectEventRequest, RequestFeedbackRequest,
            NotifyParticipantsResponse,
            RegisterRequest, RegisterResponse, RegisterOutcome,
            UnregisterRequest, UnregisterResponse, UnregisterOutcome,
            SubmitFeedbackRequest, SubmitFeedbackResponse,
            FeedbackEntry, FeedbackList,
            AttendanceResponse, RosterEntry, AttendanceRoster,
            Student, CreateStudentRequest, StudentEvents,
            Coordinator, CreateCoordinatorRequest,
            Notification, NotificationKind,
            AdminStats, AnalyticsSummary, MonthlyAnalytics,
            ErrorBody,
            ListResponse<Event>,
            ListResponse<Student>,
            ListResponse<Coordinator>,
            ListResponse<Notification>,
        )
    ),
    tags(
        (name = "events", description = "Event lifecycle endpoints"),
        (name = "registrations", description = "Registration, waitlist, and feedback endpoints"),
        (name = "attendance", description = "Check-in and roster endpoints"),
        (name = "students", description = "Student management endpoints"),
        (name = "coordinators", description = "Coordinator management endpoints"),
        (name = "notifications", description = "In-app notification endpoints"),
        (name = "admin", description = "Approval, moderation, and analytics endpoints"),
        (name = "live", description = "Live notice streaming endpoints (SSE)")
    ),
    info(
        title = "Evento API",
        version = "0.2.0",
        description = "API for campus event management: events, registrations with capacity/waitlist, attendance, and feedback",
        license(name = "MIT", url = "https://opensource.org/licenses/MIT")
    )
)]
struct ApiDoc;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "evento_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("evento-api starting...");

    let config = Config::from_env().context("Failed to load configuration")?;

    // Initialize database
    let db = Database::from_url(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    db.migrate().await.context("Failed to run migrations")?;
    tracing::info!("Connected to database, migrations applied");
    let db = Arc::new(db);

    // Mail dispatcher: mock transport when MOCK_EMAIL is set or SMTP is
    // not configured
    let (transport, email_mode): (Arc<dyn evento_mailer::MailTransport>, &str) =
        match (&config.smtp, config.mock_email) {
            (Some(smtp), false) => (
                Arc::new(
                    SmtpTransport::new(smtp.clone()).context("Failed to build SMTP transport")?,
                ),
                "smtp",
            ),
            _ => (Arc::new(MockTransport), "mock"),
        };
    tracing::info!(mode = email_mode, "Email transport configured");
    let mailer = spawn_dispatcher(transport, RetryPolicy::default());
    let outbox: Arc<dyn Outbox> = Arc::new(mailer);

    // Broadcast hub for SSE subscribers
    let hub = Arc::new(BroadcastHub::new());
    let notifier: Arc<dyn Notifier> = hub.clone();

    // The registration engine runs against the Postgres-backed stores
    let engine = Arc::new(RegistrationEngine::new(
        Arc::new(DbEventStore::new(db.as_ref().clone())),
        Arc::new(DbStudentStore::new(db.as_ref().clone())),
        Arc::new(DbAttendanceStore::new(db.as_ref().clone())),
        notifier.clone(),
        outbox.clone(),
        Arc::new(SystemClock),
    ));

    // Services
    let event_service = Arc::new(EventService::new(
        db.clone(),
        notifier.clone(),
        outbox.clone(),
    ));
    let registration_service = Arc::new(RegistrationService::new(engine.clone()));
    let attendance_service = Arc::new(AttendanceService::new(engine.clone(), db.clone()));
    let student_service = Arc::new(StudentService::new(db.clone()));
    let coordinator_service = Arc::new(CoordinatorService::new(db.clone()));
    let notification_service = Arc::new(NotificationService::new(db.clone()));
    let stats_service = Arc::new(StatsService::new(db.clone()));

    // Daily reminder sweep
    reminders::spawn_reminder_sweep(db.clone(), outbox.clone());

    let health_state = HealthState {
        email_mode: email_mode.to_string(),
    };

    // Build API routes. registrations must be merged BEFORE events so the
    // literal /register, /unregister segments take priority over any
    // overlapping patterns added later.
    let api_routes = Router::new()
        .merge(registrations::routes(registrations::AppState {
            service: registration_service,
        }))
        .merge(attendance::routes(attendance::AppState {
            service: attendance_service,
        }))
        .merge(live::routes(live::AppState {
            hub: hub.clone(),
            events: event_service.clone(),
        }))
        .merge(events::routes(events::AppState {
            service: event_service.clone(),
        }))
        .merge(students::routes(students::AppState {
            service: student_service,
        }))
        .merge(coordinators::routes(coordinators::AppState {
            service: coordinator_service,
            events: event_service,
        }))
        .merge(notifications::routes(notifications::AppState {
            service: notification_service,
        }))
        .merge(stats::routes(stats::AppState {
            service: stats_service,
        }));

    // API prefix from the environment (default: empty)
    // Example: API_PREFIX="/api" results in routes like /api/v1/events
    let api_prefix = std::env::var("API_PREFIX").unwrap_or_default();
    if !api_prefix.is_empty() {
        tracing::info!(prefix = %api_prefix, "API prefix configured");
    }

    let mut app = Router::new().route("/health", get(health).with_state(health_state));
    app = app.merge(build_router_with_prefix(api_routes, &api_prefix));

    // Swagger UI
    let app = app.merge(SwaggerUi::new("/swagger-ui").url("/api-doc/openapi.json", ApiDoc::openapi()));

    // CORS only when origins are configured
    let app = if config.cors_origins.is_empty() {
        tracing::info!("CORS not configured (same-origin requests only)");
        app
    } else {
        tracing::info!(origins = ?config.cors_origins, "CORS origins configured");
        app.layer(
            CorsLayer::new()
                .allow_origin(AllowOrigin::list(config.cors_origins.clone()))
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PATCH,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([
                    header::CONTENT_TYPE,
                    header::ACCEPT,
                    header::ORIGIN,
                    header::CACHE_CONTROL,
                ]),
        )
    };

    // Request tracing
    let app = app.layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}

/// Build router with optional API prefix (extracted for testing)
fn build_router_with_prefix<S: Clone + Send + Sync + 'static>(
    api_routes: Router<S>,
    api_prefix: &str,
) -> Router<S> {
    if api_prefix.is_empty() {
        api_routes
    } else {
        Router::new().nest(api_prefix, api_routes)
    }
}
