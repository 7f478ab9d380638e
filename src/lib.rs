pub mod client;
pub mod error;
pub mod handlers;
pub mod models;
pub mod openapi;
pub mod render;
pub mod settings;
pub mod validation;
pub mod view;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{Router, routing::get};
use chrono_tz::Tz;
use handlers::{healthz_live, healthz_ready, history_page, workout_list};
use tower_http::LatencyUnit;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::{Level, info};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::client::WorkoutClient;
use crate::openapi::ApiDoc;
use crate::settings::Settings;
use crate::view::{DisplayRegion, FilterControl, WorkoutHistoryView};

#[derive(Clone)]
pub struct AppState {
    pub settings: Settings,
    pub view: Arc<WorkoutHistoryView>,
}

impl AppState {
    pub fn from_settings(settings: Settings) -> Result<Self, Box<dyn std::error::Error>> {
        let timezone: Tz = settings.display_timezone.parse().map_err(|err| {
            format!(
                "invalid display timezone {:?}: {err}",
                settings.display_timezone
            )
        })?;
        let client = WorkoutClient::new(settings.api_base_url.clone(), settings.request_timeout())?;
        let view = WorkoutHistoryView::new(
            client,
            FilterControl::default(),
            DisplayRegion::new(),
            timezone,
        );

        Ok(Self {
            settings,
            view: Arc::new(view),
        })
    }
}

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let settings = Settings::from_env()?;

    let env_filter = if settings.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .without_time()
        .init();

    let state = AppState::from_settings(settings)?;
    let app = build_router(state.clone());

    let addr = SocketAddr::from(([0, 0, 0, 0], state.settings.port));
    info!(
        api = %state.settings.api_base_url,
        "Starting workout history view on {addr}"
    );
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

pub fn build_router(state: AppState) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(
            DefaultOnResponse::new()
                .level(Level::INFO)
                .latency_unit(LatencyUnit::Millis),
        );

    let mut router = Router::new()
        .route("/", get(history_page))
        .route("/workouts/list", get(workout_list))
        .route("/healthz/live", get(healthz_live))
        .route("/healthz/ready", get(healthz_ready))
        .with_state(state.clone());

    if state.settings.enable_swagger {
        let openapi = ApiDoc::openapi();
        let swagger = SwaggerUi::new("/docs").url("/openapi.json", openapi);
        router = router.merge(swagger);
    }

    router.layer(CorsLayer::permissive()).layer(trace_layer)
}
