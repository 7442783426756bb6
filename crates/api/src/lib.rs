use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use tower_http::trace::TraceLayer;

use covid_dash_core::chart::CanvasBoard;
use covid_dash_core::dashboard::{spawn_selection, Dashboard, DashboardSnapshot, Outcome};
use covid_dash_core::domain::{UsState, US_STATES};
use covid_dash_core::ingest::SeriesClient;
use covid_dash_core::query::SeriesQuery;
use covid_dash_core::time::calendar::resolve_today;

#[derive(Clone)]
pub struct AppState {
    pub dashboard: Arc<Mutex<Dashboard<CanvasBoard>>>,
    pub client: Arc<dyn SeriesClient>,
    pub query: SeriesQuery,
    /// Pins "today" for the query window; `None` uses the local date.
    pub today: Option<NaiveDate>,
}

impl AppState {
    pub fn new(client: Arc<dyn SeriesClient>, query: SeriesQuery) -> Self {
        Self {
            dashboard: Arc::new(Mutex::new(Dashboard::new(CanvasBoard::new()))),
            client,
            query,
            today: None,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/states", get(list_states))
        .route("/selection", post(select_state))
        .route("/dashboard", get(get_dashboard))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    #[serde(skip)]
    pub status: StatusCode,
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn new(status: StatusCode, error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            status,
            error: error.into(),
            message: message.into(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(self)).into_response()
    }
}

async fn healthz() -> &'static str {
    "ok"
}

#[derive(Debug, Serialize)]
struct StateOption {
    #[serde(flatten)]
    state: UsState,
    value: String,
}

async fn list_states() -> Json<Vec<StateOption>> {
    Json(
        US_STATES
            .iter()
            .map(|s| StateOption {
                state: *s,
                value: s.option_value(),
            })
            .collect(),
    )
}

#[derive(Debug, Deserialize)]
struct SelectionRequest {
    state: String,
}

async fn select_state(
    State(state): State<AppState>,
    Json(req): Json<SelectionRequest>,
) -> Result<Json<DashboardSnapshot>, ApiError> {
    let us_state = UsState::lookup(&req.state).ok_or_else(|| {
        ApiError::new(
            StatusCode::BAD_REQUEST,
            "unknown_state",
            format!("no US state or territory matches {:?}", req.state),
        )
    })?;

    let today = match state.today {
        Some(d) => d,
        None => resolve_today(None).map_err(|e| {
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", format!("{e:#}"))
        })?,
    };

    // Detached so a client disconnect cannot leave the dashboard loading.
    let outcome = spawn_selection(
        state.dashboard.clone(),
        state.client.clone(),
        state.query.clone(),
        us_state,
        today,
    )
    .await
    .map_err(|e| {
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "internal", format!("selection task failed: {e}"))
    })?;

    match outcome {
        Outcome::Applied { .. } => Ok(Json(state.dashboard.lock().await.snapshot())),
        Outcome::Stale { latest } => Err(ApiError::new(
            StatusCode::CONFLICT,
            "superseded",
            format!("selection of {} was superseded by request {latest}", us_state.abbreviation),
        )),
        Outcome::Failed(err) => {
            let err = anyhow::Error::new(err)
                .context(format!("fetching series for {}", us_state.abbreviation));
            sentry_anyhow::capture_anyhow(&err);
            Err(ApiError::new(StatusCode::BAD_GATEWAY, "fetch_failed", format!("{err:#}")))
        }
    }
}

async fn get_dashboard(State(state): State<AppState>) -> Json<DashboardSnapshot> {
    Json(state.dashboard.lock().await.snapshot())
}
