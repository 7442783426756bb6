//! Application state for one viewing session: the loaded series, the three
//! chart slots, and the request generation used to discard superseded fetches.

use crate::chart::{
    project, Canvas, CanvasBoard, ChartBackend, ChartConfig, ChartSlot, ChartSpec,
    DASHBOARD_CHARTS,
};
use crate::domain::{Series, UsState};
use crate::ingest::{FetchError, FetchErrorKind, SeriesClient};
use crate::query::SeriesQuery;
use crate::series::{window, CHART_WINDOW};
use crate::table::{render_rows, TableRow, COLUMN_HEADERS};
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

/// Ticket for one state selection. Only the newest ticket may update the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub generation: u64,
    pub state: &'static UsState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Applied { records: usize },
    /// A newer selection was issued after this one; the result was dropped.
    Stale { latest: u64 },
    Failed(FetchError),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LastError {
    pub state: &'static str,
    pub kind: FetchErrorKind,
    pub message: String,
}

pub struct Dashboard<B: ChartBackend> {
    backend: B,
    slots: Vec<(ChartSpec, ChartSlot<B::Handle>)>,
    generation: u64,
    settled: u64,
    selected: Option<&'static UsState>,
    series: Series,
    last_error: Option<LastError>,
}

impl<B: ChartBackend> Dashboard<B> {
    pub fn new(backend: B) -> Self {
        let slots = DASHBOARD_CHARTS
            .iter()
            .map(|spec| (*spec, ChartSlot::new(spec.canvas)))
            .collect();
        Self {
            backend,
            slots,
            generation: 0,
            settled: 0,
            selected: None,
            series: Vec::new(),
            last_error: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn series(&self) -> &Series {
        &self.series
    }

    /// State whose series is currently shown.
    pub fn selected(&self) -> Option<&'static UsState> {
        self.selected
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.settled < self.generation
    }

    pub fn last_error(&self) -> Option<&LastError> {
        self.last_error.as_ref()
    }

    pub fn select(&mut self, state: &'static UsState) -> Selection {
        self.generation += 1;
        tracing::info!(state = state.abbreviation, generation = self.generation, "state selected");
        Selection {
            generation: self.generation,
            state,
        }
    }

    /// Applies a fetch result if `selection` is still the newest. A failure keeps
    /// the previous series and charts and records the error for display.
    pub fn complete(&mut self, selection: Selection, result: Result<Series, FetchError>) -> Outcome {
        if selection.generation != self.generation {
            tracing::info!(
                state = selection.state.abbreviation,
                generation = selection.generation,
                latest = self.generation,
                "discarding superseded response"
            );
            return Outcome::Stale {
                latest: self.generation,
            };
        }
        self.settled = selection.generation;

        match result {
            Ok(series) => {
                let records = series.len();
                self.series = series;
                self.selected = Some(selection.state);
                self.last_error = None;
                self.refresh_charts();
                tracing::info!(state = selection.state.abbreviation, records, "series applied");
                Outcome::Applied { records }
            }
            Err(err) => {
                tracing::error!(state = selection.state.abbreviation, error = %err, "series fetch failed");
                self.last_error = Some(LastError {
                    state: selection.state.abbreviation,
                    kind: err.kind(),
                    message: err.to_string(),
                });
                Outcome::Failed(err)
            }
        }
    }

    pub fn rows(&self) -> Vec<TableRow> {
        render_rows(&self.series)
    }

    fn refresh_charts(&mut self) {
        let windowed = window(&self.series, CHART_WINDOW);
        for (spec, slot) in self.slots.iter_mut() {
            match project(windowed, Some(spec.field)) {
                Some(projection) => {
                    if let Err(err) = slot.replace(&mut self.backend, spec.config(projection)) {
                        tracing::warn!(canvas = %spec.canvas, error = %err, "chart not drawn");
                    }
                }
                // Nothing to draw: drop the chart left over from the previous state.
                None => slot.release(&mut self.backend),
            }
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChartView {
    pub canvas: Canvas,
    #[serde(flatten)]
    pub config: ChartConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    pub generation: u64,
    pub loading: bool,
    pub state: Option<UsState>,
    pub charts: Vec<ChartView>,
    pub columns: Vec<&'static str>,
    pub rows: Vec<TableRow>,
    pub last_error: Option<LastError>,
}

impl Dashboard<CanvasBoard> {
    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            generation: self.generation,
            loading: self.is_loading(),
            state: self.selected.copied(),
            charts: self
                .backend
                .charts()
                .map(|(canvas, config)| ChartView {
                    canvas,
                    config: config.clone(),
                })
                .collect(),
            columns: COLUMN_HEADERS.to_vec(),
            rows: self.rows(),
            last_error: self.last_error.clone(),
        }
    }
}

/// Runs one selection end to end. The lock is released while the request is in
/// flight, so a newer selection can overtake this one.
pub async fn select_and_load<B, C>(
    dashboard: &Mutex<Dashboard<B>>,
    client: &C,
    query: &SeriesQuery,
    state: &'static UsState,
    today: NaiveDate,
) -> Outcome
where
    B: ChartBackend,
    C: SeriesClient + ?Sized,
{
    let selection = dashboard.lock().await.select(state);
    let url = query.url_for(state.abbreviation, today);
    tracing::debug!(provider = client.provider_name(), state = state.abbreviation, "fetching series");
    let result = client.fetch_series(&url).await;
    dashboard.lock().await.complete(selection, result)
}

/// [`select_and_load`] on its own task. The selection always settles, even if
/// the caller stops waiting on the returned handle.
pub fn spawn_selection<B, C>(
    dashboard: Arc<Mutex<Dashboard<B>>>,
    client: Arc<C>,
    query: SeriesQuery,
    state: &'static UsState,
    today: NaiveDate,
) -> JoinHandle<Outcome>
where
    B: ChartBackend + Send + 'static,
    B::Handle: Send,
    C: SeriesClient + ?Sized + 'static,
{
    tokio::spawn(async move {
        select_and_load(&dashboard, client.as_ref(), &query, state, today).await
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{CaseRecord, Series};
    use std::collections::HashMap;
    use tokio::sync::Notify;

    fn state(ab: &str) -> &'static UsState {
        UsState::by_abbreviation(ab).unwrap()
    }

    fn series(len: usize, tag: &str) -> Series {
        (1..=len)
            .map(|i| CaseRecord {
                submission_date: format!("2021-02-{i:02}T00:00:00.000"),
                conf_cases: format!("{tag}{i}"),
                new_case: i.to_string(),
                new_death: "0".to_string(),
                created_at: "2021-03-01T00:00:00.000".to_string(),
                ..CaseRecord::default()
            })
            .collect()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2021, 3, 2).unwrap()
    }

    #[test]
    fn applied_series_draws_three_windowed_charts() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let sel = d.select(state("CA"));
        assert!(d.is_loading());

        assert_eq!(d.complete(sel, Ok(series(10, "ca"))), Outcome::Applied { records: 10 });
        assert!(!d.is_loading());

        let snap = d.snapshot();
        assert_eq!(snap.state.map(|s| s.abbreviation), Some("CA"));
        assert_eq!(snap.charts.len(), 3);
        let new_cases = d.backend().get(Canvas::NewCases).unwrap();
        assert_eq!(new_cases.dataset.values, ["4", "5", "6", "7", "8", "9", "10"]);
        assert_eq!(new_cases.labels[0], "02/04");
        assert_eq!(snap.rows.len(), 10);
        assert_eq!(snap.columns.len(), 14);
    }

    #[test]
    fn reselection_replaces_series_and_charts() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let sel = d.select(state("CA"));
        d.complete(sel, Ok(series(10, "ca")));
        let sel = d.select(state("TX"));
        d.complete(sel, Ok(series(3, "tx")));

        assert_eq!(d.series().len(), 3);
        assert_eq!(d.backend().live_count(), 3);
        assert_eq!(d.backend().destroyed_count(), 3);
        assert_eq!(
            d.backend().get(Canvas::ConfirmedCases).unwrap().dataset.values,
            ["tx1", "tx2", "tx3"]
        );
    }

    #[test]
    fn stale_completion_is_discarded() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let ca = d.select(state("CA"));
        let tx = d.select(state("TX"));

        assert_eq!(d.complete(tx, Ok(series(2, "tx"))), Outcome::Applied { records: 2 });
        assert_eq!(d.complete(ca, Ok(series(9, "ca"))), Outcome::Stale { latest: 2 });

        assert_eq!(d.selected().map(|s| s.abbreviation), Some("TX"));
        assert_eq!(d.series().len(), 2);
    }

    #[test]
    fn failure_keeps_previous_data_and_records_error() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let sel = d.select(state("CA"));
        d.complete(sel, Ok(series(8, "ca")));

        let sel = d.select(state("NY"));
        let err = FetchError::BadStatus {
            status: 500,
            body: "oops".to_string(),
        };
        assert_eq!(d.complete(sel, Err(err.clone())), Outcome::Failed(err));

        assert_eq!(d.selected().map(|s| s.abbreviation), Some("CA"));
        assert_eq!(d.series().len(), 8);
        assert_eq!(d.backend().live_count(), 3);
        let last = d.last_error().unwrap();
        assert_eq!(last.state, "NY");
        assert_eq!(last.kind, FetchErrorKind::BadStatus);

        let sel = d.select(state("CA"));
        d.complete(sel, Ok(series(8, "ca")));
        assert!(d.last_error().is_none());
    }

    #[test]
    fn empty_series_releases_charts_but_keeps_table_empty() {
        let mut d = Dashboard::new(CanvasBoard::new());
        let sel = d.select(state("CA"));
        d.complete(sel, Ok(series(5, "ca")));
        let sel = d.select(state("GU"));
        d.complete(sel, Ok(Vec::new()));

        assert_eq!(d.backend().live_count(), 0);
        assert!(d.rows().is_empty());
        assert_eq!(d.selected().map(|s| s.abbreviation), Some("GU"));
    }

    /// Serves canned series per state; requests for `gated` wait for `release`.
    struct GatedClient {
        data: HashMap<&'static str, Series>,
        gated: &'static str,
        release: Arc<Notify>,
        started: Arc<Notify>,
    }

    #[async_trait::async_trait]
    impl SeriesClient for GatedClient {
        fn provider_name(&self) -> &'static str {
            "gated"
        }

        async fn fetch_series(&self, url: &str) -> Result<Series, FetchError> {
            let (ab, series) = self
                .data
                .iter()
                .find(|(ab, _)| url.contains(&format!("state={ab}&")))
                .map(|(ab, s)| (*ab, s.clone()))
                .ok_or_else(|| FetchError::BadStatus {
                    status: 404,
                    body: url.to_string(),
                })?;
            if ab == self.gated {
                self.started.notify_one();
                self.release.notified().await;
            }
            Ok(series)
        }
    }

    #[tokio::test]
    async fn slow_response_cannot_overwrite_newer_selection() {
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());
        let client = Arc::new(GatedClient {
            data: HashMap::from([("CA", series(9, "ca")), ("TX", series(4, "tx"))]),
            gated: "CA",
            release: release.clone(),
            started: started.clone(),
        });
        let query = SeriesQuery::new("http://cdc.test/", "9mfq-cb36").with_app_token("token");
        let dashboard = Arc::new(Mutex::new(Dashboard::new(CanvasBoard::new())));

        let slow = {
            let (dashboard, client, query) = (dashboard.clone(), client.clone(), query.clone());
            tokio::spawn(async move {
                select_and_load(&dashboard, client.as_ref(), &query, state("CA"), today()).await
            })
        };
        started.notified().await;

        let fast = select_and_load(&dashboard, client.as_ref(), &query, state("TX"), today()).await;
        assert_eq!(fast, Outcome::Applied { records: 4 });

        release.notify_one();
        assert_eq!(slow.await.unwrap(), Outcome::Stale { latest: 2 });

        let d = dashboard.lock().await;
        assert_eq!(d.selected().map(|s| s.abbreviation), Some("TX"));
        assert_eq!(d.series().len(), 4);
    }

    #[tokio::test]
    async fn abandoned_selection_still_settles() {
        let release = Arc::new(Notify::new());
        let started = Arc::new(Notify::new());
        let client = Arc::new(GatedClient {
            data: HashMap::from([("CA", series(9, "ca"))]),
            gated: "CA",
            release: release.clone(),
            started: started.clone(),
        });
        let query = SeriesQuery::new("http://cdc.test/", "9mfq-cb36");
        let dashboard = Arc::new(Mutex::new(Dashboard::new(CanvasBoard::new())));

        let handle = spawn_selection(dashboard.clone(), client, query, state("CA"), today());
        started.notified().await;
        assert!(dashboard.lock().await.is_loading());

        // The caller goes away mid-request.
        drop(handle);
        release.notify_one();

        for _ in 0..100 {
            if !dashboard.lock().await.is_loading() {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        }
        let d = dashboard.lock().await;
        assert!(!d.is_loading());
        assert_eq!(d.selected().map(|s| s.abbreviation), Some("CA"));
        assert_eq!(d.series().len(), 9);
        assert_eq!(d.backend().live_count(), 3);
    }
}
