//! Chart projection and chart lifecycle.
//!
//! A [`ChartSpec`] names which record field a chart shows and how. [`project`]
//! turns a window of records into labels and values, and a [`ChartSlot`] owns the
//! live chart drawn on one canvas through a [`ChartBackend`].

pub mod board;
pub mod slot;
pub mod text;

pub use board::{CanvasBoard, ChartHandle};
pub use slot::ChartSlot;

use crate::domain::{CaseField, CaseRecord};
use crate::time::format::chart_label;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ChartKind {
    Bar,
    HorizontalBar,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Canvas {
    ConfirmedCases,
    NewCases,
    NewDeaths,
}

impl fmt::Display for Canvas {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Canvas::ConfirmedCases => "confirmed_cases",
            Canvas::NewCases => "new_cases",
            Canvas::NewDeaths => "new_deaths",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChartSpec {
    pub field: CaseField,
    pub label: &'static str,
    pub color: &'static str,
    pub kind: ChartKind,
    pub canvas: Canvas,
}

const CHART_RED: &str = "#f23939";

pub const DASHBOARD_CHARTS: [ChartSpec; 3] = [
    ChartSpec {
        field: CaseField::ConfCases,
        label: "Confirmed Cases",
        color: CHART_RED,
        kind: ChartKind::HorizontalBar,
        canvas: Canvas::ConfirmedCases,
    },
    ChartSpec {
        field: CaseField::NewCase,
        label: "New Cases",
        color: CHART_RED,
        kind: ChartKind::Bar,
        canvas: Canvas::NewCases,
    },
    ChartSpec {
        field: CaseField::NewDeath,
        label: "New Deaths",
        color: CHART_RED,
        kind: ChartKind::Line,
        canvas: Canvas::NewDeaths,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Projection {
    pub labels: Vec<String>,
    pub values: Vec<String>,
}

/// Labels are submission dates as `MM/DD` (empty when the date does not parse);
/// values are the selected field verbatim. Returns `None`, meaning nothing
/// should be drawn, for an empty window or an unset field.
pub fn project(windowed: &[CaseRecord], field: Option<CaseField>) -> Option<Projection> {
    let field = field?;
    if windowed.is_empty() {
        return None;
    }

    let labels = windowed
        .iter()
        .map(|r| chart_label(&r.submission_date).unwrap_or_default())
        .collect();
    let values = windowed.iter().map(|r| r.get(field).to_string()).collect();

    Some(Projection { labels, values })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Dataset {
    pub label: String,
    pub color: String,
    pub values: Vec<String>,
}

/// Everything a backend needs to draw one chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChartConfig {
    pub kind: ChartKind,
    pub labels: Vec<String>,
    pub dataset: Dataset,
}

impl ChartSpec {
    pub fn config(&self, projection: Projection) -> ChartConfig {
        ChartConfig {
            kind: self.kind,
            labels: projection.labels,
            dataset: Dataset {
                label: self.label.to_string(),
                color: self.color.to_string(),
                values: projection.values,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChartError {
    CanvasOccupied { canvas: Canvas },
}

impl fmt::Display for ChartError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartError::CanvasOccupied { canvas } => {
                write!(f, "canvas {canvas} already has a live chart")
            }
        }
    }
}

impl std::error::Error for ChartError {}

/// Chart drawing capability. A handle stays live until passed to `destroy`.
pub trait ChartBackend {
    type Handle;

    fn create(&mut self, canvas: Canvas, config: ChartConfig) -> Result<Self::Handle, ChartError>;

    fn destroy(&mut self, handle: Self::Handle);
}
