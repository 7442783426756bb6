use crate::chart::{ChartConfig, ChartKind};
use std::fmt::Write;

const PLOT_WIDTH: usize = 40;

/// Draws a chart as plain text, one row per label. Bars use `#`, line charts a
/// single `*` at the value's position. Values print verbatim; those that are
/// not numbers, or are negative, draw nothing.
pub fn render(config: &ChartConfig) -> String {
    let kind = match config.kind {
        ChartKind::Bar => "bar",
        ChartKind::HorizontalBar => "horizontal bar",
        ChartKind::Line => "line",
    };

    let mut out = String::new();
    let _ = writeln!(out, "{} ({kind})", config.dataset.label);

    let values = &config.dataset.values;
    let max = values
        .iter()
        .filter_map(|v| magnitude(v))
        .fold(0.0_f64, f64::max);
    let label_width = config.labels.iter().map(|l| l.len()).max().unwrap_or(0);
    let value_width = values.iter().map(|v| v.len()).max().unwrap_or(0);

    for (label, value) in config.labels.iter().zip(values) {
        let cells = match magnitude(value) {
            Some(v) if max > 0.0 => ((v / max) * PLOT_WIDTH as f64).round() as usize,
            _ => 0,
        };
        let plot = match config.kind {
            ChartKind::Bar | ChartKind::HorizontalBar => "#".repeat(cells),
            ChartKind::Line if magnitude(value).is_some() => {
                format!("{}*", " ".repeat(cells.min(PLOT_WIDTH)))
            }
            ChartKind::Line => String::new(),
        };
        let _ = writeln!(
            out,
            "{label:>label_width$} | {value:>value_width$} {plot}",
            plot = plot.trim_end()
        );
    }

    out
}

fn magnitude(value: &str) -> Option<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v >= 0.0)
}
