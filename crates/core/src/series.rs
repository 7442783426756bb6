use crate::domain::CaseRecord;

/// Number of trailing records shown in the charts.
pub const CHART_WINDOW: usize = 7;

/// The last `size` records in received order. Shorter series come back whole;
/// nothing is padded.
pub fn window(series: &[CaseRecord], size: usize) -> &[CaseRecord] {
    &series[series.len().saturating_sub(size)..]
}
