use crate::chart::{Canvas, ChartBackend, ChartConfig, ChartError};
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Eq)]
pub struct ChartHandle {
    canvas: Canvas,
    id: u64,
}

impl ChartHandle {
    pub fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone)]
struct LiveChart {
    id: u64,
    config: ChartConfig,
}

/// In-memory chart backend: each canvas holds at most one live chart, and
/// drawing on an occupied canvas is refused.
#[derive(Debug, Default)]
pub struct CanvasBoard {
    next_id: u64,
    live: BTreeMap<Canvas, LiveChart>,
    destroyed: u64,
}

impl CanvasBoard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, canvas: Canvas) -> Option<&ChartConfig> {
        self.live.get(&canvas).map(|c| &c.config)
    }

    /// Live charts in canvas order.
    pub fn charts(&self) -> impl Iterator<Item = (Canvas, &ChartConfig)> {
        self.live.iter().map(|(canvas, c)| (*canvas, &c.config))
    }

    pub fn live_count(&self) -> usize {
        self.live.len()
    }

    pub fn destroyed_count(&self) -> u64 {
        self.destroyed
    }
}

impl ChartBackend for CanvasBoard {
    type Handle = ChartHandle;

    fn create(&mut self, canvas: Canvas, config: ChartConfig) -> Result<ChartHandle, ChartError> {
        if self.live.contains_key(&canvas) {
            return Err(ChartError::CanvasOccupied { canvas });
        }
        self.next_id += 1;
        let id = self.next_id;
        self.live.insert(canvas, LiveChart { id, config });
        tracing::trace!(%canvas, id, "chart created");
        Ok(ChartHandle { canvas, id })
    }

    fn destroy(&mut self, handle: ChartHandle) {
        match self.live.get(&handle.canvas) {
            Some(live) if live.id == handle.id => {
                self.live.remove(&handle.canvas);
                self.destroyed += 1;
                tracing::trace!(canvas = %handle.canvas, id = handle.id, "chart destroyed");
            }
            _ => {
                tracing::warn!(canvas = %handle.canvas, id = handle.id, "destroy of unknown chart handle");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, ChartSlot, Dataset};

    fn config(values: &[&str]) -> ChartConfig {
        ChartConfig {
            kind: ChartKind::Line,
            labels: values.iter().map(|_| String::new()).collect(),
            dataset: Dataset {
                label: "New Deaths".to_string(),
                color: "#f23939".to_string(),
                values: values.iter().map(|v| v.to_string()).collect(),
            },
        }
    }

    #[test]
    fn refuses_second_chart_on_same_canvas() {
        let mut board = CanvasBoard::new();
        let first = board.create(Canvas::NewDeaths, config(&["1"])).unwrap();
        assert_eq!(
            board.create(Canvas::NewDeaths, config(&["2"])),
            Err(ChartError::CanvasOccupied {
                canvas: Canvas::NewDeaths
            })
        );

        board.destroy(first);
        assert_eq!(board.live_count(), 0);
        assert!(board.create(Canvas::NewDeaths, config(&["2"])).is_ok());
    }

    #[test]
    fn slot_replace_keeps_one_chart_per_canvas() {
        let mut board = CanvasBoard::new();
        let mut slot = ChartSlot::new(Canvas::NewCases);

        slot.replace(&mut board, config(&["1"])).unwrap();
        slot.replace(&mut board, config(&["2"])).unwrap();

        assert_eq!(board.live_count(), 1);
        assert_eq!(board.destroyed_count(), 1);
        assert_eq!(board.get(Canvas::NewCases).unwrap().dataset.values, ["2"]);
    }

    #[test]
    fn stale_handle_does_not_remove_newer_chart() {
        let mut board = CanvasBoard::new();
        let old = board.create(Canvas::NewCases, config(&["1"])).unwrap();
        let stale = ChartHandle {
            canvas: old.canvas,
            id: old.id,
        };
        board.destroy(old);
        let _new = board.create(Canvas::NewCases, config(&["2"])).unwrap();

        board.destroy(stale);
        assert_eq!(board.get(Canvas::NewCases).unwrap().dataset.values, ["2"]);
    }
}
