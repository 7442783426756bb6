use crate::chart::{Canvas, ChartBackend, ChartConfig, ChartError};

/// Owns at most one live chart on a canvas.
#[derive(Debug)]
pub struct ChartSlot<H> {
    canvas: Canvas,
    handle: Option<H>,
}

impl<H> ChartSlot<H> {
    pub fn new(canvas: Canvas) -> Self {
        Self {
            canvas,
            handle: None,
        }
    }

    pub fn canvas(&self) -> Canvas {
        self.canvas
    }

    pub fn is_live(&self) -> bool {
        self.handle.is_some()
    }

    /// Destroys the current chart, if any, then draws `config` in its place.
    /// If creation fails the slot is left empty.
    pub fn replace<B>(&mut self, backend: &mut B, config: ChartConfig) -> Result<(), ChartError>
    where
        B: ChartBackend<Handle = H>,
    {
        self.release(backend);
        let handle = backend.create(self.canvas, config)?;
        self.handle = Some(handle);
        Ok(())
    }

    pub fn release<B>(&mut self, backend: &mut B)
    where
        B: ChartBackend<Handle = H>,
    {
        if let Some(handle) = self.handle.take() {
            backend.destroy(handle);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartKind, Dataset};

    #[derive(Default)]
    struct Recorder {
        next: u32,
        events: Vec<String>,
    }

    impl ChartBackend for Recorder {
        type Handle = u32;

        fn create(&mut self, _canvas: Canvas, _config: ChartConfig) -> Result<u32, ChartError> {
            self.next += 1;
            self.events.push(format!("create {}", self.next));
            Ok(self.next)
        }

        fn destroy(&mut self, handle: u32) {
            self.events.push(format!("destroy {handle}"));
        }
    }

    fn config() -> ChartConfig {
        ChartConfig {
            kind: ChartKind::Bar,
            labels: vec![],
            dataset: Dataset {
                label: "New Cases".to_string(),
                color: "#f23939".to_string(),
                values: vec![],
            },
        }
    }

    #[test]
    fn replace_destroys_before_creating() {
        let mut backend = Recorder::default();
        let mut slot = ChartSlot::new(Canvas::NewCases);

        slot.replace(&mut backend, config()).unwrap();
        slot.replace(&mut backend, config()).unwrap();
        slot.replace(&mut backend, config()).unwrap();

        assert_eq!(
            backend.events,
            ["create 1", "destroy 1", "create 2", "destroy 2", "create 3"]
        );
        assert!(slot.is_live());
    }

    #[test]
    fn release_is_idempotent() {
        let mut backend = Recorder::default();
        let mut slot = ChartSlot::new(Canvas::NewDeaths);

        slot.release(&mut backend);
        slot.replace(&mut backend, config()).unwrap();
        slot.release(&mut backend);
        slot.release(&mut backend);

        assert_eq!(backend.events, ["create 1", "destroy 1"]);
        assert!(!slot.is_live());
    }
}
