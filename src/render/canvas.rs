use crate::render::{ChartSpec, ChartSurface};

/// In-memory chart surface; the API serves whatever chart it currently holds.
#[derive(Debug, Default, Clone)]
pub struct ChartCanvas {
    current: Option<ChartSpec>,
    redraws: u64,
}

impl ChartCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn current(&self) -> Option<&ChartSpec> {
        self.current.as_ref()
    }

    pub fn redraws(&self) -> u64 {
        self.redraws
    }
}

impl ChartSurface for ChartCanvas {
    fn set_option(&mut self, spec: ChartSpec) {
        self.current = Some(spec);
        self.redraws += 1;
    }

    fn clear(&mut self) {
        self.current = None;
    }
}
