use glam::DVec2;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BallHistory {
    samples: [Option<DVec2>; 3],
    stale_previous: bool,
}

impl BallHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new sample. Normally every slot shifts back by one; when the
    /// previous sample has been marked stale it is dropped instead of becoming
    /// the oldest one.
    pub fn push(&mut self, position: DVec2) {
        let [current, previous, _] = self.samples;
        let oldest = if self.stale_previous { None } else { previous };
        self.samples = [Some(position), current, oldest];
        self.stale_previous = false;
    }

    pub fn current(&self) -> Option<DVec2> {
        self.samples[0]
    }

    pub fn previous(&self) -> Option<DVec2> {
        self.samples[1]
    }

    pub fn oldest(&self) -> Option<DVec2> {
        self.samples[2]
    }

    pub fn full(&self) -> Option<(DVec2, DVec2, DVec2)> {
        Some((self.samples[0]?, self.samples[1]?, self.samples[2]?))
    }

    pub fn replace_previous(&mut self, position: DVec2) {
        self.samples[1] = Some(position);
    }

    pub fn clear_oldest(&mut self) {
        self.samples[2] = None;
    }

    pub fn mark_previous_stale(&mut self) {
        self.stale_previous = true;
    }

    pub fn is_empty(&self) -> bool {
        self.samples.iter().all(Option::is_none)
    }
}
