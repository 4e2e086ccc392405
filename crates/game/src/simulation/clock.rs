use glam::DVec2;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ServerClock {
    time: Option<i64>,
    delta: Option<i64>,
    elapsed: i64,
}

impl ServerClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a new server time. Returns the delta to the previous tick when
    /// it moved forward; repeated or backwards times leave the delta as is.
    pub fn advance(&mut self, time: i64) -> Option<i64> {
        let previous = self.time.replace(time);
        match previous {
            Some(previous) if time > previous => {
                let delta = time - previous;
                self.delta = Some(delta);
                self.elapsed += delta;
                Some(delta)
            }
            Some(previous) => {
                log::trace!("server time did not advance: {} -> {}", previous, time);
                None
            }
            None => None,
        }
    }

    pub fn time(&self) -> Option<i64> {
        self.time
    }

    pub fn delta(&self) -> Option<i64> {
        self.delta
    }

    pub fn elapsed(&self) -> i64 {
        self.elapsed
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SpeedStats {
    pub last_speed: Option<f64>,
    pub max_speed: Option<f64>,
}

impl SpeedStats {
    pub fn record(&mut self, current: DVec2, previous: DVec2, delta_ms: i64) {
        if delta_ms <= 0 {
            return;
        }
        let speed = (current.x - previous.x).abs() / delta_ms as f64;
        self.last_speed = Some(speed);
        self.max_speed = Some(self.max_speed.map_or(speed, |max| max.max(speed)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_tracks_delta_and_elapsed() {
        let mut clock = ServerClock::new();
        assert_eq!(clock.advance(1000), None);
        assert_eq!(clock.advance(1030), Some(30));
        assert_eq!(clock.advance(1050), Some(20));
        assert_eq!(clock.delta(), Some(20));
        assert_eq!(clock.elapsed(), 50);
        assert_eq!(clock.time(), Some(1050));
    }

    #[test]
    fn clock_ignores_non_positive_delta() {
        let mut clock = ServerClock::new();
        clock.advance(1000);
        clock.advance(1030);
        assert_eq!(clock.advance(1030), None);
        assert_eq!(clock.advance(1010), None);
        assert_eq!(clock.delta(), Some(30));
        assert_eq!(clock.elapsed(), 30);
    }

    #[test]
    fn speed_keeps_running_max() {
        let mut stats = SpeedStats::default();
        stats.record(DVec2::new(110.0, 0.0), DVec2::new(100.0, 0.0), 20);
        stats.record(DVec2::new(100.0, 0.0), DVec2::new(110.0, 5.0), 40);
        assert_eq!(stats.last_speed, Some(0.25));
        assert_eq!(stats.max_speed, Some(0.5));

        stats.record(DVec2::ZERO, DVec2::ONE, 0);
        assert_eq!(stats.last_speed, Some(0.25));
    }
}
