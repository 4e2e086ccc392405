use std::collections::VecDeque;

use glam::DVec2;

use crate::geometry::Vector2;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PaddleState {
    pub y: f64,
    pub dy: f64,
}

impl PaddleState {
    pub fn at(y: f64) -> Self {
        Self { y, dy: 0.0 }
    }
}

/// Velocities are per millisecond.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Snapshot {
    pub ball: Vector2,
    pub own_paddle: PaddleState,
    pub opponent_paddle: PaddleState,
    pub timestamp_ms: f64,
}

impl Snapshot {
    pub fn new(ball_x: f64, ball_y: f64, own_y: f64, opponent_y: f64, timestamp_ms: f64) -> Self {
        Self {
            ball: Vector2::new(ball_x, ball_y, 0.0, 0.0),
            own_paddle: PaddleState::at(own_y),
            opponent_paddle: PaddleState::at(opponent_y),
            timestamp_ms,
        }
    }

    pub fn ball_position(&self) -> DVec2 {
        self.ball.position()
    }
}

#[derive(Debug)]
pub struct SnapshotBuffer {
    snapshots: VecDeque<Snapshot>,
    capacity: usize,
}

impl SnapshotBuffer {
    pub fn new(capacity: usize) -> Self {
        Self {
            snapshots: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    pub fn push(&mut self, snapshot: Snapshot) {
        while self.snapshots.len() >= self.capacity {
            self.snapshots.pop_front();
        }
        self.snapshots.push_back(snapshot);
    }

    pub fn latest(&self) -> Option<&Snapshot> {
        self.snapshots.back()
    }

    pub fn latest_pair_spanning(&self, min_span_ms: f64) -> Option<(&Snapshot, &Snapshot)> {
        let mut newest_first = self.snapshots.iter().rev();
        let latest = newest_first.next()?;
        newest_first
            .find(|s| latest.timestamp_ms - s.timestamp_ms >= min_span_ms)
            .map(|previous| (previous, latest))
    }

    pub fn iter(&self) -> impl Iterator<Item = &Snapshot> {
        self.snapshots.iter()
    }

    pub fn clear(&mut self) {
        self.snapshots.clear();
    }

    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }
}
