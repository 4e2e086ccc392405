use glam::DVec2;

use crate::config::ArenaConfig;
use crate::geometry::Vector2;

use super::ball::BallHistory;
use super::collision::{collinear, oldest_on_line, DEFAULT_LINE_TOLERANCE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BounceState {
    #[default]
    NoCollision,
    PendingConfirm,
    Confirmed,
}

/// Keeps the ball heading usable across bounces.
#[derive(Debug, Clone)]
pub struct BounceDetector {
    state: BounceState,
    tolerance: f64,
}

impl Default for BounceDetector {
    fn default() -> Self {
        Self::new(DEFAULT_LINE_TOLERANCE)
    }
}

impl BounceDetector {
    pub fn new(tolerance: f64) -> Self {
        Self {
            state: BounceState::NoCollision,
            tolerance,
        }
    }

    pub fn state(&self) -> BounceState {
        self.state
    }

    pub fn reset(&mut self) {
        self.state = BounceState::NoCollision;
    }

    pub fn observe(&mut self, history: &mut BallHistory, arena: &ArenaConfig) -> Option<Vector2> {
        match self.state {
            BounceState::NoCollision => self.observe_straight(history, arena),
            BounceState::PendingConfirm => self.observe_pending(history),
            BounceState::Confirmed => {
                self.state = BounceState::NoCollision;
                let (current, previous, oldest) = history.full()?;
                collinear(current, previous, oldest, self.tolerance)
                    .then(|| Vector2::from_points(current, previous))
            }
        }
    }

    fn observe_straight(&mut self, history: &mut BallHistory, arena: &ArenaConfig) -> Option<Vector2> {
        let (current, previous, oldest) = history.full()?;

        if collinear(current, previous, oldest, self.tolerance) {
            return Some(Vector2::from_points(current, previous));
        }

        if oldest_on_line(current, previous, oldest, self.tolerance) {
            log::debug!(
                "ball samples disagree but oldest sample fits the newest line: {:?} {:?} {:?}",
                current,
                previous,
                oldest
            );
            return None;
        }

        match mirror_before_bounce(current, previous, oldest, arena) {
            Some(synthetic) => {
                history.replace_previous(synthetic);
                history.clear_oldest();
                self.state = BounceState::PendingConfirm;
                log::trace!("bounce suspected at {:?}, synthetic sample {:?}", current, synthetic);
                Some(Vector2::from_points(current, synthetic))
            }
            None => {
                log::debug!("ball changed course without crossing a boundary at {:?}", current);
                history.mark_previous_stale();
                None
            }
        }
    }

    fn observe_pending(&mut self, history: &mut BallHistory) -> Option<Vector2> {
        let Some((current, previous, synthetic)) = history.full() else {
            self.state = BounceState::NoCollision;
            return None;
        };
        history.clear_oldest();

        if oldest_on_line(current, previous, synthetic, self.tolerance) {
            self.state = BounceState::Confirmed;
            Some(Vector2::from_points(current, previous))
        } else {
            log::debug!("bounce not confirmed at {:?}, resuming straight tracking", current);
            self.state = BounceState::NoCollision;
            None
        }
    }
}

/// Reconstructs where the previous sample would have been had the ball
/// already been travelling on its post-bounce heading: the previous sample is
/// mirrored across the boundary the pre-bounce velocity was heading into.
fn mirror_before_bounce(
    current: DVec2,
    previous: DVec2,
    oldest: DVec2,
    arena: &ArenaConfig,
) -> Option<DVec2> {
    let before = previous - oldest;
    let after = current - previous;

    let flipped_y = before.y * after.y < 0.0;
    let flipped_x = before.x * after.x < 0.0;
    if !flipped_x && !flipped_y {
        return None;
    }

    let mut mirrored = previous;
    if flipped_y {
        let wall = if before.y > 0.0 {
            arena.bottom_y()
        } else {
            arena.top_y()
        };
        mirrored.y = 2.0 * wall - previous.y;
    }
    if flipped_x {
        let strike = if before.x < 0.0 {
            arena.left_strike_x()
        } else {
            arena.right_strike_x()
        };
        mirrored.x = 2.0 * strike - previous.x;
    }
    Some(mirrored)
}
