use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

use glam::DVec2;

use crate::config::ArenaConfig;
use crate::geometry::Vector2;
use crate::physics::solve_bounces;

use super::buffer::{PaddleState, Snapshot, SnapshotBuffer};

pub const MAX_SNAPSHOTS: usize = 3;

#[derive(Debug)]
struct ExtrapolationState {
    snapshots: SnapshotBuffer,
    current: Option<Snapshot>,
    elapsed_ms: f64,
    min_interval_ms: f64,
    arena: ArenaConfig,
    max_iterations: u32,
}

impl ExtrapolationState {
    fn new(arena: ArenaConfig, max_iterations: u32) -> Self {
        Self {
            snapshots: SnapshotBuffer::new(MAX_SNAPSHOTS),
            current: None,
            elapsed_ms: 0.0,
            min_interval_ms: 0.0,
            arena,
            max_iterations,
        }
    }

    fn advance(&mut self, delta_ms: f64) {
        self.elapsed_ms += delta_ms;

        let Some(latest) = self.snapshots.latest().copied() else {
            return;
        };

        // Samples closer together than the floor give no usable velocity.
        let floor = self.min_interval_ms.max(f64::MIN_POSITIVE);
        let Some((previous, _)) = self.snapshots.latest_pair_spanning(floor) else {
            self.current = Some(Snapshot {
                timestamp_ms: latest.timestamp_ms + self.elapsed_ms,
                ..latest
            });
            return;
        };
        let previous = *previous;

        let dt = latest.timestamp_ms - previous.timestamp_ms;
        let elapsed = self.elapsed_ms;
        let ball_velocity = (latest.ball_position() - previous.ball_position()) / dt;
        let own_dy = (latest.own_paddle.y - previous.own_paddle.y) / dt;
        let opponent_dy = (latest.opponent_paddle.y - previous.opponent_paddle.y) / dt;

        let ball = project_ball(
            latest.ball_position(),
            previous.ball_position(),
            ball_velocity,
            elapsed,
            &self.arena,
            self.max_iterations,
        );

        self.current = Some(Snapshot {
            ball,
            own_paddle: project_paddle(latest.own_paddle.y, own_dy, elapsed, &self.arena),
            opponent_paddle: project_paddle(
                latest.opponent_paddle.y,
                opponent_dy,
                elapsed,
                &self.arena,
            ),
            timestamp_ms: latest.timestamp_ms + elapsed,
        });
    }
}

/// Rolling history of server snapshots projected forward to "now".
#[derive(Debug)]
pub struct Extrapolator {
    state: Mutex<ExtrapolationState>,
    epoch: Instant,
}

impl Extrapolator {
    pub fn new(arena: ArenaConfig, max_iterations: u32) -> Self {
        Self {
            state: Mutex::new(ExtrapolationState::new(arena, max_iterations)),
            epoch: Instant::now(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ExtrapolationState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn now_ms(&self) -> f64 {
        self.epoch.elapsed().as_secs_f64() * 1000.0
    }

    pub fn add_state(&self, ball_x: f64, ball_y: f64, own_y: f64, opponent_y: f64) {
        let now = self.now_ms();
        self.add_state_at(ball_x, ball_y, own_y, opponent_y, now);
    }

    pub fn add_state_at(&self, ball_x: f64, ball_y: f64, own_y: f64, opponent_y: f64, timestamp_ms: f64) {
        let mut state = self.lock();
        state
            .snapshots
            .push(Snapshot::new(ball_x, ball_y, own_y, opponent_y, timestamp_ms));
        state.elapsed_ms = 0.0;
    }

    pub fn update(&self, delta_ms: f64) {
        self.lock().advance(delta_ms);
    }

    pub fn clone_current(&self) -> Option<Snapshot> {
        let state = self.lock();
        if state.snapshots.len() < 2 {
            return None;
        }
        state.current
    }

    pub fn count(&self) -> usize {
        self.lock().snapshots.len()
    }

    pub fn elapsed_ms(&self) -> f64 {
        self.lock().elapsed_ms
    }

    /// Snapshot pairs closer together than this are not used for velocities.
    pub fn set_min_interval(&self, min_interval_ms: f64) {
        self.lock().min_interval_ms = min_interval_ms.max(0.0);
    }

    pub fn set_arena(&self, arena: ArenaConfig) {
        self.lock().arena = arena;
    }

    pub fn reset(&self) {
        let mut state = self.lock();
        let (arena, max_iterations) = (state.arena, state.max_iterations);
        *state = ExtrapolationState::new(arena, max_iterations);
    }
}

/// Moves the ball along `velocity` for `elapsed` ms. A crossed strike-line is
/// resolved with the bounce solver seeded from the real samples and the rest
/// of the path continues mirrored; a crossed wall is mirrored once.
fn project_ball(
    latest: DVec2,
    previous: DVec2,
    velocity: DVec2,
    elapsed: f64,
    arena: &ArenaConfig,
    max_iterations: u32,
) -> Vector2 {
    let left = arena.left_strike_x();
    let right = arena.right_strike_x();
    let speed = velocity.length();

    let mut position = latest + velocity * elapsed;
    let mut velocity = velocity;

    let inside = (left..=right).contains(&latest.x);
    if inside && (position.x < left || position.x > right) {
        let solved = solve_bounces(latest, previous, arena, max_iterations);
        if solved.is_exhausted() {
            position.x = position.x.clamp(left, right);
        } else {
            let remaining = (speed * elapsed - solved.distance).max(0.0);
            let mut heading = solved.point.direction().normalize_or_zero();
            heading.x = -heading.x;
            velocity = heading * speed;
            position = solved.point.position() + heading * remaining;
        }
    }

    let top = arena.top_y();
    let bottom = arena.bottom_y();
    if position.y < top {
        position.y = 2.0 * top - position.y;
        velocity.y = velocity.y.abs();
    } else if position.y > bottom {
        position.y = 2.0 * bottom - position.y;
        velocity.y = -velocity.y.abs();
    }

    Vector2::from_parts(position, velocity)
}

fn project_paddle(y: f64, dy: f64, elapsed: f64, arena: &ArenaConfig) -> PaddleState {
    let half = arena.half_paddle();
    let max = (arena.arena_height - half).max(half);
    PaddleState {
        y: (y + dy * elapsed).clamp(half, max),
        dy,
    }
}
