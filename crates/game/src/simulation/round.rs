use std::sync::Arc;

use glam::DVec2;

use crate::config::ArenaConfig;
use crate::geometry::{line_angle, Vector2};
use crate::net::GameTick;
use crate::physics::{solve_bounces, solve_rebound, BallHistory, BounceDetector, StrikeSide};
use crate::player::{plan_aim, AiTuning, Aim, AimContext, Paddle};

use super::clock::{ServerClock, SpeedStats};

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AngleTracker {
    heading_right: Option<bool>,
    pub last_enter_angle: f64,
    pub last_exit_angle: f64,
    pub last_deviation: f64,
}

impl AngleTracker {
    pub fn observe(&mut self, heading: &Vector2) -> Option<f64> {
        let heading_right = heading.dx >= 0.0;
        let turned = self.heading_right.is_some_and(|previous| previous != heading_right);
        self.heading_right = Some(heading_right);
        if !turned || !heading_right {
            return None;
        }

        let from = heading.trailing_point();
        self.last_exit_angle = line_angle(from.x, from.y, heading.x, heading.y);
        self.last_deviation = self.last_exit_angle - (180.0 - self.last_enter_angle);
        Some(self.last_deviation)
    }
}

/// Everything that lives for one round. Rebuilt wholesale on reset.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub arena: Arc<ArenaConfig>,
    pub ball: BallHistory,
    pub bounce: BounceDetector,
    pub own: Paddle,
    pub opponent: Paddle,
    pub clock: ServerClock,
    pub speed: SpeedStats,
    pub angles: AngleTracker,
    pub aim: Option<Aim>,
    ball_time: Option<i64>,
    ball_interval: Option<i64>,
}

impl RoundState {
    pub fn new(tuning: &AiTuning) -> Self {
        let arena = ArenaConfig::default();
        Self {
            own: Paddle::new(0.0),
            opponent: Paddle::new(arena.arena_width),
            arena: Arc::new(arena),
            ball: BallHistory::new(),
            bounce: BounceDetector::new(tuning.line_tolerance),
            clock: ServerClock::new(),
            speed: SpeedStats::default(),
            angles: AngleTracker::default(),
            aim: None,
            ball_time: None,
            ball_interval: None,
        }
    }

    pub fn reset(&mut self, tuning: &AiTuning) {
        *self = Self::new(tuning);
    }

    pub fn arena(&self) -> Arc<ArenaConfig> {
        Arc::clone(&self.arena)
    }

    /// Folds one server tick into the round. Blocks missing from the tick
    /// leave their entity untouched. Returns whether a ball sample arrived.
    pub fn apply_tick(&mut self, tick: &GameTick) -> bool {
        for block in &tick.malformed {
            log::warn!("malformed {} block in gameIsOn, skipping it", block);
        }

        if let Some(time) = tick.time {
            self.clock.advance(time);
        }

        if let Some(conf) = tick.conf {
            if conf != *self.arena {
                log::debug!("arena now {:?}", conf);
                self.arena = Arc::new(conf);
            }
        } else if !tick.malformed.contains(&"conf") {
            log::warn!("conf block missing from gameIsOn");
        }

        let half = self.arena.half_paddle();
        match (tick.left, tick.right) {
            (Some(left), Some(right)) => {
                self.own.set_position(0.0, left + half);
                self.opponent.set_position(self.arena.arena_width, right + half);
            }
            (left, right) => {
                if let Some(left) = left {
                    self.own.set_position(0.0, left + half);
                }
                if let Some(right) = right {
                    self.opponent.set_position(self.arena.arena_width, right + half);
                }
                log::warn!("player block missing from gameIsOn");
            }
        }

        match tick.ball {
            Some(ball) => {
                self.ball.push(DVec2::new(ball.x, ball.y));
                self.ball_interval = match (self.ball_time, tick.time) {
                    (Some(previous), Some(time)) if time > previous => Some(time - previous),
                    _ => None,
                };
                self.ball_time = tick.time;
                true
            }
            None => {
                if !tick.malformed.contains(&"ball") {
                    log::warn!("ball block missing from gameIsOn");
                }
                false
            }
        }
    }

    pub fn predict(&mut self, tuning: &AiTuning) -> Option<Aim> {
        let heading = self.bounce.observe(&mut self.ball, &self.arena)?;

        if let Some(interval) = self.ball_interval {
            self.speed.record(heading.position(), heading.trailing_point(), interval);
        }
        if let Some(deviation) = self.angles.observe(&heading) {
            log::debug!(
                "enter angle {:.1}, exit angle {:.1}, deviation {:.1}",
                self.angles.last_enter_angle,
                self.angles.last_exit_angle,
                deviation
            );
        }

        let arena = self.arena();
        let outbound = solve_bounces(
            heading.position(),
            heading.trailing_point(),
            &arena,
            tuning.max_iterations,
        );

        let impact = if heading.dx > 0.0 {
            if outbound.landed_on(StrikeSide::Right) {
                self.opponent.set_target(outbound.point.y);
            }
            solve_rebound(&outbound, &arena, tuning.max_iterations.saturating_mul(2))
        } else {
            outbound
        };

        let ctx = AimContext {
            arena: &arena,
            tuning,
            max_speed: self.speed.max_speed,
            opponent_y: self.opponent.y,
            distance_to_player: impact.distance,
        };
        let aim = plan_aim(&impact, &ctx);

        if let Some(enter_angle) = aim.enter_angle {
            self.angles.last_enter_angle = enter_angle;
        }
        log::trace!("aim {:?}", aim);
        self.own.set_target(aim.target_y);
        self.aim = Some(aim);
        Some(aim)
    }
}
