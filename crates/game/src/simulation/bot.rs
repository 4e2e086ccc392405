use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::net::{ClientMessage, GameTick, ServerMessage, SlidingWindowLimiter};
use crate::net::{DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW};
use crate::player::{paddle_speed, slowdown_power, AiTuning, MotionController};
use crate::snapshot::Extrapolator;

use super::round::RoundState;
use super::scoreboard::Scoreboard;

pub const DEFAULT_COMMAND_RATE: f64 = 9.9;

#[derive(Debug, Clone)]
pub struct BotConfig {
    pub player_name: String,
    /// Requests a duel against this player instead of joining the queue.
    pub opponent: Option<String>,
    pub tuning: AiTuning,
    /// Upper bound on `changeDir` messages per second. Zero disables spacing.
    pub command_rate: f64,
    pub rate_limit: usize,
    pub rate_window: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            player_name: "volley".to_string(),
            opponent: None,
            tuning: AiTuning::default(),
            command_rate: DEFAULT_COMMAND_RATE,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: DEFAULT_RATE_WINDOW,
        }
    }
}

impl BotConfig {
    pub fn command_interval(&self) -> Duration {
        if self.command_rate > 0.0 {
            Duration::from_secs_f64(1.0 / self.command_rate)
        } else {
            Duration::ZERO
        }
    }
}

pub struct Bot {
    config: BotConfig,
    round: RoundState,
    scoreboard: Scoreboard,
    extrapolator: Arc<Extrapolator>,
    limiter: SlidingWindowLimiter,
    motion: MotionController,
    last_command_at: Option<Instant>,
    last_stamp: Option<(f64, Instant)>,
    epoch: Instant,
}

impl Bot {
    pub fn new(config: BotConfig) -> Self {
        let round = RoundState::new(&config.tuning);
        let extrapolator = Arc::new(Extrapolator::new(*round.arena, config.tuning.max_iterations));
        let limiter = SlidingWindowLimiter::new(config.rate_limit, config.rate_window);
        Self {
            config,
            round,
            scoreboard: Scoreboard::new(),
            extrapolator,
            limiter,
            motion: MotionController::new(),
            last_command_at: None,
            last_stamp: None,
            epoch: Instant::now(),
        }
    }

    pub fn round(&self) -> &RoundState {
        &self.round
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn extrapolator(&self) -> Arc<Extrapolator> {
        Arc::clone(&self.extrapolator)
    }

    pub fn handshake(&mut self) -> ClientMessage {
        self.reset_round();
        ClientMessage::handshake(&self.config.player_name, self.config.opponent.as_deref())
    }

    pub fn handle_message(&mut self, message: &ServerMessage, now: Instant) -> Option<ClientMessage> {
        match message {
            ServerMessage::Joined { url } => {
                log::info!("joined, watch at {}", url);
                None
            }
            ServerMessage::GameStarted => {
                log::info!("game started");
                None
            }
            ServerMessage::GameIsOn(tick) => self.on_tick(tick, now),
            ServerMessage::GameIsOver { winner } => {
                self.on_game_over(winner);
                None
            }
            ServerMessage::Unknown { msg_type } => {
                log::debug!("ignoring {} message", msg_type);
                None
            }
        }
    }

    fn on_tick(&mut self, tick: &GameTick, now: Instant) -> Option<ClientMessage> {
        let arena_before = self.round.arena();
        let has_ball = self.round.apply_tick(tick);
        if !Arc::ptr_eq(&arena_before, &self.round.arena) {
            self.extrapolator.set_arena(*self.round.arena);
        }

        if let Some(delta) = self.round.clock.delta() {
            self.extrapolator.set_min_interval(delta as f64 / 2.0);
        }

        if has_ball {
            if let Some(ball) = tick.ball {
                let stamp = self.snapshot_time(tick, now);
                self.extrapolator.add_state_at(
                    ball.x,
                    ball.y,
                    self.round.own.y,
                    self.round.opponent.y,
                    stamp,
                );
            }
            self.round.predict(&self.config.tuning);
        }

        self.steer(self.round.own.y, now)
    }

    fn on_game_over(&mut self, winner: &str) {
        let won = self.scoreboard.record(&self.config.player_name, winner);
        log::info!(
            "game over, winner {} ({}) | wins {} losses {} total {}",
            winner,
            if won { "us" } else { "them" },
            self.scoreboard.wins,
            self.scoreboard.losses,
            self.scoreboard.rounds
        );
        for (name, score) in self.scoreboard.scores() {
            log::info!("score {}: {}", name, score);
        }
        self.reset_round();
    }

    pub fn on_timer(&mut self, delta_ms: f64, now: Instant) -> Option<ClientMessage> {
        self.extrapolator.update(delta_ms);
        let current = self.extrapolator.clone_current()?;
        self.steer(current.own_paddle.y, now)
    }

    fn steer(&mut self, own_y: f64, now: Instant) -> Option<ClientMessage> {
        let target = self.round.own.target_y?;

        if let Some(last) = self.last_command_at {
            if now.saturating_duration_since(last) < self.config.command_interval() {
                return None;
            }
        }

        let tuning = &self.config.tuning;
        let power = slowdown_power(self.round.speed.max_speed, tuning);
        let speed = paddle_speed(own_y, target, &self.round.arena, tuning, power);
        if !self.motion.should_emit(speed) {
            return None;
        }

        if !self.limiter.try_acquire_at(now) {
            log::debug!("rate limit reached, dropping changeDir({})", speed);
            return None;
        }

        self.motion.mark_sent(speed);
        self.last_command_at = Some(now);
        log::trace!("changeDir({})", speed);
        Some(ClientMessage::ChangeDir(speed))
    }

    fn reset_round(&mut self) {
        self.round.reset(&self.config.tuning);
        self.extrapolator.reset();
        self.extrapolator.set_arena(*self.round.arena);
        self.motion.reset();
        self.last_command_at = None;
        self.last_stamp = None;
    }

    fn snapshot_time(&mut self, tick: &GameTick, now: Instant) -> f64 {
        let stamp = match (tick.time, self.last_stamp) {
            (Some(time), _) => time as f64,
            (None, Some((stamp, at))) => stamp + millis_between(at, now),
            (None, None) => millis_between(self.epoch, now),
        };
        self.last_stamp = Some((stamp, now));
        stamp
    }
}

fn millis_between(from: Instant, to: Instant) -> f64 {
    to.saturating_duration_since(from).as_secs_f64() * 1000.0
}
