use serde::{Deserialize, Serialize};

pub const DEFAULT_ARENA_WIDTH: f64 = 640.0;
pub const DEFAULT_ARENA_HEIGHT: f64 = 480.0;
pub const DEFAULT_PADDLE_WIDTH: f64 = 10.0;
pub const DEFAULT_PADDLE_HEIGHT: f64 = 50.0;
pub const DEFAULT_BALL_RADIUS: f64 = 5.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    #[serde(rename = "maxWidth")]
    pub arena_width: f64,
    #[serde(rename = "maxHeight")]
    pub arena_height: f64,
    #[serde(rename = "paddleWidth")]
    pub paddle_width: f64,
    #[serde(rename = "paddleHeight")]
    pub paddle_height: f64,
    #[serde(rename = "ballRadius")]
    pub ball_radius: f64,
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            arena_width: DEFAULT_ARENA_WIDTH,
            arena_height: DEFAULT_ARENA_HEIGHT,
            paddle_width: DEFAULT_PADDLE_WIDTH,
            paddle_height: DEFAULT_PADDLE_HEIGHT,
            ball_radius: DEFAULT_BALL_RADIUS,
        }
    }
}

impl ArenaConfig {
    pub fn is_valid(&self) -> bool {
        [
            self.arena_width,
            self.arena_height,
            self.paddle_width,
            self.paddle_height,
            self.ball_radius,
        ]
        .iter()
        .all(|v| v.is_finite() && *v > 0.0)
    }

    /// Ball centre x at which the left paddle meets the ball.
    pub fn left_strike_x(&self) -> f64 {
        self.paddle_width + self.ball_radius
    }

    pub fn right_strike_x(&self) -> f64 {
        self.arena_width - self.paddle_width - self.ball_radius - 1.0
    }

    pub fn top_y(&self) -> f64 {
        self.ball_radius
    }

    pub fn bottom_y(&self) -> f64 {
        self.arena_height - self.ball_radius - 1.0
    }

    pub fn center_y(&self) -> f64 {
        self.arena_height / 2.0
    }

    pub fn half_paddle(&self) -> f64 {
        self.paddle_height / 2.0
    }
}
