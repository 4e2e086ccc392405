pub mod config;
pub mod geometry;
pub mod net;
pub mod physics;
pub mod player;
pub mod simulation;
pub mod snapshot;

pub use config::ArenaConfig;
pub use geometry::{is_close_to, line_angle, Vector2};
pub use net::{
    decode_line, encode_line, BallPosition, ClientMessage, GameTick, ProtocolError,
    ServerMessage, SlidingWindowLimiter, DEFAULT_HOST, DEFAULT_PORT,
};
pub use physics::{
    collinear, intersect, solve_bounces, solve_rebound, BallHistory, BounceDetector,
    BounceState, CollisionError, SolveResult, StrikeSide,
};
pub use player::{AiTuning, Aim, MotionController, Paddle};
pub use simulation::{Bot, BotConfig, RoundState, Scoreboard};
pub use snapshot::{Extrapolator, Snapshot, SnapshotBuffer};
