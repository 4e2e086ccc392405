mod config;
mod controller;
mod state;
mod targeting;

pub use config::{default_offset_angle, AiTuning, OffsetAngleFn};
pub use controller::{paddle_speed, slowdown_power, MotionController};
pub use state::Paddle;
pub use targeting::{
    angle_cut, choose_zone, hit_offset_max, hit_offset_power, plan_aim, rebound_heading, Aim,
    AimContext,
};
