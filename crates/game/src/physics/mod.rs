mod ball;
mod bounce;
mod collision;

pub use ball::BallHistory;
pub use bounce::{BounceDetector, BounceState};
pub use collision::{
    collinear, fits_line, intersect, intersect_vertical, line_deviation, newest_on_line,
    oldest_on_line, solve_bounces, solve_rebound, CollisionError, SolveResult, StrikeSide,
    DEFAULT_LINE_TOLERANCE,
};
