use glam::DVec2;

use crate::config::ArenaConfig;
use crate::geometry::{is_close_to, Vector2, DEFAULT_CLOSE_TOLERANCE};

pub const DEFAULT_LINE_TOLERANCE: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CollisionError {
    #[error("line has no extent along the solved axis")]
    Degenerate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StrikeSide {
    Left,
    Right,
}

impl StrikeSide {
    pub fn strike_x(self, arena: &ArenaConfig) -> f64 {
        match self {
            StrikeSide::Left => arena.left_strike_x(),
            StrikeSide::Right => arena.right_strike_x(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    pub point: Vector2,
    pub distance: f64,
    pub iterations: u32,
    /// Strike-line reached, `None` when the iteration cap ran out first.
    pub side: Option<StrikeSide>,
}

impl SolveResult {
    fn exhausted(point: Vector2, distance: f64, iterations: u32) -> Self {
        Self {
            point,
            distance,
            iterations,
            side: None,
        }
    }

    pub fn landed_on(&self, side: StrikeSide) -> bool {
        self.side == Some(side)
    }

    pub fn is_exhausted(&self) -> bool {
        self.side.is_none()
    }
}

/// X coordinate where the line through `(x1, y1)` and `(x2, y2)` crosses the
/// horizontal line `y = y_target`.
pub fn intersect(y_target: f64, x1: f64, y1: f64, x2: f64, y2: f64) -> Result<f64, CollisionError> {
    let dy = y1 - y2;
    if dy.abs() < f64::EPSILON {
        return Err(CollisionError::Degenerate);
    }
    let x = x2 - ((x1 - x2) / dy) * (y2 - y_target);
    if x.is_finite() {
        Ok(x)
    } else {
        Err(CollisionError::Degenerate)
    }
}

pub fn intersect_vertical(
    x_target: f64,
    x1: f64,
    y1: f64,
    x2: f64,
    y2: f64,
) -> Result<f64, CollisionError> {
    intersect(x_target, y1, x1, y2, x2)
}

pub fn line_deviation(point: DVec2, a: DVec2, b: DVec2) -> Result<f64, CollisionError> {
    let on_line_x = intersect(point.y, a.x, a.y, b.x, b.y)?;
    let unit = (a - b).normalize_or_zero();
    Ok(((point.x - on_line_x) * unit.y).abs())
}

/// Whether `point` continues the line through `a` and `b` within `tolerance`.
///
/// Points sharing one y (or one x) always qualify. A degenerate line does not.
pub fn fits_line(point: DVec2, a: DVec2, b: DVec2, tolerance: f64) -> bool {
    let eps = DEFAULT_CLOSE_TOLERANCE;
    if is_close_to(point.y, a.y, eps) && is_close_to(point.y, b.y, eps) {
        return true;
    }
    if is_close_to(point.x, a.x, eps) && is_close_to(point.x, b.x, eps) {
        return true;
    }
    match line_deviation(point, a, b) {
        Ok(deviation) => deviation < tolerance,
        Err(_) => false,
    }
}

pub fn collinear(p1: DVec2, p2: DVec2, p3: DVec2, tolerance: f64) -> bool {
    fits_line(p1, p2, p3, tolerance)
}

pub fn newest_on_line(current: DVec2, previous: DVec2, oldest: DVec2, tolerance: f64) -> bool {
    fits_line(current, previous, oldest, tolerance)
}

pub fn oldest_on_line(current: DVec2, previous: DVec2, oldest: DVec2, tolerance: f64) -> bool {
    fits_line(oldest, current, previous, tolerance)
}

/// Follows the ball from `position`, moving away from `previous`, bouncing off
/// the top and bottom edges until it reaches a strike-line or `max_iterations`
/// bounces have been used.
pub fn solve_bounces(
    position: DVec2,
    previous: DVec2,
    arena: &ArenaConfig,
    max_iterations: u32,
) -> SolveResult {
    let mut direction = position - previous;
    let mut current = position;
    let mut distance = 0.0;
    let mut iterations = 0;

    if direction.length_squared() < f64::EPSILON {
        return SolveResult::exhausted(Vector2::from_parts(current, direction), 0.0, max_iterations);
    }

    let left = arena.left_strike_x();
    let right = arena.right_strike_x();

    while iterations < max_iterations {
        if direction.y.abs() < f64::EPSILON {
            let side = if direction.x < 0.0 {
                StrikeSide::Left
            } else {
                StrikeSide::Right
            };
            let strike = DVec2::new(side.strike_x(arena), current.y);
            return SolveResult {
                point: Vector2::from_parts(strike, direction),
                distance: distance + current.distance(strike),
                iterations,
                side: Some(side),
            };
        }

        let edge_y = if direction.y < 0.0 {
            arena.top_y()
        } else {
            arena.bottom_y()
        };
        let trailing = current - direction;
        let Ok(edge_x) = intersect(edge_y, current.x, current.y, trailing.x, trailing.y) else {
            break;
        };

        if edge_x < left || edge_x > right {
            let side = if edge_x < left {
                StrikeSide::Left
            } else {
                StrikeSide::Right
            };
            let strike_x = side.strike_x(arena);
            let Ok(strike_y) =
                intersect_vertical(strike_x, current.x, current.y, trailing.x, trailing.y)
            else {
                break;
            };
            let strike = DVec2::new(strike_x, strike_y);
            return SolveResult {
                point: Vector2::from_parts(strike, direction),
                distance: distance + current.distance(strike),
                iterations,
                side: Some(side),
            };
        }

        let edge = DVec2::new(edge_x, edge_y);
        distance += current.distance(edge);
        current = edge;
        direction.y = -direction.y;
        iterations += 1;
    }

    SolveResult::exhausted(Vector2::from_parts(current, direction), distance, iterations.max(max_iterations))
}

/// Continues a landed solve after the paddle sends the ball back.
pub fn solve_rebound(landed: &SolveResult, arena: &ArenaConfig, max_iterations: u32) -> SolveResult {
    if landed.is_exhausted() {
        return *landed;
    }
    let start = landed.point.position();
    let mut direction = landed.point.direction();
    direction.x = -direction.x;

    let budget = max_iterations.saturating_sub(landed.iterations);
    let mut result = solve_bounces(start, start - direction, arena, budget);
    result.distance += landed.distance;
    result.iterations += landed.iterations;
    result
}
