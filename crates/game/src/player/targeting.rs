use glam::DVec2;

use crate::config::ArenaConfig;
use crate::geometry::{line_angle, Vector2};
use crate::physics::{solve_bounces, SolveResult, StrikeSide};

use super::config::AiTuning;

#[derive(Debug, Clone, Copy)]
pub struct AimContext<'a> {
    pub arena: &'a ArenaConfig,
    pub tuning: &'a AiTuning,
    pub max_speed: Option<f64>,
    pub opponent_y: f64,
    pub distance_to_player: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub target_y: f64,
    pub hit_offset: f64,
    pub impact_y: Option<f64>,
    pub enter_angle: Option<f64>,
    /// Where the chosen rebound is expected to cross the opponent strike-line.
    pub opponent_landing_y: Option<f64>,
}

impl Aim {
    pub fn center(arena: &ArenaConfig) -> Self {
        Self {
            target_y: arena.center_y(),
            hit_offset: 0.0,
            impact_y: None,
            enter_angle: None,
            opponent_landing_y: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Candidate {
    offset: f64,
    score: f64,
    landing_y: f64,
}

/// Full steering at serve speed, none at or above the ceiling speed.
pub fn hit_offset_power(max_speed: Option<f64>, tuning: &AiTuning) -> f64 {
    let Some(speed) = max_speed else {
        return 1.0;
    };
    let span = (tuning.offset_power_ceiling_speed - tuning.base_ball_speed).max(f64::EPSILON);
    (1.0 - (speed - tuning.base_ball_speed) / span).clamp(0.0, 1.0)
}

pub fn hit_offset_max(arena: &ArenaConfig, tuning: &AiTuning) -> f64 {
    let max = arena.half_paddle() - tuning.paddle_safe_margin;
    if max < tuning.min_hit_offset { 0.0 } else { max }
}

/// Shrinks the steering range for balls arriving at a shallow angle (90 is dead straight).
pub fn angle_cut(enter_angle: f64, tuning: &AiTuning) -> f64 {
    let off_straight = (enter_angle - 90.0).abs() - tuning.angle_cut_start_deg;
    let clipped = off_straight.clamp(0.0, tuning.angle_cut_span_deg);
    1.0 - clipped / 100.0
}

pub fn choose_zone(ctx: &AimContext<'_>) -> f64 {
    let arena = ctx.arena;
    if ctx.tuning.ai_level < 0.0 {
        return ctx.opponent_y;
    }
    let opponent_in_top_half = ctx.opponent_y < arena.center_y();
    let ball_far = ctx.distance_to_player > ctx.tuning.zone_switch_distance;
    match (ball_far, opponent_in_top_half) {
        (true, true) | (false, false) => arena.bottom_y(),
        (true, false) | (false, true) => arena.top_y(),
    }
}

fn candidate_offsets(top: f64, bottom: f64, step: f64) -> Vec<f64> {
    if bottom <= top {
        return vec![(top + bottom) / 2.0];
    }
    let step = step.max(0.1);
    let count = ((bottom - top) / step).floor() as usize;
    let mut offsets: Vec<f64> = (0..=count).map(|i| top + i as f64 * step).collect();
    if offsets.last().is_some_and(|last| *last < bottom) {
        offsets.push(bottom);
    }
    offsets
}

pub fn rebound_heading(incoming: &Vector2, offset: f64, arena: &ArenaConfig, tuning: &AiTuning) -> Option<DVec2> {
    let mirrored = Vector2::new(incoming.x, incoming.y, -incoming.dx, incoming.dy).normalize();
    if mirrored.dx <= 0.0 {
        return None;
    }
    let contact = -offset / arena.half_paddle();
    let turned = mirrored.rotate((tuning.offset_angle)(contact, tuning.max_deflection_deg));

    let direction = turned.direction();
    let exit_angle = direction.y.atan2(direction.x).to_degrees();
    let limit = tuning.max_exit_angle_deg;
    if direction.x <= 0.0 || exit_angle.abs() > limit {
        let clamped = exit_angle.clamp(-limit, limit).to_radians();
        return Some(DVec2::new(clamped.cos(), clamped.sin()));
    }
    Some(direction)
}

fn best_offset(
    impact: &Vector2,
    top: f64,
    bottom: f64,
    zone_y: f64,
    arena: &ArenaConfig,
    tuning: &AiTuning,
) -> Option<Candidate> {
    let start = impact.position();
    let mut candidates: Vec<Candidate> = candidate_offsets(top, bottom, tuning.offset_search_step)
        .into_iter()
        .filter_map(|offset| {
            let heading = rebound_heading(impact, offset, arena, tuning)?;
            let landing = solve_bounces(start, start - heading, arena, tuning.max_iterations);
            landing.landed_on(StrikeSide::Right).then(|| Candidate {
                offset,
                score: (landing.point.y - zone_y).abs(),
                landing_y: landing.point.y,
            })
        })
        .collect();

    // Stable: equal scores keep the first offset sampled.
    candidates.sort_by(|a, b| a.score.total_cmp(&b.score));
    candidates.into_iter().next()
}

/// Aim point for a ball predicted to reach our strike-line at `impact`.
pub fn plan_aim(impact: &SolveResult, ctx: &AimContext<'_>) -> Aim {
    let arena = ctx.arena;
    let tuning = ctx.tuning;

    if !impact.landed_on(StrikeSide::Left) {
        return Aim::center(arena);
    }

    let point = impact.point;
    let trailing = point.trailing_point();
    let enter_angle = line_angle(point.x, point.y, trailing.x, trailing.y);

    let mut aim = Aim {
        target_y: point.y,
        hit_offset: 0.0,
        impact_y: Some(point.y),
        enter_angle: Some(enter_angle),
        opponent_landing_y: None,
    };

    let near_edge = point.y < arena.paddle_height || point.y > arena.arena_height - arena.paddle_height;
    if tuning.ai_level == 0.0 || near_edge {
        return aim;
    }

    let mut strength = tuning.ai_level.abs();
    if tuning.ai_level < 0.0 {
        let span = tuning.assist_straight_span_deg.max(f64::EPSILON);
        strength *= ((enter_angle - 90.0).abs() / span).min(1.0);
    }

    let reach = hit_offset_max(arena, tuning)
        * hit_offset_power(ctx.max_speed, tuning)
        * angle_cut(enter_angle, tuning)
        * strength;

    // Keep the paddle itself inside the arena.
    let half = arena.half_paddle();
    let lowest_center = half + tuning.paddle_edge_margin;
    let highest_center = arena.arena_height - half - tuning.paddle_edge_margin;
    let top = (-reach).max(lowest_center - point.y);
    let bottom = reach.min(highest_center - point.y);

    let zone_y = choose_zone(ctx);
    match best_offset(&point, top, bottom, zone_y, arena, tuning) {
        Some(best) => {
            aim.hit_offset = best.offset;
            aim.opponent_landing_y = Some(best.landing_y);
        }
        None => {
            log::debug!("no rebound candidate reaches the opponent, hitting centre");
        }
    }
    aim.target_y = point.y + aim.hit_offset;
    aim
}
