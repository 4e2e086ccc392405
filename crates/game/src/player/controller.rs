use crate::config::ArenaConfig;

use super::config::AiTuning;

/// Scales the slowdown distance down as the ball gets faster: 1.0 at serve
/// speed or when nothing has been measured, 0.0 once the ball is half a
/// px/ms over it.
pub fn slowdown_power(max_speed: Option<f64>, tuning: &AiTuning) -> f64 {
    let Some(speed) = max_speed else {
        return 1.0;
    };
    let factor = (1.0 - (speed - tuning.base_ball_speed)).clamp(0.5, 1.0);
    (factor - 0.5) * 2.0
}

/// Negative moves up.
pub fn paddle_speed(
    current_y: f64,
    target_y: f64,
    arena: &ArenaConfig,
    tuning: &AiTuning,
    power: f64,
) -> f64 {
    let half = arena.half_paddle();
    let lowest = half + tuning.paddle_edge_margin;
    let highest = (arena.arena_height - half - tuning.paddle_edge_margin).max(lowest);

    let mut min_slowdown = 0.0;
    let clamped = target_y.clamp(lowest, highest);
    if clamped != target_y {
        // Creeping into the edge makes the paddle oscillate.
        min_slowdown = tuning.edge_min_slowdown;
    }

    let delta = current_y - clamped;
    if delta == 0.0 {
        return 0.0;
    }

    let slowdown = (tuning.paddle_slowdown_margin * power).max(min_slowdown);
    let magnitude = if slowdown > 0.0 {
        (delta.abs() / slowdown).min(1.0)
    } else {
        1.0
    };
    -delta.signum() * magnitude.min(tuning.max_paddle_speed)
}

#[derive(Debug, Clone, Default)]
pub struct MotionController {
    last_sent: Option<f64>,
}

impl MotionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn should_emit(&self, speed: f64) -> bool {
        self.last_sent != Some(speed)
    }

    pub fn mark_sent(&mut self, speed: f64) {
        self.last_sent = Some(speed);
    }

    pub fn reset(&mut self) {
        self.last_sent = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn slowdown_power_shrinks_with_speed() {
        let tuning = AiTuning::default();
        assert_eq!(slowdown_power(None, &tuning), 1.0);
        assert_eq!(slowdown_power(Some(0.25), &tuning), 1.0);
        assert!((slowdown_power(Some(0.5), &tuning) - 0.5).abs() < EPS);
        assert_eq!(slowdown_power(Some(0.75), &tuning), 0.0);
        assert_eq!(slowdown_power(Some(3.0), &tuning), 0.0);
    }

    #[test]
    fn speed_sign_follows_delta() {
        let arena = ArenaConfig::default();
        let tuning = AiTuning::default();

        assert_eq!(paddle_speed(300.0, 100.0, &arena, &tuning, 1.0), -1.0);
        assert_eq!(paddle_speed(100.0, 300.0, &arena, &tuning, 1.0), 1.0);
        assert_eq!(paddle_speed(200.0, 200.0, &arena, &tuning, 1.0), 0.0);
    }

    #[test]
    fn speed_scales_inside_slowdown_distance() {
        let arena = ArenaConfig::default();
        let tuning = AiTuning::default();

        let speed = paddle_speed(200.0, 210.0, &arena, &tuning, 1.0);
        assert!((speed - 0.4).abs() < EPS);

        // Half the power halves the creep distance.
        let speed = paddle_speed(200.0, 210.0, &arena, &tuning, 0.5);
        assert!((speed - 0.8).abs() < EPS);
    }

    #[test]
    fn zero_power_moves_at_full_speed() {
        let arena = ArenaConfig::default();
        let tuning = AiTuning::default();
        assert_eq!(paddle_speed(200.0, 201.0, &arena, &tuning, 0.0), 1.0);
    }

    #[test]
    fn edge_targets_are_clamped() {
        let arena = ArenaConfig::default();
        let tuning = AiTuning::default();

        // Target above the reachable range: aims at y = 26 instead.
        let speed = paddle_speed(28.0, 0.0, &arena, &tuning, 0.0);
        assert!((speed + 0.4).abs() < EPS);
        assert_eq!(paddle_speed(26.0, 0.0, &arena, &tuning, 1.0), 0.0);
        assert_eq!(paddle_speed(454.0, 480.0, &arena, &tuning, 1.0), 0.0);
    }

    #[test]
    fn speed_is_bounded() {
        let arena = ArenaConfig::default();
        let tuning = AiTuning {
            max_paddle_speed: 0.6,
            ..Default::default()
        };
        for (current, target) in [(0.0, 480.0), (480.0, 0.0), (240.0, 241.0)] {
            let speed = paddle_speed(current, target, &arena, &tuning, 1.0);
            assert!(speed.abs() <= 0.6 + EPS);
        }
    }

    #[test]
    fn motion_controller_suppresses_repeats() {
        let mut motion = MotionController::new();
        assert!(motion.should_emit(0.5));
        motion.mark_sent(0.5);
        assert!(!motion.should_emit(0.5));
        assert!(motion.should_emit(-0.5));
        motion.reset();
        assert!(motion.should_emit(0.5));
    }
}
