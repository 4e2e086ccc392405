/// Maps where the ball meets the paddle to how far the rebound turns.
///
/// `contact` runs from -1 (top edge of the paddle) to 1 (bottom edge); the
/// result is a rotation in degrees, positive turning the rebound downwards.
pub type OffsetAngleFn = fn(contact: f64, max_deflection_deg: f64) -> f64;

pub fn default_offset_angle(contact: f64, max_deflection_deg: f64) -> f64 {
    let contact = contact.clamp(-1.0, 1.0);
    max_deflection_deg * contact * (0.5 + 0.5 * contact.abs())
}

#[derive(Debug, Clone, Copy)]
pub struct AiTuning {
    /// 1.0 plays to win, 0.0 hits with the paddle centre, -1.0 helps the opponent.
    pub ai_level: f64,
    pub max_iterations: u32,
    pub line_tolerance: f64,

    pub paddle_safe_margin: f64,
    pub paddle_edge_margin: f64,
    pub paddle_slowdown_margin: f64,
    pub edge_min_slowdown: f64,
    pub max_paddle_speed: f64,

    pub base_ball_speed: f64,
    pub offset_power_ceiling_speed: f64,
    pub min_hit_offset: f64,

    pub angle_cut_start_deg: f64,
    pub angle_cut_span_deg: f64,
    pub assist_straight_span_deg: f64,

    pub offset_search_step: f64,
    pub max_deflection_deg: f64,
    pub max_exit_angle_deg: f64,
    pub zone_switch_distance: f64,
    pub offset_angle: OffsetAngleFn,
}

impl Default for AiTuning {
    fn default() -> Self {
        Self {
            ai_level: 1.0,
            max_iterations: 10,
            line_tolerance: 1.0,

            paddle_safe_margin: 3.0,
            paddle_edge_margin: 1.0,
            paddle_slowdown_margin: 25.0,
            edge_min_slowdown: 5.0,
            max_paddle_speed: 1.0,

            base_ball_speed: 0.25,
            offset_power_ceiling_speed: 1.25,
            min_hit_offset: 5.0,

            angle_cut_start_deg: 25.0,
            angle_cut_span_deg: 30.0,
            assist_straight_span_deg: 15.0,

            offset_search_step: 1.0,
            max_deflection_deg: 45.0,
            max_exit_angle_deg: 75.0,
            zone_switch_distance: 320.0,
            offset_angle: default_offset_angle,
        }
    }
}
