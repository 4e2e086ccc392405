use glam::DVec2;

pub const DEFAULT_CLOSE_TOLERANCE: f64 = 0.001;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
}

impl Vector2 {
    pub fn new(x: f64, y: f64, dx: f64, dy: f64) -> Self {
        Self { x, y, dx, dy }
    }

    pub fn from_parts(position: DVec2, direction: DVec2) -> Self {
        Self::new(position.x, position.y, direction.x, direction.y)
    }

    pub fn from_points(current: DVec2, previous: DVec2) -> Self {
        Self::from_parts(current, current - previous)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x, self.y)
    }

    pub fn direction(&self) -> DVec2 {
        DVec2::new(self.dx, self.dy)
    }

    pub fn speed(&self) -> f64 {
        self.direction().length()
    }

    pub fn scale(self, factor: f64) -> Self {
        Self::from_parts(self.position(), self.direction() * factor)
    }

    pub fn normalize(self) -> Self {
        Self::from_parts(self.position(), self.direction().normalize_or_zero())
    }

    /// Rotates the direction by `degrees`. Positive angles turn clockwise on
    /// screen (y grows downwards).
    pub fn rotate(self, degrees: f64) -> Self {
        let rotation = DVec2::from_angle(degrees.to_radians());
        Self::from_parts(self.position(), rotation.rotate(self.direction()))
    }

    pub fn trailing_point(&self) -> DVec2 {
        self.position() - self.direction()
    }
}

pub fn is_close_to(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

/// Bearing of the segment from `(x1, y1)` to `(x2, y2)` in degrees, measured
/// clockwise from screen-up: straight right is 90, straight left is 270.
/// The result is always in `[0, 360)`.
pub fn line_angle(x1: f64, y1: f64, x2: f64, y2: f64) -> f64 {
    let dx = x2 - x1;
    let dy = y2 - y1;
    if dx == 0.0 && dy == 0.0 {
        return 0.0;
    }
    dx.atan2(-dy).to_degrees().rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn line_angle_cardinal_directions() {
        assert!((line_angle(0.0, 0.0, 10.0, 0.0) - 90.0).abs() < EPS);
        assert!((line_angle(0.0, 0.0, 0.0, 10.0) - 180.0).abs() < EPS);
        assert!((line_angle(0.0, 0.0, -10.0, 0.0) - 270.0).abs() < EPS);
        assert!(line_angle(0.0, 0.0, 0.0, -10.0).abs() < EPS);
    }

    #[test]
    fn line_angle_quadrants() {
        // up-right, down-right, down-left, up-left
        assert!((line_angle(0.0, 0.0, 10.0, -10.0) - 45.0).abs() < EPS);
        assert!((line_angle(0.0, 0.0, 10.0, 10.0) - 135.0).abs() < EPS);
        assert!((line_angle(0.0, 0.0, -10.0, 10.0) - 225.0).abs() < EPS);
        assert!((line_angle(0.0, 0.0, -10.0, -10.0) - 315.0).abs() < EPS);
    }

    #[test]
    fn line_angle_zero_length() {
        assert_eq!(line_angle(3.0, 3.0, 3.0, 3.0), 0.0);
    }

    #[test]
    fn rotate_is_clockwise_on_screen() {
        let v = Vector2::new(0.0, 0.0, 1.0, 0.0).rotate(90.0);
        assert!(v.dx.abs() < EPS);
        assert!((v.dy - 1.0).abs() < EPS);
    }

    #[test]
    fn normalize_and_scale() {
        let v = Vector2::new(1.0, 2.0, 3.0, 4.0).normalize();
        assert!((v.speed() - 1.0).abs() < EPS);
        assert_eq!(v.position(), DVec2::new(1.0, 2.0));

        let scaled = v.scale(10.0);
        assert!((scaled.speed() - 10.0).abs() < EPS);

        let zero = Vector2::new(5.0, 5.0, 0.0, 0.0).normalize();
        assert_eq!(zero.direction(), DVec2::ZERO);
    }

    #[test]
    fn close_to() {
        assert!(is_close_to(1.0, 1.0005, DEFAULT_CLOSE_TOLERANCE));
        assert!(!is_close_to(1.0, 1.01, DEFAULT_CLOSE_TOLERANCE));
    }
}
