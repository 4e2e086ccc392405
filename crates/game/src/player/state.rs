/// Paddle bookkeeping. `y` is the paddle centre.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Paddle {
    pub x: f64,
    pub y: f64,
    pub y2: Option<f64>,
    pub y3: Option<f64>,
    pub dy: f64,
    pub avg_dy: f64,
    pub target_y: Option<f64>,
    pub avg_target_y: Option<f64>,
    positioned: bool,
}

impl Paddle {
    pub fn new(x: f64) -> Self {
        Self {
            x,
            ..Self::default()
        }
    }

    pub fn set_position(&mut self, x: f64, y: f64) {
        if self.positioned {
            self.y3 = self.y2;
            self.y2 = Some(self.y);
        }
        self.positioned = true;
        self.x = x;
        self.y = y;

        if let Some(y2) = self.y2 {
            self.dy = y - y2;
        }
        if let Some(y3) = self.y3 {
            self.avg_dy = (y - y3) / 2.0;
        }
    }

    pub fn set_target(&mut self, y: f64) {
        self.avg_target_y = self.target_y.map(|previous| (previous + y) / 2.0);
        self.target_y = Some(y);
    }
}
