use std::time::Duration;

use volley::net::{DEFAULT_HOST, DEFAULT_PORT, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW};
use volley::simulation::DEFAULT_COMMAND_RATE;
use volley::{AiTuning, BotConfig};

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub player_name: String,
    pub host: String,
    pub port: u16,
    pub opponent: Option<String>,
    pub tuning: AiTuning,
    pub command_rate: f64,
    pub rate_limit: usize,
    pub rate_window: Duration,
    pub extrapolation_period: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            player_name: "volley".to_string(),
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            opponent: None,
            tuning: AiTuning::default(),
            command_rate: DEFAULT_COMMAND_RATE,
            rate_limit: DEFAULT_RATE_LIMIT,
            rate_window: DEFAULT_RATE_WINDOW,
            extrapolation_period: Duration::from_millis(10),
        }
    }
}

impl ClientConfig {
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn bot_config(&self) -> BotConfig {
        BotConfig {
            player_name: self.player_name.clone(),
            opponent: self.opponent.clone(),
            tuning: self.tuning,
            command_rate: self.command_rate,
            rate_limit: self.rate_limit,
            rate_window: self.rate_window,
        }
    }
}
