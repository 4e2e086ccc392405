mod bot;
mod clock;
mod round;
mod scoreboard;

pub use bot::{Bot, BotConfig, DEFAULT_COMMAND_RATE};
pub use clock::{ServerClock, SpeedStats};
pub use round::{AngleTracker, RoundState};
pub use scoreboard::Scoreboard;
