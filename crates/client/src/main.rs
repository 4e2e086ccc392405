pub mod net;

use std::time::Duration;

use anyhow::Result;
use clap::Parser;

use net::{ClientConfig, NetworkClient};
use volley::AiTuning;

#[derive(Parser)]
#[command(name = "volley")]
#[command(about = "Pong bot for the line-delimited JSON game server")]
struct Args {
    #[arg(help = "Player name announced to the server")]
    name: String,

    #[arg(long, default_value = volley::DEFAULT_HOST)]
    host: String,

    #[arg(short, long, default_value_t = volley::DEFAULT_PORT)]
    port: u16,

    #[arg(long, value_name = "OPPONENT", help = "Request a duel against this player")]
    duel: Option<String>,

    #[arg(
        long,
        default_value_t = 1.0,
        allow_negative_numbers = true,
        help = "1 plays to win, 0 hits centre, negative helps the opponent"
    )]
    ai_level: f64,

    #[arg(long, default_value_t = 10, help = "Bounce cap for trajectory prediction")]
    max_iterations: u32,

    #[arg(long, default_value_t = volley::net::DEFAULT_RATE_LIMIT, help = "Commands allowed per window")]
    rate_limit: usize,

    #[arg(long, default_value_t = 2000, help = "Rate limit window in ms")]
    rate_window_ms: u64,

    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let default_filter = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter)).init();

    let config = ClientConfig {
        player_name: args.name,
        host: args.host,
        port: args.port,
        opponent: args.duel,
        tuning: AiTuning {
            ai_level: args.ai_level,
            max_iterations: args.max_iterations,
            ..Default::default()
        },
        rate_limit: args.rate_limit,
        rate_window: Duration::from_millis(args.rate_window_ms),
        ..Default::default()
    };

    log::info!(
        "starting {} against {} (ai level {})",
        config.player_name,
        config.address(),
        config.tuning.ai_level
    );

    let scoreboard = NetworkClient::new(config).run().await?;
    for (name, score) in scoreboard.scores() {
        log::info!("final score {}: {}", name, score);
    }
    Ok(())
}
