use std::time::{Duration, Instant};

use volley::{
    decode_line, encode_line, AiTuning, ArenaConfig, BounceState, Bot, BotConfig, ClientMessage,
    ServerMessage,
};

fn centre_hitter() -> BotConfig {
    BotConfig {
        player_name: "bot".into(),
        tuning: AiTuning {
            ai_level: 0.0,
            ..Default::default()
        },
        ..Default::default()
    }
}

fn game_is_on(time: i64, ball: (f64, f64), left: f64, right: f64) -> ServerMessage {
    let line = format!(
        r#"{{"msgType":"gameIsOn","data":{{"time":{time},
            "left":{{"y":{left},"playerName":"bot"}},
            "right":{{"y":{right},"playerName":"rival"}},
            "ball":{{"pos":{{"x":{},"y":{}}}}},
            "conf":{{"maxWidth":640,"maxHeight":480,"paddleHeight":50,"paddleWidth":10,"ballRadius":5,"tickInterval":30}}}}}}"#,
        ball.0, ball.1
    );
    decode_line(&line).unwrap()
}

#[test]
fn game_over_resets_round_state() {
    let mut bot = Bot::new(centre_hitter());
    let start = Instant::now();

    for (i, x) in [400.0, 420.0, 440.0].into_iter().enumerate() {
        bot.handle_message(&game_is_on(i as i64 * 30, (x, 200.0), 100.0, 300.0), start);
    }
    bot.on_timer(10.0, start);
    assert!(bot.round().own.target_y.is_some());
    assert!(bot.round().opponent.target_y.is_some());
    assert_eq!(bot.extrapolator().count(), 3);

    let over = decode_line(r#"{"msgType":"gameIsOver","data":"rival"}"#).unwrap();
    assert_eq!(bot.handle_message(&over, start), None);

    let round = bot.round();
    assert_eq!(round.own.target_y, None);
    assert_eq!(round.own.avg_target_y, None);
    assert_eq!(round.opponent.target_y, None);
    assert!(round.ball.is_empty());
    assert_eq!(round.bounce.state(), BounceState::NoCollision);
    assert_eq!(*round.arena, ArenaConfig::default());
    assert_eq!(round.speed.max_speed, None);
    assert_eq!(bot.extrapolator().count(), 0);
    assert!(bot.extrapolator().clone_current().is_none());

    let board = bot.scoreboard();
    assert_eq!((board.rounds, board.wins, board.losses), (1, 0, 1));
    assert_eq!(board.score("rival"), 1);
}

#[test]
fn scoreboard_survives_rounds() {
    let mut bot = Bot::new(centre_hitter());
    let start = Instant::now();
    for winner in ["bot", "rival", "bot"] {
        let over = ServerMessage::GameIsOver {
            winner: winner.into(),
        };
        bot.handle_message(&over, start);
    }
    let board = bot.scoreboard();
    assert_eq!((board.rounds, board.wins, board.losses), (3, 2, 1));
    assert_eq!(board.score("bot"), 2);
}

#[test]
fn partial_packets_do_not_abort_the_round() {
    let mut bot = Bot::new(centre_hitter());
    let start = Instant::now();

    bot.handle_message(&game_is_on(0, (400.0, 300.0), 100.0, 100.0), start);

    let no_ball = decode_line(
        r#"{"msgType":"gameIsOn","data":{"time":30,"left":{"y":120},"right":{"y":100}}}"#,
    )
    .unwrap();
    assert_eq!(bot.handle_message(&no_ball, start), None);
    assert_eq!(bot.round().own.y, 145.0);

    let broken_paddles = decode_line(
        r#"{"msgType":"gameIsOn","data":{"time":60,"ball":{"pos":{"x":390,"y":300}},"left":{},"right":null}}"#,
    )
    .unwrap();
    let ServerMessage::GameIsOn(tick) = &broken_paddles else {
        panic!("expected gameIsOn");
    };
    assert_eq!(tick.malformed, vec!["left"]);
    bot.handle_message(&broken_paddles, start);
    assert_eq!(bot.round().own.y, 145.0);
    assert_eq!(bot.round().ball.current().map(|p| p.x), Some(390.0));

    // Tracking picks up again as soon as complete ticks return.
    let command = bot.handle_message(&game_is_on(90, (380.0, 300.0), 120.0, 100.0), start);
    assert_eq!(bot.round().own.target_y, Some(300.0));
    assert_eq!(command, Some(ClientMessage::ChangeDir(1.0)));
}

#[test]
fn duel_handshake_is_encoded_on_one_line() {
    let mut bot = Bot::new(BotConfig {
        player_name: "bot".into(),
        opponent: Some("rival".into()),
        ..Default::default()
    });
    let line = encode_line(&bot.handshake()).unwrap();
    assert_eq!(line, "{\"msgType\":\"requestDuel\",\"data\":[\"bot\",\"rival\"]}\n");
}

#[test]
fn burst_of_commands_is_rate_limited() {
    let mut bot = Bot::new(BotConfig {
        command_rate: 0.0,
        rate_limit: 3,
        rate_window: Duration::from_millis(2000),
        ..centre_hitter()
    });
    let start = Instant::now();
    let at = |ms: u64| start + Duration::from_millis(ms);

    // Ball heading for y = 300; paddle centre creeping toward it gives a new
    // speed every tick.
    let ticks = [
        (400.0, 270.0),
        (390.0, 270.0),
        (380.0, 270.0),
        (370.0, 265.0),
        (360.0, 260.0),
        (350.0, 255.0),
    ];
    let mut sent = Vec::new();
    for (i, (x, left)) in ticks.into_iter().enumerate() {
        let message = game_is_on(i as i64 * 40, (x, 300.0), left, 100.0);
        if let Some(command) = bot.handle_message(&message, at(i as u64 * 100)) {
            sent.push(command);
        }
    }
    assert_eq!(
        sent,
        vec![
            ClientMessage::ChangeDir(0.2),
            ClientMessage::ChangeDir(0.4),
            ClientMessage::ChangeDir(0.6),
        ]
    );

    // The dropped speed is retried once the window has moved on.
    let message = game_is_on(240, (340.0, 300.0), 255.0, 100.0);
    assert_eq!(
        bot.handle_message(&message, at(2500)),
        Some(ClientMessage::ChangeDir(0.8))
    );
}

#[test]
fn bunched_ticks_keep_extrapolation_on_server_time() {
    let mut bot = Bot::new(BotConfig {
        command_rate: 0.0,
        ..centre_hitter()
    });
    let start = Instant::now();

    // Paddle centre creeps 287 -> 293 toward the ball line at y = 300. The
    // last two ticks come out of one read, microseconds apart.
    let arrivals = [
        start,
        start + Duration::from_millis(30),
        start + Duration::from_millis(60),
        start + Duration::from_millis(60) + Duration::from_micros(5),
    ];
    for (i, at) in arrivals.into_iter().enumerate() {
        let x = 400.0 - i as f64 * 10.0;
        let left = 262.0 + i as f64 * 2.0;
        bot.handle_message(&game_is_on(i as i64 * 30, (x, 300.0), left, 100.0), at);
    }
    assert_eq!(bot.round().own.target_y, Some(300.0));

    let command = bot.on_timer(10.0, start + Duration::from_millis(70));
    let current = bot.extrapolator().clone_current().unwrap();
    assert!((current.own_paddle.y - (293.0 + 2.0 / 3.0)).abs() < 1e-6);
    assert!((current.ball.x - (370.0 - 10.0 / 3.0)).abs() < 1e-6);
    assert!((current.ball.y - 300.0).abs() < 1e-6);

    // Still short of the target, so the paddle keeps moving down.
    match command {
        Some(ClientMessage::ChangeDir(speed)) => assert!(speed > 0.0 && speed < 1.0),
        other => panic!("expected a downward changeDir, got {:?}", other),
    }
}
