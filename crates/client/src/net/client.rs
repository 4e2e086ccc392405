use std::time::Instant;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use volley::{decode_line, encode_line, Bot, ClientMessage, Scoreboard, ServerMessage};

use super::config::ClientConfig;

const INBOUND_CAPACITY: usize = 256;
const OUTBOUND_CAPACITY: usize = 64;

pub struct NetworkClient {
    config: ClientConfig,
    bot: Bot,
}

impl NetworkClient {
    pub fn new(config: ClientConfig) -> Self {
        let bot = Bot::new(config.bot_config());
        Self { config, bot }
    }

    pub async fn run(self) -> anyhow::Result<Scoreboard> {
        let address = self.config.address();
        let stream = TcpStream::connect(&address)
            .await
            .with_context(|| format!("failed to connect to {}", address))?;
        log::info!("connected to {}", address);
        self.run_session(stream).await
    }

    pub async fn run_session(mut self, stream: TcpStream) -> anyhow::Result<Scoreboard> {
        stream.set_nodelay(true).context("failed to set TCP_NODELAY")?;
        let (read_half, write_half) = stream.into_split();

        let (inbound_tx, mut inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let (outbound_tx, outbound_rx) = mpsc::channel(OUTBOUND_CAPACITY);

        let reader = tokio::spawn(read_loop(read_half, inbound_tx));
        let writer = tokio::spawn(write_loop(write_half, outbound_rx));

        let handshake = self.bot.handshake();
        log::info!("> {:?}", handshake);
        outbound_tx
            .send(handshake)
            .await
            .context("writer stopped before the handshake")?;

        let mut interval = tokio::time::interval(self.config.extrapolation_period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut last_update = Instant::now();

        let shutdown = tokio::signal::ctrl_c();
        tokio::pin!(shutdown);
        let mut hung_up = false;

        loop {
            let command = tokio::select! {
                message = inbound_rx.recv() => match message {
                    Some(message) => self.bot.handle_message(&message, Instant::now()),
                    None => {
                        hung_up = true;
                        break;
                    }
                },
                _ = interval.tick() => {
                    let now = Instant::now();
                    let delta_ms = now.duration_since(last_update).as_secs_f64() * 1000.0;
                    last_update = now;
                    self.bot.on_timer(delta_ms, now)
                }
                _ = &mut shutdown => {
                    log::info!("interrupted, shutting down");
                    break;
                }
            };

            if let Some(command) = command {
                if outbound_tx.send(command).await.is_err() {
                    log::warn!("writer stopped, ending session");
                    break;
                }
            }
        }

        drop(outbound_tx);
        if hung_up {
            match join_reader(reader).await {
                Some(e) => log::warn!("connection lost: {:#}", e),
                None => log::info!("server closed the connection"),
            }
        } else {
            reader.abort();
        }
        match writer.await {
            Ok(Err(e)) => log::warn!("writer failed: {:#}", e),
            Err(e) if !e.is_cancelled() => log::warn!("writer task panicked: {}", e),
            _ => {}
        }

        let scoreboard = self.bot.scoreboard().clone();
        log::info!(
            "session over: wins {} losses {} total {}",
            scoreboard.wins,
            scoreboard.losses,
            scoreboard.rounds
        );
        Ok(scoreboard)
    }
}

async fn read_loop(read_half: OwnedReadHalf, inbound: mpsc::Sender<ServerMessage>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(read_half).lines();
    while let Some(line) = lines.next_line().await.context("failed to read from server")? {
        if line.trim().is_empty() {
            continue;
        }
        log::trace!("< {}", line);
        match decode_line(&line) {
            Ok(message) => {
                if inbound.send(message).await.is_err() {
                    break;
                }
            }
            Err(e) => log::warn!("dropping undecodable line: {}", e),
        }
    }
    Ok(())
}

async fn join_reader(reader: JoinHandle<anyhow::Result<()>>) -> Option<anyhow::Error> {
    match reader.await {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e),
        Err(e) => Some(anyhow::anyhow!("reader task failed: {}", e)),
    }
}

async fn write_loop(
    mut write_half: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<ClientMessage>,
) -> anyhow::Result<()> {
    while let Some(message) = outbound.recv().await {
        let line = encode_line(&message)?;
        write_half
            .write_all(line.as_bytes())
            .await
            .context("failed to write to server")?;
    }
    write_half.shutdown().await.ok();
    Ok(())
}

#[cfg(test)]
mod tests {
    use tokio::net::TcpListener;

    use volley::AiTuning;

    use super::*;

    async fn connected_pair() -> (TcpStream, TcpStream) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let (client, server) = tokio::join!(TcpStream::connect(address), listener.accept());
        (client.unwrap(), server.unwrap().0)
    }

    fn tick(time: i64, x: f64) -> String {
        format!(
            "{{\"msgType\":\"gameIsOn\",\"data\":{{\"time\":{time},\"ball\":{{\"pos\":{{\"x\":{x},\"y\":300}}}},\
             \"left\":{{\"y\":100}},\"right\":{{\"y\":100}}}}}}\n"
        )
    }

    #[tokio::test]
    async fn sends_join_first_and_stops_when_server_hangs_up() {
        let (client, server) = connected_pair().await;
        let config = ClientConfig {
            player_name: "tester".into(),
            ..Default::default()
        };
        let session = tokio::spawn(NetworkClient::new(config).run_session(client));

        let (read_half, mut write_half) = server.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let first = lines.next_line().await.unwrap().unwrap();
        assert_eq!(first, r#"{"msgType":"join","data":"tester"}"#);

        write_half
            .write_all(b"{\"msgType\":\"gameIsOver\",\"data\":\"tester\"}\n")
            .await
            .unwrap();
        write_half.shutdown().await.unwrap();

        let scoreboard = session.await.unwrap().unwrap();
        assert_eq!(scoreboard.rounds, 1);
        assert_eq!(scoreboard.wins, 1);
    }

    #[tokio::test]
    async fn read_failure_is_reported() {
        let (client, server) = connected_pair().await;
        let (read_half, _write_half) = client.into_split();
        let (inbound_tx, mut inbound_rx) = mpsc::channel(INBOUND_CAPACITY);
        let reader = tokio::spawn(read_loop(read_half, inbound_tx));

        let (_, mut server_write) = server.into_split();
        server_write.write_all(b"\xff\xfe\n").await.unwrap();

        assert!(inbound_rx.recv().await.is_none());
        let error = join_reader(reader).await.unwrap();
        assert!(format!("{:#}", error).contains("failed to read from server"));
    }

    #[tokio::test]
    async fn duel_handshake_then_change_dir() {
        let (client, server) = connected_pair().await;
        let config = ClientConfig {
            player_name: "tester".into(),
            opponent: Some("rival".into()),
            tuning: AiTuning {
                ai_level: 0.0,
                ..Default::default()
            },
            ..Default::default()
        };
        let session = tokio::spawn(NetworkClient::new(config).run_session(client));

        let (read_half, mut write_half) = server.into_split();
        let mut lines = BufReader::new(read_half).lines();
        let first = lines.next_line().await.unwrap().unwrap();
        assert_eq!(first, r#"{"msgType":"requestDuel","data":["tester","rival"]}"#);

        for (i, x) in [300, 290, 280].into_iter().enumerate() {
            write_half.write_all(tick(i as i64 * 40, x as f64).as_bytes()).await.unwrap();
        }
        // Paddle centre at 125, ball heading for y = 300.
        let command = lines.next_line().await.unwrap().unwrap();
        assert_eq!(command, r#"{"msgType":"changeDir","data":1.0}"#);

        write_half.shutdown().await.unwrap();
        session.await.unwrap().unwrap();
    }
}
