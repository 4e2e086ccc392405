use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::ArenaConfig;

pub const DEFAULT_HOST: &str = "localhost";
pub const DEFAULT_PORT: u16 = 8080;

#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message has no msgType")]
    MissingType,
    #[error("unexpected payload for {msg_type}")]
    UnexpectedPayload { msg_type: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct BallPosition {
    pub x: f64,
    pub y: f64,
}

/// One `gameIsOn` update. Every block is optional: the server may leave any
/// of them out, and a block that fails to decode is dropped on its own and
/// named in `malformed`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GameTick {
    pub time: Option<i64>,
    pub ball: Option<BallPosition>,
    pub conf: Option<ArenaConfig>,
    /// Top edge of the left paddle.
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub malformed: Vec<&'static str>,
}

impl GameTick {
    pub fn from_value(data: &Value) -> Self {
        let mut tick = GameTick::default();

        match data.get("time") {
            None | Some(Value::Null) => {}
            Some(time) => match time.as_i64().or_else(|| time.as_f64().map(|t| t as i64)) {
                Some(time) => tick.time = Some(time),
                None => tick.malformed.push("time"),
            },
        }

        if let Some(ball) = present(data, "ball") {
            match ball.get("pos").map(|pos| BallPosition::deserialize(pos)) {
                Some(Ok(pos)) if pos.x.is_finite() && pos.y.is_finite() => tick.ball = Some(pos),
                _ => tick.malformed.push("ball"),
            }
        }

        if let Some(conf) = present(data, "conf") {
            match ArenaConfig::deserialize(conf) {
                Ok(conf) if conf.is_valid() => tick.conf = Some(conf),
                _ => tick.malformed.push("conf"),
            }
        }

        for (side, slot) in [("left", &mut tick.left), ("right", &mut tick.right)] {
            if let Some(paddle) = present(data, side) {
                match paddle.get("y").and_then(Value::as_f64) {
                    Some(y) => *slot = Some(y),
                    None => tick.malformed.push(side),
                }
            }
        }

        tick
    }

    pub fn is_empty(&self) -> bool {
        self.time.is_none()
            && self.ball.is_none()
            && self.conf.is_none()
            && self.left.is_none()
            && self.right.is_none()
    }
}

fn present<'a>(data: &'a Value, key: &str) -> Option<&'a Value> {
    data.get(key).filter(|value| !value.is_null())
}

#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    Joined { url: String },
    GameStarted,
    GameIsOn(GameTick),
    GameIsOver { winner: String },
    Unknown { msg_type: String },
}

pub fn decode_line(line: &str) -> Result<ServerMessage, ProtocolError> {
    let envelope: Value = serde_json::from_str(line.trim())?;
    let msg_type = envelope
        .get("msgType")
        .and_then(Value::as_str)
        .ok_or(ProtocolError::MissingType)?;
    let data = envelope.get("data").unwrap_or(&Value::Null);

    let unexpected = || ProtocolError::UnexpectedPayload {
        msg_type: msg_type.to_string(),
    };

    let message = match msg_type {
        "joined" => ServerMessage::Joined {
            url: match data {
                Value::String(url) => url.clone(),
                other => other.to_string(),
            },
        },
        "gameStarted" => ServerMessage::GameStarted,
        "gameIsOn" => {
            if !data.is_object() {
                return Err(unexpected());
            }
            ServerMessage::GameIsOn(GameTick::from_value(data))
        }
        "gameIsOver" => ServerMessage::GameIsOver {
            winner: data.as_str().ok_or_else(unexpected)?.to_string(),
        },
        other => ServerMessage::Unknown {
            msg_type: other.to_string(),
        },
    };
    Ok(message)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "msgType", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    Join(String),
    RequestDuel(String, String),
    ChangeDir(f64),
}

impl ClientMessage {
    pub fn handshake(name: &str, opponent: Option<&str>) -> Self {
        match opponent {
            Some(opponent) => ClientMessage::RequestDuel(name.to_string(), opponent.to_string()),
            None => ClientMessage::Join(name.to_string()),
        }
    }
}

pub fn encode_line(message: &ClientMessage) -> Result<String, ProtocolError> {
    let mut line = serde_json::to_string(message)?;
    line.push('\n');
    Ok(line)
}
