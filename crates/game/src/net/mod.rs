mod limiter;
mod protocol;

pub use limiter::{SlidingWindowLimiter, DEFAULT_RATE_LIMIT, DEFAULT_RATE_WINDOW};
pub use protocol::{
    decode_line, encode_line, BallPosition, ClientMessage, GameTick, ProtocolError,
    ServerMessage, DEFAULT_HOST, DEFAULT_PORT,
};
