mod client;
mod config;

pub use client::NetworkClient;
pub use config::ClientConfig;
