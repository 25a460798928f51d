use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

const DEFAULT_PAUSE_POLL_MS: u64 = 200;
const DEFAULT_ITEM_DELAY_MS: u64 = 250;

#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub log_level: String,
    pub database_url: String,
    /// How often the worker re-checks pause/stop flags while paused.
    pub pause_poll: Duration,
    /// Courtesy delay between enrichment calls, zero disables it.
    pub item_delay: Duration,
}

impl Config {
    pub fn from_env() -> Self {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(3000);

        let host = std::env::var("HOST")
            .ok()
            .and_then(|value| value.parse::<IpAddr>().ok())
            .unwrap_or(IpAddr::V4(Ipv4Addr::new(0, 0, 0, 0)));

        let log_level = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());

        let database_url = std::env::var("DATABASE_URL")
            .ok()
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| "sqlite://mufradat.db".to_string());

        let pause_poll = Duration::from_millis(env_u64("PAUSE_POLL_MS").unwrap_or(DEFAULT_PAUSE_POLL_MS));
        let item_delay = Duration::from_millis(env_u64("ITEM_DELAY_MS").unwrap_or(DEFAULT_ITEM_DELAY_MS));

        Self {
            host,
            port,
            log_level,
            database_url,
            pause_poll,
            item_delay,
        }
    }

    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn env_u64(key: &str) -> Option<u64> {
    std::env::var(key).ok()?.trim().parse().ok()
}
