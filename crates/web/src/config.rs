//! Process configuration.
//!
//! Every setting can be given as a command-line flag or an environment variable;
//! an explicit flag wins over the environment, which wins over the default.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::time::Duration;

use clap::Parser;
use tracing::Level;

#[derive(Debug, Clone, Parser)]
#[command(name = "keel", version, about = "A small HTTP/1.1 server", long_about = None)]
pub struct Config {
    /// TCP port to listen on
    #[arg(long, env = "KEEL_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Name this server reports in its startup log
    #[arg(long, env = "KEEL_HOSTNAME", default_value_t = default_hostname())]
    pub hostname: String,

    /// Address to bind
    #[arg(long, env = "KEEL_BIND", default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// Seconds a connection may stay silent before it is closed
    #[arg(long, env = "KEEL_IDLE_TIMEOUT_SECS", default_value_t = 10)]
    pub idle_timeout_secs: u64,

    /// Maximum log level
    #[arg(long, env = "KEEL_LOG", default_value_t = Level::INFO)]
    pub log_level: Level,
}

fn default_hostname() -> String {
    std::env::var("HOSTNAME").ok().filter(|name| !name.is_empty()).unwrap_or_else(|| "localhost".to_owned())
}

impl Config {
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn idle_timeout(&self) -> Duration {
        Duration::from_secs(self.idle_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: 8080,
            hostname: default_hostname(),
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            idle_timeout_secs: 10,
            log_level: Level::INFO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::try_parse_from(["keel"]).unwrap();
        assert_eq!(config.idle_timeout(), Duration::from_secs(10));
        assert_eq!(config.log_level, Level::INFO);
        assert!(!config.hostname.is_empty());
    }

    #[test]
    fn flags() {
        let config = Config::try_parse_from([
            "keel",
            "--port",
            "9090",
            "--bind",
            "127.0.0.1",
            "--idle-timeout-secs",
            "3",
            "--log-level",
            "debug",
            "--hostname",
            "edge-1",
        ])
        .unwrap();

        assert_eq!(config.socket_addr(), "127.0.0.1:9090".parse().unwrap());
        assert_eq!(config.idle_timeout(), Duration::from_secs(3));
        assert_eq!(config.log_level, Level::DEBUG);
        assert_eq!(config.hostname, "edge-1");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Config::try_parse_from(["keel", "--port", "http"]).is_err());
    }
}
