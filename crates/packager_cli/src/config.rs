//! Command-line and environment configuration.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "packager", version, about = "Packing lists, inventory and trips")]
pub struct Config {
    /// SQLite database file; created on first start.
    #[arg(long, env = "PACKAGER_DATABASE", default_value = "packager.sqlite3")]
    pub database: PathBuf,

    /// Address to listen on.
    #[arg(long, env = "PACKAGER_BIND", default_value = "127.0.0.1")]
    pub bind: IpAddr,

    #[arg(long, env = "PACKAGER_PORT", default_value_t = 3000)]
    pub port: u16,

    /// One of trace|debug|info|warn|error; defaults per build mode.
    #[arg(long, env = "PACKAGER_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Directory for rotated log files; defaults to `./logs`.
    #[arg(long, env = "PACKAGER_LOG_DIR")]
    pub log_dir: Option<PathBuf>,
}

impl Config {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }

    pub fn log_level(&self) -> String {
        self.log_level
            .clone()
            .unwrap_or_else(|| packager_core::default_log_level().to_string())
    }

    /// Absolute log directory, resolved against the working directory.
    pub fn log_dir(&self) -> std::io::Result<PathBuf> {
        let dir = self
            .log_dir
            .clone()
            .unwrap_or_else(|| PathBuf::from("logs"));
        if dir.is_absolute() {
            return Ok(dir);
        }
        Ok(std::env::current_dir()?.join(dir))
    }
}

#[cfg(test)]
mod tests {
    use super::Config;
    use clap::Parser;

    #[test]
    fn defaults_listen_on_localhost() {
        let config = Config::try_parse_from(["packager"]).unwrap();
        assert_eq!(config.listen_addr().to_string(), "127.0.0.1:3000");
        assert!(config.log_dir().unwrap().is_absolute());
    }

    #[test]
    fn flags_override_defaults() {
        let config = Config::try_parse_from([
            "packager",
            "--port",
            "8080",
            "--bind",
            "0.0.0.0",
            "--log-level",
            "warn",
            "--database",
            "/tmp/trips.db",
        ])
        .unwrap();
        assert_eq!(config.listen_addr().to_string(), "0.0.0.0:8080");
        assert_eq!(config.log_level(), "warn");
        assert_eq!(config.database.to_str(), Some("/tmp/trips.db"));
    }

    #[test]
    fn invalid_port_is_rejected() {
        assert!(Config::try_parse_from(["packager", "--port", "http"]).is_err());
    }
}
