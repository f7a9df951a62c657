//! Server configuration.

use std::path::PathBuf;

use anyhow::{Context, Result};

/// Port used when neither `--port` nor `PORT` is set.
pub const DEFAULT_PORT: u16 = 3000;

/// Dataset location, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/combined.json";

pub const DEFAULT_HOST: &str = "0.0.0.0";

/// Everything [`crate::server::start_server`] needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub data_path: PathBuf,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
        }
    }
}

impl ServerConfig {
    /// Pick the port: explicit flag, then the `PORT` variable, then the default.
    pub fn resolve_port(flag: Option<u16>, env: Option<&str>) -> Result<u16> {
        if let Some(port) = flag {
            return Ok(port);
        }
        match env.map(str::trim).filter(|v| !v.is_empty()) {
            Some(raw) => raw
                .parse()
                .with_context(|| format!("Invalid PORT value: {}", raw)),
            None => Ok(DEFAULT_PORT),
        }
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Host to print in URLs; a wildcard bind is reachable via localhost.
    pub fn display_host(&self) -> &str {
        match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "localhost",
            host => host,
        }
    }
}
