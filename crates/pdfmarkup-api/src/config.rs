//! Service configuration read from environment variables.

use std::net::SocketAddr;

use pdfmarkup::pdfmarkup_core::DEFAULT_BYTE_BUDGET;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8080;
/// Upload size limit.
pub const DEFAULT_MAX_BODY: usize = 64 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub host: String,
    pub port: u16,
    /// Serialized response budget for `/parse`.
    pub byte_budget: usize,
    pub max_body: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            byte_budget: DEFAULT_BYTE_BUDGET,
            max_body: DEFAULT_MAX_BODY,
        }
    }
}

impl Config {
    /// Read `HOST`, `PORT`, `PDFMARKUP_BYTE_BUDGET` and `PDFMARKUP_MAX_BODY`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable source.
    ///
    /// Unparseable values keep their default and log a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let host = lookup("HOST")
            .map(|h| h.trim().to_string())
            .filter(|h| !h.is_empty())
            .unwrap_or(defaults.host);
        Self {
            host,
            port: parse_var(&lookup, "PORT", defaults.port),
            byte_budget: parse_var(&lookup, "PDFMARKUP_BYTE_BUDGET", defaults.byte_budget),
            max_body: parse_var(&lookup, "PDFMARKUP_MAX_BODY", defaults.max_body),
        }
    }

    /// Socket address to bind.
    pub fn addr(&self) -> Result<SocketAddr, std::net::AddrParseError> {
        format!("{}:{}", self.host, self.port).parse()
    }
}

fn parse_var<F, T>(lookup: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + Copy,
{
    match lookup(key) {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            tracing::warn!(variable = key, value = %raw, "invalid value, using default");
            default
        }),
    }
}
