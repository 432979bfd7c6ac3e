use std::net::SocketAddr;

use anyhow::{Context, Result, bail};

use crate::account::FundsPolicy;

const POLICIES: &str = "`allow-exact` or `reject-exact`";

/// Server settings, read from `LEDGER_*` environment variables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub funds_policy: FundsPolicy,
    pub log_json: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            funds_policy: FundsPolicy::AllowExact,
            log_json: false,
        }
    }
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Unset variables keep their default, malformed ones are an error.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Self::default();
        if let Some(host) = lookup("LEDGER_HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("LEDGER_PORT") {
            config.port = parse_port(&port)?;
        }
        if let Some(policy) = lookup("LEDGER_FUNDS_POLICY") {
            config.funds_policy = parse_funds_policy(&policy)?;
        }
        if let Some(flag) = lookup("LEDGER_LOG_JSON") {
            config.log_json = matches!(flag.as_str(), "1" | "true" | "yes");
        }
        Ok(config)
    }

    pub fn bind_address(&self) -> Result<SocketAddr> {
        let addr = format!("{}:{}", self.host, self.port);
        let context = || format!("`{addr}` is not a valid listen address");
        addr.parse().with_context(context)
    }
}

fn parse_port(value: &str) -> Result<u16> {
    match value.parse() {
        Ok(port) => Ok(port),
        Err(_) => bail!("LEDGER_PORT `{value}` is not a valid port"),
    }
}

fn parse_funds_policy(value: &str) -> Result<FundsPolicy> {
    match value {
        "allow-exact" => Ok(FundsPolicy::AllowExact),
        "reject-exact" => Ok(FundsPolicy::RejectExact),
        other => bail!("LEDGER_FUNDS_POLICY must be {POLICIES}, got `{other}`"),
    }
}
