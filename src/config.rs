use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub const DEFAULT_CONFIG_PATH: &str = "rusbit.toml";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub peer_id_prefix: String,
    pub listen_port: u16,
    pub request_timeout: u64, // seconds
    pub user_agent: String,
    pub numwant: Option<u32>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            peer_id_prefix: "-RB0001-".to_string(),
            listen_port: 6881,
            request_timeout: 10,
            user_agent: concat!("rusbit-announce/", env!("CARGO_PKG_VERSION")).to_string(),
            numwant: None,
        }
    }
}

impl Config {
    /// Reads the config at `path`, or writes the defaults there if it does not exist.
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            let config: Config = toml::from_str(&contents)
                .with_context(|| format!("parsing {}", path.display()))?;
            Ok(config)
        } else {
            let config = Self::default();
            // Save default config
            let toml = toml::to_string(&config)?;
            fs::write(path, toml).with_context(|| format!("writing {}", path.display()))?;
            Ok(config)
        }
    }
}
