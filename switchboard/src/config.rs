use crate::switchboard::RouteStrategy;
use anyhow::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::str::FromStr;

const DEFAULT_CONF: &str = "/etc/phonenet/phonenet.conf";

#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub prompt: String,
    pub log_level: String,
    pub routing: RouteStrategy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            prompt: "Enter command: ".to_string(),
            log_level: "info".to_string(),
            routing: RouteStrategy::default(),
        }
    }
}

impl Config {
    /// Reads the file named by `PHONENET_CONF`, or the system-wide default.
    pub fn new() -> Result<Config> {
        let path = std::env::var("PHONENET_CONF")
            .unwrap_or_else(|_| DEFAULT_CONF.to_string());
        Config::from_path(path)
    }

    /// A missing file gives the defaults; an unreadable or invalid one is an
    /// error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Config> {
        match fs::read_to_string(path) {
            Ok(contents) => Config::from_str(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }
}

impl FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(toml::from_str(s)?)
    }
}
