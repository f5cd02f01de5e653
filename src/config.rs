use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::ConfigError;

/// One configured server: a `host:port` address plus a free-form comment.
#[derive(Debug, Clone, Deserialize)]
pub struct Server {
    pub addr: String,
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Deserialize)]
pub struct Config {
    pub servers: Vec<Server>,
}

impl Config {
    pub fn load(path: &Path) -> Result<Config, ConfigError> {
        let data = fs::read(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}
