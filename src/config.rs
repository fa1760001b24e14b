// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Runtime configuration.
//!
//! The compute service address comes from (in order of precedence) the
//! command line, the `FORECASTOR_ETC_API_URL` environment variable, the
//! `config.toml` file in the store directory, and finally the default
//! `http://localhost:5000/`. An address may contain a `{port}` placeholder,
//! which is filled with the port of the configured socket URL (or nothing).

use std::{path::Path, time::Duration};

use log::debug;
use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{CONFIG_FILENAME, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, PORT_PLACEHOLDER};

lazy_static::lazy_static! {
    static ref SOCKET_PORT: Regex = Regex::new(r"^wss?://.*:(\d+)").unwrap();
}

/// The contents of `config.toml`. Every field is optional.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigFile {
    pub api_address: Option<String>,

    /// A `ws://` or `wss://` URL whose port replaces `{port}` in the API
    /// address.
    pub socket_url: Option<String>,

    pub timeout_secs: Option<u64>,
}

impl ConfigFile {
    /// Read `path`. A missing file is an empty configuration.
    pub fn read(path: &Path) -> Result<ConfigFile, ConfigError> {
        if !path.exists() {
            debug!("No config file at {}", path.display());
            return Ok(ConfigFile::default());
        }
        debug!("Reading config file {}", path.display());
        let contents = std::fs::read_to_string(path)?;
        toml::from_str(&contents).map_err(|e| ConfigError::Parse {
            file: path.display().to_string(),
            err: e.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeConfig {
    pub api_address: String,
    pub timeout: Duration,
}

impl RuntimeConfig {
    /// Combine command-line (or environment) values with a config file.
    pub fn resolve(
        api_address: Option<String>,
        timeout_secs: Option<u64>,
        file: ConfigFile,
    ) -> RuntimeConfig {
        let address = api_address
            .or(file.api_address)
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        let api_address = substitute_port(&address, file.socket_url.as_deref());
        let timeout = Duration::from_secs(
            timeout_secs
                .or(file.timeout_secs)
                .unwrap_or(DEFAULT_TIMEOUT_SECS),
        );
        RuntimeConfig {
            api_address,
            timeout,
        }
    }

    /// As [`RuntimeConfig::resolve`], reading `config.toml` from `store_dir`.
    pub fn load(
        store_dir: &Path,
        api_address: Option<String>,
        timeout_secs: Option<u64>,
    ) -> Result<RuntimeConfig, ConfigError> {
        let file = ConfigFile::read(&store_dir.join(CONFIG_FILENAME))?;
        Ok(RuntimeConfig::resolve(api_address, timeout_secs, file))
    }
}

/// Replace `{port}` in `address` with the port of `socket_url`, if it has one.
pub fn substitute_port(address: &str, socket_url: Option<&str>) -> String {
    if !address.contains(PORT_PLACEHOLDER) {
        return address.to_string();
    }
    let port = socket_url
        .and_then(|s| SOCKET_PORT.captures(s))
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
        .unwrap_or("");
    address.replace(PORT_PLACEHOLDER, port)
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Couldn't parse config file '{file}': {err}")]
    Parse { file: String, err: String },

    #[error(transparent)]
    IO(#[from] std::io::Error),
}
