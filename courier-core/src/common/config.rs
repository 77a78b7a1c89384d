/*
 * Copyright (c) 2025. Courier Contributors
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::time::Duration;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Configuration for the Courier broker.
///
/// Loaded from TOML files in XDG-compliant directories; every section falls
/// back to its defaults when the file or a key is absent.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct BrokerConfig {
    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
    /// Default values configuration.
    pub defaults: DefaultsConfig,
}

/// Timeout-related configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Default per-dispatch timeout in milliseconds, applied to envelopes
    /// that carry no timeout of their own. Zero disables the default timeout.
    pub default_dispatch_timeout_ms: u64,
}

/// Default configuration values.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DefaultsConfig {
    /// The address under which the process router considers an envelope
    /// locally addressed.
    pub local_endpoint: String,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            default_dispatch_timeout_ms: 30_000,
        }
    }
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            local_endpoint: "local".to_string(),
        }
    }
}

impl BrokerConfig {
    /// Convert the default dispatch timeout to a `Duration`.
    pub const fn default_dispatch_timeout(&self) -> Duration {
        Duration::from_millis(self.timeouts.default_dispatch_timeout_ms)
    }

    /// Load configuration from XDG-compliant locations.
    ///
    /// Attempts `$XDG_CONFIG_HOME/courier/config.toml` (with the usual
    /// platform fallbacks). If no configuration file is found, returns the
    /// default configuration. If a configuration file exists but is
    /// malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix("courier") {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let config_path = xdg_dirs.find_config_file("config.toml");

        if let Some(path) = config_path {
            info!("Loading configuration from: {}", path.display());
            match std::fs::read_to_string(&path) {
                Ok(config_str) => match toml::from_str::<Self>(&config_str) {
                    Ok(config) => config,
                    Err(e) => {
                        error!(
                            "Failed to parse configuration file {}: {}",
                            path.display(),
                            e
                        );
                        Self::default()
                    }
                },
                Err(e) => {
                    error!(
                        "Failed to read configuration file {}: {}",
                        path.display(),
                        e
                    );
                    Self::default()
                }
            }
        } else {
            info!("No configuration file found, using defaults");
            Self::default()
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations.
    pub static ref CONFIG: BrokerConfig = BrokerConfig::load();
}
