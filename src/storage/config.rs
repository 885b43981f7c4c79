// Copyright 2025 Stoolap Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Simulation configuration

/// Version string reported by `@@VERSION` unless configured otherwise
pub const DEFAULT_VERSION: &str = "SQL Server Simulator";

/// Configuration options for a simulation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SimulationConfig {
    /// Text returned by `@@VERSION`
    /// Default: "SQL Server Simulator"
    pub version: String,

    /// Keep the system catalog alive for the simulation's lifetime
    ///
    /// When false the catalog is only weakly held and is rebuilt whenever a
    /// query needs it after every earlier copy has been dropped.
    /// Default: true
    pub retain_system_catalog: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
            retain_system_catalog: true,
        }
    }
}

impl SimulationConfig {
    /// Create a configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the version string
    pub fn with_version(mut self, version: impl Into<String>) -> Self {
        self.version = version.into();
        self
    }

    /// Set whether the system catalog is retained
    pub fn with_retain_system_catalog(mut self, retain: bool) -> Self {
        self.retain_system_catalog = retain;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SimulationConfig::default();
        assert_eq!(config.version, "SQL Server Simulator");
        assert!(config.retain_system_catalog);
    }

    #[test]
    fn test_builder() {
        let config = SimulationConfig::new()
            .with_version("Microsoft SQL Server 2022")
            .with_retain_system_catalog(false);
        assert_eq!(config.version, "Microsoft SQL Server 2022");
        assert!(!config.retain_system_catalog);
    }
}
