// Copyright 2025 The Kubernetes Authors.
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

//! On-disk configuration.
//!
//! A `kubesphere.yaml` file may pre-populate the option groups. Command-line
//! flags are registered afterwards and take the file values as defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::options::{
    AuthenticationOptions, DevopsOptions, GatewayOptions, KubernetesOptions, LdapOptions,
    MultiClusterOptions, NetworkOptions, OpenPitrixOptions, S3Options, ServiceMeshOptions,
};

/// Default configuration file name.
pub const DEFAULT_CONFIG_FILE_NAME: &str = "kubesphere.yaml";

/// Directory searched after the working directory.
pub const DEFAULT_CONFIG_DIR: &str = "/etc/kubesphere";

/// Errors loading the configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file exists but could not be read.
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not valid YAML for [`Config`].
    #[error("failed to parse config file {path:?}: {source}")]
    Parse {
        /// File that failed.
        path: PathBuf,
        /// Underlying YAML error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Option groups as stored in `kubesphere.yaml`.
///
/// Missing sections leave the corresponding group untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Kubernetes client options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kubernetes: Option<KubernetesOptions>,

    /// Jenkins options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub devops: Option<DevopsOptions>,

    /// S3 object storage options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub s3: Option<S3Options>,

    /// Authentication options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authentication: Option<AuthenticationOptions>,

    /// LDAP options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ldap: Option<LdapOptions>,

    /// OpenPitrix options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub openpitrix: Option<OpenPitrixOptions>,

    /// Network options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network: Option<NetworkOptions>,

    /// Multi-cluster options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multicluster: Option<MultiClusterOptions>,

    /// Service mesh options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub servicemesh: Option<ServiceMeshOptions>,

    /// Gateway options.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gateway: Option<GatewayOptions>,
}

impl Config {
    /// Parses a YAML document.
    pub fn from_yaml(path: &Path, content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Reads and parses a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(path, &content)
    }
}

/// Candidate config file locations in search order.
pub fn search_paths() -> Vec<PathBuf> {
    vec![
        PathBuf::from(DEFAULT_CONFIG_FILE_NAME),
        Path::new(DEFAULT_CONFIG_DIR).join(DEFAULT_CONFIG_FILE_NAME),
    ]
}

/// Loads the first config file found in `paths`.
///
/// Returns `Ok(None)` if none exists. A file that exists but cannot be read
/// or parsed is an error.
pub fn try_load_from(paths: &[PathBuf]) -> Result<Option<(PathBuf, Config)>, ConfigError> {
    for path in paths {
        if !path.is_file() {
            continue;
        }
        let config = Config::load(path)?;
        return Ok(Some((path.clone(), config)));
    }
    Ok(None)
}

/// Loads the configuration from the default locations.
pub fn try_load_from_disk() -> Result<Option<(PathBuf, Config)>, ConfigError> {
    try_load_from(&search_paths())
}

/// Duration (de)serialization in human-readable form such as `10m` or `168h`.
pub(crate) mod humantime_serde {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&humantime::format_duration(*duration).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        humantime::parse_duration(&s)
            .map_err(serde::de::Error::custom)
    }
}
