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

//! Kubernetes API connection options.

use std::path::PathBuf;

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "kubernetes";

/// How to reach the Kubernetes API server.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KubernetesOptions {
    /// Path to a kubeconfig file. Empty means in-cluster configuration.
    #[serde(rename = "kubeconfig")]
    pub kube_config: String,

    /// API server address, overriding the one in the kubeconfig.
    pub master: String,

    /// Maximum queries per second to the API server.
    pub qps: f32,

    /// Maximum burst for client-side throttling.
    pub burst: i32,
}

impl Default for KubernetesOptions {
    fn default() -> Self {
        Self {
            kube_config: default_kubeconfig(),
            master: String::new(),
            qps: 1e6,
            burst: 1_000_000,
        }
    }
}

/// `~/.kube/config` if it exists, otherwise empty.
fn default_kubeconfig() -> String {
    dirs::home_dir()
        .map(|home| home.join(".kube").join("config"))
        .filter(|path: &PathBuf| path.is_file())
        .map(|path| path.to_string_lossy().into_owned())
        .unwrap_or_default()
}

impl OptionGroup for KubernetesOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "kubeconfig",
            &self.kube_config,
            "Path for kubernetes kubeconfig file, if left blank, will use in cluster way.",
        );
        fs.string_var(
            "master",
            &self.master,
            "Used to generate kubeconfig for downloading, if not specified, will use host in kubeconfig.",
        );
        fs.num_var("qps", self.qps, "The maximum QPS to the master from this client.");
        fs.num_var("burst", self.burst, "The maximum burst for throttle.");
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "kubeconfig", &mut self.kube_config);
        flag::assign(matches, "master", &mut self.master);
        flag::assign(matches, "qps", &mut self.qps);
        flag::assign(matches, "burst", &mut self.burst);
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();

        if !self.kube_config.is_empty() {
            match std::fs::metadata(&self.kube_config) {
                Ok(meta) if meta.is_file() => {}
                Ok(_) => errs.push(ValidationError::invalid(
                    NAME,
                    format!("kubeconfig {:?} is not a regular file", self.kube_config),
                )),
                Err(e) => errs.push(ValidationError::invalid(
                    NAME,
                    format!("kubeconfig {:?}: {}", self.kube_config, e),
                )),
            }
        }
        if self.qps <= 0.0 {
            errs.push(ValidationError::invalid(NAME, "qps must be greater than 0"));
        }
        if self.burst <= 0 {
            errs.push(ValidationError::invalid(NAME, "burst must be greater than 0"));
        }

        errs
    }
}
