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

//! Ingress gateway options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "gateway";

/// Settings for the helm-based gateway controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GatewayOptions {
    /// Watches file describing the gateway charts to reconcile.
    pub watches_path: String,

    /// Namespace gateways are deployed into; empty follows the owning project.
    pub namespace: String,
}

impl Default for GatewayOptions {
    fn default() -> Self {
        Self {
            watches_path: "/etc/kubesphere/watches.yaml".to_string(),
            namespace: String::new(),
        }
    }
}

impl OptionGroup for GatewayOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "watches-path",
            &self.watches_path,
            "Path to the watches file to use.",
        );
        fs.string_var(
            "namespace",
            &self.namespace,
            "Working Namespace of the Gateway's Ingress Controller.",
        );
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "watches-path", &mut self.watches_path);
        flag::assign(matches, "namespace", &mut self.namespace);
    }

    fn validate(&self) -> Vec<ValidationError> {
        if self.watches_path.is_empty() {
            return vec![ValidationError::invalid(NAME, "watches path must not be empty")];
        }
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watches_path_required() {
        assert!(GatewayOptions::default().validate().is_empty());

        let options = GatewayOptions {
            watches_path: String::new(),
            ..Default::default()
        };
        assert_eq!(options.validate().len(), 1);
    }
}
