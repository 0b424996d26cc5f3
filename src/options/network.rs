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

//! Network options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "network";

/// IP pool backends the network controllers know how to drive.
pub const IPPOOL_TYPES: [&str; 2] = ["none", "calico"];

/// Network policy and IP pool settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct NetworkOptions {
    /// Run the network policy controller.
    pub enable_network_policy: bool,
    /// IP pool backend, one of [`IPPOOL_TYPES`].
    #[serde(rename = "ippoolType")]
    pub ippool_type: String,
    /// Weave Scope service address.
    pub weave_scope_host: String,
}

impl Default for NetworkOptions {
    fn default() -> Self {
        Self {
            enable_network_policy: false,
            ippool_type: "none".to_string(),
            weave_scope_host: String::new(),
        }
    }
}

impl OptionGroup for NetworkOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.bool_var(
            "enable-network-policy",
            self.enable_network_policy,
            "This field instructs KubeSphere to enable network policy or not.",
        );
        fs.string_var(
            "ippool-type",
            &self.ippool_type,
            "IP pool type, support none and calico.",
        );
        fs.string_var(
            "weave-scope-host",
            &self.weave_scope_host,
            "Weave Scope service endpoint which build a topology API of the applications and \
             the containers running on the hosts.",
        );
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "enable-network-policy", &mut self.enable_network_policy);
        flag::assign(matches, "ippool-type", &mut self.ippool_type);
        flag::assign(matches, "weave-scope-host", &mut self.weave_scope_host);
    }

    fn validate(&self) -> Vec<ValidationError> {
        if IPPOOL_TYPES.contains(&self.ippool_type.as_str()) {
            return Vec::new();
        }
        vec![ValidationError::invalid(
            NAME,
            format!(
                "unsupported ippool type {:?}, expected one of {:?}",
                self.ippool_type, IPPOOL_TYPES
            ),
        )]
    }
}
