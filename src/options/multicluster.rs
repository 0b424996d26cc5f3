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

//! Multi-cluster options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "multicluster";

/// Settings for managing member clusters from a host cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MultiClusterOptions {
    /// Run as a host cluster that manages member clusters.
    pub enable: bool,

    /// Image of the agent deployed into member clusters.
    pub agent_image: String,

    /// Resync period of the cluster controller, in seconds.
    pub cluster_controller_resync_second: u32,
}

impl Default for MultiClusterOptions {
    fn default() -> Self {
        Self {
            enable: false,
            agent_image: "kubesphere/tower:v1.0".to_string(),
            cluster_controller_resync_second: 120,
        }
    }
}

impl OptionGroup for MultiClusterOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.bool_var(
            "multiple-clusters",
            self.enable,
            "This field instructs KubeSphere to enter multiple-cluster mode or not.",
        );
        fs.string_var(
            "agent-image",
            &self.agent_image,
            "This field is used when generating deployment yaml for agent.",
        );
        fs.num_var(
            "cluster-controller-resync-second",
            self.cluster_controller_resync_second,
            "Cluster controller resync second to sync cluster resource.",
        );
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "multiple-clusters", &mut self.enable);
        flag::assign(matches, "agent-image", &mut self.agent_image);
        flag::assign(
            matches,
            "cluster-controller-resync-second",
            &mut self.cluster_controller_resync_second,
        );
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        if self.enable && self.agent_image.is_empty() {
            errs.push(ValidationError::invalid(
                NAME,
                "agent image must be set in multiple-cluster mode",
            ));
        }
        if self.cluster_controller_resync_second == 0 {
            errs.push(ValidationError::invalid(
                NAME,
                "cluster controller resync second must be greater than 0",
            ));
        }
        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_image_required_when_enabled() {
        let mut options = MultiClusterOptions {
            agent_image: String::new(),
            ..Default::default()
        };
        assert!(options.validate().is_empty());

        options.enable = true;
        assert_eq!(options.validate().len(), 1);
    }

    #[test]
    fn test_zero_resync() {
        let options = MultiClusterOptions {
            cluster_controller_resync_second: 0,
            ..Default::default()
        };
        assert_eq!(options.validate().len(), 1);
    }
}
