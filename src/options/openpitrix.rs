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

//! OpenPitrix application marketplace options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{is_host_port, OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "openpitrix";

/// gRPC endpoints of the OpenPitrix services, each `host:port`.
///
/// An empty endpoint leaves that service unused.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct OpenPitrixOptions {
    /// Runtime manager service.
    pub runtime_manager_endpoint: String,
    /// Cluster manager service.
    pub cluster_manager_endpoint: String,
    /// Repository manager service.
    pub repo_manager_endpoint: String,
    /// Application manager service.
    pub app_manager_endpoint: String,
    /// Category manager service.
    pub category_manager_endpoint: String,
    /// Attachment manager service.
    pub attachment_manager_endpoint: String,
    /// Repository indexer service.
    pub repo_indexer_endpoint: String,
}

impl OpenPitrixOptions {
    fn endpoints(&self) -> [(&'static str, &String); 7] {
        [
            ("openpitrix-runtime-manager-endpoint", &self.runtime_manager_endpoint),
            ("openpitrix-cluster-manager-endpoint", &self.cluster_manager_endpoint),
            ("openpitrix-repo-manager-endpoint", &self.repo_manager_endpoint),
            ("openpitrix-app-manager-endpoint", &self.app_manager_endpoint),
            ("openpitrix-category-manager-endpoint", &self.category_manager_endpoint),
            ("openpitrix-attachment-manager-endpoint", &self.attachment_manager_endpoint),
            ("openpitrix-repo-indexer-endpoint", &self.repo_indexer_endpoint),
        ]
    }

    fn endpoints_mut(&mut self) -> [(&'static str, &mut String); 7] {
        [
            ("openpitrix-runtime-manager-endpoint", &mut self.runtime_manager_endpoint),
            ("openpitrix-cluster-manager-endpoint", &mut self.cluster_manager_endpoint),
            ("openpitrix-repo-manager-endpoint", &mut self.repo_manager_endpoint),
            ("openpitrix-app-manager-endpoint", &mut self.app_manager_endpoint),
            ("openpitrix-category-manager-endpoint", &mut self.category_manager_endpoint),
            ("openpitrix-attachment-manager-endpoint", &mut self.attachment_manager_endpoint),
            ("openpitrix-repo-indexer-endpoint", &mut self.repo_indexer_endpoint),
        ]
    }
}

impl OptionGroup for OpenPitrixOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        for (flag_name, value) in self.endpoints() {
            let service = flag_name
                .trim_start_matches("openpitrix-")
                .trim_end_matches("-endpoint")
                .replace('-', " ");
            fs.string_var(
                flag_name,
                value,
                format!(
                    "OpenPitrix {service} service endpoint, in host:port form. \
                     Leave blank if OpenPitrix is not installed."
                ),
            );
        }
    }

    fn apply(&mut self, matches: &ArgMatches) {
        for (flag_name, value) in self.endpoints_mut() {
            flag::assign(matches, flag_name, value);
        }
    }

    fn validate(&self) -> Vec<ValidationError> {
        self.endpoints()
            .into_iter()
            .filter(|(_, endpoint)| !endpoint.is_empty() && !is_host_port(endpoint))
            .map(|(flag_name, endpoint)| {
                ValidationError::invalid(
                    NAME,
                    format!("--{flag_name} {endpoint:?} must be in host:port form"),
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_each_bad_endpoint_is_reported() {
        let options = OpenPitrixOptions {
            runtime_manager_endpoint: "openpitrix-runtime-manager.openpitrix-system.svc:9103"
                .to_string(),
            app_manager_endpoint: "openpitrix-app-manager".to_string(),
            repo_indexer_endpoint: "indexer:port".to_string(),
            ..Default::default()
        };
        let errs = options.validate();
        assert_eq!(errs.len(), 2);
        assert!(errs[0].to_string().contains("openpitrix-app-manager-endpoint"));
        assert!(errs[1].to_string().contains("openpitrix-repo-indexer-endpoint"));
    }

    #[test]
    fn test_registers_seven_flags() {
        let mut fs = FlagSet::new(NAME);
        OpenPitrixOptions::default().add_flags(&mut fs);
        assert_eq!(fs.args().len(), 7);
        assert!(fs.lookup("openpitrix-category-manager-endpoint").is_some());
    }
}
