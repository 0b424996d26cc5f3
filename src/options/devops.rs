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

//! Jenkins (DevOps) integration options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{check_url, OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "devops";

/// Connection settings for the Jenkins server backing DevOps pipelines.
///
/// An empty host disables the integration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DevopsOptions {
    /// Jenkins address. Empty disables the DevOps integration.
    pub host: String,
    /// Jenkins user.
    pub username: String,
    /// Password or API token for `username`.
    pub password: String,
    /// Maximum concurrent connections to Jenkins.
    pub max_connections: i32,
}

impl Default for DevopsOptions {
    fn default() -> Self {
        Self {
            host: String::new(),
            username: String::new(),
            password: String::new(),
            max_connections: 100,
        }
    }
}

impl OptionGroup for DevopsOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "jenkins-host",
            &self.host,
            "Jenkins service host address. If left blank, means Jenkins is unnecessary.",
        );
        fs.string_var(
            "jenkins-username",
            &self.username,
            "Username for access to Jenkins service. Leave it blank if there isn't any.",
        );
        fs.string_var(
            "jenkins-password",
            &self.password,
            "Password for access to Jenkins service, used pair with username.",
        );
        fs.num_var(
            "jenkins-max-connections",
            self.max_connections,
            "Maximum allowed connections to Jenkins.",
        );
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "jenkins-host", &mut self.host);
        flag::assign(matches, "jenkins-username", &mut self.username);
        flag::assign(matches, "jenkins-password", &mut self.password);
        flag::assign(matches, "jenkins-max-connections", &mut self.max_connections);
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        if self.host.is_empty() {
            return errs;
        }

        errs.extend(check_url(NAME, "jenkins-host", &self.host));
        if self.username.is_empty() || self.password.is_empty() {
            errs.push(ValidationError::invalid(
                NAME,
                "jenkins's username or password is empty",
            ));
        }
        if self.max_connections <= 0 {
            errs.push(ValidationError::invalid(
                NAME,
                "jenkins's maximum connections should be greater than 0",
            ));
        }
        errs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_without_host() {
        let options = DevopsOptions {
            max_connections: 0,
            ..Default::default()
        };
        assert!(options.validate().is_empty());
    }

    #[test]
    fn test_enabled_requires_credentials() {
        let mut options = DevopsOptions {
            host: "http://ks-jenkins.kubesphere-devops-system.svc".to_string(),
            ..Default::default()
        };
        assert_eq!(options.validate().len(), 1);

        options.username = "admin".to_string();
        options.password = "P@88w0rd".to_string();
        assert!(options.validate().is_empty());

        options.max_connections = 0;
        options.host = "not a url".to_string();
        assert_eq!(options.validate().len(), 2);
    }
}
