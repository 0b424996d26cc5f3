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

//! LDAP directory options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{is_host_port, OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "ldap";

/// Connection and search settings for the user directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LdapOptions {
    /// LDAP server as `host:port`. Empty disables LDAP.
    pub host: String,
    /// Bind DN of the manager account.
    #[serde(rename = "managerDN")]
    pub manager_dn: String,
    /// Password of the manager account.
    pub manager_password: String,
    /// Base DN for user entries.
    pub user_search_base: String,
    /// Base DN for group entries.
    pub group_search_base: String,
    /// Connections opened when the pool starts.
    pub initial_cap: i32,
    /// Upper bound on pooled connections.
    pub max_cap: i32,
    /// Name of the connection pool.
    pub pool_name: String,
}

impl Default for LdapOptions {
    fn default() -> Self {
        Self {
            host: "openldap.kubesphere-system.svc:389".to_string(),
            manager_dn: "cn=admin,dc=kubesphere,dc=io".to_string(),
            manager_password: String::new(),
            user_search_base: "ou=Users,dc=kubesphere,dc=io".to_string(),
            group_search_base: "ou=Groups,dc=kubesphere,dc=io".to_string(),
            initial_cap: 10,
            max_cap: 100,
            pool_name: "ldap".to_string(),
        }
    }
}

impl OptionGroup for LdapOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "ldap-host",
            &self.host,
            "Ldap service host, if left blank, all of the following ldap options will be \
             ignored and ldap will be disabled.",
        );
        fs.string_var(
            "ldap-manager-dn",
            &self.manager_dn,
            "Ldap manager account domain name.",
        );
        fs.string_var(
            "ldap-manager-password",
            &self.manager_password,
            "Ldap manager account password.",
        );
        fs.string_var(
            "ldap-user-search-base",
            &self.user_search_base,
            "Ldap user search base.",
        );
        fs.string_var(
            "ldap-group-search-base",
            &self.group_search_base,
            "Ldap group search base.",
        );
        fs.num_var(
            "ldap-initial-cap",
            self.initial_cap,
            "Initial number of connections in the ldap connection pool.",
        );
        fs.num_var(
            "ldap-max-cap",
            self.max_cap,
            "Maximum number of connections in the ldap connection pool.",
        );
        fs.string_var("ldap-pool-name", &self.pool_name, "Ldap connection pool name.");
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "ldap-host", &mut self.host);
        flag::assign(matches, "ldap-manager-dn", &mut self.manager_dn);
        flag::assign(matches, "ldap-manager-password", &mut self.manager_password);
        flag::assign(matches, "ldap-user-search-base", &mut self.user_search_base);
        flag::assign(matches, "ldap-group-search-base", &mut self.group_search_base);
        flag::assign(matches, "ldap-initial-cap", &mut self.initial_cap);
        flag::assign(matches, "ldap-max-cap", &mut self.max_cap);
        flag::assign(matches, "ldap-pool-name", &mut self.pool_name);
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        if self.host.is_empty() {
            return errs;
        }

        if !is_host_port(&self.host) {
            errs.push(ValidationError::invalid(
                NAME,
                format!("--ldap-host {:?} must be in host:port form", self.host),
            ));
        }
        if self.initial_cap < 0 {
            errs.push(ValidationError::invalid(NAME, "initial cap must not be negative"));
        }
        if self.max_cap <= 0 {
            errs.push(ValidationError::invalid(NAME, "max cap must be greater than 0"));
        } else if self.initial_cap > self.max_cap {
            errs.push(ValidationError::invalid(
                NAME,
                format!(
                    "initial cap {} exceeds max cap {}",
                    self.initial_cap, self.max_cap
                ),
            ));
        }
        errs
    }
}
