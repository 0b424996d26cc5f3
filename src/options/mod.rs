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

//! Command-line options for the controller manager.
//!
//! [`ControllerManagerOptions`] owns one value per option group. Startup
//! runs in this order:
//!
//! 1. [`ControllerManagerOptions::new`] builds the defaults.
//! 2. [`ControllerManagerOptions::merge_config`] overlays the on-disk
//!    configuration, if there is one.
//! 3. [`ControllerManagerOptions::flags`] registers every flag in a named
//!    set. The current values become the flag defaults.
//! 4. clap parses argv, and [`ControllerManagerOptions::apply`] copies the
//!    results back.
//! 5. [`ControllerManagerOptions::validate`] reports every problem at once.

use std::fmt;

use clap::ArgMatches;
use thiserror::Error;

use crate::config::Config;
use crate::flag::{self, FlagSet, NamedFlagSets};
use crate::labels::{self, Selector, SelectorError};
use crate::leader_election::LeaderElectionConfig;
use crate::logging::LoggingOptions;

mod authentication;
mod devops;
mod gateway;
mod kubernetes;
mod ldap;
mod multicluster;
mod network;
mod openpitrix;
mod s3;
mod servicemesh;

pub use authentication::AuthenticationOptions;
pub use devops::DevopsOptions;
pub use gateway::GatewayOptions;
pub use kubernetes::KubernetesOptions;
pub use ldap::LdapOptions;
pub use multicluster::MultiClusterOptions;
pub use network::NetworkOptions;
pub use openpitrix::OpenPitrixOptions;
pub use s3::S3Options;
pub use servicemesh::ServiceMeshOptions;

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    /// An option group rejected its own values.
    #[error("{group}: {message}")]
    Invalid {
        /// Flag set name of the group.
        group: &'static str,
        /// What is wrong.
        message: String,
    },

    /// `--application-selector` is not a valid label selector.
    #[error("invalid application selector {selector:?}: {source}")]
    ApplicationSelector {
        /// The rejected expression.
        selector: String,
        /// Why parsing failed.
        #[source]
        source: SelectorError,
    },
}

impl ValidationError {
    /// Shorthand for [`ValidationError::Invalid`].
    pub fn invalid(group: &'static str, message: impl Into<String>) -> Self {
        Self::Invalid {
            group,
            message: message.into(),
        }
    }
}

/// Several validation failures reported as one error.
///
/// Formats like Kubernetes aggregates: a single error prints as itself,
/// several print as `[a, b]`.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregateError(Vec<ValidationError>);

impl AggregateError {
    /// Wraps `errors`, returning `None` when there are none.
    pub fn new(errors: Vec<ValidationError>) -> Option<Self> {
        if errors.is_empty() {
            None
        } else {
            Some(Self(errors))
        }
    }

    /// The individual errors in the order they were found.
    pub fn errors(&self) -> &[ValidationError] {
        &self.0
    }
}

impl fmt::Display for AggregateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let [only] = self.0.as_slice() {
            return write!(f, "{only}");
        }
        f.write_str("[")?;
        for (i, err) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{err}")?;
        }
        f.write_str("]")
    }
}

impl std::error::Error for AggregateError {}

/// The contract every option group fulfils.
pub trait OptionGroup {
    /// Name of the flag set the group registers into.
    fn name(&self) -> &'static str;

    /// Registers the group's flags, using current values as defaults.
    fn add_flags(&self, fs: &mut FlagSet);

    /// Copies parsed flag values back into the group.
    fn apply(&mut self, matches: &ArgMatches);

    /// Checks the group's values. An empty list means valid.
    fn validate(&self) -> Vec<ValidationError>;
}

/// All options of the controller manager.
#[derive(Debug, Clone, PartialEq)]
pub struct ControllerManagerOptions {
    /// Kubernetes API connection.
    pub kubernetes_options: KubernetesOptions,
    /// Jenkins integration.
    pub devops_options: DevopsOptions,
    /// S3-compatible object storage.
    pub s3_options: S3Options,
    /// Login and token settings.
    pub authentication_options: AuthenticationOptions,
    /// LDAP directory.
    pub ldap_options: LdapOptions,
    /// OpenPitrix application marketplace.
    pub openpitrix_options: OpenPitrixOptions,
    /// Network policy and IP pools.
    pub network_options: NetworkOptions,
    /// Multi-cluster federation.
    pub multicluster_options: MultiClusterOptions,
    /// Istio and tracing backends.
    pub servicemesh_options: ServiceMeshOptions,
    /// Ingress gateway.
    pub gateway_options: GatewayOptions,

    /// Whether to run leader election before starting controllers.
    pub leader_elect: bool,

    /// Lease timings used when `leader_elect` is set.
    pub leader_election: LeaderElectionConfig,

    /// Directory holding `tls.crt` and `tls.key` for the webhook server.
    ///
    /// Empty means `{TempDir}/k8s-webhook-server/serving-certs`.
    pub webhook_cert_dir: String,

    /// Only applications matching this selector are reconciled.
    ///
    /// Other projects build on sigs.k8s.io/application too, so installing
    /// alongside them can cause conflicts. For example
    /// `kubesphere.io/creator=` reconciles only applications carrying that
    /// label key, and `!kubesphere.io/creator` excludes them. Empty
    /// reconciles everything.
    pub application_selector: String,

    /// Log level and format.
    pub logging: LoggingOptions,
}

impl Default for ControllerManagerOptions {
    fn default() -> Self {
        Self::new()
    }
}

const LEADER_ELECT: &str = "leader-elect";
const WEBHOOK_CERT_DIR: &str = "webhook-cert-dir";
const APPLICATION_SELECTOR: &str = "application-selector";

impl ControllerManagerOptions {
    /// Builds the options with every group at its defaults.
    pub fn new() -> Self {
        Self {
            kubernetes_options: KubernetesOptions::default(),
            devops_options: DevopsOptions::default(),
            s3_options: S3Options::default(),
            authentication_options: AuthenticationOptions::default(),
            ldap_options: LdapOptions::default(),
            openpitrix_options: OpenPitrixOptions::default(),
            network_options: NetworkOptions::default(),
            multicluster_options: MultiClusterOptions::default(),
            servicemesh_options: ServiceMeshOptions::default(),
            gateway_options: GatewayOptions::default(),
            leader_elect: false,
            leader_election: LeaderElectionConfig::default(),
            webhook_cert_dir: String::new(),
            application_selector: String::new(),
            logging: LoggingOptions::default(),
        }
    }

    /// Replaces every group present in `config`.
    ///
    /// Leader election, the webhook directory, the selector and logging are
    /// flag-only and keep their current values.
    pub fn merge_config(&mut self, config: Config) {
        let Config {
            kubernetes,
            devops,
            s3,
            authentication,
            ldap,
            openpitrix,
            network,
            multicluster,
            servicemesh,
            gateway,
        } = config;

        if let Some(o) = kubernetes {
            self.kubernetes_options = o;
        }
        if let Some(o) = devops {
            self.devops_options = o;
        }
        if let Some(o) = s3 {
            self.s3_options = o;
        }
        if let Some(o) = authentication {
            self.authentication_options = o;
        }
        if let Some(o) = ldap {
            self.ldap_options = o;
        }
        if let Some(o) = openpitrix {
            self.openpitrix_options = o;
        }
        if let Some(o) = network {
            self.network_options = o;
        }
        if let Some(o) = multicluster {
            self.multicluster_options = o;
        }
        if let Some(o) = servicemesh {
            self.servicemesh_options = o;
        }
        if let Some(o) = gateway {
            self.gateway_options = o;
        }
    }

    /// Option groups in flag registration order.
    fn groups(&self) -> [&dyn OptionGroup; 10] {
        [
            &self.kubernetes_options,
            &self.devops_options,
            &self.s3_options,
            &self.authentication_options,
            &self.ldap_options,
            &self.openpitrix_options,
            &self.network_options,
            &self.multicluster_options,
            &self.servicemesh_options,
            &self.gateway_options,
        ]
    }

    fn groups_mut(&mut self) -> [&mut dyn OptionGroup; 10] {
        [
            &mut self.kubernetes_options,
            &mut self.devops_options,
            &mut self.s3_options,
            &mut self.authentication_options,
            &mut self.ldap_options,
            &mut self.openpitrix_options,
            &mut self.network_options,
            &mut self.multicluster_options,
            &mut self.servicemesh_options,
            &mut self.gateway_options,
        ]
    }

    /// Registers every flag, grouped into named sets.
    pub fn flags(&self) -> NamedFlagSets {
        let mut fss = NamedFlagSets::new();

        for group in self.groups() {
            group.add_flags(fss.flag_set(group.name()));
        }

        let fs = fss.flag_set("leaderelection");
        self.leader_election.bind_flags(fs);
        fs.bool_var(
            LEADER_ELECT,
            self.leader_elect,
            "Whether to enable leader election. This field should be enabled when controller \
             manager deployed with multiple replicas.",
        );
        fs.string_var(
            WEBHOOK_CERT_DIR,
            &self.webhook_cert_dir,
            "Certificate directory used to setup webhooks, need tls.crt and tls.key placed \
             inside. If not set, webhook server would look up the server key and certificate \
             in {TempDir}/k8s-webhook-server/serving-certs",
        );

        fss.flag_set("generic").string_var(
            APPLICATION_SELECTOR,
            &self.application_selector,
            "Only reconcile application(sigs.k8s.io/application) objects match given selector, \
             this could avoid conflicts with other projects built on top of sig-application. \
             Default behavior is to reconcile all of application objects.",
        );

        self.logging.add_flags(fss.flag_set("logging"));

        fss
    }

    /// Copies parsed flag values into the options.
    pub fn apply(&mut self, matches: &ArgMatches) {
        for group in self.groups_mut() {
            group.apply(matches);
        }
        self.leader_election.apply(matches);
        flag::assign(matches, LEADER_ELECT, &mut self.leader_elect);
        flag::assign(matches, WEBHOOK_CERT_DIR, &mut self.webhook_cert_dir);
        flag::assign(matches, APPLICATION_SELECTOR, &mut self.application_selector);
        self.logging.apply(matches);
    }

    /// Validates every group and the application selector.
    ///
    /// All errors are collected; an empty list means the options are usable.
    pub fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        errs.extend(self.devops_options.validate());
        errs.extend(self.kubernetes_options.validate());
        errs.extend(self.s3_options.validate());
        errs.extend(self.openpitrix_options.validate());
        errs.extend(self.network_options.validate());
        errs.extend(self.ldap_options.validate());
        errs.extend(self.multicluster_options.validate());
        errs.extend(self.authentication_options.validate());
        errs.extend(self.servicemesh_options.validate());
        errs.extend(self.gateway_options.validate());
        errs.extend(
            self.logging
                .validate()
                .into_iter()
                .map(|msg| ValidationError::invalid("logging", msg)),
        );

        if !self.application_selector.is_empty() {
            if let Err(source) = labels::parse(&self.application_selector) {
                errs.push(ValidationError::ApplicationSelector {
                    selector: self.application_selector.clone(),
                    source,
                });
            }
        }

        errs
    }

    /// The parsed application selector; empty matches everything.
    pub fn parsed_application_selector(&self) -> Result<Selector, SelectorError> {
        if self.application_selector.is_empty() {
            return Ok(Selector::everything());
        }
        labels::parse(&self.application_selector)
    }

    /// Validates everything and returns the selector the manager runs with.
    ///
    /// Every problem is reported in the returned [`AggregateError`], so a
    /// bad log level does not hide errors from the other groups.
    pub fn complete(&self) -> Result<Selector, AggregateError> {
        if let Some(errs) = AggregateError::new(self.validate()) {
            return Err(errs);
        }
        self.parsed_application_selector().map_err(|source| {
            AggregateError(vec![ValidationError::ApplicationSelector {
                selector: self.application_selector.clone(),
                source,
            }])
        })
    }
}

/// Returns true if `endpoint` looks like `host:port`.
pub(crate) fn is_host_port(endpoint: &str) -> bool {
    match endpoint.rsplit_once(':') {
        Some((host, port)) => {
            !host.is_empty()
                && !host.contains(char::is_whitespace)
                && port.parse::<u16>().is_ok_and(|p| p > 0)
        }
        None => false,
    }
}

/// Checks that a non-empty `value` parses as an absolute URL.
pub(crate) fn check_url(group: &'static str, flag: &str, value: &str) -> Option<ValidationError> {
    if value.is_empty() {
        return None;
    }
    url::Url::parse(value)
        .err()
        .map(|e| ValidationError::invalid(group, format!("--{flag} {value:?} is not a valid URL: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(options: &ControllerManagerOptions, args: &[&str]) -> ArgMatches {
        options
            .flags()
            .command(clap::Command::new("test").no_binary_name(true))
            .try_get_matches_from(args)
            .unwrap()
    }

    fn selector_errors(errs: &[ValidationError]) -> usize {
        errs.iter()
            .filter(|e| matches!(e, ValidationError::ApplicationSelector { .. }))
            .count()
    }

    #[test]
    fn test_defaults_validate_clean() {
        let options = ControllerManagerOptions::new();
        assert_eq!(options.validate(), Vec::new());
    }

    #[test]
    fn test_all_named_sets_registered() {
        let fss = ControllerManagerOptions::new().flags();
        let names: Vec<_> = fss.names().collect();
        assert_eq!(
            names,
            vec![
                "kubernetes",
                "devops",
                "s3",
                "authentication",
                "ldap",
                "openpitrix",
                "network",
                "multicluster",
                "servicemesh",
                "gateway",
                "leaderelection",
                "generic",
                "logging",
            ]
        );
    }

    #[test]
    fn test_flag_defaults_equal_fresh_options() {
        let mut options = ControllerManagerOptions::new();
        let matches = parse(&options, &[]);
        options.apply(&matches);
        assert_eq!(options, ControllerManagerOptions::new());
    }

    #[test]
    fn test_flags_override_values() {
        let mut options = ControllerManagerOptions::new();
        let matches = parse(
            &options,
            &[
                "--leader-elect",
                "--leader-elect-lease-duration=45s",
                "--webhook-cert-dir=/etc/certs",
                "--application-selector=!kubesphere.io/creator",
                "--jenkins-max-connections=7",
                "--log-level=debug",
            ],
        );
        options.apply(&matches);

        assert!(options.leader_elect);
        assert_eq!(options.leader_election.lease_duration.as_secs(), 45);
        assert_eq!(options.webhook_cert_dir, "/etc/certs");
        assert_eq!(options.application_selector, "!kubesphere.io/creator");
        assert_eq!(options.devops_options.max_connections, 7);
        assert_eq!(options.logging.level, "debug");
    }

    #[test]
    fn test_selector_validation() {
        let mut options = ControllerManagerOptions::new();

        options.application_selector = "kubesphere.io/creator=".to_string();
        assert_eq!(selector_errors(&options.validate()), 0);

        options.application_selector = "!kubesphere.io/creator".to_string();
        assert!(options.validate().is_empty());

        options.application_selector = "==".to_string();
        let errs = options.validate();
        assert_eq!(selector_errors(&errs), 1);
        assert_eq!(errs.len(), 1);
    }

    #[test]
    fn test_empty_selector_ignores_group_state() {
        let mut options = ControllerManagerOptions::new();
        options.network_options.ippool_type = "flannel".to_string();
        let errs = options.validate();
        assert_eq!(selector_errors(&errs), 0);
        assert_eq!(errs.len(), 1);
        assert!(options.parsed_application_selector().unwrap().is_empty());
    }

    #[test]
    fn test_validate_collects_everything_and_is_idempotent() {
        let mut options = ControllerManagerOptions::new();
        options.devops_options.host = "http://jenkins.local".to_string();
        options.network_options.ippool_type = "flannel".to_string();
        options.multicluster_options.cluster_controller_resync_second = 0;
        options.application_selector = "a in ()".to_string();

        let first = options.validate();
        // credentials, ippool, resync, selector
        assert_eq!(first.len(), 4);
        assert_eq!(options.validate(), first);
    }

    #[test]
    fn test_merge_config_replaces_present_groups() {
        let mut options = ControllerManagerOptions::new();
        options.leader_elect = true;

        let config = Config {
            network: Some(NetworkOptions {
                enable_network_policy: true,
                ..Default::default()
            }),
            ..Default::default()
        };
        options.merge_config(config);

        assert!(options.network_options.enable_network_policy);
        assert_eq!(options.s3_options, S3Options::default());
        assert!(options.leader_elect);
    }

    #[test]
    fn test_complete_reports_log_level_with_other_errors() {
        let mut options = ControllerManagerOptions::new();
        options.apply(&parse(
            &options,
            &["--log-level=loud", "--ippool-type=flannel", "--watches-path="],
        ));

        let errs = options.complete().unwrap_err();
        assert_eq!(errs.errors().len(), 3, "{errs}");
        assert!(errs.to_string().contains("loud"));
    }

    #[test]
    fn test_complete_returns_selector() {
        let mut options = ControllerManagerOptions::new();
        options.apply(&parse(&options, &["--application-selector", "app=bookinfo"]));

        let selector = options.complete().unwrap();
        assert_eq!(selector.to_string(), "app=bookinfo");
    }

    #[test]
    fn test_help_text_has_no_stray_whitespace() {
        let fss = ControllerManagerOptions::new().flags();
        for fs in fss.iter() {
            for arg in fs.args() {
                let help = arg.get_help().map(|h| h.to_string()).unwrap_or_default();
                assert!(!help.is_empty(), "--{:?} has no help", arg.get_long());
                assert!(
                    !help.contains("  "),
                    "--{:?} help has a run of spaces: {help:?}",
                    arg.get_long()
                );
            }
        }
    }

    #[test]
    fn test_aggregate_error_display() {
        assert!(AggregateError::new(Vec::new()).is_none());

        let one = AggregateError::new(vec![ValidationError::invalid("s3", "bad")]).unwrap();
        assert_eq!(one.to_string(), "s3: bad");

        let two = AggregateError::new(vec![
            ValidationError::invalid("s3", "bad"),
            ValidationError::invalid("ldap", "worse"),
        ])
        .unwrap();
        assert_eq!(two.to_string(), "[s3: bad, ldap: worse]");
        assert_eq!(two.errors().len(), 2);
    }

    #[test]
    fn test_is_host_port() {
        assert!(is_host_port("openpitrix-runtime-manager.openpitrix-system.svc:9103"));
        assert!(is_host_port("10.0.0.1:389"));
        assert!(!is_host_port("no-port"));
        assert!(!is_host_port(":80"));
        assert!(!is_host_port("host:http"));
        assert!(!is_host_port("host:0"));
    }
}
