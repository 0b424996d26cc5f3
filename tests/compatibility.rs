//! Compatibility tests against the upstream ks-controller-manager flag surface.
//!
//! These tests verify that flag names, defaults and validation behave the
//! way existing deployments expect.

use std::io::Write;
use std::time::Duration;

use clap::{ArgMatches, Command};
use kubesphere_controller_manager::{config, logging};
use kubesphere_controller_manager::options::ControllerManagerOptions;
use kubesphere_controller_manager::ValidationError;

fn command(options: &ControllerManagerOptions) -> Command {
    options
        .flags()
        .command(Command::new("ks-controller-manager").no_binary_name(true))
}

fn parse(options: &ControllerManagerOptions, args: &[&str]) -> ArgMatches {
    command(options).try_get_matches_from(args).unwrap()
}

/// Test 1: every upstream flag is still accepted and lands in its field
#[test]
fn test_cli_accepts_same_arguments() {
    let kubeconfig = tempfile::NamedTempFile::new().unwrap();
    let kubeconfig_path = kubeconfig.path().to_string_lossy().into_owned();
    let kubeconfig_flag = format!("--kubeconfig={kubeconfig_path}");

    let args = [
        kubeconfig_flag.as_str(),
        "--master=https://10.0.0.1:6443",
        "--jenkins-host=http://ks-jenkins.kubesphere-devops-system.svc",
        "--jenkins-username=admin",
        "--jenkins-password=secret",
        "--jenkins-max-connections=20",
        "--s3-endpoint=http://minio.kubesphere-system.svc:9000",
        "--s3-disable-SSL=false",
        "--s3-bucket=uploads",
        "--jwt-secret=signing-key",
        "--ldap-host=ldap.example.com:636",
        "--ldap-manager-dn=cn=root,dc=example,dc=com",
        "--openpitrix-runtime-manager-endpoint=runtime-manager.openpitrix-system.svc:9103",
        "--enable-network-policy",
        "--ippool-type=calico",
        "--multiple-clusters",
        "--agent-image=kubesphere/tower:v3.0",
        "--istio-pilot-host=http://istio-pilot.istio-system.svc:9090",
        "--jaeger-query-host=http://jaeger-query.istio-system.svc",
        "--watches-path=/etc/kubesphere/custom-watches.yaml",
        "--leader-elect",
        "--leader-elect-lease-duration=1m",
        "--leader-elect-renew-deadline=40s",
        "--leader-elect-retry-period=10s",
        "--webhook-cert-dir=/tmp/certs",
        "--application-selector=!kubesphere.io/creator",
        "--log-level=debug",
        "--log-json",
    ];

    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(&options, &args));

    assert_eq!(options.kubernetes_options.kube_config, kubeconfig_path);
    assert_eq!(options.kubernetes_options.master, "https://10.0.0.1:6443");
    assert_eq!(
        options.devops_options.host,
        "http://ks-jenkins.kubesphere-devops-system.svc"
    );
    assert_eq!(options.devops_options.username, "admin");
    assert_eq!(options.devops_options.password, "secret");
    assert_eq!(options.devops_options.max_connections, 20);
    assert_eq!(
        options.s3_options.endpoint,
        "http://minio.kubesphere-system.svc:9000"
    );
    assert!(!options.s3_options.disable_ssl);
    assert_eq!(options.s3_options.bucket, "uploads");
    assert_eq!(options.authentication_options.jwt_secret, "signing-key");
    assert_eq!(options.ldap_options.host, "ldap.example.com:636");
    assert_eq!(options.ldap_options.manager_dn, "cn=root,dc=example,dc=com");
    assert_eq!(
        options.openpitrix_options.runtime_manager_endpoint,
        "runtime-manager.openpitrix-system.svc:9103"
    );
    assert!(options.network_options.enable_network_policy);
    assert_eq!(options.network_options.ippool_type, "calico");
    assert!(options.multicluster_options.enable);
    assert_eq!(options.multicluster_options.agent_image, "kubesphere/tower:v3.0");
    assert_eq!(
        options.servicemesh_options.istio_pilot_host,
        "http://istio-pilot.istio-system.svc:9090"
    );
    assert_eq!(
        options.servicemesh_options.jaeger_query_host,
        "http://jaeger-query.istio-system.svc"
    );
    assert_eq!(
        options.gateway_options.watches_path,
        "/etc/kubesphere/custom-watches.yaml"
    );
    assert!(options.leader_elect);
    assert_eq!(options.leader_election.lease_duration, Duration::from_secs(60));
    assert_eq!(options.leader_election.renew_deadline, Duration::from_secs(40));
    assert_eq!(options.leader_election.retry_period, Duration::from_secs(10));
    assert_eq!(options.webhook_cert_dir, "/tmp/certs");
    assert_eq!(options.application_selector, "!kubesphere.io/creator");
    assert_eq!(options.logging.level, "debug");
    assert!(options.logging.json);

    assert_eq!(options.validate(), Vec::new());
}

/// Test 2: help output is sectioned by flag set
#[test]
fn test_help_sections() {
    let help = command(&ControllerManagerOptions::new())
        .render_long_help()
        .to_string();

    for section in ["kubernetes", "devops", "leaderelection", "generic", "logging"] {
        assert!(help.contains(section), "Missing help section: {section}");
    }
    assert!(!help.contains("--log_level"));
}

/// Test 3: leader election defaults
#[test]
fn test_leader_election_defaults() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(&options, &[]));

    assert!(!options.leader_elect);
    assert_eq!(options.leader_election.lease_duration, Duration::from_secs(30));
    assert_eq!(options.leader_election.renew_deadline, Duration::from_secs(15));
    assert_eq!(options.leader_election.retry_period, Duration::from_secs(5));
    assert!(options.webhook_cert_dir.is_empty());
    assert!(options.application_selector.is_empty());
}

/// Test 4: defaults without overrides validate clean, then an exclusion selector
#[test]
fn test_end_to_end_validation() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(&options, &[]));
    assert!(options.validate().is_empty());

    options.application_selector = "!kubesphere.io/creator".to_string();
    assert!(options.validate().is_empty());

    let selector = options.parsed_application_selector().unwrap();
    let mut labels = std::collections::BTreeMap::new();
    labels.insert("app.kubernetes.io/name".to_string(), "bookinfo".to_string());
    assert!(selector.matches(&labels));
    labels.insert("kubesphere.io/creator".to_string(), "admin".to_string());
    assert!(!selector.matches(&labels));
}

/// Test 5: a malformed selector given on the command line yields one error
#[test]
fn test_malformed_selector_from_flags() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(&options, &["--application-selector", "=="]));

    let errs = options.validate();
    assert_eq!(errs.len(), 1);
    assert!(matches!(errs[0], ValidationError::ApplicationSelector { .. }));
}

/// Test 6: errors from every group are reported together
#[test]
fn test_errors_are_not_short_circuited() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(
        &options,
        &[
            "--kubeconfig=/nonexistent/kubeconfig",
            "--ippool-type=flannel",
            "--watches-path=",
            "--log-level=chatty",
        ],
    ));

    let errs = options.validate();
    assert_eq!(errs.len(), 4, "{errs:?}");
    assert_eq!(options.validate(), errs);
}

/// Test 7: the config file feeds flag defaults, flags still win
#[test]
fn test_config_file_then_flags() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kubesphere.yaml");
    let mut file = std::fs::File::create(&path).unwrap();
    writeln!(
        file,
        "multicluster:\n  enable: true\n  agentImage: kubesphere/tower:v3.0\n\
         s3:\n  endpoint: http://minio.kubesphere-system.svc:9000\n  bucket: artifacts"
    )
    .unwrap();

    let (_, conf) = config::try_load_from(&[path]).unwrap().unwrap();
    let mut options = ControllerManagerOptions::new();
    options.merge_config(conf);

    options.apply(&parse(&options, &["--s3-bucket", "uploads"]));

    assert!(options.multicluster_options.enable);
    assert_eq!(options.multicluster_options.agent_image, "kubesphere/tower:v3.0");
    assert_eq!(
        options.s3_options.endpoint,
        "http://minio.kubesphere-system.svc:9000"
    );
    assert_eq!(options.s3_options.bucket, "uploads");
    assert!(options.validate().is_empty());
}

/// Test 8: bool flags follow pflag syntax
#[test]
fn test_bool_flag_syntax() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(&options, &["--leader-elect", "--s3-disable-SSL=false"]));
    assert!(options.leader_elect);
    assert!(!options.s3_options.disable_ssl);

    assert!(command(&options)
        .try_get_matches_from(["--leader-elect=maybe"])
        .is_err());
}

/// Test 9: a bad log level does not hide the other option errors
#[test]
fn test_bad_log_level_is_reported_with_the_rest() {
    let mut options = ControllerManagerOptions::new();
    options.apply(&parse(
        &options,
        &["--log-level=loud", "--ippool-type=flannel", "--watches-path="],
    ));

    // Startup installs the subscriber before validating; it must not bail out.
    assert!(logging::init(&options.logging).is_ok());

    let errs = options.complete().unwrap_err();
    assert_eq!(errs.errors().len(), 3, "{errs}");
}
