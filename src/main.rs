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

//! ks-controller-manager - KubeSphere controller manager entry point
//!
//! Builds the options, overlays `kubesphere.yaml`, parses flags and
//! validates everything before any controller would start.

#![warn(missing_docs)]
#![warn(clippy::all)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Command;
use tracing::{error, info, warn};

use kubesphere_controller_manager::config;
use kubesphere_controller_manager::logging;
use kubesphere_controller_manager::options::ControllerManagerOptions;
use kubesphere_controller_manager::{CONTROLLER_MANAGER_NAME, VERSION};

fn main() -> anyhow::Result<ExitCode> {
    let mut options = ControllerManagerOptions::new();

    // The file has to be merged before flags are registered so its values
    // become the flag defaults.
    let loaded = config::try_load_from_disk().context("failed to load configuration from disk")?;
    let config_path = loaded.as_ref().map(|(path, _)| path.clone());
    if let Some((_, conf)) = loaded {
        options.merge_config(conf);
    }

    let matches = options.flags().command(base_command()).get_matches();
    options.apply(&matches);

    logging::init(&options.logging).context("failed to initialize logging")?;

    match &config_path {
        Some(path) => info!(path = %path.display(), "loaded configuration"),
        None => info!("no configuration file found, using defaults"),
    }

    let selector = match options.complete() {
        Ok(selector) => selector,
        Err(errs) => {
            for err in errs.errors() {
                error!(error = %err, "invalid option");
            }
            error!("{errs}");
            return Ok(ExitCode::FAILURE);
        }
    };

    if options.leader_elect && !options.leader_election.is_consistent() {
        warn!(
            lease_duration = ?options.leader_election.lease_duration,
            renew_deadline = ?options.leader_election.renew_deadline,
            retry_period = ?options.leader_election.retry_period,
            "leader election timings should satisfy retry period < renew deadline <= lease duration"
        );
    }

    info!(
        version = VERSION,
        leader_elect = options.leader_elect,
        webhook_cert_dir = %options.webhook_cert_dir,
        application_selector = %selector,
        multicluster = options.multicluster_options.enable,
        "options validated"
    );

    Ok(ExitCode::SUCCESS)
}

fn base_command() -> Command {
    Command::new(CONTROLLER_MANAGER_NAME)
        .version(VERSION)
        .about("KubeSphere controller manager")
        .long_about(
            "KubeSphere controller manager is a daemon that embeds the control loops shipped \
             with KubeSphere.",
        )
}
