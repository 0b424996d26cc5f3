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

//! kubesphere-controller-manager - options for the KubeSphere controller manager
//!
//! This library bundles everything the controller manager reads at startup:
//! - Option groups for each integration (Kubernetes, DevOps, S3, LDAP, ...)
//! - Named flag sets and the logging flag adapter
//! - Aggregated validation
//! - Label selector parsing for the application selector
//! - On-disk configuration

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod flag;
pub mod labels;
pub mod leader_election;
pub mod logging;
pub mod options;

// Re-export commonly used types
pub use flag::{FlagSet, NamedFlagSets};
pub use labels::Selector;
pub use leader_election::LeaderElectionConfig;
pub use options::{AggregateError, ControllerManagerOptions, OptionGroup, ValidationError};

/// Semantic version of this crate.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default name for the controller manager.
pub const CONTROLLER_MANAGER_NAME: &str = "ks-controller-manager";
