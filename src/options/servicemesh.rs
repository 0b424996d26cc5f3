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

//! Service mesh options.

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{check_url, OptionGroup, ValidationError};
use crate::flag::{self, FlagSet};

const NAME: &str = "servicemesh";

/// Addresses of the Istio control plane and its observability backends.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ServiceMeshOptions {
    /// Istio Pilot discovery URL.
    pub istio_pilot_host: String,
    /// Jaeger query service URL.
    pub jaeger_query_host: String,
    /// Prometheus holding the mesh metrics.
    pub servicemesh_prometheus_host: String,
}

impl OptionGroup for ServiceMeshOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.string_var(
            "istio-pilot-host",
            &self.istio_pilot_host,
            "Istio pilot discovery service url.",
        );
        fs.string_var(
            "jaeger-query-host",
            &self.jaeger_query_host,
            "Jaeger query service address.",
        );
        fs.string_var(
            "servicemesh-prometheus-host",
            &self.servicemesh_prometheus_host,
            "Prometheus service for servicemesh.",
        );
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "istio-pilot-host", &mut self.istio_pilot_host);
        flag::assign(matches, "jaeger-query-host", &mut self.jaeger_query_host);
        flag::assign(
            matches,
            "servicemesh-prometheus-host",
            &mut self.servicemesh_prometheus_host,
        );
    }

    fn validate(&self) -> Vec<ValidationError> {
        [
            check_url(NAME, "istio-pilot-host", &self.istio_pilot_host),
            check_url(NAME, "jaeger-query-host", &self.jaeger_query_host),
            check_url(
                NAME,
                "servicemesh-prometheus-host",
                &self.servicemesh_prometheus_host,
            ),
        ]
        .into_iter()
        .flatten()
        .collect()
    }
}
