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

//! Leader election timing.
//!
//! Only the lease timings live here. Acquiring and renewing the lease is
//! the job of the election runtime that consumes this configuration.

use std::time::Duration;

use clap::ArgMatches;

use crate::flag::{self, FlagSet};

/// Timing configuration for leader election.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeaderElectionConfig {
    /// How long non-leaders wait before trying to take over an unrenewed lease.
    pub lease_duration: Duration,

    /// How long the acting leader keeps retrying renewal before giving up.
    pub renew_deadline: Duration,

    /// Wait between acquisition and renewal attempts.
    pub retry_period: Duration,
}

impl Default for LeaderElectionConfig {
    fn default() -> Self {
        Self {
            lease_duration: Duration::from_secs(30),
            renew_deadline: Duration::from_secs(15),
            retry_period: Duration::from_secs(5),
        }
    }
}

impl LeaderElectionConfig {
    /// Sets the lease duration.
    pub fn with_lease_duration(mut self, duration: Duration) -> Self {
        self.lease_duration = duration;
        self
    }

    /// Sets the renew deadline.
    pub fn with_renew_deadline(mut self, deadline: Duration) -> Self {
        self.renew_deadline = deadline;
        self
    }

    /// Sets the retry period.
    pub fn with_retry_period(mut self, period: Duration) -> Self {
        self.retry_period = period;
        self
    }

    /// Returns true if `retry_period < renew_deadline <= lease_duration`.
    ///
    /// Not part of option validation; the election runtime owns this rule.
    pub fn is_consistent(&self) -> bool {
        self.retry_period < self.renew_deadline && self.renew_deadline <= self.lease_duration
    }

    /// Registers the three timing flags.
    pub fn bind_flags(&self, fs: &mut FlagSet) {
        fs.duration_var(
            "leader-elect-lease-duration",
            self.lease_duration,
            "The duration that non-leader candidates will wait after observing a leadership \
             renewal until attempting to acquire leadership of a led but unrenewed leader \
             slot. This is effectively the maximum duration that a leader can be stopped \
             before it is replaced by another candidate. This is only applicable if leader \
             election is enabled.",
        );
        fs.duration_var(
            "leader-elect-renew-deadline",
            self.renew_deadline,
            "The interval between attempts by the acting master to renew a leadership slot \
             before it stops leading. This must be less than or equal to the lease duration. \
             This is only applicable if leader election is enabled.",
        );
        fs.duration_var(
            "leader-elect-retry-period",
            self.retry_period,
            "The duration the clients should wait between attempting acquisition and renewal \
             of a leadership. This is only applicable if leader election is enabled.",
        );
    }

    /// Copies parsed timing flags back into this config.
    pub fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, "leader-elect-lease-duration", &mut self.lease_duration);
        flag::assign(matches, "leader-elect-renew-deadline", &mut self.renew_deadline);
        flag::assign(matches, "leader-elect-retry-period", &mut self.retry_period);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::NamedFlagSets;

    #[test]
    fn test_default_timings_are_ordered() {
        let config = LeaderElectionConfig::default();

        assert_eq!(config.lease_duration, Duration::from_secs(30));
        assert_eq!(config.renew_deadline, Duration::from_secs(15));
        assert_eq!(config.retry_period, Duration::from_secs(5));
        assert!(config.retry_period < config.renew_deadline);
        assert!(config.renew_deadline < config.lease_duration);
        assert!(config.is_consistent());
    }

    #[test]
    fn test_inconsistent_timings() {
        let config = LeaderElectionConfig::default().with_renew_deadline(Duration::from_secs(45));
        assert!(!config.is_consistent());

        let config = LeaderElectionConfig::default().with_retry_period(Duration::from_secs(15));
        assert!(!config.is_consistent());

        let config = LeaderElectionConfig::default()
            .with_lease_duration(Duration::from_secs(15));
        assert!(config.is_consistent());
    }

    #[test]
    fn test_bind_and_apply() {
        let mut config = LeaderElectionConfig::default();
        let mut fss = NamedFlagSets::new();
        config.bind_flags(fss.flag_set("leaderelection"));

        let matches = fss
            .command(clap::Command::new("test").no_binary_name(true))
            .try_get_matches_from(["--leader-elect-lease-duration=1m", "--leader-elect-retry-period=2s"])
            .unwrap();
        config.apply(&matches);

        assert_eq!(config.lease_duration, Duration::from_secs(60));
        assert_eq!(config.renew_deadline, Duration::from_secs(15));
        assert_eq!(config.retry_period, Duration::from_secs(2));
    }
}
