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

//! Authentication options.

use std::time::Duration;

use clap::ArgMatches;
use serde::{Deserialize, Serialize};

use super::{OptionGroup, ValidationError};
use crate::config::humantime_serde;
use crate::flag::{self, FlagSet};

const NAME: &str = "authentication";

/// Login throttling, session and token settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthenticationOptions {
    /// Failed logins allowed within `authenticate_rate_limiter_duration`.
    pub authenticate_rate_limiter_max_tries: i32,

    /// Window over which failed logins are counted.
    #[serde(with = "humantime_serde")]
    pub authenticate_rate_limiter_duration: Duration,

    /// How long login records are kept.
    #[serde(with = "humantime_serde")]
    pub login_history_retention_period: Duration,

    /// Allow one account to be logged in from several places at once.
    pub multiple_login: bool,

    /// Secret used to sign issued tokens.
    pub jwt_secret: String,

    /// Tolerated clock difference when checking token times.
    #[serde(with = "humantime_serde")]
    pub maximum_clock_skew: Duration,
}

impl Default for AuthenticationOptions {
    fn default() -> Self {
        Self {
            authenticate_rate_limiter_max_tries: 10,
            authenticate_rate_limiter_duration: Duration::from_secs(10 * 60),
            login_history_retention_period: Duration::from_secs(7 * 24 * 60 * 60),
            multiple_login: true,
            jwt_secret: String::new(),
            maximum_clock_skew: Duration::from_secs(10),
        }
    }
}

impl OptionGroup for AuthenticationOptions {
    fn name(&self) -> &'static str {
        NAME
    }

    fn add_flags(&self, fs: &mut FlagSet) {
        fs.num_var(
            "authenticate-rate-limiter-max-retries",
            self.authenticate_rate_limiter_max_tries,
            "Maximum number of failed login attempts allowed within the rate limiter duration.",
        );
        fs.duration_var(
            "authenticate-rate-limiter-duration",
            self.authenticate_rate_limiter_duration,
            "Window in which failed login attempts are counted.",
        );
        fs.duration_var(
            "login-history-retention-period",
            self.login_history_retention_period,
            "Retention period of login records.",
        );
        fs.duration_var(
            "maximum-clock-skew",
            self.maximum_clock_skew,
            "The maximum time difference between the system clocks of the ks-apiserver that \
             issued a JWT and the ks-apiserver that verified the JWT.",
        );
        fs.bool_var(
            "multiple-login",
            self.multiple_login,
            "Allow multiple login with the same account, disable means only one user can \
             login at the same time.",
        );
        fs.string_var("jwt-secret", &self.jwt_secret, "Secret to sign jwt token.");
    }

    fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(
            matches,
            "authenticate-rate-limiter-max-retries",
            &mut self.authenticate_rate_limiter_max_tries,
        );
        flag::assign(
            matches,
            "authenticate-rate-limiter-duration",
            &mut self.authenticate_rate_limiter_duration,
        );
        flag::assign(
            matches,
            "login-history-retention-period",
            &mut self.login_history_retention_period,
        );
        flag::assign(matches, "maximum-clock-skew", &mut self.maximum_clock_skew);
        flag::assign(matches, "multiple-login", &mut self.multiple_login);
        flag::assign(matches, "jwt-secret", &mut self.jwt_secret);
    }

    fn validate(&self) -> Vec<ValidationError> {
        let mut errs = Vec::new();
        if self.login_history_retention_period.is_zero() {
            errs.push(ValidationError::invalid(
                NAME,
                "login history retention period must be greater than 0",
            ));
        }
        if self.authenticate_rate_limiter_max_tries > 0
            && self.authenticate_rate_limiter_duration.is_zero()
        {
            errs.push(ValidationError::invalid(
                NAME,
                "authenticate rate limiter duration must be greater than 0 when retries are limited",
            ));
        }
        errs
    }
}
