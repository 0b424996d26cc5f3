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

//! Logging flags and subscriber setup.
//!
//! The logging backend declares its flags in its own underscore style
//! (`log_level`, `log_json`, ...). They reach the command line through
//! [`FlagSet::add_foreign_flags`], which exposes them as `--log-level` etc.

use clap::{Arg, ArgAction, ArgMatches};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::flag::{self, FlagSet};

const LOG_LEVEL: &str = "log_level";
const LOG_JSON: &str = "log_json";
const LOG_ANSI: &str = "log_ansi";

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingOptions {
    /// Default level directive (trace, debug, info, warn, error, off).
    ///
    /// `RUST_LOG` still refines it per target.
    pub level: String,

    /// Emit JSON lines instead of human-readable output.
    pub json: bool,

    /// Use ANSI colors in human-readable output.
    pub ansi: bool,
}

impl Default for LoggingOptions {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
            ansi: true,
        }
    }
}

impl LoggingOptions {
    /// Declares the backend's flags using its native names.
    pub fn register_native_flags(&self, args: &mut Vec<Arg>) {
        args.push(
            Arg::new(LOG_LEVEL)
                .long(LOG_LEVEL)
                .help("Log level (trace, debug, info, warn, error, off)")
                .action(ArgAction::Set)
                .default_value(self.level.clone()),
        );
        for (id, default, help) in [
            (LOG_JSON, self.json, "Emit logs as JSON lines"),
            (LOG_ANSI, self.ansi, "Use ANSI colors in human-readable logs"),
        ] {
            args.push(
                Arg::new(id)
                    .long(id)
                    .help(help)
                    .action(ArgAction::Set)
                    .num_args(0..=1)
                    .require_equals(true)
                    .default_missing_value("true")
                    .default_value(default.to_string())
                    .value_parser(clap::value_parser!(bool)),
            );
        }
    }

    /// Registers the logging flags with hyphenated names.
    pub fn add_flags(&self, fs: &mut FlagSet) {
        fs.add_foreign_flags(|args| self.register_native_flags(args));
    }

    /// Copies parsed logging flags back into these options.
    pub fn apply(&mut self, matches: &ArgMatches) {
        flag::assign(matches, LOG_LEVEL, &mut self.level);
        flag::assign(matches, LOG_JSON, &mut self.json);
        flag::assign(matches, LOG_ANSI, &mut self.ansi);
    }

    /// Returns the parsed level filter.
    pub fn level_filter(&self) -> Result<LevelFilter, String> {
        self.level
            .parse::<LevelFilter>()
            .map_err(|e| format!("invalid log level {:?}: {}", self.level, e))
    }

    /// Checks that the level is usable.
    pub fn validate(&self) -> Vec<String> {
        self.level_filter().err().into_iter().collect()
    }
}

/// Installs the global tracing subscriber.
///
/// An unparsable level falls back to `info`; [`LoggingOptions::validate`]
/// reports it alongside the other option errors.
pub fn init(options: &LoggingOptions) -> anyhow::Result<()> {
    let level = options.level_filter().unwrap_or(LevelFilter::INFO);
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let registry = tracing_subscriber::registry().with(env_filter);
    if options.json {
        registry.with(fmt::layer().json()).try_init()?;
    } else {
        registry
            .with(fmt::layer().with_ansi(options.ansi))
            .try_init()?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flag::NamedFlagSets;

    #[test]
    fn test_native_flags_use_underscores() {
        let mut args = Vec::new();
        LoggingOptions::default().register_native_flags(&mut args);
        let longs: Vec<_> = args.iter().filter_map(|a| a.get_long()).collect();
        assert_eq!(longs, vec!["log_level", "log_json", "log_ansi"]);
    }

    #[test]
    fn test_flags_are_hyphenated_and_applied() {
        let mut options = LoggingOptions::default();
        let mut fss = NamedFlagSets::new();
        options.add_flags(fss.flag_set("logging"));
        assert!(fss.lookup("log-level").is_some());
        assert!(fss.lookup("log-json").is_some());
        assert!(fss.lookup("log-ansi").is_some());

        let matches = fss
            .command(clap::Command::new("test").no_binary_name(true))
            .try_get_matches_from(["--log-level", "debug", "--log-json", "--log-ansi=false"])
            .unwrap();
        options.apply(&matches);

        assert_eq!(options.level, "debug");
        assert!(options.json);
        assert!(!options.ansi);
    }

    #[test]
    fn test_validate_level() {
        assert!(LoggingOptions::default().validate().is_empty());

        let options = LoggingOptions {
            level: "loud".to_string(),
            ..Default::default()
        };
        assert_eq!(options.validate().len(), 1);
    }
}
