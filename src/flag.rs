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

//! Named flag sets.
//!
//! Flags are grouped under a category name so that `--help` prints one
//! section per group. A [`FlagSet`] only collects [`clap::Arg`] definitions;
//! parsing happens once the sets are folded into a [`clap::Command`].

use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

use clap::{Arg, ArgAction, ArgMatches, Command};

/// An ordered collection of flag sets keyed by category name.
#[derive(Debug, Default)]
pub struct NamedFlagSets {
    /// Category names in first-use order.
    order: Vec<String>,

    sets: HashMap<String, FlagSet>,
}

impl NamedFlagSets {
    /// Creates an empty collection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the flag set with the given name, creating it on first use.
    pub fn flag_set(&mut self, name: &str) -> &mut FlagSet {
        if !self.sets.contains_key(name) {
            self.order.push(name.to_string());
        }
        self.sets
            .entry(name.to_string())
            .or_insert_with(|| FlagSet::new(name))
    }

    /// Returns the flag set with the given name, if any.
    pub fn get(&self, name: &str) -> Option<&FlagSet> {
        self.sets.get(name)
    }

    /// Category names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Iterates over the flag sets in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &FlagSet> {
        self.order.iter().filter_map(|name| self.sets.get(name))
    }

    /// Finds a flag by its long name in any set.
    pub fn lookup(&self, long: &str) -> Option<&Arg> {
        self.iter().find_map(|fs| fs.lookup(long))
    }

    /// Adds every flag to `cmd`, using the set name as the help heading.
    pub fn command(mut self, mut cmd: Command) -> Command {
        for name in &self.order {
            let Some(fs) = self.sets.remove(name) else {
                continue;
            };
            for arg in fs.args {
                cmd = cmd.arg(arg.help_heading(name.clone()));
            }
        }
        cmd
    }
}

/// A single named group of flags.
#[derive(Debug)]
pub struct FlagSet {
    name: String,
    args: Vec<Arg>,
}

impl FlagSet {
    /// Creates an empty flag set.
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            args: Vec::new(),
        }
    }

    /// Name of this set.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The flags registered so far.
    pub fn args(&self) -> &[Arg] {
        &self.args
    }

    /// Finds a flag by its long name.
    pub fn lookup(&self, long: &str) -> Option<&Arg> {
        self.args.iter().find(|a| a.get_long() == Some(long))
    }

    /// Adds a prebuilt argument as-is.
    pub fn add(&mut self, arg: Arg) {
        self.args.push(arg);
    }

    /// Registers a boolean flag.
    ///
    /// `--name` alone means true, `--name=false` turns it off.
    pub fn bool_var(&mut self, name: &str, default: bool, help: impl Into<String>) {
        self.add(
            Arg::new(name.to_string())
                .long(name.to_string())
                .help(help.into())
                .action(ArgAction::Set)
                .num_args(0..=1)
                .require_equals(true)
                .default_missing_value("true")
                .default_value(default.to_string())
                .value_parser(clap::value_parser!(bool)),
        );
    }

    /// Registers a string flag.
    pub fn string_var(&mut self, name: &str, default: &str, help: impl Into<String>) {
        self.add(
            Arg::new(name.to_string())
                .long(name.to_string())
                .help(help.into())
                .action(ArgAction::Set)
                .default_value(default.to_string())
                .value_parser(clap::value_parser!(String)),
        );
    }

    /// Registers a duration flag such as `30s` or `1m30s`.
    pub fn duration_var(&mut self, name: &str, default: Duration, help: impl Into<String>) {
        self.add(
            Arg::new(name.to_string())
                .long(name.to_string())
                .help(help.into())
                .action(ArgAction::Set)
                .value_name("DURATION")
                .default_value(humantime::format_duration(default).to_string())
                .value_parser(humantime::parse_duration),
        );
    }

    /// Registers a numeric flag.
    pub fn num_var<T>(&mut self, name: &str, default: T, help: impl Into<String>)
    where
        T: FromStr + Display + Clone + Send + Sync + 'static,
        T::Err: std::error::Error + Send + Sync + 'static,
    {
        self.add(
            Arg::new(name.to_string())
                .long(name.to_string())
                .help(help.into())
                .action(ArgAction::Set)
                .default_value(default.to_string())
                .value_parser(|s: &str| s.parse::<T>()),
        );
    }

    /// Adapts flags declared by a foreign registration routine.
    ///
    /// Libraries such as a logging backend name their flags with
    /// underscores (`log_level`). Every long name is rewritten to the
    /// hyphenated form (`--log-level`) while the argument id is kept, so
    /// values are still looked up under the original name.
    pub fn add_foreign_flags<F>(&mut self, register: F)
    where
        F: FnOnce(&mut Vec<Arg>),
    {
        let mut foreign = Vec::new();
        register(&mut foreign);

        for mut arg in foreign {
            let long = arg.get_long().map(normalize_flag_name);
            if let Some(long) = long {
                arg = arg.long(long);
            }
            self.args.push(arg);
        }
    }
}

/// Rewrites underscores in a flag name to hyphens.
pub fn normalize_flag_name(name: &str) -> String {
    name.replace('_', "-")
}

/// Copies a parsed value into `field` when the flag is known and has a value.
///
/// Ids that were never registered are left alone instead of panicking, so a
/// group can be applied against matches built from a partial command.
pub fn assign<T>(matches: &ArgMatches, id: &str, field: &mut T)
where
    T: Clone + Send + Sync + 'static,
{
    if let Ok(Some(value)) = matches.try_get_one::<T>(id) {
        *field = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command_for(fss: NamedFlagSets) -> Command {
        fss.command(Command::new("test").no_binary_name(true))
    }

    #[test]
    fn test_flag_set_keeps_first_use_order() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("kubernetes");
        fss.flag_set("generic");
        fss.flag_set("kubernetes");

        let names: Vec<_> = fss.names().collect();
        assert_eq!(names, vec!["kubernetes", "generic"]);
    }

    #[test]
    fn test_bool_var_pflag_syntax() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("generic").bool_var("enabled", false, "toggle");
        let cmd = command_for(fss);

        let m = cmd.clone().try_get_matches_from(Vec::<&str>::new()).unwrap();
        assert_eq!(m.get_one::<bool>("enabled"), Some(&false));

        let m = cmd.clone().try_get_matches_from(["--enabled"]).unwrap();
        assert_eq!(m.get_one::<bool>("enabled"), Some(&true));

        let m = cmd.try_get_matches_from(["--enabled=false"]).unwrap();
        assert_eq!(m.get_one::<bool>("enabled"), Some(&false));
    }

    #[test]
    fn test_duration_var() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("generic")
            .duration_var("period", Duration::from_secs(30), "period");
        let cmd = command_for(fss);

        let m = cmd.clone().try_get_matches_from(Vec::<&str>::new()).unwrap();
        assert_eq!(
            m.get_one::<Duration>("period"),
            Some(&Duration::from_secs(30))
        );

        let m = cmd.clone().try_get_matches_from(["--period", "1m30s"]).unwrap();
        assert_eq!(
            m.get_one::<Duration>("period"),
            Some(&Duration::from_secs(90))
        );

        assert!(cmd.try_get_matches_from(["--period", "soon"]).is_err());
    }

    #[test]
    fn test_num_var_rejects_garbage() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("generic").num_var("burst", 10i32, "burst");
        let cmd = command_for(fss);

        let m = cmd.clone().try_get_matches_from(["--burst=42"]).unwrap();
        assert_eq!(m.get_one::<i32>("burst"), Some(&42));
        assert!(cmd.try_get_matches_from(["--burst=many"]).is_err());
    }

    #[test]
    fn test_foreign_flags_are_hyphenated() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("logging").add_foreign_flags(|args| {
            args.push(
                Arg::new("log_dir")
                    .long("log_dir")
                    .action(ArgAction::Set)
                    .default_value("/tmp"),
            );
        });

        assert!(fss.lookup("log-dir").is_some());
        assert!(fss.lookup("log_dir").is_none());

        let m = command_for(fss)
            .try_get_matches_from(["--log-dir", "/var/log"])
            .unwrap();
        assert_eq!(
            m.get_one::<String>("log_dir").map(String::as_str),
            Some("/var/log")
        );
    }

    #[test]
    fn test_assign_ignores_unknown_ids() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("generic").string_var("name", "x", "name");
        let m = command_for(fss)
            .try_get_matches_from(Vec::<&str>::new())
            .unwrap();

        let mut name = String::new();
        let mut other = String::from("untouched");
        assign(&m, "name", &mut name);
        assign(&m, "missing", &mut other);
        assert_eq!(name, "x");
        assert_eq!(other, "untouched");
    }

    #[test]
    fn test_help_sections_use_set_names() {
        let mut fss = NamedFlagSets::new();
        fss.flag_set("leaderelection").bool_var("leader-elect", false, "elect");
        let help = command_for(fss).render_long_help().to_string();
        assert!(help.contains("leaderelection"));
        assert!(help.contains("--leader-elect"));
    }
}
