//! Server configuration
//!
//! Resolution order: built-in defaults, then the TOML file named by
//! `--config` (if any), then individual command-line flags.
//!
//! ```toml
//! bind = "0.0.0.0:3000"
//! data = "/var/lib/tasksync/db.json"
//! seed = 7
//! merge_policy = "reject-stale"
//! log_format = "json"
//! ```

use crate::error::ConfigError;
use crate::telemetry::LogFormat;
use clap::{value_parser, Arg, ArgMatches, Command};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tasksync_merge::PolicyKind;
use tasksync_model::FixtureGenerator;

/// Default request body limit (1 MiB)
pub const DEFAULT_BODY_LIMIT: u64 = 1024 * 1024;

/// Everything the server binary needs to start
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Listen address
    pub bind: SocketAddr,
    /// State file
    pub data: PathBuf,
    /// Fixture seed used when the state file does not exist yet
    pub seed: u64,
    /// Seeded project count
    pub projects: usize,
    /// Seeded tasks per project
    pub tasks_per_project: usize,
    /// Policy for `POST /sync`
    pub merge_policy: PolicyKind,
    /// Stderr log formatter
    pub log_format: LogFormat,
    /// Largest accepted request body, in bytes
    pub body_limit: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], 3000)),
            data: PathBuf::from("tasksync-db.json"),
            seed: 42,
            projects: 5,
            tasks_per_project: 4,
            merge_policy: PolicyKind::default(),
            log_format: LogFormat::default(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl ServerConfig {
    /// Parse a TOML file; missing keys keep their defaults
    ///
    /// # Errors
    /// [`ConfigError`] if the file is unreadable or malformed.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Resolve the configuration from parsed [`command`] arguments
    ///
    /// # Errors
    /// [`ConfigError`] if `--config` names an unusable file.
    pub fn from_matches(matches: &ArgMatches) -> Result<Self, ConfigError> {
        let mut config = match matches.get_one::<PathBuf>("config") {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };

        if let Some(bind) = matches.get_one::<SocketAddr>("bind") {
            config.bind = *bind;
        }
        if let Some(data) = matches.get_one::<PathBuf>("data") {
            config.data.clone_from(data);
        }
        if let Some(seed) = matches.get_one::<u64>("seed") {
            config.seed = *seed;
        }
        if let Some(projects) = matches.get_one::<usize>("projects") {
            config.projects = *projects;
        }
        if let Some(tasks) = matches.get_one::<usize>("tasks-per-project") {
            config.tasks_per_project = *tasks;
        }
        if let Some(policy) = matches.get_one::<PolicyKind>("merge-policy") {
            config.merge_policy = *policy;
        }
        if let Some(format) = matches.get_one::<LogFormat>("log-format") {
            config.log_format = *format;
        }
        if let Some(limit) = matches.get_one::<u64>("body-limit") {
            config.body_limit = *limit;
        }

        Ok(config)
    }

    /// Fixture generator for an empty state file
    #[must_use]
    pub fn fixtures(&self) -> FixtureGenerator {
        FixtureGenerator::new(self.seed)
            .projects(self.projects)
            .tasks_per_project(self.tasks_per_project)
    }
}

/// Command-line definition of the server binary
#[must_use]
pub fn command() -> Command {
    Command::new("tasksync-server")
        .version(crate::VERSION)
        .about("Authoritative task store with patch-based sync over HTTP")
        .arg(
            Arg::new("config")
                .long("config")
                .value_parser(value_parser!(PathBuf))
                .help("TOML config file; flags override its values"),
        )
        .arg(
            Arg::new("bind")
                .long("bind")
                .value_parser(value_parser!(SocketAddr))
                .help("Listen address [default: 127.0.0.1:3000]"),
        )
        .arg(
            Arg::new("data")
                .long("data")
                .value_parser(value_parser!(PathBuf))
                .help("State file [default: tasksync-db.json]"),
        )
        .arg(
            Arg::new("seed")
                .long("seed")
                .value_parser(value_parser!(u64))
                .help("Fixture seed for a fresh state file [default: 42]"),
        )
        .arg(
            Arg::new("projects")
                .long("projects")
                .value_parser(value_parser!(usize))
                .help("Seeded project count [default: 5]"),
        )
        .arg(
            Arg::new("tasks-per-project")
                .long("tasks-per-project")
                .value_parser(value_parser!(usize))
                .help("Seeded tasks per project [default: 4]"),
        )
        .arg(
            Arg::new("merge-policy")
                .long("merge-policy")
                .value_parser(PolicyKind::from_str)
                .help("last-write-wins or reject-stale [default: last-write-wins]"),
        )
        .arg(
            Arg::new("log-format")
                .long("log-format")
                .value_parser(LogFormat::from_str)
                .help("pretty or json [default: pretty]"),
        )
        .arg(
            Arg::new("body-limit")
                .long("body-limit")
                .value_parser(value_parser!(u64))
                .help("Largest accepted request body in bytes [default: 1048576]"),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn resolve(args: &[&str]) -> ServerConfig {
        let matches = command()
            .try_get_matches_from(std::iter::once("tasksync-server").chain(args.iter().copied()))
            .unwrap();
        ServerConfig::from_matches(&matches).unwrap()
    }

    #[test]
    fn no_flags_gives_defaults() {
        let config = resolve(&[]);
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.bind.port(), 3000);
    }

    #[test]
    fn flags_override_defaults() {
        let config = resolve(&[
            "--bind",
            "0.0.0.0:8080",
            "--merge-policy",
            "reject-stale",
            "--log-format",
            "json",
            "--seed",
            "9",
        ]);
        assert_eq!(config.bind.port(), 8080);
        assert_eq!(config.merge_policy, PolicyKind::RejectStale);
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.seed, 9);
        assert_eq!(config.projects, 5);
    }

    #[test]
    fn bad_policy_is_a_usage_error() {
        let result = command().try_get_matches_from(["tasksync-server", "--merge-policy", "newest"]);
        assert!(result.is_err());
    }

    #[test]
    fn file_then_flags() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(
            &path,
            "seed = 7\nprojects = 2\nmerge_policy = \"reject-stale\"\n",
        )
        .unwrap();

        let config = resolve(&["--config", path.to_str().unwrap(), "--projects", "3"]);
        assert_eq!(config.seed, 7);
        assert_eq!(config.projects, 3);
        assert_eq!(config.merge_policy, PolicyKind::RejectStale);
        assert_eq!(config.tasks_per_project, 4);
    }

    #[test]
    fn unknown_file_key_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("server.toml");
        std::fs::write(&path, "port = 3000\n").unwrap();

        assert!(matches!(
            ServerConfig::from_file(&path),
            Err(ConfigError::Parse { .. })
        ));
    }
}
