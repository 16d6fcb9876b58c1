//! Run configuration, persisted as TOML.
//!
//! ```toml
//! goals = ["boiledegg", "hamegg"]
//! objects = ["pan", "bowl"]
//! init = [["pan", "on", "stove"], ["shell_egg", "in", "bowl"]]
//!
//! [groups]
//! egg = ["shell_egg", "boiled_egg", "hard-boiled_egg"]
//!
//! [template]
//! problem = "pbkitchen"
//! domain = "kscgr"
//!
//! [recognizer]
//! command = ["java", "-jar", "gc_stop.jar"]
//! observations = "demo/obs.dat"
//! read_timeout_secs = 600
//! ```
//!
//! Every key is optional.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::normalize::Groups;
use crate::relation::Relation;

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Configuration file used when none is named.
pub const DEFAULT_CONFIG_FILE: &str = "goalrec.toml";

/// Everything a run needs besides its input files. Loaded once per run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalRecConfig {
    /// Goal labels whose scores are tracked.
    pub goals: Vec<String>,
    /// Objects declared in the problem template, ahead of discovered ones.
    pub objects: Vec<String>,
    /// Initial relations of the problem template, as positional tuples.
    pub init: Vec<Relation>,
    /// Canonical label -> variant names.
    pub groups: Groups,
    pub template: TemplateConfig,
    pub recognizer: RecognizerConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub problem: String,
    pub domain: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            problem: "pbkitchen".into(),
            domain: "kscgr".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecognizerConfig {
    /// Program and arguments of the recognizer.
    pub command: Vec<String>,
    /// Observation file the recognizer reads from.
    pub observations: PathBuf,
    /// Seconds to wait for a complete response; 0 waits forever.
    pub read_timeout_secs: u64,
}

impl Default for RecognizerConfig {
    fn default() -> Self {
        Self {
            command: vec!["java".into(), "-jar".into(), "gc_stop.jar".into()],
            observations: PathBuf::from("demo/obs.dat"),
            read_timeout_secs: 600,
        }
    }
}

impl RecognizerConfig {
    pub fn read_timeout(&self) -> Option<Duration> {
        (self.read_timeout_secs > 0).then(|| Duration::from_secs(self.read_timeout_secs))
    }

    /// The recognizer command, rejected when empty.
    pub fn command(&self) -> ConfigResult<&[String]> {
        if self.command.is_empty() {
            return Err(ConfigError::EmptyCommand);
        }
        Ok(&self.command)
    }
}

impl GoalRecConfig {
    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config = Self::parse(&content).map_err(|message| ConfigError::Parse {
            path: path.display().to_string(),
            message,
        })?;
        tracing::debug!(
            path = %path.display(),
            goals = config.goals.len(),
            init = config.init.len(),
            "loaded config"
        );
        Ok(config)
    }

    /// Load an explicitly named file, or fall back to `default_path`.
    ///
    /// A named file must exist. Only the unnamed default may be absent, in
    /// which case every key takes its default value.
    pub fn load_or_default(explicit: Option<&Path>, default_path: &Path) -> ConfigResult<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None if default_path.exists() => Self::load(default_path),
            None => {
                tracing::warn!(path = %default_path.display(), "config not found, using defaults");
                Ok(Self::default())
            }
        }
    }

    /// Parse TOML text.
    pub fn parse(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Save to a TOML file.
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
    }
}
