use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{TimezError, TimezResult};

/// Defaults read from a YAML file. Every field is optional; command-line
/// flags and environment variables take precedence.
///
/// ```yaml
/// duration_ms: 5000
/// output: reports/last.txt
/// verbose: true
/// io_counters: false
/// shell: false
/// ```
#[derive(Debug, Default, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimezConfig {
    pub duration_ms: Option<i64>,
    pub output: Option<PathBuf>,
    pub verbose: bool,
    pub io_counters: bool,
    pub shell: bool,
}

/// Load a config file.
///
/// A relative `output` is resolved against the config file's parent directory.
pub fn load(path: &Path) -> TimezResult<TimezConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| TimezError::Config(format!("read {}: {e}", path.display())))?;
    let mut config = parse(&content)
        .map_err(|e| TimezError::Config(format!("parse {}: {e}", path.display())))?;
    if let Some(config_dir) = path.parent() {
        config.resolve_relative_paths(config_dir);
    }
    Ok(config)
}

fn parse(content: &str) -> Result<TimezConfig, serde_yaml_ng::Error> {
    // An empty file deserializes as YAML null, not as an empty mapping.
    if content.trim().is_empty() {
        return Ok(TimezConfig::default());
    }
    serde_yaml_ng::from_str(content)
}

impl TimezConfig {
    fn resolve_relative_paths(&mut self, config_dir: &Path) {
        if let Some(p) = self.output.as_mut().filter(|p| p.is_relative()) {
            *p = config_dir.join(&*p);
        }
    }
}
