//! Generation settings for narrative service calls
//!
//! Settings are loaded with a two-layer resolution:
//! 1. Explicit path (`BUDGETWISE_CONFIG` or `--config`), or the override in the
//!    data dir (~/.local/share/budgetwise/config/generation.toml)
//! 2. Fall back to embedded defaults (compiled into binary)
//!
//! Keys missing from an override keep their embedded default.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::error::{Error, Result};

/// Embedded default config (compiled into binary)
const DEFAULT_CONFIG: &str = include_str!("../../../config/generation.toml");

/// Kinds of narrative service calls
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Task {
    /// Four-section budget narrative
    BudgetAnalysis,
    /// Short budgeting Q&A
    Chat,
    /// Glossary term explanation
    Explain,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::BudgetAnalysis => "budget_analysis",
            Self::Chat => "chat",
            Self::Explain => "explain",
        }
    }

    pub fn all() -> &'static [Task] {
        &[Self::BudgetAnalysis, Self::Chat, Self::Explain]
    }

    fn from_key(key: &str) -> Option<Self> {
        Self::all().iter().copied().find(|t| t.as_str() == key)
    }
}

/// Settings for one kind of call
#[derive(Debug, Clone, PartialEq)]
pub struct TaskSettings {
    pub max_output_tokens: u32,
    pub temperature: f32,
    /// Request a JSON reply where the backend supports it
    pub structured_output: bool,
}

impl Default for TaskSettings {
    fn default() -> Self {
        Self {
            max_output_tokens: 400,
            temperature: 0.6,
            structured_output: false,
        }
    }
}

/// All generation settings
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub request_timeout: Duration,
    tasks: HashMap<Task, TaskSettings>,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        parse_config(DEFAULT_CONFIG).unwrap_or_else(|_| Self {
            request_timeout: Duration::from_secs(60),
            tasks: HashMap::new(),
        })
    }
}

impl GenerationConfig {
    /// Load from the default override location, or embedded defaults
    pub fn load() -> Result<Self> {
        load_config(None)
    }

    /// Load from an explicit path (embedded defaults if the file does not exist)
    pub fn load_from(path: &Path) -> Result<Self> {
        load_config(Some(path))
    }

    /// Load from `BUDGETWISE_CONFIG` if set, otherwise the default location
    pub fn from_env() -> Result<Self> {
        match std::env::var("BUDGETWISE_CONFIG") {
            Ok(path) if !path.trim().is_empty() => Self::load_from(Path::new(path.trim())),
            _ => Self::load(),
        }
    }

    /// Settings for a task (built-in defaults when not configured)
    pub fn task(&self, task: Task) -> TaskSettings {
        self.tasks.get(&task).cloned().unwrap_or_default()
    }
}

/// Default config override path
pub fn default_config_path() -> Option<PathBuf> {
    dirs::data_local_dir().map(|d| d.join("budgetwise").join("config").join("generation.toml"))
}

/// Load configuration (override first, then default)
fn load_config(override_path: Option<&Path>) -> Result<GenerationConfig> {
    let path = override_path
        .map(Path::to_path_buf)
        .or_else(default_config_path);

    let mut config = parse_config(DEFAULT_CONFIG)?;
    if let Some(path) = path.filter(|p| p.exists()) {
        tracing::debug!(path = %path.display(), "Loading generation config override");
        let content = fs::read_to_string(&path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        apply_overrides(&mut config, &content)?;
    }
    Ok(config)
}

/// Raw config structure for TOML parsing
#[derive(Debug, Deserialize)]
struct RawConfig {
    defaults: Option<RawDefaults>,
    tasks: Option<HashMap<String, RawTaskSettings>>,
}

#[derive(Debug, Deserialize)]
struct RawDefaults {
    request_timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawTaskSettings {
    max_output_tokens: Option<u32>,
    temperature: Option<f32>,
    structured_output: Option<bool>,
}

/// Parse config from TOML content
fn parse_config(content: &str) -> Result<GenerationConfig> {
    let mut config = GenerationConfig {
        request_timeout: Duration::from_secs(60),
        tasks: HashMap::new(),
    };
    apply_overrides(&mut config, content)?;
    Ok(config)
}

fn apply_overrides(config: &mut GenerationConfig, content: &str) -> Result<()> {
    let raw: RawConfig = toml::from_str(content)
        .map_err(|e| Error::Config(format!("Invalid config TOML: {}", e)))?;

    if let Some(timeout) = raw.defaults.and_then(|d| d.request_timeout_secs) {
        config.request_timeout = Duration::from_secs(timeout);
    }

    for (key, raw_task) in raw.tasks.unwrap_or_default() {
        let Some(task) = Task::from_key(&key) else {
            tracing::warn!(task = %key, "Ignoring unknown task in generation config");
            continue;
        };
        let settings = config.tasks.entry(task).or_default();
        if let Some(tokens) = raw_task.max_output_tokens {
            settings.max_output_tokens = tokens;
        }
        if let Some(temperature) = raw_task.temperature {
            if !(0.0..=2.0).contains(&temperature) {
                return Err(Error::Config(format!(
                    "temperature for {} must be between 0 and 2",
                    key
                )));
            }
            settings.temperature = temperature;
        }
        if let Some(structured) = raw_task.structured_output {
            settings.structured_output = structured;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_default_config() {
        let config = parse_config(DEFAULT_CONFIG).unwrap();
        let analysis = config.task(Task::BudgetAnalysis);
        assert_eq!(analysis.max_output_tokens, 1500);
        assert!(analysis.structured_output);
        assert_eq!(config.task(Task::Chat).max_output_tokens, 400);
        assert!((config.task(Task::Explain).temperature - 0.5).abs() < 0.001);
        assert_eq!(config.request_timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_task_as_str_roundtrips_keys() {
        for task in Task::all() {
            assert_eq!(Task::from_key(task.as_str()), Some(*task));
        }
        assert_eq!(Task::from_key("vision"), None);
    }

    #[test]
    fn test_override_file_merges_with_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "[defaults]\nrequest_timeout_secs = 5\n\n[tasks.chat]\nmax_output_tokens = 120"
        )
        .unwrap();

        let config = GenerationConfig::load_from(file.path()).unwrap();
        assert_eq!(config.request_timeout, Duration::from_secs(5));
        assert_eq!(config.task(Task::Chat).max_output_tokens, 120);
        // Untouched keys keep embedded values
        assert!((config.task(Task::Chat).temperature - 0.6).abs() < 0.001);
        assert_eq!(config.task(Task::BudgetAnalysis).max_output_tokens, 1500);
    }

    #[test]
    fn test_missing_override_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = GenerationConfig::load_from(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config.task(Task::BudgetAnalysis).max_output_tokens, 1500);
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[tasks.chat\nmax_output_tokens = ").unwrap();
        let err = GenerationConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_out_of_range_temperature_rejected() {
        let result = parse_config("[tasks.explain]\ntemperature = 7.5");
        assert!(result.is_err());
    }
}
