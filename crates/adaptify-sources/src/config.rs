//! adaptify configuration loading.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use adaptify_core::{AssessmentConfig, DifficultyTier};

/// Top-level adaptify configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdaptifyConfig {
    /// Controller and analyzer thresholds.
    #[serde(default)]
    pub assessment: AssessmentConfig,
    /// Question bank file or directory.
    #[serde(default)]
    pub bank: Option<PathBuf>,
    /// Plain-text study material passed to question sources.
    #[serde(default)]
    pub content: Option<PathBuf>,
    /// Characters of `content` forwarded with each question request.
    #[serde(default = "default_max_content_chars")]
    pub max_content_chars: usize,
}

fn default_max_content_chars() -> usize {
    4000
}

impl Default for AdaptifyConfig {
    fn default() -> Self {
        Self {
            assessment: AssessmentConfig::default(),
            bank: None,
            content: None,
            max_content_chars: default_max_content_chars(),
        }
    }
}

impl AdaptifyConfig {
    /// Read the study material, if configured.
    pub fn read_content(&self) -> Result<Option<String>> {
        self.content
            .as_deref()
            .map(|path| {
                std::fs::read_to_string(path)
                    .with_context(|| format!("failed to read content: {}", path.display()))
            })
            .transpose()
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
///
/// Substituted values are not scanned again. An unset variable is an error.
fn resolve_env_vars(s: &str) -> Result<String> {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(len) = rest[start..].find('}') else {
            break;
        };
        let var_name = &rest[start + 2..start + len];
        let value = std::env::var(var_name)
            .with_context(|| format!("environment variable {var_name} is not set"))?;
        result.push_str(&rest[..start]);
        result.push_str(&value);
        rest = &rest[start + len + 1..];
    }
    result.push_str(rest);
    Ok(result)
}

fn resolve_path(path: &Path) -> Result<PathBuf> {
    let raw = path.to_string_lossy();
    let resolved =
        resolve_env_vars(&raw).with_context(|| format!("failed to resolve path: {raw}"))?;
    Ok(PathBuf::from(resolved))
}

/// Load configuration from well-known paths.
///
/// Search order:
/// 1. `adaptify.toml` in the current directory
/// 2. `~/.config/adaptify/config.toml`
///
/// Environment variable overrides: `ADAPTIFY_BANK`, `ADAPTIFY_STARTING_TIER`.
pub fn load_config() -> Result<AdaptifyConfig> {
    load_config_from(None)
}

/// Load config from an explicit path, or search the default locations.
pub fn load_config_from(path: Option<&Path>) -> Result<AdaptifyConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("adaptify.toml");
        if local.exists() {
            Some(local)
        } else if let Some(home) = dirs_path() {
            let global = home.join("config.toml");
            if global.exists() {
                Some(global)
            } else {
                None
            }
        } else {
            None
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            tracing::debug!("loaded config from {}", path.display());
            parse_config_str(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?
        }
        None => AdaptifyConfig::default(),
    };

    // Apply env var overrides
    if let Ok(bank) = std::env::var("ADAPTIFY_BANK") {
        config.bank = Some(PathBuf::from(bank));
    }
    if let Ok(tier) = std::env::var("ADAPTIFY_STARTING_TIER") {
        config.assessment.starting_tier = tier
            .parse::<DifficultyTier>()
            .map_err(|e| anyhow::anyhow!("ADAPTIFY_STARTING_TIER: {e}"))?;
    }

    config.bank = config.bank.as_deref().map(resolve_path).transpose()?;
    config.content = config.content.as_deref().map(resolve_path).transpose()?;

    config
        .assessment
        .validate()
        .context("invalid [assessment] section")?;

    Ok(config)
}

/// Parse a config document without touching the environment.
pub fn parse_config_str(content: &str) -> Result<AdaptifyConfig> {
    Ok(toml::from_str::<AdaptifyConfig>(content)?)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("adaptify"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_env_vars_basic() {
        std::env::set_var("_ADAPTIFY_TEST_VAR", "hello");
        assert_eq!(resolve_env_vars("${_ADAPTIFY_TEST_VAR}").unwrap(), "hello");
        assert_eq!(
            resolve_env_vars("prefix_${_ADAPTIFY_TEST_VAR}_suffix").unwrap(),
            "prefix_hello_suffix"
        );
        assert_eq!(resolve_env_vars("no_vars").unwrap(), "no_vars");
        assert_eq!(resolve_env_vars("open_${brace").unwrap(), "open_${brace");
        std::env::remove_var("_ADAPTIFY_TEST_VAR");
    }

    #[test]
    fn resolve_env_vars_does_not_rescan_values() {
        std::env::set_var("_ADAPTIFY_SELF_REF", "${_ADAPTIFY_SELF_REF}");
        assert_eq!(
            resolve_env_vars("banks/${_ADAPTIFY_SELF_REF}").unwrap(),
            "banks/${_ADAPTIFY_SELF_REF}"
        );
        std::env::remove_var("_ADAPTIFY_SELF_REF");
    }

    #[test]
    fn unset_variable_in_path_fails_load() {
        std::env::remove_var("_ADAPTIFY_UNSET_VAR");
        let err = resolve_env_vars("${_ADAPTIFY_UNSET_VAR}/bank.toml").unwrap_err();
        assert!(err.to_string().contains("_ADAPTIFY_UNSET_VAR is not set"));

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptify.toml");
        std::fs::write(&path, "bank = \"${_ADAPTIFY_UNSET_VAR}/banks\"\n").unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("is not set"));
    }

    #[test]
    fn default_config() {
        let config = AdaptifyConfig::default();
        assert_eq!(config.max_content_chars, 4000);
        assert!(config.bank.is_none());
        assert_eq!(
            config.assessment.starting_tier,
            DifficultyTier::Intermediate
        );
    }

    #[test]
    fn parse_full_config() {
        let toml_str = r#"
bank = "question-banks"
content = "notes.txt"
max_content_chars = 2000

[assessment]
starting_tier = "beginner"
minimum_questions = 4
"#;
        let config = parse_config_str(toml_str).unwrap();
        assert_eq!(config.bank, Some(PathBuf::from("question-banks")));
        assert_eq!(config.max_content_chars, 2000);
        assert_eq!(config.assessment.starting_tier, DifficultyTier::Beginner);
        assert_eq!(config.assessment.minimum_questions, 4);
        assert_eq!(config.assessment.metrics_window, 5);
    }

    #[test]
    fn explicit_missing_path_fails() {
        let err = load_config_from(Some(Path::new("/nonexistent/adaptify.toml"))).unwrap_err();
        assert!(err.to_string().contains("config file not found"));
    }

    #[test]
    fn invalid_thresholds_rejected_on_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("adaptify.toml");
        std::fs::write(
            &path,
            "[assessment]\nupgrade_threshold = 0.3\ndowngrade_threshold = 0.6\n",
        )
        .unwrap();
        let err = load_config_from(Some(&path)).unwrap_err();
        assert!(format!("{err:#}").contains("must be below"));
    }

    #[test]
    fn read_content_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.txt");
        std::fs::write(&path, "Photosynthesis turns light into sugar.").unwrap();
        let config = AdaptifyConfig {
            content: Some(path),
            ..Default::default()
        };
        assert_eq!(
            config.read_content().unwrap().as_deref(),
            Some("Photosynthesis turns light into sugar.")
        );
        assert!(AdaptifyConfig::default().read_content().unwrap().is_none());
    }
}
