use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::recurrence::{Strategy, DEFAULT_STEPS, MAX_STEP};
use crate::{FibunacciError, Result};

/// Base name of the built shared library.
pub const LIBRARY_NAME: &str = "fibunacci";

/// Parity harness settings, usually read from a `fibunacci.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarnessConfig {
    pub library_path: String,
    #[serde(default)]
    pub strategy: Strategy,
    #[serde(default = "default_steps")]
    pub steps: Vec<i64>,
    #[serde(default)]
    pub verbose: bool,
}

fn default_steps() -> Vec<i64> {
    DEFAULT_STEPS.to_vec()
}

impl HarnessConfig {
    pub fn new(library_path: impl Into<String>) -> Self {
        Self {
            library_path: library_path.into(),
            strategy: Strategy::default(),
            steps: default_steps(),
            verbose: false,
        }
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let config: HarnessConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.library_path.trim().is_empty() {
            return Err(FibunacciError::InvalidConfig(
                "library_path must not be empty".to_string(),
            ));
        }

        if self.steps.is_empty() {
            return Err(FibunacciError::InvalidConfig(
                "at least one step is required".to_string(),
            ));
        }

        if let Some(step) = self.steps.iter().find(|&&n| !(0..=MAX_STEP).contains(&n)) {
            return Err(FibunacciError::InvalidConfig(format!(
                "step {step} is outside 0..={MAX_STEP}"
            )));
        }

        Ok(())
    }
}

/// Platform file name of the library inside `dir`, e.g. `dir/libfibunacci.so`.
pub fn default_library_path(dir: impl AsRef<Path>) -> PathBuf {
    let file_name = format!(
        "{}{}{}",
        std::env::consts::DLL_PREFIX,
        LIBRARY_NAME,
        std::env::consts::DLL_SUFFIX
    );
    dir.as_ref().join(file_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = HarnessConfig::parse(r#"library_path = "target/release/libfibunacci.so""#)
            .unwrap();

        assert_eq!(config.library_path, "target/release/libfibunacci.so");
        assert_eq!(config.strategy, Strategy::Recursive);
        assert_eq!(config.steps, vec![0, 1, 2, 3, 4, 5, 10]);
        assert!(!config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_full_config() {
        let config = HarnessConfig::parse(
            r#"
library_path = "build/fibunacci.dll"
strategy = "iterative"
steps = [0, 50, 91]
verbose = true
"#,
        )
        .unwrap();

        assert_eq!(config.strategy, Strategy::Iterative);
        assert_eq!(config.steps, vec![0, 50, 91]);
        assert!(config.verbose);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            HarnessConfig::parse("strategy = \"iterative\""),
            Err(FibunacciError::TomlParse(_))
        ));
        assert!(matches!(
            HarnessConfig::parse("library_path = \"x\"\nstrategy = \"memoized\""),
            Err(FibunacciError::TomlParse(_))
        ));
    }

    #[test]
    fn test_validation() {
        let mut config = HarnessConfig::new("  ");
        assert!(matches!(
            config.validate(),
            Err(FibunacciError::InvalidConfig(_))
        ));

        config.library_path = "libfibunacci.so".to_string();
        config.steps.clear();
        assert!(config.validate().is_err());

        config.steps = vec![1, -1];
        assert!(config.validate().is_err());

        config.steps = vec![MAX_STEP + 1];
        assert!(config.validate().is_err());

        config.steps = vec![MAX_STEP];
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_default_library_path() {
        let path = default_library_path("target/debug");
        let file_name = path.file_name().unwrap().to_string_lossy().to_string();

        assert!(path.starts_with("target/debug"));
        assert!(file_name.contains(LIBRARY_NAME));
        assert!(file_name.ends_with(std::env::consts::DLL_SUFFIX));
    }
}
