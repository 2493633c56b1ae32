//! Generator configuration (`routebind.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::emitter::EmitOptions;
use crate::error::GenerateError;
use crate::status::StatusPredicate;
use crate::targets::Target;

/// Default configuration file name.
pub const CONFIG_FILE: &str = "routebind.toml";

/// Contents of `routebind.toml`. Every key is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratorConfig {
    /// Route descriptor document (JSON).
    pub input: Option<PathBuf>,
    /// Directory receiving one sub-directory per target.
    pub out_dir: Option<PathBuf>,
    #[serde(default)]
    pub targets: Vec<Target>,
    pub runtime_module: Option<String>,
    pub types_module: Option<String>,
    /// Success patterns such as `"2XX"` or `"304"`.
    pub success_statuses: Option<Vec<String>>,
}

impl GeneratorConfig {
    /// Parse configuration text.
    pub fn from_toml(text: &str) -> Result<Self, GenerateError> {
        toml::from_str(text).map_err(|e| GenerateError::InvalidConfig(e.to_string()))
    }

    /// Read a configuration file. Relative `input` and `out_dir` are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> Result<Self, GenerateError> {
        let text = fs::read_to_string(path)
            .map_err(|e| GenerateError::InvalidConfig(format!("{}: {e}", path.display())))?;
        let mut config: Self = toml::from_str(&text)
            .map_err(|e| GenerateError::InvalidConfig(format!("{}: {e}", path.display())))?;

        if let Some(base) = path.parent() {
            config.input = config.input.map(|p| resolve(base, p));
            config.out_dir = config.out_dir.map(|p| resolve(base, p));
        }
        Ok(config)
    }

    /// Requested targets; `tanstack-react` when none are configured.
    pub fn targets(&self) -> Vec<Target> {
        if self.targets.is_empty() {
            vec![Target::TanstackReact]
        } else {
            self.targets.clone()
        }
    }

    /// Emission options with defaults filled in.
    pub fn emit_options(&self) -> Result<EmitOptions, GenerateError> {
        let defaults = EmitOptions::default();
        let success = match &self.success_statuses {
            Some(patterns) => StatusPredicate::parse(patterns.as_slice())?,
            None => defaults.success,
        };
        Ok(EmitOptions {
            runtime_module: self
                .runtime_module
                .clone()
                .unwrap_or(defaults.runtime_module),
            types_module: self.types_module.clone().unwrap_or(defaults.types_module),
            success,
        })
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_absolute() {
        path
    } else {
        base.join(path)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_full_config() {
        let config = GeneratorConfig::from_toml(
            r#"
input = "routes.json"
out_dir = "src/lib/api"
targets = ["swr", "vue-query"]
runtime_module = "@/lib/rpc"
types_module = "@/lib/schema"
success_statuses = ["2XX", "304"]
"#,
        )
        .unwrap();

        assert_eq!(config.input, Some(PathBuf::from("routes.json")));
        assert_eq!(config.targets(), [Target::Swr, Target::VueQuery]);

        let options = config.emit_options().unwrap();
        assert_eq!(options.runtime_module, "@/lib/rpc");
        assert_eq!(options.types_module, "@/lib/schema");
        assert!(options.success.matches(304));
        assert!(!options.success.matches(301));
    }

    #[test]
    fn test_defaults() {
        let config = GeneratorConfig::from_toml("").unwrap();
        assert_eq!(config, GeneratorConfig::default());
        assert_eq!(config.targets(), [Target::TanstackReact]);

        let options = config.emit_options().unwrap();
        assert_eq!(options.runtime_module, "../client");
        assert_eq!(options.types_module, "../types");
        assert_eq!(options.success, StatusPredicate::default());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let err = GeneratorConfig::from_toml("outdir = \"x\"").unwrap_err();
        assert!(matches!(err, GenerateError::InvalidConfig(_)));
    }

    #[test]
    fn test_unknown_target_rejected() {
        assert!(GeneratorConfig::from_toml("targets = [\"solid\"]").is_err());
    }

    #[test]
    fn test_bad_status_pattern() {
        let config = GeneratorConfig::from_toml("success_statuses = [\"2YY\"]").unwrap();
        assert_eq!(
            config.emit_options().unwrap_err(),
            GenerateError::InvalidStatusPattern("2YY".into())
        );
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE);
        fs::write(&path, "input = \"routes.json\"\nout_dir = \"/abs/out\"\n").unwrap();

        let config = GeneratorConfig::load(&path).unwrap();
        assert_eq!(config.input, Some(dir.path().join("routes.json")));
        assert_eq!(config.out_dir, Some(PathBuf::from("/abs/out")));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = GeneratorConfig::load(&dir.path().join(CONFIG_FILE)).unwrap_err();
        assert!(err.to_string().contains(CONFIG_FILE));
    }
}
