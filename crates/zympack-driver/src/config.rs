//! Bundler configuration (`zympack.config.json`)

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const CONFIG_FILE_NAME: &str = "zympack.config.json";

/// Top-level configuration.
///
/// Every field is optional in the file; missing ones take the defaults below.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct BundlerConfig {
    /// Project root. Relative values are taken from the config file's
    /// directory; without a file, from the current directory.
    pub context: Option<PathBuf>,
    /// Entry module, relative to the project root
    pub entry: String,
    pub output: OutputConfig,
    pub module: ModuleConfig,
    pub plugins: Vec<PluginConfig>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct OutputConfig {
    pub path: PathBuf,
    pub filename: String,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields, default)]
pub struct ModuleConfig {
    pub rules: Vec<RuleConfig>,
}

/// A loader rule: a regex over the module's absolute path and the names of
/// the transforms to run on matching modules.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RuleConfig {
    pub test: String,
    #[serde(rename = "use")]
    pub transforms: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PluginConfig {
    pub name: String,
    #[serde(default)]
    pub options: serde_json::Value,
}

impl Default for BundlerConfig {
    fn default() -> Self {
        Self {
            context: None,
            entry: "./src/index.js".to_string(),
            output: OutputConfig::default(),
            module: ModuleConfig::default(),
            plugins: Vec::new(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("dist"),
            filename: "bundle.js".to_string(),
        }
    }
}

impl BundlerConfig {
    /// Parse configuration text. `context` is left as written.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Read a config file and anchor its `context` at the file's directory.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let mut config = Self::from_json(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

        let config_dir = path.parent().unwrap_or_else(|| Path::new("."));
        config.context = Some(match config.context.take() {
            Some(context) => config_dir.join(context),
            None => config_dir.to_path_buf(),
        });

        Ok(config)
    }

    /// Load `path` if given, otherwise `zympack.config.json` from `dir` when
    /// present, otherwise the defaults rooted at `dir`.
    pub fn discover(path: Option<&Path>, dir: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = path {
            return Self::from_file(path);
        }

        let candidate = dir.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Self::from_file(&candidate);
        }

        Ok(Self {
            context: Some(dir.to_path_buf()),
            ..Self::default()
        })
    }

    /// The project root every canonical module name is relative to.
    pub fn root(&self) -> PathBuf {
        match &self.context {
            Some(context) if context.is_absolute() => context.clone(),
            Some(context) => current_dir().join(context),
            None => current_dir(),
        }
    }
}

fn current_dir() -> PathBuf {
    std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = BundlerConfig::from_json("{}").unwrap();
        assert_eq!(config, BundlerConfig::default());
        assert_eq!(config.entry, "./src/index.js");
        assert_eq!(config.output.path, PathBuf::from("dist"));
        assert_eq!(config.output.filename, "bundle.js");
        assert!(config.module.rules.is_empty());
        assert!(config.plugins.is_empty());
    }

    #[test]
    fn test_full_config() {
        let config = BundlerConfig::from_json(
            r#"{
                "context": "app",
                "entry": "./main.js",
                "output": { "path": "out" },
                "module": { "rules": [ { "test": "\\.txt$", "use": ["uppercase", "raw"] } ] },
                "plugins": [ { "name": "banner", "options": { "banner": "hi" } }, { "name": "progress" } ]
            }"#,
        )
        .unwrap();

        assert_eq!(config.context, Some(PathBuf::from("app")));
        assert_eq!(config.entry, "./main.js");
        assert_eq!(config.output.path, PathBuf::from("out"));
        assert_eq!(config.output.filename, "bundle.js");
        assert_eq!(config.module.rules[0].test, "\\.txt$");
        assert_eq!(config.module.rules[0].transforms, vec!["uppercase", "raw"]);
        assert_eq!(config.plugins[0].options["banner"], "hi");
        assert!(config.plugins[1].options.is_null());
    }

    #[test]
    fn test_unknown_fields_are_rejected() {
        assert!(BundlerConfig::from_json(r#"{ "entyr": "./a.js" }"#).is_err());
        assert!(BundlerConfig::from_json(r#"{ "output": { "dir": "x" } }"#).is_err());
        assert!(BundlerConfig::from_json(r#"{ "module": { "rules": [ { "test": "x" } ] } }"#).is_err());
    }

    #[test]
    fn test_from_file_anchors_context() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);

        fs::write(&path, r#"{ "entry": "./a.js" }"#).unwrap();
        let config = BundlerConfig::from_file(&path).unwrap();
        assert_eq!(config.root(), dir.path());

        fs::write(&path, r#"{ "context": "sub" }"#).unwrap();
        let config = BundlerConfig::from_file(&path).unwrap();
        assert_eq!(config.root(), dir.path().join("sub"));
    }

    #[test]
    fn test_read_and_parse_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.json");
        assert!(matches!(
            BundlerConfig::from_file(&missing),
            Err(ConfigError::Read { .. })
        ));

        let broken = dir.path().join(CONFIG_FILE_NAME);
        fs::write(&broken, "{ \"entry\": ").unwrap();
        assert!(matches!(
            BundlerConfig::from_file(&broken),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn test_discover() {
        let dir = tempfile::tempdir().unwrap();

        let config = BundlerConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.root(), dir.path());
        assert_eq!(config.entry, "./src/index.js");

        fs::write(dir.path().join(CONFIG_FILE_NAME), r#"{ "entry": "./main.js" }"#).unwrap();
        let config = BundlerConfig::discover(None, dir.path()).unwrap();
        assert_eq!(config.entry, "./main.js");
    }
}
