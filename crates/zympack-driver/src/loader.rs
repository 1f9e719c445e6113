//! Loader pipeline: raw module content through the matching rules' transforms

use std::fs;
use std::path::Path;

use regex::Regex;
use tracing::trace;

use crate::config::RuleConfig;
use crate::error::{BundleError, ConfigError};
use crate::transforms::{Transform, TransformRegistry};

/// A path pattern and the transforms applied to the modules it matches.
#[derive(Debug, Clone)]
pub struct LoaderRule {
    test: Regex,
    transforms: Vec<Transform>,
}

impl LoaderRule {
    /// `transforms` are listed in declaration order; they run last-first.
    pub fn new(test: Regex, transforms: Vec<Transform>) -> Self {
        Self { test, transforms }
    }

    /// Compile a configured rule, resolving its transform names.
    pub fn from_config(rule: &RuleConfig, registry: &TransformRegistry) -> Result<Self, ConfigError> {
        let test = Regex::new(&rule.test).map_err(|source| ConfigError::InvalidRulePattern {
            pattern: rule.test.clone(),
            source,
        })?;

        let transforms = rule
            .transforms
            .iter()
            .map(|name| registry.get(name))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::new(test, transforms))
    }

    pub fn matches(&self, path: &Path) -> bool {
        self.test.is_match(&path.to_string_lossy())
    }
}

/// Reads modules and runs them through the configured rules.
#[derive(Debug, Clone, Default)]
pub struct Loader {
    rules: Vec<LoaderRule>,
}

impl Loader {
    pub fn new(rules: Vec<LoaderRule>) -> Self {
        Self { rules }
    }

    pub fn from_config(rules: &[RuleConfig], registry: &TransformRegistry) -> Result<Self, ConfigError> {
        let rules = rules
            .iter()
            .map(|rule| LoaderRule::from_config(rule, registry))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new(rules))
    }

    /// Read the module at `path` and transform it.
    pub fn load(&self, path: &Path) -> Result<String, BundleError> {
        let content = fs::read_to_string(path).map_err(|e| BundleError::io(path, e))?;
        self.apply(path, content)
    }

    /// Run `content` through every rule matching `path`, in rule order.
    pub fn apply(&self, path: &Path, mut content: String) -> Result<String, BundleError> {
        for rule in self.rules.iter().filter(|rule| rule.matches(path)) {
            for transform in rule.transforms.iter().rev() {
                trace!(transform = transform.name(), path = %path.display(), "applying transform");
                content = transform.apply(&content).map_err(|source| BundleError::Transform {
                    transform: transform.name().to_string(),
                    path: path.to_path_buf(),
                    source,
                })?;
            }
        }
        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TransformError;

    fn rule(test: &str, transforms: &[&str]) -> RuleConfig {
        RuleConfig {
            test: test.to_string(),
            transforms: transforms.iter().map(|t| t.to_string()).collect(),
        }
    }

    fn tracing_registry() -> TransformRegistry {
        let mut registry = TransformRegistry::empty();
        for name in ["tA", "tB", "tC"] {
            registry.register(name, move |input| Ok(format!("{}{},", input, name)));
        }
        registry
    }

    #[test]
    fn test_rule_and_transform_order() {
        let loader = Loader::from_config(
            &[rule("\\.js$", &["tA", "tB"]), rule("\\.js$", &["tC"])],
            &tracing_registry(),
        )
        .unwrap();

        let out = loader.apply(Path::new("/p/a.js"), String::new()).unwrap();
        assert_eq!(out, "tB,tA,tC,");
    }

    #[test]
    fn test_non_matching_rules_are_skipped() {
        let loader = Loader::from_config(
            &[rule("\\.txt$", &["uppercase"])],
            &TransformRegistry::new(),
        )
        .unwrap();

        assert_eq!(loader.apply(Path::new("/p/a.js"), "abc".to_string()).unwrap(), "abc");
        assert_eq!(loader.apply(Path::new("/p/a.txt"), "abc".to_string()).unwrap(), "ABC");
    }

    #[test]
    fn test_load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hello.txt");
        fs::write(&path, "hello").unwrap();

        let loader = Loader::from_config(
            &[rule("\\.txt$", &["raw", "uppercase"])],
            &TransformRegistry::new(),
        )
        .unwrap();
        assert_eq!(loader.load(&path).unwrap(), "module.exports = \"HELLO\";\n");

        let missing = dir.path().join("missing.txt");
        assert!(matches!(loader.load(&missing), Err(BundleError::Io { .. })));
    }

    #[test]
    fn test_failing_transform_names_itself() {
        let mut registry = TransformRegistry::empty();
        registry.register("broken", |_| Err(TransformError::new("nope")));
        let loader = Loader::from_config(&[rule(".*", &["broken"])], &registry).unwrap();

        match loader.apply(Path::new("/p/x.js"), String::new()) {
            Err(BundleError::Transform { transform, path, source }) => {
                assert_eq!(transform, "broken");
                assert_eq!(path, Path::new("/p/x.js"));
                assert_eq!(source.message, "nope");
            }
            other => panic!("Expected transform error, got {:?}", other),
        }
    }

    #[test]
    fn test_config_errors() {
        let registry = TransformRegistry::new();

        let err = Loader::from_config(&[rule("(", &["trim"])], &registry).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidRulePattern { .. }));

        let err = Loader::from_config(&[rule("x", &["nope"])], &registry).unwrap_err();
        assert!(matches!(err, ConfigError::UnknownTransform(name) if name == "nope"));
    }
}
