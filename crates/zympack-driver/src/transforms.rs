//! Named content transforms used by loader rules

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use crate::error::{ConfigError, TransformError};

type TransformFn = dyn Fn(&str) -> Result<String, TransformError>;

/// A resolved transform: a name plus the function it stands for.
#[derive(Clone)]
pub struct Transform {
    name: String,
    func: Rc<TransformFn>,
}

impl Transform {
    pub fn new(
        name: impl Into<String>,
        func: impl Fn(&str) -> Result<String, TransformError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            func: Rc::new(func),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn apply(&self, input: &str) -> Result<String, TransformError> {
        (self.func)(input)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Transform").field(&self.name).finish()
    }
}

/// Transforms available to loader rules, by name.
pub struct TransformRegistry {
    transforms: HashMap<String, Transform>,
}

impl TransformRegistry {
    /// A registry with no transforms at all.
    pub fn empty() -> Self {
        Self {
            transforms: HashMap::new(),
        }
    }

    /// A registry holding the built-in transforms.
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register("uppercase", |input| Ok(input.to_uppercase()));
        registry.register("lowercase", |input| Ok(input.to_lowercase()));
        registry.register("trim", |input| Ok(input.trim().to_string()));
        registry.register("raw", raw_module);
        registry.register("json", json_module);
        registry
    }

    /// Add or replace the transform called `name`.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        func: impl Fn(&str) -> Result<String, TransformError> + 'static,
    ) -> &mut Self {
        let transform = Transform::new(name, func);
        self.transforms.insert(transform.name.clone(), transform);
        self
    }

    pub fn get(&self, name: &str) -> Result<Transform, ConfigError> {
        self.transforms
            .get(name)
            .cloned()
            .ok_or_else(|| ConfigError::UnknownTransform(name.to_string()))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.transforms.contains_key(name)
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Export the content as a string.
fn raw_module(input: &str) -> Result<String, TransformError> {
    let quoted = serde_json::to_string(input).map_err(|e| TransformError::new(e.to_string()))?;
    Ok(format!("module.exports = {};\n", quoted))
}

/// Export the content as a parsed JSON value.
fn json_module(input: &str) -> Result<String, TransformError> {
    let value: serde_json::Value =
        serde_json::from_str(input).map_err(|e| TransformError::new(format!("invalid JSON: {}", e)))?;
    Ok(format!("module.exports = {};\n", value))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_text_transforms() {
        let registry = TransformRegistry::new();
        assert_eq!(registry.get("uppercase").unwrap().apply("hello").unwrap(), "HELLO");
        assert_eq!(registry.get("lowercase").unwrap().apply("HeLLo").unwrap(), "hello");
        assert_eq!(registry.get("trim").unwrap().apply("  x \n").unwrap(), "x");
    }

    #[test]
    fn test_raw_transform_escapes_content() {
        let raw = TransformRegistry::new().get("raw").unwrap();
        assert_eq!(
            raw.apply("say \"hi\"\n").unwrap(),
            "module.exports = \"say \\\"hi\\\"\\n\";\n"
        );
    }

    #[test]
    fn test_json_transform() {
        let json = TransformRegistry::new().get("json").unwrap();
        assert_eq!(
            json.apply("{ \"a\": [1, 2] }").unwrap(),
            "module.exports = {\"a\":[1,2]};\n"
        );

        let err = json.apply("{ oops").unwrap_err();
        assert!(err.message.starts_with("invalid JSON"));
    }

    #[test]
    fn test_register_and_lookup() {
        let mut registry = TransformRegistry::empty();
        assert!(matches!(
            registry.get("uppercase"),
            Err(ConfigError::UnknownTransform(name)) if name == "uppercase"
        ));

        registry.register("shout", |input| Ok(format!("{}!", input)));
        assert!(registry.contains("shout"));

        let shout = registry.get("shout").unwrap();
        assert_eq!(shout.name(), "shout");
        assert_eq!(shout.apply("hey").unwrap(), "hey!");
    }
}
