//! Module graph for a single build

use std::path::Path;

use indexmap::IndexMap;
use tracing::{debug, info};

use crate::error::BundleError;
use crate::loader::Loader;
use crate::resolver::{dirname, ModuleResolver};
use crate::rewriter::Rewriter;

/// Every module reachable from the entry, keyed by canonical name, in the
/// order they were first visited.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ModuleGraph {
    entry: String,
    modules: IndexMap<String, String>,
}

impl ModuleGraph {
    pub fn new(entry: impl Into<String>) -> Self {
        Self {
            entry: entry.into(),
            modules: IndexMap::new(),
        }
    }

    /// Canonical name of the entry module
    pub fn entry(&self) -> &str {
        &self.entry
    }

    /// Register a module. Returns `false` if the name was already taken, in
    /// which case the existing source is kept.
    pub fn add_module(&mut self, name: impl Into<String>, source: impl Into<String>) -> bool {
        match self.modules.entry(name.into()) {
            indexmap::map::Entry::Occupied(_) => false,
            indexmap::map::Entry::Vacant(slot) => {
                slot.insert(source.into());
                true
            }
        }
    }

    pub fn contains(&self, name: &str) -> bool {
        self.modules.contains_key(name)
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.modules.get(name).map(String::as_str)
    }

    /// Modules as `(name, source)` pairs in visit order.
    pub fn modules(&self) -> impl Iterator<Item = (&str, &str)> {
        self.modules.iter().map(|(name, source)| (name.as_str(), source.as_str()))
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}

/// Walks the dependency graph depth-first from an entry module.
pub struct GraphBuilder<'a> {
    resolver: &'a ModuleResolver,
    loader: &'a Loader,
    rewriter: &'a Rewriter,
}

impl<'a> GraphBuilder<'a> {
    pub fn new(resolver: &'a ModuleResolver, loader: &'a Loader, rewriter: &'a Rewriter) -> Self {
        Self {
            resolver,
            loader,
            rewriter,
        }
    }

    /// Build the graph of everything `entry_path` requires, transitively.
    ///
    /// Dependencies are visited in the order they are required. A module
    /// already in the graph is not visited again, so cycles terminate.
    pub fn build(&self, entry_path: &Path) -> Result<ModuleGraph, BundleError> {
        let entry = self.resolver.canonical_name(entry_path);
        let mut graph = ModuleGraph::new(entry.clone());

        // (module, importer); popped in the same order recursion would visit
        let mut stack: Vec<(String, Option<String>)> = vec![(entry, None)];

        while let Some((name, importer)) = stack.pop() {
            if graph.contains(&name) {
                continue;
            }

            let path = self.resolver.resolve(&name);
            if !path.is_file() {
                return Err(BundleError::ModuleNotFound {
                    specifier: name,
                    importer,
                    path,
                });
            }

            let content = self.loader.load(&path)?;
            let rewritten = match self.rewriter.rewrite(&content, dirname(&name)) {
                Ok(rewritten) => rewritten,
                Err(errors) => {
                    return Err(BundleError::Parse {
                        module: name,
                        source_text: content,
                        errors,
                    })
                }
            };

            debug!(
                module = %name,
                dependencies = rewritten.dependencies.len(),
                "built module"
            );
            graph.add_module(name.clone(), rewritten.code);

            for dependency in rewritten.dependencies.into_iter().rev() {
                if !graph.contains(&dependency) {
                    stack.push((dependency, Some(name.clone())));
                }
            }
        }

        info!(modules = graph.len(), entry = graph.entry(), "module graph complete");
        Ok(graph)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use crate::transforms::TransformRegistry;
    use std::fs;

    fn write(root: &Path, name: &str, content: &str) {
        let path = root.join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    fn build(root: &Path, entry: &str, loader: &Loader) -> Result<ModuleGraph, BundleError> {
        let resolver = ModuleResolver::new(root);
        let rewriter = Rewriter::new();
        GraphBuilder::new(&resolver, loader, &rewriter).build(&root.join(entry))
    }

    #[test]
    fn test_two_module_graph() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.js", "var b = require('./b.js');");
        write(dir.path(), "b.js", "module.exports = 1;");

        let graph = build(dir.path(), "a.js", &Loader::default()).unwrap();
        assert_eq!(graph.entry(), "./a.js");
        assert_eq!(
            graph.modules().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["./a.js", "./b.js"]
        );
        assert_eq!(
            graph.get("./a.js"),
            Some("var b = __zympack_require__(\"./b.js\");\n")
        );
        assert_eq!(graph.get("./b.js"), Some("module.exports = 1;"));
    }

    #[test]
    fn test_depth_first_declaration_order() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "src/index.js", "require('./x'); require('./y');");
        write(dir.path(), "src/x.js", "require('./lib/z');");
        write(dir.path(), "src/lib/z.js", "require('../y');");
        write(dir.path(), "src/y.js", "");

        let graph = build(dir.path(), "src/index.js", &Loader::default()).unwrap();
        assert_eq!(
            graph.modules().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["./src/index.js", "./src/x.js", "./src/lib/z.js", "./src/y.js"]
        );
    }

    #[test]
    fn test_cycles_build_each_module_once() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.js", "exports.b = require('./b');");
        write(dir.path(), "b.js", "exports.a = require('./a'); exports.self = require('./b');");

        let graph = build(dir.path(), "a.js", &Loader::default()).unwrap();
        assert_eq!(graph.len(), 2);
        assert!(graph.contains("./a.js"));
        assert!(graph.contains("./b.js"));
    }

    #[test]
    fn test_missing_dependency() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.js", "require('./nope');");

        match build(dir.path(), "a.js", &Loader::default()) {
            Err(BundleError::ModuleNotFound { specifier, importer, path }) => {
                assert_eq!(specifier, "./nope.js");
                assert_eq!(importer.as_deref(), Some("./a.js"));
                assert!(path.ends_with("nope.js"));
            }
            other => panic!("Expected module not found, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_entry() {
        let dir = tempfile::tempdir().unwrap();
        match build(dir.path(), "src/index.js", &Loader::default()) {
            Err(BundleError::ModuleNotFound { specifier, importer, .. }) => {
                assert_eq!(specifier, "./src/index.js");
                assert!(importer.is_none());
            }
            other => panic!("Expected module not found, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_error_carries_module_text() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "a.js", "require('./b');");
        write(dir.path(), "b.js", "let = 1;");

        match build(dir.path(), "a.js", &Loader::default()) {
            Err(BundleError::Parse { module, source_text, errors }) => {
                assert_eq!(module, "./b.js");
                assert_eq!(source_text, "let = 1;");
                assert_eq!(errors[0].span.start, 4);
            }
            other => panic!("Expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_loader_output_is_parsed() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.js", "console.log(require('./hello.txt'));");
        write(dir.path(), "hello.txt", "hello");

        let rules = [RuleConfig {
            test: "\\.txt$".to_string(),
            transforms: vec!["raw".to_string(), "uppercase".to_string()],
        }];
        let loader = Loader::from_config(&rules, &TransformRegistry::new()).unwrap();

        let graph = build(dir.path(), "index.js", &loader).unwrap();
        assert_eq!(graph.get("./hello.txt"), Some("module.exports = \"HELLO\";\n"));
    }

    #[test]
    fn test_transformed_text_is_kept_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "index.js", "require('./hello.txt');");
        write(dir.path(), "hello.txt", "hi");

        let rules = [RuleConfig {
            test: "\\.txt$".to_string(),
            transforms: vec!["uppercase".to_string()],
        }];
        let loader = Loader::from_config(&rules, &TransformRegistry::new()).unwrap();

        // "HI" is a lone identifier statement with nothing to resolve
        let graph = build(dir.path(), "index.js", &loader).unwrap();
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.get("./hello.txt"), Some("HI"));
        assert_eq!(
            graph.modules().map(|(name, _)| name).collect::<Vec<_>>(),
            vec!["./index.js", "./hello.txt"]
        );
    }
}
