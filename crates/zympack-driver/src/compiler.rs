//! Build orchestration

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::BundlerConfig;
use crate::emit;
use crate::error::{BundleError, ConfigError};
use crate::graph::{GraphBuilder, ModuleGraph};
use crate::hooks::{HookKind, Hooks};
use crate::loader::Loader;
use crate::plugins::{self, Plugin, PluginContext};
use crate::resolver::ModuleResolver;
use crate::rewriter::Rewriter;
use crate::transforms::TransformRegistry;

/// Resolved compiler settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompilerOptions {
    pub root: PathBuf,
    pub entry: String,
    pub output_path: PathBuf,
    pub output_filename: String,
}

impl CompilerOptions {
    pub fn from_config(config: &BundlerConfig) -> Self {
        Self {
            root: config.root(),
            entry: config.entry.clone(),
            output_path: config.output.path.clone(),
            output_filename: config.output.filename.clone(),
        }
    }

    pub fn entry_path(&self) -> PathBuf {
        self.root.join(&self.entry)
    }

    /// `root/output.path/output.filename`; an absolute output path is kept.
    pub fn output_file(&self) -> PathBuf {
        self.root.join(&self.output_path).join(&self.output_filename)
    }
}

/// State of a single build, handed to every hook tap.
#[derive(Debug, Clone, Default)]
pub struct Compilation {
    pub root: PathBuf,
    pub graph: ModuleGraph,
    /// Output path to file contents, filled during emission
    pub assets: IndexMap<PathBuf, String>,
}

impl Compilation {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            graph: ModuleGraph::default(),
            assets: IndexMap::new(),
        }
    }
}

pub struct Compiler {
    options: CompilerOptions,
    resolver: ModuleResolver,
    loader: Loader,
    rewriter: Rewriter,
    hooks: Hooks,
}

impl Compiler {
    pub fn builder(config: BundlerConfig) -> CompilerBuilder {
        CompilerBuilder::new(config)
    }

    /// Shorthand for `Compiler::builder(config).build()`.
    pub fn new(config: BundlerConfig) -> Result<Self, ConfigError> {
        Self::builder(config).build()
    }

    pub fn options(&self) -> &CompilerOptions {
        &self.options
    }

    /// Run one build: module graph, then bundle.
    ///
    /// Every call starts from an empty compilation, so runs share nothing but
    /// the configuration. Returns the finished compilation; the bundle is on
    /// disk at its single asset path. A failed run leaves no bundle behind,
    /// not even one from an earlier run.
    pub fn run(&mut self) -> Result<Compilation, BundleError> {
        let output_file = self.options.output_file();
        let result = self.compile(&output_file);
        if result.is_err() {
            remove_stale_output(&output_file);
        }
        result
    }

    fn compile(&mut self, output_file: &Path) -> Result<Compilation, BundleError> {
        let mut compilation = Compilation::new(self.options.root.clone());
        info!(root = %self.options.root.display(), entry = %self.options.entry, "starting build");

        self.hooks.call(HookKind::BeforeRun, &mut compilation);
        self.hooks.call(HookKind::BeforeCompile, &mut compilation);

        let builder = GraphBuilder::new(&self.resolver, &self.loader, &self.rewriter);
        compilation.graph = builder.build(&self.options.entry_path())?;

        self.hooks.call(HookKind::AfterCompile, &mut compilation);

        let path = emit::emit(&mut compilation, &mut self.hooks, output_file)?;
        info!(path = %path.display(), modules = compilation.graph.len(), "bundle written");

        Ok(compilation)
    }
}

fn remove_stale_output(output_file: &Path) {
    match fs::remove_file(output_file) {
        Ok(()) => info!(path = %output_file.display(), "removed bundle from an earlier build"),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %output_file.display(), error = %e, "could not remove stale bundle"),
    }
}

/// Assembles a [`Compiler`] from configuration plus programmatic additions.
pub struct CompilerBuilder {
    config: BundlerConfig,
    root: Option<PathBuf>,
    transforms: TransformRegistry,
    rewriter: Rewriter,
    plugins: Vec<Box<dyn Plugin>>,
}

impl CompilerBuilder {
    pub fn new(config: BundlerConfig) -> Self {
        Self {
            config,
            root: None,
            transforms: TransformRegistry::new(),
            rewriter: Rewriter::new(),
            plugins: Vec::new(),
        }
    }

    /// Override the project root from the configuration.
    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    /// Transforms that loader rules may name. Defaults to the built-ins.
    pub fn transforms(mut self, transforms: TransformRegistry) -> Self {
        self.transforms = transforms;
        self
    }

    pub fn rewriter(mut self, rewriter: Rewriter) -> Self {
        self.rewriter = rewriter;
        self
    }

    /// Add a plugin. It is applied after the plugins named in the config.
    pub fn plugin(mut self, plugin: impl Plugin + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Resolve rules and plugins, apply every plugin, then fire `AfterPlugins`.
    pub fn build(self) -> Result<Compiler, ConfigError> {
        let mut options = CompilerOptions::from_config(&self.config);
        if let Some(root) = self.root {
            options.root = absolute(&root);
        }

        let loader = Loader::from_config(&self.config.module.rules, &self.transforms)?;

        let mut plugins = self
            .config
            .plugins
            .iter()
            .map(plugins::from_config)
            .collect::<Result<Vec<_>, _>>()?;
        plugins.extend(self.plugins);

        let mut hooks = Hooks::new();
        for plugin in &plugins {
            info!(plugin = plugin.name(), "applying plugin");
            plugin.apply(&mut PluginContext::new(plugin.name(), &mut hooks, &options));
        }
        hooks.call(HookKind::AfterPlugins, &mut Compilation::new(options.root.clone()));

        Ok(Compiler {
            resolver: ModuleResolver::new(options.root.clone()),
            options,
            loader,
            rewriter: self.rewriter,
            hooks,
        })
    }
}

fn absolute(path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|_| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleConfig;
    use std::cell::RefCell;
    use std::fs;
    use std::rc::Rc;

    struct Recorder {
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Recorder {
        fn name(&self) -> &str {
            "recorder"
        }

        fn apply(&self, ctx: &mut PluginContext<'_>) {
            self.log.borrow_mut().push("apply".to_string());
            for kind in HookKind::ALL {
                let log = Rc::clone(&self.log);
                ctx.tap(kind, move |compilation| {
                    log.borrow_mut()
                        .push(format!("{}:{}:{}", kind, compilation.graph.len(), compilation.assets.len()));
                });
            }
        }
    }

    struct Tagged {
        tag: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Plugin for Tagged {
        fn name(&self) -> &str {
            self.tag
        }

        fn apply(&self, ctx: &mut PluginContext<'_>) {
            let (tag, log) = (self.tag, Rc::clone(&self.log));
            ctx.tap(HookKind::BeforeEmit, move |_| log.borrow_mut().push(tag.to_string()));
        }
    }

    fn project() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("src")).unwrap();
        fs::write(dir.path().join("src/index.js"), "require('./b');").unwrap();
        fs::write(dir.path().join("src/b.js"), "module.exports = 2;").unwrap();
        dir
    }

    #[test]
    fn test_output_file() {
        let options = CompilerOptions {
            root: PathBuf::from("/project"),
            entry: "./src/index.js".to_string(),
            output_path: PathBuf::from("dist"),
            output_filename: "bundle.js".to_string(),
        };
        assert_eq!(options.output_file(), PathBuf::from("/project/dist/bundle.js"));
        assert_eq!(options.entry_path(), PathBuf::from("/project/./src/index.js"));

        let absolute = CompilerOptions {
            output_path: PathBuf::from("/tmp/out"),
            ..options
        };
        assert_eq!(absolute.output_file(), PathBuf::from("/tmp/out/bundle.js"));
    }

    #[test]
    fn test_hook_order() {
        let dir = project();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut compiler = Compiler::builder(BundlerConfig::default())
            .root(dir.path())
            .plugin(Recorder { log: Rc::clone(&log) })
            .build()
            .unwrap();
        assert_eq!(*log.borrow(), vec!["apply", "afterPlugins:0:0"]);

        compiler.run().unwrap();
        assert_eq!(
            *log.borrow(),
            vec![
                "apply",
                "afterPlugins:0:0",
                "beforeRun:0:0",
                "beforeCompile:0:0",
                "afterCompile:2:0",
                "beforeEmit:2:1",
                "afterEmit:2:1",
            ]
        );
    }

    #[test]
    fn test_runs_are_independent() {
        let dir = project();
        let mut compiler = Compiler::builder(BundlerConfig::default())
            .root(dir.path())
            .build()
            .unwrap();

        let first = compiler.run().unwrap();
        fs::write(dir.path().join("src/index.js"), "console.log(1);").unwrap();
        let second = compiler.run().unwrap();

        assert_eq!(first.graph.len(), 2);
        assert_eq!(second.graph.len(), 1);
        assert_eq!(second.graph.get("./src/index.js"), Some("console.log(1);"));
    }

    #[test]
    fn test_plugins_tapping_one_hook_fire_in_registration_order() {
        let dir = project();
        let log = Rc::new(RefCell::new(Vec::new()));

        let mut compiler = Compiler::builder(BundlerConfig::default())
            .root(dir.path())
            .plugin(Tagged { tag: "P1", log: Rc::clone(&log) })
            .plugin(Tagged { tag: "P2", log: Rc::clone(&log) })
            .build()
            .unwrap();
        compiler.run().unwrap();
        assert_eq!(*log.borrow(), vec!["P1", "P2"]);

        log.borrow_mut().clear();
        let mut reversed = Compiler::builder(BundlerConfig::default())
            .root(dir.path())
            .plugin(Tagged { tag: "P2", log: Rc::clone(&log) })
            .plugin(Tagged { tag: "P1", log: Rc::clone(&log) })
            .build()
            .unwrap();
        reversed.run().unwrap();
        assert_eq!(*log.borrow(), vec!["P2", "P1"]);
    }

    #[test]
    fn test_failed_rebuild_removes_previous_bundle() {
        let dir = project();
        let mut compiler = Compiler::builder(BundlerConfig::default())
            .root(dir.path())
            .build()
            .unwrap();
        let output = compiler.options().output_file();

        compiler.run().unwrap();
        assert!(output.is_file());

        fs::remove_file(dir.path().join("src/b.js")).unwrap();
        assert!(matches!(compiler.run(), Err(BundleError::ModuleNotFound { .. })));
        assert!(!output.exists());

        // Nothing to remove the second time round
        assert!(compiler.run().is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_build_rejects_bad_config() {
        let mut config = BundlerConfig::default();
        config.module.rules.push(RuleConfig {
            test: "\\.css$".to_string(),
            transforms: vec!["postcss".to_string()],
        });
        assert!(matches!(
            Compiler::new(config),
            Err(ConfigError::UnknownTransform(name)) if name == "postcss"
        ));

        let mut config = BundlerConfig::default();
        config.plugins.push(crate::config::PluginConfig {
            name: "nope".to_string(),
            options: serde_json::Value::Null,
        });
        assert!(matches!(Compiler::new(config), Err(ConfigError::UnknownPlugin(_))));
    }

    #[test]
    fn test_custom_transform_registry() {
        let dir = project();
        fs::write(dir.path().join("src/b.js"), "MODULE.EXPORTS = 2;").unwrap();

        let mut transforms = TransformRegistry::empty();
        transforms.register("lower", |input| Ok(input.to_lowercase()));

        let mut config = BundlerConfig::default();
        config.module.rules.push(RuleConfig {
            test: "b\\.js$".to_string(),
            transforms: vec!["lower".to_string()],
        });

        let mut compiler = Compiler::builder(config)
            .root(dir.path())
            .transforms(transforms)
            .build()
            .unwrap();
        let compilation = compiler.run().unwrap();
        assert_eq!(compilation.graph.get("./src/b.js"), Some("module.exports = 2;"));
    }
}
