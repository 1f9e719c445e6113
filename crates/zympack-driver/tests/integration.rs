//! Integration tests for the zympack bundler.
//!
//! Each test lays out a small project in a temporary directory and bundles it,
//! either through the library API or through the `zympack` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use tempfile::TempDir;
use zympack_driver::{
    BannerPlugin, BundleError, BundlerConfig, Compiler, ConfigError, HookKind, Plugin,
    PluginContext,
};

/// Write `files` (path, content) under a fresh temporary directory.
fn project(files: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    for (name, content) in files {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }
    dir
}

fn config(json: &str) -> BundlerConfig {
    BundlerConfig::from_json(json).expect("Invalid test config")
}

fn compile(dir: &Path, config: BundlerConfig) -> Result<(PathBuf, String), BundleError> {
    let mut compiler = Compiler::builder(config).root(dir).build()?;
    let compilation = compiler.run()?;
    let (path, text) = compilation
        .assets
        .into_iter()
        .next()
        .expect("Build produced no asset");
    Ok((path, text))
}

/// Run a bundle with node, if node is installed.
fn run_with_node(bundle: &Path) -> Option<String> {
    let output = Command::new("node").arg(bundle).output().ok()?;
    assert!(
        output.status.success(),
        "node failed:\n{}",
        String::from_utf8_lossy(&output.stderr)
    );
    Some(String::from_utf8_lossy(&output.stdout).to_string())
}

// ============================================================================
// End to end
// ============================================================================

#[test]
fn test_two_module_bundle() {
    let dir = project(&[
        ("a.js", "var b = require('./b.js');\nconsole.log(b);"),
        ("b.js", "module.exports = 1;"),
    ]);

    let (path, bundle) = compile(dir.path(), config(r#"{ "entry": "./a.js" }"#)).unwrap();
    assert_eq!(path, dir.path().join("dist").join("bundle.js"));
    assert_eq!(fs::read_to_string(&path).unwrap(), bundle);

    assert!(bundle.contains("__zympack_require__.s = \"./a.js\""));
    assert!(bundle.contains("var b = __zympack_require__(\"./b.js\");"));
    assert!(bundle.contains("module.exports = 1;"));
    assert!(!bundle.contains("require('./b.js')"));

    if let Some(stdout) = run_with_node(&path) {
        assert_eq!(stdout.trim(), "1");
    }
}

#[test]
fn test_nested_directories_and_shared_dependency() {
    let dir = project(&[
        (
            "src/index.js",
            "const math = require('./lib/math');\nconst log = require('./log');\nlog(math.add(2, 3));",
        ),
        (
            "src/lib/math.js",
            "const log = require('../log');\nexports.add = (a, b) => a + b;",
        ),
        ("src/log.js", "module.exports = (x) => console.log(`value: ${x}`);"),
    ]);

    let (path, bundle) = compile(dir.path(), BundlerConfig::default()).unwrap();

    let order: Vec<usize> = ["\"./src/index.js\": (", "\"./src/lib/math.js\": (", "\"./src/log.js\": ("]
        .iter()
        .map(|key| bundle.find(key).expect("module missing from bundle"))
        .collect();
    assert!(order[0] < order[1] && order[1] < order[2]);
    assert_eq!(bundle.matches("\"./src/log.js\": (").count(), 1);

    if let Some(stdout) = run_with_node(&path) {
        assert_eq!(stdout.trim(), "value: 5");
    }
}

#[test]
fn test_text_loader_rule() {
    let dir = project(&[
        ("src/index.js", "console.log(require('./hello.txt'));"),
        ("src/hello.txt", "hello"),
    ]);

    let (path, bundle) = compile(
        dir.path(),
        config(r#"{ "module": { "rules": [ { "test": "\\.txt$", "use": ["raw", "uppercase"] } ] } }"#),
    )
    .unwrap();
    assert!(bundle.contains("module.exports = \"HELLO\";"));

    if let Some(stdout) = run_with_node(&path) {
        assert_eq!(stdout.trim(), "HELLO");
    }
}

#[test]
fn test_circular_modules() {
    let dir = project(&[
        ("src/index.js", "exports.name = 'a'; const b = require('./b'); console.log(b.seen);"),
        ("src/b.js", "const a = require('./index'); exports.seen = a.name;"),
    ]);

    let (path, bundle) = compile(dir.path(), BundlerConfig::default()).unwrap();
    assert_eq!(bundle.matches("\"./src/index.js\": (").count(), 1);
    assert_eq!(bundle.matches("\"./src/b.js\": (").count(), 1);

    if let Some(stdout) = run_with_node(&path) {
        assert_eq!(stdout.trim(), "a");
    }
}

#[test]
fn test_hashbang_lines_are_dropped() {
    let dir = project(&[
        ("src/index.js", "#!/usr/bin/env node\nconsole.log(require('./b'));"),
        ("src/b.js", "#!/usr/bin/env node\nmodule.exports = 1;"),
    ]);

    let (path, bundle) = compile(dir.path(), BundlerConfig::default()).unwrap();
    assert!(!bundle.contains("#!"));
    assert!(bundle.contains("console.log(__zympack_require__(\"./src/b.js\"));"));

    if let Some(stdout) = run_with_node(&path) {
        assert_eq!(stdout.trim(), "1");
    }
}

#[test]
fn test_failed_rebuild_leaves_no_bundle() {
    let dir = project(&[
        ("src/index.js", "console.log(require('./b'));"),
        ("src/b.js", "module.exports = 1;"),
    ]);

    let (path, _) = compile(dir.path(), BundlerConfig::default()).unwrap();
    assert!(path.is_file());

    fs::remove_file(dir.path().join("src/b.js")).unwrap();
    assert!(matches!(
        compile(dir.path(), BundlerConfig::default()),
        Err(BundleError::ModuleNotFound { .. })
    ));
    assert!(!path.exists());
}

#[test]
fn test_builds_are_deterministic() {
    let files = [
        ("src/index.js", "require('./x'); require('./y');"),
        ("src/x.js", "require('./y');"),
        ("src/y.js", "module.exports = 'y';"),
    ];
    let dir = project(&files);

    let (_, first) = compile(dir.path(), BundlerConfig::default()).unwrap();
    let (_, second) = compile(dir.path(), BundlerConfig::default()).unwrap();
    assert_eq!(first, second);
}

// ============================================================================
// Failures
// ============================================================================

#[test]
fn test_missing_dependency_writes_nothing() {
    let dir = project(&[("src/index.js", "require('./gone');")]);

    match compile(dir.path(), BundlerConfig::default()) {
        Err(BundleError::ModuleNotFound { specifier, importer, .. }) => {
            assert_eq!(specifier, "./src/gone.js");
            assert_eq!(importer.as_deref(), Some("./src/index.js"));
        }
        other => panic!("Expected module not found, got {:?}", other.map(|(p, _)| p)),
    }
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_syntax_error_writes_nothing() {
    let dir = project(&[
        ("src/index.js", "require('./broken');"),
        ("src/broken.js", "function (] {"),
    ]);

    match compile(dir.path(), BundlerConfig::default()) {
        Err(BundleError::Parse { module, errors, .. }) => {
            assert_eq!(module, "./src/broken.js");
            assert!(!errors.is_empty());
        }
        other => panic!("Expected parse error, got {:?}", other.map(|(p, _)| p)),
    }
    assert!(!dir.path().join("dist").exists());
}

#[test]
fn test_invalid_configuration() {
    let bad_pattern = config(r#"{ "module": { "rules": [ { "test": "[", "use": [] } ] } }"#);
    assert!(matches!(
        Compiler::new(bad_pattern),
        Err(ConfigError::InvalidRulePattern { .. })
    ));

    let bad_transform = config(r#"{ "module": { "rules": [ { "test": "x", "use": ["sass"] } ] } }"#);
    assert!(matches!(
        Compiler::new(bad_transform),
        Err(ConfigError::UnknownTransform(_))
    ));

    let bad_plugin = config(r#"{ "plugins": [ { "name": "uglify" } ] }"#);
    assert!(matches!(Compiler::new(bad_plugin), Err(ConfigError::UnknownPlugin(_))));

    assert!(BundlerConfig::from_json(r#"{ "entries": [] }"#).is_err());
}

// ============================================================================
// Plugins
// ============================================================================

#[test]
fn test_banner_plugin_from_config() {
    let dir = project(&[("src/index.js", "console.log('hi');")]);

    let (path, bundle) = compile(
        dir.path(),
        config(r#"{ "plugins": [ { "name": "banner", "options": { "banner": "built by zympack" } } ] }"#),
    )
    .unwrap();
    assert!(bundle.starts_with("/*! built by zympack */\n(function (modules) {"));
    assert_eq!(fs::read_to_string(path).unwrap(), bundle);
}

struct Footer;

impl Plugin for Footer {
    fn name(&self) -> &str {
        "footer"
    }

    fn apply(&self, ctx: &mut PluginContext<'_>) {
        let modules_dir = ctx.options().root.join("src");
        ctx.tap(HookKind::BeforeEmit, move |compilation| {
            let note = format!("// {} modules from {}\n", compilation.graph.len(), modules_dir.display());
            for text in compilation.assets.values_mut() {
                text.push_str(&note);
            }
        });
    }
}

#[test]
fn test_programmatic_plugins_run_after_configured_ones() {
    let dir = project(&[("src/index.js", "console.log('hi');")]);

    let mut compiler = Compiler::builder(BundlerConfig::default())
        .root(dir.path())
        .plugin(BannerPlugin::new("top"))
        .plugin(Footer)
        .build()
        .unwrap();
    let compilation = compiler.run().unwrap();

    let text = &compilation.assets[0];
    assert!(text.starts_with("/*! top */\n"));
    assert!(text.ends_with(&format!("// 1 modules from {}\n", dir.path().join("src").display())));
}

// ============================================================================
// Command line
// ============================================================================

fn zympack() -> Command {
    Command::new(env!("CARGO_BIN_EXE_zympack"))
}

#[test]
fn test_cli_build_with_config_file() {
    let dir = project(&[
        ("app/main.js", "var b = require('./b');"),
        ("app/b.js", "module.exports = 1;"),
        (
            "zympack.config.json",
            r#"{ "entry": "./app/main.js", "output": { "path": "out", "filename": "app.js" } }"#,
        ),
    ]);

    let output = zympack()
        .arg("build")
        .current_dir(dir.path())
        .output()
        .expect("Failed to run zympack");

    assert!(
        output.status.success(),
        "build failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bundled 2 modules"));

    let bundle = fs::read_to_string(dir.path().join("out").join("app.js")).unwrap();
    assert!(bundle.contains("__zympack_require__(\"./app/b.js\")"));
}

#[test]
fn test_cli_overrides() {
    let dir = project(&[("lib/start.js", "console.log(1);")]);

    let output = zympack()
        .args(["build", "--entry", "./lib/start.js", "--out-dir", "build", "--filename", "x.js"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to run zympack");

    assert!(output.status.success());
    assert!(dir.path().join("build").join("x.js").is_file());
}

#[test]
fn test_cli_reports_failures() {
    let dir = project(&[("src/index.js", "let = 1;")]);

    let output = zympack()
        .arg("build")
        .current_dir(dir.path())
        .output()
        .expect("Failed to run zympack");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Syntax error"));

    let output = zympack()
        .args(["build", "--entry", "./nope.js"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to run zympack");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("module not found"));
}

#[test]
fn test_cli_rewrite() {
    let dir = project(&[("a.js", "const b = require('./b');")]);

    let output = zympack()
        .args(["rewrite", "a.js", "--dir", "./src"])
        .current_dir(dir.path())
        .output()
        .expect("Failed to run zympack");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("const b = __zympack_require__(\"./src/b.js\");"));
    assert!(stdout.contains("  ./src/b.js"));
}
