//! Zympack Bundler Library
//!
//! Bundles a CommonJS module graph into a single self-contained JavaScript
//! file. The pipeline per build is: load (rules and transforms) → rewrite
//! `require` calls → recurse into dependencies → render the bundle → write.
//! Plugins observe and adjust each stage through lifecycle hooks.

pub mod compiler;
pub mod config;
pub mod emit;
pub mod error;
pub mod graph;
pub mod hooks;
pub mod loader;
pub mod logging;
pub mod plugins;
pub mod resolver;
pub mod rewriter;
pub mod transforms;

pub use compiler::{Compilation, Compiler, CompilerBuilder, CompilerOptions};
pub use config::BundlerConfig;
pub use error::{BundleError, ConfigError, TransformError};
pub use graph::{GraphBuilder, ModuleGraph};
pub use hooks::{HookKind, Hooks};
pub use loader::{Loader, LoaderRule};
pub use plugins::{BannerPlugin, Plugin, PluginContext, ProgressPlugin};
pub use resolver::ModuleResolver;
pub use rewriter::{Rewriter, Rewritten, BUNDLE_REQUIRE};
pub use transforms::{Transform, TransformRegistry};
