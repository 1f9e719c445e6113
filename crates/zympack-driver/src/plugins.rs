//! Plugin interface and the built-in plugins

use serde::Deserialize;
use tracing::info;

use crate::compiler::{Compilation, CompilerOptions};
use crate::config::PluginConfig;
use crate::error::ConfigError;
use crate::hooks::{HookKind, Hooks};

/// A plugin taps into compiler hooks once, while the compiler is built.
pub trait Plugin {
    fn name(&self) -> &str;

    fn apply(&self, ctx: &mut PluginContext<'_>);
}

/// What a plugin sees while it is being applied.
pub struct PluginContext<'a> {
    plugin: &'a str,
    hooks: &'a mut Hooks,
    options: &'a CompilerOptions,
}

impl<'a> PluginContext<'a> {
    pub(crate) fn new(plugin: &'a str, hooks: &'a mut Hooks, options: &'a CompilerOptions) -> Self {
        Self {
            plugin,
            hooks,
            options,
        }
    }

    pub fn options(&self) -> &CompilerOptions {
        self.options
    }

    /// Register a tap under the plugin's name.
    pub fn tap(&mut self, kind: HookKind, callback: impl FnMut(&mut Compilation) + 'static) {
        self.hooks.tap(kind, self.plugin, callback);
    }

    pub fn hooks(&mut self) -> &mut Hooks {
        self.hooks
    }
}

/// Instantiate a built-in plugin from its configuration entry.
pub fn from_config(config: &PluginConfig) -> Result<Box<dyn Plugin>, ConfigError> {
    match config.name.as_str() {
        BannerPlugin::NAME => Ok(Box::new(BannerPlugin::from_options(&config.options)?)),
        ProgressPlugin::NAME => Ok(Box::new(ProgressPlugin)),
        other => Err(ConfigError::UnknownPlugin(other.to_string())),
    }
}

/// Prefixes every emitted asset with a `/*! ... */` comment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BannerPlugin {
    banner: String,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct BannerOptions {
    banner: String,
}

impl BannerPlugin {
    pub const NAME: &'static str = "banner";

    pub fn new(banner: impl Into<String>) -> Self {
        Self {
            banner: banner.into(),
        }
    }

    fn from_options(options: &serde_json::Value) -> Result<Self, ConfigError> {
        let options = BannerOptions::deserialize(options).map_err(|e| ConfigError::InvalidPluginOptions {
            plugin: Self::NAME.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self::new(options.banner))
    }
}

impl Plugin for BannerPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut PluginContext<'_>) {
        let header = format!("/*! {} */\n", self.banner.replace("*/", "* /"));
        ctx.tap(HookKind::BeforeEmit, move |compilation| {
            for text in compilation.assets.values_mut() {
                text.insert_str(0, &header);
            }
        });
    }
}

/// Logs each lifecycle stage.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProgressPlugin;

impl ProgressPlugin {
    pub const NAME: &'static str = "progress";
}

impl Plugin for ProgressPlugin {
    fn name(&self) -> &str {
        Self::NAME
    }

    fn apply(&self, ctx: &mut PluginContext<'_>) {
        for kind in HookKind::ALL {
            ctx.tap(kind, move |compilation| match kind {
                HookKind::AfterCompile => info!(
                    stage = %kind,
                    modules = compilation.graph.len(),
                    "compiled"
                ),
                HookKind::AfterEmit => {
                    for path in compilation.assets.keys() {
                        info!(stage = %kind, path = %path.display(), "emitted");
                    }
                }
                _ => info!(stage = %kind, root = %compilation.root.display(), "progress"),
            });
        }
    }
}
