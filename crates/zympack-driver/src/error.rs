//! Error types for configuration, transforms and bundling

use std::io;
use std::path::PathBuf;

use thiserror::Error;
use zympack_parser::ParseError;

/// Problems found while reading or resolving the bundler configuration.
///
/// All of these are reported before any module is read.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid loader rule pattern '{pattern}': {source}")]
    InvalidRulePattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("unknown transform '{0}'")]
    UnknownTransform(String),

    #[error("unknown plugin '{0}'")]
    UnknownPlugin(String),

    #[error("invalid options for plugin '{plugin}': {message}")]
    InvalidPluginOptions { plugin: String, message: String },
}

/// Failure reported by a loader transform.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{message}")]
pub struct TransformError {
    pub message: String,
}

impl TransformError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Build-fatal errors. Any of these aborts the build before the bundle is
/// written.
#[derive(Error, Debug)]
pub enum BundleError {
    #[error("syntax error in {module}: {}", first_message(.errors))]
    Parse {
        module: String,
        /// Module text as handed to the parser, for rendering diagnostics
        source_text: String,
        errors: Vec<ParseError>,
    },

    #[error("{}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("module not found: {specifier}{} ({})", importer_note(.importer), .path.display())]
    ModuleNotFound {
        specifier: String,
        importer: Option<String>,
        path: PathBuf,
    },

    #[error("transform '{transform}' failed on {}: {source}", .path.display())]
    Transform {
        transform: String,
        path: PathBuf,
        #[source]
        source: TransformError,
    },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("failed to render bundle: {0}")]
    Template(#[from] handlebars::RenderError),
}

impl BundleError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        BundleError::Io {
            path: path.into(),
            source,
        }
    }
}

fn first_message(errors: &[ParseError]) -> String {
    match errors {
        [] => "unknown error".to_string(),
        [only] => only.to_string(),
        [first, rest @ ..] => format!("{} (and {} more)", first, rest.len()),
    }
}

fn importer_note(importer: &Option<String>) -> String {
    importer
        .as_ref()
        .map(|name| format!(", required by {}", name))
        .unwrap_or_default()
}
