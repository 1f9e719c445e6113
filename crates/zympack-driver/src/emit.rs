//! Bundle rendering and output

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use handlebars::Handlebars;
use serde::Serialize;
use tempfile::NamedTempFile;
use tracing::debug;

use crate::compiler::Compilation;
use crate::error::BundleError;
use crate::graph::ModuleGraph;
use crate::hooks::{HookKind, Hooks};

const BOOTSTRAP_TEMPLATE: &str = include_str!("../templates/bootstrap.js.hbs");

#[derive(Serialize)]
struct BundleContext<'a> {
    /// JSON-quoted entry name
    entry: String,
    modules: Vec<ModuleContext<'a>>,
}

#[derive(Serialize)]
struct ModuleContext<'a> {
    /// JSON-quoted canonical name
    name: String,
    source: &'a str,
}

/// Render the bundle text for `graph`.
pub fn render_bundle(graph: &ModuleGraph) -> Result<String, BundleError> {
    let context = BundleContext {
        entry: quote(graph.entry()),
        modules: graph
            .modules()
            .map(|(name, source)| ModuleContext {
                name: quote(name),
                source,
            })
            .collect(),
    };

    let mut handlebars = Handlebars::new();
    handlebars.register_escape_fn(handlebars::no_escape);
    Ok(handlebars.render_template(BOOTSTRAP_TEMPLATE, &context)?)
}

/// Render the compilation's graph to `output_file` and write every asset.
///
/// `BeforeEmit` taps see the rendered assets and may change them; nothing is
/// on disk until they have all run. Every asset is then written to a temp file
/// next to its destination, and only once all of them are written are they
/// renamed into place. `AfterEmit` fires after the last rename.
pub fn emit(
    compilation: &mut Compilation,
    hooks: &mut Hooks,
    output_file: &Path,
) -> Result<PathBuf, BundleError> {
    let bundle = render_bundle(&compilation.graph)?;
    compilation.assets.insert(output_file.to_path_buf(), bundle);

    hooks.call(HookKind::BeforeEmit, compilation);

    let mut staged = Vec::with_capacity(compilation.assets.len());
    for (path, text) in &compilation.assets {
        staged.push((path, stage(path, text)?));
    }
    for (path, file) in staged {
        file.persist(path).map_err(|e| BundleError::io(path, e.error))?;
        debug!(path = %path.display(), "wrote asset");
    }

    hooks.call(HookKind::AfterEmit, compilation);
    Ok(output_file.to_path_buf())
}

/// Write `text` to a temp file in the destination directory. Dropping the
/// file before it is persisted deletes it.
fn stage(path: &Path, text: &str) -> Result<NamedTempFile, BundleError> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(dir).map_err(|e| BundleError::io(dir, e))?;

    let mut file = NamedTempFile::new_in(dir).map_err(|e| BundleError::io(dir, e))?;
    file.write_all(text.as_bytes())
        .map_err(|e| BundleError::io(file.path(), e))?;
    Ok(file)
}

fn quote(name: &str) -> String {
    serde_json::to_string(name).unwrap_or_else(|_| format!("{:?}", name))
}
