//! Canonical module names and path normalization
//!
//! A canonical module name is the module's path relative to the project root,
//! `/`-separated and prefixed with `./`, e.g. `./src/util/math.js`. It is the
//! only key a module is known by inside a bundle.

use std::path::{Component, Path, PathBuf};

/// Maps between absolute module paths and canonical module names.
#[derive(Debug, Clone)]
pub struct ModuleResolver {
    root: PathBuf,
}

impl ModuleResolver {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: clean_path(&root.into()),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Canonical name of the module at `path`.
    pub fn canonical_name(&self, path: &Path) -> String {
        let path = clean_path(&self.root.join(path));
        let relative = relative_path(&self.root, &path);
        format!("./{}", to_slash(&relative))
    }

    /// Absolute path of the module called `name`.
    pub fn resolve(&self, name: &str) -> PathBuf {
        clean_path(&self.root.join(name))
    }
}

/// Extension of the last path segment, dot included (`".js"`), or `""`.
///
/// A segment whose only dots are leading ones (`.env`, `..`) has no extension.
pub fn extname(specifier: &str) -> &str {
    let base = specifier.rsplit('/').next().unwrap_or(specifier);
    match base.rfind('.') {
        Some(dot) if !base[..dot].bytes().all(|b| b == b'.') => &base[dot..],
        _ => "",
    }
}

/// Directory part of a canonical name: `./src/a.js` -> `./src`, `./a.js` -> `.`.
pub fn dirname(name: &str) -> &str {
    match name.rfind('/') {
        Some(0) => "/",
        Some(slash) => &name[..slash],
        None => ".",
    }
}

/// Join `/`-separated segments, collapsing `.`, `..` and repeated separators.
/// An empty result is `"."`.
pub fn join(base: &str, path: &str) -> String {
    let absolute = base.starts_with('/');
    let mut segments: Vec<&str> = Vec::new();

    for segment in base.split('/').chain(path.split('/')) {
        match segment {
            "" | "." => {}
            ".." => match segments.last() {
                Some(&last) if last != ".." => {
                    segments.pop();
                }
                _ if absolute => {}
                _ => segments.push(".."),
            },
            other => segments.push(other),
        }
    }

    let joined = segments.join("/");
    match (absolute, joined.is_empty()) {
        (true, _) => format!("/{}", joined),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Canonical name for `specifier` as required from a module living in
/// `parent_dir` (itself a canonical directory such as `./src`).
///
/// Specifiers without an extension get `.js`. A specifier that climbs above
/// the root keeps its `..` segments: `./../x.js`.
pub fn canonical_specifier(parent_dir: &str, specifier: &str) -> String {
    let joined = if extname(specifier).is_empty() {
        join(parent_dir, &format!("{}.js", specifier))
    } else {
        join(parent_dir, specifier)
    };
    format!("./{}", joined.trim_start_matches('/'))
}

/// Lexically resolve `.` and `..` components.
fn clean_path(path: &Path) -> PathBuf {
    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}

/// `path` relative to `base`; both are already cleaned.
fn relative_path(base: &Path, path: &Path) -> PathBuf {
    if let Ok(stripped) = path.strip_prefix(base) {
        return stripped.to_path_buf();
    }

    let base_components: Vec<_> = base.components().collect();
    let path_components: Vec<_> = path.components().collect();
    let common = base_components
        .iter()
        .zip(&path_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..base_components.len() {
        relative.push("..");
    }
    for component in &path_components[common..] {
        relative.push(component.as_os_str());
    }
    relative
}

fn to_slash(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}
