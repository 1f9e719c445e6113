//! Lifecycle hooks
//!
//! Each hook holds an ordered list of taps. Calling a hook runs every tap in
//! registration order, synchronously, handing each the current compilation.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::compiler::Compilation;

/// The points of a build where plugins can run code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    /// All plugins have been applied; fires once, while the compiler is built
    AfterPlugins,
    BeforeRun,
    BeforeCompile,
    AfterCompile,
    /// The bundle has been rendered into `Compilation::assets` but not written
    BeforeEmit,
    AfterEmit,
}

impl HookKind {
    pub const ALL: [HookKind; 6] = [
        HookKind::AfterPlugins,
        HookKind::BeforeRun,
        HookKind::BeforeCompile,
        HookKind::AfterCompile,
        HookKind::BeforeEmit,
        HookKind::AfterEmit,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            HookKind::AfterPlugins => "afterPlugins",
            HookKind::BeforeRun => "beforeRun",
            HookKind::BeforeCompile => "beforeCompile",
            HookKind::AfterCompile => "afterCompile",
            HookKind::BeforeEmit => "beforeEmit",
            HookKind::AfterEmit => "afterEmit",
        }
    }
}

impl fmt::Display for HookKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

struct Tap {
    name: String,
    callback: Box<dyn FnMut(&mut Compilation)>,
}

/// The hook table of one compiler.
#[derive(Default)]
pub struct Hooks {
    taps: HashMap<HookKind, Vec<Tap>>,
}

impl Hooks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a callback to `kind`. `name` identifies the tap in logs.
    pub fn tap(
        &mut self,
        kind: HookKind,
        name: impl Into<String>,
        callback: impl FnMut(&mut Compilation) + 'static,
    ) {
        self.taps.entry(kind).or_default().push(Tap {
            name: name.into(),
            callback: Box::new(callback),
        });
    }

    /// Run every tap of `kind` in registration order.
    pub fn call(&mut self, kind: HookKind, compilation: &mut Compilation) {
        let Some(taps) = self.taps.get_mut(&kind) else {
            return;
        };
        for tap in taps {
            trace!(hook = %kind, tap = %tap.name, "calling tap");
            (tap.callback)(&mut *compilation);
        }
    }

    pub fn tap_count(&self, kind: HookKind) -> usize {
        self.taps.get(&kind).map_or(0, Vec::len)
    }
}

impl fmt::Debug for Hooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut map = f.debug_map();
        for kind in HookKind::ALL {
            let names: Vec<&str> = self
                .taps
                .get(&kind)
                .map(|taps| taps.iter().map(|tap| tap.name.as_str()).collect())
                .unwrap_or_default();
            map.entry(&kind.name(), &names);
        }
        map.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn test_taps_run_in_registration_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut hooks = Hooks::new();

        for name in ["first", "second", "third"] {
            let log = Rc::clone(&log);
            hooks.tap(HookKind::BeforeRun, name, move |_| log.borrow_mut().push(name));
        }
        let other = Rc::clone(&log);
        hooks.tap(HookKind::AfterEmit, "other", move |_| other.borrow_mut().push("other"));

        let mut compilation = Compilation::new("/project");
        hooks.call(HookKind::BeforeRun, &mut compilation);
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);

        hooks.call(HookKind::BeforeRun, &mut compilation);
        assert_eq!(log.borrow().len(), 6);
        assert_eq!(hooks.tap_count(HookKind::BeforeRun), 3);
    }

    #[test]
    fn test_calling_empty_hook_is_noop() {
        let mut hooks = Hooks::new();
        let mut compilation = Compilation::new("/project");
        hooks.call(HookKind::BeforeCompile, &mut compilation);
        assert_eq!(hooks.tap_count(HookKind::BeforeCompile), 0);
        assert!(compilation.assets.is_empty());
    }

    #[test]
    fn test_taps_can_mutate_compilation() {
        let mut hooks = Hooks::new();
        hooks.tap(HookKind::BeforeEmit, "stamp", |compilation| {
            for text in compilation.assets.values_mut() {
                text.push_str("// stamped\n");
            }
        });

        let mut compilation = Compilation::new("/project");
        compilation.assets.insert("/project/dist/bundle.js".into(), String::new());
        hooks.call(HookKind::BeforeEmit, &mut compilation);
        assert_eq!(compilation.assets[0], "// stamped\n");
    }
}
