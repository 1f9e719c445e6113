//! Dependency call rewriting
//!
//! Finds `require("...")` calls in a module, records the canonical name of
//! each required module, and points the call at the bundle's own loader.

use zympack_ast::fold::{fold_expr_children, Fold};
use zympack_ast::*;
use zympack_codegen::CodeGenerator;
use zympack_parser::ParseError;

use crate::resolver::canonical_specifier;

/// Name of the loader function every rewritten call targets.
pub const BUNDLE_REQUIRE: &str = "__zympack_require__";

/// A rewritten module and the modules it requires, in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    pub code: String,
    pub dependencies: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct Rewriter {
    callee: String,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::with_callee("require")
    }

    /// Rewrite calls to `callee` instead of `require`.
    pub fn with_callee(callee: impl Into<String>) -> Self {
        Self {
            callee: callee.into(),
        }
    }

    /// Parse `source`, rewrite its dependency calls and regenerate it.
    ///
    /// `parent_dir` is the canonical directory of the module (`./src`), used
    /// to resolve relative specifiers. A module with nothing to rewrite is
    /// returned as given, minus any `#!` line: the bundle wraps every module
    /// in a function, where a hashbang is a syntax error.
    pub fn rewrite(&self, source: &str, parent_dir: &str) -> Result<Rewritten, Vec<ParseError>> {
        let mut program = zympack_parser::parse(source)?;
        let body = match program.hashbang.take() {
            Some(hashbang) => source.get(hashbang.len()..).unwrap_or_default(),
            None => source,
        };
        let (program, dependencies) = self.rewrite_program(program, parent_dir);

        let code = if dependencies.is_empty() {
            body.to_string()
        } else {
            CodeGenerator::new().generate(&program)
        };

        Ok(Rewritten { code, dependencies })
    }

    pub fn rewrite_program(&self, program: Program, parent_dir: &str) -> (Program, Vec<String>) {
        let mut fold = RequireFold {
            callee: &self.callee,
            parent_dir,
            dependencies: Vec::new(),
        };
        let program = fold.fold_program(program);
        (program, fold.dependencies)
    }
}

impl Default for Rewriter {
    fn default() -> Self {
        Self::new()
    }
}

struct RequireFold<'a> {
    callee: &'a str,
    parent_dir: &'a str,
    dependencies: Vec<String>,
}

impl RequireFold<'_> {
    /// The specifier of a call eligible for rewriting.
    fn specifier<'e>(&self, callee: &Node<Expr>, args: &'e [Node<Expr>]) -> Option<&'e str> {
        match &callee.value {
            Expr::Ident(ident) if ident.name == self.callee => {}
            _ => return None,
        }
        match args.first().map(|arg| &arg.value) {
            Some(Expr::Literal(literal)) => literal.as_str(),
            _ => None,
        }
    }
}

impl Fold for RequireFold<'_> {
    fn fold_expr(&mut self, expr: Node<Expr>) -> Node<Expr> {
        let expr = fold_expr_children(self, expr);

        let Expr::Call { callee, args } = &expr.value else {
            return expr;
        };
        let Some(specifier) = self.specifier(callee, args) else {
            return expr;
        };

        let name = canonical_specifier(self.parent_dir, specifier);
        self.dependencies.push(name.clone());

        let callee = Node::new(Expr::Ident(Ident::new(BUNDLE_REQUIRE)), callee.span);
        let arg = Node::new(Expr::Literal(Literal::string(name)), args[0].span);
        Node::new(
            Expr::Call {
                callee: Box::new(callee),
                args: vec![arg],
            },
            expr.span,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rewrites_require_calls() {
        let rewritten = Rewriter::new()
            .rewrite("var a = require('./b.js');\nconst c = require(\"./lib/c\");", ".")
            .unwrap();
        assert_eq!(rewritten.dependencies, vec!["./b.js", "./lib/c.js"]);
        assert_eq!(
            rewritten.code,
            "var a = __zympack_require__(\"./b.js\");\nconst c = __zympack_require__(\"./lib/c.js\");\n"
        );
    }

    #[test]
    fn test_drops_hashbang() {
        let rewriter = Rewriter::new();

        let rewritten = rewriter
            .rewrite("#!/usr/bin/env node\nconsole.log(require('./b'));", ".")
            .unwrap();
        assert_eq!(rewritten.code, "console.log(__zympack_require__(\"./b.js\"));\n");

        // Unchanged text keeps its line count
        let rewritten = rewriter.rewrite("#!/usr/bin/env node\n// leaf\nmodule.exports = 1;", ".").unwrap();
        assert_eq!(rewritten.code, "\n// leaf\nmodule.exports = 1;");
        assert!(rewritten.dependencies.is_empty());
    }

    #[test]
    fn test_resolves_against_parent_dir() {
        let rewritten = Rewriter::new()
            .rewrite("module.exports = require('../shared/log')('x');", "./src/app")
            .unwrap();
        assert_eq!(rewritten.dependencies, vec!["./src/shared/log.js"]);
        assert_eq!(
            rewritten.code,
            "module.exports = __zympack_require__(\"./src/shared/log.js\")('x');\n"
        );
    }

    #[test]
    fn test_nested_and_duplicate_dependencies_in_order() {
        let source = r#"
            function load() {
                return [require('./a'), () => require('./b'), require('./a')];
            }
            if (x) { require('./c'); }
        "#;
        let rewritten = Rewriter::new().rewrite(source, ".").unwrap();
        assert_eq!(
            rewritten.dependencies,
            vec!["./a.js", "./b.js", "./a.js", "./c.js"]
        );
        assert!(!rewritten.code.contains("require("));
    }

    #[test]
    fn test_ineligible_calls_are_left_alone() {
        let source = "require(name);\nrequire();\nobj.require('./x');\nrequire(`./t`);\n";
        let rewritten = Rewriter::new().rewrite(source, ".").unwrap();
        assert!(rewritten.dependencies.is_empty());
        // Nothing rewritten: text comes back untouched, comments and all
        assert_eq!(rewritten.code, source);

        let with_comment = "// entry\nconsole.log(1)";
        assert_eq!(Rewriter::new().rewrite(with_comment, ".").unwrap().code, with_comment);
    }

    #[test]
    fn test_extra_arguments_are_dropped() {
        let rewritten = Rewriter::new().rewrite("require('./a', 1, 2);", ".").unwrap();
        assert_eq!(rewritten.code, "__zympack_require__(\"./a.js\");\n");
    }

    #[test]
    fn test_custom_callee() {
        let rewritten = Rewriter::with_callee("load")
            .rewrite("load('./a'); require('./b');", ".")
            .unwrap();
        assert_eq!(rewritten.dependencies, vec!["./a.js"]);
        assert!(rewritten.code.contains("require('./b')"));
    }

    #[test]
    fn test_rewrite_program_is_pure() {
        let program = zympack_parser::parse("require('./a');").unwrap();
        let (first, deps_a) = Rewriter::new().rewrite_program(program.clone(), ".");
        let (second, deps_b) = Rewriter::new().rewrite_program(program, ".");
        assert_eq!(first, second);
        assert_eq!(deps_a, deps_b);

        let Stmt::Expr(expr) = &first.body[0].value else {
            panic!("Expected expression statement");
        };
        let Expr::Call { callee, args } = &expr.value else {
            panic!("Expected call");
        };
        assert_eq!(callee.value, Expr::Ident(Ident::new(BUNDLE_REQUIRE)));
        assert_eq!(args[0].value, Expr::Literal(Literal::string("./a.js")));
    }

    #[test]
    fn test_syntax_errors_are_returned() {
        let errors = Rewriter::new().rewrite("var = ;", ".").unwrap_err();
        assert!(!errors.is_empty());
    }
}
