//! # Zympack Code Generator
//!
//! Prints a `zympack_ast::Program` back to JavaScript source text.
//!
//! The printer does not reason about operator precedence: parenthesized
//! expressions survive parsing as `Expr::Paren` nodes, so printing the tree
//! as-is reproduces the original grouping. Comments are not part of the tree
//! and are therefore not reproduced.

use zympack_ast::*;

mod expr;
mod stmt;

const INDENT: &str = "  ";

/// JavaScript source printer.
pub struct CodeGenerator {
    output: String,
    indent: usize,
}

impl CodeGenerator {
    pub fn new() -> Self {
        Self {
            output: String::new(),
            indent: 0,
        }
    }

    /// Print a whole program, one top-level statement per line.
    pub fn generate(mut self, program: &Program) -> String {
        if let Some(hashbang) = &program.hashbang {
            self.write(hashbang);
            self.output.push('\n');
        }

        for stmt in &program.body {
            self.write_stmt(stmt);
            self.output.push('\n');
        }

        self.output
    }

    /// Print a single expression.
    pub fn generate_expr(mut self, expr: &Node<Expr>) -> String {
        self.write_expr(expr);
        self.output
    }

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    /// Line break followed by the current indentation.
    fn newline(&mut self) {
        self.output.push('\n');
        for _ in 0..self.indent {
            self.output.push_str(INDENT);
        }
    }

    /// Write `items` separated by `, `.
    fn write_list<T>(&mut self, items: &[T], mut write_item: impl FnMut(&mut Self, &T)) {
        for (i, item) in items.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            write_item(self, item);
        }
    }
}

impl Default for CodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Tests
// =============================================================================
