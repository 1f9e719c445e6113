//! Statement printing

use super::*;

impl CodeGenerator {
    /// Write a statement at the current position, without a trailing newline.
    pub(crate) fn write_stmt(&mut self, stmt: &Node<Stmt>) {
        match &stmt.value {
            Stmt::Expr(expr) => {
                self.write_expr(expr);
                self.write(";");
            }
            Stmt::VarDecl(decl) => {
                self.write_var_decl(decl);
                self.write(";");
            }
            Stmt::FunctionDecl(function) => self.write_function(function),
            Stmt::ClassDecl(class) => self.write_class(class),
            Stmt::Return(value) => {
                self.write("return");
                if let Some(value) = value {
                    self.write(" ");
                    self.write_expr(value);
                }
                self.write(";");
            }
            Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                self.write("if (");
                self.write_expr(condition);
                self.write(")");
                self.write_body(then_stmt);

                if let Some(else_stmt) = else_stmt {
                    self.write_continuation(then_stmt, "else");
                    if matches!(else_stmt.value, Stmt::If { .. }) {
                        self.write(" ");
                        self.write_stmt(else_stmt);
                    } else {
                        self.write_body(else_stmt);
                    }
                }
            }
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => {
                self.write("for (");
                match init {
                    Some(ForInit::VarDecl(decl)) => self.write_var_decl(decl),
                    Some(ForInit::Expr(expr)) => self.write_expr(expr),
                    None => {}
                }
                self.write(";");
                if let Some(condition) = condition {
                    self.write(" ");
                    self.write_expr(condition);
                }
                self.write(";");
                if let Some(update) = update {
                    self.write(" ");
                    self.write_expr(update);
                }
                self.write(")");
                self.write_body(body);
            }
            Stmt::ForIn { left, right, body } => {
                self.write("for (");
                self.write_for_in_left(left);
                self.write(" in ");
                self.write_expr(right);
                self.write(")");
                self.write_body(body);
            }
            Stmt::ForOf {
                left,
                right,
                body,
                is_await,
            } => {
                self.write(if *is_await { "for await (" } else { "for (" });
                self.write_for_in_left(left);
                self.write(" of ");
                self.write_expr(right);
                self.write(")");
                self.write_body(body);
            }
            Stmt::While { condition, body } => {
                self.write("while (");
                self.write_expr(condition);
                self.write(")");
                self.write_body(body);
            }
            Stmt::DoWhile { body, condition } => {
                self.write("do");
                self.write_body(body);
                self.write_continuation(body, "while (");
                self.write_expr(condition);
                self.write(");");
            }
            Stmt::Block(block) => self.write_block(block),
            Stmt::Break(label) => self.write_jump("break", label.as_ref()),
            Stmt::Continue(label) => self.write_jump("continue", label.as_ref()),
            Stmt::Throw(value) => {
                self.write("throw ");
                self.write_expr(value);
                self.write(";");
            }
            Stmt::Try {
                block,
                catch,
                finally,
            } => {
                self.write("try ");
                self.write_block(&block.value);
                if let Some(catch) = catch {
                    self.write(" catch ");
                    if let Some(param) = &catch.param {
                        self.write("(");
                        self.write_pattern(param);
                        self.write(") ");
                    }
                    self.write_block(&catch.body.value);
                }
                if let Some(finally) = finally {
                    self.write(" finally ");
                    self.write_block(&finally.value);
                }
            }
            Stmt::Switch {
                discriminant,
                cases,
            } => {
                self.write("switch (");
                self.write_expr(discriminant);
                self.write(") {");
                self.indent += 1;
                for case in cases {
                    self.newline();
                    match &case.test {
                        Some(test) => {
                            self.write("case ");
                            self.write_expr(test);
                            self.write(":");
                        }
                        None => self.write("default:"),
                    }
                    self.indent += 1;
                    for stmt in &case.consequent {
                        self.newline();
                        self.write_stmt(stmt);
                    }
                    self.indent -= 1;
                }
                self.indent -= 1;
                if !cases.is_empty() {
                    self.newline();
                }
                self.write("}");
            }
            Stmt::Labeled { label, stmt } => {
                self.write(&label.value.name);
                self.write(": ");
                self.write_stmt(stmt);
            }
            Stmt::Empty => self.write(";"),
            Stmt::Debugger => self.write("debugger;"),
        }
    }

    /// `{}` or a multi-line block at the current indentation.
    pub(crate) fn write_block(&mut self, block: &BlockStmt) {
        if block.stmts.is_empty() {
            self.write("{}");
            return;
        }

        self.write("{");
        self.indent += 1;
        for stmt in &block.stmts {
            self.newline();
            self.write_stmt(stmt);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    /// Body of a compound statement: ` { ... }` for blocks, otherwise the
    /// statement on its own indented line.
    fn write_body(&mut self, body: &Node<Stmt>) {
        match &body.value {
            Stmt::Block(block) => {
                self.write(" ");
                self.write_block(block);
            }
            Stmt::Empty => self.write(";"),
            _ => {
                self.indent += 1;
                self.newline();
                self.write_stmt(body);
                self.indent -= 1;
            }
        }
    }

    /// Keyword following a body (`else`, the `while` of a do-while): on the
    /// closing brace's line after a block, on a fresh line otherwise.
    fn write_continuation(&mut self, body: &Node<Stmt>, keyword: &str) {
        match body.value {
            Stmt::Block(_) => self.write(" "),
            Stmt::Empty => self.write(" "),
            _ => self.newline(),
        }
        self.write(keyword);
    }

    pub(crate) fn write_var_decl(&mut self, decl: &VarDecl) {
        self.write(&decl.kind.to_string());
        self.write(" ");
        self.write_list(&decl.declarations, |g, declarator| {
            g.write_pattern(&declarator.pattern);
            if let Some(init) = &declarator.init {
                g.write(" = ");
                g.write_expr(init);
            }
        });
    }

    fn write_for_in_left(&mut self, left: &ForInLeft) {
        match left {
            ForInLeft::VarDecl(decl) => self.write_var_decl(decl),
            ForInLeft::Pattern(pattern) => self.write_pattern(pattern),
        }
    }

    fn write_jump(&mut self, keyword: &str, label: Option<&Node<Ident>>) {
        self.write(keyword);
        if let Some(label) = label {
            self.write(" ");
            self.write(&label.value.name);
        }
        self.write(";");
    }

    pub(crate) fn write_pattern(&mut self, pattern: &Node<Pattern>) {
        match &pattern.value {
            Pattern::Ident(ident) => self.write(&ident.value.name),
            Pattern::Array { elements, rest } => {
                self.write("[");
                self.write_list(elements, |g, element| {
                    if let Some(element) = element {
                        g.write_pattern(element);
                    }
                });
                if let Some(rest) = rest {
                    if !elements.is_empty() {
                        self.write(", ");
                    }
                    self.write("...");
                    self.write_pattern(rest);
                } else if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Pattern::Object { properties, rest } => {
                if properties.is_empty() && rest.is_none() {
                    self.write("{}");
                    return;
                }

                self.write("{ ");
                self.write_list(properties, |g, property| {
                    if !property.shorthand {
                        g.write_property_name(&property.key);
                        g.write(": ");
                    }
                    g.write_pattern(&property.value);
                });
                if let Some(rest) = rest {
                    if !properties.is_empty() {
                        self.write(", ");
                    }
                    self.write("...");
                    self.write_pattern(rest);
                }
                self.write(" }");
            }
            Pattern::Assignment { pattern, default } => {
                self.write_pattern(pattern);
                self.write(" = ");
                self.write_expr(default);
            }
        }
    }
}
