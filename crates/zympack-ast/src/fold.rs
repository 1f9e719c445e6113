//! Owned tree transformation.
//!
//! A [`Fold`] consumes a tree and returns a new one. Override the hooks for the
//! node kinds you care about and call the matching `fold_*_children` function
//! to keep descending; every other node is rebuilt unchanged.

use super::*;

pub trait Fold {
    fn fold_program(&mut self, program: Program) -> Program {
        fold_program_children(self, program)
    }

    fn fold_stmt(&mut self, stmt: Node<Stmt>) -> Node<Stmt> {
        fold_stmt_children(self, stmt)
    }

    fn fold_expr(&mut self, expr: Node<Expr>) -> Node<Expr> {
        fold_expr_children(self, expr)
    }

    fn fold_pattern(&mut self, pattern: Node<Pattern>) -> Node<Pattern> {
        fold_pattern_children(self, pattern)
    }

    fn fold_function(&mut self, function: Function) -> Function {
        fold_function_children(self, function)
    }

    fn fold_class(&mut self, class: Class) -> Class {
        fold_class_children(self, class)
    }
}

pub fn fold_program_children<F: Fold + ?Sized>(f: &mut F, program: Program) -> Program {
    Program {
        hashbang: program.hashbang,
        body: fold_stmts(f, program.body),
        span: program.span,
    }
}

pub fn fold_stmt_children<F: Fold + ?Sized>(f: &mut F, stmt: Node<Stmt>) -> Node<Stmt> {
    let span = stmt.span;
    let value = match stmt.value {
        Stmt::Expr(expr) => Stmt::Expr(f.fold_expr(expr)),
        Stmt::VarDecl(decl) => Stmt::VarDecl(fold_var_decl(f, decl)),
        Stmt::FunctionDecl(function) => Stmt::FunctionDecl(f.fold_function(function)),
        Stmt::ClassDecl(class) => Stmt::ClassDecl(f.fold_class(class)),
        Stmt::Return(arg) => Stmt::Return(arg.map(|e| f.fold_expr(e))),
        Stmt::If {
            condition,
            then_stmt,
            else_stmt,
        } => Stmt::If {
            condition: f.fold_expr(condition),
            then_stmt: Box::new(f.fold_stmt(*then_stmt)),
            else_stmt: else_stmt.map(|s| Box::new(f.fold_stmt(*s))),
        },
        Stmt::For {
            init,
            condition,
            update,
            body,
        } => Stmt::For {
            init: init.map(|init| match init {
                ForInit::VarDecl(decl) => ForInit::VarDecl(fold_var_decl(f, decl)),
                ForInit::Expr(expr) => ForInit::Expr(f.fold_expr(expr)),
            }),
            condition: condition.map(|e| f.fold_expr(e)),
            update: update.map(|e| f.fold_expr(e)),
            body: Box::new(f.fold_stmt(*body)),
        },
        Stmt::ForIn { left, right, body } => Stmt::ForIn {
            left: fold_for_in_left(f, left),
            right: f.fold_expr(right),
            body: Box::new(f.fold_stmt(*body)),
        },
        Stmt::ForOf {
            left,
            right,
            body,
            is_await,
        } => Stmt::ForOf {
            left: fold_for_in_left(f, left),
            right: f.fold_expr(right),
            body: Box::new(f.fold_stmt(*body)),
            is_await,
        },
        Stmt::While { condition, body } => Stmt::While {
            condition: f.fold_expr(condition),
            body: Box::new(f.fold_stmt(*body)),
        },
        Stmt::DoWhile { body, condition } => Stmt::DoWhile {
            body: Box::new(f.fold_stmt(*body)),
            condition: f.fold_expr(condition),
        },
        Stmt::Block(block) => Stmt::Block(BlockStmt {
            stmts: fold_stmts(f, block.stmts),
        }),
        Stmt::Throw(expr) => Stmt::Throw(f.fold_expr(expr)),
        Stmt::Try {
            block,
            catch,
            finally,
        } => Stmt::Try {
            block: fold_block(f, block),
            catch: catch.map(|clause| CatchClause {
                param: clause.param.map(|p| f.fold_pattern(p)),
                body: fold_block(f, clause.body),
            }),
            finally: finally.map(|b| fold_block(f, b)),
        },
        Stmt::Switch {
            discriminant,
            cases,
        } => Stmt::Switch {
            discriminant: f.fold_expr(discriminant),
            cases: cases
                .into_iter()
                .map(|case| SwitchCase {
                    test: case.test.map(|e| f.fold_expr(e)),
                    consequent: fold_stmts(f, case.consequent),
                })
                .collect(),
        },
        Stmt::Labeled { label, stmt } => Stmt::Labeled {
            label,
            stmt: Box::new(f.fold_stmt(*stmt)),
        },
        other @ (Stmt::Break(_) | Stmt::Continue(_) | Stmt::Empty | Stmt::Debugger) => other,
    };
    Node::new(value, span)
}

pub fn fold_expr_children<F: Fold + ?Sized>(f: &mut F, expr: Node<Expr>) -> Node<Expr> {
    let span = expr.span;
    let value = match expr.value {
        Expr::Binary { left, op, right } => Expr::Binary {
            left: fold_boxed(f, left),
            op,
            right: fold_boxed(f, right),
        },
        Expr::Unary { op, expr } => Expr::Unary {
            op,
            expr: fold_boxed(f, expr),
        },
        Expr::Assignment { target, op, value } => Expr::Assignment {
            target: fold_boxed(f, target),
            op,
            value: fold_boxed(f, value),
        },
        Expr::Call { callee, args } => Expr::Call {
            callee: fold_boxed(f, callee),
            args: fold_exprs(f, args),
        },
        Expr::Member { object, property } => Expr::Member {
            object: fold_boxed(f, object),
            property,
        },
        Expr::Index { object, index } => Expr::Index {
            object: fold_boxed(f, object),
            index: fold_boxed(f, index),
        },
        Expr::Array(elements) => Expr::Array(
            elements
                .into_iter()
                .map(|e| e.map(|e| f.fold_expr(e)))
                .collect(),
        ),
        Expr::Object(properties) => Expr::Object(
            properties
                .into_iter()
                .map(|prop| fold_object_property(f, prop))
                .collect(),
        ),
        Expr::Arrow {
            params,
            body,
            is_async,
        } => Expr::Arrow {
            params: fold_params(f, params),
            body: match body {
                ArrowBody::Expr(e) => ArrowBody::Expr(fold_boxed(f, e)),
                ArrowBody::Block(b) => ArrowBody::Block(Box::new(fold_block(f, *b))),
            },
            is_async,
        },
        Expr::Function(function) => Expr::Function(Box::new(f.fold_function(*function))),
        Expr::Class(class) => Expr::Class(Box::new(f.fold_class(*class))),
        Expr::Ternary {
            condition,
            then_expr,
            else_expr,
        } => Expr::Ternary {
            condition: fold_boxed(f, condition),
            then_expr: fold_boxed(f, then_expr),
            else_expr: fold_boxed(f, else_expr),
        },
        Expr::Template { parts, exprs } => Expr::Template {
            parts,
            exprs: fold_exprs(f, exprs),
        },
        Expr::TaggedTemplate { tag, parts, exprs } => Expr::TaggedTemplate {
            tag: fold_boxed(f, tag),
            parts,
            exprs: fold_exprs(f, exprs),
        },
        Expr::New { callee, args } => Expr::New {
            callee: fold_boxed(f, callee),
            args: args.map(|args| fold_exprs(f, args)),
        },
        Expr::Await(e) => Expr::Await(fold_boxed(f, e)),
        Expr::Paren(e) => Expr::Paren(fold_boxed(f, e)),
        Expr::Sequence(exprs) => Expr::Sequence(fold_exprs(f, exprs)),
        Expr::Spread(e) => Expr::Spread(fold_boxed(f, e)),
        Expr::OptionalCall { callee, args } => Expr::OptionalCall {
            callee: fold_boxed(f, callee),
            args: fold_exprs(f, args),
        },
        Expr::OptionalIndex { object, index } => Expr::OptionalIndex {
            object: fold_boxed(f, object),
            index: fold_boxed(f, index),
        },
        Expr::OptionalMember { object, property } => Expr::OptionalMember {
            object: fold_boxed(f, object),
            property,
        },
        Expr::Yield { argument, delegate } => Expr::Yield {
            argument: argument.map(|a| fold_boxed(f, a)),
            delegate,
        },
        other @ (Expr::Literal(_)
        | Expr::Ident(_)
        | Expr::This
        | Expr::Super
        | Expr::MetaProperty { .. }) => other,
    };
    Node::new(value, span)
}

pub fn fold_pattern_children<F: Fold + ?Sized>(f: &mut F, pattern: Node<Pattern>) -> Node<Pattern> {
    let span = pattern.span;
    let value = match pattern.value {
        Pattern::Ident(name) => Pattern::Ident(name),
        Pattern::Array { elements, rest } => Pattern::Array {
            elements: elements
                .into_iter()
                .map(|p| p.map(|p| f.fold_pattern(p)))
                .collect(),
            rest: rest.map(|r| Box::new(f.fold_pattern(*r))),
        },
        Pattern::Object { properties, rest } => Pattern::Object {
            properties: properties
                .into_iter()
                .map(|prop| ObjectPatternProperty {
                    key: fold_property_name(f, prop.key),
                    value: f.fold_pattern(prop.value),
                    shorthand: prop.shorthand,
                })
                .collect(),
            rest: rest.map(|r| Box::new(f.fold_pattern(*r))),
        },
        Pattern::Assignment { pattern, default } => Pattern::Assignment {
            pattern: Box::new(f.fold_pattern(*pattern)),
            default: fold_boxed(f, default),
        },
    };
    Node::new(value, span)
}

pub fn fold_function_children<F: Fold + ?Sized>(f: &mut F, function: Function) -> Function {
    Function {
        name: function.name,
        params: fold_params(f, function.params),
        body: fold_block(f, function.body),
        is_async: function.is_async,
        is_generator: function.is_generator,
    }
}

pub fn fold_class_children<F: Fold + ?Sized>(f: &mut F, class: Class) -> Class {
    Class {
        name: class.name,
        extends: class.extends.map(|e| fold_boxed(f, e)),
        members: class
            .members
            .into_iter()
            .map(|member| match member {
                ClassMember::Constructor(function) => {
                    ClassMember::Constructor(Box::new(f.fold_function(*function)))
                }
                ClassMember::Method {
                    key,
                    kind,
                    function,
                    is_static,
                } => ClassMember::Method {
                    key: fold_property_name(f, key),
                    kind,
                    function: Box::new(f.fold_function(*function)),
                    is_static,
                },
                ClassMember::Property {
                    key,
                    value,
                    is_static,
                } => ClassMember::Property {
                    key: fold_property_name(f, key),
                    value: value.map(|v| f.fold_expr(v)),
                    is_static,
                },
                ClassMember::StaticBlock(block) => ClassMember::StaticBlock(fold_block(f, block)),
            })
            .collect(),
    }
}

// Helpers

fn fold_stmts<F: Fold + ?Sized>(f: &mut F, stmts: Vec<Node<Stmt>>) -> Vec<Node<Stmt>> {
    stmts.into_iter().map(|s| f.fold_stmt(s)).collect()
}

fn fold_exprs<F: Fold + ?Sized>(f: &mut F, exprs: Vec<Node<Expr>>) -> Vec<Node<Expr>> {
    exprs.into_iter().map(|e| f.fold_expr(e)).collect()
}

fn fold_boxed<F: Fold + ?Sized>(f: &mut F, expr: Box<Node<Expr>>) -> Box<Node<Expr>> {
    Box::new(f.fold_expr(*expr))
}

fn fold_block<F: Fold + ?Sized>(f: &mut F, block: Node<BlockStmt>) -> Node<BlockStmt> {
    block.map(|b| BlockStmt {
        stmts: fold_stmts(f, b.stmts),
    })
}

fn fold_params<F: Fold + ?Sized>(f: &mut F, params: Vec<Param>) -> Vec<Param> {
    params
        .into_iter()
        .map(|param| Param {
            pattern: f.fold_pattern(param.pattern),
            is_rest: param.is_rest,
        })
        .collect()
}

fn fold_var_decl<F: Fold + ?Sized>(f: &mut F, decl: VarDecl) -> VarDecl {
    VarDecl {
        kind: decl.kind,
        declarations: decl
            .declarations
            .into_iter()
            .map(|d| VarDeclarator {
                pattern: f.fold_pattern(d.pattern),
                init: d.init.map(|e| f.fold_expr(e)),
            })
            .collect(),
    }
}

fn fold_for_in_left<F: Fold + ?Sized>(f: &mut F, left: ForInLeft) -> ForInLeft {
    match left {
        ForInLeft::VarDecl(decl) => ForInLeft::VarDecl(fold_var_decl(f, decl)),
        ForInLeft::Pattern(p) => ForInLeft::Pattern(f.fold_pattern(p)),
    }
}

fn fold_property_name<F: Fold + ?Sized>(f: &mut F, key: PropertyName) -> PropertyName {
    match key {
        PropertyName::Computed(e) => PropertyName::Computed(fold_boxed(f, e)),
        other => other,
    }
}

fn fold_object_property<F: Fold + ?Sized>(f: &mut F, prop: ObjectProperty) -> ObjectProperty {
    match prop {
        ObjectProperty::Property {
            key,
            value,
            shorthand,
        } => ObjectProperty::Property {
            key: fold_property_name(f, key),
            value: f.fold_expr(value),
            shorthand,
        },
        ObjectProperty::Method {
            key,
            kind,
            function,
        } => ObjectProperty::Method {
            key: fold_property_name(f, key),
            kind,
            function: Box::new(f.fold_function(*function)),
        },
        ObjectProperty::Spread(e) => ObjectProperty::Spread(f.fold_expr(e)),
    }
}
