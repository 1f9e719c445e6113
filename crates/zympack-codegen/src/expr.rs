//! Expression, function and class printing

use super::*;

impl CodeGenerator {
    pub(crate) fn write_expr(&mut self, expr: &Node<Expr>) {
        match &expr.value {
            Expr::Literal(literal) => self.write_literal(literal),
            Expr::Ident(ident) => self.write(&ident.name),
            Expr::Binary { left, op, right } => {
                self.write_expr(left);
                self.write(&format!(" {} ", op));
                self.write_expr(right);
            }
            Expr::Unary { op, expr: operand } => self.write_unary(*op, operand),
            Expr::Assignment { target, op, value } => {
                self.write_expr(target);
                self.write(&format!(" {} ", op));
                self.write_expr(value);
            }
            Expr::Call { callee, args } => {
                self.write_expr(callee);
                self.write_arguments(args);
            }
            Expr::Member { object, property } => {
                self.write_expr(object);
                if is_integer_literal(object) {
                    self.write(" ");
                }
                self.write(".");
                self.write(&property.value.name);
            }
            Expr::Index { object, index } => {
                self.write_expr(object);
                self.write("[");
                self.write_expr(index);
                self.write("]");
            }
            Expr::Array(elements) => {
                self.write("[");
                self.write_list(elements, |g, element| {
                    if let Some(element) = element {
                        g.write_expr(element);
                    }
                });
                if matches!(elements.last(), Some(None)) {
                    self.write(",");
                }
                self.write("]");
            }
            Expr::Object(properties) => self.write_object(properties),
            Expr::Arrow {
                params,
                body,
                is_async,
            } => {
                if *is_async {
                    self.write("async ");
                }
                self.write_params(params);
                self.write(" => ");
                match body {
                    ArrowBody::Expr(expr) => self.write_expr(expr),
                    ArrowBody::Block(block) => self.write_block(&block.value),
                }
            }
            Expr::Function(function) => self.write_function(function),
            Expr::Class(class) => self.write_class(class),
            Expr::Ternary {
                condition,
                then_expr,
                else_expr,
            } => {
                self.write_expr(condition);
                self.write(" ? ");
                self.write_expr(then_expr);
                self.write(" : ");
                self.write_expr(else_expr);
            }
            Expr::Template { parts, exprs } => self.write_template(parts, exprs),
            Expr::TaggedTemplate { tag, parts, exprs } => {
                self.write_expr(tag);
                self.write_template(parts, exprs);
            }
            Expr::New { callee, args } => {
                self.write("new ");
                self.write_expr(callee);
                if let Some(args) = args {
                    self.write_arguments(args);
                }
            }
            Expr::Await(operand) => {
                self.write("await ");
                self.write_expr(operand);
            }
            Expr::Paren(inner) => {
                self.write("(");
                self.write_expr(inner);
                self.write(")");
            }
            Expr::This => self.write("this"),
            Expr::Super => self.write("super"),
            Expr::Sequence(exprs) => self.write_list(exprs, |g, expr| g.write_expr(expr)),
            Expr::Spread(inner) => {
                self.write("...");
                self.write_expr(inner);
            }
            Expr::OptionalCall { callee, args } => {
                self.write_expr(callee);
                self.write("?.");
                self.write_arguments(args);
            }
            Expr::OptionalIndex { object, index } => {
                self.write_expr(object);
                self.write("?.[");
                self.write_expr(index);
                self.write("]");
            }
            Expr::OptionalMember { object, property } => {
                self.write_expr(object);
                self.write("?.");
                self.write(&property.value.name);
            }
            Expr::MetaProperty { meta, property } => {
                self.write(&meta.value.name);
                self.write(".");
                self.write(&property.value.name);
            }
            Expr::Yield { argument, delegate } => {
                self.write(if *delegate { "yield*" } else { "yield" });
                if let Some(argument) = argument {
                    self.write(" ");
                    self.write_expr(argument);
                }
            }
        }
    }

    fn write_literal(&mut self, literal: &Literal) {
        match literal {
            Literal::Number(raw) => self.write(raw),
            Literal::BigInt(digits) => {
                self.write(digits);
                self.write("n");
            }
            Literal::String { value, raw } => match raw {
                Some(raw) => self.write(raw),
                None => {
                    let quoted =
                        serde_json::to_string(value).unwrap_or_else(|_| format!("{:?}", value));
                    self.write(&quoted);
                }
            },
            Literal::Boolean(value) => self.write(if *value { "true" } else { "false" }),
            Literal::Null => self.write("null"),
            Literal::RegExp { pattern, flags } => {
                self.write("/");
                self.write(pattern);
                self.write("/");
                self.write(flags);
            }
        }
    }

    fn write_unary(&mut self, op: UnaryOp, operand: &Node<Expr>) {
        if op.is_postfix() {
            self.write_expr(operand);
            self.write(&op.to_string());
            return;
        }

        self.write(&op.to_string());
        // `typeof x`, and `- -x` / `+ +x` must not fuse into one token
        let needs_space = op.is_keyword()
            || matches!(
                (op, &operand.value),
                (
                    UnaryOp::Minus,
                    Expr::Unary {
                        op: UnaryOp::Minus | UnaryOp::PreDecrement,
                        ..
                    }
                ) | (
                    UnaryOp::Plus,
                    Expr::Unary {
                        op: UnaryOp::Plus | UnaryOp::PreIncrement,
                        ..
                    }
                )
            );
        if needs_space {
            self.write(" ");
        }
        self.write_expr(operand);
    }

    fn write_arguments(&mut self, args: &[Node<Expr>]) {
        self.write("(");
        self.write_list(args, |g, arg| g.write_expr(arg));
        self.write(")");
    }

    /// Template literal parts are kept as written, escapes included.
    fn write_template(&mut self, parts: &[String], exprs: &[Node<Expr>]) {
        self.write("`");
        for (i, part) in parts.iter().enumerate() {
            self.write(part);
            if let Some(expr) = exprs.get(i) {
                self.write("${");
                self.write_expr(expr);
                self.write("}");
            }
        }
        self.write("`");
    }

    fn write_object(&mut self, properties: &[ObjectProperty]) {
        if properties.is_empty() {
            self.write("{}");
            return;
        }

        let multiline = properties.iter().any(|property| match property {
            ObjectProperty::Method { .. } => true,
            ObjectProperty::Property { value, .. } => matches!(
                value.value,
                Expr::Function(_) | Expr::Class(_) | Expr::Arrow { body: ArrowBody::Block(_), .. }
            ),
            ObjectProperty::Spread(_) => false,
        });

        if !multiline {
            self.write("{ ");
            self.write_list(properties, |g, property| g.write_object_property(property));
            self.write(" }");
            return;
        }

        self.write("{");
        self.indent += 1;
        for (i, property) in properties.iter().enumerate() {
            if i > 0 {
                self.write(",");
            }
            self.newline();
            self.write_object_property(property);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn write_object_property(&mut self, property: &ObjectProperty) {
        match property {
            // Shorthand values are the bare name or a `name = default` cover
            ObjectProperty::Property {
                value,
                shorthand: true,
                ..
            } => self.write_expr(value),
            ObjectProperty::Property { key, value, .. } => {
                self.write_property_name(key);
                self.write(": ");
                self.write_expr(value);
            }
            ObjectProperty::Method {
                key,
                kind,
                function,
            } => self.write_method(key, *kind, function),
            ObjectProperty::Spread(inner) => {
                self.write("...");
                self.write_expr(inner);
            }
        }
    }

    pub(crate) fn write_property_name(&mut self, key: &PropertyName) {
        match key {
            PropertyName::Ident(ident) => self.write(&ident.value.name),
            PropertyName::String(raw) | PropertyName::Number(raw) => self.write(raw),
            PropertyName::Computed(expr) => {
                self.write("[");
                self.write_expr(expr);
                self.write("]");
            }
        }
    }

    fn write_params(&mut self, params: &[Param]) {
        self.write("(");
        self.write_list(params, |g, param| {
            if param.is_rest {
                g.write("...");
            }
            g.write_pattern(&param.pattern);
        });
        self.write(")");
    }

    pub(crate) fn write_function(&mut self, function: &Function) {
        if function.is_async {
            self.write("async ");
        }
        self.write("function");
        if function.is_generator {
            self.write("*");
        }
        if let Some(name) = &function.name {
            self.write(" ");
            self.write(&name.value.name);
        }
        self.write_params(&function.params);
        self.write(" ");
        self.write_block(&function.body.value);
    }

    /// Object and class methods: modifiers, key, parameters and body.
    fn write_method(&mut self, key: &PropertyName, kind: MethodKind, function: &Function) {
        if function.is_async {
            self.write("async ");
        }
        if function.is_generator {
            self.write("*");
        }
        if kind != MethodKind::Method {
            self.write(&format!("{} ", kind));
        }
        self.write_property_name(key);
        self.write_params(&function.params);
        self.write(" ");
        self.write_block(&function.body.value);
    }

    pub(crate) fn write_class(&mut self, class: &Class) {
        self.write("class");
        if let Some(name) = &class.name {
            self.write(" ");
            self.write(&name.value.name);
        }
        if let Some(extends) = &class.extends {
            self.write(" extends ");
            self.write_expr(extends);
        }

        if class.members.is_empty() {
            self.write(" {}");
            return;
        }

        self.write(" {");
        self.indent += 1;
        for member in &class.members {
            self.newline();
            self.write_class_member(member);
        }
        self.indent -= 1;
        self.newline();
        self.write("}");
    }

    fn write_class_member(&mut self, member: &ClassMember) {
        match member {
            ClassMember::Constructor(function) => {
                self.write("constructor");
                self.write_params(&function.params);
                self.write(" ");
                self.write_block(&function.body.value);
            }
            ClassMember::Method {
                key,
                kind,
                function,
                is_static,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write_method(key, *kind, function);
            }
            ClassMember::Property {
                key,
                value,
                is_static,
            } => {
                if *is_static {
                    self.write("static ");
                }
                self.write_property_name(key);
                if let Some(value) = value {
                    self.write(" = ");
                    self.write_expr(value);
                }
                self.write(";");
            }
            ClassMember::StaticBlock(block) => {
                self.write("static ");
                self.write_block(&block.value);
            }
        }
    }
}

/// `1.toString()` would lex as a malformed number.
fn is_integer_literal(expr: &Node<Expr>) -> bool {
    match &expr.value {
        Expr::Literal(Literal::Number(raw)) => raw.bytes().all(|b| b.is_ascii_digit() || b == b'_'),
        _ => false,
    }
}
