//! Walks an `oxc_ast` parse tree once and builds the owned
//! `fieldcg::ast::Program` the core analysis consumes.
//!
//! One recursive-descent method per external node kind, matching on the
//! external enum and constructing the internal equivalent directly, with
//! no intermediate representation.
//! A handful of rarely-used forms (decorators, TypeScript type annotations,
//! JSX, `BigInt` literals) have no fieldcg equivalent; those are dropped
//! with an entry pushed to `diagnostics` rather than failing the file.

use oxc_ast::ast as oxc;
use oxc_span::GetSpan;

use fieldcg::ast::{
    ArrayElement, AssignTarget, CatchClause, ClassDecl, ClassMember, ClassMemberKind, Declarator,
    Expr, ExprKind, ExportDecl, ExportKind, ExportSpecifier, ForHead, Function, FunctionBody,
    ImportDecl, ImportSpecifier, Literal, ObjectPatternProp, ObjectProp, Pattern, Program, PropKey,
    Span, Stmt, StmtKind, SwitchCase, VarDecl, VarDeclKind,
};
use fieldcg::ids::NodeIdGen;

/// Maps UTF-8 byte offsets within a source string to 0-based (row, column)
/// pairs, built once per file. `line_offset` shifts every row by the number
/// of lines the source sat below in its original file (non-zero only for a
/// Vue SFC's extracted `<script>` body), so positions stay correct relative
/// to the file the user actually opens, not the substring fieldcg parsed.
struct LineIndex {
    line_starts: Vec<u32>,
    line_offset: u32,
}

impl LineIndex {
    fn new(source: &str, line_offset: u32) -> Self {
        let mut line_starts = vec![0u32];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(u32::try_from(i + 1).unwrap_or(u32::MAX));
            }
        }
        Self { line_starts, line_offset }
    }

    fn locate(&self, byte: u32) -> (u32, u32) {
        let line = self.line_starts.partition_point(|&start| start <= byte).saturating_sub(1);
        let col = byte - self.line_starts[line];
        (u32::try_from(line).unwrap_or(u32::MAX) + self.line_offset, col)
    }
}

pub struct Converter<'d> {
    ids: NodeIdGen,
    diagnostics: &'d mut Vec<String>,
    file_name: String,
    lines: LineIndex,
}

impl<'d> Converter<'d> {
    #[must_use]
    pub fn new(file_name: String, source: &str, line_offset: u32, diagnostics: &'d mut Vec<String>) -> Self {
        Self { ids: NodeIdGen::new(), diagnostics, file_name, lines: LineIndex::new(source, line_offset) }
    }

    fn span(&self, s: oxc_span::Span) -> Span {
        let (start_row, start_col) = self.lines.locate(s.start);
        let (end_row, end_col) = self.lines.locate(s.end);
        Span { start_byte: s.start, end_byte: s.end, start_row, start_col, end_row, end_col }
    }

    fn unsupported(&mut self, what: &str, s: oxc_span::Span) {
        self.diagnostics.push(format!(
            "{}: unsupported construct ({what}) at byte {}..{}",
            self.file_name, s.start, s.end
        ));
    }

    fn placeholder_expr(&mut self, s: oxc_span::Span) -> Expr {
        let span = self.span(s);
        Expr { id: self.ids.next_id(), span, kind: ExprKind::Literal(Literal::Undefined) }
    }

    pub fn convert_program(&mut self, program: &oxc::Program<'_>) -> Program {
        let id = self.ids.next_id();
        let body = program.body.iter().filter_map(|stmt| self.convert_stmt(stmt)).collect();
        let span = self.span(program.span);
        Program { id, span, body }
    }

    fn convert_stmt_block(&mut self, stmts: &oxc_allocator::Vec<'_, oxc::Statement<'_>>) -> Vec<Stmt> {
        stmts.iter().filter_map(|s| self.convert_stmt(s)).collect()
    }

    fn convert_stmt(&mut self, stmt: &oxc::Statement<'_>) -> Option<Stmt> {
        let id = self.ids.next_id();
        let s = stmt.span();
        let kind = match stmt {
            oxc::Statement::ExpressionStatement(e) => StmtKind::Expr(self.convert_expr(&e.expression)),
            oxc::Statement::VariableDeclaration(d) => StmtKind::VarDecl(self.convert_var_decl(d)),
            oxc::Statement::FunctionDeclaration(f) => StmtKind::FunctionDecl(self.convert_function(f)),
            oxc::Statement::ClassDeclaration(c) => StmtKind::ClassDecl(self.convert_class(c)),
            oxc::Statement::ReturnStatement(r) => {
                StmtKind::Return(r.argument.as_ref().map(|e| self.convert_expr(e)))
            }
            oxc::Statement::IfStatement(i) => {
                let test = self.convert_expr(&i.test);
                let cons = Box::new(self.convert_stmt(&i.consequent)?);
                let alt = i.alternate.as_ref().and_then(|a| self.convert_stmt(a)).map(Box::new);
                StmtKind::If { test, cons, alt }
            }
            oxc::Statement::BlockStatement(b) => StmtKind::Block(self.convert_stmt_block(&b.body)),
            oxc::Statement::ForStatement(f) => {
                let init = f.init.as_ref().and_then(|init| self.convert_for_init(init));
                let test = f.test.as_ref().map(|e| self.convert_expr(e));
                let update = f.update.as_ref().map(|e| self.convert_expr(e));
                let body = Box::new(self.convert_stmt(&f.body)?);
                StmtKind::For { init, test, update, body }
            }
            oxc::Statement::ForInStatement(f) => {
                let left = self.convert_for_head(&f.left);
                let right = self.convert_expr(&f.right);
                let body = Box::new(self.convert_stmt(&f.body)?);
                StmtKind::ForIn { left, right, body, of: false }
            }
            oxc::Statement::ForOfStatement(f) => {
                let left = self.convert_for_head(&f.left);
                let right = self.convert_expr(&f.right);
                let body = Box::new(self.convert_stmt(&f.body)?);
                StmtKind::ForIn { left, right, body, of: true }
            }
            oxc::Statement::WhileStatement(w) => {
                let test = self.convert_expr(&w.test);
                let body = Box::new(self.convert_stmt(&w.body)?);
                StmtKind::While { test, body }
            }
            oxc::Statement::DoWhileStatement(d) => {
                let body = Box::new(self.convert_stmt(&d.body)?);
                let test = self.convert_expr(&d.test);
                StmtKind::DoWhile { body, test }
            }
            oxc::Statement::TryStatement(t) => {
                let block = self.convert_stmt_block(&t.block.body);
                let handler = t.handler.as_ref().map(|h| {
                    let param = h.param.as_ref().map(|p| self.convert_pattern(&p.pattern));
                    let body = self.convert_stmt_block(&h.body.body);
                    CatchClause { id: self.ids.next_id(), param, body }
                });
                let finalizer = t.finalizer.as_ref().map(|f| self.convert_stmt_block(&f.body));
                StmtKind::Try { block, handler, finalizer }
            }
            oxc::Statement::ThrowStatement(t) => StmtKind::Throw(self.convert_expr(&t.argument)),
            oxc::Statement::SwitchStatement(sw) => {
                let discriminant = self.convert_expr(&sw.discriminant);
                let cases = sw
                    .cases
                    .iter()
                    .map(|c| SwitchCase {
                        test: c.test.as_ref().map(|e| self.convert_expr(e)),
                        body: self.convert_stmt_block(&c.consequent),
                    })
                    .collect();
                StmtKind::Switch { discriminant, cases }
            }
            oxc::Statement::LabeledStatement(l) => {
                let body = Box::new(self.convert_stmt(&l.body)?);
                StmtKind::Labeled { label: l.label.name.to_string(), body }
            }
            oxc::Statement::BreakStatement(b) => {
                StmtKind::Break(b.label.as_ref().map(|l| l.name.to_string()))
            }
            oxc::Statement::ContinueStatement(c) => {
                StmtKind::Continue(c.label.as_ref().map(|l| l.name.to_string()))
            }
            oxc::Statement::ImportDeclaration(i) => StmtKind::Import(self.convert_import(i)),
            oxc::Statement::ExportNamedDeclaration(e) => StmtKind::Export(self.convert_export_named(e)),
            oxc::Statement::ExportDefaultDeclaration(e) => {
                StmtKind::Export(self.convert_export_default(e))
            }
            oxc::Statement::ExportAllDeclaration(e) => StmtKind::Export(ExportDecl {
                id: self.ids.next_id(),
                kind: ExportKind::All { source: e.source.value.to_string() },
            }),
            oxc::Statement::EmptyStatement(_) => StmtKind::Empty,
            other => {
                self.unsupported("statement", other.span());
                StmtKind::Empty
            }
        };
        let span = self.span(s);
        Some(Stmt { id, span, kind })
    }

    fn convert_for_init(&mut self, init: &oxc::ForStatementInit<'_>) -> Option<Box<Stmt>> {
        let id = self.ids.next_id();
        let kind = match init {
            oxc::ForStatementInit::VariableDeclaration(d) => StmtKind::VarDecl(self.convert_var_decl(d)),
            expr => StmtKind::Expr(self.convert_expr(expr.to_expression())),
        };
        Some(Box::new(Stmt { id, span: Span::dummy(), kind }))
    }

    fn convert_for_head(&mut self, left: &oxc::ForStatementLeft<'_>) -> ForHead {
        match left {
            oxc::ForStatementLeft::VariableDeclaration(d) => ForHead::VarDecl(self.convert_var_decl(d)),
            assignment_target => {
                ForHead::Pattern(self.convert_assignment_target_as_pattern(assignment_target.to_assignment_target()))
            }
        }
    }

    fn convert_var_decl(&mut self, decl: &oxc::VariableDeclaration<'_>) -> VarDecl {
        let kind = match decl.kind {
            oxc::VariableDeclarationKind::Var => VarDeclKind::Var,
            oxc::VariableDeclarationKind::Let => VarDeclKind::Let,
            oxc::VariableDeclarationKind::Const => VarDeclKind::Const,
            oxc::VariableDeclarationKind::Using | oxc::VariableDeclarationKind::AwaitUsing => {
                self.unsupported("using declaration", decl.span);
                VarDeclKind::Let
            }
        };
        let declarators = decl
            .declarations
            .iter()
            .map(|d| Declarator {
                id: self.ids.next_id(),
                name: self.convert_pattern(&d.id),
                init: d.init.as_ref().map(|e| self.convert_expr(e)),
            })
            .collect();
        VarDecl { id: self.ids.next_id(), kind, declarators }
    }

    /// Converts a formal-parameter list, appending a trailing `Pattern::Rest`
    /// for `...rest` when present — oxc keeps the rest element in a separate
    /// field rather than as the last `items` entry.
    fn convert_params(&mut self, params: &oxc::FormalParameters<'_>) -> Vec<Pattern> {
        let mut out: Vec<Pattern> =
            params.items.iter().map(|p| self.convert_pattern(&p.pattern)).collect();
        if let Some(rest) = &params.rest {
            let id = self.ids.next_id();
            let argument = Box::new(self.convert_pattern(&rest.argument));
            out.push(Pattern::Rest { id, argument });
        }
        out
    }

    fn convert_function(&mut self, f: &oxc::Function<'_>) -> Function {
        let id = self.ids.next_id();
        let params = self.convert_params(&f.params);
        let body = match &f.body {
            Some(b) => FunctionBody::Block(self.convert_stmt_block(&b.statements)),
            None => FunctionBody::Block(Vec::new()),
        };
        let span = self.span(f.span);
        Function {
            id,
            span,
            name: f.id.as_ref().map(|b| b.name.to_string()),
            params,
            body,
            is_arrow: false,
            is_async: f.r#async,
            is_generator: f.generator,
        }
    }

    fn convert_arrow(&mut self, f: &oxc::ArrowFunctionExpression<'_>) -> Function {
        let id = self.ids.next_id();
        let params = self.convert_params(&f.params);
        let body = if f.expression {
            match f.body.statements.first() {
                Some(oxc::Statement::ExpressionStatement(e)) => {
                    FunctionBody::Expr(Box::new(self.convert_expr(&e.expression)))
                }
                _ => FunctionBody::Block(self.convert_stmt_block(&f.body.statements)),
            }
        } else {
            FunctionBody::Block(self.convert_stmt_block(&f.body.statements))
        };
        let span = self.span(f.span);
        Function {
            id,
            span,
            name: None,
            params,
            body,
            is_arrow: true,
            is_async: f.r#async,
            is_generator: false,
        }
    }

    fn convert_class(&mut self, c: &oxc::Class<'_>) -> ClassDecl {
        let id = self.ids.next_id();
        let super_class = c.super_class.as_ref().map(|e| Box::new(self.convert_expr(e)));
        let members = c
            .body
            .body
            .iter()
            .filter_map(|member| self.convert_class_member(member))
            .collect();
        let span = self.span(c.span);
        ClassDecl { id, span, name: c.id.as_ref().map(|b| b.name.to_string()), super_class, members }
    }

    fn convert_class_member(&mut self, member: &oxc::ClassElement<'_>) -> Option<ClassMember> {
        let id = self.ids.next_id();
        match member {
            oxc::ClassElement::MethodDefinition(m) => {
                let kind = match m.kind {
                    oxc::MethodDefinitionKind::Constructor => ClassMemberKind::Constructor,
                    oxc::MethodDefinitionKind::Method => ClassMemberKind::Method,
                    oxc::MethodDefinitionKind::Get => ClassMemberKind::Get,
                    oxc::MethodDefinitionKind::Set => ClassMemberKind::Set,
                };
                let (key, computed) = self.convert_property_key(&m.key, m.computed);
                let function = self.convert_function(&m.value);
                Some(ClassMember {
                    id,
                    key,
                    computed,
                    kind,
                    is_static: m.r#static,
                    value: Some(function),
                    field_init: None,
                })
            }
            oxc::ClassElement::PropertyDefinition(p) => {
                let (key, computed) = self.convert_property_key(&p.key, p.computed);
                Some(ClassMember {
                    id,
                    key,
                    computed,
                    kind: ClassMemberKind::Field,
                    is_static: p.r#static,
                    value: None,
                    field_init: p.value.as_ref().map(|e| self.convert_expr(e)),
                })
            }
            other => {
                self.unsupported("class member", other.span());
                None
            }
        }
    }

    fn convert_property_key(&mut self, key: &oxc::PropertyKey<'_>, computed: bool) -> (PropKey, bool) {
        if computed {
            let expr = match key.as_expression() {
                Some(e) => self.convert_expr(e),
                None => self.placeholder_expr(key.span()),
            };
            return (PropKey::Computed(Box::new(expr)), true);
        }
        match key {
            oxc::PropertyKey::StaticIdentifier(id) => (PropKey::Identifier(id.name.to_string()), false),
            oxc::PropertyKey::PrivateIdentifier(id) => (PropKey::Identifier(id.name.to_string()), false),
            _ => match key.as_expression() {
                Some(oxc::Expression::StringLiteral(s)) => (PropKey::StringLit(s.value.to_string()), false),
                Some(oxc::Expression::NumericLiteral(n)) => (PropKey::NumberLit(n.value), false),
                Some(e) => (PropKey::Computed(Box::new(self.convert_expr(e))), true),
                None => (PropKey::Computed(Box::new(self.placeholder_expr(key.span()))), true),
            },
        }
    }

    fn convert_import(&mut self, i: &oxc::ImportDeclaration<'_>) -> ImportDecl {
        let id = self.ids.next_id();
        let source = i.source.value.to_string();
        let specifiers = i
            .specifiers
            .as_ref()
            .map(|specs| {
                specs
                    .iter()
                    .map(|spec| match spec {
                        oxc::ImportDeclarationSpecifier::ImportDefaultSpecifier(d) => {
                            ImportSpecifier::Default { id: self.ids.next_id(), local: d.local.name.to_string() }
                        }
                        oxc::ImportDeclarationSpecifier::ImportNamespaceSpecifier(n) => {
                            ImportSpecifier::Namespace { id: self.ids.next_id(), local: n.local.name.to_string() }
                        }
                        oxc::ImportDeclarationSpecifier::ImportSpecifier(s) => ImportSpecifier::Named {
                            id: self.ids.next_id(),
                            imported: s.imported.name().to_string(),
                            local: s.local.name.to_string(),
                        },
                    })
                    .collect()
            })
            .unwrap_or_default();
        ImportDecl { id, specifiers, source }
    }

    fn convert_export_named(&mut self, e: &oxc::ExportNamedDeclaration<'_>) -> ExportDecl {
        let id = self.ids.next_id();
        if let Some(decl) = &e.declaration {
            let inner = self.convert_declaration_as_stmt(decl);
            return ExportDecl { id, kind: ExportKind::Decl(Box::new(inner)) };
        }
        let specifiers = e
            .specifiers
            .iter()
            .map(|s| ExportSpecifier {
                local: s.local.name().to_string(),
                exported: s.exported.name().to_string(),
            })
            .collect();
        let source = e.source.as_ref().map(|s| s.value.to_string());
        ExportDecl { id, kind: ExportKind::Named { specifiers, source } }
    }

    fn convert_export_default(&mut self, e: &oxc::ExportDefaultDeclaration<'_>) -> ExportDecl {
        let id = self.ids.next_id();
        let kind = match &e.declaration {
            oxc::ExportDefaultDeclarationKind::FunctionDeclaration(f) => {
                let span = self.span(f.span);
                let function = self.convert_function(f);
                ExportKind::Decl(Box::new(Stmt {
                    id: self.ids.next_id(),
                    span,
                    kind: StmtKind::FunctionDecl(function),
                }))
            }
            oxc::ExportDefaultDeclarationKind::ClassDeclaration(c) => {
                let span = self.span(c.span);
                let class = self.convert_class(c);
                ExportKind::Decl(Box::new(Stmt { id: self.ids.next_id(), span, kind: StmtKind::ClassDecl(class) }))
            }
            expr => ExportKind::Default(Box::new(self.convert_expr(expr.to_expression()))),
        };
        ExportDecl { id, kind }
    }

    fn convert_declaration_as_stmt(&mut self, decl: &oxc::Declaration<'_>) -> Stmt {
        let id = self.ids.next_id();
        let s = decl.span();
        let kind = match decl {
            oxc::Declaration::VariableDeclaration(d) => StmtKind::VarDecl(self.convert_var_decl(d)),
            oxc::Declaration::FunctionDeclaration(f) => StmtKind::FunctionDecl(self.convert_function(f)),
            oxc::Declaration::ClassDeclaration(c) => StmtKind::ClassDecl(self.convert_class(c)),
            other => {
                self.unsupported("exported declaration", other.span());
                StmtKind::Empty
            }
        };
        let span = self.span(s);
        Stmt { id, span, kind }
    }

    fn convert_pattern(&mut self, pattern: &oxc::BindingPattern<'_>) -> Pattern {
        let id = self.ids.next_id();
        match &pattern.kind {
            oxc::BindingPatternKind::BindingIdentifier(b) => {
                Pattern::Identifier { id, name: b.name.to_string() }
            }
            oxc::BindingPatternKind::ObjectPattern(o) => {
                let props = o
                    .properties
                    .iter()
                    .map(|p| {
                        let (key, computed) = self.convert_property_key(&p.key, p.computed);
                        ObjectPatternProp {
                            key,
                            value: self.convert_pattern(&p.value),
                            computed,
                            shorthand: p.shorthand,
                        }
                    })
                    .collect();
                let rest = o.rest.as_ref().map(|r| Box::new(self.convert_pattern(&r.argument)));
                Pattern::Object { id, props, rest }
            }
            oxc::BindingPatternKind::ArrayPattern(a) => {
                let mut elements: Vec<Option<Pattern>> =
                    a.elements.iter().map(|el| el.as_ref().map(|p| self.convert_pattern(p))).collect();
                if let Some(rest) = &a.rest {
                    let rest_id = self.ids.next_id();
                    let argument = Box::new(self.convert_pattern(&rest.argument));
                    elements.push(Some(Pattern::Rest { id: rest_id, argument }));
                }
                Pattern::Array { id, elements }
            }
            oxc::BindingPatternKind::AssignmentPattern(a) => {
                let left = Box::new(self.convert_pattern(&a.left));
                let right = Box::new(self.convert_expr(&a.right));
                Pattern::Assign { id, left, right }
            }
        }
    }

    fn convert_assignment_target_as_pattern(&mut self, target: &oxc::AssignmentTarget<'_>) -> Pattern {
        match target {
            oxc::AssignmentTarget::AssignmentTargetIdentifier(i) => {
                Pattern::Identifier { id: self.ids.next_id(), name: i.name.to_string() }
            }
            other => {
                self.unsupported("destructuring assignment target", other.span());
                Pattern::Identifier { id: self.ids.next_id(), name: "<unsupported>".to_owned() }
            }
        }
    }

    fn convert_expr(&mut self, expr: &oxc::Expression<'_>) -> Expr {
        let id = self.ids.next_id();
        let s = expr.span();
        let kind = match expr {
            oxc::Expression::BooleanLiteral(b) => ExprKind::Literal(Literal::Bool(b.value)),
            oxc::Expression::NullLiteral(_) => ExprKind::Literal(Literal::Null),
            oxc::Expression::NumericLiteral(n) => ExprKind::Literal(Literal::Number(n.value)),
            oxc::Expression::StringLiteral(s) => ExprKind::Literal(Literal::String(s.value.to_string())),
            oxc::Expression::BigIntLiteral(b) => ExprKind::Literal(Literal::String(b.raw.to_string())),
            oxc::Expression::RegExpLiteral(r) => {
                ExprKind::Literal(Literal::Regex(r.raw.map(|a| a.to_string()).unwrap_or_default()))
            }
            oxc::Expression::TemplateLiteral(t) => {
                ExprKind::TemplateLiteral(t.expressions.iter().map(|e| self.convert_expr(e)).collect())
            }
            oxc::Expression::Identifier(i) => {
                if i.name == "undefined" {
                    ExprKind::Literal(Literal::Undefined)
                } else {
                    ExprKind::Identifier(i.name.to_string())
                }
            }
            oxc::Expression::ThisExpression(_) => ExprKind::This,
            oxc::Expression::ArrayExpression(a) => {
                let items = a
                    .elements
                    .iter()
                    .map(|el| match el {
                        oxc::ArrayExpressionElement::Elision(_) => None,
                        oxc::ArrayExpressionElement::SpreadElement(sp) => {
                            Some(ArrayElement::Spread(self.convert_expr(&sp.argument)))
                        }
                        item => Some(ArrayElement::Item(self.convert_expr(item.to_expression()))),
                    })
                    .collect();
                ExprKind::Array(items)
            }
            oxc::Expression::ObjectExpression(o) => {
                let props = o
                    .properties
                    .iter()
                    .map(|p| self.convert_object_prop(p))
                    .collect();
                ExprKind::Object(props)
            }
            oxc::Expression::FunctionExpression(f) => ExprKind::Function(self.convert_function(f)),
            oxc::Expression::ArrowFunctionExpression(f) => ExprKind::Arrow(self.convert_arrow(f)),
            oxc::Expression::ClassExpression(c) => ExprKind::Class(self.convert_class(c)),
            oxc::Expression::UnaryExpression(u) => ExprKind::Unary {
                op: u.operator.as_str().to_owned(),
                arg: Box::new(self.convert_expr(&u.argument)),
            },
            oxc::Expression::UpdateExpression(u) => ExprKind::Update {
                op: u.operator.as_str().to_owned(),
                arg: Box::new(self.convert_simple_target_as_expr(&u.argument)),
                prefix: u.prefix,
            },
            oxc::Expression::BinaryExpression(b) => ExprKind::Binary {
                op: b.operator.as_str().to_owned(),
                left: Box::new(self.convert_expr(&b.left)),
                right: Box::new(self.convert_expr(&b.right)),
            },
            oxc::Expression::LogicalExpression(l) => ExprKind::Logical {
                op: l.operator.as_str().to_owned(),
                left: Box::new(self.convert_expr(&l.left)),
                right: Box::new(self.convert_expr(&l.right)),
            },
            oxc::Expression::AssignmentExpression(a) => ExprKind::Assign {
                op: a.operator.as_str().to_owned(),
                target: self.convert_assignment_target(&a.left),
                value: Box::new(self.convert_expr(&a.right)),
            },
            oxc::Expression::ConditionalExpression(c) => ExprKind::Conditional {
                test: Box::new(self.convert_expr(&c.test)),
                cons: Box::new(self.convert_expr(&c.consequent)),
                alt: Box::new(self.convert_expr(&c.alternate)),
            },
            oxc::Expression::CallExpression(c) => {
                let args = c.arguments.iter().filter_map(|a| self.convert_argument(a)).collect();
                ExprKind::Call { callee: Box::new(self.convert_expr(&c.callee)), args, optional: c.optional }
            }
            oxc::Expression::NewExpression(n) => {
                let args = n.arguments.iter().filter_map(|a| self.convert_argument(a)).collect();
                ExprKind::New { callee: Box::new(self.convert_expr(&n.callee)), args }
            }
            oxc::Expression::StaticMemberExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Identifier(m.property.name.to_string()),
                computed: false,
                optional: m.optional,
            },
            oxc::Expression::ComputedMemberExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Computed(Box::new(self.convert_expr(&m.expression))),
                computed: true,
                optional: m.optional,
            },
            oxc::Expression::PrivateFieldExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Identifier(m.field.name.to_string()),
                computed: false,
                optional: m.optional,
            },
            oxc::Expression::SequenceExpression(sq) => {
                ExprKind::Sequence(sq.expressions.iter().map(|e| self.convert_expr(e)).collect())
            }
            oxc::Expression::TaggedTemplateExpression(t) => ExprKind::TaggedTemplate {
                tag: Box::new(self.convert_expr(&t.tag)),
                quasi: t.quasi.expressions.iter().map(|e| self.convert_expr(e)).collect(),
            },
            oxc::Expression::AwaitExpression(a) => ExprKind::Await(Box::new(self.convert_expr(&a.argument))),
            oxc::Expression::YieldExpression(y) => ExprKind::Yield {
                arg: y.argument.as_ref().map(|e| Box::new(self.convert_expr(e))),
                delegate: y.delegate,
            },
            oxc::Expression::ParenthesizedExpression(p) => return self.convert_expr(&p.expression),
            other => {
                self.unsupported("expression", other.span());
                return self.placeholder_expr(s);
            }
        };
        let span = self.span(s);
        Expr { id, span, kind }
    }

    fn convert_simple_target_as_expr(&mut self, target: &oxc::SimpleAssignmentTarget<'_>) -> Expr {
        match target {
            oxc::SimpleAssignmentTarget::AssignmentTargetIdentifier(i) => {
                let span = self.span(i.span);
                Expr { id: self.ids.next_id(), span, kind: ExprKind::Identifier(i.name.to_string()) }
            }
            member if member.is_member_expression() => {
                self.convert_member_expr(member.to_member_expression())
            }
            other => self.placeholder_expr(other.span()),
        }
    }

    fn convert_member_expr(&mut self, m: &oxc::MemberExpression<'_>) -> Expr {
        let span = self.span(m.span());
        let kind = match m {
            oxc::MemberExpression::StaticMemberExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Identifier(m.property.name.to_string()),
                computed: false,
                optional: m.optional,
            },
            oxc::MemberExpression::ComputedMemberExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Computed(Box::new(self.convert_expr(&m.expression))),
                computed: true,
                optional: m.optional,
            },
            oxc::MemberExpression::PrivateFieldExpression(m) => ExprKind::Member {
                object: Box::new(self.convert_expr(&m.object)),
                property: PropKey::Identifier(m.field.name.to_string()),
                computed: false,
                optional: m.optional,
            },
        };
        Expr { id: self.ids.next_id(), span, kind }
    }

    fn convert_assignment_target(&mut self, target: &oxc::AssignmentTarget<'_>) -> AssignTarget {
        match target {
            oxc::AssignmentTarget::AssignmentTargetIdentifier(i) => {
                AssignTarget::Identifier { id: self.ids.next_id(), name: i.name.to_string() }
            }
            member if member.is_member_expression() => {
                AssignTarget::Member(Box::new(self.convert_member_expr(member.to_member_expression())))
            }
            other => {
                AssignTarget::Pattern(Box::new(self.convert_assignment_target_as_pattern(other)))
            }
        }
    }

    fn convert_argument(&mut self, arg: &oxc::Argument<'_>) -> Option<Expr> {
        match arg {
            oxc::Argument::SpreadElement(sp) => {
                let id = self.ids.next_id();
                let span = self.span(sp.span);
                Some(Expr {
                    id,
                    span,
                    kind: ExprKind::Spread(Box::new(self.convert_expr(&sp.argument))),
                })
            }
            expr => Some(self.convert_expr(expr.to_expression())),
        }
    }

    fn convert_object_prop(&mut self, prop: &oxc::ObjectPropertyKind<'_>) -> ObjectProp {
        match prop {
            oxc::ObjectPropertyKind::ObjectProperty(p) => {
                let (key, computed) = self.convert_property_key(&p.key, p.computed);
                if p.method || matches!(p.kind, oxc::PropertyKind::Get | oxc::PropertyKind::Set) {
                    if let oxc::Expression::FunctionExpression(f) = &p.value {
                        return ObjectProp::Method { key, computed, function: self.convert_function(f) };
                    }
                }
                ObjectProp::KeyValue {
                    key,
                    value: self.convert_expr(&p.value),
                    computed,
                    shorthand: p.shorthand,
                }
            }
            oxc::ObjectPropertyKind::SpreadProperty(sp) => ObjectProp::Spread(self.convert_expr(&sp.argument)),
        }
    }
}
