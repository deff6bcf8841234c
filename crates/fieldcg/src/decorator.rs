//! First pass: walk each file's AST in pre-order, register every function
//! and call/`new` site, and compute the label-naming attributes. Nothing
//! here builds flow-graph edges; that is the edge builder's job once the
//! binder has resolved identifiers too.

use ahash::AHashMap;

use crate::ast::{
    ArrayElement, AssignTarget, CatchClause, ClassDecl, ClassMember, Declarator, Expr, ExprKind,
    ForHead, Function, ObjectProp, Pattern, Program, Stmt, StmtKind, SwitchCase, VarDecl,
};
use crate::context::{AnalysisContext, CallKind, Naming};
use crate::diagnostics::Diagnostic;
use crate::ids::{CallId, FileId, FunctionId};

/// A name contributed to a function literal by its immediate syntactic
/// parent, before the free-anonymous/callback fallback applies.
enum NameHint {
    PropertyKey(String),
    Assigned(String),
    Callback { call: CallId, total: u32, position: u32 },
}

struct Walker<'ctx> {
    ctx: &'ctx mut AnalysisContext,
    file: FileId,
    current_function: Option<FunctionId>,
    /// Free-anonymous counters, keyed by enclosing function (`None` means
    /// the file's top level, the global scope).
    anon_counters: AHashMap<Option<FunctionId>, u32>,
}

pub fn decorate(ctx: &mut AnalysisContext) {
    for idx in 0..ctx.files.len() {
        let file = ctx.files[idx].id;
        let empty = Program {
            id: ctx.files[idx].program.id,
            span: crate::ast::Span::dummy(),
            body: Vec::new(),
        };
        let program = std::mem::replace(&mut ctx.files[idx].program, empty);
        {
            let mut walker = Walker {
                ctx,
                file,
                current_function: None,
                anon_counters: AHashMap::default(),
            };
            for stmt in &program.body {
                walker.stmt(stmt);
            }
        }
        ctx.files[idx].program = program;
    }
}

impl Walker<'_> {
    fn mark(&mut self, node: crate::ids::NodeId) {
        if let Some(fid) = self.current_function {
            self.ctx.set_enclosing_function(self.file, node, fid);
        }
    }

    fn next_anon_index(&mut self) -> u32 {
        let counter = self.anon_counters.entry(self.current_function).or_insert(0);
        *counter += 1;
        *counter
    }

    fn stmt(&mut self, stmt: &Stmt) {
        self.mark(stmt.id);
        match &stmt.kind {
            StmtKind::Expr(e) => self.expr(e),
            StmtKind::VarDecl(decl) => self.var_decl(decl),
            StmtKind::FunctionDecl(f) => {
                // A function declaration always has a name in valid syntax;
                // Declared naming falls out of `determine_naming` directly.
                self.function(f, None);
            }
            StmtKind::ClassDecl(c) => self.class(c),
            StmtKind::Return(e) => {
                if let Some(e) = e {
                    self.expr(e);
                }
            }
            StmtKind::If { test, cons, alt } => {
                self.expr(test);
                self.stmt(cons);
                if let Some(alt) = alt {
                    self.stmt(alt);
                }
            }
            StmtKind::Block(body) => {
                for s in body {
                    self.stmt(s);
                }
            }
            StmtKind::For { init, test, update, body } => {
                if let Some(init) = init {
                    self.stmt(init);
                }
                if let Some(test) = test {
                    self.expr(test);
                }
                if let Some(update) = update {
                    self.expr(update);
                }
                self.stmt(body);
            }
            StmtKind::ForIn { left, right, body, .. } => {
                match left {
                    ForHead::VarDecl(decl) => self.var_decl(decl),
                    ForHead::Pattern(pat) => self.pattern(pat),
                }
                self.expr(right);
                self.stmt(body);
            }
            StmtKind::While { test, body } | StmtKind::DoWhile { body, test } => {
                self.expr(test);
                self.stmt(body);
            }
            StmtKind::Try { block, handler, finalizer } => {
                for s in block {
                    self.stmt(s);
                }
                if let Some(handler) = handler {
                    self.catch_clause(handler);
                }
                if let Some(finalizer) = finalizer {
                    for s in finalizer {
                        self.stmt(s);
                    }
                }
            }
            StmtKind::Throw(e) => self.expr(e),
            StmtKind::Switch { discriminant, cases } => {
                self.expr(discriminant);
                for case in cases {
                    self.switch_case(case);
                }
            }
            StmtKind::Labeled { body, .. } => self.stmt(body),
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Import(_) => {}
            StmtKind::Export(export) => match &export.kind {
                crate::ast::ExportKind::Named { .. } | crate::ast::ExportKind::All { .. } => {}
                crate::ast::ExportKind::Default(e) => self.expr(e),
                crate::ast::ExportKind::Decl(stmt) => self.stmt(stmt),
            },
        }
    }

    fn catch_clause(&mut self, clause: &CatchClause) {
        self.mark(clause.id);
        if let Some(param) = &clause.param {
            self.pattern(param);
        }
        for s in &clause.body {
            self.stmt(s);
        }
    }

    fn switch_case(&mut self, case: &SwitchCase) {
        if let Some(test) = &case.test {
            self.expr(test);
        }
        for s in &case.body {
            self.stmt(s);
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        self.mark(decl.id);
        for d in &decl.declarators {
            self.declarator(d);
        }
    }

    fn declarator(&mut self, d: &Declarator) {
        self.mark(d.id);
        self.pattern(&d.name);
        if let Some(init) = &d.init {
            let hint = match (&d.name, &init.kind) {
                (Pattern::Identifier { name, .. }, ExprKind::Function(_) | ExprKind::Arrow(_)) => {
                    Some(NameHint::Assigned(name.clone()))
                }
                _ => None,
            };
            self.expr_with_hint(init, hint);
        }
    }

    fn pattern(&mut self, pattern: &Pattern) {
        self.mark(pattern.id());
        match pattern {
            Pattern::Identifier { .. } => {}
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.pattern(el);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    self.pattern(&prop.value);
                }
                if let Some(rest) = rest {
                    self.pattern(rest);
                }
            }
            Pattern::Rest { argument, .. } => self.pattern(argument),
            Pattern::Assign { left, right, .. } => {
                self.pattern(left);
                self.expr(right);
            }
        }
    }

    fn class(&mut self, class: &ClassDecl) {
        self.mark(class.id);
        if let Some(sup) = &class.super_class {
            self.expr(sup);
        }
        for member in &class.members {
            self.class_member(member);
        }
    }

    fn class_member(&mut self, member: &ClassMember) {
        self.mark(member.id);
        if let Some(init) = &member.field_init {
            self.expr(init);
        }
        if let Some(f) = &member.value {
            let hint = if member.computed {
                self.ctx.diagnostics.push(Diagnostic::UnsupportedConstruct {
                    file: self.file,
                    span: f.span,
                    detail: "computed class member key cannot be named".to_owned(),
                });
                None
            } else {
                member.key.static_name().map(|n| NameHint::PropertyKey(n.to_owned()))
            };
            self.function(f, hint);
        }
    }

    fn expr(&mut self, expr: &Expr) {
        self.expr_with_hint(expr, None);
    }

    fn expr_with_hint(&mut self, expr: &Expr, hint: Option<NameHint>) {
        self.mark(expr.id);
        match &expr.kind {
            ExprKind::Identifier(_) | ExprKind::This | ExprKind::Literal(_) => {}
            ExprKind::TemplateLiteral(parts) | ExprKind::Sequence(parts) => {
                for p in parts {
                    self.expr(p);
                }
            }
            ExprKind::Array(elements) => {
                for el in elements.iter().flatten() {
                    match el {
                        ArrayElement::Item(e) | ArrayElement::Spread(e) => self.expr(e),
                    }
                }
            }
            ExprKind::Object(props) => self.object_props(props),
            ExprKind::Function(f) | ExprKind::Arrow(f) => {
                self.function(f, hint);
            }
            ExprKind::Class(c) => self.class(c),
            ExprKind::Unary { arg, .. } | ExprKind::Update { arg, .. } | ExprKind::Spread(arg) => {
                self.expr(arg);
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            ExprKind::Assign { target, value, .. } => {
                let assign_hint = match target {
                    AssignTarget::Identifier { name, .. } => Some(name.clone()),
                    AssignTarget::Member(member) => match &member.kind {
                        ExprKind::Member { property, computed: false, .. } => {
                            property.static_name().map(str::to_owned)
                        }
                        _ => None,
                    },
                    AssignTarget::Pattern(_) => None,
                };
                self.assign_target(target);
                let hint = match (&value.kind, assign_hint) {
                    (ExprKind::Function(_) | ExprKind::Arrow(_), Some(name)) => {
                        Some(NameHint::Assigned(name))
                    }
                    _ => None,
                };
                self.expr_with_hint(value, hint);
            }
            ExprKind::Conditional { test, cons, alt } => {
                self.expr(test);
                self.expr(cons);
                self.expr(alt);
            }
            ExprKind::Call { callee, args, .. } => {
                self.expr(callee);
                self.call_or_new(expr, callee, args, CallKind::Call);
            }
            ExprKind::New { callee, args } => {
                self.expr(callee);
                self.call_or_new(expr, callee, args, CallKind::New);
            }
            ExprKind::Member { object, property, .. } => {
                self.expr(object);
                if let crate::ast::PropKey::Computed(e) = property {
                    self.expr(e);
                }
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.expr(tag);
                for q in quasi {
                    self.expr(q);
                }
            }
            ExprKind::Await(e) => self.expr(e),
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.expr(arg);
                }
            }
        }
    }

    fn assign_target(&mut self, target: &AssignTarget) {
        match target {
            AssignTarget::Identifier { .. } => {}
            AssignTarget::Member(member) => self.expr(member),
            AssignTarget::Pattern(pattern) => self.pattern(pattern),
        }
    }

    fn object_props(&mut self, props: &[ObjectProp]) {
        for prop in props {
            match prop {
                ObjectProp::KeyValue { key, value, computed, .. } => {
                    if let crate::ast::PropKey::Computed(k) = key {
                        self.expr(k);
                    }
                    let hint = if *computed {
                        None
                    } else {
                        match &value.kind {
                            ExprKind::Function(_) | ExprKind::Arrow(_) => {
                                key.static_name().map(|n| NameHint::PropertyKey(n.to_owned()))
                            }
                            _ => None,
                        }
                    };
                    if *computed && matches!(value.kind, ExprKind::Function(_) | ExprKind::Arrow(_)) {
                        self.ctx.diagnostics.push(Diagnostic::UnsupportedConstruct {
                            file: self.file,
                            span: value.span,
                            detail: "computed property key cannot name a function value".to_owned(),
                        });
                    }
                    self.expr_with_hint(value, hint);
                }
                ObjectProp::Method { key, computed, function } => {
                    if let crate::ast::PropKey::Computed(k) = key {
                        self.expr(k);
                    }
                    let hint = if *computed {
                        self.ctx.diagnostics.push(Diagnostic::UnsupportedConstruct {
                            file: self.file,
                            span: function.span,
                            detail: "computed method key cannot name a function value".to_owned(),
                        });
                        None
                    } else {
                        key.static_name().map(|n| NameHint::PropertyKey(n.to_owned()))
                    };
                    self.function(function, hint);
                }
                ObjectProp::Spread(e) => self.expr(e),
            }
        }
    }

    fn call_or_new(&mut self, call_expr: &Expr, callee: &Expr, args: &[Expr], kind: CallKind) {
        let fn_arg_count = u32::try_from(
            args.iter()
                .filter(|a| matches!(a.kind, ExprKind::Function(_) | ExprKind::Arrow(_)))
                .count(),
        )
        .expect("argument count fits in u32");
        let call_id = self.ctx.register_call(
            call_expr.id,
            self.file,
            call_expr.span,
            self.current_function,
            kind,
            u32::try_from(args.len()).expect("argument count fits in u32"),
            fn_arg_count,
            describe_callee(callee),
            args.iter().map(|a| a.id).collect(),
        );

        let mut fn_position = 0u32;
        for arg in args {
            if matches!(arg.kind, ExprKind::Function(_) | ExprKind::Arrow(_)) {
                fn_position += 1;
                self.expr_with_hint(
                    arg,
                    Some(NameHint::Callback {
                        call: call_id,
                        total: fn_arg_count,
                        position: fn_position,
                    }),
                );
            } else {
                self.expr(arg);
            }
        }
    }

    fn function(&mut self, f: &Function, hint: Option<NameHint>) -> FunctionId {
        self.mark(f.id);
        let naming = if let Some(name) = &f.name {
            Naming::Declared(name.clone())
        } else {
            match hint {
                Some(NameHint::PropertyKey(name) | NameHint::Assigned(name)) => Naming::Assigned(name),
                Some(NameHint::Callback { call, total, position }) => {
                    Naming::Callback { call, total_fn_args: total, position }
                }
                None => Naming::FreeAnonymous { index: self.next_anon_index() },
            }
        };
        let id = self.ctx.register_function(
            f.id,
            self.file,
            f.span,
            self.current_function,
            u32::try_from(f.params.len()).expect("parameter count fits in u32"),
            f.params.iter().map(Pattern::id).collect(),
            f.is_arrow,
            naming,
        );

        let outer = self.current_function;
        self.current_function = Some(id);
        for p in &f.params {
            self.pattern(p);
        }
        match &f.body {
            crate::ast::FunctionBody::Block(stmts) => {
                for s in stmts {
                    self.stmt(s);
                }
            }
            crate::ast::FunctionBody::Expr(e) => self.expr(e),
        }
        self.current_function = outer;
        id
    }
}

/// The `C` in `clb(C)`: an identifier yields its name, a member expression
/// yields its dotted chain with `[computed]` segments for computed keys,
/// anything else (a call result used as a callee, for instance) is not
/// derivable and falls back to a free-anonymous label at render time.
fn describe_callee(expr: &Expr) -> Option<String> {
    match &expr.kind {
        ExprKind::Identifier(name) => Some(name.clone()),
        ExprKind::Member { .. } => member_chain(expr),
        _ => None,
    }
}

fn member_chain(expr: &Expr) -> Option<String> {
    let ExprKind::Member { object, property, computed, .. } = &expr.kind else {
        return Some(match &expr.kind {
            ExprKind::Identifier(name) => name.clone(),
            ExprKind::This => "this".to_owned(),
            // A receiver whose own identity isn't derivable (a literal, a
            // call result, ...) still yields a dotted chain; only the
            // unresolvable segment is replaced.
            _ => "unknown".to_owned(),
        });
    };
    let base = member_chain(object)?;
    let segment = if *computed {
        "[computed]".to_owned()
    } else {
        property.static_name().unwrap_or("[computed]").to_owned()
    };
    Some(format!("{base}.{segment}"))
}
