//! Second pass: build nested lexical scopes and resolve every identifier
//! occurrence to its declaration. Runs after the decorator
//! so that function registration (and therefore `FunctionId`s referenced
//! from `Naming::Callback`) is already in place, though the two passes do
//! not otherwise interact.

use crate::ast::{
    ArrayElement, AssignTarget, CatchClause, ClassDecl, ClassMember, Declarator, Expr, ExprKind,
    ForHead, Function, ObjectProp, Pattern, Program, Stmt, StmtKind, SwitchCase, VarDecl,
    VarDeclKind,
};
use crate::context::{AnalysisContext, Resolution, ScopeKind};
use crate::ids::{FileId, ScopeId};

struct Binder<'ctx> {
    ctx: &'ctx mut AnalysisContext,
    file: FileId,
}

pub fn bind(ctx: &mut AnalysisContext) {
    for idx in 0..ctx.files.len() {
        let file = ctx.files[idx].id;
        let empty = Program {
            id: ctx.files[idx].program.id,
            span: crate::ast::Span::dummy(),
            body: Vec::new(),
        };
        let program = std::mem::replace(&mut ctx.files[idx].program, empty);
        {
            let global = ctx.push_scope(None, ScopeKind::Global);
            ctx.set_node_scope(file, program.id, global);
            let mut binder = Binder { ctx, file };
            binder.bind_function_like_body(&program.body, global);
        }
        ctx.files[idx].program = program;
    }
}

/// Names hoisted to a function (or global) scope, found by a non-recursive-
/// into-nested-functions scan of a statement list: function declarations
/// and `var` declarations bind in the enclosing function scope.
enum Hoist<'a> {
    Var(&'a Pattern),
    Function(&'a Function),
}

fn collect_hoists<'a>(stmts: &'a [Stmt], out: &mut Vec<Hoist<'a>>) {
    for stmt in stmts {
        collect_hoists_stmt(stmt, out);
    }
}

fn collect_hoists_stmt<'a>(stmt: &'a Stmt, out: &mut Vec<Hoist<'a>>) {
    match &stmt.kind {
        StmtKind::VarDecl(decl) if decl.kind == VarDeclKind::Var => {
            for d in &decl.declarators {
                out.push(Hoist::Var(&d.name));
            }
        }
        StmtKind::VarDecl(_) => {}
        StmtKind::FunctionDecl(f) => out.push(Hoist::Function(f)),
        StmtKind::Block(body) => collect_hoists(body, out),
        StmtKind::If { cons, alt, .. } => {
            collect_hoists_stmt(cons, out);
            if let Some(alt) = alt {
                collect_hoists_stmt(alt, out);
            }
        }
        StmtKind::For { init, body, .. } => {
            if let Some(init) = init {
                collect_hoists_stmt(init, out);
            }
            collect_hoists_stmt(body, out);
        }
        StmtKind::ForIn { left, body, .. } => {
            if let ForHead::VarDecl(decl) = left {
                if decl.kind == VarDeclKind::Var {
                    for d in &decl.declarators {
                        out.push(Hoist::Var(&d.name));
                    }
                }
            }
            collect_hoists_stmt(body, out);
        }
        StmtKind::While { body, .. } | StmtKind::DoWhile { body, .. } | StmtKind::Labeled { body, .. } => {
            collect_hoists_stmt(body, out);
        }
        StmtKind::Try { block, handler, finalizer } => {
            collect_hoists(block, out);
            if let Some(handler) = handler {
                collect_hoists(&handler.body, out);
            }
            if let Some(finalizer) = finalizer {
                collect_hoists(finalizer, out);
            }
        }
        StmtKind::Switch { cases, .. } => {
            for case in cases {
                collect_hoists(&case.body, out);
            }
        }
        StmtKind::Export(export) => {
            if let crate::ast::ExportKind::Decl(inner) = &export.kind {
                collect_hoists_stmt(inner, out);
            }
        }
        StmtKind::Expr(_)
        | StmtKind::Return(_)
        | StmtKind::Throw(_)
        | StmtKind::Break(_)
        | StmtKind::Continue(_)
        | StmtKind::Import(_)
        | StmtKind::Empty => {}
        StmtKind::ClassDecl(_) => {}
    }
}

impl Binder<'_> {
    /// Binds a function's (or the program's) own scope: hoists vars and
    /// function declarations, declares `let`/`const`/`class` bindings made
    /// directly in this body (the function/program top level is itself the
    /// block those bindings belong to, same as any nested `{ }` block), then
    /// resolves the body. `this`/`arguments` are declared by the caller,
    /// which knows whether this is an arrow.
    fn bind_function_like_body(&mut self, stmts: &[Stmt], scope: ScopeId) {
        let mut hoists = Vec::new();
        collect_hoists(stmts, &mut hoists);
        for hoist in &hoists {
            match hoist {
                Hoist::Var(pattern) => self.declare_pattern(pattern, scope),
                Hoist::Function(f) => {
                    if let Some(name) = &f.name {
                        self.ctx.declare(scope, f.id, self.file, name.clone());
                    }
                }
            }
        }
        self.declare_block_locals(stmts, scope);
        for stmt in stmts {
            self.stmt(stmt, scope);
        }
    }

    /// Declares every `let`/`const`/`class` binding made directly in
    /// `stmts` into `scope`, the part of block-scoping that hoisting
    /// doesn't cover (those names belong to the block they're written in,
    /// not the enclosing function).
    fn declare_block_locals(&mut self, stmts: &[Stmt], scope: ScopeId) {
        for stmt in stmts {
            match &stmt.kind {
                StmtKind::VarDecl(decl) if decl.kind != VarDeclKind::Var => {
                    for d in &decl.declarators {
                        self.declare_pattern_checked(&d.name, scope);
                    }
                }
                StmtKind::ClassDecl(c) => {
                    if let Some(name) = &c.name {
                        self.ctx.declare_checked(scope, c.id, self.file, name.clone(), c.span);
                    }
                }
                _ => {}
            }
        }
    }

    fn open_block_scope(&mut self, parent: ScopeId, stmts: &[Stmt]) -> ScopeId {
        let scope = self.ctx.push_scope(Some(parent), ScopeKind::Block);
        self.declare_block_locals(stmts, scope);
        scope
    }

    fn declare_pattern(&mut self, pattern: &Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier { id, name } => {
                self.ctx.declare(scope, *id, self.file, name.clone());
            }
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.declare_pattern(el, scope);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    self.declare_pattern(&prop.value, scope);
                }
                if let Some(rest) = rest {
                    self.declare_pattern(rest, scope);
                }
            }
            Pattern::Rest { argument, .. } => self.declare_pattern(argument, scope),
            Pattern::Assign { left, right, .. } => {
                self.declare_pattern(left, scope);
                self.expr(right, scope);
            }
        }
    }

    fn declare_pattern_checked(&mut self, pattern: &Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier { id, name } => {
                self.ctx.declare_checked(scope, *id, self.file, name.clone(), crate::ast::Span::dummy());
            }
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.declare_pattern_checked(el, scope);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    self.declare_pattern_checked(&prop.value, scope);
                }
                if let Some(rest) = rest {
                    self.declare_pattern_checked(rest, scope);
                }
            }
            Pattern::Rest { argument, .. } => self.declare_pattern_checked(argument, scope),
            Pattern::Assign { left, right, .. } => {
                self.declare_pattern_checked(left, scope);
                self.expr(right, scope);
            }
        }
    }

    fn resolve(&mut self, node: crate::ids::NodeId, scope: ScopeId, name: &str) {
        let resolution = match self.ctx.lookup(scope, name) {
            Some(decl) => Resolution::Local(decl),
            None => Resolution::Global(name.to_owned()),
        };
        self.ctx.set_resolution(self.file, node, resolution);
    }

    fn stmt(&mut self, stmt: &Stmt, scope: ScopeId) {
        self.ctx.set_node_scope(self.file, stmt.id, scope);
        match &stmt.kind {
            StmtKind::Expr(e) => self.expr(e, scope),
            StmtKind::VarDecl(decl) => self.var_decl_inits(decl, scope),
            StmtKind::FunctionDecl(f) => self.function(f, scope),
            StmtKind::ClassDecl(c) => self.class(c, scope),
            StmtKind::Return(e) => {
                if let Some(e) = e {
                    self.expr(e, scope);
                }
            }
            StmtKind::If { test, cons, alt } => {
                self.expr(test, scope);
                self.stmt(cons, scope);
                if let Some(alt) = alt {
                    self.stmt(alt, scope);
                }
            }
            StmtKind::Block(body) => {
                let inner = self.open_block_scope(scope, body);
                for s in body {
                    self.stmt(s, inner);
                }
            }
            StmtKind::For { init, test, update, body } => {
                let inner = match init.as_deref() {
                    Some(stmt) => self.open_block_scope(scope, std::slice::from_ref(stmt)),
                    None => scope,
                };
                if let Some(init) = init {
                    match &init.kind {
                        StmtKind::VarDecl(decl) => self.var_decl_inits(decl, inner),
                        _ => self.stmt(init, inner),
                    }
                }
                if let Some(test) = test {
                    self.expr(test, inner);
                }
                if let Some(update) = update {
                    self.expr(update, inner);
                }
                self.stmt(body, inner);
            }
            StmtKind::ForIn { left, right, body, .. } => {
                self.expr(right, scope);
                let inner = self.ctx.push_scope(Some(scope), ScopeKind::Block);
                match left {
                    ForHead::VarDecl(decl) if decl.kind != VarDeclKind::Var => {
                        for d in &decl.declarators {
                            self.declare_pattern_checked(&d.name, inner);
                        }
                    }
                    // `var`-kind bindings were already hoisted to the function scope.
                    ForHead::VarDecl(_) => {}
                    ForHead::Pattern(pattern) => self.assign_pattern(pattern, inner),
                }
                self.stmt(body, inner);
            }
            StmtKind::While { test, body } => {
                self.expr(test, scope);
                self.stmt(body, scope);
            }
            StmtKind::DoWhile { body, test } => {
                self.stmt(body, scope);
                self.expr(test, scope);
            }
            StmtKind::Try { block, handler, finalizer } => {
                let inner = self.open_block_scope(scope, block);
                for s in block {
                    self.stmt(s, inner);
                }
                if let Some(handler) = handler {
                    self.catch_clause(handler, scope);
                }
                if let Some(finalizer) = finalizer {
                    let inner = self.open_block_scope(scope, finalizer);
                    for s in finalizer {
                        self.stmt(s, inner);
                    }
                }
            }
            StmtKind::Throw(e) => self.expr(e, scope),
            StmtKind::Switch { discriminant, cases } => {
                self.expr(discriminant, scope);
                let inner = self.ctx.push_scope(Some(scope), ScopeKind::Block);
                for case in cases {
                    self.switch_case(case, inner);
                }
            }
            StmtKind::Labeled { body, .. } => self.stmt(body, scope),
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Import(import) => {
                for spec in &import.specifiers {
                    let (node, name) = match spec {
                        crate::ast::ImportSpecifier::Default { id, local }
                        | crate::ast::ImportSpecifier::Namespace { id, local }
                        | crate::ast::ImportSpecifier::Named { id, local, .. } => (*id, local.clone()),
                    };
                    self.ctx.declare(scope, node, self.file, name);
                }
            }
            StmtKind::Export(export) => match &export.kind {
                crate::ast::ExportKind::Named { .. } | crate::ast::ExportKind::All { .. } => {}
                crate::ast::ExportKind::Default(e) => self.expr(e, scope),
                crate::ast::ExportKind::Decl(inner) => self.stmt(inner, scope),
            },
        }
    }

    fn catch_clause(&mut self, clause: &CatchClause, parent: ScopeId) {
        let catch_scope = self.ctx.push_scope(Some(parent), ScopeKind::Catch);
        if let Some(param) = &clause.param {
            self.declare_pattern(param, catch_scope);
        }
        let body_scope = self.open_block_scope(catch_scope, &clause.body);
        for s in &clause.body {
            self.stmt(s, body_scope);
        }
    }

    fn switch_case(&mut self, case: &SwitchCase, scope: ScopeId) {
        if let Some(test) = &case.test {
            self.expr(test, scope);
        }
        for stmt in &case.body {
            if let StmtKind::VarDecl(decl) = &stmt.kind {
                if decl.kind != VarDeclKind::Var {
                    for d in &decl.declarators {
                        self.declare_pattern_checked(&d.name, scope);
                    }
                }
            }
        }
        for s in &case.body {
            self.stmt(s, scope);
        }
    }

    fn var_decl_inits(&mut self, decl: &VarDecl, scope: ScopeId) {
        for d in &decl.declarators {
            self.declarator_init(d, scope);
        }
    }

    fn declarator_init(&mut self, d: &Declarator, scope: ScopeId) {
        if let Some(init) = &d.init {
            self.expr(init, scope);
        }
        self.pattern_defaults(&d.name, scope);
    }

    /// Resolves default-value expressions embedded in a declaration
    /// pattern; the leaf identifiers themselves were already declared by
    /// the hoisting or block-scope pass.
    fn pattern_defaults(&mut self, pattern: &Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier { .. } => {}
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.pattern_defaults(el, scope);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    self.pattern_defaults(&prop.value, scope);
                }
                if let Some(rest) = rest {
                    self.pattern_defaults(rest, scope);
                }
            }
            Pattern::Rest { argument, .. } => self.pattern_defaults(argument, scope),
            Pattern::Assign { right, .. } => self.expr(right, scope),
        }
    }

    /// Resolves a pattern used as an assignment target (destructuring
    /// assignment, `for (x of xs)` with a bare identifier): leaves are
    /// uses, not declarations.
    fn assign_pattern(&mut self, pattern: &Pattern, scope: ScopeId) {
        match pattern {
            Pattern::Identifier { id, name } => self.resolve(*id, scope, name),
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.assign_pattern(el, scope);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    self.assign_pattern(&prop.value, scope);
                }
                if let Some(rest) = rest {
                    self.assign_pattern(rest, scope);
                }
            }
            Pattern::Rest { argument, .. } => self.assign_pattern(argument, scope),
            Pattern::Assign { left, right, .. } => {
                self.assign_pattern(left, scope);
                self.expr(right, scope);
            }
        }
    }

    fn class(&mut self, class: &ClassDecl, scope: ScopeId) {
        if let Some(sup) = &class.super_class {
            self.expr(sup, scope);
        }
        for member in &class.members {
            self.class_member(member, scope);
        }
    }

    fn class_member(&mut self, member: &ClassMember, scope: ScopeId) {
        if let crate::ast::PropKey::Computed(e) = &member.key {
            self.expr(e, scope);
        }
        if let Some(init) = &member.field_init {
            self.expr(init, scope);
        }
        if let Some(f) = &member.value {
            self.function(f, scope);
        }
    }

    fn function(&mut self, f: &Function, parent: ScopeId) {
        let scope = self.ctx.push_scope(Some(parent), ScopeKind::Function);
        self.ctx.set_node_scope(self.file, f.id, scope);
        for p in &f.params {
            self.declare_pattern(p, scope);
        }
        for p in &f.params {
            self.pattern_defaults(p, scope);
        }
        if !f.is_arrow {
            self.ctx.declare(scope, f.id, self.file, "this".to_owned());
            self.ctx.declare(scope, f.id, self.file, "arguments".to_owned());
        }
        match &f.body {
            crate::ast::FunctionBody::Block(stmts) => {
                self.bind_function_like_body(stmts, scope);
            }
            crate::ast::FunctionBody::Expr(e) => self.expr(e, scope),
        }
    }

    fn expr(&mut self, expr: &Expr, scope: ScopeId) {
        self.ctx.set_node_scope(self.file, expr.id, scope);
        match &expr.kind {
            ExprKind::Identifier(name) => self.resolve(expr.id, scope, name),
            ExprKind::This => self.resolve(expr.id, scope, "this"),
            ExprKind::Literal(_) => {}
            ExprKind::TemplateLiteral(parts) | ExprKind::Sequence(parts) => {
                for p in parts {
                    self.expr(p, scope);
                }
            }
            ExprKind::Array(elements) => {
                for el in elements.iter().flatten() {
                    match el {
                        ArrayElement::Item(e) | ArrayElement::Spread(e) => self.expr(e, scope),
                    }
                }
            }
            ExprKind::Object(props) => self.object_props(props, scope),
            ExprKind::Function(f) | ExprKind::Arrow(f) => self.function(f, scope),
            ExprKind::Class(c) => self.class(c, scope),
            ExprKind::Unary { arg, .. } | ExprKind::Update { arg, .. } | ExprKind::Spread(arg) => {
                self.expr(arg, scope);
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                self.expr(left, scope);
                self.expr(right, scope);
            }
            ExprKind::Assign { target, value, .. } => {
                self.assign_target(target, scope);
                self.expr(value, scope);
            }
            ExprKind::Conditional { test, cons, alt } => {
                self.expr(test, scope);
                self.expr(cons, scope);
                self.expr(alt, scope);
            }
            ExprKind::Call { callee, args, .. } | ExprKind::New { callee, args } => {
                self.expr(callee, scope);
                for a in args {
                    self.expr(a, scope);
                }
            }
            ExprKind::Member { object, property, .. } => {
                self.expr(object, scope);
                if let crate::ast::PropKey::Computed(e) = property {
                    self.expr(e, scope);
                }
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.expr(tag, scope);
                for q in quasi {
                    self.expr(q, scope);
                }
            }
            ExprKind::Await(e) => self.expr(e, scope),
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    self.expr(arg, scope);
                }
            }
        }
    }

    fn assign_target(&mut self, target: &AssignTarget, scope: ScopeId) {
        match target {
            AssignTarget::Identifier { id, name } => self.resolve(*id, scope, name),
            AssignTarget::Member(member) => self.expr(member, scope),
            AssignTarget::Pattern(pattern) => self.assign_pattern(pattern, scope),
        }
    }

    fn object_props(&mut self, props: &[ObjectProp], scope: ScopeId) {
        for prop in props {
            match prop {
                ObjectProp::KeyValue { key, value, .. } => {
                    if let crate::ast::PropKey::Computed(k) = key {
                        self.expr(k, scope);
                    }
                    self.expr(value, scope);
                }
                ObjectProp::Method { key, function, .. } => {
                    if let crate::ast::PropKey::Computed(k) = key {
                        self.expr(k, scope);
                    }
                    self.function(function, scope);
                }
                ObjectProp::Spread(e) => self.expr(e, scope),
            }
        }
    }
}
