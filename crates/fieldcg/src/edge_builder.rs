//! Intraprocedural edge construction: a structural recursion over the
//! decorated, bound AST that populates the flow graph according to each
//! expression and statement's data-flow contribution.
//! Runs after the decorator and binder so every node already has a resolved
//! scope, enclosing function, and (for calls) a callee label.

use crate::ast::{
    ArrayElement, AssignTarget, ClassMemberKind, Declarator, Expr, ExprKind, ForHead, Function,
    ObjectProp, Pattern, Program, PropKey, Stmt, StmtKind, VarDecl,
};
use crate::context::{AnalysisContext, CallKind, Resolution};
use crate::flow_graph::Vertex;
use crate::ids::{FileId, FunctionId, NodeId, VertexId};

struct Builder<'ctx> {
    ctx: &'ctx mut AnalysisContext,
    file: FileId,
}

pub fn build(ctx: &mut AnalysisContext) {
    for idx in 0..ctx.files.len() {
        let file = ctx.files[idx].id;
        let empty = Program { id: ctx.files[idx].program.id, span: crate::ast::Span::dummy(), body: Vec::new() };
        let program = std::mem::replace(&mut ctx.files[idx].program, empty);
        {
            let mut builder = Builder { ctx, file };
            for stmt in &program.body {
                builder.stmt(stmt);
            }
        }
        ctx.files[idx].program = program;
    }
}

/// A left-hand-side target resolved to either a local binding or a global
/// name, used by both the assignment and read rules.
enum Target {
    Local(VertexId),
    Global(VertexId),
    Unknown,
}

impl Builder<'_> {
    fn resolution_vertex(&mut self, node: NodeId) -> Target {
        match self.ctx.resolution(self.file, node) {
            Some(Resolution::Local(decl)) => Target::Local(self.ctx.flow_graph.intern(Vertex::Var(*decl))),
            Some(Resolution::Global(name)) => {
                Target::Global(self.ctx.flow_graph.intern(Vertex::Glob(name.clone())))
            }
            None => Target::Unknown,
        }
    }

    fn enclosing_function(&self, node: NodeId) -> Option<FunctionId> {
        self.ctx.enclosing_function(self.file, node)
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match &stmt.kind {
            StmtKind::Expr(e) => {
                self.expr(e);
            }
            StmtKind::VarDecl(decl) => self.var_decl(decl),
            StmtKind::FunctionDecl(f) => {
                self.function(f);
            }
            StmtKind::ClassDecl(c) => self.class(c),
            StmtKind::Return(e) => {
                if let Some(e) = e {
                    let value = self.expr(e);
                    if let Some(fn_id) = self.enclosing_function(stmt.id) {
                        let ret = self.ctx.flow_graph.intern(Vertex::Ret(fn_id));
                        self.ctx.flow_graph.add_edge(value, ret);
                    }
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
                let rhs = self.expr(right);
                match left {
                    ForHead::VarDecl(decl) => {
                        for d in &decl.declarators {
                            self.declare_pattern_write(&d.name, rhs);
                        }
                    }
                    ForHead::Pattern(pattern) => self.assign_pattern_write(pattern, rhs),
                }
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
                    if let Some(param) = &handler.param {
                        let caught = self.ctx.flow_graph.intern(Vertex::Unknown);
                        self.declare_pattern_write(param, caught);
                    }
                    for s in &handler.body {
                        self.stmt(s);
                    }
                }
                if let Some(finalizer) = finalizer {
                    for s in finalizer {
                        self.stmt(s);
                    }
                }
            }
            StmtKind::Throw(e) => {
                self.expr(e);
            }
            StmtKind::Switch { discriminant, cases } => {
                self.expr(discriminant);
                for case in cases {
                    if let Some(test) = &case.test {
                        self.expr(test);
                    }
                    for s in &case.body {
                        self.stmt(s);
                    }
                }
            }
            StmtKind::Labeled { body, .. } => self.stmt(body),
            StmtKind::Break(_) | StmtKind::Continue(_) | StmtKind::Empty => {}
            StmtKind::Import(_) => {}
            StmtKind::Export(export) => match &export.kind {
                crate::ast::ExportKind::Named { .. } | crate::ast::ExportKind::All { .. } => {}
                crate::ast::ExportKind::Default(e) => {
                    self.expr(e);
                }
                crate::ast::ExportKind::Decl(inner) => self.stmt(inner),
            },
        }
    }

    fn var_decl(&mut self, decl: &VarDecl) {
        for d in &decl.declarators {
            self.declarator(d);
        }
    }

    fn declarator(&mut self, d: &Declarator) {
        if let Some(init) = &d.init {
            let value = self.expr(init);
            self.declare_pattern_write(&d.name, value);
        }
    }

    /// Rule 9 (destructuring), declaration side: expands a binding pattern
    /// used at a declaration site (hoisted `var`, `let`/`const`, function
    /// parameters, the catch binding) into property reads off `value` and
    /// writes into each leaf's declared `Var` vertex. A declaration site has
    /// no `ctx.resolution` entry (that table is for identifier *uses*), so
    /// leaves are found via `ctx.decl_at_node` instead.
    fn declare_pattern_write(&mut self, pattern: &Pattern, value: crate::ids::VertexId) {
        match pattern {
            Pattern::Identifier { id, .. } => {
                if let Some(decl) = self.ctx.decl_at_node(self.file, *id) {
                    let v = self.ctx.flow_graph.intern(Vertex::Var(decl));
                    self.ctx.flow_graph.add_edge(value, v);
                }
            }
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.declare_pattern_write(el, value);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    let field = self.object_pattern_field(prop);
                    self.declare_pattern_write(&prop.value, field);
                }
                if let Some(rest) = rest {
                    self.declare_pattern_write(rest, value);
                }
            }
            Pattern::Rest { argument, .. } => self.declare_pattern_write(argument, value),
            Pattern::Assign { left, right, .. } => {
                let default_value = self.expr(right);
                self.ctx.flow_graph.add_edge(default_value, value);
                self.declare_pattern_write(left, value);
            }
        }
    }

    /// Rule 9, assignment side: the same expansion for a pattern used as an
    /// assignment target (destructuring assignment, `for (x of xs)` with no
    /// declaration) rather than a declaration — leaves resolve via
    /// `ctx.resolution`, which the binder's `assign_pattern` populates for
    /// these positions.
    fn assign_pattern_write(&mut self, pattern: &Pattern, value: crate::ids::VertexId) {
        match pattern {
            Pattern::Identifier { id, .. } => match self.resolution_vertex(*id) {
                Target::Local(v) | Target::Global(v) => {
                    self.ctx.flow_graph.add_edge(value, v);
                }
                Target::Unknown => {}
            },
            Pattern::Array { elements, .. } => {
                for el in elements.iter().flatten() {
                    self.assign_pattern_write(el, value);
                }
            }
            Pattern::Object { props, rest, .. } => {
                for prop in props {
                    let field = self.object_pattern_field(prop);
                    self.assign_pattern_write(&prop.value, field);
                }
                if let Some(rest) = rest {
                    self.assign_pattern_write(rest, value);
                }
            }
            Pattern::Rest { argument, .. } => self.assign_pattern_write(argument, value),
            Pattern::Assign { left, right, .. } => {
                let default_value = self.expr(right);
                self.ctx.flow_graph.add_edge(default_value, value);
                self.assign_pattern_write(left, value);
            }
        }
    }

    /// Rule 4 applied to a destructured property: the field-based
    /// `Prop(name)` (or `Unknown` for a computed key) that the leaf pattern
    /// reads from, mirroring an ordinary `obj.name` read — field-based
    /// conflation means the source object's own vertex plays no part here.
    fn object_pattern_field(&mut self, prop: &crate::ast::ObjectPatternProp) -> crate::ids::VertexId {
        match prop.key.static_name() {
            Some(name) => self.ctx.flow_graph.intern(Vertex::Prop(name.to_owned())),
            None => self.ctx.flow_graph.intern(Vertex::Unknown),
        }
    }

    fn class(&mut self, class: &crate::ast::ClassDecl) {
        if let Some(sup) = &class.super_class {
            self.expr(sup);
        }
        for member in &class.members {
            if let Some(init) = &member.field_init {
                self.expr(init);
            }
            let Some(f) = &member.value else { continue };
            let fn_id = self.function(f);
            if let Some(name) = member.key.static_name() {
                let prop = self.ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
                let func = self.ctx.flow_graph.intern(Vertex::Func(fn_id));
                self.ctx.flow_graph.add_edge(func, prop);
            }
            if member.kind == ClassMemberKind::Constructor {
                let ctor_prop = self.ctx.flow_graph.intern(Vertex::Prop("constructor".to_owned()));
                let func = self.ctx.flow_graph.intern(Vertex::Func(fn_id));
                self.ctx.flow_graph.add_edge(func, ctor_prop);
            }
        }
    }

    /// Rule 5: a function literal's value vertex flows into its own
    /// expression/declarator vertex, plus, for declarations, into the
    /// function's own `Var`.
    fn function(&mut self, f: &Function) -> FunctionId {
        let fn_id = self
            .ctx
            .function_at_node(self.file, f.id)
            .expect("decorator registers every function before the edge builder runs");
        let func_vertex = self.ctx.flow_graph.intern(Vertex::Func(fn_id));
        let expr_vertex = self.ctx.flow_graph.intern(Vertex::Expr(f.id));
        self.ctx.flow_graph.add_edge(func_vertex, expr_vertex);
        // A named function declaration is hoisted against its own node,
        // so `decl_at_node` finds it directly; an anonymous function
        // expression has no such entry and this is a no-op.
        if let Some(decl) = self.ctx.decl_at_node(self.file, f.id) {
            let var = self.ctx.flow_graph.intern(Vertex::Var(decl));
            self.ctx.flow_graph.add_edge(func_vertex, var);
        }

        // Rule 7 is deferred to the strategies, but the binding site itself
        // is intraprocedural: each parameter's pattern expands against a
        // per-parameter `Expr` vertex that a strategy later feeds argument
        // values into (`Arg(call, i) -> Expr(param_nodes[i])`), same as any
        // other destructuring/default-value target.
        for p in &f.params {
            let param_vertex = self.ctx.flow_graph.intern(Vertex::Expr(p.id()));
            self.declare_pattern_write(p, param_vertex);
        }
        match &f.body {
            crate::ast::FunctionBody::Block(stmts) => {
                for s in stmts {
                    self.stmt(s);
                }
            }
            crate::ast::FunctionBody::Expr(e) => {
                // An arrow's expression body is an implicit return (rule 8).
                let value = self.expr(e);
                let ret = self.ctx.flow_graph.intern(Vertex::Ret(fn_id));
                self.ctx.flow_graph.add_edge(value, ret);
            }
        }
        fn_id
    }

    /// Returns the vertex holding `expr`'s computed value. Every case first
    /// interns `Expr(expr.id)` as the outer composite vertex (rule 9), wiring
    /// more specific vertices into it where a sharper identity exists.
    fn expr(&mut self, expr: &Expr) -> crate::ids::VertexId {
        let outer = self.ctx.flow_graph.intern(Vertex::Expr(expr.id));
        match &expr.kind {
            ExprKind::Identifier(_) => {
                match self.resolution_vertex(expr.id) {
                    Target::Local(v) | Target::Global(v) => {
                        self.ctx.flow_graph.add_edge(v, outer);
                    }
                    Target::Unknown => {
                        let unknown = self.ctx.flow_graph.intern(Vertex::Unknown);
                        self.ctx.flow_graph.add_edge(unknown, outer);
                    }
                }
            }
            ExprKind::This => {
                if let Target::Local(v) = self.resolution_vertex(expr.id) {
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
            ExprKind::Literal(_) => {}
            ExprKind::TemplateLiteral(parts) | ExprKind::Sequence(parts) => {
                for p in parts {
                    let v = self.expr(p);
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
            ExprKind::Array(elements) => {
                for el in elements.iter().flatten() {
                    let v = match el {
                        ArrayElement::Item(e) | ArrayElement::Spread(e) => self.expr(e),
                    };
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
            ExprKind::Object(props) => self.object_props(props, outer),
            ExprKind::Function(f) | ExprKind::Arrow(f) => {
                self.function(f);
                // `function()` itself already wires Func(fn) -> Expr(fn.id);
                // f.id == expr.id for function/arrow literals, so `outer`
                // already received that edge.
            }
            ExprKind::Class(c) => self.class(c),
            ExprKind::Unary { arg, .. } | ExprKind::Update { arg, .. } => {
                let v = self.expr(arg);
                self.ctx.flow_graph.add_edge(v, outer);
            }
            ExprKind::Spread(arg) => {
                let v = self.expr(arg);
                self.ctx.flow_graph.add_edge(v, outer);
            }
            ExprKind::Binary { left, right, .. } | ExprKind::Logical { left, right, .. } => {
                let lv = self.expr(left);
                let rv = self.expr(right);
                self.ctx.flow_graph.add_edge(lv, outer);
                self.ctx.flow_graph.add_edge(rv, outer);
            }
            ExprKind::Assign { target, value, .. } => {
                let rhs = self.expr(value);
                self.assign_target(target, rhs);
                self.ctx.flow_graph.add_edge(rhs, outer);
            }
            ExprKind::Conditional { test, cons, alt } => {
                self.expr(test);
                let cv = self.expr(cons);
                let av = self.expr(alt);
                self.ctx.flow_graph.add_edge(cv, outer);
                self.ctx.flow_graph.add_edge(av, outer);
            }
            ExprKind::Call { callee, args, .. } => self.call(expr.id, callee, args, CallKind::Call, outer),
            ExprKind::New { callee, args } => self.call(expr.id, callee, args, CallKind::New, outer),
            ExprKind::Member { object, property, computed, .. } => {
                self.expr(object);
                let prop_name = if *computed {
                    if let PropKey::Computed(key_expr) = property {
                        self.expr(key_expr);
                    }
                    None
                } else {
                    property.static_name().map(str::to_owned)
                };
                // Rule 4: a computed-key read has no derivable name and
                // flows from Unknown instead of a spurious Prop vertex.
                let source = match prop_name {
                    Some(name) => self.ctx.flow_graph.intern(Vertex::Prop(name)),
                    None => self.ctx.flow_graph.intern(Vertex::Unknown),
                };
                self.ctx.flow_graph.add_edge(source, outer);
            }
            ExprKind::TaggedTemplate { tag, quasi } => {
                self.expr(tag);
                for q in quasi {
                    let v = self.expr(q);
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
            ExprKind::Await(e) => {
                let v = self.expr(e);
                self.ctx.flow_graph.add_edge(v, outer);
            }
            ExprKind::Yield { arg, .. } => {
                if let Some(arg) = arg {
                    let v = self.expr(arg);
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
        }
        outer
    }

    /// Rule 3: a property write does not connect the receiver to `Prop(p)`.
    fn assign_target(&mut self, target: &AssignTarget, rhs: crate::ids::VertexId) {
        match target {
            AssignTarget::Identifier { id, .. } => match self.resolution_vertex(*id) {
                Target::Local(v) | Target::Global(v) => {
                    self.ctx.flow_graph.add_edge(rhs, v);
                }
                Target::Unknown => {}
            },
            AssignTarget::Member(member) => {
                let ExprKind::Member { object, property, computed, .. } = &member.kind else {
                    return;
                };
                self.expr(object);
                if *computed {
                    if let PropKey::Computed(key_expr) = property {
                        self.expr(key_expr);
                    }
                    return;
                }
                if let Some(name) = property.static_name() {
                    let prop = self.ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
                    self.ctx.flow_graph.add_edge(rhs, prop);
                }
            }
            AssignTarget::Pattern(pattern) => self.assign_pattern_write(pattern, rhs),
        }
    }

    /// Rule 6 (plus the `new` extension). Also detects one-shot (IIFE)
    /// shapes so the ONESHOT strategy does not need to re-derive them: a
    /// callee that is itself a function literal, or a `.call`/`.apply` off
    /// one, is recorded on the `CallInfo` as its `iife_target`.
    fn call(&mut self, node: NodeId, callee: &Expr, args: &[Expr], kind: CallKind, outer: crate::ids::VertexId) {
        let callee_vertex = self.expr(callee);
        let call_id = self
            .ctx
            .call_at_node(self.file, node)
            .expect("decorator registers every call/new site before the edge builder runs");

        let callee_slot = self.ctx.flow_graph.intern(Vertex::Callee(call_id));
        self.ctx.flow_graph.add_edge(callee_vertex, callee_slot);

        for (i, arg) in args.iter().enumerate() {
            let av = self.expr(arg);
            let idx = u32::try_from(i).expect("argument index fits in u32");
            let slot = self.ctx.flow_graph.intern(Vertex::Arg(call_id, idx));
            self.ctx.flow_graph.add_edge(av, slot);
        }

        let res = self.ctx.flow_graph.intern(Vertex::Res(call_id));
        self.ctx.flow_graph.add_edge(res, outer);

        if let CallKind::New = kind {
            // Instances approximate their constructors: anything that
            // flows into the callee slot — including, once
            // reachability runs, every `Func` that resolves there — also
            // flows into the `new` expression's own vertex.
            self.ctx.flow_graph.add_edge(callee_vertex, outer);
        }

        if let Some(target) = self.iife_like_target(callee) {
            self.ctx.set_iife_target(call_id, target);
        }
    }

    /// A callee is one-shot if it is a function literal directly, or a
    /// `.call`/`.apply` member access off one (`(function(){}).call(this)`).
    fn iife_like_target(&self, callee: &Expr) -> Option<FunctionId> {
        match &callee.kind {
            ExprKind::Function(f) | ExprKind::Arrow(f) => self.ctx.function_at_node(self.file, f.id),
            ExprKind::Member { object, property, computed: false, .. } => {
                let name = property.static_name()?;
                if name != "call" && name != "apply" && name != "bind" {
                    return None;
                }
                match &object.kind {
                    ExprKind::Function(f) | ExprKind::Arrow(f) => self.ctx.function_at_node(self.file, f.id),
                    _ => None,
                }
            }
            _ => None,
        }
    }

    fn object_props(&mut self, props: &[ObjectProp], outer: crate::ids::VertexId) {
        for prop in props {
            match prop {
                ObjectProp::KeyValue { key, value, computed, .. } => {
                    let v = self.expr(value);
                    if *computed {
                        if let PropKey::Computed(k) = key {
                            self.expr(k);
                        }
                        self.ctx.flow_graph.add_edge(v, outer);
                        continue;
                    }
                    if let Some(name) = key.static_name() {
                        let prop_vertex = self.ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
                        self.ctx.flow_graph.add_edge(v, prop_vertex);
                    }
                    self.ctx.flow_graph.add_edge(v, outer);
                }
                ObjectProp::Method { key, computed, function } => {
                    let fn_id = self.function(function);
                    let func = self.ctx.flow_graph.intern(Vertex::Func(fn_id));
                    if *computed {
                        if let PropKey::Computed(k) = key {
                            self.expr(k);
                        }
                        self.ctx.flow_graph.add_edge(func, outer);
                        continue;
                    }
                    if let Some(name) = key.static_name() {
                        let prop_vertex = self.ctx.flow_graph.intern(Vertex::Prop(name.to_owned()));
                        self.ctx.flow_graph.add_edge(func, prop_vertex);
                    }
                    self.ctx.flow_graph.add_edge(func, outer);
                }
                ObjectProp::Spread(e) => {
                    let v = self.expr(e);
                    self.ctx.flow_graph.add_edge(v, outer);
                }
            }
        }
    }
}
