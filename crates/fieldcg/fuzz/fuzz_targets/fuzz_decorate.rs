//! Fuzz target: run the full phase pipeline over a randomly shaped AST.
//!
//! `fieldcg` owns no parser of its own (see `ast.rs`'s doc comment), so
//! there is no raw source text to hand a fuzzer the way a parser-fronted
//! crate would; instead this target drives a small bounded-depth generator
//! off the fuzzer's byte stream to build a `fieldcg::ast::Program` directly,
//! covering the shapes decorator/binder/edge_builder/module_linker/strategy
//! actually branch on (nested functions, destructuring, member/call chains,
//! import/export forms). A crash here means one of those phases panics on a
//! shape it should instead handle or quietly skip.

#![no_main]

use libfuzzer_sys::fuzz_target;

use fieldcg::ast::{
    ArrayElement, AssignTarget, Declarator, Expr, ExprKind, ExportDecl, ExportKind, ExportSpecifier,
    Function, FunctionBody, ImportDecl, ImportSpecifier, Literal, ObjectPatternProp, Pattern,
    Program, PropKey, Span, Stmt, StmtKind, VarDecl, VarDeclKind,
};
use fieldcg::ids::NodeIdGen;
use fieldcg::{AnalysisConfig, analyze};

const MAX_DEPTH: u32 = 5;
const NAMES: &[&str] = &["a", "b", "c", "f", "g", "x", "y", "then", "forEach", "exports", "module"];

struct Gen<'a> {
    data: &'a [u8],
    pos: usize,
    ids: NodeIdGen,
}

impl<'a> Gen<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0, ids: NodeIdGen::new() }
    }

    fn byte(&mut self) -> u8 {
        let b = self.data.get(self.pos).copied().unwrap_or(0);
        self.pos = self.pos.saturating_add(1);
        b
    }

    fn choose(&mut self, n: usize) -> usize {
        if n == 0 { 0 } else { self.byte() as usize % n }
    }

    fn name(&mut self) -> String {
        NAMES[self.choose(NAMES.len())].to_owned()
    }

    fn span(&self) -> Span {
        Span::dummy()
    }

    fn pattern(&mut self, depth: u32) -> Pattern {
        if depth >= MAX_DEPTH {
            return Pattern::Identifier { id: self.ids.next_id(), name: self.name() };
        }
        match self.choose(4) {
            0 => Pattern::Identifier { id: self.ids.next_id(), name: self.name() },
            1 => {
                let count = self.choose(3);
                let elements = (0..count).map(|_| Some(self.pattern(depth + 1))).collect();
                Pattern::Array { id: self.ids.next_id(), elements }
            }
            2 => {
                let count = self.choose(3);
                let props = (0..count)
                    .map(|_| ObjectPatternProp {
                        key: PropKey::Identifier(self.name()),
                        value: self.pattern(depth + 1),
                        computed: false,
                        shorthand: false,
                    })
                    .collect();
                Pattern::Object { id: self.ids.next_id(), props, rest: None }
            }
            _ => Pattern::Assign {
                id: self.ids.next_id(),
                left: Box::new(self.pattern(depth + 1)),
                right: Box::new(self.expr(depth + 1)),
            },
        }
    }

    fn function(&mut self, depth: u32, named: bool) -> Function {
        let param_count = self.choose(3);
        let params = (0..param_count).map(|_| self.pattern(depth + 1)).collect();
        let body = if self.choose(2) == 0 {
            FunctionBody::Expr(Box::new(self.expr(depth + 1)))
        } else {
            let count = self.choose(3);
            FunctionBody::Block((0..count).map(|_| self.stmt(depth + 1)).collect())
        };
        Function {
            id: self.ids.next_id(),
            span: self.span(),
            name: if named { Some(self.name()) } else { None },
            params,
            body,
            is_arrow: self.choose(2) == 0,
            is_async: self.choose(2) == 0,
            is_generator: false,
        }
    }

    fn expr(&mut self, depth: u32) -> Expr {
        let id = self.ids.next_id();
        let span = self.span();
        if depth >= MAX_DEPTH {
            return Expr { id, span, kind: ExprKind::Identifier(self.name()) };
        }
        let kind = match self.choose(9) {
            0 => ExprKind::Identifier(self.name()),
            1 => ExprKind::Literal(Literal::Number(f64::from(self.byte()))),
            2 => ExprKind::Function(self.function(depth + 1, false)),
            3 => ExprKind::Arrow(self.function(depth + 1, false)),
            4 => ExprKind::Call {
                callee: Box::new(self.expr(depth + 1)),
                args: (0..self.choose(3)).map(|_| self.expr(depth + 1)).collect(),
                optional: false,
            },
            5 => ExprKind::New {
                callee: Box::new(self.expr(depth + 1)),
                args: (0..self.choose(3)).map(|_| self.expr(depth + 1)).collect(),
            },
            6 => ExprKind::Member {
                object: Box::new(self.expr(depth + 1)),
                property: PropKey::Identifier(self.name()),
                computed: self.choose(2) == 0,
                optional: false,
            },
            7 => ExprKind::Assign {
                op: "=".to_owned(),
                target: self.assign_target(depth + 1),
                value: Box::new(self.expr(depth + 1)),
            },
            _ => ExprKind::Array(
                (0..self.choose(3))
                    .map(|_| Some(ArrayElement::Item(self.expr(depth + 1))))
                    .collect(),
            ),
        };
        Expr { id, span, kind }
    }

    fn assign_target(&mut self, depth: u32) -> AssignTarget {
        match self.choose(3) {
            0 => AssignTarget::Identifier { id: self.ids.next_id(), name: self.name() },
            1 => AssignTarget::Member(Box::new(self.expr(depth))),
            _ => AssignTarget::Pattern(Box::new(self.pattern(depth))),
        }
    }

    fn stmt(&mut self, depth: u32) -> Stmt {
        let id = self.ids.next_id();
        let span = self.span();
        if depth >= MAX_DEPTH {
            return Stmt { id, span, kind: StmtKind::Empty };
        }
        let kind = match self.choose(8) {
            0 => StmtKind::Expr(self.expr(depth + 1)),
            1 => {
                let declarators = (0..self.choose(3).max(1))
                    .map(|_| Declarator {
                        id: self.ids.next_id(),
                        name: self.pattern(depth + 1),
                        init: if self.choose(2) == 0 { Some(self.expr(depth + 1)) } else { None },
                    })
                    .collect();
                StmtKind::VarDecl(VarDecl {
                    id: self.ids.next_id(),
                    kind: [VarDeclKind::Var, VarDeclKind::Let, VarDeclKind::Const]
                        [self.choose(3)],
                    declarators,
                })
            }
            2 => StmtKind::FunctionDecl(self.function(depth + 1, true)),
            3 => StmtKind::Return(if self.choose(2) == 0 { Some(self.expr(depth + 1)) } else { None }),
            4 => StmtKind::If {
                test: self.expr(depth + 1),
                cons: Box::new(self.stmt(depth + 1)),
                alt: if self.choose(2) == 0 { Some(Box::new(self.stmt(depth + 1))) } else { None },
            },
            5 => StmtKind::Import(ImportDecl {
                id: self.ids.next_id(),
                specifiers: (0..self.choose(3))
                    .map(|_| match self.choose(3) {
                        0 => ImportSpecifier::Default { id: self.ids.next_id(), local: self.name() },
                        1 => ImportSpecifier::Namespace { id: self.ids.next_id(), local: self.name() },
                        _ => ImportSpecifier::Named {
                            id: self.ids.next_id(),
                            imported: self.name(),
                            local: self.name(),
                        },
                    })
                    .collect(),
                source: format!("./{}", self.name()),
            }),
            6 => StmtKind::Export(ExportDecl {
                id: self.ids.next_id(),
                kind: match self.choose(3) {
                    0 => ExportKind::Default(Box::new(self.expr(depth + 1))),
                    1 => ExportKind::Named {
                        specifiers: (0..self.choose(3))
                            .map(|_| ExportSpecifier { local: self.name(), exported: self.name() })
                            .collect(),
                        source: None,
                    },
                    _ => ExportKind::All { source: format!("./{}", self.name()) },
                },
            }),
            _ => StmtKind::Block((0..self.choose(3)).map(|_| self.stmt(depth + 1)).collect()),
        };
        Stmt { id, span, kind }
    }
}

fuzz_target!(|data: &[u8]| {
    if data.len() > 4096 {
        return;
    }
    let mut gen = Gen::new(data);
    let stmt_count = gen.choose(6);
    let body = (0..stmt_count).map(|_| gen.stmt(0)).collect();
    let program = Program { id: gen.ids.next_id(), span: Span::dummy(), body };

    // We only care that no phase panics; the result itself is unchecked.
    let _ = analyze(vec![("fuzz.js".to_owned(), program)], AnalysisConfig::default());
});
