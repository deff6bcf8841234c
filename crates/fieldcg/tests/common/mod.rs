//! Small hand-rolled AST builders shared by the integration tests. `fieldcg`
//! takes an owned [`Program`] rather than source text (see `ast.rs`'s doc
//! comment), so exercising the crate's public behavior means constructing
//! one directly instead of parsing a string — these helpers keep the
//! scenario tests themselves readable.

#![allow(dead_code)]

use fieldcg::ast::{
    ArrayElement, AssignTarget, Declarator, Expr, ExprKind, ImportDecl, ImportSpecifier, Literal,
    Pattern, Program, PropKey, Span, Stmt, StmtKind, VarDecl, VarDeclKind,
};
use fieldcg::ast::{Function, FunctionBody};
use fieldcg::ids::NodeIdGen;

pub struct Ids(NodeIdGen);

impl Ids {
    pub fn new() -> Self {
        Self(NodeIdGen::new())
    }

    pub fn next(&mut self) -> fieldcg::ids::NodeId {
        self.0.next_id()
    }
}

pub fn span() -> Span {
    Span::dummy()
}

pub fn ident_pattern(ids: &mut Ids, name: &str) -> Pattern {
    Pattern::Identifier { id: ids.next(), name: name.to_owned() }
}

pub fn ident_expr(ids: &mut Ids, name: &str) -> Expr {
    Expr { id: ids.next(), span: span(), kind: ExprKind::Identifier(name.to_owned()) }
}

pub fn number_expr(ids: &mut Ids, n: f64) -> Expr {
    Expr { id: ids.next(), span: span(), kind: ExprKind::Literal(Literal::Number(n)) }
}

pub fn call_expr(ids: &mut Ids, callee: Expr, args: Vec<Expr>) -> Expr {
    Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Call { callee: Box::new(callee), args, optional: false },
    }
}

pub fn member_expr(ids: &mut Ids, object: Expr, name: &str) -> Expr {
    Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Member {
            object: Box::new(object),
            property: PropKey::Identifier(name.to_owned()),
            computed: false,
            optional: false,
        },
    }
}

pub fn assign_expr(ids: &mut Ids, name: &str, value: Expr) -> Expr {
    Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Assign {
            op: "=".to_owned(),
            target: AssignTarget::Identifier { id: ids.next(), name: name.to_owned() },
            value: Box::new(value),
        },
    }
}

pub fn array_expr(ids: &mut Ids, items: Vec<Expr>) -> Expr {
    Expr {
        id: ids.next(),
        span: span(),
        kind: ExprKind::Array(items.into_iter().map(|e| Some(ArrayElement::Item(e))).collect()),
    }
}

pub fn func_expr(
    ids: &mut Ids,
    name: Option<&str>,
    params: Vec<Pattern>,
    body: Vec<Stmt>,
    is_arrow: bool,
) -> Expr {
    let fn_id = ids.next();
    let function = Function {
        id: fn_id,
        span: span(),
        name: name.map(str::to_owned),
        params,
        body: FunctionBody::Block(body),
        is_arrow,
        is_async: false,
        is_generator: false,
    };
    let kind = if is_arrow { ExprKind::Arrow(function) } else { ExprKind::Function(function) };
    Expr { id: fn_id, span: span(), kind }
}

pub fn fn_decl_stmt(ids: &mut Ids, name: &str, params: Vec<Pattern>, body: Vec<Stmt>) -> Stmt {
    let fn_id = ids.next();
    let function = Function {
        id: fn_id,
        span: span(),
        name: Some(name.to_owned()),
        params,
        body: FunctionBody::Block(body),
        is_arrow: false,
        is_async: false,
        is_generator: false,
    };
    Stmt { id: fn_id, span: span(), kind: StmtKind::FunctionDecl(function) }
}

pub fn expr_stmt(ids: &mut Ids, e: Expr) -> Stmt {
    Stmt { id: ids.next(), span: span(), kind: StmtKind::Expr(e) }
}

pub fn return_stmt(ids: &mut Ids, e: Option<Expr>) -> Stmt {
    Stmt { id: ids.next(), span: span(), kind: StmtKind::Return(e) }
}

pub fn var_decl_stmt(ids: &mut Ids, kind: VarDeclKind, name: &str, init: Option<Expr>) -> Stmt {
    let decl_id = ids.next();
    let declarator = Declarator { id: ids.next(), name: ident_pattern(ids, name), init };
    Stmt {
        id: decl_id,
        span: span(),
        kind: StmtKind::VarDecl(VarDecl { id: decl_id, kind, declarators: vec![declarator] }),
    }
}

pub fn import_named_stmt(ids: &mut Ids, imported: &str, local: &str, source: &str) -> Stmt {
    Stmt {
        id: ids.next(),
        span: span(),
        kind: StmtKind::Import(ImportDecl {
            id: ids.next(),
            specifiers: vec![ImportSpecifier::Named {
                id: ids.next(),
                imported: imported.to_owned(),
                local: local.to_owned(),
            }],
            source: source.to_owned(),
        }),
    }
}

pub fn export_named_stmt(ids: &mut Ids, local: &str, exported: &str) -> Stmt {
    use fieldcg::ast::{ExportDecl, ExportKind, ExportSpecifier};
    Stmt {
        id: ids.next(),
        span: span(),
        kind: StmtKind::Export(ExportDecl {
            id: ids.next(),
            kind: ExportKind::Named {
                specifiers: vec![ExportSpecifier {
                    local: local.to_owned(),
                    exported: exported.to_owned(),
                }],
                source: None,
            },
        }),
    }
}

pub fn export_decl_stmt(ids: &mut Ids, inner: Stmt) -> Stmt {
    use fieldcg::ast::{ExportDecl, ExportKind};
    Stmt {
        id: ids.next(),
        span: span(),
        kind: StmtKind::Export(ExportDecl { id: ids.next(), kind: ExportKind::Decl(Box::new(inner)) }),
    }
}

pub fn program(ids: &mut Ids, body: Vec<Stmt>) -> Program {
    Program { id: ids.next(), span: span(), body }
}
