//! A plain, owned AST for the input language.
//!
//! This is deliberately not a borrow of whatever a concrete parser produces:
//! every node is an owned value carrying its own [`NodeId`] and [`Span`], so
//! the rest of the crate never has to thread a parser's arena lifetime
//! through `AnalysisContext`, scopes, or the flow graph. A front end builds
//! one of these once (see `fieldcg-cli`'s converter) and hands it to
//! [`crate::analyze`] by value.

use crate::ids::NodeId;

/// A source range, in both byte offsets and 0-based row/column pairs, as the
/// external parser reports them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start_byte: u32,
    pub end_byte: u32,
    pub start_row: u32,
    pub start_col: u32,
    pub end_row: u32,
    pub end_col: u32,
}

impl Span {
    #[must_use]
    pub const fn dummy() -> Self {
        Self {
            start_byte: 0,
            end_byte: 0,
            start_row: 0,
            start_col: 0,
            end_row: 0,
            end_col: 0,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Program {
    pub id: NodeId,
    pub span: Span,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub struct Stmt {
    pub id: NodeId,
    pub span: Span,
    pub kind: StmtKind,
}

#[derive(Debug, Clone)]
pub enum StmtKind {
    Expr(Expr),
    VarDecl(VarDecl),
    FunctionDecl(Function),
    ClassDecl(ClassDecl),
    Return(Option<Expr>),
    If {
        test: Expr,
        cons: Box<Stmt>,
        alt: Option<Box<Stmt>>,
    },
    Block(Vec<Stmt>),
    For {
        init: Option<Box<Stmt>>,
        test: Option<Expr>,
        update: Option<Expr>,
        body: Box<Stmt>,
    },
    ForIn {
        left: ForHead,
        right: Expr,
        body: Box<Stmt>,
        of: bool,
    },
    While {
        test: Expr,
        body: Box<Stmt>,
    },
    DoWhile {
        body: Box<Stmt>,
        test: Expr,
    },
    Try {
        block: Vec<Stmt>,
        handler: Option<CatchClause>,
        finalizer: Option<Vec<Stmt>>,
    },
    Throw(Expr),
    Switch {
        discriminant: Expr,
        cases: Vec<SwitchCase>,
    },
    Labeled {
        label: String,
        body: Box<Stmt>,
    },
    Break(Option<String>),
    Continue(Option<String>),
    Import(ImportDecl),
    Export(ExportDecl),
    Empty,
}

#[derive(Debug, Clone)]
pub struct CatchClause {
    pub id: NodeId,
    pub param: Option<Pattern>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone)]
pub enum ForHead {
    VarDecl(VarDecl),
    Pattern(Pattern),
}

#[derive(Debug, Clone)]
pub struct SwitchCase {
    pub test: Option<Expr>,
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VarDeclKind {
    Var,
    Let,
    Const,
}

#[derive(Debug, Clone)]
pub struct VarDecl {
    pub id: NodeId,
    pub kind: VarDeclKind,
    pub declarators: Vec<Declarator>,
}

#[derive(Debug, Clone)]
pub struct Declarator {
    pub id: NodeId,
    pub name: Pattern,
    pub init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct Expr {
    pub id: NodeId,
    pub span: Span,
    pub kind: ExprKind,
}

#[derive(Debug, Clone)]
pub enum ExprKind {
    Identifier(String),
    This,
    Literal(Literal),
    TemplateLiteral(Vec<Expr>),
    Array(Vec<Option<ArrayElement>>),
    Object(Vec<ObjectProp>),
    Function(Function),
    Arrow(Function),
    Class(ClassDecl),
    Unary {
        op: String,
        arg: Box<Expr>,
    },
    Update {
        op: String,
        arg: Box<Expr>,
        prefix: bool,
    },
    Binary {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Logical {
        op: String,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    Assign {
        op: String,
        target: AssignTarget,
        value: Box<Expr>,
    },
    Conditional {
        test: Box<Expr>,
        cons: Box<Expr>,
        alt: Box<Expr>,
    },
    Call {
        callee: Box<Expr>,
        args: Vec<Expr>,
        optional: bool,
    },
    New {
        callee: Box<Expr>,
        args: Vec<Expr>,
    },
    Member {
        object: Box<Expr>,
        property: PropKey,
        computed: bool,
        optional: bool,
    },
    Sequence(Vec<Expr>),
    TaggedTemplate {
        tag: Box<Expr>,
        quasi: Vec<Expr>,
    },
    Await(Box<Expr>),
    Yield {
        arg: Option<Box<Expr>>,
        delegate: bool,
    },
    Spread(Box<Expr>),
}

#[derive(Debug, Clone)]
pub enum ArrayElement {
    Item(Expr),
    Spread(Expr),
}

#[derive(Debug, Clone)]
pub enum Literal {
    Null,
    Undefined,
    Bool(bool),
    Number(f64),
    String(String),
    Regex(String),
}

#[derive(Debug, Clone)]
pub enum PropKey {
    Identifier(String),
    StringLit(String),
    NumberLit(f64),
    Computed(Box<Expr>),
}

impl PropKey {
    /// The static property name, if this key is not computed. `None` for
    /// `Computed` keys and numeric keys, which the field-based model does
    /// not attempt to stringify.
    #[must_use]
    pub fn static_name(&self) -> Option<&str> {
        match self {
            Self::Identifier(name) | Self::StringLit(name) => Some(name),
            Self::NumberLit(_) | Self::Computed(_) => None,
        }
    }
}

#[derive(Debug, Clone)]
pub enum ObjectProp {
    KeyValue {
        key: PropKey,
        value: Expr,
        computed: bool,
        shorthand: bool,
    },
    Method {
        key: PropKey,
        computed: bool,
        function: Function,
    },
    Spread(Expr),
}

#[derive(Debug, Clone)]
pub enum AssignTarget {
    Identifier { id: NodeId, name: String },
    Member(Box<Expr>),
    Pattern(Box<Pattern>),
}

#[derive(Debug, Clone)]
pub enum Pattern {
    Identifier {
        id: NodeId,
        name: String,
    },
    Array {
        id: NodeId,
        elements: Vec<Option<Pattern>>,
    },
    Object {
        id: NodeId,
        props: Vec<ObjectPatternProp>,
        rest: Option<Box<Pattern>>,
    },
    Rest {
        id: NodeId,
        argument: Box<Pattern>,
    },
    Assign {
        id: NodeId,
        left: Box<Pattern>,
        right: Box<Expr>,
    },
}

impl Pattern {
    #[must_use]
    pub fn id(&self) -> NodeId {
        match self {
            Self::Identifier { id, .. }
            | Self::Array { id, .. }
            | Self::Object { id, .. }
            | Self::Rest { id, .. }
            | Self::Assign { id, .. } => *id,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ObjectPatternProp {
    pub key: PropKey,
    pub value: Pattern,
    pub computed: bool,
    pub shorthand: bool,
}

#[derive(Debug, Clone)]
pub struct Function {
    pub id: NodeId,
    pub span: Span,
    /// The declared name only (`function foo(){}`, `class { foo(){} }`'s
    /// own method name is carried on [`ClassMember`] instead). Names
    /// synthesized from an enclosing assignment, declarator, or the
    /// callback/free-anonymous pipeline live in the decorator's side-table,
    /// not here.
    pub name: Option<String>,
    pub params: Vec<Pattern>,
    pub body: FunctionBody,
    pub is_arrow: bool,
    pub is_async: bool,
    pub is_generator: bool,
}

#[derive(Debug, Clone)]
pub enum FunctionBody {
    Block(Vec<Stmt>),
    Expr(Box<Expr>),
}

#[derive(Debug, Clone)]
pub struct ClassDecl {
    pub id: NodeId,
    pub span: Span,
    pub name: Option<String>,
    pub super_class: Option<Box<Expr>>,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassMemberKind {
    Constructor,
    Method,
    Get,
    Set,
    Field,
}

#[derive(Debug, Clone)]
pub struct ClassMember {
    pub id: NodeId,
    pub key: PropKey,
    pub computed: bool,
    pub kind: ClassMemberKind,
    pub is_static: bool,
    pub value: Option<Function>,
    pub field_init: Option<Expr>,
}

#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub id: NodeId,
    pub specifiers: Vec<ImportSpecifier>,
    pub source: String,
}

#[derive(Debug, Clone)]
pub enum ImportSpecifier {
    Default { id: NodeId, local: String },
    Namespace { id: NodeId, local: String },
    Named { id: NodeId, imported: String, local: String },
}

#[derive(Debug, Clone)]
pub struct ExportDecl {
    pub id: NodeId,
    pub kind: ExportKind,
}

#[derive(Debug, Clone)]
pub enum ExportKind {
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<String>,
    },
    Default(Box<Expr>),
    Decl(Box<Stmt>),
    All {
        source: String,
    },
}

#[derive(Debug, Clone)]
pub struct ExportSpecifier {
    pub local: String,
    pub exported: String,
}
