//! Abstract syntax tree produced by the parser.
//!
//! Every node family from the source grammar becomes one Rust `enum`
//! with one variant per node kind; the dynamic "dispatch by lowercased
//! class name" mechanism of the original has no equivalent here —
//! callers match exhaustively instead.

use crate::token::Token;

/// `left op right`, shared by every binary expression kind.
#[derive(Debug, Clone, PartialEq)]
pub struct BinExpr {
    pub left: Box<Expr>,
    pub op: Token,
    pub right: Box<Expr>,
}

/// `op operand`, shared by every unary/grouping expression kind.
#[derive(Debug, Clone, PartialEq)]
pub struct UnExpr {
    pub op: Token,
    pub operand: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CallExpr {
    pub left: Box<Expr>,
    pub paren: Token,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubscriptExpr {
    pub left: Box<Expr>,
    pub bracket: Token,
    pub args: Vec<Expr>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DotExpr {
    pub left: Box<Expr>,
    pub dot: Token,
    pub member: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Primary(Token),
    Subscript(SubscriptExpr),
    Call(CallExpr),
    Dot(DotExpr),
    Group(UnExpr),
    Negate(UnExpr),
    Posify(UnExpr),
    Not(UnExpr),
    BitNot(UnExpr),
    Add(BinExpr),
    Subtract(BinExpr),
    Multiply(BinExpr),
    Divide(BinExpr),
    And(BinExpr),
    Or(BinExpr),
    BitAnd(BinExpr),
    BitOr(BinExpr),
    Equal(BinExpr),
    NEqual(BinExpr),
    LessT(BinExpr),
    LessE(BinExpr),
    GreatT(BinExpr),
    GreatE(BinExpr),
    Is(BinExpr),
    IsNot(BinExpr),
}

impl Expr {
    /// A short, stable name for the expression's kind, used in
    /// diagnostics (e.g. "cannot assign to expression of kind 'call'").
    #[must_use]
    pub fn kind_name(&self) -> &'static str {
        match self {
            Expr::Primary(_) => "primary",
            Expr::Subscript(_) => "subscript",
            Expr::Call(_) => "call",
            Expr::Dot(_) => "dot",
            Expr::Group(_) => "group",
            Expr::Negate(_) => "negate",
            Expr::Posify(_) => "posify",
            Expr::Not(_) => "not",
            Expr::BitNot(_) => "bitnot",
            Expr::Add(_) => "add",
            Expr::Subtract(_) => "subtract",
            Expr::Multiply(_) => "multiply",
            Expr::Divide(_) => "divide",
            Expr::And(_) => "and",
            Expr::Or(_) => "or",
            Expr::BitAnd(_) => "bitand",
            Expr::BitOr(_) => "bitor",
            Expr::Equal(_) => "equal",
            Expr::NEqual(_) => "nequal",
            Expr::LessT(_) => "lesst",
            Expr::LessE(_) => "lesse",
            Expr::GreatT(_) => "greatt",
            Expr::GreatE(_) => "greate",
            Expr::Is(_) => "is",
            Expr::IsNot(_) => "isnot",
        }
    }
}

/// `Name`, `Name[T, ...]`, `Name.Member`, `auto`, `auto(expr)`.
#[derive(Debug, Clone, PartialEq)]
pub enum TypeExpr {
    TypeName(Token),
    TypeAuto(Token),
    TypeDeduce { auto: Token, operand: Box<Expr> },
    TypeCall { bracket: Token, generic: Box<TypeExpr>, params: Vec<TypeExpr> },
    TypeMember { dot: Token, left: Box<TypeExpr>, right: Token },
}

/// `name: TypeExpr`.
#[derive(Debug, Clone, PartialEq)]
pub struct Decl {
    pub name: Token,
    pub ty: TypeExpr,
}

/// A `free`-qualified field declaration: `free name: TypeExpr;`.
#[derive(Debug, Clone, PartialEq)]
pub struct FDecl {
    pub decl: Decl,
    pub free: Token,
}

/// A `free`-qualified field declaration with an initializer.
#[derive(Debug, Clone, PartialEq)]
pub struct FDeclInit {
    pub fdecl: FDecl,
    pub init: Expr,
}

/// The common signature shape of `fn`/method declarations: name,
/// parameter list and return type.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcSig {
    pub fn_kw: Token,
    pub name: Token,
    pub params: Vec<Decl>,
    pub return_type: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MethodDecl {
    pub sig: ProcSig,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FunctionDecl {
    pub sig: ProcSig,
    pub free: Token,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub brace: Token,
    pub members: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Method {
    pub sig: ProcSig,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub sig: ProcSig,
    pub free: Token,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Import {
    pub using: Token,
    pub path: Vec<Token>,
    pub up_count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TypeAlias {
    pub using: Token,
    pub name: Token,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ClassMember {
    Decl(Decl),
    FDecl(FDecl),
    FDeclInit(FDeclInit),
    MethodDecl(MethodDecl),
    FunctionDecl(FunctionDecl),
    Method(Method),
    Function(Function),
    Import(Import),
    TypeAlias(TypeAlias),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Class {
    pub class_kw: Token,
    pub name: Token,
    pub members: Vec<ClassMember>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Generic {
    pub class: Class,
    pub type_params: Vec<Token>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct If {
    pub if_kw: Token,
    pub cond: Expr,
    pub body: Block,
    pub else_branch: Option<(Token, Block)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct While {
    pub while_kw: Token,
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct For {
    pub for_kw: Token,
    pub bind: Token,
    pub iterable: Expr,
    pub body: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub left: Expr,
    pub op: Token,
    pub right: Expr,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Init {
    pub assign: Assign,
    pub ty: TypeExpr,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Stmt {
    Break(Token),
    Continue(Token),
    Return { kw: Token, expr: Option<Expr> },
    Decl(Decl),
    FDecl(FDecl),
    FDeclInit(FDeclInit),
    MethodDecl(MethodDecl),
    FunctionDecl(FunctionDecl),
    Block(Block),
    Method(Method),
    Function(Function),
    Import(Import),
    TypeAlias(TypeAlias),
    Class(Class),
    Generic(Generic),
    If(If),
    While(While),
    For(For),
    Assign(Assign),
    Init(Init),
    Expr(Expr),
}

/// A top-level item: the things [`crate::parser::Parser::parse_program`]
/// can return between `Eot`-terminated scans of the source.
#[derive(Debug, Clone, PartialEq)]
pub enum TopLevel {
    Import(Import),
    TypeAlias(TypeAlias),
    Class(Class),
    Generic(Generic),
}
