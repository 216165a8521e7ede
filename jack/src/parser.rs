//! LL(1) recursive-descent parser producing a Jack [`ast`](crate::ast).
//!
//! One token of lookahead (`current`), no pushback: every production
//! either consumes `current` or fails outright, matching the grammar's
//! LL(1) shape. Validity of `break`/`continue`/`return`/`this` is gated
//! by a small stack of context flags (loop / method / function) that
//! nested constructs union with their enclosing scope rather than
//! replace, so e.g. a `return` inside a `while` inside a method still
//! sees itself as inside a method; [`Parser::with_context`] guarantees
//! the stack unwinds on every exit path, including parse errors.

use std::collections::HashSet;

use crate::ast::{
    Assign, BinExpr, Block, CallExpr, Class, ClassMember, Decl, DotExpr, Expr, FDecl, FDeclInit,
    For, Function, FunctionDecl, Generic, If, Import, Init, Method, MethodDecl, ProcSig, Stmt,
    SubscriptExpr, TopLevel, TypeAlias, TypeExpr, UnExpr, While,
};
use crate::error::{Error, Result};
use crate::lexer::Lexer;
use crate::token::{Kind, Token};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextFlags(u8);

impl ContextFlags {
    pub const NONE: Self = Self(0);
    pub const LOOP: Self = Self(1 << 0);
    pub const METHOD: Self = Self(1 << 1);
    pub const FUNCTION: Self = Self(1 << 2);

    #[must_use]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    #[must_use]
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }
}

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    context: Vec<ContextFlags>,
}

impl<'a> Parser<'a> {
    /// # Errors
    /// Propagates a lexical error encountered while priming the first
    /// lookahead token.
    pub fn new(src: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(src);
        let current = lexer.next_token()?;
        Ok(Self { lexer, current, context: vec![ContextFlags::NONE] })
    }

    fn bump(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn match_kind(&mut self, kind: Kind) -> Result<Option<Token>> {
        if self.current.kind == kind {
            Ok(Some(self.bump()?))
        } else {
            Ok(None)
        }
    }

    fn expect(&mut self, kind: Kind, message: &str) -> Result<Token> {
        if self.current.kind == kind {
            self.bump()
        } else {
            Err(Error::UnexpectedToken {
                start: self.current.start,
                end: self.current.end,
                message: format!("{message}, got {}", self.current),
            })
        }
    }

    fn top_context(&self) -> ContextFlags {
        *self.context.last().expect("context stack always has a base entry")
    }

    fn test_context(&self, flags: ContextFlags) -> bool {
        self.top_context().intersects(flags)
    }

    /// Runs `f` with `flags` unioned onto the current context, restoring
    /// the previous context afterward regardless of whether `f` errors.
    fn with_context<T>(&mut self, flags: ContextFlags, f: impl FnOnce(&mut Self) -> Result<T>) -> Result<T> {
        let merged = self.top_context().union(flags);
        self.context.push(merged);
        let result = f(self);
        self.context.pop();
        result
    }

    // ---- expressions, lowest to highest precedence ----

    pub fn expression(&mut self) -> Result<Expr> {
        self.expr_identity()
    }

    fn expr_identity(&mut self) -> Result<Expr> {
        let mut left = self.expr_or()?;
        loop {
            let make: fn(BinExpr) -> Expr = match self.current.kind {
                Kind::Is => Expr::Is,
                Kind::IsNot => Expr::IsNot,
                _ => break,
            };
            let op = self.bump()?;
            let right = self.expr_or()?;
            left = make(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_or(&mut self) -> Result<Expr> {
        let mut left = self.expr_and()?;
        while let Some(op) = self.match_kind(Kind::Or)? {
            let right = self.expr_and()?;
            left = Expr::Or(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_and(&mut self) -> Result<Expr> {
        let mut left = self.expr_equality()?;
        while let Some(op) = self.match_kind(Kind::And)? {
            let right = self.expr_equality()?;
            left = Expr::And(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_equality(&mut self) -> Result<Expr> {
        let mut left = self.expr_comparison()?;
        loop {
            let make: fn(BinExpr) -> Expr = match self.current.kind {
                Kind::Equal => Expr::Equal,
                Kind::NEqual => Expr::NEqual,
                _ => break,
            };
            let op = self.bump()?;
            let right = self.expr_comparison()?;
            left = make(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_comparison(&mut self) -> Result<Expr> {
        let mut left = self.expr_bitor()?;
        loop {
            let make: fn(BinExpr) -> Expr = match self.current.kind {
                Kind::GreaterEq => Expr::GreatE,
                Kind::Greater => Expr::GreatT,
                Kind::LessEq => Expr::LessE,
                Kind::Less => Expr::LessT,
                _ => break,
            };
            let op = self.bump()?;
            let right = self.expr_bitor()?;
            left = make(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_bitor(&mut self) -> Result<Expr> {
        let mut left = self.expr_bitand()?;
        while let Some(op) = self.match_kind(Kind::Bar)? {
            let right = self.expr_bitand()?;
            left = Expr::BitOr(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_bitand(&mut self) -> Result<Expr> {
        let mut left = self.expr_add()?;
        while let Some(op) = self.match_kind(Kind::Amp)? {
            let right = self.expr_add()?;
            left = Expr::BitAnd(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_add(&mut self) -> Result<Expr> {
        let mut left = self.expr_sub()?;
        while let Some(op) = self.match_kind(Kind::Plus)? {
            let right = self.expr_sub()?;
            left = Expr::Add(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_sub(&mut self) -> Result<Expr> {
        let mut left = self.expr_mul()?;
        while let Some(op) = self.match_kind(Kind::Minus)? {
            let right = self.expr_mul()?;
            left = Expr::Subtract(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_mul(&mut self) -> Result<Expr> {
        let mut left = self.expr_div()?;
        while let Some(op) = self.match_kind(Kind::Star)? {
            let right = self.expr_div()?;
            left = Expr::Multiply(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_div(&mut self) -> Result<Expr> {
        let mut left = self.expr_unary()?;
        while let Some(op) = self.match_kind(Kind::Slash)? {
            let right = self.expr_unary()?;
            left = Expr::Divide(BinExpr { left: Box::new(left), op, right: Box::new(right) });
        }
        Ok(left)
    }

    fn expr_unary(&mut self) -> Result<Expr> {
        let make: fn(UnExpr) -> Expr = match self.current.kind {
            Kind::Minus => Expr::Negate,
            Kind::Plus => Expr::Posify,
            Kind::Not => Expr::Not,
            Kind::Tilde => Expr::BitNot,
            _ => return self.expr_call(),
        };
        let op = self.bump()?;
        let operand = self.expr_unary()?;
        Ok(make(UnExpr { op, operand: Box::new(operand) }))
    }

    fn expr_comma_sep(&mut self) -> Result<Vec<Expr>> {
        let mut exprs = vec![self.expression()?];
        while self.match_kind(Kind::Comma)?.is_some() {
            exprs.push(self.expression()?);
        }
        Ok(exprs)
    }

    fn expr_call(&mut self) -> Result<Expr> {
        let mut left = self.expr_dot()?;
        loop {
            if let Some(paren) = self.match_kind(Kind::LParen)? {
                let args =
                    if self.current.kind == Kind::RParen { Vec::new() } else { self.expr_comma_sep()? };
                self.expect(Kind::RParen, "open paren '(' was never closed")?;
                left = Expr::Call(CallExpr { left: Box::new(left), paren, args });
            } else if let Some(bracket) = self.match_kind(Kind::LBracket)? {
                let args =
                    if self.current.kind == Kind::RBracket { Vec::new() } else { self.expr_comma_sep()? };
                self.expect(Kind::RBracket, "open bracket '[' was never closed")?;
                left = Expr::Subscript(SubscriptExpr { left: Box::new(left), bracket, args });
            } else {
                break;
            }
        }
        Ok(left)
    }

    fn expr_dot(&mut self) -> Result<Expr> {
        let mut left = self.expr_group()?;
        while let Some(dot) = self.match_kind(Kind::Dot)? {
            let member = self.expect(Kind::Id, "expected an identifier after '.'")?;
            left = Expr::Dot(DotExpr { left: Box::new(left), dot, member });
        }
        Ok(left)
    }

    fn expr_group(&mut self) -> Result<Expr> {
        if let Some(paren) = self.match_kind(Kind::LParen)? {
            let operand = self.expression()?;
            self.expect(Kind::RParen, "open paren '(' was not closed")?;
            Ok(Expr::Group(UnExpr { op: paren, operand: Box::new(operand) }))
        } else {
            self.expr_primary()
        }
    }

    fn expr_primary(&mut self) -> Result<Expr> {
        match self.current.kind {
            Kind::False | Kind::True | Kind::Id | Kind::Str | Kind::Int => Ok(Expr::Primary(self.bump()?)),
            Kind::This => {
                if !self.test_context(ContextFlags::METHOD) {
                    return Err(Error::ThisOutsideMethod(self.current.start));
                }
                Ok(Expr::Primary(self.bump()?))
            }
            _ => Err(Error::ExpectedExpr {
                start: self.current.start,
                end: self.current.end,
                found: format!("{:?}", self.current.kind),
            }),
        }
    }

    // ---- type expressions ----

    pub fn type_expression(&mut self) -> Result<TypeExpr> {
        if let Some(auto) = self.match_kind(Kind::Auto)? {
            if self.match_kind(Kind::LParen)?.is_some() {
                let expr = self.expression()?;
                self.expect(Kind::RParen, "open paren '(' was not closed")?;
                return Ok(TypeExpr::TypeDeduce { auto, operand: Box::new(expr) });
            }
            return Ok(TypeExpr::TypeAuto(auto));
        }
        let name = self.expect(Kind::Id, "expected a type name")?;
        self.type_expression_tail(TypeExpr::TypeName(name))
    }

    fn type_expression_tail(&mut self, mut left: TypeExpr) -> Result<TypeExpr> {
        loop {
            if let Some(bracket) = self.match_kind(Kind::LBracket)? {
                let mut params = Vec::new();
                if self.current.kind != Kind::RBracket {
                    params.push(self.type_expression()?);
                    while self.match_kind(Kind::Comma)?.is_some() {
                        params.push(self.type_expression()?);
                    }
                }
                self.expect(Kind::RBracket, "open bracket '[' was not closed")?;
                left = TypeExpr::TypeCall { bracket, generic: Box::new(left), params };
            } else if let Some(dot) = self.match_kind(Kind::Dot)? {
                let member = self.expect(Kind::Id, "expected an identifier")?;
                left = TypeExpr::TypeMember { dot, left: Box::new(left), right: member };
            } else {
                return Ok(left);
            }
        }
    }

    // ---- declarations ----

    fn decl_pair(&mut self) -> Result<(Token, TypeExpr)> {
        let name = self.expect(Kind::Id, "expected an identifier")?;
        self.expect(Kind::Colon, "expected ':'")?;
        let ty = self.type_expression()?;
        Ok((name, ty))
    }

    pub fn parse_decl(&mut self) -> Result<Decl> {
        let (name, ty) = self.decl_pair()?;
        Ok(Decl { name, ty })
    }

    /// `free name: Type;` or `free name: Type = expr;`.
    fn parse_fdecl(&mut self, free: Token) -> Result<ClassMember> {
        let (name, ty) = self.decl_pair()?;
        let decl = Decl { name, ty };
        if self.match_kind(Kind::Assign)?.is_some() {
            let init = self.expression()?;
            self.expect(Kind::SColon, "expected ';'")?;
            return Ok(ClassMember::FDeclInit(FDeclInit { fdecl: FDecl { decl, free }, init }));
        }
        self.expect(Kind::SColon, "expected ';'")?;
        Ok(ClassMember::FDecl(FDecl { decl, free }))
    }

    // ---- statements ----

    fn parse_return(&mut self) -> Result<Stmt> {
        if !self.test_context(ContextFlags::METHOD.union(ContextFlags::FUNCTION)) {
            return Err(Error::ReturnOutsideProc(self.current.start));
        }
        let kw = self.expect(Kind::Return, "expected 'return'")?;
        if self.match_kind(Kind::SColon)?.is_some() {
            return Ok(Stmt::Return { kw, expr: None });
        }
        let expr = self.expression()?;
        self.expect(Kind::SColon, "expected ';'")?;
        Ok(Stmt::Return { kw, expr: Some(expr) })
    }

    /// Parses an assignment, a plain declaration-with-initializer, or a
    /// bare expression statement. Returns `Ok(None)` when the current
    /// token cannot start an expression at all, so the caller can report
    /// "unexpected token" with full context instead of this function's
    /// generic expression error.
    fn parse_assign(&mut self) -> Result<Option<Stmt>> {
        let start = self.current.start;
        let store = match self.expression() {
            Ok(expr) => expr,
            Err(Error::ExpectedExpr { start: err_start, .. }) if err_start == start => return Ok(None),
            Err(err) => return Err(err),
        };
        if let Some(colon) = self.match_kind(Kind::Colon)? {
            if !matches!(&store, Expr::Primary(tok) if tok.kind == Kind::Id) {
                return Err(Error::NotDeclarable { start, end: colon.end });
            }
            let ty = self.type_expression()?;
            if let Some(op) = self.match_kind(Kind::Assign)? {
                let value = self.expression()?;
                return Ok(Some(Stmt::Init(Init { assign: Assign { left: store, op, right: value }, ty })));
            }
            return Err(Error::UninitializedDecl(start));
        }
        if let Some(op) = self.match_kind(Kind::Assign)? {
            match &store {
                Expr::Subscript(_) | Expr::Dot(_) => {}
                Expr::Primary(tok) if tok.kind == Kind::Id => {}
                Expr::Primary(tok) => {
                    return Err(Error::LiteralNotAssignable(tok.start, tok.lexeme.clone()));
                }
                other => return Err(Error::NotAssignable(start, other.kind_name())),
            }
            let value = self.expression()?;
            return Ok(Some(Stmt::Assign(Assign { left: store, op, right: value })));
        }
        Ok(Some(Stmt::Expr(store)))
    }

    pub fn parse_block(&mut self) -> Result<Block> {
        let brace = self.expect(Kind::LBrace, "expected '{'")?;
        let mut members = Vec::new();
        loop {
            let stmt = match self.current.kind {
                Kind::If => Stmt::If(self.parse_if()?),
                Kind::While => Stmt::While(self.parse_while()?),
                Kind::Return => self.parse_return()?,
                Kind::For => Stmt::For(self.parse_for()?),
                Kind::LBrace => Stmt::Block(self.parse_block()?),
                Kind::Continue => {
                    if !self.test_context(ContextFlags::LOOP) {
                        return Err(Error::ContinueOutsideLoop(self.current.start));
                    }
                    let tok = self.bump()?;
                    self.expect(Kind::SColon, "expected ';'")?;
                    Stmt::Continue(tok)
                }
                Kind::Break => {
                    if !self.test_context(ContextFlags::LOOP) {
                        return Err(Error::BreakOutsideLoop(self.current.start));
                    }
                    let tok = self.bump()?;
                    self.expect(Kind::SColon, "expected ';'")?;
                    Stmt::Break(tok)
                }
                Kind::SColon => {
                    self.bump()?;
                    continue;
                }
                Kind::RBrace => break,
                _ => {
                    let Some(stmt) = self.parse_assign()? else {
                        return Err(Error::UnexpectedToken {
                            start: self.current.start,
                            end: self.current.end,
                            message: format!("unexpected token {}", self.current),
                        });
                    };
                    self.expect(Kind::SColon, "expected ';'")?;
                    stmt
                }
            };
            members.push(stmt);
        }
        self.expect(Kind::RBrace, "open brace '{' was never closed")?;
        Ok(Block { brace, members })
    }

    fn parse_if(&mut self) -> Result<If> {
        let if_kw = self.expect(Kind::If, "expected 'if'")?;
        let cond = self.expression()?;
        let body = self.parse_block()?;
        let else_branch = if let Some(else_kw) = self.match_kind(Kind::Else)? {
            Some((else_kw, self.parse_block()?))
        } else {
            None
        };
        Ok(If { if_kw, cond, body, else_branch })
    }

    fn parse_while(&mut self) -> Result<While> {
        let while_kw = self.expect(Kind::While, "expected 'while'")?;
        let cond = self.expression()?;
        let body = self.with_context(ContextFlags::LOOP, Self::parse_block)?;
        Ok(While { while_kw, cond, body })
    }

    fn parse_for(&mut self) -> Result<For> {
        let for_kw = self.expect(Kind::For, "expected 'for'")?;
        let bind = self.expect(Kind::Id, "expected a binding name")?;
        self.expect(Kind::Assign, "expected '='")?;
        let iterable = self.expression()?;
        let body = self.with_context(ContextFlags::LOOP, Self::parse_block)?;
        Ok(For { for_kw, bind, iterable, body })
    }

    // ---- functions and methods ----

    fn parse_proc_decl(&mut self) -> Result<(Token, Vec<Decl>, TypeExpr)> {
        let name = self.expect(Kind::Id, "expected a function name")?;
        self.expect(Kind::LParen, "expected '('")?;
        let mut params = Vec::new();
        if self.current.kind != Kind::RParen {
            let mut seen = HashSet::new();
            loop {
                let param = self.parse_decl()?;
                if !seen.insert(param.name.lexeme.clone()) {
                    return Err(Error::DuplicateParameter(param.name.start, param.name.lexeme));
                }
                params.push(param);
                if self.match_kind(Kind::Comma)?.is_some() {
                    continue;
                }
                break;
            }
        }
        self.expect(Kind::RParen, "expected ')'")?;
        self.expect(Kind::Colon, "expected ':'")?;
        let return_type = self.type_expression()?;
        Ok((name, params, return_type))
    }

    fn parse_proc(&mut self, fn_kw: Token, free: Option<Token>) -> Result<ClassMember> {
        let flags = if free.is_none() { ContextFlags::METHOD } else { ContextFlags::FUNCTION };
        self.with_context(flags, move |p| {
            let (name, params, return_type) = p.parse_proc_decl()?;
            let sig = ProcSig { fn_kw: fn_kw.clone(), name, params, return_type };
            match p.current.kind {
                Kind::LBrace => {
                    let body = p.parse_block()?;
                    Ok(match free.clone() {
                        None => ClassMember::Method(Method { sig, body }),
                        Some(free) => ClassMember::Function(Function { sig, free, body }),
                    })
                }
                Kind::SColon => {
                    p.bump()?;
                    Ok(match free.clone() {
                        None => ClassMember::MethodDecl(MethodDecl { sig }),
                        Some(free) => ClassMember::FunctionDecl(FunctionDecl { sig, free }),
                    })
                }
                _ => Err(Error::UnexpectedToken {
                    start: p.current.start,
                    end: p.current.end,
                    message: format!("expected '{{' or ';', got {}", p.current),
                }),
            }
        })
    }

    // ---- imports ----

    fn parse_using_path(&mut self, part: Option<Token>) -> Result<(Vec<Token>, u32)> {
        let mut path = Vec::new();
        if let Some(part) = part.clone() {
            path.push(part);
        }
        let mut up_count = 0;
        if part.is_none() {
            while self.match_kind(Kind::Dot)?.is_some() {
                up_count += 1;
            }
            if up_count > 0 {
                up_count -= 1;
            }
        }
        loop {
            let part = self.expect(Kind::Id, "expected an identifier")?;
            path.push(part);
            if self.match_kind(Kind::Dot)?.is_some() {
                continue;
            }
            break;
        }
        if path.is_empty() {
            return Err(Error::MissingImportTarget(self.current.start));
        }
        Ok((path, up_count))
    }

    fn parse_using(&mut self) -> Result<ClassMember> {
        let using = self.expect(Kind::Using, "expected 'using'")?;
        let stmt = match self.current.kind {
            Kind::Dot => {
                let (path, up_count) = self.parse_using_path(None)?;
                ClassMember::Import(Import { using, path, up_count })
            }
            Kind::Id => {
                let name = self.bump()?;
                if self.match_kind(Kind::Dot)?.is_some() {
                    let (path, up_count) = self.parse_using_path(Some(name))?;
                    ClassMember::Import(Import { using, path, up_count })
                } else if self.match_kind(Kind::Assign)?.is_some() {
                    let ty = self.type_expression()?;
                    ClassMember::TypeAlias(TypeAlias { using, name, ty })
                } else {
                    ClassMember::Import(Import { using, path: vec![name], up_count: 0 })
                }
            }
            _ => {
                return Err(Error::UnexpectedToken {
                    start: self.current.start,
                    end: self.current.end,
                    message: "expected an identifier or '.' after 'using'".to_string(),
                })
            }
        };
        self.expect(Kind::SColon, "expected ';'")?;
        Ok(stmt)
    }

    // ---- classes ----

    fn parse_class_body(&mut self) -> Result<Vec<ClassMember>> {
        self.expect(Kind::LBrace, "expected '{'")?;
        let mut members = Vec::new();
        let mut seen = HashSet::new();
        loop {
            let member = match self.current.kind {
                Kind::Free => {
                    let free = self.bump()?;
                    if self.current.kind == Kind::Id {
                        self.parse_fdecl(free)?
                    } else if let Some(fn_kw) = self.match_kind(Kind::Fn)? {
                        self.parse_proc(fn_kw, Some(free))?
                    } else {
                        return Err(Error::UnexpectedToken {
                            start: self.current.start,
                            end: self.current.end,
                            message: format!("expected an identifier or 'fn', got {}", self.current),
                        });
                    }
                }
                Kind::Fn => {
                    let fn_kw = self.bump()?;
                    self.parse_proc(fn_kw, None)?
                }
                Kind::Id => {
                    let decl = self.parse_decl()?;
                    self.expect(Kind::SColon, "expected ';'")?;
                    ClassMember::Decl(decl)
                }
                Kind::RBrace => {
                    self.bump()?;
                    break;
                }
                Kind::SColon => {
                    self.bump()?;
                    continue;
                }
                Kind::Using => self.parse_using()?,
                _ => {
                    return Err(Error::UnexpectedToken {
                        start: self.current.start,
                        end: self.current.end,
                        message: format!("unexpected token {}", self.current),
                    })
                }
            };
            let name = class_member_name(&member);
            if !seen.insert(name.lexeme.clone()) {
                return Err(Error::SymbolRedeclared(name.start, name.lexeme));
            }
            members.push(member);
        }
        Ok(members)
    }

    fn parse_class(&mut self) -> Result<TopLevel> {
        let class_kw = self.expect(Kind::Class, "expected 'class'")?;
        let name = self.expect(Kind::Id, "expected a class name")?;
        if self.match_kind(Kind::LBracket)?.is_some() {
            let mut type_params = vec![self.expect(Kind::Id, "expected a type parameter")?];
            while self.match_kind(Kind::Comma)?.is_some() {
                type_params.push(self.expect(Kind::Id, "expected a type parameter")?);
            }
            self.expect(Kind::RBracket, "open bracket '[' was not closed")?;
            let members = self.parse_class_body()?;
            return Ok(TopLevel::Generic(Generic { class: Class { class_kw, name, members }, type_params }));
        }
        let members = self.parse_class_body()?;
        Ok(TopLevel::Class(Class { class_kw, name, members }))
    }

    /// Parses every top-level item (`using` imports/aliases and `class`
    /// definitions) until end of input.
    ///
    /// # Errors
    /// Returns the first parse error encountered; parsing stops there.
    pub fn parse_program(&mut self) -> Result<Vec<TopLevel>> {
        let mut items = Vec::new();
        loop {
            match self.current.kind {
                Kind::Using => {
                    items.push(match self.parse_using()? {
                        ClassMember::Import(i) => TopLevel::Import(i),
                        ClassMember::TypeAlias(t) => TopLevel::TypeAlias(t),
                        _ => unreachable!("parse_using only ever returns Import or TypeAlias"),
                    });
                }
                Kind::Class => items.push(self.parse_class()?),
                Kind::SColon => {
                    self.bump()?;
                }
                Kind::Eot => break,
                _ => {
                    return Err(Error::UnexpectedToken {
                        start: self.current.start,
                        end: self.current.end,
                        message: format!("unexpected token {}", self.current),
                    })
                }
            }
        }
        Ok(items)
    }
}

fn class_member_name(member: &ClassMember) -> Token {
    match member {
        ClassMember::Decl(d) => d.name.clone(),
        ClassMember::FDecl(f) => f.decl.name.clone(),
        ClassMember::FDeclInit(f) => f.fdecl.decl.name.clone(),
        ClassMember::MethodDecl(m) => m.sig.name.clone(),
        ClassMember::FunctionDecl(f) => f.sig.name.clone(),
        ClassMember::Method(m) => m.sig.name.clone(),
        ClassMember::Function(f) => f.sig.name.clone(),
        ClassMember::Import(i) => i.path.last().expect("import path is never empty").clone(),
        ClassMember::TypeAlias(t) => t.name.clone(),
    }
}
