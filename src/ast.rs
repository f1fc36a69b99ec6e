// source ::= statement*
// statement ::= expr ';'
//             | LET ID ':' ID ['=' expr] ';'
//             | ID '=' expr ';'
//             | IF expr THEN statement+ [ELSE statement+] END
//             | WHILE expr DO statement* END
// expr ::= expr ('==' | '!=') expr
//        | expr ('+' | '-') expr
//        | expr ('*' | '/') expr
//        | '(' expr ')'
//        | ID '(' [expr (',' expr)*] ')'
//        | ID
//        | integer
//        | decimal
//        | string
//        | TRUE
//        | FALSE

// Precedence
//
// * /
// + -
// == !=

use std::fmt;

use crate::{token::Span, types::Type, util::intern::Symbol};

/// Selects what the tree carries at each analysis-dependent slot.
pub trait Info: fmt::Debug + PartialEq {
    /// The type of an expression or of a declared variable.
    type Ty: fmt::Debug + PartialEq;
    type Int: fmt::Debug + PartialEq;
    type Decimal: fmt::Debug + PartialEq;
    /// What a call resolves to.
    type Call: fmt::Debug + PartialEq;
}

/// The tree built by the parser. Numerals keep their source text so no
/// precision is lost before the range checks.
#[derive(Debug, PartialEq)]
pub struct Untyped;

impl Info for Untyped {
    type Ty = ();
    type Int = Box<str>;
    type Decimal = Box<str>;
    type Call = ();
}

/// The tree built by the type checker.
#[derive(Debug, PartialEq)]
pub struct Typed;

impl Info for Typed {
    type Ty = Type;
    type Int = i32;
    type Decimal = f64;
    /// The target-language call name.
    type Call = &'static str;
}

#[derive(Debug, PartialEq)]
pub struct Source<I: Info> {
    pub statements: Vec<Stmt<I>>,
}

#[derive(Debug, PartialEq)]
pub struct Stmt<I: Info> {
    pub kind: StmtKind<I>,
    pub span: Span,
}

#[derive(Debug, PartialEq)]
pub enum StmtKind<I: Info> {
    Expr(Expr<I>),
    Declaration {
        name: Ident,
        ty: TypeName,
        value: Option<Expr<I>>,
        info: I::Ty,
    },
    Assignment {
        target: Ident,
        value: Expr<I>,
    },
    If {
        predicate: Expr<I>,
        /// Non empty list of statements.
        then_arm: Vec<Stmt<I>>,
        /// Empty when there is no `ELSE`.
        else_arm: Vec<Stmt<I>>,
    },
    While {
        predicate: Expr<I>,
        body: Vec<Stmt<I>>,
    },
}

#[derive(Debug, PartialEq)]
pub struct Expr<I: Info> {
    pub kind: ExprKind<I>,
    pub span: Span,
    pub info: I::Ty,
}

#[derive(Debug, PartialEq)]
pub enum ExprKind<I: Info> {
    Bool(bool),
    Int(I::Int),
    Decimal(I::Decimal),
    /// Without the surrounding quotes.
    String(Box<str>),
    Group(Box<Expr<I>>),
    Binary {
        op: BinaryOperator,
        lhs: Box<Expr<I>>,
        rhs: Box<Expr<I>>,
    },
    Variable(Ident),
    Call {
        name: Ident,
        args: Vec<Expr<I>>,
        info: I::Call,
    },
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum BinaryOperator {
    Eq,
    Neq,
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOperator {
    pub fn from_operator(literal: &str) -> Option<BinaryOperator> {
        let op = match literal {
            "==" => BinaryOperator::Eq,
            "!=" => BinaryOperator::Neq,
            "+" => BinaryOperator::Add,
            "-" => BinaryOperator::Sub,
            "*" => BinaryOperator::Mul,
            "/" => BinaryOperator::Div,
            _ => return None,
        };
        Some(op)
    }

    /// The operator as spelled in both the source and the target language.
    pub const fn as_str(self) -> &'static str {
        match self {
            BinaryOperator::Eq => "==",
            BinaryOperator::Neq => "!=",
            BinaryOperator::Add => "+",
            BinaryOperator::Sub => "-",
            BinaryOperator::Mul => "*",
            BinaryOperator::Div => "/",
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type as written in a declaration. Resolved by the type checker.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct TypeName(pub Ident);

impl TypeName {
    pub fn name(&self) -> Symbol {
        self.0.name
    }

    pub fn span(&self) -> Span {
        self.0.span
    }
}

impl From<TypeName> for Symbol {
    fn from(value: TypeName) -> Self {
        value.0.name
    }
}

impl From<&TypeName> for Symbol {
    fn from(value: &TypeName) -> Self {
        value.0.name
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Ident {
    pub name: Symbol,
    pub span: Span,
}

impl From<Ident> for Symbol {
    fn from(value: Ident) -> Self {
        value.name
    }
}

impl From<&Ident> for Symbol {
    fn from(value: &Ident) -> Self {
        value.name
    }
}
