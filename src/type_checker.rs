use crate::{
    ast::{
        BinaryOperator, Expr, ExprKind, Ident, Source, Stmt, StmtKind, TypeName, Typed, Untyped,
    },
    lexer::is_string_char,
    scope::Scope,
    stdlib::Catalog,
    token::{Span, Spanned},
    types::Type,
    util::intern::{Interner, Symbol},
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Checks an untyped tree and rebuilds it with every expression typed and
/// every call resolved against the catalog.
///
/// The checker itself is stateless; all bindings live in the [`Scope`]
/// passed down to each method.
pub struct Checker<'cat, 'ident> {
    catalog: &'cat dyn Catalog,
    ident_interner: &'ident Interner,
}

impl<'cat, 'ident> Checker<'cat, 'ident> {
    pub fn new(catalog: &'cat dyn Catalog, ident_interner: &'ident Interner) -> Self {
        Checker {
            catalog,
            ident_interner,
        }
    }

    /// Checks a whole program. Top-level declarations are bound in `scope`.
    pub fn check(&self, source: Source<Untyped>, scope: &mut Scope<'_>) -> Result<Source<Typed>> {
        if source.statements.is_empty() {
            return Err(Span::new_of_length(0, 0).wrap(Error::EmptySource));
        }
        let statements = self.check_stmts(source.statements, scope)?;
        Ok(Source { statements })
    }

    fn check_stmts(
        &self,
        stmts: Vec<Stmt<Untyped>>,
        scope: &mut Scope<'_>,
    ) -> Result<Vec<Stmt<Typed>>> {
        stmts
            .into_iter()
            .map(|stmt| self.check_stmt(stmt, scope))
            .collect()
    }

    /// Checks a nested statement list in a fresh child scope, so its
    /// declarations are not visible once the block ends.
    fn check_block(&self, stmts: Vec<Stmt<Untyped>>, parent: &Scope<'_>) -> Result<Vec<Stmt<Typed>>> {
        let mut scope = Scope::child(parent);
        self.check_stmts(stmts, &mut scope)
    }

    pub fn check_stmt(&self, stmt: Stmt<Untyped>, scope: &mut Scope<'_>) -> Result<Stmt<Typed>> {
        let span = stmt.span;
        let kind = match stmt.kind {
            StmtKind::Expr(expr) => {
                let expr = self.check_expr(expr, scope)?;
                if !matches!(expr.kind, ExprKind::Call { .. }) {
                    return Err(expr.span.wrap(Error::ExpressionStatementNotCall));
                }
                StmtKind::Expr(expr)
            }
            StmtKind::Declaration {
                name,
                ty,
                value,
                info: (),
            } => {
                let declared = self.resolve_type(ty)?;
                if declared == Type::Void {
                    return Err(ty.span().wrap(Error::VoidDeclaration));
                }
                // The initializer can't see the variable it initializes.
                let value = value
                    .map(|value| self.check_expr(value, scope))
                    .transpose()?;
                if let Some(value) = &value {
                    assignable(value, declared)?;
                }
                scope
                    .define(name.name, declared)
                    .map_err(|_| name.span.wrap(Error::DuplicateDeclaration(name.name)))?;
                StmtKind::Declaration {
                    name,
                    ty,
                    value,
                    info: declared,
                }
            }
            StmtKind::Assignment { target, value } => {
                let ty = lookup(target, scope)?;
                let value = self.check_expr(value, scope)?;
                assignable(&value, ty)?;
                StmtKind::Assignment { target, value }
            }
            StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            } => {
                let predicate = self.check_condition(predicate, scope)?;
                if then_arm.is_empty() {
                    return Err(span.wrap(Error::EmptyThenBranch));
                }
                StmtKind::If {
                    predicate,
                    then_arm: self.check_block(then_arm, scope)?,
                    else_arm: self.check_block(else_arm, scope)?,
                }
            }
            StmtKind::While { predicate, body } => StmtKind::While {
                predicate: self.check_condition(predicate, scope)?,
                body: self.check_block(body, scope)?,
            },
        };
        Ok(Stmt { kind, span })
    }

    fn check_condition(&self, predicate: Expr<Untyped>, scope: &Scope<'_>) -> Result<Expr<Typed>> {
        let predicate = self.check_expr(predicate, scope)?;
        if predicate.info != Type::Boolean {
            let error = Error::NonBooleanCondition(predicate.info);
            return Err(predicate.span.wrap(error));
        }
        Ok(predicate)
    }

    pub fn check_expr(&self, expr: Expr<Untyped>, scope: &Scope<'_>) -> Result<Expr<Typed>> {
        let span = expr.span;
        let (kind, ty) = match expr.kind {
            ExprKind::Bool(value) => (ExprKind::Bool(value), Type::Boolean),
            ExprKind::Int(numeral) => {
                let value: i32 = numeral
                    .parse()
                    .map_err(|_| span.wrap(Error::IntegerOutOfRange))?;
                (ExprKind::Int(value), Type::Integer)
            }
            ExprKind::Decimal(numeral) => {
                let value = numeral
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .ok_or_else(|| span.wrap(Error::DecimalOutOfRange))?;
                (ExprKind::Decimal(value), Type::Decimal)
            }
            ExprKind::String(text) => {
                if let Some(c) = text.chars().find(|&c| !is_string_char(c)) {
                    return Err(span.wrap(Error::InvalidStringChar(c)));
                }
                (ExprKind::String(text), Type::String)
            }
            ExprKind::Group(inner) => {
                let inner = self.check_expr(*inner, scope)?;
                let ty = inner.info;
                (ExprKind::Group(Box::new(inner)), ty)
            }
            ExprKind::Binary { op, lhs, rhs } => {
                let lhs = self.check_expr(*lhs, scope)?;
                let rhs = self.check_expr(*rhs, scope)?;
                let ty = binary_type(op, lhs.info, rhs.info).map_err(|error| span.wrap(error))?;
                let binary = ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                };
                (binary, ty)
            }
            ExprKind::Variable(ident) => (ExprKind::Variable(ident), lookup(ident, scope)?),
            ExprKind::Call {
                name,
                args,
                info: (),
            } => {
                let arity = args.len();
                let Some(signature) = self.catalog.function(self.ident_interner.get(name), arity)
                else {
                    let error = Error::UndefinedFunction {
                        name: name.name,
                        arity,
                    };
                    return Err(name.span.wrap(error));
                };
                let args = args
                    .into_iter()
                    .zip(signature.params)
                    .map(|(arg, &param)| {
                        let arg = self.check_expr(arg, scope)?;
                        assignable(&arg, param)?;
                        Ok(arg)
                    })
                    .collect::<Result<Vec<_>>>()?;
                let call = ExprKind::Call {
                    name,
                    args,
                    info: signature.target,
                };
                (call, signature.ret)
            }
        };
        Ok(Expr {
            kind,
            span,
            info: ty,
        })
    }

    fn resolve_type(&self, ty: TypeName) -> Result<Type> {
        self.catalog
            .resolve_type(self.ident_interner.get(ty))
            .ok_or_else(|| ty.span().wrap(Error::UndefinedType(ty.name())))
    }
}

/// Fails unless a value of type `ty` may be stored into a `target` slot:
/// the types are equal, `ty` widens from INTEGER to DECIMAL, or `target` is
/// ANY and `ty` is not VOID.
pub fn check_assignable(ty: Type, target: Type) -> Result<(), Error> {
    if ty.is_assignable_to(target) {
        Ok(())
    } else {
        Err(Error::Unassignable {
            src: ty,
            dst: target,
        })
    }
}

fn assignable(value: &Expr<Typed>, target: Type) -> Result<()> {
    check_assignable(value.info, target).map_err(|error| value.span.wrap(error))
}

fn lookup(ident: Ident, scope: &Scope<'_>) -> Result<Type> {
    scope
        .lookup(ident.name)
        .ok_or_else(|| ident.span.wrap(Error::UndefinedVariable(ident.name)))
}

/// The result type of `lhs op rhs`.
fn binary_type(op: BinaryOperator, lhs: Type, rhs: Type) -> Result<Type, Error> {
    if lhs == Type::Void || rhs == Type::Void {
        return Err(Error::VoidOperand { op });
    }
    match op {
        BinaryOperator::Eq | BinaryOperator::Neq => Ok(Type::Boolean),
        // Concatenation.
        BinaryOperator::Add if lhs == Type::String || rhs == Type::String => Ok(Type::String),
        BinaryOperator::Add | BinaryOperator::Sub | BinaryOperator::Mul | BinaryOperator::Div => {
            match (lhs, rhs) {
                (Type::Integer, Type::Integer) => Ok(Type::Integer),
                (l, r) if l.is_numeric() && r.is_numeric() => Ok(Type::Decimal),
                _ => Err(Error::NotNumeric { op, lhs, rhs }),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    EmptySource,
    UndefinedType(Symbol),
    VoidDeclaration,
    DuplicateDeclaration(Symbol),
    UndefinedVariable(Symbol),
    Unassignable {
        src: Type,
        dst: Type,
    },
    NonBooleanCondition(Type),
    EmptyThenBranch,
    ExpressionStatementNotCall,
    IntegerOutOfRange,
    DecimalOutOfRange,
    InvalidStringChar(char),
    VoidOperand {
        op: BinaryOperator,
    },
    NotNumeric {
        op: BinaryOperator,
        lhs: Type,
        rhs: Type,
    },
    /// No built-in with this name takes this many arguments.
    UndefinedFunction {
        name: Symbol,
        arity: usize,
    },
}
