use std::io::Write;

use crate::{ast::*, types::Type, util::intern::Interner};

const INDENT_WIDTH: usize = 2;

pub fn print_source_string<I: InfoWriter>(idents: &Interner, source: &Source<I>) -> String {
    let mut buf = Vec::with_capacity(1024);
    print_source(&mut buf, idents, source).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("tree is valid utf-8")
}

pub fn print_expr_string<I: InfoWriter>(idents: &Interner, expr: &Expr<I>) -> String {
    let mut buf = Vec::with_capacity(512);
    print_expr(&mut buf, idents, 0, expr).expect("writing to a Vec can't fail");
    String::from_utf8(buf).expect("tree is valid utf-8")
}

pub fn print_source<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    source: &Source<I>,
) -> std::io::Result<()> {
    print_stmts(w, idents, 0, &source.statements)
}

fn print_stmts<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    stmts: &[Stmt<I>],
) -> std::io::Result<()> {
    for stmt in stmts {
        print_stmt(w, idents, i, stmt)?;
    }
    Ok(())
}

fn print_stmt<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    stmt: &Stmt<I>,
) -> std::io::Result<()> {
    sp(w, i)?;
    let span = stmt.span;
    match &stmt.kind {
        StmtKind::Expr(expr) => {
            writeln!(w, "expression ({span})")?;
            print_expr(w, idents, i + 1, expr)?;
        }
        StmtKind::Declaration {
            name,
            ty,
            value,
            info,
        } => {
            let name = idents.get(name);
            let ty = idents.get(ty);
            let info = Resolved(I::resolved(info));
            writeln!(w, "declaration {name}: {ty}{info} ({span})")?;
            if let Some(value) = value {
                print_expr(w, idents, i + 1, value)?;
            }
        }
        StmtKind::Assignment { target, value } => {
            writeln!(w, "assignment {} ({span})", idents.get(target))?;
            print_expr(w, idents, i + 1, value)?;
        }
        StmtKind::If {
            predicate,
            then_arm,
            else_arm,
        } => {
            writeln!(w, "if ({span})")?;
            print_expr(w, idents, i + 1, predicate)?;
            print_arm(w, idents, i + 1, "then", then_arm)?;
            print_arm(w, idents, i + 1, "else", else_arm)?;
        }
        StmtKind::While { predicate, body } => {
            writeln!(w, "while ({span})")?;
            print_expr(w, idents, i + 1, predicate)?;
            print_arm(w, idents, i + 1, "do", body)?;
        }
    }
    Ok(())
}

/// Prints a labeled block, omitting the label when the block is empty.
fn print_arm<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    label: &str,
    stmts: &[Stmt<I>],
) -> std::io::Result<()> {
    if stmts.is_empty() {
        return Ok(());
    }
    sp(w, i)?;
    writeln!(w, "{label}")?;
    print_stmts(w, idents, i + 1, stmts)
}

pub fn print_expr<I: InfoWriter>(
    w: &mut impl Write,
    idents: &Interner,
    i: usize,
    expr: &Expr<I>,
) -> std::io::Result<()> {
    sp(w, i)?;
    let info = Resolved(I::resolved(&expr.info)); // inferred type, for typed trees
    let span = expr.span;
    match &expr.kind {
        ExprKind::Bool(val) => {
            writeln!(w, "bool {val}{info} ({span})")?;
        }
        ExprKind::Int(val) => {
            writeln!(w, "int {val}{info} ({span})")?;
        }
        ExprKind::Decimal(val) => {
            write!(w, "decimal ")?;
            I::write_decimal(w, val)?;
            writeln!(w, "{info} ({span})")?;
        }
        ExprKind::String(val) => {
            writeln!(w, "string {val:?}{info} ({span})")?;
        }
        ExprKind::Group(inner) => {
            writeln!(w, "group{info} ({span})")?;
            print_expr(w, idents, i + 1, inner)?;
        }
        ExprKind::Binary { op, lhs, rhs } => {
            writeln!(w, "binary {op}{info} ({span})")?;
            print_expr(w, idents, i + 1, lhs)?;
            print_expr(w, idents, i + 1, rhs)?;
        }
        ExprKind::Variable(ident) => {
            writeln!(w, "variable {}{info} ({span})", idents.get(ident))?;
        }
        ExprKind::Call {
            name,
            args,
            info: call,
        } => {
            write!(w, "call {}", idents.get(name))?;
            if let Some(target) = I::target(call) {
                write!(w, " => {target}")?;
            }
            writeln!(w, "{info} ({span})")?;
            for arg in args {
                print_expr(w, idents, i + 1, arg)?;
            }
        }
    }
    Ok(())
}

fn sp(w: &mut impl Write, i: usize) -> std::io::Result<()> {
    write!(w, "{:width$}", "", width = i * INDENT_WIDTH)
}

/// Writes the `: TYPE` suffix of typed nodes.
struct Resolved(Option<Type>);

impl std::fmt::Display for Resolved {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.0 {
            Some(ty) => write!(f, " : {ty}"),
            None => Ok(()),
        }
    }
}

/// What a tree printer knows about the per-node info of each tree flavor.
pub trait InfoWriter: Info<Int: std::fmt::Display> {
    fn resolved(ty: &Self::Ty) -> Option<Type>;

    fn target(call: &Self::Call) -> Option<&'static str>;

    fn write_decimal(w: &mut impl Write, decimal: &Self::Decimal) -> std::io::Result<()>;
}

impl InfoWriter for Untyped {
    fn resolved(_: &()) -> Option<Type> {
        None
    }

    fn target(_: &()) -> Option<&'static str> {
        None
    }

    fn write_decimal(w: &mut impl Write, decimal: &Box<str>) -> std::io::Result<()> {
        write!(w, "{decimal}")
    }
}

impl InfoWriter for Typed {
    fn resolved(ty: &Type) -> Option<Type> {
        Some(*ty)
    }

    fn target(call: &&'static str) -> Option<&'static str> {
        Some(*call)
    }

    fn write_decimal(w: &mut impl Write, decimal: &f64) -> std::io::Result<()> {
        write!(w, "{decimal:?}")
    }
}
