use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Write},
    format_args as f,
};

use crate::{
    ast::{Expr, ExprKind, Source, Stmt, StmtKind, Typed},
    stdlib::Catalog,
    util::intern::{Interner, Symbol},
};


const DEFAULT_CODE_CAPACITY: usize = 4 * 1024; // 4 KiB
const INDENT: &str = "    ";

/// Name of the generated enclosing class unless configured otherwise.
pub const DEFAULT_CLASS_NAME: &str = "Main";

static JAVA_RESERVED: phf::Set<&'static str> = phf::phf_set! {
    "abstract", "assert", "boolean", "break", "byte", "case", "catch", "char",
    "class", "const", "continue", "default", "do", "double", "else", "enum",
    "extends", "false", "final", "finally", "float", "for", "goto", "if",
    "implements", "import", "instanceof", "int", "interface", "long", "native",
    "new", "null", "package", "private", "protected", "public", "return",
    "short", "static", "strictfp", "super", "switch", "synchronized", "this",
    "throw", "throws", "transient", "true", "try", "void", "volatile", "while",
    "_",
};

/// Parameter of the generated `main` method.
const MAIN_PARAM: &str = "args";

/// Whether `name` may be used as the name of the generated class.
pub fn is_valid_class_name(name: &str) -> bool {
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
        && !JAVA_RESERVED.contains(name)
}

/// Renders a typed tree as a Java compilation unit with a single class whose
/// `main` method holds the program's statements.
pub struct CodeGen<'a> {
    catalog: &'a dyn Catalog,
    ident_interner: &'a Interner,
    class_name: &'a str,
    code: String,
    depth: usize,
    /// Leading segments of the call targets in use, such as `System`.
    qualifiers: HashSet<&'static str>,
    /// Java names of the variables declared in each open block.
    locals: Vec<HashMap<Symbol, String>>,
}

impl<'a> CodeGen<'a> {
    pub fn new(catalog: &'a dyn Catalog, ident_interner: &'a Interner) -> CodeGen<'a> {
        CodeGen {
            catalog,
            ident_interner,
            class_name: DEFAULT_CLASS_NAME,
            code: String::with_capacity(DEFAULT_CODE_CAPACITY),
            depth: 0,
            qualifiers: HashSet::new(),
            locals: Vec::new(),
        }
    }

    /// The caller guarantees `class_name` is a valid Java identifier.
    #[must_use]
    pub fn with_class_name(mut self, class_name: &'a str) -> CodeGen<'a> {
        self.class_name = class_name;
        self
    }

    pub fn generate(mut self, source: &Source<Typed>) -> String {
        collect_qualifiers(&source.statements, &mut self.qualifiers);
        self.gen_source(source);

        self.code
    }

    fn gen_source(&mut self, source: &Source<Typed>) {
        let class_name = self.class_name;
        self.line(f!("public final class {class_name} {{"));
        self.blank_line();
        self.indented(|this| {
            this.line(f!("public static void main(String[] args) {{"));
            this.indented(|this| this.gen_scope(&source.statements));
            this.line(f!("}}"));
        });
        self.blank_line();
        self.line(f!("}}"));
    }

    fn gen_scope(&mut self, stmts: &[Stmt<Typed>]) {
        self.locals.push(HashMap::new());
        for stmt in stmts {
            self.gen_stmt(stmt);
        }
        self.locals.pop();
    }

    fn gen_stmt(&mut self, stmt: &Stmt<Typed>) {
        self.start_line();
        match &stmt.kind {
            StmtKind::Expr(expr) => {
                self.gen_expr(expr);
                self.emit(f!(";"));
            }
            StmtKind::Declaration {
                name, value, info, ..
            } => {
                let ty = self.catalog.target_type(*info);
                let java = self.fresh_name(name.name);
                self.emit(f!("{ty} {java}"));
                if let Some(value) = value {
                    self.emit(f!(" = "));
                    self.gen_expr(value);
                }
                self.emit(f!(";"));
                // Bound last, as the initializer still sees any outer binding.
                self.bind(name.name, java);
            }
            StmtKind::Assignment { target, value } => {
                let target = self.var(target.name);
                self.emit(f!("{target} = "));
                self.gen_expr(value);
                self.emit(f!(";"));
            }
            StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            } => {
                self.emit(f!("if ("));
                self.gen_expr(predicate);
                self.emit(f!(") "));
                self.gen_block(then_arm);
                if !else_arm.is_empty() {
                    self.emit(f!(" else "));
                    self.gen_block(else_arm);
                }
            }
            StmtKind::While { predicate, body } => {
                self.emit(f!("while ("));
                self.gen_expr(predicate);
                self.emit(f!(") "));
                self.gen_block(body);
            }
        }
        self.emit(f!("\n"));
    }

    /// Braces and indented statements, up to the closing brace.
    fn gen_block(&mut self, stmts: &[Stmt<Typed>]) {
        if stmts.is_empty() {
            self.emit(f!("{{}}"));
            return;
        }
        self.emit(f!("{{\n"));
        self.indented(|this| this.gen_scope(stmts));
        self.start_line();
        self.emit(f!("}}"));
    }

    fn gen_expr(&mut self, expr: &Expr<Typed>) {
        match &expr.kind {
            ExprKind::Bool(val) => self.emit(f!("{val}")),
            ExprKind::Int(val) => self.emit(f!("{val}")),
            ExprKind::Decimal(val) => {
                // Display never uses an exponent, but drops the point of whole values.
                let text = val.to_string();
                let point = if text.contains('.') { "" } else { ".0" };
                self.emit(f!("{text}{point}"));
            }
            ExprKind::String(val) => self.emit(f!("\"{val}\"")),
            ExprKind::Group(inner) => {
                self.emit(f!("("));
                self.gen_expr(inner);
                self.emit(f!(")"));
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.gen_expr(lhs);
                self.emit(f!(" {op} "));
                self.gen_expr(rhs);
            }
            ExprKind::Variable(ident) => {
                let name = self.var(ident.name);
                self.emit(f!("{name}"));
            }
            ExprKind::Call {
                args, info: target, ..
            } => {
                self.emit(f!("{target}"));
                if args.is_empty() {
                    return;
                }
                self.emit(f!("("));
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        self.emit(f!(", "));
                    }
                    self.gen_expr(arg);
                }
                self.emit(f!(")"));
            }
        }
    }
}

// Utility functions.
impl CodeGen<'_> {
    fn emit(&mut self, f: fmt::Arguments<'_>) {
        self.code
            .write_fmt(f)
            .expect("code emit should be infallible");
    }

    /// Emits a whole line at the current indentation.
    fn line(&mut self, f: fmt::Arguments<'_>) {
        self.start_line();
        self.emit(f);
        self.emit(f!("\n"));
    }

    fn blank_line(&mut self) {
        self.code.push('\n');
    }

    fn start_line(&mut self) {
        for _ in 0..self.depth {
            self.code.push_str(INDENT);
        }
    }

    fn indented(&mut self, f: impl FnOnce(&mut Self)) {
        self.depth += 1;
        f(self);
        self.depth -= 1;
    }

    /// The Java name of a variable about to be declared in the innermost block.
    ///
    /// Java rejects a local that hides another local, so a hiding variable
    /// gets a numbered `$` suffix. Names that clash with Java words, with the
    /// `main` parameter or with a call qualifier get a bare `$` suffix.
    /// Source identifiers can't contain `$`, so the results never clash.
    fn fresh_name(&self, symbol: Symbol) -> String {
        let name = self.ident_interner.get(symbol);
        let hidden = self
            .locals
            .iter()
            .filter(|scope| scope.contains_key(&symbol))
            .count();
        let mut java = self.plain_name(name);
        if hidden > 0 {
            if !java.ends_with('$') {
                java.push('$');
            }
            write!(java, "{hidden}").expect("code emit should be infallible");
        }
        java
    }

    fn bind(&mut self, symbol: Symbol, java: String) {
        if let Some(scope) = self.locals.last_mut() {
            scope.insert(symbol, java);
        }
    }

    /// The Java name of the innermost visible binding of `symbol`.
    fn var(&self, symbol: Symbol) -> String {
        self.locals
            .iter()
            .rev()
            .find_map(|scope| scope.get(&symbol))
            .cloned()
            .unwrap_or_else(|| self.plain_name(self.ident_interner.get(symbol)))
    }

    fn plain_name(&self, name: &str) -> String {
        let mut java = name.to_owned();
        if JAVA_RESERVED.contains(name) || name == MAIN_PARAM || self.qualifiers.contains(name) {
            java.push('$');
        }
        java
    }
}

fn collect_qualifiers(stmts: &[Stmt<Typed>], out: &mut HashSet<&'static str>) {
    for stmt in stmts {
        match &stmt.kind {
            StmtKind::Expr(expr) | StmtKind::Assignment { value: expr, .. } => {
                collect_expr_qualifiers(expr, out);
            }
            StmtKind::Declaration { value, .. } => {
                if let Some(value) = value {
                    collect_expr_qualifiers(value, out);
                }
            }
            StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            } => {
                collect_expr_qualifiers(predicate, out);
                collect_qualifiers(then_arm, out);
                collect_qualifiers(else_arm, out);
            }
            StmtKind::While { predicate, body } => {
                collect_expr_qualifiers(predicate, out);
                collect_qualifiers(body, out);
            }
        }
    }
}

fn collect_expr_qualifiers(expr: &Expr<Typed>, out: &mut HashSet<&'static str>) {
    match &expr.kind {
        ExprKind::Bool(_)
        | ExprKind::Int(_)
        | ExprKind::Decimal(_)
        | ExprKind::String(_)
        | ExprKind::Variable(_) => {}
        ExprKind::Group(inner) => collect_expr_qualifiers(inner, out),
        ExprKind::Binary { lhs, rhs, .. } => {
            collect_expr_qualifiers(lhs, out);
            collect_expr_qualifiers(rhs, out);
        }
        ExprKind::Call {
            args, info: target, ..
        } => {
            let target: &'static str = target;
            if let Some((qualifier, _)) = target.split_once('.') {
                out.insert(qualifier);
            }
            for arg in args {
                collect_expr_qualifiers(arg, out);
            }
        }
    }
}
