//! Translates programs of a small statement language into Java source.
//!
//! The pipeline is lexer, parser, type checker and code generator. Each
//! stage fails fast on its first error; [`compile`] runs all of them and
//! folds their errors into a [`CompileError`].

use crate::{
    codegen::CodeGen,
    scope::Scope,
    stdlib::Catalog,
    type_checker::Checker,
    util::intern::Interner,
};

pub use crate::error::{CompileError, CompileResult};

/// The lexer takes the source input, mapping it into a sequence of tokens.
pub mod lexer;

/// The parser takes a sequence of tokens, mapping it into an AST.
pub mod parser;

/// The type checker takes an untyped AST, checks the soundness of its types,
/// and maps it into a typed AST.
pub mod type_checker;

/// The code generator renders a typed AST as Java source.
pub mod codegen;

pub mod ast;
pub mod error;
pub mod scope;
pub mod stdlib;
pub mod token;
pub mod types;

pub mod util {
    pub mod fmt;
    pub mod intern;
    #[cfg(test)]
    pub(crate) mod test_utils;
}

/// Knobs of the generated program.
#[derive(Clone, Debug)]
pub struct Options {
    /// Name of the enclosing class. Must be a valid Java identifier.
    pub class_name: String,
}

impl Default for Options {
    fn default() -> Options {
        Options {
            class_name: codegen::DEFAULT_CLASS_NAME.to_owned(),
        }
    }
}

/// Compiles `src` to Java with the default [`Options`].
pub fn compile(src: &str, catalog: &dyn Catalog) -> CompileResult<String> {
    compile_with(src, catalog, &Options::default())
}

pub fn compile_with(src: &str, catalog: &dyn Catalog, options: &Options) -> CompileResult<String> {
    let mut idents = Interner::with_capacity(128);
    let tokens = lexer::lex_in_new(src).map_err(|e| CompileError::lex(&e, &idents))?;
    let source = parser::parse_source(src, &tokens, &mut idents)
        .map_err(|e| CompileError::parse(&e, &idents))?;
    let source = Checker::new(catalog, &idents)
        .check(source, &mut Scope::root())
        .map_err(|e| CompileError::analysis(&e, &idents))?;
    let code = CodeGen::new(catalog, &idents)
        .with_class_name(&options.class_name)
        .generate(&source);
    Ok(code)
}
