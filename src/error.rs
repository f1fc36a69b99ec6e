//! The single error type of the whole pipeline.

use snafu::Snafu;

use crate::{
    lexer, parser,
    token::{Span, Spanned},
    type_checker,
    util::{
        fmt::{Context, Show},
        intern::Interner,
    },
};

pub type CompileResult<T> = Result<T, CompileError>;

/// A failure of one of the pipeline stages, with its message already
/// rendered so it outlives the interner.
#[derive(Debug, Snafu)]
pub enum CompileError {
    #[snafu(display("lex error at {span}: {message}"))]
    Lex { span: Span, message: String },

    #[snafu(display("parse error at {span}: {message}"))]
    Parse { span: Span, message: String },

    #[snafu(display("analysis error at {span}: {message}"))]
    Analysis { span: Span, message: String },
}

impl CompileError {
    pub fn lex(error: &Spanned<lexer::Error>, idents: &Interner) -> Self {
        LexSnafu {
            span: error.span,
            message: render(error, idents),
        }
        .build()
    }

    pub fn parse(error: &Spanned<parser::Error>, idents: &Interner) -> Self {
        ParseSnafu {
            span: error.span,
            message: render(error, idents),
        }
        .build()
    }

    pub fn analysis(error: &Spanned<type_checker::Error>, idents: &Interner) -> Self {
        AnalysisSnafu {
            span: error.span,
            message: render(error, idents),
        }
        .build()
    }

    /// The failing stage.
    pub fn kind(&self) -> &'static str {
        match self {
            CompileError::Lex { .. } => "lex",
            CompileError::Parse { .. } => "parse",
            CompileError::Analysis { .. } => "analysis",
        }
    }

    pub fn span(&self) -> Span {
        match self {
            CompileError::Lex { span, .. }
            | CompileError::Parse { span, .. }
            | CompileError::Analysis { span, .. } => *span,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            CompileError::Lex { message, .. }
            | CompileError::Parse { message, .. }
            | CompileError::Analysis { message, .. } => message,
        }
    }

    /// One-based line and column of the start of the error in `src`.
    pub fn line_col(&self, src: &str) -> (usize, usize) {
        let lo = self.span().lo.min(src.len());
        let before = src.get(..lo).unwrap_or(src);
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before[line_start..].chars().count() + 1;
        (line, column)
    }
}

fn render<E>(error: &Spanned<E>, idents: &Interner) -> String
where
    Spanned<E>: Show,
{
    let ctx = Context {
        ident_interner: idents,
    };
    let rendered = error.display(&ctx).to_string();
    rendered
}
