#![allow(clippy::items_after_statements)]

use crate::{lexer, parser, token::Spanned, type_checker, util::fmt::Show};

impl Show for Spanned<lexer::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, _: &super::Context<'_>) -> std::fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use lexer::Error::*;
        match error {
            DecimalWithoutLeadingDigit => write!(f, "decimal point without a leading digit"),
            MultipleDecimalPoints => write!(f, "numeral with multiple decimal points"),
            UnterminatedString => write!(f, "unterminated string"),
            InvalidStringChar(c) => write!(f, "invalid character {c:?} in string"),
        }
    }
}

impl Show for Spanned<parser::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, _: &super::Context<'_>) -> std::fmt::Result {
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use parser::Error::*;
        match error {
            MissingVariableName => write!(f, "expected a variable name"),
            MissingColon => write!(f, "expected `:` after the variable name"),
            MissingTypeName => write!(f, "expected a type name"),
            MissingEquals => write!(f, "expected `=`"),
            MissingSemicolon => write!(f, "expected `;`"),
            MissingKeyword(keyword) => write!(f, "expected `{keyword}`"),
            EmptyThenBranch => write!(f, "empty then branch"),
            EmptyElseBranch => write!(f, "empty else branch"),
            UnclosedParen => write!(f, "expected `)`"),
            UnclosedArguments => write!(f, "expected `,` or `)` after an argument"),
            UnexpectedTokenInExpr { token } => write!(f, "unexpected {token} in expression"),
            TrailingTokens { token } => write!(f, "unexpected {token} after expression"),
        }
    }
}

impl Show for Spanned<type_checker::Error> {
    fn show(&self, f: &mut std::fmt::Formatter<'_>, ctx: &super::Context<'_>) -> std::fmt::Result {
        let i = ctx.ident_interner;
        let Spanned { span, inner: error } = self;

        if f.alternate() {
            write!(f, "{span}: ")?;
        }

        use type_checker::Error::*;
        match error {
            EmptySource => write!(f, "empty program"),
            UndefinedType(name) => {
                let name = i.get(*name);
                write!(f, "type {name} is not defined")
            }
            VoidDeclaration => write!(f, "VOID is not a declarable type"),
            DuplicateDeclaration(name) => {
                let name = i.get(*name);
                write!(f, "{name} is already declared")
            }
            UndefinedVariable(name) => {
                let name = i.get(*name);
                write!(f, "{name} is not defined")
            }
            Unassignable { src, dst } => {
                write!(f, "type {src} is not assignable to type {dst}")
            }
            NonBooleanCondition(ty) => write!(f, "condition must be BOOLEAN, but got {ty}"),
            EmptyThenBranch => write!(f, "empty then branch"),
            ExpressionStatementNotCall => {
                write!(f, "expression statement must be a function call")
            }
            IntegerOutOfRange => write!(f, "integer literal out of range"),
            DecimalOutOfRange => write!(f, "decimal literal out of range"),
            InvalidStringChar(c) => write!(f, "invalid character {c:?} in string"),
            VoidOperand { op } => write!(f, "operator {op} cannot be applied to VOID"),
            NotNumeric { op, lhs, rhs } => write!(
                f,
                "operator {op} requires numeric operands, but got {lhs} and {rhs}"
            ),
            UndefinedFunction { name, arity } => {
                let name = i.get(*name);
                let plural = if *arity == 1 { "" } else { "s" };
                write!(f, "undefined function {name} taking {arity} argument{plural}")
            }
        }
    }
}
