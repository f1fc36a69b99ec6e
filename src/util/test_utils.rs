use crate::{
    lexer, parser,
    scope::Scope,
    stdlib::JAVA,
    token::Spanned,
    type_checker::Checker,
    util::{
        self,
        fmt::{tree, Show},
        intern::Interner,
    },
};

pub fn format_errors<E>(i: &Interner, e: &[Spanned<E>]) -> Vec<String>
where
    Spanned<E>: Show,
{
    let ctx = util::fmt::Context { ident_interner: i };
    e.iter().map(|e| format!("{:#}", e.display(&ctx))).collect()
}

/// Each variant contains the input.
pub enum Test {
    ParserProgram(&'static str),
    ParserExpr(&'static str),
    CheckerProgram(&'static str),
    CheckerExpr(&'static str),
}

pub enum Assertion {
    TreeOk(&'static str),
    ExpectedErrors(&'static [&'static str]),
}

/// Runs the pipeline up to the stage named by `test`, stopping at the first
/// error. Returns the printed tree (empty on error) and the formatted errors.
#[track_caller]
pub fn run_pipeline(test: Test) -> (String, Vec<String>) {
    let interner = &mut Interner::with_capacity(128);
    let input = match test {
        Test::ParserProgram(input)
        | Test::ParserExpr(input)
        | Test::CheckerProgram(input)
        | Test::CheckerExpr(input) => input,
    };

    let tokens = match lexer::lex_in_new(input) {
        Ok(tokens) => tokens,
        Err(error) => return (String::new(), format_errors(interner, &[error])),
    };

    macro_rules! or_report {
        ($result:expr) => {
            match $result {
                Ok(ok) => ok,
                Err(error) => return (String::new(), format_errors(interner, &[error])),
            }
        };
    }

    match test {
        Test::ParserProgram(_) => {
            let source = or_report!(parser::parse_source(input, &tokens, interner));
            (tree::print_source_string(interner, &source), vec![])
        }
        Test::ParserExpr(_) => {
            let expr = or_report!(parser::parse_expr(input, &tokens, interner));
            (tree::print_expr_string(interner, &expr), vec![])
        }
        Test::CheckerProgram(_) => {
            let source = or_report!(parser::parse_source(input, &tokens, interner));
            let checker = Checker::new(&JAVA, interner);
            let source = or_report!(checker.check(source, &mut Scope::root()));
            (tree::print_source_string(interner, &source), vec![])
        }
        Test::CheckerExpr(_) => {
            let expr = or_report!(parser::parse_expr(input, &tokens, interner));
            let checker = Checker::new(&JAVA, interner);
            let expr = or_report!(checker.check_expr(expr, &Scope::root()));
            (tree::print_expr_string(interner, &expr), vec![])
        }
    }
}

#[track_caller]
pub fn run_assertion(
    assertion: Assertion,
    formatted_actual_tree: &str,
    formatted_actual_errors: &[String],
) {
    match assertion {
        Assertion::TreeOk(expected_tree) => {
            let expected_errors: &[&str] = &[];
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
            ::pretty_assertions::assert_eq!(formatted_actual_tree.trim(), expected_tree.trim());
        }
        Assertion::ExpectedErrors(expected_errors) => {
            ::pretty_assertions::assert_eq!(formatted_actual_errors, expected_errors);
        }
    }
}

macro_rules! tree_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let $source_kind:ident = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let test: crate::util::test_utils::Test =
                    tree_tests!(@@get_test($test_kind, $source_kind), $source);
                let (formatted_actual_tree, formatted_actual_errors) =
                    crate::util::test_utils::run_pipeline(test);
                let ctx = (&formatted_actual_tree, &formatted_actual_errors);
                tree_tests!(@@expand_assertions, ctx, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $ctx:expr, []) => {};
    (@@expand_assertions, $ctx:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            tree_tests!(@@assertion, $assertion, $assertion_expected),
            $ctx.0,
            $ctx.1,
        );
        tree_tests!(@@expand_assertions, $ctx, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_errors, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedErrors($expected)
    };

    (@@get_test(parser, program), $source:expr) => {
        crate::util::test_utils::Test::ParserProgram($source)
    };
    (@@get_test(parser, expr), $source:expr) => {
        crate::util::test_utils::Test::ParserExpr($source)
    };
    (@@get_test(checker, program), $source:expr) => {
        crate::util::test_utils::Test::CheckerProgram($source)
    };
    (@@get_test(checker, expr), $source:expr) => {
        crate::util::test_utils::Test::CheckerExpr($source)
    };
}
pub(crate) use tree_tests;
