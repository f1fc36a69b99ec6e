use crate::{
    ast::{BinaryOperator, Expr, ExprKind, Ident, Source, Stmt, StmtKind, TypeName, Untyped},
    lexer::extract,
    token::{Keyword, Spanned, Token, TokenKind},
    util::intern::Interner,
};

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Parses a whole program out of the tokens lexed from `src`.
pub fn parse_source(
    src: &str,
    tokens: &[Token],
    ident_interner: &mut Interner,
) -> Result<Source<Untyped>> {
    Parser::new(src, tokens, ident_interner).parse_source()
}

/// Parses a single expression, which must span all the tokens.
pub fn parse_expr(
    src: &str,
    tokens: &[Token],
    ident_interner: &mut Interner,
) -> Result<Expr<Untyped>> {
    let mut p = Parser::new(src, tokens, ident_interner);
    let expr = p.parse_expr()?;
    p.consume_eof()?;
    Ok(expr)
}

struct Parser<'src, 'tok, 'ident> {
    src: &'src str,
    tokens: &'tok [Token],
    ident_interner: &'ident mut Interner,
    cursor: usize,
}

impl Parser<'_, '_, '_> {
    fn parse_source(&mut self) -> Result<Source<Untyped>> {
        let mut statements = Vec::with_capacity(16);
        while !self.peek().is_eof() {
            statements.push(self.parse_statement()?);
        }
        Ok(Source { statements })
    }

    fn parse_statement(&mut self) -> Result<Stmt<Untyped>> {
        match self.peek_keyword() {
            Some(Keyword::Let) => self.parse_declaration(),
            Some(Keyword::If) => self.parse_if(),
            Some(Keyword::While) => self.parse_while(),
            _ if self.is(TokenKind::Identifier) && self.nth_is_operator(1, "=") => {
                self.parse_assignment()
            }
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_expression_statement(&mut self) -> Result<Stmt<Untyped>> {
        let expr = self.parse_expr()?;
        let end = self.consume_semicolon()?;
        let span = expr.span.to(end.span());
        Ok(Stmt {
            kind: StmtKind::Expr(expr),
            span,
        })
    }

    fn parse_declaration(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::Let)?;
        let name = self.parse_ident(Error::MissingVariableName)?;
        self.consume_operator(":", Error::MissingColon)?;
        let ty = self.parse_ident(Error::MissingTypeName).map(TypeName)?;
        let value = if self.take_operator("=") {
            Some(self.parse_expr()?)
        } else {
            None
        };
        let end = self.consume_semicolon()?;
        Ok(Stmt {
            kind: StmtKind::Declaration {
                name,
                ty,
                value,
                info: (),
            },
            span: start.span().to(end.span()),
        })
    }

    fn parse_assignment(&mut self) -> Result<Stmt<Untyped>> {
        let target = self.parse_ident(Error::MissingVariableName)?;
        self.consume_operator("=", Error::MissingEquals)?;
        let value = self.parse_expr()?;
        let end = self.consume_semicolon()?;
        Ok(Stmt {
            kind: StmtKind::Assignment { target, value },
            span: target.span.to(end.span()),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::If)?;
        let predicate = self.parse_expr()?;
        self.consume_keyword(Keyword::Then)?;

        let then_arm = self.parse_block(&[Keyword::Else, Keyword::End])?;
        if then_arm.is_empty() {
            return Err(self.peek().span().wrap(Error::EmptyThenBranch));
        }

        let else_arm = if self.is_keyword(Keyword::Else) {
            let else_token = self.advance();
            let else_arm = self.parse_block(&[Keyword::End])?;
            if else_arm.is_empty() {
                return Err(else_token.span().wrap(Error::EmptyElseBranch));
            }
            else_arm
        } else {
            Vec::new()
        };

        let end = self.consume_keyword(Keyword::End)?;
        Ok(Stmt {
            kind: StmtKind::If {
                predicate,
                then_arm,
                else_arm,
            },
            span: start.span().to(end.span()),
        })
    }

    fn parse_while(&mut self) -> Result<Stmt<Untyped>> {
        let start = self.consume_keyword(Keyword::While)?;
        let predicate = self.parse_expr()?;
        self.consume_keyword(Keyword::Do)?;
        let body = self.parse_block(&[Keyword::End])?;
        let end = self.consume_keyword(Keyword::End)?;
        Ok(Stmt {
            kind: StmtKind::While { predicate, body },
            span: start.span().to(end.span()),
        })
    }

    /// Parses statements until one of the `terminators` keywords. Does
    /// **NOT** consume the terminator.
    fn parse_block(&mut self, terminators: &[Keyword]) -> Result<Vec<Stmt<Untyped>>> {
        let mut statements = Vec::new();
        loop {
            let c = self.peek();
            if c.is_eof() {
                // Every block is closed by `END`.
                return Err(c.span().wrap(Error::MissingKeyword(Keyword::End)));
            }
            if self.peek_keyword().is_some_and(|k| terminators.contains(&k)) {
                return Ok(statements);
            }
            statements.push(self.parse_statement()?);
        }
    }

    fn parse_ident(&mut self, missing: Error) -> Result<Ident> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            return Err(token.span().wrap(missing));
        }
        self.advance();
        Ok(Ident {
            name: self.ident_interner.intern(extract::ident(token, self.src)),
            span: token.span(),
        })
    }

    fn parse_expr(&mut self) -> Result<Expr<Untyped>> {
        self.parse_equality()
    }

    fn parse_equality(&mut self) -> Result<Expr<Untyped>> {
        self.parse_binary(&["==", "!="], Self::parse_additive)
    }

    fn parse_additive(&mut self) -> Result<Expr<Untyped>> {
        self.parse_binary(&["+", "-"], Self::parse_multiplicative)
    }

    fn parse_multiplicative(&mut self) -> Result<Expr<Untyped>> {
        self.parse_binary(&["*", "/"], Self::parse_primary)
    }

    /// Parses `operand (op operand)*`, folding to the left.
    fn parse_binary(
        &mut self,
        operators: &[&str],
        mut parse_operand: impl FnMut(&mut Self) -> Result<Expr<Untyped>>,
    ) -> Result<Expr<Untyped>> {
        let mut lhs = parse_operand(self)?;
        while let Some(op) = self.take_binary_operator(operators) {
            let rhs = parse_operand(self)?;
            let span = lhs.span.to(rhs.span);
            lhs = Expr {
                kind: ExprKind::Binary {
                    op,
                    lhs: Box::new(lhs),
                    rhs: Box::new(rhs),
                },
                span,
                info: (),
            };
        }
        Ok(lhs)
    }

    fn parse_primary(&mut self) -> Result<Expr<Untyped>> {
        let token = self.advance();
        let (kind, span) = match token.kind {
            TokenKind::Identifier => match token.keyword(self.src) {
                Some(Keyword::True) => (ExprKind::Bool(true), token.span()),
                Some(Keyword::False) => (ExprKind::Bool(false), token.span()),
                _ => {
                    let ident = Ident {
                        name: self.ident_interner.intern(extract::ident(token, self.src)),
                        span: token.span(),
                    };
                    if self.take_operator("(") {
                        let (args, end) = self.parse_args()?;
                        let call = ExprKind::Call {
                            name: ident,
                            args,
                            info: (),
                        };
                        (call, token.span().to(end.span()))
                    } else {
                        (ExprKind::Variable(ident), token.span())
                    }
                }
            },
            TokenKind::Integer => (
                ExprKind::Int(extract::numeral(token, self.src)),
                token.span(),
            ),
            TokenKind::Decimal => (
                ExprKind::Decimal(extract::numeral(token, self.src)),
                token.span(),
            ),
            TokenKind::String => (
                ExprKind::String(extract::string(token, self.src)),
                token.span(),
            ),

            // Grouping: ( expr )
            TokenKind::Operator if token.literal(self.src) == "(" => {
                let expr = self.parse_expr()?;
                let end = self.consume_operator(")", Error::UnclosedParen)?;
                (ExprKind::Group(Box::new(expr)), token.span().to(end.span()))
            }

            TokenKind::Operator | TokenKind::Eof => {
                let error = Error::UnexpectedTokenInExpr {
                    token: self.describe(token),
                };
                return Err(token.span().wrap(error));
            }
        };

        Ok(Expr {
            kind,
            span,
            info: (),
        })
    }

    /// Parses `[expr (',' expr)*] ')'`. The opening parenthesis was already
    /// consumed. Returns the closing parenthesis token.
    fn parse_args(&mut self) -> Result<(Vec<Expr<Untyped>>, Token)> {
        let mut args = Vec::new();
        if let Some(end) = self.take_operator_token(")") {
            return Ok((args, end));
        }
        loop {
            args.push(self.parse_expr()?);
            if let Some(end) = self.take_operator_token(")") {
                return Ok((args, end));
            }
            self.consume_operator(",", Error::UnclosedArguments)?;
        }
    }
}

impl Parser<'_, '_, '_> {
    fn new<'src, 'tok, 'ident>(
        src: &'src str,
        tokens: &'tok [Token],
        ident_interner: &'ident mut Interner,
    ) -> Parser<'src, 'tok, 'ident> {
        Parser {
            src,
            tokens,
            ident_interner,
            cursor: 0,
        }
    }

    /// Returns the current token.
    #[inline]
    fn peek(&self) -> Token {
        self.nth(0)
    }

    fn nth(&self, n: usize) -> Token {
        match self.tokens.get(self.cursor + n) {
            Some(token) => *token,
            None => Token::eof_for(self.src),
        }
    }

    /// Returns the current token and advances.
    fn advance(&mut self) -> Token {
        let c = self.peek();
        if !c.is_eof() {
            self.cursor += 1;
        }
        c
    }

    /// Checks whether the current token is of the given kind.
    fn is(&self, expect: TokenKind) -> bool {
        self.peek().kind == expect
    }

    fn peek_keyword(&self) -> Option<Keyword> {
        self.peek().keyword(self.src)
    }

    fn is_keyword(&self, keyword: Keyword) -> bool {
        self.peek_keyword() == Some(keyword)
    }

    fn nth_is_operator(&self, n: usize, operator: &str) -> bool {
        let token = self.nth(n);
        token.kind == TokenKind::Operator && token.literal(self.src) == operator
    }

    /// Advances if the current token is the provided operator, returning it.
    /// If not, returns `None` and doesn't advance.
    fn take_operator_token(&mut self, operator: &str) -> Option<Token> {
        self.nth_is_operator(0, operator).then(|| self.advance())
    }

    fn take_operator(&mut self, operator: &str) -> bool {
        self.take_operator_token(operator).is_some()
    }

    fn take_binary_operator(&mut self, operators: &[&str]) -> Option<BinaryOperator> {
        let c = self.peek();
        if c.kind != TokenKind::Operator {
            return None;
        }
        let literal = c.literal(self.src);
        if !operators.contains(&literal) {
            return None;
        }
        self.advance();
        BinaryOperator::from_operator(literal)
    }

    /// Advances if the current token is the provided operator. If not,
    /// fails with `missing`.
    fn consume_operator(&mut self, operator: &str, missing: Error) -> Result<Token> {
        self.take_operator_token(operator)
            .ok_or_else(|| self.peek().span().wrap(missing))
    }

    fn consume_semicolon(&mut self) -> Result<Token> {
        self.consume_operator(";", Error::MissingSemicolon)
    }

    fn consume_keyword(&mut self, keyword: Keyword) -> Result<Token> {
        if self.is_keyword(keyword) {
            Ok(self.advance())
        } else {
            Err(self.peek().span().wrap(Error::MissingKeyword(keyword)))
        }
    }

    fn consume_eof(&mut self) -> Result<()> {
        let c = self.peek();
        if c.is_eof() {
            Ok(())
        } else {
            let error = Error::TrailingTokens {
                token: self.describe(c),
            };
            Err(c.span().wrap(error))
        }
    }

    /// Renders a token for diagnostics.
    fn describe(&self, token: Token) -> Box<str> {
        if token.is_eof() {
            Box::from("end of input")
        } else {
            format!("`{}`", token.literal(self.src)).into_boxed_str()
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    MissingVariableName,
    MissingColon,
    MissingTypeName,
    MissingEquals,
    MissingSemicolon,
    MissingKeyword(Keyword),
    EmptyThenBranch,
    EmptyElseBranch,
    UnclosedParen,
    /// Neither `,` nor `)` after a call argument.
    UnclosedArguments,
    UnexpectedTokenInExpr {
        token: Box<str>,
    },
    TrailingTokens {
        token: Box<str>,
    },
}

#[cfg(test)]
mod tests {
    use crate::util::test_utils::tree_tests;

    tree_tests!(
        use parser;

        fn test_simple_expression() {
            let expr = "(1 * 2 + 3) - (1 + 2 * 3)";
            let tree_ok = "
                binary - (0..25)
                  group (0..11)
                    binary + (1..10)
                      binary * (1..6)
                        int 1 (1..2)
                        int 2 (5..6)
                      int 3 (9..10)
                  group (14..25)
                    binary + (15..24)
                      int 1 (15..16)
                      binary * (19..24)
                        int 2 (19..20)
                        int 3 (23..24)
            ";
        }

        fn test_variable_expr() {
            let expr = "myVar";
            let tree_ok = "variable myVar (0..5)";
        }

        fn test_integer_literal_expr() {
            let expr = "12345";
            let tree_ok = "int 12345 (0..5)";
        }

        fn test_signed_integer_literal_expr() {
            let expr = "-7";
            let tree_ok = "int -7 (0..2)";
        }

        fn test_huge_integer_literal_is_kept_verbatim() {
            let expr = "99999999999999999999999";
            let tree_ok = "int 99999999999999999999999 (0..23)";
        }

        fn test_decimal_literal_expr() {
            let expr = "10.0";
            let tree_ok = "decimal 10.0 (0..4)";
        }

        fn test_string_literal_expr() {
            let expr = r#""hello world""#;
            let tree_ok = r#"string "hello world" (0..13)"#;
        }

        fn test_boolean_true_expr() {
            let expr = "TRUE";
            let tree_ok = "bool true (0..4)";
        }

        fn test_boolean_false_expr() {
            let expr = "FALSE";
            let tree_ok = "bool false (0..5)";
        }

        fn test_lowercase_true_is_a_variable() {
            let expr = "true";
            let tree_ok = "variable true (0..4)";
        }

        fn test_group_expr() {
            let expr = "(x)";
            let tree_ok = "
                group (0..3)
                  variable x (1..2)
            ";
        }

        fn test_call_no_args() {
            let expr = "f()";
            let tree_ok = "call f (0..3)";
        }

        fn test_call_one_arg() {
            let expr = "PRINT(x)";
            let tree_ok = "
                call PRINT (0..8)
                  variable x (6..7)
            ";
        }

        fn test_call_multiple_args() {
            let expr = r#"PRINT("a", "b", 1 + 2)"#;
            let tree_ok = r#"
                call PRINT (0..22)
                  string "a" (6..9)
                  string "b" (11..14)
                  binary + (16..21)
                    int 1 (16..17)
                    int 2 (20..21)
            "#;
        }

        fn test_equality_exprs() {
            let expr = "a == b != c";
            let tree_ok = "
                binary != (0..11)
                  binary == (0..6)
                    variable a (0..1)
                    variable b (5..6)
                  variable c (10..11)
            ";
        }

        fn test_additive_is_left_associative() {
            let expr = "a - b + c";
            let tree_ok = "
                binary + (0..9)
                  binary - (0..5)
                    variable a (0..1)
                    variable b (4..5)
                  variable c (8..9)
            ";
        }

        fn test_multiplicative_is_left_associative() {
            let expr = "a / b * c";
            let tree_ok = "
                binary * (0..9)
                  binary / (0..5)
                    variable a (0..1)
                    variable b (4..5)
                  variable c (8..9)
            ";
        }

        fn test_precedence_mul_plus() {
            let expr = "1 + 2 * 3";
            let tree_ok = "
                binary + (0..9)
                  int 1 (0..1)
                  binary * (4..9)
                    int 2 (4..5)
                    int 3 (8..9)
            ";
        }

        fn test_precedence_arith_equality() {
            let expr = "a + b == c * d";
            let tree_ok = "
                binary == (0..14)
                  binary + (0..5)
                    variable a (0..1)
                    variable b (4..5)
                  binary * (9..14)
                    variable c (9..10)
                    variable d (13..14)
            ";
        }

        fn test_expression_statement() {
            let program = r#"PRINT("hi");"#;
            let tree_ok = r#"
                expression (0..12)
                  call PRINT (0..11)
                    string "hi" (6..10)
            "#;
        }

        fn test_declaration_no_value() {
            let program = "LET x: BOOLEAN;";
            let tree_ok = "declaration x: BOOLEAN (0..15)";
        }

        fn test_declaration_with_value() {
            let program = r#"LET y: STRING = "string";"#;
            let tree_ok = r#"
                declaration y: STRING (0..25)
                  string "string" (16..24)
            "#;
        }

        fn test_assignment() {
            let program = "x = x + 1;";
            let tree_ok = "
                assignment x (0..10)
                  binary + (4..9)
                    variable x (4..5)
                    int 1 (8..9)
            ";
        }

        fn test_equality_is_not_assignment() {
            let program = "x == 1;";
            let tree_ok = "
                expression (0..7)
                  binary == (0..6)
                    variable x (0..1)
                    int 1 (5..6)
            ";
        }

        fn test_if_without_else() {
            let program = r#"IF TRUE THEN PRINT("a"); END"#;
            let tree_ok = r#"
                if (0..28)
                  bool true (3..7)
                  then
                    expression (13..24)
                      call PRINT (13..23)
                        string "a" (19..22)
            "#;
        }

        fn test_if_with_else() {
            let program = "IF x THEN y = 1; ELSE y = 2; z = 3; END";
            let tree_ok = "
                if (0..39)
                  variable x (3..4)
                  then
                    assignment y (10..16)
                      int 1 (14..15)
                  else
                    assignment y (22..28)
                      int 2 (26..27)
                    assignment z (29..35)
                      int 3 (33..34)
            ";
        }

        fn test_while() {
            let program = "WHILE i != 10 DO i = i + 1; END";
            let tree_ok = "
                while (0..31)
                  binary != (6..13)
                    variable i (6..7)
                    int 10 (11..13)
                  do
                    assignment i (17..27)
                      binary + (21..26)
                        variable i (21..22)
                        int 1 (25..26)
            ";
        }

        fn test_while_empty_body() {
            let program = "WHILE FALSE DO END";
            let tree_ok = "
                while (0..18)
                  bool false (6..11)
            ";
        }

        fn test_nested_blocks() {
            let program = "WHILE a DO IF b THEN c = 1; END END";
            let tree_ok = "
                while (0..35)
                  variable a (6..7)
                  do
                    if (11..31)
                      variable b (14..15)
                      then
                        assignment c (21..27)
                          int 1 (25..26)
            ";
        }

        fn test_program_multiple_statements() {
            let program = "
                LET i: INTEGER = 0;
                PRINT(i);
            ";
            let tree_ok = "
                declaration i: INTEGER (17..36)
                  int 0 (34..35)
                expression (53..62)
                  call PRINT (53..61)
                    variable i (59..60)
            ";
        }

        fn test_empty_program_parses() {
            let program = "  \n ";
            let tree_ok = "";
        }

        fn test_error_declaration_missing_name() {
            let program = "LET : INTEGER;";
            let expected_errors = &["4..5: expected a variable name"];
        }

        fn test_error_declaration_missing_colon() {
            let program = "LET x INTEGER;";
            let expected_errors = &["6..13: expected `:` after the variable name"];
        }

        fn test_error_declaration_missing_type() {
            let program = "LET x: = 1;";
            let expected_errors = &["7..8: expected a type name"];
        }

        fn test_error_declaration_missing_semicolon() {
            let program = "LET x: INTEGER";
            let expected_errors = &["14..14: expected `;`"];
        }

        fn test_error_assignment_missing_value() {
            let program = "x = ;";
            let expected_errors = &["4..5: unexpected `;` in expression"];
        }

        fn test_error_expression_missing_semicolon() {
            let program = "PRINT(1) PRINT(2);";
            let expected_errors = &["9..14: expected `;`"];
        }

        fn test_error_if_missing_then() {
            let program = "IF TRUE PRINT(1); END";
            let expected_errors = &["8..13: expected `THEN`"];
        }

        fn test_error_if_empty_then_branch() {
            let program = "IF TRUE THEN END";
            let expected_errors = &["13..16: empty then branch"];
        }

        fn test_error_if_empty_else_branch() {
            let program = "IF TRUE THEN x = 1; ELSE END";
            let expected_errors = &["20..24: empty else branch"];
        }

        fn test_error_if_missing_end() {
            let program = "IF TRUE THEN x = 1;";
            let expected_errors = &["19..19: expected `END`"];
        }

        fn test_error_while_missing_do() {
            let program = "WHILE TRUE x = 1; END";
            let expected_errors = &["11..12: expected `DO`"];
        }

        fn test_error_unclosed_group() {
            let expr = "(1 + 2";
            let expected_errors = &["6..6: expected `)`"];
        }

        fn test_error_unclosed_arguments() {
            let expr = "PRINT(1 2)";
            let expected_errors = &["8..9: expected `,` or `)` after an argument"];
        }

        fn test_error_trailing_tokens() {
            let expr = "1 + 2)";
            let expected_errors = &["5..6: unexpected `)` after expression"];
        }

        fn test_error_unexpected_token_in_expr() {
            let expr = "1 + ;";
            let expected_errors = &["4..5: unexpected `;` in expression"];
        }

        fn test_error_unexpected_end_of_input() {
            let expr = "1 *";
            let expected_errors = &["3..3: unexpected end of input in expression"];
        }

        fn test_error_from_lexer() {
            let program = "LET x: DECIMAL = .5;";
            let expected_errors = &["17..18: decimal point without a leading digit"];
        }
    );
}
