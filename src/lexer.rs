use std::str::Chars;

use crate::token::{Span, Spanned, Token, TokenKind};

pub const SUGGESTED_TOKENS_CAPACITY: usize = 1_024;

type Result<T, E = Spanned<Error>> = std::result::Result<T, E>;

/// Lexes the provided string, producing the tokens into the provided buffer.
///
/// Lexing stops at the first malformed token; the buffer contents are
/// unspecified in that case.
pub fn lex(src: &str, tokens: &mut Vec<Token>) -> Result<()> {
    Lexer::new(src, tokens).lex()
}

/// A convenience function that allocates a new buffer per lexed input and
/// returns it.
pub fn lex_in_new(src: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::with_capacity(SUGGESTED_TOKENS_CAPACITY);
    lex(src, &mut tokens)?;
    Ok(tokens)
}

/// Whether `c` may appear between the quotes of a string literal. There are
/// no escape sequences.
pub fn is_string_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '!' | '?' | '/' | '+' | '-' | '*' | ' ')
}

fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

struct Lexer<'src, 'tok> {
    src: &'src str,
    iter: Chars<'src>,
    cursor: usize,
    current_lo: usize,
    tokens: &'tok mut Vec<Token>,
}

impl Lexer<'_, '_> {
    /// Scans the source string until the input is exhausted.
    fn lex(mut self) -> Result<()> {
        assert_eq!(self.tokens.len(), 0, "must pass clean tokens buffer");
        while !self.is_at_end() {
            if let Some(kind) = self.scan_token_kind()? {
                self.produce(kind);
            }
        }
        Ok(())
    }

    /// Tries to scan the current character. Returns `None` for skipped
    /// whitespace.
    fn scan_token_kind(&mut self) -> Result<Option<TokenKind>> {
        use TokenKind::*;
        let kind = match self.mark_advance() {
            ' ' | '\t' | '\n' | '\r' => {
                self.whitespace();
                return Ok(None);
            }
            '=' | '!' if self.peek() == '=' => self.advance_with(Operator),
            '+' | '-' if self.peek().is_ascii_digit() => self.number()?,
            c if c.is_ascii_digit() => self.number()?,
            '.' => return Err(self.span().wrap(Error::DecimalWithoutLeadingDigit)),
            '"' => self.string()?,
            c if is_identifier_char(c) => self.identifier(),
            _ => Operator,
        };
        Ok(Some(kind))
    }

    fn identifier(&mut self) -> TokenKind {
        while is_identifier_char(self.peek()) {
            self.advance();
        }
        TokenKind::Identifier
    }

    /// Lexes the rest of a numeral. The sign, if any, and the first digit
    /// were already consumed.
    fn number(&mut self) -> Result<TokenKind> {
        self.digits();
        if !self.at_fraction() {
            return Ok(TokenKind::Integer);
        }
        self.advance(); // .
        self.digits();
        if self.at_fraction() {
            let span = Span::new_of_length(self.cursor, 1);
            return Err(span.wrap(Error::MultipleDecimalPoints));
        }
        Ok(TokenKind::Decimal)
    }

    fn digits(&mut self) {
        while self.peek().is_ascii_digit() {
            self.advance();
        }
    }

    /// A `.` only belongs to a numeral when a digit follows it.
    fn at_fraction(&self) -> bool {
        self.peek() == '.' && self.peek_second().is_ascii_digit()
    }

    fn string(&mut self) -> Result<TokenKind> {
        loop {
            match self.peek() {
                '\0' if self.is_at_end() => {
                    return Err(self.span().wrap(Error::UnterminatedString));
                }
                '"' => return Ok(self.advance_with(TokenKind::String)),
                c if is_string_char(c) => {
                    self.advance();
                }
                c => {
                    let (_, span) = self.advance_with_span();
                    return Err(span.wrap(Error::InvalidStringChar(c)));
                }
            }
        }
    }

    fn whitespace(&mut self) {
        while matches!(self.peek(), ' ' | '\t' | '\n' | '\r') {
            self.advance();
        }
    }
}

impl Lexer<'_, '_> {
    /// Constructs a new lexer with the default state.
    fn new<'src, 'tok>(src: &'src str, tokens: &'tok mut Vec<Token>) -> Lexer<'src, 'tok> {
        Lexer {
            src,
            iter: src.chars(),
            cursor: 0,
            current_lo: 0,
            tokens,
        }
    }

    fn is_at_end(&self) -> bool {
        self.cursor >= self.src.len()
    }

    /// Starts a new token "mark" and advances the iterator.
    fn mark_advance(&mut self) -> char {
        self.current_lo = self.cursor;
        self.advance()
    }

    /// Returns the next char and advances the iterator.
    fn advance(&mut self) -> char {
        self.iter
            .next()
            .inspect(|c| self.cursor += c.len_utf8())
            .unwrap_or('\0')
    }

    /// Advances and returns the provided value.
    fn advance_with<T>(&mut self, value: T) -> T {
        self.advance();
        value
    }

    /// Returns the next char (with its span) and advances the iterator.
    fn advance_with_span(&mut self) -> (char, Span) {
        let lo = self.cursor;
        let char = self.advance();
        let span = Span::new_of_bounds(lo..self.cursor);
        (char, span)
    }

    /// Returns the next char without advancing the iterator.
    fn peek(&self) -> char {
        self.iter.clone().next().unwrap_or('\0')
    }

    fn peek_second(&self) -> char {
        self.iter.clone().nth(1).unwrap_or('\0')
    }

    /// Returns the current span.
    fn span(&self) -> Span {
        Span::new_of_bounds(self.current_lo..self.cursor)
    }

    /// Produces a token using the marked bounds.
    fn produce(&mut self, kind: TokenKind) {
        self.tokens.push(Token::new(kind, self.span()));
    }
}

pub mod extract {
    use super::*;

    pub fn ident(token: Token, src: &str) -> &str {
        debug_assert_eq!(token.kind, TokenKind::Identifier);
        token.literal(src)
    }

    /// Integer and decimal numerals are kept as text; range checks happen
    /// during analysis.
    pub fn numeral(token: Token, src: &str) -> Box<str> {
        debug_assert!(matches!(token.kind, TokenKind::Integer | TokenKind::Decimal));
        Box::from(token.literal(src))
    }

    pub fn string(token: Token, src: &str) -> Box<str> {
        debug_assert_eq!(token.kind, TokenKind::String);
        Box::from(token.span().offset(1, -1).substr(src))
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Error {
    /// A `.` that does not follow a digit.
    DecimalWithoutLeadingDigit,
    MultipleDecimalPoints,
    UnterminatedString,
    InvalidStringChar(char),
}
