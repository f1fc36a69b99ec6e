use std::{fmt, ops::Range};

#[derive(Copy, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    lo: usize,
    len: u32,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Token {
        Token {
            kind,
            len: span.len,
            lo: span.lo,
        }
    }

    /// The sentinel returned by the parser once the token sequence is
    /// exhausted. The lexer never produces it.
    pub fn eof_for(src: &str) -> Token {
        Token::new(TokenKind::Eof, Span::new_of_length(src.len(), 0))
    }

    pub fn span(&self) -> Span {
        Span {
            len: self.len,
            lo: self.lo,
        }
    }

    /// Returns the exact source text of this token.
    pub fn literal<'src>(&self, src: &'src str) -> &'src str {
        self.span().substr(src)
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Returns the keyword spelled by this token, if any. Keywords are
    /// lexically plain identifiers.
    pub fn keyword(&self, src: &str) -> Option<Keyword> {
        if self.kind != TokenKind::Identifier {
            return None;
        }
        KEYWORDS.get(self.literal(src)).copied()
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Token({:?}, {})", self.kind, self.span())
    }
}

#[derive(Copy, Clone, PartialEq, Eq, Hash)]
pub struct Span {
    pub len: u32,
    pub lo: usize,
}

impl Span {
    pub fn new_of_bounds(Range { start: lo, end: hi }: Range<usize>) -> Span {
        debug_assert!(hi >= lo);
        let len = u32::try_from(hi - lo).expect("span length exceeds u32::MAX");
        Self::new_of_length(lo, len)
    }

    pub fn new_of_length(lo: usize, len: u32) -> Span {
        Span { len, lo }
    }

    pub fn hi(&self) -> usize {
        self.lo + self.len as usize
    }

    /// Returns a span covering both `self` and `other`.
    pub fn to(self, other: Span) -> Span {
        Span::new_of_bounds(self.lo.min(other.lo)..self.hi().max(other.hi()))
    }

    /// Shrinks or grows the span by moving each bound.
    pub fn offset(self, lo: isize, hi: isize) -> Span {
        let new_lo = self.lo.saturating_add_signed(lo);
        let new_hi = self.hi().saturating_add_signed(hi).max(new_lo);
        Span::new_of_bounds(new_lo..new_hi)
    }

    pub fn substr(self, src: &str) -> &str {
        &src[self.lo..self.hi()]
    }

    pub fn wrap<T>(self, inner: T) -> Spanned<T> {
        Spanned { span: self, inner }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({self}, len: {})", self.len)
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.lo, self.hi())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Spanned<T> {
    pub span: Span,
    pub inner: T,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    Identifier,
    Integer,
    Decimal,
    String,
    /// Any single non-whitespace character not covered above, plus the two
    /// character operators `==` and `!=`.
    Operator,
    Eof,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Keyword {
    Let,
    If,
    Then,
    Else,
    End,
    While,
    Do,
    True,
    False,
}

impl Keyword {
    pub const fn as_str(self) -> &'static str {
        match self {
            Keyword::Let => "LET",
            Keyword::If => "IF",
            Keyword::Then => "THEN",
            Keyword::Else => "ELSE",
            Keyword::End => "END",
            Keyword::While => "WHILE",
            Keyword::Do => "DO",
            Keyword::True => "TRUE",
            Keyword::False => "FALSE",
        }
    }
}

impl fmt::Display for Keyword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// Keywords are case sensitive.
pub static KEYWORDS: phf::Map<&'static str, Keyword> = phf::phf_map! {
    "LET" => Keyword::Let,
    "IF" => Keyword::If,
    "THEN" => Keyword::Then,
    "ELSE" => Keyword::Else,
    "END" => Keyword::End,
    "WHILE" => Keyword::While,
    "DO" => Keyword::Do,
    "TRUE" => Keyword::True,
    "FALSE" => Keyword::False,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn span_join_and_offset() {
        let a = Span::new_of_bounds(2..5);
        let b = Span::new_of_bounds(8..10);
        assert_eq!(a.to(b), Span::new_of_bounds(2..10));
        assert_eq!(b.to(a), Span::new_of_bounds(2..10));
        assert_eq!(a.offset(1, -1), Span::new_of_bounds(3..4));
        assert_eq!(a.to(b).to_string(), "2..10");
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let src = "LET let Let";
        let tokens = [
            Token::new(TokenKind::Identifier, Span::new_of_bounds(0..3)),
            Token::new(TokenKind::Identifier, Span::new_of_bounds(4..7)),
            Token::new(TokenKind::Identifier, Span::new_of_bounds(8..11)),
        ];
        assert_eq!(tokens[0].keyword(src), Some(Keyword::Let));
        assert_eq!(tokens[1].keyword(src), None);
        assert_eq!(tokens[2].keyword(src), None);
    }

    #[test]
    fn keyword_only_for_identifiers() {
        let src = "\"END\"";
        let token = Token::new(TokenKind::String, Span::new_of_bounds(0..5));
        assert_eq!(token.keyword(src), None);
        assert_eq!(token.literal(src), "\"END\"");
    }
}
