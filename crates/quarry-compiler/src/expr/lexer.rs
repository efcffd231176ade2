//! Lexer for test and bind expressions.
//!
//! Produces span-based tokens; text is sliced from the expression when needed.
//! Consecutive error characters coalesce into one `Garbage` token, so an
//! unterminated quote or a stray `=` still yields a well-formed token stream.

use std::ops::Range;

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    #[regex(r"'[^']*'")]
    #[regex(r#""[^"]*""#)]
    Str,

    #[token("!=")]
    Ne,

    #[token("==")]
    EqEq,

    #[token(">=")]
    Ge,

    #[token("<=")]
    Le,

    #[token(">")]
    Gt,

    #[token("<")]
    Lt,

    #[token("+")]
    Plus,

    /// Paths, literals and the `and`/`or` keywords.
    #[regex(r#"[^\s!=<>+'"]+"#, allow_greedy = true)]
    Word,

    #[regex(r"\s+")]
    Whitespace,

    /// Coalesced lexer errors
    Garbage,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Range<usize>,
}

impl Token {
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        &source[self.span.clone()]
    }
}

/// Tokenize an expression, whitespace included.
pub fn lex(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut lexer = TokenKind::lexer(source);
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token {
                        kind: TokenKind::Garbage,
                        span: start..lexer.span().start,
                    });
                }
                tokens.push(Token {
                    kind,
                    span: lexer.span(),
                });
            }
            Some(Err(())) => {
                error_start.get_or_insert(lexer.span().start);
            }
            None => {
                if let Some(start) = error_start.take() {
                    tokens.push(Token {
                        kind: TokenKind::Garbage,
                        span: start..source.len(),
                    });
                }
                break;
            }
        }
    }

    tokens
}
