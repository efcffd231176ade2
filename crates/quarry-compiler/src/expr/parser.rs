//! Test and bind expression parsing.
//!
//! Test grammar, flat:
//!
//! ```text
//! test    = atom ( ("and" | "AND") atom )*
//!         | atom ( ("or" | "OR") atom )*
//! atom    = path | path op literal
//! op      = "!=" | "==" | ">=" | "<=" | ">" | "<"
//! ```
//!
//! Keywords only count with whitespace on both sides. When a test uses both
//! junctions only `and` splits it; the `or` pieces stay inside their atoms.

use quarry_core::CompareOp;

use super::ast::{Atom, Junction, Literal, Path, TestExpr, unquote};
use super::bind::{BindExpr, BindPart};
use super::lexer::{Token, TokenKind, lex};

pub fn parse_test(source: &str) -> TestExpr {
    let tokens = lex(source);
    let and_at = keyword_positions(source, &tokens, "and", "AND");
    let or_at = keyword_positions(source, &tokens, "or", "OR");

    let (junction, splits) = match (and_at.is_empty(), or_at.is_empty()) {
        (false, _) => (Junction::All, and_at.as_slice()),
        (true, false) => (Junction::Any, or_at.as_slice()),
        (true, true) => (Junction::All, &[][..]),
    };

    let mut atoms = Vec::with_capacity(splits.len() + 1);
    let mut start = 0;
    for &split in splits {
        atoms.push(parse_atom(source, &tokens[start..split]));
        start = split + 1;
    }
    atoms.push(parse_atom(source, &tokens[start..]));

    TestExpr {
        source: source.to_string(),
        junction,
        atoms,
        mixed: !and_at.is_empty() && !or_at.is_empty(),
    }
}

/// Token indices of a junction keyword surrounded by whitespace.
fn keyword_positions(source: &str, tokens: &[Token], lower: &str, upper: &str) -> Vec<usize> {
    let spaced = |i: Option<usize>| {
        i.and_then(|i| tokens.get(i))
            .is_some_and(|t| t.kind == TokenKind::Whitespace)
    };

    tokens
        .iter()
        .enumerate()
        .filter(|(i, token)| {
            let text = token.text(source);
            token.kind == TokenKind::Word
                && (text == lower || text == upper)
                && spaced(i.checked_sub(1))
                && spaced(Some(i + 1))
        })
        .map(|(i, _)| i)
        .collect()
}

fn span_text<'s>(source: &'s str, tokens: &[Token]) -> &'s str {
    match (tokens.first(), tokens.last()) {
        (Some(first), Some(last)) => source[first.span.start..last.span.end].trim(),
        _ => "",
    }
}

fn parse_atom(source: &str, tokens: &[Token]) -> Atom {
    let text = span_text(source, tokens);
    let invalid = || Atom::Invalid(text.to_string());

    let op_at = CompareOp::TRIAL_ORDER.iter().find_map(|op| {
        let kind = op_token(*op);
        tokens
            .iter()
            .position(|t| t.kind == kind)
            .map(|i| (*op, i))
    });

    let Some((op, i)) = op_at else {
        return Path::parse(text).map_or_else(invalid, Atom::Truthy);
    };

    let Some(path) = Path::parse(span_text(source, &tokens[..i])) else {
        return invalid();
    };
    let right = span_text(source, &tokens[i + 1..]);
    if right.is_empty() {
        return invalid();
    }

    Atom::Compare {
        path,
        op,
        literal: Literal::parse(right),
    }
}

fn op_token(op: CompareOp) -> TokenKind {
    match op {
        CompareOp::Ne => TokenKind::Ne,
        CompareOp::Eq => TokenKind::EqEq,
        CompareOp::Ge => TokenKind::Ge,
        CompareOp::Le => TokenKind::Le,
        CompareOp::Gt => TokenKind::Gt,
        CompareOp::Lt => TokenKind::Lt,
    }
}

/// Parse a `bind` value: literals and paths joined with `+`.
pub fn parse_bind(source: &str) -> BindExpr {
    let tokens = lex(source);
    let mut parts = Vec::new();
    for piece in tokens.split(|t| t.kind == TokenKind::Plus) {
        match parse_bind_part(span_text(source, piece)) {
            Some(part) => parts.push(part),
            None => return BindExpr::Invalid(source.trim().to_string()),
        }
    }

    if parts.len() == 1 {
        BindExpr::Single(parts.remove(0))
    } else {
        BindExpr::Concat(parts)
    }
}

fn parse_bind_part(text: &str) -> Option<BindPart> {
    if text.is_empty() {
        return None;
    }
    if let Some(inner) = unquote(text) {
        return Some(BindPart::Literal(Literal::Str(inner.to_string())));
    }
    match Literal::parse(text) {
        Literal::Str(_) => Path::parse(text).map(BindPart::Path),
        literal => Some(BindPart::Literal(literal)),
    }
}
