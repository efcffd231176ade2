//! Placeholder scanner for template text runs.
//!
//! Splits text into literal runs and `#{name}` / `${name}` parameters, in
//! source order. Anything that is not a complete placeholder (including an
//! unterminated `#{`) stays literal text.

use logos::Logos;

use crate::ast::Node;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
enum PlaceholderKind {
    #[regex(r"#\{[^}]*\}")]
    Bound,

    #[regex(r"\$\{[^}]*\}")]
    Raw,
}

/// Scan a text run into `Text` and `Parameter` nodes.
pub fn scan(text: &str) -> Vec<Node> {
    let mut nodes = Vec::new();
    let mut lexer = PlaceholderKind::lexer(text);
    let mut literal_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(kind)) => {
                let span = lexer.span();
                let name = text[span.start + 2..span.end - 1].trim();
                if name.is_empty() {
                    literal_start.get_or_insert(span.start);
                    continue;
                }

                if let Some(start) = literal_start.take() {
                    push_text(&mut nodes, &text[start..span.start]);
                }
                nodes.push(Node::Parameter {
                    name: name.to_string(),
                    raw: kind == PlaceholderKind::Raw,
                });
            }
            Some(Err(())) => {
                literal_start.get_or_insert(lexer.span().start);
            }
            None => {
                if let Some(start) = literal_start.take() {
                    push_text(&mut nodes, &text[start..]);
                }
                break;
            }
        }
    }

    nodes
}

/// Append literal text, merging with a preceding `Text` node.
pub(crate) fn push_text(nodes: &mut Vec<Node>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(Node::Text(last)) = nodes.last_mut() {
        last.push_str(text);
    } else {
        nodes.push(Node::Text(text.to_string()));
    }
}
