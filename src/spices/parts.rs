use crate::spices::tokenizer::{Bracket, Token, TokenKind};

/// Splits a validated token stream into its parts, expanding part repeats.
///
/// A stream without `< >` is a single implicit part. Otherwise each
/// `n? < ... >` group contributes its inner tokens `n` times (default 1).
pub fn split_parts(tokens: &[Token]) -> Vec<&[Token]> {
    if !tokens
        .iter()
        .any(|t| t.kind == TokenKind::Open(Bracket::Part))
    {
        return vec![tokens];
    }

    let mut parts = Vec::new();
    let mut repeat = 1;
    let mut open: Option<usize> = None;

    for (i, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Integer(n) if open.is_none() => repeat = n as usize,
            TokenKind::Open(Bracket::Part) => open = Some(i + 1),
            TokenKind::Close(Bracket::Part) => {
                if let Some(start) = open.take() {
                    for _ in 0..repeat {
                        parts.push(&tokens[start..i]);
                    }
                }
                repeat = 1;
            }
            _ => {}
        }
    }

    parts
}
