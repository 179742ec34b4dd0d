mod builder;
pub mod error;
mod parse_tree;
pub mod parts;
pub mod tokenizer;
pub mod validator;

use tracing::{debug, instrument};

use crate::config::ParseOptions;
use crate::graph::ParticleGraph;
pub use error::{ErrorCategory, ErrorKind, SpicesError};
pub use parts::split_parts;
pub use tokenizer::{tokenize, Bracket, Tag, Token, TokenKind};
pub use validator::validate;

/// Builds the graph of one part. The tokens must already have passed [`validate`].
pub fn build_part(tokens: &[Token]) -> ParticleGraph {
    builder::build_graph(&parse_tree::build_parse_tree(tokens))
}

/// Tokenizes, validates and builds every part of a SPICES string.
#[instrument(skip_all, fields(len = input.len()))]
pub fn parse_spices(
    input: &str,
    options: &ParseOptions,
) -> Result<Vec<ParticleGraph>, SpicesError> {
    let result = tokenize(input).and_then(|tokens| {
        validate(&tokens, options)?;
        Ok(split_parts(&tokens).into_iter().map(build_part).collect::<Vec<_>>())
    });
    match &result {
        Ok(parts) => debug!(parts = parts.len(), "parsed structure"),
        Err(e) => debug!(key = e.message_key(), pos = e.pos, "rejected structure"),
    }
    result
}
