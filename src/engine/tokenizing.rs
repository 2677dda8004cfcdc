//! Tokenizer
//!
//!     Scans the source left to right. At each position the token definitions are tried in the
//!     order given and the first one that matches wins, so more specific definitions must come
//!     before catch-all patterns. The cursor then moves past the match.
//!
//!     Tokens whose definition is in the ignore set are consumed but not emitted. If nothing
//!     matches at a position, tokenizing stops with [TokenizeError::UnknownToken].

use crate::engine::error::TokenizeError;
use crate::engine::token::{TokenDefinition, TokenInstance};
use std::sync::Arc;

/// Split `text` into token instances.
///
/// `definitions` is in priority order. Occurrences of any definition in `ignore` are dropped
/// from the output.
pub fn tokenize<'s>(
    text: &'s str,
    definitions: &[Arc<TokenDefinition>],
    ignore: &[Arc<TokenDefinition>],
) -> Result<Vec<TokenInstance<'s>>, TokenizeError> {
    let mut tokens = Vec::new();
    let mut position = 0;

    while position < text.len() {
        let found = definitions.iter().find_map(|definition| {
            definition
                .try_match(text, position)
                .map(|matched| TokenInstance::new(definition.clone(), text, position, matched.len()))
        });

        let token = match found {
            Some(token) => token,
            None => return Err(TokenizeError::unknown_token(text, position)),
        };

        position += token.length();
        if !ignore.iter().any(|skipped| token.is(skipped)) {
            tokens.push(token);
        }
    }

    tracing::trace!(count = tokens.len(), "tokenized source");
    Ok(tokens)
}
