//! Splicing: recognizing one element definition inside a flat argument sequence
//!
//!     A sweep walks the argument sequence of one node left to right, once. At every position
//!     it asks the definition to recognize its pattern there; on success the matched run is
//!     drained into a new element instance which is inserted where the run started, and the
//!     sweep resumes right after it. Sweeps are not repeated to a fixpoint: the caller applies
//!     each definition once per tree level.
//!
//! Alternate Chains
//!
//!     Prefix, postfix and infix operators are found through alternate chains: delimiter,
//!     operand, delimiter, operand, ... Delimiters sit at every other position.
//!
//!         prefix     ! a           delimiters at p, p+2, ...   operands at p+1, p+3, ...
//!         postfix    a !           delimiters at p+1, p+3, ... operands at p, p+2, ...
//!         infix      a & b & c     delimiters at p+1, p+3, ... operands at p, p+2, ...
//!
//!     A variable-arity operator takes the longest chain of its single delimiter and becomes one
//!     flat n-ary node. A fixed-arity operator with a single delimiter takes exactly as many
//!     repetitions as its arity needs. A fixed-arity operator with several delimiters (say
//!     `a ? b : c`) needs the delimiters to appear in their declared order.
//!
//!     Operands are whatever sits in between: raw tokens or already built elements. Raw operands
//!     are reduced later, when the parse descends into the new node.
//!
//! Wrapping
//!
//!     At an opening token, a nested wrapper takes the span up to the last closing token of the
//!     sequence; inner pairs are still raw tokens and get wrapped when the same definition is
//!     applied to the new node. A flat wrapper takes the span up to the first closing token.
//!     Both only work reliably when sibling groups do not share a level with a nested wrapper,
//!     since `(a)(b)` spans from the first opening to the last closing token.

use crate::engine::element::{Arity, ElementDefinition, Fixing};
use crate::engine::error::{ParseError, TokenSite};
use crate::engine::instance::{Argument, ElementInstance};
use crate::engine::token::TokenDefinition;
use std::sync::Arc;

/// Outcome of looking for a wrap span at a position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WrapSpan {
    /// The argument is not the opening token
    NotOpening,
    /// The opening token has no closing token after it
    Unmatched,
    /// Length of the span, both delimiters included
    Span(usize),
}

/// Sweep the sequence once, splicing every occurrence of `definition`.
///
/// Returns whether anything was spliced.
pub fn reduce_all_occurrences(
    definition: &Arc<ElementDefinition>,
    args: &mut Vec<Argument<'_>>,
) -> Result<bool, ParseError> {
    let mut reduced = false;
    let mut position = 0;
    while position < args.len() {
        if let Some(spliced_at) = try_reduce_at(definition, args, position)? {
            reduced = true;
            position = spliced_at;
        }
        position += 1;
    }
    Ok(reduced)
}

/// Try to recognize `definition` at `position` and splice it in.
///
/// Returns the index of the new element instance, or `None` when nothing matched.
pub fn try_reduce_at(
    definition: &Arc<ElementDefinition>,
    args: &mut Vec<Argument<'_>>,
    position: usize,
) -> Result<Option<usize>, ParseError> {
    let tokens = definition.tokens();
    let Some(first) = tokens.first() else {
        return Ok(None);
    };
    if position >= args.len() {
        return Ok(None);
    }

    match definition.fixing() {
        Fixing::None => {
            if !args[position].is_token(first) {
                return Ok(None);
            }
            splice_none(args, position, definition).map(Some)
        }
        Fixing::Prefix => match chain_length(definition, args, position) {
            Some(length) => splice_prefix(args, position, length, definition).map(Some),
            None => Ok(None),
        },
        Fixing::Postfix => {
            if position == 0 && args[0].is_token(first) {
                return Err(not_enough_arguments(definition, args, 0));
            }
            match chain_length(definition, args, position + 1) {
                Some(length) => splice_postfix(args, position + 1, length, definition).map(Some),
                None => Ok(None),
            }
        }
        Fixing::Infix => {
            if position == 0 && args[0].is_token(first) {
                return Err(not_enough_arguments(definition, args, 0));
            }
            match chain_length(definition, args, position + 1) {
                Some(length) => splice_infix(args, position + 1, length, definition).map(Some),
                None => Ok(None),
            }
        }
        Fixing::Wrap => {
            let (open, close) = match tokens {
                [open, close] => (open, close),
                _ => {
                    return Err(ParseError::Internal(format!(
                        "wrapping element {} must have exactly 2 tokens",
                        definition.name()
                    )))
                }
            };
            let nested = definition.nested().unwrap_or(false);
            match wrapped_sequence(args, position, open, close, nested) {
                WrapSpan::NotOpening => Ok(None),
                WrapSpan::Unmatched => Err(ParseError::UnmatchedWrapper {
                    element: definition.clone(),
                    site: site_at(args, position)?,
                }),
                WrapSpan::Span(length) => splice_wrap(args, position, length, definition).map(Some),
            }
        }
    }
}

/// Number of delimiters of the chain starting at `first_delimiter`, if it satisfies the
/// definition's arity.
///
/// For infix operators this is one less than the number of operands.
fn chain_length(definition: &ElementDefinition, args: &[Argument<'_>], first_delimiter: usize) -> Option<usize> {
    let tokens = definition.tokens();
    let operands_per_delimiter = match definition.fixing() {
        Fixing::Infix => 1,
        _ => 0,
    };
    match definition.arity() {
        Some(Arity::Variable) => {
            let length = longest_alternate_chain(args, first_delimiter, &tokens[0], None);
            (length > 0).then_some(length)
        }
        Some(Arity::Fixed(arity)) if tokens.len() == 1 => {
            let wanted = arity.checked_sub(operands_per_delimiter)?;
            let length = longest_alternate_chain(args, first_delimiter, &tokens[0], Some(wanted));
            (length == wanted && length > 0).then_some(length)
        }
        Some(Arity::Fixed(_)) => {
            is_matching_alternate_chain(args, first_delimiter, tokens).then_some(tokens.len())
        }
        None => None,
    }
}

/// Count occurrences of `token` at `position`, `position + 2`, ... stopping at the first
/// position that holds something else, or after `stop_at` occurrences.
fn longest_alternate_chain(
    args: &[Argument<'_>],
    position: usize,
    token: &Arc<TokenDefinition>,
    stop_at: Option<usize>,
) -> usize {
    let mut found = 0;
    let mut index = position;
    while index < args.len() && args[index].is_token(token) {
        if stop_at.is_some_and(|limit| found >= limit) {
            break;
        }
        found += 1;
        index += 2;
    }
    found
}

/// Whether `tokens` appear in order at `position`, `position + 2`, ...
fn is_matching_alternate_chain(args: &[Argument<'_>], position: usize, tokens: &[Arc<TokenDefinition>]) -> bool {
    tokens
        .iter()
        .enumerate()
        .all(|(i, token)| args.get(position + 2 * i).is_some_and(|arg| arg.is_token(token)))
}

fn wrapped_sequence(
    args: &[Argument<'_>],
    position: usize,
    open: &Arc<TokenDefinition>,
    close: &Arc<TokenDefinition>,
    nested: bool,
) -> WrapSpan {
    if !args[position].is_token(open) {
        return WrapSpan::NotOpening;
    }
    let closing = if nested {
        // Longest span
        (position + 1..args.len()).rev().find(|&i| args[i].is_token(close))
    } else {
        // Shortest span
        (position + 1..args.len()).find(|&i| args[i].is_token(close))
    };
    match closing {
        Some(i) => WrapSpan::Span(i - position + 1),
        None => WrapSpan::Unmatched,
    }
}

fn splice_none(
    args: &mut Vec<Argument<'_>>,
    position: usize,
    definition: &Arc<ElementDefinition>,
) -> Result<usize, ParseError> {
    let token = args.remove(position);
    args.insert(position, Argument::Element(ElementInstance::new(definition.clone(), vec![token])));
    trace_splice(definition, position, 1);
    Ok(position)
}

fn splice_prefix(
    args: &mut Vec<Argument<'_>>,
    first_delimiter: usize,
    chain_length: usize,
    definition: &Arc<ElementDefinition>,
) -> Result<usize, ParseError> {
    let end = first_delimiter + chain_length * 2;
    if end > args.len() {
        return Err(not_enough_arguments(definition, args, first_delimiter));
    }
    // Delimiters at even offsets, operands at odd ones
    let operands = args.drain(first_delimiter..end).skip(1).step_by(2).collect();
    args.insert(first_delimiter, Argument::Element(ElementInstance::new(definition.clone(), operands)));
    trace_splice(definition, first_delimiter, chain_length * 2);
    Ok(first_delimiter)
}

fn splice_postfix(
    args: &mut Vec<Argument<'_>>,
    first_delimiter: usize,
    chain_length: usize,
    definition: &Arc<ElementDefinition>,
) -> Result<usize, ParseError> {
    if first_delimiter == 0 {
        return Err(not_enough_arguments(definition, args, first_delimiter));
    }
    let start = first_delimiter - 1;
    let end = start + chain_length * 2;
    if end > args.len() {
        return Err(not_enough_arguments(definition, args, first_delimiter));
    }
    // Operands at even offsets, delimiters at odd ones
    let operands = args.drain(start..end).step_by(2).collect();
    args.insert(start, Argument::Element(ElementInstance::new(definition.clone(), operands)));
    trace_splice(definition, start, chain_length * 2);
    Ok(start)
}

fn splice_infix(
    args: &mut Vec<Argument<'_>>,
    first_delimiter: usize,
    chain_length: usize,
    definition: &Arc<ElementDefinition>,
) -> Result<usize, ParseError> {
    if first_delimiter == 0 {
        return Err(not_enough_arguments(definition, args, first_delimiter));
    }
    let start = first_delimiter - 1;
    let end = first_delimiter + chain_length * 2;
    if end > args.len() {
        return Err(not_enough_arguments(definition, args, first_delimiter));
    }
    let operands = args.drain(start..end).step_by(2).collect();
    args.insert(start, Argument::Element(ElementInstance::new(definition.clone(), operands)));
    trace_splice(definition, start, chain_length * 2 + 1);
    Ok(start)
}

fn splice_wrap(
    args: &mut Vec<Argument<'_>>,
    position: usize,
    sequence_length: usize,
    definition: &Arc<ElementDefinition>,
) -> Result<usize, ParseError> {
    if sequence_length < 2 || position + sequence_length > args.len() {
        return Err(ParseError::Internal(format!(
            "invalid wrap span of length {} at {} for {}",
            sequence_length,
            position,
            definition.name()
        )));
    }
    let mut span: Vec<_> = args.drain(position..position + sequence_length).collect();
    span.pop();
    let opening = match span.remove(0) {
        Argument::Token(token) => token,
        Argument::Element(_) => {
            return Err(ParseError::Internal(format!(
                "wrap span of {} does not start with its opening token",
                definition.name()
            )))
        }
    };
    args.insert(
        position,
        Argument::Element(ElementInstance::wrapped(definition.clone(), opening, span)),
    );
    trace_splice(definition, position, sequence_length);
    Ok(position)
}

fn site_at(args: &[Argument<'_>], index: usize) -> Result<TokenSite, ParseError> {
    args.get(index)
        .and_then(Argument::as_token)
        .map(TokenSite::from_instance)
        .ok_or_else(|| ParseError::Internal(format!("expected a delimiter token at argument {}", index)))
}

fn not_enough_arguments(definition: &Arc<ElementDefinition>, args: &[Argument<'_>], delimiter: usize) -> ParseError {
    match site_at(args, delimiter) {
        Ok(site) => ParseError::NotEnoughArguments {
            element: definition.clone(),
            site,
        },
        Err(err) => err,
    }
}

fn trace_splice(definition: &ElementDefinition, position: usize, consumed: usize) {
    tracing::trace!(
        element = definition.name(),
        position,
        consumed,
        "spliced element instance"
    );
}
