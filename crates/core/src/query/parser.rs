use super::{
    Query,
    condition::{Condition, PointCondition, RangeCondition},
    error::ParseError,
};
use crate::callnumber::{CallnumberKey, scan::scan_key};
use crate::diag::Span;

/// Separates independent alternatives in a query.
pub const PART_SEPARATOR: &str = ";";
/// Separates the two ends of a range inside one part.
pub const RANGE_SEPARATOR: &str = "--";

/// Parse a callnumber query such as `"B1/4-002--B1/5;K2"`.
///
/// The query is trimmed and case-insensitive. Parts separated by `;` become
/// OR-combined conditions in written order; a part with one token is a
/// prefix match and a part with two `--`-separated tokens is an inclusive
/// range (empty pieces around `--` are dropped, so `A1----A2` is a range).
///
/// # Errors
///
/// Returns the first problem found, with a span into `text`: an empty
/// query, a token that is not a callnumber, a part with zero or more than
/// two tokens, or a range spanning two rooms.
pub fn parse_query(text: &str) -> Result<Query, ParseError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(ParseError::EmptyQuery);
    }
    let base = text.len() - text.trim_start().len();
    // ASCII case folding keeps byte offsets aligned with `text`.
    let folded = trimmed.to_ascii_uppercase();

    let mut conditions = Vec::new();
    for (part_offset, part) in split_with_offsets(&folded, PART_SEPARATOR) {
        let part_span = Span::new(base + part_offset, base + part_offset + part.len());
        let tokens: Vec<(usize, &str)> = split_with_offsets(part, RANGE_SEPARATOR)
            .filter(|(_, token)| !token.is_empty())
            .collect();

        let condition = match tokens.as_slice() {
            [(offset, token)] => {
                let key = parse_token(text, token, part_span.start + offset)?;
                Condition::Point(PointCondition::new(key))
            }
            [(start_offset, start), (end_offset, end)] => {
                let start = parse_token(text, start, part_span.start + start_offset)?;
                let end = parse_token(text, end, part_span.start + end_offset)?;
                let range =
                    RangeCondition::new(PointCondition::new(start), PointCondition::new(end))
                        .map_err(|rooms| ParseError::CrossRoomRange {
                            rooms,
                            span: part_span,
                        })?;
                Condition::Range(range)
            }
            _ => {
                return Err(ParseError::MalformedRange {
                    part: text[part_span.start..part_span.end].to_string(),
                    tokens: tokens.len(),
                    span: part_span,
                });
            }
        };
        conditions.push(condition);
    }

    Ok(Query::new(conditions))
}

/// Parse one case-folded token located at `offset` in the original `text`.
fn parse_token(text: &str, token: &str, offset: usize) -> Result<CallnumberKey, ParseError> {
    scan_key(token).ok_or_else(|| {
        let span = Span::new(offset, offset + token.len());
        ParseError::InvalidToken {
            token: text[span.start..span.end].to_string(),
            span,
        }
    })
}

/// Split on `sep`, pairing each piece with its byte offset in `s`.
fn split_with_offsets<'a>(s: &'a str, sep: &'a str) -> impl Iterator<Item = (usize, &'a str)> {
    let mut next = 0;
    s.split(sep).map(move |piece| {
        let offset = next;
        next += piece.len() + sep.len();
        (offset, piece)
    })
}
