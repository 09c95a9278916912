use std::collections::BTreeMap;

use thiserror::Error;

use crate::diag::{Diagnostic, Span, codes};

/// A range whose ends lie in different rooms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("a single range cannot span more than one room: {start_room}-{end_room}")]
pub struct CrossRoomError {
    /// Room of the range start.
    pub start_room: char,
    /// Room of the range end.
    pub end_room: char,
}

/// Errors produced while parsing a callnumber query.
///
/// Spans are byte offsets into the query text exactly as the caller passed
/// it (before trimming), and quoted text keeps the caller's casing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The query is empty or whitespace only.
    #[error("empty query")]
    EmptyQuery,

    /// A token matches none of the callnumber patterns.
    #[error("invalid callnumber pattern: {token}")]
    InvalidToken {
        /// The token as written.
        token: String,
        /// Location of the token.
        span: Span,
    },

    /// A `;`-separated part holds neither one token nor two.
    #[error("invalid range definition: {part}")]
    MalformedRange {
        /// The part as written.
        part: String,
        /// Number of non-empty `--`-separated tokens found.
        tokens: usize,
        /// Location of the part.
        span: Span,
    },

    /// A range starts and ends in different rooms.
    #[error("{rooms}")]
    CrossRoomRange {
        /// The two rooms.
        rooms: CrossRoomError,
        /// Location of the range.
        span: Span,
    },
}

impl ParseError {
    /// Location of the offending text, when there is one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ParseError::EmptyQuery => None,
            ParseError::InvalidToken { span, .. }
            | ParseError::MalformedRange { span, .. }
            | ParseError::CrossRoomRange { span, .. } => Some(*span),
        }
    }

    /// Diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ParseError::EmptyQuery => codes::EMPTY_QUERY,
            ParseError::InvalidToken { .. } => codes::INVALID_TOKEN,
            ParseError::MalformedRange { .. } => codes::MALFORMED_RANGE,
            ParseError::CrossRoomRange { .. } => codes::CROSS_ROOM_RANGE,
        }
    }

    /// Convert into an error diagnostic spanning the offending text.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        match self {
            ParseError::EmptyQuery => diag,
            ParseError::InvalidToken { token, .. } => {
                diag.with_context(BTreeMap::from([("token".into(), token.clone())]))
            }
            ParseError::MalformedRange { part, tokens, .. } => diag.with_context(BTreeMap::from([
                ("part".into(), part.clone()),
                ("tokens".into(), tokens.to_string()),
            ])),
            ParseError::CrossRoomRange { rooms, .. } => diag.with_context(BTreeMap::from([
                ("start_room".into(), rooms.start_room.to_string()),
                ("end_room".into(), rooms.end_room.to_string()),
            ])),
        }
    }
}
