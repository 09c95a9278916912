//! Diagnostic ID constants.
//!
//! Use these instead of string literals to get compile-time typo detection.
//! Ranges: `SHL1xxx` query language, `SHL2xxx` catalogue, `SHL3xxx` sheet
//! layout, `SHL4xxx` run notes.

// ── Query language ──────────────────────────────────────────────────────

/// The query is empty or whitespace only.
pub const EMPTY_QUERY: &str = "SHL1001";

/// A query token matches none of the callnumber patterns.
pub const INVALID_TOKEN: &str = "SHL1002";

/// A query part holds neither one token nor a two-token range.
pub const MALFORMED_RANGE: &str = "SHL1003";

/// A range starts and ends in different rooms.
pub const CROSS_ROOM_RANGE: &str = "SHL1004";

// ── Catalogue ───────────────────────────────────────────────────────────

/// Two or more catalogue records share a callnumber.
pub const DUPLICATE_CALLNUMBER: &str = "SHL2001";

/// A catalogue callnumber is not a full four-level callnumber.
pub const MALFORMED_CALLNUMBER: &str = "SHL2002";

// ── Sheet layout ────────────────────────────────────────────────────────

/// The label grid has zero rows or columns.
pub const INVALID_GRID: &str = "SHL3001";

/// The start cell lies outside the label grid.
pub const START_CELL_OUT_OF_RANGE: &str = "SHL3002";

/// The sticker template's aspect ratio differs from the grid cell's.
pub const TEMPLATE_RATIO_MISMATCH: &str = "SHL3003";

/// The cell renderer failed while a sheet was being laid out.
pub const RENDER_FAILED: &str = "SHL3004";

// ── Run notes ───────────────────────────────────────────────────────────

/// The query matched no catalogue records.
pub const EMPTY_SELECTION: &str = "SHL4001";

/// Informational progress note.
pub const NOTE: &str = "SHL4002";

/// Every code defined in this module, in ascending order.
pub const ALL: &[&str] = &[
    EMPTY_QUERY,
    INVALID_TOKEN,
    MALFORMED_RANGE,
    CROSS_ROOM_RANGE,
    DUPLICATE_CALLNUMBER,
    MALFORMED_CALLNUMBER,
    INVALID_GRID,
    START_CELL_OUT_OF_RANGE,
    TEMPLATE_RATIO_MISMATCH,
    RENDER_FAILED,
    EMPTY_SELECTION,
    NOTE,
];

pub(crate) fn explain_code(id: &str) -> Option<&'static str> {
    let text = match id {
        EMPTY_QUERY => {
            "The query is empty. Enter at least one callnumber, e.g. `A`, `A12`, `A12/3` or `A12/3-004`."
        }
        INVALID_TOKEN => {
            "A query token is not a callnumber. Tokens have the form ROOM[BOOKCASE[/SHELF[-BOOK]]]: one letter, then digits, then `/` and digits, then `-` and exactly three digits."
        }
        MALFORMED_RANGE => {
            "A query part separated by `;` must be a single callnumber or a range `START--END` of exactly two callnumbers."
        }
        CROSS_ROOM_RANGE => {
            "A single range cannot span more than one room. Split it into one range per room joined with `;`."
        }
        DUPLICATE_CALLNUMBER => {
            "Callnumbers in the catalogue must be unique; the listed callnumbers appear on more than one record."
        }
        MALFORMED_CALLNUMBER => {
            "Every catalogue callnumber must be a full four-level callnumber such as `A12/3-004` (uppercase room letter, three-digit book number)."
        }
        INVALID_GRID => "The label sheet grid needs at least one row and one column.",
        START_CELL_OUT_OF_RANGE => {
            "The first label position must lie on the sheet: its ordinal is between 1 and columns × rows, counted row by row from the top-left cell."
        }
        TEMPLATE_RATIO_MISMATCH => {
            "The sticker template's proportions differ by more than 10% from the grid cell's; printed stickers will look stretched."
        }
        RENDER_FAILED => {
            "Rendering a label failed part way through the sheet; no output pages were kept."
        }
        EMPTY_SELECTION => "The query is valid but no catalogue record matched it.",
        NOTE => "Informational note about the run.",
        _ => return None,
    };
    Some(text)
}
