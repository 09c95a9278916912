use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

use super::scan::{BOOK_DIGITS, scan_key};

/// One level of the shelving hierarchy.
///
/// Levels are ordered from the coarsest (`Room`) to the finest (`Book`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    /// The room, a single uppercase letter.
    Room = 1,
    /// Bookcase number within the room.
    Bookcase = 2,
    /// Shelf number within the bookcase.
    Shelf = 3,
    /// Book number on the shelf (three digits when written).
    Book = 4,
}

impl Level {
    /// Numeric depth of the level (1 for `Room` through 4 for `Book`).
    pub fn depth(self) -> u8 {
        self as u8
    }

    /// The numbered levels below the room, coarsest first.
    const NUMBERED: [Level; 3] = [Level::Bookcase, Level::Shelf, Level::Book];
}

/// A hierarchical shelving key: room, bookcase, shelf and book.
///
/// Lower levels are only present when every level above them is: a key with
/// a shelf always has a bookcase. The constructors enforce this, so a key is
/// either a prefix of the hierarchy (`A`, `A12`, `A12/3`) or complete
/// (`A12/3-004`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct CallnumberKey {
    room: char,
    #[serde(skip_serializing_if = "Option::is_none")]
    bookcase: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    shelf: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    book: Option<u32>,
}

impl CallnumberKey {
    /// Key naming a whole room.
    pub fn at_room(room: char) -> Self {
        Self {
            room: room.to_ascii_uppercase(),
            bookcase: None,
            shelf: None,
            book: None,
        }
    }

    /// Key naming one bookcase.
    pub fn at_bookcase(room: char, bookcase: u32) -> Self {
        Self {
            bookcase: Some(bookcase),
            ..Self::at_room(room)
        }
    }

    /// Key naming one shelf.
    pub fn at_shelf(room: char, bookcase: u32, shelf: u32) -> Self {
        Self {
            shelf: Some(shelf),
            ..Self::at_bookcase(room, bookcase)
        }
    }

    /// Complete key naming one book position.
    pub fn full(room: char, bookcase: u32, shelf: u32, book: u32) -> Self {
        Self {
            book: Some(book),
            ..Self::at_shelf(room, bookcase, shelf)
        }
    }

    /// Parse a complete four-level callnumber such as `A12/3-004`.
    ///
    /// Case-insensitive. Anything other than a full callnumber, including a
    /// valid prefix like `A12/3`, yields `None`: the record has no usable key
    /// and matches no condition.
    pub fn parse_full(text: &str) -> Option<Self> {
        scan_key(&text.to_ascii_uppercase()).filter(Self::is_complete)
    }

    /// Whether `text` is a complete callnumber exactly as stored (uppercase
    /// room letter, no surrounding whitespace).
    pub fn is_strict_full(text: &str) -> bool {
        scan_key(text).is_some_and(|key| key.is_complete())
    }

    /// The room letter.
    pub fn room(&self) -> char {
        self.room
    }

    /// Bookcase number, if present.
    pub fn bookcase(&self) -> Option<u32> {
        self.bookcase
    }

    /// Shelf number, if present.
    pub fn shelf(&self) -> Option<u32> {
        self.shelf
    }

    /// Book number, if present.
    pub fn book(&self) -> Option<u32> {
        self.book
    }

    /// Number stored at a level below the room. `Room` has no number.
    pub fn number(&self, level: Level) -> Option<u32> {
        match level {
            Level::Room => None,
            Level::Bookcase => self.bookcase,
            Level::Shelf => self.shelf,
            Level::Book => self.book,
        }
    }

    /// Deepest level present in the key.
    pub fn max_level(&self) -> Level {
        match (self.bookcase, self.shelf, self.book) {
            (_, _, Some(_)) => Level::Book,
            (_, Some(_), None) => Level::Shelf,
            (Some(_), None, None) => Level::Bookcase,
            (None, None, None) => Level::Room,
        }
    }

    /// Whether all four levels are present.
    pub fn is_complete(&self) -> bool {
        self.max_level() == Level::Book
    }

    /// Compare the numbered levels of `self` and `other` from `Bookcase`
    /// down to `through`, ignoring the room and every deeper level.
    ///
    /// Levels are compared in hierarchy order, so the result is the
    /// lexicographic order of the two truncated sequences. With
    /// `through == Level::Room` nothing is compared and the keys are equal.
    pub fn cmp_through(&self, other: &Self, through: Level) -> Ordering {
        Level::NUMBERED
            .into_iter()
            .take_while(|level| *level <= through)
            .map(|level| self.number(level).cmp(&other.number(level)))
            .find(|ord| ord.is_ne())
            .unwrap_or(Ordering::Equal)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Level::Room => "room",
            Level::Bookcase => "bookcase",
            Level::Shelf => "shelf",
            Level::Book => "book",
        })
    }
}

impl fmt::Display for CallnumberKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.room)?;
        if let Some(bookcase) = self.bookcase {
            write!(f, "{bookcase}")?;
        }
        if let Some(shelf) = self.shelf {
            write!(f, "/{shelf}")?;
        }
        if let Some(book) = self.book {
            write!(f, "-{book:0width$}", width = BOOK_DIGITS)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_level_follows_presence() {
        assert_eq!(CallnumberKey::at_room('A').max_level(), Level::Room);
        assert_eq!(CallnumberKey::at_bookcase('A', 1).max_level(), Level::Bookcase);
        assert_eq!(CallnumberKey::at_shelf('A', 1, 2).max_level(), Level::Shelf);
        assert_eq!(CallnumberKey::full('A', 1, 2, 3).max_level(), Level::Book);
        assert_eq!(Level::Book.depth(), 4);
    }

    #[test]
    fn zero_book_still_counts_as_present() {
        let key = CallnumberKey::full('A', 1, 2, 0);
        assert!(key.is_complete());
        assert_eq!(key.to_string(), "A1/2-000");
    }

    #[test]
    fn parse_full_folds_case() {
        assert_eq!(
            CallnumberKey::parse_full("a12/3-002"),
            Some(CallnumberKey::full('A', 12, 3, 2))
        );
    }

    #[test]
    fn parse_full_rejects_prefixes_and_garbage() {
        for text in ["A12-002", "A12/3", "A", "InvalidCN", "A12/3-002 "] {
            assert_eq!(CallnumberKey::parse_full(text), None, "{text:?}");
        }
    }

    #[test]
    fn strict_full_requires_uppercase() {
        assert!(CallnumberKey::is_strict_full("K4/11-101"));
        assert!(!CallnumberKey::is_strict_full("k4/11-101"));
        assert!(!CallnumberKey::is_strict_full("K4/11"));
    }

    #[test]
    fn display_roundtrip_through_parse_full() {
        for text in ["A12/3-002", "B1/1-023", "Z999/88-100"] {
            let key = CallnumberKey::parse_full(text).unwrap();
            assert_eq!(key.to_string(), text);
        }
        assert_eq!(CallnumberKey::at_shelf('k', 4, 11).to_string(), "K4/11");
    }

    #[test]
    fn cmp_through_truncates() {
        let a = CallnumberKey::full('A', 12, 1, 1);
        let b = CallnumberKey::full('A', 12, 9, 9);
        assert_eq!(a.cmp_through(&b, Level::Bookcase), Ordering::Equal);
        assert_eq!(a.cmp_through(&b, Level::Shelf), Ordering::Less);
        assert_eq!(b.cmp_through(&a, Level::Book), Ordering::Greater);
        assert_eq!(a.cmp_through(&b, Level::Room), Ordering::Equal);
    }

    #[test]
    fn cmp_through_is_lexicographic() {
        let record = CallnumberKey::full('A', 11, 0, 5);
        let start = CallnumberKey::at_shelf('A', 10, 5);
        assert_eq!(record.cmp_through(&start, Level::Shelf), Ordering::Greater);
    }
}
