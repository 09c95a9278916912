use super::key::CallnumberKey;

/// Width of the book number in a full callnumber (`A12/3-004`).
pub(crate) const BOOK_DIGITS: usize = 3;

/// Scan `text` as `ROOM[BOOKCASE[/SHELF[-BOOK]]]`.
///
/// The whole input must match: the four anchored patterns (full key,
/// room+bookcase+shelf, room+bookcase, room) are mutually exclusive, so
/// reading as far as the text allows and then requiring end of input picks
/// the same pattern as trying them from most to least specific. The room
/// must already be an uppercase ASCII letter; callers fold case first when
/// they accept lowercase input.
///
/// Returns `None` for text that matches no pattern, including numbers that
/// overflow `u32`.
pub(crate) fn scan_key(text: &str) -> Option<CallnumberKey> {
    let mut cur = Cursor::new(text);

    let room = cur.room()?;
    if cur.at_end() {
        return Some(CallnumberKey::at_room(room));
    }

    let bookcase = cur.number()?;
    if cur.at_end() {
        return Some(CallnumberKey::at_bookcase(room, bookcase));
    }

    if !cur.eat(b'/') {
        return None;
    }
    let shelf = cur.number()?;
    if cur.at_end() {
        return Some(CallnumberKey::at_shelf(room, bookcase, shelf));
    }

    if !cur.eat(b'-') {
        return None;
    }
    let digits = cur.digits()?;
    if digits.len() != BOOK_DIGITS || !cur.at_end() {
        return None;
    }
    let book = digits.parse().ok()?;
    Some(CallnumberKey::full(room, bookcase, shelf, book))
}

struct Cursor<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn new(text: &'a str) -> Self {
        Self { text, pos: 0 }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.text.len()
    }

    fn peek(&self) -> Option<u8> {
        self.text.as_bytes().get(self.pos).copied()
    }

    fn eat(&mut self, b: u8) -> bool {
        if self.peek() == Some(b) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn room(&mut self) -> Option<char> {
        let b = self.peek().filter(u8::is_ascii_uppercase)?;
        self.pos += 1;
        Some(b as char)
    }

    /// One or more ASCII digits.
    fn digits(&mut self) -> Option<&'a str> {
        let start = self.pos;
        while self.peek().is_some_and(|b| b.is_ascii_digit()) {
            self.pos += 1;
        }
        let (text, end) = (self.text, self.pos);
        (end > start).then(|| &text[start..end])
    }

    fn number(&mut self) -> Option<u32> {
        self.digits()?.parse().ok()
    }
}
