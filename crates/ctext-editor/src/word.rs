//! Word skipping for Ctrl-modified motion and deletion.
//!
//! One predicate decides every boundary: [`is_word_bound`]. Whitespace and
//! ASCII punctuation (`_` included) are bounds; everything else is word
//! content. The scans work on one line's chars and return a column on
//! that same line.
//!
//! | Scan                 | Used by         | From `"foo bar"` |
//! |----------------------|-----------------|------------------|
//! | [`skip_forward`]     | Ctrl+Right      | `0 → 4`          |
//! | [`skip_backward`]    | Ctrl+Left       | `4 → 0`          |
//! | [`delete_back_start`]| Ctrl+Backspace  | `7 → 4`          |

/// Whitespace or ASCII punctuation.
#[inline]
#[must_use]
pub fn is_word_bound(c: char) -> bool {
    c.is_whitespace() || c.is_ascii_punctuation()
}

/// Ctrl+Right target, never past `limit`.
///
/// Step over one bound char if the cursor is on one, run to the end of the
/// word, then over any whitespace so the cursor lands on the next word.
#[must_use]
pub fn skip_forward(chars: &[char], col: usize, limit: usize) -> usize {
    let limit = limit.min(chars.len());
    let mut x = col;
    if x < limit && is_word_bound(chars[x]) {
        x += 1;
    }
    while x < limit && !is_word_bound(chars[x]) {
        x += 1;
    }
    while x < limit && chars[x].is_whitespace() {
        x += 1;
    }
    x
}

/// Ctrl+Left target.
///
/// Back over whitespace before the cursor, over one bound char if present,
/// then to the start of the word.
#[must_use]
pub fn skip_backward(chars: &[char], col: usize) -> usize {
    let mut x = col.min(chars.len());
    while x > 0 && chars[x - 1].is_whitespace() {
        x -= 1;
    }
    if x > 0 && is_word_bound(chars[x - 1]) {
        x -= 1;
    }
    while x > 0 && !is_word_bound(chars[x - 1]) {
        x -= 1;
    }
    x
}

/// Where Ctrl+Backspace stops deleting.
///
/// First every bound char directly before the cursor, then the word
/// before those.
#[must_use]
pub fn delete_back_start(chars: &[char], col: usize) -> usize {
    let mut x = col.min(chars.len());
    while x > 0 && is_word_bound(chars[x - 1]) {
        x -= 1;
    }
    while x > 0 && !is_word_bound(chars[x - 1]) {
        x -= 1;
    }
    x
}
