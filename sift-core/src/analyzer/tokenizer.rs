//! Whitespace tokenizer.
//!
//! Splits raw text into space-delimited words as zero-copy slices of the
//! input. A single forward byte scan looks for ASCII space (0x20); each
//! non-empty run between spaces becomes a word. Runs of consecutive spaces
//! and leading/trailing spaces produce no output.
//!
//! Unlike the index, the tokenizer does not validate its input: control
//! characters pass through and are rejected later by the word validity
//! check at the indexing and query-parsing boundaries.

use memchr::Memchr;

/// Iterator over the space-delimited words of a text span.
///
/// Yields `&str` slices of the original input; no allocation happens here.
pub struct Words<'a> {
    text: &'a str,
    start: usize,
    spaces: Memchr<'a>,
}

/// Splits `text` on ASCII spaces, skipping empty runs.
///
/// ```
/// use sift_core::analyzer::split_words;
///
/// let words: Vec<&str> = split_words("  cat in  the city ").collect();
/// assert_eq!(words, ["cat", "in", "the", "city"]);
/// ```
#[inline]
pub fn split_words(text: &str) -> Words<'_> {
    Words {
        text,
        start: 0,
        spaces: memchr::memchr_iter(b' ', text.as_bytes()),
    }
}

impl<'a> Iterator for Words<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        // Space is a single ASCII byte, so every split point is a valid
        // char boundary.
        for i in self.spaces.by_ref() {
            let start = self.start;
            self.start = i + 1;
            if start < i {
                return Some(&self.text[start..i]);
            }
        }
        if self.start < self.text.len() {
            let word = &self.text[self.start..];
            self.start = self.text.len();
            return Some(word);
        }
        None
    }
}
