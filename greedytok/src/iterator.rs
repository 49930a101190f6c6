//! Contains the implementation of the tokenization logic, implemented as a Rust [`Iterator`].
use crate::{TokenInt, Vocabulary, MAX_TOKEN_LEN};
use std::iter::FusedIterator;

/// Walks the input text left to right, yielding each token as a substring of the input along with
/// its id.
///
/// At every position the longest vocabulary entry starting there wins, looking ahead at most
/// [`MAX_TOKEN_LEN`] characters.  A character that doesn't start any vocabulary entry becomes a
/// token on its own, with a fallback id derived from its code point.
#[derive(Clone)]
pub(crate) struct EncodeIterator<'v, 't> {
    vocab: &'v Vocabulary,

    /// The input text that is being tokenized
    text: &'t str,

    /// Byte offset into `text` where the next token starts.  Always on a char boundary.
    pos: usize,
}

impl<'v, 't> EncodeIterator<'v, 't> {
    pub(crate) fn new(vocab: &'v Vocabulary, text: &'t str) -> Self {
        Self { vocab, text, pos: 0 }
    }

    /// Find the longest vocabulary entry that `rest` starts with.
    fn longest_match(&self, rest: &'t str) -> Option<(&'t str, TokenInt)> {
        // No substring longer than the longest token can possibly match
        let window = MAX_TOKEN_LEN.min(self.vocab.longest_token_chars());

        // Byte offsets in `rest` of the end of each of the first `window` characters
        let mut ends = [0usize; MAX_TOKEN_LEN];
        let mut count = 0;
        for (slot, end) in ends
            .iter_mut()
            .zip(rest.char_indices().map(|(i, c)| i + c.len_utf8()).take(window))
        {
            *slot = end;
            count += 1;
        }

        ends[..count].iter().rev().find_map(|&end| {
            let candidate = &rest[..end];
            self.vocab
                .token_for_str(candidate)
                .map(|token| (candidate, token))
        })
    }
}

impl<'v, 't> Iterator for EncodeIterator<'v, 't> {
    type Item = (&'t str, TokenInt);

    fn next(&mut self) -> Option<Self::Item> {
        let rest = &self.text[self.pos..];
        let first = rest.chars().next()?;

        let (token, id) = self.longest_match(rest).unwrap_or_else(|| {
            // Not the start of any known token, so this character stands alone
            (&rest[..first.len_utf8()], self.vocab.fallback_id(first))
        });

        // Every token is at least one character long, so this always makes progress
        self.pos += token.len();

        Some((token, id))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        // At least one token if there is any text left, and at most one per remaining byte
        let remaining = self.text.len() - self.pos;

        (usize::from(remaining > 0), Some(remaining))
    }
}

impl FusedIterator for EncodeIterator<'_, '_> {}
