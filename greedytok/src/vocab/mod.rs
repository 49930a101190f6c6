use crate::{Result, TokenInt, TokenString};
use once_cell::sync::OnceCell;
use std::path::Path;
use std::sync::Arc;
use tracing::*;

mod data;
mod hash;

pub use data::default_vocab_tokens;
use hash::{TokenDecoder, TokenEncoder};

/// The fixed set of known tokens and the ids assigned to them.
///
/// Ids are assigned by position in the list the vocabulary was built from.  A `Vocabulary` is
/// never modified after construction, so a single instance can be shared between threads (usually
/// behind an `Arc`) and used for any number of encode and decode calls at the same time.
#[derive(Clone, Debug)]
pub struct Vocabulary {
    /// Token string to id.  A repeated string maps to the id of its last occurrence.
    encode: TokenEncoder,

    /// Id to token string, one entry per position of the configured list
    decode: TokenDecoder,

    /// Length in characters of the longest token in the vocabulary.
    ///
    /// The encoder never needs to look further ahead than this, since no longer substring can
    /// possibly match.
    longest_token_chars: usize,
}

impl Vocabulary {
    /// Build a vocabulary from an ordered list of token strings.
    ///
    /// `tokens[i]` gets id `i`.  If a string occurs more than once, looking it up by string yields
    /// the id of its last occurrence, while every position remains decodable.  This never fails;
    /// an empty list produces an empty vocabulary.
    pub fn new<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<TokenString>,
    {
        let tokens = tokens.into_iter().map(Into::into).collect::<Vec<_>>();

        let encode = TokenEncoder::new(
            tokens
                .iter()
                .enumerate()
                .map(|(id, token)| (token.as_str(), id)),
        );
        let longest_token_chars = encode
            .token_strings()
            .map(|token| token.chars().count())
            .max()
            .unwrap_or(0);
        let decode = TokenDecoder::new(tokens);

        let duplicates = decode.len() - encode.len();
        if duplicates > 0 {
            debug!(
                duplicates,
                "Vocabulary list repeats some tokens; the last occurrence of each determines its id"
            );
        }
        debug!(size = encode.len(), longest_token_chars, "Built vocabulary");

        Self {
            encode,
            decode,
            longest_token_chars,
        }
    }

    /// Load a vocabulary from a JSON file containing an array of token strings.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let tokens = data::load_json_file(path.as_ref())?;

        Ok(Self::new(tokens))
    }

    /// The built-in vocabulary.
    ///
    /// It's built on first use and then held in memory for the duration of the process.  The
    /// resulting `Arc` is very cheap to clone.
    pub fn load_default() -> Arc<Self> {
        static INSTANCE: OnceCell<Arc<Vocabulary>> = OnceCell::new();

        INSTANCE
            .get_or_init(|| Arc::new(Self::new(default_vocab_tokens())))
            .clone()
    }

    /// The vocabulary size, which is the number of distinct token strings.
    ///
    /// This is also the offset added to a character's code point to form its fallback id.
    pub fn len(&self) -> usize {
        self.encode.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up the id of a token string
    pub fn token_for_str(&self, token: &str) -> Option<TokenInt> {
        self.encode.token_for_str(token)
    }

    /// Look up the token string for an id.  Fallback ids are not in the table and return `None`.
    pub fn str_for_token(&self, token: TokenInt) -> Option<&str> {
        self.decode.str_for_token(token)
    }

    /// Every `(id, token string)` pair in id order
    pub fn tokens(&self) -> impl Iterator<Item = (TokenInt, &str)> {
        self.decode.tokens()
    }

    pub(crate) fn longest_token_chars(&self) -> usize {
        self.longest_token_chars
    }

    /// The id used for a character that has no vocabulary entry of its own.
    pub(crate) fn fallback_id(&self, c: char) -> TokenInt {
        self.len() + c as TokenInt
    }

    /// Invert [`Self::fallback_id`].
    ///
    /// Any id can be handed to the decoder, so the offset might not land on a Unicode scalar
    /// value.  Those ids yield `None`.
    pub(crate) fn fallback_char(&self, token: TokenInt) -> Option<char> {
        let code_point = token.checked_sub(self.len())?;

        u32::try_from(code_point).ok().and_then(char::from_u32)
    }
}

impl Default for Vocabulary {
    fn default() -> Self {
        Self::new(Vec::<TokenString>::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_follow_list_order() {
        let vocab = Vocabulary::new(["Hello", "world", ",", "!", " "]);

        assert_eq!(5, vocab.len());
        assert_eq!(Some(0), vocab.token_for_str("Hello"));
        assert_eq!(Some(4), vocab.token_for_str(" "));
        assert_eq!(Some("world"), vocab.str_for_token(1));
        assert_eq!(None, vocab.str_for_token(5));
        assert_eq!(None, vocab.token_for_str("hello"));
        assert_eq!(5, vocab.longest_token_chars());
    }

    #[test]
    fn mappings_are_inverses() {
        let vocab = Vocabulary::new(default_vocab_tokens());

        for (id, token) in vocab.tokens() {
            assert_eq!(Some(id), vocab.token_for_str(token), "token {token:?}");
        }
        assert_eq!(vocab.len(), vocab.tokens().count());
    }

    #[test]
    fn later_duplicate_wins() {
        crate::test_helpers::init_test_logging();

        let vocab = Vocabulary::new(["a", "b", "a"]);

        assert_eq!(2, vocab.len());
        assert_eq!(Some(2), vocab.token_for_str("a"));
        assert_eq!(Some(1), vocab.token_for_str("b"));

        // The shadowed position is still decodable
        assert_eq!(Some("a"), vocab.str_for_token(0));
        assert_eq!(Some("a"), vocab.str_for_token(2));
    }

    #[test]
    fn empty_vocabulary() {
        let vocab = Vocabulary::default();

        assert!(vocab.is_empty());
        assert_eq!(0, vocab.longest_token_chars());
        assert_eq!('Z' as usize, vocab.fallback_id('Z'));
        assert_eq!(Some('Z'), vocab.fallback_char(90));
    }

    #[test]
    fn fallback_ids_are_offset_by_size() {
        let vocab = Vocabulary::new(["Hello", "world", ",", "!", " "]);

        assert_eq!(95, vocab.fallback_id('Z'));
        assert_eq!(Some('Z'), vocab.fallback_char(95));
        assert_eq!(5 + 0x1F600, vocab.fallback_id('😀'));
        assert_eq!(Some('😀'), vocab.fallback_char(5 + 0x1F600));

        // Surrogates and values past the end of Unicode are not characters
        assert_eq!(None, vocab.fallback_char(5 + 0xD800));
        assert_eq!(None, vocab.fallback_char(5 + 0x110000));
        assert_eq!(None, vocab.fallback_char(usize::MAX));
    }

    #[test]
    fn longest_token_counts_chars_not_bytes() {
        let vocab = Vocabulary::new(["é", "ab"]);

        assert_eq!(2, vocab.longest_token_chars());

        let vocab = Vocabulary::new(["ééé", "ab"]);

        assert_eq!(3, vocab.longest_token_chars());
    }

    #[test]
    fn default_vocabulary_is_shared() {
        let a = Vocabulary::load_default();
        let b = Vocabulary::load_default();

        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(80, a.len());
    }
}
