use serde::Serialize;
use std::sync::Arc;
use tracing::*;

mod error;
mod ids;
mod iterator;
mod token;
mod vocab;

pub use error::*;
pub use ids::*;
pub use token::*;
pub use vocab::*;

use iterator::EncodeIterator;

pub type Result<T> = std::result::Result<T, GreedytokError>;

/// A tokenizer that splits text into the longest tokens it can find in a fixed vocabulary.
///
/// With this tokenizer it's possible to encode text into tokens and their integer ids, and to
/// decode integer ids back into the text they came from.  Characters that aren't covered by the
/// vocabulary are never an error: each one becomes a token of its own, with an id above the range
/// of vocabulary ids that encodes the character's code point.
///
/// Instances of `Tokenizer` are light weight and can be very cheaply cloned.  They are also thread
/// safe; a single instance can be used to encode or decode text in multiple threads
/// simultaneously.
#[derive(Clone, Debug)]
pub struct Tokenizer {
    vocab: Arc<Vocabulary>,
}

impl Tokenizer {
    /// Create a tokenizer that uses the given vocabulary.
    pub fn new(vocab: impl Into<Arc<Vocabulary>>) -> Self {
        Self {
            vocab: vocab.into(),
        }
    }

    /// Create a tokenizer that uses the built-in vocabulary.
    pub fn default_vocab() -> Self {
        Self {
            vocab: Vocabulary::load_default(),
        }
    }

    pub fn vocab(&self) -> &Vocabulary {
        &self.vocab
    }

    /// Encode text into tokens and their ids.
    ///
    /// This can't fail.  The returned tokens are substrings of `text` and, concatenated in order,
    /// reproduce it exactly.
    pub fn encode<'t>(&self, text: &'t str) -> Encoded<'t> {
        let (tokens, ids) = EncodeIterator::new(&self.vocab, text).unzip();

        Encoded { tokens, ids }
    }

    /// The number of tokens [`Self::encode`] would produce for `text`, without allocating them.
    pub fn count_tokens(&self, text: &str) -> usize {
        EncodeIterator::new(&self.vocab, text).count()
    }

    /// Decode token ids back into text.
    ///
    /// Ids in the vocabulary decode to their token string; every other id is taken to be a
    /// fallback id and decodes to the character whose code point it carries.  This never fails.
    /// A fallback id that doesn't correspond to a Unicode scalar value (for example a surrogate
    /// code point, which is never produced by [`Self::encode`]) decodes to
    /// [`char::REPLACEMENT_CHARACTER`].
    pub fn decode(&self, ids: &[TokenInt]) -> String {
        let mut text = String::with_capacity(ids.len());

        for &id in ids {
            match self.vocab.str_for_token(id) {
                Some(token) => text.push_str(token),
                None => text.push(self.vocab.fallback_char(id).unwrap_or_else(|| {
                    trace!(id, "Fallback id is not a valid character");
                    char::REPLACEMENT_CHARACTER
                })),
            }
        }

        text
    }
}

/// The result of encoding a piece of text.
///
/// `tokens` and `ids` always have the same length; `ids[i]` is the id of `tokens[i]`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct Encoded<'t> {
    pub tokens: Vec<&'t str>,
    pub ids: Vec<TokenInt>,
}

impl<'t> Encoded<'t> {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Each token paired with its id
    pub fn iter(&self) -> impl Iterator<Item = (&'t str, TokenInt)> + '_ {
        self.tokens.iter().copied().zip(self.ids.iter().copied())
    }
}

#[cfg(test)]
pub(crate) mod test_helpers {
    use std::sync::OnceLock;
    use tracing_subscriber::{fmt::format::FmtSpan, EnvFilter};

    static TRACING: OnceLock<()> = OnceLock::new();

    /// Send this crate's tracing events to the test output, once per test binary.
    pub fn init_test_logging() {
        TRACING.get_or_init(|| {
            let filter = std::env::var("RUST_LOG")
                .map(EnvFilter::new)
                .unwrap_or_else(|_| EnvFilter::new("debug"));

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_span_events(FmtSpan::CLOSE)
                .with_test_writer()
                .try_init()
                .ok();
        });
    }
}
