//! The two lookup tables behind a [`crate::Vocabulary`].
//!
//! The forward table is hashed since it's probed up to [`crate::MAX_TOKEN_LEN`] times per emitted
//! token.  The backward table is indexed directly by id because ids are dense.
use crate::token::{TokenInt, TokenString};

pub use rustc_hash::FxHashMap as HashMap;

/// Encoders maintain the mapping from token strings to their ids in the vocabulary.
#[derive(Clone, Debug, Default)]
pub struct TokenEncoder(HashMap<TokenString, TokenInt>);

/// Decoders maintain the reverse mapping, from the id of a token to its string.
///
/// Every position of the configured list is present, including positions whose string was
/// repeated later in the list.
#[derive(Clone, Debug, Default)]
pub struct TokenDecoder(Vec<TokenString>);

impl TokenEncoder {
    /// Build from `(string, id)` pairs.  When a string appears more than once, the last pair wins.
    pub fn new<Iter, S>(items: Iter) -> Self
    where
        Iter: IntoIterator<Item = (S, TokenInt)>,
        S: Into<TokenString>,
    {
        Self(
            items
                .into_iter()
                .map(|(token, id)| (token.into(), id))
                .collect(),
        )
    }

    pub fn token_for_str(&self, token: &str) -> Option<TokenInt> {
        self.0.get(token).copied()
    }

    /// Number of distinct token strings
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All token strings in the encoder, in no particular order
    pub fn token_strings(&self) -> impl Iterator<Item = &TokenString> {
        self.0.keys()
    }
}

impl TokenDecoder {
    /// Build from token strings in id order.
    pub fn new<Iter, S>(tokens: Iter) -> Self
    where
        Iter: IntoIterator<Item = S>,
        S: Into<TokenString>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    pub fn str_for_token(&self, token: TokenInt) -> Option<&str> {
        self.0.get(token).map(String::as_str)
    }

    /// Number of ids, counting repeated strings once per position
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All `(id, string)` pairs in id order
    pub fn tokens(&self) -> impl Iterator<Item = (TokenInt, &str)> {
        self.0.iter().map(String::as_str).enumerate()
    }
}
