/// A token output by the tokenizer, represented in its integer form.
///
/// Values below the vocabulary size are the position of the token in the vocabulary list.  Values
/// at or above the vocabulary size are fallback ids, which carry the code point of a single
/// character that the vocabulary doesn't know about, offset by the vocabulary size.
pub type TokenInt = usize;

/// A token in its string form, as stored in the vocabulary.
pub type TokenString = String;

/// The longest token, in characters, that the encoder will ever try to match.
///
/// Vocabulary entries longer than this are kept in the table but can never be produced by
/// encoding.
pub const MAX_TOKEN_LEN: usize = 20;
