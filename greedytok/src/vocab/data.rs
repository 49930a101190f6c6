//! The built-in vocabulary is embedded into the binary in release builds.  In debug builds it's
//! read from `vocab/` in the crate directory, so it can be edited without a rebuild.
//!
//! Vocabulary files are JSON arrays of strings rather than one token per line, because the
//! vocabulary contains whitespace tokens such as `"\n"` that a line-oriented format can't hold.
use crate::error::{FileIoSnafu, InvalidVocabFileSnafu};
use crate::{Result, TokenString};
use rust_embed::RustEmbed;
use snafu::ResultExt;
use std::path::Path;

#[derive(RustEmbed)]
#[folder = "vocab/"]
struct EmbeddedVocab;

const DEFAULT_VOCAB_FILE: &str = "default.json";

/// The token strings of the built-in vocabulary, in id order.
///
/// These are compiled in to the crate so this is infallible unless the embedded data itself is
/// broken, in which case this panics.
pub fn default_vocab_tokens() -> Vec<TokenString> {
    let file =
        EmbeddedVocab::get(DEFAULT_VOCAB_FILE).expect("BUG: Required embedded vocabulary is missing");

    serde_json::from_slice(file.data.as_ref())
        .expect("BUG: Embedded vocabulary is not a JSON array of strings")
}

pub(crate) fn load_json_file(path: &Path) -> Result<Vec<TokenString>> {
    let contents = std::fs::read(path).with_context(|_| FileIoSnafu {
        path: path.to_path_buf(),
    })?;

    serde_json::from_slice(&contents).with_context(|_| InvalidVocabFileSnafu {
        path: path.to_path_buf(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{GreedytokError, Vocabulary};
    use std::io::Write;

    #[test]
    fn default_tokens_match_reference_list() {
        let tokens = default_vocab_tokens();

        assert_eq!(80, tokens.len());
        assert_eq!(["Hello", "world", "the", "and"], tokens[..4]);
        assert_eq!(["Price", ":", "199", ".", "99", "INR"], tokens[14..20]);
        assert_eq!([" ", "\n", "\t", "!", "?"], tokens[51..56]);
        assert_eq!(["\"", "'"], tokens[64..66]);
        assert_eq!(
            (0..10).map(|d| d.to_string()).collect::<Vec<_>>(),
            &tokens[70..]
        );
    }

    #[test]
    fn load_vocab_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"["foo", "bar", "\n"]"#).unwrap();

        let vocab = Vocabulary::from_json_file(file.path()).unwrap();

        assert_eq!(3, vocab.len());
        assert_eq!(Some(2), vocab.token_for_str("\n"));
    }

    #[test]
    fn load_vocab_from_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");

        let err = Vocabulary::from_json_file(&path).unwrap_err();

        assert!(matches!(err, GreedytokError::FileIo { .. }), "{err}");
    }

    #[test]
    fn load_vocab_from_malformed_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, r#"{{"tokens": ["foo"]}}"#).unwrap();

        let err = Vocabulary::from_json_file(file.path()).unwrap_err();

        assert!(matches!(err, GreedytokError::InvalidVocabFile { .. }), "{err}");
    }
}
