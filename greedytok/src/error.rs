use snafu::Snafu;
use std::path::PathBuf;

/// Errors from loading vocabulary configuration.
///
/// Encoding and decoding themselves never fail, so nothing in the tokenizing path returns this
/// type.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum GreedytokError {
    #[snafu(display("File I/O error on file '{}'", path.display()))]
    FileIo {
        path: PathBuf,
        source: std::io::Error,
    },

    #[snafu(display(
        "Vocabulary file '{}' is not a JSON array of token strings",
        path.display()
    ))]
    InvalidVocabFile {
        path: PathBuf,
        source: serde_json::Error,
    },
}
