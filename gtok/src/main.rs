use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use greedytok::{format_token_ids, parse_token_ids, Encoded, Tokenizer, Vocabulary};
use std::io::{Read, Write};
use std::path::PathBuf;
use std::process::exit;
use tracing::*;
use tracing_subscriber::{filter::LevelFilter, EnvFilter, FmtSubscriber};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(flatten)]
    globals: Globals,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct Globals {
    /// Use the vocabulary in this JSON file instead of the built-in one.
    ///
    /// The file must contain a JSON array of token strings; each token's id is its position in
    /// the array.
    #[arg(short, long, value_name = "FILE", global = true, env = "GTOK_VOCAB")]
    vocab: Option<PathBuf>,

    /// Turn debugging information on
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    debug: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Split text into tokens and print the tokens with their ids
    Encode {
        /// The text to encode.
        ///
        /// If not specified, the text is read from stdin.
        text: Option<String>,

        /// How to print the result: `text`, `json` or `ids`
        #[arg(short, long, default_value_t = OutputFormat::Text)]
        format: OutputFormat,
    },

    /// Turn a comma separated list of token ids back into text
    ///
    /// Entries that aren't numbers are ignored.
    Decode {
        /// Token ids, for example "0, 56, 51, 1"
        #[arg(required = true, allow_hyphen_values = true)]
        ids: Vec<String>,
    },

    /// List every token in the vocabulary with its id
    Vocab,
}

/// Output formats for the `encode` command
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum::EnumString, strum::Display)]
#[strum(serialize_all = "lowercase")]
enum OutputFormat {
    /// One line per token, followed by the id list and a summary
    Text,
    /// A JSON object with the `tokens` and `ids` arrays
    Json,
    /// Only the comma separated ids
    Ids,
}

impl Commands {
    fn execute(self, globals: &Globals) -> anyhow::Result<()> {
        let tokenizer = match &globals.vocab {
            Some(path) => {
                info!(path = %path.display(), "Loading vocabulary");
                Tokenizer::new(Vocabulary::from_json_file(path)?)
            }
            None => Tokenizer::default_vocab(),
        };
        debug!(size = tokenizer.vocab().len(), "Vocabulary ready");

        let mut stdout = std::io::stdout().lock();

        use Commands::*;
        match self {
            Encode { text, format } => {
                let text = match text {
                    Some(text) => text,
                    None => {
                        debug!("No text specified, reading from stdin");
                        let mut text = String::new();
                        std::io::stdin()
                            .read_to_string(&mut text)
                            .context("Failed to read text from stdin")?;
                        text
                    }
                };

                let encoded = tokenizer.encode(&text);
                print_encoded(&mut stdout, &text, &encoded, format)?;
            }
            Decode { ids } => {
                // Separate arguments are treated like separate entries in one list, so the ids
                // can be given with or without quoting
                let ids = parse_token_ids(&ids.join(","));
                debug!(count = ids.len(), "Decoding token ids");

                writeln!(stdout, "{}", tokenizer.decode(&ids))?;
            }
            Vocab => {
                for (id, token) in tokenizer.vocab().tokens() {
                    writeln!(stdout, "{id}\t{}", visible(token))?;
                }
            }
        }

        Ok(())
    }
}

fn print_encoded(
    out: &mut impl Write,
    text: &str,
    encoded: &Encoded<'_>,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match format {
        OutputFormat::Text => {
            for (token, id) in encoded.iter() {
                writeln!(out, "\"{}\" -> {id}", visible(token))?;
            }
            writeln!(out)?;
            writeln!(out, "Token IDs: {}", format_token_ids(&encoded.ids))?;
            writeln!(
                out,
                "{} characters, {} tokens",
                text.chars().count(),
                encoded.len()
            )?;
        }
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, encoded)?;
            writeln!(out)?;
        }
        OutputFormat::Ids => {
            writeln!(out, "{}", format_token_ids(&encoded.ids))?;
        }
    }

    Ok(())
}

/// Render a token so that whitespace tokens are visible on a terminal.
fn visible(token: &str) -> &str {
    match token {
        " " => "␣",
        "\n" => "↵",
        "\t" => "⇥",
        token => token,
    }
}

fn main() {
    let cli = Cli::parse();
    let default_log_directive = match cli.globals.debug {
        0 => LevelFilter::WARN,
        1 => LevelFilter::INFO,
        2 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    };

    // Log events go to stderr as JSON so they never mix with the tokenizer output on stdout
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::builder()
                .with_default_directive(default_log_directive.into())
                .from_env_lossy(),
        )
        .json()
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    if let Err(e) = cli.command.execute(&cli.globals) {
        error!("{:#}", e);
        exit(1);
    } else {
        debug!("command executed successfully");
    }
}
