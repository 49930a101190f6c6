//! Conversion between id sequences and the comma separated form people copy and paste.
use crate::TokenInt;
use itertools::Itertools;

/// Parse a human-entered, comma separated list of token ids.
///
/// Parsing is deliberately lenient.  Each entry is trimmed, and if it starts with decimal digits
/// (optionally after a `+`) those leading digits are its value, so `"12abc"` parses as 12.  A
/// negative zero such as `"-0"` is 0.  Entries that are empty, not numeric, negative or too large
/// for a [`TokenInt`] are skipped without any error.
pub fn parse_token_ids(input: &str) -> Vec<TokenInt> {
    input.split(',').filter_map(parse_token_id).collect()
}

fn parse_token_id(entry: &str) -> Option<TokenInt> {
    let entry = entry.trim();
    let (negative, digits) = match entry.strip_prefix('-') {
        Some(digits) => (true, digits),
        None => (false, entry.strip_prefix('+').unwrap_or(entry)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    let digits = &digits[..end];

    if negative {
        // Only zero survives a minus sign
        return (!digits.is_empty() && digits.bytes().all(|b| b == b'0')).then_some(0);
    }

    digits.parse().ok()
}

/// Format token ids as a comma separated list, which [`parse_token_ids`] reads back.
pub fn format_token_ids(ids: &[TokenInt]) -> String {
    ids.iter().join(", ")
}
