/*!
 * Text encodings and decode-error policies used when reading source files
 * and writing the export artifact
 */

use clap::ValueEnum;
use strum::{Display, EnumIter, EnumString};

use crate::error::{Result, ScribeError};

/// Supported text encodings
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum,
)]
#[strum(ascii_case_insensitive)]
pub enum TextEncoding {
    #[default]
    #[strum(to_string = "utf-8", serialize = "utf8")]
    #[value(name = "utf-8", alias = "utf8")]
    Utf8,

    #[strum(to_string = "ascii", serialize = "us-ascii")]
    #[value(name = "ascii", alias = "us-ascii")]
    Ascii,

    #[strum(to_string = "latin-1", serialize = "latin1", serialize = "iso-8859-1")]
    #[value(name = "latin-1", alias = "latin1", alias = "iso-8859-1")]
    Latin1,
}

/// How bytes or characters that do not fit the encoding are handled
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter, ValueEnum,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DecodePolicy {
    /// Fail the file on the first bad sequence
    Strict,
    /// Substitute U+FFFD when decoding and `?` when encoding
    Replace,
    /// Drop the offending bytes or characters
    #[default]
    Ignore,
}

impl TextEncoding {
    /// Decode raw file bytes into text under the given policy
    pub fn decode(self, bytes: &[u8], policy: DecodePolicy) -> Result<String> {
        match self {
            TextEncoding::Utf8 => decode_utf8(bytes, policy),
            TextEncoding::Ascii => decode_single_byte(bytes, policy, 0x7f, "ascii"),
            // Every byte is a valid latin-1 code point
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    /// Encode text into bytes under the given policy
    pub fn encode(self, text: &str, policy: DecodePolicy) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => encode_single_byte(text, policy, 0x7f, "ascii"),
            TextEncoding::Latin1 => encode_single_byte(text, policy, 0xff, "latin-1"),
        }
    }
}

fn decode_utf8(bytes: &[u8], policy: DecodePolicy) -> Result<String> {
    let mut text = String::with_capacity(bytes.len());
    let mut offset = 0;

    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
        offset += chunk.valid().len();

        let invalid = chunk.invalid();
        if invalid.is_empty() {
            continue;
        }
        match policy {
            DecodePolicy::Strict => {
                return Err(ScribeError::Encoding(format!(
                    "'utf-8' codec can't decode byte 0x{:02x} in position {}: invalid utf-8 sequence",
                    invalid[0], offset
                )))
            }
            DecodePolicy::Replace => text.push(char::REPLACEMENT_CHARACTER),
            DecodePolicy::Ignore => {}
        }
        offset += invalid.len();
    }

    Ok(text)
}

fn decode_single_byte(bytes: &[u8], policy: DecodePolicy, max: u8, name: &str) -> Result<String> {
    let mut text = String::with_capacity(bytes.len());
    for (position, &byte) in bytes.iter().enumerate() {
        if byte <= max {
            text.push(char::from(byte));
            continue;
        }
        match policy {
            DecodePolicy::Strict => {
                return Err(ScribeError::Encoding(format!(
                    "'{}' codec can't decode byte 0x{:02x} in position {}: ordinal not in range",
                    name, byte, position
                )))
            }
            DecodePolicy::Replace => text.push(char::REPLACEMENT_CHARACTER),
            DecodePolicy::Ignore => {}
        }
    }
    Ok(text)
}

fn encode_single_byte(text: &str, policy: DecodePolicy, max: u32, name: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::with_capacity(text.len());
    for (position, ch) in text.chars().enumerate() {
        let code = u32::from(ch);
        if code <= max {
            bytes.push(code as u8);
            continue;
        }
        match policy {
            DecodePolicy::Strict => {
                return Err(ScribeError::Encoding(format!(
                    "'{}' codec can't encode character {:?} in position {}: ordinal not in range",
                    name, ch, position
                )))
            }
            DecodePolicy::Replace => bytes.push(b'?'),
            DecodePolicy::Ignore => {}
        }
    }
    Ok(bytes)
}

/// Normalize `\r\n` and lone `\r` line endings to `\n`
pub fn normalize_newlines(text: &str) -> String {
    if !text.contains('\r') {
        return text.to_string();
    }
    text.replace("\r\n", "\n").replace('\r', "\n")
}
