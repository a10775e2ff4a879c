use std::{
    fmt,
    fs,
    path::Path,
    str::FromStr,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::core::WordpackError;

pub const DEFAULT_DELIMITER: &str = " - ";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Encoding {
    /// Sniff a byte order mark, then the NUL pattern of BOM-less UTF-16,
    /// otherwise UTF-8.
    #[default]
    Auto,
    Utf8,
    Utf16le,
    Utf16be,
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Auto => "auto",
            Encoding::Utf8 => "utf8",
            Encoding::Utf16le => "utf16le",
            Encoding::Utf16be => "utf16be",
        };
        f.write_str(name)
    }
}

impl FromStr for Encoding {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().replace(['-', '_'], "").as_str() {
            "auto" => Ok(Encoding::Auto),
            "utf8" => Ok(Encoding::Utf8),
            "utf16" | "utf16le" => Ok(Encoding::Utf16le),
            "utf16be" => Ok(Encoding::Utf16be),
            other => Err(format!("unknown encoding '{}'", other)),
        }
    }
}

/// One wordlist line: the word and its translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    pub line: usize,
    pub front: String,
    pub back: String,
}

#[derive(Debug, Clone)]
pub struct WordlistOptions {
    pub delimiter: String,
    pub encoding: Encoding,
    pub lowercase: bool,
}

impl Default for WordlistOptions {
    fn default() -> Self {
        Self { delimiter: DEFAULT_DELIMITER.to_string(), encoding: Encoding::Auto, lowercase: true }
    }
}

fn decode_utf16(bytes: &[u8], little_endian: bool) -> Result<String, WordpackError> {
    if bytes.len() % 2 != 0 {
        return Err(WordpackError::Encoding("UTF-16 input has an odd number of bytes".to_string()));
    }
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| {
            if little_endian {
                u16::from_le_bytes([pair[0], pair[1]])
            } else {
                u16::from_be_bytes([pair[0], pair[1]])
            }
        })
        .collect();
    String::from_utf16(&units).map_err(|e| WordpackError::Encoding(e.to_string()))
}

fn decode_utf8(bytes: &[u8]) -> Result<String, WordpackError> {
    String::from_utf8(bytes.to_vec()).map_err(|e| WordpackError::Encoding(e.to_string()))
}

/// Guesses the byte order of UTF-16 input that has no byte order mark.
/// Mostly-ASCII UTF-16 has a NUL in every other byte: the high byte of each
/// unit. `None` means the input does not look like UTF-16.
fn sniff_utf16(bytes: &[u8]) -> Option<bool> {
    if bytes.is_empty() || bytes.len() % 2 != 0 {
        return None;
    }
    let units = bytes.len() / 2;
    let (mut low_nul, mut high_nul) = (0, 0);
    for pair in bytes.chunks_exact(2) {
        match (pair[0], pair[1]) {
            (0, 0) => {}
            (_, 0) => high_nul += 1,
            (0, _) => low_nul += 1,
            _ => {}
        }
    }

    if high_nul * 2 >= units && low_nul == 0 {
        Some(true)
    } else if low_nul * 2 >= units && high_nul == 0 {
        Some(false)
    } else {
        None
    }
}

pub fn decode(bytes: &[u8], encoding: Encoding) -> Result<String, WordpackError> {
    // A byte order mark wins over the configured encoding.
    let text = match bytes {
        [0xEF, 0xBB, 0xBF, rest @ ..] => decode_utf8(rest)?,
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, true)?,
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, false)?,
        _ => match encoding {
            Encoding::Auto => match sniff_utf16(bytes) {
                Some(little_endian) => decode_utf16(bytes, little_endian)?,
                None => decode_utf8(bytes)?,
            },
            Encoding::Utf8 => decode_utf8(bytes)?,
            Encoding::Utf16le => decode_utf16(bytes, true)?,
            Encoding::Utf16be => decode_utf16(bytes, false)?,
        },
    };

    // A NUL left after decoding means the encoding guess was wrong.
    if let Some(offset) = text.find('\0') {
        return Err(WordpackError::Encoding(format!(
            "NUL character at offset {}; the wordlist is probably UTF-16, try --encoding",
            offset
        )));
    }
    Ok(text)
}

pub fn parse_entries(text: &str, options: &WordlistOptions) -> Result<Vec<Entry>, WordpackError> {
    if options.delimiter.is_empty() {
        return Err(WordpackError::Custom("The delimiter must not be empty".to_string()));
    }

    text.lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty())
        .map(|(line_no, line)| {
            let line = if options.lowercase { line.to_lowercase() } else { line.to_string() };
            let segments: Vec<&str> = line.split(options.delimiter.as_str()).map(str::trim).collect();

            match segments.as_slice() {
                [front, back] if !front.is_empty() && !back.is_empty() => Ok(Entry {
                    line: line_no,
                    front: front.to_string(),
                    back: back.to_string(),
                }),
                _ => Err(WordpackError::MalformedEntry { line: line_no, entry: line.clone() }),
            }
        })
        .collect()
}

pub fn read_wordlist(path: &Path, options: &WordlistOptions) -> Result<Vec<Entry>, WordpackError> {
    let bytes = fs::read(path)?;
    let text = decode(&bytes, options.encoding)?;
    let entries = parse_entries(&text, options)?;

    if entries.is_empty() {
        return Err(WordpackError::Custom(format!(
            "No entries found in wordlist {}",
            path.display()
        )));
    }

    Ok(entries)
}
