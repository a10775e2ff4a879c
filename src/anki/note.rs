use sha1::{
    Digest,
    Sha1,
};

use super::clock::Stamp;
use crate::core::WordpackError;

pub const FIELD_SEPARATOR: char = '\x1f';

/// A row of the `notes` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Note {
    pub id: i64,
    pub guid: String,
    pub model_id: i64,
    pub modified: i64,
    pub update_seq: i64,
    pub tags: String,
    pub fields: String,
    pub sort_field: String,
    pub checksum: u32,
    pub flags: i64,
    pub data: String,
}

/// First 8 hex digits of the SHA-1 of the field, read as an integer.
/// Anki uses it for duplicate detection.
pub fn field_checksum(front: &str) -> u32 {
    let digest = hex::encode(Sha1::digest(front.as_bytes()));
    // 8 hex digits always fit in a u32
    u32::from_str_radix(&digest[..8], 16).unwrap_or_default()
}

fn check_field(field: &'static str, text: &str) -> Result<(), WordpackError> {
    if text.contains(FIELD_SEPARATOR) {
        return Err(WordpackError::SeparatorInField { field, text: text.to_string() });
    }
    Ok(())
}

pub fn make_note(
    model_id: i64,
    guid: String,
    front: &str,
    back: &str,
    created_at: Stamp,
) -> Result<Note, WordpackError> {
    check_field("front", front)?;
    check_field("back", back)?;

    Ok(Note {
        id: created_at.millis,
        guid,
        model_id,
        modified: created_at.secs,
        update_seq: -1,
        tags: String::new(),
        fields: format!("{}{}{}", front, FIELD_SEPARATOR, back),
        sort_field: front.to_string(),
        checksum: field_checksum(front),
        flags: 0,
        data: "0".to_string(),
    })
}

impl Note {
    pub fn field_values(&self) -> Vec<&str> {
        self.fields.split(FIELD_SEPARATOR).collect()
    }
}
