use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WordpackError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("SQLite error: {0}")]
    Sqlite(Box<rusqlite::Error>),

    #[error("Zip error: {0}")]
    Zip(Box<zip::result::ZipError>),

    #[error("Line {line}: expected exactly a front and a back, got '{entry}'. Check the delimiter")]
    MalformedEntry { line: usize, entry: String },

    #[error("The {field} field contains the 0x1F field separator: '{text}'")]
    SeparatorInField { field: &'static str, text: String },

    #[error("Could not generate a unique guid after {attempts} attempts")]
    GuidExhausted { attempts: usize },

    #[error("No {kind} matches {choice} ({available} available)")]
    InvalidSelection { kind: &'static str, choice: String, available: usize },

    #[error("The collection has no {0} to choose from")]
    NoChoices(&'static str),

    #[error("No collection database found in {0}")]
    MissingCollection(PathBuf),

    #[error("Unsupported collection format: {0} (export with 'Support older Anki versions')")]
    UnsupportedCollection(PathBuf),

    #[error("Encoding error: {0}")]
    Encoding(String),

    #[error("Input closed before a selection was made")]
    PromptClosed,

    #[error("WordpackError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for WordpackError {
    fn from(error: std::io::Error) -> Self {
        WordpackError::Io(Box::new(error))
    }
}

impl From<rusqlite::Error> for WordpackError {
    fn from(error: rusqlite::Error) -> Self {
        WordpackError::Sqlite(Box::new(error))
    }
}

impl From<zip::result::ZipError> for WordpackError {
    fn from(error: zip::result::ZipError) -> Self {
        WordpackError::Zip(Box::new(error))
    }
}

impl From<walkdir::Error> for WordpackError {
    fn from(error: walkdir::Error) -> Self {
        WordpackError::Io(Box::new(error.into()))
    }
}
