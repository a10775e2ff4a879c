//! Turns a bilingual wordlist into notes and cards inside an Anki package.

pub mod anki;
pub mod collection;
pub mod config;
pub mod core;
pub mod package;
pub mod parser;
pub mod persistence;
pub mod prompt;

#[cfg(test)]
pub(crate) mod test_support;

pub use crate::core::{
    run_import,
    ImportReport,
    ImportRequest,
    WordpackError,
};
