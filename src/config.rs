use std::path::{
    Path,
    PathBuf,
};

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    anki::card::DEFAULT_NEW_CARD_DUE,
    core::WordpackError,
    parser::{
        Encoding,
        WordlistOptions,
        DEFAULT_DELIMITER,
    },
    persistence::{
        get_data_file_path,
        load_json_or_default,
        save_json,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";

/// Defaults for a run, kept between runs in the app data directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub delimiter: String,
    pub encoding: Encoding,
    pub lowercase: bool,
    pub new_card_due: i64,
    pub output_dir: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            delimiter: DEFAULT_DELIMITER.to_string(),
            encoding: Encoding::Auto,
            lowercase: true,
            new_card_due: DEFAULT_NEW_CARD_DUE,
            output_dir: None,
        }
    }
}

/// Per-run overrides, usually from the command line.
#[derive(Debug, Clone, Default)]
pub struct SettingsOverrides {
    pub delimiter: Option<String>,
    pub encoding: Option<Encoding>,
    pub keep_case: bool,
    pub new_card_due: Option<i64>,
}

impl Settings {
    pub fn default_path() -> PathBuf {
        get_data_file_path(SETTINGS_FILE)
    }

    pub fn load(path: &Path) -> Self {
        load_json_or_default(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), WordpackError> {
        save_json(self, path)
    }

    pub fn apply(mut self, overrides: &SettingsOverrides) -> Self {
        if let Some(delimiter) = &overrides.delimiter {
            self.delimiter = delimiter.clone();
        }
        if let Some(encoding) = overrides.encoding {
            self.encoding = encoding;
        }
        if overrides.keep_case {
            self.lowercase = false;
        }
        if let Some(due) = overrides.new_card_due {
            self.new_card_due = due;
        }
        self
    }

    pub fn wordlist_options(&self) -> WordlistOptions {
        WordlistOptions {
            delimiter: self.delimiter.clone(),
            encoding: self.encoding,
            lowercase: self.lowercase,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        fs::write(&path, r#"{ "delimiter": ";", "encoding": "utf16le" }"#).unwrap();

        let settings = Settings::load(&path);
        assert_eq!(settings.delimiter, ";");
        assert_eq!(settings.encoding, Encoding::Utf16le);
        assert!(settings.lowercase);
        assert_eq!(settings.new_card_due, DEFAULT_NEW_CARD_DUE);
    }

    #[test]
    fn test_overrides_win() {
        let overrides = SettingsOverrides {
            delimiter: Some("\t".to_string()),
            encoding: None,
            keep_case: true,
            new_card_due: Some(1),
        };
        let settings = Settings::default().apply(&overrides);
        assert_eq!(settings.delimiter, "\t");
        assert_eq!(settings.encoding, Encoding::Auto);
        assert!(!settings.lowercase);
        assert_eq!(settings.new_card_due, 1);

        let options = settings.wordlist_options();
        assert_eq!(options.delimiter, "\t");
        assert!(!options.lowercase);
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SETTINGS_FILE);
        let settings = Settings { output_dir: Some(PathBuf::from("/tmp/decks")), ..Default::default() };

        settings.save(&path).unwrap();
        assert_eq!(Settings::load(&path), settings);
    }
}
