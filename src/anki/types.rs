use std::{
    fmt,
    str::FromStr,
};

use serde::Deserialize;

use crate::core::WordpackError;

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Template {
    pub name: String,
    #[serde(default)]
    pub ord: u32,
}

/// A note type and its card templates, as stored in the collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Model {
    pub id: i64,
    pub name: String,
    #[serde(default, rename = "tmpls")]
    pub templates: Vec<Template>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Deck {
    pub id: i64,
    pub name: String,
}

pub trait Identified {
    const KIND: &'static str;
    fn id(&self) -> i64;
}

impl Identified for Model {
    const KIND: &'static str = "note type";

    fn id(&self) -> i64 {
        self.id
    }
}

impl Identified for Deck {
    const KIND: &'static str = "deck";

    fn id(&self) -> i64 {
        self.id
    }
}

/// How a model or deck is picked out of the collection's list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    Index(usize),
    Id(i64),
}

impl fmt::Display for Choice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Choice::Index(index) => write!(f, "index {}", index),
            Choice::Id(id) => write!(f, "id {}", id),
        }
    }
}

impl FromStr for Choice {
    type Err = String;

    // "3" selects by position, "id:1342697561419" by collection id
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if let Some(id) = s.strip_prefix("id:") {
            id.trim()
                .parse::<i64>()
                .map(Choice::Id)
                .map_err(|e| format!("invalid id '{}': {}", id, e))
        } else {
            s.parse::<usize>()
                .map(Choice::Index)
                .map_err(|e| format!("invalid index '{}': {}", s, e))
        }
    }
}

pub fn select<T: Identified>(items: &[T], choice: Choice) -> Result<&T, WordpackError> {
    if items.is_empty() {
        return Err(WordpackError::NoChoices(T::KIND));
    }

    let found = match choice {
        Choice::Index(index) => items.get(index),
        Choice::Id(id) => items.iter().find(|item| item.id() == id),
    };

    found.ok_or_else(|| WordpackError::InvalidSelection {
        kind: T::KIND,
        choice: choice.to_string(),
        available: items.len(),
    })
}

impl Model {
    /// `templates (model)`, or the bare model name when the model carries
    /// no templates.
    pub fn label(&self) -> String {
        if self.templates.is_empty() {
            return self.name.clone();
        }
        let templates: Vec<&str> = self.templates.iter().map(|t| t.name.as_str()).collect();
        format!("{} ({})", templates.join(", "), self.name)
    }
}
