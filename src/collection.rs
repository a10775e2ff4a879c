use std::{
    collections::{
        HashMap,
        HashSet,
    },
    path::Path,
};

use chrono::Utc;
use rusqlite::{
    params,
    Connection,
    OptionalExtension,
};
use serde::Deserialize;
use tracing::{
    debug,
    info,
};

use crate::{
    anki::{
        Deck,
        ImportBatch,
        Model,
        Template,
    },
    core::WordpackError,
};

const INSERT_NOTE: &str = "INSERT INTO notes VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)";
const INSERT_CARD: &str = "INSERT INTO cards VALUES \
     (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18)";

/// A `col.decks` entry. Filtered decks (`dyn`) only borrow cards from their
/// home deck, so they are never import targets.
#[derive(Deserialize)]
struct StoredDeck {
    id: i64,
    name: String,
    #[serde(default, rename = "dyn")]
    filtered: serde_json::Value,
}

impl StoredDeck {
    fn is_filtered(&self) -> bool {
        match &self.filtered {
            serde_json::Value::Bool(flag) => *flag,
            serde_json::Value::Number(n) => n.as_i64().is_some_and(|n| n != 0),
            _ => false,
        }
    }
}

/// The SQLite database inside an Anki package.
pub struct Collection {
    conn: Connection,
}

impl Collection {
    pub fn open(path: &Path) -> Result<Self, WordpackError> {
        let conn = Connection::open(path)?;
        debug!("Opened collection {}", path.display());
        Ok(Self { conn })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn has_table(&self, name: &str) -> Result<bool, WordpackError> {
        let found = self
            .conn
            .query_row(
                "SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = ?1",
                [name],
                |_| Ok(()),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// JSON blobs of one `col` column. Empty and `{}` blobs are dropped.
    fn col_json(&self, column: &str) -> Result<Vec<String>, WordpackError> {
        if !self.has_table("col")? {
            return Ok(Vec::new());
        }
        let mut stmt = self.conn.prepare(&format!("SELECT {} FROM col", column))?;
        let blobs = stmt
            .query_map([], |row| row.get::<_, Option<String>>(0))?
            .collect::<Result<Vec<_>, _>>()?;

        Ok(blobs
            .into_iter()
            .flatten()
            .filter(|blob| {
                let blob = blob.trim();
                !blob.is_empty() && blob != "{}"
            })
            .collect())
    }

    pub fn models(&self) -> Result<Vec<Model>, WordpackError> {
        let mut models = Vec::new();
        for blob in self.col_json("models")? {
            let by_id: HashMap<String, Model> = serde_json::from_str(&blob)?;
            models.extend(by_id.into_values());
        }

        if models.is_empty() && self.has_table("notetypes")? {
            models = self.models_from_tables()?;
        }

        for model in &mut models {
            model.templates.sort_by_key(|t| t.ord);
        }
        models.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(models)
    }

    fn models_from_tables(&self) -> Result<Vec<Model>, WordpackError> {
        let mut stmt = self.conn.prepare("SELECT id, name FROM notetypes")?;
        let mut models = stmt
            .query_map([], |row| {
                Ok(Model { id: row.get(0)?, name: row.get(1)?, templates: Vec::new() })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        if self.has_table("templates")? {
            let mut stmt = self.conn.prepare("SELECT ntid, ord, name FROM templates")?;
            let rows = stmt
                .query_map([], |row| {
                    Ok((row.get::<_, i64>(0)?, row.get::<_, u32>(1)?, row.get::<_, String>(2)?))
                })?
                .collect::<Result<Vec<_>, _>>()?;

            for (model_id, ord, name) in rows {
                if let Some(model) = models.iter_mut().find(|m| m.id == model_id) {
                    model.templates.push(Template { name, ord });
                }
            }
        }
        Ok(models)
    }

    pub fn decks(&self) -> Result<Vec<Deck>, WordpackError> {
        let mut decks = Vec::new();
        for blob in self.col_json("decks")? {
            let by_id: HashMap<String, StoredDeck> = serde_json::from_str(&blob)?;
            for stored in by_id.into_values() {
                if stored.is_filtered() {
                    debug!("Skipping filtered deck '{}' ({})", stored.name, stored.id);
                    continue;
                }
                decks.push(Deck { id: stored.id, name: stored.name });
            }
        }

        if decks.is_empty() && self.has_table("decks")? {
            let mut stmt = self.conn.prepare("SELECT id, name FROM decks")?;
            decks = stmt
                .query_map([], |row| Ok(Deck { id: row.get(0)?, name: row.get(1)? }))?
                .collect::<Result<Vec<_>, _>>()?;
        }

        // Newer schemas separate nested deck names with 0x1f.
        for deck in &mut decks {
            deck.name = deck.name.replace('\x1f', "::");
        }
        decks.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        Ok(decks)
    }

    pub fn existing_guids(&self) -> Result<HashSet<String>, WordpackError> {
        let mut stmt = self.conn.prepare("SELECT guid FROM notes")?;
        let guids = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<HashSet<_>, _>>()?;
        Ok(guids)
    }

    /// Largest id in `notes` or `cards`, if either has rows.
    pub fn max_ids(&self) -> Result<Option<i64>, WordpackError> {
        let max: Option<i64> = self.conn.query_row(
            "SELECT MAX(id) FROM (SELECT MAX(id) AS id FROM notes UNION ALL SELECT MAX(id) FROM cards)",
            [],
            |row| row.get(0),
        )?;
        Ok(max)
    }

    pub fn note_count(&self) -> Result<usize, WordpackError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM notes", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn card_count(&self) -> Result<usize, WordpackError> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM cards", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// Writes every note, then every card, in a single transaction.
    pub fn insert_batch(&mut self, batch: &ImportBatch) -> Result<(), WordpackError> {
        let has_col = self.has_table("col")?;
        let tx = self.conn.transaction()?;
        {
            let mut insert_note = tx.prepare(INSERT_NOTE)?;
            for note in &batch.notes {
                insert_note.execute(params![
                    note.id,
                    note.guid,
                    note.model_id,
                    note.modified,
                    note.update_seq,
                    note.tags,
                    note.fields,
                    note.sort_field,
                    note.checksum,
                    note.flags,
                    note.data,
                ])?;
            }

            let mut insert_card = tx.prepare(INSERT_CARD)?;
            for card in &batch.cards {
                insert_card.execute(params![
                    card.id,
                    card.note_id,
                    card.deck_id,
                    card.ordinal,
                    card.modified,
                    card.update_seq,
                    card.card_type,
                    card.queue,
                    card.due,
                    card.interval,
                    card.ease_factor,
                    card.repetitions,
                    card.lapses,
                    card.left,
                    card.original_due,
                    card.original_deck_id,
                    card.flags,
                    card.data,
                ])?;
            }

            if has_col {
                tx.execute("UPDATE col SET mod = ?1", [Utc::now().timestamp_millis()])?;
            }
        }
        tx.commit()?;

        info!("Inserted {} notes and {} cards", batch.notes.len(), batch.cards.len());
        Ok(())
    }
}
