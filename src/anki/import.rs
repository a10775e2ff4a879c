use std::collections::HashSet;

use rand::Rng;
use tracing::debug;

use super::{
    card::{
        make_card_with_due,
        Card,
        DEFAULT_NEW_CARD_DUE,
    },
    clock::{
        Clock,
        IdAllocator,
    },
    guid::GuidGenerator,
    note::{
        make_note,
        Note,
        FIELD_SEPARATOR,
    },
};
use crate::{
    core::WordpackError,
    parser::Entry,
};

/// Notes and their cards, index-aligned: `cards[i]` belongs to `notes[i]`.
#[derive(Debug, Default, Clone)]
pub struct ImportBatch {
    pub notes: Vec<Note>,
    pub cards: Vec<Card>,
}

impl ImportBatch {
    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }
}

pub struct BatchImporter<C: Clock, R: Rng> {
    ids: IdAllocator<C>,
    rng: R,
    guids: GuidGenerator,
    existing_guids: HashSet<String>,
    new_card_due: i64,
}

impl<C: Clock, R: Rng> BatchImporter<C, R> {
    pub fn new(ids: IdAllocator<C>, rng: R, existing_guids: HashSet<String>) -> Self {
        Self {
            ids,
            rng,
            guids: GuidGenerator::default(),
            existing_guids,
            new_card_due: DEFAULT_NEW_CARD_DUE,
        }
    }

    pub fn with_new_card_due(mut self, due: i64) -> Self {
        self.new_card_due = due;
        self
    }

    pub fn with_guid_generator(mut self, guids: GuidGenerator) -> Self {
        self.guids = guids;
        self
    }

    pub fn existing_guids(&self) -> &HashSet<String> {
        &self.existing_guids
    }

    fn validate(entries: &[Entry]) -> Result<(), WordpackError> {
        for entry in entries {
            if entry.front.contains(FIELD_SEPARATOR) {
                return Err(WordpackError::SeparatorInField {
                    field: "front",
                    text: entry.front.clone(),
                });
            }
            if entry.back.contains(FIELD_SEPARATOR) {
                return Err(WordpackError::SeparatorInField {
                    field: "back",
                    text: entry.back.clone(),
                });
            }
        }
        Ok(())
    }

    /// Builds one note and one card per entry, in input order.
    /// On error nothing is kept and the known guid set is unchanged.
    pub fn import(
        &mut self,
        entries: &[Entry],
        model_id: i64,
        deck_id: i64,
    ) -> Result<ImportBatch, WordpackError> {
        Self::validate(entries)?;

        let mut taken = self.existing_guids.clone();
        let mut batch = ImportBatch {
            notes: Vec::with_capacity(entries.len()),
            cards: Vec::with_capacity(entries.len()),
        };

        for entry in entries {
            let guid = self.guids.generate(&taken, &mut self.rng)?;
            taken.insert(guid.clone());

            // note stamp first so note.id < card.id
            let note =
                make_note(model_id, guid, &entry.front, &entry.back, self.ids.next_stamp())?;
            let card =
                make_card_with_due(note.id, deck_id, self.ids.next_stamp(), self.new_card_due);
            debug!("Built note {} ({}) with card {}", note.id, note.guid, card.id);

            batch.notes.push(note);
            batch.cards.push(card);
        }

        self.existing_guids = taken;
        Ok(batch)
    }
}
