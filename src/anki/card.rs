use super::clock::Stamp;

/// Queue position given to freshly imported cards.
pub const DEFAULT_NEW_CARD_DUE: i64 = 10;

/// A row of the `cards` table.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub id: i64,
    pub note_id: i64,
    pub deck_id: i64,
    pub ordinal: i64,
    pub modified: i64,
    pub update_seq: i64,
    pub card_type: i64,
    pub queue: i64,
    pub due: i64,
    pub interval: i64,
    pub ease_factor: i64,
    pub repetitions: i64,
    pub lapses: i64,
    pub left: i64,
    pub original_due: i64,
    pub original_deck_id: i64,
    pub flags: i64,
    pub data: String,
}

pub fn make_card(note_id: i64, deck_id: i64, created_at: Stamp) -> Card {
    make_card_with_due(note_id, deck_id, created_at, DEFAULT_NEW_CARD_DUE)
}

/// A new, never studied card rendering the model's first template.
pub fn make_card_with_due(note_id: i64, deck_id: i64, created_at: Stamp, due: i64) -> Card {
    Card {
        id: created_at.millis,
        note_id,
        deck_id,
        ordinal: 0,
        modified: created_at.secs,
        update_seq: -1,
        card_type: 0,
        queue: 0,
        due,
        interval: 0,
        ease_factor: 0,
        repetitions: 0,
        lapses: 0,
        left: 0,
        original_due: 0,
        original_deck_id: 0,
        flags: 0,
        data: "{}".to_string(),
    }
}

impl Card {
    pub fn is_new(&self) -> bool {
        self.card_type == 0
            && self.queue == 0
            && self.interval == 0
            && self.ease_factor == 0
            && self.repetitions == 0
            && self.lapses == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_card() {
        let stamp = Stamp { millis: 1_700_000_000_123, secs: 1_700_000_000 };
        let card = make_card(1_700_000_000_122, 2, stamp);

        assert_eq!(card.id, 1_700_000_000_123);
        assert_eq!(card.note_id, 1_700_000_000_122);
        assert_eq!(card.deck_id, 2);
        assert_eq!(card.ordinal, 0);
        assert_eq!(card.modified, 1_700_000_000);
        assert_eq!(card.update_seq, -1);
        assert_eq!(card.due, DEFAULT_NEW_CARD_DUE);
        assert_eq!(
            (card.left, card.original_due, card.original_deck_id, card.flags),
            (0, 0, 0, 0)
        );
        assert_eq!(card.data, "{}");
        assert!(card.is_new());
    }

    #[test]
    fn test_custom_due() {
        let stamp = Stamp { millis: 5, secs: 0 };
        let card = make_card_with_due(4, 1, stamp, 1);
        assert_eq!(card.due, 1);
        assert!(card.is_new());
    }
}
