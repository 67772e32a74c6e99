//! Card sets (editions)

use crate::core::{CardId, Named};
use crate::settings::{sort_key_path, SettingsStore};
use crate::Result;

/// A named set of cards
///
/// The sort key lives in the settings store, not in the card database file.
/// It decides which printing's artwork is preferred when a card appears in
/// several sets (lower keys win).
#[derive(Debug, Clone)]
pub struct SetRecord {
    short_name: String,
    pub long_name: String,
    sort_key: u32,
    /// Member cards, in the order they were added
    cards: Vec<CardId>,
}

impl SetRecord {
    /// Create a set, reading its sort key from `settings`
    pub fn new(
        short_name: impl Into<String>,
        long_name: impl Into<String>,
        settings: &dyn SettingsStore,
    ) -> Self {
        let mut set = SetRecord {
            short_name: short_name.into(),
            long_name: long_name.into(),
            sort_key: 0,
            cards: Vec::new(),
        };
        set.refresh_sort_key(settings);
        set
    }

    pub fn short_name(&self) -> &str {
        &self.short_name
    }

    pub fn long_name(&self) -> &str {
        &self.long_name
    }

    pub fn sort_key(&self) -> u32 {
        self.sort_key
    }

    pub fn cards(&self) -> &[CardId] {
        &self.cards
    }

    /// Set the sort key and persist it under `sets/<short>/sortkey`
    pub fn set_sort_key(&mut self, sort_key: u32, settings: &mut dyn SettingsStore) -> Result<()> {
        self.sort_key = sort_key;
        settings.set_value(&sort_key_path(&self.short_name), sort_key.to_string())
    }

    /// Re-read the sort key from settings, 0 when absent
    pub fn refresh_sort_key(&mut self, settings: &dyn SettingsStore) {
        self.sort_key = settings.get_u32(&sort_key_path(&self.short_name), 0);
    }

    /// Record `card` as a member. Returns false if it already was one.
    pub(crate) fn add_card(&mut self, card: CardId) -> bool {
        if self.cards.contains(&card) {
            return false;
        }
        self.cards.push(card);
        true
    }
}

impl Named for SetRecord {
    fn key(&self) -> &str {
        &self.short_name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::RecordId;
    use crate::settings::MemorySettings;

    #[test]
    fn test_sort_key_defaults_to_zero() {
        let settings = MemorySettings::new();
        let set = SetRecord::new("LEA", "Limited Edition Alpha", &settings);
        assert_eq!(set.short_name(), "LEA");
        assert_eq!(set.long_name(), "Limited Edition Alpha");
        assert_eq!(set.sort_key(), 0);
    }

    #[test]
    fn test_sort_key_read_on_creation() {
        let settings = MemorySettings::new().with("sets/ARN/sortkey", "5");
        let set = SetRecord::new("ARN", "Arabian Nights", &settings);
        assert_eq!(set.sort_key(), 5);
    }

    #[test]
    fn test_set_sort_key_writes_through() {
        let mut settings = MemorySettings::new();
        let mut set = SetRecord::new("LEB", "", &settings);
        set.set_sort_key(9, &mut settings).unwrap();

        assert_eq!(set.sort_key(), 9);
        assert_eq!(settings.get_u32("sets/LEB/sortkey", 0), 9);

        // A second record for the same short name sees the persisted key
        let other = SetRecord::new("LEB", "", &settings);
        assert_eq!(other.sort_key(), 9);
    }

    #[test]
    fn test_add_card_ignores_repeats() {
        let settings = MemorySettings::new();
        let mut set = SetRecord::new("LEA", "", &settings);
        let card = CardId::from_index(3);
        assert!(set.add_card(card));
        assert!(!set.add_card(card));
        assert_eq!(set.cards(), &[card]);
    }
}
