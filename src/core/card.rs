//! Card records

use crate::core::{Named, SetId};
use crate::artwork::ImageCache;
use serde::Serialize;
use smallvec::SmallVec;

/// Display row used by table layouts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TableRow {
    Land,
    Other,
    InstantSorcery,
    Creature,
}

impl TableRow {
    /// Classify a main card type ("Land", "Creature", ...)
    pub fn for_main_type(main_type: &str) -> Self {
        match main_type {
            "Land" => TableRow::Land,
            "Sorcery" | "Instant" => TableRow::InstantSorcery,
            "Creature" => TableRow::Creature,
            _ => TableRow::Other,
        }
    }

    pub fn as_u8(self) -> u8 {
        match self {
            TableRow::Land => 0,
            TableRow::Other => 1,
            TableRow::InstantSorcery => 2,
            TableRow::Creature => 3,
        }
    }

    pub fn from_u8(row: u8) -> Option<Self> {
        match row {
            0 => Some(TableRow::Land),
            1 => Some(TableRow::Other),
            2 => Some(TableRow::InstantSorcery),
            3 => Some(TableRow::Creature),
            _ => None,
        }
    }
}

/// Reduce a full type line to its main type
///
/// "Legendary Artifact Creature - Golem" -> "Creature"
/// "Instant // Instant" -> "Instant"
pub fn main_card_type(card_type: &str) -> String {
    let mut result = card_type;
    // Subtypes, after an ASCII or em dash
    if let Some(pos) = result.find(['-', '\u{2014}']) {
        result = &result[..pos];
    }
    // Second face of split cards
    if let Some(pos) = result.find("//") {
        result = &result[..pos];
    }
    result
        .split_whitespace()
        .last()
        .unwrap_or_default()
        .to_string()
}

/// Card name as used in image file names
///
/// "Fire // Ice" -> "FireIce", "Circle of Protection: Red" -> "Circle of Protection Red"
pub fn corrected_name(name: &str) -> String {
    name.replace(" // ", "").replace(':', "")
}

/// Card metadata plus its image cache
///
/// A record with an empty name is the "no card" sentinel (the card back).
#[derive(Debug, Clone, Default, Serialize)]
pub struct CardRecord {
    name: String,
    pub mana_cost: String,
    pub card_type: String,
    pub power_toughness: String,
    pub text: String,
    pub table_row: u8,
    /// Sets this card is printed in, in the order they were added
    #[serde(skip)]
    sets: SmallVec<[SetId; 2]>,
    #[serde(skip)]
    pub(crate) image: ImageCache,
}

impl CardRecord {
    pub fn new(name: impl Into<String>) -> Self {
        CardRecord {
            name: name.into(),
            ..Default::default()
        }
    }

    /// The "no card" sentinel
    pub fn no_card() -> Self {
        Self::default()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_no_card(&self) -> bool {
        self.name.is_empty()
    }

    pub fn main_card_type(&self) -> String {
        main_card_type(&self.card_type)
    }

    pub fn corrected_name(&self) -> String {
        corrected_name(&self.name)
    }

    pub fn table_row_kind(&self) -> Option<TableRow> {
        TableRow::from_u8(self.table_row)
    }

    pub fn sets(&self) -> &[SetId] {
        &self.sets
    }

    pub fn image_cache(&self) -> &ImageCache {
        &self.image
    }

    /// Record membership in `set`. Returns false if already a member.
    pub(crate) fn add_set(&mut self, set: SetId) -> bool {
        if self.sets.contains(&set) {
            return false;
        }
        self.sets.push(set);
        true
    }

    /// Release the full image and every scaled variant
    pub fn clear_image_cache(&mut self) {
        self.image.clear();
    }
}

impl Named for CardRecord {
    fn key(&self) -> &str {
        &self.name
    }
}
