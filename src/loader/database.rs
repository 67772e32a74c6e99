//! Card database: owns every set and card, indexed by name
//!
//! Lookups come in two flavours: `find`/`find_set` never touch the store,
//! while `resolve`/`resolve_set` create an empty record on a miss.

use crate::artwork::{render_card_back, scale_to, ImageSize};
use crate::core::{CardId, CardRecord, NamedStore, SetId, SetRecord};
use crate::settings::{
    MemorySettings, SettingsStore, DATABASE_PATH_KEY, DEFAULT_PICS_EXTENSION, PICS_EXTENSION_KEY,
    PICS_PATH_KEY,
};
use crate::{CatalogError, Result};
use image::RgbaImage;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, warn};

/// Set that cards created by a lookup miss are filed under
pub const UNKNOWN_SET: &str = "TK";

/// In-memory catalog of sets and cards
///
/// Single owner, single threaded. Records are addressed by [`SetId`] and
/// [`CardId`], which stay valid until [`CardStore::clear`].
pub struct CardStore {
    sets: NamedStore<SetId, SetRecord>,
    cards: NamedStore<CardId, CardRecord>,
    no_card: CardRecord,
    image_root: PathBuf,
    image_extension: String,
    database_path: PathBuf,
    settings: Box<dyn SettingsStore>,
}

impl CardStore {
    /// Create a store configured from `settings`
    ///
    /// Loads the configured database file, if any. A file that fails to load
    /// leaves the store empty.
    pub fn new(settings: Box<dyn SettingsStore>) -> Self {
        let mut store = Self::unloaded(settings);
        store.set_database_file_path("");
        store
    }

    /// Create a store configured from `settings` and load `database` instead
    /// of the configured database file
    ///
    /// Unlike [`CardStore::new`], a load failure is returned to the caller.
    pub fn open(settings: Box<dyn SettingsStore>, database: impl AsRef<Path>) -> Result<Self> {
        let mut store = Self::unloaded(settings);
        store.database_path = database.as_ref().to_path_buf();
        let path = store.database_path.clone();
        store.load_from_file(&path)?;
        Ok(store)
    }

    /// Paths from settings, no database loaded
    fn unloaded(settings: Box<dyn SettingsStore>) -> Self {
        let mut store = CardStore {
            sets: NamedStore::new(),
            cards: NamedStore::new(),
            no_card: CardRecord::no_card(),
            image_root: PathBuf::new(),
            image_extension: DEFAULT_PICS_EXTENSION.to_string(),
            database_path: PathBuf::new(),
            settings,
        };
        store.image_extension = store
            .settings
            .get_or(PICS_EXTENSION_KEY, DEFAULT_PICS_EXTENSION);
        store.set_image_root_path("");
        store
    }

    /// Empty store backed by in-memory settings
    pub fn in_memory() -> Self {
        Self::new(Box::new(MemorySettings::new()))
    }

    // ---- lookup ----

    /// Find a card without creating it. The empty name is the sentinel.
    pub fn find(&self, name: &str) -> Option<CardId> {
        if name.is_empty() {
            Some(CardId::NO_CARD)
        } else {
            self.cards.find(name)
        }
    }

    pub fn find_set(&self, short_name: &str) -> Option<SetId> {
        self.sets.find(short_name)
    }

    /// Get or create a card
    ///
    /// The empty name returns the sentinel. An unknown name creates an empty
    /// card filed under [`UNKNOWN_SET`], so this mutates the store.
    pub fn resolve(&mut self, name: &str) -> CardId {
        if let Some(id) = self.find(name) {
            return id;
        }
        debug!(card = name, "card not found, creating");
        let id = self.cards.insert(CardRecord::new(name));
        let unknown = self.resolve_set(UNKNOWN_SET);
        self.add_to_set(id, unknown);
        id
    }

    /// Get or create a set, with an empty long name when created
    pub fn resolve_set(&mut self, short_name: &str) -> SetId {
        if let Some(id) = self.sets.find(short_name) {
            return id;
        }
        debug!(set = short_name, "set not found, creating");
        self.insert_set(short_name, "")
    }

    pub(crate) fn insert_set(&mut self, short_name: &str, long_name: &str) -> SetId {
        let set = SetRecord::new(short_name, long_name, self.settings.as_ref());
        self.sets.insert(set)
    }

    pub(crate) fn insert_card(&mut self, card: CardRecord) -> CardId {
        self.cards.insert(card)
    }

    /// Card by id. Unknown ids and [`CardId::NO_CARD`] yield the sentinel.
    pub fn card(&self, id: CardId) -> &CardRecord {
        if id.is_no_card() {
            return &self.no_card;
        }
        self.cards.get(id).unwrap_or(&self.no_card)
    }

    /// Mutable card by id, for editing attributes. Same fallback as [`CardStore::card`].
    pub fn card_mut(&mut self, id: CardId) -> &mut CardRecord {
        if id.is_no_card() {
            return &mut self.no_card;
        }
        match self.cards.get_mut(id) {
            Some(card) => card,
            None => &mut self.no_card,
        }
    }

    pub fn card_by_name(&self, name: &str) -> Option<&CardRecord> {
        self.find(name).map(|id| self.card(id))
    }

    pub fn set(&self, id: SetId) -> Option<&SetRecord> {
        self.sets.get(id)
    }

    pub(crate) fn set_mut(&mut self, id: SetId) -> Option<&mut SetRecord> {
        self.sets.get_mut(id)
    }

    /// Snapshot of all set ids, in insertion order (not sort-key order)
    pub fn list_sets(&self) -> Vec<SetId> {
        self.sets.ids().collect()
    }

    pub fn sets(&self) -> impl Iterator<Item = (SetId, &SetRecord)> {
        self.sets.iter()
    }

    pub fn cards(&self) -> impl Iterator<Item = (CardId, &CardRecord)> {
        self.cards.iter()
    }

    pub fn card_count(&self) -> usize {
        self.cards.len()
    }

    pub fn set_count(&self) -> usize {
        self.sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty() && self.sets.is_empty()
    }

    /// Short names of a card's sets, in membership order
    pub fn set_names(&self, card: CardId) -> Vec<&str> {
        self.card(card)
            .sets()
            .iter()
            .filter_map(|&s| self.sets.get(s))
            .map(|s| s.short_name())
            .collect()
    }

    // ---- membership ----

    /// Link `card` and `set` in both directions
    ///
    /// Membership is a set: linking the same pair twice is a no-op. The
    /// sentinel and ids not in the store are never linked.
    pub fn add_to_set(&mut self, card: CardId, set: SetId) {
        if card.is_no_card() || self.cards.get(card).is_none() {
            warn!(%card, %set, "add_to_set with unknown card ignored");
            return;
        }
        let Some(set_record) = self.sets.get_mut(set) else {
            warn!(%set, "add_to_set with unknown set ignored");
            return;
        };
        set_record.add_card(card);
        if !self.card_mut(card).add_set(set) {
            debug!(%card, %set, "card already in set");
        }
    }

    /// A card's sets ordered by sort key, ties kept in membership order
    pub fn sorted_sets(&self, card: CardId) -> Vec<SetId> {
        let mut sets: Vec<SetId> = self.card(card).sets().to_vec();
        sets.sort_by_key(|&s| self.sets.get(s).map_or(0, |s| s.sort_key()));
        sets
    }

    /// Update a set's sort key and persist it to settings
    pub fn set_sort_key(&mut self, set: SetId, sort_key: u32) -> Result<()> {
        let Some(record) = self.sets.get_mut(set) else {
            return Ok(());
        };
        record.set_sort_key(sort_key, self.settings.as_mut())
    }

    /// Re-read every set's sort key from settings
    pub fn refresh_sort_keys(&mut self) {
        let settings = self.settings.as_ref();
        for set in self.sets.iter_mut() {
            set.refresh_sort_key(settings);
        }
    }

    pub fn settings(&self) -> &dyn SettingsStore {
        self.settings.as_ref()
    }

    // ---- images ----

    /// Card image stretched to `size`, cached per requested width
    ///
    /// Repeated calls for the same width return the same `Arc` until the
    /// card's cache is cleared. A named card without artwork yields
    /// [`CatalogError::ImageUnavailable`]; only the sentinel falls back to
    /// the built-in card back.
    pub fn card_image(&mut self, id: CardId, size: ImageSize) -> Result<Arc<RgbaImage>> {
        if let Some(cached) = self.card(id).image.scaled(size.width) {
            return Ok(cached);
        }
        if size.is_empty() {
            return Err(CatalogError::InvalidImageSize {
                width: size.width,
                height: size.height,
            });
        }

        let candidates = self.image_candidates(id);
        let card = self.card_mut(id);
        debug!(card = card.name(), width = size.width, height = size.height, "resolving image");

        let image = match card.image.load_full(&candidates) {
            Some(full) => scale_to(&full, size),
            None if card.is_no_card() => render_card_back(size)?,
            None => return Err(CatalogError::ImageUnavailable(card.name().to_string())),
        };

        let image = Arc::new(image);
        card.image.insert_scaled(size.width, Arc::clone(&image));
        Ok(image)
    }

    /// Files probed for a card's full-size image, in preference order
    ///
    /// `<root>/back.<ext>` for the sentinel; otherwise for every set by sort key
    /// `<root>/<set>/<name>.full.<ext>` then `<root>/<set>/<name>1.full.<ext>`.
    pub fn image_candidates(&self, id: CardId) -> Vec<PathBuf> {
        let card = self.card(id);
        let ext = &self.image_extension;
        if card.is_no_card() {
            return vec![self.image_root.join(format!("back.{ext}"))];
        }

        let name = card.corrected_name();
        self.sorted_sets(id)
            .into_iter()
            .filter_map(|s| self.sets.get(s))
            .flat_map(|set| {
                let dir = self.image_root.join(set.short_name());
                [
                    dir.join(format!("{name}.full.{ext}")),
                    dir.join(format!("{name}1.full.{ext}")),
                ]
            })
            .collect()
    }

    pub fn clear_image_cache(&mut self, id: CardId) {
        self.card_mut(id).clear_image_cache();
    }

    /// Drop cached images of every card and the sentinel; records stay
    pub fn clear_all_image_caches(&mut self) {
        for card in self.cards.iter_mut() {
            card.clear_image_cache();
        }
        self.no_card.clear_image_cache();
    }

    // ---- lifecycle and paths ----

    /// Release every set and card
    pub fn clear(&mut self) {
        self.cards.clear();
        self.sets.clear();
    }

    pub fn image_root_path(&self) -> &Path {
        &self.image_root
    }

    pub fn image_extension(&self) -> &str {
        &self.image_extension
    }

    pub fn database_file_path(&self) -> &Path {
        &self.database_path
    }

    /// Point image lookups at `path` and drop every cached image
    ///
    /// An empty path re-reads `paths/pics` from settings.
    pub fn set_image_root_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.image_root = if path.as_os_str().is_empty() {
            PathBuf::from(self.settings.get_or(PICS_PATH_KEY, ""))
        } else {
            path.to_path_buf()
        };
        self.clear_all_image_caches();
    }

    /// Change the image file extension (without the dot), dropping cached images
    pub fn set_image_extension(&mut self, extension: &str) {
        self.image_extension = extension.trim_start_matches('.').to_string();
        self.clear_all_image_caches();
    }

    /// Switch to another database file and reload from it
    ///
    /// An empty path re-reads `paths/carddatabase` from settings. Load
    /// failures are logged and leave the store empty.
    pub fn set_database_file_path(&mut self, path: impl AsRef<Path>) {
        let path = path.as_ref();
        self.database_path = if path.as_os_str().is_empty() {
            PathBuf::from(self.settings.get_or(DATABASE_PATH_KEY, ""))
        } else {
            path.to_path_buf()
        };

        if self.database_path.as_os_str().is_empty() {
            self.clear();
            return;
        }
        let db_path = self.database_path.clone();
        if let Err(e) = self.load_from_file(&db_path) {
            warn!(path = %db_path.display(), error = %e, "failed to load card database");
        }
    }
}

impl Default for CardStore {
    fn default() -> Self {
        Self::in_memory()
    }
}
