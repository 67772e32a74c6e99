//! Oracle text import
//!
//! One card per group of consecutive lines:
//!
//! ```text
//! Grizzly Bears
//! 1G
//! Creature - Bear
//! 2/2
//!
//! Forest
//! Basic Land - Forest
//! G
//! ```
//!
//! Line 2 is the mana cost, unless it mentions "land" in which case it is the
//! type line. Otherwise line 3 is the type line and line 4 the power/toughness,
//! except that a line 4 without a '/' or longer than 5 characters is the
//! first line of rules text. Remaining lines are rules text.

use crate::core::{CardRecord, SetId, TableRow};
use crate::loader::CardStore;
use crate::{CatalogError, Result};
use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// One parsed card record
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OracleRecord {
    pub name: String,
    pub mana_cost: String,
    pub card_type: String,
    pub power_toughness: String,
    pub text: String,
}

impl OracleRecord {
    fn from_lines(lines: &[&str]) -> Option<Self> {
        let (&name, rest) = lines.split_first()?;
        let mut record = OracleRecord {
            name: name.to_string(),
            ..Default::default()
        };
        let mut text: Vec<&str> = Vec::new();

        let mut rest = rest.iter().copied();
        let second = rest.next().unwrap_or_default();
        if second.to_lowercase().contains("land") {
            record.card_type = second.to_string();
        } else {
            record.mana_cost = second.to_string();
            record.card_type = rest.next().unwrap_or_default().to_string();
            if let Some(candidate) = rest.next() {
                // Vanilla and split cards have rules text where P/T would be
                if !candidate.contains('/') || candidate.chars().count() > 5 {
                    text.push(candidate);
                } else {
                    record.power_toughness = candidate.to_string();
                }
            }
        }
        text.extend(rest);
        record.text = text.join("\n");
        Some(record)
    }

    /// Table row derived from the type line
    pub fn table_row(&self) -> TableRow {
        TableRow::for_main_type(&crate::core::main_card_type(&self.card_type))
    }

    fn into_card(self) -> CardRecord {
        let table_row = self.table_row();
        let mut card = CardRecord::new(self.name);
        card.mana_cost = self.mana_cost;
        card.card_type = self.card_type;
        card.power_toughness = self.power_toughness;
        card.text = self.text;
        card.table_row = table_row.as_u8();
        card
    }
}

/// Parser for oracle text files
pub struct OracleLoader;

impl OracleLoader {
    /// Split text into records. A blank line where a name is expected ends the input.
    pub fn parse(content: &str) -> Vec<OracleRecord> {
        let mut records = Vec::new();
        let mut lines = content.lines();

        loop {
            let group: Vec<&str> = lines.by_ref().take_while(|l| !l.is_empty()).collect();
            match OracleRecord::from_lines(&group) {
                Some(record) => records.push(record),
                None => break,
            }
        }
        records
    }

    pub fn load_from_file(path: &Path) -> Result<Vec<OracleRecord>> {
        let content = fs::read_to_string(path).map_err(CatalogError::IoError)?;
        Ok(Self::parse(&content))
    }

    /// Split a `<short>_<long>.<ext>` file name into set names
    pub fn set_names_from_file_name(file_name: &str) -> Option<(String, String)> {
        let (short_name, rest) = file_name.split_once('_')?;
        let long_name = rest.split('.').next().unwrap_or_default();
        Some((short_name.to_string(), long_name.to_string()))
    }
}

impl CardStore {
    /// Add parsed records to the store and link each one to `set`
    ///
    /// Cards already in the store keep their attributes and only gain the
    /// membership. Returns the number of records consumed.
    pub fn import_parsed(&mut self, records: Vec<OracleRecord>, set: SetId) -> usize {
        let count = records.len();
        for record in records {
            let card = match self.find(&record.name) {
                Some(existing) if !existing.is_no_card() => existing,
                _ => self.insert_card(record.into_card()),
            };
            self.add_to_set(card, set);
        }
        count
    }

    /// Import oracle text into `set`
    pub fn import_records(&mut self, content: &str, set: SetId) -> usize {
        self.import_parsed(OracleLoader::parse(content), set)
    }

    /// Import an oracle file into `set`. An unreadable file imports nothing.
    pub fn import_file(&mut self, path: &Path, set: SetId) -> usize {
        match OracleLoader::load_from_file(path) {
            Ok(records) => self.import_parsed(records, set),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping unreadable oracle file");
                0
            }
        }
    }

    /// Rebuild the store from every `<short>_<long>.txt` file in `dir`
    ///
    /// Files are applied in case-insensitive name order. Returns the number
    /// of distinct cards in the store afterwards.
    pub fn import_all_from_directory(&mut self, dir: &Path) -> Result<usize> {
        self.clear();

        let mut files: Vec<(String, PathBuf)> = Vec::new();
        for entry in fs::read_dir(dir).map_err(CatalogError::IoError)? {
            let entry = entry.map_err(CatalogError::IoError)?;
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|s| s.to_str()) != Some("txt") {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|s| s.to_str()) {
                files.push((file_name.to_string(), path));
            }
        }
        files.sort_by_cached_key(|(name, _)| name.to_lowercase());

        // Parsing is independent per file; applying stays in file order
        let parsed: Vec<_> = files
            .par_iter()
            .map(|(file_name, path)| {
                let names = OracleLoader::set_names_from_file_name(file_name);
                let records = names.as_ref().map(|_| OracleLoader::load_from_file(path));
                (file_name, names, records)
            })
            .collect();

        for (file_name, names, records) in parsed {
            let Some((short_name, long_name)) = names else {
                warn!(file = %file_name, "file name is not <set>_<name>.txt, skipping");
                continue;
            };
            let records = match records {
                Some(Ok(records)) => records,
                Some(Err(e)) => {
                    warn!(file = %file_name, error = %e, "skipping unreadable oracle file");
                    continue;
                }
                None => continue,
            };

            let set = match self.find_set(&short_name) {
                Some(set) => set,
                None => self.insert_set(&short_name, &long_name),
            };
            if let Some(record) = self.set_mut(set) {
                record.long_name = long_name;
            }
            let imported = self.import_parsed(records, set);
            debug!(set = %short_name, imported, "imported oracle file");
        }

        info!(cards = self.card_count(), sets = self.set_count(), "oracle import finished");
        Ok(self.card_count())
    }
}
