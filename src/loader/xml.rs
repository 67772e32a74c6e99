//! XML card database
//!
//! ```xml
//! <cockatrice_carddatabase version="1">
//!   <sets>
//!     <set><name>LEA</name><longname>Limited Edition Alpha</longname></set>
//!   </sets>
//!   <cards>
//!     <card>
//!       <name>Grizzly Bears</name>
//!       <set>LEA</set>
//!       <manacost>1G</manacost>
//!       <type>Creature - Bear</type>
//!       <pt>2/2</pt>
//!       <tablerow>3</tablerow>
//!       <text></text>
//!     </card>
//!   </cards>
//! </cockatrice_carddatabase>
//! ```

use crate::core::CardRecord;
use crate::loader::CardStore;
use crate::{CatalogError, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::fs;
use std::path::Path;
use tracing::{debug, info, warn};

/// Root element of a card database document
pub const ROOT_ELEMENT: &str = "cockatrice_carddatabase";
pub const FORMAT_VERSION: &str = "1";

#[derive(Debug, Default)]
struct PendingSet {
    short_name: String,
    long_name: String,
}

#[derive(Debug, Default)]
struct PendingCard {
    name: String,
    sets: Vec<String>,
    mana_cost: String,
    card_type: String,
    power_toughness: String,
    text: String,
    table_row: u8,
}

/// Partially read `<set>`/`<card>` elements
#[derive(Debug, Default)]
struct LoadState {
    set: Option<PendingSet>,
    card: Option<PendingCard>,
}

impl LoadState {
    fn start(&mut self, parent: Option<&str>, name: &str) {
        match (parent, name) {
            (Some("sets"), "set") => self.set = Some(PendingSet::default()),
            (Some("cards"), "card") => self.card = Some(PendingCard::default()),
            _ => {}
        }
    }

    fn end(&mut self, store: &mut CardStore, parent: Option<&str>, name: &str, text: &str) {
        match parent {
            Some("set") => {
                if let Some(set) = self.set.as_mut() {
                    match name {
                        "name" => set.short_name = text.to_string(),
                        "longname" => set.long_name = text.to_string(),
                        _ => {}
                    }
                }
            }
            Some("card") => {
                if let Some(card) = self.card.as_mut() {
                    match name {
                        "name" => card.name = text.to_string(),
                        "set" => card.sets.push(text.to_string()),
                        "manacost" => card.mana_cost = text.to_string(),
                        "type" => card.card_type = text.to_string(),
                        "pt" => card.power_toughness = text.to_string(),
                        "text" => card.text = text.to_string(),
                        "tablerow" => {
                            card.table_row = text.trim().parse().unwrap_or_else(|_| {
                                warn!(card = %card.name, value = text, "invalid table row, using 0");
                                0
                            })
                        }
                        _ => {}
                    }
                }
            }
            Some("sets") if name == "set" => {
                if let Some(set) = self.set.take() {
                    if set.short_name.is_empty() {
                        warn!("set without a name in database, skipping");
                        return;
                    }
                    let id = match store.find_set(&set.short_name) {
                        Some(id) => id,
                        None => store.insert_set(&set.short_name, &set.long_name),
                    };
                    if let Some(record) = store.set_mut(id) {
                        record.long_name = set.long_name;
                    }
                }
            }
            Some("cards") if name == "card" => {
                if let Some(pending) = self.card.take() {
                    Self::finish_card(store, pending);
                }
            }
            _ => {}
        }
    }

    fn finish_card(store: &mut CardStore, pending: PendingCard) {
        if pending.name.is_empty() {
            warn!("card without a name in database, skipping");
            return;
        }
        let id = match store.find(&pending.name) {
            Some(existing) => {
                warn!(card = %pending.name, "duplicate card in database, keeping the first");
                existing
            }
            None => {
                let mut card = CardRecord::new(pending.name.as_str());
                card.mana_cost = pending.mana_cost;
                card.card_type = pending.card_type;
                card.power_toughness = pending.power_toughness;
                card.text = pending.text;
                card.table_row = pending.table_row;
                store.insert_card(card)
            }
        };
        for short_name in &pending.sets {
            if short_name.is_empty() {
                warn!(card = %pending.name, "empty set reference in database, skipping");
                continue;
            }
            let set = store.resolve_set(short_name);
            store.add_to_set(id, set);
        }
    }
}

fn element_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| CatalogError::ParseError(format!("Invalid element name: {e}")))
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> Result<()> {
    writer
        .create_element(name)
        .write_text_content(BytesText::new(text))?;
    Ok(())
}

impl CardStore {
    /// Replace the store's contents with a database document
    ///
    /// Returns the number of cards loaded. A document whose root element is
    /// not `<cockatrice_carddatabase>` is rejected and leaves the store empty.
    pub fn load_from_str(&mut self, xml: &str) -> Result<usize> {
        self.clear();

        let mut reader = Reader::from_str(xml);
        let mut path: Vec<String> = Vec::new();
        let mut text = String::new();
        let mut state = LoadState::default();

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    let name = element_name(e.name().as_ref())?;
                    if path.is_empty() {
                        if name != ROOT_ELEMENT {
                            return Err(CatalogError::UnexpectedRoot(name));
                        }
                        if let Ok(Some(version)) = e.try_get_attribute("version") {
                            debug!(version = %String::from_utf8_lossy(&version.value), "reading card database");
                        }
                    }
                    state.start(path.last().map(String::as_str), &name);
                    path.push(name);
                    text.clear();
                }
                Event::Empty(e) => {
                    let name = element_name(e.name().as_ref())?;
                    if path.is_empty() {
                        if name != ROOT_ELEMENT {
                            return Err(CatalogError::UnexpectedRoot(name));
                        }
                        break;
                    }
                    let parent = path.last().map(String::as_str);
                    state.start(parent, &name);
                    state.end(self, parent, &name, "");
                    text.clear();
                }
                Event::Text(t) => text.push_str(&t.unescape()?),
                Event::CData(c) => {
                    let data = std::str::from_utf8(&c)
                        .map_err(|e| CatalogError::ParseError(format!("Invalid CDATA: {e}")))?;
                    text.push_str(data);
                }
                Event::End(_) => {
                    if let Some(name) = path.pop() {
                        state.end(self, path.last().map(String::as_str), &name, &text);
                    }
                    text.clear();
                }
                Event::Eof => break,
                _ => {}
            }
        }

        info!(cards = self.card_count(), sets = self.set_count(), "card database loaded");
        Ok(self.card_count())
    }

    /// Replace the store's contents with the database file at `path`
    ///
    /// The store is cleared first, so a missing or rejected file leaves it empty.
    pub fn load_from_file(&mut self, path: &Path) -> Result<usize> {
        self.clear();
        let content = fs::read_to_string(path).map_err(CatalogError::IoError)?;
        debug!(path = %path.display(), "loading card database");
        self.load_from_str(&content)
    }

    /// Serialize every set and card, in insertion order
    pub fn to_xml_string(&self) -> Result<String> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        writer.write_event(Event::Start(
            BytesStart::new(ROOT_ELEMENT).with_attributes([("version", FORMAT_VERSION)]),
        ))?;

        writer.write_event(Event::Start(BytesStart::new("sets")))?;
        for (_, set) in self.sets() {
            writer.write_event(Event::Start(BytesStart::new("set")))?;
            write_text_element(&mut writer, "name", set.short_name())?;
            write_text_element(&mut writer, "longname", set.long_name())?;
            writer.write_event(Event::End(BytesEnd::new("set")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("sets")))?;

        writer.write_event(Event::Start(BytesStart::new("cards")))?;
        for (id, card) in self.cards() {
            writer.write_event(Event::Start(BytesStart::new("card")))?;
            write_text_element(&mut writer, "name", card.name())?;
            for short_name in self.set_names(id) {
                write_text_element(&mut writer, "set", short_name)?;
            }
            write_text_element(&mut writer, "manacost", &card.mana_cost)?;
            write_text_element(&mut writer, "type", &card.card_type)?;
            if !card.power_toughness.is_empty() {
                write_text_element(&mut writer, "pt", &card.power_toughness)?;
            }
            write_text_element(&mut writer, "tablerow", &card.table_row.to_string())?;
            write_text_element(&mut writer, "text", &card.text)?;
            writer.write_event(Event::End(BytesEnd::new("card")))?;
        }
        writer.write_event(Event::End(BytesEnd::new("cards")))?;

        writer.write_event(Event::End(BytesEnd::new(ROOT_ELEMENT)))?;

        String::from_utf8(writer.into_inner())
            .map_err(|e| CatalogError::ParseError(format!("Invalid UTF-8 in output: {e}")))
    }

    /// Write the database to `path`
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        let xml = self.to_xml_string()?;
        fs::write(path, xml).map_err(CatalogError::IoError)?;
        info!(path = %path.display(), cards = self.card_count(), "card database saved");
        Ok(())
    }
}
