//! Catalog records: sets, cards and their index types

pub mod card;
pub mod entity;
pub mod set;

pub use card::{corrected_name, main_card_type, CardRecord, TableRow};
pub use entity::{CardId, Named, NamedStore, RecordId, SetId};
pub use set::SetRecord;
