//! Card store and its loaders
//!
//! [`CardStore`] owns the catalog; the oracle text importer and the XML
//! database codec extend it from their own modules.

pub mod database;
pub mod oracle;
pub mod xml;

pub use database::{CardStore, UNKNOWN_SET};
pub use oracle::{OracleLoader, OracleRecord};
pub use xml::{FORMAT_VERSION, ROOT_ELEMENT};
