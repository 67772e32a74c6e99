//! Card catalog - in-memory card metadata store with lazily cached artwork
//!
//! Cards and sets live in a [`CardStore`](loader::CardStore), populated from
//! oracle text files or an XML card database. Card images are resolved from
//! an image directory on first use and cached per requested width.

pub mod artwork;
pub mod core;
pub mod error;
pub mod loader;
pub mod logging;
pub mod settings;

pub use artwork::ImageSize;
pub use error::{CatalogError, Result};
pub use loader::CardStore;
