//! Error types for the card catalog

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Unexpected root element <{0}>, expected <cockatrice_carddatabase>")]
    UnexpectedRoot(String),

    #[error("No image available for card '{0}'")]
    ImageUnavailable(String),

    #[error("Invalid image size {width}x{height}")]
    InvalidImageSize { width: u32, height: u32 },

    #[error("Placeholder render failed: {0}")]
    Placeholder(String),

    #[error("Settings error: {0}")]
    Settings(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("XML error: {0}")]
    XmlError(#[from] quick_xml::Error),

    #[error("Image error: {0}")]
    ImageError(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, CatalogError>;
