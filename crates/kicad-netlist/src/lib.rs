//! Reader for KiCad XML component exports (`export/components/comp`).
//!
//! Every `<comp>` record becomes a [`Component`] carrying its reference,
//! value, footprint, datasheet and the free-form `<fields>` entries. Records
//! are returned in document order.

mod component;
mod parse;

pub use component::{quote, Component};

use parse::Parser;
use roxmltree::Document;
use std::io::Read;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("XML parse error: {0}")]
    Parse(#[from] roxmltree::Error),

    #[error("XML parse error: input is not valid UTF-8 ({0})")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Component '{reference}' has no <value> element")]
    MalformedRecord { reference: String },
}

pub type Result<T> = std::result::Result<T, LoadError>;

/// Parse components from an XML string
pub fn load_str(xml: &str, tick: impl FnMut()) -> Result<Vec<Component>> {
    let doc = Document::parse(xml)?;
    Parser::new(tick).parse_document(&doc)
}

/// Parse components from any reader; the whole document is read into memory first
pub fn load_reader(mut reader: impl Read, tick: impl FnMut()) -> Result<Vec<Component>> {
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    load_bytes(bytes, tick)
}

/// Parse components from a file
pub fn load_file(path: impl AsRef<Path>, tick: impl FnMut()) -> Result<Vec<Component>> {
    let bytes = std::fs::read(path)?;
    load_bytes(bytes, tick)
}

// Invalid UTF-8 surfaces as Encoding, never as Io
fn load_bytes(bytes: Vec<u8>, tick: impl FnMut()) -> Result<Vec<Component>> {
    let xml = String::from_utf8(bytes)?;
    load_str(&xml, tick)
}
