//! NFe parsing and lot/validity extraction.

mod parser;
pub mod rules;

pub use parser::NfeParser;

use crate::models::invoice::Invoice;
use crate::xml::Element;

/// Result type for invoice parsing.
pub type Result<T> = std::result::Result<T, crate::error::NfeError>;

/// Trait for invoice parsers.
pub trait InvoiceParser {
    /// Parse an already built document tree.
    ///
    /// Returns `Ok(None)` when the document holds no invoice.
    fn parse_element(&self, root: &Element) -> Result<Option<Invoice>>;

    /// Parse raw XML text.
    fn parse(&self, xml: &str) -> Result<Option<Invoice>> {
        let root = crate::xml::parse(xml)?;
        self.parse_element(&root)
    }
}
