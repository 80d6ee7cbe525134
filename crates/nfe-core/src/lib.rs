//! Core library for Brazilian electronic invoice (NFe) lot extraction.
//!
//! This crate provides:
//! - A typed, namespace-aware XML tree over `quick-xml`
//! - NFe parsing into invoice headers and line items
//! - Lot/validity extraction from structured `rastro` records and free text
//! - Quantity fan-out into a flat result table
//! - XLSX export of the result table

pub mod batch;
pub mod error;
pub mod export;
pub mod invoice;
pub mod models;
pub mod xml;

pub use batch::{BatchProcessor, BatchReport, Document, DocumentOutcome, ErrorPolicy};
pub use error::{ExtractionError, NfeError, Result, XmlError};
pub use export::{DEFAULT_FILE_NAME, XLSX_MIME_TYPE, XlsxExporter};
pub use invoice::{InvoiceParser, NfeParser};
pub use models::config::NfeConfig;
pub use models::invoice::{Invoice, LineItem, LotValidity, TraceabilityRecord};
pub use models::table::{COLUMNS, OutputRow, ResultTable};

/// Process a collection of documents with the default configuration.
///
/// Documents that are not invoices are skipped; the first malformed
/// invoice aborts the whole run.
pub fn process<I>(documents: I) -> Result<ResultTable>
where
    I: IntoIterator<Item = Document>,
{
    BatchProcessor::new().process(documents)
}
