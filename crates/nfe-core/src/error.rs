//! Error types for the nfe-core library.

use thiserror::Error;

/// Main error type for the nfe library.
#[derive(Error, Debug)]
pub enum NfeError {
    /// XML could not be read into a tree.
    #[error("XML error: {0}")]
    Xml(#[from] XmlError),

    /// Invoice field extraction error.
    #[error("extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    /// Spreadsheet export error.
    #[error("export error: {0}")]
    Export(#[from] rust_xlsxwriter::XlsxError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Processing finished without producing a single row.
    #[error("no valid invoices were processed")]
    EmptyResult,
}

/// Errors raised while building the XML tree.
#[derive(Error, Debug)]
pub enum XmlError {
    /// The document is not valid UTF-8.
    #[error("document is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// The markup is malformed.
    #[error("malformed XML: {0}")]
    Malformed(String),

    /// The document has no root element.
    #[error("document has no root element")]
    NoRoot,
}

/// Errors related to invoice field extraction.
#[derive(Error, Debug)]
pub enum ExtractionError {
    /// Required element is missing.
    #[error("missing required field: {0}")]
    MissingField(String),

    /// Required attribute is missing.
    #[error("missing attribute {attribute} on {element}")]
    MissingAttribute { element: String, attribute: String },

    /// A traceability record lacks one of its fields.
    #[error("traceability record missing {field}")]
    MissingTraceField { field: String },

    /// Failed to parse a value.
    #[error("failed to parse {field}: {value}")]
    Parse { field: String, value: String },
}

/// Result type for the nfe library.
pub type Result<T> = std::result::Result<T, NfeError>;
