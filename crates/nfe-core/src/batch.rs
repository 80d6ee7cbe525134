//! Batch driver: runs the parser over many documents and assembles the table.

use std::path::Path;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::error::Result;
use crate::invoice::{InvoiceParser, NfeParser};
use crate::models::config::NfeConfig;
use crate::models::table::{OutputRow, ResultTable, invoice_rows};

/// A named XML payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Display name, used for logging and reports.
    pub name: String,
    /// Raw document bytes.
    pub content: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, content: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Read a document from disk, naming it after the file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|s| s.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| path.display().to_string());
        Ok(Self { name, content })
    }
}

/// What to do when a document fails to parse.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// Fail the whole batch on the first error.
    #[default]
    Abort,
    /// Log the failure, record it, and continue with the next document.
    Skip,
}

/// Per-document result of a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentOutcome {
    /// The invoice contributed rows to the table.
    Processed { rows: usize },
    /// The document holds no invoice.
    NotInvoice,
    /// Parsing failed and the document was skipped.
    Failed { error: String },
}

/// Summary of a batch run.
#[derive(Debug, Clone)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// `(document name, outcome)` in submission order.
    pub documents: Vec<(String, DocumentOutcome)>,
}

impl BatchReport {
    pub fn processed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Processed { .. }))
    }

    pub fn not_invoices(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::NotInvoice))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, DocumentOutcome::Failed { .. }))
    }

    fn count(&self, predicate: impl Fn(&DocumentOutcome) -> bool) -> usize {
        self.documents.iter().filter(|(_, o)| predicate(o)).count()
    }
}

/// Sequential batch processor.
#[derive(Debug, Clone, Default)]
pub struct BatchProcessor {
    parser: NfeParser,
    policy: ErrorPolicy,
}

impl BatchProcessor {
    /// Create a processor with the default parser that aborts on errors.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &NfeConfig) -> Self {
        let policy = if config.batch.continue_on_error {
            ErrorPolicy::Skip
        } else {
            ErrorPolicy::Abort
        };
        Self::new()
            .with_parser(NfeParser::from_config(&config.extraction))
            .with_policy(policy)
    }

    /// Set the invoice parser.
    pub fn with_parser(mut self, parser: NfeParser) -> Self {
        self.parser = parser;
        self
    }

    /// Set the error policy.
    pub fn with_policy(mut self, policy: ErrorPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Process documents in order and return the assembled table.
    pub fn process<I>(&self, documents: I) -> Result<ResultTable>
    where
        I: IntoIterator<Item = Document>,
    {
        self.process_with_report(documents).map(|(table, _)| table)
    }

    /// Process documents in order, also reporting what happened to each.
    pub fn process_with_report<I>(&self, documents: I) -> Result<(ResultTable, BatchReport)>
    where
        I: IntoIterator<Item = Document>,
    {
        self.process_with_progress(documents, |_, _| {})
    }

    /// Like [`process_with_report`](Self::process_with_report), calling
    /// `on_document` after each document is handled.
    pub fn process_with_progress<I, F>(
        &self,
        documents: I,
        mut on_document: F,
    ) -> Result<(ResultTable, BatchReport)>
    where
        I: IntoIterator<Item = Document>,
        F: FnMut(&str, &DocumentOutcome),
    {
        let started_at = Utc::now();
        let mut table = ResultTable::new();
        let mut outcomes = Vec::new();

        for document in documents {
            let outcome = match self.process_document(&document) {
                Ok(Some(rows)) => {
                    let count = rows.len();
                    table.extend(rows);
                    DocumentOutcome::Processed { rows: count }
                }
                Ok(None) => {
                    warn!(document = %document.name, "not an NFe invoice, skipping");
                    DocumentOutcome::NotInvoice
                }
                Err(e) => match self.policy {
                    ErrorPolicy::Abort => return Err(e),
                    ErrorPolicy::Skip => {
                        warn!(document = %document.name, error = %e, "failed to process, skipping");
                        DocumentOutcome::Failed {
                            error: e.to_string(),
                        }
                    }
                },
            };

            on_document(&document.name, &outcome);
            outcomes.push((document.name, outcome));
        }

        info!(documents = outcomes.len(), rows = table.len(), "batch complete");

        let report = BatchReport {
            started_at,
            finished_at: Utc::now(),
            documents: outcomes,
        };
        Ok((table, report))
    }

    fn process_document(&self, document: &Document) -> Result<Option<Vec<OutputRow>>> {
        debug!(document = %document.name, bytes = document.content.len(), "processing document");
        let root = crate::xml::parse_bytes(&document.content)?;
        let invoice = self.parser.parse_element(&root)?;
        Ok(invoice.map(|invoice| invoice_rows(&invoice)))
    }
}
