//! The flat result table produced from processed invoices.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::invoice::{Invoice, LineItem};

/// Header labels of the result table, in column order.
pub const COLUMNS: [&str; 9] = [
    "NÚMERO DA NOTA FISCAL",
    "SÉRIE DA NOTA FISCAL",
    "NATUREZA DE OPERAÇÃO",
    "CHAVE DA NOTA FISCAL",
    "FORNECEDOR",
    "PRODUTO",
    "LOTE",
    "QUANTIDADE",
    "VALIDADE",
];

/// One row of the result table: a line item paired with one batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputRow {
    pub invoice_number: String,
    pub series: String,
    pub operation_nature: String,
    pub invoice_key: String,
    pub issuer: String,
    pub product: String,
    pub batch: Option<String>,
    pub quantity: i64,
    pub expiry: Option<String>,
}

impl OutputRow {
    fn new(invoice: &Invoice, item: &LineItem, batch: Option<String>, quantity: i64, expiry: Option<String>) -> Self {
        Self {
            invoice_number: invoice.number.clone(),
            series: invoice.series.clone(),
            operation_nature: invoice.operation_nature.clone(),
            invoice_key: invoice.key.clone(),
            issuer: invoice.issuer.clone(),
            product: item.product.clone(),
            batch,
            quantity,
            expiry,
        }
    }

    /// Cell values in column order; absent values are empty strings.
    pub fn to_record(&self) -> [String; 9] {
        [
            self.invoice_number.clone(),
            self.series.clone(),
            self.operation_nature.clone(),
            self.invoice_key.clone(),
            self.issuer.clone(),
            self.product.clone(),
            self.batch.clone().unwrap_or_default(),
            self.quantity.to_string(),
            self.expiry.clone().unwrap_or_default(),
        ]
    }
}

/// Split a line's quantity across its batches.
///
/// With N pairs every row gets `floor(total / N)`; the remainder is dropped.
/// Without pairs a single row carries the whole quantity.
pub fn fan_out(invoice: &Invoice, item: &LineItem) -> Vec<OutputRow> {
    let pairs = item.lot_validities();
    debug!(product = %item.product, pairs = pairs.len(), "apportioning line item");

    if pairs.is_empty() {
        return vec![OutputRow::new(invoice, item, None, item.quantity, None)];
    }

    let per_batch = item.quantity.div_euclid(pairs.len() as i64);
    pairs
        .into_iter()
        .map(|pair| OutputRow::new(invoice, item, Some(pair.batch), per_batch, pair.expiry))
        .collect()
}

/// All output rows of an invoice, in line order.
pub fn invoice_rows(invoice: &Invoice) -> Vec<OutputRow> {
    invoice
        .items
        .iter()
        .flat_map(|item| fan_out(invoice, item))
        .collect()
}

/// Ordered rows from every processed invoice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultTable {
    rows: Vec<OutputRow>,
}

impl ResultTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn headers(&self) -> &'static [&'static str; 9] {
        &COLUMNS
    }

    pub fn rows(&self) -> &[OutputRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Sum of apportioned quantities; may be below the source totals.
    pub fn total_quantity(&self) -> i64 {
        self.rows.iter().map(|r| r.quantity).sum()
    }
}

impl Extend<OutputRow> for ResultTable {
    fn extend<T: IntoIterator<Item = OutputRow>>(&mut self, iter: T) {
        self.rows.extend(iter);
    }
}
