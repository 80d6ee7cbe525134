//! Invoice data models for NFe documents.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::invoice::rules::{extract_free_text, extract_traceability};

/// A parsed NFe invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice number (`ide/nNF`).
    pub number: String,

    /// Invoice series (`ide/serie`).
    pub series: String,

    /// Nature of the operation (`ide/natOp`).
    pub operation_nature: String,

    /// Access key: the `Id` attribute without its `NFe` prefix.
    pub key: String,

    /// Issuer legal name (`emit/xNome`).
    pub issuer: String,

    /// Product lines (`det`) in document order.
    pub items: Vec<LineItem>,
}

/// A single product line of the invoice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    /// Product description (`prod/xProd`).
    pub product: String,

    /// Commercial quantity truncated toward zero.
    pub quantity: i64,

    /// Supplementary product text (`infAdProd`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,

    /// Structured traceability records (`prod/rastro`).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub traceability: Vec<TraceabilityRecord>,
}

impl LineItem {
    /// Lot/validity pairs for this line, structured records first.
    pub fn lot_validities(&self) -> Vec<LotValidity> {
        let mut pairs = extract_traceability(&self.traceability);
        pairs.extend(extract_free_text(self.additional_info.as_deref().unwrap_or("")));
        pairs
    }
}

/// An explicit batch/expiry record from the `rastro` group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraceabilityRecord {
    /// Batch identifier (`nLote`).
    pub batch: String,

    /// Expiry date as written in the document (`dVal`).
    pub expiry: String,
}

/// A batch identifier with its expiry, if one was found.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LotValidity {
    pub batch: String,
    pub expiry: Option<String>,
}

impl LotValidity {
    pub fn new(batch: impl Into<String>, expiry: Option<String>) -> Self {
        Self {
            batch: batch.into(),
            expiry,
        }
    }

    /// Expiry as a calendar date.
    ///
    /// Understands `DD/MM/YYYY` and the ISO `YYYY-MM-DD` used by `dVal`.
    /// Day-month expiries without a year yield `None`.
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        let expiry = self.expiry.as_deref()?.trim();
        NaiveDate::parse_from_str(expiry, "%d/%m/%Y")
            .or_else(|_| NaiveDate::parse_from_str(expiry, "%Y-%m-%d"))
            .ok()
    }
}

impl From<&TraceabilityRecord> for LotValidity {
    fn from(record: &TraceabilityRecord) -> Self {
        Self::new(record.batch.clone(), Some(record.expiry.clone()))
    }
}
