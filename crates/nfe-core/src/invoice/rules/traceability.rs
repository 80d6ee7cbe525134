//! Lot/validity extraction from structured `rastro` records.

use crate::error::ExtractionError;
use crate::models::invoice::{LotValidity, TraceabilityRecord};
use crate::xml::Element;

/// Read every `rastro` record under a `prod` element, in document order.
///
/// A record lacking `nLote` or `dVal` fails the whole line.
pub fn read_traceability(
    prod: &Element,
    ns: &str,
) -> Result<Vec<TraceabilityRecord>, ExtractionError> {
    prod.children_named(ns, "rastro")
        .map(|rastro| {
            Ok(TraceabilityRecord {
                batch: required_text(rastro, ns, "nLote")?,
                expiry: required_text(rastro, ns, "dVal")?,
            })
        })
        .collect()
}

/// One pair per record, expiry always present.
pub fn extract_traceability(records: &[TraceabilityRecord]) -> Vec<LotValidity> {
    records.iter().map(LotValidity::from).collect()
}

fn required_text(rastro: &Element, ns: &str, field: &str) -> Result<String, ExtractionError> {
    rastro
        .child(ns, field)
        .map(|el| el.text().to_string())
        .ok_or_else(|| ExtractionError::MissingTraceField {
            field: field.to_string(),
        })
}
