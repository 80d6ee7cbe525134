//! Lot/validity extraction from free-text supplementary product info.
//!
//! Two independent heuristics run over the same text:
//! - labeled pairs: `LOTE: <token>` with `VAL: <date>`
//! - serial lists: `No(s) de Serie: <token>, <token>...` with `Venc. <date>`
//!
//! Each heuristic pairs its own batches and dates by position.

use tracing::trace;

use super::pair_by_position;
use super::patterns::{
    DUE_DATE, LOT_LABEL, SERIAL_LIST, SERIAL_SEPARATOR, TOKEN_DUE_DATE, VALIDITY_LABEL,
};
use crate::models::invoice::LotValidity;

/// Labeled pairs followed by serial-list pairs. No deduplication.
pub fn extract_free_text(text: &str) -> Vec<LotValidity> {
    let mut pairs = extract_labeled_lots(text);
    pairs.extend(extract_serial_lots(text));
    pairs
}

/// Pairs from `LOTE:` / `VAL:` labels.
pub fn extract_labeled_lots(text: &str) -> Vec<LotValidity> {
    let batches: Vec<String> = LOT_LABEL
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();
    let dates: Vec<String> = VALIDITY_LABEL
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    trace!(batches = batches.len(), dates = dates.len(), "labeled lots");
    pair_by_position(batches, dates)
}

/// Pairs from a `No(s) de Serie:` list and `Venc.` dates.
///
/// Only the first list is read, up to the end of its line. Dates are
/// collected from the whole text, ignoring case; the `Venc.` stripped from
/// tokens must be spelled exactly.
pub fn extract_serial_lots(text: &str) -> Vec<LotValidity> {
    let Some(caps) = SERIAL_LIST.captures(text) else {
        return Vec::new();
    };

    let batches: Vec<String> = SERIAL_SEPARATOR
        .split(&caps[1])
        .map(|token| TOKEN_DUE_DATE.replace_all(token, "").trim().to_string())
        .collect();
    let dates: Vec<String> = DUE_DATE
        .captures_iter(text)
        .map(|caps| caps[1].to_string())
        .collect();

    trace!(batches = batches.len(), dates = dates.len(), "serial lots");
    pair_by_position(batches, dates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn pair(batch: &str, expiry: Option<&str>) -> LotValidity {
        LotValidity::new(batch, expiry.map(str::to_string))
    }

    #[test]
    fn test_labeled_pairs_by_position() {
        let pairs = extract_labeled_lots("LOTE: A123 VAL: 01/05/2026 LOTE: B456");
        assert_eq!(pairs, vec![pair("A123", Some("01/05/2026")), pair("B456", None)]);
    }

    #[test]
    fn test_labeled_pairs_ignore_proximity() {
        let pairs = extract_labeled_lots("VAL: 01/01/2026 LOTE: X1 VAL: 02/02/2026 LOTE: X2");
        assert_eq!(
            pairs,
            vec![pair("X1", Some("01/01/2026")), pair("X2", Some("02/02/2026"))]
        );
    }

    #[test]
    fn test_labeled_case_insensitive_and_short_date() {
        let pairs = extract_labeled_lots("lote:abc9 val:12/27");
        assert_eq!(pairs, vec![pair("abc9", Some("12/27"))]);
    }

    #[test]
    fn test_labeled_surplus_dates_dropped() {
        let pairs = extract_labeled_lots("LOTE: L1 VAL: 01/01/2026 VAL: 02/02/2026");
        assert_eq!(pairs, vec![pair("L1", Some("01/01/2026"))]);
    }

    #[test]
    fn test_labeled_token_stops_at_punctuation() {
        let pairs = extract_labeled_lots("LOTE: AB-12 VAL: 10/10/2030");
        assert_eq!(pairs, vec![pair("AB", Some("10/10/2030"))]);
    }

    #[test]
    fn test_serial_list_strips_due_dates() {
        let pairs =
            extract_serial_lots("No(s) de Serie: ABC123 Venc. 01/01/2025, DEF456 Venc. 02/02/2025");
        assert_eq!(
            pairs,
            vec![
                pair("ABC123", Some("01/01/2025")),
                pair("DEF456", Some("02/02/2025")),
            ]
        );
    }

    #[test]
    fn test_serial_list_without_dates() {
        let pairs = extract_serial_lots("NO(S) DE SERIE: S1, S2");
        assert_eq!(pairs, vec![pair("S1", None), pair("S2", None)]);
    }

    #[test]
    fn test_serial_list_stops_at_line_end() {
        let pairs = extract_serial_lots("No(s) de Serie: S1, S2\nVenc. 03/03/2027 outro texto");
        assert_eq!(pairs, vec![pair("S1", Some("03/03/2027")), pair("S2", None)]);
    }

    #[test]
    fn test_serial_token_strip_is_case_sensitive() {
        let pairs = extract_serial_lots("No(s) de Serie: S1 venc. 01/01/2025, S2 Venc. 02/02/2025");
        assert_eq!(
            pairs,
            vec![
                pair("S1 venc. 01/01/2025", Some("01/01/2025")),
                pair("S2", Some("02/02/2025")),
            ]
        );
    }

    #[test]
    fn test_serial_absent_yields_nothing() {
        assert!(extract_serial_lots("Venc. 01/01/2025").is_empty());
    }

    #[test]
    fn test_free_text_concatenates_without_cross_pairing() {
        let text = "LOTE: A1 LOTE: A2 VAL: 05/05/2025 No(s) de Serie: S9 Venc. 09/09/2029";
        assert_eq!(
            extract_free_text(text),
            vec![
                pair("A1", Some("05/05/2025")),
                pair("A2", None),
                pair("S9", Some("09/09/2029")),
            ]
        );
    }

    #[test]
    fn test_free_text_empty_input() {
        assert!(extract_free_text("").is_empty());
    }
}
