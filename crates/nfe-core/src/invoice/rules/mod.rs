//! Rule-based lot/validity extractors.

pub mod lots;
pub mod patterns;
pub mod quantity;
pub mod traceability;

pub use lots::{extract_free_text, extract_labeled_lots, extract_serial_lots};
pub use quantity::parse_quantity;
pub use traceability::{extract_traceability, read_traceability};

use crate::models::invoice::LotValidity;

/// Pair batches with dates by position.
///
/// Surplus batches get no expiry; surplus dates are dropped.
pub fn pair_by_position(batches: Vec<String>, dates: Vec<String>) -> Vec<LotValidity> {
    let mut dates = dates.into_iter();
    batches
        .into_iter()
        .map(|batch| LotValidity::new(batch, dates.next()))
        .collect()
}
