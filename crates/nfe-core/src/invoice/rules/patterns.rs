//! Regex patterns for lot extraction from supplementary product text.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // "LOTE: ABC123"
    pub static ref LOT_LABEL: Regex = Regex::new(
        r"(?i)LOTE:\s*([A-Za-z0-9]+)"
    ).unwrap();

    // "VAL: 31/12/2025" or "VAL: 12/25"
    pub static ref VALIDITY_LABEL: Regex = Regex::new(
        r"(?i)VAL:\s*(\d{2}/\d{2}/\d{4}|\d{2}/\d{2})"
    ).unwrap();

    // "No(s) de Serie: A1 Venc. 01/01/2025, B2 Venc. 02/02/2025" up to end of line
    pub static ref SERIAL_LIST: Regex = Regex::new(
        r"(?i)No\(s\) de Serie:\s*(.*)"
    ).unwrap();

    pub static ref SERIAL_SEPARATOR: Regex = Regex::new(
        r",\s*"
    ).unwrap();

    // "Venc. 01/01/2025" inside a serial token; case-sensitive
    pub static ref TOKEN_DUE_DATE: Regex = Regex::new(
        r"Venc\.\s*\d{2}/\d{2}/\d{4}"
    ).unwrap();

    // "Venc. 01/01/2025"
    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)Venc\.\s*(\d{2}/\d{2}/\d{4})"
    ).unwrap();
}
