//! Spreadsheet export of the result table.

mod xlsx;

pub use xlsx::XlsxExporter;

/// MIME type of the exported workbook.
pub const XLSX_MIME_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name used for the exported workbook.
pub const DEFAULT_FILE_NAME: &str = "notas_fiscais.xlsx";

/// Worksheet name used for the exported workbook.
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";
