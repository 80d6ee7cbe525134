//! XLSX writer built on `rust_xlsxwriter`.

use std::path::Path;

use rust_xlsxwriter::{Format, Workbook};
use tracing::info;

use super::DEFAULT_SHEET_NAME;
use crate::error::{NfeError, Result};
use crate::models::config::OutputConfig;
use crate::models::table::{COLUMNS, ResultTable};

const QUANTITY_COLUMN: u16 = 7;

/// Writes a [`ResultTable`] as a single-sheet workbook with a header row.
#[derive(Debug, Clone)]
pub struct XlsxExporter {
    sheet_name: String,
}

impl XlsxExporter {
    pub fn new() -> Self {
        Self {
            sheet_name: DEFAULT_SHEET_NAME.to_string(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new().with_sheet_name(&config.sheet_name)
    }

    /// Set the worksheet name.
    pub fn with_sheet_name(mut self, name: impl Into<String>) -> Self {
        self.sheet_name = name.into();
        self
    }

    /// Render the workbook in memory.
    ///
    /// An empty table is refused with [`NfeError::EmptyResult`].
    pub fn to_bytes(&self, table: &ResultTable) -> Result<Vec<u8>> {
        let mut workbook = self.build(table)?;
        Ok(workbook.save_to_buffer()?)
    }

    /// Write the workbook to `path`.
    pub fn save(&self, table: &ResultTable, path: &Path) -> Result<()> {
        let mut workbook = self.build(table)?;
        workbook.save(path)?;
        info!(path = %path.display(), rows = table.len(), "wrote workbook");
        Ok(())
    }

    fn build(&self, table: &ResultTable) -> Result<Workbook> {
        if table.is_empty() {
            return Err(NfeError::EmptyResult);
        }

        let mut workbook = Workbook::new();
        let header = Format::new().set_bold();
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(&self.sheet_name)?;

        for (col, label) in (0u16..).zip(COLUMNS) {
            worksheet.write_string_with_format(0, col, label, &header)?;
        }

        for (row, record) in (1u32..).zip(table.rows()) {
            for (col, value) in (0u16..).zip(record.to_record()) {
                if col == QUANTITY_COLUMN {
                    worksheet.write_number(row, col, record.quantity as f64)?;
                } else if !value.is_empty() {
                    worksheet.write_string(row, col, value)?;
                }
            }
        }

        worksheet.autofit();
        Ok(workbook)
    }
}

impl Default for XlsxExporter {
    fn default() -> Self {
        Self::new()
    }
}
