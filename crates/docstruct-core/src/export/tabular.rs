//! Spreadsheet and CSV rendering of display rows.

use rust_xlsxwriter::{Format, FormatAlign, Workbook};

use super::HEADERS;
use crate::error::ExportError;
use crate::models::config::ExportConfig;
use crate::models::record::{DisplayRow, FieldValue};

const NUMBER_COLUMN_WIDTH: f64 = 6.0;
const KEY_COLUMN_WIDTH: f64 = 40.0;
const VALUE_COLUMN_WIDTH: f64 = 30.0;

/// Render rows as an xlsx workbook with a single worksheet.
///
/// Numeric values become numeric cells; empty values leave the cell blank.
pub fn render_xlsx(rows: &[DisplayRow], config: &ExportConfig) -> Result<Vec<u8>, ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&config.sheet_name)?;

    let header_format = Format::new().set_bold().set_align(FormatAlign::Center);
    let wrap_format = Format::new().set_text_wrap().set_align(FormatAlign::Top);
    let top_format = Format::new().set_align(FormatAlign::Top);

    for (col, header) in HEADERS.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    worksheet.set_column_width(0, NUMBER_COLUMN_WIDTH)?;
    worksheet.set_column_width(1, KEY_COLUMN_WIDTH)?;
    worksheet.set_column_width(2, VALUE_COLUMN_WIDTH)?;
    worksheet.set_column_width(3, config.comment_column_width)?;

    for (i, row) in rows.iter().enumerate() {
        let r = (i + 1) as u32;
        worksheet.write_number_with_format(r, 0, row.sequence_number() as f64, &top_format)?;
        worksheet.write_string_with_format(r, 1, row.label(), &top_format)?;

        match row.value() {
            FieldValue::Integer(n) => {
                worksheet.write_number_with_format(r, 2, *n as f64, &top_format)?;
            }
            FieldValue::Number(n) => {
                worksheet.write_number_with_format(r, 2, *n, &top_format)?;
            }
            value if value.is_empty() => {}
            FieldValue::Text(s) => {
                worksheet.write_string_with_format(r, 2, s, &top_format)?;
            }
        }

        if !row.comment().is_empty() {
            worksheet.write_string_with_format(r, 3, row.comment(), &wrap_format)?;
        }
    }

    if config.freeze_header {
        worksheet.set_freeze_panes(1, 0)?;
    }

    Ok(workbook.save_to_buffer()?)
}

/// Render rows as CSV with the same four columns.
pub fn render_csv(rows: &[DisplayRow]) -> Result<Vec<u8>, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(HEADERS)?;

    for row in rows {
        writer.write_record([
            row.sequence_number().to_string(),
            row.label().to_string(),
            row.value().to_string(),
            row.comment().to_string(),
        ])?;
    }

    writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rows() -> Vec<DisplayRow> {
        vec![
            DisplayRow::new(1, "First Name", FieldValue::text("Alice"), ""),
            DisplayRow::new(2, "12th Board Score", FieldValue::Number(0.925), "Scored 92.5%, in \"boards\""),
            DisplayRow::new(3, "Technical Proficiency", FieldValue::empty(), "Rust, SQL"),
        ]
    }

    #[test]
    fn test_csv_rendering() {
        let bytes = render_csv(&rows()).unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(
            text,
            "#,Key,Value,Comments\n\
             1,First Name,Alice,\n\
             2,12th Board Score,0.925,\"Scored 92.5%, in \"\"boards\"\"\"\n\
             3,Technical Proficiency,,\"Rust, SQL\"\n"
        );
    }

    #[test]
    fn test_xlsx_is_a_zip_container() {
        let bytes = render_xlsx(&rows(), &ExportConfig::default()).unwrap();
        assert!(bytes.starts_with(b"PK"));
    }

    #[test]
    fn test_invalid_sheet_name_is_an_error() {
        let config = ExportConfig {
            sheet_name: "bad/name".to_string(),
            ..ExportConfig::default()
        };
        assert!(matches!(render_xlsx(&rows(), &config), Err(ExportError::Xlsx(_))));
    }
}
