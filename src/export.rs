//! Excel workbook export
//!
//! Every captured page becomes one worksheet with the columns `tag`, `text` and
//! `selector`; a final worksheet keeps the element type rules the session ran with.

use crate::error::Result;
use crate::locator::CapturedRecord;
use indexmap::IndexMap;
use rust_xlsxwriter::{Format, Workbook};
use std::path::{Path, PathBuf};

/// Name of the worksheet holding the element type rules
pub const CONFIG_SHEET_NAME: &str = "Config_Elements";

/// MIME type of the exported file
pub const XLSX_MIME_TYPE: &str = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

const RECORD_COLUMNS: [&str; 3] = ["tag", "text", "selector"];
const CONFIG_COLUMN: &str = "element_types";

/// Serialize captured pages and the element type rules into `.xlsx` bytes
pub fn build_workbook(pages: &IndexMap<String, Vec<CapturedRecord>>, element_types_text: &str) -> Result<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header = Format::new().set_bold();

    for (page_name, records) in pages {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(page_name)?;

        for (col, column) in (0u16..).zip(RECORD_COLUMNS) {
            worksheet.write_string_with_format(0, col, column, &header)?;
        }

        for (row, record) in (1u32..).zip(records) {
            worksheet.write_string(row, 0, &record.tag)?;
            worksheet.write_string(row, 1, &record.text)?;
            worksheet.write_string(row, 2, &record.selector)?;
        }

        worksheet.autofit();
    }

    let config = workbook.add_worksheet();
    config.set_name(CONFIG_SHEET_NAME)?;
    config.write_string_with_format(0, 0, CONFIG_COLUMN, &header)?;
    config.write_string(1, 0, element_types_text)?;

    let bytes = workbook.save_to_buffer()?;
    Ok(bytes)
}

/// Characters replaced in the application name so the file stays inside the output directory
const FORBIDDEN_FILE_CHARS: [char; 9] = ['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// File name for an export: `{app_name}_{timestamp}.xlsx`, `extracted` when no app name is set
pub fn workbook_file_name(app_name: Option<&str>, unix_timestamp: u64) -> String {
    let app_name: String = app_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or("extracted")
        .chars()
        .map(|c| if FORBIDDEN_FILE_CHARS.contains(&c) || c.is_control() { '_' } else { c })
        .collect();
    format!("{}_{}.xlsx", app_name, unix_timestamp)
}

/// A built workbook ready to be written
#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub file_name: String,
    /// Worksheet names in workbook order, configuration sheet last
    pub sheet_names: Vec<String>,
    pub bytes: Vec<u8>,
}

impl ExportedWorkbook {
    pub fn mime_type(&self) -> &'static str {
        XLSX_MIME_TYPE
    }

    /// Write the workbook into `dir` (created if missing); returns the full path
    pub fn write_to(&self, dir: impl AsRef<Path>) -> Result<PathBuf> {
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.file_name);
        std::fs::write(&path, &self.bytes)?;
        log::info!("Wrote {} ({} bytes)", path.display(), self.bytes.len());
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let mut part = archive.by_name(name).unwrap();
        let mut content = String::new();
        part.read_to_string(&mut content).unwrap();
        content
    }

    fn sample_pages() -> IndexMap<String, Vec<CapturedRecord>> {
        let mut pages = IndexMap::new();
        pages.insert(
            "Home".to_string(),
            vec![
                CapturedRecord::new("a", "Home", "//a[text()='Home']"),
                CapturedRecord::new("button", "Search", "//button[text()='Search']"),
            ],
        );
        pages.insert(
            "Login".to_string(),
            vec![CapturedRecord::new("input", "", "//input[@id='username']")],
        );
        pages
    }

    #[test]
    fn test_workbook_sheets() {
        let bytes = build_workbook(&sample_pages(), "- a\n- button\n- input\n").unwrap();

        let workbook = read_part(&bytes, "xl/workbook.xml");
        assert_eq!(workbook.matches("<sheet ").count(), 3);
        assert!(workbook.contains("name=\"Home\""));
        assert!(workbook.contains("name=\"Login\""));
        assert!(workbook.contains("name=\"Config_Elements\""));
    }

    #[test]
    fn test_workbook_row_counts() {
        let bytes = build_workbook(&sample_pages(), "- a").unwrap();

        // Header row plus one row per record
        assert_eq!(read_part(&bytes, "xl/worksheets/sheet1.xml").matches("<row ").count(), 3);
        assert_eq!(read_part(&bytes, "xl/worksheets/sheet2.xml").matches("<row ").count(), 2);
        assert_eq!(read_part(&bytes, "xl/worksheets/sheet3.xml").matches("<row ").count(), 2);
    }

    #[test]
    fn test_workbook_contents() {
        let bytes = build_workbook(&sample_pages(), "- a\n- button").unwrap();
        let strings = read_part(&bytes, "xl/sharedStrings.xml");

        assert!(strings.contains("selector"));
        assert!(strings.contains("//button[text()=&apos;Search&apos;]") || strings.contains("//button[text()='Search']"));
        assert!(strings.contains("element_types"));
        assert!(strings.contains("- a\n- button") || strings.contains("- a&#10;- button"));
    }

    #[test]
    fn test_empty_page_gets_header_only() {
        let mut pages = IndexMap::new();
        pages.insert("Empty".to_string(), Vec::new());

        let bytes = build_workbook(&pages, "").unwrap();
        assert_eq!(read_part(&bytes, "xl/worksheets/sheet1.xml").matches("<row ").count(), 1);
    }

    #[test]
    fn test_invalid_sheet_name_is_error() {
        let mut pages = IndexMap::new();
        pages.insert("bad/name".to_string(), Vec::new());
        assert!(build_workbook(&pages, "").is_err());
    }

    #[test]
    fn test_workbook_file_name() {
        assert_eq!(workbook_file_name(Some("MyApp"), 1700000000), "MyApp_1700000000.xlsx");
        assert_eq!(workbook_file_name(None, 42), "extracted_42.xlsx");
        assert_eq!(workbook_file_name(Some("   "), 42), "extracted_42.xlsx");
    }

    #[test]
    fn test_workbook_file_name_stays_in_directory() {
        assert_eq!(workbook_file_name(Some("../etc/shop"), 7), ".._etc_shop_7.xlsx");
        assert_eq!(workbook_file_name(Some("a\\b:c"), 7), "a_b_c_7.xlsx");

        let dir = std::path::Path::new("out");
        let path = dir.join(workbook_file_name(Some("../../escape"), 7));
        assert_eq!(path.parent(), Some(dir));
    }

    #[test]
    fn test_write_to_directory() {
        let dir = std::env::temp_dir().join(format!("element-locator-export-{}", std::process::id()));
        let exported = ExportedWorkbook {
            file_name: "demo_1.xlsx".to_string(),
            sheet_names: vec![CONFIG_SHEET_NAME.to_string()],
            bytes: build_workbook(&IndexMap::new(), "- a").unwrap(),
        };

        let path = exported.write_to(&dir).unwrap();
        assert_eq!(path, dir.join("demo_1.xlsx"));
        assert_eq!(std::fs::read(&path).unwrap(), exported.bytes);
        assert_eq!(exported.mime_type(), XLSX_MIME_TYPE);

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
