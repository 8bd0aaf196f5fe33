//! Fast single-sheet workbook with ZIP compression

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use zip::write::{SimpleFileOptions, ZipWriter};
use zip::CompressionMethod;

use super::shared_strings::SharedStrings;
use super::xml_writer::{escape_into, XmlWriter};
use crate::error::{ExcelError, Result};
use crate::types::{column_letter, CellValue};

/// Rows between explicit flushes of the ZIP stream
const FLUSH_INTERVAL: u32 = 1000;

/// Fast workbook holding exactly one worksheet
///
/// Rows are streamed into `xl/worksheets/sheet1.xml` as they are written;
/// only the shared strings table stays in memory until [`close`](Self::close).
/// Entry timestamps are fixed so the same rows always produce the same bytes.
pub struct FastWorkbook {
    zip: ZipWriter<BufWriter<File>>,
    shared_strings: SharedStrings,
    sheet_name: String,
    current_row: u32,
    xml_buffer: Vec<u8>,         // Reusable buffer for row XML
    cell_ref_cache: Vec<String>, // Cache for column letters (A, B, C, ...)
}

impl FastWorkbook {
    /// Create a new fast workbook whose single sheet is called `sheet_name`
    pub fn new<P: AsRef<Path>>(path: P, sheet_name: &str) -> Result<Self> {
        let file = File::create(path)?;
        let writer = BufWriter::with_capacity(64 * 1024, file); // 64KB buffer
        let mut zip = ZipWriter::new(writer);
        let options = Self::entry_options();

        zip.start_file("[Content_Types].xml", options)?;
        Self::write_content_types(&mut zip)?;

        zip.start_file("_rels/.rels", options)?;
        Self::write_root_rels(&mut zip)?;

        zip.start_file("docProps/core.xml", options)?;
        Self::write_core_props(&mut zip)?;

        zip.start_file("docProps/app.xml", options)?;
        Self::write_app_props(&mut zip)?;

        zip.start_file("xl/worksheets/sheet1.xml", options)?;
        {
            let mut xml_writer = XmlWriter::new(&mut zip);
            xml_writer
                .write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n")?;
            xml_writer.start_element("worksheet")?;
            xml_writer.attribute(
                "xmlns",
                "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
            )?;
            xml_writer.attribute(
                "xmlns:r",
                "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
            )?;
            xml_writer.close_start_tag()?;
            xml_writer.start_element("sheetData")?;
            xml_writer.close_start_tag()?;
            xml_writer.flush()?;
        }

        // Pre-generate column letters for the first 100 columns (A-CV)
        let cell_ref_cache = (0..100).map(column_letter).collect();

        Ok(FastWorkbook {
            zip,
            shared_strings: SharedStrings::new(),
            sheet_name: sheet_name.to_string(),
            current_row: 0,
            xml_buffer: Vec::with_capacity(8192),
            cell_ref_cache,
        })
    }

    fn entry_options() -> SimpleFileOptions {
        SimpleFileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .compression_level(Some(6))
            .last_modified_time(zip::DateTime::default())
    }

    /// Number of rows written so far
    pub fn row_count(&self) -> u32 {
        self.current_row
    }

    /// Write a row of typed values; empty cells are omitted from the XML
    pub fn write_row(&mut self, values: &[CellValue]) -> Result<()> {
        self.current_row += 1;
        let row_num = self.current_row;
        let mut row_buf = itoa::Buffer::new();
        let row_str = row_buf.format(row_num).to_string();

        self.xml_buffer.clear();
        self.xml_buffer.extend_from_slice(b"<row r=\"");
        self.xml_buffer.extend_from_slice(row_str.as_bytes());
        self.xml_buffer.extend_from_slice(b"\">");

        for (col_idx, value) in values.iter().enumerate() {
            let mut num = itoa::Buffer::new();
            let (cell_type, text): (Option<&str>, String) = match value {
                CellValue::Empty => continue,
                CellValue::String(s) => {
                    let index = self.shared_strings.add_string(s);
                    (Some("s"), num.format(index).to_string())
                }
                CellValue::Int(n) => (None, num.format(*n).to_string()),
                CellValue::Float(f) | CellValue::DateTime(f) | CellValue::Duration(f)
                    if f.is_finite() =>
                {
                    (None, f.to_string())
                }
                CellValue::Float(_) | CellValue::DateTime(_) | CellValue::Duration(_) => {
                    (Some("e"), "#NUM!".to_string())
                }
                CellValue::Bool(b) => (Some("b"), if *b { "1" } else { "0" }.to_string()),
                CellValue::Error(e) => (Some("e"), e.clone()),
            };

            self.xml_buffer.extend_from_slice(b"<c r=\"");
            match self.cell_ref_cache.get(col_idx) {
                Some(letters) => self.xml_buffer.extend_from_slice(letters.as_bytes()),
                None => self
                    .xml_buffer
                    .extend_from_slice(column_letter(col_idx as u32).as_bytes()),
            }
            self.xml_buffer.extend_from_slice(row_str.as_bytes());
            self.xml_buffer.push(b'"');

            let style = value.style().index();
            if style != 0 {
                self.xml_buffer.extend_from_slice(b" s=\"");
                self.xml_buffer.extend_from_slice(num.format(style).as_bytes());
                self.xml_buffer.push(b'"');
            }
            if let Some(t) = cell_type {
                self.xml_buffer.extend_from_slice(b" t=\"");
                self.xml_buffer.extend_from_slice(t.as_bytes());
                self.xml_buffer.push(b'"');
            }

            self.xml_buffer.extend_from_slice(b"><v>");
            escape_into(&mut self.xml_buffer, &text);
            self.xml_buffer.extend_from_slice(b"</v></c>");
        }

        self.xml_buffer.extend_from_slice(b"</row>");

        self.zip.write_all(&self.xml_buffer)?;

        if self.current_row % FLUSH_INTERVAL == 0 {
            self.zip.flush()?;
        }

        Ok(())
    }

    /// Close the workbook and write remaining files
    pub fn close(mut self) -> Result<()> {
        {
            let mut xml_writer = XmlWriter::new(&mut self.zip);
            xml_writer.end_element("sheetData")?;
            xml_writer.end_element("worksheet")?;
            xml_writer.flush()?;
        }

        let options = Self::entry_options();

        self.zip.start_file("xl/sharedStrings.xml", options)?;
        {
            let mut xml_writer = XmlWriter::new(&mut self.zip);
            self.shared_strings.write_xml(&mut xml_writer)?;
        }

        self.zip.start_file("xl/workbook.xml", options)?;
        self.write_workbook_xml()?;

        self.zip.start_file("xl/_rels/workbook.xml.rels", options)?;
        Self::write_workbook_rels(&mut self.zip)?;

        self.zip.start_file("xl/styles.xml", options)?;
        Self::write_styles(&mut self.zip)?;

        let mut writer = self.zip.finish()?;
        writer
            .flush()
            .map_err(|e| ExcelError::WriteError(format!("Failed to flush workbook: {}", e)))?;
        Ok(())
    }

    fn write_content_types<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
<Default Extension="xml" ContentType="application/xml"/>
<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>
<Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>
<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>
<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>
<Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
<Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
</Types>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_core_props<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
<dc:creator>excelsplit</dc:creator>
<cp:lastModifiedBy>excelsplit</cp:lastModifiedBy>
</cp:coreProperties>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_app_props<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties">
<Application>excelsplit</Application>
<DocSecurity>0</DocSecurity>
<ScaleCrop>false</ScaleCrop>
<LinksUpToDate>false</LinksUpToDate>
<SharedDoc>false</SharedDoc>
<HyperlinksChanged>false</HyperlinksChanged>
</Properties>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    fn write_workbook_xml(&mut self) -> Result<()> {
        let mut xml_writer = XmlWriter::new(&mut self.zip);

        xml_writer.write_str("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\n")?;
        xml_writer.start_element("workbook")?;
        xml_writer.attribute(
            "xmlns",
            "http://schemas.openxmlformats.org/spreadsheetml/2006/main",
        )?;
        xml_writer.attribute(
            "xmlns:r",
            "http://schemas.openxmlformats.org/officeDocument/2006/relationships",
        )?;
        xml_writer.close_start_tag()?;

        xml_writer.start_element("sheets")?;
        xml_writer.close_start_tag()?;
        xml_writer.start_element("sheet")?;
        xml_writer.attribute("name", &self.sheet_name)?;
        xml_writer.attribute_int("sheetId", 1)?;
        xml_writer.attribute("r:id", "rId1")?;
        xml_writer.close_empty_tag()?;
        xml_writer.end_element("sheets")?;

        xml_writer.end_element("workbook")?;
        xml_writer.flush()?;

        Ok(())
    }

    fn write_workbook_rels<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/>
<Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>
<Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>
</Relationships>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }

    // xf order must match `CellStyle` discriminants
    fn write_styles<W: Write>(writer: &mut W) -> Result<()> {
        let xml = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">
<numFmts count="1">
<numFmt numFmtId="164" formatCode="yyyy\-mm\-dd\ hh:mm:ss"/>
</numFmts>
<fonts count="1">
<font><sz val="11"/><name val="Calibri"/></font>
</fonts>
<fills count="2">
<fill><patternFill patternType="none"/></fill>
<fill><patternFill patternType="gray125"/></fill>
</fills>
<borders count="1">
<border><left/><right/><top/><bottom/><diagonal/></border>
</borders>
<cellStyleXfs count="1">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0"/>
</cellStyleXfs>
<cellXfs count="4">
<xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/>
<xf numFmtId="14" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="164" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
<xf numFmtId="46" fontId="0" fillId="0" borderId="0" xfId="0" applyNumberFormat="1"/>
</cellXfs>
</styleSheet>"#;
        writer.write_all(xml.as_bytes())?;
        Ok(())
    }
}
