//! Optimized XML writer with minimal allocations

use crate::error::Result;
use std::io::Write;

/// Fast XML writer that buffers small writes before handing them to the output
pub struct XmlWriter<W: Write> {
    writer: W,
    buffer: Vec<u8>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(writer: W) -> Self {
        XmlWriter {
            writer,
            buffer: Vec::with_capacity(8192), // 8KB buffer
        }
    }

    /// Write raw bytes directly
    #[inline]
    pub fn write_raw(&mut self, data: &[u8]) -> Result<()> {
        self.buffer.extend_from_slice(data);
        if self.buffer.len() > 4096 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    /// Write string data
    #[inline]
    pub fn write_str(&mut self, s: &str) -> Result<()> {
        self.write_raw(s.as_bytes())
    }

    /// Write an integer without going through `to_string`
    #[inline]
    pub fn write_int(&mut self, value: i64) -> Result<()> {
        let mut buf = itoa::Buffer::new();
        self.write_str(buf.format(value))
    }

    /// Write XML element start tag
    #[inline]
    pub fn start_element(&mut self, name: &str) -> Result<()> {
        self.write_raw(b"<")?;
        self.write_str(name)
    }

    /// Write XML element end tag
    #[inline]
    pub fn end_element(&mut self, name: &str) -> Result<()> {
        self.write_raw(b"</")?;
        self.write_str(name)?;
        self.write_raw(b">")
    }

    /// Write attribute
    #[inline]
    pub fn attribute(&mut self, name: &str, value: &str) -> Result<()> {
        self.write_raw(b" ")?;
        self.write_str(name)?;
        self.write_raw(b"=\"")?;
        self.write_escaped(value)?;
        self.write_raw(b"\"")
    }

    /// Write attribute with integer value
    #[inline]
    pub fn attribute_int(&mut self, name: &str, value: i64) -> Result<()> {
        self.write_raw(b" ")?;
        self.write_str(name)?;
        self.write_raw(b"=\"")?;
        self.write_int(value)?;
        self.write_raw(b"\"")
    }

    /// Close start tag
    #[inline]
    pub fn close_start_tag(&mut self) -> Result<()> {
        self.write_raw(b">")
    }

    /// Close start tag of an element without content
    #[inline]
    pub fn close_empty_tag(&mut self) -> Result<()> {
        self.write_raw(b"/>")
    }

    /// Write text content with XML escaping
    ///
    /// Control characters that XML 1.0 cannot carry are written in the
    /// `_xHHHH_` form spreadsheet applications decode on load.
    pub fn write_escaped(&mut self, text: &str) -> Result<()> {
        escape_into(&mut self.buffer, text);
        if self.buffer.len() > 4096 {
            self.flush_buffer()?;
        }
        Ok(())
    }

    fn flush_buffer(&mut self) -> Result<()> {
        if !self.buffer.is_empty() {
            self.writer.write_all(&self.buffer)?;
            self.buffer.clear();
        }
        Ok(())
    }

    /// Flush buffer to underlying writer
    pub fn flush(&mut self) -> Result<()> {
        self.flush_buffer()?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Append `text` to `out` with XML escaping applied
pub(crate) fn escape_into(out: &mut Vec<u8>, text: &str) {
    for byte in text.bytes() {
        match byte {
            b'&' => out.extend_from_slice(b"&amp;"),
            b'<' => out.extend_from_slice(b"&lt;"),
            b'>' => out.extend_from_slice(b"&gt;"),
            b'"' => out.extend_from_slice(b"&quot;"),
            b'\'' => out.extend_from_slice(b"&apos;"),
            b'\t' | b'\n' | b'\r' => out.push(byte),
            0x00..=0x1F => {
                out.extend_from_slice(format!("_x{:04X}_", byte).as_bytes());
            }
            _ => out.push(byte),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_xml_writer() {
        let mut output = Vec::new();
        let mut writer = XmlWriter::new(&mut output);

        writer.start_element("root").unwrap();
        writer.attribute("attr", "value").unwrap();
        writer.attribute_int("n", -42).unwrap();
        writer.close_start_tag().unwrap();
        writer.write_str("content").unwrap();
        writer.end_element("root").unwrap();
        writer.flush().unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "<root attr=\"value\" n=\"-42\">content</root>"
        );
    }

    #[test]
    fn test_xml_escaping() {
        let mut output = Vec::new();
        let mut writer = XmlWriter::new(&mut output);

        writer.write_escaped("<test>&value</test>").unwrap();
        writer.flush().unwrap();

        assert_eq!(
            String::from_utf8(output).unwrap(),
            "&lt;test&gt;&amp;value&lt;/test&gt;"
        );
    }

    #[test]
    fn test_control_characters_are_encoded() {
        let mut out = Vec::new();
        escape_into(&mut out, "a\u{1}b\tc");
        assert_eq!(String::from_utf8(out).unwrap(), "a_x0001_b\tc");
    }

    #[test]
    fn test_large_writes_reach_the_output() {
        let mut output = Vec::new();
        {
            let mut writer = XmlWriter::new(&mut output);
            for _ in 0..1000 {
                writer.write_str("0123456789").unwrap();
            }
            writer.flush().unwrap();
        }
        assert_eq!(output.len(), 10_000);
    }
}
