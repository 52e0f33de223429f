//! ZIP packaging and XML building for OOXML output.

use qbank_core::{Error, Result};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::borrow::Cow;
use std::io::{Seek, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Write named parts into a ZIP package.
pub fn write_package<W: Write + Seek>(writer: W, parts: &[(&str, &[u8])]) -> Result<W> {
    let mut zip = ZipWriter::new(writer);
    let options = FileOptions::default().compression_method(CompressionMethod::Deflated);

    for (name, content) in parts {
        zip.start_file(*name, options)
            .map_err(|e| Error::ZipError(format!("Failed to add '{}': {}", name, e)))?;
        zip.write_all(content)
            .map_err(|e| Error::ZipError(format!("Failed to write '{}': {}", name, e)))?;
    }

    zip.finish()
        .map_err(|e| Error::ZipError(format!("Failed to finish package: {}", e)))
}

/// Small event-based XML builder.
pub struct XmlBuilder {
    writer: Writer<Vec<u8>>,
}

impl XmlBuilder {
    /// Start a standalone UTF-8 document.
    pub fn new() -> Result<Self> {
        let mut builder = Self {
            writer: Writer::new(Vec::new()),
        };
        builder.write(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
        Ok(builder)
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attrs);
        self.write(Event::Start(element))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.write(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        let element = element(name, attrs);
        self.write(Event::Empty(element))
    }

    /// Write escaped character data, dropping characters XML 1.0 forbids.
    pub fn text(&mut self, text: &str) -> Result<()> {
        let text = xml_safe(text);
        self.write(Event::Text(BytesText::new(&text)))
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn write(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| Error::XmlError(format!("Failed to write XML: {}", e)))
    }
}

fn element<'a>(name: &'a str, attrs: &[(&str, &str)]) -> BytesStart<'a> {
    let mut element = BytesStart::new(name);
    for (key, value) in attrs {
        element.push_attribute((*key, xml_safe(value).as_ref()));
    }
    element
}

/// Whether `c` may appear in an XML 1.0 document.
fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r' | '\u{20}'..='\u{D7FF}' | '\u{E000}'..='\u{FFFD}' | '\u{10000}'..)
}

/// `text` without the control characters Word and Excel refuse to open.
pub fn xml_safe(text: &str) -> Cow<'_, str> {
    if text.chars().all(is_xml_char) {
        return Cow::Borrowed(text);
    }

    let cleaned: String = text.chars().filter(|&c| is_xml_char(c)).collect();
    log::debug!(
        "Dropped {} characters not allowed in XML",
        text.chars().count() - cleaned.chars().count()
    );
    Cow::Owned(cleaned)
}
