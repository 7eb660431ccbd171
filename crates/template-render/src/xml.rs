//! Thin wrapper over `quick_xml::Writer` for the XML parts of packages

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};

use crate::types::{Result, xml_error};

pub(crate) struct XmlDoc {
    writer: Writer<Vec<u8>>,
}

impl XmlDoc {
    /// New document starting with a standalone UTF-8 declaration
    pub fn new() -> Result<Self> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 1);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))
            .map_err(xml_error)?;
        Ok(Self { writer })
    }

    /// Processing instruction, e.g. `aid style="50" type="document"`
    pub fn pi(&mut self, content: &str) -> Result<()> {
        self.event(Event::PI(BytesPI::new(content)))
    }

    pub fn start(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Start(element(name, attrs)))
    }

    pub fn end(&mut self, name: &str) -> Result<()> {
        self.event(Event::End(BytesEnd::new(name)))
    }

    pub fn empty(&mut self, name: &str, attrs: &[(&str, &str)]) -> Result<()> {
        self.event(Event::Empty(element(name, attrs)))
    }

    /// `<name attrs>text</name>`, with the text escaped
    pub fn text_element(&mut self, name: &str, attrs: &[(&str, &str)], text: &str) -> Result<()> {
        self.start(name, attrs)?;
        self.event(Event::Text(BytesText::new(text)))?;
        self.end(name)
    }

    pub fn finish(self) -> Vec<u8> {
        self.writer.into_inner()
    }

    fn event(&mut self, event: Event<'_>) -> Result<()> {
        self.writer.write_event(event).map_err(xml_error)
    }
}

fn element<'a>(name: &'a str, attrs: &[(&'a str, &'a str)]) -> BytesStart<'a> {
    BytesStart::new(name).with_attributes(attrs.iter().copied())
}

/// Decimal with trailing zeros removed, as used in coordinate attributes
pub(crate) fn num(value: f64) -> String {
    let fixed = format!("{:.4}", value);
    let trimmed = fixed.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "" | "-0" => "0".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_attributes_and_text() {
        let mut doc = XmlDoc::new().unwrap();
        doc.start("Root", &[("Name", "A & B")]).unwrap();
        doc.text_element("Content", &[], "<5 pages>").unwrap();
        doc.end("Root").unwrap();
        let text = String::from_utf8(doc.finish()).unwrap();

        assert!(text.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>"));
        assert!(text.contains("Name=\"A &amp; B\""));
        assert!(text.contains("<Content>&lt;5 pages&gt;</Content>"));
    }

    #[test]
    fn numbers_drop_trailing_zeros() {
        assert_eq!(num(432.0), "432");
        assert_eq!(num(0.125), "0.125");
        assert_eq!(num(-0.00001), "0");
        assert_eq!(num(13.5), "13.5");
    }
}
