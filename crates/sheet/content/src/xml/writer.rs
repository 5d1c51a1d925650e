use std::io::Write;

use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::error::CodecResult;

/// Tab-indented element writer.
pub(crate) struct XmlWriter<W: Write> {
    inner: Writer<W>,
}

impl<W: Write> XmlWriter<W> {
    pub fn new(sink: W, indent_width: usize) -> Self {
        Self {
            inner: Writer::new_with_indent(sink, b'\t', indent_width),
        }
    }

    pub fn declaration(&mut self) -> CodecResult<()> {
        self.inner
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        Ok(())
    }

    pub fn start(&mut self, tag: &str, attributes: &[(&str, &str)]) -> CodecResult<()> {
        let mut start = BytesStart::new(tag);
        for &attribute in attributes {
            start.push_attribute(attribute);
        }
        self.inner.write_event(Event::Start(start))?;
        Ok(())
    }

    pub fn end(&mut self, tag: &str) -> CodecResult<()> {
        self.inner.write_event(Event::End(BytesEnd::new(tag)))?;
        Ok(())
    }

    /// `<tag attr="…">text</tag>` on one line.
    pub fn simple_with_attributes(
        &mut self,
        tag: &str,
        attributes: &[(&str, &str)],
        text: &str,
    ) -> CodecResult<()> {
        let element = self
            .inner
            .create_element(tag)
            .with_attributes(attributes.iter().copied());
        element.write_text_content(BytesText::new(text))?;
        Ok(())
    }

    pub fn simple(&mut self, tag: &str, text: &str) -> CodecResult<()> {
        self.simple_with_attributes(tag, &[], text)
    }

    pub fn simple_not_empty(&mut self, tag: &str, text: &str) -> CodecResult<()> {
        if text.is_empty() {
            return Ok(());
        }
        self.simple(tag, text)
    }

    pub fn simple_not_zero(&mut self, tag: &str, value: i32) -> CodecResult<()> {
        if value == 0 {
            return Ok(());
        }
        self.simple(tag, &value.to_string())
    }

    /// Terminate the last line and hand the sink back.
    pub fn finish(self) -> CodecResult<W> {
        let mut sink = self.inner.into_inner();
        sink.write_all(b"\n")?;
        sink.flush()?;
        Ok(sink)
    }
}
