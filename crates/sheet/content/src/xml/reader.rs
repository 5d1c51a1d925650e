use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::Element;
use crate::error::{CodecError, CodecResult};

/// Parse `source` into its root element.
///
/// Fails with [`CodecError::MalformedDocument`] when the text is not
/// well-formed XML or has no root element.
pub(crate) fn parse(source: &str) -> CodecResult<Element> {
    let mut reader = Reader::from_str(source);

    let mut stack: Vec<Element> = Vec::new();
    let mut root: Option<Element> = None;

    loop {
        let position = reader.buffer_position();
        let event = reader
            .read_event()
            .map_err(|e| CodecError::malformed(format!("byte {position}"), e))?;
        match event {
            Event::Start(start) => stack.push(open(&start, &stack)?),
            Event::Empty(start) => {
                let element = open(&start, &stack)?;
                close(element, &mut stack, &mut root)?;
            }
            Event::End(_) => {
                let element = stack.pop().ok_or_else(|| {
                    CodecError::malformed(format!("byte {position}"), "unmatched end tag")
                })?;
                close(element, &mut stack, &mut root)?;
            }
            Event::Text(text) => {
                let text = text
                    .unescape()
                    .map_err(|e| CodecError::malformed(path(&stack), e))?;
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&text);
                }
            }
            Event::CData(data) => {
                if let Some(current) = stack.last_mut() {
                    current.text.push_str(&String::from_utf8_lossy(&data));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !stack.is_empty() {
        return Err(CodecError::malformed(path(&stack), "unexpected end of document"));
    }
    root.ok_or_else(|| CodecError::malformed("/", "missing root element"))
}

fn open(start: &BytesStart<'_>, stack: &[Element]) -> CodecResult<Element> {
    let mut element = Element::new(String::from_utf8_lossy(start.name().as_ref()));
    for attribute in start.attributes() {
        let attribute = attribute.map_err(|e| CodecError::malformed(path(stack), e))?;
        let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
        let value = attribute
            .unescape_value()
            .map_err(|e| CodecError::malformed(path(stack), e))?
            .into_owned();
        element.attributes.push((key, value));
    }
    Ok(element)
}

fn close(
    mut element: Element,
    stack: &mut [Element],
    root: &mut Option<Element>,
) -> CodecResult<()> {
    // Indentation between child elements is not content; leaf text is kept verbatim.
    if !element.children.is_empty() && element.text.trim().is_empty() {
        element.text.clear();
    }
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(CodecError::malformed(
                format!("/{}", element.name),
                "more than one root element",
            ));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn path(stack: &[Element]) -> String {
    if stack.is_empty() {
        return "/".to_string();
    }
    stack
        .iter()
        .map(|element| format!("/{}", element.name))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builds_element_tree() {
        let root = parse(
            r#"<?xml version="1.0"?>
<list version="1">
    <item enabled="no"><name>A &amp; B</name></item>
    <item/>
</list>"#,
        )
        .unwrap();
        assert_eq!(root.name, "list");
        assert_eq!(root.attribute("version"), Some("1"));
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children[0].text, "A & B");
        assert!(root.children[1].children.is_empty());
    }

    #[test]
    fn leaf_text_keeps_surrounding_whitespace() {
        let root = parse("<row>\n\t<name>  Padded  </name>\n\t<notes> </notes>\n</row>").unwrap();
        assert_eq!(root.text, "");
        assert_eq!(root.children[0].text, "  Padded  ");
        assert_eq!(root.children[1].text, " ");
    }

    #[test]
    fn cdata_is_text() {
        let root = parse("<notes><![CDATA[<b>bold</b>]]></notes>").unwrap();
        assert_eq!(root.text, "<b>bold</b>");
    }

    #[test]
    fn rejects_broken_documents() {
        for source in ["", "   ", "<a><b></a>", "<a>", "<a/><b/>"] {
            let err = parse(source).unwrap_err();
            assert!(
                matches!(err, CodecError::MalformedDocument { .. }),
                "{source:?} gave {err:?}"
            );
        }
    }
}
