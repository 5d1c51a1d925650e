use std::io::Write;
use std::rc::Rc;

use sheet_core::{
    DefaultStrings, Document, DocumentKind, Row, RowId, RowKind, SheetConfig, StringProvider,
};

use super::{LoadReport, LoadState, RowTag, advantage, modifier};
use crate::error::{CodecError, CodecResult};
use crate::xml::{self, Element, XmlWriter};

const ATTRIBUTE_VERSION: &str = "version";

/// Read a document with English default names.
pub fn load_document(source: &str) -> CodecResult<(Document, LoadReport)> {
    load_document_with_strings(source, Rc::new(DefaultStrings))
}

/// Read a document, naming defaulted rows through `strings`.
///
/// Older versions are migrated while reading; a version newer than the
/// current one is rejected. Rows are populated directly, so no notifications
/// are raised.
pub fn load_document_with_strings(
    source: &str,
    strings: Rc<dyn StringProvider>,
) -> CodecResult<(Document, LoadReport)> {
    let root = xml::parse(source)?;
    let kind = DocumentKind::from_root_tag(&root.name).ok_or_else(|| {
        CodecError::malformed(
            format!("/{}", root.name),
            format!(
                "expected <{}> or <{}>",
                DocumentKind::ModifierList.root_tag(),
                DocumentKind::AdvantageList.root_tag()
            ),
        )
    })?;

    let mut state = LoadState::new(0, &root.name);
    let version = match root.attribute(ATTRIBUTE_VERSION) {
        Some(text) => state.read_token(ATTRIBUTE_VERSION, text, 0),
        None => 0,
    };
    state.data_file_version = version;
    if version > kind.current_version() {
        return Err(CodecError::NewerVersion {
            found: version,
            supported: kind.current_version(),
        });
    }

    let mut doc = Document::with_strings(kind, strings);
    doc.set_schema_version(version);
    load_children(&mut doc, &root, None, &mut state)?;

    tracing::info!(
        kind = kind.root_tag(),
        version,
        rows = doc.tree().len(),
        diagnostics = state.report.len(),
        "Loaded document"
    );
    Ok((doc, state.report))
}

/// Decode row elements beneath `element` and place them under `parent`.
///
/// Rows that may not live at this position (e.g. an advantage beneath a
/// non-container) are skipped like unknown tags.
fn load_children(
    doc: &mut Document,
    element: &Element,
    parent: Option<RowId>,
    state: &mut LoadState,
) -> CodecResult<()> {
    for child in &element.children {
        let Some(tag) = RowTag::lookup(&child.name) else {
            // Non-row children of a row are fields, reported by that row's loader.
            if parent.is_none() {
                state.skipped(&child.name);
            }
            continue;
        };

        state.enter(&child.name);
        let strings = doc.shared_strings();
        let row = match tag {
            RowTag::Modifier => modifier::load(child, strings.as_ref(), state),
            RowTag::Advantage => advantage::load(child, strings.as_ref(), state),
        };

        if !placement_allowed(doc, parent, &row) {
            state.leave();
            state.skipped(&child.name);
            continue;
        }
        let id = doc.tree_mut().push(parent, row)?;
        load_children(doc, child, Some(id), state)?;
        state.leave();
    }
    Ok(())
}

fn placement_allowed(doc: &Document, parent: Option<RowId>, row: &Row) -> bool {
    match parent {
        None => doc.kind().accepts_root(row),
        Some(parent) => doc
            .tree()
            .get(parent)
            .is_some_and(|parent| parent.accepts_child(row)),
    }
}

/// Write `doc` at the current schema version and stamp that version on it.
pub fn save_document<W: Write>(
    doc: &mut Document,
    sink: W,
    config: &SheetConfig,
) -> CodecResult<W> {
    let kind = doc.kind();
    let version = kind.current_version().to_string();

    let mut out = XmlWriter::new(sink, config.indent_width);
    out.declaration()?;
    out.start(kind.root_tag(), &[(ATTRIBUTE_VERSION, version.as_str())])?;
    for &root in doc.roots() {
        save_row(&mut out, doc, root)?;
    }
    out.end(kind.root_tag())?;
    let sink = out.finish()?;

    doc.mark_saved();
    tracing::info!(
        kind = kind.root_tag(),
        version = doc.schema_version(),
        rows = doc.tree().len(),
        "Saved document"
    );
    Ok(sink)
}

/// Save into a string.
pub fn save_to_string(doc: &mut Document, config: &SheetConfig) -> CodecResult<String> {
    let bytes = save_document(doc, Vec::new(), config)?;
    String::from_utf8(bytes).map_err(|e| CodecError::malformed("/", e))
}

fn save_row<W: Write>(out: &mut XmlWriter<W>, doc: &Document, id: RowId) -> CodecResult<()> {
    let row = doc.row(id)?;
    let tag = match row.kind {
        RowKind::Modifier(_) => modifier::TAG,
        RowKind::Advantage(_) => advantage::TAG,
    };
    match &row.kind {
        RowKind::Modifier(m) => {
            out.start(tag, &modifier::attributes(m))?;
            modifier::save_fields(out, m, &row.notes)?;
        }
        RowKind::Advantage(a) => {
            out.start(tag, &advantage::attributes(a))?;
            advantage::save_fields(out, a, &row.notes)?;
        }
    }
    for &child in doc.children(id) {
        save_row(out, doc, child)?;
    }
    out.end(tag)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sheet_core::{CostType, Modifier};

    #[test]
    fn wrong_root_is_malformed() {
        let err = load_document("<skill_list version=\"1\"/>").unwrap_err();
        assert!(matches!(err, CodecError::MalformedDocument { .. }));
    }

    #[test]
    fn newer_version_is_rejected() {
        let err = load_document("<modifier_list version=\"2\"/>").unwrap_err();
        assert!(matches!(
            err,
            CodecError::NewerVersion {
                found: 2,
                supported: 1
            }
        ));
    }

    #[test]
    fn missing_version_reads_as_zero() {
        let (doc, report) = load_document("<modifier_list><modifier/></modifier_list>").unwrap();
        assert_eq!(doc.schema_version(), 0);
        assert_eq!(doc.roots().len(), 1);
        assert!(report.is_clean());
    }

    #[test]
    fn save_stamps_current_version() {
        let (mut doc, _) = load_document("<modifier_list version=\"0\"/>").unwrap();
        let text = save_to_string(&mut doc, &SheetConfig::default()).unwrap();
        assert!(text.contains("<modifier_list version=\"1\">"));
        assert_eq!(doc.schema_version(), 1);
    }

    #[test]
    fn misplaced_rows_are_skipped() {
        let (doc, report) = load_document(
            r#"<advantage_list version="2">
                <modifier><name>Stray</name></modifier>
                <advantage><name>Plain</name><advantage><name>Nested</name></advantage></advantage>
            </advantage_list>"#,
        )
        .unwrap();
        assert_eq!(doc.tree().len(), 1);
        assert_eq!(
            report.skipped_tags().collect::<Vec<_>>(),
            vec!["modifier", "advantage"]
        );
    }

    #[test]
    fn modifier_row_written_in_order() {
        let mut doc = Document::new(DocumentKind::ModifierList);
        doc.tree_mut()
            .push(
                None,
                Row::modifier(
                    Modifier::named("Reduced Fatigue Cost")
                        .with_cost(CostType::Percentage, 20)
                        .with_levels(2)
                        .with_reference("B121")
                        .with_enabled(false),
                ),
            )
            .unwrap();
        let text = save_to_string(&mut doc, &SheetConfig::default()).unwrap();
        assert_eq!(
            text,
            "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\
             <modifier_list version=\"1\">\n\
             \t<modifier enabled=\"no\">\n\
             \t\t<name>Reduced Fatigue Cost</name>\n\
             \t\t<cost type=\"percentage\">20</cost>\n\
             \t\t<levels>2</levels>\n\
             \t\t<affects>total</affects>\n\
             \t\t<reference>B121</reference>\n\
             \t</modifier>\n\
             </modifier_list>\n"
        );
    }
}
