//! Print the row tree of a document.

use anyhow::Result;
use clap::Parser;
use console::style;
use serde::Serialize;
use std::path::PathBuf;

use sheet_content::{DocumentLoader, LoadReport};
use sheet_core::{Document, RowId, RowKind, SheetConfig};

use super::{OutputFormat, print_diagnostics};

/// Show the rows of a document
#[derive(Parser)]
pub struct Inspect {
    /// Document file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct DocumentView<'a> {
    kind: &'static str,
    version: i32,
    diagnostics: &'a LoadReport,
    rows: Vec<RowView>,
}

#[derive(Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
enum RowView {
    Modifier {
        description: String,
        enabled: bool,
    },
    Advantage {
        name: String,
        container: bool,
        base_points: i32,
        adjusted_points: i32,
        children: Vec<RowView>,
    },
}

impl Inspect {
    pub fn execute(self, config: &SheetConfig) -> Result<()> {
        let (doc, report) = DocumentLoader::new().load(&self.file)?;
        print_diagnostics(&report);

        match self.format {
            OutputFormat::Summary => {
                println!("{} {}", style("File:").bold().cyan(), self.file.display());
                println!(
                    "{} {} (version {})",
                    style("Kind:").bold().cyan(),
                    doc.kind().root_tag(),
                    doc.schema_version()
                );
                println!("{} {}", style("Rows:").bold().cyan(), doc.tree().len());
                println!();
                for &root in doc.roots() {
                    print_row(&doc, root, 0, config)?;
                }
            }
            OutputFormat::Json => {
                let rows = doc
                    .roots()
                    .iter()
                    .map(|&root| row_view(&doc, root, config))
                    .collect::<Result<Vec<_>>>()?;
                let view = DocumentView {
                    kind: doc.kind().root_tag(),
                    version: doc.schema_version(),
                    diagnostics: &report,
                    rows,
                };
                println!("{}", serde_json::to_string_pretty(&view)?);
            }
        }
        Ok(())
    }
}

fn print_row(doc: &Document, id: RowId, depth: usize, config: &SheetConfig) -> Result<()> {
    let row = doc.row(id)?;
    let indent = "  ".repeat(depth);
    match &row.kind {
        RowKind::Modifier(modifier) => {
            let text = modifier.full_description(&row.notes, doc.strings());
            if modifier.enabled {
                println!("{indent}- {text}");
            } else {
                println!("{indent}- {}", style(text).dim());
            }
        }
        RowKind::Advantage(advantage) => {
            let name = if advantage.container {
                style(advantage.name.as_str()).bold().yellow()
            } else {
                style(advantage.name.as_str()).bold()
            };
            println!(
                "{indent}{name} [{}]",
                style(doc.adjusted_points(id, config)?).green()
            );
        }
    }
    for &child in doc.children(id) {
        print_row(doc, child, depth + 1, config)?;
    }
    Ok(())
}

fn row_view(doc: &Document, id: RowId, config: &SheetConfig) -> Result<RowView> {
    let row = doc.row(id)?;
    let view = match &row.kind {
        RowKind::Modifier(modifier) => RowView::Modifier {
            description: modifier.full_description(&row.notes, doc.strings()),
            enabled: modifier.enabled,
        },
        RowKind::Advantage(advantage) => RowView::Advantage {
            name: advantage.name.clone(),
            container: advantage.container,
            base_points: advantage.base_points,
            adjusted_points: doc.adjusted_points(id, config)?,
            children: doc
                .children(id)
                .iter()
                .map(|&child| row_view(doc, child, config))
                .collect::<Result<Vec<_>>>()?,
        },
    };
    Ok(view)
}
