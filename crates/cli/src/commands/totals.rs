//! Adjusted costs and feature bonuses of an advantage list.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use sheet_content::DocumentLoader;
use sheet_core::{DocumentKind, SheetConfig, derive_totals};

use super::{OutputFormat, print_diagnostics};

/// Compute adjusted costs and feature bonuses
#[derive(Parser)]
pub struct Totals {
    /// Advantage list to evaluate
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

impl Totals {
    pub fn execute(self, config: &SheetConfig) -> Result<()> {
        let (doc, report) = DocumentLoader::new().load(&self.file)?;
        print_diagnostics(&report);
        if doc.kind() != DocumentKind::AdvantageList {
            anyhow::bail!(
                "{} is a {}; totals need an {}",
                self.file.display(),
                doc.kind().root_tag(),
                DocumentKind::AdvantageList.root_tag()
            );
        }

        let totals = derive_totals(&doc, config)?;
        match self.format {
            OutputFormat::Summary => {
                println!(
                    "{} {}",
                    style("Total points:").bold().cyan(),
                    totals.total_points
                );
                if !totals.attributes.is_empty() {
                    println!("{}", style("Attributes:").bold().yellow());
                    for (attribute, bonus) in &totals.attributes {
                        println!("  {attribute}: {bonus:+}");
                    }
                }
                if !totals.skills.is_empty() {
                    println!("{}", style("Skills:").bold().yellow());
                    for (skill, bonus) in &totals.skills {
                        println!("  {skill}: {bonus:+}");
                    }
                }
            }
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&totals)?),
        }
        Ok(())
    }
}
