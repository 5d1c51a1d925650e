//! Rewrite a document at the current schema version.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use sheet_content::DocumentLoader;
use sheet_core::SheetConfig;

use super::print_diagnostics;

/// Rewrite a document at the current schema version
#[derive(Parser)]
pub struct Upgrade {
    /// Document file to read
    #[arg(value_name = "FILE")]
    file: PathBuf,

    /// Where to write the upgraded document (defaults to rewriting FILE)
    #[arg(short, long, value_name = "OUT")]
    output: Option<PathBuf>,
}

impl Upgrade {
    pub fn execute(self, config: &SheetConfig) -> Result<()> {
        let loader = DocumentLoader::new();
        let (mut doc, report) = loader.load(&self.file)?;
        print_diagnostics(&report);

        let from = doc.schema_version();
        let output = self.output.unwrap_or_else(|| self.file.clone());
        loader.save(&mut doc, &output, config)?;

        println!(
            "{} {} (version {} -> {})",
            style("Wrote").bold().green(),
            output.display(),
            from,
            doc.schema_version()
        );
        Ok(())
    }
}
