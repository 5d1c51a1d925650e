//! Command implementations
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod inspect;
mod totals;
mod upgrade;

pub use inspect::Inspect;
pub use totals::Totals;
pub use upgrade::Upgrade;

use console::style;
use sheet_content::LoadReport;

/// Output format shared by the reporting commands.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable summary
    Summary,
    /// Full JSON output
    Json,
}

/// Print load diagnostics to stderr, if any.
fn print_diagnostics(report: &LoadReport) {
    if report.is_clean() {
        return;
    }
    eprintln!(
        "{} {} diagnostic(s)",
        style("Warning:").bold().yellow(),
        report.len()
    );
    for diagnostic in report.iter() {
        eprintln!("  {diagnostic}");
    }
}
