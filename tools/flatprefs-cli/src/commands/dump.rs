//! Dump command implementation.

use std::path::Path;

use crate::commands::{entries_under, open_store};
use crate::error::Result;
use crate::output::format_entries;
use crate::OutputFormat;

/// Run the dump command - prints every entry beneath a tag.
pub fn run(path: Option<&Path>, tag: Option<&str>, format: OutputFormat) -> Result<()> {
    let store = open_store(path)?;
    let entries = entries_under(&store, tag)?;
    println!("{}", format_entries(&entries, format)?);
    Ok(())
}
