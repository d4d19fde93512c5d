//! Keys command implementation.

use std::path::Path;

use crate::commands::{entries_under, open_store};
use crate::error::Result;
use crate::output::format_keys;
use crate::OutputFormat;

/// Run the keys command - lists stored keys and their kinds.
pub fn run(path: Option<&Path>, tag: Option<&str>, format: OutputFormat) -> Result<()> {
    let store = open_store(path)?;
    let entries = entries_under(&store, tag)?;
    println!("{}", format_keys(&entries, format)?);
    Ok(())
}
