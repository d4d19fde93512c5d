//! Get command implementation.

use std::path::Path;

use flatprefs::PreferenceStore;

use crate::commands::open_store;
use crate::error::{CliError, Result};
use crate::output::format_single;
use crate::OutputFormat;

/// Run the get command - prints the primitive stored at one key.
pub fn run(path: Option<&Path>, key: &str, format: OutputFormat) -> Result<()> {
    let store = open_store(path)?;
    let value = store.get(key)?.ok_or_else(|| CliError::KeyNotFound(key.to_string()))?;
    println!("{}", format_single(&value, format)?);
    Ok(())
}
