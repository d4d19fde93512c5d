//! Remove command implementation.

use std::path::Path;

use flatprefs::Configuration;
use tracing::info;

use crate::commands::open_store;
use crate::error::Result;

/// Run the remove command - clears a tag and its subtree in one batch.
pub fn run(path: Option<&Path>, tag: &str) -> Result<()> {
    let store = open_store(path)?;
    let removed = flatprefs::remove(&store, &Configuration::default(), tag)?;
    info!(tag, removed, "removed subtree");
    println!("Removed {removed} key(s) under '{tag}'");
    Ok(())
}
