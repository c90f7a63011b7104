use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::rows::{CatalogEntry, Rows};

/// Ids read back from an id list, plus the lines that weren't ids.
#[derive(Debug, Default, PartialEq)]
pub struct IdList {
    pub ids: Vec<u32>,
    /// `(line number, raw line)`, 1-based.
    pub rejected: Vec<(usize, String)>,
}

/// One decimal id per line, in accumulation order. Duplicates are kept.
pub fn write_app_ids(path: &Path, entries: &Rows<CatalogEntry>) -> Result<()> {
    let mut out = String::with_capacity(entries.len() * 8);
    for entry in entries {
        out.push_str(&entry.id.to_string());
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("App IDs saved to {}", path.display());
    Ok(())
}

/// Blank lines are skipped silently; anything else that isn't an id is
/// logged and reported back in `rejected`.
pub fn parse_app_ids(text: &str) -> IdList {
    let mut list = IdList::default();
    for (i, line) in text.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        match trimmed.parse::<u32>() {
            Ok(id) => list.ids.push(id),
            Err(_) => {
                warn!("Invalid AppID on line {}: {:?}", i + 1, trimmed);
                list.rejected.push((i + 1, trimmed.to_string()));
            }
        }
    }
    list
}

pub fn read_app_ids(path: &Path) -> Result<IdList> {
    let text =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(parse_app_ids(&text))
}
