//! List command - enumerate cached entries

use crate::cache::{CacheEntryInfo, CacheLayout};
use crate::cli::args::{ListArgs, OutputFormat};
use crate::cli::commands::resolve_cache_root;
use crate::config::Config;
use crate::error::LarderResult;
use console::style;

/// Execute the list command
pub async fn execute(args: ListArgs, config: &Config) -> LarderResult<()> {
    let layout = CacheLayout::new(resolve_cache_root(args.root.as_ref(), config));
    let entries = layout.list_entries()?;

    if entries.is_empty() {
        println!("No cache entries found.");
        return Ok(());
    }

    match args.format {
        OutputFormat::Table => print_table(&entries),
        OutputFormat::Json => print_json(&entries)?,
        OutputFormat::Plain => print_plain(&entries),
    }

    Ok(())
}

fn print_table(entries: &[CacheEntryInfo]) {
    println!("{:<10} {:<60} {:<20}", "CATEGORY", "KEY", "MODIFIED");
    println!("{}", "-".repeat(90));

    for entry in entries {
        let modified = entry
            .modified
            .map(|m| m.format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "-".to_string());

        println!(
            "{:<10} {:<60} {:<20}",
            style(entry.category).cyan(),
            entry.key,
            modified
        );
    }

    println!();
    println!("Total: {} entr(ies)", entries.len());
}

fn print_json(entries: &[CacheEntryInfo]) -> LarderResult<()> {
    println!("{}", serde_json::to_string_pretty(entries)?);
    Ok(())
}

fn print_plain(entries: &[CacheEntryInfo]) {
    for entry in entries {
        println!("{}/{}", entry.category, entry.key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::Category;
    use std::path::PathBuf;

    #[test]
    fn print_functions_do_not_panic() {
        let entries = vec![CacheEntryInfo {
            category: Category::Npm,
            key: "lodash/4.17.0".to_string(),
            path: PathBuf::from("/cache/npm/lodash/4.17.0"),
            modified: None,
        }];

        print_table(&entries);
        print_plain(&entries);
        print_json(&entries).unwrap();
    }
}
