use console::style;
use crudforge_codegen::{HistoryManager, JsonFileStore, Removal};
use crudforge_core::{CoreError, ForgeConfig};

fn manager(config: &ForgeConfig) -> HistoryManager<JsonFileStore> {
    HistoryManager::new(JsonFileStore::new(config.history_path()), config.output_root.clone())
}

pub fn list(config: &ForgeConfig, json: bool) -> Result<bool, CoreError> {
    let records = manager(config).get_all()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(true);
    }

    if records.is_empty() {
        println!("No generation history");
        return Ok(true);
    }

    for record in &records {
        println!(
            "{} {} {} {}",
            style(&record.module_name).cyan().bold(),
            style(if record.package_path.is_empty() { "-" } else { record.package_path.as_str() }).dim(),
            record.components.join(","),
            style(record.generated_at.to_rfc3339()).dim()
        );
        println!("  {} file(s), table {}", record.generated_files.len(), record.table_name);
    }
    Ok(true)
}

pub fn show(config: &ForgeConfig, module: &str) -> Result<bool, CoreError> {
    let record = manager(config).get_by_module(module)?;
    println!("{}", serde_json::to_string_pretty(&record)?);
    Ok(true)
}

pub fn delete(config: &ForgeConfig, module: &str) -> Result<bool, CoreError> {
    let removal = manager(config).delete_by_module(module)?;
    println!("{} Deleted history for {}", style("✓").green().bold(), module);
    Ok(print_removal(&removal))
}

pub fn clear(config: &ForgeConfig) -> Result<bool, CoreError> {
    let removal = manager(config).clear()?;
    println!("{} History cleared", style("✓").green().bold());
    Ok(print_removal(&removal))
}

/// Returns false when a file could not be removed
fn print_removal(removal: &Removal) -> bool {
    for file in &removal.removed {
        println!("  {} {}", style("-").red(), file);
    }
    for file in &removal.missing {
        println!("  {} {} (already gone)", style("-").dim(), file);
    }
    for file in &removal.failed {
        println!("  {} {} could not be removed", style("✗").red(), file);
    }
    removal.failed.is_empty()
}
