//! Task-list categorization command

use anyhow::Result;
use mony_core::{MonyConfig, TaskCategorizer};

pub fn cmd_categorize(config: &MonyConfig, names: &[String]) -> Result<()> {
    let categorizer = TaskCategorizer::from_config(config);

    for name in names {
        let category = categorizer.categorize(name);
        println!("{} {:<40} {}", category.icon, name, category.name);
    }

    Ok(())
}
